use crate::{BoxShape, Position};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors from grid construction and parsing.
///
/// All of these are boundary errors: once a `Grid` exists, its size and box
/// shape are known good and the solver never revalidates them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("grid size {0} has no box decomposition")]
    UnsupportedSize(usize),
    #[error("expected a row of {expected} values, got {got}")]
    BadDimensions { expected: usize, got: usize },
    #[error("cell value {value} is out of range for a {size}x{size} grid")]
    ValueOutOfRange { value: u8, size: usize },
    #[error("puzzle string length {0} is not the square of a supported grid size")]
    BadPuzzleString(usize),
}

/// An N x N grid of values in `0..=N`, where 0 marks an empty cell.
///
/// Grids are value types: solving and generation work on private clones and
/// hand a fresh grid back, so a caller's grid is never aliased mid-search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    size: usize,
    box_shape: BoxShape,
    cells: Vec<u8>,
}

impl Grid {
    /// Create an all-empty grid, validating the size at this boundary.
    pub fn empty(size: usize) -> Result<Self, GridError> {
        let box_shape = BoxShape::for_size(size)?;
        Ok(Self {
            size,
            box_shape,
            cells: vec![0; size * size],
        })
    }

    /// Build a grid from row-major rows, as produced by manual entry or an
    /// external digit importer. Values are range-checked but the grid is not
    /// checked for conflicts; run [`Grid::is_valid`] for that.
    pub fn from_rows(rows: &[Vec<u8>]) -> Result<Self, GridError> {
        let size = rows.len();
        let mut grid = Self::empty(size)?;
        for (row, values) in rows.iter().enumerate() {
            if values.len() != size {
                return Err(GridError::BadDimensions {
                    expected: size,
                    got: values.len(),
                });
            }
            for (col, &value) in values.iter().enumerate() {
                if value as usize > size {
                    return Err(GridError::ValueOutOfRange { value, size });
                }
                grid.set(Position::new(row, col), value);
            }
        }
        Ok(grid)
    }

    /// Parse a compact puzzle string: one digit per cell in row-major order,
    /// with `.` or `0` for an empty cell. The grid size is inferred from the
    /// length (16 -> 4x4, 36 -> 6x6, 81 -> 9x9). Whitespace is ignored.
    pub fn from_string(s: &str) -> Result<Self, GridError> {
        let chars: Vec<char> = s.chars().filter(|ch| !ch.is_whitespace()).collect();
        let size = match chars.len() {
            16 => 4,
            36 => 6,
            81 => 9,
            len => return Err(GridError::BadPuzzleString(len)),
        };
        let mut grid = Self::empty(size)?;
        for (i, &ch) in chars.iter().enumerate() {
            let value = match ch {
                '.' | '0' => 0,
                d if d.is_ascii_digit() => d as u8 - b'0',
                _ => return Err(GridError::BadPuzzleString(chars.len())),
            };
            if value as usize > size {
                return Err(GridError::ValueOutOfRange { value, size });
            }
            grid.cells[i] = value;
        }
        Ok(grid)
    }

    /// Inverse of [`Grid::from_string`].
    pub fn to_string_compact(&self) -> String {
        self.cells
            .iter()
            .map(|&v| if v == 0 { '.' } else { (b'0' + v) as char })
            .collect()
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn box_shape(&self) -> BoxShape {
        self.box_shape
    }

    #[inline]
    fn index(&self, pos: Position) -> usize {
        pos.row * self.size + pos.col
    }

    pub fn get(&self, pos: Position) -> u8 {
        self.cells[self.index(pos)]
    }

    pub fn set(&mut self, pos: Position, value: u8) {
        let i = self.index(pos);
        self.cells[i] = value;
    }

    /// All cell coordinates in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> {
        let size = self.size;
        (0..size).flat_map(move |row| (0..size).map(move |col| Position::new(row, col)))
    }

    /// First empty cell in row-major order, if any.
    pub fn first_empty(&self) -> Option<Position> {
        self.positions().find(|&pos| self.get(pos) == 0)
    }

    pub fn empty_positions(&self) -> Vec<Position> {
        self.positions().filter(|&pos| self.get(pos) == 0).collect()
    }

    pub fn empty_count(&self) -> usize {
        self.cells.iter().filter(|&&v| v == 0).count()
    }

    pub fn filled_count(&self) -> usize {
        self.size * self.size - self.empty_count()
    }

    /// True when every cell is empty.
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|&v| v == 0)
    }

    /// True when no cell is empty. Says nothing about validity.
    pub fn is_complete(&self) -> bool {
        self.cells.iter().all(|&v| v != 0)
    }

    /// Whether `value` may be placed at `pos` without clashing with the row,
    /// column, or box containing it.
    ///
    /// The target cell is assumed empty: a filled cell must be cleared before
    /// re-checking its own value, or it trivially conflicts with itself.
    pub fn is_valid_placement(&self, pos: Position, value: u8) -> bool {
        for col in 0..self.size {
            if self.get(Position::new(pos.row, col)) == value {
                return false;
            }
        }
        for row in 0..self.size {
            if self.get(Position::new(row, pos.col)) == value {
                return false;
            }
        }
        let origin = self.box_shape.origin_of(pos);
        for dr in 0..self.box_shape.rows {
            for dc in 0..self.box_shape.cols {
                if self.get(Position::new(origin.row + dr, origin.col + dc)) == value {
                    return false;
                }
            }
        }
        true
    }

    /// How many of `1..=N` could legally go at `pos`.
    pub fn candidate_count(&self, pos: Position) -> usize {
        (1..=self.size as u8)
            .filter(|&value| self.is_valid_placement(pos, value))
            .count()
    }

    /// Check the grid as given for internal conflicts.
    ///
    /// Every filled cell is cleared in a working copy and its value re-tested
    /// against the rest; the clear step is what lets `is_valid_placement`'s
    /// empty-target contract hold while re-checking existing entries.
    pub fn is_valid(&self) -> bool {
        let mut working = self.clone();
        for pos in self.positions() {
            let value = self.get(pos);
            if value == 0 {
                continue;
            }
            working.set(pos, 0);
            let ok = working.is_valid_placement(pos, value);
            working.set(pos, value);
            if !ok {
                return false;
            }
        }
        true
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.size {
            if row > 0 && row % self.box_shape.rows == 0 {
                for col in 0..self.size {
                    if col > 0 && col % self.box_shape.cols == 0 {
                        write!(f, "+-")?;
                    }
                    write!(f, "--")?;
                }
                writeln!(f)?;
            }
            for col in 0..self.size {
                if col > 0 && col % self.box_shape.cols == 0 {
                    write!(f, "| ")?;
                }
                let value = self.get(Position::new(row, col));
                if value == 0 {
                    write!(f, ". ")?;
                } else {
                    write!(f, "{} ", value)?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLASSIC: &str =
        "530070000600195000098000060800060003400803001700020006060000280000419005000080079";

    #[test]
    fn from_string_infers_size() {
        let grid = Grid::from_string(CLASSIC).unwrap();
        assert_eq!(grid.size(), 9);
        assert_eq!(grid.get(Position::new(0, 0)), 5);
        assert_eq!(grid.get(Position::new(8, 8)), 9);
        assert_eq!(grid.filled_count(), 30);

        let small = Grid::from_string("1..4.34..41.3..2").unwrap();
        assert_eq!(small.size(), 4);
        assert_eq!(small.box_shape(), BoxShape { rows: 2, cols: 2 });
    }

    #[test]
    fn from_string_rejects_bad_input() {
        assert_eq!(
            Grid::from_string("123"),
            Err(GridError::BadPuzzleString(3))
        );
        // 4x4 grid may only hold values up to 4
        assert_eq!(
            Grid::from_string("9..4.34..41.3..2"),
            Err(GridError::ValueOutOfRange { value: 9, size: 4 })
        );
    }

    #[test]
    fn compact_string_round_trips() {
        let grid = Grid::from_string(CLASSIC).unwrap();
        let compact = grid.to_string_compact();
        assert_eq!(Grid::from_string(&compact).unwrap(), grid);
    }

    #[test]
    fn from_rows_checks_shape_and_range() {
        assert!(Grid::from_rows(&[
            vec![1, 2, 0, 0],
            vec![0, 0, 1, 2],
            vec![2, 1, 0, 0],
            vec![0, 0, 2, 1],
        ])
        .is_ok());
        // Size is validated before row shapes: a 5-row grid never gets as
        // far as the short-row check.
        let five_by_five = vec![vec![0u8; 5]; 5];
        assert_eq!(
            Grid::from_rows(&five_by_five),
            Err(GridError::UnsupportedSize(5))
        );
        assert_eq!(
            Grid::from_rows(&[vec![1, 2, 0, 0], vec![0, 0, 0], vec![0; 4], vec![0; 4]]),
            Err(GridError::BadDimensions { expected: 4, got: 3 })
        );
    }

    #[test]
    fn placement_conflicts_in_row_col_and_box() {
        let grid = Grid::from_rows(&[
            vec![1, 0, 0, 0],
            vec![0, 0, 0, 0],
            vec![0, 0, 2, 0],
            vec![0, 0, 0, 0],
        ])
        .unwrap();

        // row conflict
        assert!(!grid.is_valid_placement(Position::new(0, 3), 1));
        // column conflict
        assert!(!grid.is_valid_placement(Position::new(3, 0), 1));
        // box conflict: (1, 1) shares the top-left 2x2 box with (0, 0)
        assert!(!grid.is_valid_placement(Position::new(1, 1), 1));
        // no conflict
        assert!(grid.is_valid_placement(Position::new(1, 1), 3));
        assert!(grid.is_valid_placement(Position::new(0, 3), 2));
    }

    #[test]
    fn candidate_counts() {
        let mut grid = Grid::empty(9).unwrap();
        grid.set(Position::new(0, 0), 1);
        grid.set(Position::new(0, 1), 2);
        grid.set(Position::new(0, 2), 3);
        // (0, 3) sees 1, 2, 3 in its row
        assert_eq!(grid.candidate_count(Position::new(0, 3)), 6);
        let empty = Grid::empty(9).unwrap();
        assert_eq!(empty.candidate_count(Position::new(4, 4)), 9);
    }

    #[test]
    fn validates_clean_and_conflicting_grids() {
        assert!(Grid::from_string(CLASSIC).unwrap().is_valid());
        assert!(Grid::empty(6).unwrap().is_valid());

        // box conflict only: different row, different column, same 2x2 box
        let boxed = Grid::from_rows(&[
            vec![1, 0, 0, 0],
            vec![0, 1, 0, 0],
            vec![0, 0, 0, 0],
            vec![0, 0, 0, 0],
        ])
        .unwrap();
        assert!(!boxed.is_valid());

        let mut row_dup = Grid::empty(9).unwrap();
        row_dup.set(Position::new(2, 0), 7);
        row_dup.set(Position::new(2, 8), 7);
        assert!(!row_dup.is_valid());
    }

    #[test]
    fn emptiness_and_completeness() {
        let empty = Grid::empty(4).unwrap();
        assert!(empty.is_empty());
        assert!(!empty.is_complete());
        assert_eq!(empty.first_empty(), Some(Position::new(0, 0)));

        let full = Grid::from_string("1234341221434321").unwrap();
        assert!(!full.is_empty());
        assert!(full.is_complete());
        assert_eq!(full.first_empty(), None);
        assert!(full.empty_positions().is_empty());
    }

    #[test]
    fn display_marks_box_boundaries() {
        let grid = Grid::from_string(CLASSIC).unwrap();
        let rendered = grid.to_string();
        assert!(rendered.starts_with("5 3 . | . 7 . | . . ."));
        // 9 value rows plus 2 separator rows
        assert_eq!(rendered.lines().count(), 11);
    }

    #[test]
    fn serde_round_trip() {
        let grid = Grid::from_string(CLASSIC).unwrap();
        let json = serde_json::to_string(&grid).unwrap();
        let back: Grid = serde_json::from_str(&json).unwrap();
        assert_eq!(back, grid);
    }
}
