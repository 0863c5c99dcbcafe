use crate::GridError;
use serde::{Deserialize, Serialize};

/// A cell coordinate, 0-indexed from the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// The `rows x cols` shape of one sub-box of a grid.
///
/// Each box must contain every value `1..=N` at most once, the same as rows
/// and columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoxShape {
    pub rows: usize,
    pub cols: usize,
}

impl BoxShape {
    /// Look up the box shape for a grid size.
    ///
    /// 4 -> 2x2, 6 -> 2x3, 9 -> 3x3; other perfect squares get square boxes.
    /// Sizes with no such decomposition are rejected outright rather than
    /// guessed at, so a bad size never reaches the solver.
    pub fn for_size(size: usize) -> Result<Self, GridError> {
        match size {
            4 => Ok(Self { rows: 2, cols: 2 }),
            6 => Ok(Self { rows: 2, cols: 3 }),
            9 => Ok(Self { rows: 3, cols: 3 }),
            _ => {
                let root = (size as f64).sqrt().round() as usize;
                if size > 0 && root * root == size {
                    Ok(Self { rows: root, cols: root })
                } else {
                    Err(GridError::UnsupportedSize(size))
                }
            }
        }
    }

    /// Top-left corner of the box containing `pos`.
    pub fn origin_of(&self, pos: Position) -> Position {
        Position::new(pos.row / self.rows * self.rows, pos.col / self.cols * self.cols)
    }
}
