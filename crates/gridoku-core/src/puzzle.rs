use crate::generator::SeededRng;
use crate::{Grid, Position};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Hints available per puzzle before further requests become no-ops.
pub const MAX_HINTS: usize = 3;

/// Rejected player moves. Locked cells belong to the generator (or a hint)
/// and are never editable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PlayError {
    #[error("cell ({row}, {col}) is fixed and cannot be edited")]
    LockedCell { row: usize, col: usize },
    #[error("value {value} is out of range for a {size}x{size} grid")]
    ValueOutOfRange { value: u8, size: usize },
}

/// Result of checking the visible grid against the stored solution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckReport {
    /// Filled cells whose value differs from the solution.
    pub incorrect: Vec<Position>,
    /// True when no empty cells remain, regardless of correctness.
    pub complete: bool,
}

impl CheckReport {
    pub fn is_solved(&self) -> bool {
        self.complete && self.incorrect.is_empty()
    }
}

/// A playable puzzle: the visible grid, the complete solution it was carved
/// from, and the mask of generator-fixed cells.
///
/// Invariant: wherever the visible grid is non-zero and locked, it equals the
/// solution. Hints extend the locked set one cell at a time. The state owns
/// its solution and mask; nothing else mutates them after generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PuzzleState {
    grid: Grid,
    solution: Grid,
    locked: Vec<bool>,
    hints_used: usize,
    rng: SeededRng,
}

impl PuzzleState {
    pub(crate) fn new(grid: Grid, solution: Grid, rng: SeededRng) -> Self {
        debug_assert!(solution.is_complete() && solution.is_valid());
        let locked = grid.positions().map(|pos| grid.get(pos) != 0).collect();
        Self {
            grid,
            solution,
            locked,
            hints_used: 0,
            rng,
        }
    }

    /// The visible grid, with removed cells as zeros.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// The complete solution the puzzle was derived from.
    pub fn solution(&self) -> &Grid {
        &self.solution
    }

    pub fn size(&self) -> usize {
        self.grid.size()
    }

    pub fn hints_used(&self) -> usize {
        self.hints_used
    }

    /// Whether `pos` was pre-filled by generation or revealed by a hint.
    pub fn is_locked(&self, pos: Position) -> bool {
        self.locked[pos.row * self.grid.size() + pos.col]
    }

    /// Player move: write `value` (`1..=N`) into an unlocked cell.
    pub fn set(&mut self, pos: Position, value: u8) -> Result<(), PlayError> {
        if self.is_locked(pos) {
            return Err(PlayError::LockedCell {
                row: pos.row,
                col: pos.col,
            });
        }
        let size = self.grid.size();
        if value == 0 || value as usize > size {
            return Err(PlayError::ValueOutOfRange { value, size });
        }
        self.grid.set(pos, value);
        Ok(())
    }

    /// Player move: empty an unlocked cell.
    pub fn clear(&mut self, pos: Position) -> Result<(), PlayError> {
        if self.is_locked(pos) {
            return Err(PlayError::LockedCell {
                row: pos.row,
                col: pos.col,
            });
        }
        self.grid.set(pos, 0);
        Ok(())
    }

    /// Reveal one uniformly chosen empty cell from the solution and lock it.
    ///
    /// Returns the revealed position, or `None` once [`MAX_HINTS`] have been
    /// used or no empty cell remains; neither case changes the state.
    pub fn hint(&mut self) -> Option<Position> {
        if self.hints_used >= MAX_HINTS {
            return None;
        }
        let empties = self.grid.empty_positions();
        if empties.is_empty() {
            return None;
        }
        let pos = empties[self.rng.next_usize(empties.len())];
        self.grid.set(pos, self.solution.get(pos));
        let index = pos.row * self.grid.size() + pos.col;
        self.locked[index] = true;
        self.hints_used += 1;
        Some(pos)
    }

    /// Compare the visible grid against the solution.
    ///
    /// Pure: flags every filled cell that disagrees with the solution and
    /// reports whether the grid is fully filled in. Never mutates anything.
    pub fn check(&self) -> CheckReport {
        let incorrect = self
            .grid
            .positions()
            .filter(|&pos| {
                let value = self.grid.get(pos);
                value != 0 && value != self.solution.get(pos)
            })
            .collect();
        CheckReport {
            incorrect,
            complete: self.grid.is_complete(),
        }
    }
}
