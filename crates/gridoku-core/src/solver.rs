use crate::{Grid, Position};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Expected outcomes of a failed solve. Neither is a fault: conflicting or
/// unsolvable boards are normal input from manual entry or an image importer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SolveError {
    /// The grid already violates a row, column, or box constraint as given.
    /// Reported before any search so the caller can prompt for correction
    /// instead of claiming unsolvability.
    #[error("the grid contains conflicting entries")]
    InvalidInput,
    /// No complete valid assignment exists, or the search hit its attempt
    /// cap. The two cases are indistinguishable to the caller.
    #[error("no solution exists for this grid")]
    NoSolution,
}

/// Cell-ordering policy for the backtracking search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolverStrategy {
    /// First empty cell in row-major order, values tried in ascending order.
    FirstEmpty,
    /// Branch on the empty cell with the fewest legal candidates, pruning any
    /// branch that leaves a cell with none. `attempt_cap` bounds the number
    /// of recursive steps so a pathological board fails deterministically
    /// instead of hanging the caller; `None` means N^3 for an NxN grid.
    MinimumRemainingValues { attempt_cap: Option<usize> },
}

impl Default for SolverStrategy {
    fn default() -> Self {
        Self::MinimumRemainingValues { attempt_cap: None }
    }
}

/// Backtracking solver over a grid snapshot.
pub struct Solver {
    strategy: SolverStrategy,
}

impl Default for Solver {
    fn default() -> Self {
        Self::new()
    }
}

impl Solver {
    /// Create a solver with the default MRV strategy.
    pub fn new() -> Self {
        Self {
            strategy: SolverStrategy::default(),
        }
    }

    /// Create a solver with an explicit strategy.
    pub fn with_strategy(strategy: SolverStrategy) -> Self {
        Self { strategy }
    }

    pub fn strategy(&self) -> SolverStrategy {
        self.strategy
    }

    /// Solve the grid, returning the completed grid on success.
    ///
    /// The input is validated first; a grid that already breaks a constraint
    /// reports [`SolveError::InvalidInput`] rather than being searched. The
    /// search mutates a single private clone with undo-on-backtrack, so the
    /// caller's grid is never touched. Solving an already-complete valid grid
    /// succeeds and returns it unchanged.
    pub fn solve(&self, grid: &Grid) -> Result<Grid, SolveError> {
        if !grid.is_valid() {
            return Err(SolveError::InvalidInput);
        }
        let mut working = grid.clone();
        let solved = match self.strategy {
            SolverStrategy::FirstEmpty => solve_first_empty(&mut working),
            SolverStrategy::MinimumRemainingValues { attempt_cap } => {
                let n = working.size();
                let cap = attempt_cap.unwrap_or(n * n * n);
                let mut attempts = 0;
                solve_mrv(&mut working, &mut attempts, cap) == Search::Solved
            }
        };
        if solved {
            Ok(working)
        } else {
            Err(SolveError::NoSolution)
        }
    }
}

/// Internal search outcome. `Capped` unwinds the whole recursion and is
/// folded into [`SolveError::NoSolution`] at the API boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Search {
    Solved,
    Exhausted,
    Capped,
}

fn solve_first_empty(grid: &mut Grid) -> bool {
    let Some(pos) = grid.first_empty() else {
        return true;
    };
    for value in 1..=grid.size() as u8 {
        if grid.is_valid_placement(pos, value) {
            grid.set(pos, value);
            if solve_first_empty(grid) {
                return true;
            }
            grid.set(pos, 0);
        }
    }
    false
}

/// The empty cell with the fewest legal candidates, first found winning ties.
/// `None` means the grid is complete; a count of 0 means a dead end.
fn most_constrained_cell(grid: &Grid) -> Option<(Position, usize)> {
    let mut best: Option<(Position, usize)> = None;
    for pos in grid.positions() {
        if grid.get(pos) != 0 {
            continue;
        }
        let count = grid.candidate_count(pos);
        match best {
            None => best = Some((pos, count)),
            Some((_, best_count)) if count < best_count => best = Some((pos, count)),
            _ => {}
        }
    }
    best
}

fn solve_mrv(grid: &mut Grid, attempts: &mut usize, cap: usize) -> Search {
    *attempts += 1;
    if *attempts > cap {
        return Search::Capped;
    }

    let Some((pos, count)) = most_constrained_cell(grid) else {
        return Search::Solved;
    };
    if count == 0 {
        return Search::Exhausted;
    }

    for value in 1..=grid.size() as u8 {
        if grid.is_valid_placement(pos, value) {
            grid.set(pos, value);
            match solve_mrv(grid, attempts, cap) {
                Search::Solved => return Search::Solved,
                Search::Capped => {
                    grid.set(pos, 0);
                    return Search::Capped;
                }
                Search::Exhausted => grid.set(pos, 0),
            }
        }
    }
    Search::Exhausted
}
