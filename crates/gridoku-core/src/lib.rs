//! Generalized Sudoku engine.
//!
//! Supports square grids whose size decomposes into `box_rows x box_cols`
//! sub-boxes (4x4, 6x6, and 9x9 in the shipped configurations). The engine
//! covers placement checking, whole-grid validation, backtracking solving
//! with selectable strategies, randomized full-solution generation, and
//! derivation of playable puzzles with hint and check support.
//!
//! Presentation, input handling, and image import live in host applications;
//! they talk to this crate only through grid snapshots and [`PuzzleState`].

mod generator;
mod geometry;
mod grid;
mod puzzle;
mod solver;

pub use generator::{
    Difficulty, GenerateError, Generator, DEFAULT_REMOVAL_FRACTION,
};
pub use geometry::{BoxShape, Position};
pub use grid::{Grid, GridError};
pub use puzzle::{CheckReport, PlayError, PuzzleState, MAX_HINTS};
pub use solver::{SolveError, Solver, SolverStrategy};
