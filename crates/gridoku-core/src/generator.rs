use crate::{Grid, GridError, Position, PuzzleState};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fraction of cells removed when the caller does not pick one.
pub const DEFAULT_REMOVAL_FRACTION: f64 = 0.5;

/// Coarse difficulty presets.
///
/// Difficulty is approximated purely by how much of the full solution gets
/// removed; there is no technique-based rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Fraction of cells removed from the complete solution.
    pub fn removal_fraction(&self) -> f64 {
        match self {
            Difficulty::Easy => 0.4,
            Difficulty::Medium => DEFAULT_REMOVAL_FRACTION,
            Difficulty::Hard => 0.6,
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "Easy"),
            Difficulty::Medium => write!(f, "Medium"),
            Difficulty::Hard => write!(f, "Hard"),
        }
    }
}

/// Errors from solution and puzzle generation.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum GenerateError {
    #[error(transparent)]
    Grid(#[from] GridError),
    #[error("removal fraction {0} is outside (0, 1)")]
    InvalidRemovalFraction(f64),
    /// The starting grid admits no complete assignment. Filling from empty
    /// on a supported size never reports this; completing an infeasible
    /// partial grid does.
    #[error("the starting grid admits no complete assignment")]
    Unsatisfiable,
}

/// Produces random full solutions and playable puzzles.
///
/// Owns its random source so repeated calls draw fresh randomness; create it
/// with [`Generator::with_seed`] when reproducibility matters (tests, replays).
pub struct Generator {
    rng: SeededRng,
}

impl Default for Generator {
    fn default() -> Self {
        Self::new()
    }
}

impl Generator {
    /// Create a generator seeded from the operating system.
    pub fn new() -> Self {
        Self {
            rng: SeededRng::from_entropy(),
        }
    }

    /// Create a generator with a fixed seed for reproducible output.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: SeededRng::with_seed(seed),
        }
    }

    /// Fill every empty cell of `grid` in place.
    ///
    /// Structurally the first-empty backtracking solver, except the candidate
    /// values `1..=N` are freshly shuffled at each cell, so which of the many
    /// valid complete grids comes out is uniform-ish rather than biased
    /// toward small values. Returns false when the grid as given admits no
    /// completion; an empty grid of a supported size always succeeds.
    pub fn fill_random(&mut self, grid: &mut Grid) -> bool {
        let Some(pos) = grid.first_empty() else {
            return true;
        };
        let mut values: Vec<u8> = (1..=grid.size() as u8).collect();
        self.shuffle(&mut values);
        for &value in &values {
            if grid.is_valid_placement(pos, value) {
                grid.set(pos, value);
                if self.fill_random(grid) {
                    return true;
                }
                grid.set(pos, 0);
            }
        }
        false
    }

    /// Randomly complete a partially filled grid, returning a fresh grid.
    ///
    /// Runs [`Generator::fill_random`] on a private clone; the input is never
    /// touched. A grid that admits no completion (including one that already
    /// conflicts) reports [`GenerateError::Unsatisfiable`].
    pub fn complete(&mut self, grid: &Grid) -> Result<Grid, GenerateError> {
        let mut working = grid.clone();
        if self.fill_random(&mut working) {
            Ok(working)
        } else {
            Err(GenerateError::Unsatisfiable)
        }
    }

    /// Generate a complete random valid grid of the given size.
    pub fn generate_solution(&mut self, size: usize) -> Result<Grid, GenerateError> {
        self.complete(&Grid::empty(size)?)
    }

    /// Derive a playable puzzle: a full random solution with
    /// `floor(N^2 * removal_fraction)` cells cleared at shuffled coordinates.
    ///
    /// Every cell that keeps its value is locked against player edits; the
    /// complete solution is retained in the returned state for hints and
    /// correctness checks.
    pub fn generate_puzzle(
        &mut self,
        size: usize,
        removal_fraction: f64,
    ) -> Result<PuzzleState, GenerateError> {
        if !(removal_fraction > 0.0 && removal_fraction < 1.0) {
            return Err(GenerateError::InvalidRemovalFraction(removal_fraction));
        }
        let solution = self.generate_solution(size)?;

        let cells_to_remove = (size as f64 * size as f64 * removal_fraction) as usize;
        let mut positions: Vec<Position> = solution.positions().collect();
        self.shuffle(&mut positions);

        let mut puzzle = solution.clone();
        for &pos in positions.iter().take(cells_to_remove) {
            puzzle.set(pos, 0);
        }

        // The state gets its own rng so hints stay deterministic per puzzle.
        let rng = SeededRng::with_seed(self.rng.next_u64());
        Ok(PuzzleState::new(puzzle, solution, rng))
    }

    /// [`Generator::generate_puzzle`] with a preset removal fraction.
    pub fn generate_puzzle_with_difficulty(
        &mut self,
        size: usize,
        difficulty: Difficulty,
    ) -> Result<PuzzleState, GenerateError> {
        self.generate_puzzle(size, difficulty.removal_fraction())
    }

    /// Fisher-Yates shuffle.
    fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.rng.next_usize(i + 1);
            slice.swap(i, j);
        }
    }
}

/// Small PCG-style PRNG.
///
/// Seeded through `getrandom` so generation behaves the same on native and
/// wasm targets; deliberately not a cryptographic source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct SeededRng {
    state: u64,
}

impl SeededRng {
    pub(crate) fn from_entropy() -> Self {
        let mut seed_bytes = [0u8; 8];
        getrandom::getrandom(&mut seed_bytes).unwrap_or_else(|_| {
            // Fallback: a process-wide counter still varies between calls.
            static COUNTER: std::sync::atomic::AtomicU64 = std::sync::atomic::AtomicU64::new(1);
            let counter = COUNTER.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
            seed_bytes = counter.to_le_bytes();
        });
        Self::with_seed(u64::from_le_bytes(seed_bytes))
    }

    pub(crate) fn with_seed(seed: u64) -> Self {
        Self {
            state: seed.wrapping_add(1),
        }
    }

    pub(crate) fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        let xorshifted = (((self.state >> 18) ^ self.state) >> 27) as u32;
        let rot = (self.state >> 59) as u32;
        (xorshifted.rotate_right(rot)) as u64
    }

    /// Uniform-ish draw in `0..bound`. `bound` must be non-zero.
    pub(crate) fn next_usize(&mut self, bound: usize) -> usize {
        (self.next_u64() as usize) % bound
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generates_complete_valid_6x6_grids() {
        // Rectangular (2, 3) boxes are the interesting case.
        for seed in 0..10 {
            let mut generator = Generator::with_seed(seed);
            let grid = generator.generate_solution(6).unwrap();
            assert!(grid.is_complete());
            assert!(grid.is_valid());
            assert_eq!(grid.box_shape(), crate::BoxShape { rows: 2, cols: 3 });
        }
    }

    #[test]
    fn generates_complete_valid_grids_for_all_supported_sizes() {
        let mut generator = Generator::with_seed(7);
        for size in [4, 6, 9] {
            let grid = generator.generate_solution(size).unwrap();
            assert_eq!(grid.size(), size);
            assert!(grid.is_complete());
            assert!(grid.is_valid());
        }
    }

    #[test]
    fn rejects_unsupported_sizes() {
        let mut generator = Generator::with_seed(0);
        assert_eq!(
            generator.generate_solution(8),
            Err(GenerateError::Grid(GridError::UnsupportedSize(8)))
        );
    }

    #[test]
    fn same_seed_same_output() {
        let a = Generator::with_seed(42).generate_solution(9).unwrap();
        let b = Generator::with_seed(42).generate_solution(9).unwrap();
        assert_eq!(a, b);

        let c = Generator::with_seed(43).generate_solution(9).unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn fill_random_respects_existing_entries() {
        let mut generator = Generator::with_seed(3);
        let mut grid = Grid::empty(9).unwrap();
        grid.set(Position::new(0, 0), 5);
        grid.set(Position::new(4, 4), 1);

        assert!(generator.fill_random(&mut grid));
        assert_eq!(grid.get(Position::new(0, 0)), 5);
        assert_eq!(grid.get(Position::new(4, 4)), 1);
        assert!(grid.is_valid());
    }

    #[test]
    fn fill_random_fails_on_an_infeasible_grid() {
        // (0, 3) has no candidate: 1, 2, 3 in its row, 4 in its column.
        let mut grid = Grid::from_rows(&[
            vec![1, 2, 3, 0],
            vec![0, 0, 0, 4],
            vec![0, 0, 0, 0],
            vec![0, 0, 0, 0],
        ])
        .unwrap();
        let snapshot = grid.clone();

        let mut generator = Generator::with_seed(0);
        assert!(!generator.fill_random(&mut grid));
        // Backtracking restored every cell it touched.
        assert_eq!(grid, snapshot);
    }

    #[test]
    fn complete_solves_a_partial_grid_or_reports_unsatisfiable() {
        let mut generator = Generator::with_seed(14);

        let mut partial = Grid::empty(9).unwrap();
        partial.set(Position::new(0, 0), 5);
        partial.set(Position::new(8, 8), 2);
        let full = generator.complete(&partial).unwrap();
        assert!(full.is_complete());
        assert!(full.is_valid());
        assert_eq!(full.get(Position::new(0, 0)), 5);
        assert_eq!(full.get(Position::new(8, 8)), 2);
        // The input grid is untouched.
        assert_eq!(partial.filled_count(), 2);

        // (0, 3) has no candidate: 1, 2, 3 in its row, 4 in its column.
        let infeasible = Grid::from_rows(&[
            vec![1, 2, 3, 0],
            vec![0, 0, 0, 4],
            vec![0, 0, 0, 0],
            vec![0, 0, 0, 0],
        ])
        .unwrap();
        assert_eq!(
            generator.complete(&infeasible),
            Err(GenerateError::Unsatisfiable)
        );
    }

    #[test]
    fn half_removal_on_4x4_leaves_exactly_eight_givens() {
        let mut generator = Generator::with_seed(99);
        let state = generator.generate_puzzle(4, 0.5).unwrap();

        assert_eq!(state.grid().filled_count(), 8);
        assert_eq!(state.grid().empty_count(), 8);

        let locked_count = state
            .grid()
            .positions()
            .filter(|&pos| state.is_locked(pos))
            .count();
        assert_eq!(locked_count, 8);
        for pos in state.grid().positions() {
            assert_eq!(state.is_locked(pos), state.grid().get(pos) != 0);
        }
    }

    #[test]
    fn puzzle_grid_matches_solution_wherever_filled() {
        let mut generator = Generator::with_seed(5);
        let state = generator.generate_puzzle(9, 0.6).unwrap();

        assert!(state.solution().is_complete());
        assert!(state.solution().is_valid());
        for pos in state.grid().positions() {
            let visible = state.grid().get(pos);
            if visible != 0 {
                assert_eq!(visible, state.solution().get(pos));
            }
        }
    }

    #[test]
    fn removal_fraction_must_be_a_proper_fraction() {
        let mut generator = Generator::with_seed(1);
        for bad in [0.0, 1.0, -0.25, 1.5, f64::NAN] {
            assert!(matches!(
                generator.generate_puzzle(9, bad),
                Err(GenerateError::InvalidRemovalFraction(_))
            ));
        }
    }

    #[test]
    fn difficulty_presets_map_to_fractions() {
        assert_eq!(Difficulty::Medium.removal_fraction(), 0.5);
        let mut generator = Generator::with_seed(8);
        let state = generator
            .generate_puzzle_with_difficulty(9, Difficulty::Easy)
            .unwrap();
        // floor(81 * 0.4) = 32 removed
        assert_eq!(state.grid().empty_count(), 32);
    }
}
