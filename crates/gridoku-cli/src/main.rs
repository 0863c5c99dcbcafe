use clap::{Parser, Subcommand};
use gridoku_core::{Generator, Grid, Solver, SolverStrategy, DEFAULT_REMOVAL_FRACTION};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(
    name = "gridoku",
    about = "Generalized Sudoku solver and puzzle generator (4x4, 6x6, 9x9)",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Solve a puzzle given as a compact string (row-major, `.` or `0` for
    /// empty). An all-empty grid yields a random full solution instead.
    Solve {
        puzzle: String,
        /// Use plain first-empty-cell ordering instead of the MRV search.
        #[arg(long)]
        first_empty: bool,
        /// Seed for the generator used when the grid is empty.
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Generate a random complete valid grid.
    Generate {
        #[arg(long, default_value_t = 9)]
        size: usize,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Derive a playable puzzle from a fresh random solution.
    Puzzle {
        #[arg(long, default_value_t = 9)]
        size: usize,
        /// Fraction of cells to remove, in (0, 1).
        #[arg(long, default_value_t = DEFAULT_REMOVAL_FRACTION)]
        remove: f64,
        #[arg(long)]
        seed: Option<u64>,
        /// Write the full puzzle state (grid, solution, locked mask) as JSON.
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn generator(seed: Option<u64>) -> Generator {
    match seed {
        Some(seed) => Generator::with_seed(seed),
        None => Generator::new(),
    }
}

fn run(cli: Cli) -> Result<(), String> {
    match cli.command {
        Command::Solve {
            puzzle,
            first_empty,
            seed,
        } => {
            let grid = Grid::from_string(&puzzle).map_err(|e| e.to_string())?;
            if grid.is_empty() {
                let solution = generator(seed)
                    .generate_solution(grid.size())
                    .map_err(|e| e.to_string())?;
                println!("{solution}");
                return Ok(());
            }
            let strategy = if first_empty {
                SolverStrategy::FirstEmpty
            } else {
                SolverStrategy::default()
            };
            let solution = Solver::with_strategy(strategy)
                .solve(&grid)
                .map_err(|e| e.to_string())?;
            println!("{solution}");
            Ok(())
        }
        Command::Generate { size, seed } => {
            let grid = generator(seed)
                .generate_solution(size)
                .map_err(|e| e.to_string())?;
            println!("{grid}");
            Ok(())
        }
        Command::Puzzle {
            size,
            remove,
            seed,
            out,
        } => {
            let state = generator(seed)
                .generate_puzzle(size, remove)
                .map_err(|e| e.to_string())?;
            println!("{}", state.grid());
            println!("givens:  {} / {}", state.grid().filled_count(), size * size);
            println!("compact: {}", state.grid().to_string_compact());
            if let Some(path) = out {
                let json = serde_json::to_string_pretty(&state).map_err(|e| e.to_string())?;
                std::fs::write(&path, json).map_err(|e| e.to_string())?;
                println!("state written to {}", path.display());
            }
            Ok(())
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}
