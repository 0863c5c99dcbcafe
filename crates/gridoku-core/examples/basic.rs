//! Basic example of using the engine end to end.

use gridoku_core::{Generator, Grid, Solver};

fn main() {
    // Generate a playable 9x9 puzzle with half the cells removed.
    println!("Generating a 9x9 puzzle...\n");
    let mut generator = Generator::new();
    let mut state = generator
        .generate_puzzle(9, 0.5)
        .expect("9 is a supported size");

    println!("Generated puzzle:");
    println!("{}", state.grid());
    println!("Given cells: {}", state.grid().filled_count());
    println!("Empty cells: {}\n", state.grid().empty_count());

    // Take a hint.
    if let Some(pos) = state.hint() {
        println!(
            "Hint revealed {} = {}\n",
            pos,
            state.grid().get(pos)
        );
    }

    // Solve it.
    let solver = Solver::new();
    match solver.solve(state.grid()) {
        Ok(solution) => {
            println!("Solution:");
            println!("{}", solution);
        }
        Err(err) => println!("Solve failed: {err}"),
    }

    // Parse a puzzle from a compact string.
    println!("--- Parsing a puzzle from string ---\n");
    let puzzle_string =
        "530070000600195000098000060800060003400803001700020006060000280000419005000080079";
    let grid = Grid::from_string(puzzle_string).expect("well-formed puzzle string");
    println!("Parsed puzzle:");
    println!("{}", grid);

    if let Ok(solution) = solver.solve(&grid) {
        println!("Solution:");
        println!("{}", solution);
    }
}
