//! Basic example of using the beans engine

use beans_core::{validate_placement, Generator, Solver};

fn main() {
    // Generate a puzzle
    println!("Generating an 8x8 puzzle...\n");
    let mut generator = Generator::new();
    let puzzle = generator.generate(8).expect("8 is a supported size");

    println!("Regions (one letter per region):");
    println!("{}", puzzle);

    println!("Same board with the hidden solution uppercased:");
    println!("{}", puzzle.regions().to_text(puzzle.solution()));

    // Prove uniqueness independently of the generator
    let solver = Solver::new();
    let solutions = solver.count_solutions(puzzle.regions(), 2);
    println!("Number of solutions (up to 2): {}", solutions);

    // The stored solution validates against its own region map
    let report = validate_placement(puzzle.solution(), puzzle.regions());
    println!("Stored solution is valid: {}", report.is_valid);

    // Recover the solution from the region map alone
    if let Some(found) = solver.solve(puzzle.regions()) {
        let cells: Vec<(usize, usize)> = found.iter().map(|p| (p.row, p.col)).collect();
        println!("Recovered solution: {:?}", cells);
    }
}
