use beans_core::{is_solution, validate_placement, Generator, Position, Puzzle, Solver};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "beans", version, about = "Generate and check beans placement puzzles")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate one or more puzzles
    Generate {
        /// Board side length
        #[arg(long, default_value_t = 8)]
        size: usize,
        /// Number of puzzles to generate
        #[arg(long, default_value_t = 1)]
        count: usize,
        /// Seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,
        /// Emit puzzles as JSON, one per line
        #[arg(long)]
        json: bool,
        /// Mark the hidden solution cells in the board printout
        #[arg(long)]
        reveal: bool,
    },
    /// Validate a placement against a stored puzzle
    Check {
        /// Puzzle JSON file, as written by `generate --json`
        #[arg(long)]
        puzzle: PathBuf,
        /// Bean positions as row,col pairs, e.g. `0,3 2,0 5,6`
        #[arg(required = true)]
        positions: Vec<String>,
    },
    /// Recover the unique solution of a stored puzzle
    Solve {
        /// Puzzle JSON file, as written by `generate --json`
        #[arg(long)]
        puzzle: PathBuf,
    },
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode, Box<dyn std::error::Error>> {
    match cli.command {
        Command::Generate {
            size,
            count,
            seed,
            json,
            reveal,
        } => {
            let mut generator = match seed {
                Some(seed) => Generator::with_seed(seed),
                None => Generator::new(),
            };

            for i in 0..count {
                let puzzle = generator.generate(size)?;
                if puzzle.is_degraded() {
                    eprintln!("warning: puzzle {} accepted without a uniqueness proof", i + 1);
                }
                if json {
                    println!("{}", serde_json::to_string(&puzzle)?);
                } else {
                    if count > 1 {
                        println!("# puzzle {}", i + 1);
                    }
                    if reveal {
                        print!("{}", puzzle.regions().to_text(puzzle.solution()));
                    } else {
                        print!("{}", puzzle);
                    }
                    if i + 1 < count {
                        println!();
                    }
                }
            }
            Ok(ExitCode::SUCCESS)
        }

        Command::Check { puzzle, positions } => {
            let puzzle = load_puzzle(&puzzle)?;
            let placement = parse_positions(&positions, puzzle.size())?;
            let report = validate_placement(&placement, puzzle.regions());

            if report.is_valid {
                if is_solution(&placement, puzzle.regions()) {
                    println!("solved");
                } else {
                    println!(
                        "valid so far ({} of {} beans placed)",
                        placement.len(),
                        puzzle.size()
                    );
                }
                Ok(ExitCode::SUCCESS)
            } else {
                for violation in &report.violations {
                    println!("{}", violation);
                }
                Ok(ExitCode::FAILURE)
            }
        }

        Command::Solve { puzzle } => {
            let puzzle = load_puzzle(&puzzle)?;
            let solver = Solver::new();
            match solver.solve(puzzle.regions()) {
                Some(solution) => {
                    for pos in solution {
                        println!("{},{}", pos.row, pos.col);
                    }
                    Ok(ExitCode::SUCCESS)
                }
                None => {
                    eprintln!("puzzle has no solution");
                    Ok(ExitCode::FAILURE)
                }
            }
        }
    }
}

fn load_puzzle(path: &Path) -> Result<Puzzle, Box<dyn std::error::Error>> {
    let json = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}

/// Parse `row,col` pairs, rejecting anything off the board.
fn parse_positions(args: &[String], size: usize) -> Result<Vec<Position>, String> {
    args.iter()
        .map(|arg| {
            let (row, col) = arg
                .split_once(',')
                .ok_or_else(|| format!("expected row,col but got `{}`", arg))?;
            let row: usize = row
                .trim()
                .parse()
                .map_err(|_| format!("bad row in `{}`", arg))?;
            let col: usize = col
                .trim()
                .parse()
                .map_err(|_| format!("bad column in `{}`", arg))?;
            if row >= size || col >= size {
                return Err(format!(
                    "position {},{} is off the {}x{} board",
                    row, col, size, size
                ));
            }
            Ok(Position::new(row, col))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_positions() {
        let args: Vec<String> = vec!["0,3".into(), " 2 , 0 ".into()];
        let parsed = parse_positions(&args, 8).unwrap();
        assert_eq!(parsed, vec![Position::new(0, 3), Position::new(2, 0)]);
    }

    #[test]
    fn test_parse_positions_rejects_garbage() {
        assert!(parse_positions(&["7".into()], 8).is_err());
        assert!(parse_positions(&["a,b".into()], 8).is_err());
        assert!(parse_positions(&["8,0".into()], 8).is_err());
    }
}
