//! Pocket Cube Solver
//!
//! Solves any 2x2x2 cube optimally (in the half-turn metric) by looking its
//! state up in a precomputed table of every reachable configuration. The
//! table is built on first use and cached on disk.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use env_logger::TimestampPrecision;
use log::LevelFilter;

use pocket::coords::MoveTables;
use pocket::facelets::translate;
use pocket::{
    apply_sequence_to_solved, format_sequence, invert, parse_sequence, random_cube, SolveError,
    Solver,
};

/// Solves 2x2x2 cubes from a precomputed table of optimal solutions.
#[derive(Parser)]
#[command(name = "pocket")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Table file to load, or to create when missing.
    #[arg(long, short = 't', default_value = "pocket.table", value_name = "PATH")]
    table: PathBuf,

    /// Increase logging verbosity (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build the table and save it.
    Build {
        /// Rebuild even if a valid table already exists.
        #[arg(long)]
        force: bool,
    },
    /// Print the moves solving a cube string, e.g. "RYWOGBOROYWBBYOWYBGRRGGW".
    Solve { cube: String },
    /// Print the cube string reached by a move sequence, e.g. "R1 U2 F3".
    Scramble { moves: String },
    /// Print the inverse of a move sequence.
    Invert { moves: String },
    /// Print a random cube and its solution.
    Random {
        /// Seed for reproducible output.
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Show how many states need each number of moves.
    Stats,
    /// Verify the coordinate tables and a sample of random solves.
    SelfTest {
        /// Number of random cubes to round-trip.
        #[arg(long, default_value_t = 1000)]
        samples: usize,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(match cli.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        })
        .format_timestamp(Some(TimestampPrecision::Millis))
        .parse_default_env()
        .init();

    let result = match cli.command {
        Command::Build { force } => run_build(&cli.table, force),
        Command::Solve { cube } => run_solve(&cli.table, &cube),
        Command::Scramble { moves } => run_scramble(&moves),
        Command::Invert { moves } => run_invert(&moves),
        Command::Random { seed } => run_random(&cli.table, seed),
        Command::Stats => run_stats(&cli.table),
        Command::SelfTest { samples } => run_self_test(&cli.table, samples),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Builds the table, or reuses a valid one unless forced.
fn run_build(table: &Path, force: bool) -> Result<(), SolveError> {
    if force {
        Solver::build().save(table)?;
    } else {
        Solver::build_or_load(table)?;
    }
    println!("Table ready at {}", table.display());
    Ok(())
}

fn run_solve(table: &Path, cube: &str) -> Result<(), SolveError> {
    let solver = Solver::build_or_load(table)?;
    println!("{}", format_sequence(&solver.solve(cube)?));
    Ok(())
}

fn run_scramble(moves: &str) -> Result<(), SolveError> {
    println!("{}", apply_sequence_to_solved(&parse_sequence(moves)?));
    Ok(())
}

fn run_invert(moves: &str) -> Result<(), SolveError> {
    println!("{}", format_sequence(&invert(&parse_sequence(moves)?)));
    Ok(())
}

fn run_random(table: &Path, seed: Option<u64>) -> Result<(), SolveError> {
    let solver = Solver::build_or_load(table)?;
    let mut rng = match seed {
        Some(seed) => fastrand::Rng::with_seed(seed),
        None => fastrand::Rng::new(),
    };
    let cube = random_cube(&mut rng);
    println!("{cube}");
    println!("{}", format_sequence(&solver.solve(&cube)?));
    Ok(())
}

fn run_stats(table: &Path) -> Result<(), SolveError> {
    let solver = Solver::build_or_load(table)?;
    println!("{}", solver.store().depth_report());
    Ok(())
}

/// Checks the coordinate invariants, then that solving random cubes and
/// replaying the inverted solutions gives the same cubes back.
fn run_self_test(table: &Path, samples: usize) -> Result<(), SolveError> {
    if let Err(defect) = MoveTables::new().self_test() {
        eprintln!("Coordinate self-test failed: {defect}");
        std::process::exit(2);
    }
    println!("Coordinate tables OK");

    let solver = Solver::build_or_load(table)?;
    let mut rng = fastrand::Rng::with_seed(samples as u64);
    let mut failures = 0;
    for _ in 0..samples {
        let cube = random_cube(&mut rng);
        let solution = solver.solve(&cube)?;
        let replayed = apply_sequence_to_solved(&invert(&solution));
        if translate(&replayed)? != translate(&cube)? {
            eprintln!("Round trip failed for {cube}: {}", format_sequence(&solution));
            failures += 1;
        }
    }
    println!("{} of {} round trips OK", samples - failures, samples);

    if failures > 0 {
        std::process::exit(1);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_solve_command() {
        let cli = Cli::try_parse_from(["pocket", "-vv", "solve", "UUUURRRRFFFFDDDDLLLLBBBB"])
            .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.table, PathBuf::from("pocket.table"));
        assert!(matches!(cli.command, Command::Solve { cube } if cube.len() == 24));
    }

    #[test]
    fn test_parse_build_force() {
        let cli = Cli::try_parse_from(["pocket", "--table", "/tmp/x.table", "build", "--force"])
            .unwrap();
        assert_eq!(cli.table, PathBuf::from("/tmp/x.table"));
        assert!(matches!(cli.command, Command::Build { force: true }));
    }
}
