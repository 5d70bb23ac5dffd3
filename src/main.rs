//! Gear grid entry point
//!
//! Headless driver for the simulation: generates the bundled demo scenario
//! files, or loads a saved grid and runs it for a number of ticks, reporting
//! how many gears turned each tick.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use rand::SeedableRng;
use rand_pcg::Pcg32;

use gear_grid::{persistence, scenarios, sim};

const USAGE: &str = "usage:
  gear-grid generate [DIR]                  write wire.json and or_gate.json
  gear-grid run FILE [TICKS]                load a grid and run TICKS ticks (default 10)
  gear-grid random ROWS COLS LAYERS SEED OUT  write a seeded random grid";

fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let result = match args.first().map(String::as_str) {
        Some("generate") => generate(args.get(1).map(Path::new)),
        Some("run") => match args.get(1) {
            Some(file) => run(Path::new(file), parse_or(args.get(2), 10)),
            None => usage(),
        },
        Some("random") => match &args[1..] {
            [rows, cols, layers, seed, out] => random(rows, cols, layers, seed, Path::new(out)),
            _ => usage(),
        },
        _ => usage(),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn usage() -> Result<(), Box<dyn std::error::Error>> {
    Err(USAGE.into())
}

fn parse_or(arg: Option<&String>, default: u64) -> u64 {
    arg.and_then(|s| s.parse().ok()).unwrap_or(default)
}

/// Write the bundled demo scenarios next to the binary (or into DIR).
fn generate(dir: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let dir = dir.unwrap_or(Path::new("."));
    let demos: [(&str, sim::Grid); 2] =
        [("wire.json", scenarios::wire()?), ("or_gate.json", scenarios::or_gate()?)];
    for (name, grid) in demos {
        let path: PathBuf = dir.join(name);
        persistence::save_to_file(&grid, &path)?;
        println!("wrote {}", path.display());
    }
    Ok(())
}

/// Load a grid and advance it, one tooth slot per tick.
fn run(file: &Path, ticks: u64) -> Result<(), Box<dyn std::error::Error>> {
    let mut grid = persistence::load_from_file(file)?;
    println!(
        "{}x{} grid, {} layers, {} teeth, {} drivers",
        grid.rows(),
        grid.cols(),
        grid.num_layers(),
        grid.num_teeth(),
        scenarios::driver_count(&grid)
    );

    // Keep a pristine copy so the final state can be compared against it.
    let initial = grid.clone();

    for t in 1..=ticks {
        let rotated = sim::tick::tick(&mut grid, 1);
        println!("tick {t}: {rotated} gears rotated");
    }

    if grid == initial {
        println!("grid returned to its initial configuration");
    }
    Ok(())
}

fn random(
    rows: &str,
    cols: &str,
    layers: &str,
    seed: &str,
    out: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut rng = Pcg32::seed_from_u64(seed.parse()?);
    let grid = scenarios::random_grid(rows.parse()?, cols.parse()?, layers.parse()?, &mut rng)?;
    persistence::save_to_file(&grid, out)?;
    println!("wrote {}", out.display());
    Ok(())
}
