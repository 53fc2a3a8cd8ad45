#![deny(unsafe_code)]
//! CLI binary for the grade-engine LUT grading pipeline.
//!
//! Subcommands:
//! - `lut <name>` -- build a registered LUT variant, write it as `.cube`
//! - `list` -- print available LUT variants

mod error;
mod export;

use clap::{Parser, Subcommand};
use error::CliError;
use grade_engine_core::{Lut3d, DEFAULT_LUT_SIZE};
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "grade-engine", about = "LUT color-grading pipeline CLI")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build a LUT variant and write it in Adobe .cube format.
    Lut {
        /// LUT name (identity, inverted, grayscale, posterize).
        name: String,

        /// Cubic side length of the LUT.
        #[arg(short, long, default_value_t = DEFAULT_LUT_SIZE)]
        size: usize,

        /// Output file path.
        #[arg(short, long, default_value = "output.cube")]
        output: PathBuf,
    },
    /// List available LUT variants.
    List,
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::List => {
            let luts = Lut3d::list_names();
            if cli.json {
                let info = serde_json::json!({ "luts": luts });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("LUTs:");
                for name in luts {
                    println!("  {name}");
                }
            }
        }
        Command::Lut { name, size, output } => {
            let lut = Lut3d::from_name(&name, size)?;

            export::write_cube(&lut, &name, &output)?;

            if cli.json {
                let info = serde_json::json!({
                    "lut": name,
                    "size": size,
                    "texels": size * size * size,
                    "output": output.display().to_string(),
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                eprintln!(
                    "wrote {name} LUT ({size}x{size}x{size}) -> {}",
                    output.display()
                );
            }
        }
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            let j = serde_json::json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}
