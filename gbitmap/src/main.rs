use gbitmap::{bitmap_to_png, convert, describe};
use libgbitmap::Magic;
use std::path::{Path, PathBuf};
use tracing::{info, Level};

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};

#[cfg(not(debug_assertions))]
const DEFAULT_DEBUG_LEVEL: u8 = 1;
#[cfg(debug_assertions)]
const DEFAULT_DEBUG_LEVEL: u8 = 99;

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Turn debugging information on
    #[arg(short, long, default_value_t = DEFAULT_DEBUG_LEVEL, action = clap::ArgAction::Count)]
    verbosity: u8,

    /// Width of the white border kept around decoded bitmaps
    #[arg(short, long, global = true, default_value_t = 0)]
    border: u16,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// prints the format, size and gray levels of a bitmap
    Info {
        /// The bitmap file
        file: PathBuf,
    },

    /// re-encodes a bitmap in a different format
    Convert {
        /// The bitmap file
        file: PathBuf,

        /// The target format (P1, P2, P4, P5 or R4)
        #[arg(short, long)]
        to: Magic,

        /// The output file name
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// converts a bitmap to a grayscale PNG image
    Png {
        /// The bitmap file
        file: PathBuf,

        /// The output file name
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// `<dir>/<stem>.<suffix>` next to `input`
fn default_output(input: &Path, suffix: &str) -> Result<PathBuf> {
    let Some(dir) = input.parent() else {
        bail!("Invalid bitmap file");
    };
    let Some(Some(filename)) = input.file_stem().map(|os| os.to_str()) else {
        bail!("Invalid bitmap file");
    };
    let mut output = PathBuf::new();
    output.push(dir);
    output.push(format!("{filename}.{suffix}"));
    info!("output name: {}", output.display());
    Ok(output)
}

const fn suffix(magic: Magic) -> &'static str {
    match magic {
        Magic::P1 | Magic::P4 => "pbm",
        Magic::P2 | Magic::P5 => "pgm",
        Magic::R4 => "rle",
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let level = match cli.verbosity {
        0 => Level::ERROR,
        1 => Level::WARN,
        2 => Level::INFO,
        3 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_file(true)
        .with_line_number(true)
        .init();

    match cli.command {
        Commands::Info { file } => {
            println!("{}", describe(&file, cli.border)?);
        }
        Commands::Convert { file, to, output } => {
            let output = match output {
                Some(o) => o,
                None => default_output(&file, suffix(to))?,
            };
            convert(&file, &output, to, cli.border)?;
        }
        Commands::Png { file, output } => {
            let output = match output {
                Some(o) => o,
                None => default_output(&file, "png")?,
            };
            bitmap_to_png(&file, &output, cli.border)?;
        }
    }
    Ok(())
}
