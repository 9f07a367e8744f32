//! pti: inspect, edit and convert Polyend Tracker instruments
//!
//! Reads .pti instruments or any audio Symphonia can decode, and writes
//! .pti instruments or .wav files.

mod commands;
mod config;
mod edit;
mod import;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use commands::OutputFormat;
use config::Config;
use edit::EditArgs;

#[derive(Parser)]
#[command(name = "pti")]
#[command(about = "Polyend Tracker instrument tool")]
#[command(version)]
struct Cli {
    /// Default directory for written files (next to the input if not set)
    #[arg(long, global = true)]
    out_dir: Option<PathBuf>,

    /// Overwrite existing files
    #[arg(short, long, global = true)]
    force: bool,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the instrument data table
    Info {
        file: PathBuf,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Check .pti headers; exits with status 1 if any is invalid
    Validate {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Convert a .pti or audio file, optionally editing the header
    Convert {
        input: PathBuf,

        #[arg(short, long)]
        output: Option<PathBuf>,

        #[arg(long, value_enum, default_value = "pti")]
        format: OutputFormat,

        #[command(flatten)]
        edits: EditArgs,
    },

    /// Convert every audio file in a directory to .pti
    Batch {
        dir: PathBuf,

        /// Output directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        edits: EditArgs,
    },

    /// Render a preview of an instrument to .wav
    Render {
        file: PathBuf,

        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Render a single slice (0-based)
        #[arg(long)]
        slice: Option<usize>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = Config {
        verbose: cli.verbose,
        output_dir: cli.out_dir,
        overwrite: cli.force,
    };

    // Setup logging, stdout is reserved for command output
    let level = if config.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Info { file, json } => commands::info(&file, json)?,
        Commands::Validate { files } => {
            if !commands::validate(&files)? {
                std::process::exit(1);
            }
        }
        Commands::Convert {
            input,
            output,
            format,
            edits,
        } => {
            commands::convert(&config, &input, output.as_deref(), format, &edits)?;
        }
        Commands::Batch { dir, output, edits } => {
            let count = commands::batch(&config, &dir, output.as_deref(), &edits)?;
            if count == 0 {
                info!("No audio files found in {:?}", dir);
            }
        }
        Commands::Render {
            file,
            output,
            slice,
        } => {
            commands::render(&config, &file, output.as_deref(), slice)?;
        }
    }

    Ok(())
}
