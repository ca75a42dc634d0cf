use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use paradox::{Codec, Modulus};
use tracing::{debug, error};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(name = "paradox")]
#[command(about = "Paradoxical compression codec", long_about = None)]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compress a file
    Compress {
        /// Input file
        input: PathBuf,
        /// Output file
        output: PathBuf,
    },
    /// Decompress a file
    Decompress {
        /// Input file
        input: PathBuf,
        /// Output file
        output: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return if err.use_stderr() {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            };
        }
    };
    init_tracing(cli.verbose);
    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::from(2)
        }
    }
}

fn run(command: Commands) -> Result<(), Box<dyn std::error::Error>> {
    let codec = Codec::new(Modulus::default_2048());
    match command {
        Commands::Compress { input, output } => {
            let data = fs::read(&input)?;
            let result = codec.compress(&data);
            debug!(
                input = data.len(),
                output = result.len(),
                "compression finished"
            );
            fs::write(&output, result)?;
        }
        Commands::Decompress { input, output } => {
            let data = fs::read(&input)?;
            let result = codec.decompress(&data)?;
            debug!(
                input = data.len(),
                output = result.len(),
                "decompression finished"
            );
            fs::write(&output, result)?;
        }
    }
    Ok(())
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default)),
        )
        .init();
}
