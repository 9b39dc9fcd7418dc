mod common;
mod compute;
mod verify;

use std::{path::PathBuf, time::Duration};

use clap::Parser;
use log::debug;
use simplelog::ColorChoice;

use checksum_validator::checksum::{ChecksumMethod, ChecksumOptions, DEFAULT_CHUNK_SIZE};
use common::GlobalFlags;

#[derive(Debug, clap::Parser)]
#[command(
    name = "checksum-validator",
    version,
    about = "Compute and verify file checksums with progress reporting"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
    #[command(flatten)]
    pub flags: GlobalFlags,
}

/// Options shared by every command that reads a file
#[derive(Debug, Clone, Copy, clap::Args)]
pub struct ReadArgs {
    /// Chunk size to use when reading the file
    #[arg(short, long, default_value_t = DEFAULT_CHUNK_SIZE)]
    pub chunk_size: usize,
    /// Delay in milliseconds before reading begins
    #[arg(long = "delay-ms", default_value_t = 0)]
    pub delay_ms: u64,
}

impl ReadArgs {
    pub fn to_checksum_options(self) -> ChecksumOptions {
        ChecksumOptions::default()
            .with_chunk_size(self.chunk_size)
            .with_startup_delay(Duration::from_millis(self.delay_ms))
    }
}

#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// Compute the checksum of a file
    Compute {
        /// Path to the file to checksum
        #[arg(value_parser = clap::value_parser!(PathBuf))]
        filepath: PathBuf,
        /// Method to use for checksum calculation
        #[arg(short, long, default_value = "md5")]
        method: ChecksumMethod,
        /// Print the result as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
        #[command(flatten)]
        read: ReadArgs,
    },

    /// Verify a file against an expected checksum
    Verify {
        /// Path to the file to verify
        #[arg(value_parser = clap::value_parser!(PathBuf))]
        filepath: PathBuf,
        /// Expected checksum, either '<method>;<digest>' or a bare digest
        expected: String,
        /// Method of a bare expected digest
        #[arg(short, long, default_value = "md5")]
        method: ChecksumMethod,
        #[command(flatten)]
        read: ReadArgs,
    },
}

fn init_logging(flags: &GlobalFlags) -> anyhow::Result<()> {
    if !flags.debug {
        return Ok(());
    }

    simplelog::CombinedLogger::init(vec![
        simplelog::TermLogger::new(
            simplelog::LevelFilter::Debug,
            simplelog::Config::default(),
            simplelog::TerminalMode::Mixed,
            if flags.no_color {
                ColorChoice::Never
            } else {
                ColorChoice::Auto
            },
        ),
        simplelog::WriteLogger::new(
            simplelog::LevelFilter::Debug,
            simplelog::Config::default(),
            std::fs::File::create(format!(
                "{}_checksum.log",
                chrono::Local::now().format("%Y%m%dT%H%M%S")
            ))?,
        ),
    ])?;

    Ok(())
}

pub async fn cli() -> anyhow::Result<()> {
    let args = Cli::parse();
    init_logging(&args.flags)?;

    if args.flags.no_color {
        colored::control::set_override(false);
    }

    debug!("{:?}", args);
    match args.command {
        Commands::Compute {
            filepath,
            method,
            json,
            read,
        } => {
            compute::compute(compute::ComputeOptions {
                filepath,
                method,
                json,
                checksum: read.to_checksum_options(),
                show_progress: args.flags.show_progress(),
                verbosity: args.flags.verbosity,
            })
            .await?;
        }
        Commands::Verify {
            filepath,
            expected,
            method,
            read,
        } => {
            verify::verify(verify::VerifyOptions {
                filepath,
                expected,
                method,
                checksum: read.to_checksum_options(),
                show_progress: args.flags.show_progress(),
                verbosity: args.flags.verbosity,
            })
            .await?;
        }
    }

    Ok(())
}
