use std::{fmt::Display, path::PathBuf};

use colored::Colorize;
use log::{debug, warn};

use super::{
    common::task::TaskError,
    compute::{compute_report, ComputeReport},
};
use checksum_validator::{
    checksum::{Checksum, ChecksumMethod, ChecksumOptions},
    error::ChecksumError,
};

#[derive(Debug)]
/// Options for the verify command
pub struct VerifyOptions {
    /// Path to the file to verify
    pub filepath: PathBuf,
    /// Expected checksum as given on the command line
    pub expected: String,
    /// Method assumed for a bare expected digest
    pub method: ChecksumMethod,
    /// Library options for reading the file
    pub checksum: ChecksumOptions,
    /// Show progress output
    pub show_progress: bool,
    /// Verbosity level
    pub verbosity: u8,
}

#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    #[error("Checksum Error: {0}")]
    ChecksumError(#[from] ChecksumError),

    #[error("{0}")]
    TaskError(#[from] TaskError),
}

pub type VerifyResult<T> = Result<T, VerifyError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyStatus {
    Valid,
    Invalid,
}

impl Display for VerifyStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VerifyStatus::Valid => write!(f, "{}", "OK".green()),
            VerifyStatus::Invalid => write!(f, "{}", "FAILED".bold().red()),
        }
    }
}

#[derive(Debug)]
pub struct VerifyOutcome {
    pub status: VerifyStatus,
    pub expected: Checksum,
    pub actual: Checksum,
    pub path: String,
}

impl VerifyOutcome {
    pub fn new(expected: Checksum, report: ComputeReport) -> Self {
        let actual = report.checksum();
        let status = if expected.matches(&actual) {
            VerifyStatus::Valid
        } else {
            VerifyStatus::Invalid
        };

        Self {
            status,
            expected,
            actual,
            path: report.path,
        }
    }

    pub fn describe(&self, verbosity: u8) -> String {
        let mut message = format!("{}: {}", self.path, self.status);
        if verbosity > 0 || self.status == VerifyStatus::Invalid {
            message.push_str(
                &format!(" (expected {}, actual {})", self.expected, self.actual)
                    .dimmed()
                    .to_string(),
            );
        }
        message
    }
}

pub async fn verify(options: VerifyOptions) -> VerifyResult<()> {
    debug!("{:?}", options);
    let expected = Checksum::parse_with_default(&options.expected, options.method)?;

    let report = compute_report(
        options.filepath,
        expected.method,
        options.checksum,
        options.show_progress,
    )
    .await?;

    let outcome = VerifyOutcome::new(expected, report);
    println!("{}", outcome.describe(options.verbosity));

    if outcome.status == VerifyStatus::Invalid {
        warn!("Checksum mismatch for {}", outcome.path);
        std::process::exit(1);
    }

    Ok(())
}
