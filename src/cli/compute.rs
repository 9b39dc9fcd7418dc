use std::{io, path::PathBuf};

use log::{debug, info};

use super::common::{
    display::ProgressDisplay,
    task::{run_blocking, TaskError},
};
use checksum_validator::checksum::{self, Checksum, ChecksumMethod, ChecksumOptions};
use checksum_validator::error::CallbackError;

#[derive(Debug)]
/// Options for the compute command
pub struct ComputeOptions {
    /// Path to the file to checksum
    pub filepath: PathBuf,
    /// Checksum method to use
    pub method: ChecksumMethod,
    /// Print a JSON report instead of a digest line
    pub json: bool,
    /// Library options for reading the file
    pub checksum: ChecksumOptions,
    /// Show progress output
    pub show_progress: bool,
    /// Verbosity level for output
    pub verbosity: u8,
}

#[derive(Debug, thiserror::Error)]
pub enum ComputeError {
    #[error("{0}")]
    TaskError(#[from] TaskError),

    #[error("Serialization Error: {0}")]
    SerializeError(#[from] serde_json::Error),
}

pub type ComputeResult<T> = Result<T, ComputeError>;

#[derive(Debug, serde::Serialize)]
pub struct ComputeReport {
    pub path: String,
    pub method: ChecksumMethod,
    pub digest: String,
}

impl ComputeReport {
    pub fn checksum(&self) -> Checksum {
        Checksum {
            method: self.method,
            digest: self.digest.clone(),
        }
    }
}

/// Computes a checksum on a blocking worker, drawing progress on stderr.
pub async fn compute_report(
    filepath: PathBuf,
    method: ChecksumMethod,
    options: ChecksumOptions,
    show_progress: bool,
) -> Result<ComputeReport, TaskError> {
    let path = filepath.to_string_lossy().to_string();
    let label = path.clone();

    let digest = run_blocking(move |cancel| {
        let options = options.with_cancel(cancel);
        let mut display = ProgressDisplay::new(io::stderr(), label).with_disabled(!show_progress);

        let result = {
            let mut on_progress = |fraction: f64| -> Result<(), CallbackError> { display.update(fraction) };
            checksum::compute_with_options(&filepath, method, &options, Some(&mut on_progress))
        };

        match result {
            Ok(digest) => {
                display.complete()?;
                Ok(digest)
            }
            Err(error) => {
                display.clear()?;
                Err(error)
            }
        }
    })
    .await?;

    Ok(ComputeReport {
        path,
        method,
        digest,
    })
}

pub async fn compute(options: ComputeOptions) -> ComputeResult<()> {
    debug!("{:?}", options);
    let report = compute_report(
        options.filepath,
        options.method,
        options.checksum,
        options.show_progress,
    )
    .await?;

    info!("{:?}", report);
    if options.json {
        println!("{}", serde_json::to_string(&report)?);
    } else if options.verbosity > 0 {
        println!("{}  {}", report.checksum(), report.path);
    } else {
        println!("{}  {}", report.digest, report.path);
    }

    Ok(())
}
