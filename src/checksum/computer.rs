use std::{
    fs::File,
    io::Read,
    path::Path,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread,
    time::Duration,
};

use log::{debug, info};

use super::{Checksum, ChecksumMethod, HashEngine, ProgressCallback, ProgressTrackingReader, DEFAULT_THRESHOLD};
use crate::error::ChecksumError;

/// The default chunk size used to read files.
pub const DEFAULT_CHUNK_SIZE: usize = 8192;

#[derive(Debug, Clone)]
pub struct ChecksumOptions {
    /// Size of the buffer handed to each read.
    pub chunk_size: usize,

    /// Bytes per progress notification unit.
    pub threshold: u64,

    /// Pause before any file I/O begins.
    pub startup_delay: Duration,

    /// Checked between chunk reads; once set the computation stops with `Cancelled`.
    pub cancel: Option<Arc<AtomicBool>>,
}

impl Default for ChecksumOptions {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            threshold: DEFAULT_THRESHOLD,
            startup_delay: Duration::ZERO,
            cancel: None,
        }
    }
}

impl ChecksumOptions {
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn with_threshold(mut self, threshold: u64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_startup_delay(mut self, startup_delay: Duration) -> Self {
        self.startup_delay = startup_delay;
        self
    }

    pub fn with_cancel(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = Some(cancel);
        self
    }

    fn validate(&self) -> Result<(), ChecksumError> {
        if self.chunk_size == 0 {
            return Err(ChecksumError::InvalidOptions(String::from(
                "chunk size must be greater than 0",
            )));
        }
        if self.threshold == 0 {
            return Err(ChecksumError::InvalidOptions(String::from(
                "progress threshold must be greater than 0",
            )));
        }

        Ok(())
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|cancel| cancel.load(Ordering::Relaxed))
    }
}

/// Computes the uppercase hex checksum of the file at `path` with default options.
pub fn compute(
    path: &Path,
    method: ChecksumMethod,
    progress: Option<ProgressCallback<'_>>,
) -> Result<String, ChecksumError> {
    compute_with_options(path, method, &ChecksumOptions::default(), progress)
}

/// Resolves `method` by name before touching the file, then computes its checksum.
pub fn compute_named(
    path: &Path,
    method: &str,
    options: &ChecksumOptions,
    progress: Option<ProgressCallback<'_>>,
) -> Result<String, ChecksumError> {
    let method = ChecksumMethod::parse(method)?;
    compute_with_options(path, method, options, progress)
}

pub fn compute_with_options(
    path: &Path,
    method: ChecksumMethod,
    options: &ChecksumOptions,
    progress: Option<ProgressCallback<'_>>,
) -> Result<String, ChecksumError> {
    options.validate()?;
    let engine = method.engine();

    if !options.startup_delay.is_zero() {
        thread::sleep(options.startup_delay);
    }

    let file = File::open(path).map_err(|e| ChecksumError::from_open(path, e))?;
    let total_len = file.metadata()?.len();
    info!("Computing {} of {:?} ({} bytes)", method, path, total_len);

    let reader = ProgressTrackingReader::new(file, total_len, options.threshold, progress);
    digest(reader, engine, options)
}

/// Computes the checksum of an already opened source of known length.
pub fn compute_reader<R: Read>(
    source: R,
    total_len: u64,
    method: ChecksumMethod,
    options: &ChecksumOptions,
    progress: Option<ProgressCallback<'_>>,
) -> Result<String, ChecksumError> {
    options.validate()?;
    let engine = method.engine();
    let reader = ProgressTrackingReader::new(source, total_len, options.threshold, progress);
    digest(reader, engine, options)
}

/// Computes the checksum of `path` with the method of `expected` and compares digests.
pub fn verify(
    path: &Path,
    expected: &Checksum,
    options: &ChecksumOptions,
    progress: Option<ProgressCallback<'_>>,
) -> Result<bool, ChecksumError> {
    let digest = compute_with_options(path, expected.method, options, progress)?;
    let valid = digest.eq_ignore_ascii_case(&expected.digest);
    debug!("Expected {} got {} ({})", expected.digest, digest, valid);
    Ok(valid)
}

// The reader is dropped on every early return, which releases the source.
fn digest<R: Read>(
    mut reader: ProgressTrackingReader<'_, R>,
    mut engine: Box<dyn HashEngine>,
    options: &ChecksumOptions,
) -> Result<String, ChecksumError> {
    let mut buffer = vec![0; options.chunk_size];

    loop {
        if options.is_cancelled() {
            debug!("Cancelled after {} bytes", reader.bytes_read());
            return Err(ChecksumError::Cancelled);
        }

        let bytes_read = reader.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }

        engine.feed(&buffer[..bytes_read]);
    }

    reader.release();
    let digest = hex::encode_upper(engine.finish());
    debug!("Digest {}", digest);
    Ok(digest)
}
