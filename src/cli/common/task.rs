use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use log::warn;

use checksum_validator::ChecksumError;

#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    #[error("Failed to join checksum task, {0}")]
    TaskJoinFailure(#[from] tokio::task::JoinError),

    #[error(transparent)]
    Checksum(#[from] ChecksumError),
}

/// Runs a blocking checksum job off the async runtime.
///
/// The job receives a cancel flag which is raised on Ctrl-C; the job is still
/// awaited afterwards so its source is released before returning.
pub async fn run_blocking<T, F>(job: F) -> Result<T, TaskError>
where
    T: Send + 'static,
    F: FnOnce(Arc<AtomicBool>) -> Result<T, ChecksumError> + Send + 'static,
{
    let cancel = Arc::new(AtomicBool::new(false));
    let mut handle = tokio::task::spawn_blocking({
        let cancel = cancel.clone();
        move || job(cancel)
    });

    let result = tokio::select! {
        result = &mut handle => result?,
        Ok(()) = tokio::signal::ctrl_c() => {
            warn!("Interrupted, cancelling checksum computation");
            cancel.store(true, Ordering::Relaxed);
            handle.await?
        }
    };

    Ok(result?)
}
