use std::io::{self, Read};

use log::debug;

use crate::error::{CallbackError, ChecksumError};

/// Bytes per progress unit (1 MiB).
pub const DEFAULT_THRESHOLD: u64 = 2 << 19;

/// Receives the approximate completed fraction, always within [0, 1].
pub type ProgressCallback<'a> = &'a mut dyn FnMut(f64) -> Result<(), CallbackError>;

/// A read-through wrapper that counts the bytes passing through it.
///
/// Every time the cumulative count crosses into a new threshold unit the
/// callback receives `bytes_read / total_len`. Notifications are throttled to
/// one per unit, so a source shorter than one unit never notifies, and the last
/// reported fraction only reaches 1.0 when the length is a multiple of the
/// threshold.
///
/// The wrapper owns its source. Releasing it, explicitly or by dropping the
/// wrapper, drops the source exactly once.
pub struct ProgressTrackingReader<'a, R: Read> {
    source: Option<R>,
    callback: Option<ProgressCallback<'a>>,
    total_len: u64,
    threshold: u64,
    bytes_read: u64,
    last_unit: u64,
}

impl<'a, R: Read> ProgressTrackingReader<'a, R> {
    pub fn new(
        source: R,
        total_len: u64,
        threshold: u64,
        callback: Option<ProgressCallback<'a>>,
    ) -> Self {
        Self {
            source: Some(source),
            callback,
            total_len,
            threshold: threshold.max(1),
            bytes_read: 0,
            last_unit: 0,
        }
    }

    /// Reads into `buffer` from the wrapped source, returning 0 only at end-of-source.
    pub fn read(&mut self, buffer: &mut [u8]) -> Result<usize, ChecksumError> {
        let source = self.source.as_mut().ok_or_else(|| {
            ChecksumError::UnsupportedOperation(String::from("read after release"))
        })?;

        let count = loop {
            match source.read(buffer) {
                Ok(count) => break count,
                Err(error) if error.kind() == io::ErrorKind::Interrupted => continue,
                Err(error) => return Err(ChecksumError::from_read(error)),
            }
        };

        self.bytes_read += count as u64;
        self.notify()?;
        Ok(count)
    }

    fn notify(&mut self) -> Result<(), ChecksumError> {
        let Some(callback) = self.callback.as_deref_mut() else {
            return Ok(());
        };

        let unit = self.bytes_read / self.threshold;
        if unit <= self.last_unit {
            return Ok(());
        }

        self.last_unit = unit;
        let fraction = progress_fraction(self.bytes_read, self.total_len);
        debug!(
            "Progress {:.4} ({} of {} bytes)",
            fraction, self.bytes_read, self.total_len
        );
        callback(fraction).map_err(ChecksumError::CallbackFailure)
    }

    /// Drops the wrapped source. Releasing twice is a no-op.
    pub fn release(&mut self) {
        if let Some(source) = self.source.take() {
            drop(source);
        }
    }

    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    pub fn total_len(&self) -> u64 {
        self.total_len
    }

    pub fn is_released(&self) -> bool {
        self.source.is_none()
    }
}

impl<R: Read> Drop for ProgressTrackingReader<'_, R> {
    fn drop(&mut self) {
        self.release();
    }
}

// A source that grew after its length was taken would otherwise report past 1.0.
fn progress_fraction(bytes_read: u64, total_len: u64) -> f64 {
    if total_len == 0 {
        return 1.0;
    }

    (bytes_read as f64 / total_len as f64).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{cell::Cell, io::Cursor, rc::Rc};

    const THRESHOLD: u64 = 16;

    /// Cursor that counts how many times it has been dropped.
    struct CountedSource {
        inner: Cursor<Vec<u8>>,
        releases: Rc<Cell<usize>>,
    }

    impl CountedSource {
        fn new(len: usize) -> (Self, Rc<Cell<usize>>) {
            let releases = Rc::new(Cell::new(0));
            let source = Self {
                inner: Cursor::new(vec![0; len]),
                releases: releases.clone(),
            };
            (source, releases)
        }
    }

    impl Read for CountedSource {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.inner.read(buf)
        }
    }

    impl Drop for CountedSource {
        fn drop(&mut self) {
            self.releases.set(self.releases.get() + 1);
        }
    }

    /// Returns `Interrupted` once before every successful read.
    struct InterruptingSource {
        inner: Cursor<Vec<u8>>,
        interrupt: bool,
    }

    impl Read for InterruptingSource {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.interrupt = !self.interrupt;
            if self.interrupt {
                return Err(io::Error::new(io::ErrorKind::Interrupted, "signal"));
            }
            self.inner.read(buf)
        }
    }

    fn drain<R: Read>(reader: &mut ProgressTrackingReader<'_, R>, chunk_size: usize) -> u64 {
        let mut buffer = vec![0; chunk_size];
        let mut total = 0;
        loop {
            let count = reader.read(&mut buffer).unwrap();
            if count == 0 {
                return total;
            }
            total += count as u64;
        }
    }

    #[test]
    fn test_passes_all_bytes_through() {
        let data: Vec<u8> = (0..=255).collect();
        let mut reader = ProgressTrackingReader::new(Cursor::new(data.clone()), 256, THRESHOLD, None);

        let mut buffer = vec![0; 100];
        let mut seen = Vec::new();
        loop {
            let count = reader.read(&mut buffer).unwrap();
            if count == 0 {
                break;
            }
            seen.extend_from_slice(&buffer[..count]);
        }

        assert_eq!(seen, data);
        assert_eq!(reader.bytes_read(), 256);
    }

    #[test]
    fn test_notifies_once_per_unit() {
        let mut fractions = Vec::new();
        let mut on_progress = |fraction: f64| -> Result<(), CallbackError> {
            fractions.push(fraction);
            Ok(())
        };

        let mut reader =
            ProgressTrackingReader::new(Cursor::new(vec![0; 64]), 64, THRESHOLD, Some(&mut on_progress));
        drain(&mut reader, 4);
        drop(reader);

        assert_eq!(fractions, vec![0.25, 0.5, 0.75, 1.0]);
    }

    #[test]
    fn test_large_read_crossing_several_units_notifies_once() {
        let mut fractions = Vec::new();
        let mut on_progress = |fraction: f64| -> Result<(), CallbackError> {
            fractions.push(fraction);
            Ok(())
        };

        let mut reader =
            ProgressTrackingReader::new(Cursor::new(vec![0; 64]), 64, THRESHOLD, Some(&mut on_progress));
        drain(&mut reader, 64);
        drop(reader);

        assert_eq!(fractions, vec![1.0]);
    }

    #[test]
    fn test_final_fraction_below_one_when_not_multiple_of_threshold() {
        let mut fractions = Vec::new();
        let mut on_progress = |fraction: f64| -> Result<(), CallbackError> {
            fractions.push(fraction);
            Ok(())
        };

        let mut reader =
            ProgressTrackingReader::new(Cursor::new(vec![0; 40]), 40, THRESHOLD, Some(&mut on_progress));
        drain(&mut reader, 8);
        drop(reader);

        assert_eq!(fractions, vec![16.0 / 40.0, 32.0 / 40.0]);
    }

    #[test]
    fn test_smaller_than_one_unit_never_notifies() {
        let mut calls = 0;
        let mut on_progress = |_: f64| -> Result<(), CallbackError> {
            calls += 1;
            Ok(())
        };

        let mut reader =
            ProgressTrackingReader::new(Cursor::new(vec![0; 15]), 15, THRESHOLD, Some(&mut on_progress));
        assert_eq!(drain(&mut reader, 4), 15);
        drop(reader);

        assert_eq!(calls, 0);
    }

    #[test]
    fn test_fraction_clamped_when_source_outgrows_length() {
        let mut fractions = Vec::new();
        let mut on_progress = |fraction: f64| -> Result<(), CallbackError> {
            fractions.push(fraction);
            Ok(())
        };

        let mut reader =
            ProgressTrackingReader::new(Cursor::new(vec![0; 48]), 16, THRESHOLD, Some(&mut on_progress));
        drain(&mut reader, 16);
        drop(reader);

        assert_eq!(fractions, vec![1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_callback_error_aborts_read() {
        let mut on_progress =
            |_: f64| -> Result<(), CallbackError> { Err("display closed".into()) };

        let mut reader =
            ProgressTrackingReader::new(Cursor::new(vec![0; 32]), 32, THRESHOLD, Some(&mut on_progress));
        let mut buffer = vec![0; 16];

        let error = reader.read(&mut buffer).unwrap_err();
        assert!(matches!(error, ChecksumError::CallbackFailure(_)));
        assert_eq!(error.to_string(), "Progress callback failed: display closed");
    }

    #[test]
    fn test_release_drops_source_once() {
        let (source, releases) = CountedSource::new(8);
        let mut reader = ProgressTrackingReader::new(source, 8, THRESHOLD, None);

        reader.release();
        assert!(reader.is_released());
        assert_eq!(releases.get(), 1);

        reader.release();
        drop(reader);
        assert_eq!(releases.get(), 1);
    }

    #[test]
    fn test_drop_releases_source() {
        let (source, releases) = CountedSource::new(8);
        let reader = ProgressTrackingReader::new(source, 8, THRESHOLD, None);
        drop(reader);
        assert_eq!(releases.get(), 1);
    }

    #[test]
    fn test_read_after_release_is_unsupported() {
        let mut reader = ProgressTrackingReader::new(Cursor::new(vec![0; 8]), 8, THRESHOLD, None);
        reader.release();

        let mut buffer = vec![0; 8];
        assert!(matches!(
            reader.read(&mut buffer),
            Err(ChecksumError::UnsupportedOperation(_))
        ));
    }

    #[test]
    fn test_interrupted_reads_are_retried() {
        let source = InterruptingSource {
            inner: Cursor::new(vec![7; 20]),
            interrupt: false,
        };
        let mut reader = ProgressTrackingReader::new(source, 20, THRESHOLD, None);
        assert_eq!(drain(&mut reader, 8), 20);
    }

    #[test]
    fn test_zero_length_fraction() {
        assert_eq!(progress_fraction(0, 0), 1.0);
        assert_eq!(progress_fraction(5, 10), 0.5);
    }
}
