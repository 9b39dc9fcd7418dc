//! Streaming file checksums (MD5, SHA-1, CRC-32) with throttled progress reporting.
//!
//! The core is [`checksum::ProgressTrackingReader`], a read-through wrapper that
//! counts bytes on their way into a [`checksum::HashEngine`] and notifies a
//! callback once per threshold unit crossed.

pub mod checksum;
pub mod error;

pub use checksum::{compute, Checksum, ChecksumMethod, ChecksumOptions};
pub use error::ChecksumError;
