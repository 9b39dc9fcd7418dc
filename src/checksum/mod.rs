mod computer;
mod crc32;
mod md5;
mod sha;
mod tracking;

use std::{fmt::Display, str::FromStr};

pub use computer::{
    compute, compute_named, compute_reader, compute_with_options, verify, ChecksumOptions,
    DEFAULT_CHUNK_SIZE,
};
pub use tracking::{ProgressCallback, ProgressTrackingReader, DEFAULT_THRESHOLD};

use crate::error::ChecksumError;

/// The delimiter used to separate the checksum method and the digest.
const CHECKSUM_DELIMITER: &str = ";";

/// A streaming hash accumulator.
///
/// `feed` may be called any number of times, in order. `finish` consumes the
/// engine so no further input can be fed once the digest is taken.
pub trait HashEngine: Send {
    fn feed(&mut self, chunk: &[u8]);

    fn finish(self: Box<Self>) -> Vec<u8>;
}

/// Defines the checksum methods supported by this tool.
#[derive(
    Debug,
    Clone,
    Copy,
    Hash,
    PartialEq,
    Eq,
    serde::Serialize,
    serde::Deserialize,
    strum_macros::EnumString,
    strum_macros::EnumIter,
    strum_macros::Display,
    clap::ValueEnum,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum ChecksumMethod {
    /// MD5 (Message-Digest Algorithm 5), a 128-bit digest kept for compatibility.
    MD5,
    /// SHA-1 (Secure Hash Algorithm 1), a 160-bit digest kept for compatibility.
    SHA1,
    /// CRC32 (Cyclic Redundancy Check 32-bit), the zlib/Ethernet polynomial.
    CRC32,
}

impl Default for ChecksumMethod {
    fn default() -> Self {
        ChecksumMethod::MD5
    }
}

impl ChecksumMethod {
    /// Resolves a method by name, failing with `UnsupportedMethod` for unknown names.
    pub fn parse(name: &str) -> Result<Self, ChecksumError> {
        ChecksumMethod::from_str(name.trim())
            .map_err(|_| ChecksumError::UnsupportedMethod(name.to_string()))
    }

    /// Creates a fresh hash engine for this method.
    pub fn engine(&self) -> Box<dyn HashEngine> {
        match self {
            ChecksumMethod::MD5 => Box::new(md5::Md5Engine::new()),
            ChecksumMethod::SHA1 => Box::new(sha::Sha1Engine::new()),
            ChecksumMethod::CRC32 => Box::new(crc32::Crc32Engine::new()),
        }
    }

    /// Length in bytes of the digest this method produces.
    pub fn digest_len(&self) -> usize {
        match self {
            ChecksumMethod::MD5 => 16,
            ChecksumMethod::SHA1 => 20,
            ChecksumMethod::CRC32 => 4,
        }
    }

    /// Length of the rendered hexadecimal digest.
    pub fn hex_len(&self) -> usize {
        self.digest_len() * 2
    }
}

/// Defines a checksum, which is a pair of a method and an uppercase hex digest.
#[derive(Debug, Hash, PartialEq, Eq, Clone)]
pub struct Checksum {
    pub method: ChecksumMethod,
    pub digest: String,
}

impl Display for Checksum {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}{}", self.method, CHECKSUM_DELIMITER, self.digest)
    }
}

impl serde::Serialize for Checksum {
    /// Serializes the checksum to a string, which is in the format '<method>;<digest>'.
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.to_string().serialize(serializer)
    }
}

impl<'de> serde::Deserialize<'de> for Checksum {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Checksum::from_str(&s).map_err(serde::de::Error::custom)
    }
}

impl FromStr for Checksum {
    type Err = ChecksumError;

    /// Parses a checksum from a string in the format '<method>;<digest>'.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (method, digest) = s
            .split_once(CHECKSUM_DELIMITER)
            .ok_or(ChecksumError::InvalidChecksumFormat)?;

        Checksum::new(ChecksumMethod::parse(method)?, digest)
    }
}

impl Checksum {
    /// Builds a checksum, normalizing the digest to uppercase.
    pub fn new(method: ChecksumMethod, digest: &str) -> Result<Self, ChecksumError> {
        let digest = digest.trim();
        if digest.len() != method.hex_len() || !digest.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ChecksumError::InvalidChecksumFormat);
        }

        Ok(Checksum {
            method,
            digest: digest.to_ascii_uppercase(),
        })
    }

    /// Parses either '<method>;<digest>' or a bare digest of `default_method`.
    pub fn parse_with_default(s: &str, default_method: ChecksumMethod) -> Result<Self, ChecksumError> {
        if s.contains(CHECKSUM_DELIMITER) {
            Checksum::from_str(s)
        } else {
            Checksum::new(default_method, s)
        }
    }

    /// Returns true when both checksums use the same method and digest, ignoring case.
    pub fn matches(&self, other: &Checksum) -> bool {
        self.method == other.method && self.digest.eq_ignore_ascii_case(&other.digest)
    }
}
