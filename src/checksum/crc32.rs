use super::HashEngine;

/// Streaming CRC-32 (IEEE, reflected 0xEDB88320) engine.
///
/// The 32-bit checksum is emitted as its four big-endian bytes.
pub struct Crc32Engine {
    hasher: crc32fast::Hasher,
}

impl Crc32Engine {
    pub fn new() -> Self {
        Self {
            hasher: crc32fast::Hasher::new(),
        }
    }
}

impl HashEngine for Crc32Engine {
    fn feed(&mut self, chunk: &[u8]) {
        self.hasher.update(chunk);
    }

    fn finish(self: Box<Self>) -> Vec<u8> {
        self.hasher.finalize().to_be_bytes().to_vec()
    }
}
