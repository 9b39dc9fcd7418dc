use sha1::Digest as _;

use super::HashEngine;

/// Streaming SHA-1 engine, 20 byte digest.
pub struct Sha1Engine {
    hasher: sha1::Sha1,
}

impl Sha1Engine {
    pub fn new() -> Self {
        Self {
            hasher: sha1::Sha1::new(),
        }
    }
}

impl HashEngine for Sha1Engine {
    fn feed(&mut self, chunk: &[u8]) {
        self.hasher.update(chunk);
    }

    fn finish(self: Box<Self>) -> Vec<u8> {
        self.hasher.finalize().to_vec()
    }
}
