use super::HashEngine;

/// Streaming MD5 engine, 16 byte digest.
pub struct Md5Engine {
    context: md5::Context,
}

impl Md5Engine {
    pub fn new() -> Self {
        Self {
            context: md5::Context::new(),
        }
    }
}

impl HashEngine for Md5Engine {
    fn feed(&mut self, chunk: &[u8]) {
        self.context.consume(chunk);
    }

    fn finish(self: Box<Self>) -> Vec<u8> {
        self.context.compute().0.to_vec()
    }
}
