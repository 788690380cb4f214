//! Captured console: output accumulates in a buffer, input is fed by tests.

use abi_types::Word;
use call_adapter::console::GETCHAR_EOF;
use std::collections::VecDeque;
use std::sync::Mutex;

#[derive(Default)]
pub struct Console {
    output: Mutex<Vec<u8>>,
    input: Mutex<VecDeque<u8>>,
}

impl Console {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&self, byte: u8) {
        self.output.lock().unwrap().push(byte);
    }

    pub fn write(&self, bytes: &[u8]) -> Word {
        self.output.lock().unwrap().extend_from_slice(bytes);
        bytes.len()
    }

    /// Next input byte, or the end-of-input value once the feed runs dry.
    pub fn get(&self) -> Word {
        match self.input.lock().unwrap().pop_front() {
            Some(byte) => byte as Word,
            None => GETCHAR_EOF,
        }
    }

    /// Feeds bytes for subsequent getchar calls.
    pub fn feed_input(&self, bytes: &[u8]) {
        self.input.lock().unwrap().extend(bytes.iter().copied());
    }

    pub fn output(&self) -> Vec<u8> {
        self.output.lock().unwrap().clone()
    }

    pub fn output_utf8(&self) -> String {
        String::from_utf8_lossy(&self.output()).into_owned()
    }
}
