//! Helpers shared by unit tests

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use crate::logger::Logger;

/// In-memory console that can be inspected after logging
#[derive(Debug, Clone, Default)]
pub(crate) struct SharedBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    pub(crate) fn contents(&self) -> String {
        String::from_utf8(self.bytes.lock().unwrap().clone()).unwrap()
    }

    pub(crate) fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }

    pub(crate) fn clear(&self) {
        self.bytes.lock().unwrap().clear();
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// A logger whose console output lands in the returned buffer
pub(crate) fn capturing_logger() -> (Logger, SharedBuffer) {
    let console = SharedBuffer::default();
    let logger = Logger::with_console_writer(Box::new(console.clone()));
    (logger, console)
}
