//! Stdin-based trace source for piped input.

use crate::model::TraceError;
use std::io::{BufRead, BufReader, Read};

/// Line reader over stdin (or any reader, for tests).
#[derive(Debug)]
pub struct StdinSource<R: Read> {
    reader: BufReader<R>,
    complete: bool,
}

impl StdinSource<std::io::Stdin> {
    /// Source reading the process's stdin.
    pub fn new() -> Self {
        Self::from_reader(std::io::stdin())
    }
}

impl Default for StdinSource<std::io::Stdin> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Read> StdinSource<R> {
    /// Source over any reader.
    pub fn from_reader(reader: R) -> Self {
        Self {
            reader: BufReader::new(reader),
            complete: false,
        }
    }

    /// Read one line without its terminator. `None` at EOF.
    ///
    /// # Errors
    ///
    /// Returns `TraceError::Io` for I/O errors.
    pub fn poll(&mut self) -> Result<Option<String>, TraceError> {
        if self.complete {
            return Ok(None);
        }
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            self.complete = true;
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }

    /// Read until EOF.
    ///
    /// # Errors
    ///
    /// Returns `TraceError::Io` for I/O errors.
    pub fn read_to_end(&mut self) -> Result<Vec<String>, TraceError> {
        let mut lines = Vec::new();
        while let Some(line) = self.poll()? {
            lines.push(line);
        }
        Ok(lines)
    }

    /// Whether EOF has been reached.
    pub fn is_complete(&self) -> bool {
        self.complete
    }
}
