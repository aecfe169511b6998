//! File-based trace source.

use crate::model::TraceError;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// A trace file, read once.
#[derive(Debug)]
pub struct FileSource {
    path: PathBuf,
    consumed: bool,
}

impl FileSource {
    /// Open a trace file.
    ///
    /// # Errors
    ///
    /// Returns `TraceError::FileNotFound` if the file does not exist.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, TraceError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(TraceError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        Ok(Self {
            path: path.to_path_buf(),
            consumed: false,
        })
    }

    /// Path this source reads.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All lines on the first call, nothing afterwards.
    ///
    /// # Errors
    ///
    /// Returns `TraceError::Io` for I/O errors.
    pub fn read_lines(&mut self) -> Result<Vec<String>, TraceError> {
        if self.consumed {
            return Ok(Vec::new());
        }
        let reader = BufReader::new(File::open(&self.path)?);
        let lines = reader.lines().collect::<Result<Vec<_>, _>>()?;
        self.consumed = true;
        Ok(lines)
    }
}
