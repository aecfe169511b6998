//! Trace input sources.
//!
//! Replay reads JSONL traces from either:
//! - a file path
//! - piped stdin (path `-`)
//!
//! Both hand back raw lines; parsing happens in [`crate::parser`].

use crate::model::TraceError;
use std::path::Path;

pub mod file;
pub mod stdin;

pub use file::FileSource;
pub use stdin::StdinSource;

/// Path argument that selects stdin.
pub const STDIN_PATH: &str = "-";

/// Unified input source for trace data.
#[derive(Debug)]
pub enum InputSource {
    /// Trace file, read once.
    File(FileSource),
    /// Piped stdin, read to EOF.
    Stdin(StdinSource<std::io::Stdin>),
}

impl InputSource {
    /// Read every remaining line.
    ///
    /// # Errors
    ///
    /// Returns `TraceError::Io` for I/O errors.
    pub fn read_lines(&mut self) -> Result<Vec<String>, TraceError> {
        match self {
            InputSource::File(f) => f.read_lines(),
            InputSource::Stdin(s) => s.read_to_end(),
        }
    }
}

/// Pick the source for a trace path argument.
///
/// # Errors
///
/// Returns `TraceError::FileNotFound` if a file path does not exist.
pub fn detect_input_source(path: &Path) -> Result<InputSource, TraceError> {
    if path.as_os_str() == STDIN_PATH {
        return Ok(InputSource::Stdin(StdinSource::new()));
    }
    Ok(InputSource::File(FileSource::new(path)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn file_path_reads_all_lines() {
        let path = std::env::temp_dir().join("stickylane_source_all_lines.jsonl");
        fs::write(&path, "one\ntwo\n").expect("write trace");

        let mut source = detect_input_source(&path).expect("source");
        let lines = source.read_lines().expect("lines");
        assert_eq!(lines, vec!["one".to_string(), "two".to_string()]);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn missing_file_is_reported() {
        let result = detect_input_source(Path::new("/nonexistent/trace.jsonl"));
        assert!(matches!(result, Err(TraceError::FileNotFound { .. })));
    }

    #[test]
    fn dash_selects_stdin() {
        let source = detect_input_source(Path::new("-")).expect("stdin source");
        assert!(matches!(source, InputSource::Stdin(_)));
    }
}
