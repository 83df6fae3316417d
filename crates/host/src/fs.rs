//! File reads.

use std::path::Path;

/// Read a file as UTF-8 text. The error is the underlying message.
pub fn read_file(path: impl AsRef<Path>) -> Result<String, String> {
    std::fs::read_to_string(path).map_err(|e| e.to_string())
}
