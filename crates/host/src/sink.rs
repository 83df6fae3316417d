//! Output slot for rendered content.

use std::path::{Path, PathBuf};

use tracing::warn;

use crate::IoError;

/// Destination whose content is replaced on every write.
///
/// Without a target, writes are dropped with a warning. A configured target
/// that cannot be written is an error.
#[derive(Debug, Clone, Default)]
pub struct OutputSlot {
    target: Option<PathBuf>,
}

impl OutputSlot {
    pub fn new(target: Option<PathBuf>) -> Self {
        Self { target }
    }

    pub fn target(&self) -> Option<&Path> {
        self.target.as_deref()
    }

    /// Replace the slot's content.
    pub fn write_into(&self, content: &str) -> Result<(), IoError> {
        let Some(target) = &self.target else {
            warn!("no output slot configured; dropping {} bytes", content.len());
            return Ok(());
        };
        std::fs::write(target, content).map_err(|e| IoError::Write {
            path: target.display().to_string(),
            message: e.to_string(),
        })
    }
}
