//! Collaborators the harness calls into or is driven by.
//!
//! These wrap I/O and report failures as values, so an I/O failure is always
//! distinguishable from a fault in the evaluated code.

mod fs;
mod keys;
mod net;
mod sink;

pub use fs::read_file;
pub use keys::{KeyListener, KeyOutcome, KeyPress};
pub use net::HttpSource;
pub use sink::OutputSlot;

use thiserror::Error;

/// Failure of an external collaborator.
#[derive(Debug, Error)]
pub enum IoError {
    #[error("failed to read {path}: {message}")]
    Read { path: String, message: String },

    #[error("failed to write {path}: {message}")]
    Write { path: String, message: String },

    #[error("http: {0}")]
    Http(#[from] reqwest::Error),
}
