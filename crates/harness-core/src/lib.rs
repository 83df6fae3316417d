//! Canonical value encoding for programs run by the harness.
//!
//! Values are variant-tagged booleans, cons lists, ordered records and
//! primitives. This crate owns their representation, structural equality,
//! and conversion to and from host containers and JSON.

pub mod equality;
pub mod error;
pub mod list;
pub mod marshal;
pub mod value;
pub mod variant;

pub use equality::{deep_equal, equal, Equality, KeySetPolicy};
pub use error::MarshalError;
pub use list::List;
pub use marshal::{entries, from_array, json_to_string, list, object};
pub use value::{Record, Value};
pub use variant::{Payload, Tag};
