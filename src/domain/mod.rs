//! Domain data structures.

pub mod record;

pub use record::{ArtRecord, RecordError};
