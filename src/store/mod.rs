//! Database persistence: the record collection and its serialization codec.

pub mod codec;
pub mod collection;

pub use collection::{ArtCollection, StoreError};
