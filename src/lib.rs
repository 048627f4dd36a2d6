//! artdb - ASCII art database and server
//!
//! Stores a collection of ASCII-art text blocks in a single JSON (optionally
//! base64-wrapped) database file, imports art from separator-delimited text
//! files, exports it back out, and serves random pieces over HTTP.
//!
//! # Architecture
//!
//! The core is the data model and its serialization:
//! - Records hold their text in a canonical base64 encoding with a
//!   content-derived identity digest used for deduplication
//! - The collection is an ordered, deduplicated sequence with whole-file
//!   load/save in plain or base64-wrapped JSON
//! - The importer splits text files on a separator line, auto-detecting
//!   base64 per block
//!
//! The HTTP endpoint, terminal browser and CLI are thin layers over
//! collection operations.
//!
//! # Modules
//!
//! - `domain`: Data structures (ArtRecord)
//! - `store`: The database collection and its serialization codec
//! - `import`: Text-block parser
//! - `export`: Text-file export
//! - `serve`: HTTP endpoint
//! - `browse`: Interactive terminal browser
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Import art files into a database
//! artdb load --out art.json --trim gallery/*.txt
//!
//! # Serve a random piece per request
//! artdb serve --port 8080 art.json
//!
//! # Browse and edit interactively
//! artdb browse art.json
//! ```

pub mod browse;
pub mod cli;
pub mod config;
pub mod domain;
pub mod export;
pub mod import;
pub mod serve;
pub mod store;

// Re-export main types at crate root for convenience
pub use browse::Cursor;
pub use config::WireFormat;
pub use domain::{ArtRecord, RecordError};
pub use export::ExportOptions;
pub use store::{ArtCollection, StoreError};
