//! A single stored art piece.
//!
//! Records hold their text in the canonical base64 encoding and carry a
//! content-derived identity digest. The digest is computed over the canonical
//! encoding rather than the raw bytes, so it is stable across every code path
//! that round-trips through base64.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Errors raised when a record's stored content cannot be decoded back to text
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("stored content is not valid base64: {0}")]
    Decode(#[from] base64::DecodeError),

    #[error("decoded content is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// One art piece: canonical base64 content plus its dedup identity.
///
/// Records are immutable once built. Editing a piece means constructing a new
/// record and swapping it into the collection.
///
/// Equality keys on `identity` alone. Two distinct contents whose digests
/// collide are treated as the same record and deduplicated; see DESIGN.md.
#[derive(Debug, Clone)]
pub struct ArtRecord {
    /// Canonical base64 encoding of the art text.
    content: String,

    /// Hex SHA-256 digest of `content`.
    identity: String,
}

impl ArtRecord {
    /// Create a record from raw text bytes.
    pub fn new(bytes: &[u8]) -> Self {
        let content = BASE64.encode(bytes);
        let identity = digest(&content);
        Self { content, identity }
    }

    /// Reassemble a record from its stored fields.
    ///
    /// The stored identity is trusted as-is; database files are
    /// self-consistent because they are only ever produced by [`new`].
    ///
    /// [`new`]: ArtRecord::new
    pub(crate) fn from_parts(content: String, identity: String) -> Self {
        Self { content, identity }
    }

    /// The canonical base64 content.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// The hex identity digest.
    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// Decode the stored content back to text.
    pub fn decode(&self) -> Result<String, RecordError> {
        let raw = BASE64.decode(self.content.as_bytes())?;
        Ok(String::from_utf8(raw)?)
    }

    /// A new record with all-blank leading and trailing lines removed.
    ///
    /// A line is blank when it is empty or whitespace-only. Blank lines
    /// between non-blank lines are kept. Trimming an already-trimmed record
    /// yields an equal record.
    pub fn trimmed(&self) -> Result<ArtRecord, RecordError> {
        let text = self.decode()?;
        let lines: Vec<&str> = text.split('\n').collect();

        let first = lines.iter().position(|line| !line.trim().is_empty());
        let trimmed = match first {
            Some(first) => {
                // A non-blank line exists, so rposition must find one too.
                let last = lines
                    .iter()
                    .rposition(|line| !line.trim().is_empty())
                    .unwrap_or(first);
                lines[first..=last].join("\n")
            }
            None => String::new(),
        };

        Ok(ArtRecord::new(trimmed.as_bytes()))
    }
}

impl PartialEq for ArtRecord {
    fn eq(&self, other: &Self) -> bool {
        self.identity == other.identity
    }
}

impl Eq for ArtRecord {}

impl std::hash::Hash for ArtRecord {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.identity.hash(state);
    }
}

fn digest(canonical: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    hex::encode(hasher.finalize())
}
