//! The art database: an ordered, deduplicated collection of records.

use std::path::Path;

use thiserror::Error;
use tokio::fs;
use tracing::{debug, info};

use crate::config::WireFormat;
use crate::domain::ArtRecord;

use super::codec::{self, RecordRepr};

/// Errors from database operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed database: {0}")]
    Format(#[from] serde_json::Error),

    #[error("unexpected record tag: {0}")]
    UnknownTag(String),

    #[error("record not found in collection")]
    NotFound,

    #[error("index {index} out of range for {len} records")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Ordered collection of art records with whole-file load/save.
///
/// Insertion order is significant: it defines serve-by-index order and
/// iteration order. `add` and `insert` keep the collection free of records
/// with equal identities.
#[derive(Debug, Clone, Default)]
pub struct ArtCollection {
    records: Vec<ArtRecord>,

    /// Whether the collection was loaded from a base64-wrapped file. Writes
    /// default to the same mode.
    base64_store: bool,
}

impl ArtCollection {
    /// An empty collection in plain storage mode.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a database file.
    pub async fn open(path: &Path, fmt: &WireFormat) -> Result<Self, StoreError> {
        info!("Loading art records from {}", path.display());
        let text = fs::read_to_string(path).await?;

        let (json, base64_store) = codec::read_framed(&text, fmt);
        if base64_store {
            debug!("database file is base64 wrapped");
        }

        let reprs: Vec<RecordRepr> = serde_json::from_str(&json)?;
        let records = reprs
            .into_iter()
            .map(codec::decode)
            .collect::<Result<Vec<_>, _>>()?;

        info!("{} art records loaded", records.len());
        Ok(Self {
            records,
            base64_store,
        })
    }

    /// Write the database file.
    ///
    /// `force_b64` switches a plain-mode collection to base64 output; a
    /// collection loaded from a base64 file stays base64 either way. `wrap`
    /// frames base64 output between the header/footer markers at the
    /// configured width.
    pub async fn write(
        &self,
        path: &Path,
        force_b64: bool,
        wrap: bool,
        fmt: &WireFormat,
    ) -> Result<(), StoreError> {
        let json = self.to_json()?;
        let document = codec::write_framed(&json, force_b64 || self.base64_store, wrap, fmt);

        fs::write(path, document).await?;
        info!("{} records written to {}", self.records.len(), path.display());
        Ok(())
    }

    /// The collection as a pretty JSON document.
    pub fn to_json(&self) -> Result<String, StoreError> {
        let reprs: Vec<RecordRepr> = self.records.iter().map(codec::encode).collect();
        Ok(serde_json::to_string_pretty(&reprs)?)
    }

    /// Append a record unless an equal one is already present.
    ///
    /// Returns whether the record was added; a duplicate is dropped silently.
    pub fn add(&mut self, record: ArtRecord) -> bool {
        if self.records.contains(&record) {
            debug!("duplicate record {} dropped", record.identity());
            return false;
        }
        self.records.push(record);
        true
    }

    /// Insert a record at `index` unless an equal one is already present.
    ///
    /// Records at and after `index` shift right. An index past the end
    /// appends. Returns whether the record was inserted.
    pub fn insert(&mut self, index: usize, record: ArtRecord) -> bool {
        if self.records.contains(&record) {
            debug!("duplicate record {} dropped", record.identity());
            return false;
        }
        let index = index.min(self.records.len());
        self.records.insert(index, record);
        true
    }

    /// Remove the first record equal to `record`.
    pub fn remove(&mut self, record: &ArtRecord) -> Result<ArtRecord, StoreError> {
        match self.records.iter().position(|r| r == record) {
            Some(pos) => Ok(self.records.remove(pos)),
            None => Err(StoreError::NotFound),
        }
    }

    /// Overwrite the slot at `index`, returning the displaced record.
    ///
    /// Does not check the dedup invariant: replacing is the one way a caller
    /// can knowingly introduce a duplicate identity.
    pub fn replace(&mut self, index: usize, record: ArtRecord) -> Result<ArtRecord, StoreError> {
        let len = self.records.len();
        let slot = self
            .records
            .get_mut(index)
            .ok_or(StoreError::IndexOutOfRange { index, len })?;
        Ok(std::mem::replace(slot, record))
    }

    /// The record at `index`.
    pub fn get(&self, index: usize) -> Result<&ArtRecord, StoreError> {
        self.records.get(index).ok_or(StoreError::IndexOutOfRange {
            index,
            len: self.records.len(),
        })
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the collection holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate records in collection order.
    pub fn iter(&self) -> std::slice::Iter<'_, ArtRecord> {
        self.records.iter()
    }

    /// Whether the collection came from a base64-wrapped file.
    pub fn is_base64_store(&self) -> bool {
        self.base64_store
    }
}

impl<'a> IntoIterator for &'a ArtCollection {
    type Item = &'a ArtRecord;
    type IntoIter = std::slice::Iter<'a, ArtRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(text: &str) -> ArtRecord {
        ArtRecord::new(text.as_bytes())
    }

    #[test]
    fn test_get_by_index() {
        let mut db = ArtCollection::new();
        db.add(record("AAA"));
        db.add(record("BBB"));

        assert_eq!(db.get(0).unwrap().decode().unwrap(), "AAA");
        assert_eq!(db.get(1).unwrap().decode().unwrap(), "BBB");
        assert!(matches!(
            db.get(2),
            Err(StoreError::IndexOutOfRange { index: 2, len: 2 })
        ));
    }

    #[test]
    fn test_add_deduplicates() {
        let mut db = ArtCollection::new();

        assert!(db.add(record("art")));
        assert!(!db.add(record("art")));
        assert_eq!(db.len(), 1);
    }

    #[test]
    fn test_insert_shifts_and_deduplicates() {
        let mut db = ArtCollection::new();
        db.add(record("first"));
        db.add(record("third"));

        assert!(db.insert(1, record("second")));
        assert!(!db.insert(0, record("second")));

        let order: Vec<String> = db.iter().map(|r| r.decode().unwrap()).collect();
        assert_eq!(order, ["first", "second", "third"]);
    }

    #[test]
    fn test_insert_past_end_appends() {
        let mut db = ArtCollection::new();
        db.add(record("only"));

        assert!(db.insert(99, record("tail")));
        assert_eq!(db.get(1).unwrap().decode().unwrap(), "tail");
    }

    #[test]
    fn test_remove_first_match() {
        let mut db = ArtCollection::new();
        db.add(record("keep"));
        db.add(record("drop"));

        let removed = db.remove(&record("drop")).unwrap();
        assert_eq!(removed.decode().unwrap(), "drop");
        assert_eq!(db.len(), 1);

        assert!(matches!(
            db.remove(&record("drop")),
            Err(StoreError::NotFound)
        ));
    }

    #[test]
    fn test_replace_is_unchecked() {
        let mut db = ArtCollection::new();
        db.add(record("one"));
        db.add(record("two"));

        // Replace may knowingly introduce a duplicate identity.
        let displaced = db.replace(1, record("one")).unwrap();
        assert_eq!(displaced.decode().unwrap(), "two");
        assert_eq!(db.get(0).unwrap(), db.get(1).unwrap());

        assert!(matches!(
            db.replace(5, record("x")),
            Err(StoreError::IndexOutOfRange { index: 5, len: 2 })
        ));
    }

    #[test]
    fn test_iter_is_restartable() {
        let mut db = ArtCollection::new();
        db.add(record("a"));
        db.add(record("b"));

        let first: Vec<&ArtRecord> = db.iter().collect();
        let second: Vec<&ArtRecord> = db.iter().collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn test_dedup_invariant_after_mixed_ops() {
        let mut db = ArtCollection::new();
        for text in ["a", "b", "a", "c", "b"] {
            db.add(record(text));
        }
        db.insert(0, record("c"));
        db.insert(2, record("d"));

        let mut identities: Vec<&str> = db.iter().map(|r| r.identity()).collect();
        let total = identities.len();
        identities.sort();
        identities.dedup();
        assert_eq!(identities.len(), total);
        assert_eq!(total, 4);
    }
}
