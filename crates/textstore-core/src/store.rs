//! File store
//!
//! Composes the metadata index and the content blobs into the CRUD
//! surface. Every mutating operation follows the same shape: load the
//! full index, apply the change in memory, validate, write the index
//! back, then write or delete the content blob.
//!
//! The index write always comes first. A crash between the two writes
//! can leave an orphaned blob (invisible to every lookup) but never a
//! record whose body is unrecoverable, because a missing blob reads as
//! empty content.
//!
//! There is no version check on the index write and no transaction
//! spanning the index and content keys. Two writers can both load the
//! index, apply disjoint edits, and the second save silently discards
//! the first. This is an accepted limitation for a single-admin store;
//! the tests characterize it rather than paper over it.

use chrono::Utc;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use crate::models::{normalize_filename, normalize_title, FileRecord, DEFAULT_FILENAME};
use crate::storage::{find_by_filename, ContentBlobs, Kv, KvError, MetadataIndex};

/// Errors surfaced by store operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// No record matches the requested id or filename
    #[error("File not found: {0}")]
    NotFound(String),

    /// Filename uniqueness violated on create or update
    #[error("Filename \"{0}\" is already in use")]
    FilenameConflict(String),

    /// An export/import bundle is structurally invalid
    #[error("Invalid bundle: {0}")]
    InvalidBundle(String),

    /// Substrate failure
    #[error(transparent)]
    Storage(#[from] KvError),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// A record joined with its content body.
///
/// Serializes as the record's fields with a `content` field merged in.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FileWithContent {
    #[serde(flatten)]
    pub record: FileRecord,
    pub content: String,
}

/// Fields accepted by create and update.
///
/// `None` means the field was absent from the request. Note that on
/// update an absent `content` still rewrites the body to the empty
/// string: updates are full-document overwrites, never field-level
/// patches.
#[derive(Debug, Clone, Default)]
pub struct FileInput {
    pub filename: Option<String>,
    pub title: Option<String>,
    pub content: Option<String>,
}

/// The document store: metadata index plus content blobs over one
/// key-value substrate.
pub struct FileStore<S> {
    pub(crate) index: MetadataIndex<S>,
    pub(crate) blobs: ContentBlobs<S>,
}

impl<S: Kv + Clone> FileStore<S> {
    /// Build a store over the given substrate.
    pub fn new(kv: S) -> Self {
        Self {
            index: MetadataIndex::new(kv.clone()),
            blobs: ContentBlobs::new(kv),
        }
    }
}

impl<S: Kv> FileStore<S> {
    /// All records without their bodies, in storage order.
    pub fn list(&self) -> StoreResult<Vec<FileRecord>> {
        Ok(self.index.load()?)
    }

    /// Create a new file.
    ///
    /// The filename defaults to a placeholder and the title to the
    /// filename; both are trimmed. Fails with
    /// [`StoreError::FilenameConflict`] when the normalized filename is
    /// already taken.
    pub fn create(&self, input: FileInput) -> StoreResult<FileWithContent> {
        let mut records = self.index.load()?;

        let filename = normalize_filename(input.filename.as_deref(), DEFAULT_FILENAME);
        if find_by_filename(&records, &filename, None).is_some() {
            return Err(StoreError::FilenameConflict(filename));
        }
        let title = normalize_title(input.title.as_deref(), &filename);
        let content = input.content.unwrap_or_default();

        let mut record = FileRecord::new(filename, title, &content);
        record.id = fresh_id(&records);

        records.push(record.clone());
        self.index.save(&records)?;
        self.blobs.put(record.id, &content)?;

        debug!(id = %record.id, filename = %record.filename, "created file");
        Ok(FileWithContent { record, content })
    }

    /// A record with its body. The body is empty when the blob is
    /// missing.
    pub fn get(&self, id: Uuid) -> StoreResult<FileWithContent> {
        let records = self.index.load()?;
        let record = records
            .into_iter()
            .find(|r| r.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        let content = self.blobs.get(record.id)?;
        Ok(FileWithContent { record, content })
    }

    /// Rewrite a file in place.
    ///
    /// An omitted filename keeps the current one; a changed filename is
    /// re-validated for uniqueness excluding this record. An omitted
    /// title falls back to the filename. An omitted `content` rewrites
    /// the body to empty (full overwrite, see [`FileInput`]). The id and
    /// `created_at` never change.
    pub fn update(&self, id: Uuid, input: FileInput) -> StoreResult<FileWithContent> {
        let mut records = self.index.load()?;
        let pos = records
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        let filename = normalize_filename(input.filename.as_deref(), &records[pos].filename);
        if find_by_filename(&records, &filename, Some(id)).is_some() {
            return Err(StoreError::FilenameConflict(filename));
        }
        let title = normalize_title(input.title.as_deref(), &filename);
        let content = input.content.unwrap_or_default();

        let record = &mut records[pos];
        record.filename = filename;
        record.title = title;
        record.size = content.len() as u64;
        record.updated_at = Utc::now();
        let record = record.clone();

        self.index.save(&records)?;
        self.blobs.put(id, &content)?;

        debug!(id = %record.id, filename = %record.filename, "updated file");
        Ok(FileWithContent { record, content })
    }

    /// Remove a file.
    ///
    /// Unknown ids are not an error: the index is rewritten unchanged
    /// and the content delete is itself a no-op when the blob is absent.
    pub fn delete(&self, id: Uuid) -> StoreResult<()> {
        let records = self.index.load()?;
        let remaining: Vec<FileRecord> = records.into_iter().filter(|r| r.id != id).collect();

        self.index.save(&remaining)?;
        self.blobs.delete(id)?;

        info!(%id, "deleted file");
        Ok(())
    }

    /// Body of the file published under `filename`: content only, no
    /// metadata. This backs the public read path.
    pub fn get_by_filename(&self, filename: &str) -> StoreResult<String> {
        let records = self.index.load()?;
        let record = find_by_filename(&records, filename, None)
            .ok_or_else(|| StoreError::NotFound(filename.to_string()))?;

        Ok(self.blobs.get(record.id)?)
    }
}

/// Generate an id no current record uses.
///
/// A v4 collision is astronomically unlikely; the loop exists so one can
/// never slip through into the index.
pub(crate) fn fresh_id(records: &[FileRecord]) -> Uuid {
    loop {
        let id = Uuid::new_v4();
        if !records.iter().any(|r| r.id == id) {
            return id;
        }
    }
}
