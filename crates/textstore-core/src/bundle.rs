//! Export/import bundle codec
//!
//! The whole store serializes to a versioned, self-contained JSON bundle
//! and merges back in. Content travels base64-encoded over its UTF-8
//! bytes so control characters and non-ASCII text survive any plain-text
//! container byte-for-byte.
//!
//! Import is a merge, not a replace: entries whose filename already
//! exists are skipped, malformed entries are counted and dropped, and
//! neither stops the rest of the batch. Blobs are written as each entry
//! lands; the index is written once at the end.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::models::{FileRecord, DEFAULT_FILENAME, TEXT_PLAIN};
use crate::storage::{find_by_filename, Kv, KvError};
use crate::store::{fresh_id, FileStore, StoreError, StoreResult};

/// Bundle format version written on export.
pub const BUNDLE_VERSION: &str = "1.0";

/// Content encoding marker for base64-transcoded entries.
const ENCODING_BASE64: &str = "base64";

/// A portable snapshot of the whole store.
///
/// A document missing `version` or `files` is rejected wholesale; any
/// unknown fields are ignored so newer bundles still read.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bundle {
    pub version: String,
    #[serde(default)]
    pub exported_at: Option<DateTime<Utc>>,
    /// Entries stay opaque JSON until imported one at a time, so a
    /// malformed entry is a per-entry failure rather than a rejection
    /// of the whole bundle.
    pub files: Vec<Value>,
}

/// One file entry inside a bundle.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(default)]
    pub content: String,
    /// `"base64"` when `content` is transcoded; any other value or none
    /// means the content is literal text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Outcome counts of a bundle import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub imported: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Why a single bundle entry failed to import.
#[derive(Debug, Error)]
enum EntryError {
    #[error("malformed entry: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("content is not valid base64: {0}")]
    Decode(#[from] base64::DecodeError),

    #[error("decoded content is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error(transparent)]
    Storage(#[from] KvError),
}

enum Outcome {
    Imported,
    Skipped,
}

impl<S: Kv> FileStore<S> {
    /// Serialize every record and its body into a portable bundle.
    pub fn export(&self) -> StoreResult<Bundle> {
        let records = self.index.load()?;

        let mut files = Vec::with_capacity(records.len());
        for record in &records {
            let content = self.blobs.get(record.id)?;
            let entry = BundleEntry {
                id: Some(record.id.to_string()),
                filename: Some(record.filename.clone()),
                title: Some(record.title.clone()),
                content_type: Some(record.content_type.clone()),
                content: BASE64.encode(content.as_bytes()),
                encoding: Some(ENCODING_BASE64.to_string()),
                created_at: Some(record.created_at),
                updated_at: Some(record.updated_at),
            };
            files.push(serde_json::to_value(entry).map_err(KvError::from)?);
        }

        info!(files = files.len(), "exported bundle");
        Ok(Bundle {
            version: BUNDLE_VERSION.to_string(),
            exported_at: Some(Utc::now()),
            files,
        })
    }

    /// Parse bundle JSON and merge it into the store.
    ///
    /// A document that is not a bundle at all (missing the version
    /// marker or the files array) is rejected before any mutation.
    pub fn import_json(&self, json: &str) -> StoreResult<ImportSummary> {
        let bundle: Bundle =
            serde_json::from_str(json).map_err(|e| StoreError::InvalidBundle(e.to_string()))?;
        self.import(&bundle)
    }

    /// Merge a bundle into the store.
    ///
    /// Entries are processed independently; see the module docs for the
    /// skip and failure semantics. Returns the outcome counts.
    pub fn import(&self, bundle: &Bundle) -> StoreResult<ImportSummary> {
        let mut records = self.index.load()?;
        let mut summary = ImportSummary::default();

        for value in &bundle.files {
            match self.import_entry(value, &mut records) {
                Ok(Outcome::Imported) => summary.imported += 1,
                Ok(Outcome::Skipped) => summary.skipped += 1,
                Err(e) => {
                    warn!(error = %e, "bundle entry failed to import");
                    summary.failed += 1;
                }
            }
        }

        self.index.save(&records)?;

        info!(
            imported = summary.imported,
            skipped = summary.skipped,
            failed = summary.failed,
            "bundle import finished"
        );
        Ok(summary)
    }

    fn import_entry(
        &self,
        value: &Value,
        records: &mut Vec<FileRecord>,
    ) -> Result<Outcome, EntryError> {
        let entry: BundleEntry = serde_json::from_value(value.clone())?;

        let content = match entry.encoding.as_deref() {
            Some(ENCODING_BASE64) => String::from_utf8(BASE64.decode(entry.content.as_bytes())?)?,
            _ => entry.content,
        };

        let title_field = entry.title.clone().filter(|s| !s.is_empty());
        let filename = entry
            .filename
            .clone()
            .filter(|s| !s.is_empty())
            .or_else(|| title_field.clone())
            .unwrap_or_else(|| DEFAULT_FILENAME.to_string());

        if find_by_filename(records, &filename, None).is_some() {
            debug!(%filename, "bundle entry skipped, filename already present");
            return Ok(Outcome::Skipped);
        }

        // Keep the entry's id when it parses and is free, so a store
        // round-tripped through a bundle keeps its identifiers.
        let id = entry
            .id
            .as_deref()
            .and_then(|s| Uuid::parse_str(s).ok())
            .filter(|id| !records.iter().any(|r| r.id == *id))
            .unwrap_or_else(|| fresh_id(records));

        let now = Utc::now();
        let title = title_field.unwrap_or_else(|| filename.clone());
        let record = FileRecord {
            id,
            filename,
            title,
            content_type: entry
                .content_type
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| TEXT_PLAIN.to_string()),
            size: content.len() as u64,
            created_at: entry.created_at.unwrap_or(now),
            updated_at: entry.updated_at.unwrap_or(now),
        };

        self.blobs.put(record.id, &content)?;
        records.push(record);
        Ok(Outcome::Imported)
    }
}
