//! File-backed history: one pretty-printed JSON array per candidate.
//!
//! Appends for the same candidate are serialized by an in-process keyed lock and
//! written through a temp file + rename, so a reader never sees a half-written
//! document and concurrent appends never drop records.

use std::collections::HashMap;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use tempfile::NamedTempFile;
use tokio::sync::Mutex;
use tracing::info;

use crate::history::{
    decode_records_bytes, HistoryError, HistoryResult, HistoryStore, ScoreRecord,
};

/// Longest escaped stem stored verbatim; longer names are hashed.
const MAX_STEM_BYTES: usize = 200;
/// Readable prefix kept in front of the hash of a long name.
const HASHED_PREFIX_BYTES: usize = 64;

pub struct FileHistoryStore {
    dir: PathBuf,
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl FileHistoryStore {
    /// Opens (creating if needed) a history directory.
    pub fn open(dir: impl Into<PathBuf>) -> HistoryResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            locks: Mutex::new(HashMap::new()),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the document holding `candidate`'s history.
    pub fn path_for(&self, candidate: &str) -> PathBuf {
        self.dir.join(file_name_for(candidate))
    }

    async fn key_lock(&self, candidate: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        Arc::clone(locks.entry(candidate.to_string()).or_default())
    }

    /// Drops the map entry once no other append holds or waits on it.
    async fn release_key_lock(&self, candidate: &str, key_lock: Arc<Mutex<()>>) {
        let mut locks = self.locks.lock().await;
        drop(key_lock);
        if locks
            .get(candidate)
            .is_some_and(|entry| Arc::strong_count(entry) == 1)
        {
            locks.remove(candidate);
        }
    }

    async fn append_locked(
        &self,
        candidate: &str,
        score: f64,
        timestamp: &str,
    ) -> HistoryResult<Vec<ScoreRecord>> {
        let dir = self.dir.clone();
        let path = self.path_for(candidate);
        let owned_candidate = candidate.to_string();
        let record = ScoreRecord {
            timestamp: timestamp.to_string(),
            score,
        };

        tokio::task::spawn_blocking(move || append_sync(&dir, &path, &owned_candidate, record))
            .await
            .map_err(|e| HistoryError::Task(format!("history append task failed: {e}")))?
    }
}

#[async_trait]
impl HistoryStore for FileHistoryStore {
    async fn append(
        &self,
        candidate: &str,
        score: f64,
        timestamp: &str,
    ) -> HistoryResult<Vec<ScoreRecord>> {
        let key_lock = self.key_lock(candidate).await;
        let outcome = {
            let _guard = key_lock.lock().await;
            self.append_locked(candidate, score, timestamp).await
        };
        self.release_key_lock(candidate, key_lock).await;
        let records = outcome?;

        info!(
            "Appended score {score} for candidate '{candidate}' ({} records)",
            records.len()
        );
        Ok(records)
    }

    async fn load(&self, candidate: &str) -> HistoryResult<Vec<ScoreRecord>> {
        match tokio::fs::read(self.path_for(candidate)).await {
            Ok(raw) => decode_records_bytes(candidate, &raw),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn backend(&self) -> &'static str {
        "file"
    }
}

/// Read-modify-write of one candidate document. Caller holds the key lock.
fn append_sync(
    dir: &Path,
    path: &Path,
    candidate: &str,
    record: ScoreRecord,
) -> HistoryResult<Vec<ScoreRecord>> {
    let mut records = match std::fs::read(path) {
        Ok(raw) => decode_records_bytes(candidate, &raw)?,
        Err(e) if e.kind() == ErrorKind::NotFound => Vec::new(),
        Err(e) => return Err(e.into()),
    };
    records.push(record);

    let body = serde_json::to_vec_pretty(&records)
        .map_err(|e| HistoryError::Task(format!("failed to encode history: {e}")))?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(&body)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;

    Ok(records)
}

/// Maps a raw candidate name to a file name without normalizing it.
///
/// ASCII alphanumerics, space, `_`, `-` and non-leading `.` pass through; every
/// other byte (including `%`, `~` and path separators) becomes `%XX`. Escaped
/// stems longer than `MAX_STEM_BYTES` become `<prefix>~<sha256 of the name>`,
/// which no verbatim stem can equal since `~` is always escaped.
///
/// Distinct names map to distinct file names, but names differing only in case
/// ("Ana" and "ana") share a document on case-insensitive filesystems.
pub fn file_name_for(candidate: &str) -> String {
    let mut stem = String::with_capacity(candidate.len());
    for (idx, byte) in candidate.bytes().enumerate() {
        let keep = byte.is_ascii_alphanumeric()
            || matches!(byte, b' ' | b'_' | b'-')
            || (byte == b'.' && idx > 0);
        if keep {
            stem.push(byte as char);
        } else {
            stem.push_str(&format!("%{byte:02X}"));
        }
    }

    if stem.len() > MAX_STEM_BYTES {
        // the stem is ASCII, so any byte offset is a char boundary
        stem.truncate(HASHED_PREFIX_BYTES);
        let mut hasher = Sha256::new();
        hasher.update(candidate.as_bytes());
        stem = format!("{stem}~{:x}", hasher.finalize());
    }
    format!("{stem}.json")
}
