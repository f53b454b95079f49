//! Generic load/mutate/save engine behind every concrete store.
//!
//! One [`StoreEngine`] owns one JSON document in one file. The document is
//! loaded at most once per engine and then served from memory, so reads are
//! read-your-own-writes within a process. Every mutation rewrites the whole
//! file through a temp-file-plus-rename, so a crash or a concurrent reader
//! never observes a partially written document.
//!
//! Two bot instances sharing a data directory are unsupported: the engines
//! do not coordinate across processes and the last writer wins.

use crate::config;
use crate::errors::{Error, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::sync::Mutex;
use tracing::{debug, error, instrument};

/// File-backed document store scoped to a single concern.
///
/// `D` is the document shape (the full persisted file). It must be
/// `Default` because a missing or corrupt backing file degrades to an empty
/// document, and `Clone` because mutations are applied to a copy that only
/// replaces the cached document once the disk write has succeeded.
///
/// All access goes through one async mutex, which both lazily initializes
/// the cache and strictly serializes read-modify-write cycles: two
/// overlapping [`StoreEngine::update`] calls can never interleave and drop
/// an update. Engines for different stores are fully independent.
pub struct StoreEngine<D> {
    name: String,
    base_dir: Option<PathBuf>,
    cache: Mutex<Option<D>>,
}

impl<D> StoreEngine<D>
where
    D: Default + Clone + Serialize + DeserializeOwned,
{
    /// Creates an engine persisting to `<name>.json` under the resolved
    /// data directory (see [`crate::config::resolve_data_dir`]).
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base_dir: None,
            cache: Mutex::new(None),
        }
    }

    /// Creates an engine persisting to `<name>.json` under an explicit base
    /// directory, bypassing the process-wide resolver. Used by tests and by
    /// embedders that manage their own layout.
    pub fn with_dir(name: impl Into<String>, dir: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            base_dir: Some(dir.into()),
            cache: Mutex::new(None),
        }
    }

    /// The store name (filename stem) this engine persists under.
    pub fn name(&self) -> &str {
        &self.name
    }

    fn file_path(&self) -> Result<PathBuf> {
        let dir = match &self.base_dir {
            Some(dir) => {
                config::ensure_dir(dir)?;
                dir.clone()
            }
            None => config::resolve_data_dir()?,
        };
        Ok(dir.join(format!("{}.json", self.name)))
    }

    /// Runs `f` against the current document and returns its result.
    ///
    /// Loads the backing file on first access; afterwards the call is pure
    /// in-memory. A missing file is an empty document, never an error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StorageUnavailable`] if the first load cannot read
    /// an existing file or create the data directory.
    pub async fn read<T>(&self, f: impl FnOnce(&D) -> T) -> Result<T> {
        let mut slot = self.cache.lock().await;
        if slot.is_none() {
            *slot = Some(self.load_from_disk().await?);
        }
        Ok(f(slot.get_or_insert_with(D::default)))
    }

    /// Applies `f` to a copy of the current document, persists the copy,
    /// and commits it to the in-memory cache only after the write succeeds.
    ///
    /// The engine's mutex is held across the whole cycle, so concurrent
    /// updates on the same store serialize and both take effect. The write
    /// runs to completion once started; callers abandoning the future's
    /// result do not roll it back.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StorageUnavailable`] on a failed write, leaving the
    /// cached document unchanged (no partial update).
    pub async fn update<T>(&self, f: impl FnOnce(&mut D) -> T) -> Result<T> {
        let mut slot = self.cache.lock().await;
        if slot.is_none() {
            *slot = Some(self.load_from_disk().await?);
        }
        let mut next = (*slot).clone().unwrap_or_default();
        let out = f(&mut next);
        self.persist(&next).await?;
        *slot = Some(next);
        Ok(out)
    }

    #[instrument(skip(self), fields(store = %self.name))]
    async fn load_from_disk(&self) -> Result<D> {
        let path = self.file_path()?;
        let raw = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No backing file at {:?}, starting with an empty document", path);
                return Ok(D::default());
            }
            Err(source) => return Err(Error::StorageUnavailable { path, source }),
        };

        match serde_json::from_slice(&raw) {
            Ok(doc) => {
                debug!("Loaded store '{}' from {:?}", self.name, path);
                Ok(doc)
            }
            Err(source) => {
                // CorruptStore is absorbed here: the bot keeps running with
                // an empty document rather than becoming unusable. The next
                // successful mutation rewrites the file with valid JSON.
                let corrupt = Error::CorruptStore { path, source };
                error!("{corrupt}; continuing with an empty document");
                Ok(D::default())
            }
        }
    }

    async fn persist(&self, doc: &D) -> Result<()> {
        let path = self.file_path()?;
        let bytes = serde_json::to_vec_pretty(doc)?;

        // Write to a sibling temp file, then rename over the destination so
        // a concurrent reader or a crash never sees a half-written file.
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &bytes)
            .await
            .map_err(|source| Error::StorageUnavailable {
                path: tmp.clone(),
                source,
            })?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|source| Error::StorageUnavailable {
                path: path.clone(),
                source,
            })?;

        debug!(store = %self.name, bytes = bytes.len(), "Persisted document");
        Ok(())
    }
}

/// Rejects empty identifiers before any I/O is attempted.
///
/// # Errors
///
/// Returns [`Error::InvalidKey`] naming the offending key kind.
pub(crate) fn require_key(kind: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::InvalidKey(kind));
    }
    Ok(())
}
