//! Data directory resolution for all store files.
//!
//! Every store persists to one JSON file inside a single data directory.
//! The directory is resolved once per process and memoized: the
//! `GUILDSTORE_DATA_DIR` environment variable takes precedence, otherwise a
//! fixed `data` directory relative to the working directory is used. Test
//! harnesses that change the override between cases must call
//! [`reset_data_dir_cache`] to force re-resolution.

use crate::errors::{Error, Result};
use once_cell::sync::Lazy;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, info};

/// Environment variable overriding the data directory root.
pub const DATA_DIR_ENV: &str = "GUILDSTORE_DATA_DIR";

/// Fallback when no override is set.
const DEFAULT_DATA_DIR: &str = "data";

static RESOLVED_DATA_DIR: Lazy<Mutex<Option<PathBuf>>> = Lazy::new(|| Mutex::new(None));

fn cache_guard() -> MutexGuard<'static, Option<PathBuf>> {
    // The cached value is a plain PathBuf, still usable after a panic in
    // another holder, so recover from poisoning instead of propagating it.
    RESOLVED_DATA_DIR
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
}

/// Resolves (and memoizes) the directory under which all store files live,
/// creating it if absent.
///
/// # Errors
///
/// Returns [`Error::StorageUnavailable`] if the directory cannot be created
/// (permissions, disk full). An already-existing directory is not an error.
pub fn resolve_data_dir() -> Result<PathBuf> {
    let mut cached = cache_guard();
    if let Some(dir) = cached.as_ref() {
        return Ok(dir.clone());
    }

    let dir = match std::env::var(DATA_DIR_ENV) {
        Ok(value) if !value.trim().is_empty() => {
            debug!("Using data directory override from {}: {}", DATA_DIR_ENV, value);
            PathBuf::from(value)
        }
        _ => PathBuf::from(DEFAULT_DATA_DIR),
    };

    ensure_dir(&dir)?;
    info!("Resolved data directory: {:?}", dir);
    *cached = Some(dir.clone());
    Ok(dir)
}

/// Clears the memoized data directory so the next [`resolve_data_dir`] call
/// re-resolves it. Needed when the override changes within one process
/// (test isolation).
pub fn reset_data_dir_cache() {
    *cache_guard() = None;
}

/// Idempotent directory creation shared with engines that use an explicit
/// base directory.
pub(crate) fn ensure_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir).map_err(|source| Error::StorageUnavailable {
        path: dir.to_path_buf(),
        source,
    })
}

#[cfg(test)]
#[allow(unsafe_code)]
mod tests {
    use super::*;
    use crate::test_utils::init_test_tracing;

    // The resolver cache and the environment variable are process-global;
    // these tests serialize on one lock so they cannot race each other.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn set_override(value: &Path) {
        // SAFETY: guarded by ENV_LOCK; no other test in this module touches
        // the environment concurrently.
        unsafe { std::env::set_var(DATA_DIR_ENV, value) };
    }

    fn clear_override() {
        // SAFETY: see set_override.
        unsafe { std::env::remove_var(DATA_DIR_ENV) };
    }

    #[test]
    fn test_env_override_takes_precedence() -> Result<()> {
        init_test_tracing();
        let _env = ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
        let tmp = tempfile::tempdir().expect("tempdir");
        let override_dir = tmp.path().join("override");

        set_override(&override_dir);
        reset_data_dir_cache();
        let resolved = resolve_data_dir()?;
        assert_eq!(
            resolved, override_dir,
            "Override from the environment should win over the default."
        );
        assert!(
            override_dir.is_dir(),
            "Resolution should create the directory."
        );

        clear_override();
        reset_data_dir_cache();
        Ok(())
    }

    #[test]
    fn test_resolution_is_cached_until_reset() -> Result<()> {
        init_test_tracing();
        let _env = ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
        let tmp = tempfile::tempdir().expect("tempdir");
        let first_dir = tmp.path().join("first");
        let second_dir = tmp.path().join("second");

        set_override(&first_dir);
        reset_data_dir_cache();
        assert_eq!(resolve_data_dir()?, first_dir);

        // Changing the override without a reset must not change the result.
        set_override(&second_dir);
        assert_eq!(
            resolve_data_dir()?,
            first_dir,
            "Cached resolution should survive an override change."
        );

        reset_data_dir_cache();
        assert_eq!(
            resolve_data_dir()?,
            second_dir,
            "Reset should force re-resolution against the new override."
        );

        clear_override();
        reset_data_dir_cache();
        Ok(())
    }

    #[test]
    fn test_existing_directory_is_not_an_error() -> Result<()> {
        init_test_tracing();
        let _env = ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
        let tmp = tempfile::tempdir().expect("tempdir");

        set_override(tmp.path());
        reset_data_dir_cache();
        resolve_data_dir()?;
        reset_data_dir_cache();
        // Second resolution hits an already-existing directory.
        resolve_data_dir()?;

        clear_override();
        reset_data_dir_cache();
        Ok(())
    }
}
