//! Lock-scoped atomic mutation helpers for the JSONL schedule store.
//!
//! Every mutation holds `<store>.lock` from load to save, so concurrent
//! writers against one store file are serialized.

use crate::{MemoryStore, MemoryStoreError};
use chrono::Utc;
use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

pub const DEFAULT_LOCK_ATTEMPTS: u32 = 50;
pub const DEFAULT_LOCK_RETRY_DELAY: Duration = Duration::from_millis(20);

pub fn store_lock_path(store_path: &Path) -> PathBuf {
    let mut path: OsString = store_path.as_os_str().to_os_string();
    path.push(".lock");
    PathBuf::from(path)
}

/// How long a mutation waits for a busy store lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockPolicy {
    pub attempts: u32,
    pub retry_delay: Duration,
}

impl Default for LockPolicy {
    fn default() -> Self {
        Self {
            attempts: DEFAULT_LOCK_ATTEMPTS,
            retry_delay: DEFAULT_LOCK_RETRY_DELAY,
        }
    }
}

impl LockPolicy {
    /// Fail immediately when the lock is held.
    pub fn no_wait() -> Self {
        Self {
            attempts: 1,
            retry_delay: Duration::ZERO,
        }
    }
}

/// Why the store lock could not be taken.
#[derive(Debug, thiserror::Error)]
pub enum StoreLockError {
    #[error("schedule store lock busy after {attempts} attempt(s): {}", lock_path.display())]
    Busy { lock_path: PathBuf, attempts: u32 },

    #[error("failed to acquire schedule store lock {}: {source}", lock_path.display())]
    Io {
        lock_path: PathBuf,
        source: std::io::Error,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum AtomicStoreMutationError<E> {
    #[error(transparent)]
    Lock(#[from] StoreLockError),

    #[error(transparent)]
    Store(MemoryStoreError),

    #[error("{0}")]
    Mutation(E),
}

/// Execute one lock-scoped store mutation against a store JSONL path.
///
/// A missing store file is treated as an empty store. The mutator returns
/// `(value, changed)`; `changed=true` persists the store before the lock is
/// released. When the mutator fails, nothing is written.
pub fn mutate_store_jsonl<T, E, F>(
    path: impl AsRef<Path>,
    policy: LockPolicy,
    mutator: F,
) -> Result<T, AtomicStoreMutationError<E>>
where
    F: FnOnce(&mut MemoryStore) -> Result<(T, bool), E>,
{
    let path = path.as_ref();
    let lock = StoreLock::acquire(path, policy)?;

    let mut store =
        MemoryStore::load_jsonl_or_default(path).map_err(AtomicStoreMutationError::Store)?;
    let loaded_revision = store.revision();
    let (value, changed) = mutator(&mut store).map_err(AtomicStoreMutationError::Mutation)?;
    if changed {
        store
            .save_jsonl(path)
            .map_err(AtomicStoreMutationError::Store)?;
    } else if store.revision() != loaded_revision {
        tracing::warn!(
            lock_path = %lock.path.display(),
            "mutation changed the store but did not ask to persist it"
        );
    }
    Ok(value)
}

/// Held `<store>.lock`. The file records the owning pid and acquisition time
/// and is removed on drop.
struct StoreLock {
    path: PathBuf,
    _file: File,
}

impl StoreLock {
    fn acquire(store_path: &Path, policy: LockPolicy) -> Result<Self, StoreLockError> {
        let path = store_lock_path(store_path);
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|source| StoreLockError::Io {
                lock_path: path.clone(),
                source,
            })?;
        }

        let attempts = policy.attempts.max(1);
        for attempt in 1..=attempts {
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(mut file) => {
                    let _ = writeln!(
                        file,
                        "pid={}\nutc={}",
                        std::process::id(),
                        Utc::now().to_rfc3339()
                    );
                    return Ok(Self { path, _file: file });
                }
                Err(err) if err.kind() == std::io::ErrorKind::AlreadyExists => {
                    if attempt < attempts {
                        tracing::debug!(
                            lock_path = %path.display(),
                            attempt,
                            "store lock busy, retrying"
                        );
                        thread::sleep(policy.retry_delay);
                    }
                }
                Err(source) => {
                    return Err(StoreLockError::Io {
                        lock_path: path,
                        source,
                    });
                }
            }
        }
        Err(StoreLockError::Busy {
            lock_path: path,
            attempts,
        })
    }
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
    }
}
