//! Persisted cart slot.
//!
//! A [`CartStore`] holds one named slot containing the serialized cart.
//! Reads return the raw payload so that a malformed payload can be
//! treated as an empty cart by the caller. Writes replace the whole slot
//! in one step; readers never observe a partial write.

use std::fs;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Default slot size limit, matching common browser storage quotas.
pub const DEFAULT_QUOTA_BYTES: usize = 5 * 1024 * 1024;

/// Storage failures.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("cart storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize cart: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The payload is larger than the slot may hold.
    #[error("cart storage quota exceeded: {needed} bytes needed, {limit} allowed")]
    QuotaExceeded { limit: usize, needed: usize },
}

/// A single slot holding the serialized cart.
pub trait CartStore {
    /// Read the slot. `Ok(None)` means nothing has been stored yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be read.
    fn read(&self) -> Result<Option<String>, StoreError>;

    /// Replace the slot contents.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload exceeds the quota or the backing
    /// storage rejects the write. The previous contents stay intact.
    fn write(&mut self, payload: &str) -> Result<(), StoreError>;
}

fn check_quota(limit: usize, payload: &str) -> Result<(), StoreError> {
    if payload.len() > limit {
        return Err(StoreError::QuotaExceeded {
            limit,
            needed: payload.len(),
        });
    }
    Ok(())
}

// =============================================================================
// In-Memory Store
// =============================================================================

/// Cart slot held in process memory.
#[derive(Debug, Clone)]
pub struct MemoryCartStore {
    slot: Option<String>,
    quota: usize,
}

impl Default for MemoryCartStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryCartStore {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slot: None,
            quota: DEFAULT_QUOTA_BYTES,
        }
    }

    /// Start with a raw payload already in the slot.
    #[must_use]
    pub fn with_payload(payload: impl Into<String>) -> Self {
        Self {
            slot: Some(payload.into()),
            ..Self::new()
        }
    }

    /// Limit the slot to `quota` bytes.
    #[must_use]
    pub const fn with_quota(mut self, quota: usize) -> Self {
        self.quota = quota;
        self
    }

    /// Current raw payload.
    #[must_use]
    pub fn payload(&self) -> Option<&str> {
        self.slot.as_deref()
    }
}

impl CartStore for MemoryCartStore {
    fn read(&self) -> Result<Option<String>, StoreError> {
        Ok(self.slot.clone())
    }

    fn write(&mut self, payload: &str) -> Result<(), StoreError> {
        check_quota(self.quota, payload)?;
        self.slot = Some(payload.to_owned());
        Ok(())
    }
}

// =============================================================================
// File Store
// =============================================================================

/// Cart slot backed by a JSON file.
///
/// Writes go to a sibling temp file which is then renamed over the slot.
#[derive(Debug, Clone)]
pub struct FileCartStore {
    path: PathBuf,
    quota: usize,
}

impl FileCartStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            quota: DEFAULT_QUOTA_BYTES,
        }
    }

    #[must_use]
    pub const fn with_quota(mut self, quota: usize) -> Self {
        self.quota = quota;
        self
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl CartStore for FileCartStore {
    fn read(&self) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&mut self, payload: &str) -> Result<(), StoreError> {
        check_quota(self.quota, payload)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let temp = self.temp_path();
        let result = write_synced(&temp, payload).and_then(|()| fs::rename(&temp, &self.path));
        if let Err(e) = result {
            if let Err(cleanup) = fs::remove_file(&temp) {
                tracing::debug!(path = %temp.display(), error = %cleanup, "Temp cart file not removed");
            }
            return Err(e.into());
        }
        Ok(())
    }
}

fn write_synced(path: &Path, payload: &str) -> std::io::Result<()> {
    let mut file = fs::File::create(path)?;
    file.write_all(payload.as_bytes())?;
    file.sync_all()
}
