//! Instance lifecycle and typed dispatch.

use crate::buffer::SharedBuffer;
use crate::error::{BridgeError, BridgeResult};
use crate::value::DynValue;
use kivi_store::{OpenOptions, ProcessMode, Store, MAX_KEY_LEN};
use parking_lot::RwLock;
use std::path::PathBuf;
use tracing::{info, warn};

/// Configuration consumed once when creating an instance.
///
/// Optional fields are normalized on use: an empty path or key means "not
/// provided", and an absent mode tag means single-process.
#[derive(Debug, Clone, Default)]
pub struct InstanceConfig {
    /// Instance identifier; uniquely names a store on disk.
    pub id: String,
    /// Filesystem path override.
    pub path: Option<PathBuf>,
    /// Encryption key bytes. Empty means unencrypted.
    pub encryption_key: Option<Vec<u8>>,
    /// Process-sharing mode tag: `"single-process"` or `"multi-process"`.
    pub mode: Option<String>,
}

impl InstanceConfig {
    /// Creates a configuration for the given identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Sets the filesystem path override.
    #[must_use]
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Sets the encryption key.
    #[must_use]
    pub fn encryption_key(mut self, key: impl Into<Vec<u8>>) -> Self {
        self.encryption_key = Some(key.into());
        self
    }

    /// Sets the process-sharing mode tag.
    #[must_use]
    pub fn mode(mut self, mode: impl Into<String>) -> Self {
        self.mode = Some(mode.into());
        self
    }

    /// Resolves the mode tag.
    fn resolve_mode(&self) -> BridgeResult<ProcessMode> {
        match self.mode.as_deref() {
            None | Some("") => Ok(ProcessMode::SingleProcess),
            Some("single-process") => Ok(ProcessMode::SingleProcess),
            Some("multi-process") => Ok(ProcessMode::MultiProcess),
            Some(other) => Err(BridgeError::InvalidConfiguration {
                mode: other.to_string(),
            }),
        }
    }
}

/// The live handle to one opened store.
///
/// Created once at construction time and destroyed exactly once;
/// [`destroy`](StoreInstance::destroy) is idempotent. No operation is
/// dispatched to a closed instance.
pub struct StoreInstance {
    id: String,
    store: RwLock<Option<Store>>,
}

impl StoreInstance {
    /// Validates the configuration and opens the underlying store.
    ///
    /// # Errors
    ///
    /// - Unknown mode tag: [`BridgeError::InvalidConfiguration`]
    /// - Open failure with an empty identifier: [`BridgeError::EmptyIdentifier`]
    /// - Open failure with a key over 16 bytes:
    ///   [`BridgeError::EncryptionKeyTooLong`]
    /// - Any other open failure: [`BridgeError::InstanceCreationFailed`]
    ///
    /// The failure diagnosis order (empty identifier before oversized key)
    /// is a heuristic over a single opaque open failure, not a
    /// store-verified cause.
    pub fn create(config: InstanceConfig) -> BridgeResult<Self> {
        let mode = config.resolve_mode()?;

        // Empty optional fields mean "not provided"
        let path = config
            .path
            .as_ref()
            .filter(|p| !p.as_os_str().is_empty());
        let key = config
            .encryption_key
            .as_deref()
            .filter(|k| !k.is_empty());

        info!(
            id = %config.id,
            path = %path.map(|p| p.display().to_string()).unwrap_or_else(|| "<default>".to_string()),
            encrypted = key.is_some(),
            "creating store instance"
        );

        let mut options = OpenOptions::new(&config.id).mode(mode);
        if let Some(p) = path {
            options = options.path(p.clone());
        }
        if let Some(k) = key {
            options = options.key(k);
        }

        match Store::open(options) {
            Ok(store) => Ok(Self {
                id: config.id,
                store: RwLock::new(Some(store)),
            }),
            Err(e) => {
                warn!(id = %config.id, error = %e, "store open failed");
                if config.id.is_empty() {
                    Err(BridgeError::EmptyIdentifier)
                } else if let Some(k) = key.filter(|k| k.len() > MAX_KEY_LEN) {
                    Err(BridgeError::EncryptionKeyTooLong { len: k.len() })
                } else {
                    Err(BridgeError::InstanceCreationFailed { id: config.id })
                }
            }
        }
    }

    /// Returns the instance identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns true if the instance has not been destroyed.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.store.read().is_some()
    }

    /// Releases the underlying store.
    ///
    /// Idempotent: destroying an already-closed instance is a no-op. The
    /// engine's in-process memory cache is flushed before release so no
    /// stale cached reads persist past destruction.
    pub fn destroy(&self) {
        let mut guard = self.store.write();
        if let Some(store) = guard.take() {
            info!(id = %self.id, "destroying store instance");
            store.clear_memory_cache();
        }
    }

    /// Runs an operation against the open store.
    fn with_store<T>(&self, f: impl FnOnce(&Store) -> BridgeResult<T>) -> BridgeResult<T> {
        let guard = self.store.read();
        match guard.as_ref() {
            Some(store) => f(store),
            None => Err(BridgeError::InstanceClosed {
                id: self.id.clone(),
            }),
        }
    }

    /// Routes an untyped value to the correct typed store write.
    ///
    /// Dispatch precedence is fixed: boolean, number, string, buffer. Any
    /// other shape is rejected before the store is touched.
    pub fn set(&self, key: &str, value: &DynValue) -> BridgeResult<()> {
        self.with_store(|store| match value {
            DynValue::Bool(b) => Ok(store.set_bool(key, *b)?),
            DynValue::Number(n) => Ok(store.set_f64(key, *n)?),
            DynValue::String(s) => Ok(store.set_string(key, s)?),
            DynValue::Buffer(buffer) => Ok(store.set_bytes(key, buffer.as_slice())?),
            DynValue::Undefined | DynValue::Array(_) => {
                Err(BridgeError::UnsupportedValueType {
                    op: "set",
                    actual: value.shape_name(),
                })
            }
        })
    }

    /// Typed boolean lookup. `None` means absent or not a boolean.
    pub fn get_boolean(&self, key: &str) -> BridgeResult<Option<bool>> {
        self.with_store(|store| Ok(store.get_bool(key)?))
    }

    /// Typed number lookup. `None` means absent or not a number.
    pub fn get_number(&self, key: &str) -> BridgeResult<Option<f64>> {
        self.with_store(|store| Ok(store.get_f64(key)?))
    }

    /// Typed string lookup. `None` means absent or not a string.
    pub fn get_string(&self, key: &str) -> BridgeResult<Option<String>> {
        self.with_store(|store| Ok(store.get_string(key)?))
    }

    /// Binary lookup producing a shared view.
    ///
    /// The engine's returned bytes are moved into a reference-counted
    /// buffer, so the view outlives this call, later mutations of the key,
    /// and the instance itself. `None` means absent, never "zero-length".
    pub fn get_buffer(&self, key: &str) -> BridgeResult<Option<SharedBuffer>> {
        self.with_store(|store| {
            Ok(store.get_bytes(key)?.map(SharedBuffer::from_vec))
        })
    }

    /// Existence check independent of type.
    pub fn contains(&self, key: &str) -> BridgeResult<bool> {
        self.with_store(|store| Ok(store.contains_key(key)?))
    }

    /// Removes a key. Removing an absent key is a no-op.
    pub fn delete(&self, key: &str) -> BridgeResult<()> {
        self.with_store(|store| Ok(store.remove_key(key)?))
    }

    /// Returns all keys in store-defined order.
    pub fn get_all_keys(&self) -> BridgeResult<Vec<String>> {
        self.with_store(|store| Ok(store.all_keys()?))
    }

    /// Removes all entries.
    pub fn delete_all(&self) -> BridgeResult<()> {
        self.with_store(|store| Ok(store.clear_all()?))
    }

    /// Atomically re-keys the store. `None` transitions to unencrypted.
    pub fn recrypt(&self, new_key: Option<&str>) -> BridgeResult<()> {
        self.with_store(|store| Ok(store.re_key(new_key.map(str::as_bytes))?))
    }

    /// Flushes the memory cache and compacts the backing log.
    pub fn trim(&self) -> BridgeResult<()> {
        self.with_store(|store| {
            store.clear_memory_cache();
            Ok(store.trim()?)
        })
    }

    /// Reports the current logical size of the store. Read-only.
    pub fn size(&self) -> BridgeResult<u64> {
        self.with_store(|store| Ok(store.actual_size()))
    }
}

impl Drop for StoreInstance {
    fn drop(&mut self) {
        self.destroy();
    }
}

impl std::fmt::Debug for StoreInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreInstance")
            .field("id", &self.id)
            .field("open", &self.is_open())
            .finish()
    }
}
