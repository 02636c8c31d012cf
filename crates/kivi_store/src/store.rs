//! Store facade: open, replay, typed access, re-key, and compaction.

use crate::crypto::{Cipher, EncryptionKey};
use crate::error::{StoreError, StoreResult};
use crate::format::{self, Record, HEADER_LEN};
use crate::value::StoreValue;
use fs2::FileExt;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fs::{self, File, OpenOptions as FileOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Default directory for store files when no path override is given.
pub const DEFAULT_DIR: &str = "kivi";

/// Default map size hint in bytes.
///
/// Used as the initial replay buffer capacity on platforms where the caller
/// does not negotiate a size.
pub const DEFAULT_MAP_SIZE: u64 = 4 * 1024 * 1024;

/// Whether a store file may be opened by more than one process at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProcessMode {
    /// Exclusive access: this process holds an exclusive advisory lock.
    #[default]
    SingleProcess,
    /// Shared access: cross-process coordination is delegated to the
    /// advisory lock protocol.
    MultiProcess,
}

/// Options for opening a store.
///
/// # Example
///
/// ```no_run
/// use kivi_store::{OpenOptions, ProcessMode, Store};
///
/// let store = Store::open(
///     OpenOptions::new("settings")
///         .mode(ProcessMode::SingleProcess)
///         .key(b"secret"),
/// )?;
/// # Ok::<(), kivi_store::StoreError>(())
/// ```
#[derive(Debug, Clone)]
pub struct OpenOptions {
    /// Store identifier; names the files on disk.
    pub id: String,
    /// Process sharing mode.
    pub mode: ProcessMode,
    /// Replay buffer size hint.
    pub map_size_hint: u64,
    /// Encryption key bytes. Empty or absent means unencrypted.
    pub key: Option<Vec<u8>>,
    /// Directory override. Absent means [`DEFAULT_DIR`].
    pub path: Option<PathBuf>,
}

impl OpenOptions {
    /// Creates options for the given store identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            mode: ProcessMode::default(),
            map_size_hint: DEFAULT_MAP_SIZE,
            key: None,
            path: None,
        }
    }

    /// Sets the process sharing mode.
    #[must_use]
    pub fn mode(mut self, mode: ProcessMode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets the replay buffer size hint.
    #[must_use]
    pub fn map_size_hint(mut self, hint: u64) -> Self {
        self.map_size_hint = hint;
        self
    }

    /// Sets the encryption key.
    #[must_use]
    pub fn key(mut self, key: &[u8]) -> Self {
        self.key = Some(key.to_vec());
        self
    }

    /// Sets the directory holding the store files.
    #[must_use]
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }
}

/// Interior state guarded by one lock so re-keying swaps the cipher and the
/// log file as a single step.
struct Inner {
    file: File,
    size: u64,
    cipher: Option<Cipher>,
    map: Option<HashMap<String, StoreValue>>,
}

/// A persistent, typed, string-keyed key-value store.
///
/// One store is one append-log file plus an advisory lock file. All entries
/// live in an in-memory map rebuilt from the log on open (or lazily after
/// [`clear_memory_cache`](Store::clear_memory_cache)).
///
/// # Thread Safety
///
/// The store serializes its own operations internally; callers coordinating
/// multiple handles to the same identifier rely on the advisory lock
/// protocol selected by [`ProcessMode`].
pub struct Store {
    id: String,
    log_path: PathBuf,
    map_size_hint: u64,
    inner: RwLock<Inner>,
    /// Advisory lock, held for the lifetime of the handle.
    _lock: File,
}

impl Store {
    /// Opens or creates a store.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The identifier is empty or contains path separators
    /// - The encryption key has an unsupported length
    /// - The advisory lock is already held (`LockHeld`)
    /// - The file header is malformed (`InvalidFormat`)
    /// - I/O errors occur
    pub fn open(options: OpenOptions) -> StoreResult<Self> {
        if options.id.is_empty() {
            return Err(StoreError::EmptyId);
        }
        if options.id.contains(['/', '\\']) {
            return Err(StoreError::invalid_format(
                "store identifier must not contain path separators",
            ));
        }

        let cipher = match options.key.as_deref() {
            None | Some(&[]) => None,
            Some(bytes) => Some(Cipher::new(&EncryptionKey::new(bytes)?)?),
        };

        let dir = options
            .path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DIR));
        fs::create_dir_all(&dir)?;

        let lock = Self::acquire_lock(&dir, &options.id, options.mode)?;

        let log_path = dir.join(format!("{}.kv", options.id));
        let mut file = FileOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&log_path)?;

        let mut size = file.metadata()?.len();
        if size == 0 {
            file.write_all(&format::encode_header(cipher.is_some()))?;
            size = HEADER_LEN as u64;
        } else {
            let mut header = [0u8; HEADER_LEN];
            file.seek(SeekFrom::Start(0))?;
            file.read_exact(&mut header)?;
            let encrypted = format::decode_header(&header)?;
            if encrypted != cipher.is_some() {
                warn!(
                    id = %options.id,
                    file_encrypted = encrypted,
                    key_provided = cipher.is_some(),
                    "encryption flag mismatch; existing records will not be readable"
                );
            }
        }

        debug!(
            id = %options.id,
            path = %log_path.display(),
            encrypted = cipher.is_some(),
            mode = ?options.mode,
            "opened store"
        );

        let store = Self {
            id: options.id,
            log_path,
            map_size_hint: options.map_size_hint,
            inner: RwLock::new(Inner {
                file,
                size,
                cipher,
                map: None,
            }),
            _lock: lock,
        };

        // Eager replay so open surfaces I/O problems immediately
        {
            let mut inner = store.inner.write();
            store.ensure_map(&mut inner)?;
        }

        Ok(store)
    }

    /// Acquires the advisory lock for the given mode.
    fn acquire_lock(dir: &Path, id: &str, mode: ProcessMode) -> StoreResult<File> {
        let lock_path = dir.join(format!("{id}.lock"));
        let lock = FileOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;

        // Trait-qualified: newer toolchains add inherent `File` locking
        // methods that would otherwise shadow the fs2 ones.
        let acquired = match mode {
            ProcessMode::SingleProcess => FileExt::try_lock_exclusive(&lock),
            ProcessMode::MultiProcess => FileExt::try_lock_shared(&lock),
        };
        if acquired.is_err() {
            return Err(StoreError::LockHeld { id: id.to_string() });
        }
        Ok(lock)
    }

    /// Returns the store identifier.
    #[must_use]
    pub fn store_id(&self) -> &str {
        &self.id
    }

    /// Returns the current size of the log file in bytes.
    #[must_use]
    pub fn actual_size(&self) -> u64 {
        self.inner.read().size
    }

    /// Stores a boolean.
    pub fn set_bool(&self, key: &str, value: bool) -> StoreResult<()> {
        self.put(key, StoreValue::Bool(value))
    }

    /// Stores a 64-bit float.
    pub fn set_f64(&self, key: &str, value: f64) -> StoreResult<()> {
        self.put(key, StoreValue::F64(value))
    }

    /// Stores a UTF-8 string.
    pub fn set_string(&self, key: &str, value: &str) -> StoreResult<()> {
        self.put(key, StoreValue::Str(value.to_string()))
    }

    /// Stores raw bytes.
    pub fn set_bytes(&self, key: &str, value: &[u8]) -> StoreResult<()> {
        self.put(key, StoreValue::Bytes(value.to_vec()))
    }

    /// Looks up a boolean.
    ///
    /// Returns `None` if the key is absent or holds a different type.
    pub fn get_bool(&self, key: &str) -> StoreResult<Option<bool>> {
        Ok(match self.get_value(key)? {
            Some(StoreValue::Bool(b)) => Some(b),
            _ => None,
        })
    }

    /// Looks up a 64-bit float.
    ///
    /// Returns `None` if the key is absent or holds a different type.
    pub fn get_f64(&self, key: &str) -> StoreResult<Option<f64>> {
        Ok(match self.get_value(key)? {
            Some(StoreValue::F64(n)) => Some(n),
            _ => None,
        })
    }

    /// Looks up a string.
    ///
    /// Returns `None` if the key is absent or holds a different type.
    pub fn get_string(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(match self.get_value(key)? {
            Some(StoreValue::Str(s)) => Some(s),
            _ => None,
        })
    }

    /// Looks up raw bytes.
    ///
    /// Returns `None` if the key is absent or holds a different type. A
    /// stored zero-length payload is `Some(empty)`, not `None`.
    pub fn get_bytes(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        Ok(match self.get_value(key)? {
            Some(StoreValue::Bytes(b)) => Some(b),
            _ => None,
        })
    }

    /// Returns true if the key holds a value of any type.
    pub fn contains_key(&self, key: &str) -> StoreResult<bool> {
        Ok(self.get_value(key)?.is_some())
    }

    /// Removes a key. Removing an absent key is a no-op.
    pub fn remove_key(&self, key: &str) -> StoreResult<()> {
        let mut inner = self.inner.write();
        self.ensure_map(&mut inner)?;

        let present = inner
            .map
            .as_ref()
            .is_some_and(|map| map.contains_key(key));
        if !present {
            return Ok(());
        }

        let record = Record::Remove {
            key: key.to_string(),
        };
        Self::append_record(&mut inner, &record)?;
        if let Some(map) = inner.map.as_mut() {
            map.remove(key);
        }
        Ok(())
    }

    /// Returns all keys, in store-defined order.
    pub fn all_keys(&self) -> StoreResult<Vec<String>> {
        let mut inner = self.inner.write();
        self.ensure_map(&mut inner)?;
        Ok(inner
            .map
            .as_ref()
            .map(|map| map.keys().cloned().collect())
            .unwrap_or_default())
    }

    /// Removes all entries and shrinks the log back to its header.
    pub fn clear_all(&self) -> StoreResult<()> {
        let mut inner = self.inner.write();

        inner.file.set_len(0)?;
        inner.file.seek(SeekFrom::Start(0))?;
        let header = format::encode_header(inner.cipher.is_some());
        inner.file.write_all(&header)?;
        inner.file.sync_all()?;
        inner.size = HEADER_LEN as u64;
        inner.map = Some(HashMap::new());

        debug!(id = %self.id, "cleared all entries");
        Ok(())
    }

    /// Atomically re-encrypts the store under a new key.
    ///
    /// `None` or an empty key transitions the store to unencrypted. The log
    /// is rewritten to a temp file and renamed into place; readers of this
    /// handle observe either the old state or the new, never a partial one.
    pub fn re_key(&self, new_key: Option<&[u8]>) -> StoreResult<()> {
        let new_cipher = match new_key {
            None | Some(&[]) => None,
            Some(bytes) => Some(Cipher::new(&EncryptionKey::new(bytes)?)?),
        };

        let mut inner = self.inner.write();
        self.ensure_map(&mut inner)?;
        self.rewrite_log(&mut inner, new_cipher)?;

        debug!(
            id = %self.id,
            encrypted = inner.cipher.is_some(),
            "re-keyed store"
        );
        Ok(())
    }

    /// Compacts the log, dropping superseded records. Deletes no entries.
    pub fn trim(&self) -> StoreResult<()> {
        let mut inner = self.inner.write();
        self.ensure_map(&mut inner)?;

        let before = inner.size;
        let cipher = inner.cipher.clone();
        self.rewrite_log(&mut inner, cipher)?;

        debug!(
            id = %self.id,
            before_bytes = before,
            after_bytes = inner.size,
            "trimmed store"
        );
        Ok(())
    }

    /// Drops the in-memory map. The next access replays the log.
    pub fn clear_memory_cache(&self) {
        let mut inner = self.inner.write();
        inner.map = None;
        debug!(id = %self.id, "cleared memory cache");
    }

    /// Writes a typed value for a key.
    fn put(&self, key: &str, value: StoreValue) -> StoreResult<()> {
        let mut inner = self.inner.write();
        self.ensure_map(&mut inner)?;

        let record = Record::Put {
            key: key.to_string(),
            value: value.clone(),
        };
        Self::append_record(&mut inner, &record)?;
        if let Some(map) = inner.map.as_mut() {
            map.insert(key.to_string(), value);
        }
        Ok(())
    }

    /// Looks up the typed value for a key.
    fn get_value(&self, key: &str) -> StoreResult<Option<StoreValue>> {
        let mut inner = self.inner.write();
        self.ensure_map(&mut inner)?;
        Ok(inner
            .map
            .as_ref()
            .and_then(|map| map.get(key))
            .cloned())
    }

    /// Appends an encoded record to the log.
    fn append_record(inner: &mut Inner, record: &Record) -> StoreResult<()> {
        let bytes = format::encode_record(record, inner.cipher.as_ref())?;
        inner.file.seek(SeekFrom::End(0))?;
        inner.file.write_all(&bytes)?;
        inner.size += bytes.len() as u64;
        Ok(())
    }

    /// Rebuilds the in-memory map from the log if it was dropped.
    ///
    /// A torn or unreadable record (corrupt tail, wrong or missing key) ends
    /// replay at the last good record. The log is then rewritten to exactly
    /// the recovered state: appending behind undecodable records would strand
    /// the new writes, since a later replay stops before reaching them.
    fn ensure_map(&self, inner: &mut Inner) -> StoreResult<()> {
        if inner.map.is_some() {
            return Ok(());
        }

        let mut buf = Vec::with_capacity(self.map_size_hint.min(inner.size) as usize);
        inner.file.seek(SeekFrom::Start(0))?;
        inner.file.read_to_end(&mut buf)?;

        let mut map = HashMap::new();
        let mut offset = HEADER_LEN.min(buf.len());
        let mut unreadable = false;
        loop {
            match format::decode_record(&buf, offset, inner.cipher.as_ref()) {
                Ok(Some((record, next))) => {
                    match record {
                        Record::Put { key, value } => {
                            map.insert(key, value);
                        }
                        Record::Remove { key } => {
                            map.remove(&key);
                        }
                        Record::Clear => map.clear(),
                    }
                    offset = next;
                }
                Ok(None) => break,
                Err(e) => {
                    warn!(
                        id = %self.id,
                        offset,
                        error = %e,
                        "dropping unreadable log suffix"
                    );
                    unreadable = true;
                    break;
                }
            }
        }

        inner.map = Some(map);

        if unreadable {
            let cipher = inner.cipher.clone();
            self.rewrite_log(inner, cipher)?;
            warn!(
                id = %self.id,
                size = inner.size,
                "rewrote log after recovery"
            );
        }
        Ok(())
    }

    /// Rewrites the log with only live records under `new_cipher`, then
    /// swaps it into place.
    fn rewrite_log(&self, inner: &mut Inner, new_cipher: Option<Cipher>) -> StoreResult<()> {
        let tmp_path = self.log_path.with_extension("kv.tmp");
        let mut tmp = FileOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(&tmp_path)?;

        let header = format::encode_header(new_cipher.is_some());
        tmp.write_all(&header)?;
        let mut size = header.len() as u64;
        if let Some(map) = inner.map.as_ref() {
            for (key, value) in map {
                let record = Record::Put {
                    key: key.clone(),
                    value: value.clone(),
                };
                let bytes = format::encode_record(&record, new_cipher.as_ref())?;
                tmp.write_all(&bytes)?;
                size += bytes.len() as u64;
            }
        }
        tmp.sync_all()?;

        // The rename does not invalidate the descriptor: the same handle
        // keeps addressing the log after the swap, so no fallible step
        // remains between the swap and the state update.
        fs::rename(&tmp_path, &self.log_path)?;
        inner.file = tmp;
        inner.size = size;
        inner.cipher = new_cipher;
        Ok(())
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("id", &self.id)
            .field("log_path", &self.log_path)
            .finish_non_exhaustive()
    }
}
