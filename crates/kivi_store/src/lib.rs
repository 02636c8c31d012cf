//! # Kivi Store
//!
//! Persistent, typed key-value engine for Kivi.
//!
//! A store is a single append-log file holding CRC-framed records, replayed
//! into an in-memory map on open. Values are typed (boolean, 64-bit float,
//! UTF-8 string, raw bytes) and keyed by strings. Optional encryption at rest
//! seals each record with AES-256-GCM.
//!
//! ## Design Principles
//!
//! - Typed reads report presence via `Option`: `None` means the key is absent
//!   or holds a different type, never "the zero value of this type"
//! - Re-keying rewrites the whole log atomically (temp file + rename)
//! - `trim` compacts superseded records without deleting live entries
//! - Advisory file locks guard single- vs multi-process access
//!
//! ## Example
//!
//! ```no_run
//! use kivi_store::{OpenOptions, Store};
//!
//! let store = Store::open(OpenOptions::new("settings"))?;
//! store.set_string("greeting", "hello")?;
//! assert_eq!(store.get_string("greeting")?, Some("hello".to_string()));
//! # Ok::<(), kivi_store::StoreError>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod crypto;
mod error;
mod format;
mod store;
mod value;

pub use crypto::{Cipher, EncryptionKey, MAX_KEY_LEN};
pub use error::{StoreError, StoreResult};
pub use format::{compute_crc32, Record, RecordType, FORMAT_VERSION, STORE_MAGIC};
pub use store::{OpenOptions, ProcessMode, Store, DEFAULT_DIR, DEFAULT_MAP_SIZE};
pub use value::StoreValue;
