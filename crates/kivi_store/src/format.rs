//! Log file format and record framing.
//!
//! A store is one append-log file:
//!
//! ```text
//! | magic (4) | version (2) | flags (1) |          <- file header
//! | type (1) | len (4) | body (N) | crc32 (4) |    <- record, repeated
//! ```
//!
//! The CRC covers the type byte and the body as stored on disk. When
//! encryption is enabled the body is sealed with AES-256-GCM before framing,
//! so the CRC protects the ciphertext.
//!
//! Record bodies:
//!
//! - `Put`: `key_len (2) | key | tag (1) | value bytes`
//! - `Remove`: `key_len (2) | key`
//! - `Clear`: empty
//!
//! A torn record at the tail of the log (incomplete header, short body, or
//! CRC mismatch) ends replay at the last good record rather than failing the
//! whole store.

use crate::crypto::Cipher;
use crate::error::{StoreError, StoreResult};
use crate::value::StoreValue;

/// Magic bytes identifying a Kivi store file.
pub const STORE_MAGIC: [u8; 4] = *b"KVST";

/// Current store format version.
pub const FORMAT_VERSION: u16 = 1;

/// Length of the file header in bytes.
pub(crate) const HEADER_LEN: usize = 7;

/// Header flag bit: record bodies are encrypted.
const FLAG_ENCRYPTED: u8 = 0b0000_0001;

/// Length of a record envelope prefix (type + body length).
const RECORD_PREFIX_LEN: usize = 5;

/// Maximum key length the framing can carry.
pub(crate) const MAX_KEY_BYTES: usize = u16::MAX as usize;

/// Maximum record body length the framing can carry.
const MAX_BODY_BYTES: u64 = u32::MAX as u64;

/// Type of log record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum RecordType {
    /// Insert or update a key.
    Put = 1,
    /// Remove a key.
    Remove = 2,
    /// Drop all entries.
    Clear = 3,
}

impl RecordType {
    /// Converts a byte to a record type.
    pub fn from_byte(b: u8) -> Option<Self> {
        match b {
            1 => Some(Self::Put),
            2 => Some(Self::Remove),
            3 => Some(Self::Clear),
            _ => None,
        }
    }

    /// Converts the record type to a byte.
    #[must_use]
    pub const fn as_byte(self) -> u8 {
        self as u8
    }
}

/// A log record representing one store mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    /// Insert or update a key.
    Put {
        /// The key being written.
        key: String,
        /// The typed value.
        value: StoreValue,
    },
    /// Remove a key.
    Remove {
        /// The key being removed.
        key: String,
    },
    /// Drop all entries.
    Clear,
}

impl Record {
    /// Returns the record type.
    #[must_use]
    pub fn record_type(&self) -> RecordType {
        match self {
            Self::Put { .. } => RecordType::Put,
            Self::Remove { .. } => RecordType::Remove,
            Self::Clear => RecordType::Clear,
        }
    }

    /// Serializes the record body (without envelope or encryption).
    fn encode_body(&self) -> StoreResult<Vec<u8>> {
        let mut buf = Vec::new();

        let push_key = |buf: &mut Vec<u8>, key: &str| -> StoreResult<()> {
            if key.len() > MAX_KEY_BYTES {
                return Err(StoreError::KeyTooLong {
                    len: key.len(),
                    max: MAX_KEY_BYTES,
                });
            }
            buf.extend_from_slice(&(key.len() as u16).to_le_bytes());
            buf.extend_from_slice(key.as_bytes());
            Ok(())
        };

        match self {
            Self::Put { key, value } => {
                push_key(&mut buf, key)?;
                value.encode(&mut buf);
            }
            Self::Remove { key } => push_key(&mut buf, key)?,
            Self::Clear => {}
        }

        Ok(buf)
    }

    /// Deserializes a record body.
    fn decode_body(record_type: RecordType, body: &[u8]) -> StoreResult<Self> {
        let mut cursor = 0;

        let read_key = |cursor: &mut usize| -> StoreResult<String> {
            if *cursor + 2 > body.len() {
                return Err(StoreError::invalid_format("unexpected end of key length"));
            }
            let len_bytes: [u8; 2] = body[*cursor..*cursor + 2]
                .try_into()
                .map_err(|_| StoreError::invalid_format("invalid key length"))?;
            *cursor += 2;
            let len = u16::from_le_bytes(len_bytes) as usize;

            if *cursor + len > body.len() {
                return Err(StoreError::invalid_format("unexpected end of key"));
            }
            let key = std::str::from_utf8(&body[*cursor..*cursor + len])
                .map_err(|_| StoreError::invalid_format("invalid UTF-8 in key"))?
                .to_string();
            *cursor += len;
            Ok(key)
        };

        match record_type {
            RecordType::Put => {
                let key = read_key(&mut cursor)?;
                let value = StoreValue::decode(&body[cursor..])?;
                Ok(Self::Put { key, value })
            }
            RecordType::Remove => {
                let key = read_key(&mut cursor)?;
                if cursor != body.len() {
                    return Err(StoreError::invalid_format(format!(
                        "trailing bytes in Remove record: expected {} bytes, got {}",
                        cursor,
                        body.len()
                    )));
                }
                Ok(Self::Remove { key })
            }
            RecordType::Clear => {
                if !body.is_empty() {
                    return Err(StoreError::invalid_format(
                        "trailing bytes in Clear record",
                    ));
                }
                Ok(Self::Clear)
            }
        }
    }
}

/// Encodes the file header.
pub(crate) fn encode_header(encrypted: bool) -> [u8; HEADER_LEN] {
    let mut header = [0u8; HEADER_LEN];
    header[..4].copy_from_slice(&STORE_MAGIC);
    header[4..6].copy_from_slice(&FORMAT_VERSION.to_le_bytes());
    header[6] = if encrypted { FLAG_ENCRYPTED } else { 0 };
    header
}

/// Validates the file header and returns the encrypted flag.
pub(crate) fn decode_header(buf: &[u8]) -> StoreResult<bool> {
    if buf.len() < HEADER_LEN {
        return Err(StoreError::invalid_format("file too short for header"));
    }
    if buf[..4] != STORE_MAGIC {
        return Err(StoreError::invalid_format("bad magic bytes"));
    }
    let version = u16::from_le_bytes([buf[4], buf[5]]);
    if version != FORMAT_VERSION {
        return Err(StoreError::invalid_format(format!(
            "unsupported format version {version}, expected {FORMAT_VERSION}"
        )));
    }
    Ok(buf[6] & FLAG_ENCRYPTED != 0)
}

/// Encodes a record into its on-disk envelope, sealing the body if a cipher
/// is provided.
pub(crate) fn encode_record(record: &Record, cipher: Option<&Cipher>) -> StoreResult<Vec<u8>> {
    let body = record.encode_body()?;
    let body = match cipher {
        Some(c) => c.seal(&body)?,
        None => body,
    };

    if body.len() as u64 > MAX_BODY_BYTES {
        return Err(StoreError::ValueTooLarge {
            len: body.len(),
            max: MAX_BODY_BYTES,
        });
    }

    let mut out = Vec::with_capacity(RECORD_PREFIX_LEN + body.len() + 4);
    out.push(record.record_type().as_byte());
    out.extend_from_slice(&(body.len() as u32).to_le_bytes());
    out.extend_from_slice(&body);

    let mut crc_input = Vec::with_capacity(1 + body.len());
    crc_input.push(record.record_type().as_byte());
    crc_input.extend_from_slice(&body);
    out.extend_from_slice(&compute_crc32(&crc_input).to_le_bytes());

    Ok(out)
}

/// Decodes the record starting at `offset`, opening the body if a cipher is
/// provided.
///
/// Returns `Ok(None)` at a clean end of log. Torn or corrupt data is an
/// error; callers decide whether to stop replay or fail.
pub(crate) fn decode_record(
    buf: &[u8],
    offset: usize,
    cipher: Option<&Cipher>,
) -> StoreResult<Option<(Record, usize)>> {
    if offset == buf.len() {
        return Ok(None);
    }
    if offset + RECORD_PREFIX_LEN > buf.len() {
        return Err(StoreError::invalid_format("truncated record header"));
    }

    let type_byte = buf[offset];
    let record_type = RecordType::from_byte(type_byte)
        .ok_or_else(|| StoreError::invalid_format(format!("unknown record type: {type_byte}")))?;

    let len_bytes: [u8; 4] = buf[offset + 1..offset + RECORD_PREFIX_LEN]
        .try_into()
        .map_err(|_| StoreError::invalid_format("invalid body length"))?;
    let body_len = u32::from_le_bytes(len_bytes) as usize;

    let body_start = offset + RECORD_PREFIX_LEN;
    let crc_start = body_start
        .checked_add(body_len)
        .ok_or_else(|| StoreError::invalid_format("body length overflow"))?;
    if crc_start + 4 > buf.len() {
        return Err(StoreError::invalid_format("truncated record body"));
    }

    let stored_crc = u32::from_le_bytes([
        buf[crc_start],
        buf[crc_start + 1],
        buf[crc_start + 2],
        buf[crc_start + 3],
    ]);

    let mut crc_input = Vec::with_capacity(1 + body_len);
    crc_input.push(type_byte);
    crc_input.extend_from_slice(&buf[body_start..crc_start]);
    let computed_crc = compute_crc32(&crc_input);

    if stored_crc != computed_crc {
        return Err(StoreError::ChecksumMismatch {
            expected: stored_crc,
            actual: computed_crc,
        });
    }

    let body = match cipher {
        Some(c) => c.open(&buf[body_start..crc_start])?,
        None => buf[body_start..crc_start].to_vec(),
    };

    let record = Record::decode_body(record_type, &body)?;
    Ok(Some((record, crc_start + 4)))
}

/// Computes CRC32 checksum for data.
pub fn compute_crc32(data: &[u8]) -> u32 {
    // CRC32, IEEE polynomial
    const CRC32_TABLE: [u32; 256] = {
        let mut table = [0u32; 256];
        let mut i = 0;
        while i < 256 {
            let mut crc = i as u32;
            let mut j = 0;
            while j < 8 {
                if crc & 1 != 0 {
                    crc = (crc >> 1) ^ 0xEDB8_8320;
                } else {
                    crc >>= 1;
                }
                j += 1;
            }
            table[i] = crc;
            i += 1;
        }
        table
    };

    let mut crc = 0xFFFF_FFFF_u32;
    for &byte in data {
        let index = ((crc ^ u32::from(byte)) & 0xFF) as usize;
        crc = (crc >> 8) ^ CRC32_TABLE[index];
    }
    !crc
}
