//! Typed values stored in the engine.

use crate::error::{StoreError, StoreResult};

/// Tag byte for a boolean payload.
const TAG_BOOL: u8 = 1;
/// Tag byte for a 64-bit float payload.
const TAG_F64: u8 = 2;
/// Tag byte for a UTF-8 string payload.
const TAG_STR: u8 = 3;
/// Tag byte for a raw bytes payload.
const TAG_BYTES: u8 = 4;

/// A typed value held by the store.
///
/// The store is strongly typed: a key holds exactly one of these shapes, and
/// a typed lookup for a different shape reports absence rather than coercing.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreValue {
    /// Boolean.
    Bool(bool),
    /// 64-bit floating point number.
    F64(f64),
    /// UTF-8 string.
    Str(String),
    /// Raw byte payload.
    Bytes(Vec<u8>),
}

impl StoreValue {
    /// Returns a short name for the value's type, for diagnostics.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "boolean",
            Self::F64(_) => "number",
            Self::Str(_) => "string",
            Self::Bytes(_) => "bytes",
        }
    }

    /// Appends the tagged payload encoding to `buf`.
    ///
    /// Layout: `tag (1) | value bytes`. The value occupies the remainder of
    /// the record body, so no inner length prefix is needed.
    pub fn encode(&self, buf: &mut Vec<u8>) {
        match self {
            Self::Bool(b) => {
                buf.push(TAG_BOOL);
                buf.push(u8::from(*b));
            }
            Self::F64(n) => {
                buf.push(TAG_F64);
                buf.extend_from_slice(&n.to_le_bytes());
            }
            Self::Str(s) => {
                buf.push(TAG_STR);
                buf.extend_from_slice(s.as_bytes());
            }
            Self::Bytes(b) => {
                buf.push(TAG_BYTES);
                buf.extend_from_slice(b);
            }
        }
    }

    /// Decodes a tagged payload produced by [`encode`](Self::encode).
    pub fn decode(payload: &[u8]) -> StoreResult<Self> {
        let (&tag, rest) = payload
            .split_first()
            .ok_or_else(|| StoreError::invalid_format("empty value payload"))?;

        match tag {
            TAG_BOOL => match rest {
                [0] => Ok(Self::Bool(false)),
                [1] => Ok(Self::Bool(true)),
                _ => Err(StoreError::invalid_format("malformed boolean payload")),
            },
            TAG_F64 => {
                let bytes: [u8; 8] = rest
                    .try_into()
                    .map_err(|_| StoreError::invalid_format("malformed number payload"))?;
                Ok(Self::F64(f64::from_le_bytes(bytes)))
            }
            TAG_STR => {
                let s = std::str::from_utf8(rest)
                    .map_err(|_| StoreError::invalid_format("invalid UTF-8 in string payload"))?;
                Ok(Self::Str(s.to_string()))
            }
            TAG_BYTES => Ok(Self::Bytes(rest.to_vec())),
            other => Err(StoreError::invalid_format(format!(
                "unknown value tag: {other}"
            ))),
        }
    }
}
