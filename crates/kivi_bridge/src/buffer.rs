//! Shared, zero-copy binary views handed to the host.

use bytes::Bytes;

/// A reference-counted binary payload.
///
/// The backing storage is owned by the buffer itself (moved out of the
/// engine's returned bytes, never aliasing engine memory), and cloning
/// shares it instead of copying. A view stays valid and unchanged after the
/// originating key is deleted or overwritten, and after the instance that
/// produced it is destroyed: reads observe a snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SharedBuffer {
    bytes: Bytes,
}

impl SharedBuffer {
    /// Takes ownership of a byte vector without copying.
    #[must_use]
    pub fn from_vec(data: Vec<u8>) -> Self {
        Self {
            bytes: Bytes::from(data),
        }
    }

    /// Returns the payload as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns the payload length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns true if the payload is zero-length.
    ///
    /// A zero-length buffer is still a present value, distinct from "no
    /// value stored".
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Copies the payload into a fresh vector.
    #[must_use]
    pub fn to_vec(&self) -> Vec<u8> {
        self.bytes.to_vec()
    }
}

impl From<Vec<u8>> for SharedBuffer {
    fn from(data: Vec<u8>) -> Self {
        Self::from_vec(data)
    }
}

impl AsRef<[u8]> for SharedBuffer {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}
