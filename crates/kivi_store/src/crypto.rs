//! Encryption at rest using AES-256-GCM.
//!
//! User keys are short secrets (1 to 16 bytes); the actual cipher key is
//! derived from them with HKDF-SHA256. Each record body is sealed
//! independently: `nonce (12 bytes) || ciphertext || tag (16 bytes)`.
//! Keys are zeroized on drop.

use crate::error::{StoreError, StoreResult};
use aes_gcm::{
    aead::{generic_array::GenericArray, Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use rand::RngCore;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Maximum length of a user-supplied encryption key, in bytes.
pub const MAX_KEY_LEN: usize = 16;

/// Size of the derived AES-256 key in bytes.
const CIPHER_KEY_SIZE: usize = 32;
/// Size of the GCM nonce in bytes.
pub(crate) const NONCE_SIZE: usize = 12;
/// Size of the GCM authentication tag in bytes.
pub(crate) const TAG_SIZE: usize = 16;

/// A user-supplied encryption key.
///
/// The key is automatically zeroized when dropped.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct EncryptionKey {
    bytes: Vec<u8>,
}

impl EncryptionKey {
    /// Creates a key from user-supplied bytes.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidKeyLength`] if the slice is empty or
    /// longer than [`MAX_KEY_LEN`].
    pub fn new(bytes: &[u8]) -> StoreResult<Self> {
        if bytes.is_empty() || bytes.len() > MAX_KEY_LEN {
            return Err(StoreError::InvalidKeyLength {
                len: bytes.len(),
                max: MAX_KEY_LEN,
            });
        }
        Ok(Self {
            bytes: bytes.to_vec(),
        })
    }

    /// Derives the 32-byte cipher key with HKDF-SHA256.
    fn derive(&self) -> StoreResult<[u8; CIPHER_KEY_SIZE]> {
        use hkdf::Hkdf;
        use sha2::Sha256;

        let hk = Hkdf::<Sha256>::new(Some(b"kivi-store-salt-v1"), &self.bytes);
        let mut out = [0u8; CIPHER_KEY_SIZE];
        hk.expand(b"kivi-record-key-v1", &mut out)
            .map_err(|_| StoreError::encryption("HKDF expand failed"))?;
        Ok(out)
    }
}

impl std::fmt::Debug for EncryptionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncryptionKey")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// Seals and opens record bodies with AES-256-GCM.
#[derive(Clone)]
pub struct Cipher {
    aead: Aes256Gcm,
}

impl Cipher {
    /// Creates a cipher from a user key.
    ///
    /// # Errors
    ///
    /// Returns an error if key derivation fails.
    pub fn new(key: &EncryptionKey) -> StoreResult<Self> {
        let mut derived = key.derive()?;
        let aead = Aes256Gcm::new(GenericArray::from_slice(&derived));
        derived.zeroize();
        Ok(Self { aead })
    }

    /// Seals a plaintext record body.
    ///
    /// Output layout: `nonce (12 bytes) || ciphertext || tag (16 bytes)`.
    pub fn seal(&self, plaintext: &[u8]) -> StoreResult<Vec<u8>> {
        let mut nonce = [0u8; NONCE_SIZE];
        rand::thread_rng().fill_bytes(&mut nonce);

        let ciphertext = self
            .aead
            .encrypt(Nonce::from_slice(&nonce), plaintext)
            .map_err(|_| StoreError::encryption("AES-GCM encryption failed"))?;

        let mut out = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
        out.extend_from_slice(&nonce);
        out.extend_from_slice(&ciphertext);
        Ok(out)
    }

    /// Opens a sealed record body.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is too short or authentication fails
    /// (tampered data or wrong key).
    pub fn open(&self, sealed: &[u8]) -> StoreResult<Vec<u8>> {
        if sealed.len() < NONCE_SIZE + TAG_SIZE {
            return Err(StoreError::encryption("sealed body too short"));
        }
        let (nonce, ciphertext) = sealed.split_at(NONCE_SIZE);
        self.aead
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|_| StoreError::encryption("authentication failed"))
    }
}

impl std::fmt::Debug for Cipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cipher").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seal_open_roundtrip() {
        let key = EncryptionKey::new(b"hunter2").unwrap();
        let cipher = Cipher::new(&key).unwrap();

        let sealed = cipher.seal(b"record body").unwrap();
        assert_ne!(&sealed[NONCE_SIZE..], b"record body");

        let opened = cipher.open(&sealed).unwrap();
        assert_eq!(opened, b"record body");
    }

    #[test]
    fn tampered_body_fails() {
        let key = EncryptionKey::new(b"hunter2").unwrap();
        let cipher = Cipher::new(&key).unwrap();

        let mut sealed = cipher.seal(b"record body").unwrap();
        sealed[NONCE_SIZE + 1] ^= 0xFF;

        assert!(cipher.open(&sealed).is_err());
    }

    #[test]
    fn wrong_key_fails() {
        let cipher1 = Cipher::new(&EncryptionKey::new(b"key-one").unwrap()).unwrap();
        let cipher2 = Cipher::new(&EncryptionKey::new(b"key-two").unwrap()).unwrap();

        let sealed = cipher1.seal(b"secret").unwrap();
        assert!(cipher2.open(&sealed).is_err());
    }

    #[test]
    fn empty_key_rejected() {
        let result = EncryptionKey::new(b"");
        assert!(matches!(
            result,
            Err(StoreError::InvalidKeyLength { len: 0, .. })
        ));
    }

    #[test]
    fn oversized_key_rejected() {
        let result = EncryptionKey::new(&[0x41; 17]);
        assert!(matches!(
            result,
            Err(StoreError::InvalidKeyLength { len: 17, .. })
        ));
    }

    #[test]
    fn max_length_key_accepted() {
        assert!(EncryptionKey::new(&[0x41; MAX_KEY_LEN]).is_ok());
    }

    #[test]
    fn nonces_are_unique() {
        let key = EncryptionKey::new(b"hunter2").unwrap();
        let cipher = Cipher::new(&key).unwrap();

        let a = cipher.seal(b"same plaintext").unwrap();
        let b = cipher.seal(b"same plaintext").unwrap();
        assert_ne!(a[..NONCE_SIZE], b[..NONCE_SIZE]);
    }

    #[test]
    fn debug_redacts_key() {
        let key = EncryptionKey::new(b"hunter2").unwrap();
        let debug = format!("{key:?}");
        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains("hunter2"));
    }
}
