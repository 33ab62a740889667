//! # Password encryption
//!
//! Staff passwords are stored encrypted with XChaCha20-Poly1305 under a
//! server-held key, encoded as `hex(nonce || ciphertext)`. Login decrypts the
//! stored value and compares it with the submitted password.

use branch_desk_api::{ApiError, ApiResult};
use chacha20poly1305::{
    aead::{Aead, KeyInit},
    XChaCha20Poly1305, XNonce,
};
use zeroize::Zeroize;

const NONCE_LEN: usize = 24;

/// Opaque encrypt/decrypt capability for stored passwords
pub trait PasswordCipher: Send + Sync {
    fn encrypt(&self, plaintext: &str) -> ApiResult<String>;

    fn decrypt(&self, ciphertext: &str) -> ApiResult<String>;

    /// `false` for a wrong password and for undecryptable stored values alike
    fn verify(&self, stored: &str, candidate: &str) -> bool {
        match self.decrypt(stored) {
            Ok(mut plaintext) => {
                let matches = plaintext == candidate;
                plaintext.zeroize();
                matches
            }
            Err(_) => false,
        }
    }
}

/// Secret key (256-bit).
#[derive(Clone, Zeroize)]
#[zeroize(drop)]
pub struct SecretKey([u8; 32]);

impl SecretKey {
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Parses 64 hex characters
    pub fn from_hex(encoded: &str) -> ApiResult<Self> {
        let mut decoded = hex::decode(encoded.trim())
            .map_err(|e| ApiError::CryptoError(format!("Invalid key encoding: {e}")))?;
        let bytes: [u8; 32] = decoded
            .as_slice()
            .try_into()
            .map_err(|_| ApiError::CryptoError("Key must be 32 bytes".to_string()))?;
        decoded.zeroize();
        Ok(Self(bytes))
    }

    pub fn generate() -> Self {
        let mut bytes = [0u8; 32];
        rand::RngCore::fill_bytes(&mut rand::thread_rng(), &mut bytes);
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

pub struct XChaChaPasswordCipher {
    key: SecretKey,
}

impl XChaChaPasswordCipher {
    pub fn new(key: SecretKey) -> Self {
        Self { key }
    }

    fn cipher(&self) -> XChaCha20Poly1305 {
        XChaCha20Poly1305::new(self.key.as_bytes().into())
    }
}

impl PasswordCipher for XChaChaPasswordCipher {
    fn encrypt(&self, plaintext: &str) -> ApiResult<String> {
        let mut nonce = [0u8; NONCE_LEN];
        rand::RngCore::fill_bytes(&mut rand::thread_rng(), &mut nonce);

        let ciphertext = self
            .cipher()
            .encrypt(XNonce::from_slice(&nonce), plaintext.as_bytes())
            .map_err(|e| ApiError::CryptoError(format!("Encryption failed: {e}")))?;

        let mut sealed = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        sealed.extend_from_slice(&nonce);
        sealed.extend_from_slice(&ciphertext);
        Ok(hex::encode(sealed))
    }

    fn decrypt(&self, ciphertext: &str) -> ApiResult<String> {
        let sealed = hex::decode(ciphertext)
            .map_err(|e| ApiError::CryptoError(format!("Invalid ciphertext encoding: {e}")))?;
        if sealed.len() <= NONCE_LEN {
            return Err(ApiError::CryptoError("Ciphertext too short".to_string()));
        }
        let (nonce, body) = sealed.split_at(NONCE_LEN);

        let plaintext = self
            .cipher()
            .decrypt(XNonce::from_slice(nonce), body)
            .map_err(|e| ApiError::CryptoError(format!("Decryption failed: {e}")))?;
        String::from_utf8(plaintext).map_err(|_| ApiError::CryptoError("Plaintext is not UTF-8".to_string()))
    }
}
