// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Local encryption for the stored bearer token.
//!
//! AES-256-GCM with a key derived from a configured secret via HKDF-SHA256.
//! Ciphertext is `base64(nonce || sealed)`; the caller supplies associated
//! data that binds the ciphertext to its storage key.

use crate::error::StorageError;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use hkdf::Hkdf;
use ring::aead::{Aad, LessSafeKey, Nonce, UnboundKey, AES_256_GCM, NONCE_LEN};
use ring::rand::{SecureRandom, SystemRandom};
use sha2::Sha256;

const KEY_SALT: &[u8] = b"imagefeed-token-store";
const KEY_INFO: &[u8] = b"bearer-token:v1";

/// Token encryption service.
pub struct TokenCipher {
    key: LessSafeKey,
    rng: SystemRandom,
}

impl TokenCipher {
    /// Derive the encryption key from `secret`.
    pub fn from_secret(secret: &str) -> Result<Self, StorageError> {
        if secret.is_empty() {
            return Err(StorageError::Crypto("token store secret is empty".to_string()));
        }

        let hk = Hkdf::<Sha256>::new(Some(KEY_SALT), secret.as_bytes());
        let mut okm = [0u8; 32];
        hk.expand(KEY_INFO, &mut okm)
            .map_err(|e| StorageError::Crypto(format!("key derivation failed: {}", e)))?;

        let unbound = UnboundKey::new(&AES_256_GCM, &okm)
            .map_err(|_| StorageError::Crypto("invalid AES-256-GCM key".to_string()))?;

        Ok(Self {
            key: LessSafeKey::new(unbound),
            rng: SystemRandom::new(),
        })
    }

    /// Encrypt plaintext. Returns base64-encoded ciphertext.
    pub fn encrypt(&self, plaintext: &str, aad: &[u8]) -> Result<String, StorageError> {
        let mut nonce_bytes = [0u8; NONCE_LEN];
        self.rng
            .fill(&mut nonce_bytes)
            .map_err(|_| StorageError::Crypto("nonce generation failed".to_string()))?;

        let mut in_out = plaintext.as_bytes().to_vec();
        self.key
            .seal_in_place_append_tag(
                Nonce::assume_unique_for_key(nonce_bytes),
                Aad::from(aad),
                &mut in_out,
            )
            .map_err(|_| StorageError::Crypto("encrypt failed".to_string()))?;

        let mut sealed = nonce_bytes.to_vec();
        sealed.extend_from_slice(&in_out);
        Ok(BASE64.encode(sealed))
    }

    /// Decrypt base64 ciphertext produced by [`TokenCipher::encrypt`].
    ///
    /// Fails on a wrong key, wrong associated data or tampered bytes.
    pub fn decrypt(&self, ciphertext_b64: &str, aad: &[u8]) -> Result<String, StorageError> {
        let sealed = BASE64
            .decode(ciphertext_b64)
            .map_err(|e| StorageError::Corrupt(format!("base64 decode failed: {}", e)))?;

        if sealed.len() < NONCE_LEN + AES_256_GCM.tag_len() {
            return Err(StorageError::Corrupt("ciphertext too short".to_string()));
        }

        let (nonce_bytes, body) = sealed.split_at(NONCE_LEN);
        let nonce = Nonce::try_assume_unique_for_key(nonce_bytes)
            .map_err(|_| StorageError::Corrupt("bad nonce".to_string()))?;

        let mut in_out = body.to_vec();
        let plaintext = self
            .key
            .open_in_place(nonce, Aad::from(aad), &mut in_out)
            .map_err(|_| StorageError::Crypto("decrypt failed".to_string()))?;

        String::from_utf8(plaintext.to_vec())
            .map_err(|e| StorageError::Corrupt(format!("UTF-8 decode failed: {}", e)))
    }
}
