// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Persistence of the single bearer credential.

use crate::error::StorageError;
use crate::models::BearerToken;
use crate::services::cipher::TokenCipher;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Well-known key the bearer token is stored under.
pub const TOKEN_KEY: &str = "bearerToken";

/// Key-value persistence for the bearer credential.
///
/// `store` and `remove` report failure explicitly. After a failed
/// `remove` the credential state is unknown.
pub trait TokenStore {
    fn store(&self, token: &BearerToken) -> Result<(), StorageError>;
    fn load(&self) -> Result<Option<BearerToken>, StorageError>;
    fn remove(&self) -> Result<(), StorageError>;
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryTokenStore {
    token: RefCell<Option<BearerToken>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with `token`.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RefCell::new(Some(BearerToken::new(token))),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn store(&self, token: &BearerToken) -> Result<(), StorageError> {
        *self.token.borrow_mut() = Some(token.clone());
        Ok(())
    }

    fn load(&self) -> Result<Option<BearerToken>, StorageError> {
        Ok(self.token.borrow().clone())
    }

    fn remove(&self) -> Result<(), StorageError> {
        self.token.borrow_mut().take();
        Ok(())
    }
}

/// Encrypted JSON file store.
///
/// The file holds `{ "bearerToken": "<ciphertext>" }`. The storage key is
/// bound into the ciphertext as associated data.
pub struct EncryptedFileTokenStore {
    path: PathBuf,
    cipher: TokenCipher,
}

impl EncryptedFileTokenStore {
    pub fn new(path: impl Into<PathBuf>, cipher: TokenCipher) -> Self {
        Self {
            path: path.into(),
            cipher,
        }
    }

    /// Build a store whose key is derived from `secret`.
    pub fn with_secret(path: impl Into<PathBuf>, secret: &str) -> Result<Self, StorageError> {
        Ok(Self::new(path, TokenCipher::from_secret(secret)?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<Option<BTreeMap<String, String>>, StorageError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        serde_json::from_str(&contents)
            .map(Some)
            .map_err(|e| StorageError::Corrupt(e.to_string()))
    }

    fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let json =
            serde_json::to_vec(entries).map_err(|e| StorageError::Corrupt(e.to_string()))?;

        let tmp_path = self.path.with_extension("tmp");
        {
            let mut file = open_private(&tmp_path)?;
            file.write_all(&json)?;
            file.sync_all()?;
        }
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}

#[cfg(unix)]
fn open_private(path: &Path) -> std::io::Result<fs::File> {
    use std::os::unix::fs::OpenOptionsExt;
    fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)
}

#[cfg(not(unix))]
fn open_private(path: &Path) -> std::io::Result<fs::File> {
    fs::File::create(path)
}

impl TokenStore for EncryptedFileTokenStore {
    fn store(&self, token: &BearerToken) -> Result<(), StorageError> {
        let mut entries = self.read_entries()?.unwrap_or_default();
        let sealed = self.cipher.encrypt(token.as_str(), TOKEN_KEY.as_bytes())?;
        entries.insert(TOKEN_KEY.to_string(), sealed);
        self.write_entries(&entries)?;
        tracing::debug!(path = %self.path.display(), "Bearer token stored");
        Ok(())
    }

    fn load(&self) -> Result<Option<BearerToken>, StorageError> {
        let Some(entries) = self.read_entries()? else {
            return Ok(None);
        };
        match entries.get(TOKEN_KEY) {
            Some(sealed) => {
                let token = self.cipher.decrypt(sealed, TOKEN_KEY.as_bytes())?;
                Ok(Some(BearerToken::new(token)))
            }
            None => Ok(None),
        }
    }

    fn remove(&self) -> Result<(), StorageError> {
        let Some(mut entries) = self.read_entries()? else {
            return Ok(());
        };
        if entries.remove(TOKEN_KEY).is_none() {
            return Ok(());
        }

        if entries.is_empty() {
            fs::remove_file(&self.path)?;
        } else {
            self.write_entries(&entries)?;
        }
        tracing::debug!(path = %self.path.display(), "Bearer token removed");
        Ok(())
    }
}
