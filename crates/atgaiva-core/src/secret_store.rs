use std::fs;
use std::io::{self, Write};
use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chacha20poly1305::aead::{Aead, KeyInit};
use chacha20poly1305::{ChaCha20Poly1305, Nonce};
use keyring::Entry;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::config_directory;

const SERVICE_NAME: &str = "com.atgaiva.app";
const ACCOUNT_PREFIX: &str = "atgaiva-";
const MASTER_KEY_FILE: &str = "secret.key";
const NONCE_LEN: usize = 12;
const KEY_LEN: usize = 32;

/// Where a persisted secret lives.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "backend", rename_all = "kebab-case")]
pub enum SecretReference {
    /// Stored in the operating system keyring.
    Keyring { account: String },
    /// Stored inline, encrypted with the local master key.
    LocalEncrypted { nonce: String, ciphertext: String },
}

#[derive(Debug, Error)]
pub enum SecretStoreError {
    #[error("keyring operation failed: {0}")]
    Keyring(String),
    #[error("local encryption failed: {0}")]
    Crypto(String),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("base64 error: {0}")]
    Base64(#[from] base64::DecodeError),
}

/// Persist a secret, preferring the OS keyring and falling back to local encryption.
pub fn store_secret(label: &str, secret: &str) -> Result<SecretReference, SecretStoreError> {
    let trimmed = secret.trim();
    if trimmed.is_empty() {
        return Err(SecretStoreError::Crypto("cannot store empty secret".to_string()));
    }

    let account = format!("{ACCOUNT_PREFIX}{label}");
    match Entry::new(SERVICE_NAME, &account).and_then(|entry| entry.set_password(trimmed)) {
        Ok(()) => {
            debug!(label, "Secret stored in keyring");
            return Ok(SecretReference::Keyring { account });
        }
        Err(err) => {
            warn!(label, error = %err, "Keyring unavailable, falling back to local encryption");
        }
    }

    let (nonce, ciphertext) = encrypt_with_local_key(trimmed.as_bytes())?;
    Ok(SecretReference::LocalEncrypted {
        nonce: STANDARD.encode(nonce),
        ciphertext: STANDARD.encode(ciphertext),
    })
}

/// Read a secret back. A keyring entry that has vanished yields `Ok(None)`.
pub fn load_secret(reference: &SecretReference) -> Result<Option<String>, SecretStoreError> {
    match reference {
        SecretReference::Keyring { account } => {
            let entry = Entry::new(SERVICE_NAME, account)
                .map_err(|err| SecretStoreError::Keyring(err.to_string()))?;
            match entry.get_password() {
                Ok(value) if value.trim().is_empty() => Ok(None),
                Ok(value) => Ok(Some(value)),
                Err(keyring::Error::NoEntry) => Ok(None),
                Err(err) => Err(SecretStoreError::Keyring(err.to_string())),
            }
        }
        SecretReference::LocalEncrypted { nonce, ciphertext } => {
            let nonce = STANDARD.decode(nonce)?;
            let ciphertext = STANDARD.decode(ciphertext)?;
            let plaintext = decrypt_with_local_key(&nonce, &ciphertext)?;
            Ok(Some(String::from_utf8_lossy(&plaintext).into_owned()))
        }
    }
}

/// Remove a secret from its backing store. Missing keyring entries are fine.
pub fn delete_secret(reference: &SecretReference) -> Result<(), SecretStoreError> {
    match reference {
        SecretReference::Keyring { account } => {
            let entry = Entry::new(SERVICE_NAME, account)
                .map_err(|err| SecretStoreError::Keyring(err.to_string()))?;
            match entry.delete_credential() {
                Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
                Err(err) => Err(SecretStoreError::Keyring(err.to_string())),
            }
        }
        SecretReference::LocalEncrypted { .. } => Ok(()),
    }
}

fn cipher() -> Result<ChaCha20Poly1305, SecretStoreError> {
    let key = get_or_create_master_key(&config_directory().join(MASTER_KEY_FILE))?;
    ChaCha20Poly1305::new_from_slice(&key).map_err(|err| SecretStoreError::Crypto(err.to_string()))
}

fn encrypt_with_local_key(plaintext: &[u8]) -> Result<([u8; NONCE_LEN], Vec<u8>), SecretStoreError> {
    let cipher = cipher()?;
    let mut nonce = [0u8; NONCE_LEN];
    rand::rng().fill_bytes(&mut nonce);

    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce), plaintext)
        .map_err(|err| SecretStoreError::Crypto(err.to_string()))?;
    Ok((nonce, ciphertext))
}

fn decrypt_with_local_key(nonce: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>, SecretStoreError> {
    if nonce.len() != NONCE_LEN {
        return Err(SecretStoreError::Crypto(
            "invalid nonce length for chacha20poly1305".to_string(),
        ));
    }
    cipher()?
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|err| SecretStoreError::Crypto(err.to_string()))
}

fn get_or_create_master_key(path: &Path) -> Result<[u8; KEY_LEN], SecretStoreError> {
    if let Ok(bytes) = fs::read(path) {
        if let Ok(key) = <[u8; KEY_LEN]>::try_from(bytes.as_slice()) {
            return Ok(key);
        }
        warn!(
            path = %path.display(),
            len = bytes.len(),
            "Master key has unexpected length; regenerating"
        );
    }

    let mut key = [0u8; KEY_LEN];
    rand::rng().fill_bytes(&mut key);

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = fs::File::create(path)?;
    file.write_all(&key)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let _ = fs::set_permissions(path, fs::Permissions::from_mode(0o600));
    }
    Ok(key)
}
