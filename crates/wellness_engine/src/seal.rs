//! Content hashing and at-rest sealing of journal entries.
//!
//! Sealed payloads use AES-256-GCM. The cipher key is derived from the caller's
//! access key with HKDF-SHA256 and a random per-record salt, so the same
//! access key never encrypts two records under the same cipher key.

use aes_gcm::aead::generic_array::GenericArray;
use aes_gcm::{Aes256Gcm, KeyInit, aead::Aead};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use hkdf::Hkdf;
use schemars::JsonSchema;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::StoreError;
use crate::entry::WellnessEntry;

pub const SALT_LEN: usize = 16;
pub const NONCE_LEN: usize = 12;
const KEY_LEN: usize = 32;
const HKDF_INFO: &[u8] = b"wellness-journal entry seal v1";

/// Encrypted entry body. All fields are base64.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq, JsonSchema)]
pub struct SealedPayload {
    pub salt: String,
    pub nonce: String,
    pub ciphertext: String,
}

/// Canonical JSON serialization used for hashing and storage.
pub fn canonical_json(entry: &WellnessEntry) -> Result<Vec<u8>, StoreError> {
    Ok(serde_json::to_vec(entry)?)
}

/// Lowercase hex SHA-256 of the entry's canonical JSON.
pub fn content_hash(entry: &WellnessEntry) -> Result<String, StoreError> {
    Ok(hash_bytes(&canonical_json(entry)?))
}

pub fn hash_bytes(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

pub fn verify_integrity(entry: &WellnessEntry, expected_hash: &str) -> bool {
    content_hash(entry)
        .map(|actual| actual.eq_ignore_ascii_case(expected_hash.trim()))
        .unwrap_or(false)
}

pub(crate) fn random_bytes<const N: usize>() -> Result<[u8; N], StoreError> {
    let mut buf = [0u8; N];
    getrandom::fill(&mut buf)
        .map_err(|e| StoreError::StorageUnavailable(format!("random source: {e}")))?;
    Ok(buf)
}

fn derive_key(access_key: &SecretString, salt: &[u8]) -> Result<[u8; KEY_LEN], StoreError> {
    let hk = Hkdf::<Sha256>::new(Some(salt), access_key.expose_secret().as_bytes());
    let mut okm = [0u8; KEY_LEN];
    hk.expand(HKDF_INFO, &mut okm)
        .map_err(|e| StoreError::Seal(format!("key derivation: {e}")))?;
    Ok(okm)
}

pub fn seal(plaintext: &[u8], access_key: &SecretString) -> Result<SealedPayload, StoreError> {
    let salt = random_bytes::<SALT_LEN>()?;
    let nonce = random_bytes::<NONCE_LEN>()?;
    let key = derive_key(access_key, &salt)?;
    let cipher = Aes256Gcm::new(GenericArray::from_slice(&key));
    let ciphertext = cipher
        .encrypt(GenericArray::from_slice(&nonce), plaintext)
        .map_err(|e| StoreError::Seal(e.to_string()))?;
    Ok(SealedPayload {
        salt: STANDARD.encode(salt),
        nonce: STANDARD.encode(nonce),
        ciphertext: STANDARD.encode(ciphertext),
    })
}

/// Decrypt a payload. A wrong key and a tampered ciphertext are
/// indistinguishable and both yield `DecryptionFailure`.
pub fn unseal(payload: &SealedPayload, access_key: &SecretString) -> Result<Vec<u8>, StoreError> {
    let decode = |field: &str, value: &str| {
        STANDARD
            .decode(value)
            .map_err(|e| StoreError::DecryptionFailure(format!("invalid {field}: {e}")))
    };
    let salt = decode("salt", &payload.salt)?;
    let nonce = decode("nonce", &payload.nonce)?;
    let ciphertext = decode("ciphertext", &payload.ciphertext)?;
    if nonce.len() != NONCE_LEN {
        return Err(StoreError::DecryptionFailure(format!(
            "nonce must be {NONCE_LEN} bytes, got {}",
            nonce.len()
        )));
    }
    let key = derive_key(access_key, &salt)?;
    let cipher = Aes256Gcm::new(GenericArray::from_slice(&key));
    cipher
        .decrypt(GenericArray::from_slice(&nonce), ciphertext.as_ref())
        .map_err(|_| StoreError::DecryptionFailure("wrong access key or corrupted record".into()))
}
