//! WireGuard key encoding and generation.
//!
//! Keys are 32-byte Curve25519 scalars/points, carried as standard base64
//! in configuration files. All key material entering or leaving the crate
//! as text goes through this module.

use base64::prelude::*;
use x25519_dalek::{PublicKey, StaticSecret};

use crate::error::{ConfigError, Result};

/// Length of a WireGuard key in bytes.
pub const KEY_LEN: usize = 32;

/// Decode a base64-encoded 32-byte key.
pub fn decode_key(s: &str) -> Result<[u8; KEY_LEN]> {
    let bytes = BASE64_STANDARD
        .decode(s.trim())
        .map_err(|e| ConfigError::InvalidKey(format!("Invalid base64: {}", e)))?;

    if bytes.len() != KEY_LEN {
        return Err(ConfigError::InvalidKey(format!(
            "Key must be {} bytes, got {}",
            KEY_LEN,
            bytes.len()
        ))
        .into());
    }

    let mut key = [0u8; KEY_LEN];
    key.copy_from_slice(&bytes);
    Ok(key)
}

/// Encode a 32-byte key to base64.
pub fn encode_key(key: &[u8; KEY_LEN]) -> String {
    BASE64_STANDARD.encode(key)
}

/// Decode a base64-encoded private key.
pub fn decode_private_key(s: &str) -> Result<StaticSecret> {
    decode_key(s).map(StaticSecret::from)
}

/// Decode a base64-encoded public key.
pub fn decode_public_key(s: &str) -> Result<PublicKey> {
    decode_key(s).map(PublicKey::from)
}

/// Generate a new random private key.
pub fn generate_private_key() -> StaticSecret {
    StaticSecret::random_from_rng(rand::rngs::OsRng)
}

/// Derive the public key from a private key.
pub fn derive_public_key(private_key: &StaticSecret) -> PublicKey {
    PublicKey::from(private_key)
}
