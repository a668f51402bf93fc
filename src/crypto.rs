//! State-token encryption for authorization URLs.
//!
//! The `state` query parameter sent to providers that accept one is an
//! AES-256-CBC ciphertext of a timestamp-tagged plaintext, base64 encoded.
//! The flow never receives a provider callback, so the token is write-only:
//! nothing in this service decrypts or verifies it on a return path. It is
//! kept for interface compatibility as an anti-replay convention, not as an
//! actual replay protection.

use aes::cipher::{BlockEncryptMut, KeyIvInit, block_padding::Pkcs7};
use base64::{Engine, engine::general_purpose::STANDARD};

use crate::config::ConfigError;

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;

/// AES-256 key length in bytes.
pub const SECRET_KEY_BYTES: usize = 32;

/// AES block / CBC initialization vector length in bytes.
pub const INITIALIZATION_VECTOR_BYTES: usize = 16;

/// Encrypts `plaintext` with AES-256-CBC and PKCS#7 padding.
///
/// `secret_key_hex` must decode to exactly 32 bytes and `iv_hex` to exactly
/// 16; anything else is a [`ConfigError`]. The result is standard base64.
/// Output is deterministic for a fixed key/IV/plaintext triple - the only
/// variation between calls comes from the timestamp the caller embeds in
/// the plaintext.
pub fn encrypt_state(
    secret_key_hex: &str,
    iv_hex: &str,
    plaintext: &str,
) -> Result<String, ConfigError> {
    let key = decode_secret_key(secret_key_hex)?;
    let iv = decode_initialization_vector(iv_hex)?;

    let ciphertext = Aes256CbcEnc::new(&key.into(), &iv.into())
        .encrypt_padded_vec_mut::<Pkcs7>(plaintext.as_bytes());

    Ok(STANDARD.encode(ciphertext))
}

/// Decodes and length-checks the hex-encoded AES key.
pub fn decode_secret_key(hex_key: &str) -> Result<[u8; SECRET_KEY_BYTES], ConfigError> {
    decode_hex_exact("SECRET_KEY", hex_key)
}

/// Decodes and length-checks the hex-encoded initialization vector.
pub fn decode_initialization_vector(
    hex_iv: &str,
) -> Result<[u8; INITIALIZATION_VECTOR_BYTES], ConfigError> {
    decode_hex_exact("INITIALIZATION_VECTOR", hex_iv)
}

fn decode_hex_exact<const N: usize>(
    name: &'static str,
    value: &str,
) -> Result<[u8; N], ConfigError> {
    let bytes = hex::decode(value).map_err(|e| ConfigError::Invalid {
        name,
        reason: format!("not a valid hex string: {e}"),
    })?;

    let len = bytes.len();
    bytes.try_into().map_err(|_| ConfigError::Invalid {
        name,
        reason: format!("expected {N} bytes of key material, got {len}"),
    })
}
