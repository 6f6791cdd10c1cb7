//! Random tokens for session ids, reset links and API keys.
//!
//! Each call draws fresh bytes from the OS entropy source; nothing is cached
//! and no uniqueness is tracked beyond what the length provides.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SecretsError};
use crate::rng;

/// Bytes of entropy used when no length is given (256 bits).
pub const DEFAULT_ENTROPY: usize = 32;

fn resolve_nbytes(nbytes: Option<i64>) -> Result<usize> {
    match nbytes {
        None => Ok(DEFAULT_ENTROPY),
        Some(n) if n < 0 => Err(SecretsError::invalid(format!(
            "token length must be non-negative, got {n}"
        ))),
        Some(n) => usize::try_from(n).map_err(|_| {
            SecretsError::invalid(format!("token length {n} is not addressable"))
        }),
    }
}

/// Random byte string of `nbytes` bytes ([`DEFAULT_ENTROPY`] when `None`).
///
/// ```
/// let key = vpr_secrets::token_bytes(Some(16)).unwrap();
/// assert_eq!(key.len(), 16);
/// ```
pub fn token_bytes(nbytes: Option<i64>) -> Result<Vec<u8>> {
    rng::random_vec(resolve_nbytes(nbytes)?)
}

/// Random lowercase hex string, two characters per byte of entropy.
///
/// ```
/// let token = vpr_secrets::token_hex(Some(4)).unwrap();
/// assert_eq!(token.len(), 8);
/// ```
pub fn token_hex(nbytes: Option<i64>) -> Result<String> {
    Ok(hex::encode(token_bytes(nbytes)?))
}

/// Random URL-safe base64 string with the `=` padding removed.
///
/// ```
/// let token = vpr_secrets::token_urlsafe(None).unwrap();
/// assert!(!token.contains('='));
/// ```
pub fn token_urlsafe(nbytes: Option<i64>) -> Result<String> {
    Ok(URL_SAFE_NO_PAD.encode(token_bytes(nbytes)?))
}

/// Token length settings a host application can embed in its own config.
///
/// ```
/// use vpr_secrets::TokenConfig;
///
/// let cfg = TokenConfig::new(24);
/// assert_eq!(cfg.token_hex().unwrap().len(), 48);
/// assert_eq!(TokenConfig::default().nbytes, 32);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenConfig {
    /// Bytes of entropy per token
    pub nbytes: usize,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            nbytes: DEFAULT_ENTROPY,
        }
    }
}

impl TokenConfig {
    pub fn new(nbytes: usize) -> Self {
        Self { nbytes }
    }

    pub fn token_bytes(&self) -> Result<Vec<u8>> {
        rng::random_vec(self.nbytes)
    }

    pub fn token_hex(&self) -> Result<String> {
        Ok(hex::encode(self.token_bytes()?))
    }

    pub fn token_urlsafe(&self) -> Result<String> {
        Ok(URL_SAFE_NO_PAD.encode(self.token_bytes()?))
    }
}
