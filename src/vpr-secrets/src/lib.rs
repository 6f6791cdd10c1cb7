//! Secrets for VPR: OS-backed randomness, tokens and constant-time comparison.
//!
//! All randomness comes from the operating system CSPRNG through a single
//! lazily created [`EntropySource`]. Nothing here can be seeded, and an
//! entropy failure is returned as an error rather than papered over with a
//! weaker generator.
//!
//! ```
//! use vpr_secrets::{compare_digest, token_urlsafe};
//!
//! let reset_token = token_urlsafe(None).unwrap();
//! assert!(compare_digest(&reset_token, reset_token.clone()));
//! ```

pub mod constant_time;
pub mod error;
pub mod random;
pub mod rng;
pub mod tokens;

pub use num_bigint::BigUint;

pub use constant_time::compare_digest;
pub use error::{Result, SecretsError};
pub use random::{choice, randbelow, randbits, SystemRandom};
pub use rng::{EntropySource, SecureRng};
pub use tokens::{token_bytes, token_hex, token_urlsafe, TokenConfig, DEFAULT_ENTROPY};
