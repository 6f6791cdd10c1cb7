//! Constant-Time Comparison
//!
//! Compares secrets (tokens, MAC tags, API keys) without leaking how many
//! leading bytes match. Built on the `subtle` crate.
//!
//! # Why Constant-Time?
//!
//! An early-exit comparison returns sooner the earlier the inputs diverge:
//! ```text
//! // WRONG - early exit on mismatch
//! fn bad_eq(a: &[u8], b: &[u8]) -> bool {
//!     for (x, y) in a.iter().zip(b.iter()) {
//!         if x != y { return false; }  // Timing leak!
//!     }
//!     true
//! }
//! ```
//!
//! Measuring that difference lets an attacker guess a secret one byte at a
//! time. [`compare_digest`] touches every byte of equal-length inputs and
//! folds the differences together before deciding.
//!
//! # Example
//!
//! ```
//! use vpr_secrets::compare_digest;
//!
//! let expected = "3f9a1c";
//! assert!(compare_digest(expected, "3f9a1c"));
//! assert!(!compare_digest(expected, "3f9a1d"));
//! ```

use subtle::ConstantTimeEq;

/// Constant-time equality of two byte strings.
///
/// Returns `false` immediately when the lengths differ; the length of a
/// token is not treated as secret. For equal lengths every byte pair is
/// XORed and OR-accumulated, so the running time depends only on the
/// length, never on where or whether the inputs differ.
///
/// Accepts anything viewable as bytes: `&[u8]`, `Vec<u8>`, `&str`, `String`.
#[inline]
pub fn compare_digest(a: impl AsRef<[u8]>, b: impl AsRef<[u8]>) -> bool {
    let (a, b) = (a.as_ref(), b.as_ref());
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}
