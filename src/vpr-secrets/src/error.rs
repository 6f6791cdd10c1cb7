//! Error types for secret generation.
//!
//! All fallible operations return [`Result<T>`] which wraps [`SecretsError`].

use thiserror::Error;

/// Error type for randomness and token operations.
///
/// # Example
///
/// ```
/// use vpr_secrets::{randbelow, SecretsError};
///
/// match randbelow(0) {
///     Ok(n) => println!("drew {n}"),
///     Err(SecretsError::InvalidArgument(msg)) => println!("rejected: {msg}"),
///     Err(e) => println!("entropy failure: {e}"),
/// }
/// ```
#[derive(Debug, Error)]
pub enum SecretsError {
    /// Caller supplied a non-positive bound, a negative length or an empty
    /// sequence. Raised before any randomness is consumed.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Not enough memory for the requested amount of randomness
    #[error("cannot allocate {0} bytes of randomness")]
    Allocation(usize),

    /// The operating system CSPRNG failed or is unavailable
    #[error("OS entropy source unavailable: {0}")]
    EntropyUnavailable(#[from] rand::Error),
}

impl SecretsError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        SecretsError::InvalidArgument(msg.into())
    }

    /// True for argument validation failures.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, SecretsError::InvalidArgument(_))
    }
}

/// Result type alias for secret generation.
pub type Result<T> = std::result::Result<T, SecretsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_argument_display() {
        let err = SecretsError::invalid("upper bound must be positive");
        assert_eq!(
            err.to_string(),
            "invalid argument: upper bound must be positive"
        );
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn entropy_error_is_not_invalid_argument() {
        let inner = rand::Error::new(std::io::Error::new(
            std::io::ErrorKind::Other,
            "no /dev/urandom",
        ));
        let err: SecretsError = inner.into();
        assert!(!err.is_invalid_argument());
        assert!(err.to_string().starts_with("OS entropy source unavailable"));
    }

    #[test]
    fn allocation_error_display() {
        let err = SecretsError::Allocation(1 << 50);
        assert_eq!(
            err.to_string(),
            "cannot allocate 1125899906842624 bytes of randomness"
        );
        assert!(!err.is_invalid_argument());
    }
}
