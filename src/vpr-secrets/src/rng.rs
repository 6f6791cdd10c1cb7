//! Process-wide OS entropy source.
//!
//! Every random bit produced by this crate comes from the operating system
//! CSPRNG via [`OsRng`]. There is no seeding, no userspace expansion and no
//! fallback generator: if the platform refuses to hand out entropy the
//! error surfaces to the caller as [`SecretsError::EntropyUnavailable`].

use std::sync::OnceLock;

use rand::{rngs::OsRng, RngCore};
use tracing::{debug, error};

use crate::error::{Result, SecretsError};

/// Default cryptographically secure RNG for the crate.
pub type SecureRng = OsRng;

static SOURCE: OnceLock<EntropySource> = OnceLock::new();

/// Handle onto the operating system CSPRNG.
///
/// Created once per process on first use and immutable afterwards, so it can
/// be read from any thread without locking.
#[derive(Debug)]
pub struct EntropySource {
    rng: SecureRng,
}

impl EntropySource {
    /// Return the process-wide source, initialising it on first call.
    pub fn global() -> &'static EntropySource {
        SOURCE.get_or_init(|| {
            debug!("initialising OS entropy source");
            EntropySource { rng: OsRng }
        })
    }

    /// A fresh reader onto the OS generator. `OsRng` holds no state, so
    /// every copy draws from the same kernel source.
    pub fn rng(&self) -> SecureRng {
        self.rng
    }

    /// Fill `dest` with OS randomness.
    pub fn fill(&self, dest: &mut [u8]) -> Result<()> {
        try_fill(&mut self.rng(), dest)
    }
}

/// Fill the provided buffer with secure randomness.
pub fn fill(dest: &mut [u8]) -> Result<()> {
    EntropySource::global().fill(dest)
}

/// Freshly allocated buffer of `len` random bytes.
///
/// The allocation is fallible so an oversized request comes back as
/// [`SecretsError::Allocation`] instead of aborting the process.
pub(crate) fn random_vec(len: usize) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len).map_err(|_| SecretsError::Allocation(len))?;
    buf.resize(len, 0);
    fill(&mut buf)?;
    Ok(buf)
}

pub(crate) fn try_fill<R: RngCore + ?Sized>(rng: &mut R, dest: &mut [u8]) -> Result<()> {
    rng.try_fill_bytes(dest).map_err(|e| {
        error!(error = %e, "OS entropy source failed");
        SecretsError::from(e)
    })
}

/// Draw a `k`-bit unsigned integer, `1 <= k <= 64`.
///
/// Reads `ceil(k / 8)` bytes big-endian and drops the surplus low bits.
pub(crate) fn getrandbits_from<R: RngCore + ?Sized>(rng: &mut R, k: u32) -> Result<u64> {
    debug_assert!((1..=64).contains(&k));
    let nbytes = ((k + 7) / 8) as usize;
    let mut buf = [0u8; 8];
    try_fill(rng, &mut buf[8 - nbytes..])?;
    Ok(u64::from_be_bytes(buf) >> (nbytes as u32 * 8 - k))
}


#[cfg(test)]
mod tests {
    use super::testing::{CountingRng, ScriptedRng};
    use super::*;

    #[test]
    fn global_source_is_a_singleton() {
        let a = EntropySource::global() as *const EntropySource;
        let b = EntropySource::global() as *const EntropySource;
        assert_eq!(a, b);
    }

    #[test]
    fn fill_mutates_buffer() {
        let mut buf = [0u8; 32];
        fill(&mut buf).unwrap();
        assert!(buf.iter().any(|&b| b != 0), "fill must mutate provided buffer");
    }

    #[test]
    fn fill_empty_buffer() {
        let mut buf = [0u8; 0];
        assert!(fill(&mut buf).is_ok());
    }

    #[test]
    fn fill_produces_different_values() {
        let mut buf1 = [0u8; 32];
        let mut buf2 = [0u8; 32];
        fill(&mut buf1).unwrap();
        fill(&mut buf2).unwrap();
        assert_ne!(buf1, buf2, "Two random fills should differ");
    }

    #[test]
    fn random_vec_has_requested_length() {
        assert_eq!(random_vec(0).unwrap().len(), 0);
        assert_eq!(random_vec(48).unwrap().len(), 48);
    }

    #[test]
    fn random_vec_reports_oversized_requests() {
        for len in [1usize << 50, 1 << 62, usize::MAX] {
            let err = random_vec(len).unwrap_err();
            assert!(matches!(err, SecretsError::Allocation(n) if n == len));
        }
    }

    #[test]
    fn getrandbits_reads_minimal_bytes_big_endian() {
        // 12 bits -> 2 bytes, top 12 bits kept
        let mut rng = ScriptedRng::new(&[0xAB, 0xCD]);
        assert_eq!(getrandbits_from(&mut rng, 12).unwrap(), 0xABC);

        let mut rng = ScriptedRng::new(&[0xFF]);
        assert_eq!(getrandbits_from(&mut rng, 1).unwrap(), 1);

        let mut rng = ScriptedRng::new(&[0x80]);
        assert_eq!(getrandbits_from(&mut rng, 8).unwrap(), 0x80);

        let mut rng = ScriptedRng::new(&[0xFF; 8]);
        assert_eq!(getrandbits_from(&mut rng, 64).unwrap(), u64::MAX);
    }

    #[test]
    fn getrandbits_stays_within_k_bits() {
        let mut rng = OsRng;
        for k in 1..=64u32 {
            for _ in 0..64 {
                let v = getrandbits_from(&mut rng, k).unwrap();
                if k < 64 {
                    assert!(v < (1u64 << k), "{v} has more than {k} bits");
                }
            }
        }
    }

    #[test]
    fn getrandbits_uses_one_draw() {
        let mut rng = CountingRng::<OsRng>::default();
        getrandbits_from(&mut rng, 33).unwrap();
        assert_eq!(rng.calls, 1);
    }

    #[test]
    fn entropy_failure_propagates() {
        let mut rng = ScriptedRng::new(&[]);
        let err = getrandbits_from(&mut rng, 8).unwrap_err();
        assert!(matches!(err, SecretsError::EntropyUnavailable(_)));
    }
}
