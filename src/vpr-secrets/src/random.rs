//! Unbiased sampling on top of the OS entropy source.
//!
//! Bounded integers use rejection sampling: draw just enough bits to cover
//! the bound and redraw anything that lands outside it. Reducing a wider
//! draw with `%` would favour small values whenever the bound is not a
//! power of two.

use num_bigint::BigUint;
use rand::{CryptoRng, RngCore};
use tracing::trace;

use crate::error::{Result, SecretsError};
use crate::rng::{self, getrandbits_from, EntropySource};

/// Uniform integer in `[0, n)`, `n >= 1`.
pub(crate) fn randbelow_from<R: RngCore + ?Sized>(rng: &mut R, n: u64) -> Result<u64> {
    if n == 0 {
        return Err(SecretsError::invalid("upper bound must be positive, got 0"));
    }
    if n == 1 {
        return Ok(0);
    }
    // smallest k with 2^k >= n
    let k = u64::BITS - (n - 1).leading_zeros();
    let mut r = getrandbits_from(rng, k)?;
    let mut draws = 1u32;
    while r >= n {
        trace!(bound = n, draws, "redrawing out-of-range sample");
        r = getrandbits_from(rng, k)?;
        draws += 1;
    }
    Ok(r)
}

/// Uniform integer in `[0, width)` for widths up to `2^64`.
fn below_wide<R: RngCore + ?Sized>(rng: &mut R, width: u128) -> Result<u64> {
    if width > u64::MAX as u128 {
        getrandbits_from(rng, 64)
    } else {
        randbelow_from(rng, width as u64)
    }
}

pub(crate) fn choice_from<'a, R, T>(rng: &mut R, seq: &'a [T]) -> Result<&'a T>
where
    R: RngCore + ?Sized,
{
    if seq.is_empty() {
        return Err(SecretsError::invalid("cannot choose from an empty sequence"));
    }
    let idx = randbelow_from(rng, seq.len() as u64)? as usize;
    Ok(&seq[idx])
}

fn shuffle_from<R: RngCore + ?Sized, T>(rng: &mut R, seq: &mut [T]) -> Result<()> {
    for i in (1..seq.len()).rev() {
        let j = randbelow_from(rng, i as u64 + 1)? as usize;
        seq.swap(i, j);
    }
    Ok(())
}

fn sample_from<'a, R: RngCore + ?Sized, T>(
    rng: &mut R,
    population: &'a [T],
    k: usize,
) -> Result<Vec<&'a T>> {
    let n = population.len();
    if k > n {
        return Err(SecretsError::invalid(format!(
            "sample larger than population ({k} > {n})"
        )));
    }
    // partial Fisher-Yates over positions; population itself is untouched
    let mut pool: Vec<usize> = (0..n).collect();
    for i in 0..k {
        let j = i + randbelow_from(rng, (n - i) as u64)? as usize;
        pool.swap(i, j);
    }
    Ok(pool[..k].iter().map(|&i| &population[i]).collect())
}

/// Integer of any positive width `k`: `ceil(k / 8)` bytes big-endian with
/// the surplus low bits dropped.
fn getrandbits_big(k: u64) -> Result<BigUint> {
    let nbytes = (k + 7) / 8;
    let len = usize::try_from(nbytes).map_err(|_| SecretsError::Allocation(usize::MAX))?;
    let buf = rng::random_vec(len)?;
    Ok(BigUint::from_bytes_be(&buf) >> (nbytes * 8 - k))
}

fn check_bits(k: i64) -> Result<u64> {
    if k <= 0 {
        return Err(SecretsError::invalid(format!(
            "number of bits must be positive, got {k}"
        )));
    }
    Ok(k as u64)
}

fn check_bound(n: i64) -> Result<u64> {
    if n <= 0 {
        return Err(SecretsError::invalid(format!(
            "upper bound must be positive, got {n}"
        )));
    }
    Ok(n as u64)
}

/// Random number generator backed by the operating system CSPRNG.
///
/// A zero-sized handle onto the process-wide [`EntropySource`]; copies are
/// free and all of them read from the same kernel generator. It cannot be
/// seeded and its output is never reproducible.
///
/// Implements [`RngCore`] and [`CryptoRng`] so it can be handed to anything
/// in the `rand` ecosystem. The infallible `RngCore` methods panic if the OS
/// generator fails, like [`rand::rngs::OsRng`]; use the methods returning
/// [`Result`] to observe that failure instead.
///
/// ```
/// use vpr_secrets::SystemRandom;
///
/// let rng = SystemRandom::new();
/// let die = rng.randint(1, 6).unwrap();
/// assert!((1..=6).contains(&die));
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemRandom {
    _private: (),
}

impl SystemRandom {
    pub fn new() -> Self {
        EntropySource::global();
        Self { _private: () }
    }

    /// Non-negative integer with `k` random bits, for any `k >= 1`.
    pub fn getrandbits(&self, k: i64) -> Result<BigUint> {
        getrandbits_big(check_bits(k)?)
    }

    /// Uniform integer in `[0, n)`.
    pub fn randbelow(&self, n: i64) -> Result<i64> {
        let n = check_bound(n)?;
        let mut rng = *self;
        Ok(randbelow_from(&mut rng, n)? as i64)
    }

    /// Uniform integer in `[start, stop)`.
    pub fn randrange(&self, start: i64, stop: i64) -> Result<i64> {
        if start >= stop {
            return Err(SecretsError::invalid(format!(
                "empty range for randrange ({start}, {stop})"
            )));
        }
        let width = (stop as i128 - start as i128) as u128;
        let mut rng = *self;
        let offset = below_wide(&mut rng, width)?;
        Ok((start as i128 + offset as i128) as i64)
    }

    /// Uniform integer in `[a, b]`, both ends included.
    pub fn randint(&self, a: i64, b: i64) -> Result<i64> {
        if a > b {
            return Err(SecretsError::invalid(format!(
                "empty range for randint ({a}, {b})"
            )));
        }
        let width = (b as i128 - a as i128 + 1) as u128;
        let mut rng = *self;
        let offset = below_wide(&mut rng, width)?;
        Ok((a as i128 + offset as i128) as i64)
    }

    /// Uniform float in `[0, 1)` with 53 bits of precision.
    pub fn random(&self) -> Result<f64> {
        let mut rng = *self;
        let bits = getrandbits_from(&mut rng, 53)?;
        Ok(bits as f64 * (1.0 / (1u64 << 53) as f64))
    }

    /// Uniformly chosen element of a non-empty slice.
    pub fn choice<'a, T>(&self, seq: &'a [T]) -> Result<&'a T> {
        let mut rng = *self;
        choice_from(&mut rng, seq)
    }

    /// Shuffle `seq` in place; every permutation is equally likely.
    pub fn shuffle<T>(&self, seq: &mut [T]) -> Result<()> {
        let mut rng = *self;
        shuffle_from(&mut rng, seq)
    }

    /// `k` elements drawn from distinct positions of `population`.
    pub fn sample<'a, T>(&self, population: &'a [T], k: usize) -> Result<Vec<&'a T>> {
        let mut rng = *self;
        sample_from(&mut rng, population, k)
    }
}

impl RngCore for SystemRandom {
    fn next_u32(&mut self) -> u32 {
        EntropySource::global().rng().next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        EntropySource::global().rng().next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        EntropySource::global().rng().fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> std::result::Result<(), rand::Error> {
        EntropySource::global().rng().try_fill_bytes(dest)
    }
}

impl CryptoRng for SystemRandom {}

/// Non-negative integer with `k` random bits.
///
/// ```
/// let v = vpr_secrets::randbits(256).unwrap();
/// assert!(v.bits() <= 256);
/// assert!(vpr_secrets::randbits(0).is_err());
/// ```
pub fn randbits(k: i64) -> Result<BigUint> {
    SystemRandom::new().getrandbits(k)
}

/// Random integer in the range `[0, n)`.
///
/// ```
/// let roll = vpr_secrets::randbelow(6).unwrap();
/// assert!((0..6).contains(&roll));
/// assert!(vpr_secrets::randbelow(0).is_err());
/// ```
pub fn randbelow(exclusive_upper_bound: i64) -> Result<i64> {
    SystemRandom::new().randbelow(exclusive_upper_bound)
}

/// Uniformly chosen element of a non-empty slice.
pub fn choice<T>(seq: &[T]) -> Result<&T> {
    SystemRandom::new().choice(seq)
}
