// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Random prime generation for Blum integers.
//!
//! Candidates are drawn with an exact bit length and accepted only when they
//! are congruent to 3 mod 4 and pass the configured primality check. The
//! residue check also guarantees the candidate is odd.

use std::ops::Deref;

use num_bigint_dig::BigUint;
use num_bigint_dig::prime::probably_prime;
use num_traits::{One, ToPrimitive};
use rand::rngs::StdRng;
use rand::{SeedableRng, TryRngCore};
use tracing::{debug, trace};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{Error, Result};
use crate::modulus::{Modulus, make_modulus};

/// Smallest bit length that can hold a prime congruent to 3 mod 4.
pub const MIN_BIT_LENGTH: usize = 2;

/// Smallest bit length with two distinct primes congruent to 3 mod 4
/// (19, 23 and 31 at five bits; 2 to 4 bits hold only 3, 7 and 11).
pub const MIN_PAIR_BIT_LENGTH: usize = 5;

/// Candidates drawn per requested bit before the search gives up.
const ATTEMPTS_PER_BIT: usize = 100;

/// Primality check applied to candidates that already satisfy `c ≡ 3 (mod 4)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrimalityTest {
    /// Single Fermat round to base 2: accept iff `2^(c-1) ≡ 1 (mod c)`.
    ///
    /// Base-2 Fermat pseudoprimes pass this check.
    #[default]
    Fermat,
    /// Miller-Rabin with the given number of random bases.
    MillerRabin { rounds: usize },
}

impl PrimalityTest {
    /// Apply this check to `candidate`.
    pub fn is_probable_prime(&self, candidate: &BigUint) -> bool {
        match self {
            PrimalityTest::Fermat => fermat_base2(candidate),
            PrimalityTest::MillerRabin { rounds } => probably_prime(candidate, *rounds),
        }
    }
}

/// One Fermat round to base 2.
///
/// Only meaningful for odd candidates greater than 2.
pub fn fermat_base2(candidate: &BigUint) -> bool {
    if candidate <= &BigUint::from(2u32) {
        return false;
    }
    let exponent = candidate - BigUint::one();
    BigUint::from(2u32).modpow(&exponent, candidate).is_one()
}

/// A probable prime congruent to 3 mod 4.
///
/// The value is wiped from memory when dropped.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
#[cfg_attr(feature = "expose-secret", derive(Debug))]
pub struct Prime {
    value: BigUint,
}

impl Prime {
    /// Validate an externally supplied prime.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotPrime`] unless `value ≡ 3 (mod 4)` and it passes `test`.
    pub fn new(value: BigUint, test: PrimalityTest) -> Result<Self> {
        if !is_three_mod_four(&value) || !test.is_probable_prime(&value) {
            return Err(Error::NotPrime);
        }
        Ok(Self { value })
    }

    /// Return the prime.
    pub fn value(&self) -> &BigUint {
        &self.value
    }

    /// Number of significant bits.
    pub fn bits(&self) -> usize {
        self.value.bits()
    }
}

impl Deref for Prime {
    type Target = BigUint;

    fn deref(&self) -> &Self::Target {
        &self.value
    }
}

#[inline]
fn is_three_mod_four(value: &BigUint) -> bool {
    (value % 4u32).to_u32() == Some(3)
}

/// Configurable search for primes of an exact bit length.
#[derive(Debug, Clone)]
pub struct PrimeGenerator {
    bit_length: usize,
    test: PrimalityTest,
    max_attempts: usize,
}

impl PrimeGenerator {
    /// Create a generator for `bit_length`-bit primes with the Fermat check
    /// and the default attempt bound.
    pub fn new(bit_length: usize) -> Self {
        Self {
            bit_length,
            test: PrimalityTest::default(),
            max_attempts: bit_length.saturating_mul(ATTEMPTS_PER_BIT).max(ATTEMPTS_PER_BIT),
        }
    }

    /// Select the primality check.
    pub fn primality(mut self, test: PrimalityTest) -> Self {
        self.test = test;
        self
    }

    /// Bound the number of candidates drawn before giving up.
    pub fn max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts;
        self
    }

    /// Requested bit length of every prime.
    pub fn bit_length(&self) -> usize {
        self.bit_length
    }

    /// Configured primality check.
    pub fn test(&self) -> PrimalityTest {
        self.test
    }

    /// Search for a prime using `rng` as the only entropy source.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidBitLength`] if the bit length is below [`MIN_BIT_LENGTH`].
    /// - [`Error::EntropySourceFailure`] as soon as `rng` fails.
    /// - [`Error::PrimeSearchExhausted`] once `max_attempts` candidates were rejected.
    pub fn generate<R: TryRngCore + ?Sized>(&self, rng: &mut R) -> Result<Prime> {
        if self.bit_length < MIN_BIT_LENGTH {
            return Err(Error::InvalidBitLength {
                min: MIN_BIT_LENGTH,
                actual: self.bit_length,
            });
        }

        for attempt in 1..=self.max_attempts {
            let candidate = generate_candidate(self.bit_length, rng)?;

            if is_three_mod_four(&candidate) && self.test.is_probable_prime(&candidate) {
                debug!(bits = self.bit_length, attempts = attempt, "prime found");
                return Ok(Prime { value: candidate });
            }
            trace!(attempt, "candidate rejected");
        }

        Err(Error::PrimeSearchExhausted { attempts: self.max_attempts })
    }
}

/// Generate a `bit_length`-bit prime congruent to 3 mod 4 with default settings.
pub fn generate_prime<R: TryRngCore + ?Sized>(bit_length: usize, rng: &mut R) -> Result<Prime> {
    PrimeGenerator::new(bit_length).generate(rng)
}

/// Draw a random candidate with exactly `bits` significant bits.
fn generate_candidate<R: TryRngCore + ?Sized>(bits: usize, rng: &mut R) -> Result<BigUint> {
    let mut bytes = vec![0u8; bits.div_ceil(8)];
    rng.try_fill_bytes(&mut bytes).map_err(Error::entropy)?;

    // Big-endian: the first byte carries the top bits.
    let top_bits = bits - (bytes.len() - 1) * 8;
    bytes[0] &= 0xffu8 >> (8 - top_bits);
    bytes[0] |= 1u8 << (top_bits - 1);

    let candidate = BigUint::from_bytes_be(&bytes);
    bytes.zeroize();

    Ok(candidate)
}

/// The two secret factors of a BBS modulus.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
#[cfg_attr(feature = "expose-secret", derive(Debug))]
pub struct PrimePair {
    p: Prime,
    q: Prime,
}

impl PrimePair {
    /// Draw p and then q from the same entropy source.
    ///
    /// q is redrawn while it equals p, at most `max_attempts` times.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidBitLength`] below [`MIN_PAIR_BIT_LENGTH`].
    /// - [`Error::PrimeSearchExhausted`] if no distinct q turned up.
    /// - Any failure of [`PrimeGenerator::generate`].
    pub fn generate<R: TryRngCore + ?Sized>(generator: &PrimeGenerator, rng: &mut R) -> Result<Self> {
        check_pair_bit_length(generator)?;

        let p = generator.generate(rng)?;
        let q = generator.generate(rng)?;
        let q = redraw_collision(generator, &p, q, rng)?;
        Self::from_primes(p, q)
    }

    /// Draw p and q concurrently, each from its own OS-seeded generator.
    ///
    /// A colliding q is redrawn from a third OS-seeded generator.
    pub fn generate_parallel(generator: &PrimeGenerator) -> Result<Self> {
        check_pair_bit_length(generator)?;

        let (p_result, q_result) = rayon::join(
            || {
                let mut rng = StdRng::try_from_os_rng().map_err(Error::entropy)?;
                generator.generate(&mut rng)
            },
            || {
                let mut rng = StdRng::try_from_os_rng().map_err(Error::entropy)?;
                generator.generate(&mut rng)
            },
        );

        let p = p_result?;
        let q = q_result?;
        let q = if p == q {
            let mut rng = StdRng::try_from_os_rng().map_err(Error::entropy)?;
            redraw_collision(generator, &p, q, &mut rng)?
        } else {
            q
        };
        Self::from_primes(p, q)
    }

    /// Pair two known primes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidModulus`] if `p == q`.
    pub fn from_primes(p: Prime, q: Prime) -> Result<Self> {
        if p == q {
            return Err(Error::InvalidModulus);
        }
        Ok(Self { p, q })
    }

    /// Return the first factor.
    pub fn p(&self) -> &Prime {
        &self.p
    }

    /// Return the second factor.
    pub fn q(&self) -> &Prime {
        &self.q
    }

    /// The public product `n = p·q`.
    pub fn modulus(&self) -> Result<Modulus> {
        make_modulus(&self.p, &self.q)
    }
}

fn check_pair_bit_length(generator: &PrimeGenerator) -> Result<()> {
    if generator.bit_length < MIN_PAIR_BIT_LENGTH {
        return Err(Error::InvalidBitLength {
            min: MIN_PAIR_BIT_LENGTH,
            actual: generator.bit_length,
        });
    }
    Ok(())
}

fn redraw_collision<R: TryRngCore + ?Sized>(
    generator: &PrimeGenerator,
    p: &Prime,
    mut q: Prime,
    rng: &mut R,
) -> Result<Prime> {
    for _ in 0..generator.max_attempts {
        if q != *p {
            return Ok(q);
        }
        debug!(bits = generator.bit_length, "q collided with p, redrawing");
        q = generator.generate(rng)?;
    }

    if q == *p {
        return Err(Error::PrimeSearchExhausted { attempts: generator.max_attempts });
    }
    Ok(q)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingRng;

    impl TryRngCore for FailingRng {
        type Error = std::io::Error;

        fn try_next_u32(&mut self) -> std::result::Result<u32, Self::Error> {
            Err(std::io::Error::other("entropy pool unavailable"))
        }

        fn try_next_u64(&mut self) -> std::result::Result<u64, Self::Error> {
            Err(std::io::Error::other("entropy pool unavailable"))
        }

        fn try_fill_bytes(&mut self, _dst: &mut [u8]) -> std::result::Result<(), Self::Error> {
            Err(std::io::Error::other("entropy pool unavailable"))
        }
    }

    fn assert_valid(prime: &Prime, bits: usize) {
        assert_eq!(prime.bits(), bits, "wrong bit length");
        assert_eq!((prime.value() % 4u32).to_u32(), Some(3), "must be 3 mod 4");
        assert!(fermat_base2(prime.value()), "must pass Fermat base 2");
    }

    #[test]
    fn generates_valid_prime_64() {
        let mut rng = StdRng::seed_from_u64(7);
        let prime = generate_prime(64, &mut rng).unwrap();

        assert_valid(&prime, 64);
        assert!(probably_prime(prime.value(), 20));
    }

    #[test]
    fn generates_valid_prime_512() {
        let mut rng = StdRng::seed_from_u64(512);
        let prime = generate_prime(512, &mut rng).unwrap();
        assert_valid(&prime, 512);
    }

    #[test]
    fn generates_odd_bit_lengths() {
        let mut rng = StdRng::seed_from_u64(3);
        for bits in [2, 3, 5, 13, 67, 129] {
            let prime = generate_prime(bits, &mut rng).unwrap();
            assert_valid(&prime, bits);
        }
    }

    #[test]
    fn smallest_prime_is_three() {
        let mut rng = StdRng::seed_from_u64(0);
        let prime = generate_prime(2, &mut rng).unwrap();
        assert_eq!(prime.value(), &BigUint::from(3u32));
    }

    #[test]
    fn seeded_generation_is_reproducible() {
        let a = generate_prime(96, &mut StdRng::seed_from_u64(42)).unwrap();
        let b = generate_prime(96, &mut StdRng::seed_from_u64(42)).unwrap();
        assert!(a == b);
    }

    #[test]
    fn miller_rabin_generation() {
        let mut rng = StdRng::seed_from_u64(11);
        let generator = PrimeGenerator::new(128).primality(PrimalityTest::MillerRabin { rounds: 20 });
        let prime = generator.generate(&mut rng).unwrap();

        assert_valid(&prime, 128);
    }

    #[test]
    fn rejects_small_bit_lengths() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(
            generate_prime(1, &mut rng).err(),
            Some(Error::InvalidBitLength { min: 2, actual: 1 })
        );
        assert!(generate_prime(0, &mut rng).is_err());
    }

    #[test]
    fn entropy_failure_is_fatal() {
        let result = generate_prime(64, &mut FailingRng);
        assert!(matches!(result, Err(Error::EntropySourceFailure(_))));
    }

    #[test]
    fn search_bound_is_enforced() {
        let mut rng = StdRng::seed_from_u64(5);
        let generator = PrimeGenerator::new(256).max_attempts(0);

        assert_eq!(
            generator.generate(&mut rng).err(),
            Some(Error::PrimeSearchExhausted { attempts: 0 })
        );
    }

    #[test]
    fn fermat_accepts_primes_and_rejects_composites() {
        for p in [3u32, 7, 11, 19, 23, 499, 7919] {
            assert!(fermat_base2(&BigUint::from(p)), "{p} is prime");
        }
        for c in [1u32, 2, 9, 15, 21, 91, 253] {
            assert!(!fermat_base2(&BigUint::from(c)), "{c} is composite");
        }
    }

    #[test]
    fn fermat_admits_base2_pseudoprimes() {
        // 341 = 11 · 31 passes a single base-2 round; Miller-Rabin catches it.
        let pseudoprime = BigUint::from(341u32);
        assert!(PrimalityTest::Fermat.is_probable_prime(&pseudoprime));
        assert!(!PrimalityTest::MillerRabin { rounds: 20 }.is_probable_prime(&pseudoprime));
    }

    #[test]
    fn validates_supplied_primes() {
        assert!(Prime::new(BigUint::from(23u32), PrimalityTest::Fermat).is_ok());
        // prime, but 1 mod 4
        assert_eq!(Prime::new(BigUint::from(13u32), PrimalityTest::Fermat).err(), Some(Error::NotPrime));
        // 3 mod 4, but composite
        assert_eq!(Prime::new(BigUint::from(15u32), PrimalityTest::Fermat).err(), Some(Error::NotPrime));
    }

    #[test]
    fn prime_pair_rejects_collision() {
        let p = Prime::new(BigUint::from(11u32), PrimalityTest::Fermat).unwrap();
        let q = p.clone();
        assert_eq!(PrimePair::from_primes(p, q).err(), Some(Error::InvalidModulus));
    }

    #[test]
    fn prime_pair_generation() {
        let mut rng = StdRng::seed_from_u64(99);
        let pair = PrimePair::generate(&PrimeGenerator::new(128), &mut rng).unwrap();

        assert!(pair.p() != pair.q());
        let n = pair.modulus().unwrap();
        assert_eq!(n.value(), &(pair.p().value() * pair.q().value()));
    }

    #[test]
    fn parallel_pair_generation() {
        let pair = PrimePair::generate_parallel(&PrimeGenerator::new(128)).unwrap();

        assert_valid(pair.p(), 128);
        assert_valid(pair.q(), 128);
        assert!(pair.p() != pair.q());
    }

    #[test]
    fn smallest_pair_redraws_colliding_q() {
        // Only 19, 23 and 31 qualify at five bits, so q often collides with p.
        let generator = PrimeGenerator::new(MIN_PAIR_BIT_LENGTH);
        for seed in 0..20 {
            let pair = PrimePair::generate(&generator, &mut StdRng::seed_from_u64(seed)).unwrap();

            assert!(pair.p() != pair.q(), "seed = {seed}");
            assert_valid(pair.p(), MIN_PAIR_BIT_LENGTH);
            assert_valid(pair.q(), MIN_PAIR_BIT_LENGTH);
            assert!(pair.modulus().is_ok());
        }
    }

    #[test]
    fn smallest_parallel_pair() {
        let pair = PrimePair::generate_parallel(&PrimeGenerator::new(MIN_PAIR_BIT_LENGTH)).unwrap();
        assert!(pair.p() != pair.q());
    }

    #[test]
    fn pair_rejects_sizes_with_a_single_prime() {
        for bits in 2..MIN_PAIR_BIT_LENGTH {
            let generator = PrimeGenerator::new(bits);
            let expected = Some(Error::InvalidBitLength { min: MIN_PAIR_BIT_LENGTH, actual: bits });

            assert_eq!(PrimePair::generate(&generator, &mut StdRng::seed_from_u64(1)).err(), expected);
            assert_eq!(PrimePair::generate_parallel(&generator).err(), expected);
        }
    }

    #[test]
    fn pair_collision_exhausts_search_bound() {
        // A zero bound leaves no room to redraw.
        let p = Prime::new(BigUint::from(19u32), PrimalityTest::Fermat).unwrap();
        let generator = PrimeGenerator::new(5).max_attempts(0);
        let result = redraw_collision(&generator, &p, p.clone(), &mut StdRng::seed_from_u64(2));

        assert_eq!(result.err(), Some(Error::PrimeSearchExhausted { attempts: 0 }));
    }
}
