// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Blum-Blum-Shub One-Time Pad
//!
//! Symmetric encryption whose key stream comes from the Blum-Blum-Shub
//! generator over a modulus `n = p·q` with `p ≡ q ≡ 3 (mod 4)`. Message and
//! key are XORed bit by bit, and the key stream is scored with the NIST
//! SP 800-22 frequency (monobit) and runs tests.
//!
//! Reference: [Blum, Blum & Shub (1986), SIAM J. Comput.](https://doi.org/10.1137/0215025)
//!
//! ## Security
//!
//! A one-time pad is only as good as its key: never reuse a key, and keep the
//! factors of `n` secret. Primes, generator state and pad keys are zeroized
//! on drop via the `zeroize` crate. The default primality check is a single
//! Fermat round to base 2; use [`PrimalityTest::MillerRabin`] for a stronger
//! guarantee.
//!
//! ## Example
//!
//! ```rust,no_run
//! use bbs_otp::{bits_to_text, generate_key, generate_prime, make_modulus, monobit_test, text_to_bits, xor_bits};
//! use rand::rngs::OsRng;
//!
//! let mut rng = OsRng;
//! let p = generate_prime(512, &mut rng).expect("prime generation failed");
//! let q = generate_prime(512, &mut rng).expect("prime generation failed");
//! let n = make_modulus(&p, &q).expect("primes must differ");
//!
//! let message = text_to_bits("AB").expect("message must be one byte per character");
//! let key = generate_key(message.len(), &n, &mut rng).expect("key generation failed");
//!
//! let ciphertext = xor_bits(&message, &key).expect("lengths match");
//! let decrypted = xor_bits(&ciphertext, &key).expect("lengths match");
//! assert_eq!(bits_to_text(&decrypted).unwrap(), "AB");
//!
//! let verdict = monobit_test(&key).expect("key is not empty");
//! println!("monobit p-value: {}", verdict.p_value);
//! ```

mod bbs;
mod bits;
mod error;
mod modulus;
mod otp;
mod prime;
mod session;
mod stats;

pub use bbs::*;
pub use bits::*;
pub use error::*;
pub use modulus::*;
pub use otp::*;
pub use prime::*;
pub use session::*;
pub use stats::*;
