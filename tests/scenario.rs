// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

use bbs_otp::{
    BitSequence, Error, Modulus, PrimalityTest, RunsVerdict, Session, bits_to_text, fermat_base2, generate_key,
    generate_prime, make_modulus, monobit_test, runs_test, text_to_bits, xor_bits,
};
use num_bigint_dig::BigUint;
use num_bigint_dig::prime::probably_prime;
use num_traits::ToPrimitive;
use rand::SeedableRng;
use rand::rngs::{OsRng, StdRng};

#[test]
fn encrypts_and_recovers_ab_with_512_bit_primes() {
    let mut rng = StdRng::seed_from_u64(0x4142);

    let message = text_to_bits("AB").unwrap();
    assert_eq!(message.to_string(), "0100000101000010");

    let p = generate_prime(512, &mut rng).unwrap();
    let q = generate_prime(512, &mut rng).unwrap();
    for prime in [&p, &q] {
        assert_eq!(prime.bits(), 512);
        assert_eq!((prime.value() % 4u32).to_u32(), Some(3));
        assert!(fermat_base2(prime.value()));
    }

    let n = make_modulus(&p, &q).unwrap();
    assert!(n.bits() >= 1023);

    let key = generate_key(message.len(), &n, &mut rng).unwrap();
    assert_eq!(key.len(), 16);

    let ciphertext = xor_bits(&message, &key).unwrap();
    let decrypted = xor_bits(&ciphertext, &key).unwrap();
    assert_eq!(bits_to_text(&decrypted).unwrap(), "AB");
}

#[test]
fn os_entropy_session() {
    let session = Session::builder().prime_bits(256).build();
    let output = session.run("Blum Blum Shub", &mut OsRng).unwrap();

    assert_eq!(output.plaintext, "Blum Blum Shub");
    assert_eq!(output.key.len(), 14 * 8);
    assert_eq!(bits_to_text(&xor_bits(&output.ciphertext, &output.key).unwrap()).unwrap(), "Blum Blum Shub");
}

#[test]
fn miller_rabin_session_produces_real_primes() {
    let mut rng = StdRng::seed_from_u64(31);
    let generator = bbs_otp::PrimeGenerator::new(192).primality(PrimalityTest::MillerRabin { rounds: 20 });
    let pair = bbs_otp::PrimePair::generate(&generator, &mut rng).unwrap();

    assert!(probably_prime(pair.p().value(), 20));
    assert!(probably_prime(pair.q().value(), 20));
}

#[test]
fn key_stream_is_scored_by_both_tests() {
    let mut rng = StdRng::seed_from_u64(80_022);
    let p = generate_prime(256, &mut rng).unwrap();
    let q = generate_prime(256, &mut rng).unwrap();
    let n = make_modulus(&p, &q).unwrap();

    let key = generate_key(20_000, &n, &mut rng).unwrap();

    let monobit = monobit_test(&key).unwrap();
    let runs = runs_test(&key).unwrap();

    assert!(monobit.p_value > 0.0 && monobit.p_value <= 1.0);
    assert_eq!(monobit.passed, monobit.p_value > 0.01);
    assert!(runs.is_applicable(), "pre-test must pass for a BBS stream: {runs:?}");
}

#[test]
fn key_files_use_ascii_bits() {
    let n = Modulus::new(BigUint::from(253u32)).unwrap();
    let key = generate_key(40, &n, &mut StdRng::seed_from_u64(8)).unwrap();

    let on_disk = key.to_string();
    assert_eq!(on_disk.len(), 40);
    assert!(on_disk.chars().all(|c| c == '0' || c == '1'));
    assert_eq!(on_disk.parse::<BitSequence>().unwrap(), key);
}

#[test]
fn mismatched_lengths_are_never_truncated() {
    let message = text_to_bits("ABC").unwrap();
    let n = Modulus::new(BigUint::from(253u32)).unwrap();
    let key = generate_key(16, &n, &mut StdRng::seed_from_u64(1)).unwrap();

    assert_eq!(xor_bits(&message, &key), Err(Error::LengthMismatch { left: 24, right: 16 }));
}

#[test]
fn runs_test_reports_not_applicable_for_all_ones() {
    let ones = BitSequence::new(vec![true; 256]);
    assert!(matches!(runs_test(&ones).unwrap(), RunsVerdict::NotApplicable(_)));
}
