#![no_main]

use libfuzzer_sys::fuzz_target;
use num_bigint_dig::BigUint;
use rand::SeedableRng;
use rand::rngs::StdRng;

use bbs_otp::{BbsGenerator, Modulus, generate_key};

fuzz_target!(|input: (u64, u16, Vec<u8>)| {
    let (seed, length, seed_bytes) = input;
    let length = usize::from(length);

    // 1_000_003 · 1_000_039, both ≡ 3 (mod 4)
    let modulus = Modulus::new(BigUint::from(1_000_003u64 * 1_000_039u64)).unwrap();

    let key = generate_key(length, &modulus, &mut StdRng::seed_from_u64(seed)).expect("seeded rng never fails");
    assert_eq!(key.len(), length);

    // Explicit seeds are deterministic or rejected as fixed points.
    let explicit = BigUint::from_bytes_be(&seed_bytes);
    if let Ok(mut a) = BbsGenerator::from_seed(modulus.clone(), explicit.clone()) {
        let mut b = BbsGenerator::from_seed(modulus, explicit).expect("same seed accepted twice");
        assert_eq!(a.take_bits(64), b.take_bits(64));
    }
});
