#![no_main]

use libfuzzer_sys::fuzz_target;

use bbs_otp::{BitSequence, Error, xor_bits};

fuzz_target!(|data: &[u8]| {
    // First half is the message, second half the key.
    let (message, key) = data.split_at(data.len() / 2);
    let message = BitSequence::from_bytes(message);
    let key = BitSequence::from_bytes(key);

    match xor_bits(&message, &key) {
        Ok(ciphertext) => {
            let decrypted = xor_bits(&ciphertext, &key).expect("lengths already matched");
            assert_eq!(decrypted, message, "XOR roundtrip failed");
        }
        Err(Error::LengthMismatch { left, right }) => {
            assert_ne!(left, right);
            assert_eq!((left, right), (message.len(), key.len()));
        }
        Err(other) => panic!("unexpected error: {other}"),
    }
});
