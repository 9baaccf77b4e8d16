#![no_main]

use libfuzzer_sys::fuzz_target;

use bbs_otp::{BitSequence, bits_to_text, text_to_bits};

fuzz_target!(|data: &[u8]| {
    // ----- 1. Bytes mapped to single-byte characters always roundtrip -----
    let text: String = data.iter().map(|&b| char::from(b)).collect();
    let bits = text_to_bits(&text).expect("every char fits in one byte");
    assert_eq!(bits.len(), data.len() * 8);
    assert_eq!(bits_to_text(&bits).expect("byte aligned"), text);

    // ----- 2. Arbitrary UTF-8 either converts or reports the offending char -----
    if let Ok(s) = std::str::from_utf8(data) {
        match text_to_bits(s) {
            Ok(bits) => assert_eq!(bits_to_text(&bits).unwrap(), s),
            Err(err) => assert!(s.chars().any(|c| u32::from(c) > 0xff), "{err}"),
        }

        // ----- 3. The ASCII bit-file parser never panics -----
        if let Ok(parsed) = s.parse::<BitSequence>() {
            assert_eq!(parsed.to_string(), s);
        }
    }
});
