#![no_main]

use libfuzzer_sys::fuzz_target;

use bbs_otp::{BitSequence, Error, RunsVerdict, monobit_test, runs_test};

fuzz_target!(|data: &[u8]| {
    let bits = BitSequence::from_bytes(data);

    if bits.is_empty() {
        assert_eq!(monobit_test(&bits), Err(Error::EmptySequence));
        assert_eq!(runs_test(&bits), Err(Error::EmptySequence));
        return;
    }

    let monobit = monobit_test(&bits).expect("non-empty input");
    assert!((0.0..=1.0).contains(&monobit.p_value), "p = {}", monobit.p_value);
    assert_eq!(monobit.passed, monobit.p_value > 0.01);

    match runs_test(&bits).expect("non-empty input") {
        RunsVerdict::Completed { verdict, runs, proportion } => {
            assert!((0.0..=1.0).contains(&verdict.p_value), "p = {}", verdict.p_value);
            assert!(runs >= 1 && runs <= bits.len());
            assert!(proportion > 0.0 && proportion < 1.0);
        }
        RunsVerdict::NotApplicable(_) => {}
    }
});
