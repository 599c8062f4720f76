#![no_main]

use barrage::metrics::OutcomeGroup;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|code: i64| {
    let group = barrage::fuzzing::classify_status_input(code);
    if (100..=599).contains(&code) {
        debug_assert_ne!(group, OutcomeGroup::Unknown);
    } else {
        debug_assert_eq!(group, OutcomeGroup::Unknown);
    }
});
