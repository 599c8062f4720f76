#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(args) = barrage::fuzzing::apply_config_from_json(data) {
        debug_assert!(args.concurrent.get() >= 1);
        debug_assert!(!args.connect_timeout.is_zero());
    }
});
