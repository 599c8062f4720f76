#![no_main]

use libfuzzer_sys::fuzz_target;

fn numeric_string(data: &[u8]) -> String {
    data.iter()
        .take(24)
        .map(|&byte| match byte % 12 {
            0..=9 => char::from(b'0' + (byte % 10)),
            10 => '-',
            _ => '+',
        })
        .collect()
}

fuzz_target!(|data: &[u8]| {
    if let Ok(value) = barrage::fuzzing::parse_positive_usize_input(&numeric_string(data)) {
        debug_assert!(value >= 1);
    }
});
