#![no_main]

use barrage::metrics::OutcomeGroup;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|samples: Vec<(u16, u32, u32)>| {
    let samples: Vec<(u16, u64, u64)> = samples
        .into_iter()
        .map(|(status, duration, ttfb)| (status, u64::from(duration), u64::from(ttfb)))
        .collect();
    let summary = barrage::fuzzing::summarize_results(&samples);

    let counted: u64 = OutcomeGroup::ALL.iter().map(|group| summary.count(*group)).sum();
    debug_assert_eq!(counted, summary.total_requests);
    debug_assert!(summary.failed_requests <= summary.total_requests);
    debug_assert!(summary.duration.min <= summary.duration.mean);
    debug_assert!(summary.duration.mean <= summary.duration.max);
    debug_assert!(!summary.requests_per_second.is_nan());
});
