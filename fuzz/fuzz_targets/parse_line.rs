#![no_main]

use frameprof::aggregator::Aggregator;
use frameprof::profile::Profile;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        // Feed every line through one aggregator; no input may panic or
        // leave the profile internally inconsistent.
        let mut profile = Profile::new();
        let mut aggregator = Aggregator::new();
        for line in input.lines() {
            let _ = aggregator.parse_line(line, &mut profile);
        }

        for frame in &profile.frames {
            assert!(frame.calls.len() <= profile.calls.len());
        }
    }
});
