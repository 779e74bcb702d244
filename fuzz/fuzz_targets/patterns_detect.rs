#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let cfg = stegscan::config::PatternConfig::default();
    let _ = stegscan::patterns::detect_steganographic_patterns(data, &cfg);
    let _ = stegscan::overlay::trailing_bytes(data);
});
