#![no_main]
use libfuzzer_sys::fuzz_target;
use std::path::Path;
use stegscan::{Collaborators, Engine, ScanConfig};

fuzz_target!(|data: &[u8]| {
    let engine = Engine::new(ScanConfig::default(), Collaborators::offline());
    let name = match data.first().map(|b| b % 4) {
        Some(0) => "f.jpg",
        Some(1) => "f.png",
        Some(2) => "f.gif",
        _ => "f.bin",
    };
    let report = engine.analyze_bytes(data, Path::new(name));
    assert!((0.0..=8.0).contains(&report.entropy));
    assert!((0.0..=1.0).contains(&report.steg_score.value()));
    let _ = report.to_json_string();
});
