use crate::common::{engine_with, FakeScanner, Fixture, MINIMAL_PNG};
use stegscan::probes::Capability;
use stegscan::{Collaborators, PolicyConfig};

#[test]
fn scanner_findings_raise_an_indicator() {
    let fx = Fixture::new("pixel.png", MINIMAL_PNG);
    let collaborators = Collaborators::offline().with_scanner(FakeScanner::with(&[
        (0, "PNG image, 1 x 1, 8-bit/color RGB"),
        (4096, "Zip archive data, at least v2.0 to extract"),
    ]));
    let report = engine_with(PolicyConfig::aggressive(), collaborators)
        .analyze_path(fx.path())
        .expect("analyze");

    assert!(report.supported);
    assert_eq!(report.findings.len(), 1);
    assert_eq!(report.findings[0].offset, 4096);
    assert!(report.suspicious);
    assert_eq!(report.indicators_count, 1);
}

#[test]
fn min_offset_comes_from_the_policy() {
    let fx = Fixture::new("pixel.png", MINIMAL_PNG);
    let scanner = || FakeScanner::with(&[(100, "gzip compressed data")]);

    let aggressive = engine_with(
        PolicyConfig::aggressive(),
        Collaborators::offline().with_scanner(scanner()),
    )
    .analyze_path(fx.path())
    .expect("analyze");
    assert!(aggressive.findings.is_empty());
    assert!(aggressive.supported);

    let lenient = engine_with(
        PolicyConfig::lenient(),
        Collaborators::offline().with_scanner(scanner()),
    )
    .analyze_path(fx.path())
    .expect("analyze");
    assert_eq!(lenient.findings.len(), 1);
    assert!(lenient.suspicious);
}

#[test]
fn without_a_decoder_lsb_reads_bytes() {
    let fx = Fixture::new("pixel.png", MINIMAL_PNG);
    let collaborators =
        Collaborators::offline().with_decoder(Capability::Unavailable("none".to_string()));
    let report = engine_with(PolicyConfig::aggressive(), collaborators)
        .analyze_path(fx.path())
        .expect("analyze");
    let lsb = report.lsb_analysis.expect("lsb section");
    assert_eq!(lsb.bytes_sampled, Some(MINIMAL_PNG.len() as u64));
    assert!(!lsb.rgb_conversion);
}
