use crate::common::{embedded_data_probe, engine_with, Fixture, MINIMAL_PNG};
use stegscan::{Collaborators, PolicyConfig, PolicyPreset, ScanConfig};

fn png_with_tail(len: usize) -> Vec<u8> {
    let mut data = MINIMAL_PNG.to_vec();
    data.extend(std::iter::repeat_n(b'a', len));
    data
}

#[test]
fn tail_threshold_follows_preset() {
    let fx = Fixture::new("cover.bin", &png_with_tail(100));

    let aggressive = engine_with(PolicyConfig::aggressive(), Collaborators::offline())
        .analyze_path(fx.path())
        .expect("analyze");
    assert_eq!(aggressive.tail_bytes, 100);
    assert!(aggressive.suspicious);

    let lenient = engine_with(PolicyConfig::lenient(), Collaborators::offline())
        .analyze_path(fx.path())
        .expect("analyze");
    assert_eq!(lenient.tail_bytes, 100);
    assert!(!lenient.suspicious, "{:?}", lenient.anomalies);
    assert_eq!(lenient.indicators_count, 0);

    let fx = Fixture::new("cover.bin", &png_with_tail(600));
    let lenient = engine_with(PolicyConfig::lenient(), Collaborators::offline())
        .analyze_path(fx.path())
        .expect("analyze");
    assert!(lenient.suspicious);
}

#[test]
fn auxiliary_signals_need_the_lenient_preset() {
    let fx = Fixture::new("notes.txt", "plain text line\n".repeat(40).as_bytes());

    let strict = engine_with(
        PolicyConfig::aggressive(),
        Collaborators::offline().with_probe(embedded_data_probe()),
    )
    .analyze_path(fx.path())
    .expect("analyze");
    assert!(strict.steghide_probe.as_ref().is_some_and(|p| p.suspicious));
    assert!(!strict.suspicious);

    let lenient = engine_with(
        PolicyConfig::lenient(),
        Collaborators::offline().with_probe(embedded_data_probe()),
    )
    .analyze_path(fx.path())
    .expect("analyze");
    assert!(lenient.suspicious);
    assert_eq!(lenient.indicators_count, 0);
}

#[test]
fn preset_round_trip_through_config_json() {
    let cfg = ScanConfig::from_json_str(r#"{"policy": {"tail_bytes_threshold": 512}}"#)
        .expect("parse");
    assert_eq!(cfg.policy.tail_bytes_threshold, 512);
    assert_eq!(cfg.policy.steg_score_threshold, 0.25);

    let preset: PolicyPreset = "Lenient".parse().expect("preset");
    assert_eq!(preset.config(), PolicyConfig::lenient());
    assert!("strict".parse::<PolicyPreset>().is_err());
}
