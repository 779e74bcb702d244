use crate::common::{offline_engine, pseudo_random, Fixture, MINIMAL_PNG};

#[test]
fn json_output_is_stable_for_same_input() {
    let mut data = MINIMAL_PNG.to_vec();
    data.extend(pseudo_random(20_000, 42));
    let fx = Fixture::new("stable.png", &data);
    let engine = offline_engine();
    let a1 = engine.analyze_path(fx.path()).expect("analyze1");
    let a2 = engine.analyze_path(fx.path()).expect("analyze2");
    let j1 = a1.to_json_string().expect("json1");
    let j2 = a2.to_json_string().expect("json2");
    assert_eq!(j1, j2, "JSON outputs differ across identical runs");
}

#[test]
fn report_schema_has_expected_keys() {
    let fx = Fixture::new("pixel.png", MINIMAL_PNG);
    let report = offline_engine().analyze_path(fx.path()).expect("analyze");
    let value: serde_json::Value =
        serde_json::from_str(&report.to_json_string().expect("json")).expect("parse");
    for key in [
        "supported",
        "suspicious",
        "findings",
        "tail_bytes",
        "anomalies",
        "steg_score",
        "entropy",
        "indicators_count",
        "chi_square",
        "structural_anomalies_count",
        "lsb_analysis",
        "steghide_probe",
    ] {
        assert!(value.get(key).is_some(), "missing key {key}");
    }
    assert!(value.get("error").is_none());
    assert_eq!(value["steghide_probe"]["status"], "missing");
    assert!(value["findings"].is_array());
}
