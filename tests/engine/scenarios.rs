use crate::common::{offline_engine, pseudo_random, Fixture, MINIMAL_PNG};
use stegscan::lsb::LsbMethod;
use stegscan::probes::ProbeStatus;
use stegscan::ReportError;

#[test]
fn empty_file_is_clean() {
    let fx = Fixture::new("empty.png", &[]);
    let report = offline_engine().analyze_path(fx.path()).expect("analyze");
    assert_eq!(report.tail_bytes, 0);
    assert_eq!(report.entropy, 0.0);
    assert_eq!(report.steg_score.value(), 0.0);
    // header and footer checks still apply to an empty .png
    assert_eq!(
        report.anomalies,
        vec![
            "PNG header missing or invalid".to_string(),
            "PNG footer missing or corrupted".to_string()
        ]
    );

    let fx = Fixture::new("empty.bin", &[]);
    let report = offline_engine().analyze_path(fx.path()).expect("analyze");
    assert!(!report.suspicious);
    assert!(report.anomalies.is_empty());
    assert_eq!(report.indicators_count, 0);
    let lsb = report.lsb_analysis.expect("lsb section");
    assert!(!lsb.supported);
    assert!(!lsb.suspicious);
}

#[test]
fn clean_png_is_not_suspicious() {
    let fx = Fixture::new("pixel.png", MINIMAL_PNG);
    let report = offline_engine().analyze_path(fx.path()).expect("analyze");
    assert_eq!(report.tail_bytes, 0);
    assert_eq!(report.structural_anomalies_count, 0);
    assert!(report.steg_score.value() <= 0.25);
    assert!(!report.suspicious, "{:?}", report.anomalies);
}

#[cfg(feature = "image-decode")]
#[test]
fn clean_png_is_sampled_as_pixels() {
    let fx = Fixture::new("pixel.png", MINIMAL_PNG);
    let report = offline_engine().analyze_path(fx.path()).expect("analyze");
    let lsb = report.lsb_analysis.expect("lsb section");
    assert_eq!(lsb.method, LsbMethod::DecodedRgb);
    assert_eq!(lsb.pixels_sampled, Some(1));
    assert_eq!((lsb.width, lsb.height), (Some(1), Some(1)));
    assert!(!lsb.suspicious);
}

#[test]
fn zip_appended_after_iend() {
    let mut data = MINIMAL_PNG.to_vec();
    data.extend_from_slice(b"PK\x03\x04secret.txt");
    let fx = Fixture::new("cover.png", &data);
    let report = offline_engine().analyze_path(fx.path()).expect("analyze");

    assert_eq!(report.tail_bytes, 14);
    assert!(report.steg_score.value() > 0.0);
    assert!(report.suspicious);
    assert!(report.anomalies.iter().any(|a| a.contains("ZIP")));
    assert!(report.anomalies.contains(&format!(
        "ZIP local header at offset {} (in tail data)",
        MINIMAL_PNG.len()
    )));
    // file no longer ends with the IEND chunk
    assert_eq!(report.anomalies[0], "PNG footer missing or corrupted");
    assert!(report.indicators_count >= 3);
}

#[test]
fn random_bytes_named_png() {
    let data = pseudo_random(1 << 20, 0x5eed);
    let fx = Fixture::new("noise.png", &data);
    let report = offline_engine().analyze_path(fx.path()).expect("analyze");

    assert!(report
        .anomalies
        .contains(&"PNG header missing or invalid".to_string()));
    assert!(report.suspicious);
    assert!(report.entropy > 7.9 && report.entropy <= 8.0);
    // undecodable input falls back to the byte stream
    let lsb = report.lsb_analysis.expect("lsb section");
    assert_eq!(lsb.method, LsbMethod::ByteStream);
    assert_eq!(lsb.bytes_sampled, Some(524_288));
}

#[test]
fn jpeg_extension_without_soi() {
    let fx = Fixture::new("x.jpg", b"GIF89a not really a jpeg");
    let report = offline_engine().analyze_path(fx.path()).expect("analyze");
    assert!(report
        .anomalies
        .contains(&"JPEG header missing or invalid".to_string()));
    assert!(report.suspicious);
}

#[test]
fn absent_probe_never_counts() {
    let fx = Fixture::new("pixel.png", MINIMAL_PNG);
    let report = offline_engine().analyze_path(fx.path()).expect("analyze");
    let probe = report.steghide_probe.expect("probe section");
    assert!(!probe.supported);
    assert!(!probe.available);
    assert_eq!(probe.status, ProbeStatus::Missing);
    assert!(!report.suspicious);
}

#[test]
fn input_errors_are_reported_in_band() {
    let engine = offline_engine();
    let report = engine.run(None).expect("run");
    assert_eq!(report.error, Some(ReportError::MissingPath));

    let dir = tempfile::tempdir().expect("tempdir");
    let report = engine
        .run(Some(dir.path().join("gone.png").as_path()))
        .expect("run");
    assert_eq!(report.error, Some(ReportError::MissingFile));
    assert!(!report.suspicious);
}

#[test]
fn bounds_hold_for_varied_inputs() {
    let inputs: Vec<(&str, Vec<u8>)> = vec![
        ("a.bin", vec![0u8; 3000]),
        ("b.gif", b"GIF89a;;;;".to_vec()),
        ("c.jpeg", pseudo_random(70_000, 7)),
        ("d.png", [MINIMAL_PNG, &pseudo_random(4096, 9)[..]].concat()),
    ];
    for (name, data) in inputs {
        let fx = Fixture::new(name, &data);
        let report = offline_engine().analyze_path(fx.path()).expect("analyze");
        assert!((0.0..=8.0).contains(&report.entropy), "{name}");
        assert!((0.0..=1.0).contains(&report.steg_score.value()), "{name}");
        assert!((0.0..=1.0).contains(&report.chi_square), "{name}");
        assert!(report.indicators_count <= 4, "{name}");
        assert!(report.tail_bytes <= data.len() as u64, "{name}");
    }
}
