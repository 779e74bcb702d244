//! Common test utilities and helpers.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use stegscan::probes::{
    Finding, PassphraseProbe, ScanModule, SignatureScanner, SteghideProbe,
};
use stegscan::{Collaborators, Engine, PolicyConfig, ScanConfig};
use tempfile::TempDir;

/// Valid 1x1 RGB PNG, IEND last.
pub const MINIMAL_PNG: &[u8] = &[
    0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x02, 0x00, 0x00, 0x00, 0x90,
    0x77, 0x53, 0xde, 0x00, 0x00, 0x00, 0x0c, 0x49, 0x44, 0x41, 0x54, 0x78, 0xda, 0x63, 0xf8,
    0xcf, 0xc0, 0x00, 0x00, 0x03, 0x01, 0x01, 0x00, 0xf7, 0x03, 0x41, 0x43, 0x00, 0x00, 0x00,
    0x00, 0x49, 0x45, 0x4e, 0x44, 0xae, 0x42, 0x60, 0x82,
];

/// A temp directory holding one file; the directory lives as long as the fixture.
pub struct Fixture {
    _dir: TempDir,
    pub path: PathBuf,
}

impl Fixture {
    pub fn new(name: &str, data: &[u8]) -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join(name);
        std::fs::write(&path, data).expect("write fixture");
        Self { _dir: dir, path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Deterministic xorshift bytes.
pub fn pseudo_random(len: usize, seed: u64) -> Vec<u8> {
    let mut state = seed | 1;
    (0..len)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            (state >> 24) as u8
        })
        .collect()
}

pub fn engine_with(policy: PolicyConfig, collaborators: Collaborators) -> Engine {
    let config = ScanConfig {
        policy,
        ..ScanConfig::default()
    };
    Engine::new(config, collaborators)
}

/// Engine with no external tools and the default policy.
pub fn offline_engine() -> Engine {
    engine_with(PolicyConfig::default(), Collaborators::offline())
}

/// Scanner returning a fixed result table.
pub struct FakeScanner {
    pub findings: Vec<Finding>,
}

impl FakeScanner {
    pub fn with(findings: &[(u64, &str)]) -> Box<Self> {
        Box::new(Self {
            findings: findings
                .iter()
                .map(|(offset, description)| Finding {
                    offset: *offset,
                    description: description.to_string(),
                })
                .collect(),
        })
    }
}

impl SignatureScanner for FakeScanner {
    fn name(&self) -> &str {
        "fake-scanner"
    }

    fn scan(&self, _path: &Path) -> stegscan::Result<Vec<ScanModule>> {
        Ok(vec![ScanModule {
            name: "signature".to_string(),
            results: self.findings.clone(),
        }])
    }
}

/// Probe that always answers with the same classification.
pub struct FakeProbe(pub SteghideProbe);

impl PassphraseProbe for FakeProbe {
    fn probe(&self, _path: &Path) -> SteghideProbe {
        self.0.clone()
    }
}

/// A probe answer that reports embedded data.
pub fn embedded_data_probe() -> Box<FakeProbe> {
    Box::new(FakeProbe(SteghideProbe::classify(
        Some(0),
        "embedded data:\n  size: 2.0 KB",
        "",
        2000,
    )))
}
