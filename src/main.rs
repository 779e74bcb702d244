use std::ffi::OsString;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use stegscan::config::{PolicyPreset, ScanConfig};
use stegscan::logging;
use stegscan::Engine;

#[derive(Parser)]
#[command(name = "stegscan", version, about = "Flag files that may carry hidden payloads")]
struct Args {
    /// File to analyze
    #[arg(allow_hyphen_values = true)]
    path: Option<PathBuf>,
    /// Ignored; only the first operand is analyzed
    #[arg(hide = true, trailing_var_arg = true, allow_hyphen_values = true)]
    rest: Vec<OsString>,
    /// JSON configuration file (overrides STEGSCAN_CONFIG)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Verdict policy preset (overrides STEGSCAN_POLICY)
    #[arg(long)]
    policy: Option<PolicyPreset>,
    /// Pretty-print the report
    #[arg(long)]
    pretty: bool,
}

fn load_config(args: &Args) -> Result<ScanConfig> {
    let mut config = match &args.config {
        Some(path) => ScanConfig::load(Some(path.as_path()))
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => ScanConfig::from_env().context("loading configuration from environment")?,
    };
    if let Some(preset) = args.policy {
        config.policy = preset.config();
    }
    config.validate().context("validating configuration")?;
    Ok(config)
}

fn main() -> Result<()> {
    logging::init_from_env();
    let args = Args::parse();
    if !args.rest.is_empty() {
        tracing::debug!(ignored = args.rest.len(), "extra operands ignored");
    }
    let config = load_config(&args)?;

    let engine = Engine::discover(config);
    let report = engine
        .run(args.path.as_deref())
        .context("analyzing input file")?;

    let json = if args.pretty {
        report.to_json_pretty()?
    } else {
        report.to_json_string()?
    };
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(json.as_bytes())?;
    stdout.flush()?;
    Ok(())
}
