use anyhow::{bail, Context, Result};
use env_logger::Env;
use log::{error, info};
use spike_core::params::ProofConfig;
use spike_core::pipeline::run_proof;
use std::env;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

struct Options {
    config: Option<PathBuf>,
    json: bool,
}

fn parse_args() -> Result<Option<Options>> {
    let mut options = Options {
        config: None,
        json: false,
    };
    for arg in env::args().skip(1) {
        match arg.as_str() {
            "--json" => options.json = true,
            "--help" | "-h" => {
                print_help();
                return Ok(None);
            }
            flag if flag.starts_with('-') => bail!("unknown argument '{flag}'"),
            path => {
                if options.config.is_some() {
                    bail!("only one configuration file may be given");
                }
                options.config = Some(PathBuf::from(path));
            }
        }
    }
    Ok(Some(options))
}

fn print_help() {
    println!("usage: spike [--json] [CONFIG.json]");
    println!();
    println!("Runs the existence proof for the reduced Gray-Scott spike.");
    println!("Fields missing from CONFIG.json take their default values.");
}

fn load_config(path: Option<&PathBuf>) -> Result<ProofConfig> {
    let Some(path) = path else {
        info!("no configuration file given, using defaults");
        return Ok(ProofConfig::default());
    };
    info!("loading configuration from {}", path.display());
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    parse_config(&text).with_context(|| format!("Failed to parse {}", path.display()))
}

fn parse_config(text: &str) -> Result<ProofConfig> {
    Ok(serde_json::from_str(text)?)
}

fn run() -> Result<bool> {
    let Some(options) = parse_args()? else {
        return Ok(true);
    };
    let config = load_config(options.config.as_ref())?;
    let report = run_proof(&config)?;
    if options.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{report}");
    }
    if report.is_success() {
        info!("both proofs succeeded");
    } else {
        info!("at least one proof failed");
    }
    Ok(report.is_success())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    match run() {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(err) => {
            error!("{err:#}");
            ExitCode::from(1)
        }
    }
}
