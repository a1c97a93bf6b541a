//! Circular Motion viewer and exporter.
//!
//! Usage:
//!
//! ```text
//! circular-motion [CONFIG.json] [--size N] [--count N] [--offset N] [--seed N]
//!                 [--export PATH] [--frames N]
//! ```
//!
//! Without `--export` a window opens (Space toggles the animation, Escape
//! quits). With `--export` the frames are rendered headlessly and written
//! to PATH. Flags override values from the config file.

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;

use circular_motion::export::{self, DEFAULT_EXPORT_FRAMES};
use circular_motion::{window, PartialOptions};
use log::{error, warn};

const USAGE: &str = "Usage: circular-motion [CONFIG.json] [--size N] [--count N] [--offset N] [--seed N] [--export PATH] [--frames N]";

#[derive(Debug, Default, PartialEq)]
struct Cli {
    config: Option<PathBuf>,
    overrides: PartialOptions,
    export: Option<PathBuf>,
    frames: Option<u32>,
}

fn value<T: FromStr>(flag: &str, raw: Option<String>) -> Result<T, String> {
    let raw = raw.ok_or_else(|| format!("{} expects a value", flag))?;
    raw.parse()
        .map_err(|_| format!("Invalid value for {}: '{}'", flag, raw))
}

fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<Cli, String> {
    let mut cli = Cli::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--size" => cli.overrides.size = Some(value(&arg, args.next())?),
            "--count" => cli.overrides.count_particles = Some(value(&arg, args.next())?),
            "--offset" => cli.overrides.offset_center = Some(value(&arg, args.next())?),
            "--seed" => cli.overrides.seed = Some(value(&arg, args.next())?),
            "--export" => cli.export = Some(value(&arg, args.next())?),
            "--frames" => cli.frames = Some(value(&arg, args.next())?),
            flag if flag.starts_with("--") => return Err(format!("Unknown flag: {}", flag)),
            path if cli.config.is_none() => cli.config = Some(PathBuf::from(path)),
            extra => return Err(format!("Unexpected argument: {}", extra)),
        }
    }

    Ok(cli)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = match parse_args(env::args().skip(1)) {
        Ok(cli) => cli,
        Err(e) => {
            error!("{}", e);
            eprintln!("{}", USAGE);
            return ExitCode::FAILURE;
        }
    };

    let base = match &cli.config {
        Some(path) => match PartialOptions::load(path) {
            Ok(options) => options,
            Err(e) => {
                warn!("Failed to load config from {:?}: {}", path, e);
                warn!("Using default configuration.");
                PartialOptions::default()
            }
        },
        None => PartialOptions::default(),
    };
    let options = base.overlay(cli.overrides);

    let result = match cli.export {
        Some(path) => export::export(options, cli.frames.unwrap_or(DEFAULT_EXPORT_FRAMES), path)
            .map_err(|e| e.to_string()),
        None => window::run(options).map_err(|e| e.to_string()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_no_arguments() {
        assert_eq!(parse_args(args(&[])).unwrap(), Cli::default());
    }

    #[test]
    fn test_config_and_flags() {
        let cli = parse_args(args(&[
            "ring.json", "--size", "400", "--count", "50", "--offset", "20.5", "--seed", "9",
        ]))
        .unwrap();

        assert_eq!(cli.config, Some(PathBuf::from("ring.json")));
        assert_eq!(cli.overrides.size, Some(400));
        assert_eq!(cli.overrides.count_particles, Some(50));
        assert_eq!(cli.overrides.offset_center, Some(20.5));
        assert_eq!(cli.overrides.seed, Some(9));
        assert_eq!(cli.export, None);
    }

    #[test]
    fn test_export_flags() {
        let cli = parse_args(args(&["--export", "out.png", "--frames", "30"])).unwrap();
        assert_eq!(cli.export, Some(PathBuf::from("out.png")));
        assert_eq!(cli.frames, Some(30));
        assert_eq!(cli.config, None);
    }

    #[test]
    fn test_errors() {
        assert!(parse_args(args(&["--size"])).is_err());
        assert!(parse_args(args(&["--size", "big"])).is_err());
        assert!(parse_args(args(&["--count", "-3"])).is_err());
        assert!(parse_args(args(&["--fast"])).is_err());
        assert!(parse_args(args(&["a.json", "b.json"])).is_err());
    }
}
