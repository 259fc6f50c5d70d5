//! spitroast - a deterministic campfire cooking spit simulation
//!
//! Headless executable: runs a scripted scenario against one camp and prints
//! a JSON summary.

mod command_script;
mod commands;
mod config;
mod headless;

use anyhow::Result;
use config::{SpitroastConfig, DEFAULT_CONFIG_PATH};
use headless::HeadlessConfig;
use std::{env, path::PathBuf};
use tracing::info;

fn main() -> Result<()> {
    let cli = CliOptions::parse(env::args().skip(1));

    // WARN by default; RUST_LOG overrides, --verbose raises to INFO.
    let default_filter = if cli.verbose { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    for problem in &cli.problems {
        tracing::error!("{problem}");
    }
    if cli.help {
        print_usage();
        return Ok(());
    }

    info!("Starting spitroast v{}", env!("CARGO_PKG_VERSION"));

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
    let mut config = SpitroastConfig::load_from_path(&config_path);
    if let Some(path) = cli.save.clone() {
        config.save_path = Some(path);
    }
    if cli.load && config.save_path.is_none() {
        anyhow::bail!("--load requires a save path (--save or save_path in config)");
    }

    let summary = headless::run(HeadlessConfig {
        config,
        command_script: cli.script,
        max_ticks: cli.max_ticks,
        load: cli.load,
        events: cli.events,
    })?;

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn print_usage() {
    println!(
        "Usage: spitroast [--config <path>] [--script <path>] [--max-ticks <n>]\n\
         \x20                [--save <path>] [--load] [--events <path>] [--verbose]"
    );
}

#[derive(Debug, Default)]
struct CliOptions {
    config: Option<PathBuf>,
    script: Option<PathBuf>,
    max_ticks: Option<u64>,
    save: Option<PathBuf>,
    load: bool,
    events: Option<PathBuf>,
    verbose: bool,
    help: bool,
    /// Parse errors, reported once logging is up.
    problems: Vec<String>,
}

impl CliOptions {
    fn parse<I: Iterator<Item = String>>(mut args: I) -> Self {
        let mut opts = CliOptions::default();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" => opts.config = opts.path_arg(&arg, args.next()),
                "--script" => opts.script = opts.path_arg(&arg, args.next()),
                "--save" => opts.save = opts.path_arg(&arg, args.next()),
                "--events" => opts.events = opts.path_arg(&arg, args.next()),
                "--load" => opts.load = true,
                "--verbose" | "-v" => opts.verbose = true,
                "--help" | "-h" => opts.help = true,
                "--max-ticks" => {
                    if let Some(raw) = args.next() {
                        match raw.parse::<u64>() {
                            Ok(value) => opts.max_ticks = Some(value),
                            Err(err) => opts
                                .problems
                                .push(format!("--max-ticks must be an integer ({raw}: {err})")),
                        }
                    } else {
                        opts.problems.push("--max-ticks requires an integer".into());
                    }
                }
                other => opts.problems.push(format!("Unknown argument: {other}")),
            }
        }

        opts
    }

    fn path_arg(&mut self, flag: &str, value: Option<String>) -> Option<PathBuf> {
        match value {
            Some(path) => Some(PathBuf::from(path)),
            None => {
                self.problems.push(format!("{flag} requires a file path"));
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliOptions {
        CliOptions::parse(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn parses_all_flags() {
        let opts = parse(&[
            "--config",
            "cfg.toml",
            "--script",
            "demo.json",
            "--max-ticks",
            "400",
            "--save",
            "saves/camp.sp",
            "--load",
            "--events",
            "events.jsonl",
            "--verbose",
        ]);
        assert_eq!(opts.config, Some(PathBuf::from("cfg.toml")));
        assert_eq!(opts.script, Some(PathBuf::from("demo.json")));
        assert_eq!(opts.max_ticks, Some(400));
        assert_eq!(opts.save, Some(PathBuf::from("saves/camp.sp")));
        assert!(opts.load);
        assert_eq!(opts.events, Some(PathBuf::from("events.jsonl")));
        assert!(opts.verbose);
        assert!(opts.problems.is_empty());
    }

    #[test]
    fn collects_problems_instead_of_failing() {
        let opts = parse(&["--max-ticks", "soon", "--frobnicate", "--script"]);
        assert_eq!(opts.max_ticks, None);
        assert_eq!(opts.script, None);
        assert_eq!(opts.problems.len(), 3);
    }
}
