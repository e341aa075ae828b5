//! Branch-recovery capture CLI.
//!
//! This binary drives the capture library outside a live debugger. It provides:
//! 1. **Replay:** Run the debugger commands against dumped simulator state, stop by stop.
//! 2. **Config check:** Parse a configuration file and print the effective settings.
//!
//! Records go to stdout (and the log file, when logging); diagnostics go to
//! stderr and are filtered with `RUST_LOG`.

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use recprobe_core::config::Config;
use recprobe_core::session::Session;
use tracing_subscriber::EnvFilter;

mod replay;

use replay::ReplayScript;

#[derive(Parser, Debug)]
#[command(
    name = "recprobe",
    author,
    version,
    about = "Branch-recovery window capture for out-of-order simulators",
    long_about = "Replays dumped debugger stops through the capture commands.\n\nExamples:\n  recprobe replay stops.json\n  recprobe replay stops.json --log recovery.log --config capture.json\n  recprobe check-config capture.json"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay a JSON script of breakpoint stops.
    Replay {
        /// Replay script path.
        script: PathBuf,

        /// Capture configuration (JSON). Defaults are used when omitted.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Start logging to this file before the first stop.
        #[arg(short, long)]
        log: Option<String>,

        /// Do not print the per-address summary at the end.
        #[arg(long)]
        no_summary: bool,
    },

    /// Parse a configuration file and print the effective settings.
    CheckConfig {
        /// Configuration path.
        path: PathBuf,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Replay {
            script,
            config,
            log,
            no_summary,
        } => cmd_replay(&script, config.as_deref(), log.as_deref(), no_summary),
        Commands::CheckConfig { path } => cmd_check_config(&path),
    }
}

fn load_config(path: Option<&Path>) -> Config {
    path.map_or_else(Config::default, |p| {
        Config::load(p).unwrap_or_else(|e| {
            eprintln!("Error reading config {}: {}", p.display(), e);
            process::exit(1);
        })
    })
}

/// Replays every stop of `script`, then prints the misprediction summary.
fn cmd_replay(script: &Path, config: Option<&Path>, log: Option<&str>, no_summary: bool) {
    let config = load_config(config);
    let script = ReplayScript::load(script).unwrap_or_else(|e| {
        eprintln!("Error reading script {}: {}", script.display(), e);
        process::exit(1);
    });

    let mut session = Session::new(config);
    if let Some(path) = log {
        if let Err(e) = session.start_log(Some(path)) {
            eprintln!("{e}");
            process::exit(1);
        }
    }

    let tally = script.run(&mut session);

    if let Err(e) = session.stop_log() {
        eprintln!("Error closing log: {e}");
    }

    if !no_summary {
        let counters = session.counters();
        println!();
        println!(
            "[*] {} records, {} skipped, {} failed",
            tally.recorded, tally.skipped, tally.failed
        );
        println!(
            "[*] Mispredictions: {} across {} PCs",
            counters.total(),
            counters.len()
        );
        for (addr, count) in counters.hottest() {
            let pc = addr.to_string();
            println!("    PC {pc:<18} #{count}");
        }
    }

    if tally.failed > 0 {
        process::exit(2);
    }
}

/// Prints the effective configuration as JSON.
fn cmd_check_config(path: &Path) {
    let config = load_config(Some(path));
    match serde_json::to_string_pretty(&config) {
        Ok(text) => println!("{text}"),
        Err(e) => {
            eprintln!("Error rendering config: {e}");
            process::exit(1);
        }
    }
}
