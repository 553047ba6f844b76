//! Branch target prediction core CLI.
//!
//! This binary replays branch traces through the prediction core. It provides:
//! 1. **Run:** Replay a trace file with one independent predictor per core and print statistics.
//! 2. **Config:** Print the effective configuration as JSON, as a starting point for `--config`.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::{fs, process};
use tracing::info;
use tracing_subscriber::EnvFilter;

use btbsim_core::config::Config;
use btbsim_core::sim::{Simulator, TraceReader};

#[derive(Parser, Debug)]
#[command(
    name = "btbsim",
    author,
    version,
    about = "Branch target prediction core (BTB + RAS + indirect table)",
    long_about = "Replay a branch trace through the branch target prediction core.\n\nTrace lines are `<ip> <target> <T|N> <kind> [core]` with kinds cond, call, icall, ind, ret, jmp.\n\nExamples:\n  btbsim run -t traces/gcc.trace\n  btbsim run -t traces/mix.trace --cores 4 --config btb.json\n  btbsim config > btb.json"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay a branch trace and print prediction statistics.
    Run {
        /// Branch trace to replay.
        #[arg(short, long)]
        trace: PathBuf,

        /// JSON configuration file (defaults are used for missing fields).
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Override the number of simulated cores.
        #[arg(long)]
        cores: Option<usize>,
    },

    /// Print the effective configuration as JSON.
    Config {
        /// JSON configuration file to merge with the defaults.
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            trace,
            config,
            cores,
        } => load_config(config.as_deref(), cores).and_then(|config| cmd_run(&trace, &config)),
        Commands::Config { config } => load_config(config.as_deref(), None).and_then(cmd_config),
    };

    if let Err(e) = result {
        eprintln!("[!] FATAL: {e}");
        process::exit(1);
    }
}

/// Installs the stderr log subscriber.
///
/// `RUST_LOG` wins; otherwise the level is `debug` when prediction tracing is
/// enabled in the configuration and `warn` when it is not.
fn init_logging(config: &Config) {
    let default = if config.general.trace_predictions {
        "debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Reads and validates the configuration, applying the core-count override.
fn load_config(path: Option<&Path>, cores: Option<usize>) -> Result<Config, String> {
    let mut config = match path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .map_err(|e| format!("could not read config '{}': {e}", path.display()))?;
            Config::from_json(&text).map_err(|e| e.to_string())?
        }
        None => Config::default(),
    };
    if let Some(n) = cores {
        config.general.num_cores = n;
    }
    config.validate().map_err(|e| e.to_string())?;
    Ok(config)
}

/// Replays `trace` and prints per-core and aggregate statistics.
fn cmd_run(trace: &Path, config: &Config) -> Result<(), String> {
    init_logging(config);

    let mut sim = Simulator::new(config).map_err(|e| e.to_string())?;
    let mut reader = TraceReader::open(trace)
        .map_err(|e| format!("could not open trace '{}': {e}", trace.display()))?;

    info!(trace = %trace.display(), cores = config.general.num_cores, "replaying trace");
    let replayed = sim.run(&mut reader).map_err(|e| e.to_string())?;

    println!("==========================================================");
    println!("BTBSIM REPORT: {} ({} branches)", trace.display(), replayed);
    println!("==========================================================");
    for core in sim.cores() {
        println!("CORE {} (cycle {})", core.id(), core.cycle());
        print!("{}", core.accuracy());
        print!("{}", core.predictor().stats());
        println!("----------------------------------------------------------");
    }
    if sim.cores().len() > 1 {
        println!("ALL CORES");
        print!("{}", sim.accuracy());
    }
    println!("==========================================================");
    Ok(())
}

/// Prints the effective configuration as pretty JSON.
fn cmd_config(config: Config) -> Result<(), String> {
    let json = serde_json::to_string_pretty(&config).map_err(|e| e.to_string())?;
    println!("{json}");
    Ok(())
}
