//! gauge-cli: replay gauge controller scenarios from the command line.

mod config;
mod logging;
mod scenario;
mod state;

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;

use config::{CliConfig, Overrides};

#[derive(Parser)]
#[command(name = "gauge-cli", about = "Gauge controller scenario simulator")]
struct Cli {
    /// Path to a TOML configuration file. File settings are the base;
    /// flags and env vars override them.
    #[arg(long, env = "GAUGE_CONFIG")]
    config: Option<PathBuf>,

    /// Checkpoints retained per ledger.
    #[arg(long, env = "GAUGE_RING_CAPACITY")]
    ring_capacity: Option<u32>,

    /// Scale for gauges added without one (10^18 is 1.0).
    #[arg(long, env = "GAUGE_DEFAULT_SCALE")]
    default_scale: Option<u64>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "GAUGE_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "GAUGE_LOG_FORMAT")]
    log_format: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Replay a JSON scenario and print query results as JSON.
    Run {
        /// Scenario file; `-` reads stdin.
        scenario: PathBuf,

        /// Pretty-print the output.
        #[arg(long)]
        pretty: bool,

        /// LMDB directory to load state from before the replay and save it
        /// to afterwards. Without it every run starts fresh.
        #[arg(long, env = "GAUGE_STATE_DIR")]
        state: Option<PathBuf>,
    },
    /// Print the effective configuration as TOML.
    Config,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = CliConfig::load(
        cli.config.as_deref(),
        Overrides {
            ring_capacity: cli.ring_capacity,
            default_scale: cli.default_scale,
            log_level: cli.log_level,
            log_format: cli.log_format,
        },
    )?;
    logging::init_logging(config.log_format()?, &config.log_level);

    match cli.command {
        Command::Run {
            scenario: path,
            pretty,
            state: state_dir,
        } => {
            let json = if path.as_os_str() == "-" {
                std::io::read_to_string(std::io::stdin()).context("reading scenario from stdin")?
            } else {
                std::fs::read_to_string(&path)
                    .with_context(|| format!("reading scenario {}", path.display()))?
            };
            let parsed = scenario::parse(&json)?;
            tracing::info!(steps = parsed.steps.len(), "replaying scenario");

            let mut controller = scenario::build(&parsed, config.gauge)?;
            let env = state_dir.as_deref().map(state::open).transpose()?;
            let store = env.as_ref().map(|env| env.gauge_store());
            if let Some(store) = &store {
                state::load(&mut controller, store)?;
            }
            let outcomes = scenario::replay(&mut controller, &parsed);
            if let Some(store) = &store {
                state::save(&controller, store)?;
            }
            let output = if pretty {
                serde_json::to_string_pretty(&outcomes)?
            } else {
                serde_json::to_string(&outcomes)?
            };
            println!("{output}");
        }
        Command::Config => {
            print!("{}", config.to_toml_string()?);
        }
    }

    Ok(())
}
