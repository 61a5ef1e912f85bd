use std::time::Duration;

use anyhow::bail;
use clap::{Parser, Subcommand, ValueEnum};
use idalloter::{DEFAULT_EPOCH, FleetId, SnowflakeId};

/// Runtime configuration for the `idalloter` binary.
///
/// Every flag can also be supplied through its environment variable, and a
/// `.env` file in the working directory is loaded before parsing.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "idalloter",
    version,
    about = "Mint and decode 64-bit Snowflake IDs"
)]
pub struct CliArgs {
    /// Unix time, in milliseconds, that timestamp offsets are counted from.
    ///
    /// Every instance in a fleet must agree on this value, and it must never
    /// change once IDs have been handed out.
    ///
    /// Environment variable: `IDALLOTER_EPOCH_MILLIS`
    #[arg(
        long,
        env = "IDALLOTER_EPOCH_MILLIS",
        default_value_t = DEFAULT_EPOCH.as_millis() as u64,
        global = true
    )]
    pub epoch_millis: u64,

    /// Time source used to stamp IDs.
    ///
    /// `system` follows the wall clock and may move backwards;
    /// `monotonic` never does but drifts from the wall clock over time.
    ///
    /// Environment variable: `IDALLOTER_CLOCK`
    #[arg(
        long,
        env = "IDALLOTER_CLOCK",
        value_enum,
        default_value_t = ClockKind::System,
        global = true
    )]
    pub clock: ClockKind,

    /// Log output format. Logs always go to stderr; the level is controlled
    /// by `RUST_LOG` (default `info`).
    ///
    /// Environment variable: `IDALLOTER_LOG_FORMAT`
    #[arg(
        long,
        env = "IDALLOTER_LOG_FORMAT",
        value_enum,
        default_value_t = LogFormat::Pretty,
        global = true
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Print freshly minted IDs, one per line.
    Generate {
        /// This instance's machine ID. Must be unique across the fleet.
        ///
        /// Environment variable: `MACHINE_ID`
        #[arg(long, env = "MACHINE_ID", allow_negative_numbers = true)]
        machine_id: i64,

        /// Number of IDs to print.
        ///
        /// Environment variable: `IDALLOTER_COUNT`
        #[arg(long, env = "IDALLOTER_COUNT", default_value_t = 1)]
        count: u64,
    },
    /// Break IDs into timestamp, machine ID and sequence.
    Decode {
        /// IDs to decode, in decimal.
        #[arg(required = true)]
        ids: Vec<u64>,

        /// Emit one JSON object per line instead of text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockKind {
    System,
    Monotonic,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub epoch: Duration,
    pub clock: ClockKind,
    pub log_format: LogFormat,
    pub action: Action,
}

/// A validated subcommand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Generate { machine_id: u16, count: u64 },
    Decode { ids: Vec<u64>, json: bool },
}

impl TryFrom<CliArgs> for AppConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        let action = match args.command {
            Command::Generate { machine_id, count } => {
                let max = FleetId::max_machine_id();
                let machine_id = match u16::try_from(machine_id) {
                    Ok(id) if u64::from(id) <= max => id,
                    _ => bail!("MACHINE_ID ({machine_id}) must be within 0..={max}"),
                };
                if count == 0 {
                    bail!("IDALLOTER_COUNT must be greater than 0");
                }
                Action::Generate { machine_id, count }
            }
            Command::Decode { ids, json } => {
                if let Some(id) = ids.iter().find(|id| **id >> 63 != 0) {
                    bail!("{id} is not a Snowflake ID: the reserved top bit is set");
                }
                Action::Decode { ids, json }
            }
        };

        Ok(Self {
            epoch: Duration::from_millis(args.epoch_millis),
            clock: args.clock,
            log_format: args.log_format,
            action,
        })
    }
}
