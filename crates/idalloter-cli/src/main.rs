#![doc = include_str!("../README.md")]

mod config;
mod telemetry;

use std::io::{self, BufWriter, Write};

use anyhow::Context;
use clap::Parser;
use config::{Action, AppConfig, CliArgs, ClockKind};
use idalloter::{
    Error, FleetGenerator, FleetId, IdParts, MonotonicClock, SystemClock, TimeSource, unpack,
};
use serde::Serialize;
use telemetry::init_telemetry;

fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    let config = AppConfig::try_from(args)?;

    init_telemetry(config.log_format)?;
    log_startup_info(&config);

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    match &config.action {
        Action::Generate { machine_id, count } => match config.clock {
            ClockKind::System => generate(
                SystemClock::with_epoch(config.epoch),
                *machine_id,
                *count,
                &mut out,
            )?,
            ClockKind::Monotonic => generate(
                MonotonicClock::with_epoch(config.epoch),
                *machine_id,
                *count,
                &mut out,
            )?,
        },
        Action::Decode { ids, json } => {
            decode(ids, config.epoch.as_millis() as u64, *json, &mut out)?;
        }
    }

    out.flush().context("failed to flush stdout")?;
    Ok(())
}

fn log_startup_info(config: &AppConfig) {
    if cfg!(debug_assertions) {
        tracing::debug!("Starting idalloter with full config: {:#?}", config);
    } else {
        tracing::debug!(clock = ?config.clock, "Starting idalloter");
    }
}

/// Mints `count` IDs and writes them to `out`, one per line.
///
/// A clock regression aborts the run: it is logged at `error` and returned,
/// so the process exits non-zero.
fn generate<T, W>(clock: T, machine_id: u16, count: u64, out: &mut W) -> anyhow::Result<()>
where
    T: TimeSource,
    W: Write,
{
    let generator = FleetGenerator::new(machine_id, clock)?;
    tracing::info!(machine_id, count, "generating ids");

    for n in 0..count {
        let id: FleetId = match generator.generate_id() {
            Ok(id) => id,
            Err(err @ Error::ClockRegression { .. }) => {
                tracing::error!(%err, generated = n, "clock regression, giving up");
                return Err(err.into());
            }
            Err(err) => return Err(err.into()),
        };
        writeln!(out, "{id}")?;
    }

    Ok(())
}

#[derive(Debug, Serialize)]
struct DecodedId {
    id: u64,
    #[serde(flatten)]
    parts: IdParts,
    unix_millis: u64,
}

impl DecodedId {
    fn new(id: u64, epoch_millis: u64) -> Self {
        let parts = unpack(id);
        Self {
            id,
            unix_millis: epoch_millis.saturating_add(parts.timestamp),
            parts,
        }
    }
}

fn decode<W>(ids: &[u64], epoch_millis: u64, json: bool, out: &mut W) -> anyhow::Result<()>
where
    W: Write,
{
    for &id in ids {
        let decoded = DecodedId::new(id, epoch_millis);
        if json {
            serde_json::to_writer(&mut *out, &decoded)?;
            writeln!(out)?;
        } else {
            writeln!(
                out,
                "{} timestamp={} unix_millis={} machine_id={} sequence={}",
                decoded.id,
                decoded.parts.timestamp,
                decoded.unix_millis,
                decoded.parts.machine_id,
                decoded.parts.sequence,
            )?;
        }
    }
    Ok(())
}
