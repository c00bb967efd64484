//! # Axis Control
//!
//! Runs the configured robot axes on simulated hardware: homes every enabled
//! axis, requests each configured `target` once its axis is homed, and ticks
//! the cycle loop until the tick budget runs out or Ctrl-C.

use clap::Parser;
use axis_control::config::RobotConfig;
use axis_control::cycle::CycleRunner;
use axis_control::telemetry::{JsonLinesSink, TracingSink};
use axis_common::axis::telemetry::TelemetrySink;
use axis_common::config::LogLevel;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{Level, error, info};
use tracing_subscriber::EnvFilter;

/// Axis Control: homing and closed-loop positioning on simulated actuators
#[derive(Parser, Debug)]
#[command(name = "axis_control")]
#[command(version)]
#[command(about = "Single-axis position control loop on simulated hardware")]
struct Args {
    /// Path to the robot configuration TOML.
    #[arg(long, default_value = "axis_control/config/robot.toml")]
    config: PathBuf,

    /// Ticks to run; 0 runs until Ctrl-C.
    #[arg(long, default_value_t = 500)]
    ticks: u64,

    /// Write telemetry frames as JSON lines to this file.
    #[arg(long, value_name = "PATH")]
    telemetry: Option<PathBuf>,

    /// Enable verbose logging (DEBUG level).
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format.
    #[arg(long)]
    json: bool,
}

fn main() {
    let args = Args::parse();
    let config = RobotConfig::load_validated(&args.config);
    setup_tracing(&args, config.as_ref().ok().map(|c| c.shared.log_level));

    info!("Axis Control v{} starting...", env!("CARGO_PKG_VERSION"));

    let result = config
        .map_err(|e| Box::new(e) as Box<dyn std::error::Error>)
        .and_then(|config| run(&args, config));
    if let Err(e) = result {
        error!("FATAL: {e}");
        process::exit(1);
    }

    info!("Axis Control shutdown complete");
}

fn run(args: &Args, config: RobotConfig) -> Result<(), Box<dyn std::error::Error>> {
    info!(
        service = %config.shared.service_name,
        cycle_period_ms = config.cycle_period_ms,
        axes = config.axes.len(),
        "Config OK from {}",
        args.config.display()
    );

    let robot = config.build_simulated()?;
    let mut pending = robot.targets;

    let sink: Box<dyn TelemetrySink> = match &args.telemetry {
        Some(path) => {
            info!("Writing telemetry to {}", path.display());
            Box::new(JsonLinesSink::new(BufWriter::new(File::create(path)?)))
        }
        None => Box::new(TracingSink),
    };

    let mut runner = CycleRunner::new(robot.axes, sink, config.control_period())?;
    for axis in runner.axes_mut() {
        axis.home();
    }

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        info!("Received shutdown signal");
        r.store(false, Ordering::SeqCst);
    })?;

    let limit = (args.ticks > 0).then_some(args.ticks);
    runner.run(limit, &running, |axes| {
        pending.retain(|(name, target)| {
            match axes.iter_mut().find(|a| a.name() == name.as_str()) {
                Some(axis) if axis.is_homed() => {
                    info!(axis = %name, position = *target, "Homed, requesting target");
                    axis.request_position(*target);
                    false
                }
                Some(axis) if axis.homing_timed_out() => false,
                _ => true,
            }
        });
    });

    let stats = runner.stats();
    info!(
        ticks = stats.cycle_count,
        avg_us = stats.avg_cycle_ns() / 1_000,
        max_us = stats.max_cycle_ns / 1_000,
        overruns = stats.overruns,
        "Cycle statistics"
    );
    for axis in runner.axes() {
        info!(
            axis = %axis.name(),
            at_target = axis.is_at_requested_position(),
            timed_out = axis.homing_timed_out(),
            "{}",
            axis.status_string()
        );
    }

    Ok(())
}

fn setup_tracing(args: &Args, configured: Option<LogLevel>) {
    let level = if args.verbose {
        Level::DEBUG
    } else {
        configured
            .unwrap_or_default()
            .as_directive()
            .parse()
            .unwrap_or(Level::INFO)
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .compact()
            .init();
    }
}
