//! Fixed-period cooperative control loop.
//!
//! One tick runs `periodic()` on every axis, in registration order, exactly
//! once. Pacing uses absolute deadlines (`next += period`) so sleep jitter
//! does not accumulate. An overrun is logged and the deadline re-anchored;
//! the loop never tries to catch up with back-to-back ticks.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use axis_common::axis::telemetry::TelemetrySink;
use axis_common::consts::MAX_AXES;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::subsystem::Axis;

// ─── Errors ─────────────────────────────────────────────────────────

/// Errors raised while assembling a runner.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CycleError {
    #[error("Cycle period must be non-zero")]
    ZeroPeriod,

    #[error("Too many axes: {count} (max {max})")]
    TooManyAxes { count: usize, max: usize },

    #[error("Duplicate axis name: {0}")]
    DuplicateAxis(String),
}

// ─── Cycle Statistics ───────────────────────────────────────────────

/// O(1) per-tick timing statistics.
#[derive(Debug, Clone)]
pub struct CycleStats {
    /// Ticks executed.
    pub cycle_count: u64,
    /// Last tick body duration [ns].
    pub last_cycle_ns: u64,
    pub min_cycle_ns: u64,
    pub max_cycle_ns: u64,
    sum_cycle_ns: u128,
    /// Ticks whose body ran past the period.
    pub overruns: u64,
    /// Worst wake-up delay past the deadline [ns].
    pub max_latency_ns: u64,
}

impl CycleStats {
    pub const fn new() -> Self {
        Self {
            cycle_count: 0,
            last_cycle_ns: 0,
            min_cycle_ns: u64::MAX,
            max_cycle_ns: 0,
            sum_cycle_ns: 0,
            overruns: 0,
            max_latency_ns: 0,
        }
    }

    #[inline]
    pub fn record(&mut self, duration_ns: u64, latency_ns: u64) {
        self.cycle_count += 1;
        self.last_cycle_ns = duration_ns;
        self.min_cycle_ns = self.min_cycle_ns.min(duration_ns);
        self.max_cycle_ns = self.max_cycle_ns.max(duration_ns);
        self.sum_cycle_ns += u128::from(duration_ns);
        self.max_latency_ns = self.max_latency_ns.max(latency_ns);
    }

    /// Average tick body duration [ns] (0 if no ticks).
    #[inline]
    pub fn avg_cycle_ns(&self) -> u64 {
        if self.cycle_count == 0 {
            0
        } else {
            (self.sum_cycle_ns / u128::from(self.cycle_count)) as u64
        }
    }
}

impl Default for CycleStats {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Cycle Runner ───────────────────────────────────────────────────

/// Owns the axes and the telemetry sink and drives them at a fixed rate.
pub struct CycleRunner {
    axes: Vec<Axis>,
    sink: Box<dyn TelemetrySink>,
    period: Duration,
    stats: CycleStats,
}

impl CycleRunner {
    pub fn new(
        axes: Vec<Axis>,
        sink: Box<dyn TelemetrySink>,
        period: Duration,
    ) -> Result<Self, CycleError> {
        if period.is_zero() {
            return Err(CycleError::ZeroPeriod);
        }
        if axes.len() > MAX_AXES {
            return Err(CycleError::TooManyAxes {
                count: axes.len(),
                max: MAX_AXES,
            });
        }
        for (i, axis) in axes.iter().enumerate() {
            if axes[..i].iter().any(|other| other.name() == axis.name()) {
                return Err(CycleError::DuplicateAxis(axis.name().to_string()));
            }
        }

        Ok(Self {
            axes,
            sink,
            period,
            stats: CycleStats::new(),
        })
    }

    #[inline]
    pub fn period(&self) -> Duration {
        self.period
    }

    #[inline]
    pub fn stats(&self) -> &CycleStats {
        &self.stats
    }

    #[inline]
    pub fn axes(&self) -> &[Axis] {
        &self.axes
    }

    #[inline]
    pub fn axes_mut(&mut self) -> &mut [Axis] {
        &mut self.axes
    }

    pub fn axis(&self, name: &str) -> Option<&Axis> {
        self.axes.iter().find(|a| a.name() == name)
    }

    pub fn axis_mut(&mut self, name: &str) -> Option<&mut Axis> {
        self.axes.iter_mut().find(|a| a.name() == name)
    }

    /// One tick, without pacing. Returns the body duration.
    pub fn tick(&mut self) -> Duration {
        let start = Instant::now();
        for axis in &mut self.axes {
            axis.periodic(self.sink.as_mut());
        }
        start.elapsed()
    }

    /// Run `ticks` paced ticks.
    pub fn run_for(&mut self, ticks: u64) {
        let running = AtomicBool::new(true);
        self.run(Some(ticks), &running, |_| {});
    }

    /// Paced loop until `running` clears or `limit` ticks have run.
    ///
    /// `before_tick` sees the axes ahead of every tick and is where
    /// commands are issued.
    pub fn run(
        &mut self,
        limit: Option<u64>,
        running: &AtomicBool,
        mut before_tick: impl FnMut(&mut [Axis]),
    ) {
        info!(
            axes = self.axes.len(),
            period_ms = self.period.as_secs_f64() * 1e3,
            limit = ?limit,
            "Cycle loop started"
        );

        let period_ns = self.period.as_nanos() as u64;
        let mut executed = 0u64;
        let mut deadline = Instant::now();

        while running.load(Ordering::SeqCst) && limit.is_none_or(|n| executed < n) {
            let wake = Instant::now();
            let latency_ns = wake.saturating_duration_since(deadline).as_nanos() as u64;

            before_tick(&mut self.axes);
            let elapsed = self.tick();
            let duration_ns = elapsed.as_nanos() as u64;
            self.stats.record(duration_ns, latency_ns);
            executed += 1;

            if duration_ns > period_ns {
                self.stats.overruns += 1;
                warn!(
                    tick = self.stats.cycle_count,
                    actual_us = duration_ns / 1_000,
                    budget_us = period_ns / 1_000,
                    "Cycle overrun"
                );
            }

            deadline += self.period;
            let now = Instant::now();
            if deadline > now {
                std::thread::sleep(deadline - now);
            } else {
                deadline = now;
            }
        }

        self.sink.flush();
        debug!(
            ticks = executed,
            avg_us = self.stats.avg_cycle_ns() / 1_000,
            max_us = self.stats.max_cycle_ns / 1_000,
            overruns = self.stats.overruns,
            "Cycle loop stopped"
        );
    }
}

impl std::fmt::Debug for CycleRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CycleRunner")
            .field("axes", &self.axes.len())
            .field("period", &self.period)
            .field("stats", &self.stats)
            .finish()
    }
}
