//! Micro-worldtest harness for deterministic, tick-based snapshot tests.
//!
//! A micro-worldtest steps a tiny simulation for a fixed number of ticks and
//! snapshots selected state at a fixed stride. The resulting report is
//! compared against a golden JSON file (or rewritten when
//! `SPITROAST_UPDATE_SNAPSHOTS=1` is set).

use crate::snapshot::assert_json_snapshot;
use anyhow::Result;
use serde::Serialize;
use spitroast_core::SimTick;
use std::path::PathBuf;

/// Configuration for a micro-worldtest.
#[derive(Debug, Clone)]
pub struct MicroWorldtestConfig {
    /// Human-readable name (written into the snapshot report).
    pub name: String,
    /// Number of ticks to step.
    pub ticks: u64,
    /// Capture a frame every this many ticks (0 or 1 means every tick).
    pub snapshot_every: u64,
    /// Path to the golden JSON file.
    pub snapshot_path: PathBuf,
}

/// Single snapshot frame captured at a given tick.
#[derive(Debug, Clone, Serialize)]
pub struct MicroWorldtestFrame<S> {
    /// Tick number.
    pub tick: u64,
    /// Snapshot payload.
    pub snapshot: S,
}

/// Frames captured by one run.
#[derive(Debug, Clone, Serialize)]
pub struct MicroWorldtestReport<S> {
    /// Test name.
    pub name: String,
    /// Captured frames, starting at tick 0.
    pub frames: Vec<MicroWorldtestFrame<S>>,
}

/// Step `state` and collect frames without touching the filesystem.
///
/// The initial state is captured at tick 0; afterwards a frame is captured
/// whenever the tick is a multiple of the stride, plus once at the very end.
pub fn record_micro_worldtest<State, Snapshot, StepFn, SnapFn>(
    config: &MicroWorldtestConfig,
    state: &mut State,
    mut step: StepFn,
    mut snapshot: SnapFn,
) -> MicroWorldtestReport<Snapshot>
where
    StepFn: FnMut(SimTick, &mut State),
    SnapFn: FnMut(SimTick, &State) -> Snapshot,
{
    let every = config.snapshot_every.max(1);
    let mut tick = SimTick::ZERO;
    let mut frames = vec![MicroWorldtestFrame {
        tick: tick.0,
        snapshot: snapshot(tick, state),
    }];

    for _ in 0..config.ticks {
        step(tick, state);
        tick = tick.advance(1);
        if tick.0 % every == 0 || tick.0 == config.ticks {
            frames.push(MicroWorldtestFrame {
                tick: tick.0,
                snapshot: snapshot(tick, state),
            });
        }
    }

    MicroWorldtestReport {
        name: config.name.clone(),
        frames,
    }
}

/// Run a micro-worldtest and assert (or update) the snapshot at `config.snapshot_path`.
pub fn run_micro_worldtest<State, Snapshot, StepFn, SnapFn>(
    config: MicroWorldtestConfig,
    mut state: State,
    step: StepFn,
    snapshot: SnapFn,
) -> Result<()>
where
    Snapshot: Serialize,
    StepFn: FnMut(SimTick, &mut State),
    SnapFn: FnMut(SimTick, &State) -> Snapshot,
{
    let report = record_micro_worldtest(&config, &mut state, step, snapshot);
    assert_json_snapshot(&config.snapshot_path, &report)
}
