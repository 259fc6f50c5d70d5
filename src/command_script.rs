use anyhow::{Context, Result};
use serde::Deserialize;
use spitroast_core::SimTick;
use std::{collections::VecDeque, fs, path::Path};

use crate::commands::{parse_command, SpitCommand};

#[derive(Debug, Deserialize)]
struct CommandScriptFile {
    steps: Vec<CommandScriptStepDef>,
}

#[derive(Debug, Clone, Deserialize)]
struct CommandScriptStepDef {
    tick: u64,
    command: String,
}

#[derive(Debug, Clone)]
struct CommandScriptStep {
    tick: SimTick,
    command: SpitCommand,
}

/// Deterministic command script runner.
///
/// Scripts are a list of `{tick, command}` steps, executed in file order.
/// Every command is parsed up front so a typo fails the load, not the run.
#[derive(Debug)]
pub struct CommandScriptPlayer {
    pending: VecDeque<CommandScriptStep>,
    last_tick: SimTick,
}

impl CommandScriptPlayer {
    /// Load a command script from a JSON file on disk.
    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read command script {}", path.display()))?;
        Self::from_json(&contents)
            .with_context(|| format!("Invalid command script {}", path.display()))
    }

    /// Load a command script from an in-memory JSON string.
    pub fn from_json(contents: &str) -> Result<Self> {
        let file: CommandScriptFile = serde_json::from_str(contents)?;
        if file.steps.is_empty() {
            anyhow::bail!("command script contains no steps");
        }

        let mut pending = VecDeque::with_capacity(file.steps.len());
        let mut last_tick: Option<u64> = None;
        for (index, step) in file.steps.into_iter().enumerate() {
            if let Some(prev) = last_tick {
                if step.tick < prev {
                    anyhow::bail!("command script steps must be sorted by tick");
                }
            }
            last_tick = Some(step.tick);

            let command = parse_command(&step.command)
                .with_context(|| format!("step {} (`{}`)", index + 1, step.command.trim()))?;
            pending.push_back(CommandScriptStep {
                tick: SimTick(step.tick),
                command,
            });
        }

        Ok(Self {
            pending,
            last_tick: SimTick(last_tick.unwrap_or(0)),
        })
    }

    /// Drain and return all commands scheduled for ticks `<= tick`.
    pub fn drain_ready_commands(&mut self, tick: SimTick) -> Vec<SpitCommand> {
        let mut commands = Vec::new();
        while self.pending.front().is_some_and(|step| step.tick <= tick) {
            if let Some(step) = self.pending.pop_front() {
                commands.push(step.command);
            }
        }
        commands
    }

    /// Tick of the final step.
    pub fn last_tick(&self) -> SimTick {
        self.last_tick
    }

    pub fn is_finished(&self) -> bool {
        self.pending.is_empty()
    }
}
