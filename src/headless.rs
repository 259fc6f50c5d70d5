use crate::command_script::CommandScriptPlayer;
use crate::commands::SpitCommand;
use crate::config::SpitroastConfig;
use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::json;
use spitroast_core::{BlockPos, ItemStack, SimTick};
use spitroast_net::{decode_stream, encode_server_message, ServerMessage};
use spitroast_testkit::{EventRecord, JsonlSink};
use spitroast_world::{
    Block, Camp, Interactor, Player, SecondOutcome, SpitMirror, SpitRecord, SpitStore,
};
use std::path::PathBuf;
use tracing::{info, warn};

pub const CAMPFIRE_POS: BlockPos = BlockPos::new(0, 64, 0);
pub const SPIT_POS: BlockPos = BlockPos::new(0, 65, 0);

/// Where the scripted cook stands: within pickup reach of the spit.
const PLAYER_POS: [f64; 3] = [0.5, 65.0, 1.5];

pub struct HeadlessConfig {
    pub config: SpitroastConfig,
    pub command_script: Option<PathBuf>,
    pub max_ticks: Option<u64>,
    pub load: bool,
    pub events: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
pub struct SpitStatus {
    pub pos: BlockPos,
    pub progress: u32,
    pub slots: Vec<Option<String>>,
}

#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub ticks: u64,
    pub spits: Vec<SpitStatus>,
    pub hand: Option<ItemStack>,
    pub inventory: Vec<ItemStack>,
    pub dropped_items: usize,
    pub frames_sent: usize,
    pub bytes_sent: usize,
    pub observer_in_sync: bool,
    pub saved: bool,
}

/// Camp, player and observer wired together for one scripted run.
struct Session {
    camp: Camp,
    player: Player,
    mirror: SpitMirror,
    events: Option<JsonlSink>,
    frames_sent: usize,
    bytes_sent: usize,
}

pub fn run(cfg: HeadlessConfig) -> Result<RunSummary> {
    let store = cfg
        .config
        .save_path
        .as_deref()
        .map(SpitStore::new)
        .transpose()?;

    let mut camp = Camp::new(cfg.config.spit_settings(), cfg.config.smelting_table());
    camp.set_block(CAMPFIRE_POS, Block::Campfire { burning: true });
    match store.as_ref().filter(|store| cfg.load && store.exists()) {
        Some(store) => {
            camp.load_spits(store)?;
        }
        None => {
            if cfg.load {
                warn!("--load requested but no save exists; starting empty");
            }
            camp.place_spit(SPIT_POS);
        }
    }

    let mut script = cfg
        .command_script
        .as_deref()
        .map(CommandScriptPlayer::from_path)
        .transpose()?;
    let ticks = cfg.max_ticks.unwrap_or_else(|| {
        script
            .as_ref()
            .map_or(cfg.config.ticks, |script| script.last_tick().0 + 1)
    });

    let events = cfg.events.as_deref().map(JsonlSink::create).transpose()?;
    let mut session = Session {
        camp,
        player: Player::new("cook", PLAYER_POS).remote(),
        mirror: SpitMirror::new(),
        events,
        frames_sent: 0,
        bytes_sent: 0,
    };
    session.attach_observers()?;

    info!(ticks, "Running headless scenario");
    for _ in 0..ticks {
        let tick = session.camp.current_tick();
        if let Some(script) = script.as_mut() {
            for command in script.drain_ready_commands(tick) {
                session.execute(tick, command)?;
            }
        }
        for (pos, outcome) in session.camp.tick() {
            session.record_outcome(tick, pos, outcome)?;
        }
        session.pump()?;
    }
    if script.as_ref().is_some_and(|script| !script.is_finished()) {
        warn!("Run ended before the command script finished");
    }

    let saved = match store.as_ref() {
        Some(store) => {
            session.camp.save(store)?;
            true
        }
        None => false,
    };
    if let Some(events) = session.events.as_mut() {
        events.flush()?;
    }

    Ok(session.summary(saved))
}

impl Session {
    fn attach_observers(&mut self) -> Result<()> {
        self.send(&ServerMessage::hello())?;
        let positions: Vec<BlockPos> = self.camp.spits().map(|spit| spit.pos()).collect();
        for pos in positions {
            if let Some(sync) = self.camp.attach_observer(pos) {
                self.send(&sync.into())?;
            }
        }
        Ok(())
    }

    fn execute(&mut self, tick: SimTick, command: SpitCommand) -> Result<()> {
        match command {
            SpitCommand::Fire { burning } => {
                self.camp
                    .set_block(CAMPFIRE_POS, Block::Campfire { burning });
                self.log(tick, "fire", &json!({ "burning": burning }))?;
            }
            SpitCommand::Give { item, count } => {
                if let Some(previous) = self.player.hand.take() {
                    if let Err(rest) = self.player.add_to_inventory(previous) {
                        warn!(item = %rest.item_type, "Inventory full; dropping held stack");
                        self.camp.world_mut().items_mut().spawn_item(self.player.pos, rest);
                    }
                }
                self.player.set_held_item(Some(ItemStack::new(item, count)));
                self.log(tick, "give", &json!({ "item": item, "count": count }))?;
            }
            SpitCommand::Use => match self.camp.interact(SPIT_POS, &mut self.player) {
                Some(outcome) => {
                    let payload = json!({
                        "deposited": outcome.deposited.map(|(slot, item)| json!({ "slot": slot, "item": item })),
                        "withdrawn": outcome.withdrawn.map(|(slot, stack, handoff)| {
                            json!({ "slot": slot, "item": stack.item_type, "to": format!("{handoff:?}").to_lowercase() })
                        }),
                    });
                    self.log(tick, "use", &payload)?;
                }
                None => warn!(pos = %SPIT_POS, "No spit to use"),
            },
            SpitCommand::Sneak { sneaking } => self.player.sneaking = sneaking,
            SpitCommand::Break => match self.camp.remove_spit(SPIT_POS) {
                Some(dropped) => {
                    self.log(tick, "break", &json!({ "dropped": dropped }))?;
                }
                None => warn!(pos = %SPIT_POS, "No spit to break"),
            },
            SpitCommand::Place => {
                if self.camp.place_spit(SPIT_POS) {
                    // A pending removal of this position must reach the observer first.
                    self.pump()?;
                    if let Some(sync) = self.camp.attach_observer(SPIT_POS) {
                        self.send(&sync.into())?;
                    }
                    self.log(tick, "place", &json!({ "pos": SPIT_POS }))?;
                } else {
                    warn!(pos = %SPIT_POS, "A spit is already placed");
                }
            }
            SpitCommand::Pickup => {
                let picked = self.camp.world_mut().items_mut().pickup_items(self.player.pos);
                for stack in &picked {
                    if let Err(rest) = self.player.add_to_inventory(*stack) {
                        self.camp.world_mut().items_mut().spawn_item(self.player.pos, rest);
                    }
                }
                self.player.refresh_inventory();
                self.log(tick, "pickup", &json!({ "stacks": picked.len() }))?;
            }
            SpitCommand::Status => {
                let spits = spit_statuses(&self.camp);
                info!(tick = tick.0, spits = ?spits, "Status");
                self.log(tick, "status", &spits)?;
            }
        }
        Ok(())
    }

    fn record_outcome(&mut self, tick: SimTick, pos: BlockPos, outcome: SecondOutcome) -> Result<()> {
        match outcome {
            SecondOutcome::Cooked(slots) => {
                self.log(tick, "cooked", &json!({ "pos": pos, "slots": slots }))
            }
            SecondOutcome::Progressed(progress) => {
                self.log(tick, "progress", &json!({ "pos": pos, "progress": progress }))
            }
            SecondOutcome::Idle(_) => Ok(()),
        }
    }

    /// Ship pending sync traffic through the wire codec to the observer.
    fn pump(&mut self) -> Result<()> {
        for sync in self.camp.drain_outbox() {
            self.send(&sync.into())?;
        }
        if self.player.take_inventory_sync() {
            let msg = ServerMessage::InventoryRefresh {
                player: self.player.name.clone(),
                slots: self.player.inventory.slots().to_vec(),
            };
            self.send(&msg)?;
        }
        Ok(())
    }

    fn send(&mut self, msg: &ServerMessage) -> Result<()> {
        let frame = encode_server_message(msg).context("Failed to encode sync frame")?;
        self.frames_sent += 1;
        self.bytes_sent += frame.len();
        for received in decode_stream(&frame).context("Observer rejected sync frame")? {
            if let Some(event) = received.into_sync() {
                self.mirror.apply(&event);
            }
        }
        Ok(())
    }

    fn log<T: Serialize>(&mut self, tick: SimTick, kind: &str, payload: &T) -> Result<()> {
        if let Some(events) = self.events.as_mut() {
            events.write(&EventRecord::new(tick, kind, payload)?)?;
        }
        Ok(())
    }

    fn summary(&self, saved: bool) -> RunSummary {
        // Progress alone is never pushed, so only contents must agree.
        let contents = |records: std::collections::BTreeMap<BlockPos, SpitRecord>| {
            records
                .into_iter()
                .map(|(pos, record)| (pos, record.items))
                .collect::<Vec<_>>()
        };
        let observer_in_sync = contents(self.mirror.records()) == contents(self.camp.records());
        if !observer_in_sync {
            warn!("Observer view diverged from the camp");
        }
        RunSummary {
            ticks: self.camp.current_tick().0,
            spits: spit_statuses(&self.camp),
            hand: self.player.hand,
            inventory: self.player.inventory.slots().iter().flatten().copied().collect(),
            dropped_items: self.camp.world().items().count(),
            frames_sent: self.frames_sent,
            bytes_sent: self.bytes_sent,
            observer_in_sync,
            saved,
        }
    }
}

fn spit_statuses(camp: &Camp) -> Vec<SpitStatus> {
    camp.spits()
        .map(|spit| SpitStatus {
            pos: spit.pos(),
            progress: spit.progress(),
            slots: spit
                .inventory()
                .iter()
                .map(|slot| slot.map(|stack| stack.item_type.key().to_string()))
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_dir(tag: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!("spitroast-headless-{tag}-{nanos}"))
    }

    fn write_script(dir: &std::path::Path, steps: &[(u64, &str)]) -> PathBuf {
        let steps: Vec<_> = steps
            .iter()
            .map(|(tick, command)| json!({ "tick": tick, "command": command }))
            .collect();
        fs::create_dir_all(dir).unwrap();
        let path = dir.join("script.json");
        fs::write(&path, json!({ "steps": steps }).to_string()).unwrap();
        path
    }

    fn config(delay: u32) -> SpitroastConfig {
        SpitroastConfig {
            campfire_spit_delay: delay,
            ..SpitroastConfig::default()
        }
    }

    #[test]
    fn scripted_cook_and_collect() {
        let dir = temp_dir("cook");
        let script = write_script(
            &dir,
            &[
                (0, "give raw_beef 2"),
                (0, "use"),
                (0, "use"),
                (100, "give stick"),
                (100, "use"),
            ],
        );
        let summary = run(HeadlessConfig {
            config: config(3),
            command_script: Some(script),
            max_ticks: None,
            load: false,
            events: Some(dir.join("events.jsonl")),
        })
        .expect("run");

        assert_eq!(summary.ticks, 101);
        assert_eq!(summary.spits.len(), 1);
        assert_eq!(
            summary.spits[0].slots,
            vec![None, Some("cooked_beef".to_string()), None]
        );
        assert_eq!(
            summary.inventory,
            vec![ItemStack::single(spitroast_core::ItemType::CookedBeef)]
        );
        assert!(summary.observer_in_sync);
        assert!(!summary.saved);

        let events = spitroast_testkit::read_jsonl(dir.join("events.jsonl")).unwrap();
        let cooked: Vec<_> = events.iter().filter(|e| e.kind == "cooked").collect();
        assert_eq!(cooked.len(), 1);
        assert_eq!(cooked[0].tick, SimTick(59));
        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn give_with_full_inventory_drops_previous_stack() {
        let dir = temp_dir("full");
        let steps: Vec<(u64, &str)> = (0..38).map(|_| (0, "give stick 64")).collect();
        let script = write_script(&dir, &steps);
        let summary = run(HeadlessConfig {
            config: config(30),
            command_script: Some(script),
            max_ticks: None,
            load: false,
            events: None,
        })
        .expect("run");

        let stick_stack = ItemStack::new(spitroast_core::ItemType::Stick, 64);
        assert_eq!(summary.hand, Some(stick_stack));
        assert_eq!(summary.inventory, vec![stick_stack; 36]);
        assert_eq!(summary.dropped_items, 1);
        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn break_and_pickup_recovers_items() {
        let dir = temp_dir("break");
        let script = write_script(
            &dir,
            &[(0, "give potato"), (0, "use"), (5, "break"), (6, "pickup")],
        );
        let summary = run(HeadlessConfig {
            config: config(30),
            command_script: Some(script),
            max_ticks: None,
            load: false,
            events: None,
        })
        .expect("run");

        assert!(summary.spits.is_empty());
        assert_eq!(summary.dropped_items, 0);
        assert_eq!(
            summary.inventory,
            vec![ItemStack::single(spitroast_core::ItemType::Potato)]
        );
        assert!(summary.observer_in_sync);
        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn save_then_load_resumes_progress() {
        let dir = temp_dir("resume");
        let save_path = dir.join("spits.sp");
        let script = write_script(&dir, &[(0, "give raw_chicken"), (0, "use")]);
        let mut cfg = config(5);
        cfg.save_path = Some(save_path);

        let first = run(HeadlessConfig {
            config: cfg.clone(),
            command_script: Some(script),
            max_ticks: Some(60),
            load: false,
            events: None,
        })
        .expect("first run");
        assert!(first.saved);
        assert_eq!(first.spits[0].progress, 3);

        let second = run(HeadlessConfig {
            config: cfg,
            command_script: None,
            max_ticks: Some(40),
            load: true,
            events: None,
        })
        .expect("second run");
        assert_eq!(
            second.spits[0].slots[0].as_deref(),
            Some("cooked_chicken")
        );
        assert_eq!(second.spits[0].progress, 0);
        fs::remove_dir_all(dir).ok();
    }
}
