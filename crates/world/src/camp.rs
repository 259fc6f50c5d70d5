//! A small host world for spits: blocks, dropped items and the spits themselves.
//!
//! [`CampWorld`] answers heat queries, recipe lookups and configuration reads
//! and spawns dropped items. [`Camp`] owns the world plus every placed spit
//! and drives them once per host tick.

use crate::drop_item::ItemManager;
use crate::heat::{Block, HeatQuery, HeatState};
use crate::persist::{SpitRecord, SpitStore};
use crate::player::Interactor;
use crate::spit::{InteractOutcome, SecondOutcome, Spit, SpitSound, SpitWorld};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use spitroast_core::{BlockPos, CookingRules, ItemStack, SimTick, SmeltingTable};
use std::collections::BTreeMap;
use std::sync::mpsc::{self, Receiver, Sender};
use tracing::{debug, info, warn};

/// Default cook duration in seconds.
pub const DEFAULT_SPIT_DELAY: u32 = 30;

/// Server-side tunables read by spits on demand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpitSettings {
    /// Seconds over a burning campfire before food is cooked.
    pub campfire_spit_delay: u32,
}

impl SpitSettings {
    /// Cook duration, never below one second.
    pub fn cook_seconds(&self) -> u32 {
        self.campfire_spit_delay.max(1)
    }
}

impl Default for SpitSettings {
    fn default() -> Self {
        Self {
            campfire_spit_delay: DEFAULT_SPIT_DELAY,
        }
    }
}

/// Change pushed to observers of a spit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpitSync {
    /// Full state; replaces whatever the observer had.
    Update {
        /// Spit position.
        pos: BlockPos,
        /// Complete state at the time of the push.
        record: SpitRecord,
    },
    /// The spit is gone.
    Removed {
        /// Former spit position.
        pos: BlockPos,
    },
}

impl SpitSync {
    /// Position the event refers to.
    pub fn pos(&self) -> BlockPos {
        match self {
            SpitSync::Update { pos, .. } | SpitSync::Removed { pos } => *pos,
        }
    }
}

/// Blocks, dropped items, recipes and settings.
#[derive(Debug)]
pub struct CampWorld {
    blocks: BTreeMap<BlockPos, Block>,
    items: ItemManager,
    rules: SmeltingTable,
    settings: SpitSettings,
}

impl CampWorld {
    /// Create an empty world.
    pub fn new(settings: SpitSettings, rules: SmeltingTable) -> Self {
        Self {
            blocks: BTreeMap::new(),
            items: ItemManager::new(),
            rules,
            settings,
        }
    }

    /// Block at `pos` (air when unset).
    pub fn block(&self, pos: BlockPos) -> Block {
        self.blocks.get(&pos).copied().unwrap_or_default()
    }

    /// Dropped items.
    pub fn items(&self) -> &ItemManager {
        &self.items
    }

    /// Mutable dropped items (pickup).
    pub fn items_mut(&mut self) -> &mut ItemManager {
        &mut self.items
    }

    /// Current settings.
    pub fn settings(&self) -> &SpitSettings {
        &self.settings
    }

    /// Change settings; spits see the new values on their next check.
    pub fn settings_mut(&mut self) -> &mut SpitSettings {
        &mut self.settings
    }

    fn set_block(&mut self, pos: BlockPos, block: Block) {
        if block == Block::Air {
            self.blocks.remove(&pos);
        } else {
            self.blocks.insert(pos, block);
        }
    }
}

impl HeatQuery for CampWorld {
    fn heat_at(&self, pos: BlockPos) -> HeatState {
        self.block(pos).heat()
    }
}

impl SpitWorld for CampWorld {
    fn cooking_rules(&self) -> &dyn CookingRules {
        &self.rules
    }

    fn cook_seconds(&self) -> u32 {
        self.settings.cook_seconds()
    }

    fn spawn_item(&mut self, pos: [f64; 3], stack: ItemStack) {
        let id = self.items.spawn_item(pos, stack);
        debug!(id, item = %stack.item_type, count = stack.count, "Spawned dropped item");
    }

    fn play_sound(&mut self, pos: BlockPos, sound: SpitSound) {
        // Sound playback is left to clients.
        debug!(pos = %pos, ?sound, "Spit sound");
    }
}

/// A camp: the world plus every spit placed in it.
#[derive(Debug)]
pub struct Camp {
    world: CampWorld,
    spits: BTreeMap<BlockPos, Spit>,
    tick: SimTick,
    sync_tx: Sender<SpitSync>,
    sync_rx: Receiver<SpitSync>,
}

impl Camp {
    /// Create an empty camp.
    pub fn new(settings: SpitSettings, rules: SmeltingTable) -> Self {
        let (sync_tx, sync_rx) = mpsc::channel();
        Self {
            world: CampWorld::new(settings, rules),
            spits: BTreeMap::new(),
            tick: SimTick::ZERO,
            sync_tx,
            sync_rx,
        }
    }

    /// The world collaborator.
    pub fn world(&self) -> &CampWorld {
        &self.world
    }

    /// Mutable world collaborator.
    pub fn world_mut(&mut self) -> &mut CampWorld {
        &mut self.world
    }

    /// Ticks simulated so far.
    pub fn current_tick(&self) -> SimTick {
        self.tick
    }

    /// Place a block. Spit blocks must go through [`Camp::place_spit`].
    pub fn set_block(&mut self, pos: BlockPos, block: Block) {
        if self.spits.contains_key(&pos) {
            warn!(pos = %pos, "Replacing a spit block; dumping it first");
            self.remove_spit(pos);
        }
        if block == Block::Spit {
            self.place_spit(pos);
        } else {
            self.world.set_block(pos, block);
        }
    }

    /// Place an empty spit at `pos`. Returns `false` if one is already there.
    pub fn place_spit(&mut self, pos: BlockPos) -> bool {
        if self.spits.contains_key(&pos) {
            return false;
        }
        self.insert_spit(Spit::new(pos));
        info!(pos = %pos, "Placed spit");
        true
    }

    fn insert_spit(&mut self, mut spit: Spit) {
        let pos = spit.pos();
        let tx = self.sync_tx.clone();
        spit.set_sync_hook(Some(Box::new(move |pos: BlockPos, record: &SpitRecord| {
            // Fire-and-forget: a dropped receiver just means nobody listens.
            let _ = tx.send(SpitSync::Update {
                pos,
                record: record.clone(),
            });
        })));
        self.world.set_block(pos, Block::Spit);
        self.spits.insert(pos, spit);
    }

    /// Remove the spit at `pos`, dumping its contents into the world.
    ///
    /// Observers get a single removal event. Returns how many stacks were
    /// dropped, or `None` if there was no spit.
    pub fn remove_spit(&mut self, pos: BlockPos) -> Option<usize> {
        let mut spit = self.spits.remove(&pos)?;
        spit.set_sync_hook(None);
        let dropped = spit.dump_and_clear(&mut self.world, pos);
        self.world.set_block(pos, Block::Air);
        let _ = self.sync_tx.send(SpitSync::Removed { pos });
        info!(pos = %pos, dropped, "Removed spit");
        Some(dropped)
    }

    /// The spit at `pos`.
    pub fn spit(&self, pos: BlockPos) -> Option<&Spit> {
        self.spits.get(&pos)
    }

    /// All spits in position order.
    pub fn spits(&self) -> impl Iterator<Item = &Spit> {
        self.spits.values()
    }

    /// Advance the camp by one tick. Returns the evaluations that ran.
    pub fn tick(&mut self) -> Vec<(BlockPos, SecondOutcome)> {
        let mut outcomes = Vec::new();
        for (pos, spit) in self.spits.iter_mut() {
            if let Some(outcome) = spit.tick(&self.world) {
                outcomes.push((*pos, outcome));
            }
        }
        let despawned = self.world.items.update();
        if despawned > 0 {
            debug!(despawned, "Dropped items despawned");
        }
        self.tick = self.tick.advance(1);
        outcomes
    }

    /// Let `actor` use the spit at `pos`.
    pub fn interact<A: Interactor + ?Sized>(
        &mut self,
        pos: BlockPos,
        actor: &mut A,
    ) -> Option<InteractOutcome> {
        let spit = self.spits.get_mut(&pos)?;
        Some(spit.interact(&mut self.world, actor))
    }

    /// Initial snapshot for an observer starting to watch `pos`.
    pub fn attach_observer(&self, pos: BlockPos) -> Option<SpitSync> {
        self.spits.get(&pos).map(|spit| SpitSync::Update {
            pos,
            record: spit.update_tag(),
        })
    }

    /// Every sync update pushed since the last drain, in push order.
    pub fn drain_outbox(&mut self) -> Vec<SpitSync> {
        self.sync_rx.try_iter().collect()
    }

    /// Records for every spit.
    pub fn records(&self) -> BTreeMap<BlockPos, SpitRecord> {
        self.spits
            .iter()
            .map(|(pos, spit)| (*pos, spit.to_record()))
            .collect()
    }

    /// Check whether any spit has unsaved inventory changes.
    pub fn has_unsaved_changes(&self) -> bool {
        self.spits.values().any(Spit::is_dirty)
    }

    /// Save every spit and clear the dirty marks.
    pub fn save(&mut self, store: &SpitStore) -> Result<()> {
        store.save(&self.records())?;
        for spit in self.spits.values_mut() {
            spit.take_dirty();
        }
        Ok(())
    }

    /// Save only when some spit has unsaved inventory changes.
    pub fn save_dirty(&mut self, store: &SpitStore) -> Result<bool> {
        if !self.has_unsaved_changes() {
            return Ok(false);
        }
        self.save(store)?;
        Ok(true)
    }

    /// Replace all spits with those stored on disk. Returns how many loaded.
    pub fn load_spits(&mut self, store: &SpitStore) -> Result<usize> {
        let records = store.load()?;
        for pos in std::mem::take(&mut self.spits).into_keys() {
            self.world.set_block(pos, Block::Air);
            let _ = self.sync_tx.send(SpitSync::Removed { pos });
        }
        let loaded = records.len();
        for (pos, record) in records {
            self.insert_spit(Spit::from_record(pos, &record));
        }
        info!(loaded, "Loaded spits");
        Ok(loaded)
    }
}

/// Observer-side replica of the spits it has been told about.
#[derive(Debug, Default)]
pub struct SpitMirror {
    spits: BTreeMap<BlockPos, Spit>,
}

impl SpitMirror {
    /// Create an empty mirror.
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a sync event: replace a spit's state or forget a removed one.
    pub fn apply(&mut self, event: &SpitSync) {
        match event {
            SpitSync::Update { pos, record } => self
                .spits
                .entry(*pos)
                .or_insert_with(|| Spit::new(*pos))
                .on_data_packet(record),
            SpitSync::Removed { pos } => {
                self.spits.remove(pos);
            }
        }
    }

    /// Replica at `pos`.
    pub fn spit(&self, pos: BlockPos) -> Option<&Spit> {
        self.spits.get(&pos)
    }

    /// Records for every mirrored spit.
    pub fn records(&self) -> BTreeMap<BlockPos, SpitRecord> {
        self.spits
            .iter()
            .map(|(pos, spit)| (*pos, spit.to_record()))
            .collect()
    }
}
