//! Cooking spit block entity.
//!
//! A spit sits one block above a campfire and holds up to [`SPIT_SLOTS`]
//! single items. Once per simulated second it checks whether anything on it
//! is cookable and whether the fire below is burning; if so, cooking
//! progresses, and after the configured number of seconds every raw item is
//! replaced by its cooked result.
//!
//! Inventory changes mark the spit dirty and push a full [`SpitRecord`] to
//! the sync hook before the mutating call returns. Progress on its own is
//! not synced.

use crate::heat::HeatQuery;
use crate::inventory::{ContentsListener, SpitInventory};
use crate::persist::SpitRecord;
use crate::player::Interactor;
use spitroast_core::{BlockPos, CookingRules, ItemStack, ItemType, TICKS_PER_SECOND};
use std::fmt;
use tracing::{debug, info};

/// Number of item slots on a spit.
pub const SPIT_SLOTS: usize = 3;

// Slot scans treat slots independently; a single slot cannot hold a raw and
// a cooked item at the same time.
const _: () = assert!(SPIT_SLOTS >= 2, "a spit needs at least two slots");

/// Host ticks between cooking evaluations.
pub const TICKS_PER_EVALUATION: u32 = TICKS_PER_SECOND;

/// Sounds a spit asks the world to play.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpitSound {
    /// An item was put on the spit.
    Deposit,
    /// An item was taken off the spit.
    Withdraw,
}

/// Everything a spit needs from the world around it.
pub trait SpitWorld: HeatQuery {
    /// Recipes used to decide what is cookable and what it becomes.
    fn cooking_rules(&self) -> &dyn CookingRules;

    /// Seconds of heat needed to finish a cook. Read on every check.
    fn cook_seconds(&self) -> u32;

    /// Spawn a dropped item entity carrying `stack` at `pos`.
    fn spawn_item(&mut self, pos: [f64; 3], stack: ItemStack);

    /// Play a sound at `pos`.
    fn play_sound(&mut self, _pos: BlockPos, _sound: SpitSound) {}
}

/// Callback receiving the full spit state after an inventory change.
pub type SyncHook = Box<dyn FnMut(BlockPos, &SpitRecord)>;

/// Behavioral state of a spit, derived from its contents and the heat below.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpitPhase {
    /// Nothing on the spit can be cooked.
    NoCookable,
    /// Raw items are waiting, but the fire below is out or missing.
    NoHeat,
    /// Raw items over a burning fire.
    Cooking,
}

/// Result of one per-second evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecondOutcome {
    /// Cooking was not possible; progress untouched.
    Idle(SpitPhase),
    /// Progress advanced to the contained value.
    Progressed(u32),
    /// The cook finished and this many slots were transformed.
    Cooked(usize),
}

/// Where a withdrawn item ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handoff {
    /// Placed in the actor's empty hand.
    Hand,
    /// Merged into the actor's inventory.
    Inventory,
    /// Dropped into the world at the actor's feet.
    Dropped,
}

/// What a single interaction did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InteractOutcome {
    /// Slot and item deposited, if any.
    pub deposited: Option<(usize, ItemType)>,
    /// Slot, item and destination of the withdrawal, if any.
    pub withdrawn: Option<(usize, ItemStack, Handoff)>,
}

#[derive(Debug, Default)]
struct ChangeTracker {
    dirty: bool,
    sync_pending: bool,
}

impl ContentsListener for ChangeTracker {
    fn on_contents_changed(&mut self, _slot: usize) {
        self.dirty = true;
        self.sync_pending = true;
    }
}

/// Cooking spit state machine.
pub struct Spit {
    pos: BlockPos,
    inventory: SpitInventory,
    /// Seconds of heat accumulated in the current cook.
    progress: u32,
    /// Ticks since the last evaluation. Not persisted.
    tick_counter: u32,
    tracker: ChangeTracker,
    redraw_pending: bool,
    sync_hook: Option<SyncHook>,
}

impl fmt::Debug for Spit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Spit")
            .field("pos", &self.pos)
            .field("inventory", &self.inventory)
            .field("progress", &self.progress)
            .field("tick_counter", &self.tick_counter)
            .field("dirty", &self.tracker.dirty)
            .field("has_sync_hook", &self.sync_hook.is_some())
            .finish()
    }
}

impl Spit {
    /// Create an empty spit at `pos`.
    pub fn new(pos: BlockPos) -> Self {
        Self {
            pos,
            inventory: SpitInventory::new(SPIT_SLOTS),
            progress: 0,
            tick_counter: 0,
            tracker: ChangeTracker::default(),
            redraw_pending: false,
            sync_hook: None,
        }
    }

    /// Rebuild a spit at `pos` from persisted state.
    pub fn from_record(pos: BlockPos, record: &SpitRecord) -> Self {
        let mut spit = Self::new(pos);
        spit.read_record(record);
        spit
    }

    /// Install the observer hook used for immediate sync pushes.
    pub fn with_sync_hook(mut self, hook: SyncHook) -> Self {
        self.sync_hook = Some(hook);
        self
    }

    /// Replace (or remove) the sync hook.
    pub fn set_sync_hook(&mut self, hook: Option<SyncHook>) {
        self.sync_hook = hook;
    }

    /// Block position of this spit.
    pub fn pos(&self) -> BlockPos {
        self.pos
    }

    /// Seconds of progress in the current cook.
    pub fn progress(&self) -> u32 {
        self.progress
    }

    /// Ticks since the last evaluation.
    pub fn tick_counter(&self) -> u32 {
        self.tick_counter
    }

    /// Read-only view of the slots.
    pub fn inventory(&self) -> &SpitInventory {
        &self.inventory
    }

    /// Consume the needs-persist mark.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.tracker.dirty)
    }

    /// Check the needs-persist mark without clearing it.
    pub fn is_dirty(&self) -> bool {
        self.tracker.dirty
    }

    /// Consume the observer-side redraw request raised by [`Spit::on_data_packet`].
    pub fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.redraw_pending)
    }

    /// Advance one host tick. Returns the evaluation outcome on second boundaries.
    pub fn tick<W: SpitWorld + ?Sized>(&mut self, world: &W) -> Option<SecondOutcome> {
        self.tick_counter += 1;
        if self.tick_counter < TICKS_PER_EVALUATION {
            return None;
        }
        self.tick_counter = 0;
        Some(self.on_second(world))
    }

    /// Run one per-second cooking evaluation.
    pub fn on_second<W: SpitWorld + ?Sized>(&mut self, world: &W) -> SecondOutcome {
        let phase = self.phase(world);
        if phase != SpitPhase::Cooking {
            return SecondOutcome::Idle(phase);
        }

        self.progress = self.progress.saturating_add(1);
        let threshold = world.cook_seconds().max(1);
        if self.progress < threshold {
            debug!(pos = %self.pos, progress = self.progress, threshold, "Spit cooking");
            return SecondOutcome::Progressed(self.progress);
        }

        let cooked = self.cook_food(world.cooking_rules());
        self.progress = 0;
        self.flush_sync();
        info!(pos = %self.pos, cooked, "Spit finished cooking");
        SecondOutcome::Cooked(cooked)
    }

    /// Current behavioral phase.
    pub fn phase<W: SpitWorld + ?Sized>(&self, world: &W) -> SpitPhase {
        let rules = world.cooking_rules();
        let has_cookable = self
            .inventory
            .iter()
            .any(|stack| rules.is_cookable_stack(stack));
        if !has_cookable {
            SpitPhase::NoCookable
        } else if !world.heat_at(self.pos.down()).is_burning() {
            SpitPhase::NoHeat
        } else {
            SpitPhase::Cooking
        }
    }

    /// True when something cookable sits over a burning heat source.
    pub fn should_cook<W: SpitWorld + ?Sized>(&self, world: &W) -> bool {
        self.phase(world) == SpitPhase::Cooking
    }

    fn cook_food(&mut self, rules: &dyn CookingRules) -> usize {
        let mut cooked = 0;
        for slot in 0..self.inventory.slot_count() {
            let Some(stack) = self.inventory.get(slot).copied() else {
                continue;
            };
            if !rules.is_cookable(stack.item_type) {
                continue;
            }
            if let Some(result) = rules.cooked_result(stack.item_type) {
                let cooked_stack = ItemStack::new(result, stack.count);
                self.inventory
                    .set(slot, Some(cooked_stack), &mut self.tracker);
                cooked += 1;
            }
        }
        cooked
    }

    /// Handle a player using the spit.
    ///
    /// A cookable held item is deposited into the first empty slot. Then the
    /// first cooked item is withdrawn; an empty-handed sneaking actor takes
    /// the first item of any kind when nothing is cooked yet.
    pub fn interact<W, A>(&mut self, world: &mut W, actor: &mut A) -> InteractOutcome
    where
        W: SpitWorld + ?Sized,
        A: Interactor + ?Sized,
    {
        let mut outcome = InteractOutcome::default();
        let raw_withdraw = actor.held_item().is_none();

        let held = actor.held_item().copied();
        if let Some(mut held) = held.filter(|s| world.cooking_rules().is_cookable_stack(Some(s))) {
            if let Some(slot) = self.inventory.first_empty() {
                let inserted =
                    self.inventory
                        .insert(slot, held.item_type, 1, &mut self.tracker);
                if inserted > 0 {
                    held.shrink(inserted);
                    actor.set_held_item((held.count > 0).then_some(held));
                    // A fresh raw item restarts the whole cook.
                    self.progress = 0;
                    world.play_sound(self.pos, SpitSound::Deposit);
                    outcome.deposited = Some((slot, held.item_type));
                }
            }
        }

        let rules = world.cooking_rules();
        let cooked_slot = (0..self.inventory.slot_count())
            .find(|&slot| rules.is_cooked_stack(self.inventory.get(slot)));
        let slot = match cooked_slot {
            Some(slot) => Some(slot),
            None if raw_withdraw && actor.is_sneaking() => {
                (0..self.inventory.slot_count()).find(|&slot| self.inventory.get(slot).is_some())
            }
            None => None,
        };

        if let Some(slot) = slot {
            if let Some((stack, handoff)) = self.withdraw_from_slot(world, actor, slot) {
                world.play_sound(self.pos, SpitSound::Withdraw);
                outcome.withdrawn = Some((slot, stack, handoff));
            }
        }

        debug!(pos = %self.pos, ?outcome, "Spit interaction");
        self.flush_sync();
        outcome
    }

    fn withdraw_from_slot<W, A>(
        &mut self,
        world: &mut W,
        actor: &mut A,
        slot: usize,
    ) -> Option<(ItemStack, Handoff)>
    where
        W: SpitWorld + ?Sized,
        A: Interactor + ?Sized,
    {
        let stack = self.inventory.extract(slot, 1, &mut self.tracker)?;

        let handoff = if actor.held_item().is_none() {
            actor.set_held_item(Some(stack));
            Handoff::Hand
        } else {
            match actor.add_to_inventory(stack) {
                Ok(()) => {
                    actor.refresh_inventory();
                    Handoff::Inventory
                }
                Err(rest) => {
                    world.spawn_item(actor.position(), rest);
                    Handoff::Dropped
                }
            }
        };
        Some((stack, handoff))
    }

    /// Spawn every held item into the world at `pos`, then empty all slots.
    ///
    /// Returns the number of stacks spawned.
    pub fn dump_and_clear<W: SpitWorld + ?Sized>(&mut self, world: &mut W, pos: BlockPos) -> usize {
        let mut spawned = 0;
        for slot in 0..self.inventory.slot_count() {
            if let Some(stack) = self.inventory.get(slot).copied() {
                world.spawn_item(pos.center(), stack);
                spawned += 1;
            }
            // Always clear so a second dump cannot duplicate items.
            self.inventory.set(slot, None, &mut self.tracker);
        }
        info!(pos = %pos, spawned, "Spit dumped its contents");
        self.flush_sync();
        spawned
    }

    /// Full persisted state (progress and slots; the tick counter is transient).
    pub fn to_record(&self) -> SpitRecord {
        SpitRecord {
            progress: self.progress,
            items: self.inventory.to_record(),
        }
    }

    /// Replace progress and slots from a persisted record.
    pub fn read_record(&mut self, record: &SpitRecord) {
        self.progress = record.progress;
        self.inventory.load_record(&record.items);
    }

    /// Snapshot sent to an observer when it first attaches.
    pub fn update_tag(&self) -> SpitRecord {
        self.to_record()
    }

    /// Observer side: replace the local view with a received snapshot.
    pub fn on_data_packet(&mut self, record: &SpitRecord) {
        self.read_record(record);
        self.redraw_pending = true;
    }

    fn flush_sync(&mut self) {
        if !std::mem::take(&mut self.tracker.sync_pending) {
            return;
        }
        let record = self.to_record();
        if let Some(hook) = self.sync_hook.as_mut() {
            hook(self.pos, &record);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heat::{Block, HeatState};
    use crate::player::Player;
    use spitroast_core::SmeltingTable;
    use std::cell::RefCell;
    use std::rc::Rc;

    const SPIT_POS: BlockPos = BlockPos::new(0, 65, 0);

    struct TestWorld {
        below: Block,
        cook_seconds: u32,
        rules: SmeltingTable,
        spawned: Vec<([f64; 3], ItemStack)>,
        sounds: Vec<SpitSound>,
    }

    impl TestWorld {
        fn burning(cook_seconds: u32) -> Self {
            Self {
                below: Block::Campfire { burning: true },
                cook_seconds,
                rules: SmeltingTable::default(),
                spawned: Vec::new(),
                sounds: Vec::new(),
            }
        }
    }

    impl HeatQuery for TestWorld {
        fn heat_at(&self, pos: BlockPos) -> HeatState {
            if pos == SPIT_POS.down() {
                self.below.heat()
            } else {
                HeatState::None
            }
        }
    }

    impl SpitWorld for TestWorld {
        fn cooking_rules(&self) -> &dyn CookingRules {
            &self.rules
        }

        fn cook_seconds(&self) -> u32 {
            self.cook_seconds
        }

        fn spawn_item(&mut self, pos: [f64; 3], stack: ItemStack) {
            self.spawned.push((pos, stack));
        }

        fn play_sound(&mut self, _pos: BlockPos, sound: SpitSound) {
            self.sounds.push(sound);
        }
    }

    fn holding(item: ItemType, count: u32) -> Player {
        let mut player = Player::new("tester", [0.5, 64.0, 1.5]);
        player.hand = Some(ItemStack::new(item, count));
        player
    }

    fn deposit(spit: &mut Spit, world: &mut TestWorld, item: ItemType) {
        let mut player = holding(item, 1);
        let outcome = spit.interact(world, &mut player);
        assert!(outcome.deposited.is_some(), "{item} should deposit");
    }

    fn seconds(spit: &mut Spit, world: &TestWorld, n: u32) -> Vec<SecondOutcome> {
        (0..n).map(|_| spit.on_second(world)).collect()
    }

    #[test]
    fn evaluation_runs_on_every_twentieth_tick() {
        let world = TestWorld::burning(5);
        let mut spit = Spit::new(SPIT_POS);
        for tick in 1..TICKS_PER_EVALUATION {
            assert_eq!(spit.tick(&world), None, "tick {tick}");
        }
        assert_eq!(
            spit.tick(&world),
            Some(SecondOutcome::Idle(SpitPhase::NoCookable))
        );
        assert_eq!(spit.tick_counter(), 0);
    }

    #[test]
    fn full_cook_cycle_over_five_seconds() {
        let mut world = TestWorld::burning(5);
        let mut spit = Spit::new(SPIT_POS);
        deposit(&mut spit, &mut world, ItemType::RawBeef);
        assert_eq!(spit.progress(), 0);

        for expected in 1..=4 {
            assert_eq!(spit.on_second(&world), SecondOutcome::Progressed(expected));
            assert_eq!(spit.progress(), expected);
            assert_eq!(
                spit.inventory().get(0),
                Some(&ItemStack::single(ItemType::RawBeef))
            );
        }

        assert_eq!(spit.on_second(&world), SecondOutcome::Cooked(1));
        assert_eq!(spit.progress(), 0);
        assert_eq!(
            spit.inventory().get(0),
            Some(&ItemStack::single(ItemType::CookedBeef))
        );
        assert_eq!(spit.phase(&world), SpitPhase::NoCookable);
    }

    #[test]
    fn completion_cooks_every_raw_slot_at_once() {
        let mut world = TestWorld::burning(2);
        let mut spit = Spit::new(SPIT_POS);
        deposit(&mut spit, &mut world, ItemType::RawBeef);
        deposit(&mut spit, &mut world, ItemType::Potato);

        let outcomes = seconds(&mut spit, &world, 2);
        assert_eq!(
            outcomes,
            vec![SecondOutcome::Progressed(1), SecondOutcome::Cooked(2)]
        );
        let items: Vec<_> = spit.inventory().iter().map(|s| s.map(|s| s.item_type)).collect();
        assert_eq!(
            items,
            vec![Some(ItemType::CookedBeef), Some(ItemType::BakedPotato), None]
        );
    }

    #[test]
    fn heat_loss_preserves_progress() {
        let mut world = TestWorld::burning(10);
        let mut spit = Spit::new(SPIT_POS);
        deposit(&mut spit, &mut world, ItemType::RawCod);
        seconds(&mut spit, &world, 3);
        assert_eq!(spit.progress(), 3);

        world.below = Block::Campfire { burning: false };
        assert_eq!(
            spit.on_second(&world),
            SecondOutcome::Idle(SpitPhase::NoHeat)
        );
        world.below = Block::Stone;
        seconds(&mut spit, &world, 5);
        assert_eq!(spit.progress(), 3);

        world.below = Block::Campfire { burning: true };
        assert_eq!(spit.on_second(&world), SecondOutcome::Progressed(4));
    }

    #[test]
    fn deposit_resets_progress_mid_cycle() {
        let mut world = TestWorld::burning(10);
        let mut spit = Spit::new(SPIT_POS);
        deposit(&mut spit, &mut world, ItemType::RawCod);
        seconds(&mut spit, &world, 6);
        assert_eq!(spit.progress(), 6);

        deposit(&mut spit, &mut world, ItemType::RawSalmon);
        assert_eq!(spit.progress(), 0);
    }

    #[test]
    fn threshold_is_read_at_every_check() {
        let mut world = TestWorld::burning(10);
        let mut spit = Spit::new(SPIT_POS);
        deposit(&mut spit, &mut world, ItemType::RawPork);
        seconds(&mut spit, &world, 3);

        world.cook_seconds = 4;
        assert_eq!(spit.on_second(&world), SecondOutcome::Cooked(1));
    }

    #[test]
    fn non_cookable_items_are_not_deposited() {
        let mut world = TestWorld::burning(5);
        let mut spit = Spit::new(SPIT_POS);
        for item in [ItemType::IronOre, ItemType::CookedBeef, ItemType::Stick] {
            let mut player = holding(item, 3);
            let outcome = spit.interact(&mut world, &mut player);
            assert_eq!(outcome, InteractOutcome::default());
            assert_eq!(player.hand, Some(ItemStack::new(item, 3)));
        }
        assert!(spit.inventory().is_empty());
        assert!(!spit.is_dirty());
    }

    #[test]
    fn deposit_takes_one_from_held_stack() {
        let mut world = TestWorld::burning(5);
        let mut spit = Spit::new(SPIT_POS);
        let mut player = holding(ItemType::RawChicken, 5);

        let outcome = spit.interact(&mut world, &mut player);
        assert_eq!(outcome.deposited, Some((0, ItemType::RawChicken)));
        assert_eq!(player.hand, Some(ItemStack::new(ItemType::RawChicken, 4)));
        assert_eq!(world.sounds, vec![SpitSound::Deposit]);
    }

    #[test]
    fn deposit_skips_when_full() {
        let mut world = TestWorld::burning(5);
        let mut spit = Spit::new(SPIT_POS);
        let mut player = holding(ItemType::RawMutton, 10);
        for _ in 0..SPIT_SLOTS {
            spit.interact(&mut world, &mut player);
        }
        assert_eq!(player.hand.map(|s| s.count), Some(7));

        let outcome = spit.interact(&mut world, &mut player);
        assert!(outcome.deposited.is_none());
        assert_eq!(player.hand.map(|s| s.count), Some(7));
    }

    #[test]
    fn withdraw_prefers_cooked_item() {
        let mut world = TestWorld::burning(5);
        let mut spit = Spit::new(SPIT_POS);
        spit.read_record(&record(&[
            Some(ItemType::RawBeef),
            Some(ItemType::CookedBeef),
            None,
        ]));

        let mut player = holding(ItemType::Stick, 1);
        player.sneaking = true;
        let outcome = spit.interact(&mut world, &mut player);
        assert_eq!(
            outcome.withdrawn,
            Some((1, ItemStack::single(ItemType::CookedBeef), Handoff::Inventory))
        );
        assert_eq!(
            spit.inventory().get(0),
            Some(&ItemStack::single(ItemType::RawBeef))
        );
        assert!(spit.inventory().get(1).is_none());
    }

    #[test]
    fn sneaking_empty_hand_takes_raw_item() {
        let mut world = TestWorld::burning(5);
        let mut spit = Spit::new(SPIT_POS);
        spit.read_record(&record(&[
            None,
            Some(ItemType::RawBeef),
            Some(ItemType::RawPork),
        ]));

        let mut player = Player::new("p", [0.0; 3]);
        let outcome = spit.interact(&mut world, &mut player);
        assert!(outcome.withdrawn.is_none(), "standing players leave raw food");

        player.sneaking = true;
        let outcome = spit.interact(&mut world, &mut player);
        assert_eq!(
            outcome.withdrawn,
            Some((1, ItemStack::single(ItemType::RawBeef), Handoff::Hand))
        );
        assert_eq!(player.hand, Some(ItemStack::single(ItemType::RawBeef)));
    }

    #[test]
    fn sneaking_with_item_in_hand_does_not_take_raw() {
        let mut world = TestWorld::burning(5);
        let mut spit = Spit::new(SPIT_POS);
        spit.read_record(&record(&[Some(ItemType::RawBeef), None, None]));

        let mut player = holding(ItemType::Stick, 1);
        player.sneaking = true;
        let outcome = spit.interact(&mut world, &mut player);
        assert!(outcome.withdrawn.is_none());
    }

    #[test]
    fn deposit_and_withdraw_in_one_interaction() {
        let mut world = TestWorld::burning(5);
        let mut spit = Spit::new(SPIT_POS);
        spit.read_record(&record(&[Some(ItemType::CookedPork), None, None]));

        let mut player = holding(ItemType::RawPork, 1);
        let outcome = spit.interact(&mut world, &mut player);
        assert_eq!(outcome.deposited, Some((1, ItemType::RawPork)));
        // The emptied hand receives the cooked item directly.
        assert_eq!(
            outcome.withdrawn,
            Some((0, ItemStack::single(ItemType::CookedPork), Handoff::Hand))
        );
        assert_eq!(player.hand, Some(ItemStack::single(ItemType::CookedPork)));
        assert_eq!(world.sounds, vec![SpitSound::Deposit, SpitSound::Withdraw]);
    }

    #[test]
    fn withdraw_drops_when_inventory_is_full() {
        let mut world = TestWorld::burning(5);
        let mut spit = Spit::new(SPIT_POS);
        spit.read_record(&record(&[Some(ItemType::CookedCod), None, None]));

        let mut player = holding(ItemType::Stick, 64);
        for slot in 0..crate::player::INVENTORY_SIZE {
            player
                .inventory
                .set(slot, Some(ItemStack::new(ItemType::Coal, 64)));
        }
        let outcome = spit.interact(&mut world, &mut player);
        assert_eq!(
            outcome.withdrawn.map(|(_, _, handoff)| handoff),
            Some(Handoff::Dropped)
        );
        assert_eq!(
            world.spawned,
            vec![(player.pos, ItemStack::single(ItemType::CookedCod))]
        );
    }

    #[test]
    fn merge_into_inventory_requests_refresh_for_remote_player() {
        let mut world = TestWorld::burning(5);
        let mut spit = Spit::new(SPIT_POS);
        spit.read_record(&record(&[Some(ItemType::BakedPotato), None, None]));

        let mut player = holding(ItemType::Stick, 1);
        player.remote = true;
        spit.interact(&mut world, &mut player);
        assert_eq!(player.inventory.count_item(ItemType::BakedPotato), 1);
        assert!(player.take_inventory_sync());
    }

    #[test]
    fn dump_spawns_each_stack_and_clears() {
        let mut world = TestWorld::burning(5);
        let mut spit = Spit::new(SPIT_POS);
        spit.read_record(&record(&[
            Some(ItemType::RawBeef),
            None,
            Some(ItemType::CookedBeef),
        ]));

        let spawned = spit.dump_and_clear(&mut world, SPIT_POS);
        assert_eq!(spawned, 2);
        assert_eq!(world.spawned.len(), 2);
        assert!(world.spawned.iter().all(|(pos, _)| *pos == SPIT_POS.center()));
        assert!(spit.inventory().is_empty());

        // A second dump finds nothing.
        assert_eq!(spit.dump_and_clear(&mut world, SPIT_POS), 0);
        assert_eq!(world.spawned.len(), 2);
    }

    #[test]
    fn inventory_changes_push_sync_but_progress_does_not() {
        let mut world = TestWorld::burning(3);
        let pushes: Rc<RefCell<Vec<(BlockPos, SpitRecord)>>> = Rc::default();
        let sink = Rc::clone(&pushes);
        let hook: SyncHook = Box::new(move |pos: BlockPos, record: &SpitRecord| {
            sink.borrow_mut().push((pos, record.clone()))
        });
        let mut spit = Spit::new(SPIT_POS).with_sync_hook(hook);

        deposit(&mut spit, &mut world, ItemType::RawBeef);
        assert_eq!(pushes.borrow().len(), 1);
        assert!(spit.take_dirty());

        seconds(&mut spit, &world, 2);
        assert_eq!(pushes.borrow().len(), 1, "progress alone is not synced");
        assert!(!spit.is_dirty());

        seconds(&mut spit, &world, 1);
        let pushes = pushes.borrow();
        assert_eq!(pushes.len(), 2);
        let (pos, last) = &pushes[1];
        assert_eq!(*pos, SPIT_POS);
        assert_eq!(last, &spit.to_record());
        assert_eq!(last.progress, 0);
    }

    #[test]
    fn record_roundtrip_excludes_tick_counter() {
        let mut world = TestWorld::burning(30);
        let mut spit = Spit::new(SPIT_POS);
        deposit(&mut spit, &mut world, ItemType::RawRabbit);
        for _ in 0..(TICKS_PER_EVALUATION * 3 + 7) {
            spit.tick(&world);
        }
        assert_eq!(spit.progress(), 3);
        assert_eq!(spit.tick_counter(), 7);

        let restored = Spit::from_record(SPIT_POS, &spit.to_record());
        assert_eq!(restored.progress(), 3);
        assert_eq!(restored.inventory(), spit.inventory());
        // The cadence restarts after a reload.
        assert_eq!(restored.tick_counter(), 0);
    }

    #[test]
    fn oversized_loaded_progress_finishes_the_cook() {
        let world = TestWorld::burning(5);
        let mut stored = record(&[Some(ItemType::RawBeef), None, None]);
        stored.progress = u32::MAX;
        let mut spit = Spit::from_record(SPIT_POS, &stored);

        assert_eq!(spit.on_second(&world), SecondOutcome::Cooked(1));
        assert_eq!(spit.progress(), 0);
        assert_eq!(
            spit.inventory().get(0).map(|s| s.item_type),
            Some(ItemType::CookedBeef)
        );
    }

    #[test]
    fn data_packet_replaces_observer_view() {
        let mut observer = Spit::new(SPIT_POS);
        observer.read_record(&record(&[Some(ItemType::RawBeef), None, None]));

        let snapshot = record(&[None, Some(ItemType::CookedBeef), None]);
        observer.on_data_packet(&snapshot);
        assert!(observer.inventory().get(0).is_none());
        assert_eq!(observer.to_record(), snapshot);
        assert!(observer.take_redraw());
        assert!(!observer.take_redraw());
    }

    fn record(slots: &[Option<ItemType>]) -> SpitRecord {
        let mut inventory = SpitInventory::new(SPIT_SLOTS);
        for (slot, item) in slots.iter().enumerate() {
            if let Some(item) = item {
                inventory.insert(slot, *item, 1, &mut |_: usize| {});
            }
        }
        SpitRecord {
            progress: 0,
            items: inventory.to_record(),
        }
    }
}
