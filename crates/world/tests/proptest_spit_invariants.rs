//! Property-based tests for spit invariants
//!
//! Random interaction and tick sequences must never:
//! - put more than one item in a slot
//! - let progress reach the threshold without cooking
//! - create or destroy items

use proptest::prelude::*;
use spitroast_core::{BlockPos, ItemStack, ItemType, SmeltingTable};
use spitroast_world::{Block, Camp, Player, SpitSettings, SLOT_LIMIT};

const FIRE: BlockPos = BlockPos::new(0, 64, 0);
const SPIT: BlockPos = BlockPos::new(0, 65, 0);

#[derive(Debug, Clone)]
enum Op {
    Give(ItemType, u32),
    Use,
    Sneak(bool),
    Fire(bool),
    Ticks(u32),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (prop::sample::select(ItemType::ALL.to_vec()), 1u32..=4)
            .prop_map(|(item, count)| Op::Give(item, count)),
        Just(Op::Use),
        Just(Op::Use),
        any::<bool>().prop_map(Op::Sneak),
        any::<bool>().prop_map(Op::Fire),
        (1u32..=60).prop_map(Op::Ticks),
    ]
}

fn total_items(camp: &Camp, player: &Player) -> u32 {
    let hand = player.hand.map_or(0, |s| s.count);
    let inventory: u32 = player.inventory.slots().iter().flatten().map(|s| s.count).sum();
    let spit: u32 = camp
        .spits()
        .flat_map(|spit| spit.inventory().iter())
        .flatten()
        .map(|s| s.count)
        .sum();
    let dropped: u32 = camp.world().items().items().map(|i| i.stack.count).sum();
    hand + inventory + spit + dropped
}

proptest! {
    #[test]
    fn random_sessions_keep_spit_invariants(
        delay in 1u32..6,
        ops in prop::collection::vec(op(), 1..60),
    ) {
        let mut camp = Camp::new(
            SpitSettings { campfire_spit_delay: delay },
            SmeltingTable::default(),
        );
        camp.set_block(FIRE, Block::Campfire { burning: true });
        camp.place_spit(SPIT);
        let mut player = Player::new("cook", [0.5, 65.0, 1.5]);

        for op in ops {
            if let Op::Give(item, count) = op {
                // Handing over a new stack replaces whatever was held.
                player.hand = Some(ItemStack::new(item, count));
                continue;
            }

            let before = total_items(&camp, &player);
            match op {
                Op::Use => {
                    camp.interact(SPIT, &mut player);
                }
                Op::Sneak(sneaking) => player.sneaking = sneaking,
                Op::Fire(burning) => camp.set_block(FIRE, Block::Campfire { burning }),
                Op::Ticks(n) => {
                    for _ in 0..n {
                        camp.tick();
                    }
                }
                Op::Give(..) => unreachable!(),
            }
            prop_assert_eq!(total_items(&camp, &player), before);

            let spit = camp.spit(SPIT).unwrap();
            for slot in spit.inventory().iter().flatten() {
                prop_assert!(slot.count <= SLOT_LIMIT);
                prop_assert!(slot.count > 0);
            }
            prop_assert!(spit.progress() < delay, "progress {} >= {}", spit.progress(), delay);
        }
    }

    #[test]
    fn only_food_producing_items_are_accepted(item in prop::sample::select(ItemType::ALL.to_vec())) {
        let mut camp = Camp::new(SpitSettings::default(), SmeltingTable::default());
        camp.place_spit(SPIT);
        let mut player = Player::new("cook", [0.0; 3]);
        player.hand = Some(ItemStack::single(item));

        let outcome = camp.interact(SPIT, &mut player).unwrap();
        let expected = matches!(
            item,
            ItemType::RawPork
                | ItemType::RawBeef
                | ItemType::RawChicken
                | ItemType::RawMutton
                | ItemType::RawRabbit
                | ItemType::RawCod
                | ItemType::RawSalmon
                | ItemType::Potato
                | ItemType::Kelp
        );
        prop_assert_eq!(outcome.deposited.is_some(), expected);
    }
}
