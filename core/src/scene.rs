//! Scene generation: the items a round is played against.

use alloc::vec::Vec;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::constants::{
    BAG_VALUE_MAX, BAG_VALUE_MIN, FIELD_WIDTH, FLOOR_Y, ITEM_MARGIN_X, ITEM_MIN_Y,
    SCENE_ITEM_COUNT,
};
use crate::rng::{DrawCursor, DrawSource, SeedDraws};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    GoldBig,
    GoldMed,
    GoldSmall,
    Rock,
    Bag,
}

/// Kind pool; repetition encodes relative frequency.
pub const KIND_POOL: [ItemKind; 7] = [
    ItemKind::GoldBig,
    ItemKind::GoldMed,
    ItemKind::GoldSmall,
    ItemKind::GoldSmall,
    ItemKind::Rock,
    ItemKind::Rock,
    ItemKind::Bag,
];

impl ItemKind {
    /// Fixed point value; `None` for bags, whose value is drawn per scene.
    pub fn fixed_value(self) -> Option<u32> {
        match self {
            ItemKind::GoldBig => Some(100),
            ItemKind::GoldMed => Some(50),
            ItemKind::GoldSmall => Some(20),
            ItemKind::Rock => Some(5),
            ItemKind::Bag => None,
        }
    }

    /// Reel-in weight in tenths (gold_big 3.0 => 30).
    pub fn weight_tenths(self) -> u64 {
        match self {
            ItemKind::GoldBig => 30,
            ItemKind::GoldMed => 20,
            ItemKind::GoldSmall => 10,
            ItemKind::Rock => 30,
            ItemKind::Bag => 15,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ItemKind::GoldBig => "gold_big",
            ItemKind::GoldMed => "gold_med",
            ItemKind::GoldSmall => "gold_small",
            ItemKind::Rock => "rock",
            ItemKind::Bag => "bag",
        }
    }

    fn tag(self) -> u8 {
        match self {
            ItemKind::GoldBig => 0,
            ItemKind::GoldMed => 1,
            ItemKind::GoldSmall => 2,
            ItemKind::Rock => 3,
            ItemKind::Bag => 4,
        }
    }
}

impl core::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A placed item. `value` is already resolved (bags included).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub x: i32,
    pub y: i32,
    pub kind: ItemKind,
    pub value: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct Slot {
    item: Item,
    alive: bool,
}

/// Ordered item arena. Consumed items keep their slot and lose their liveness
/// bit, so indices stay stable and iteration order never changes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Scene {
    slots: Vec<Slot>,
}

impl Scene {
    /// Builds the scene for a seed with the production draw source.
    pub fn from_seed(seed: &[u8]) -> Self {
        Self::generate(&SeedDraws::new(seed))
    }

    /// Draw order per item, fixed: kind, x, y, then the value when the kind is a bag.
    pub fn generate<S: DrawSource + ?Sized>(source: &S) -> Self {
        let mut draws = DrawCursor::new(source);
        let mut slots = Vec::with_capacity(SCENE_ITEM_COUNT);

        for _ in 0..SCENE_ITEM_COUNT {
            let kind = draws.pick(&KIND_POOL);
            let x = draws.range(ITEM_MARGIN_X, FIELD_WIDTH - ITEM_MARGIN_X);
            let y = draws.range(ITEM_MIN_Y, FLOOR_Y);
            let value = match kind.fixed_value() {
                Some(v) => v,
                None => draws.range(BAG_VALUE_MIN, BAG_VALUE_MAX) as u32,
            };
            slots.push(Slot {
                item: Item { x, y, kind, value },
                alive: true,
            });
        }

        Self { slots }
    }

    /// Scene from explicit items, all live.
    pub fn from_items(items: Vec<Item>) -> Self {
        Self {
            slots: items
                .into_iter()
                .map(|item| Slot { item, alive: true })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Item> {
        self.slots.get(index).map(|s| &s.item)
    }

    pub fn is_live(&self, index: usize) -> bool {
        self.slots.get(index).is_some_and(|s| s.alive)
    }

    /// Every item in scene order, consumed or not.
    pub fn items(&self) -> impl Iterator<Item = &Item> + '_ {
        self.slots.iter().map(|s| &s.item)
    }

    /// Live items in scene order, with their arena index.
    pub fn live(&self) -> impl Iterator<Item = (usize, &Item)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.alive)
            .map(|(i, s)| (i, &s.item))
    }

    pub fn live_count(&self) -> usize {
        self.slots.iter().filter(|s| s.alive).count()
    }

    /// Clears the liveness bit. Returns the item only on its first consumption.
    pub fn consume(&mut self, index: usize) -> Option<Item> {
        let slot = self.slots.get_mut(index)?;
        if !slot.alive {
            return None;
        }
        slot.alive = false;
        Some(slot.item)
    }

    /// Sum of all item values, consumed or not.
    pub fn total_value(&self) -> u32 {
        self.items().map(|it| it.value).sum()
    }

    /// SHA-256 over the item layout, for reports and cross-checks.
    pub fn digest(&self) -> [u8; 32] {
        let mut h = Sha256::new();
        h.update(b"ROPESCENEv1");
        for it in self.items() {
            h.update(it.x.to_le_bytes());
            h.update(it.y.to_le_bytes());
            h.update([it.kind.tag()]);
            h.update(it.value.to_le_bytes());
        }
        let out = h.finalize();
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&out);
        arr
    }
}
