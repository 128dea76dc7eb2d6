pub mod items;
pub mod monsters;

pub use items::{Gear, Item, ItemKind, Potion, PotionEffect, roll_loot};
pub use monsters::{MONSTER_TIERS, MonsterTemplate, ScaledMonster, roll_monster};
