use bracket_random::prelude::RandomNumberGenerator;
use serde::Serialize;

use crate::dice::roll;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub enum ItemKind {
    Weapon,
    Armor,
    Potion,
    Gold,
}

/// Equippable piece: a weapon's damage bonus or an armor's defense bonus.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Gear {
    pub name: String,
    pub glyph: char,
    pub bonus: i32,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub enum PotionEffect {
    Heal { amount: i32 },
    Might { amount: i32 },
    Vigor { amount: i32 },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Potion {
    pub name: String,
    pub glyph: char,
    pub effect: PotionEffect,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum Item {
    Weapon(Gear),
    Armor(Gear),
    Potion(Potion),
    Gold { amount: i32 },
}

impl Item {
    pub fn kind(&self) -> ItemKind {
        match self {
            Item::Weapon(_) => ItemKind::Weapon,
            Item::Armor(_) => ItemKind::Armor,
            Item::Potion(_) => ItemKind::Potion,
            Item::Gold { .. } => ItemKind::Gold,
        }
    }

    pub fn name(&self) -> String {
        match self {
            Item::Weapon(gear) | Item::Armor(gear) => gear.name.clone(),
            Item::Potion(potion) => potion.name.clone(),
            Item::Gold { amount } => format!("{amount} gold"),
        }
    }

    pub fn glyph(&self) -> char {
        match self {
            Item::Weapon(gear) | Item::Armor(gear) => gear.glyph,
            Item::Potion(potion) => potion.glyph,
            Item::Gold { .. } => '$',
        }
    }

    /// The item's single magnitude: bonus, potion strength or coin count.
    pub fn stat(&self) -> i32 {
        match self {
            Item::Weapon(gear) | Item::Armor(gear) => gear.bonus,
            Item::Potion(potion) => match potion.effect {
                PotionEffect::Heal { amount }
                | PotionEffect::Might { amount }
                | PotionEffect::Vigor { amount } => amount,
            },
            Item::Gold { amount } => *amount,
        }
    }

    pub fn color(&self) -> (u8, u8, u8) {
        match self {
            Item::Weapon(_) => (200, 200, 220),
            Item::Armor(_) => (150, 170, 200),
            Item::Potion(potion) => match potion.effect {
                PotionEffect::Heal { .. } => (240, 80, 110),
                PotionEffect::Might { .. } => (250, 160, 60),
                PotionEffect::Vigor { .. } => (120, 220, 120),
            },
            Item::Gold { .. } => (255, 215, 0),
        }
    }
}

#[derive(Clone, Debug)]
pub struct GearTemplate {
    pub name: &'static str,
    pub bonus: i32,
}

impl GearTemplate {
    const fn new(name: &'static str, bonus: i32) -> Self {
        Self { name, bonus }
    }

    fn to_gear(&self, glyph: char) -> Gear {
        Gear {
            name: self.name.to_string(),
            glyph,
            bonus: self.bonus,
        }
    }
}

pub const WEAPON_TIERS: [GearTemplate; 6] = [
    GearTemplate::new("Dagger", 2),
    GearTemplate::new("Short Sword", 3),
    GearTemplate::new("Mace", 4),
    GearTemplate::new("Long Sword", 5),
    GearTemplate::new("War Axe", 7),
    GearTemplate::new("Runeblade", 9),
];

pub const ARMOR_TIERS: [GearTemplate; 5] = [
    GearTemplate::new("Leather Armor", 1),
    GearTemplate::new("Studded Armor", 2),
    GearTemplate::new("Chain Mail", 3),
    GearTemplate::new("Scale Mail", 4),
    GearTemplate::new("Plate Armor", 6),
];

/// Relative odds for each loot category; they sum to 100.
pub const LOOT_WEIGHTS: [(ItemKind, i32); 4] = [
    (ItemKind::Gold, 35),
    (ItemKind::Potion, 30),
    (ItemKind::Weapon, 18),
    (ItemKind::Armor, 17),
];

pub fn roll_loot(rng: &mut RandomNumberGenerator, depth: i32) -> Item {
    let depth = depth.max(1);
    match roll_kind(rng) {
        ItemKind::Gold => Item::Gold {
            amount: roll(rng, 5, 15) + depth * 3,
        },
        ItemKind::Potion => Item::Potion(roll_potion(rng, depth)),
        ItemKind::Weapon => Item::Weapon(roll_gear(rng, &WEAPON_TIERS, depth).to_gear(')')),
        ItemKind::Armor => Item::Armor(roll_gear(rng, &ARMOR_TIERS, depth).to_gear('[')),
    }
}

fn roll_kind(rng: &mut RandomNumberGenerator) -> ItemKind {
    let total: i32 = LOOT_WEIGHTS.iter().map(|(_, weight)| weight).sum();
    let mut pick = rng.range(0, total);
    for (kind, weight) in LOOT_WEIGHTS {
        if pick < weight {
            return kind;
        }
        pick -= weight;
    }
    ItemKind::Gold
}

fn roll_gear<'a>(
    rng: &mut RandomNumberGenerator,
    table: &'a [GearTemplate],
    depth: i32,
) -> &'a GearTemplate {
    let highest = ((depth / 2) as usize).min(table.len() - 1);
    &table[roll(rng, 0, highest as i32) as usize]
}

fn roll_potion(rng: &mut RandomNumberGenerator, depth: i32) -> Potion {
    let pick = rng.range(0, 10);
    let (name, effect) = match pick {
        0..=5 => (
            "Healing Potion",
            PotionEffect::Heal {
                amount: 10 + depth * 2,
            },
        ),
        6..=7 => ("Potion of Might", PotionEffect::Might { amount: 1 }),
        _ => (
            "Potion of Vigor",
            PotionEffect::Vigor {
                amount: 3 + depth / 3,
            },
        ),
    };
    Potion {
        name: name.to_string(),
        glyph: '!',
        effect,
    }
}
