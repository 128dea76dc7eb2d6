use bracket_geometry::prelude::Point;

use crate::data::{Gear, Item, PotionEffect};

pub const START_HP: i32 = 30;
pub const START_ATTACK: i32 = 5;
pub const START_DEFENSE: i32 = 1;
pub const START_XP_TO_NEXT: i32 = 12;

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub point: Point,
    pub hp: i32,
    pub max_hp: i32,
    pub attack: i32,
    pub defense: i32,
    pub xp: i32,
    pub level: i32,
    pub xp_to_next: i32,
    pub gold: i32,
    pub inventory: Vec<Item>,
    pub capacity: usize,
    pub weapon: Option<Gear>,
    pub armor: Option<Gear>,
    pub kills: u32,
    /// High-water mark that survives restarts.
    pub deepest_floor: i32,
}

/// Where an offered item ended up.
#[derive(Clone, Debug, PartialEq)]
pub enum Pickup {
    Gold(i32),
    Stored(String),
    /// Pack is full; the item is handed back untouched.
    Full(Item),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelUp {
    pub level: i32,
    pub max_hp: i32,
}

impl Player {
    pub fn new(spawn: Point, capacity: usize) -> Self {
        Self {
            point: spawn,
            hp: START_HP,
            max_hp: START_HP,
            attack: START_ATTACK,
            defense: START_DEFENSE,
            xp: 0,
            level: 1,
            xp_to_next: START_XP_TO_NEXT,
            gold: 0,
            inventory: Vec::new(),
            capacity,
            weapon: None,
            armor: None,
            kills: 0,
            deepest_floor: 1,
        }
    }

    /// Back to starting stats, keeping only the deepest-floor record.
    pub fn reset(&mut self, spawn: Point) {
        let deepest_floor = self.deepest_floor;
        *self = Self::new(spawn, self.capacity);
        self.deepest_floor = deepest_floor;
    }

    pub fn weapon_bonus(&self) -> i32 {
        self.weapon.as_ref().map_or(0, |gear| gear.bonus)
    }

    pub fn armor_bonus(&self) -> i32 {
        self.armor.as_ref().map_or(0, |gear| gear.bonus)
    }

    pub fn attack_total(&self) -> i32 {
        self.attack + self.weapon_bonus()
    }

    pub fn defense_total(&self) -> i32 {
        self.defense + self.armor_bonus()
    }

    pub fn is_full(&self) -> bool {
        self.inventory.len() >= self.capacity
    }

    pub fn is_dead(&self) -> bool {
        self.hp <= 0
    }

    pub fn record_depth(&mut self, depth: i32) {
        self.deepest_floor = self.deepest_floor.max(depth);
    }

    /// Adds xp and levels up at most once. Any xp past the threshold is
    /// discarded along with the rest of the bar.
    pub fn gain_xp(&mut self, amount: i32) -> Option<LevelUp> {
        self.xp += amount;
        if self.xp < self.xp_to_next {
            return None;
        }
        self.level += 1;
        self.max_hp += 5 + self.level;
        self.hp = self.max_hp;
        self.attack += 1;
        if self.level % 2 == 0 {
            self.defense += 1;
        }
        // ceil(x * 1.6)
        self.xp_to_next = (self.xp_to_next * 16 + 9) / 10;
        self.xp = 0;
        Some(LevelUp {
            level: self.level,
            max_hp: self.max_hp,
        })
    }

    pub fn receive(&mut self, item: Item) -> Pickup {
        match item {
            Item::Gold { amount } => {
                self.gold += amount;
                Pickup::Gold(amount)
            }
            other if self.is_full() => Pickup::Full(other),
            other => {
                let name = other.name();
                self.inventory.push(other);
                Pickup::Stored(name)
            }
        }
    }

    /// Equips gear or drinks a potion from `slot`. Returns a message, or
    /// `None` when the slot is empty.
    pub fn use_item(&mut self, slot: usize) -> Option<String> {
        if slot >= self.inventory.len() {
            return None;
        }
        let message = match self.inventory.remove(slot) {
            Item::Weapon(gear) => {
                let name = gear.name.clone();
                if let Some(old) = self.weapon.replace(gear) {
                    self.inventory.insert(slot, Item::Weapon(old));
                }
                format!("You wield the {name}.")
            }
            Item::Armor(gear) => {
                let name = gear.name.clone();
                if let Some(old) = self.armor.replace(gear) {
                    self.inventory.insert(slot, Item::Armor(old));
                }
                format!("You put on the {name}.")
            }
            Item::Potion(potion) => match potion.effect {
                PotionEffect::Heal { amount } => {
                    let before = self.hp;
                    self.hp = (self.hp + amount).min(self.max_hp);
                    format!("You drink the {}. +{}hp", potion.name, self.hp - before)
                }
                PotionEffect::Might { amount } => {
                    self.attack += amount;
                    format!("You drink the {}. +{amount} attack", potion.name)
                }
                PotionEffect::Vigor { amount } => {
                    self.max_hp += amount;
                    self.hp = (self.hp + amount).min(self.max_hp);
                    format!("You drink the {}. +{amount} max hp", potion.name)
                }
            },
            Item::Gold { amount } => {
                self.gold += amount;
                format!("You pocket {amount} gold.")
            }
        };
        Some(message)
    }

    pub fn drop_item(&mut self, slot: usize) -> Option<Item> {
        (slot < self.inventory.len()).then(|| self.inventory.remove(slot))
    }
}
