use bracket_random::prelude::RandomNumberGenerator;

use crate::dice::{chance, roll};

/// Base stats for one rung of the difficulty ladder.
#[derive(Clone, Debug)]
pub struct MonsterTemplate {
    pub name: &'static str,
    pub glyph: char,
    pub color: (u8, u8, u8),
    pub hp: i32,
    pub attack: i32,
    pub defense: i32,
    pub xp: i32,
    pub gold: i32,
}

/// A template with depth scaling applied, ready to spawn.
#[derive(Clone, Debug, PartialEq)]
pub struct ScaledMonster {
    pub name: &'static str,
    pub glyph: char,
    pub color: (u8, u8, u8),
    pub hp: i32,
    pub attack: i32,
    pub defense: i32,
    pub xp: i32,
    pub gold: i32,
}

pub const MONSTER_TIERS: [MonsterTemplate; 10] = [
    MonsterTemplate::new("Rat", 'r', (160, 130, 100), 4, 2, 0, 2, 1),
    MonsterTemplate::new("Bat", 'b', (140, 110, 170), 5, 3, 0, 3, 1),
    MonsterTemplate::new("Goblin", 'g', (110, 190, 80), 8, 4, 1, 5, 3),
    MonsterTemplate::new("Skeleton", 's', (225, 225, 210), 11, 5, 2, 7, 4),
    MonsterTemplate::new("Orc", 'o', (90, 150, 60), 15, 6, 2, 10, 6),
    MonsterTemplate::new("Ghoul", 'G', (130, 160, 130), 18, 7, 3, 13, 7),
    MonsterTemplate::new("Troll", 'T', (60, 140, 90), 26, 8, 4, 18, 10),
    MonsterTemplate::new("Wraith", 'W', (170, 170, 255), 22, 10, 3, 22, 12),
    MonsterTemplate::new("Ogre", 'O', (200, 140, 80), 34, 11, 5, 28, 16),
    MonsterTemplate::new("Demon", 'D', (230, 50, 40), 40, 13, 6, 36, 22),
];

impl MonsterTemplate {
    const fn new(
        name: &'static str,
        glyph: char,
        color: (u8, u8, u8),
        hp: i32,
        attack: i32,
        defense: i32,
        xp: i32,
        gold: i32,
    ) -> Self {
        Self {
            name,
            glyph,
            color,
            hp,
            attack,
            defense,
            xp,
            gold,
        }
    }

    pub fn scaled(&self, depth: i32) -> ScaledMonster {
        // Scale in hundredths so exact products never pick up float noise.
        let pct = depth_percent(depth);
        let up = |base: i32| (base * pct + 99) / 100;
        ScaledMonster {
            name: self.name,
            glyph: self.glyph,
            color: self.color,
            hp: up(self.hp),
            attack: (self.attack * pct + 50) / 100,
            defense: self.defense * pct / 100,
            xp: up(self.xp),
            gold: up(self.gold),
        }
    }
}

/// `1 + (depth - 1) * 0.15`, expressed in percent.
pub fn depth_percent(depth: i32) -> i32 {
    100 + (depth.max(1) - 1) * 15
}

/// Highest tier that may be rolled at `depth` before the bump chance.
pub fn max_tier(depth: i32) -> usize {
    let reach = (depth.max(1) / 2 + 1) as usize;
    reach.min(MONSTER_TIERS.len() - 1)
}

/// Rolls a tier for `depth`, with a 30% chance of bumping one rung higher.
pub fn roll_tier(rng: &mut RandomNumberGenerator, depth: i32) -> usize {
    let mut tier = roll(rng, 0, max_tier(depth) as i32) as usize;
    if chance(rng, 0.3) {
        tier += 1;
    }
    tier.min(MONSTER_TIERS.len() - 1)
}

pub fn roll_monster(rng: &mut RandomNumberGenerator, depth: i32) -> ScaledMonster {
    MONSTER_TIERS[roll_tier(rng, depth)].scaled(depth)
}
