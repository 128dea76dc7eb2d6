use serde::Serialize;

use crate::{
    data::{Gear, Item},
    map::TileKind,
};

use super::{Phase, player::Player};

/// Everything a renderer or save layer may read after a tick. Built fresh
/// on every `step`; nothing in it aliases engine state.
#[derive(Clone, Debug, Serialize)]
pub struct EngineState {
    pub phase: Phase,
    pub depth: i32,
    pub turn: u64,
    pub width: i32,
    pub height: i32,
    pub tiles: Vec<TileKind>,
    pub visible: Vec<bool>,
    pub explored: Vec<bool>,
    pub player: PlayerView,
    pub monsters: Vec<MonsterView>,
    pub items: Vec<ItemView>,
    pub message: String,
    pub log: Vec<String>,
    pub selected: usize,
}

#[derive(Clone, Debug, Serialize)]
pub struct PlayerView {
    pub x: i32,
    pub y: i32,
    pub hp: i32,
    pub max_hp: i32,
    pub attack: i32,
    pub defense: i32,
    pub attack_total: i32,
    pub defense_total: i32,
    pub level: i32,
    pub xp: i32,
    pub xp_to_next: i32,
    pub gold: i32,
    pub kills: u32,
    pub deepest_floor: i32,
    pub inventory: Vec<Item>,
    pub capacity: usize,
    pub weapon: Option<Gear>,
    pub armor: Option<Gear>,
}

impl From<&Player> for PlayerView {
    fn from(player: &Player) -> Self {
        Self {
            x: player.point.x,
            y: player.point.y,
            hp: player.hp,
            max_hp: player.max_hp,
            attack: player.attack,
            defense: player.defense,
            attack_total: player.attack_total(),
            defense_total: player.defense_total(),
            level: player.level,
            xp: player.xp,
            xp_to_next: player.xp_to_next,
            gold: player.gold,
            kills: player.kills,
            deepest_floor: player.deepest_floor,
            inventory: player.inventory.clone(),
            capacity: player.capacity,
            weapon: player.weapon.clone(),
            armor: player.armor.clone(),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct MonsterView {
    pub name: String,
    pub x: i32,
    pub y: i32,
    pub glyph: char,
    pub color: (u8, u8, u8),
    pub hp: i32,
    pub max_hp: i32,
    pub awake: bool,
}

#[derive(Clone, Debug, Serialize)]
pub struct ItemView {
    pub x: i32,
    pub y: i32,
    pub item: Item,
}

impl EngineState {
    fn idx(&self, x: i32, y: i32) -> Option<usize> {
        (x >= 0 && x < self.width && y >= 0 && y < self.height)
            .then(|| (y * self.width + x) as usize)
    }

    pub fn tile(&self, x: i32, y: i32) -> Option<TileKind> {
        self.idx(x, y).map(|idx| self.tiles[idx])
    }

    pub fn is_visible(&self, x: i32, y: i32) -> bool {
        self.idx(x, y).is_some_and(|idx| self.visible[idx])
    }

    pub fn is_explored(&self, x: i32, y: i32) -> bool {
        self.idx(x, y).is_some_and(|idx| self.explored[idx])
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
