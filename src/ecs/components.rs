use bracket_geometry::prelude::Point;
use specs::prelude::{Component, VecStorage};

use crate::{ai::Awareness, data::Item};

#[derive(Clone, Debug)]
pub struct Position {
    pub point: Point,
}

impl Component for Position {
    type Storage = VecStorage<Self>;
}

#[derive(Clone, Debug)]
pub struct Renderable {
    pub glyph: char,
    pub color: (u8, u8, u8),
}

impl Component for Renderable {
    type Storage = VecStorage<Self>;
}

#[derive(Clone, Debug)]
pub struct Monster {
    pub name: String,
    pub xp: i32,
    pub gold: i32,
    /// Spawn index on this floor; monsters act in ascending order.
    pub order: u32,
}

impl Component for Monster {
    type Storage = VecStorage<Self>;
}

#[derive(Clone, Debug, Default)]
pub struct MonsterBrain {
    pub awareness: Awareness,
}

impl Component for MonsterBrain {
    type Storage = VecStorage<Self>;
}

#[derive(Clone, Debug)]
pub struct CombatStats {
    pub max_hp: i32,
    pub hp: i32,
    pub attack: i32,
    pub defense: i32,
}

impl Component for CombatStats {
    type Storage = VecStorage<Self>;
}

#[derive(Clone, Debug)]
pub struct GroundItem {
    pub item: Item,
}

impl Component for GroundItem {
    type Storage = VecStorage<Self>;
}
