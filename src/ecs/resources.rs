use bracket_geometry::prelude::Point;

use crate::map::Dungeon;

/// Read-mostly view of the floor and player handed to the monster phase.
/// `player_hp` is written back as monsters land hits.
#[derive(Clone)]
pub struct MonsterTurnContext {
    pub player_point: Point,
    pub player_defense: i32,
    pub player_hp: i32,
    pub width: i32,
    pub height: i32,
    walkable: Vec<bool>,
    visible: Vec<bool>,
}

impl MonsterTurnContext {
    pub fn from_dungeon(
        dungeon: &Dungeon,
        player_point: Point,
        player_defense: i32,
        player_hp: i32,
    ) -> Self {
        let walkable = dungeon
            .tiles
            .iter()
            .map(|tile| !tile.blocks_move())
            .collect::<Vec<bool>>();

        Self {
            player_point,
            player_defense,
            player_hp,
            width: dungeon.width,
            height: dungeon.height,
            walkable,
            visible: dungeon.visible.clone(),
        }
    }

    fn idx(&self, point: Point) -> Option<usize> {
        if self.in_bounds(point) {
            Some((point.y * self.width + point.x) as usize)
        } else {
            None
        }
    }

    pub fn is_walkable(&self, point: Point) -> bool {
        self.idx(point)
            .and_then(|idx| self.walkable.get(idx).copied())
            .unwrap_or(false)
    }

    pub fn is_visible(&self, point: Point) -> bool {
        self.idx(point)
            .and_then(|idx| self.visible.get(idx).copied())
            .unwrap_or(false)
    }

    pub fn in_bounds(&self, point: Point) -> bool {
        point.x >= 0 && point.x < self.width && point.y >= 0 && point.y < self.height
    }

    pub fn player_down(&self) -> bool {
        self.player_hp <= 0
    }
}

#[derive(Default)]
pub struct CombatLog {
    pub entries: Vec<String>,
}

impl CombatLog {
    pub fn push<S: Into<String>>(&mut self, entry: S) {
        self.entries.push(entry.into());
    }
}
