pub mod fov;
pub mod generator;

use bracket_geometry::prelude::Point;
use bracket_pathfinding::prelude::{Algorithm2D, BaseMap, DijkstraMap, DistanceAlg};
use serde::Serialize;
use smallvec::SmallVec;

pub use generator::{FloorLayout, generate_floor};

pub const DEFAULT_MAP_WIDTH: i32 = 32;
pub const DEFAULT_MAP_HEIGHT: i32 = 28;

const CARDINALS: [Point; 4] = [
    Point { x: 1, y: 0 },
    Point { x: -1, y: 0 },
    Point { x: 0, y: 1 },
    Point { x: 0, y: -1 },
];

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub enum TileKind {
    #[default]
    Wall,
    Floor,
    Door,
    Stair,
    Chest,
    Trap,
}

impl TileKind {
    pub fn glyph(&self) -> char {
        match self {
            TileKind::Wall => '#',
            TileKind::Floor => '.',
            TileKind::Door => '+',
            TileKind::Stair => '>',
            TileKind::Chest => '=',
            // Traps stay hidden until sprung.
            TileKind::Trap => '.',
        }
    }

    pub fn blocks_move(&self) -> bool {
        matches!(self, TileKind::Wall)
    }

    pub fn blocks_sight(&self) -> bool {
        matches!(self, TileKind::Wall)
    }

    /// Tiles a route may pass through. Chests and traps can be reached but
    /// never count as part of the path beyond them.
    pub fn is_passage(&self) -> bool {
        matches!(self, TileKind::Floor | TileKind::Door | TileKind::Stair)
    }
}

/// One generated floor: the tile grid plus the visibility memory the player
/// has built up on it. Replaced wholesale on every floor transition.
#[derive(Clone, Debug)]
pub struct Dungeon {
    pub width: i32,
    pub height: i32,
    pub tiles: Vec<TileKind>,
    pub visible: Vec<bool>,
    pub explored: Vec<bool>,
    pub spawn: Point,
    pub stairs: Point,
}

impl Dungeon {
    pub fn filled(width: i32, height: i32) -> Self {
        let size = (width * height) as usize;
        Self {
            width,
            height,
            tiles: vec![TileKind::Wall; size],
            visible: vec![false; size],
            explored: vec![false; size],
            spawn: Point::new(0, 0),
            stairs: Point::new(0, 0),
        }
    }

    fn idx(&self, point: Point) -> Option<usize> {
        if self.in_bounds(point) {
            Some((point.y * self.width + point.x) as usize)
        } else {
            None
        }
    }

    pub fn in_bounds(&self, point: Point) -> bool {
        point.x >= 0 && point.x < self.width && point.y >= 0 && point.y < self.height
    }

    pub fn tile_at(&self, point: Point) -> Option<TileKind> {
        self.idx(point).map(|idx| self.tiles[idx])
    }

    pub fn set_tile(&mut self, point: Point, tile: TileKind) {
        if let Some(idx) = self.idx(point) {
            self.tiles[idx] = tile;
        }
    }

    pub fn is_walkable(&self, point: Point) -> bool {
        self.tile_at(point).is_some_and(|tile| !tile.blocks_move())
    }

    pub fn is_visible(&self, point: Point) -> bool {
        self.idx(point).is_some_and(|idx| self.visible[idx])
    }

    pub fn is_explored(&self, point: Point) -> bool {
        self.idx(point).is_some_and(|idx| self.explored[idx])
    }

    pub fn reveal_point(&mut self, point: Point) {
        if let Some(idx) = self.idx(point) {
            self.visible[idx] = true;
            self.explored[idx] = true;
        }
    }

    pub fn clear_visible(&mut self) {
        self.visible.iter_mut().for_each(|cell| *cell = false);
    }

    pub fn points_of(&self, kind: TileKind) -> Vec<Point> {
        let mut points = Vec::new();
        for y in 0..self.height {
            for x in 0..self.width {
                let point = Point::new(x, y);
                if self.tile_at(point) == Some(kind) {
                    points.push(point);
                }
            }
        }
        points
    }

    /// Flags every cell a walker starting at `origin` can reach with
    /// orthogonal steps that only pass through passage tiles.
    pub fn reachable_from(&self, origin: Point) -> Vec<bool> {
        let Some(start) = self.idx(origin) else {
            return vec![false; self.tiles.len()];
        };
        let dijkstra = DijkstraMap::new(
            self.width,
            self.height,
            &[start],
            self,
            (self.width * self.height) as f32,
        );
        dijkstra.map.iter().map(|dist| *dist < f32::MAX).collect()
    }

    /// True when every non-wall tile is reachable from spawn.
    pub fn is_connected(&self) -> bool {
        let reach = self.reachable_from(self.spawn);
        self.tiles
            .iter()
            .zip(reach)
            .all(|(tile, reached)| reached || *tile == TileKind::Wall)
    }
}

impl BaseMap for Dungeon {
    fn is_opaque(&self, idx: usize) -> bool {
        self.tiles.get(idx).is_none_or(|tile| tile.blocks_sight())
    }

    fn get_available_exits(&self, idx: usize) -> SmallVec<[(usize, f32); 10]> {
        let mut exits = SmallVec::new();
        if !self.tiles.get(idx).is_some_and(|tile| tile.is_passage()) {
            return exits;
        }
        let point = self.index_to_point2d(idx);
        for dir in CARDINALS {
            let dest = point + dir;
            if self.is_walkable(dest) {
                exits.push((self.point2d_to_index(dest), 1.0));
            }
        }
        exits
    }

    fn get_pathing_distance(&self, idx1: usize, idx2: usize) -> f32 {
        let p1 = self.index_to_point2d(idx1);
        let p2 = self.index_to_point2d(idx2);
        DistanceAlg::Manhattan.distance2d(p1, p2)
    }
}

impl Algorithm2D for Dungeon {
    fn dimensions(&self) -> Point {
        Point::new(self.width, self.height)
    }

    fn in_bounds(&self, point: Point) -> bool {
        Dungeon::in_bounds(self, point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strip() -> Dungeon {
        let mut dungeon = Dungeon::filled(8, 3);
        for x in 1..4 {
            dungeon.set_tile(Point::new(x, 1), TileKind::Floor);
        }
        dungeon.set_tile(Point::new(6, 1), TileKind::Floor);
        dungeon
    }

    #[test]
    fn out_of_bounds_is_not_walkable() {
        let dungeon = strip();
        assert!(!dungeon.is_walkable(Point::new(-1, 1)));
        assert!(!dungeon.is_walkable(Point::new(8, 1)));
        assert_eq!(dungeon.tile_at(Point::new(0, 5)), None);
    }

    #[test]
    fn reachability_stops_at_walls() {
        let dungeon = strip();
        let reach = dungeon.reachable_from(Point::new(1, 1));
        assert!(reach[(1 * 8 + 3) as usize]);
        assert!(!reach[(1 * 8 + 6) as usize]);
    }

    #[test]
    fn chests_and_traps_are_dead_ends() {
        let mut dungeon = Dungeon::filled(8, 3);
        for x in 1..7 {
            dungeon.set_tile(Point::new(x, 1), TileKind::Floor);
        }
        dungeon.spawn = Point::new(1, 1);
        assert!(dungeon.is_connected());

        dungeon.set_tile(Point::new(6, 1), TileKind::Chest);
        assert!(dungeon.is_connected());

        dungeon.set_tile(Point::new(3, 1), TileKind::Trap);
        let reach = dungeon.reachable_from(dungeon.spawn);
        assert!(reach[(1 * 8 + 3) as usize]);
        assert!(!reach[(1 * 8 + 4) as usize]);
        assert!(!dungeon.is_connected());
    }

    #[test]
    fn reveal_marks_both_grids() {
        let mut dungeon = strip();
        dungeon.reveal_point(Point::new(2, 1));
        dungeon.clear_visible();
        assert!(!dungeon.is_visible(Point::new(2, 1)));
        assert!(dungeon.is_explored(Point::new(2, 1)));
    }
}
