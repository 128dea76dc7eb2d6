use bracket_geometry::prelude::{Point, Rect};
use bracket_random::prelude::RandomNumberGenerator;

use crate::{
    config::EngineConfig,
    data::{Item, ScaledMonster, roll_loot, roll_monster},
    dice::{chance, pick, roll},
    error::GenerationError,
};

use super::{Dungeon, TileKind};

pub const MIN_ROOM_W: i32 = 3;
pub const MAX_ROOM_W: i32 = 7;
pub const MIN_ROOM_H: i32 = 3;
pub const MAX_ROOM_H: i32 = 6;
const DOOR_CHANCE: f32 = 0.25;
const CELL_TRIES: usize = 20;
const FEATURE_TRIES: usize = 8;

/// Everything a fresh floor starts with. Monsters are listed in spawn order,
/// which is also the order they act in.
#[derive(Clone, Debug)]
pub struct FloorLayout {
    pub dungeon: Dungeon,
    pub rooms: Vec<Rect>,
    pub monsters: Vec<(Point, ScaledMonster)>,
    pub items: Vec<(Point, Item)>,
}

impl FloorLayout {
    fn occupied(&self, point: Point) -> bool {
        self.monsters.iter().any(|(at, _)| *at == point)
            || self.items.iter().any(|(at, _)| *at == point)
    }
}

pub fn generate_floor(
    depth: i32,
    config: &EngineConfig,
    rng: &mut RandomNumberGenerator,
) -> Result<FloorLayout, GenerationError> {
    let depth = depth.max(1);
    let width = config.map_width;
    let height = config.map_height;
    let mut dungeon = Dungeon::filled(width, height);

    let target = (6 + roll(rng, 0, 3) + depth / 2) as usize;
    let rooms = place_rooms(rng, width, height, target, config.room_attempts);
    if rooms.is_empty() {
        tracing::error!(depth, width, height, "room placement produced nothing");
        return Err(GenerationError::NoRooms {
            width,
            height,
            depth,
        });
    }

    for room in &rooms {
        room.for_each(|pt| dungeon.set_tile(pt, TileKind::Floor));
    }
    for pair in rooms.windows(2) {
        let vertical_first = chance(rng, 0.5);
        for pt in corridor_path(pair[0].center(), pair[1].center(), vertical_first) {
            dungeon.set_tile(pt, TileKind::Floor);
        }
    }
    place_doors(&mut dungeon, rng);

    dungeon.spawn = rooms[0].center();
    dungeon.stairs = rooms[rooms.len() - 1].center();
    dungeon.set_tile(dungeon.stairs, TileKind::Stair);

    let mut layout = FloorLayout {
        dungeon,
        rooms,
        monsters: Vec::new(),
        items: Vec::new(),
    };

    let chests = roll(rng, 1, 2) + i32::from(depth % 3 == 0);
    for _ in 0..chests {
        for _ in 0..FEATURE_TRIES {
            let Some(pt) = free_room_cell(&layout, rng) else {
                break;
            };
            if place_feature(&mut layout.dungeon, pt, TileKind::Chest) {
                break;
            }
        }
    }

    if depth >= 3 {
        for _ in 0..depth / 2 {
            let mut floors = layout.dungeon.points_of(TileKind::Floor);
            floors.retain(|pt| *pt != layout.dungeon.spawn);
            for _ in 0..FEATURE_TRIES {
                let Some(&pt) = pick(rng, &floors) else {
                    break;
                };
                if place_feature(&mut layout.dungeon, pt, TileKind::Trap) {
                    break;
                }
            }
        }
    }

    let monster_count = 4 + depth * 2 + roll(rng, 0, 2);
    for _ in 0..monster_count {
        if let Some(pt) = free_room_cell(&layout, rng) {
            let monster = roll_monster(rng, depth);
            layout.monsters.push((pt, monster));
        }
    }

    for _ in 0..roll(rng, 1, 2) {
        if let Some(pt) = free_room_cell(&layout, rng) {
            let item = roll_loot(rng, depth);
            layout.items.push((pt, item));
        }
    }

    tracing::debug!(
        depth,
        rooms = layout.rooms.len(),
        target,
        monsters = layout.monsters.len(),
        items = layout.items.len(),
        "generated floor"
    );
    Ok(layout)
}

/// Rejection-samples up to `target` rooms that keep at least one wall
/// between each other and the map edge.
fn place_rooms(
    rng: &mut RandomNumberGenerator,
    width: i32,
    height: i32,
    target: usize,
    attempts: u32,
) -> Vec<Rect> {
    let mut rooms: Vec<Rect> = Vec::new();
    for _ in 0..attempts {
        if rooms.len() >= target {
            break;
        }
        let room_w = roll(rng, MIN_ROOM_W, MAX_ROOM_W);
        let room_h = roll(rng, MIN_ROOM_H, MAX_ROOM_H);
        let x_max = width - room_w - 1;
        let y_max = height - room_h - 1;
        if x_max < 1 || y_max < 1 {
            continue;
        }
        let room_x = roll(rng, 1, x_max);
        let room_y = roll(rng, 1, y_max);
        let candidate = Rect::with_size(room_x, room_y, room_w, room_h);
        if rooms.iter().any(|room| touches(room, &candidate)) {
            continue;
        }
        rooms.push(candidate);
    }
    rooms
}

/// True when the rooms overlap or share an edge with no wall between them.
fn touches(a: &Rect, b: &Rect) -> bool {
    a.x1 - 1 < b.x2 && b.x1 < a.x2 + 1 && a.y1 - 1 < b.y2 && b.y1 < a.y2 + 1
}

fn corridor_path(start: Point, end: Point, vertical_first: bool) -> Vec<Point> {
    let mut path = vec![start];
    let mut cursor = start;

    let walk_x = |cursor: &mut Point, path: &mut Vec<Point>| {
        while cursor.x != end.x {
            cursor.x += if end.x > cursor.x { 1 } else { -1 };
            path.push(*cursor);
        }
    };
    let walk_y = |cursor: &mut Point, path: &mut Vec<Point>| {
        while cursor.y != end.y {
            cursor.y += if end.y > cursor.y { 1 } else { -1 };
            path.push(*cursor);
        }
    };

    if vertical_first {
        walk_y(&mut cursor, &mut path);
        walk_x(&mut cursor, &mut path);
    } else {
        walk_x(&mut cursor, &mut path);
        walk_y(&mut cursor, &mut path);
    }
    path
}

fn place_doors(dungeon: &mut Dungeon, rng: &mut RandomNumberGenerator) {
    for y in 1..dungeon.height - 1 {
        for x in 1..dungeon.width - 1 {
            let here = Point::new(x, y);
            if dungeon.tile_at(here) != Some(TileKind::Floor) {
                continue;
            }
            if is_chokepoint(dungeon, here) && chance(rng, DOOR_CHANCE) {
                dungeon.set_tile(here, TileKind::Door);
            }
        }
    }
}

/// Turns the floor cell `at` into `kind`, unless that would cut some tile off
/// from spawn.
fn place_feature(dungeon: &mut Dungeon, at: Point, kind: TileKind) -> bool {
    dungeon.set_tile(at, kind);
    if dungeon.is_connected() {
        return true;
    }
    dungeon.set_tile(at, TileKind::Floor);
    false
}

fn is_chokepoint(dungeon: &Dungeon, at: Point) -> bool {
    let kind = |dx: i32, dy: i32| dungeon.tile_at(Point::new(at.x + dx, at.y + dy));
    let wall = Some(TileKind::Wall);
    let floor = Some(TileKind::Floor);
    let horizontal =
        kind(0, -1) == wall && kind(0, 1) == wall && kind(-1, 0) == floor && kind(1, 0) == floor;
    let vertical =
        kind(-1, 0) == wall && kind(1, 0) == wall && kind(0, -1) == floor && kind(0, 1) == floor;
    horizontal || vertical
}

/// A plain floor cell inside some room other than the spawn room, not
/// already holding a monster or item.
fn free_room_cell(layout: &FloorLayout, rng: &mut RandomNumberGenerator) -> Option<Point> {
    let candidates = layout.rooms.get(1..).unwrap_or_default();
    for _ in 0..CELL_TRIES {
        let room = pick(rng, candidates)?;
        let pt = Point::new(
            roll(rng, room.x1, room.x2 - 1),
            roll(rng, room.y1, room.y2 - 1),
        );
        if layout.dungeon.tile_at(pt) == Some(TileKind::Floor) && !layout.occupied(pt) {
            return Some(pt);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(depth: i32, seed: u64) -> FloorLayout {
        let mut rng = RandomNumberGenerator::seeded(seed);
        generate_floor(depth, &EngineConfig::default(), &mut rng).unwrap()
    }

    #[test]
    fn rooms_keep_a_wall_between_them() {
        for seed in 0..20 {
            let floor = layout(5, seed);
            for (i, a) in floor.rooms.iter().enumerate() {
                for b in floor.rooms.iter().skip(i + 1) {
                    assert!(!touches(a, b));
                }
            }
        }
    }

    #[test]
    fn touching_rooms_are_detected() {
        let a = Rect::with_size(1, 1, 3, 3);
        assert!(touches(&a, &Rect::with_size(4, 1, 3, 3)));
        assert!(!touches(&a, &Rect::with_size(5, 1, 3, 3)));
        assert!(touches(&a, &Rect::with_size(2, 2, 3, 3)));
    }

    #[test]
    fn exactly_one_stair_in_the_last_room() {
        for seed in 0..20 {
            let floor = layout(2, seed);
            let stairs = floor.dungeon.points_of(TileKind::Stair);
            assert_eq!(stairs, vec![floor.dungeon.stairs]);
            let last = floor.rooms.last().unwrap();
            assert!(last.point_in_rect(floor.dungeon.stairs));
            assert_eq!(floor.dungeon.spawn, floor.rooms[0].center());
        }
    }

    #[test]
    fn traps_only_from_depth_three() {
        for seed in 0..10 {
            assert!(layout(2, seed).dungeon.points_of(TileKind::Trap).is_empty());
            assert!(layout(8, seed).dungeon.points_of(TileKind::Trap).len() <= 4);
        }
    }

    #[test]
    fn spawns_avoid_the_first_room() {
        for seed in 0..20 {
            let floor = layout(4, seed);
            let first = &floor.rooms[0];
            assert!(!floor.monsters.is_empty());
            for (pt, _) in &floor.monsters {
                assert!(!first.point_in_rect(*pt));
            }
            for (pt, _) in &floor.items {
                assert!(!first.point_in_rect(*pt));
            }
            let chests = floor.dungeon.points_of(TileKind::Chest);
            assert!(chests.iter().all(|pt| !first.point_in_rect(*pt)));
        }
    }

    fn carve(dungeon: &mut Dungeon, cells: &[(i32, i32)]) {
        for &(x, y) in cells {
            dungeon.set_tile(Point::new(x, y), TileKind::Floor);
        }
    }

    #[test]
    fn chokepoints_sit_between_two_walls() {
        let mut across = Dungeon::filled(5, 3);
        carve(&mut across, &[(1, 1), (2, 1), (3, 1)]);
        assert!(is_chokepoint(&across, Point::new(2, 1)));
        // dead end: wall on the left
        assert!(!is_chokepoint(&across, Point::new(1, 1)));

        let mut down = Dungeon::filled(3, 5);
        carve(&mut down, &[(1, 1), (1, 2), (1, 3)]);
        assert!(is_chokepoint(&down, Point::new(1, 2)));

        let mut room = Dungeon::filled(5, 5);
        for y in 1..4 {
            for x in 1..4 {
                carve(&mut room, &[(x, y)]);
            }
        }
        assert!(!is_chokepoint(&room, Point::new(2, 2)));
        assert!(!is_chokepoint(&room, Point::new(2, 1)));
    }

    #[test]
    fn doors_land_on_some_chokepoints_never_side_by_side() {
        let mut hall = Dungeon::filled(202, 3);
        for x in 1..201 {
            carve(&mut hall, &[(x, 1)]);
        }
        let mut rng = RandomNumberGenerator::seeded(5);
        place_doors(&mut hall, &mut rng);

        let doors = hall.points_of(TileKind::Door);
        assert!(!doors.is_empty());
        assert!(doors.len() < 198 / 2);
        for door in &doors {
            assert!((2..200).contains(&door.x));
            let right = Point::new(door.x + 1, door.y);
            assert_ne!(hall.tile_at(right), Some(TileKind::Door));
        }
    }

    #[test]
    fn chest_count_follows_depth() {
        let mut saw_three = false;
        for seed in 0..40 {
            let shallow = layout(2, seed).dungeon.points_of(TileKind::Chest).len();
            assert!((1..=2).contains(&shallow), "depth 2 had {shallow} chests");
            let third = layout(3, seed).dungeon.points_of(TileKind::Chest).len();
            assert!((1..=3).contains(&third), "depth 3 had {third} chests");
            saw_three |= third == 3;
        }
        assert!(saw_three);
    }

    #[test]
    fn features_never_cut_the_floor() {
        for seed in 0..30 {
            let floor = layout(10, seed);
            assert!(floor.dungeon.is_connected());
        }
    }

    #[test]
    fn a_floor_too_narrow_for_any_room_is_an_error() {
        let config = EngineConfig {
            map_width: 4,
            ..EngineConfig::default()
        };
        let mut rng = RandomNumberGenerator::seeded(1);
        let result = generate_floor(1, &config, &mut rng);
        assert!(matches!(
            result,
            Err(GenerationError::NoRooms { width: 4, .. })
        ));
    }

    #[test]
    fn corridor_bend_order_is_honoured() {
        let start = Point::new(1, 1);
        let end = Point::new(3, 4);
        let horizontal = corridor_path(start, end, false);
        let vertical = corridor_path(start, end, true);
        assert_eq!(horizontal[1], Point::new(2, 1));
        assert_eq!(vertical[1], Point::new(1, 2));
        assert_eq!(horizontal.last(), Some(&end));
        assert_eq!(vertical.len(), horizontal.len());
    }

    #[test]
    fn same_seed_same_floor() {
        let a = layout(6, 99);
        let b = layout(6, 99);
        assert_eq!(a.dungeon.tiles, b.dungeon.tiles);
        assert_eq!(a.monsters, b.monsters);
        assert_eq!(a.items, b.items);
    }
}
