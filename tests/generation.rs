use bracket_geometry::prelude::Point;
use bracket_random::prelude::RandomNumberGenerator;
use deepdelve::{
    EngineConfig,
    map::{TileKind, generate_floor},
};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn every_open_tile_connects_to_spawn(seed in any::<u64>(), depth in 1i32..=12) {
        let config = EngineConfig::default();
        let mut rng = RandomNumberGenerator::seeded(seed);
        let floor = generate_floor(depth, &config, &mut rng).unwrap();
        let dungeon = &floor.dungeon;

        let reachable = dungeon.reachable_from(dungeon.spawn);
        for (idx, tile) in dungeon.tiles.iter().enumerate() {
            if *tile != TileKind::Wall {
                prop_assert!(reachable[idx], "tile {idx} ({tile:?}) cut off at depth {depth}");
            }
        }
    }

    #[test]
    fn floors_keep_their_shape(seed in any::<u64>(), depth in 1i32..=12) {
        let config = EngineConfig::default();
        let mut rng = RandomNumberGenerator::seeded(seed);
        let floor = generate_floor(depth, &config, &mut rng).unwrap();
        let dungeon = &floor.dungeon;

        prop_assert_eq!(dungeon.points_of(TileKind::Stair).len(), 1);
        prop_assert!(dungeon.is_walkable(dungeon.spawn));
        prop_assert_ne!(dungeon.spawn, dungeon.stairs);
        if depth < 3 {
            prop_assert!(dungeon.points_of(TileKind::Trap).is_empty());
        }

        for x in 0..dungeon.width {
            prop_assert_eq!(dungeon.tile_at(Point::new(x, 0)), Some(TileKind::Wall));
            prop_assert_eq!(dungeon.tile_at(Point::new(x, dungeon.height - 1)), Some(TileKind::Wall));
        }
        for y in 0..dungeon.height {
            prop_assert_eq!(dungeon.tile_at(Point::new(0, y)), Some(TileKind::Wall));
            prop_assert_eq!(dungeon.tile_at(Point::new(dungeon.width - 1, y)), Some(TileKind::Wall));
        }

        prop_assert!(floor.monsters.len() as i32 <= 4 + depth * 2 + 2);
        let first_room = floor.rooms[0];
        for (point, _) in &floor.monsters {
            prop_assert!(!first_room.point_in_rect(*point));
        }
    }
}

#[test]
fn a_larger_config_still_generates() {
    let config = EngineConfig {
        map_width: 60,
        map_height: 40,
        ..EngineConfig::default()
    };
    let mut rng = RandomNumberGenerator::seeded(99);
    let floor = generate_floor(5, &config, &mut rng).unwrap();
    assert_eq!(floor.dungeon.width, 60);
    assert_eq!(floor.dungeon.tiles.len(), 60 * 40);
}
