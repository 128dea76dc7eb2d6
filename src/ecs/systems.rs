use bracket_random::prelude::RandomNumberGenerator;
use specs::prelude::*;

use crate::{
    ai::{MonsterAction, plan_turn},
    combat::roll_monster_damage,
};

use super::{
    components::{CombatStats, Monster, MonsterBrain, Position},
    resources::{CombatLog, MonsterTurnContext},
};

/// Gives every monster on the floor one action, in spawn order. Stops as
/// soon as a hit drops the player.
#[derive(Default)]
pub struct MonsterTurnSystem;

impl<'a> System<'a> for MonsterTurnSystem {
    type SystemData = (
        Entities<'a>,
        ReadStorage<'a, Monster>,
        WriteStorage<'a, MonsterBrain>,
        WriteStorage<'a, Position>,
        ReadStorage<'a, CombatStats>,
        WriteExpect<'a, MonsterTurnContext>,
        WriteExpect<'a, CombatLog>,
        WriteExpect<'a, RandomNumberGenerator>,
    );

    fn run(
        &mut self,
        (
            entities,
            monsters,
            mut brains,
            mut positions,
            stats,
            mut ctx,
            mut combat_log,
            mut rng,
        ): Self::SystemData,
    ) {
        let mut queue: Vec<(u32, Entity)> = (&entities, &monsters)
            .join()
            .map(|(entity, monster)| (monster.order, entity))
            .collect();
        queue.sort_unstable_by_key(|(order, _)| *order);

        for (_, entity) in queue {
            if ctx.player_down() {
                break;
            }
            let Some(here) = positions.get(entity).map(|pos| pos.point) else {
                continue;
            };
            let Some(brain) = brains.get_mut(entity) else {
                continue;
            };
            let sees_player = ctx.is_visible(here);
            let target = match plan_turn(&mut brain.awareness, here, sees_player, ctx.player_point)
            {
                MonsterAction::Advance(target) => target,
                MonsterAction::Idle | MonsterAction::Forget => continue,
            };

            let name = monsters
                .get(entity)
                .map(|m| m.name.clone())
                .unwrap_or_else(|| "monster".to_string());

            if target == ctx.player_point {
                let attack = stats.get(entity).map_or(0, |stat| stat.attack);
                let damage = roll_monster_damage(&mut rng, attack, ctx.player_defense);
                ctx.player_hp -= damage;
                combat_log.push(format!("{name} hits you for {damage}."));
                if ctx.player_down() {
                    combat_log.push(format!("You were slain by a {name}."));
                }
                continue;
            }

            let blocked = (&entities, &positions, &monsters)
                .join()
                .any(|(other, pos, _)| other != entity && pos.point == target);
            if blocked || !ctx.is_walkable(target) {
                continue;
            }
            if let Some(pos) = positions.get_mut(entity) {
                pos.point = target;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use bracket_geometry::prelude::Point;

    use super::*;
    use crate::{
        ai::Awareness,
        ecs::components::Renderable,
        map::{Dungeon, TileKind},
    };

    fn corridor() -> Dungeon {
        let mut dungeon = Dungeon::filled(12, 3);
        for x in 1..11 {
            dungeon.set_tile(Point::new(x, 1), TileKind::Floor);
        }
        dungeon
    }

    fn world_with(dungeon: &Dungeon, player: Point, hp: i32) -> World {
        let mut world = World::new();
        world.register::<Position>();
        world.register::<Renderable>();
        world.register::<Monster>();
        world.register::<MonsterBrain>();
        world.register::<CombatStats>();
        world.insert(RandomNumberGenerator::seeded(1));
        world.insert(CombatLog::default());
        world.insert(MonsterTurnContext::from_dungeon(dungeon, player, 0, hp));
        world
    }

    fn add_monster(world: &mut World, at: Point, order: u32, awareness: Awareness) -> Entity {
        world
            .create_entity()
            .with(Position { point: at })
            .with(Monster {
                name: format!("Rat{order}"),
                xp: 1,
                gold: 1,
                order,
            })
            .with(MonsterBrain { awareness })
            .with(CombatStats {
                max_hp: 4,
                hp: 4,
                attack: 50,
                defense: 0,
            })
            .build()
    }

    fn point_of(world: &World, entity: Entity) -> Point {
        world.read_storage::<Position>().get(entity).unwrap().point
    }

    #[test]
    fn blocked_monster_waits_its_turn() {
        let mut dungeon = corridor();
        for x in 1..11 {
            dungeon.reveal_point(Point::new(x, 1));
        }
        let mut world = world_with(&dungeon, Point::new(1, 1), 100);
        let lead = add_monster(&mut world, Point::new(5, 1), 1, Awareness::Dormant);
        let tail = add_monster(&mut world, Point::new(6, 1), 0, Awareness::Dormant);
        MonsterTurnSystem.run_now(&world);
        // tail acts first and finds lead in the way
        assert_eq!(point_of(&world, tail), Point::new(6, 1));
        assert_eq!(point_of(&world, lead), Point::new(4, 1));
    }

    #[test]
    fn lethal_hit_skips_remaining_monsters() {
        let mut dungeon = corridor();
        for x in 1..11 {
            dungeon.reveal_point(Point::new(x, 1));
        }
        let mut world = world_with(&dungeon, Point::new(5, 1), 10);
        add_monster(&mut world, Point::new(4, 1), 0, Awareness::Dormant);
        let second = add_monster(&mut world, Point::new(8, 1), 1, Awareness::Dormant);
        MonsterTurnSystem.run_now(&world);
        assert!(world.read_resource::<MonsterTurnContext>().player_down());
        assert_eq!(point_of(&world, second), Point::new(8, 1));
        let log = world.read_resource::<CombatLog>();
        assert!(log.entries.iter().any(|line| line.contains("slain")));
    }

    #[test]
    fn unseen_dormant_monster_never_moves() {
        let dungeon = corridor();
        let mut world = world_with(&dungeon, Point::new(1, 1), 10);
        let sleeper = add_monster(&mut world, Point::new(9, 1), 0, Awareness::Dormant);
        MonsterTurnSystem.run_now(&world);
        assert_eq!(point_of(&world, sleeper), Point::new(9, 1));
    }
}
