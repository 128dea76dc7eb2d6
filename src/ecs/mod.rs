pub mod components;
pub mod resources;
pub mod systems;

use bracket_geometry::prelude::Point;
use bracket_random::prelude::RandomNumberGenerator;
use specs::prelude::{
    Builder, Dispatcher, DispatcherBuilder, Entity, Join, World as SpecsWorld, WorldExt,
};
use specs::shred::FetchMut;

use crate::{
    ai::Awareness,
    combat::roll_player_damage,
    data::{Item, ScaledMonster},
    map::{Dungeon, FloorLayout},
};

use self::{
    components::{CombatStats, GroundItem, Monster, MonsterBrain, Position, Renderable},
    resources::{CombatLog, MonsterTurnContext},
    systems::MonsterTurnSystem,
};

/// Owns everything that lives on the current floor besides the tiles:
/// monsters, ground items, and the shared random source.
pub struct EcsWorld {
    specs_world: SpecsWorld,
    dispatcher: Dispatcher<'static, 'static>,
}

pub struct AttackReport {
    pub name: String,
    pub damage: i32,
    pub kill: Option<KillReport>,
}

pub struct KillReport {
    pub xp: i32,
    pub gold: i32,
}

/// Read-only view of a monster for renderers.
#[derive(Clone, Debug)]
pub struct MonsterSighting {
    pub name: String,
    pub point: Point,
    pub glyph: char,
    pub color: (u8, u8, u8),
    pub hp: i32,
    pub max_hp: i32,
    pub awake: bool,
}

impl EcsWorld {
    pub fn new(rng: RandomNumberGenerator) -> Self {
        let mut specs_world = SpecsWorld::new();
        Self::register_components(&mut specs_world);
        specs_world.insert(rng);
        specs_world.insert(CombatLog::default());
        let dispatcher = DispatcherBuilder::new()
            .with(MonsterTurnSystem, "monster_turn", &[])
            .build();

        Self {
            specs_world,
            dispatcher,
        }
    }

    fn register_components(world: &mut SpecsWorld) {
        world.register::<Position>();
        world.register::<Renderable>();
        world.register::<Monster>();
        world.register::<MonsterBrain>();
        world.register::<CombatStats>();
        world.register::<GroundItem>();
    }

    pub fn rng(&self) -> FetchMut<'_, RandomNumberGenerator> {
        self.specs_world.write_resource::<RandomNumberGenerator>()
    }

    /// Drops every monster and item, then spawns the ones `layout` lists.
    pub fn load_floor(&mut self, layout: &FloorLayout) {
        self.specs_world.delete_all();
        self.specs_world.maintain();
        for (order, (point, monster)) in layout.monsters.iter().enumerate() {
            self.spawn_monster(monster, *point, order as u32);
        }
        for (point, item) in &layout.items {
            self.place_item(*point, item.clone());
        }
    }

    pub fn spawn_monster(&mut self, template: &ScaledMonster, point: Point, order: u32) -> Entity {
        self.specs_world
            .create_entity()
            .with(Position { point })
            .with(Renderable {
                glyph: template.glyph,
                color: template.color,
            })
            .with(Monster {
                name: template.name.to_string(),
                xp: template.xp,
                gold: template.gold,
                order,
            })
            .with(MonsterBrain::default())
            .with(CombatStats {
                max_hp: template.hp,
                hp: template.hp,
                attack: template.attack,
                defense: template.defense,
            })
            .build()
    }

    pub fn place_item(&mut self, point: Point, item: Item) -> Entity {
        self.specs_world
            .create_entity()
            .with(Position { point })
            .with(GroundItem { item })
            .build()
    }

    pub fn monster_at(&self, point: Point) -> Option<Entity> {
        let entities = self.specs_world.entities();
        let positions = self.specs_world.read_component::<Position>();
        let monsters = self.specs_world.read_component::<Monster>();
        (&entities, &positions, &monsters)
            .join()
            .find(|(_, pos, _)| pos.point == point)
            .map(|(entity, _, _)| entity)
    }

    pub fn monster_count(&self) -> usize {
        self.specs_world.read_component::<Monster>().join().count()
    }

    /// Resolves the player's swing at whatever monster stands on `target`.
    pub fn player_attack(&mut self, target: Point, attack_total: i32) -> Option<AttackReport> {
        let victim = self.monster_at(target)?;
        let report = {
            let mut stats = self.specs_world.write_component::<CombatStats>();
            let monsters = self.specs_world.read_component::<Monster>();
            let mut rng = self.specs_world.write_resource::<RandomNumberGenerator>();

            let victim_stats = stats.get_mut(victim)?;
            let damage = roll_player_damage(&mut rng, attack_total, victim_stats.defense);
            victim_stats.hp -= damage;
            let monster = monsters.get(victim)?;
            let kill = (victim_stats.hp <= 0).then(|| KillReport {
                xp: monster.xp,
                gold: monster.gold,
            });
            AttackReport {
                name: monster.name.clone(),
                damage,
                kill,
            }
        };

        if report.kill.is_some() {
            if let Err(err) = self.specs_world.delete_entity(victim) {
                tracing::warn!(%err, "slain monster was already gone");
            }
            self.specs_world.maintain();
        }
        Some(report)
    }

    /// Removes and returns every item lying on `point`.
    pub fn take_items_at(&mut self, point: Point) -> Vec<Item> {
        let found: Vec<(Entity, Item)> = {
            let entities = self.specs_world.entities();
            let positions = self.specs_world.read_component::<Position>();
            let items = self.specs_world.read_component::<GroundItem>();
            (&entities, &positions, &items)
                .join()
                .filter(|(_, pos, _)| pos.point == point)
                .map(|(entity, _, ground)| (entity, ground.item.clone()))
                .collect()
        };
        if found.is_empty() {
            return Vec::new();
        }
        let doomed: Vec<Entity> = found.iter().map(|(entity, _)| *entity).collect();
        if let Err((err, deleted)) = self.specs_world.delete_entities(&doomed) {
            tracing::warn!(%err, deleted, "ground item vanished before pickup");
        }
        self.specs_world.maintain();
        found.into_iter().map(|(_, item)| item).collect()
    }

    /// Runs the monster phase and returns the player's hp afterwards.
    pub fn run_monster_turn(
        &mut self,
        dungeon: &Dungeon,
        player_point: Point,
        player_defense: i32,
        player_hp: i32,
    ) -> i32 {
        let context =
            MonsterTurnContext::from_dungeon(dungeon, player_point, player_defense, player_hp);
        self.specs_world.insert(context);
        self.dispatcher.dispatch(&mut self.specs_world);
        self.specs_world.maintain();
        self.specs_world.read_resource::<MonsterTurnContext>().player_hp
    }

    /// Every monster standing in view of the player starts hunting it.
    pub fn wake_visible(&mut self, dungeon: &Dungeon, player_point: Point) {
        let positions = self.specs_world.read_component::<Position>();
        let mut brains = self.specs_world.write_component::<MonsterBrain>();
        for (pos, brain) in (&positions, &mut brains).join() {
            if dungeon.is_visible(pos.point) {
                brain.awareness = Awareness::Hunting {
                    last_known: player_point,
                };
            }
        }
    }

    pub fn drain_combat_log(&mut self) -> Vec<String> {
        let mut log = self.specs_world.write_resource::<CombatLog>();
        std::mem::take(&mut log.entries)
    }

    /// Monsters standing on currently visible cells.
    pub fn visible_monsters(&self, dungeon: &Dungeon) -> Vec<MonsterSighting> {
        let positions = self.specs_world.read_component::<Position>();
        let monsters = self.specs_world.read_component::<Monster>();
        let brains = self.specs_world.read_component::<MonsterBrain>();
        let stats = self.specs_world.read_component::<CombatStats>();
        let renderables = self.specs_world.read_component::<Renderable>();
        let mut sightings: Vec<(u32, MonsterSighting)> =
            (&positions, &monsters, &brains, &stats, &renderables)
                .join()
                .filter(|(pos, ..)| dungeon.is_visible(pos.point))
                .map(|(pos, monster, brain, stat, render)| {
                    (
                        monster.order,
                        MonsterSighting {
                            name: monster.name.clone(),
                            point: pos.point,
                            glyph: render.glyph,
                            color: render.color,
                            hp: stat.hp,
                            max_hp: stat.max_hp,
                            awake: brain.awareness.is_awake(),
                        },
                    )
                })
                .collect();
        sightings.sort_by_key(|(order, _)| *order);
        sightings.into_iter().map(|(_, sighting)| sighting).collect()
    }

    /// Ground items lying on currently visible cells.
    pub fn visible_items(&self, dungeon: &Dungeon) -> Vec<(Point, Item)> {
        let positions = self.specs_world.read_component::<Position>();
        let items = self.specs_world.read_component::<GroundItem>();
        (&positions, &items)
            .join()
            .filter(|(pos, _)| dungeon.is_visible(pos.point))
            .map(|(pos, ground)| (pos.point, ground.item.clone()))
            .collect()
    }

    #[cfg(test)]
    pub(crate) fn set_monster_stats(&mut self, entity: Entity, stats: CombatStats) {
        let mut storage = self.specs_world.write_component::<CombatStats>();
        let _ = storage.insert(entity, stats);
    }

    #[cfg(test)]
    pub(crate) fn monster_point(&self, entity: Entity) -> Option<Point> {
        let positions = self.specs_world.read_component::<Position>();
        positions.get(entity).map(|pos| pos.point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::MONSTER_TIERS;

    #[test]
    fn killing_blow_removes_the_monster() {
        let mut ecs = EcsWorld::new(RandomNumberGenerator::seeded(2));
        let rat = ecs.spawn_monster(&MONSTER_TIERS[0].scaled(1), Point::new(3, 3), 0);
        let report = ecs.player_attack(Point::new(3, 3), 100).unwrap();
        assert_eq!(report.name, "Rat");
        let kill = report.kill.unwrap();
        assert_eq!((kill.xp, kill.gold), (2, 1));
        assert!(ecs.monster_at(Point::new(3, 3)).is_none());
        assert!(ecs.monster_point(rat).is_none());
        assert_eq!(ecs.monster_count(), 0);
    }

    #[test]
    fn glancing_blow_still_hurts() {
        let mut ecs = EcsWorld::new(RandomNumberGenerator::seeded(2));
        let golem = ecs.spawn_monster(&MONSTER_TIERS[9].scaled(1), Point::new(1, 1), 0);
        ecs.set_monster_stats(
            golem,
            CombatStats {
                max_hp: 50,
                hp: 50,
                attack: 1,
                defense: 1_000,
            },
        );
        let report = ecs.player_attack(Point::new(1, 1), 5).unwrap();
        assert_eq!(report.damage, 1);
        assert!(report.kill.is_none());
    }

    #[test]
    fn only_monsters_in_view_wake() {
        let mut ecs = EcsWorld::new(RandomNumberGenerator::seeded(2));
        let mut dungeon = Dungeon::filled(10, 3);
        dungeon.reveal_point(Point::new(3, 1));
        ecs.spawn_monster(&MONSTER_TIERS[0].scaled(1), Point::new(3, 1), 0);
        ecs.spawn_monster(&MONSTER_TIERS[1].scaled(1), Point::new(8, 1), 1);

        ecs.wake_visible(&dungeon, Point::new(1, 1));
        dungeon.reveal_point(Point::new(8, 1));
        let sightings = ecs.visible_monsters(&dungeon);
        assert_eq!(sightings.len(), 2);
        assert!(sightings[0].awake);
        assert!(!sightings[1].awake);
    }

    #[test]
    fn pickup_takes_only_the_named_cell() {
        let mut ecs = EcsWorld::new(RandomNumberGenerator::seeded(2));
        ecs.place_item(Point::new(2, 2), Item::Gold { amount: 4 });
        ecs.place_item(Point::new(2, 2), Item::Gold { amount: 6 });
        ecs.place_item(Point::new(3, 2), Item::Gold { amount: 9 });
        let taken = ecs.take_items_at(Point::new(2, 2));
        assert_eq!(taken, vec![Item::Gold { amount: 4 }, Item::Gold { amount: 6 }]);
        assert!(ecs.take_items_at(Point::new(2, 2)).is_empty());
        assert_eq!(ecs.take_items_at(Point::new(3, 2)).len(), 1);
    }
}
