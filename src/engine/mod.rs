//! The turn loop: one intent in, one snapshot out.

pub mod player;
pub mod snapshot;


use bracket_geometry::prelude::Point;
use bracket_random::prelude::RandomNumberGenerator;
use serde::Serialize;

use crate::{
    combat::trap_damage,
    config::EngineConfig,
    data::{Item, roll_loot},
    dice::chance,
    ecs::EcsWorld,
    error::EngineError,
    map::{Dungeon, FloorLayout, TileKind, fov::compute_visibility, generate_floor},
};

use self::{
    player::{Pickup, Player},
    snapshot::{EngineState, ItemView, MonsterView, PlayerView},
};

const LOG_MAX_ENTRIES: usize = 8;
const KILL_DROP_CHANCE: f32 = 0.25;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub enum Phase {
    Playing,
    Inventory,
    Dead,
    Victory,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    pub fn delta(&self) -> Point {
        match self {
            Direction::North => Point::new(0, -1),
            Direction::South => Point::new(0, 1),
            Direction::East => Point::new(1, 0),
            Direction::West => Point::new(-1, 0),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Intent {
    Move(Direction),
    Wait,
    ToggleInventory,
    Cancel,
    UseSelected,
    DropSelected,
    SelectNext,
    SelectPrevious,
    Descend,
    Confirm,
}

/// A single run of the game. Owns the floor, its inhabitants, the player and
/// the random source; nothing outside may mutate them.
pub struct Engine {
    config: EngineConfig,
    dungeon: Dungeon,
    ecs: EcsWorld,
    player: Player,
    phase: Phase,
    depth: i32,
    turn: u64,
    selected: usize,
    message: String,
    message_log: Vec<String>,
}

impl Engine {
    /// Starts a run on floor 1, seeded from `config.seed` or from entropy.
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        let rng = match config.seed {
            Some(seed) => RandomNumberGenerator::seeded(seed),
            None => RandomNumberGenerator::new(),
        };
        Self::with_rng(config, rng)
    }

    pub fn with_rng(config: EngineConfig, rng: RandomNumberGenerator) -> Result<Self, EngineError> {
        config.validate()?;
        let mut ecs = EcsWorld::new(rng);
        let layout = {
            let mut rng = ecs.rng();
            generate_floor(1, &config, &mut rng)?
        };
        ecs.load_floor(&layout);
        let player = Player::new(layout.dungeon.spawn, config.inventory_capacity);

        let mut engine = Self {
            config,
            dungeon: layout.dungeon,
            ecs,
            player,
            phase: Phase::Playing,
            depth: 1,
            turn: 0,
            selected: 0,
            message: String::new(),
            message_log: Vec::new(),
        };
        engine.refresh_visibility();
        engine.push_log("You enter the dungeon.");
        Ok(engine)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn turn(&self) -> u64 {
        self.turn
    }

    pub fn depth(&self) -> i32 {
        self.depth
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn dungeon(&self) -> &Dungeon {
        &self.dungeon
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Applies one intent. Intents that make no sense in the current phase,
    /// or that fail validation, change nothing and cost no turn.
    pub fn step(&mut self, intent: Intent) -> EngineState {
        match (self.phase, intent) {
            (Phase::Playing, Intent::Move(direction)) => self.try_move(direction),
            (Phase::Playing, Intent::Wait) => self.end_player_turn(),
            (Phase::Playing, Intent::Descend) => self.descend(),
            (Phase::Playing, Intent::ToggleInventory) => {
                self.phase = Phase::Inventory;
                self.clamp_selection();
            }
            (Phase::Inventory, Intent::ToggleInventory | Intent::Cancel) => {
                self.phase = Phase::Playing;
            }
            (Phase::Inventory, Intent::SelectNext) => self.cycle_selection(1),
            (Phase::Inventory, Intent::SelectPrevious) => self.cycle_selection(-1),
            (Phase::Inventory, Intent::UseSelected) => self.use_selected(),
            (Phase::Inventory, Intent::DropSelected) => self.drop_selected(),
            (Phase::Dead | Phase::Victory, Intent::Confirm) => self.restart(),
            _ => {}
        }
        self.state()
    }

    pub fn state(&self) -> EngineState {
        let monsters = self
            .ecs
            .visible_monsters(&self.dungeon)
            .into_iter()
            .map(|sighting| MonsterView {
                name: sighting.name,
                x: sighting.point.x,
                y: sighting.point.y,
                glyph: sighting.glyph,
                color: sighting.color,
                hp: sighting.hp,
                max_hp: sighting.max_hp,
                awake: sighting.awake,
            })
            .collect();
        let items = self
            .ecs
            .visible_items(&self.dungeon)
            .into_iter()
            .map(|(point, item)| ItemView {
                x: point.x,
                y: point.y,
                item,
            })
            .collect();

        EngineState {
            phase: self.phase,
            depth: self.depth,
            turn: self.turn,
            width: self.dungeon.width,
            height: self.dungeon.height,
            tiles: self.dungeon.tiles.clone(),
            visible: self.dungeon.visible.clone(),
            explored: self.dungeon.explored.clone(),
            player: PlayerView::from(&self.player),
            monsters,
            items,
            message: self.message.clone(),
            log: self.message_log.clone(),
            selected: self.selected,
        }
    }

    fn try_move(&mut self, direction: Direction) {
        let target = self.player.point + direction.delta();
        if !self.dungeon.is_walkable(target) {
            return;
        }

        if self.ecs.monster_at(target).is_some() {
            self.attack(target);
        } else {
            self.player.point = target;
            self.collect_ground_items(target);
            self.interact_with_tile(target);
        }
        self.end_player_turn();
    }

    fn attack(&mut self, target: Point) {
        let Some(report) = self.ecs.player_attack(target, self.player.attack_total()) else {
            return;
        };
        let Some(kill) = report.kill else {
            self.push_log(format!("You hit the {} for {}.", report.name, report.damage));
            return;
        };

        self.player.kills += 1;
        self.player.gold += kill.gold;
        self.push_log(format!(
            "{} slain! +{}xp +{}g",
            report.name, kill.xp, kill.gold
        ));

        let depth = self.depth;
        let drop = {
            let mut rng = self.ecs.rng();
            chance(&mut rng, KILL_DROP_CHANCE).then(|| roll_loot(&mut rng, depth))
        };
        if let Some(item) = drop {
            self.push_log(format!("The {} dropped {}.", report.name, item.name()));
            self.ecs.place_item(target, item);
        }

        if let Some(up) = self.player.gain_xp(kill.xp) {
            tracing::info!(level = up.level, max_hp = up.max_hp, "player levelled up");
            self.push_log(format!("Level up! You are now level {}.", up.level));
        }
    }

    fn collect_ground_items(&mut self, at: Point) {
        for item in self.ecs.take_items_at(at) {
            if let Some(left) = self.offer(item) {
                self.ecs.place_item(at, left);
            }
        }
    }

    fn interact_with_tile(&mut self, at: Point) {
        match self.dungeon.tile_at(at) {
            Some(TileKind::Chest) => {
                self.dungeon.set_tile(at, TileKind::Floor);
                let depth = self.depth;
                let loot = roll_loot(&mut self.ecs.rng(), depth);
                self.push_log("You open the chest.");
                if let Some(left) = self.offer(loot) {
                    self.ecs.place_item(at, left);
                }
            }
            Some(TileKind::Trap) => {
                self.dungeon.set_tile(at, TileKind::Floor);
                let damage = trap_damage(self.depth, self.player.armor_bonus());
                self.player.hp -= damage;
                self.push_log(format!("A trap springs! -{damage}hp"));
            }
            Some(TileKind::Stair) => self.push_log("A staircase leads down."),
            _ => {}
        }
    }

    /// Hands `item` to the player. Returns it if the pack had no room.
    fn offer(&mut self, item: Item) -> Option<Item> {
        match self.player.receive(item) {
            Pickup::Gold(amount) => {
                self.push_log(format!("You pick up {amount} gold."));
                None
            }
            Pickup::Stored(name) => {
                self.push_log(format!("You pick up the {name}."));
                None
            }
            Pickup::Full(item) => {
                self.push_log(format!("Your pack is full. The {} stays put.", item.name()));
                Some(item)
            }
        }
    }

    fn end_player_turn(&mut self) {
        self.turn += 1;
        self.refresh_visibility();
        if !self.player.is_dead() {
            self.player.hp = self.ecs.run_monster_turn(
                &self.dungeon,
                self.player.point,
                self.player.defense_total(),
                self.player.hp,
            );
            for entry in self.ecs.drain_combat_log() {
                self.push_log(entry);
            }
        }
        if self.player.is_dead() {
            self.phase = Phase::Dead;
            tracing::info!(
                depth = self.depth,
                turn = self.turn,
                kills = self.player.kills,
                "player died"
            );
            self.push_log("You die... (confirm to try again)");
        }
    }

    fn descend(&mut self) {
        if self.dungeon.tile_at(self.player.point) != Some(TileKind::Stair) {
            return;
        }
        let next = self.depth + 1;
        if next > self.config.final_depth {
            self.depth = next;
            self.player.record_depth(next);
            self.phase = Phase::Victory;
            tracing::info!(turn = self.turn, gold = self.player.gold, "dungeon cleared");
            self.push_log("You escape the depths. Victory!");
            return;
        }
        let Some(layout) = self.generate(next) else {
            return;
        };
        self.depth = next;
        self.install_floor(layout);
        self.player.record_depth(next);
        tracing::info!(depth = next, "descended");
        self.push_log(format!("You descend to floor {next}."));
    }

    fn restart(&mut self) {
        let Some(layout) = self.generate(1) else {
            return;
        };
        self.player.reset(layout.dungeon.spawn);
        self.depth = 1;
        self.turn = 0;
        self.selected = 0;
        self.phase = Phase::Playing;
        self.install_floor(layout);
        self.message_log.clear();
        self.push_log("You enter the dungeon.");
    }

    fn generate(&mut self, depth: i32) -> Option<FloorLayout> {
        let result = {
            let mut rng = self.ecs.rng();
            generate_floor(depth, &self.config, &mut rng)
        };
        match result {
            Ok(layout) => Some(layout),
            Err(err) => {
                tracing::error!(%err, depth, "floor generation failed; staying put");
                None
            }
        }
    }

    fn install_floor(&mut self, layout: FloorLayout) {
        self.ecs.load_floor(&layout);
        self.player.point = layout.dungeon.spawn;
        self.dungeon = layout.dungeon;
        self.refresh_visibility();
        tracing::debug!(
            depth = self.depth,
            monsters = self.ecs.monster_count(),
            "floor installed"
        );
    }

    fn refresh_visibility(&mut self) {
        compute_visibility(
            &mut self.dungeon,
            self.player.point,
            self.config.fov_radius,
            self.config.fov_rays,
        );
        self.ecs.wake_visible(&self.dungeon, self.player.point);
    }

    fn use_selected(&mut self) {
        if let Some(message) = self.player.use_item(self.selected) {
            self.push_log(message);
            self.clamp_selection();
        }
    }

    fn drop_selected(&mut self) {
        if let Some(item) = self.player.drop_item(self.selected) {
            self.push_log(format!("You drop the {}.", item.name()));
            self.ecs.place_item(self.player.point, item);
            self.clamp_selection();
        }
    }

    fn cycle_selection(&mut self, delta: i32) {
        let len = self.player.inventory.len() as i32;
        if len == 0 {
            return;
        }
        self.selected = (self.selected as i32 + delta).rem_euclid(len) as usize;
    }

    fn clamp_selection(&mut self) {
        let len = self.player.inventory.len();
        self.selected = self.selected.min(len.saturating_sub(1));
    }

    fn push_log<S: Into<String>>(&mut self, entry: S) {
        let entry = entry.into();
        self.message = entry.clone();
        self.message_log.insert(0, entry);
        self.message_log.truncate(LOG_MAX_ENTRIES);
    }
}
