use bracket_terminal::prelude::*;

use deepdelve::{
    data::Item,
    engine::{Phase, snapshot::EngineState},
    map::TileKind,
};

pub const MAP_ORIGIN_X: i32 = 2;
pub const MAP_ORIGIN_Y: i32 = 7;
const SIDE_PANEL_X: i32 = 38;
const LOG_PANEL_START: i32 = 44;

pub fn draw_scene(ctx: &mut BTerm, state: &EngineState) {
    ctx.cls();
    draw_hud(ctx, state);
    draw_map(ctx, state, Point::new(MAP_ORIGIN_X, MAP_ORIGIN_Y));
    draw_equipment(ctx, state);
    draw_log(ctx, &state.log, LOG_PANEL_START);
    match state.phase {
        Phase::Inventory => draw_inventory(ctx, state),
        Phase::Dead => draw_banner(ctx, state, "YOU DIED", RGB::named(RED)),
        Phase::Victory => draw_banner(ctx, state, "VICTORY", RGB::named(GOLD)),
        Phase::Playing => {}
    }
}

fn draw_hud(ctx: &mut BTerm, state: &EngineState) {
    let (width, _) = ctx.get_char_size();
    ctx.draw_box(0, 0, width - 1, 5, RGB::named(GRAY), RGB::named(BLACK));
    let player = &state.player;
    ctx.print_color(
        2,
        1,
        RGB::named(WHITE),
        RGB::named(BLACK),
        format!("Deepdelve · Floor {} · Turn {}", state.depth, state.turn),
    );

    let ratio = player.hp.max(0) as f32 / player.max_hp.max(1) as f32;
    let hp_color = if ratio <= 0.3 {
        RGB::named(RED)
    } else if ratio <= 0.6 {
        RGB::named(ORANGE)
    } else {
        RGB::named(GREEN)
    };
    ctx.print_color(
        2,
        2,
        hp_color,
        RGB::named(BLACK),
        format!("HP {}/{}", player.hp.max(0), player.max_hp),
    );
    ctx.draw_bar_horizontal(
        16,
        2,
        20,
        player.hp.max(0),
        player.max_hp,
        hp_color,
        RGB::named(DARK_GRAY),
    );
    ctx.print_color(
        2,
        3,
        RGB::named(LIGHT_CYAN),
        RGB::named(BLACK),
        format!(
            "Lv {}  XP {}/{}  ATK {}  DEF {}  Gold {}  Kills {}  Deepest {}",
            player.level,
            player.xp,
            player.xp_to_next,
            player.attack_total,
            player.defense_total,
            player.gold,
            player.kills,
            player.deepest_floor,
        ),
    );
    ctx.print_color(
        2,
        4,
        RGB::named(YELLOW),
        RGB::named(BLACK),
        &state.message,
    );
}

fn tile_color(tile: TileKind) -> RGB {
    match tile {
        TileKind::Wall => RGB::from_u8(110, 110, 120),
        TileKind::Floor | TileKind::Trap => RGB::from_u8(90, 90, 70),
        TileKind::Door => RGB::from_u8(170, 110, 50),
        TileKind::Stair => RGB::named(WHITE),
        TileKind::Chest => RGB::named(GOLD),
    }
}

pub fn draw_map(ctx: &mut BTerm, state: &EngineState, map_origin: Point) {
    for y in 0..state.height {
        for x in 0..state.width {
            let Some(tile) = state.tile(x, y) else {
                continue;
            };
            let glyph = to_cp437(tile.glyph());
            let (screen_x, screen_y) = (map_origin.x + x, map_origin.y + y);
            if state.is_visible(x, y) {
                ctx.set(screen_x, screen_y, tile_color(tile), RGB::named(BLACK), glyph);
            } else if state.is_explored(x, y) {
                ctx.set(
                    screen_x,
                    screen_y,
                    RGB::named(DARK_GRAY),
                    RGB::named(BLACK),
                    glyph,
                );
            }
        }
    }

    for view in &state.items {
        let (r, g, b) = view.item.color();
        ctx.set(
            map_origin.x + view.x,
            map_origin.y + view.y,
            RGB::from_u8(r, g, b),
            RGB::named(BLACK),
            to_cp437(view.item.glyph()),
        );
    }
    for monster in &state.monsters {
        let (r, g, b) = monster.color;
        ctx.set(
            map_origin.x + monster.x,
            map_origin.y + monster.y,
            RGB::from_u8(r, g, b),
            RGB::named(BLACK),
            to_cp437(monster.glyph),
        );
    }
    ctx.set(
        map_origin.x + state.player.x,
        map_origin.y + state.player.y,
        RGB::named(YELLOW),
        RGB::named(BLACK),
        to_cp437('@'),
    );
}

fn draw_equipment(ctx: &mut BTerm, state: &EngineState) {
    let player = &state.player;
    let weapon = player
        .weapon
        .as_ref()
        .map_or("bare hands".to_string(), |gear| {
            format!("{} (+{})", gear.name, gear.bonus)
        });
    let armor = player
        .armor
        .as_ref()
        .map_or("none".to_string(), |gear| format!("{} (+{})", gear.name, gear.bonus));
    ctx.print(SIDE_PANEL_X, MAP_ORIGIN_Y, format!("Weapon: {weapon}"));
    ctx.print(SIDE_PANEL_X, MAP_ORIGIN_Y + 1, format!("Armor:  {armor}"));
    ctx.print(
        SIDE_PANEL_X,
        MAP_ORIGIN_Y + 2,
        format!("Pack:   {}/{}", player.inventory.len(), player.capacity),
    );

    let mut row = MAP_ORIGIN_Y + 4;
    for monster in &state.monsters {
        let (r, g, b) = monster.color;
        let status = if monster.awake { "hunting" } else { "asleep" };
        ctx.print_color(
            SIDE_PANEL_X,
            row,
            RGB::from_u8(r, g, b),
            RGB::named(BLACK),
            format!("{} {}/{} {status}", monster.name, monster.hp, monster.max_hp),
        );
        row += 1;
    }
}

fn draw_inventory(ctx: &mut BTerm, state: &EngineState) {
    let items = &state.player.inventory;
    let height = items.len().max(1) as i32 + 3;
    ctx.draw_box(
        SIDE_PANEL_X - 2,
        MAP_ORIGIN_Y + 12,
        40,
        height,
        RGB::named(WHITE),
        RGB::named(BLACK),
    );
    ctx.print_color(
        SIDE_PANEL_X,
        MAP_ORIGIN_Y + 12,
        RGB::named(YELLOW),
        RGB::named(BLACK),
        " Inventory (E use, R drop, Esc close) ",
    );
    if items.is_empty() {
        ctx.print(SIDE_PANEL_X, MAP_ORIGIN_Y + 14, "(empty)");
        return;
    }
    for (idx, item) in items.iter().enumerate() {
        let selected = idx == state.selected;
        let fg = if selected {
            RGB::named(BLACK)
        } else {
            let (r, g, b) = item.color();
            RGB::from_u8(r, g, b)
        };
        let bg = if selected {
            RGB::named(WHITE)
        } else {
            RGB::named(BLACK)
        };
        ctx.print_color(
            SIDE_PANEL_X,
            MAP_ORIGIN_Y + 14 + idx as i32,
            fg,
            bg,
            format!("{} {} ({})", item.glyph(), item.name(), describe(item)),
        );
    }
}

fn describe(item: &Item) -> String {
    match item {
        Item::Weapon(gear) => format!("+{} atk", gear.bonus),
        Item::Armor(gear) => format!("+{} def", gear.bonus),
        Item::Potion(_) => format!("+{}", item.stat()),
        Item::Gold { amount } => format!("{amount}g"),
    }
}

fn draw_banner(ctx: &mut BTerm, state: &EngineState, title: &str, color: RGB) {
    ctx.draw_box(20, 18, 40, 6, color, RGB::named(BLACK));
    ctx.print_color_centered(19, color, RGB::named(BLACK), title);
    ctx.print_color_centered(
        21,
        RGB::named(WHITE),
        RGB::named(BLACK),
        format!(
            "Level {} · {} kills · {} gold · deepest floor {}",
            state.player.level, state.player.kills, state.player.gold, state.player.deepest_floor
        ),
    );
    ctx.print_color_centered(
        22,
        RGB::named(GRAY),
        RGB::named(BLACK),
        "Press Enter to begin again",
    );
}

pub fn draw_log(ctx: &mut BTerm, log: &[String], start_y: i32) {
    let (width, _) = ctx.get_char_size();
    let top = (start_y - 1).max(0);
    ctx.draw_box(0, top, width - 1, 6, RGB::named(DARK_GRAY), RGB::named(BLACK));
    ctx.print_color(2, top, RGB::named(WHITE), RGB::named(BLACK), "Event Log");
    for (row, entry) in log.iter().take(5).enumerate() {
        ctx.print(2, top + 1 + row as i32, entry);
    }
}
