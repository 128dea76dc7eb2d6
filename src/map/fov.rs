use std::f32::consts::TAU;

use bracket_geometry::prelude::Point;

use super::Dungeon;

/// Refreshes `dungeon.visible` from `origin` by casting `rays` evenly spaced
/// rays of `radius` unit steps from the centre of the origin cell. Cells
/// stepped through are also added to `dungeon.explored`.
///
/// A ray stops on the first wall it enters, after marking that wall. This is
/// a raycast approximation rather than shadow-casting, so light can slip
/// past wall corners at shallow angles.
pub fn compute_visibility(dungeon: &mut Dungeon, origin: Point, radius: i32, rays: u32) {
    dungeon.clear_visible();
    if !dungeon.in_bounds(origin) {
        return;
    }
    dungeon.reveal_point(origin);

    let cx = origin.x as f32 + 0.5;
    let cy = origin.y as f32 + 0.5;
    for ray in 0..rays {
        let angle = ray as f32 * TAU / rays as f32;
        let (dy, dx) = angle.sin_cos();
        for step in 1..=radius {
            let point = Point::new(
                (cx + dx * step as f32).floor() as i32,
                (cy + dy * step as f32).floor() as i32,
            );
            if !dungeon.in_bounds(point) {
                break;
            }
            dungeon.reveal_point(point);
            if dungeon.tile_at(point).is_some_and(|tile| tile.blocks_sight()) {
                break;
            }
        }
    }
}
