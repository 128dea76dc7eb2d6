use bracket_geometry::prelude::Point;

/// What a monster knows about the player. A dormant monster carries no goal.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Awareness {
    #[default]
    Dormant,
    Hunting {
        last_known: Point,
    },
}

impl Awareness {
    pub fn is_awake(&self) -> bool {
        matches!(self, Awareness::Hunting { .. })
    }

    pub fn last_known(&self) -> Option<Point> {
        match self {
            Awareness::Dormant => None,
            Awareness::Hunting { last_known } => Some(*last_known),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MonsterAction {
    /// Dormant, or nothing left to do this turn.
    Idle,
    /// Lost the trail; fall back asleep.
    Forget,
    /// Step onto (or attack) this cell.
    Advance(Point),
}

/// Updates `awareness` for this turn and picks the monster's action.
///
/// `sees_player` is true when the monster stands inside the player's current
/// field of view; sight is treated as symmetric.
pub fn plan_turn(
    awareness: &mut Awareness,
    here: Point,
    sees_player: bool,
    player: Point,
) -> MonsterAction {
    if sees_player {
        *awareness = Awareness::Hunting { last_known: player };
    }
    let Some(goal) = awareness.last_known() else {
        return MonsterAction::Idle;
    };
    match pursuit_step(here, goal) {
        Some(step) => MonsterAction::Advance(here + step),
        None if !sees_player => {
            *awareness = Awareness::Dormant;
            MonsterAction::Forget
        }
        None => MonsterAction::Idle,
    }
}

/// One orthogonal step toward `goal` along the axis with the larger gap.
/// Ties go to the horizontal axis. `None` once `from == goal`.
pub fn pursuit_step(from: Point, goal: Point) -> Option<Point> {
    let dx = goal.x - from.x;
    let dy = goal.y - from.y;
    if dx == 0 && dy == 0 {
        return None;
    }
    if dx.abs() >= dy.abs() {
        Some(Point::new(dx.signum(), 0))
    } else {
        Some(Point::new(0, dy.signum()))
    }
}
