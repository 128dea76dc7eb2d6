use bracket_random::prelude::RandomNumberGenerator;

use crate::dice::roll;

/// Player melee: a symmetric -1..=1 swing, never below 1.
pub fn player_damage(attack_total: i32, defense: i32, swing: i32) -> i32 {
    (attack_total - defense + swing).max(1)
}

/// Monster melee: adds 0 or 1, never below 1.
pub fn monster_damage(attack: i32, defense_total: i32, bonus: i32) -> i32 {
    (attack - defense_total + bonus).max(1)
}

/// `3 + depth * 1.5` rounded down, softened by half the armor bonus.
pub fn trap_damage(depth: i32, armor_bonus: i32) -> i32 {
    (3 + depth * 3 / 2 - armor_bonus / 2).max(1)
}

pub fn roll_player_damage(rng: &mut RandomNumberGenerator, attack_total: i32, defense: i32) -> i32 {
    player_damage(attack_total, defense, roll(rng, 0, 2) - 1)
}

pub fn roll_monster_damage(rng: &mut RandomNumberGenerator, attack: i32, defense_total: i32) -> i32 {
    monster_damage(attack, defense_total, roll(rng, 0, 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn trap_matches_reference_numbers() {
        assert_eq!(trap_damage(4, 0), 9);
        assert_eq!(trap_damage(3, 0), 7);
        assert_eq!(trap_damage(4, 6), 6);
        assert_eq!(trap_damage(1, 40), 1);
    }

    #[test]
    fn swing_is_symmetric() {
        assert_eq!(player_damage(5, 1, -1), 3);
        assert_eq!(player_damage(5, 1, 0), 4);
        assert_eq!(player_damage(5, 1, 1), 5);
        assert_eq!(monster_damage(4, 1, 0), 3);
        assert_eq!(monster_damage(4, 1, 1), 4);
    }

    proptest! {
        #[test]
        fn damage_never_drops_below_one(
            attack in 0i32..50,
            defense in 0i32..1_000_000,
            seed in any::<u64>(),
        ) {
            let mut rng = RandomNumberGenerator::seeded(seed);
            prop_assert!(roll_player_damage(&mut rng, attack, defense) >= 1);
            prop_assert!(roll_monster_damage(&mut rng, attack, defense) >= 1);
            prop_assert!(trap_damage(attack, defense) >= 1);
        }
    }
}
