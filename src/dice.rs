use bracket_random::prelude::RandomNumberGenerator;

/// Uniform roll over `lo..=hi`.
pub fn roll(rng: &mut RandomNumberGenerator, lo: i32, hi: i32) -> i32 {
    if hi <= lo {
        return lo;
    }
    rng.range(lo, hi + 1)
}

/// True with probability `p` (clamped to 0..=1).
pub fn chance(rng: &mut RandomNumberGenerator, p: f32) -> bool {
    let p = p.clamp(0.0, 1.0);
    rng.range(0, 10_000) < (p * 10_000.0).round() as i32
}

pub fn pick<'a, T>(rng: &mut RandomNumberGenerator, items: &'a [T]) -> Option<&'a T> {
    if items.is_empty() {
        return None;
    }
    let idx = rng.range(0, items.len() as i32) as usize;
    items.get(idx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roll_stays_inclusive() {
        let mut rng = RandomNumberGenerator::seeded(7);
        let mut seen = [false; 3];
        for _ in 0..500 {
            let value = roll(&mut rng, 0, 2);
            assert!((0..=2).contains(&value));
            seen[value as usize] = true;
        }
        assert!(seen.iter().all(|hit| *hit));
    }

    #[test]
    fn degenerate_ranges_collapse() {
        let mut rng = RandomNumberGenerator::seeded(7);
        assert_eq!(roll(&mut rng, 4, 4), 4);
        assert!(!chance(&mut rng, 0.0));
        assert!(chance(&mut rng, 1.0));
        assert!(pick::<i32>(&mut rng, &[]).is_none());
    }
}
