//! How a level turns into attribute values.

use moblevels_domain::Attribute;

/// Blast radius of an unlevelled explosive mob.
pub const VANILLA_BLAST_RADIUS: i32 = 3;

/// Fraction of the way from level zero to `max_level`.
pub fn level_ratio(level: i32, max_level: i32) -> f64 {
    f64::from(level) / f64::from(max_level.max(1))
}

pub trait AttributeScaling: Send + Sync {
    /// New base value of `attribute` at `level`.
    fn scale(&self, attribute: Attribute, baseline: f64, amount: f64, level: i32, max_level: i32)
        -> f64;

    /// Explosion radius at `level`, never above `max_radius`.
    fn blast_radius(&self, base: i32, max_radius: i32, level: i32, max_level: i32) -> i32;
}

/// `baseline + amount * level / max_level`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LevelRatioScaling;

impl AttributeScaling for LevelRatioScaling {
    fn scale(&self, _attribute: Attribute, baseline: f64, amount: f64, level: i32, max_level: i32) -> f64 {
        baseline + amount * level_ratio(level, max_level)
    }

    fn blast_radius(&self, base: i32, max_radius: i32, level: i32, max_level: i32) -> i32 {
        if max_radius <= base {
            return base;
        }
        let gained = f64::from(max_radius - base) * level_ratio(level, max_level).min(1.0);
        base + gained.floor() as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scaling_is_linear_in_level() {
        let scaling = LevelRatioScaling;
        assert_eq!(scaling.scale(Attribute::MaxHealth, 20.0, 10.0, 0, 10), 20.0);
        assert_eq!(scaling.scale(Attribute::MaxHealth, 20.0, 10.0, 5, 10), 25.0);
        assert_eq!(scaling.scale(Attribute::MaxHealth, 20.0, 10.0, 10, 10), 30.0);
    }

    #[test]
    fn non_negative_amounts_never_decrease_with_level() {
        let scaling = LevelRatioScaling;
        let mut previous = f64::MIN;
        for level in 0..=25 {
            let value = scaling.scale(Attribute::AttackDamage, 3.0, 2.5, level, 20);
            assert!(value >= previous);
            previous = value;
        }
    }

    #[test]
    fn zero_max_level_does_not_divide_by_zero() {
        assert_eq!(level_ratio(3, 0), 3.0);
    }

    #[test]
    fn blast_radius_is_capped() {
        let scaling = LevelRatioScaling;
        assert_eq!(scaling.blast_radius(3, 7, 0, 10), 3);
        assert_eq!(scaling.blast_radius(3, 7, 5, 10), 5);
        assert_eq!(scaling.blast_radius(3, 7, 30, 10), 7);
        assert_eq!(scaling.blast_radius(3, 2, 10, 10), 3);
    }
}
