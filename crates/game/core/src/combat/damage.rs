//! Damage calculation.

use super::combatant::Combatant;
use super::flags::CombatSwitches;
use crate::effects::HitModifiers;
use crate::state::{Stat, StatLine};

// ============================================================================
// Helpers
// ============================================================================

/// `floor(value × percent / 100)`, rounding toward negative infinity.
pub fn percent_of(value: i32, percent: i32) -> i32 {
    (value * percent).div_euclid(100)
}

/// Stat the defender resists the attacker's weapon with.
///
/// With the lower-of-def/res flag the strictly lower of the two is used;
/// ties keep the weapon's stat.
pub fn defence_stat(attacker: &Combatant, defender_totals: &StatLine) -> Stat {
    let weapon_stat = attacker.unit.weapon_type.targets();
    if attacker.flags.has(CombatSwitches::LOWER_OF_DEF_RES) {
        if defender_totals.def < defender_totals.res {
            return Stat::Def;
        }
        if defender_totals.res < defender_totals.def {
            return Stat::Res;
        }
    }
    weapon_stat
}

// ============================================================================
// Reductions
// ============================================================================

/// Applies percentage reductions multiplicatively.
///
/// # Formula
///
/// ```text
/// combined = 1 − Π(1 − pᵢ / 100)
/// result   = damage − floor(damage × combined)
/// ```
///
/// Evaluated on exact integers, so `result = ceil(damage × Π(100 − pᵢ) / 100ⁿ)`.
/// Percentages are clamped to `[0, 100]`.
pub fn apply_percent_reductions(damage: i32, reductions: &[i32]) -> i32 {
    if damage <= 0 || reductions.is_empty() {
        return damage.max(0);
    }

    const LIMIT: i128 = 10_i128.pow(30);
    let mut kept: i128 = 1;
    let mut scale: i128 = 1;
    for &percent in reductions {
        kept *= 100 - i128::from(percent.clamp(0, 100));
        scale *= 100;
        if scale >= LIMIT {
            kept = (kept + 99) / 100;
            scale /= 100;
        }
    }

    let damage = i128::from(damage);
    let reduced = damage * (scale - kept) / scale;
    (damage - reduced) as i32
}

// ============================================================================
// Damage Calculation
// ============================================================================

/// Calculates the damage of one hit before Miracle.
///
/// # Formula
///
/// ```text
/// base  = atk
/// base += floor(base × advantage%)
/// base += floor(base × effective%)
/// base -= def
/// base -= floor(def × terrain%)
/// base += floor(def × reduce_def_res%)
/// base += special damage
/// base  = max(0, floor(base × base_damage%))
///
/// damage  = base + fixed damage          (halved, floored, for staves)
/// damage  = apply_percent_reductions(damage, reductions)
/// damage  = max(0, damage − flat reduction)
/// ```
///
/// # Arguments
///
/// * `attacker` - Combatant landing the hit
/// * `defender` - Combatant receiving the hit
/// * `modifiers` - Special-trigger modifiers for this hit
/// * `reductions` - Every percentage reduction applying to this hit
/// * `terrain_percent` - Defence bonus of the defender's tile
pub fn calculate_damage(
    attacker: &Combatant,
    defender: &Combatant,
    modifiers: &HitModifiers,
    reductions: &[i32],
    terrain_percent: i32,
) -> i32 {
    let attack = attacker.totals();
    let defence = defender.totals();
    let def = defence[defence_stat(attacker, &defence)];

    let mut base = attack.atk;
    base += percent_of(base, attacker.advantage);
    base += percent_of(base, attacker.effective);
    base -= def;
    base -= percent_of(def, terrain_percent);
    base += percent_of(def, modifiers.reduce_def_res_percent);
    base += modifiers.damage;
    base = percent_of(base, modifiers.base_damage_percent).max(0);

    let mut damage = base + modifiers.fixed_damage;
    if attacker.staff_halved {
        damage = damage.div_euclid(2);
    }
    damage = apply_percent_reductions(damage, reductions);
    (damage - modifiers.flat_reduction).max(0)
}

/// Damage dealt by an area-of-effect special to one unit.
///
/// # Formula
///
/// ```text
/// atk   += floor(atk × advantage%)
/// atk   += floor(atk × effective%)
/// damage = max(0, floor(multiplier% × (atk − def))) + fixed
/// ```
pub fn aoe_damage(
    atk: i32,
    def: i32,
    advantage: i32,
    effective: i32,
    multiplier: i32,
    fixed: i32,
) -> i32 {
    let mut atk = atk;
    atk += percent_of(atk, advantage);
    atk += percent_of(atk, effective);
    percent_of(atk - def, multiplier).max(0) + fixed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_rounds_down() {
        assert_eq!(percent_of(31, 20), 6);
        assert_eq!(percent_of(31, -20), -7);
        assert_eq!(percent_of(25, 30), 7);
    }

    #[test]
    fn reductions_combine_multiplicatively() {
        assert_eq!(apply_percent_reductions(20, &[80]), 4);
        // 1 − 0.5 × 0.5 = 75% reduction
        assert_eq!(apply_percent_reductions(20, &[50, 50]), 5);
        // 30% of 17 is 5.1, floored: 12 remains
        assert_eq!(apply_percent_reductions(17, &[30]), 12);
        assert_eq!(apply_percent_reductions(17, &[]), 17);
        assert_eq!(apply_percent_reductions(17, &[100]), 0);
    }

    #[test]
    fn reductions_never_increase_damage() {
        for damage in 0..60 {
            for percent in [0, 10, 30, 50, 80, 100] {
                let reduced = apply_percent_reductions(damage, &[percent, percent]);
                assert!((0..=damage).contains(&reduced));
            }
        }
    }

    #[test]
    fn aoe_damage_floors_at_fixed() {
        assert_eq!(aoe_damage(50, 30, 0, 0, 150, 0), 30);
        assert_eq!(aoe_damage(20, 30, 0, 0, 150, 5), 5);
    }

    #[test]
    fn aoe_damage_applies_triangle_then_effectiveness() {
        // 50 → 60 with advantage, 60 → 90 effective; 1.5 × (90 − 30)
        assert_eq!(aoe_damage(50, 30, 20, 50, 150, 0), 90);
        // 50 → 40 at disadvantage; 1.5 × (40 − 30)
        assert_eq!(aoe_damage(50, 30, -20, 0, 150, 0), 15);
    }
}
