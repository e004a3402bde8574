//! Target selection.

use super::Scope;
use crate::ability::{MoveType, StatFilter, Target, WeaponType};
use crate::state::{Stat, Team, Unit, UnitId};

fn passes(unit: &Unit, move_type: Option<MoveType>, weapon_type: Option<WeaponType>) -> bool {
    move_type.is_none_or(|move_type| unit.move_type == move_type)
        && weapon_type.is_none_or(|weapon_type| unit.weapon_type == weapon_type)
}

fn stat_filter(filter: Option<StatFilter>, owner: &Unit, other: &Unit) -> bool {
    filter.is_none_or(|filter| {
        filter.cmp.holds(
            owner.visible_stats()[filter.unit_stat] as i64,
            other.visible_stats()[filter.other_stat] as i64,
        )
    })
}

fn living<'s>(scope: &Scope<'s>, team: Team) -> impl Iterator<Item = &'s Unit> + 's {
    scope.state.team(team).iter().filter(|unit| unit.is_alive())
}

/// Foes with the extreme visible value of `stat`; ties all qualify.
fn foes_with_extreme(scope: &Scope<'_>, owner: &Unit, stat: Stat, highest: bool) -> Vec<UnitId> {
    let values: Vec<(UnitId, i32)> = living(scope, owner.team.opponent())
        .map(|foe| (foe.id, foe.visible_stats()[stat]))
        .collect();
    let best = if highest {
        values.iter().map(|&(_, value)| value).max()
    } else {
        values.iter().map(|&(_, value)| value).min()
    };
    match best {
        Some(best) => values
            .into_iter()
            .filter(|&(_, value)| value == best)
            .map(|(id, _)| id)
            .collect(),
        None => Vec::new(),
    }
}

/// Resolves `target` for the ability owner `owner` into unit ids.
///
/// Selectors that need a combat or an assist resolve to nothing outside of one.
pub fn resolve(target: &Target, owner: &Unit, scope: &Scope<'_>) -> Vec<UnitId> {
    let foe = scope.foe_of(owner.team);
    match target {
        Target::Unit => vec![owner.id],
        Target::AllyInCombat => scope
            .combatant(owner.team)
            .map(|ally| ally.id())
            .into_iter()
            .collect(),
        Target::Foe | Target::FoeInCombat => foe.map(|foe| foe.id()).into_iter().collect(),
        Target::FoePostCombat => foe
            .and_then(|foe| scope.state.unit(foe.id()))
            .filter(|foe| foe.is_alive())
            .map(|foe| foe.id)
            .into_iter()
            .collect(),
        Target::FoesWithinSpacesOfFoe { spaces } | Target::FoeAndFoesWithinSpacesOfFoe { spaces } => {
            let Some(foe) = foe else {
                return Vec::new();
            };
            let mut ids = Vec::new();
            if matches!(target, Target::FoeAndFoesWithinSpacesOfFoe { .. }) {
                ids.push(foe.id());
            }
            ids.extend(
                living(scope, foe.unit.team)
                    .filter(|other| {
                        other.id != foe.id() && other.position.distance(foe.unit.position) <= *spaces
                    })
                    .map(|other| other.id),
            );
            ids
        }
        Target::UnitAndAlliesWithin {
            spaces,
            move_type,
            weapon_type,
        }
        | Target::AlliesWithin {
            spaces,
            move_type,
            weapon_type,
        } => {
            let mut ids = Vec::new();
            if matches!(target, Target::UnitAndAlliesWithin { .. }) {
                ids.push(owner.id);
            }
            ids.extend(
                living(scope, owner.team)
                    .filter(|ally| {
                        ally.id != owner.id
                            && ally.position.distance(owner.position) <= *spaces
                            && passes(ally, *move_type, *weapon_type)
                    })
                    .map(|ally| ally.id),
            );
            ids
        }
        Target::FoesWithin { spaces } => living(scope, owner.team.opponent())
            .filter(|other| other.position.distance(owner.position) <= *spaces)
            .map(|other| other.id)
            .collect(),
        Target::FoesInCardinalDirections { filter } => living(scope, owner.team.opponent())
            .filter(|other| {
                other.position.shares_line_with(owner.position) && stat_filter(*filter, owner, other)
            })
            .map(|other| other.id)
            .collect(),
        Target::FoeWithHighestStat(stat) => foes_with_extreme(scope, owner, *stat, true),
        Target::FoeWithLowestStat(stat) => foes_with_extreme(scope, owner, *stat, false),
        Target::AssistUser => scope.assist.map(|assist| assist.user).into_iter().collect(),
        Target::AssistTarget => scope.assist.map(|assist| assist.target).into_iter().collect(),
        Target::AllAllies { move_type, filter } => living(scope, owner.team)
            .filter(|ally| {
                ally.id != owner.id && passes(ally, *move_type, None) && stat_filter(*filter, owner, ally)
            })
            .map(|ally| ally.id)
            .collect(),
        Target::AllFoes => living(scope, owner.team.opponent()).map(|other| other.id).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ability::StatFilter;
    use crate::effects::testing::{board, unit};

    #[test]
    fn extreme_stat_ties_all_qualify() {
        let owner = unit(Team::Blue, 0, 0, 5);
        let mut weak = unit(Team::Red, 2, 4, 0);
        weak.stats.def = 10;
        let state = board(
            vec![owner.clone()],
            vec![unit(Team::Red, 0, 0, 0), unit(Team::Red, 1, 2, 0), weak],
        );
        let scope = Scope::board(&state);

        let highest = resolve(&Target::FoeWithHighestStat(Stat::Def), &owner, &scope);
        assert_eq!(highest, vec![UnitId::for_slot(Team::Red, 0), UnitId::for_slot(Team::Red, 1)]);
        let lowest = resolve(&Target::FoeWithLowestStat(Stat::Def), &owner, &scope);
        assert_eq!(lowest, vec![UnitId::for_slot(Team::Red, 2)]);
    }

    #[test]
    fn cardinal_foes_share_a_line_and_pass_the_filter() {
        let owner = unit(Team::Blue, 0, 2, 2);
        let mut frail = unit(Team::Red, 0, 2, 5);
        frail.stats.atk = 30;
        let mut sturdy = unit(Team::Red, 1, 5, 2);
        sturdy.stats.atk = 50;
        let state = board(vec![owner.clone()], vec![frail, sturdy, unit(Team::Red, 2, 3, 3)]);
        let scope = Scope::board(&state);

        let lined = resolve(&Target::FoesInCardinalDirections { filter: None }, &owner, &scope);
        assert_eq!(lined, vec![UnitId::for_slot(Team::Red, 0), UnitId::for_slot(Team::Red, 1)]);

        let filter = Some(StatFilter::greater(Stat::Atk, Stat::Atk));
        let weaker = resolve(&Target::FoesInCardinalDirections { filter }, &owner, &scope);
        assert_eq!(weaker, vec![UnitId::for_slot(Team::Red, 0)]);
    }

    #[test]
    fn ally_areas_include_the_owner_only_when_asked() {
        let owner = unit(Team::Blue, 0, 2, 2);
        let near = unit(Team::Blue, 1, 2, 4);
        let mut fallen = unit(Team::Blue, 2, 3, 2);
        fallen.set_hp(0);
        let state = board(vec![owner.clone(), near, fallen], vec![unit(Team::Red, 0, 0, 0)]);
        let scope = Scope::board(&state);

        let allies = Target::AlliesWithin {
            spaces: 2,
            move_type: None,
            weapon_type: None,
        };
        let with_owner = Target::UnitAndAlliesWithin {
            spaces: 2,
            move_type: None,
            weapon_type: None,
        };
        assert_eq!(resolve(&allies, &owner, &scope), vec![UnitId::for_slot(Team::Blue, 1)]);
        assert_eq!(
            resolve(&with_owner, &owner, &scope),
            vec![owner.id, UnitId::for_slot(Team::Blue, 1)]
        );
    }

    #[test]
    fn combat_and_assist_selectors_need_their_context() {
        let owner = unit(Team::Blue, 0, 2, 2);
        let state = board(vec![owner.clone()], vec![unit(Team::Red, 0, 2, 1)]);
        let scope = Scope::board(&state);

        assert!(resolve(&Target::Foe, &owner, &scope).is_empty());
        assert!(resolve(&Target::FoesWithinSpacesOfFoe { spaces: 2 }, &owner, &scope).is_empty());
        assert!(resolve(&Target::AssistTarget, &owner, &scope).is_empty());
        assert_eq!(resolve(&Target::FoesWithin { spaces: 1 }, &owner, &scope).len(), 1);
    }
}
