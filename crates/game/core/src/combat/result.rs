//! Combat result types.

use super::combatant::Combatant;
use crate::state::UnitId;

/// One entry of the attack sequence.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Hit {
    pub attacker: UnitId,
    pub defender: UnitId,
    pub damage: i32,
    /// HP the attacker actually recovered from this hit.
    pub healing: i32,
    pub attacker_special: bool,
    /// Defensive special or Miracle triggered on the defender.
    pub defender_special: bool,
    /// Special counters after the hit, `None` without a special.
    pub attacker_charge: Option<i32>,
    pub defender_charge: Option<i32>,
    pub attacker_hp: i32,
    /// Defender HP after the hit. For area hits on bystanders this is the
    /// HP the engine will leave them with.
    pub defender_hp: i32,
    /// Area-of-effect damage dealt before the first blow.
    pub aoe: bool,
}

/// Outcome of one engagement: final combat copies (attacker first) and the
/// ordered hit sequence.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatResult {
    pub units: [Combatant; 2],
    pub sequence: Vec<Hit>,
    pub complete: bool,
}

impl CombatResult {
    pub fn attacker(&self) -> &Combatant {
        &self.units[0]
    }

    pub fn defender(&self) -> &Combatant {
        &self.units[1]
    }

    pub fn combatant(&self, id: UnitId) -> Option<&Combatant> {
        self.units.iter().find(|c| c.id() == id)
    }

    /// Regular blows, excluding area damage.
    pub fn blows(&self) -> impl Iterator<Item = &Hit> {
        self.sequence.iter().filter(|hit| !hit.aoe)
    }

    /// Area damage entries, in shape order.
    pub fn aoe_hits(&self) -> impl Iterator<Item = &Hit> {
        self.sequence.iter().filter(|hit| hit.aoe)
    }

    /// Total damage `id` dealt with regular blows.
    pub fn damage_dealt(&self, id: UnitId) -> i32 {
        self.blows()
            .filter(|hit| hit.attacker == id)
            .map(|hit| hit.damage)
            .sum()
    }

    /// Whether `id` landed at least one blow.
    pub fn attacked(&self, id: UnitId) -> bool {
        self.blows().any(|hit| hit.attacker == id)
    }

    /// Combatants left with no HP.
    pub fn defeated(&self) -> impl Iterator<Item = &Combatant> {
        self.units.iter().filter(|c| !c.is_alive())
    }
}
