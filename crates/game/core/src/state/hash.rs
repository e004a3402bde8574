//! Zobrist-style content hash of the game state.
//!
//! Every hashed feature maps to a pseudo-random 64-bit key derived from the
//! configured seed, and the state hash is the XOR of the keys of all present
//! features. Keys are computed on demand with a keyed mixer instead of being
//! stored in tables, so two states built from the same seed always agree.

use super::{GameState, Stat, Unit};

#[derive(Clone, Copy)]
#[repr(u8)]
enum Feature {
    Position = 1,
    Hp,
    Special,
    HasAction,
    Buff,
    Debuff,
    Status,
    ActionsRemaining,
    EndedTurn,
    CurrentTurn,
    TurnCount,
    CaptureArea,
    Block,
    Score,
    GameOver,
    SwapPhase,
    CombatsInPhase,
    LastStartingTeam,
}

/// splitmix64 finaliser.
fn mix(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

fn key(seed: u64, feature: Feature, owner: u32, a: i64, b: i64) -> u64 {
    let mut h = mix(seed ^ feature as u64);
    h = mix(h ^ owner as u64);
    h = mix(h ^ a as u64);
    mix(h ^ b as u64)
}

/// FNV-1a over a status id, used as the status feature value.
fn status_code(id: &str) -> i64 {
    id.bytes()
        .fold(0xcbf2_9ce4_8422_2325u64, |h, byte| {
            (h ^ byte as u64).wrapping_mul(0x0000_0100_0000_01b3)
        }) as i64
}

fn hash_unit(seed: u64, unit: &Unit) -> u64 {
    let owner = unit.id.0;
    let mut h = key(
        seed,
        Feature::Position,
        owner,
        unit.position.x as i64,
        unit.position.y as i64,
    );
    h ^= key(seed, Feature::Hp, owner, unit.stats.hp as i64, 0);
    if let Some(special) = unit.special {
        h ^= key(seed, Feature::Special, owner, special.current as i64, 0);
    }
    if unit.has_action {
        h ^= key(seed, Feature::HasAction, owner, 0, 0);
    }
    if unit.combats_in_phase > 0 {
        h ^= key(seed, Feature::CombatsInPhase, owner, unit.combats_in_phase as i64, 0);
    }
    for stat in Stat::COMBAT {
        h ^= key(seed, Feature::Buff, owner, stat as i64, unit.buffs[stat] as i64);
        h ^= key(seed, Feature::Debuff, owner, stat as i64, unit.debuffs[stat] as i64);
    }
    for status in unit.statuses() {
        h ^= key(seed, Feature::Status, owner, status_code(status.as_str()), 0);
    }
    h
}

/// Computes the content hash of `state` for `seed`.
pub fn zobrist(state: &GameState, seed: u64) -> u64 {
    let mut h = 0u64;
    for unit in state.units() {
        h ^= hash_unit(seed, unit);
    }
    for block in &state.map.blocks {
        h ^= key(
            seed,
            Feature::Block,
            0,
            ((block.position.x as i64) << 16) | block.position.y as i64,
            block.hp as i64,
        );
    }
    if let Some(duel) = &state.duel {
        for (team, side) in duel.iter().enumerate() {
            let owner = team as u32;
            h ^= key(seed, Feature::ActionsRemaining, owner, side.actions_remaining as i64, 0);
            if side.ended_turn {
                h ^= key(seed, Feature::EndedTurn, owner, 0, 0);
            }
            h ^= key(
                seed,
                Feature::Score,
                owner,
                side.ko_score as i64,
                side.capture_score as i64,
            );
        }
        h ^= key(
            seed,
            Feature::LastStartingTeam,
            0,
            state.last_starting_team.index() as i64,
            0,
        );
        h ^= key(
            seed,
            Feature::CaptureArea,
            0,
            state.capture_area.x as i64,
            state.capture_area.y as i64,
        );
    }
    h ^= key(seed, Feature::CurrentTurn, 0, state.current_turn.index() as i64, 0);
    h ^= key(seed, Feature::TurnCount, 0, state.turn_count as i64, 0);
    if state.swap_phase {
        h ^= key(seed, Feature::SwapPhase, 0, 0, 0);
    }
    if state.game_over {
        h ^= key(seed, Feature::GameOver, 0, 0, 0);
    }
    h
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_depend_on_every_component() {
        let base = key(7, Feature::Hp, 101, 30, 0);
        assert_ne!(base, key(8, Feature::Hp, 101, 30, 0));
        assert_ne!(base, key(7, Feature::Special, 101, 30, 0));
        assert_ne!(base, key(7, Feature::Hp, 102, 30, 0));
        assert_ne!(base, key(7, Feature::Hp, 101, 29, 0));
        assert_eq!(base, key(7, Feature::Hp, 101, 30, 0));
    }

    #[test]
    fn status_codes_differ() {
        assert_ne!(status_code("GUARD"), status_code("PANIC"));
    }
}
