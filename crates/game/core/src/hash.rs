//! Deterministic state hashing.
//!
//! The state root commits to the entire battle state — units, grid,
//! turn bookkeeping, and the RNG stream position — so two runs agree on a
//! root if and only if they agree on every observable bit of state. SHA-256
//! over bincode bytes keeps the value stable across host platforms.

#[cfg(feature = "serde")]
use sha2::{Digest, Sha256};

#[cfg(feature = "serde")]
use crate::state::BattleState;

/// Computes the 32-byte state root.
#[cfg(feature = "serde")]
pub fn state_root(state: &BattleState) -> [u8; 32] {
    let bytes = bincode::serialize(state).expect("BattleState serialization should not fail");
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    hasher.finalize().into()
}

/// State root rendered as lowercase hex, the form stored in replay logs.
#[cfg(feature = "serde")]
pub fn state_root_hex(state: &BattleState) -> String {
    hex::encode(state_root(state))
}

#[cfg(all(test, feature = "serde"))]
mod tests {
    use super::*;
    use crate::state::{
        Facing, GridState, Position, ResourceMeter, StatusEffects, TeamId, TerrainKind, UnitId,
        UnitState,
    };

    fn sample_state(seed: u64) -> BattleState {
        let grid = GridState::filled(4, 4, TerrainKind::Open);
        let units = vec![UnitState {
            id: UnitId(1),
            team: TeamId(0),
            position: Position::new(1, 1),
            height: 0,
            facing: Facing::North,
            hp: ResourceMeter::full(10),
            ap: ResourceMeter::full(6),
            initiative: 5,
            attack: 3,
            statuses: StatusEffects::empty(),
        }];
        BattleState::new(seed, grid, units).unwrap()
    }

    #[test]
    fn identical_states_hash_identically() {
        assert_eq!(state_root(&sample_state(7)), state_root(&sample_state(7)));
    }

    #[test]
    fn seed_changes_the_root() {
        assert_ne!(state_root(&sample_state(7)), state_root(&sample_state(8)));
    }

    #[test]
    fn hex_form() {
        let hex = state_root_hex(&sample_state(1));
        assert_eq!(hex.len(), 64);
        assert!(hex.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
