//! Status effect system for units.
//!
//! Status effects are temporary conditions ticked once per owner turn-end,
//! strictly before action-point regeneration, in insertion order.
//!
//! # Turn-based Duration
//!
//! Effects store the number of owner turn-ends remaining. An effect applied
//! with duration N survives exactly N of its owner's turn-ends and emits
//! `StatusExpired` on the Nth.

use arrayvec::ArrayVec;

use crate::config::BattleConfig;

/// Active status effects on a unit, in application order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffects {
    effects: ArrayVec<StatusEffect, { BattleConfig::MAX_STATUS_EFFECTS }>,
}

/// A single status effect instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffect {
    pub kind: StatusKind,
    /// Owner turn-ends remaining before expiry.
    pub duration: u8,
    /// Kind-specific strength: poison damage per tick, AP regen reduction.
    pub magnitude: u8,
}

/// Types of status effects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StatusKind {
    /// Flat damage at each owner turn-end, independent of combat.
    Poison,

    /// Reduces action points regenerated per turn.
    Slow,
}

impl StatusEffects {
    /// Creates an empty status effect set.
    pub fn empty() -> Self {
        Self {
            effects: ArrayVec::new(),
        }
    }

    /// Checks whether an effect of the given kind is active.
    pub fn has(&self, kind: StatusKind) -> bool {
        self.effects.iter().any(|e| e.kind == kind)
    }

    /// Returns `true` if a new effect of `kind` could be recorded.
    pub fn can_apply(&self, kind: StatusKind) -> bool {
        self.has(kind) || !self.effects.is_full()
    }

    /// Records a status effect.
    ///
    /// A repeat application of an already-active kind refreshes it in place:
    /// duration and magnitude each take the larger of old and new, and the
    /// effect keeps its original slot in the tick order.
    ///
    /// Returns `false` if the list is full and the kind was not present.
    pub fn apply(&mut self, effect: StatusEffect) -> bool {
        if let Some(existing) = self.effects.iter_mut().find(|e| e.kind == effect.kind) {
            existing.duration = existing.duration.max(effect.duration);
            existing.magnitude = existing.magnitude.max(effect.magnitude);
            return true;
        }

        self.effects.try_push(effect).is_ok()
    }

    /// Removes an effect immediately, regardless of remaining duration.
    pub fn remove(&mut self, kind: StatusKind) {
        self.effects.retain(|e| e.kind != kind);
    }

    /// Decrements every duration by one turn-end and removes the effects
    /// that reach zero, returning the expired kinds in tick order.
    pub fn tick_down(&mut self) -> Vec<StatusKind> {
        let mut expired = Vec::new();
        for effect in self.effects.iter_mut() {
            effect.duration = effect.duration.saturating_sub(1);
            if effect.duration == 0 {
                expired.push(effect.kind);
            }
        }
        self.effects.retain(|e| e.duration > 0);
        expired
    }

    /// Summed magnitude of active effects of the given kind.
    pub fn total_magnitude(&self, kind: StatusKind) -> u32 {
        self.effects
            .iter()
            .filter(|e| e.kind == kind)
            .map(|e| e.magnitude as u32)
            .sum()
    }

    /// Returns an iterator over active effects in application order.
    pub fn iter(&self) -> impl Iterator<Item = &StatusEffect> {
        self.effects.iter()
    }

    /// Returns `true` if no status effects are active.
    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}
