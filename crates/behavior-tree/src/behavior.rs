//! Core behavior trait.
//!
//! This module defines the [`Behavior`] trait, the contract implemented by
//! leaf vocabularies. The trait is generic over a context type `C`, allowing
//! leaves to read world state and record decisions (e.g., a chosen command).

use crate::Status;

/// A behavior leaf that can be evaluated against a context.
///
/// Composites ([`Selector`/`Sequence`/decorators][crate::Node]) are structural
/// variants of the tree arena; only leaves carry domain logic, so this trait
/// is implemented once, on the leaf vocabulary type.
pub trait Behavior<C> {
    /// Evaluate this leaf against the given context.
    ///
    /// # Arguments
    ///
    /// * `ctx` - Mutable reference to the context/blackboard. Leaves can read
    ///   world state and store intermediate results (e.g., the command they
    ///   decided on).
    ///
    /// # Returns
    ///
    /// - `Status::Success` if the behavior succeeded
    /// - `Status::Failure` if the behavior failed
    fn tick(&self, ctx: &mut C) -> Status;
}
