//! Structural rules for incoming diff trees.

pub mod invariants;
pub mod validation;
