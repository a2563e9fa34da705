//! Collision detection: pairwise narrow-phase tests and their results.

pub mod contact;
pub mod narrowphase;

pub use contact::CollisionResult;
pub use narrowphase::{NarrowPhase, SATAlgorithm};
