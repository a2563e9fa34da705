//! Simulation dynamics: per-body integration and impulse-based collision response.

pub mod integrator;
pub mod solver;

pub use integrator::Integrator;
pub use solver::CollisionSolver;
