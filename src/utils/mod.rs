//! Utility helpers: generational arena, Euler math, scoped logging timers.

pub mod allocator;
pub mod logging;
pub mod math;

pub use allocator::{Arena, EntityId, GenerationalId};
pub use math::*;
