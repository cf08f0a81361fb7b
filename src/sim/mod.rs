//! Deterministic physics kernel
//!
//! Everything that moves balls lives here. This module must stay pure:
//! - Seeded RNG only
//! - Stable iteration order (insertion order)
//! - No DOM, rendering, or platform dependencies

pub mod clock;
pub mod collision;
pub mod paint;
pub mod state;
pub mod tick;

pub use clock::{FrameClock, LoopState};
pub use collision::{resolve_all_collisions, resolve_pair_collision};
pub use paint::Painter;
pub use state::{Ball, Bounds, ClickOutcome, MassModel, PhysicsConfig, World};
pub use tick::{advance, advance_ball};
