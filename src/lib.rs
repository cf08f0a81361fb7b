//! Ball Drop - click to spawn bouncing balls
//!
//! Core modules:
//! - `sim`: Deterministic physics kernel (integration, collisions, click handling)
//! - `renderer`: WebGPU triangle pipeline plus a Canvas 2D fallback
//! - `settings`: User controls persisted to LocalStorage
//! - `color`: Picker color parsing

pub mod color;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use color::Rgba;
pub use settings::Settings;

/// Physics and shell defaults
pub mod consts {
    /// Earth gravity in pixels/s² (9.81 m/s² at 100 px per meter)
    pub const DEFAULT_GRAVITY: f32 = 981.0;
    /// Restitution applied to the velocity component normal to a wall
    pub const DEFAULT_DAMPING: f32 = 0.75;
    /// Per-frame horizontal velocity decay
    pub const DEFAULT_FRICTION: f32 = 0.99;
    /// Speed (px/s) under which a ball touching the floor freezes
    pub const DEFAULT_REST_THRESHOLD: f32 = 0.1;
    /// Spawned balls get a horizontal speed in [-SPAWN_SPEED, SPAWN_SPEED)
    pub const DEFAULT_SPAWN_SPEED: f32 = 50.0;
    /// Centers closer than this are treated as coincident
    pub const COINCIDENT_EPSILON: f32 = 1e-6;

    /// Smallest radius a ball may be created with
    pub const MIN_BALL_RADIUS: f32 = 1.0;
    /// Largest radius the size slider allows
    pub const MAX_BALL_RADIUS: f32 = 200.0;
    pub const DEFAULT_BALL_RADIUS: f32 = 20.0;
    /// Gravity slider upper bound (px/s²)
    pub const MAX_GRAVITY: f32 = 5000.0;

    /// Largest frame delta fed to the kernel (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;
}
