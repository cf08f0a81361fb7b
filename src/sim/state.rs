//! Ball field state and core simulation types
//!
//! The `World` owns every ball plus the physics constants. The shell mutates it
//! from the frame callback and from click handlers, never concurrently.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::resolve_all_collisions;
use super::paint::Painter;
use super::tick::advance;
use crate::color::Rgba;
use crate::consts::*;

/// A ball entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub id: u32,
    pub pos: Vec2,
    /// Pixels per second
    pub vel: Vec2,
    /// Fixed at creation
    pub radius: f32,
    pub color: Rgba,
    /// Frozen on the floor; integration is skipped from then on
    pub at_rest: bool,
}

impl Ball {
    pub fn new(id: u32, pos: Vec2, vel: Vec2, radius: f32, color: Rgba) -> Self {
        Self {
            id,
            pos,
            vel,
            radius,
            color,
            at_rest: false,
        }
    }

    /// Inclusive point-in-circle test (a click exactly on the rim hits)
    #[inline]
    pub fn contains_point(&self, p: Vec2) -> bool {
        (p - self.pos).length_squared() <= self.radius * self.radius
    }
}

/// Which power of the radius stands in for mass in the velocity exchange
///
/// The positional correction always splits the overlap by squared radius.
/// `AsObserved` exchanges velocity with linear radius, which is how the toy has
/// always behaved; `Area` uses squared radius in both places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MassModel {
    #[default]
    AsObserved,
    Area,
}

impl MassModel {
    #[inline]
    pub fn mass(self, radius: f32) -> f32 {
        match self {
            MassModel::AsObserved => radius,
            MassModel::Area => radius * radius,
        }
    }
}

/// Physics constants owned by the kernel
///
/// Missing fields take their defaults when read from JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Downward acceleration (pixels/s²), adjustable at runtime
    pub gravity: f32,
    /// Restitution on wall/floor bounce
    pub damping: f32,
    /// Per-frame multiplier on horizontal velocity
    pub friction: f32,
    /// Floor-contact speed under which a ball freezes
    pub rest_threshold: f32,
    /// Spawn vx is drawn from [-spawn_speed, spawn_speed)
    pub spawn_speed: f32,
    pub mass_model: MassModel,
    /// Center distance at or below which two balls count as coincident
    pub coincident_epsilon: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: DEFAULT_GRAVITY,
            damping: DEFAULT_DAMPING,
            friction: DEFAULT_FRICTION,
            rest_threshold: DEFAULT_REST_THRESHOLD,
            spawn_speed: DEFAULT_SPAWN_SPEED,
            mass_model: MassModel::AsObserved,
            coincident_epsilon: COINCIDENT_EPSILON,
        }
    }
}

/// Canvas size in CSS pixels; origin top-left, y grows downward
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// What a click did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    Created { id: u32 },
    Removed { id: u32 },
    /// Non-finite click position; nothing changed
    Ignored,
}

/// The physics kernel: every live ball plus the constants that move them
#[derive(Debug, Clone)]
pub struct World {
    pub config: PhysicsConfig,
    bounds: Bounds,
    /// Insertion order is draw order and collision order
    balls: Vec<Ball>,
    rng: Pcg32,
    next_id: u32,
}

impl World {
    /// Create an empty world with default physics
    pub fn new(seed: u64, bounds: Bounds) -> Self {
        Self::with_config(seed, bounds, PhysicsConfig::default())
    }

    pub fn with_config(seed: u64, bounds: Bounds, config: PhysicsConfig) -> Self {
        Self {
            config,
            bounds,
            balls: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    #[inline]
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Canvas size is re-read by the shell every frame
    pub fn set_bounds(&mut self, bounds: Bounds) {
        self.bounds = bounds;
    }

    pub fn set_gravity(&mut self, gravity: f32) {
        self.config.gravity = gravity;
    }

    #[inline]
    pub fn balls(&self) -> &[Ball] {
        &self.balls
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.balls.len()
    }

    /// Remove every ball
    pub fn clear(&mut self) {
        log::info!("Cleared {} balls", self.balls.len());
        self.balls.clear();
    }

    /// Index of the ball under `p`, searching most recently created first
    ///
    /// Overlapping balls resolve to the topmost one, which is the one drawn last.
    pub fn hit_test(&self, p: Vec2) -> Option<usize> {
        self.balls.iter().rposition(|ball| ball.contains_point(p))
    }

    /// Click handler: delete the ball under the pointer, or spawn a new one there
    pub fn spawn_or_remove(&mut self, px: f32, py: f32, radius: f32, color: Rgba) -> ClickOutcome {
        let p = Vec2::new(px, py);
        if let Some(index) = self.hit_test(p) {
            let ball = self.balls.remove(index);
            log::debug!("Removed ball {} ({} left)", ball.id, self.balls.len());
            return ClickOutcome::Removed { id: ball.id };
        }

        match self.spawn(p, radius, color) {
            Some(id) => ClickOutcome::Created { id },
            None => ClickOutcome::Ignored,
        }
    }

    /// Append a ball at `pos` with a random horizontal kick, returning its id
    ///
    /// A non-finite position would poison every ball it collides with, so it
    /// is refused.
    pub fn spawn(&mut self, pos: Vec2, radius: f32, color: Rgba) -> Option<u32> {
        if !pos.is_finite() {
            log::warn!("Refusing to spawn a ball at non-finite position {:?}", pos);
            return None;
        }

        let radius = if radius.is_finite() && radius > 0.0 {
            radius
        } else {
            log::warn!("Invalid ball radius {}, using {}", radius, MIN_BALL_RADIUS);
            MIN_BALL_RADIUS
        };

        let speed = self.config.spawn_speed;
        let vx = if speed > 0.0 {
            self.rng.random_range(-speed..speed)
        } else {
            0.0
        };

        let id = self.next_id;
        self.next_id += 1;
        self.balls
            .push(Ball::new(id, pos, Vec2::new(vx, 0.0), radius, color));
        log::debug!("Spawned ball {} at ({:.0}, {:.0}) r={}", id, pos.x, pos.y, radius);
        Some(id)
    }

    /// Integrate every mobile ball by `dt` seconds
    pub fn advance(&mut self, dt: f32) {
        advance(&mut self.balls, dt, &self.config, self.bounds);
    }

    /// Resolve every overlapping pair, returning the number of contacts
    pub fn resolve_all_collisions(&mut self) -> usize {
        resolve_all_collisions(&mut self.balls, &self.config)
    }

    /// One frame of physics: integrate, then separate overlaps
    pub fn step(&mut self, dt: f32) -> usize {
        self.advance(dt);
        self.resolve_all_collisions()
    }

    /// Hand every ball to `painter` in draw order
    pub fn draw_all<P: Painter + ?Sized>(&self, painter: &mut P) {
        for ball in &self.balls {
            painter.fill_circle(ball.pos, ball.radius, ball.color);
        }
    }
}
