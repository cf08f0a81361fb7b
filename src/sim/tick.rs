//! Per-frame integration
//!
//! Variable timestep: the shell passes real elapsed seconds each animation
//! frame. Friction is applied per call, not per second.

use super::state::{Ball, Bounds, PhysicsConfig};

/// Advance every mobile ball by `dt` seconds, in collection order
pub fn advance(balls: &mut [Ball], dt: f32, config: &PhysicsConfig, bounds: Bounds) {
    // f32::max also maps NaN to 0
    let dt = dt.max(0.0);
    for ball in balls.iter_mut() {
        advance_ball(ball, dt, config, bounds);
    }
}

/// Integrate one ball and resolve wall/floor contact
///
/// There is no ceiling: a ball thrown above the canvas falls back in.
pub fn advance_ball(ball: &mut Ball, dt: f32, config: &PhysicsConfig, bounds: Bounds) {
    if ball.at_rest {
        return;
    }

    ball.vel.y += config.gravity * dt;
    ball.vel.x *= config.friction;
    ball.pos += ball.vel * dt;

    // Side walls
    if ball.pos.x - ball.radius < 0.0 {
        ball.pos.x = ball.radius;
        ball.vel.x *= -config.damping;
    } else if ball.pos.x + ball.radius > bounds.width {
        ball.pos.x = bounds.width - ball.radius;
        ball.vel.x *= -config.damping;
    }

    // Floor
    if ball.pos.y + ball.radius > bounds.height {
        ball.pos.y = bounds.height - ball.radius;
        ball.vel.y *= -config.damping;

        if ball.vel.x.abs() < config.rest_threshold && ball.vel.y.abs() < config.rest_threshold {
            ball.at_rest = true;
            ball.vel = glam::Vec2::ZERO;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgba;
    use glam::Vec2;
    use proptest::prelude::*;

    const DT: f32 = 0.016;
    const BOUNDS: Bounds = Bounds::new(800.0, 600.0);

    fn ball(x: f32, y: f32, vx: f32, vy: f32, radius: f32) -> Ball {
        Ball::new(1, Vec2::new(x, y), Vec2::new(vx, vy), radius, Rgba::WHITE)
    }

    #[test]
    fn test_free_fall_integration_order() {
        let config = PhysicsConfig::default();
        let mut b = ball(400.0, 100.0, 10.0, 0.0, 10.0);
        advance_ball(&mut b, DT, &config, BOUNDS);

        // Velocity is updated before position (semi-implicit Euler)
        let vy = config.gravity * DT;
        let vx = 10.0 * config.friction;
        assert!((b.vel.y - vy).abs() < 1e-4);
        assert!((b.vel.x - vx).abs() < 1e-4);
        assert!((b.pos.y - (100.0 + vy * DT)).abs() < 1e-4);
        assert!((b.pos.x - (400.0 + vx * DT)).abs() < 1e-4);
    }

    #[test]
    fn test_left_wall_bounce() {
        let config = PhysicsConfig::default();
        let mut b = ball(11.0, 100.0, -200.0, 0.0, 10.0);
        advance_ball(&mut b, DT, &config, BOUNDS);

        let before = 200.0 * config.friction;
        assert_eq!(b.pos.x, 10.0);
        assert!(b.vel.x > 0.0);
        assert!((b.vel.x - before * config.damping).abs() < 1e-3);
    }

    #[test]
    fn test_right_wall_bounce() {
        let config = PhysicsConfig::default();
        let mut b = ball(789.0, 100.0, 300.0, 0.0, 10.0);
        advance_ball(&mut b, DT, &config, BOUNDS);

        let before = 300.0 * config.friction;
        assert_eq!(b.pos.x, 790.0);
        assert!(b.vel.x < 0.0);
        assert!((b.vel.x.abs() - before * config.damping).abs() < 1e-3);
    }

    #[test]
    fn test_no_ceiling() {
        let config = PhysicsConfig::default();
        let mut b = ball(400.0, 5.0, 0.0, -500.0, 10.0);
        advance_ball(&mut b, DT, &config, BOUNDS);
        assert!(b.pos.y - b.radius < 0.0);
        assert!(b.vel.y < 0.0);
    }

    #[test]
    fn test_at_rest_ball_is_frozen() {
        let config = PhysicsConfig::default();
        let mut b = ball(400.0, 590.0, 0.0, 0.0, 10.0);
        b.at_rest = true;
        let before = b.clone();
        for _ in 0..10 {
            advance_ball(&mut b, DT, &config, BOUNDS);
        }
        assert_eq!(b, before);
    }

    #[test]
    fn test_negative_dt_is_ignored() {
        let config = PhysicsConfig::default();
        let mut balls = vec![ball(400.0, 100.0, 0.0, 0.0, 10.0)];
        advance(&mut balls, -1.0, &config, BOUNDS);
        assert_eq!(balls[0].pos, Vec2::new(400.0, 100.0));
        assert_eq!(balls[0].vel, Vec2::ZERO);
    }

    #[test]
    fn test_falling_ball_stays_on_floor_at_earth_gravity() {
        let config = PhysicsConfig::default();
        let mut b = ball(100.0, 0.0, 0.0, 0.0, 20.0);

        for _ in 0..2000 {
            advance_ball(&mut b, DT, &config, Bounds::new(800.0, 600.0));
            assert!(b.pos.y + b.radius <= 600.0);
        }

        // Each frame re-injects g*dt of downward speed, which stays above the
        // rest threshold after damping, so the ball sits clamped on the floor.
        assert_eq!(b.pos.y, 580.0);
        assert!(!b.at_rest);
    }

    #[test]
    fn test_ball_settles_under_low_gravity() {
        let config = PhysicsConfig {
            gravity: 5.0,
            ..Default::default()
        };
        let mut b = ball(100.0, 570.0, 0.0, 0.0, 20.0);

        let mut frames = 0;
        while !b.at_rest && frames < 20_000 {
            advance_ball(&mut b, DT, &config, BOUNDS);
            frames += 1;
        }

        assert!(b.at_rest, "ball never settled");
        assert_eq!(b.pos.y, 580.0);
        assert_eq!(b.vel, Vec2::ZERO);
    }

    #[test]
    fn test_fast_horizontal_ball_does_not_rest() {
        let config = PhysicsConfig::default();
        let mut b = ball(400.0, 589.9, 100.0, 0.0, 10.0);
        advance_ball(&mut b, DT, &config, BOUNDS);
        assert_eq!(b.pos.y, 590.0);
        assert!(!b.at_rest);
    }

    proptest! {
        #[test]
        fn prop_floor_and_walls_clamp(
            x in 0.0f32..800.0,
            y in -200.0f32..600.0,
            vx in -2000.0f32..2000.0,
            vy in -2000.0f32..2000.0,
            radius in 1.0f32..100.0,
            dt in 0.0f32..0.1,
        ) {
            let config = PhysicsConfig::default();
            let mut b = ball(x, y, vx, vy, radius);
            advance_ball(&mut b, dt, &config, BOUNDS);
            // Clamped positions are exact up to one rounding step
            let tol = 1e-3;
            prop_assert!(b.pos.y + b.radius <= BOUNDS.height + tol);
            if radius * 2.0 <= BOUNDS.width {
                prop_assert!(b.pos.x - b.radius >= -tol);
                prop_assert!(b.pos.x + b.radius <= BOUNDS.width + tol);
            }
        }

        #[test]
        fn prop_wall_bounce_damps_and_flips(
            vx in 10.0f32..2000.0,
            radius in 1.0f32..50.0,
        ) {
            let config = PhysicsConfig::default();
            // Start touching the right wall, heading into it
            let mut b = ball(BOUNDS.width - radius, 100.0, vx, 0.0, radius);
            advance_ball(&mut b, DT, &config, BOUNDS);
            let before = vx * config.friction;
            prop_assert!(b.vel.x < 0.0);
            prop_assert!((b.vel.x.abs() - config.damping * before).abs() <= before * 1e-5);
        }

        #[test]
        fn prop_rest_means_unchanged(
            x in 0.0f32..800.0,
            y in 0.0f32..600.0,
            dt in 0.0f32..1.0,
        ) {
            let config = PhysicsConfig::default();
            let mut b = ball(x, y, 0.0, 0.0, 10.0);
            b.at_rest = true;
            let before = b.clone();
            advance_ball(&mut b, dt, &config, BOUNDS);
            prop_assert_eq!(b, before);
        }
    }
}
