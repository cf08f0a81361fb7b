//! Ball-ball collision response
//!
//! Penalty-style: overlapping balls are pushed apart along the line of centers,
//! then swap momentum along that line. There is no contact solver, so stacks
//! of balls settle by repeated per-frame correction.

use glam::Vec2;

use super::state::{Ball, PhysicsConfig};

/// Separate one overlapping pair and exchange velocity along the contact normal
///
/// Returns `true` if the balls overlapped. Non-overlapping pairs (including
/// exactly touching ones) and pairs with a non-finite distance are left
/// untouched.
///
/// The overlap is split by squared radius: the bigger ball moves less. The
/// velocity exchange uses `config.mass_model` for its mass proxy and is
/// computed from the offset before the positional correction.
pub fn resolve_pair_collision(a: &mut Ball, b: &mut Ball, config: &PhysicsConfig) -> bool {
    let offset = b.pos - a.pos;
    let distance = offset.length();
    let min_dist = a.radius + b.radius;

    // A NaN distance (non-finite neighbour) must not count as overlap
    if distance.is_nan() || distance >= min_dist {
        return false;
    }

    let overlap = min_dist - distance;
    let area_a = a.radius * a.radius;
    let area_b = b.radius * b.radius;
    let total_area = area_a + area_b;

    if distance <= config.coincident_epsilon {
        // No line of centers: separate along +x and skip the exchange, which
        // would divide by zero
        let normal = Vec2::X;
        a.pos -= normal * overlap * (area_b / total_area);
        b.pos += normal * overlap * (area_a / total_area);
        return true;
    }

    let normal = offset / distance;
    a.pos -= normal * overlap * (area_b / total_area);
    b.pos += normal * overlap * (area_a / total_area);

    let mass_a = config.mass_model.mass(a.radius);
    let mass_b = config.mass_model.mass(b.radius);
    let total_mass = mass_a + mass_b;

    // Relative velocity projected on the (unnormalized) offset
    let scale = offset.dot(a.vel - b.vel) / (distance * distance);
    let exchange = offset * scale;

    a.vel -= exchange * (2.0 * mass_b / total_mass);
    b.vel += exchange * (2.0 * mass_a / total_mass);

    true
}

/// Resolve every pair `i < j` in increasing index order
///
/// O(n²). Returns how many pairs were in contact.
pub fn resolve_all_collisions(balls: &mut [Ball], config: &PhysicsConfig) -> usize {
    let n = balls.len();
    let mut contacts = 0;
    for i in 0..n {
        for j in (i + 1)..n {
            let (head, tail) = balls.split_at_mut(j);
            if resolve_pair_collision(&mut head[i], &mut tail[0], config) {
                contacts += 1;
            }
        }
    }
    contacts
}
