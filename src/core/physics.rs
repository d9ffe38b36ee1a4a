//! Geometry and physics kernel: contact-time prediction, bounded linear
//! motion, and elastic collision resolution for equal-mass hard disks.

use crate::core::{Particle, Vec2, EPS};
use crate::error::{Error, Result};

/// Sentinel returned when a pair has no admissible future contact.
pub const NO_CONTACT: f64 = -2.0;

/// Time until the two disks touch, relative to now.
///
/// Already-overlapping disks (within tolerance) contact at time zero. With
/// `A = Δv·Δv`, `B = Δv·Δc`, `C = |Δc|² - (2r)²`, a non-positive discriminant
/// `B² - A·C` means the disks never meet and yields [`NO_CONTACT`]. Otherwise
/// the smaller quadratic root is the answer when it lies in the future; when
/// it is already behind us the pair is separating and the larger root, the
/// only remaining crossing of the contact distance, is returned instead. That
/// selection rule keeps a grazing, separating pair from being reported as an
/// immediate collision.
pub fn time_to_pair_contact(a: &Particle, b: &Particle) -> f64 {
    let dv = a.velocity - b.velocity;
    let dc = a.center - b.center;
    let dist_sq = dc.length_squared();
    let touch_sq = 4.0 * a.radius * a.radius;
    if dist_sq + EPS < touch_sq {
        return 0.0;
    }

    let b_val = dv.dot(dc);
    let a_val = dv.length_squared();
    let delta = b_val * b_val - a_val * (dist_sq - touch_sq);

    if delta <= EPS {
        return NO_CONTACT;
    }
    let sqrt_delta = delta.sqrt();
    let first = (-b_val - sqrt_delta) / a_val;
    let second = (-b_val + sqrt_delta) / a_val;
    if first >= EPS {
        first
    } else {
        second
    }
}

/// Time until the disk touches any wall of the square box `[0, box_len]²`,
/// relative to now. A stationary axis contributes no wall; a disk stationary
/// on both axes never reaches one and the result is `f64::MAX`.
pub fn time_to_wall_contact(p: &Particle, box_len: f64) -> f64 {
    let r = p.radius;

    let x_time = if p.velocity.x > EPS {
        (box_len - r - p.center.x).abs() / p.velocity.x
    } else if p.velocity.x <= -EPS {
        ((p.center.x - r) / p.velocity.x).abs()
    } else {
        f64::MAX
    };

    let y_time = if p.velocity.y > EPS {
        (box_len - r - p.center.y).abs() / p.velocity.y
    } else if p.velocity.y <= -EPS {
        ((p.center.y - r) / p.velocity.y).abs()
    } else {
        f64::MAX
    };

    if x_time > y_time + EPS {
        y_time
    } else {
        x_time
    }
}

/// Move the disk linearly for `dt`, snapping any coordinate that would cross
/// a boundary (within tolerance) exactly onto it. Contact times are only
/// accurate to `EPS`, and the clamp keeps that slack from accumulating into a
/// center outside `[radius, box_len - radius]`.
pub fn advance(p: &mut Particle, dt: f64, box_len: f64) {
    let r = p.radius;

    let mut nx = p.center.x + p.velocity.x * dt;
    if nx >= box_len - r + EPS {
        nx = box_len - r;
    } else if nx + EPS <= r {
        nx = r;
    }

    let mut ny = p.center.y + p.velocity.y * dt;
    if ny >= box_len - r + EPS {
        ny = box_len - r;
    } else if ny + EPS <= r {
        ny = r;
    }

    p.center = Vec2::new(nx, ny);
}

/// Elastic collision of two equal-mass disks in contact: the velocity
/// components along the center line are exchanged, the tangential components
/// are kept. Increments both pair counters.
///
/// Errors with `Error::Numeric` if the centers nearly coincide and no contact
/// normal can be formed.
pub fn resolve_pair_collision(a: &mut Particle, b: &mut Particle) -> Result<()> {
    let offset = a.center - b.center;
    let dist = offset.length();
    if dist <= EPS {
        return Err(Error::Numeric(
            "degenerate contact normal between coincident disks".into(),
        ));
    }
    let un = offset * (1.0 / dist);
    let ut = un.perp();

    let v1n = un.dot(a.velocity);
    let v1t = ut.dot(a.velocity);
    let v2n = un.dot(b.velocity);
    let v2t = ut.dot(b.velocity);

    a.velocity = un * v2n + ut * v1t;
    b.velocity = un * v1n + ut * v2t;

    a.pair_collisions += 1;
    b.pair_collisions += 1;
    Ok(())
}

/// Reflect a disk that is touching one or two walls, flipping the velocity
/// component for each touched axis. A corner hit flips both components but
/// still counts as a single wall collision.
pub fn resolve_wall_collision(p: &mut Particle, box_len: f64) {
    if touches_x_wall(p, box_len) {
        p.velocity.x = -p.velocity.x;
    }
    if touches_y_wall(p, box_len) {
        p.velocity.y = -p.velocity.y;
    }
    p.wall_collisions += 1;
}

#[inline]
fn touches_x_wall(p: &Particle, box_len: f64) -> bool {
    (p.center.x - p.radius).abs() <= EPS || (box_len - p.center.x - p.radius).abs() <= EPS
}

#[inline]
fn touches_y_wall(p: &Particle, box_len: f64) -> bool {
    (p.center.y - p.radius).abs() <= EPS || (box_len - p.center.y - p.radius).abs() <= EPS
}
