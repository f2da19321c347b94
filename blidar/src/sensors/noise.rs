//! The sensor noise model: uniform jitter on the range of each beam before it is cast, and
//! independent per-axis uniform jitter on the resulting points.

use super::Noise3;
use crate::Point3;
use rand::Rng;

/// Number of independent jitter draws applied to a point from a real intersection. Two draws
/// are summed on each axis, so a hit point can move by up to twice the axis magnitude. This
/// reproduces the output of the editor add-on the scanner models.
pub const HIT_JITTER_PASSES: usize = 2;

/// Number of jitter draws applied to a synthetic max-range point from a proxy sensor.
pub const MISS_JITTER_PASSES: usize = 1;

fn uniform<R: Rng + ?Sized>(m: f64, rng: &mut R) -> f64 {
    if m > 0.0 {
        rng.random_range(-m..=m)
    } else {
        0.0
    }
}

/// Jitter the maximum range used for a single beam's cast by a uniform offset in `[-m, m]`,
/// where `m` is the largest of the three noise magnitudes. The result is never negative.
pub fn jitter_range<R: Rng + ?Sized>(nominal: f64, noise: &Noise3, rng: &mut R) -> f64 {
    (nominal + uniform(noise.max_component(), rng)).max(0.0)
}

/// Jitter a point once, drawing an independent uniform offset in `[-noise.axis, noise.axis]`
/// for each axis in the order x, y, z.
pub fn jitter_point<R: Rng + ?Sized>(point: &Point3, noise: &Noise3, rng: &mut R) -> Point3 {
    Point3::new(
        point.x + uniform(noise.x, rng),
        point.y + uniform(noise.y, rng),
        point.z + uniform(noise.z, rng),
    )
}

/// Apply `jitter_point` `passes` times in succession.
pub fn jitter_point_n<R: Rng + ?Sized>(
    point: &Point3,
    noise: &Noise3,
    passes: usize,
    rng: &mut R,
) -> Point3 {
    (0..passes).fold(*point, |p, _| jitter_point(&p, noise, rng))
}
