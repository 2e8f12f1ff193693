//! Bounce direction sampling.

use lumen_math::Vec3;
use rand::{Rng, RngCore};

/// Produces unit bounce directions in the hemisphere around a normal.
pub trait HemisphereSampler: Send + Sync {
    /// Sample a unit direction `d` with `d · normal >= 0`.
    fn sample(&self, normal: Vec3, rng: &mut dyn RngCore) -> Vec3;
}

/// Rejection attempts before giving up on a sample.
///
/// Each attempt is accepted with probability π/12, so a valid normal
/// practically never gets here.
const MAX_ATTEMPTS: u32 = 256;

/// Uniform hemisphere sampling by rejection.
///
/// Not cosine weighted, and the integrator applies no PDF correction for it.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformHemisphere;

impl HemisphereSampler for UniformHemisphere {
    /// Falls back to returning `normal` itself when no draw is accepted,
    /// which only happens for a degenerate (non-finite or zero) normal.
    fn sample(&self, normal: Vec3, rng: &mut dyn RngCore) -> Vec3 {
        for _ in 0..MAX_ATTEMPTS {
            let v = Vec3::new(
                rng.gen_range(-1.0..=1.0),
                rng.gen_range(-1.0..=1.0),
                rng.gen_range(-1.0..=1.0),
            );
            // Keep only the unit ball so the accepted directions are uniform
            let len_sq = v.length_squared();
            if len_sq > 1e-6 && len_sq <= 1.0 && normal.dot(v) >= 0.0 {
                return v / len_sq.sqrt();
            }
        }
        normal
    }
}
