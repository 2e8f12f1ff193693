//! Recursive Monte Carlo radiance estimator.

use crate::{brdf, Color, HemisphereSampler, Scene, UniformHemisphere};
use lumen_math::Ray;
use rand::RngCore;

/// Default number of bounces before a path is cut off.
pub const MAX_DEPTH: u32 = 4;

/// Offset along the normal for bounce ray origins, avoids re-hitting the surface.
pub const EPSILON: f32 = 1e-3;

/// Path tracer with fixed-depth truncation.
///
/// Emission is only picked up when a bounce happens to land on an emissive
/// sphere; there is no light sampling and no environment light.
#[derive(Debug, Clone)]
pub struct PathIntegrator<S = UniformHemisphere> {
    max_depth: u32,
    sampler: S,
}

impl PathIntegrator {
    /// Create an integrator using uniform hemisphere sampling.
    pub fn new(max_depth: u32) -> Self {
        Self {
            max_depth,
            sampler: UniformHemisphere,
        }
    }
}

impl Default for PathIntegrator {
    fn default() -> Self {
        Self::new(MAX_DEPTH)
    }
}

impl<S: HemisphereSampler> PathIntegrator<S> {
    /// Swap the bounce direction sampler.
    pub fn with_sampler<T: HemisphereSampler>(self, sampler: T) -> PathIntegrator<T> {
        PathIntegrator {
            max_depth: self.max_depth,
            sampler,
        }
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    /// One radiance sample along a primary ray.
    pub fn estimate(&self, ray: &Ray, scene: &Scene, rng: &mut dyn RngCore) -> Color {
        self.radiance(ray, scene, 0, rng)
    }

    /// Radiance arriving along `ray`, for a path that has already bounced `depth` times.
    pub fn radiance(&self, ray: &Ray, scene: &Scene, depth: u32, rng: &mut dyn RngCore) -> Color {
        if depth >= self.max_depth {
            return Color::ZERO;
        }

        let hit = scene.closest_hit(ray);
        let Some(sphere) = hit.sphere().and_then(|index| scene.sphere(index)) else {
            // No sky: rays leaving the scene carry nothing
            return Color::ZERO;
        };

        let n = hit.normal();
        if !n.is_finite() {
            // Hit point at the sphere's center: no usable surface to bounce off
            return sphere.emission;
        }

        let l = self.sampler.sample(n, rng);
        let bounce = Ray::new(ray.at(hit.t()) + n * EPSILON, l);

        let incoming = self.radiance(&bounce, scene, depth + 1, rng);

        let v = (-ray.direction()).normalize();
        let brdf = brdf::evaluate(sphere, n, v, l);

        sphere.emission + brdf.weight() * incoming * n.dot(l)
    }
}
