//! Cook-Torrance microfacet BRDF.
//!
//! Splits reflected light into a Lambertian diffuse lobe and a specular lobe
//! built from the GGX normal distribution, Schlick-GGX shadowing and the
//! Schlick Fresnel approximation. The result is only a weight applied to
//! gathered incoming radiance; lights are never sampled directly.

use crate::{Color, Sphere};
use lumen_math::{Vec3, Vec4};
use std::f32::consts::PI;

/// Normal distribution term `D(n, h, α)`.
pub fn distribution(n: Vec3, h: Vec3, roughness: f32) -> f32 {
    let a2 = roughness * roughness;
    let n_dot_h = n.dot(h);
    let denom = PI * (n_dot_h * n_dot_h * (a2 - 1.0) + 1.0).powi(2);
    a2 / denom
}

/// Single-direction Schlick-GGX shadowing term.
pub fn geometry_partial(n: Vec3, x: Vec3, k: f32) -> f32 {
    let n_dot_x = n.dot(x);
    n_dot_x / (n_dot_x * (1.0 - k) + k)
}

/// Smith shadowing-masking term for view and light directions.
pub fn geometry(n: Vec3, v: Vec3, l: Vec3, roughness: f32) -> f32 {
    let k = roughness * roughness / 2.0;
    geometry_partial(n, v, k) * geometry_partial(n, l, k)
}

/// Schlick Fresnel approximation, per color channel.
pub fn fresnel(h: Vec3, v: Vec3, f0: Color) -> Color {
    f0 + (Vec4::ONE - f0) * (1.0 - h.dot(v)).powi(5)
}

/// BRDF terms evaluated for one pair of directions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrdfSample {
    /// Diffuse weight after removing specular energy
    pub kd: Color,
    /// Lambertian diffuse term, albedo / π
    pub diffuse: Color,
    /// Cook-Torrance specular term
    pub specular: Color,
}

impl BrdfSample {
    /// Total reflectance, `kd * diffuse + specular`.
    #[inline]
    pub fn weight(&self) -> Color {
        self.kd * self.diffuse + self.specular
    }
}

/// Evaluate the BRDF of a sphere's surface.
///
/// `n` is the surface normal, `v` points toward the viewer and `l` toward
/// the incoming light; all three are expected to be normalized.
pub fn evaluate(sphere: &Sphere, n: Vec3, v: Vec3, l: Vec3) -> BrdfSample {
    let h = (v + l).normalize();
    let roughness = sphere.roughness;
    let metallic = sphere.metallic;

    // Metals tint their specular reflection with the albedo
    let f0 = sphere.f0.lerp(sphere.color, metallic);

    let dfg = distribution(n, h, roughness) * fresnel(h, v, f0) * geometry(n, v, l, roughness);
    let specular = dfg / (4.0 * v.dot(n) * l.dot(n));
    let kd = (Vec4::ONE - specular) * (1.0 - metallic);

    BrdfSample {
        kd,
        diffuse: sphere.color / PI,
        specular,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distribution_peaks_at_normal() {
        let n = Vec3::Y;
        let aligned = distribution(n, n, 0.3);
        let tilted = distribution(n, Vec3::new(0.5, 1.0, 0.0).normalize(), 0.3);

        assert!(aligned > tilted);
        // At n == h the denominator is π α⁴
        assert!((aligned - 1.0 / (PI * 0.09)).abs() < 1e-3);
    }

    #[test]
    fn test_distribution_rough_surface_is_flat() {
        // α = 1 gives a uniform 1/π distribution
        let n = Vec3::Z;
        let h = Vec3::new(0.3, 0.0, 1.0).normalize();
        assert!((distribution(n, h, 1.0) - 1.0 / PI).abs() < 1e-6);
    }

    #[test]
    fn test_geometry_partial_bounds() {
        let n = Vec3::Y;
        let k = 0.5 * 0.5 / 2.0;
        for x in [Vec3::Y, Vec3::new(1.0, 1.0, 0.0).normalize(), Vec3::new(1.0, 0.1, 0.0).normalize()] {
            let g = geometry_partial(n, x, k);
            assert!(g > 0.0 && g <= 1.0 + 1e-6, "g = {}", g);
        }
        assert!((geometry_partial(n, n, k) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_fresnel_at_normal_incidence_is_f0() {
        let f0 = Vec4::new(0.04, 0.05, 0.06, 1.0);
        let f = fresnel(Vec3::Y, Vec3::Y, f0);
        assert!((f - f0).length() < 1e-6);
    }

    #[test]
    fn test_fresnel_at_grazing_is_one() {
        let f = fresnel(Vec3::Y, Vec3::X, Vec4::splat(0.04));
        assert!((f - Vec4::ONE).length() < 1e-6);
    }

    #[test]
    fn test_metal_has_no_diffuse() {
        let sphere = Sphere::new(Vec3::ZERO, 1.0)
            .with_color(Vec4::new(1.0, 0.8, 0.2, 1.0))
            .with_surface(0.3, 1.0);
        let n = Vec3::Y;
        let v = Vec3::new(0.2, 1.0, 0.0).normalize();
        let l = Vec3::new(-0.4, 1.0, 0.1).normalize();

        let brdf = evaluate(&sphere, n, v, l);
        assert_eq!(brdf.kd, Vec4::ZERO);
        assert_eq!(brdf.weight(), brdf.specular);
    }

    #[test]
    fn test_metal_specular_is_tinted() {
        let sphere = Sphere::new(Vec3::ZERO, 1.0)
            .with_color(Vec4::new(1.0, 0.0, 0.0, 1.0))
            .with_surface(0.5, 1.0);
        let n = Vec3::Y;

        let brdf = evaluate(&sphere, n, n, n);
        assert!(brdf.specular.x > brdf.specular.y);
    }

    #[test]
    fn test_dielectric_split() {
        let sphere = Sphere::new(Vec3::ZERO, 1.0)
            .with_color(Vec4::new(0.5, 0.5, 0.5, 1.0))
            .with_f0(Vec4::splat(0.03))
            .with_surface(0.9, 0.0);
        let n = Vec3::Y;
        let v = Vec3::new(0.3, 1.0, 0.0).normalize();
        let l = Vec3::new(-0.3, 1.0, 0.2).normalize();

        let brdf = evaluate(&sphere, n, v, l);
        assert!((brdf.diffuse.x - 0.5 / PI).abs() < 1e-6);
        assert!(brdf.specular.x > 0.0);
        assert!((brdf.kd.x - (1.0 - brdf.specular.x)).abs() < 1e-6);
        let w = brdf.weight();
        assert!(w.x > brdf.specular.x);
    }
}
