//! Sphere primitive for ray tracing.

use crate::{hit::Hit, Color};
use lumen_math::{Interval, Ray, Vec3, Vec4};

/// Reflectance at normal incidence used when a sphere does not set its own.
pub const DEFAULT_F0: Vec4 = Vec4::new(0.91, 0.92, 0.92, 1.0);

/// A sphere with Cook-Torrance surface parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Sphere {
    /// Center of the sphere
    pub center: Vec3,
    /// Radius, must be > 0
    pub radius: f32,
    /// Base color (albedo); alpha is carried through shading but not displayed
    pub color: Color,
    /// Radiance emitted when the sphere is hit
    pub emission: Color,
    /// Reflectance at normal incidence
    pub f0: Color,
    /// Microfacet roughness in (0, 1]
    pub roughness: f32,
    /// Metallic blend in [0, 1]
    pub metallic: f32,
}

impl Sphere {
    /// Create a white, non-emissive dielectric sphere.
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self {
            center,
            radius,
            color: Color::ONE,
            emission: Color::ZERO,
            f0: DEFAULT_F0,
            roughness: 0.5,
            metallic: 0.0,
        }
    }

    /// Set the base color.
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Set the emitted radiance.
    pub fn with_emission(mut self, emission: Color) -> Self {
        self.emission = emission;
        self
    }

    /// Set the reflectance at normal incidence.
    pub fn with_f0(mut self, f0: Color) -> Self {
        self.f0 = f0;
        self
    }

    /// Set roughness and metallic.
    pub fn with_surface(mut self, roughness: f32, metallic: f32) -> Self {
        self.roughness = roughness;
        self.metallic = metallic;
        self
    }

    /// Whether the sphere emits any light.
    pub fn is_emissive(&self) -> bool {
        self.emission.truncate() != Vec3::ZERO
    }

    /// Outward unit normal at a point on the surface.
    #[inline]
    pub fn normal_at(&self, point: Vec3) -> Vec3 {
        (point - self.center).normalize()
    }

    /// Intersect a ray with the sphere.
    ///
    /// Only the part of the ray at `t >= 0` counts. When the origin is inside
    /// the sphere the forward root is reported, otherwise the nearer one.
    pub fn intersect(&self, ray: &Ray) -> Hit {
        let oc = ray.origin() - self.center;
        let a = ray.direction().length_squared();
        let b = 2.0 * oc.dot(ray.direction());
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 0.0 {
            return Hit::miss();
        }

        let sqrtd = discriminant.sqrt();
        let t1 = (-b - sqrtd) / (2.0 * a);
        let t2 = (-b + sqrtd) / (2.0 * a);

        let t = match (Interval::FORWARD.contains(t1), Interval::FORWARD.contains(t2)) {
            (true, true) => t1.min(t2),
            (true, false) => t1,
            (false, true) => t2,
            // Sphere lies entirely behind the origin
            (false, false) => return Hit::miss(),
        };

        Hit::new(t, self.normal_at(ray.at(t)))
    }
}
