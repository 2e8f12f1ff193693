//! Scene: a list of spheres seen through one camera.

use crate::{Camera, Hit, RenderError, RenderResult, Sphere};
use lumen_math::Ray;

/// The spheres to render and the camera that views them.
#[derive(Debug, Clone)]
pub struct Scene {
    spheres: Vec<Sphere>,
    camera: Camera,
}

impl Scene {
    /// Build a scene, rejecting spheres whose radius is not a positive finite number.
    pub fn new(camera: Camera, spheres: Vec<Sphere>) -> RenderResult<Self> {
        if spheres.is_empty() {
            return Err(RenderError::EmptyScene);
        }
        if let Some((index, sphere)) = spheres
            .iter()
            .enumerate()
            .find(|(_, s)| !(s.radius.is_finite() && s.radius > 0.0))
        {
            return Err(RenderError::InvalidSphere {
                index,
                radius: sphere.radius,
            });
        }

        log::debug!("Scene built with {} spheres", spheres.len());
        Ok(Self { spheres, camera })
    }

    /// All spheres, indexed the same way as [`Hit::sphere`].
    pub fn spheres(&self) -> &[Sphere] {
        &self.spheres
    }

    /// Look up the sphere a hit refers to.
    pub fn sphere(&self, index: usize) -> Option<&Sphere> {
        self.spheres.get(index)
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    /// Find the nearest sphere along a ray.
    ///
    /// Brute force over every sphere; scenes hold a handful of primitives.
    pub fn closest_hit(&self, ray: &Ray) -> Hit {
        let mut closest = Hit::miss();

        for (index, sphere) in self.spheres.iter().enumerate() {
            let hit = sphere.intersect(ray);
            if hit.is_hit() && hit.t() < closest.t() {
                closest = hit.with_sphere(index);
            }
        }

        closest
    }
}
