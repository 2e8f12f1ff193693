//! Result of intersecting a ray against one sphere or the whole scene.

use lumen_math::Vec3;

/// Hit distance reported when nothing was hit.
pub const T_MAX: f32 = 1_000_000.0;

/// Record of a ray-sphere intersection.
///
/// The hit sphere is referred to by its index in the scene's sphere list, so
/// a `Hit` is plain data that can be copied between threads freely.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    hit: bool,
    t: f32,
    normal: Vec3,
    sphere: Option<usize>,
}

impl Hit {
    /// A record for a ray that hit nothing.
    pub const fn miss() -> Self {
        Self {
            hit: false,
            t: T_MAX,
            normal: Vec3::ZERO,
            sphere: None,
        }
    }

    /// A record for a hit at distance `t` with the given surface normal.
    pub fn new(t: f32, normal: Vec3) -> Self {
        Self {
            hit: true,
            t,
            normal,
            sphere: None,
        }
    }

    /// The same hit, attributed to the sphere at `index` in the scene.
    pub fn with_sphere(self, index: usize) -> Self {
        Self {
            sphere: Some(index),
            ..self
        }
    }

    /// Whether the ray hit anything.
    #[inline]
    pub fn is_hit(&self) -> bool {
        self.hit
    }

    /// Ray parameter of the hit, or [`T_MAX`] on a miss.
    #[inline]
    pub fn t(&self) -> f32 {
        self.t
    }

    /// Unit surface normal at the hit point, pointing away from the sphere center.
    #[inline]
    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    /// Index of the hit sphere in the scene, if the hit came from a scene query.
    #[inline]
    pub fn sphere(&self) -> Option<usize> {
        self.sphere
    }
}

impl Default for Hit {
    fn default() -> Self {
        Self::miss()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_miss() {
        let hit = Hit::default();
        assert!(!hit.is_hit());
        assert_eq!(hit.t(), T_MAX);
        assert_eq!(hit.sphere(), None);
    }

    #[test]
    fn test_with_sphere_keeps_geometry() {
        let hit = Hit::new(2.5, Vec3::Y).with_sphere(3);
        assert!(hit.is_hit());
        assert_eq!(hit.t(), 2.5);
        assert_eq!(hit.normal(), Vec3::Y);
        assert_eq!(hit.sphere(), Some(3));
    }
}
