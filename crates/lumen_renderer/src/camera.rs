//! Pinhole camera with a per-pixel primary ray cache.

use std::sync::OnceLock;

use lumen_math::{Ray, Vec3};

/// Camera for generating primary rays into the scene.
///
/// The camera is assumed static for a render session, so the ray through
/// each pixel is computed once and reused by every later sample pass.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Eye position
    pub position: Vec3,
    /// Viewing direction
    pub look_at: Vec3,
    /// Up vector
    pub up: Vec3,
    /// Field of view in radians
    pub fov: f32,
    /// Image width / height
    pub aspect_ratio: f32,

    // Ray cache, one write-once slot per pixel (set by with_resolution())
    width: u32,
    height: u32,
    rays: Vec<OnceLock<Ray>>,
}

impl Camera {
    /// Create a camera without a ray cache.
    pub fn new(position: Vec3, look_at: Vec3, up: Vec3, fov: f32, aspect_ratio: f32) -> Self {
        Self {
            position,
            look_at,
            up,
            fov,
            aspect_ratio,
            width: 0,
            height: 0,
            rays: Vec::new(),
        }
    }

    /// Size the ray cache for an image and match the aspect ratio to it.
    ///
    /// Any previously cached rays are discarded.
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.set_resolution(width, height);
        self
    }

    /// In-place form of [`Camera::with_resolution`].
    pub fn set_resolution(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        if height > 0 {
            self.aspect_ratio = width as f32 / height as f32;
        }
        self.rays = (0..width as usize * height as usize)
            .map(|_| OnceLock::new())
            .collect();
    }

    /// Resolution the ray cache was sized for.
    pub fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Generate the ray through normalized image coordinates `u, v` in [0, 1].
    pub fn ray(&self, u: f32, v: f32) -> Ray {
        let u = 2.0 * u - 1.0;
        let v = 2.0 * v - 1.0;

        let right = self.look_at.cross(self.up).normalize();
        let flen = self.aspect_ratio / (2.0 * self.fov.tan());
        let pixel_dir = right * u * self.aspect_ratio + self.up * v + self.look_at * flen;

        // Direction is left unnormalized; only its orientation matters downstream
        Ray::new(self.position, pixel_dir - self.position)
    }

    fn slot(&self, x: u32, y: u32) -> Option<&OnceLock<Ray>> {
        if x < self.width && y < self.height {
            self.rays.get((y * self.width + x) as usize)
        } else {
            None
        }
    }

    /// Store the ray for pixel `(x, y)`.
    ///
    /// Returns false if the pixel is outside the cache or already has a ray.
    pub fn cache_ray(&self, x: u32, y: u32, ray: Ray) -> bool {
        self.slot(x, y).is_some_and(|slot| slot.set(ray).is_ok())
    }

    /// The cached ray for pixel `(x, y)`, if one has been stored.
    pub fn cached_ray(&self, x: u32, y: u32) -> Option<Ray> {
        self.slot(x, y).and_then(|slot| slot.get().copied())
    }

    /// The ray through pixel `(x, y)`, generated and cached on first use.
    ///
    /// Pixels outside the cache get a freshly generated ray every time.
    pub fn pixel_ray(&self, x: u32, y: u32) -> Ray {
        let generate = || {
            self.ray(
                x as f32 / self.width.max(1) as f32,
                y as f32 / self.height.max(1) as f32,
            )
        };

        match self.slot(x, y) {
            Some(slot) => *slot.get_or_init(generate),
            None => generate(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn cached_pixels(camera: &Camera) -> usize {
        let (width, height) = camera.resolution();
        (0..height)
            .flat_map(|y| (0..width).map(move |x| (x, y)))
            .filter(|&(x, y)| camera.cached_ray(x, y).is_some())
            .count()
    }

    fn test_camera() -> Camera {
        Camera::new(
            Vec3::new(0.0, 0.0, 14.0),
            Vec3::new(0.0, 0.0, -1.0),
            Vec3::Y,
            PI / 6.0,
            2.0,
        )
    }

    #[test]
    fn test_center_ray_points_forward() {
        let camera = test_camera();
        let ray = camera.ray(0.5, 0.5);

        assert_eq!(ray.origin(), camera.position);
        let dir = ray.direction().normalize();
        assert!((dir - Vec3::NEG_Z).length() < 1e-5, "dir = {:?}", dir);
    }

    #[test]
    fn test_ray_direction_formula() {
        let camera = test_camera();
        let flen = 2.0 / (2.0 * (PI / 6.0).tan());

        // u = 1 -> +1 after remap, v = 0 -> -1 after remap
        let ray = camera.ray(1.0, 0.0);
        let expected = Vec3::new(2.0, -1.0, -flen) - camera.position;
        assert!((ray.direction() - expected).length() < 1e-4);
    }

    #[test]
    fn test_corners_are_symmetric() {
        let camera = test_camera();
        let left = camera.ray(0.0, 0.5).direction();
        let right = camera.ray(1.0, 0.5).direction();

        assert!((left.x + right.x).abs() < 1e-5);
        assert!(left.x < 0.0);
        assert_eq!(left.z, right.z);
    }

    #[test]
    fn test_with_resolution_sets_aspect() {
        let camera = test_camera().with_resolution(1200, 600);
        assert_eq!(camera.resolution(), (1200, 600));
        assert_eq!(camera.aspect_ratio, 2.0);
        assert_eq!(cached_pixels(&camera), 0);
    }

    #[test]
    fn test_pixel_ray_is_cached_once() {
        let camera = test_camera().with_resolution(8, 4);

        assert!(camera.cached_ray(3, 2).is_none());
        let first = camera.pixel_ray(3, 2);
        assert_eq!(camera.cached_ray(3, 2), Some(first));
        assert_eq!(camera.pixel_ray(3, 2), first);
        assert_eq!(cached_pixels(&camera), 1);

        assert_eq!(first, camera.ray(3.0 / 8.0, 2.0 / 4.0));
    }

    #[test]
    fn test_cache_ray_is_write_once() {
        let camera = test_camera().with_resolution(4, 4);
        let ray = Ray::new(Vec3::ZERO, Vec3::X);

        assert!(camera.cache_ray(1, 1, ray));
        assert!(!camera.cache_ray(1, 1, Ray::new(Vec3::ZERO, Vec3::Y)));
        assert_eq!(camera.cached_ray(1, 1), Some(ray));
    }

    #[test]
    fn test_out_of_range_pixels_are_not_cached() {
        let camera = test_camera().with_resolution(4, 4);
        let ray = Ray::new(Vec3::ZERO, Vec3::X);

        assert!(!camera.cache_ray(4, 0, ray));
        assert!(camera.cached_ray(0, 4).is_none());
        let _ = camera.pixel_ray(10, 10);
        assert_eq!(cached_pixels(&camera), 0);
    }

    #[test]
    fn test_cache_is_shared_across_threads() {
        let camera = test_camera().with_resolution(16, 2);

        std::thread::scope(|s| {
            for start in 0..2u32 {
                let camera = &camera;
                s.spawn(move || {
                    for y in 0..2 {
                        for x in (start..16).step_by(2) {
                            camera.pixel_ray(x, y);
                        }
                    }
                });
            }
        });

        assert_eq!(cached_pixels(&camera), 32);
    }
}
