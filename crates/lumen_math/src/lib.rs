// Re-export glam for convenience
pub use glam::*;

// Lumen math types
mod interval;
mod ray;
pub use interval::Interval;
pub use ray::Ray;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec4_channels() {
        let c = Vec4::new(0.25, 0.5, 0.75, 1.0);
        assert_eq!(c.x, 0.25);
        assert_eq!(c.w, 1.0);
        assert_eq!(c.truncate(), Vec3::new(0.25, 0.5, 0.75));
    }

    #[test]
    fn test_vec3_cross_is_right_handed() {
        assert_eq!(Vec3::new(0.0, 0.0, -1.0).cross(Vec3::Y), Vec3::X);
    }
}
