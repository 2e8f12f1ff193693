//! Built-in scenes.

use std::f32::consts::PI;

use crate::{Camera, RenderResult, Scene, Sphere};
use lumen_math::{Vec3, Vec4};

/// Radius of the spheres that stand in for the room's walls.
pub const WALL_RADIUS: f32 = 1000.0;

fn rgb(r: f32, g: f32, b: f32) -> Vec4 {
    Vec4::new(r, g, b, 1.0)
}

/// Camera used by every preset: on +Z looking down -Z with a 30 degree fov.
pub fn default_camera(aspect_ratio: f32) -> Camera {
    Camera::new(Vec3::new(0.0, 0.0, 14.0), Vec3::NEG_Z, Vec3::Y, PI / 6.0, aspect_ratio)
}

/// Red, green and blue walls, a white ceiling light and a gray floor, made of
/// huge spheres so they read as nearly flat.
fn room() -> Vec<Sphere> {
    let offset = WALL_RADIUS + 1.5;
    vec![
        // left
        Sphere::new(Vec3::new(-offset, 0.0, 0.0), WALL_RADIUS).with_color(rgb(1.0, 0.0, 0.0)),
        // right
        Sphere::new(Vec3::new(offset, 0.0, 0.0), WALL_RADIUS).with_color(rgb(0.0, 1.0, 0.0)),
        // back
        Sphere::new(Vec3::new(0.0, 0.0, -offset), WALL_RADIUS).with_color(rgb(0.0, 0.0, 1.0)),
        // ceiling light
        Sphere::new(Vec3::new(0.0, offset, 0.0), WALL_RADIUS)
            .with_color(rgb(0.0, 0.0, 0.0))
            .with_emission(Vec4::ONE),
        // floor
        Sphere::new(Vec3::new(0.0, -(WALL_RADIUS + 1.0) + 0.15, 0.0), WALL_RADIUS)
            .with_color(rgb(0.5, 0.5, 0.5)),
    ]
}

/// The five-wall room with a rough copper-ish ball, a polished metal ball and
/// a glossy red plastic ball resting on the floor.
pub fn cornell(aspect_ratio: f32) -> RenderResult<Scene> {
    let mut spheres = room();
    spheres.extend([
        Sphere::new(Vec3::new(-1.0, -0.35, 0.0), 0.5)
            .with_color(rgb(0.9, 0.2, 0.1))
            .with_surface(0.9, 0.0)
            .with_f0(rgb(0.95, 0.64, 0.54)),
        Sphere::new(Vec3::new(0.0, -0.35, 0.0), 0.5)
            .with_color(rgb(1.0, 1.0, 1.0))
            .with_surface(0.1, 1.0),
        Sphere::new(Vec3::new(1.0, -0.35, 0.0), 0.5)
            .with_color(rgb(1.0, 0.0, 0.0))
            .with_surface(0.1, 0.0)
            .with_f0(rgb(0.03, 0.03, 0.03)),
    ]);

    Scene::new(default_camera(aspect_ratio), spheres)
}

/// The empty room: only walls, floor and the ceiling light.
pub fn empty_room(aspect_ratio: f32) -> RenderResult<Scene> {
    Scene::new(default_camera(aspect_ratio), room())
}

/// A single emitter large enough to fill the default camera's view.
pub fn emissive_backdrop(aspect_ratio: f32, emission: Vec4) -> RenderResult<Scene> {
    Scene::new(
        default_camera(aspect_ratio),
        vec![Sphere::new(Vec3::ZERO, 5.0)
            .with_color(rgb(0.0, 0.0, 0.0))
            .with_emission(emission)],
    )
}
