//! Lumen renderer - progressive CPU path tracing for sphere scenes
//!
//! Spheres carry a Cook-Torrance surface and an emission term. A render
//! session splits the image into interleaved columns, one per worker thread,
//! and refines every pixel pass after pass into a shared RGBA8 buffer.

mod error;
mod hit;
mod sphere;
mod camera;
pub mod brdf;
mod sampler;
mod scene;
mod integrator;
mod pixel_buffer;
mod partition;
mod renderer;
mod session;
pub mod presets;

/// Linear RGBA color; alpha rides along and is averaged like the other channels.
pub type Color = lumen_math::Vec4;

pub use error::{RenderError, RenderResult};
pub use hit::{Hit, T_MAX};
pub use sphere::{Sphere, DEFAULT_F0};
pub use camera::Camera;
pub use brdf::BrdfSample;
pub use sampler::{HemisphereSampler, UniformHemisphere};
pub use scene::Scene;
pub use integrator::{PathIntegrator, EPSILON, MAX_DEPTH};
pub use pixel_buffer::PixelBuffer;
pub use partition::{interleave_columns, ColumnInterleave};
pub use renderer::{
    accumulate, gamma_to_linear, linear_to_gamma, linear_to_rgba, rgba_to_linear, sanitize,
    RenderConfig, GAMMA,
};
pub use session::RenderSession;

/// Re-export math types from lumen_math
pub use lumen_math::{Interval, Ray, Vec3, Vec4};
