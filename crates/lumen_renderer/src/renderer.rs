//! Render configuration and progressive accumulation.
//!
//! Every pass adds one sample per pixel to a running mean kept in the 8-bit
//! pixel buffer. The mean is updated in linear light; gamma encoding is only
//! for storage and display.

use crate::{integrator::MAX_DEPTH, Color, RenderError, RenderResult};
use lumen_math::Interval;

/// Display gamma of the stored pixels.
pub const GAMMA: f32 = 2.2;

/// Render configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Number of progressive passes (samples per pixel)
    pub samples: u32,
    /// Number of worker threads
    pub threads: u32,
    /// Maximum ray bounce depth
    pub max_depth: u32,
    /// Base seed for the per-worker RNG streams; entropy when None
    pub seed: Option<u64>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 600,
            samples: 2048,
            threads: 2,
            max_depth: MAX_DEPTH,
            seed: None,
        }
    }
}

impl RenderConfig {
    /// Set image resolution.
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set the number of passes.
    pub fn with_samples(mut self, samples: u32) -> Self {
        self.samples = samples;
        self
    }

    /// Set the worker count.
    pub fn with_threads(mut self, threads: u32) -> Self {
        self.threads = threads;
        self
    }

    /// Set the bounce limit.
    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Make the render reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Image width / height.
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Check that the configuration describes a renderable image.
    pub fn validate(&self) -> RenderResult<()> {
        let fields = [
            ("width", self.width),
            ("height", self.height),
            ("samples", self.samples),
            ("threads", self.threads),
        ];
        match fields.iter().find(|(_, value)| *value == 0) {
            Some((name, _)) => Err(RenderError::InvalidConfig(format!("{name} must be > 0"))),
            None => Ok(()),
        }
    }
}

/// Decode a stored channel value in [0, 1] to linear light.
#[inline]
pub fn gamma_to_linear(encoded: f32) -> f32 {
    encoded.powf(GAMMA)
}

/// Encode a linear channel value for storage.
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.powf(1.0 / GAMMA)
    } else {
        0.0
    }
}

/// Replace non-finite channels by zero so one bad sample cannot poison a pixel.
#[inline]
pub fn sanitize(sample: Color) -> Color {
    if sample.is_finite() {
        sample
    } else {
        Color::from_array(sample.to_array().map(|c| if c.is_finite() { c } else { 0.0 }))
    }
}

/// Convert stored RGBA bytes to a linear color. Alpha is stored linearly.
pub fn rgba_to_linear(rgba: [u8; 4]) -> Color {
    let c = Color::from_array(rgba.map(|b| b as f32 / 255.0));
    Color::new(
        gamma_to_linear(c.x),
        gamma_to_linear(c.y),
        gamma_to_linear(c.z),
        c.w,
    )
}

/// Convert a linear color to stored RGBA bytes, clamping to [0, 255].
pub fn linear_to_rgba(color: Color) -> [u8; 4] {
    let encoded = Color::new(
        linear_to_gamma(color.x),
        linear_to_gamma(color.y),
        linear_to_gamma(color.z),
        color.w,
    );
    encoded
        .to_array()
        .map(|c| (255.0 * Interval::UNIT.clamp(c)).round() as u8)
}

/// Blend the sample of pass `pass` (0-based) into a pixel's running mean.
///
/// `mean_{i+1} = (i * mean_i + x) / (i + 1)`, computed in linear light.
pub fn accumulate(previous: [u8; 4], sample: Color, pass: u32) -> [u8; 4] {
    let i = pass as f32;
    let mean = rgba_to_linear(previous) * i;
    linear_to_rgba((mean + sanitize(sample)) / (i + 1.0))
}
