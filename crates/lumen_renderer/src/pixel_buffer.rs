//! Shared RGBA8 pixel store.
//!
//! Written by render workers and read by the presentation thread at the same
//! time. Each pixel is one packed `AtomicU32` accessed with relaxed ordering:
//! there is no lock, a reader may see a frame in which some pixels already
//! carry the next pass and others do not, but a single pixel is never torn.

use std::sync::atomic::{AtomicU32, Ordering};

/// Row-major RGBA8 image shared between render workers and the display.
#[derive(Debug)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<AtomicU32>,
}

impl PixelBuffer {
    /// Create a new pixel buffer filled with zeros.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: (0..width as usize * height as usize)
                .map(|_| AtomicU32::new(0))
                .collect(),
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Size of the RGBA byte image, `width * height * 4`.
    pub fn byte_len(&self) -> usize {
        self.pixels.len() * 4
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        assert!(
            x < self.width && y < self.height,
            "pixel ({x}, {y}) outside {}x{} buffer",
            self.width,
            self.height
        );
        (y * self.width + x) as usize
    }

    /// Get the RGBA bytes at (x, y).
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> [u8; 4] {
        self.pixels[self.index(x, y)]
            .load(Ordering::Relaxed)
            .to_le_bytes()
    }

    /// Set the RGBA bytes at (x, y).
    #[inline]
    pub fn set(&self, x: u32, y: u32, rgba: [u8; 4]) {
        self.pixels[self.index(x, y)].store(u32::from_le_bytes(rgba), Ordering::Relaxed);
    }

    /// Copy the current contents into `out` as interleaved RGBA bytes.
    ///
    /// `out` must be exactly [`PixelBuffer::byte_len`] bytes long.
    pub fn copy_to(&self, out: &mut [u8]) {
        assert_eq!(out.len(), self.byte_len(), "snapshot buffer has the wrong size");
        for (dst, pixel) in out.chunks_exact_mut(4).zip(&self.pixels) {
            dst.copy_from_slice(&pixel.load(Ordering::Relaxed).to_le_bytes());
        }
    }

    /// Current contents as a freshly allocated RGBA byte image.
    pub fn snapshot(&self) -> Vec<u8> {
        let mut bytes = vec![0; self.byte_len()];
        self.copy_to(&mut bytes);
        bytes
    }
}
