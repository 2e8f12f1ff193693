//! Multi-threaded progressive render session.
//!
//! A session owns the scene, the pixel buffer and a fixed pool of worker
//! threads. Each worker renders its interleaved columns once per pass and
//! blends the new sample into the buffer, so the image converges while the
//! presentation layer keeps reading it.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::partition::{interleave_columns, ColumnInterleave};
use crate::renderer::accumulate;
use crate::{PathIntegrator, PixelBuffer, RenderConfig, RenderError, RenderResult, Scene};

/// State shared by the session handle and its workers.
struct Shared {
    config: RenderConfig,
    scene: Scene,
    pixels: PixelBuffer,
    running: AtomicBool,
    /// Completed passes, one counter per worker
    passes: Vec<AtomicU32>,
}

impl Shared {
    #[inline]
    fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }
}

/// A running progressive render.
///
/// Dropping the session stops the workers and waits for them.
pub struct RenderSession {
    shared: Arc<Shared>,
    workers: Vec<JoinHandle<()>>,
    started_at: Instant,
}

impl RenderSession {
    /// Validate the configuration and spawn one worker per configured thread.
    pub fn start(mut scene: Scene, config: RenderConfig) -> RenderResult<Self> {
        config.validate()?;
        scene.camera_mut().set_resolution(config.width, config.height);

        let partitions = interleave_columns(config.threads);
        let shared = Arc::new(Shared {
            pixels: PixelBuffer::new(config.width, config.height),
            running: AtomicBool::new(true),
            passes: partitions.iter().map(|_| AtomicU32::new(0)).collect(),
            config,
            scene,
        });

        log::info!(
            "Rendering {}x{} @ {} spp on {} threads (max depth {})",
            shared.config.width,
            shared.config.height,
            shared.config.samples,
            shared.config.threads,
            shared.config.max_depth
        );

        let mut session = Self {
            shared,
            workers: Vec::with_capacity(partitions.len()),
            started_at: Instant::now(),
        };

        for (index, partition) in partitions.into_iter().enumerate() {
            let shared = Arc::clone(&session.shared);
            let spawned = thread::Builder::new()
                .name(format!("lumen-worker-{index}"))
                .spawn(move || render_worker(&shared, partition, index));

            match spawned {
                Ok(handle) => session.workers.push(handle),
                Err(e) => {
                    // Dropping the session stops and joins the workers already running
                    log::error!("Failed to spawn render worker {index}: {e}");
                    return Err(RenderError::Spawn(e));
                }
            }
        }

        Ok(session)
    }

    pub fn config(&self) -> &RenderConfig {
        &self.shared.config
    }

    pub fn scene(&self) -> &Scene {
        &self.shared.scene
    }

    /// The buffer the workers write into.
    pub fn pixels(&self) -> &PixelBuffer {
        &self.shared.pixels
    }

    /// Number of passes every pixel has received so far.
    pub fn samples_completed(&self) -> u32 {
        self.shared
            .passes
            .iter()
            .map(|p| p.load(Ordering::Relaxed))
            .min()
            .unwrap_or(0)
    }

    /// Whether the session has not been asked to stop.
    pub fn is_running(&self) -> bool {
        self.shared.is_running()
    }

    /// Whether every worker has exited.
    pub fn is_finished(&self) -> bool {
        self.workers.iter().all(|w| w.is_finished())
    }

    /// Time since the workers were started.
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Ask the workers to exit after the pixel they are working on.
    pub fn stop(&self) {
        self.shared.running.store(false, Ordering::Relaxed);
    }

    /// Wait for every worker to finish all of its passes.
    pub fn wait(mut self) -> RenderResult<()> {
        self.join_workers()
    }

    /// Stop the workers and wait for them to exit.
    pub fn shutdown(mut self) -> RenderResult<()> {
        self.stop();
        self.join_workers()
    }

    fn join_workers(&mut self) -> RenderResult<()> {
        let mut result = Ok(());
        for (index, handle) in self.workers.drain(..).enumerate() {
            if handle.join().is_err() {
                log::error!("Render worker {index} panicked");
                if result.is_ok() {
                    result = Err(RenderError::WorkerPanicked(index));
                }
            }
        }

        log::info!(
            "Render stopped after {} samples in {:.2?}",
            self.samples_completed(),
            self.elapsed()
        );
        result
    }
}

impl Drop for RenderSession {
    fn drop(&mut self) {
        if !self.workers.is_empty() {
            self.stop();
            let _ = self.join_workers();
        }
    }
}

/// Worker loop: every pass, blend one new sample into each owned pixel.
///
/// The running flag is checked before every pass, row and pixel, so a stop
/// request takes effect after the pixel in flight.
fn render_worker(shared: &Shared, partition: ColumnInterleave, index: usize) {
    let config = &shared.config;
    let camera = shared.scene.camera();
    let integrator = PathIntegrator::new(config.max_depth);
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(index as u64)),
        None => StdRng::from_entropy(),
    };
    let mut reported_non_finite = false;

    log::debug!(
        "Worker {index} owns {} pixels per pass",
        partition.pixel_count(config.width, config.height)
    );

    'passes: for pass in 0..config.samples {
        if !shared.is_running() {
            break;
        }
        for y in 0..config.height {
            if !shared.is_running() {
                break 'passes;
            }
            for x in partition.columns(config.width) {
                if !shared.is_running() {
                    break 'passes;
                }

                // The first pass fills the camera's ray cache for this pixel
                let ray = camera.pixel_ray(x, y);
                let sample = integrator.estimate(&ray, &shared.scene, &mut rng);

                if !sample.is_finite() && !reported_non_finite {
                    log::warn!("Worker {index}: non-finite sample at ({x}, {y}) discarded");
                    reported_non_finite = true;
                }

                let previous = shared.pixels.get(x, y);
                shared.pixels.set(x, y, accumulate(previous, sample, pass));
            }
        }

        shared.passes[index].store(pass + 1, Ordering::Relaxed);
        log::debug!("Worker {index} finished pass {}", pass + 1);
    }

    log::info!(
        "Worker {index} exiting after {} passes",
        shared.passes[index].load(Ordering::Relaxed)
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presets::emissive_backdrop;
    use crate::renderer::rgba_to_linear;
    use lumen_math::Vec4;

    fn emitter_scene(emission: Vec4) -> Scene {
        let _ = env_logger::builder().is_test(true).try_init();
        emissive_backdrop(2.0, emission).unwrap()
    }

    #[test]
    fn test_emissive_backdrop_converges_to_emission() {
        let emission = Vec4::new(0.5, 0.25, 1.0, 1.0);
        let config = RenderConfig::default()
            .with_resolution(16, 8)
            .with_samples(8)
            .with_threads(2)
            .with_seed(9);

        let session = RenderSession::start(emitter_scene(emission), config).unwrap();
        let pixels = {
            // wait() consumes the session, so read through a second handle
            let shared = Arc::clone(&session.shared);
            session.wait().unwrap();
            shared.pixels.snapshot()
        };

        for rgba in pixels.chunks_exact(4) {
            let c = rgba_to_linear([rgba[0], rgba[1], rgba[2], rgba[3]]);
            assert!((c - emission).abs().max_element() < 0.01, "pixel = {:?}", rgba);
        }
    }

    #[test]
    fn test_every_pixel_gets_every_pass() {
        let config = RenderConfig::default()
            .with_resolution(9, 4)
            .with_samples(5)
            .with_threads(3)
            .with_seed(1);

        let session = RenderSession::start(emitter_scene(Vec4::ONE), config).unwrap();
        let shared = Arc::clone(&session.shared);
        session.wait().unwrap();

        assert!(shared.passes.iter().all(|p| p.load(Ordering::Relaxed) == 5));
        let camera = shared.scene.camera();
        for y in 0..4 {
            for x in 0..9 {
                assert_eq!(camera.cached_ray(x, y), Some(camera.ray(x as f32 / 9.0, y as f32 / 4.0)));
            }
        }
        assert!(shared.pixels.snapshot().iter().all(|&b| b == 255));
    }

    #[test]
    fn test_samples_completed_after_wait() {
        let config = RenderConfig::default()
            .with_resolution(4, 4)
            .with_samples(3)
            .with_threads(2)
            .with_seed(2);

        let session = RenderSession::start(emitter_scene(Vec4::ONE), config).unwrap();
        while !session.is_finished() {
            thread::sleep(Duration::from_millis(1));
        }

        assert_eq!(session.samples_completed(), 3);
        assert!(session.is_running());
        session.wait().unwrap();
    }

    #[test]
    fn test_stop_ends_render_early() {
        let config = RenderConfig::default()
            .with_resolution(64, 32)
            .with_samples(1_000_000)
            .with_threads(2)
            .with_seed(3);

        let session = RenderSession::start(emitter_scene(Vec4::ONE), config).unwrap();
        thread::sleep(Duration::from_millis(20));
        session.stop();
        assert!(!session.is_running());

        let shared = Arc::clone(&session.shared);
        session.shutdown().unwrap();
        let done = shared.passes.iter().map(|p| p.load(Ordering::Relaxed)).max().unwrap();
        assert!(done < 1_000_000);
    }

    #[test]
    fn test_drop_stops_workers() {
        let config = RenderConfig::default()
            .with_resolution(32, 16)
            .with_samples(1_000_000)
            .with_threads(2);

        let session = RenderSession::start(emitter_scene(Vec4::ONE), config).unwrap();
        let shared = Arc::clone(&session.shared);
        drop(session);

        assert!(!shared.is_running());
        // Only the test's handle is left once the workers have been joined
        assert_eq!(Arc::strong_count(&shared), 1);
    }

    #[test]
    fn test_start_rejects_invalid_config() {
        let result = RenderSession::start(emitter_scene(Vec4::ONE), RenderConfig::default().with_threads(0));
        assert!(matches!(result, Err(RenderError::InvalidConfig(_))));
    }

    #[test]
    fn test_start_sizes_ray_cache() {
        let config = RenderConfig::default()
            .with_resolution(6, 3)
            .with_samples(1)
            .with_threads(1)
            .with_seed(4);

        let session = RenderSession::start(emitter_scene(Vec4::ONE), config).unwrap();
        assert_eq!(session.scene().camera().resolution(), (6, 3));
        assert_eq!(session.pixels().width(), 6);
        session.wait().unwrap();
    }
}
