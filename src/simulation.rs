//! Frame-by-frame fireworks simulation.
//!
//! # Architecture
//!
//! The driver owns the clock, the live fireworks and the random source. Each
//! call to [`Simulation::step`] produces one frame:
//!
//! 1. Allocate a black frame
//! 2. Maybe spawn one firework (probability `0.05 × intensity`, capped at 1),
//!    its burst kind drawn from the configured kinds
//! 3. Update every firework, dropping the ones that report no live particles
//! 4. Draw the survivors in spawn order
//!
//! [`Simulation::run`] repeats this for every frame, forwarding each to a
//! [`FrameSink`], and finishes the sink at the end.
//!
//! # Example
//!
//! ```
//! use skyburst::simulation::{Simulation, SimulationConfig};
//!
//! let config = SimulationConfig { duration: 1, fps: 5, width: 64, height: 48, ..Default::default() };
//! let mut sim = Simulation::seeded(config, 42);
//! let mut frames = 0;
//! while let Some(frame) = sim.step() {
//!     assert_eq!(frame.dimensions(), (64, 48));
//!     frames += 1;
//! }
//! assert_eq!(frames, 5);
//! ```

use image::RgbImage;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{debug, info, trace};

use crate::firework::{BurstKind, Firework};
use crate::output::{FrameSink, OutputError};

/// Spawn probability contributed by each unit of intensity.
pub const SPAWN_CHANCE_PER_INTENSITY: f64 = 0.05;

/// Inclusive range of the base particle count before intensity scaling.
pub const BASE_PARTICLES_RANGE: (u32, u32) = (50, 150);

/// Run parameters for a simulation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationConfig {
    /// Length of the video in seconds
    pub duration: u32,
    /// Frames per second
    pub fps: u32,
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
    /// Spawn rate and burst density, nominally 1-10
    pub intensity: u32,
    /// Seed for the random source; `None` seeds from entropy
    pub seed: Option<u64>,
    /// Burst kinds to pick from, uniformly, for each spawned firework
    pub kinds: Vec<BurstKind>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            duration: 5,
            fps: 30,
            width: 1280,
            height: 720,
            intensity: 5,
            seed: None,
            kinds: vec![BurstKind::Basic],
        }
    }
}

impl SimulationConfig {
    /// Total number of frames in the run.
    pub fn total_frames(&self) -> u32 {
        self.duration.saturating_mul(self.fps)
    }

    /// Probability of spawning a firework on any frame, clamped to `[0, 1]`.
    pub fn spawn_probability(&self) -> f64 {
        (SPAWN_CHANCE_PER_INTENSITY * self.intensity as f64).clamp(0.0, 1.0)
    }
}

/// What a completed run produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub frames_written: u32,
    pub fireworks_spawned: u32,
    /// Highest number of live particles seen in any frame
    pub peak_particles: usize,
}

/// The simulation driver.
#[derive(Debug, Clone)]
pub struct Simulation<R: Rng = StdRng> {
    config: SimulationConfig,
    rng: R,
    fireworks: Vec<Firework>,
    frame_index: u32,
    summary: RunSummary,
}

impl Simulation<StdRng> {
    /// Create a simulation seeded from `config.seed`, or from entropy if unset.
    pub fn new(config: SimulationConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config, rng)
    }

    /// Create a simulation with an explicit seed, overriding `config.seed`.
    pub fn seeded(config: SimulationConfig, seed: u64) -> Self {
        Self::new(SimulationConfig { seed: Some(seed), ..config })
    }
}

impl<R: Rng> Simulation<R> {
    /// Create a simulation drawing all randomness from `rng`.
    pub fn with_rng(config: SimulationConfig, rng: R) -> Self {
        Self { config, rng, fireworks: Vec::new(), frame_index: 0, summary: RunSummary::default() }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn total_frames(&self) -> u32 {
        self.config.total_frames()
    }

    /// Index of the next frame [`Simulation::step`] will produce.
    pub fn frame_index(&self) -> u32 {
        self.frame_index
    }

    /// Fireworks alive after the most recent step, in draw order.
    pub fn fireworks(&self) -> &[Firework] {
        &self.fireworks
    }

    /// Number of live particles across all fireworks.
    pub fn particle_count(&self) -> usize {
        self.fireworks.iter().map(|fw| fw.particles().len()).sum()
    }

    /// Totals gathered so far.
    pub fn summary(&self) -> RunSummary {
        self.summary
    }

    /// Produce the next frame, or `None` once every frame has been produced.
    pub fn step(&mut self) -> Option<RgbImage> {
        if self.frame_index >= self.total_frames() {
            return None;
        }

        let mut frame = RgbImage::new(self.config.width, self.config.height);

        self.maybe_spawn();

        let rng = &mut self.rng;
        self.fireworks.retain_mut(|fw| fw.update(rng));

        // Fireworks that expired during this update are already gone
        for firework in &self.fireworks {
            firework.draw(&mut frame);
        }

        let particles = self.particle_count();
        trace!(frame = self.frame_index, fireworks = self.fireworks.len(), particles, "frame");

        self.summary.peak_particles = self.summary.peak_particles.max(particles);
        self.summary.frames_written += 1;
        self.frame_index += 1;
        Some(frame)
    }

    /// Run every remaining frame into `sink`, then finish it.
    ///
    /// The first sink error aborts the run.
    pub fn run<S: FrameSink + ?Sized>(mut self, sink: &mut S) -> Result<RunSummary, OutputError> {
        info!(
            frames = self.total_frames(),
            width = self.config.width,
            height = self.config.height,
            intensity = self.config.intensity,
            "starting fireworks run"
        );

        while let Some(frame) = self.step() {
            sink.write(&frame)?;
        }
        sink.finish()?;

        info!(
            frames = self.summary.frames_written,
            fireworks = self.summary.fireworks_spawned,
            peak_particles = self.summary.peak_particles,
            "fireworks run complete"
        );
        Ok(self.summary)
    }

    /// Spawn decision for the current frame.
    fn maybe_spawn(&mut self) {
        if !self.rng.gen_bool(self.config.spawn_probability()) {
            return;
        }

        let (w, h) = (self.config.width, self.config.height);
        let x = self.rng.gen_range(w / 4..=w.saturating_mul(3) / 4);
        let y = self.rng.gen_range(h / 4..=h / 2);
        let base = self.rng.gen_range(BASE_PARTICLES_RANGE.0..=BASE_PARTICLES_RANGE.1);
        let count = base.saturating_mul(self.config.intensity) / 5;
        let kind = self.pick_kind();

        let firework = Firework::with_random_color((x as f64, y as f64), count, &mut self.rng)
            .with_kind(kind);
        debug!(
            frame = self.frame_index,
            x,
            y,
            ?kind,
            particles = firework.particles_count(),
            color = ?firework.color(),
            "spawned firework"
        );
        self.fireworks.push(firework);
        self.summary.fireworks_spawned += 1;
    }

    /// Burst kind for a new firework. A single configured kind draws no randomness.
    fn pick_kind(&mut self) -> BurstKind {
        match self.config.kinds.as_slice() {
            [] => BurstKind::Basic,
            [only] => *only,
            kinds => kinds.choose(&mut self.rng).copied().unwrap_or_default(),
        }
    }
}
