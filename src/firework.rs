//! Fireworks: bursts of particles from a fixed origin.
//!
//! A firework is created undetonated. Its first [`Firework::update`] turns the
//! requested particle count into a burst shaped by its [`BurstKind`], after
//! which every update ages the particles and prunes the dead ones. Once the
//! last particle is gone the firework is expired and stays that way.
//!
//! | Kind | Velocities | Lifetime (ticks) | Extra |
//! |------|------------|------------------|-------|
//! | `basic` | uniform angle, speed in [2, 5) | 50-100 | |
//! | `peony` | uniform angle, three speed tiers around 4 | 50-100 | per-particle colour variants |
//! | `ring` | evenly spaced angles, one speed per ring | 90, 81, 72 | up to three concentric rings |
//! | `willow` | uniform angle, speed in [2, 5), upward kick | 100-150 | heavier gravity |
//! | `twinkle` | uniform angle, speed in [2, 5) | 80-130 | sine-modulated brightness |

use std::f64::consts::TAU;

use clap::ValueEnum;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::particle::{Particle, Twinkle, GRAVITY};
use crate::surface::{Color, Surface};

/// Default disk radius for firework particles, in pixels.
pub const DEFAULT_RADIUS: u32 = 2;

/// Inclusive range of randomized colour channels; biased toward bright colours.
pub const COLOR_CHANNEL_RANGE: (u8, u8) = (150, 255);

/// Half-open range of burst speeds, in pixels per tick.
pub const SPEED_RANGE: (f64, f64) = (2.0, 5.0);

/// Inclusive range of particle lifetimes, in ticks.
pub const LIFETIME_RANGE: (u32, u32) = (50, 100);

/// Peony speed tiers (inner, middle, outer) as multiples of [`PEONY_BASE_SPEED`].
pub const PEONY_TIERS: [f64; 3] = [0.6, 0.8, 1.0];

/// Random spread added on top of a peony tier.
pub const PEONY_TIER_SPREAD: f64 = 0.2;

pub const PEONY_BASE_SPEED: f64 = 4.0;

/// Number of colour variants a peony mixes in besides its base colour.
pub const PEONY_COLOR_VARIANTS: usize = 3;

/// Largest per-channel shift of a peony colour variant.
pub const PEONY_COLOR_JITTER: i16 = 25;

/// Maximum number of concentric rings in a ring burst.
pub const RING_COUNT: u32 = 3;

/// Speed of the innermost ring; ring `i` runs at `(i + 1)` times this.
pub const RING_BASE_SPEED: f64 = 1.5;

/// Per-ring random speed factor range.
pub const RING_SPEED_JITTER: (f64, f64) = (0.75, 1.25);

/// Lifetime of the innermost ring; each outer ring loses 10%.
pub const RING_LIFETIME: u32 = 90;

/// Rings hold their shape longer under reduced gravity.
pub const RING_GRAVITY: f64 = GRAVITY / 2.0;

pub const WILLOW_GRAVITY: f64 = 0.15;

/// Upward velocity added to every willow particle at detonation.
pub const WILLOW_LIFT: f64 = 2.0;

pub const WILLOW_LIFETIME_RANGE: (u32, u32) = (100, 150);

pub const TWINKLE_LIFETIME_RANGE: (u32, u32) = (80, 130);

/// Twinkle phase advance per tick, in radians.
pub const TWINKLE_RATE_RANGE: (f64, f64) = (0.15, 0.5);

/// Shape of a firework burst.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BurstKind {
    /// Isotropic burst with uniform speeds
    #[default]
    Basic,
    /// Layered sphere with colour variants
    Peony,
    /// Concentric rings of evenly spaced particles
    Ring,
    /// Drooping strands with long lives
    Willow,
    /// Sparks that flicker as they fade
    Twinkle,
}

/// Detonation state of a firework.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireworkState {
    /// Created but not yet updated; no particles.
    Undetonated,
    /// Burst has happened and at least one particle is alive.
    Active,
    /// Every particle has expired.
    Expired,
}

/// A single firework and the particles of its burst.
#[derive(Debug, Clone)]
pub struct Firework {
    x: f64,
    y: f64,
    color: Color,
    particles_count: u32,
    radius: u32,
    kind: BurstKind,
    state: FireworkState,
    particles: Vec<Particle>,
}

impl Firework {
    /// Create an undetonated firework with an explicit colour.
    ///
    /// A `particles_count` of zero is raised to one.
    pub fn new(origin: (f64, f64), color: Color, particles_count: u32) -> Self {
        Self {
            x: origin.0,
            y: origin.1,
            color,
            particles_count: particles_count.max(1),
            radius: DEFAULT_RADIUS,
            kind: BurstKind::Basic,
            state: FireworkState::Undetonated,
            particles: Vec::new(),
        }
    }

    /// Create an undetonated firework with a random bright colour.
    pub fn with_random_color<R: Rng + ?Sized>(
        origin: (f64, f64),
        particles_count: u32,
        rng: &mut R,
    ) -> Self {
        Self::new(origin, random_color(rng), particles_count)
    }

    /// Set the disk radius used by every particle of the burst.
    pub fn with_radius(mut self, radius: u32) -> Self {
        self.radius = radius;
        self
    }

    /// Set the burst shape.
    pub fn with_kind(mut self, kind: BurstKind) -> Self {
        self.kind = kind;
        self
    }

    /// Advance one tick, detonating first if this is the first update.
    ///
    /// Returns `true` while at least one particle is alive.
    pub fn update<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        match self.state {
            FireworkState::Expired => return false,
            FireworkState::Undetonated => {
                self.detonate(rng);
                self.state = FireworkState::Active;
            }
            FireworkState::Active => {}
        }

        self.particles.retain_mut(|p| p.update());

        if self.particles.is_empty() {
            self.state = FireworkState::Expired;
            false
        } else {
            true
        }
    }

    /// Populate the particle collection according to the burst kind.
    fn detonate<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.particles.reserve(self.particles_count as usize);
        match self.kind {
            BurstKind::Basic => self.detonate_basic(rng),
            BurstKind::Peony => self.detonate_peony(rng),
            BurstKind::Ring => self.detonate_ring(rng),
            BurstKind::Willow => self.detonate_willow(rng),
            BurstKind::Twinkle => self.detonate_twinkle(rng),
        }
    }

    fn spark(&self, velocity: (f64, f64), color: Color, radius: u32, lifetime: u32) -> Particle {
        Particle::new((self.x, self.y), velocity, color, radius, lifetime)
    }

    fn detonate_basic<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for _ in 0..self.particles_count {
            let velocity = random_velocity(rng, SPEED_RANGE);
            let lifetime = rng.gen_range(LIFETIME_RANGE.0..=LIFETIME_RANGE.1);
            let particle = self.spark(velocity, self.color, self.radius, lifetime);
            self.particles.push(particle);
        }
    }

    fn detonate_peony<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let mut palette = vec![self.color];
        palette.extend((0..PEONY_COLOR_VARIANTS).map(|_| jitter_color(self.color, rng)));

        for _ in 0..self.particles_count {
            let angle = rng.gen_range(0.0..TAU);
            let tier = PEONY_TIERS[rng.gen_range(0..PEONY_TIERS.len())];
            let speed = (tier + rng.gen_range(0.0..PEONY_TIER_SPREAD)) * PEONY_BASE_SPEED;
            let color = palette[rng.gen_range(0..palette.len())];
            let lifetime = rng.gen_range(LIFETIME_RANGE.0..=LIFETIME_RANGE.1);
            let velocity = (speed * angle.cos(), speed * angle.sin());
            let particle = self.spark(velocity, color, self.radius, lifetime);
            self.particles.push(particle);
        }
    }

    fn detonate_ring<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let rings = RING_COUNT.min(self.particles_count);
        let per_ring = self.particles_count / rings;

        for ring in 0..rings {
            // The outermost ring takes the remainder
            let size = if ring + 1 == rings {
                self.particles_count - per_ring * (rings - 1)
            } else {
                per_ring
            };
            let speed = rng.gen_range(RING_SPEED_JITTER.0..RING_SPEED_JITTER.1)
                * RING_BASE_SPEED
                * (ring + 1) as f64;
            let lifetime = ring_lifetime(ring);
            let radius = self.radius.saturating_sub(ring);

            for slot in 0..size {
                let angle = slot as f64 / size as f64 * TAU;
                let particle = self
                    .spark((speed * angle.cos(), speed * angle.sin()), self.color, radius, lifetime)
                    .with_gravity(RING_GRAVITY);
                self.particles.push(particle);
            }
        }
    }

    fn detonate_willow<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for _ in 0..self.particles_count {
            let (vx, vy) = random_velocity(rng, SPEED_RANGE);
            let lifetime = rng.gen_range(WILLOW_LIFETIME_RANGE.0..=WILLOW_LIFETIME_RANGE.1);
            let particle = self
                .spark((vx, vy - WILLOW_LIFT), self.color, self.radius, lifetime)
                .with_gravity(WILLOW_GRAVITY);
            self.particles.push(particle);
        }
    }

    fn detonate_twinkle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for _ in 0..self.particles_count {
            let velocity = random_velocity(rng, SPEED_RANGE);
            let lifetime = rng.gen_range(TWINKLE_LIFETIME_RANGE.0..=TWINKLE_LIFETIME_RANGE.1);
            let twinkle = Twinkle {
                phase: rng.gen_range(0.0..TAU),
                rate: rng.gen_range(TWINKLE_RATE_RANGE.0..TWINKLE_RATE_RANGE.1),
            };
            let particle =
                self.spark(velocity, self.color, self.radius, lifetime).with_twinkle(twinkle);
            self.particles.push(particle);
        }
    }

    /// Draw every live particle.
    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S) {
        for particle in &self.particles {
            particle.draw(surface);
        }
    }

    pub fn state(&self) -> FireworkState {
        self.state
    }

    pub fn is_detonated(&self) -> bool {
        self.state != FireworkState::Undetonated
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn origin(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn particles_count(&self) -> u32 {
        self.particles_count
    }

    pub fn radius(&self) -> u32 {
        self.radius
    }

    pub fn kind(&self) -> BurstKind {
        self.kind
    }
}

/// Uniform direction with a speed drawn from the half-open `range`.
fn random_velocity<R: Rng + ?Sized>(rng: &mut R, range: (f64, f64)) -> (f64, f64) {
    let angle = rng.gen_range(0.0..TAU);
    let speed = rng.gen_range(range.0..range.1);
    (speed * angle.cos(), speed * angle.sin())
}

/// Lifetime of ring `index` (0 = innermost).
fn ring_lifetime(index: u32) -> u32 {
    RING_LIFETIME * (10 - index.min(9)) / 10
}

/// Shift every channel of `color` by up to [`PEONY_COLOR_JITTER`].
fn jitter_color<R: Rng + ?Sized>(color: Color, rng: &mut R) -> Color {
    color.map(|c| {
        let shift = rng.gen_range(-PEONY_COLOR_JITTER..=PEONY_COLOR_JITTER);
        (c as i16 + shift).clamp(0, 255) as u8
    })
}

/// Pick a colour with every channel uniform in [`COLOR_CHANNEL_RANGE`].
pub fn random_color<R: Rng + ?Sized>(rng: &mut R) -> Color {
    let (lo, hi) = COLOR_CHANNEL_RANGE;
    [rng.gen_range(lo..=hi), rng.gen_range(lo..=hi), rng.gen_range(lo..=hi)]
}
