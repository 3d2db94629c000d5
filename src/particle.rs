//! A single spark of a firework burst.
//!
//! Particles are point masses integrated once per frame: gravity is added to
//! the vertical velocity first, then the position advances by the updated
//! velocity, then one tick of life is spent. Drawing fades the colour
//! linearly with the remaining life, and twinkling particles are further
//! dimmed by a sine wave that advances every tick.

use crate::surface::{fade, Color, Surface};

/// Downward acceleration applied to every particle, in pixels per tick².
pub const GRAVITY: f64 = 0.1;

/// A live particle instance during simulation.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    /// Current X position (sub-pixel precision)
    x: f64,
    /// Current Y position (sub-pixel precision, grows downward)
    y: f64,
    /// X velocity (pixels per tick)
    vx: f64,
    /// Y velocity (pixels per tick)
    vy: f64,
    color: Color,
    /// Disk radius used when drawing
    radius: u32,
    /// Ticks left before the particle is discarded
    remaining_life: u32,
    /// Lifetime at creation, the fade denominator
    lifetime: u32,
    gravity: f64,
    twinkle: Option<Twinkle>,
}

/// Brightness oscillation of a twinkling particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Twinkle {
    /// Current phase in radians
    pub phase: f64,
    /// Phase advance per tick, in radians
    pub rate: f64,
}

impl Twinkle {
    /// Brightness multiplier in `[0, 1]`.
    pub fn brightness(&self) -> f64 {
        self.phase.sin() * 0.5 + 0.5
    }
}

impl Particle {
    /// Create a particle at `position` moving with `velocity`.
    ///
    /// `lifetime` is raised to 1 if zero so the fade ratio stays defined.
    pub fn new(
        position: (f64, f64),
        velocity: (f64, f64),
        color: Color,
        radius: u32,
        lifetime: u32,
    ) -> Self {
        let lifetime = lifetime.max(1);
        Self {
            x: position.0,
            y: position.1,
            vx: velocity.0,
            vy: velocity.1,
            color,
            radius,
            remaining_life: lifetime,
            lifetime,
            gravity: GRAVITY,
            twinkle: None,
        }
    }

    /// Replace the downward acceleration.
    pub fn with_gravity(mut self, gravity: f64) -> Self {
        self.gravity = gravity;
        self
    }

    /// Make the particle twinkle.
    pub fn with_twinkle(mut self, twinkle: Twinkle) -> Self {
        self.twinkle = Some(twinkle);
        self
    }

    /// Advance one tick. Returns whether the particle is still alive.
    pub fn update(&mut self) -> bool {
        self.vy += self.gravity;
        self.x += self.vx;
        self.y += self.vy;
        self.remaining_life = self.remaining_life.saturating_sub(1);
        if let Some(twinkle) = &mut self.twinkle {
            twinkle.phase += twinkle.rate;
        }
        self.is_alive()
    }

    /// Draw the particle as a faded disk at its integer position.
    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S) {
        let mut color = fade(self.color, self.remaining_life, self.lifetime);
        if let Some(twinkle) = &self.twinkle {
            let brightness = twinkle.brightness();
            color = color.map(|c| (c as f64 * brightness) as u8);
        }
        surface.fill_disk(to_pixel(self.x), to_pixel(self.y), self.radius, color);
    }

    pub fn is_alive(&self) -> bool {
        self.remaining_life > 0
    }

    pub fn position(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    pub fn velocity(&self) -> (f64, f64) {
        (self.vx, self.vy)
    }

    /// Speed in pixels per tick.
    pub fn speed(&self) -> f64 {
        self.vx.hypot(self.vy)
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn radius(&self) -> u32 {
        self.radius
    }

    pub fn remaining_life(&self) -> u32 {
        self.remaining_life
    }

    pub fn lifetime(&self) -> u32 {
        self.lifetime
    }

    pub fn gravity(&self) -> f64 {
        self.gravity
    }

    pub fn twinkle(&self) -> Option<Twinkle> {
        self.twinkle
    }
}

/// Truncate a sub-pixel coordinate toward zero, saturating far-off values.
fn to_pixel(v: f64) -> i32 {
    v.trunc() as i32
}
