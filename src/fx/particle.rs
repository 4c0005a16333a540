//! Particle record shared by every burst effect

use glam::Vec2;

use crate::color::Rgb;
use crate::consts::SPIN_DAMPING;

/// Confetti piece shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfettiShape {
    Rect,
    Circle,
}

/// Pop effect particle kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopKind {
    ConfettiRect,
    ConfettiCircle,
    /// Near-weightless twinkle drawn as a cross
    Sparkle,
}

/// Variant-specific particle data
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Payload {
    Confetti { shape: ConfettiShape, glow: f32 },
    /// Climbing firework; explodes once `pos.y <= target_y`
    Rocket { target_y: f32, speed: f32 },
    /// Firework explosion fragment
    Spark,
    Pop { kind: PopKind, glow: f32 },
}

/// One simulated element. Position and velocity are in surface pixels (per tick).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Degrees
    pub rotation: f32,
    pub rotation_speed: f32,
    pub size: f32,
    pub color: Rgb,
    /// Always `max(0, life)`
    pub alpha: f32,
    /// Added to `vel.y` every tick
    pub gravity: f32,
    /// Velocity multiplier per tick, in (0, 1]
    pub friction: f32,
    /// 1 at birth, removed at or below 0
    pub life: f32,
    /// Subtracted from `life` every tick
    pub decay: f32,
    pub payload: Payload,
}

impl Particle {
    pub fn new(pos: Vec2, vel: Vec2, color: Rgb, payload: Payload) -> Self {
        Self {
            pos,
            vel,
            rotation: 0.0,
            rotation_speed: 0.0,
            size: 1.0,
            color,
            alpha: 1.0,
            gravity: 0.0,
            friction: 1.0,
            life: 1.0,
            decay: 0.0,
            payload,
        }
    }

    /// Projectile step: move, fall, then damp both axes
    pub fn integrate(&mut self) {
        self.pos += self.vel;
        self.vel.y += self.gravity;
        self.vel *= self.friction;
    }

    /// Rotate, with the spin itself slowly dying out
    pub fn spin(&mut self) {
        self.rotation += self.rotation_speed;
        self.rotation_speed *= SPIN_DAMPING;
    }

    /// Burn one tick of life. Returns whether the particle is still alive.
    pub fn age(&mut self) -> bool {
        self.life -= self.decay.max(0.0);
        self.alpha = self.life.max(0.0);
        self.life > 0.0
    }
}
