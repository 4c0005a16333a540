//! Corner-and-center confetti explosion

use std::convert::Infallible;
use std::f32::consts::TAU;

use glam::Vec2;
use rand_pcg::Pcg32;

use super::engine::{Behavior, ParticleSystem, World};
use super::particle::{ConfettiShape, Particle, Payload};
use crate::consts::*;
use crate::render::{Sprite, SpriteShape, Surface};

/// Confetti rules
#[derive(Debug, Clone, Copy, Default)]
pub struct Confetti;

pub type ConfettiSystem<S> = ParticleSystem<S, Confetti>;

impl Confetti {
    fn piece(&self, pos: Vec2, vel: Vec2, world: &mut World<'_, Infallible>) -> Particle {
        let shape = if world.chance(0.5) {
            ConfettiShape::Rect
        } else {
            ConfettiShape::Circle
        };
        let glow = world.range(0.5, 1.0);
        let mut p = Particle::new(pos, vel, world.color(), Payload::Confetti { shape, glow });
        p.rotation = world.range(0.0, 360.0);
        p.rotation_speed = world.range(-10.0, 10.0);
        p.size = world.range(3.0, 11.0);
        p.gravity = world.range(0.2, 0.4);
        p.friction = CONFETTI_FRICTION;
        p.decay = world.range(0.008, 0.012);
        p
    }

    /// Emit from the four corners toward the center, plus a radial burst
    /// from the center. Returns the number of particles emitted.
    pub fn explode(&self, world: &mut World<'_, Infallible>) -> usize {
        if world.width <= 0.0 || world.height <= 0.0 {
            log::debug!("confetti: zero-area surface, nothing to emit");
            return 0;
        }

        let center = world.center();
        let corners = [
            Vec2::ZERO,
            Vec2::new(world.width, 0.0),
            Vec2::new(0.0, world.height),
            Vec2::new(world.width, world.height),
        ];

        for corner in corners {
            let to_center = center - corner;
            let base = to_center.y.atan2(to_center.x);
            for _ in 0..CONFETTI_CORNER_COUNT / 4 {
                let angle = base + world.range(-0.5, 0.5) * CONFETTI_SPREAD;
                let speed = world.range(8.0, 23.0);
                let p = self.piece(corner, Vec2::from_angle(angle) * speed, world);
                world.spawn(p);
            }
        }

        for _ in 0..CONFETTI_CENTER_COUNT {
            let angle = world.range(0.0, TAU);
            let speed = world.range(5.0, 17.0);
            let p = self.piece(center, Vec2::from_angle(angle) * speed, world);
            world.spawn(p);
        }

        world.spawned().len()
    }
}

impl Behavior for Confetti {
    type Event = Infallible;

    fn update(&self, p: &mut Particle, _world: &mut World<'_, Infallible>) -> bool {
        p.integrate();
        p.spin();
        p.age()
    }

    fn sprite(&self, p: &Particle, _rng: &mut Pcg32) -> Sprite {
        let (shape, glow) = match p.payload {
            Payload::Confetti {
                shape: ConfettiShape::Rect,
                glow,
            } => (
                SpriteShape::Rect {
                    width: p.size,
                    height: p.size / 2.0,
                    offset: Vec2::splat(-p.size / 2.0),
                },
                glow,
            ),
            Payload::Confetti { glow, .. } => (SpriteShape::Circle { radius: p.size / 2.0 }, glow),
            _ => (SpriteShape::Circle { radius: p.size / 2.0 }, 0.0),
        };
        Sprite::new(shape, p.pos, p.color)
            .rotated(p.rotation)
            .with_alpha(p.alpha)
            .with_glow(p.size * glow * p.alpha)
    }

    fn fire(&self, event: Infallible, _world: &mut World<'_, Infallible>) {
        match event {}
    }
}

impl<S: Surface> ParticleSystem<S, Confetti> {
    /// Fire one confetti explosion sized to the current surface.
    /// Returns the number of particles that joined the active set.
    pub fn explode(&mut self) -> usize {
        let (emitted, admitted) = self.emit(|confetti, world| confetti.explode(world));
        if admitted < emitted {
            log::debug!("confetti: {} of {} particles over the cap", emitted - admitted, emitted);
        }
        log::debug!("confetti: exploded {} particles", admitted);
        admitted
    }
}
