//! Marriage pop effects: quadrant bursts and a continuous edge emitter

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::engine::{Behavior, ParticleSystem, World};
use super::particle::{Particle, Payload, PopKind};
use crate::color;
use crate::consts::*;
use crate::error::Result;
use crate::render::{Sprite, SpriteShape, Surface};

/// Edge clusters spawn this far outside the surface (px)
const EDGE_OFFSET: f32 = 10.0;

/// Delayed pop emissions
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PopEvent {
    /// Radial burst of `count` particles at a fixed point
    Burst { at: Vec2, count: usize },
    /// Small cluster entering from a random edge
    Cluster,
}

/// Screen edge a cluster enters from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

/// Pop effect rules
#[derive(Debug, Clone, Copy, Default)]
pub struct Pop;

pub type MarriagePopEffects<S> = ParticleSystem<S, Pop>;

impl PopKind {
    /// 60% rect confetti, 30% circle confetti, 10% sparkle
    fn roll(world: &mut World<'_, PopEvent>) -> Self {
        let r = world.unit();
        if r < 0.6 {
            PopKind::ConfettiRect
        } else if r < 0.9 {
            PopKind::ConfettiCircle
        } else {
            PopKind::Sparkle
        }
    }

    fn size(self, world: &mut World<'_, PopEvent>) -> f32 {
        match self {
            PopKind::ConfettiRect => world.range(3.0, 9.0),
            PopKind::ConfettiCircle => world.range(2.0, 7.0),
            PopKind::Sparkle => world.range(1.0, 4.0),
        }
    }

    fn gravity(self, world: &mut World<'_, PopEvent>) -> f32 {
        match self {
            PopKind::ConfettiRect => world.range(0.15, 0.25),
            PopKind::ConfettiCircle => world.range(0.18, 0.30),
            PopKind::Sparkle => world.range(0.02, 0.05),
        }
    }
}

impl Pop {
    fn piece(&self, pos: Vec2, vel: Vec2, world: &mut World<'_, PopEvent>) -> Particle {
        let kind = PopKind::roll(world);
        let glow = world.range(0.3, 0.8);
        let mut p = Particle::new(pos, vel, world.color(), Payload::Pop { kind, glow });
        p.rotation = world.range(0.0, 360.0);
        p.rotation_speed = world.range(-7.5, 7.5);
        p.size = kind.size(world);
        p.gravity = kind.gravity(world);
        p.friction = world.range(0.97, 0.99);
        p.decay = world.range(0.006, 0.012);
        p
    }

    /// Four quadrant bursts, 200ms apart
    pub fn celebration_burst(&self, world: &mut World<'_, PopEvent>) {
        let (w, h) = (world.width, world.height);
        let spots = [
            Vec2::new(w * 0.3, h * 0.3),
            Vec2::new(w * 0.7, h * 0.3),
            Vec2::new(w * 0.3, h * 0.7),
            Vec2::new(w * 0.7, h * 0.7),
        ];
        for (i, at) in spots.into_iter().enumerate() {
            world.schedule(
                i as f64 * POP_BURST_STAGGER_MS,
                PopEvent::Burst {
                    at,
                    count: POP_BURST_COUNT,
                },
            );
        }
    }

    /// Edge clusters every 400ms until `duration_ms` has elapsed
    pub fn continuous_celebration(&self, duration_ms: f64, world: &mut World<'_, PopEvent>) -> usize {
        let mut scheduled = 0;
        let mut at = POP_INTERVAL_MS;
        while at < duration_ms {
            world.schedule(at, PopEvent::Cluster);
            scheduled += 1;
            at += POP_INTERVAL_MS;
        }
        scheduled
    }

    /// Radial burst with a small upward kick
    pub fn burst_at(&self, at: Vec2, count: usize, world: &mut World<'_, PopEvent>) {
        for _ in 0..count {
            let angle = world.range(0.0, TAU);
            let speed = world.range(4.0, 19.0);
            let spread = world.range(0.8, 1.8);
            let lift = world.range(0.0, 4.0);
            let vel = Vec2::from_angle(angle) * speed * spread - Vec2::new(0.0, lift);
            let p = self.piece(at, vel, world);
            world.spawn(p);
        }
    }

    /// Cluster entering from a random edge with inward velocity
    pub fn cluster(&self, world: &mut World<'_, PopEvent>) {
        let edge = match world.rng.random_range(0..4) {
            0 => Edge::Top,
            1 => Edge::Right,
            2 => Edge::Bottom,
            _ => Edge::Left,
        };
        let (w, h) = (world.width, world.height);
        let across = world.range(-3.0, 3.0);
        let inward = world.range(2.0, 7.0);
        let (pos, vel) = match edge {
            Edge::Top => (Vec2::new(world.range(0.0, w), -EDGE_OFFSET), Vec2::new(across, inward)),
            Edge::Right => (Vec2::new(w + EDGE_OFFSET, world.range(0.0, h)), Vec2::new(-inward, across)),
            Edge::Bottom => (Vec2::new(world.range(0.0, w), h + EDGE_OFFSET), Vec2::new(across, -inward)),
            Edge::Left => (Vec2::new(-EDGE_OFFSET, world.range(0.0, h)), Vec2::new(inward, across)),
        };
        for _ in 0..POP_CLUSTER_COUNT {
            let p = self.piece(pos, vel, world);
            world.spawn(p);
        }
    }
}

impl Behavior for Pop {
    type Event = PopEvent;

    fn update(&self, p: &mut Particle, world: &mut World<'_, PopEvent>) -> bool {
        p.integrate();
        p.spin();
        let alive = p.age();
        let m = POP_CULL_MARGIN;
        let inside = p.pos.x > -m
            && p.pos.x < world.width + m
            && p.pos.y > -m
            && p.pos.y < world.height + m;
        alive && inside
    }

    fn sprite(&self, p: &Particle, rng: &mut Pcg32) -> Sprite {
        let (kind, glow) = match p.payload {
            Payload::Pop { kind, glow } => (kind, glow),
            _ => (PopKind::ConfettiCircle, 0.0),
        };
        let shape = match kind {
            PopKind::ConfettiRect => SpriteShape::Rect {
                width: p.size,
                height: p.size / 2.0,
                offset: Vec2::new(-p.size / 2.0, -p.size / 4.0),
            },
            PopKind::ConfettiCircle => SpriteShape::Circle { radius: p.size / 2.0 },
            PopKind::Sparkle => SpriteShape::Cross { size: p.size },
        };
        // only some particles glow on a given frame, which reads as twinkling
        let glow = if rng.random_bool(0.3) {
            p.size * glow * p.alpha
        } else {
            0.0
        };
        Sprite::new(shape, p.pos, p.color)
            .rotated(p.rotation)
            .with_alpha(p.alpha)
            .with_glow(glow)
    }

    fn fire(&self, event: PopEvent, world: &mut World<'_, PopEvent>) {
        match event {
            PopEvent::Burst { at, count } => self.burst_at(at, count, world),
            PopEvent::Cluster => self.cluster(world),
        }
    }

    fn frame_interval_ms(&self) -> Option<f64> {
        Some(1000.0 / POP_TICK_RATE)
    }
}

impl<S: Surface> ParticleSystem<S, Pop> {
    /// Pop effects with the warm marriage palette
    pub fn marriage(surface: S) -> Result<Self> {
        Self::new(surface, color::marriage(), Pop)
    }

    /// Schedule the four staggered quadrant bursts
    pub fn celebration_burst(&mut self) {
        self.with_world(|pop, world| pop.celebration_burst(world));
    }

    /// Schedule edge clusters for `duration_ms`
    pub fn continuous_celebration(&mut self, duration_ms: f64) {
        let n = self.with_world(|pop, world| pop.continuous_celebration(duration_ms, world));
        log::debug!("pop: {} clusters over {}ms", n, duration_ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RecordingSurface;

    fn pop() -> MarriagePopEffects<RecordingSurface> {
        MarriagePopEffects::marriage(RecordingSurface::new(800.0, 600.0))
            .unwrap()
            .with_seed(3)
    }

    #[test]
    fn test_bursts_are_staggered() {
        let mut sys = pop();
        sys.celebration_burst();
        assert_eq!(sys.pending_events(), 4);

        sys.tick(0.0);
        assert_eq!(sys.particles().len(), POP_BURST_COUNT);
        sys.tick(100.0);
        assert_eq!(sys.pending_events(), 3);
        sys.tick(200.0);
        assert_eq!(sys.pending_events(), 2);
        sys.tick(600.0);
        assert_eq!(sys.pending_events(), 0);
    }

    #[test]
    fn test_continuous_stops_at_deadline() {
        let mut sys = pop();
        sys.continuous_celebration(5000.0);
        assert_eq!(sys.pending_events(), 12);

        let mut now = 0.0;
        let mut last_growth = 0.0;
        let mut prev_len = 0;
        while now < 8000.0 {
            sys.tick(now);
            if sys.particles().len() > prev_len {
                last_growth = now;
            }
            prev_len = sys.particles().len();
            now += 16.0;
        }
        assert!(last_growth < 5000.0);
        assert_eq!(sys.pending_events(), 0);
    }

    #[test]
    fn test_throttled_to_thirty_hz() {
        let mut sys = pop();
        let mut p = Particle::new(
            Vec2::new(400.0, 300.0),
            Vec2::ZERO,
            color::marriage()[0],
            Payload::Pop {
                kind: PopKind::ConfettiCircle,
                glow: 0.5,
            },
        );
        p.decay = 0.001;
        sys.with_world(|_, w| w.spawn(p));

        // one second of a 120Hz host
        for i in 0..120 {
            sys.tick(i as f64 * (1000.0 / 120.0));
            if !sys.has_work() {
                break;
            }
        }
        let executed = sys.surface().clear_count();
        assert!((28..=31).contains(&executed), "executed {} ticks", executed);
    }

    #[test]
    fn test_offscreen_particles_culled() {
        let mut sys = pop();
        let mut p = Particle::new(
            Vec2::new(400.0, 300.0),
            Vec2::new(200.0, 0.0),
            color::marriage()[0],
            Payload::Pop {
                kind: PopKind::Sparkle,
                glow: 0.5,
            },
        );
        p.friction = 1.0;
        p.decay = 0.001;
        sys.with_world(|_, w| w.spawn(p));

        sys.tick(0.0);
        assert_eq!(sys.particles().len(), 1);
        sys.tick(40.0);
        // x = 800, inside margin
        assert_eq!(sys.particles().len(), 1);
        sys.tick(80.0);
        // x = 1000, culled long before life runs out
        assert!(sys.particles().is_empty());
    }

    #[test]
    fn test_cluster_enters_from_edge() {
        let mut sys = pop();
        for _ in 0..20 {
            sys.with_world(|p, w| p.cluster(w));
        }
        for p in sys.particles() {
            if p.pos.y < 0.0 {
                assert!(p.vel.y > 0.0);
            } else if p.pos.x > 800.0 {
                assert!(p.vel.x < 0.0);
            } else if p.pos.y > 600.0 {
                assert!(p.vel.y < 0.0);
            } else {
                assert!(p.pos.x < 0.0);
                assert!(p.vel.x > 0.0);
            }
        }
    }
}
