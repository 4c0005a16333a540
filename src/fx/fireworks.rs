//! Two-phase fireworks: accelerating rockets that burst into sparks

use std::f32::consts::TAU;

use glam::Vec2;
use rand_pcg::Pcg32;

use super::engine::{Behavior, ParticleSystem, World};
use super::particle::{Particle, Payload};
use crate::color::Rgb;
use crate::consts::*;
use crate::render::{Sprite, SpriteShape, Surface};

/// Rocket radius (px)
const ROCKET_SIZE: f32 = 3.0;

/// Delayed fireworks emissions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireworksEvent {
    /// Spawn one rocket at the bottom edge
    Rocket,
}

/// Fireworks rules
#[derive(Debug, Clone, Copy)]
pub struct Fireworks {
    /// Rockets per `launch`
    pub rockets: usize,
    /// Sparks per explosion
    pub sparks: usize,
}

impl Default for Fireworks {
    fn default() -> Self {
        Self {
            rockets: ROCKET_COUNT,
            sparks: EXPLOSION_COUNT,
        }
    }
}

pub type FireworksSystem<S> = ParticleSystem<S, Fireworks>;

impl Fireworks {
    /// Schedule rocket spawns at independent random delays over the launch window
    pub fn launch(&self, world: &mut World<'_, FireworksEvent>) {
        for _ in 0..self.rockets {
            let delay = world.unit() as f64 * LAUNCH_WINDOW_MS;
            world.schedule(delay, FireworksEvent::Rocket);
        }
    }

    fn rocket(&self, world: &mut World<'_, FireworksEvent>) -> Particle {
        let x = world.width * world.range(0.1, 0.9);
        let target_y = world.height * world.range(0.1, 0.5);
        let speed = world.range(2.0, 4.0);
        let mut p = Particle::new(
            Vec2::new(x, world.height),
            Vec2::ZERO,
            world.color(),
            Payload::Rocket { target_y, speed },
        );
        p.size = ROCKET_SIZE;
        p
    }

    /// Burst `sparks` particles radially from `at`
    pub fn explode(&self, at: Vec2, color: Rgb, world: &mut World<'_, FireworksEvent>) {
        for _ in 0..self.sparks {
            let angle = world.range(0.0, TAU);
            let speed = world.range(3.0, 13.0);
            let spark_color = if world.chance(EXPLOSION_OWN_COLOR) {
                color
            } else {
                world.color()
            };
            let mut p = Particle::new(at, Vec2::from_angle(angle) * speed, spark_color, Payload::Spark);
            p.size = world.range(1.0, 5.0);
            p.gravity = EXPLOSION_GRAVITY;
            p.friction = EXPLOSION_FRICTION;
            p.decay = world.range(0.012, 0.02);
            world.spawn(p);
        }
    }
}

impl Behavior for Fireworks {
    type Event = FireworksEvent;

    fn update(&self, p: &mut Particle, world: &mut World<'_, FireworksEvent>) -> bool {
        match &mut p.payload {
            Payload::Rocket { target_y, speed } => {
                p.pos.y -= *speed;
                *speed *= ROCKET_ACCEL;
                if p.pos.y <= *target_y {
                    self.explode(p.pos, p.color, world);
                    return false;
                }
                true
            }
            _ => {
                p.integrate();
                p.age()
            }
        }
    }

    fn sprite(&self, p: &Particle, _rng: &mut Pcg32) -> Sprite {
        let radius = match p.payload {
            Payload::Rocket { .. } => ROCKET_SIZE,
            _ => p.size,
        };
        Sprite::new(SpriteShape::Circle { radius }, p.pos, p.color)
            .with_alpha(p.alpha)
            .with_glow(p.size * 2.0)
    }

    fn fire(&self, event: FireworksEvent, world: &mut World<'_, FireworksEvent>) {
        match event {
            FireworksEvent::Rocket => {
                let rocket = self.rocket(world);
                world.spawn(rocket);
            }
        }
    }
}

impl<S: Surface> ParticleSystem<S, Fireworks> {
    /// Schedule a staggered volley of rockets
    pub fn launch(&mut self) {
        self.with_world(|fireworks, world| fireworks.launch(world));
        log::debug!("fireworks: {} rockets scheduled", self.pending_events());
    }

    pub fn rockets(&self) -> usize {
        self.particles()
            .iter()
            .filter(|p| matches!(p.payload, Payload::Rocket { .. }))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color;
    use crate::render::RecordingSurface;

    fn fireworks() -> FireworksSystem<RecordingSurface> {
        FireworksSystem::new(
            RecordingSurface::new(800.0, 600.0),
            color::celebration(),
            Fireworks::default(),
        )
        .unwrap()
        .with_seed(7)
    }

    #[test]
    fn test_launch_is_staggered_within_window() {
        let mut sys = fireworks();
        sys.launch();
        assert_eq!(sys.pending_events(), ROCKET_COUNT);
        assert!(sys.particles().is_empty());

        let mut remaining = sys.pending_events();
        let mut spawn_times = Vec::new();
        let mut now = 0.0;
        while now <= LAUNCH_WINDOW_MS + 16.0 {
            sys.tick(now);
            if sys.pending_events() < remaining {
                spawn_times.push(now);
                remaining = sys.pending_events();
            }
            now += 16.0;
        }
        assert_eq!(sys.pending_events(), 0);
        assert!(spawn_times.len() > 1, "rockets should not all spawn together");
    }

    #[test]
    fn test_rocket_accelerates_then_explodes_once() {
        let mut sys = fireworks();
        sys.with_world(|fw, w| fw.fire(FireworksEvent::Rocket, w));
        assert_eq!(sys.rockets(), 1);
        let start_y = sys.particles()[0].pos.y;
        assert_eq!(start_y, 600.0);

        let mut last_step = 0.0;
        let mut prev_y = start_y;
        let mut ticks = 0;
        while sys.rockets() == 1 {
            sys.tick(ticks as f64 * 16.0);
            ticks += 1;
            if sys.rockets() == 1 {
                let y = sys.particles()[0].pos.y;
                let step = prev_y - y;
                assert!(step > last_step, "ascent must accelerate");
                last_step = step;
                prev_y = y;
            }
            assert!(ticks < 1000);
        }

        // the tick that removed the rocket added exactly one explosion
        assert_eq!(sys.particles().len(), EXPLOSION_COUNT);
        assert!(sys.particles().iter().all(|p| p.payload == Payload::Spark));

        sys.tick(ticks as f64 * 16.0);
        assert!(sys.particles().len() <= EXPLOSION_COUNT);
        assert_eq!(sys.rockets(), 0);
    }

    #[test]
    fn test_explosion_colors_mostly_inherit() {
        let mut sys = fireworks();
        let own = Rgb::new(1, 2, 3);
        sys.with_world(|fw, w| fw.explode(Vec2::new(10.0, 10.0), own, w));
        let inherited = sys.particles().iter().filter(|p| p.color == own).count();
        assert!(inherited > EXPLOSION_COUNT * 3 / 4);
        assert!(sys.particles().iter().all(|p| p.pos == Vec2::new(10.0, 10.0)));
    }

    #[test]
    fn test_double_volley_keeps_every_spark() {
        let mut sys = fireworks();
        for i in 0..ROCKET_COUNT * 2 {
            let ((), admitted) =
                sys.emit(|fw, w| fw.explode(Vec2::new(400.0, 200.0), Rgb::BLACK, w));
            assert_eq!(admitted, EXPLOSION_COUNT, "explosion {} lost sparks", i);
        }
        assert_eq!(sys.particles().len(), ROCKET_COUNT * 2 * EXPLOSION_COUNT);
    }

    #[test]
    fn test_sparks_burn_out() {
        let mut sys = fireworks();
        sys.with_world(|fw, w| fw.explode(Vec2::new(400.0, 300.0), Rgb::BLACK, w));
        let mut ticks = 0;
        while sys.tick(ticks as f64 * 16.0) {
            ticks += 1;
            assert!(ticks <= 90);
        }
    }
}
