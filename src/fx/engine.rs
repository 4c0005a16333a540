//! Shared particle engine
//!
//! `ParticleSystem` owns the particles, the surface and the clock. A
//! `Behavior` supplies the variant rules: how a particle moves, how it looks,
//! and what a delayed emission event does.

use glam::Vec2;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::frame_loop::Animation;
use super::particle::Particle;
use super::timeline::Timeline;
use crate::color::Rgb;
use crate::error::{FxError, Result};
use crate::render::{Sprite, Surface};

/// Per-variant rules plugged into the engine
pub trait Behavior {
    /// Delayed emission events this variant schedules on the timeline
    type Event;

    /// Advance `p` by one tick. Returns whether it survives.
    fn update(&self, p: &mut Particle, world: &mut World<'_, Self::Event>) -> bool;

    /// How `p` looks this tick
    fn sprite(&self, p: &Particle, rng: &mut Pcg32) -> Sprite;

    /// Handle a timeline event that just came due
    fn fire(&self, event: Self::Event, world: &mut World<'_, Self::Event>);

    /// Minimum wall-clock gap between executed ticks (None = every tick)
    fn frame_interval_ms(&self) -> Option<f64> {
        None
    }
}

/// What a behavior may touch while updating or emitting
pub struct World<'a, E> {
    pub width: f32,
    pub height: f32,
    pub rng: &'a mut Pcg32,
    palette: &'a [Rgb],
    timeline: &'a mut Timeline<E>,
    spawned: Vec<Particle>,
}

impl<'a, E> World<'a, E> {
    pub fn new(
        width: f32,
        height: f32,
        rng: &'a mut Pcg32,
        palette: &'a [Rgb],
        timeline: &'a mut Timeline<E>,
    ) -> Self {
        Self {
            width,
            height,
            rng,
            palette,
            timeline,
            spawned: Vec::new(),
        }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Queue a new particle; it joins the active set at the end of this call
    pub fn spawn(&mut self, p: Particle) {
        self.spawned.push(p);
    }

    /// Schedule an event `delay_ms` from now
    pub fn schedule(&mut self, delay_ms: f64, event: E) {
        self.timeline.schedule(delay_ms, event);
    }

    /// Random palette color
    pub fn color(&mut self) -> Rgb {
        self.palette.choose(&mut *self.rng).copied().unwrap_or(Rgb::BLACK)
    }

    /// Uniform in [0, 1)
    pub fn unit(&mut self) -> f32 {
        self.rng.random()
    }

    /// Uniform in [lo, hi)
    pub fn range(&mut self, lo: f32, hi: f32) -> f32 {
        lo + self.unit() * (hi - lo)
    }

    pub fn chance(&mut self, p: f64) -> bool {
        self.rng.random_bool(p.clamp(0.0, 1.0))
    }

    pub fn spawned(&self) -> &[Particle] {
        &self.spawned
    }

    pub fn into_spawned(self) -> Vec<Particle> {
        self.spawned
    }
}

/// Host-driven particle engine generic over surface and variant
pub struct ParticleSystem<S: Surface, B: Behavior> {
    surface: S,
    behavior: B,
    palette: Vec<Rgb>,
    particles: Vec<Particle>,
    timeline: Timeline<B::Event>,
    rng: Pcg32,
    limit: usize,
    /// Clock of the previous tick; None while idle
    last_tick_ms: Option<f64>,
    /// Clock of the previous executed (non-throttled) tick
    last_frame_ms: Option<f64>,
}

impl<S: Surface, B: Behavior> ParticleSystem<S, B> {
    /// Bind a surface and palette. Fails if the palette is empty.
    pub fn new(surface: S, palette: Vec<Rgb>, behavior: B) -> Result<Self> {
        if palette.is_empty() {
            return Err(FxError::EmptyPalette);
        }
        Ok(Self {
            surface,
            behavior,
            palette,
            particles: Vec::new(),
            timeline: Timeline::new(),
            rng: Pcg32::from_os_rng(),
            limit: usize::MAX,
            last_tick_ms: None,
            last_frame_ms: None,
        })
    }

    /// Use a fixed RNG seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Pcg32::seed_from_u64(seed);
        self
    }

    /// Cap the active set; emissions beyond it are dropped. Uncapped by default.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn set_limit(&mut self, limit: usize) {
        self.limit = limit;
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn palette(&self) -> &[Rgb] {
        &self.palette
    }

    /// Swap the colors used by future emissions. Live particles keep theirs.
    pub fn set_palette(&mut self, palette: Vec<Rgb>) -> Result<()> {
        if palette.is_empty() {
            return Err(FxError::EmptyPalette);
        }
        self.palette = palette;
        Ok(())
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn behavior(&self) -> &B {
        &self.behavior
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn pending_events(&self) -> usize {
        self.timeline.len()
    }

    /// Whether another tick would do anything
    pub fn has_work(&self) -> bool {
        !self.particles.is_empty() || !self.timeline.is_empty()
    }

    /// Resize the surface. Particles keep their coordinates.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.surface.resize(width, height);
    }

    /// Run `f` with a `World` view, then admit whatever it spawned
    pub fn with_world<R>(&mut self, f: impl FnOnce(&B, &mut World<'_, B::Event>) -> R) -> R {
        self.emit(f).0
    }

    /// Like `with_world`, also returning how many spawned particles were admitted
    pub fn emit<R>(&mut self, f: impl FnOnce(&B, &mut World<'_, B::Event>) -> R) -> (R, usize) {
        let (width, height) = self.surface.size();
        let mut world = World::new(
            width,
            height,
            &mut self.rng,
            &self.palette,
            &mut self.timeline,
        );
        let out = f(&self.behavior, &mut world);
        let spawned = world.into_spawned();
        let admitted = self.admit(spawned);
        (out, admitted)
    }

    /// Add spawned particles up to the cap. Returns how many joined the active set.
    fn admit(&mut self, spawned: Vec<Particle>) -> usize {
        let room = self.limit.saturating_sub(self.particles.len());
        if spawned.len() > room {
            log::debug!("particle cap {} reached, dropping {}", self.limit, spawned.len() - room);
        }
        let admitted = spawned.len().min(room);
        self.particles.extend(spawned.into_iter().take(room));
        admitted
    }

    /// Advance one frame at host time `now_ms`.
    ///
    /// Fires due timeline events, then (unless throttled) clears the surface,
    /// updates every particle, drops the dead ones and draws the survivors.
    /// Returns whether any particles or scheduled emissions remain.
    pub fn tick(&mut self, now_ms: f64) -> bool {
        let dt = self.last_tick_ms.map(|t| (now_ms - t).max(0.0)).unwrap_or(0.0);
        self.last_tick_ms = Some(now_ms);

        let due = self.timeline.advance(dt);
        if !due.is_empty() {
            self.with_world(|behavior, world| {
                for event in due {
                    behavior.fire(event, world);
                }
            });
        }

        if let Some(interval) = self.behavior.frame_interval_ms() {
            match self.last_frame_ms {
                Some(last) if now_ms - last <= interval => return self.has_work(),
                Some(last) => self.last_frame_ms = Some(now_ms - (now_ms - last) % interval),
                None => self.last_frame_ms = Some(now_ms),
            }
        }

        self.step();

        let more = self.has_work();
        if !more {
            self.last_tick_ms = None;
            self.last_frame_ms = None;
        }
        more
    }

    /// One integrate-then-draw pass, ignoring the clock
    pub fn step(&mut self) {
        self.surface.clear();

        let (width, height) = self.surface.size();
        let mut world = World::new(
            width,
            height,
            &mut self.rng,
            &self.palette,
            &mut self.timeline,
        );
        let behavior = &self.behavior;
        self.particles.retain_mut(|p| behavior.update(p, &mut world));
        let spawned = world.into_spawned();
        self.admit(spawned);

        for p in &self.particles {
            let sprite = self.behavior.sprite(p, &mut self.rng);
            self.surface.draw(&sprite);
        }
    }

    /// Drop all particles and pending emissions and clear the surface.
    /// Safe to call at any time; emissions may be issued again afterwards.
    pub fn stop(&mut self) {
        self.particles.clear();
        self.timeline.clear();
        self.last_tick_ms = None;
        self.last_frame_ms = None;
        self.surface.clear();
    }
}

impl<S: Surface, B: Behavior> Animation for ParticleSystem<S, B> {
    fn tick(&mut self, now_ms: f64) -> bool {
        ParticleSystem::tick(self, now_ms)
    }

    fn halt(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fx::particle::Payload;
    use crate::render::{RecordingSurface, SpriteShape};

    /// Falls straight down, dies after `ticks` ticks, re-emits one on event
    struct Dropper;

    impl Behavior for Dropper {
        type Event = u32;

        fn update(&self, p: &mut Particle, _world: &mut World<'_, u32>) -> bool {
            p.integrate();
            p.age()
        }

        fn sprite(&self, p: &Particle, _rng: &mut Pcg32) -> Sprite {
            Sprite::new(SpriteShape::Circle { radius: p.size }, p.pos, p.color).with_alpha(p.alpha)
        }

        fn fire(&self, count: u32, world: &mut World<'_, u32>) {
            for _ in 0..count {
                let mut p = Particle::new(world.center(), Vec2::ZERO, Rgb::BLACK, Payload::Spark);
                p.decay = 0.5;
                world.spawn(p);
            }
        }
    }

    fn system() -> ParticleSystem<RecordingSurface, Dropper> {
        ParticleSystem::new(RecordingSurface::new(100.0, 100.0), vec![Rgb::BLACK], Dropper)
            .unwrap()
            .with_seed(1)
    }

    #[test]
    fn test_empty_palette_rejected() {
        let res = ParticleSystem::new(RecordingSurface::new(1.0, 1.0), vec![], Dropper);
        assert!(matches!(res, Err(FxError::EmptyPalette)));
    }

    #[test]
    fn test_set_palette_swaps_colors() {
        let mut sys = system();
        let red = Rgb::new(255, 0, 0);
        sys.set_palette(vec![red]).unwrap();
        assert_eq!(sys.with_world(|_, w| w.color()), red);
        assert_eq!(sys.set_palette(Vec::new()), Err(FxError::EmptyPalette));
        assert_eq!(sys.palette(), &[red]);
    }

    #[test]
    fn test_loop_stops_when_empty() {
        let mut sys = system();
        sys.with_world(|b, w| b.fire(2, w));
        assert_eq!(sys.particles().len(), 2);

        // life 1.0 -> 0.5 -> 0.0
        assert!(sys.tick(0.0));
        assert_eq!(sys.surface().visible_count(), 2);
        assert!(!sys.tick(16.0));
        assert!(sys.particles().is_empty());
        assert_eq!(sys.surface().visible_count(), 0);
    }

    #[test]
    fn test_empty_tick_terminates_immediately() {
        let mut sys = system();
        assert!(!sys.tick(0.0));
        assert_eq!(sys.surface().clear_count(), 1);
    }

    #[test]
    fn test_pending_events_keep_loop_alive() {
        let mut sys = system();
        sys.with_world(|_, w| w.schedule(100.0, 3));

        assert!(sys.tick(0.0));
        assert!(sys.particles().is_empty());
        assert!(sys.tick(50.0));
        assert!(sys.particles().is_empty());
        assert!(sys.tick(100.0));
        assert_eq!(sys.particles().len(), 3);
        assert_eq!(sys.pending_events(), 0);
    }

    #[test]
    fn test_limit_drops_excess() {
        let mut sys = system().with_limit(5);
        let ((), admitted) = sys.emit(|b, w| b.fire(8, w));
        assert_eq!(admitted, 5);
        assert_eq!(sys.particles().len(), 5);
        let ((), admitted) = sys.emit(|b, w| b.fire(2, w));
        assert_eq!(admitted, 0);
    }

    #[test]
    fn test_uncapped_by_default() {
        let mut sys = system();
        assert_eq!(sys.limit(), usize::MAX);
        let ((), admitted) = sys.emit(|b, w| b.fire(5000, w));
        assert_eq!(admitted, 5000);
        assert_eq!(sys.particles().len(), 5000);
    }

    #[test]
    fn test_stop_is_idempotent_and_reusable() {
        let mut sys = system();
        sys.stop();
        sys.with_world(|b, w| {
            b.fire(4, w);
            w.schedule(500.0, 1);
        });
        sys.tick(0.0);
        sys.stop();
        sys.stop();
        assert!(!sys.has_work());
        assert_eq!(sys.surface().visible_count(), 0);

        sys.with_world(|b, w| b.fire(1, w));
        assert!(sys.tick(1000.0));
        assert_eq!(sys.particles().len(), 1);
    }

    #[test]
    fn test_resize_keeps_positions() {
        let mut sys = system();
        sys.with_world(|b, w| b.fire(1, w));
        let before = sys.particles()[0].pos;
        sys.resize(400.0, 300.0);
        assert_eq!(sys.particles()[0].pos, before);
        assert_eq!(sys.surface().size(), (400.0, 300.0));
    }
}
