//! Timed choreography of effects and sound cues
//!
//! The page reveal runs as a list of `Cue`s on a `Timeline`: a matrix
//! backdrop for a few seconds, then waves of confetti. `Show` owns one engine
//! per layer and plays the choreography against them.

use crate::audio::{AudioBackend, SoundCue, SoundSystem};
use crate::color;
use crate::error::Result;
use crate::fx::{
    Animation, ConfettiSystem, Fireworks, FireworksSystem, MarriagePopEffects, MatrixRain,
    ParticleSystem, Timeline,
};
use crate::render::Surface;
use crate::settings::Settings;

/// How long the matrix backdrop runs (ms)
pub const MATRIX_INTRO_MS: f64 = 3500.0;
/// Offsets of the confetti waves (ms)
pub const CONFETTI_WAVES_MS: [f64; 3] = [500.0, 2000.0, 3500.0];
/// Continuous pop duration during a grand celebration (ms)
pub const GRAND_POP_MS: f64 = 7000.0;

/// One step of a choreography
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cue {
    StartMatrix,
    StopMatrix,
    Confetti,
    PopBurst,
    ContinuousPop { duration_ms: f64 },
    Fireworks,
    Sound(SoundCue),
}

/// Cue list advanced by the host clock
#[derive(Debug, Clone, Default)]
pub struct Choreography {
    timeline: Timeline<Cue>,
    last_ms: Option<f64>,
    reduced_motion: bool,
}

impl Choreography {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            reduced_motion: settings.reduced_motion,
            ..Self::default()
        }
    }

    pub fn reduced_motion(&self) -> bool {
        self.reduced_motion
    }

    pub fn set_reduced_motion(&mut self, reduced: bool) {
        self.reduced_motion = reduced;
    }

    pub fn schedule(&mut self, delay_ms: f64, cue: Cue) {
        self.timeline.schedule(delay_ms, cue);
    }

    /// Matrix backdrop that stops on its own. Skipped under reduced motion.
    pub fn matrix_intro(&mut self) {
        if self.reduced_motion {
            log::debug!("reduced motion: skipping matrix intro");
            return;
        }
        self.schedule(0.0, Cue::StartMatrix);
        self.schedule(MATRIX_INTRO_MS, Cue::StopMatrix);
    }

    /// Three confetti waves, each with its crackle
    pub fn celebration(&mut self) {
        for at in CONFETTI_WAVES_MS {
            self.schedule(at, Cue::Sound(SoundCue::Confetti));
            self.schedule(at, Cue::Confetti);
        }
    }

    /// Confetti waves plus pop bursts, a continuous pop emitter and fireworks
    pub fn grand_celebration(&mut self) {
        self.celebration();
        let first = CONFETTI_WAVES_MS[0];
        self.schedule(first, Cue::Sound(SoundCue::Celebration));
        self.schedule(first, Cue::Fireworks);
        self.schedule(first, Cue::Sound(SoundCue::Firework));
        if !self.reduced_motion {
            self.schedule(
                first,
                Cue::ContinuousPop {
                    duration_ms: GRAND_POP_MS,
                },
            );
        }
        for at in CONFETTI_WAVES_MS {
            self.schedule(at, Cue::PopBurst);
        }
    }

    /// Cues due at host time `now_ms`, in schedule order
    pub fn poll(&mut self, now_ms: f64) -> Vec<Cue> {
        let dt = self.last_ms.map(|t| (now_ms - t).max(0.0)).unwrap_or(0.0);
        self.last_ms = Some(now_ms);
        let due = self.timeline.advance(dt);
        if self.timeline.is_empty() {
            self.timeline.clear();
            self.last_ms = None;
        }
        due
    }

    pub fn pending(&self) -> usize {
        self.timeline.len()
    }

    pub fn is_done(&self) -> bool {
        self.timeline.is_empty()
    }

    /// Drop every cue not yet played
    pub fn cancel(&mut self) {
        self.timeline.clear();
        self.last_ms = None;
    }
}

/// One surface per effect layer, bottom to top
pub struct Layers<S> {
    pub matrix: S,
    pub fireworks: S,
    pub confetti: S,
    pub pop: S,
}

/// Every engine of the page plus the sound system, driven as one animation
pub struct Show<S: Surface, A: AudioBackend> {
    pub matrix: MatrixRain<S>,
    pub fireworks: FireworksSystem<S>,
    pub confetti: ConfettiSystem<S>,
    pub pop: MarriagePopEffects<S>,
    pub sound: SoundSystem<A>,
    choreography: Choreography,
}

impl<S: Surface, A: AudioBackend> Show<S, A> {
    pub fn new(layers: Layers<S>, audio: A, settings: &Settings) -> Result<Self> {
        let limit = settings.max_particles();
        let palette = color::celebration();
        Ok(Self {
            matrix: MatrixRain::new(layers.matrix),
            fireworks: ParticleSystem::new(layers.fireworks, palette.clone(), Fireworks::default())?
                .with_limit(limit),
            confetti: ParticleSystem::new(layers.confetti, palette, crate::fx::Confetti)?
                .with_limit(limit),
            pop: MarriagePopEffects::marriage(layers.pop)?.with_limit(limit),
            sound: SoundSystem::from_settings(audio, settings),
            choreography: Choreography::from_settings(settings),
        })
    }

    /// Reseed every engine
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.matrix = self.matrix.with_seed(seed);
        self.fireworks = self.fireworks.with_seed(seed.wrapping_add(1));
        self.confetti = self.confetti.with_seed(seed.wrapping_add(2));
        self.pop = self.pop.with_seed(seed.wrapping_add(3));
        self.sound = self.sound.with_seed(seed.wrapping_add(4));
        self
    }

    pub fn choreography(&self) -> &Choreography {
        &self.choreography
    }

    pub fn choreography_mut(&mut self) -> &mut Choreography {
        &mut self.choreography
    }

    /// Re-apply changed settings
    pub fn apply_settings(&mut self, settings: &Settings) {
        let limit = settings.max_particles();
        self.fireworks.set_limit(limit);
        self.confetti.set_limit(limit);
        self.pop.set_limit(limit);
        self.sound.apply_settings(settings);
        self.choreography.set_reduced_motion(settings.reduced_motion);
    }

    /// Recolor confetti and fireworks from hex strings. All-or-nothing.
    pub fn set_palette<T: AsRef<str>>(&mut self, hex: &[T]) -> Result<()> {
        let palette = color::palette(hex)?;
        self.fireworks.set_palette(palette.clone())?;
        self.confetti.set_palette(palette)?;
        log::debug!("palette set to {} colors", hex.len());
        Ok(())
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.matrix.resize(width, height);
        self.fireworks.resize(width, height);
        self.confetti.resize(width, height);
        self.pop.resize(width, height);
    }

    pub fn play(&mut self, cue: Cue) {
        log::debug!("cue: {:?}", cue);
        match cue {
            Cue::StartMatrix => self.matrix.start(),
            Cue::StopMatrix => self.matrix.stop(),
            Cue::Confetti => {
                self.confetti.explode();
            }
            Cue::PopBurst => self.pop.celebration_burst(),
            Cue::ContinuousPop { duration_ms } => self.pop.continuous_celebration(duration_ms),
            Cue::Fireworks => self.fireworks.launch(),
            Cue::Sound(sound) => {
                self.sound.play(sound);
            }
        }
    }

    /// Whether any layer or cue still wants frames
    pub fn is_active(&self) -> bool {
        self.matrix.is_running()
            || self.fireworks.has_work()
            || self.confetti.has_work()
            || self.pop.has_work()
            || !self.choreography.is_done()
    }

    /// Play due cues, then advance every busy layer
    pub fn tick(&mut self, now_ms: f64) -> bool {
        for cue in self.choreography.poll(now_ms) {
            self.play(cue);
        }

        self.matrix.tick();
        if self.fireworks.has_work() {
            self.fireworks.tick(now_ms);
        }
        if self.confetti.has_work() {
            self.confetti.tick(now_ms);
        }
        if self.pop.has_work() {
            self.pop.tick(now_ms);
        }
        self.is_active()
    }

    /// Cancel pending cues and stop every layer
    pub fn stop_all(&mut self) {
        self.choreography.cancel();
        self.matrix.stop();
        self.fireworks.stop();
        self.confetti.stop();
        self.pop.stop();
    }
}

impl<S: Surface, A: AudioBackend> Animation for Show<S, A> {
    fn tick(&mut self, now_ms: f64) -> bool {
        Show::tick(self, now_ms)
    }

    fn halt(&mut self) {
        self.stop_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::RecordingAudio;
    use crate::fx::{FrameLoop, ManualScheduler};
    use crate::render::RecordingSurface;

    fn layers() -> Layers<RecordingSurface> {
        Layers {
            matrix: RecordingSurface::new(800.0, 600.0),
            fireworks: RecordingSurface::new(800.0, 600.0),
            confetti: RecordingSurface::new(800.0, 600.0),
            pop: RecordingSurface::new(800.0, 600.0),
        }
    }

    fn show(settings: &Settings) -> Show<RecordingSurface, RecordingAudio> {
        let mut show = Show::new(layers(), RecordingAudio::new(), settings)
            .unwrap()
            .with_seed(9);
        show.sound.init();
        show
    }

    #[test]
    fn test_celebration_cue_times() {
        let mut c = Choreography::new();
        c.matrix_intro();
        c.celebration();
        assert_eq!(c.pending(), 8);

        assert_eq!(c.poll(0.0), vec![Cue::StartMatrix]);
        assert!(c.poll(499.0).is_empty());
        assert_eq!(c.poll(500.0), vec![Cue::Sound(SoundCue::Confetti), Cue::Confetti]);
        assert_eq!(c.poll(2000.0).len(), 2);
        let last = c.poll(3500.0);
        assert_eq!(last.len(), 3);
        assert!(last.contains(&Cue::StopMatrix));
        assert!(c.is_done());
    }

    #[test]
    fn test_reduced_motion_skips_matrix_and_continuous_pop() {
        let settings = Settings {
            reduced_motion: true,
            ..Settings::default()
        };
        let mut c = Choreography::from_settings(&settings);
        c.matrix_intro();
        assert!(c.is_done());
        c.grand_celebration();
        let mut cues = Vec::new();
        for t in [0.0, 500.0, 2000.0, 3500.0] {
            cues.extend(c.poll(t));
        }
        assert!(!cues.iter().any(|c| matches!(c, Cue::ContinuousPop { .. })));
        assert_eq!(cues.iter().filter(|c| **c == Cue::Fireworks).count(), 1);
    }

    #[test]
    fn test_matrix_runs_then_stops() {
        let mut s = show(&Settings::default());
        s.choreography_mut().matrix_intro();
        s.tick(0.0);
        assert!(s.matrix.is_running());
        s.tick(3499.0);
        assert!(s.matrix.is_running());
        assert!(!s.tick(3500.0));
        assert!(!s.matrix.is_running());
    }

    #[test]
    fn test_celebration_runs_to_quiet() {
        let mut s = show(&Settings::default());
        s.choreography_mut().celebration();
        let mut frames = FrameLoop::new(s, ManualScheduler::new());
        frames.kick();
        let delivered = frames.run_until_idle(0.0, 1000.0 / 60.0, 60 * 30);
        assert!(delivered < 60 * 30);

        let s = frames.animation();
        assert!(!s.is_active());
        // one crackle of three notes per wave
        assert_eq!(s.sound.backend().notes().len(), 9);
        assert_eq!(s.confetti.surface().visible_count(), 0);
    }

    #[test]
    fn test_confetti_wave_emits_full_explosion() {
        let mut s = show(&Settings::default());
        s.choreography_mut().celebration();
        s.tick(0.0);
        assert!(s.confetti.particles().is_empty());
        s.tick(500.0);
        assert_eq!(s.confetti.particles().len(), 400);
    }

    #[test]
    fn test_particle_cap_from_quality() {
        let settings = Settings::from_preset(crate::QualityPreset::Low);
        let mut s = show(&settings);
        s.play(Cue::Confetti);
        s.play(Cue::Confetti);
        assert_eq!(s.confetti.particles().len(), 400);
    }

    #[test]
    fn test_custom_palette_colors_confetti() {
        let mut s = show(&Settings::default());
        s.set_palette(&["#ff0000", "00ff00"]).unwrap();
        s.play(Cue::Confetti);
        let allowed = [crate::Rgb::new(255, 0, 0), crate::Rgb::MATRIX_GREEN];
        assert!(s.confetti.particles().iter().all(|p| allowed.contains(&p.color)));
        assert_eq!(s.fireworks.palette(), &allowed);
    }

    #[test]
    fn test_bad_palette_keeps_previous_colors() {
        let mut s = show(&Settings::default());
        let err = s.set_palette(&["#ff0000", "#12345"]).unwrap_err();
        assert_eq!(err, crate::FxError::InvalidColor("#12345".to_string()));
        let empty: [&str; 0] = [];
        assert_eq!(s.set_palette(&empty), Err(crate::FxError::EmptyPalette));
        assert_eq!(s.confetti.palette(), color::celebration().as_slice());
        assert_eq!(s.fireworks.palette(), color::celebration().as_slice());
    }

    #[test]
    fn test_stop_all_is_idempotent() {
        let mut s = show(&Settings::default());
        s.stop_all();
        s.choreography_mut().matrix_intro();
        s.choreography_mut().grand_celebration();
        s.tick(0.0);
        s.tick(600.0);
        assert!(s.is_active());
        s.stop_all();
        s.stop_all();
        assert!(!s.is_active());
        assert!(s.fireworks.particles().is_empty());
        assert_eq!(s.pop.pending_events(), 0);
    }
}
