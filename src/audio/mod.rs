//! Sound system using synthesized tones
//!
//! Procedurally generated cues - no external files needed! Each cue is a
//! short score of `Note`s on the audio clock. The backend turns every note
//! into a throwaway oscillator + gain pair that the host discards once the
//! note's stop time passes, so nothing is retained between calls.

pub mod recording;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use recording::RecordingAudio;

#[cfg(target_arch = "wasm32")]
pub use web::WebAudio;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::error::Result;
use crate::settings::Settings;

/// Sound cue types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    /// Single short keystroke tick
    Tick,
    /// Three-note ascending chime
    Success,
    /// Three-note chord, lightly arpeggiated
    Celebration,
    /// Rising whoosh followed by a bang
    Firework,
    /// Triple high-pitched crackle
    Confetti,
    /// Single descending pop
    Pop,
}

impl SoundCue {
    pub const ALL: [SoundCue; 6] = [
        SoundCue::Tick,
        SoundCue::Success,
        SoundCue::Celebration,
        SoundCue::Firework,
        SoundCue::Confetti,
        SoundCue::Pop,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SoundCue::Tick => "tick",
            SoundCue::Success => "success",
            SoundCue::Celebration => "celebration",
            SoundCue::Firework => "firework",
            SoundCue::Confetti => "confetti",
            SoundCue::Pop => "pop",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "tick" | "keyboard" => Some(SoundCue::Tick),
            "success" => Some(SoundCue::Success),
            "celebration" => Some(SoundCue::Celebration),
            "firework" | "fireworks" => Some(SoundCue::Firework),
            "confetti" => Some(SoundCue::Confetti),
            "pop" => Some(SoundCue::Pop),
            _ => None,
        }
    }

    /// Unscaled score for this cue starting at audio time `t` (seconds)
    pub fn score(&self, t: f64, rng: &mut impl Rng) -> Vec<Note> {
        match self {
            SoundCue::Tick => vec![
                Note::new(t, t + 0.05)
                    .freq(t, 800.0)
                    .gain(t, 0.1)
                    .gain_ramp(t + 0.05, 0.001),
            ],
            SoundCue::Success => vec![
                Note::new(t, t + 0.3)
                    .freq(t, 523.25)
                    .freq(t + 0.1, 659.25)
                    .freq(t + 0.2, 783.99)
                    .gain(t, 0.15)
                    .gain_ramp(t + 0.3, 0.01),
            ],
            SoundCue::Celebration => [523.25, 659.25, 783.99]
                .iter()
                .enumerate()
                .map(|(i, &f)| {
                    let start = t + i as f64 * 0.05;
                    Note::new(start, t + 1.5)
                        .freq(t, f)
                        .gain(start, 0.12)
                        .gain_ramp(t + 1.5, 0.001)
                })
                .collect(),
            SoundCue::Firework => {
                let bang = t + 0.4;
                vec![
                    // whoosh
                    Note::new(t, bang)
                        .freq(t, 150.0)
                        .freq_ramp(bang, 600.0)
                        .gain(t, 0.08)
                        .gain_ramp(bang, 0.001),
                    // bang
                    Note::new(bang, t + 0.7)
                        .freq(bang, 800.0)
                        .freq_ramp(t + 0.7, 300.0)
                        .gain(bang, 0.15)
                        .gain_ramp(t + 0.7, 0.001),
                ]
            }
            SoundCue::Confetti => (0..3)
                .map(|i| {
                    let start = t + i as f64 * 0.12;
                    Note::new(start, start + 0.15)
                        .freq(start, rng.random_range(1500.0..2000.0))
                        .gain(start, 0.04)
                        .gain_ramp(start + 0.15, 0.001)
                })
                .collect(),
            SoundCue::Pop => vec![
                Note::new(t, t + 0.15)
                    .freq(t, 600.0)
                    .freq_ramp(t + 0.1, 300.0)
                    .gain(t, 0.2)
                    .gain_ramp(t + 0.15, 0.001),
            ],
        }
    }
}

/// How a parameter reaches its value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Curve {
    /// Jump at `at`
    Set,
    /// Exponential ramp from the previous point, arriving at `at`
    Exponential,
}

/// One automation point on the audio clock
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Automation {
    pub at: f64,
    pub value: f32,
    pub curve: Curve,
}

/// A single sine tone with frequency and gain automation
#[derive(Debug, Clone, PartialEq)]
pub struct Note {
    /// Audio-clock start time (s)
    pub start: f64,
    /// Audio-clock stop time (s); the host frees the graph after this
    pub stop: f64,
    pub frequency: Vec<Automation>,
    pub gain: Vec<Automation>,
}

impl Note {
    pub fn new(start: f64, stop: f64) -> Self {
        Self {
            start,
            stop,
            frequency: Vec::new(),
            gain: Vec::new(),
        }
    }

    fn freq(mut self, at: f64, value: f32) -> Self {
        self.frequency.push(Automation { at, value, curve: Curve::Set });
        self
    }

    fn freq_ramp(mut self, at: f64, value: f32) -> Self {
        self.frequency.push(Automation {
            at,
            value,
            curve: Curve::Exponential,
        });
        self
    }

    fn gain(mut self, at: f64, value: f32) -> Self {
        self.gain.push(Automation { at, value, curve: Curve::Set });
        self
    }

    fn gain_ramp(mut self, at: f64, value: f32) -> Self {
        self.gain.push(Automation {
            at,
            value,
            curve: Curve::Exponential,
        });
        self
    }

    /// Initial frequency (Hz)
    pub fn base_frequency(&self) -> f32 {
        self.frequency.first().map(|a| a.value).unwrap_or(440.0)
    }

    /// Highest gain point
    pub fn peak_gain(&self) -> f32 {
        self.gain.iter().map(|a| a.value).fold(0.0, f32::max)
    }

    fn scaled(mut self, volume: f32) -> Self {
        for point in &mut self.gain {
            // exponential ramps cannot reach zero
            point.value = (point.value * volume).max(1e-4);
        }
        self
    }
}

/// A synthesis host that can play scheduled notes
pub trait AudioBackend {
    /// Create the synthesis context. May fail when audio is unsupported.
    fn open(&mut self) -> Result<()>;

    /// Current audio-clock time (s)
    fn current_time(&self) -> f64;

    /// Wake a context suspended by autoplay policy
    fn resume(&mut self) {}

    /// Build and start one note; fire-and-forget
    fn schedule(&mut self, note: &Note);
}

/// Plays sound cues through a lazily opened backend
pub struct SoundSystem<B: AudioBackend> {
    backend: B,
    initialized: bool,
    master_volume: f32,
    muted: bool,
    rng: Pcg32,
}

impl<B: AudioBackend> SoundSystem<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            initialized: false,
            master_volume: 1.0,
            muted: false,
            rng: Pcg32::from_os_rng(),
        }
    }

    /// Sound system honoring the volume and mute preferences
    pub fn from_settings(backend: B, settings: &Settings) -> Self {
        let mut sound = Self::new(backend);
        sound.apply_settings(settings);
        sound
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Pcg32::seed_from_u64(seed);
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Open the synthesis context once. Failure is silent: every later
    /// play call becomes a no-op.
    pub fn init(&mut self) {
        if self.initialized {
            return;
        }
        match self.backend.open() {
            Ok(()) => {
                self.initialized = true;
                log::info!("audio initialized");
            }
            Err(e) => log::debug!("audio not supported: {}", e),
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    pub fn master_volume(&self) -> f32 {
        self.master_volume
    }

    /// Mute/unmute all cues
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn apply_settings(&mut self, settings: &Settings) {
        self.set_master_volume(settings.master_volume);
        self.set_muted(!settings.sound);
    }

    fn effective_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.master_volume }
    }

    /// Play a cue. Returns the number of notes scheduled.
    pub fn play(&mut self, cue: SoundCue) -> usize {
        let vol = self.effective_volume();
        if !self.initialized || vol <= 0.0 {
            return 0;
        }

        self.backend.resume();
        let t = self.backend.current_time();
        let notes = cue.score(t, &mut self.rng);
        let count = notes.len();
        for note in notes {
            self.backend.schedule(&note.scaled(vol));
        }
        log::trace!("audio: {} ({} notes)", cue.as_str(), count);
        count
    }

    pub fn play_keyboard_sound(&mut self) {
        self.play(SoundCue::Tick);
    }

    pub fn play_success_sound(&mut self) {
        self.play(SoundCue::Success);
    }

    pub fn play_celebration_sound(&mut self) {
        self.play(SoundCue::Celebration);
    }

    pub fn play_firework_sound(&mut self) {
        self.play(SoundCue::Firework);
    }

    pub fn play_confetti_sound(&mut self) {
        self.play(SoundCue::Confetti);
    }

    pub fn play_pop_sound(&mut self) {
        self.play(SoundCue::Pop);
    }
}
