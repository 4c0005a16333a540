//! Celebration FX - procedural page-transition effects
//!
//! Core modules:
//! - `fx`: Particle engine, burst behaviors, matrix rain, frame loop
//! - `render`: Drawing surface abstraction (canvas on the web, recorder elsewhere)
//! - `audio`: Procedurally synthesized sound cues
//! - `sequence`: Timed choreography of effects and cues
//! - `settings`: User preferences (quality, sound, reduced motion)

pub mod audio;
pub mod color;
pub mod error;
pub mod fx;
pub mod render;
pub mod sequence;
pub mod settings;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use color::Rgb;
pub use error::{FxError, Result};
pub use settings::{QualityPreset, Settings};

/// Effect tuning constants
pub mod consts {
    /// Confetti: total corner particles per explosion (split evenly over 4 corners)
    pub const CONFETTI_CORNER_COUNT: usize = 300;
    /// Confetti: extra particles emitted from the surface center
    pub const CONFETTI_CENTER_COUNT: usize = 100;
    /// Confetti: angular jitter around the corner-to-center direction (radians)
    pub const CONFETTI_SPREAD: f32 = std::f32::consts::PI / 2.5;
    /// Confetti: per-tick velocity damping
    pub const CONFETTI_FRICTION: f32 = 0.98;
    /// Confetti: per-tick rotation speed damping
    pub const SPIN_DAMPING: f32 = 0.99;

    /// Fireworks: rockets per launch
    pub const ROCKET_COUNT: usize = 8;
    /// Fireworks: window over which rocket spawns are spread (ms)
    pub const LAUNCH_WINDOW_MS: f64 = 3000.0;
    /// Fireworks: per-tick ascent acceleration factor
    pub const ROCKET_ACCEL: f32 = 1.05;
    /// Fireworks: particles per explosion
    pub const EXPLOSION_COUNT: usize = 120;
    /// Fireworks: chance that an explosion particle keeps the rocket color
    pub const EXPLOSION_OWN_COLOR: f64 = 0.9;
    /// Fireworks: explosion particle gravity
    pub const EXPLOSION_GRAVITY: f32 = 0.1;
    /// Fireworks: explosion particle friction
    pub const EXPLOSION_FRICTION: f32 = 0.96;

    /// Pop: particles per quadrant burst
    pub const POP_BURST_COUNT: usize = 50;
    /// Pop: delay between consecutive quadrant bursts (ms)
    pub const POP_BURST_STAGGER_MS: f64 = 200.0;
    /// Pop: continuous emitter interval (ms)
    pub const POP_INTERVAL_MS: f64 = 400.0;
    /// Pop: particles per edge cluster
    pub const POP_CLUSTER_COUNT: usize = 8;
    /// Pop: default continuous celebration duration (ms)
    pub const POP_DEFAULT_DURATION_MS: f64 = 5000.0;
    /// Pop: cull margin beyond the surface edges (px)
    pub const POP_CULL_MARGIN: f32 = 50.0;
    /// Pop: logical redraw rate
    pub const POP_TICK_RATE: f64 = 30.0;

    /// Matrix: glyph cell width and font size (px)
    pub const GLYPH_SIZE: f32 = 14.0;
    /// Matrix: opacity of the black fade painted every tick
    pub const MATRIX_FADE: f32 = 0.05;
    /// Matrix: per-tick chance a column past the bottom restarts
    pub const MATRIX_RESET_CHANCE: f64 = 0.025;
    /// Matrix: glyph alphabet
    pub const MATRIX_GLYPHS: &str =
        "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789@#$%^&*()_+-=[]{}|;:,.<>?";
}
