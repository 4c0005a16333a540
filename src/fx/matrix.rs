//! Falling-glyph matrix backdrop
//!
//! Not a particle effect: one integer drop height per glyph column, and a
//! translucent black wash each tick instead of a clear so glyphs leave trails.

use glam::Vec2;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::frame_loop::Animation;
use crate::color::Rgb;
use crate::consts::*;
use crate::render::{Sprite, SpriteShape, Surface};

pub struct MatrixRain<S: Surface> {
    surface: S,
    glyphs: Vec<char>,
    /// Drop height per column, in glyph rows
    drops: Vec<u32>,
    rng: Pcg32,
    running: bool,
}

impl<S: Surface> MatrixRain<S> {
    pub fn new(surface: S) -> Self {
        let mut rain = Self {
            surface,
            glyphs: MATRIX_GLYPHS.chars().collect(),
            drops: Vec::new(),
            rng: Pcg32::from_os_rng(),
            running: false,
        };
        rain.fit_columns();
        rain
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Pcg32::seed_from_u64(seed);
        self
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn drops(&self) -> &[u32] {
        &self.drops
    }

    pub fn columns(&self) -> usize {
        self.drops.len()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Match the column count to the surface width. Existing columns keep their drops.
    fn fit_columns(&mut self) {
        let (width, _) = self.surface.size();
        let columns = (width.max(0.0) / GLYPH_SIZE).floor() as usize;
        if columns != self.drops.len() {
            self.drops.resize(columns, 0);
        }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.surface.resize(width, height);
        self.fit_columns();
    }

    /// Begin raining. Runs until `stop`; there is no natural end.
    pub fn start(&mut self) {
        if !self.running {
            log::debug!("matrix: start ({} columns)", self.drops.len());
        }
        self.running = true;
    }

    /// Stop raining. Safe to call when not running. Drops keep their heights.
    pub fn stop(&mut self) {
        if self.running {
            log::debug!("matrix: stop");
        }
        self.running = false;
    }

    /// Paint one frame. Returns whether the rain is still running.
    pub fn tick(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.fit_columns();
        let (_, height) = self.surface.size();

        self.surface.fade(Rgb::BLACK, MATRIX_FADE);
        for (i, drop) in self.drops.iter_mut().enumerate() {
            let ch = self.glyphs.choose(&mut self.rng).copied().unwrap_or('0');
            let pos = Vec2::new(i as f32 * GLYPH_SIZE, *drop as f32 * GLYPH_SIZE);
            let glyph = SpriteShape::Glyph {
                ch,
                font_px: GLYPH_SIZE,
            };
            self.surface.draw(&Sprite::new(glyph, pos, Rgb::MATRIX_GREEN));

            if pos.y > height && self.rng.random_bool(MATRIX_RESET_CHANCE) {
                *drop = 0;
            } else {
                *drop += 1;
            }
        }
        true
    }
}

impl<S: Surface> Animation for MatrixRain<S> {
    fn tick(&mut self, _now_ms: f64) -> bool {
        MatrixRain::tick(self)
    }

    fn halt(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fx::frame_loop::{FrameLoop, ManualScheduler};
    use crate::render::{RecordingSurface, SurfaceOp};

    fn rain(w: f32, h: f32) -> MatrixRain<RecordingSurface> {
        MatrixRain::new(RecordingSurface::new(w, h)).with_seed(11)
    }

    #[test]
    fn test_columns_from_width() {
        assert_eq!(rain(800.0, 600.0).columns(), 57);
        assert_eq!(rain(13.0, 600.0).columns(), 0);
    }

    #[test]
    fn test_tick_fades_then_draws_each_column() {
        let mut r = rain(140.0, 100.0);
        assert!(!r.tick(), "not running before start");
        r.start();
        assert!(r.tick());

        let ops = r.surface_mut().take_ops();
        assert_eq!(
            ops[0],
            SurfaceOp::Fade {
                color: Rgb::BLACK,
                alpha: MATRIX_FADE
            }
        );
        assert_eq!(ops.len(), 11);
        assert!(r.drops().iter().all(|&d| d == 1));
    }

    #[test]
    fn test_columns_only_reset_past_bottom() {
        let mut r = rain(140.0, 140.0);
        r.start();
        let mut resets = 0;
        for _ in 0..2000 {
            let before = r.drops().to_vec();
            r.tick();
            for (b, a) in before.iter().zip(r.drops()) {
                if *a == 0 {
                    // reset happens only once the glyph was drawn below the bottom edge
                    assert!(*b as f32 * GLYPH_SIZE > 140.0);
                    resets += 1;
                } else {
                    assert_eq!(*a, b + 1);
                }
            }
        }
        assert!(resets > 0);
        // desynchronised restarts
        let distinct: std::collections::HashSet<_> = r.drops().iter().collect();
        assert!(distinct.len() > 1);
    }

    #[test]
    fn test_stop_start_single_loop() {
        let mut frames = FrameLoop::new(rain(280.0, 200.0), ManualScheduler::new());
        frames.animation_mut().start();
        frames.kick();
        for i in 0..5 {
            frames.pump(i as f64 * 16.0);
        }
        assert_eq!(frames.scheduler().registrations, 6);

        frames.stop();
        assert!(!frames.animation().is_running());
        assert!(frames.scheduler().pending().is_empty());

        frames.animation_mut().start();
        frames.kick();
        frames.kick();
        assert_eq!(frames.scheduler().pending().len(), 1);
        assert_eq!(frames.scheduler().registrations, 7);

        frames.pump(200.0);
        assert_eq!(frames.scheduler().pending().len(), 1);
        assert!(frames.animation().drops().iter().all(|&d| d == 6));
    }

    #[test]
    fn test_resize_refits_columns() {
        let mut r = rain(140.0, 100.0);
        r.start();
        r.tick();
        r.resize(280.0, 100.0);
        assert_eq!(r.columns(), 20);
        assert_eq!(&r.drops()[..10], &[1; 10]);
        assert_eq!(&r.drops()[10..], &[0; 10]);
    }
}
