//! Browser entry point (WASM only)
//!
//! `Stage` binds four layered canvases and drives every effect from a single
//! requestAnimationFrame loop.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use crate::audio::{SoundCue, WebAudio};
use crate::consts::POP_DEFAULT_DURATION_MS;
use crate::fx::{FrameId, FrameLoop, FrameScheduler};
use crate::render::CanvasSurface;
use crate::sequence::{Cue, Layers, Show};
use crate::settings::{QualityPreset, Settings};

type StageLoop = FrameLoop<Show<CanvasSurface, WebAudio>, RafScheduler>;

/// requestAnimationFrame with one reusable callback
#[derive(Default)]
pub struct RafScheduler {
    callback: Option<Closure<dyn FnMut(f64)>>,
}

impl FrameScheduler for RafScheduler {
    fn request(&mut self) -> Option<FrameId> {
        let window = web_sys::window()?;
        let callback = self.callback.as_ref()?;
        match window.request_animation_frame(callback.as_ref().unchecked_ref()) {
            Ok(id) => Some(id as FrameId),
            Err(e) => {
                log::debug!("requestAnimationFrame failed: {:?}", e);
                None
            }
        }
    }

    fn cancel(&mut self, id: FrameId) {
        if let Some(window) = web_sys::window() {
            window.cancel_animation_frame(id as i32).ok();
        }
    }
}

/// Layered effect canvases plus sound
#[wasm_bindgen]
pub struct Stage {
    frames: Rc<RefCell<StageLoop>>,
    settings: Settings,
}

#[wasm_bindgen]
impl Stage {
    /// Bind canvases by element id, bottom layer first
    #[wasm_bindgen(constructor)]
    pub fn new(
        matrix_id: &str,
        fireworks_id: &str,
        confetti_id: &str,
        pop_id: &str,
    ) -> Result<Stage, JsValue> {
        let settings = Settings::load();
        let layers = Layers {
            matrix: CanvasSurface::from_element_id(matrix_id)?,
            fireworks: CanvasSurface::from_element_id(fireworks_id)?,
            confetti: CanvasSurface::from_element_id(confetti_id)?,
            pop: CanvasSurface::from_element_id(pop_id)?,
        };
        let show = Show::new(layers, WebAudio::new(), &settings)?;
        let frames = Rc::new(RefCell::new(FrameLoop::new(show, RafScheduler::default())));

        let weak = Rc::downgrade(&frames);
        let callback = Closure::<dyn FnMut(f64)>::new(move |time: f64| {
            let Some(frames) = weak.upgrade() else { return };
            // rAF passes only a timestamp; cancel_animation_frame guarantees
            // a cancelled callback never runs
            frames.borrow_mut().on_next_frame(time);
        });
        frames.borrow_mut().scheduler_mut().callback = Some(callback);

        log::info!("stage ready ({} quality)", settings.quality.as_str());
        Ok(Stage { frames, settings })
    }

    /// Open the audio context. Call from a user gesture.
    pub fn init_audio(&self) {
        self.frames.borrow_mut().animation_mut().sound.init();
    }

    /// Matrix backdrop for a few seconds
    pub fn show_matrix(&self) {
        self.with_show(|show| show.choreography_mut().matrix_intro());
    }

    /// Three confetti waves
    pub fn show_celebration(&self) {
        self.with_show(|show| show.choreography_mut().celebration());
    }

    /// Confetti, pop bursts and fireworks together
    pub fn grand_celebration(&self) {
        self.with_show(|show| show.choreography_mut().grand_celebration());
    }

    pub fn launch_fireworks(&self) {
        self.with_show(|show| {
            show.play(Cue::Sound(SoundCue::Firework));
            show.play(Cue::Fireworks);
        });
    }

    pub fn celebration_burst(&self) {
        self.with_show(|show| show.play(Cue::PopBurst));
    }

    pub fn continuous_celebration(&self, duration_ms: Option<f64>) {
        let duration_ms = duration_ms.unwrap_or(POP_DEFAULT_DURATION_MS);
        self.with_show(|show| show.play(Cue::ContinuousPop { duration_ms }));
    }

    /// Play a sound cue by name. Returns false for unknown names.
    pub fn play(&self, cue: &str) -> bool {
        let Some(cue) = SoundCue::from_str(cue) else {
            log::debug!("unknown sound cue '{}'", cue);
            return false;
        };
        self.frames.borrow_mut().animation_mut().sound.play(cue);
        true
    }

    /// Cancel the frame loop and clear every layer
    pub fn stop_all(&self) {
        self.frames.borrow_mut().stop();
    }

    pub fn set_quality(&mut self, preset: &str) -> bool {
        let Some(quality) = QualityPreset::from_str(preset) else {
            return false;
        };
        self.settings.quality = quality;
        self.commit_settings();
        true
    }

    pub fn set_sound(&mut self, enabled: bool) {
        self.settings.sound = enabled;
        self.commit_settings();
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.settings.set_master_volume(volume);
        self.commit_settings();
    }

    pub fn set_reduced_motion(&mut self, reduced: bool) {
        self.settings.reduced_motion = reduced;
        self.commit_settings();
    }

    /// Recolor confetti and fireworks with `#rrggbb` strings
    pub fn set_palette(&self, colors: Vec<String>) -> Result<(), JsValue> {
        self.frames
            .borrow_mut()
            .animation_mut()
            .set_palette(colors.as_slice())
            .map_err(JsValue::from)
    }
}

impl Stage {
    fn with_show(&self, f: impl FnOnce(&mut Show<CanvasSurface, WebAudio>)) {
        let mut frames = self.frames.borrow_mut();
        f(frames.animation_mut());
        frames.kick();
    }

    fn commit_settings(&self) {
        self.frames.borrow_mut().animation_mut().apply_settings(&self.settings);
        self.settings.save();
    }
}

impl Drop for Stage {
    fn drop(&mut self) {
        if let Ok(mut frames) = self.frames.try_borrow_mut() {
            frames.stop();
        }
    }
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"logger already initialized".into());
    }
}
