//! Web Audio backend

use web_sys::{AudioContext, AudioContextState, AudioParam, GainNode, OscillatorNode, OscillatorType};

use super::{AudioBackend, Automation, Curve, Note};
use crate::error::{FxError, Result};

/// Plays notes through a lazily created `AudioContext`
#[derive(Default)]
pub struct WebAudio {
    ctx: Option<AudioContext>,
}

impl WebAudio {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an oscillator with gain envelope
    fn create_osc(ctx: &AudioContext, freq: f32) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(OscillatorType::Sine);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }

    fn automate(param: &AudioParam, points: &[Automation]) {
        for point in points {
            match point.curve {
                Curve::Set => param.set_value_at_time(point.value, point.at).ok(),
                Curve::Exponential => param
                    .exponential_ramp_to_value_at_time(point.value, point.at)
                    .ok(),
            };
        }
    }
}

impl AudioBackend for WebAudio {
    fn open(&mut self) -> Result<()> {
        if self.ctx.is_some() {
            return Ok(());
        }
        let ctx = AudioContext::new().map_err(|e| FxError::AudioUnavailable(format!("{:?}", e)))?;
        self.ctx = Some(ctx);
        Ok(())
    }

    fn current_time(&self) -> f64 {
        self.ctx.as_ref().map(|ctx| ctx.current_time()).unwrap_or(0.0)
    }

    /// Resume audio context (browsers require a user gesture)
    fn resume(&mut self) {
        if let Some(ctx) = &self.ctx {
            if ctx.state() == AudioContextState::Suspended {
                let _ = ctx.resume();
            }
        }
    }

    fn schedule(&mut self, note: &Note) {
        let Some(ctx) = &self.ctx else { return };
        let Some((osc, gain)) = Self::create_osc(ctx, note.base_frequency()) else {
            return;
        };

        Self::automate(&osc.frequency(), &note.frequency);
        Self::automate(&gain.gain(), &note.gain);

        osc.start_with_when(note.start).ok();
        osc.stop_with_when(note.stop).ok();
    }
}
