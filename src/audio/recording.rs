//! Headless audio backend that records scheduled notes

use super::{AudioBackend, Note};
use crate::error::{FxError, Result};

/// Records every note instead of playing it
#[derive(Debug, Default)]
pub struct RecordingAudio {
    unavailable: bool,
    clock: f64,
    opens: usize,
    notes: Vec<Note>,
}

impl RecordingAudio {
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend whose `open` always fails, like a host without audio support
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    /// Move the audio clock (s)
    pub fn set_clock(&mut self, t: f64) {
        self.clock = t;
    }

    pub fn opens(&self) -> usize {
        self.opens
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn take_notes(&mut self) -> Vec<Note> {
        std::mem::take(&mut self.notes)
    }
}

impl AudioBackend for RecordingAudio {
    fn open(&mut self) -> Result<()> {
        if self.unavailable {
            return Err(FxError::AudioUnavailable("no audio device".into()));
        }
        self.opens += 1;
        Ok(())
    }

    fn current_time(&self) -> f64 {
        self.clock
    }

    fn schedule(&mut self, note: &Note) {
        self.notes.push(note.clone());
    }
}
