//! Note event model shared across the pipeline

use crate::error::{QuantizeError, Result};
use serde::{Deserialize, Serialize};

/// One transcribed note with real-valued timing in seconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoteEvent {
    pub pitch: u8,
    pub velocity: u8,
    pub channel: u8,
    pub start_sec: f64,
    pub end_sec: f64,
}

impl NoteEvent {
    pub fn new(pitch: u8, velocity: u8, channel: u8, start_sec: f64, end_sec: f64) -> Self {
        Self {
            pitch,
            velocity,
            channel,
            start_sec,
            end_sec,
        }
    }

    pub fn duration_sec(&self) -> f64 {
        self.end_sec - self.start_sec
    }
}

/// Reject events whose timing is not a finite number.
///
/// A NaN or infinite timestamp indicates a defect in the upstream
/// transcription stage and must not be silently patched.
pub fn validate_events(events: &[NoteEvent]) -> Result<()> {
    for (idx, event) in events.iter().enumerate() {
        if !event.start_sec.is_finite() || !event.end_sec.is_finite() {
            return Err(QuantizeError::InputValidationError(format!(
                "note {} has non-finite timing (start={}, end={})",
                idx, event.start_sec, event.end_sec
            )));
        }
    }
    Ok(())
}
