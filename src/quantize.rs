//! Sixteenth-note grid quantization
//!
//! Snaps raw, continuously-timed note events onto a discrete grid derived
//! from a tempo, producing timing that a notation renderer can engrave.

use crate::error::Result;
use crate::note::{self, NoteEvent};
use crate::tempo;

/// Subdivisions per quarter note for a sixteenth-note grid
pub const DEFAULT_SUBDIVISION: u32 = 4;

/// Time grid derived from a tempo
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grid {
    /// Duration of one grid cell in seconds
    pub unit_sec: f64,
}

impl Grid {
    /// Build a grid from a resolved BPM and a subdivision count per
    /// quarter note. A subdivision of 0 is treated as 1.
    pub fn from_bpm(bpm: f64, subdivision: u32) -> Self {
        let quarter_sec = 60.0 / bpm;
        Grid {
            unit_sec: quarter_sec / subdivision.max(1) as f64,
        }
    }

    /// Snap a timestamp to the nearest grid line.
    ///
    /// Ties at exactly half a unit round away from zero (`f64::round`).
    pub fn snap(&self, time_sec: f64) -> f64 {
        (time_sec / self.unit_sec).round() * self.unit_sec
    }
}

/// Quantize note timing onto the grid derived from `bpm`.
///
/// Pure transformation: same length and order out as in, pitch/velocity/
/// channel untouched. An absent or invalid tempo falls back to
/// [`tempo::DEFAULT_BPM`]; non-finite note timing is the one condition
/// surfaced as an error.
pub fn quantize_events(
    events: Vec<NoteEvent>,
    bpm: Option<f64>,
    subdivision: u32,
) -> Result<Vec<NoteEvent>> {
    note::validate_events(&events)?;

    let grid = Grid::from_bpm(tempo::resolve_bpm(bpm), subdivision);
    Ok(events
        .into_iter()
        .map(|event| quantize_note(event, grid))
        .collect())
}

/// Snap one event independently of all others
fn quantize_note(mut event: NoteEvent, grid: Grid) -> NoteEvent {
    let quantized_start = grid.snap(event.start_sec);
    let mut quantized_end = grid.snap(event.end_sec);

    // A note that collapses to zero or negative length after snapping is
    // widened to exactly one grid cell.
    if quantized_end <= quantized_start {
        quantized_end = quantized_start + grid.unit_sec;
    }

    event.start_sec = quantized_start;
    event.end_sec = quantized_end;
    event
}
