//! Melody-to-Score Rhythm Quantizer
//!
//! Snaps transcribed note events onto a sixteenth-note grid derived from a
//! tempo, turning loosely performed timing into something a notation
//! renderer can engrave.

pub mod analysis;
pub mod config;
pub mod error;
pub mod midi;
pub mod note;
pub mod quantize;
pub mod tempo;

pub use config::Config;
pub use error::{QuantizeError, Result as QuantizeResult};
pub use note::NoteEvent;
pub use quantize::Grid;

use std::path::Path;
use tempo::TempoSource;

/// Main processing pipeline: load, quantize, export
pub struct Melody2Score {
    config: Config,
}

impl Melody2Score {
    /// Create a new processor with the given configuration
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Quantize a MIDI file and write the result plus an analysis report
    pub fn process<P: AsRef<Path>>(&self, input_path: P, output_dir: P) -> QuantizeResult<()> {
        let (events, file_bpm) = midi::load_notes(input_path)?;
        note::validate_events(&events)?;

        let (bpm, tempo_source) = self.resolve_tempo(&events, file_bpm);
        let subdivision = self.config.grid.subdivision;

        let quantized = quantize::quantize_events(events.clone(), Some(bpm), subdivision)?;

        midi::export_midi(&quantized, bpm, output_dir.as_ref(), &self.config)?;

        if self.config.export.write_analysis {
            let grid = Grid::from_bpm(bpm, subdivision);
            let report =
                analysis::build_report(&events, &quantized, bpm, tempo_source, grid, subdivision);
            analysis::export_analysis(&report, output_dir.as_ref(), &self.config)?;
        }

        Ok(())
    }

    /// Pick the BPM for the run: caller override, then the file's tempo
    /// meta event, then the inter-onset estimate, then [`tempo::DEFAULT_BPM`].
    fn resolve_tempo(&self, events: &[NoteEvent], file_bpm: Option<f64>) -> (f64, TempoSource) {
        if let Some(bpm) = self.config.tempo.bpm_override {
            if bpm.is_finite() && bpm > 0.0 {
                return (bpm, TempoSource::Override);
            }
        }
        if let Some(bpm) = file_bpm {
            if bpm.is_finite() && bpm > 0.0 {
                return (bpm, TempoSource::FileMeta);
            }
        }
        if self.config.tempo.estimate_from_events {
            if let Some(bpm) = tempo::estimate_tempo(events, self.config.tempo.range_bpm) {
                return (bpm, TempoSource::Estimated);
            }
        }
        (tempo::DEFAULT_BPM, TempoSource::Fallback)
    }
}

/// Validate configuration and input file before processing
pub fn validate_input<P: AsRef<Path>>(input_path: P, config: &Config) -> QuantizeResult<()> {
    let path = input_path.as_ref();
    if !path.is_file() {
        return Err(QuantizeError::MidiFileError(format!(
            "input file not found: {}",
            path.display()
        )));
    }

    config::validate_config(config)?;

    Ok(())
}
