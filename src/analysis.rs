//! Quantization report and analysis export

use crate::config::Config;
use crate::error::Result;
use crate::note::NoteEvent;
use crate::quantize::Grid;
use crate::tempo::TempoSource;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Summary of one quantization run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuantizeReport {
    pub bpm: f64,
    pub tempo_source: TempoSource,
    pub unit_sec: f64,
    pub subdivision: u32,
    pub note_count: usize,
    pub mean_displacement_ms: f64,
    pub max_displacement_ms: f64,
    pub notes: Vec<NoteReport>,
}

/// Per-note before/after timing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteReport {
    pub pitch: u8,
    pub velocity: u8,
    pub channel: u8,
    pub original_start_sec: f64,
    pub quantized_start_sec: f64,
    pub quantized_end_sec: f64,
    pub displacement_ms: f64,
}

/// Build the report from matched original/quantized sequences.
///
/// Both slices come from the same quantization run, so they share length
/// and order.
pub fn build_report(
    original: &[NoteEvent],
    quantized: &[NoteEvent],
    bpm: f64,
    tempo_source: TempoSource,
    grid: Grid,
    subdivision: u32,
) -> QuantizeReport {
    let notes: Vec<NoteReport> = original
        .iter()
        .zip(quantized.iter())
        .map(|(before, after)| NoteReport {
            pitch: after.pitch,
            velocity: after.velocity,
            channel: after.channel,
            original_start_sec: before.start_sec,
            quantized_start_sec: after.start_sec,
            quantized_end_sec: after.end_sec,
            displacement_ms: (after.start_sec - before.start_sec).abs() * 1000.0,
        })
        .collect();

    let max_displacement_ms = notes
        .iter()
        .map(|n| n.displacement_ms)
        .fold(0.0, f64::max);
    let mean_displacement_ms = if notes.is_empty() {
        0.0
    } else {
        notes.iter().map(|n| n.displacement_ms).sum::<f64>() / notes.len() as f64
    };

    QuantizeReport {
        bpm,
        tempo_source,
        unit_sec: grid.unit_sec,
        subdivision,
        note_count: notes.len(),
        mean_displacement_ms,
        max_displacement_ms,
        notes,
    }
}

/// Write the report as pretty-printed JSON next to the exported MIDI
pub fn export_analysis(
    report: &QuantizeReport,
    output_dir: &Path,
    config: &Config,
) -> Result<PathBuf> {
    std::fs::create_dir_all(output_dir)?;

    let analysis_path = output_dir.join(&config.export.analysis_filename);
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(&analysis_path, json)?;

    Ok(analysis_path)
}
