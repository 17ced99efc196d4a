//! Tempo resolution and inter-onset-interval estimation

use crate::note::NoteEvent;
use serde::{Deserialize, Serialize};

/// Fallback tempo applied whenever no usable BPM is available
pub const DEFAULT_BPM: f64 = 120.0;

/// Where the BPM used for quantization came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TempoSource {
    /// Fixed BPM supplied by the caller or CLI
    Override,
    /// Tempo meta event in the input file
    FileMeta,
    /// Inter-onset-interval estimate
    Estimated,
    /// No usable tempo anywhere; [`DEFAULT_BPM`] substituted
    Fallback,
}

impl TempoSource {
    pub fn name(&self) -> &'static str {
        match self {
            TempoSource::Override => "override",
            TempoSource::FileMeta => "file_meta",
            TempoSource::Estimated => "estimated",
            TempoSource::Fallback => "fallback",
        }
    }
}

/// Resolve a possibly missing or invalid tempo to a usable BPM.
///
/// `None`, zero, negative, and non-finite values all fall back to
/// [`DEFAULT_BPM`]; a bad tempo estimate is never surfaced as an error.
pub fn resolve_bpm(bpm: Option<f64>) -> f64 {
    match bpm {
        Some(b) if b.is_finite() && b > 0.0 => b,
        _ => DEFAULT_BPM,
    }
}

/// Estimate tempo from pairwise inter-onset intervals.
///
/// Candidates are generated from every onset pair whose spacing falls in
/// 0.1-4.0 s, octave-folded into `tempo_range_bpm`, weighted by the
/// velocities of the two notes, and accumulated into a histogram rounded
/// to the nearest 2 BPM. Returns `None` when fewer than two onsets exist
/// or no candidate lands inside the range.
pub fn estimate_tempo(events: &[NoteEvent], tempo_range_bpm: [f64; 2]) -> Option<f64> {
    if events.len() < 2 {
        return None;
    }

    let mut onsets: Vec<(f64, f64)> = events
        .iter()
        .map(|e| (e.start_sec, e.velocity as f64 / 127.0))
        .collect();
    onsets.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap());

    // Generate tempo candidates by analyzing inter-onset intervals
    let mut tempo_candidates = Vec::new();
    for i in 0..onsets.len() {
        for j in (i + 1)..onsets.len() {
            let interval_sec = onsets[j].0 - onsets[i].0;
            if !(0.1..=4.0).contains(&interval_sec) {
                continue;
            }

            // Fold octave errors back into the configured range
            let mut bpm = 60.0 / interval_sec;
            while bpm < tempo_range_bpm[0] {
                bpm *= 2.0;
            }
            while bpm > tempo_range_bpm[1] {
                bpm /= 2.0;
            }

            if bpm >= tempo_range_bpm[0] && bpm <= tempo_range_bpm[1] {
                let weight = onsets[i].1 * onsets[j].1;
                tempo_candidates.push((bpm, weight));
            }
        }
    }

    if tempo_candidates.is_empty() {
        return None;
    }

    // Accumulate candidates into a histogram with 2 BPM bins
    let mut tempo_histogram: Vec<(f64, f64)> = Vec::new();
    for (bpm, weight) in tempo_candidates {
        let bpm_rounded = (bpm / 2.0).round() * 2.0;

        let mut found = false;
        for (existing_bpm, existing_weight) in tempo_histogram.iter_mut() {
            if (*existing_bpm - bpm_rounded).abs() < 0.1 {
                *existing_weight += weight;
                found = true;
                break;
            }
        }
        if !found {
            tempo_histogram.push((bpm_rounded, weight));
        }
    }

    tempo_histogram
        .into_iter()
        .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap())
        .map(|(bpm, _)| bpm)
}
