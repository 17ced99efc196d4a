//! Validation tests for the sixteenth-note grid quantizer

use melody2score::error::QuantizeError;
use melody2score::note::NoteEvent;
use melody2score::quantize::{self, Grid, DEFAULT_SUBDIVISION};

const TOLERANCE: f64 = 1e-9;

/// Build a middle-C note with the given timing
fn note(start_sec: f64, end_sec: f64) -> NoteEvent {
    NoteEvent::new(60, 96, 0, start_sec, end_sec)
}

fn quantize(events: Vec<NoteEvent>, bpm: Option<f64>) -> Vec<NoteEvent> {
    quantize::quantize_events(events, bpm, DEFAULT_SUBDIVISION).expect("quantization failed")
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < TOLERANCE,
        "expected {}, got {}",
        expected,
        actual
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_concrete_snap_at_120_bpm() {
        // 120 BPM => sixteenth-note unit of 0.125 s
        let result = quantize(vec![note(0.10, 0.22)], Some(120.0));
        assert_eq!(result.len(), 1);
        assert_close(result[0].start_sec, 0.125);
        assert_close(result[0].end_sec, 0.25);
    }

    #[test]
    fn test_degenerate_note_widened_to_one_unit() {
        // Both ends snap to 0.375, so the note is widened to one grid cell
        let result = quantize(vec![note(0.40, 0.41)], Some(120.0));
        assert_close(result[0].start_sec, 0.375);
        assert_close(result[0].end_sec, 0.5);
    }

    #[test]
    fn test_idempotence() {
        let events = vec![note(0.10, 0.22), note(0.40, 0.41), note(1.03, 1.52)];
        let once = quantize(events, Some(97.0));
        let twice = quantize(once.clone(), Some(97.0));

        for (a, b) in once.iter().zip(twice.iter()) {
            assert_close(b.start_sec, a.start_sec);
            assert_close(b.end_sec, a.end_sec);
        }
    }

    #[test]
    fn test_grid_alignment() {
        let events = vec![
            note(0.013, 0.41),
            note(0.77, 1.19),
            note(2.501, 2.502),
            note(3.3333, 4.0001),
        ];
        let bpm = 133.0;
        let unit = Grid::from_bpm(bpm, DEFAULT_SUBDIVISION).unit_sec;

        for event in quantize(events, Some(bpm)) {
            let start_cells = event.start_sec / unit;
            let end_cells = event.end_sec / unit;
            assert!((start_cells - start_cells.round()).abs() < TOLERANCE);
            assert!((end_cells - end_cells.round()).abs() < TOLERANCE);
        }
    }

    #[test]
    fn test_minimum_duration() {
        let events = vec![note(0.0, 0.001), note(0.9, 0.93), note(1.5, 1.51)];
        let unit = Grid::from_bpm(120.0, DEFAULT_SUBDIVISION).unit_sec;

        for event in quantize(events, Some(120.0)) {
            assert!(event.duration_sec() >= unit - TOLERANCE);
        }
    }

    #[test]
    fn test_order_and_payload_preserved() {
        let events = vec![
            NoteEvent::new(60, 100, 0, 0.10, 0.22),
            NoteEvent::new(64, 80, 1, 0.30, 0.55),
            NoteEvent::new(67, 45, 9, 0.61, 0.62),
        ];
        let result = quantize(events.clone(), Some(120.0));

        assert_eq!(result.len(), events.len());
        for (before, after) in events.iter().zip(result.iter()) {
            assert_eq!(after.pitch, before.pitch);
            assert_eq!(after.velocity, before.velocity);
            assert_eq!(after.channel, before.channel);
        }
    }

    #[test]
    fn test_tempo_fallback_equivalence() {
        let events = vec![note(0.10, 0.22), note(0.40, 0.41)];
        let reference = quantize(events.clone(), Some(120.0));

        for bad_bpm in [None, Some(0.0), Some(-5.0), Some(f64::NAN)] {
            let result = quantize(events.clone(), bad_bpm);
            for (r, e) in reference.iter().zip(result.iter()) {
                assert_close(e.start_sec, r.start_sec);
                assert_close(e.end_sec, r.end_sec);
            }
        }
    }

    #[test]
    fn test_empty_input() {
        let result = quantize(vec![], Some(120.0));
        assert!(result.is_empty());
    }

    #[test]
    fn test_half_unit_tie_rounds_away_from_zero() {
        // 0.0625 s is exactly half a unit at 120 BPM; 0.1875 s is 1.5 units
        let result = quantize(vec![note(0.0625, 0.1875)], Some(120.0));
        assert_close(result[0].start_sec, 0.125);
        assert_close(result[0].end_sec, 0.25);
    }

    #[test]
    fn test_non_finite_timing_rejected() {
        let events = vec![note(f64::NAN, 0.5)];
        let err = quantize::quantize_events(events, Some(120.0), DEFAULT_SUBDIVISION)
            .expect_err("NaN timing must be rejected");
        assert!(matches!(err, QuantizeError::InputValidationError(_)));

        let events = vec![note(0.0, f64::INFINITY)];
        let err = quantize::quantize_events(events, Some(120.0), DEFAULT_SUBDIVISION)
            .expect_err("infinite timing must be rejected");
        assert!(matches!(err, QuantizeError::InputValidationError(_)));
    }

    #[test]
    fn test_custom_subdivision() {
        // Thirty-second-note grid at 120 BPM => unit of 0.0625 s
        let result = quantize::quantize_events(vec![note(0.05, 0.10)], Some(120.0), 8)
            .expect("quantization failed");
        assert_close(result[0].start_sec, 0.0625);
        assert_close(result[0].end_sec, 0.125);
    }

    #[test]
    fn test_grid_unit_from_bpm() {
        assert_close(Grid::from_bpm(120.0, 4).unit_sec, 0.125);
        assert_close(Grid::from_bpm(60.0, 4).unit_sec, 0.25);
        // Subdivision 0 is treated as 1 (quarter-note grid)
        assert_close(Grid::from_bpm(120.0, 0).unit_sec, 0.5);
    }
}
