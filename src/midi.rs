//! Standard MIDI File loading and export

use crate::config::Config;
use crate::error::{QuantizeError, Result};
use crate::note::NoteEvent;
use midly::num::{u15, u24, u28, u4, u7};
use midly::{Format, Header, MetaMessage, MidiMessage, Smf, Timing, TrackEvent, TrackEventKind};
use std::collections::HashMap;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Load note events and the file's tempo (if any) from an SMF on disk
pub fn load_notes<P: AsRef<Path>>(path: P) -> Result<(Vec<NoteEvent>, Option<f64>)> {
    let bytes = std::fs::read(path)?;
    parse_notes(&bytes)
}

/// Parse SMF bytes into note events with timing in seconds.
///
/// The first Tempo meta event in the file governs the tick-to-seconds
/// conversion; without one the SMF default of 120 BPM applies. Returns the
/// file tempo separately so the caller can distinguish "stated" from
/// "assumed". NoteOn with velocity 0 is treated as NoteOff.
pub fn parse_notes(bytes: &[u8]) -> Result<(Vec<NoteEvent>, Option<f64>)> {
    let smf = Smf::parse(bytes)?;

    let ticks_per_quarter = match smf.header.timing {
        Timing::Metrical(tpq) => tpq.as_int() as f64,
        Timing::Timecode(fps, _) => {
            return Err(QuantizeError::UnsupportedTiming(format!(
                "SMPTE timecode timing ({:?} fps) is not supported",
                fps
            )))
        }
    };

    let mut file_uspq: Option<u32> = None;
    'tempo_scan: for track in &smf.tracks {
        for event in track {
            if let TrackEventKind::Meta(MetaMessage::Tempo(uspq)) = event.kind {
                file_uspq = Some(uspq.as_int());
                break 'tempo_scan;
            }
        }
    }

    let sec_per_tick = file_uspq.unwrap_or(500_000) as f64 / 1_000_000.0 / ticks_per_quarter;

    let mut notes = Vec::new();
    for track in &smf.tracks {
        let mut tick: u64 = 0;
        // (channel, key) -> pending note-on ticks, matched FIFO
        let mut active: HashMap<(u8, u8), Vec<(u64, u8)>> = HashMap::new();

        for event in track {
            tick += event.delta.as_int() as u64;

            if let TrackEventKind::Midi { channel, message } = event.kind {
                match message {
                    MidiMessage::NoteOn { key, vel } if vel.as_int() > 0 => {
                        active
                            .entry((channel.as_int(), key.as_int()))
                            .or_default()
                            .push((tick, vel.as_int()));
                    }
                    MidiMessage::NoteOn { key, .. } | MidiMessage::NoteOff { key, .. } => {
                        if let Some(starts) = active.get_mut(&(channel.as_int(), key.as_int())) {
                            if !starts.is_empty() {
                                let (start_tick, vel) = starts.remove(0);
                                notes.push(NoteEvent::new(
                                    key.as_int(),
                                    vel,
                                    channel.as_int(),
                                    start_tick as f64 * sec_per_tick,
                                    tick as f64 * sec_per_tick,
                                ));
                            }
                        }
                    }
                    _ => {}
                }
            }
        }

        // Close any notes still sounding at the end of the track
        for ((channel, key), starts) in active {
            for (start_tick, vel) in starts {
                notes.push(NoteEvent::new(
                    key,
                    vel,
                    channel,
                    start_tick as f64 * sec_per_tick,
                    tick.max(start_tick + 1) as f64 * sec_per_tick,
                ));
            }
        }
    }

    notes.sort_by(|a, b| a.start_sec.partial_cmp(&b.start_sec).unwrap());

    let file_bpm = file_uspq.map(|uspq| 60_000_000.0 / uspq as f64);
    Ok((notes, file_bpm))
}

/// Export quantized notes as a format-0 SMF in the output directory
pub fn export_midi(
    events: &[NoteEvent],
    bpm: f64,
    output_dir: &Path,
    config: &Config,
) -> Result<PathBuf> {
    std::fs::create_dir_all(output_dir)?;

    let midi_path = output_dir.join(&config.export.midi_filename);
    let midi_data = notes_to_smf_bytes(events, bpm, config.export.ppq)?;

    let mut file = File::create(&midi_path)?;
    file.write_all(&midi_data)?;

    println!(
        "Exported {} notes to {}",
        events.len(),
        midi_path.display()
    );
    Ok(midi_path)
}

/// Serialize notes into single-track SMF bytes at the given PPQ.
///
/// Seconds are converted back to ticks through the same tempo written as
/// the track's Tempo meta event, so grid-aligned timing stays grid-aligned
/// in tick space.
pub fn notes_to_smf_bytes(events: &[NoteEvent], bpm: f64, ppq: u16) -> Result<Vec<u8>> {
    let ticks_per_sec = ppq as f64 * bpm / 60.0;
    let tempo_uspq = (60_000_000.0 / bpm) as u32;

    struct NoteEdge {
        tick: u32,
        is_on: bool,
        channel: u8,
        key: u8,
        vel: u8,
    }

    let mut edges = Vec::with_capacity(events.len() * 2);
    for event in events {
        edges.push(NoteEdge {
            tick: (event.start_sec * ticks_per_sec).round() as u32,
            is_on: true,
            channel: event.channel,
            key: event.pitch,
            vel: event.velocity,
        });
        edges.push(NoteEdge {
            tick: (event.end_sec * ticks_per_sec).round() as u32,
            is_on: false,
            channel: event.channel,
            key: event.pitch,
            vel: 0,
        });
    }

    // Note-offs sort before note-ons at the same tick
    edges.sort_by_key(|e| (e.tick, e.is_on));

    let mut track_events = Vec::with_capacity(edges.len() + 2);

    // Tempo meta event at the beginning
    track_events.push(TrackEvent {
        delta: u28::from(0),
        kind: TrackEventKind::Meta(MetaMessage::Tempo(u24::from(tempo_uspq))),
    });

    let mut current_tick = 0u32;
    for edge in &edges {
        let delta_ticks = edge.tick - current_tick;
        current_tick = edge.tick;

        let message = if edge.is_on {
            MidiMessage::NoteOn {
                key: u7::from(edge.key),
                vel: u7::from(edge.vel),
            }
        } else {
            MidiMessage::NoteOff {
                key: u7::from(edge.key),
                vel: u7::from(0),
            }
        };

        track_events.push(TrackEvent {
            delta: u28::from(delta_ticks),
            kind: TrackEventKind::Midi {
                channel: u4::from(edge.channel),
                message,
            },
        });
    }

    track_events.push(TrackEvent {
        delta: u28::from(0),
        kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
    });

    let header = Header {
        format: Format::SingleTrack,
        timing: Timing::Metrical(u15::from(ppq)),
    };

    let smf = Smf {
        header,
        tracks: vec![track_events],
    };

    let mut bytes = Vec::new();
    smf.write(&mut bytes)
        .map_err(|e| QuantizeError::MidiExportError(format!("Failed to write MIDI data: {:?}", e)))?;
    Ok(bytes)
}
