use midly::{
    Format, Header, MetaMessage, MidiMessage, Smf, Timing, Track, TrackEvent, TrackEventKind,
};

use crate::error::{ChartError, Result};
use crate::score::{Part, Score};

/// Write a score to Standard MIDI File (SMF) Format 1 bytes.
///
/// Track 0 is the conductor track (tempo, time signature, key signature, and
/// section markers when `include_markers` is set); tracks 1+ hold one part each.
pub fn write_smf(score: &Score, include_markers: bool) -> Result<Vec<u8>> {
    let mut tracks = Vec::new();
    tracks.push(build_conductor_track(score, include_markers));
    for part in &score.parts {
        tracks.push(build_part_track(part));
    }

    let header = Header {
        format: Format::Parallel,
        timing: Timing::Metrical(score.tpq.into()),
    };

    let smf = Smf { header, tracks };

    let mut out = Vec::new();
    smf.write(&mut out)
        .map_err(|e| ChartError::Midi(format!("failed to write MIDI: {}", e)))?;
    Ok(out)
}

fn build_conductor_track(score: &Score, include_markers: bool) -> Track<'_> {
    let mut events = Vec::new();

    events.push(TrackEvent {
        delta: 0.into(),
        kind: TrackEventKind::Meta(MetaMessage::TrackName(b"Song Info")),
    });

    for tempo in &score.tempos {
        let microseconds_per_quarter = (60_000_000.0 / tempo.bpm) as u32;
        events.push(TrackEvent {
            delta: (tempo.tick as u32).into(),
            kind: TrackEventKind::Meta(MetaMessage::Tempo(microseconds_per_quarter.into())),
        });
    }

    for ts in &score.timesigs {
        // Denominator stored as power of 2 (4 -> 2, 8 -> 3)
        let denominator_power = (ts.den as f32).log2() as u8;
        events.push(TrackEvent {
            delta: (ts.tick as u32).into(),
            kind: TrackEventKind::Meta(MetaMessage::TimeSignature(
                ts.num,
                denominator_power,
                24, // MIDI clocks per metronome click
                8,  // 32nd notes per quarter note
            )),
        });
    }

    events.push(TrackEvent {
        delta: 0.into(),
        kind: TrackEventKind::Meta(MetaMessage::KeySignature(score.key_fifths, false)),
    });

    if include_markers {
        for marker in &score.markers {
            events.push(TrackEvent {
                delta: (marker.tick as u32).into(),
                kind: TrackEventKind::Meta(MetaMessage::Marker(marker.text.as_bytes())),
            });
        }
    }

    // Sort by absolute tick, then convert to delta times
    events.sort_by_key(|e| e.delta.as_int());
    convert_to_delta_times(&mut events);

    events.push(TrackEvent {
        delta: 0.into(),
        kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
    });

    events
}

fn build_part_track(part: &Part) -> Track<'_> {
    let mut events = Vec::new();

    events.push(TrackEvent {
        delta: 0.into(),
        kind: TrackEventKind::Meta(MetaMessage::TrackName(part.name.as_bytes())),
    });

    if let Some(program) = part.program {
        events.push(TrackEvent {
            delta: 0.into(),
            kind: TrackEventKind::Midi {
                channel: part.channel.into(),
                message: MidiMessage::ProgramChange {
                    program: program.into(),
                },
            },
        });
    }

    for note in &part.notes {
        events.push(TrackEvent {
            delta: (note.start_tick as u32).into(),
            kind: TrackEventKind::Midi {
                channel: part.channel.into(),
                message: MidiMessage::NoteOn {
                    key: note.pitch.into(),
                    vel: note.vel.into(),
                },
            },
        });
        events.push(TrackEvent {
            delta: ((note.start_tick + note.dur_tick) as u32).into(),
            kind: TrackEventKind::Midi {
                channel: part.channel.into(),
                message: MidiMessage::NoteOff {
                    key: note.pitch.into(),
                    vel: 0.into(),
                },
            },
        });
    }

    // Stable sort keeps note-offs ahead of note-ons at bar boundaries
    events.sort_by_key(|e| e.delta.as_int());
    convert_to_delta_times(&mut events);

    events.push(TrackEvent {
        delta: 0.into(),
        kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
    });

    events
}

/// Convert absolute tick times to delta times (time since previous event)
fn convert_to_delta_times(events: &mut [TrackEvent]) {
    let mut prev_tick = 0u32;
    for event in events.iter_mut() {
        let current_tick = event.delta.as_int();
        let delta = current_tick.saturating_sub(prev_tick);
        event.delta = delta.into();
        prev_tick = current_tick;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::score::{Marker, Note, Tempo, TimeSig};

    fn one_bar_score() -> Score {
        Score {
            tpq: 480,
            tempos: vec![Tempo { tick: 0, bpm: 80.0 }],
            timesigs: vec![TimeSig { tick: 0, num: 4, den: 4 }],
            key_fifths: 0,
            markers: vec![Marker {
                tick: 0,
                text: "01 Intro (1 bars)".to_string(),
            }],
            parts: vec![Part {
                name: "Chords".to_string(),
                channel: 0,
                program: Some(0),
                notes: vec![
                    Note { start_tick: 0, dur_tick: 1920, pitch: 60, vel: 80 },
                    Note { start_tick: 0, dur_tick: 1920, pitch: 64, vel: 80 },
                    Note { start_tick: 0, dur_tick: 1920, pitch: 67, vel: 80 },
                ],
            }],
        }
    }

    #[test]
    fn test_write_minimal_smf() {
        let out = write_smf(&one_bar_score(), false).expect("write failed");

        assert_eq!(&out[0..4], b"MThd");
        // Format 1, two tracks (conductor + part)
        assert_eq!(out[8], 0x00);
        assert_eq!(out[9], 0x01);
        assert_eq!(out[10], 0x00);
        assert_eq!(out[11], 0x02);
    }

    #[test]
    fn test_markers_only_when_requested() {
        let plain = write_smf(&one_bar_score(), false).expect("write failed");
        let marked = write_smf(&one_bar_score(), true).expect("write failed");
        assert!(marked.len() > plain.len());

        let smf = Smf::parse(&marked).expect("parse failed");
        let marker_count = smf.tracks[0]
            .iter()
            .filter(|e| matches!(e.kind, TrackEventKind::Meta(MetaMessage::Marker(_))))
            .count();
        assert_eq!(marker_count, 1);
    }

    #[test]
    fn test_note_off_precedes_next_note_on() {
        let mut score = one_bar_score();
        // Two consecutive one-bar chords on the same track
        score.parts[0].notes = vec![
            Note { start_tick: 0, dur_tick: 1920, pitch: 60, vel: 80 },
            Note { start_tick: 1920, dur_tick: 1920, pitch: 55, vel: 80 },
        ];
        let out = write_smf(&score, false).expect("write failed");
        let smf = Smf::parse(&out).expect("parse failed");

        let kinds: Vec<_> = smf.tracks[1]
            .iter()
            .filter_map(|e| match e.kind {
                TrackEventKind::Midi { message: MidiMessage::NoteOn { key, .. }, .. } => {
                    Some(("on", key.as_int()))
                }
                TrackEventKind::Midi { message: MidiMessage::NoteOff { key, .. }, .. } => {
                    Some(("off", key.as_int()))
                }
                _ => None,
            })
            .collect();
        assert_eq!(
            kinds,
            vec![("on", 60), ("off", 60), ("on", 55), ("off", 55)]
        );
    }

    #[test]
    fn test_delta_time_conversion() {
        let mut events = vec![
            TrackEvent {
                delta: 0.into(),
                kind: TrackEventKind::Meta(MetaMessage::TrackName(b"Test")),
            },
            TrackEvent {
                delta: 100.into(),
                kind: TrackEventKind::Midi {
                    channel: 0.into(),
                    message: MidiMessage::NoteOn { key: 60.into(), vel: 80.into() },
                },
            },
            TrackEvent {
                delta: 300.into(),
                kind: TrackEventKind::Midi {
                    channel: 0.into(),
                    message: MidiMessage::NoteOff { key: 60.into(), vel: 0.into() },
                },
            },
        ];

        convert_to_delta_times(&mut events);

        assert_eq!(events[0].delta.as_int(), 0);
        assert_eq!(events[1].delta.as_int(), 100);
        assert_eq!(events[2].delta.as_int(), 200);
    }
}
