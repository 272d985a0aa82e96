//! Lean score IR for export
//!
//! Holds just what the serializers need: tick-timed note events plus the
//! tempo/meter/key header and section markers. Not a full music object model.

use crate::models::song::{format_progression, Section, SongChart};
use crate::renderers::midi::defaults::{DEFAULT_CHANNEL, DEFAULT_PROGRAM, DEFAULT_VELOCITY};

#[derive(Debug, Clone)]
pub struct Score {
    pub tpq: u16,                // Ticks per quarter note
    pub tempos: Vec<Tempo>,      // (tick, bpm) sorted by tick
    pub timesigs: Vec<TimeSig>,  // (tick, num, den) sorted by tick
    pub key_fifths: i8,          // Circle-of-fifths position (0 = C major)
    pub markers: Vec<Marker>,    // Section starts, sorted by tick
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone)]
pub struct Tempo {
    pub tick: u64,
    pub bpm: f64,
}

#[derive(Debug, Clone)]
pub struct TimeSig {
    pub tick: u64,
    pub num: u8,
    pub den: u8,
}

#[derive(Debug, Clone)]
pub struct Marker {
    pub tick: u64,
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct Part {
    pub name: String,
    pub channel: u8,          // MIDI channel 0-15
    pub program: Option<u8>,  // MIDI program 0-127 (GM instrument)
    pub notes: Vec<Note>,
}

#[derive(Debug, Clone)]
pub struct Note {
    pub start_tick: u64,
    pub dur_tick: u64,
    pub pitch: u8,  // MIDI note number 0-127
    pub vel: u8,    // Velocity 1-127
}

/// Ticks in one measure of the chart's meter.
pub fn ticks_per_bar(chart: &SongChart, tpq: u16) -> u64 {
    // One beat = tpq * 4 / beat_unit ticks (quarter-note based resolution)
    chart.beats_per_bar as u64 * tpq as u64 * 4 / chart.beat_unit as u64
}

/// Expand the whole chart into a single "Chords" part: one chord block per
/// bar, in table order. Section markers are always populated.
pub fn expand_full(chart: &SongChart, tpq: u16) -> Score {
    let mut score = header_score(chart, tpq);
    let bar_ticks = ticks_per_bar(chart, tpq);

    let mut notes = Vec::new();
    let mut tick = 0u64;
    for section in &chart.sections {
        append_section_notes(section, bar_ticks, &mut tick, &mut notes);
    }

    score.parts.push(Part {
        name: "Chords".to_string(),
        channel: DEFAULT_CHANNEL,
        program: Some(DEFAULT_PROGRAM),
        notes,
    });
    score
}

/// Expand the chart with one part per section, each offset onto the shared
/// global timeline. Imports into a DAW as pre-split regions.
pub fn expand_section_tracks(chart: &SongChart, tpq: u16) -> Score {
    let mut score = header_score(chart, tpq);
    let bar_ticks = ticks_per_bar(chart, tpq);

    let mut section_start = 0u64;
    for (index, section) in chart.sections.iter().enumerate() {
        let mut notes = Vec::new();
        let mut tick = section_start;
        append_section_notes(section, bar_ticks, &mut tick, &mut notes);

        score.parts.push(Part {
            name: format!(
                "{:02} {} - Chord Progression: {}",
                index + 1,
                section.name,
                format_progression(&section.chords, 4)
            ),
            channel: DEFAULT_CHANNEL,
            program: Some(DEFAULT_PROGRAM),
            notes,
        });

        section_start += section.bar_count() as u64 * bar_ticks;
    }
    score
}

/// Tempo/meter/key header plus section-start markers, no parts yet.
fn header_score(chart: &SongChart, tpq: u16) -> Score {
    let bar_ticks = ticks_per_bar(chart, tpq);

    let mut markers = Vec::new();
    let mut tick = 0u64;
    for (index, section) in chart.sections.iter().enumerate() {
        markers.push(Marker {
            tick,
            text: format!("{:02} {} ({} bars)", index + 1, section.name, section.bar_count()),
        });
        tick += section.bar_count() as u64 * bar_ticks;
    }

    Score {
        tpq,
        tempos: vec![Tempo {
            tick: 0,
            bpm: chart.tempo_bpm as f64,
        }],
        timesigs: vec![TimeSig {
            tick: 0,
            num: chart.beats_per_bar as u8,
            den: chart.beat_unit as u8,
        }],
        key_fifths: chart.key_fifths,
        markers,
        parts: vec![],
    }
}

/// Emit one sustained chord block per table entry, advancing the cursor by
/// `bars_per_chord` measures each time.
fn append_section_notes(
    section: &Section,
    bar_ticks: u64,
    tick: &mut u64,
    notes: &mut Vec<Note>,
) {
    let dur_tick = section.bars_per_chord as u64 * bar_ticks;
    for chord in &section.chords {
        for pitch in chord.midi_notes() {
            notes.push(Note {
                start_tick: *tick,
                dur_tick,
                pitch,
                vel: DEFAULT_VELOCITY,
            });
        }
        *tick += dur_tick;
    }
}
