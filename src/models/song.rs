//! The song table for "Over the Years"
//!
//! A chart is an ordered list of named sections, each with its own chord list.
//! One chord occupies `bars_per_chord` measures (always 1 in this song).

use serde::Serialize;

use crate::error::Result;
use crate::models::chord::ChordSymbol;

/// A named, ordered span of bars within the song.
#[derive(Debug, Clone, Serialize)]
pub struct Section {
    pub name: String,
    pub chords: Vec<ChordSymbol>,
    pub bars_per_chord: u32,
}

impl Section {
    /// Build a section from chord-symbol text, one bar per chord.
    pub fn new(name: &str, symbols: &[&str]) -> Result<Self> {
        let chords = symbols
            .iter()
            .map(|s| ChordSymbol::parse(s))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            name: name.to_string(),
            chords,
            bars_per_chord: 1,
        })
    }

    /// Number of measures this section occupies.
    pub fn bar_count(&self) -> u32 {
        self.chords.len() as u32 * self.bars_per_chord
    }
}

/// The full chart: song metadata plus its ordered sections.
#[derive(Debug, Clone, Serialize)]
pub struct SongChart {
    pub title: String,
    pub style: String,
    pub tempo_bpm: u32,
    pub beats_per_bar: u32,
    pub beat_unit: u32,
    /// Key signature as circle-of-fifths position (0 = C major).
    pub key_fifths: i8,
    pub sections: Vec<Section>,
}

impl SongChart {
    /// The hardcoded chart for "Over the Years".
    /// Tempo 80 BPM, 4/4, C major, one chord per bar.
    pub fn over_the_years() -> Result<Self> {
        let sections = vec![
            Section::new("Intro", &["Cmaj7", "Am7", "Fmaj7", "G"])?,
            Section::new(
                "Verse 1",
                &["Cmaj7", "Am7", "Fmaj7", "G", "Cmaj7", "Am7", "Fmaj7", "G"],
            )?,
            Section::new("Pre-Chorus", &["Am7", "G", "Fmaj7", "G"])?,
            Section::new(
                "Chorus",
                &["Cmaj7", "Am7", "Fmaj7", "G", "Cmaj7", "Am7", "Fmaj7", "G"],
            )?,
            Section::new(
                "Verse 2",
                &["Cmaj7", "Am7", "Fmaj7", "G", "Cmaj7", "Am7", "Fmaj7", "G"],
            )?,
            Section::new(
                "Chorus",
                &["Cmaj7", "Am7", "Fmaj7", "G", "Cmaj7", "Am7", "Fmaj7", "G"],
            )?,
            Section::new("Outro", &["Cmaj7", "Am7", "Fmaj7", "Cmaj7"])?,
        ];

        Ok(Self {
            title: "Over the Years".to_string(),
            style: "Dream Pop / Shoegaze".to_string(),
            tempo_bpm: 80,
            beats_per_bar: 4,
            beat_unit: 4,
            key_fifths: 0,
            sections,
        })
    }

    /// Total number of measures in the song.
    pub fn total_bars(&self) -> u32 {
        self.sections.iter().map(Section::bar_count).sum()
    }

    /// Playing time in seconds at the chart tempo.
    pub fn duration_seconds(&self) -> f64 {
        (self.total_bars() as f64 * self.beats_per_bar as f64 * 60.0) / self.tempo_bpm as f64
    }

    /// A single-section chart sharing this chart's metadata, for segment export.
    pub fn section_chart(&self, index: usize) -> Option<SongChart> {
        let section = self.sections.get(index)?;
        Some(SongChart {
            title: format!("{} - {}", self.title, section.name),
            style: self.style.clone(),
            tempo_bpm: self.tempo_bpm,
            beats_per_bar: self.beats_per_bar,
            beat_unit: self.beat_unit,
            key_fifths: self.key_fifths,
            sections: vec![section.clone()],
        })
    }
}

/// Lowercase a name and collapse non-alphanumeric runs to underscores,
/// for use in segment file names ("Pre-Chorus" -> "pre_chorus").
pub fn slugify(name: &str) -> String {
    let mut slug = String::new();
    for ch in name.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('_') {
            slug.push('_');
        }
    }
    let slug = slug.trim_end_matches('_');
    if slug.is_empty() {
        "segment".to_string()
    } else {
        slug.to_string()
    }
}

/// Format a chord list for a MIDI track name, grouped into phrases:
/// `["Cmaj7","Am7","Fmaj7","G","Cmaj7",...]` -> "Cmaj7 Am7 Fmaj7 G | Cmaj7 ...".
pub fn format_progression(chords: &[ChordSymbol], group: usize) -> String {
    let words = |cs: &[ChordSymbol]| {
        cs.iter()
            .map(ChordSymbol::to_string)
            .collect::<Vec<_>>()
            .join(" ")
    };
    if group == 0 {
        return words(chords);
    }
    chords
        .chunks(group)
        .map(words)
        .collect::<Vec<_>>()
        .join(" | ")
}
