//! Chord-symbol resolution
//!
//! A chord symbol like "Am7" names a root pitch plus a fixed set of semitone
//! offsets. Resolution is a finite lookup over known quality suffixes, not a
//! general chord grammar; unknown roots or qualities are rejected.

use std::collections::BTreeMap;
use std::fmt;

use once_cell::sync::Lazy;
use serde::{Serialize, Serializer};

use crate::error::{ChartError, Result};

/// Lowest root placement used by the chart voicings: roots land in the octave
/// F3..E4 (MIDI 53..=64), with chord tones stacked upward from the root.
const ROOT_FLOOR: u8 = 53; // F3

/// Quality suffix -> (semitone offsets from root, MusicXML `<kind>` value).
///
/// Keys are lowercase. Aliases share an entry (e.g. "m7" and "min7").
static QUALITIES: Lazy<BTreeMap<&'static str, (&'static [u8], &'static str)>> = Lazy::new(|| {
    let mut m: BTreeMap<&'static str, (&'static [u8], &'static str)> = BTreeMap::new();

    // Triads
    m.insert("", (&[0, 4, 7], "major"));
    m.insert("maj", (&[0, 4, 7], "major"));
    m.insert("major", (&[0, 4, 7], "major"));
    m.insert("m", (&[0, 3, 7], "minor"));
    m.insert("min", (&[0, 3, 7], "minor"));
    m.insert("minor", (&[0, 3, 7], "minor"));
    m.insert("dim", (&[0, 3, 6], "diminished"));
    m.insert("aug", (&[0, 4, 8], "augmented"));
    m.insert("sus2", (&[0, 2, 7], "suspended-second"));
    m.insert("sus4", (&[0, 5, 7], "suspended-fourth"));
    m.insert("5", (&[0, 7], "power"));

    // Sixths
    m.insert("6", (&[0, 4, 7, 9], "major-sixth"));
    m.insert("m6", (&[0, 3, 7, 9], "minor-sixth"));

    // Sevenths
    m.insert("7", (&[0, 4, 7, 10], "dominant"));
    m.insert("dom7", (&[0, 4, 7, 10], "dominant"));
    m.insert("maj7", (&[0, 4, 7, 11], "major-seventh"));
    m.insert("ma7", (&[0, 4, 7, 11], "major-seventh"));
    m.insert("m7", (&[0, 3, 7, 10], "minor-seventh"));
    m.insert("min7", (&[0, 3, 7, 10], "minor-seventh"));
    m.insert("dim7", (&[0, 3, 6, 9], "diminished-seventh"));
    m.insert("m7b5", (&[0, 3, 6, 10], "half-diminished"));
    m.insert("7sus4", (&[0, 5, 7, 10], "dominant"));

    // Extensions
    m.insert("add9", (&[0, 4, 7, 14], "major"));
    m.insert("9", (&[0, 4, 7, 10, 14], "dominant-ninth"));
    m.insert("maj9", (&[0, 4, 7, 11, 14], "major-ninth"));
    m.insert("m9", (&[0, 3, 7, 10, 14], "minor-ninth"));

    m
});

/// A resolved chord symbol: textual form plus root and interval set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChordSymbol {
    symbol: String,
    root_step: char,
    root_alter: i8,
    offsets: &'static [u8],
    kind: &'static str,
}

impl ChordSymbol {
    /// Parse a chord symbol such as "Cmaj7", "Am7", "Bb7" or "F#m7b5".
    pub fn parse(text: &str) -> Result<Self> {
        let symbol = text.trim();
        let mut chars = symbol.chars();
        let letter = chars
            .next()
            .ok_or_else(|| ChartError::Chord(symbol.to_string()))?
            .to_ascii_uppercase();
        if !('A'..='G').contains(&letter) {
            return Err(ChartError::Chord(symbol.to_string()));
        }

        let rest = chars.as_str();
        let (root_alter, quality) = match rest.chars().next() {
            Some('#') => (1, &rest[1..]),
            Some('b') => (-1, &rest[1..]),
            _ => (0, rest),
        };

        let key = quality.to_ascii_lowercase();
        let (offsets, kind) = QUALITIES
            .get(key.as_str())
            .copied()
            .ok_or_else(|| ChartError::Chord(symbol.to_string()))?;

        Ok(Self {
            symbol: symbol.to_string(),
            root_step: letter,
            root_alter,
            offsets,
            kind,
        })
    }

    /// Root note letter (C, D, E, F, G, A, B).
    pub fn root_step(&self) -> char {
        self.root_step
    }

    /// Root alteration in semitones (-1 = flat, 0 = natural, 1 = sharp).
    pub fn root_alter(&self) -> i8 {
        self.root_alter
    }

    /// MusicXML `<kind>` value for this chord quality.
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    /// Semitone offsets from the root, ascending.
    pub fn semitones(&self) -> &'static [u8] {
        self.offsets
    }

    /// Root pitch class (0 = C .. 11 = B).
    pub fn pitch_class(&self) -> u8 {
        let base: i16 = match self.root_step {
            'C' => 0,
            'D' => 2,
            'E' => 4,
            'F' => 5,
            'G' => 7,
            'A' => 9,
            'B' => 11,
            _ => unreachable!("parse only accepts A-G"),
        };
        (base + self.root_alter as i16).rem_euclid(12) as u8
    }

    /// MIDI note number of the voiced root (MIDI 60 = C4, middle C).
    pub fn root_midi(&self) -> u8 {
        let pc = self.pitch_class();
        ROOT_FLOOR + (pc + 12 - 5) % 12
    }

    /// Voiced chord tones as MIDI note numbers, ascending from the root.
    pub fn midi_notes(&self) -> Vec<u8> {
        let root = self.root_midi();
        self.offsets
            .iter()
            .map(|offset| (root + offset).min(127))
            .collect()
    }
}

impl fmt::Display for ChordSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.symbol)
    }
}

impl Serialize for ChordSymbol {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.symbol)
    }
}
