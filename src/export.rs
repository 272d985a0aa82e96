//! One-shot export operations
//!
//! Each function expands the chart and writes one artifact (or one directory
//! of per-section segments) under the given output directory.

use std::fs;
use std::path::{Path, PathBuf};

use log::info;
use serde::Serialize;

use crate::error::Result;
use crate::models::song::{slugify, SongChart};
use crate::renderers::midi::{write_smf, DEFAULT_TPQ};
use crate::renderers::musicxml::emit_musicxml;
use crate::score::{expand_full, expand_section_tracks};

/// Full-song MIDI: conductor track plus a single "Chords" track.
pub fn export_full_song_midi(chart: &SongChart, out_dir: &Path) -> Result<PathBuf> {
    let score = expand_full(chart, DEFAULT_TPQ);
    let bytes = write_smf(&score, false)?;
    let path = out_dir.join(format!("{}.mid", slugify(&chart.title)));
    fs::write(&path, bytes)?;
    info!("wrote full song MIDI: {}", path.display());
    Ok(path)
}

/// Full-song MIDI with section-boundary markers on the conductor track.
/// Most DAWs show these as timeline markers.
pub fn export_midi_with_markers(chart: &SongChart, out_dir: &Path) -> Result<PathBuf> {
    let score = expand_full(chart, DEFAULT_TPQ);
    let bytes = write_smf(&score, true)?;
    let path = out_dir.join(format!("{}_with_markers.mid", slugify(&chart.title)));
    fs::write(&path, bytes)?;
    info!("wrote MIDI with markers: {}", path.display());
    Ok(path)
}

/// Full-song MIDI with one track per section, aligned on the global timeline.
/// Imports into a DAW closest to pre-split regions.
pub fn export_midi_section_tracks(chart: &SongChart, out_dir: &Path) -> Result<PathBuf> {
    let score = expand_section_tracks(chart, DEFAULT_TPQ);
    let bytes = write_smf(&score, false)?;
    let path = out_dir.join(format!("{}_section_tracks.mid", slugify(&chart.title)));
    fs::write(&path, bytes)?;
    info!("wrote MIDI with section tracks: {}", path.display());
    Ok(path)
}

/// One MIDI file per section under `<out_dir>/segments/`.
pub fn export_midi_segments(chart: &SongChart, out_dir: &Path) -> Result<Vec<PathBuf>> {
    let segments_dir = out_dir.join("segments");
    fs::create_dir_all(&segments_dir)?;

    let mut exported = Vec::new();
    for (index, section) in chart.sections.iter().enumerate() {
        let segment = chart
            .section_chart(index)
            .ok_or_else(|| std::io::Error::other("section index out of range"))?;
        let score = expand_full(&segment, DEFAULT_TPQ);
        let bytes = write_smf(&score, false)?;
        let path = segments_dir.join(format!("{:02}_{}.mid", index + 1, slugify(&section.name)));
        fs::write(&path, bytes)?;
        info!("wrote MIDI segment: {}", path.display());
        exported.push(path);
    }
    Ok(exported)
}

/// Full-song MusicXML chord chart.
pub fn export_musicxml(chart: &SongChart, out_dir: &Path) -> Result<PathBuf> {
    let xml = emit_musicxml(chart);
    let path = out_dir.join(format!("{}.musicxml", slugify(&chart.title)));
    fs::write(&path, xml)?;
    info!("wrote MusicXML: {}", path.display());
    Ok(path)
}

/// One MusicXML file per section under `<out_dir>/segments_xml/`.
pub fn export_musicxml_segments(chart: &SongChart, out_dir: &Path) -> Result<Vec<PathBuf>> {
    let segments_dir = out_dir.join("segments_xml");
    fs::create_dir_all(&segments_dir)?;

    let mut exported = Vec::new();
    for (index, section) in chart.sections.iter().enumerate() {
        let segment = chart
            .section_chart(index)
            .ok_or_else(|| std::io::Error::other("section index out of range"))?;
        let xml = emit_musicxml(&segment);
        let path =
            segments_dir.join(format!("{:02}_{}.musicxml", index + 1, slugify(&section.name)));
        fs::write(&path, xml)?;
        info!("wrote MusicXML segment: {}", path.display());
        exported.push(path);
    }
    Ok(exported)
}

#[derive(Serialize)]
struct ChartSummary<'a> {
    #[serde(flatten)]
    chart: &'a SongChart,
    total_bars: u32,
    duration_seconds: f64,
}

/// Chart summary as JSON: metadata, sections, bar count and duration.
pub fn export_chart_json(chart: &SongChart, out_dir: &Path) -> Result<PathBuf> {
    let summary = ChartSummary {
        chart,
        total_bars: chart.total_bars(),
        duration_seconds: chart.duration_seconds(),
    };
    let json = serde_json::to_string_pretty(&summary)?;
    let path = out_dir.join(format!("{}.chart.json", slugify(&chart.title)));
    fs::write(&path, json)?;
    info!("wrote chart summary: {}", path.display());
    Ok(path)
}
