//! Command-line chord-chart exporter for "Over the Years"

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use chord_gensong::export::{
    export_chart_json, export_full_song_midi, export_midi_section_tracks,
    export_midi_segments, export_midi_with_markers, export_musicxml,
    export_musicxml_segments,
};
use chord_gensong::SongChart;

/// Generate MIDI and MusicXML chord charts for "Over the Years".
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory that receives the generated files
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,

    /// Skip the per-section segment files
    #[arg(long)]
    skip_segments: bool,

    /// Only write MIDI outputs
    #[arg(long, conflicts_with = "musicxml_only")]
    midi_only: bool,

    /// Only write MusicXML outputs
    #[arg(long)]
    musicxml_only: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let chart = SongChart::over_the_years()?;
    std::fs::create_dir_all(&args.out_dir)?;

    println!("Generating chord charts for '{}'...", chart.title);
    println!("Style: {}", chart.style);
    println!("Tempo: {} BPM", chart.tempo_bpm);
    println!("Time Signature: {}/{}", chart.beats_per_bar, chart.beat_unit);
    println!("Key: C Major\n");

    let mut written = Vec::new();

    if !args.musicxml_only {
        written.push(export_full_song_midi(&chart, &args.out_dir)?);
        written.push(export_midi_with_markers(&chart, &args.out_dir)?);
        written.push(export_midi_section_tracks(&chart, &args.out_dir)?);
        if !args.skip_segments {
            written.extend(export_midi_segments(&chart, &args.out_dir)?);
        }
    }

    if !args.midi_only {
        written.push(export_musicxml(&chart, &args.out_dir)?);
        if !args.skip_segments {
            written.extend(export_musicxml_segments(&chart, &args.out_dir)?);
        }
    }

    written.push(export_chart_json(&chart, &args.out_dir)?);

    let duration = chart.duration_seconds();
    println!("Total bars: {}", chart.total_bars());
    println!(
        "Duration: {:.1} seconds ({:.2} minutes)",
        duration,
        duration / 60.0
    );
    println!("Files written: {}", written.len());
    for path in &written {
        println!("  {}", path.display());
    }

    Ok(())
}
