// Full-song MIDI export tests
//
// Writes SMF bytes through the public export pipeline and parses them back
// with midly to check the encoded structure.

use midly::{Format, MetaMessage, MidiMessage, Smf, Timing, TrackEventKind};

use chord_gensong::renderers::midi::{write_smf, DEFAULT_TPQ};
use chord_gensong::score::{expand_full, expand_section_tracks};
use chord_gensong::SongChart;

fn note_on_count(track: &[midly::TrackEvent]) -> usize {
    track
        .iter()
        .filter(|e| {
            matches!(
                e.kind,
                TrackEventKind::Midi {
                    message: MidiMessage::NoteOn { vel, .. },
                    ..
                } if vel.as_int() > 0
            )
        })
        .count()
}

#[test]
fn full_song_round_trips_through_midly() {
    let chart = SongChart::over_the_years().unwrap();
    let score = expand_full(&chart, DEFAULT_TPQ);
    let bytes = write_smf(&score, false).unwrap();

    let smf = Smf::parse(&bytes).expect("generated SMF should parse");
    assert_eq!(smf.header.format, Format::Parallel);
    assert_eq!(smf.header.timing, Timing::Metrical(480.into()));

    // Conductor track + one chord track
    assert_eq!(smf.tracks.len(), 2);
    assert_eq!(note_on_count(&smf.tracks[1]), 165);
}

#[test]
fn conductor_track_carries_tempo_meter_and_key() {
    let chart = SongChart::over_the_years().unwrap();
    let score = expand_full(&chart, DEFAULT_TPQ);
    let bytes = write_smf(&score, false).unwrap();
    let smf = Smf::parse(&bytes).unwrap();

    let mut saw_tempo = false;
    let mut saw_timesig = false;
    let mut saw_key = false;
    for event in &smf.tracks[0] {
        match event.kind {
            TrackEventKind::Meta(MetaMessage::Tempo(us)) => {
                // 60,000,000 / 80 BPM
                assert_eq!(us.as_int(), 750_000);
                saw_tempo = true;
            }
            TrackEventKind::Meta(MetaMessage::TimeSignature(num, den_pow, _, _)) => {
                assert_eq!(num, 4);
                assert_eq!(den_pow, 2);
                saw_timesig = true;
            }
            TrackEventKind::Meta(MetaMessage::KeySignature(fifths, minor)) => {
                assert_eq!(fifths, 0);
                assert!(!minor);
                saw_key = true;
            }
            _ => {}
        }
    }
    assert!(saw_tempo && saw_timesig && saw_key);
}

#[test]
fn marker_export_labels_every_section() {
    let chart = SongChart::over_the_years().unwrap();
    let score = expand_full(&chart, DEFAULT_TPQ);
    let bytes = write_smf(&score, true).unwrap();
    let smf = Smf::parse(&bytes).unwrap();

    let markers: Vec<String> = smf.tracks[0]
        .iter()
        .filter_map(|e| match e.kind {
            TrackEventKind::Meta(MetaMessage::Marker(text)) => {
                Some(String::from_utf8_lossy(text).into_owned())
            }
            _ => None,
        })
        .collect();

    assert_eq!(markers.len(), 7);
    assert_eq!(markers[0], "01 Intro (4 bars)");
    assert_eq!(markers[2], "03 Pre-Chorus (4 bars)");
    assert_eq!(markers[6], "07 Outro (4 bars)");
}

#[test]
fn section_tracks_export_has_one_track_per_section() {
    let chart = SongChart::over_the_years().unwrap();
    let score = expand_section_tracks(&chart, DEFAULT_TPQ);
    let bytes = write_smf(&score, false).unwrap();
    let smf = Smf::parse(&bytes).unwrap();

    // Conductor + 7 section tracks
    assert_eq!(smf.tracks.len(), 8);

    let names: Vec<String> = smf
        .tracks
        .iter()
        .filter_map(|track| {
            track.iter().find_map(|e| match e.kind {
                TrackEventKind::Meta(MetaMessage::TrackName(name)) => {
                    Some(String::from_utf8_lossy(name).into_owned())
                }
                _ => None,
            })
        })
        .collect();
    assert_eq!(names[0], "Song Info");
    assert_eq!(
        names[1],
        "01 Intro - Chord Progression: Cmaj7 Am7 Fmaj7 G"
    );
    assert_eq!(
        names[2],
        "02 Verse 1 - Chord Progression: Cmaj7 Am7 Fmaj7 G | Cmaj7 Am7 Fmaj7 G"
    );

    // Note totals per section: 15, 30, 14, 30, 30, 30, 16
    let counts: Vec<usize> = smf.tracks[1..].iter().map(|t| note_on_count(t)).collect();
    assert_eq!(counts, vec![15, 30, 14, 30, 30, 30, 16]);
}

#[test]
fn section_tracks_are_offset_on_the_global_timeline() {
    let chart = SongChart::over_the_years().unwrap();
    let score = expand_section_tracks(&chart, DEFAULT_TPQ);
    let bytes = write_smf(&score, false).unwrap();
    let smf = Smf::parse(&bytes).unwrap();

    // Accumulate delta times up to the first note-on of the Verse 1 track:
    // it starts after the 4-bar intro (4 * 1920 ticks).
    let mut tick = 0u32;
    let mut first_on = None;
    for event in &smf.tracks[2] {
        tick += event.delta.as_int();
        if matches!(
            event.kind,
            TrackEventKind::Midi {
                message: MidiMessage::NoteOn { .. },
                ..
            }
        ) {
            first_on = Some(tick);
            break;
        }
    }
    assert_eq!(first_on, Some(4 * 1920));
}
