//! MusicXML emitter - consumes the song chart and emits a complete document

use super::builder::MusicXmlBuilder;
use crate::models::song::SongChart;

/// Emit a complete MusicXML chord chart: one measure per bar, the chord as
/// `<harmony>` with a whole-bar rest, section labels at section starts, and
/// the tempo direction in the first measure.
pub fn emit_musicxml(chart: &SongChart) -> String {
    let mut builder = MusicXmlBuilder::new();
    builder.set_title(Some(chart.title.clone()));
    builder.set_key_fifths(chart.key_fifths);
    builder.set_time(chart.beats_per_bar, chart.beat_unit);

    let mut first_measure = true;
    for section in &chart.sections {
        for (chord_index, chord) in section.chords.iter().enumerate() {
            for bar in 0..section.bars_per_chord {
                builder.start_measure();

                if first_measure {
                    builder.write_tempo(chart.tempo_bpm);
                    first_measure = false;
                }
                if chord_index == 0 && bar == 0 {
                    builder.write_words(&section.name);
                }
                // The harmony applies from its first bar; sustained bars only rest
                if bar == 0 {
                    builder.write_harmony(chord);
                }
                builder.write_bar_rest();

                builder.end_measure();
            }
        }
    }

    builder.finalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::song::SongChart;

    #[test]
    fn test_emit_full_song() {
        let chart = SongChart::over_the_years().unwrap();
        let xml = emit_musicxml(&chart);

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains("<!DOCTYPE score-partwise"));
        assert!(xml.contains("<work-title>Over the Years</work-title>"));

        // 44 bars, one harmony and one whole rest per bar
        assert_eq!(xml.matches("<measure number=").count(), 44);
        assert_eq!(xml.matches("<harmony>").count(), 44);
        assert_eq!(xml.matches("<rest/>").count(), 44);

        // Tempo direction only in the first measure
        assert_eq!(xml.matches("<per-minute>80</per-minute>").count(), 1);
        assert_eq!(xml.matches("<sound tempo=\"80\"/>").count(), 1);
    }

    #[test]
    fn test_section_labels() {
        let chart = SongChart::over_the_years().unwrap();
        let xml = emit_musicxml(&chart);

        for name in ["Intro", "Verse 1", "Pre-Chorus", "Verse 2", "Outro"] {
            assert!(
                xml.contains(&format!("<words>{}</words>", name)),
                "missing section label {}",
                name
            );
        }
        // Chorus appears twice in the song table
        assert_eq!(xml.matches("<words>Chorus</words>").count(), 2);
    }

    #[test]
    fn test_first_measure_attributes() {
        let chart = SongChart::over_the_years().unwrap();
        let xml = emit_musicxml(&chart);

        assert_eq!(xml.matches("<attributes>").count(), 1);
        assert!(xml.contains("<divisions>1</divisions>"));
        assert!(xml.contains("<fifths>0</fifths>"));
        assert!(xml.contains("<mode>major</mode>"));
        assert!(xml.contains("<beats>4</beats>"));
        assert!(xml.contains("<beat-type>4</beat-type>"));
    }

    #[test]
    fn test_sustained_chord_rests_without_harmony() {
        let mut chart = SongChart::over_the_years().unwrap();
        chart.sections.truncate(1);
        chart.sections[0].bars_per_chord = 2;
        let xml = emit_musicxml(&chart);

        // 4 chords over 8 bars: harmony only on each chord's first bar
        assert_eq!(xml.matches("<measure number=").count(), 8);
        assert_eq!(xml.matches("<harmony>").count(), 4);
        assert_eq!(xml.matches("<rest/>").count(), 8);
    }
}
