// MusicXML builder state machine

use crate::models::chord::ChordSymbol;

/// Quarter-note divisions; the chart only needs whole-bar durations.
const DIVISIONS: u32 = 1;

/// State machine for building MusicXML chord-chart documents
pub struct MusicXmlBuilder {
    buffer: String,
    measure_number: u32,
    measure_started: bool,
    attributes_written: bool,
    title: Option<String>,
    key_fifths: i8,
    beats: u32,
    beat_type: u32,
}

impl MusicXmlBuilder {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            measure_number: 1,
            measure_started: false,
            attributes_written: false,
            title: None,
            key_fifths: 0,
            beats: 4,
            beat_type: 4,
        }
    }

    /// Set the work title emitted in the document header
    pub fn set_title(&mut self, title: Option<String>) {
        self.title = title;
    }

    /// Set the key signature as a circle-of-fifths position (0 = C major)
    pub fn set_key_fifths(&mut self, fifths: i8) {
        self.key_fifths = fifths;
    }

    /// Set the time signature (e.g. 4/4)
    pub fn set_time(&mut self, beats: u32, beat_type: u32) {
        self.beats = beats;
        self.beat_type = beat_type;
    }

    /// Start a new measure; the first measure also gets the attributes block
    pub fn start_measure(&mut self) {
        self.buffer
            .push_str(&format!("<measure number=\"{}\">\n", self.measure_number));
        self.measure_started = true;

        if !self.attributes_written {
            self.write_attributes();
            self.attributes_written = true;
        }
    }

    /// Close current measure and increment number
    pub fn end_measure(&mut self) {
        self.buffer.push_str("</measure>\n");
        self.measure_number += 1;
        self.measure_started = false;
    }

    /// Write a metronome tempo direction with a matching `<sound>` element
    pub fn write_tempo(&mut self, bpm: u32) {
        self.buffer.push_str("  <direction placement=\"above\">\n");
        self.buffer.push_str("    <direction-type>\n");
        self.buffer.push_str("      <metronome>\n");
        self.buffer.push_str("        <beat-unit>quarter</beat-unit>\n");
        self.buffer
            .push_str(&format!("        <per-minute>{}</per-minute>\n", bpm));
        self.buffer.push_str("      </metronome>\n");
        self.buffer.push_str("    </direction-type>\n");
        self.buffer
            .push_str(&format!("    <sound tempo=\"{}\"/>\n", bpm));
        self.buffer.push_str("  </direction>\n");
    }

    /// Write a text direction above the staff (section labels)
    pub fn write_words(&mut self, text: &str) {
        self.buffer.push_str("  <direction placement=\"above\">\n");
        self.buffer.push_str("    <direction-type>\n");
        self.buffer
            .push_str(&format!("      <words>{}</words>\n", xml_escape(text)));
        self.buffer.push_str("    </direction-type>\n");
        self.buffer.push_str("  </direction>\n");
    }

    /// Write the chord symbol as a `<harmony>` element
    pub fn write_harmony(&mut self, chord: &ChordSymbol) {
        self.buffer.push_str("  <harmony>\n");
        self.buffer.push_str("    <root>\n");
        self.buffer
            .push_str(&format!("      <root-step>{}</root-step>\n", chord.root_step()));
        if chord.root_alter() != 0 {
            self.buffer.push_str(&format!(
                "      <root-alter>{}</root-alter>\n",
                chord.root_alter()
            ));
        }
        self.buffer.push_str("    </root>\n");
        self.buffer
            .push_str(&format!("    <kind>{}</kind>\n", chord.kind()));
        self.buffer.push_str("  </harmony>\n");
    }

    /// Write a whole-bar rest
    pub fn write_bar_rest(&mut self) {
        self.buffer.push_str("  <note>\n");
        self.buffer.push_str("    <rest/>\n");
        self.buffer.push_str(&format!(
            "    <duration>{}</duration>\n",
            DIVISIONS * self.beats
        ));
        self.buffer.push_str("    <voice>1</voice>\n");
        self.buffer.push_str("    <type>whole</type>\n");
        self.buffer.push_str("  </note>\n");
    }

    /// Finalize and return the complete MusicXML string
    pub fn finalize(self) -> String {
        let mut xml = String::new();
        xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        xml.push_str("<!DOCTYPE score-partwise PUBLIC \"-//Recordare//DTD MusicXML 3.1 Partwise//EN\" \"http://www.musicxml.org/dtds/partwise.dtd\">\n");
        xml.push_str("<score-partwise version=\"3.1\">\n");

        if let Some(title) = &self.title {
            if !title.is_empty() {
                xml.push_str("  <work>\n");
                xml.push_str(&format!(
                    "    <work-title>{}</work-title>\n",
                    xml_escape(title)
                ));
                xml.push_str("  </work>\n");
            }
        }

        xml.push_str("  <identification>\n");
        xml.push_str("    <encoding>\n");
        xml.push_str("      <software>chord-gensong</software>\n");
        xml.push_str("    </encoding>\n");
        xml.push_str("  </identification>\n");

        xml.push_str("  <part-list>\n");
        xml.push_str("    <score-part id=\"P1\">\n");
        xml.push_str("      <part-name>Chords</part-name>\n");
        xml.push_str("    </score-part>\n");
        xml.push_str("  </part-list>\n");
        xml.push_str("  <part id=\"P1\">\n");
        xml.push_str(&self.buffer);
        xml.push_str("  </part>\n");
        xml.push_str("</score-partwise>\n");
        xml
    }

    /// Write MusicXML attributes (divisions, key, time, clef)
    fn write_attributes(&mut self) {
        self.buffer.push_str("  <attributes>\n");
        self.buffer
            .push_str(&format!("    <divisions>{}</divisions>\n", DIVISIONS));
        self.buffer.push_str("    <key>\n");
        self.buffer
            .push_str(&format!("      <fifths>{}</fifths>\n", self.key_fifths));
        self.buffer.push_str("      <mode>major</mode>\n");
        self.buffer.push_str("    </key>\n");
        self.buffer.push_str("    <time>\n");
        self.buffer
            .push_str(&format!("      <beats>{}</beats>\n", self.beats));
        self.buffer
            .push_str(&format!("      <beat-type>{}</beat-type>\n", self.beat_type));
        self.buffer.push_str("    </time>\n");
        self.buffer.push_str("    <clef>\n");
        self.buffer.push_str("      <sign>G</sign>\n");
        self.buffer.push_str("      <line>2</line>\n");
        self.buffer.push_str("    </clef>\n");
        self.buffer.push_str("  </attributes>\n");
    }
}

impl Default for MusicXmlBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Escape special XML characters
pub fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
