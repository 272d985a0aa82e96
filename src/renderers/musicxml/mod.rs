//! MusicXML chord-chart rendering
//!
//! Emits a score-partwise 3.1 document: one measure per bar, the chord symbol
//! as `<harmony>`, a whole-bar rest underneath, and section labels as
//! `<direction><words>` at each section start.

pub mod builder;
pub mod emitter;

pub use builder::MusicXmlBuilder;
pub use emitter::emit_musicxml;
