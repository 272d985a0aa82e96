//! Chord-chart export for "Over the Years"
//!
//! Expands a fixed table of song sections and chord symbols into timed note
//! events and serializes them as Standard MIDI Files and MusicXML chord charts.

pub mod error;
pub mod export;
pub mod models;
pub mod renderers;
pub mod score;

// Re-export commonly used types
pub use error::ChartError;
pub use models::chord::ChordSymbol;
pub use models::song::SongChart;
