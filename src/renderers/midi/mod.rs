//! MIDI chord-chart rendering
//!
//! Serializes the score IR to Standard MIDI File (SMF) Format 1 via `midly`:
//! a conductor track carrying tempo/meter/key (and optional section markers),
//! then one track per part.

pub mod defaults;
pub mod writer;

pub use defaults::{DEFAULT_CHANNEL, DEFAULT_PROGRAM, DEFAULT_TPQ, DEFAULT_VELOCITY};
pub use writer::write_smf;
