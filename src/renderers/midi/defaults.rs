//! Default values for MIDI export

/// Default ticks per quarter note (MIDI resolution)
pub const DEFAULT_TPQ: u16 = 480;

/// Chord velocity used throughout the chart (1-127)
pub const DEFAULT_VELOCITY: u8 = 80;

/// Default MIDI program (0 = Acoustic Grand Piano in General MIDI)
pub const DEFAULT_PROGRAM: u8 = 0;

/// All chart parts play on channel 0
pub const DEFAULT_CHANNEL: u8 = 0;
