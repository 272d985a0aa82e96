pub mod midi;
pub mod musicxml;
