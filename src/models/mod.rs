pub mod chord;
pub mod song;

pub use chord::ChordSymbol;
pub use song::{Section, SongChart};
