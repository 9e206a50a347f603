//! Models module for the song-book engine
//!
//! Data structures produced by the markup parser and consumed by the
//! renderer: chords, layers, the per-song layer stack, chunks, lines,
//! parts and the song aggregate.

pub mod chord;
pub mod layers;
pub mod layer_stack;
pub mod chunk;
pub mod song;
pub mod header;

// Re-export commonly used types
pub use chord::{Chord, ChordRoot, ChordSign, ChordType};
pub use layers::*;
pub use layer_stack::{InsertOutcome, LayerRegistry, LayerStack, LayerState, StackEntry};
pub use chunk::{ChunkBuilder, LineChunk, SongPartLine};
pub use song::{PartKind, Song, SongPart};
pub use header::SongHeader;
