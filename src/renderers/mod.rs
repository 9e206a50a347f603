//! Renderers for parsed songs
//!
//! Turns a [`Song`](crate::models::Song) into rows the front-end can paint
//! directly.

pub mod settings;
pub mod song_view;

// Re-export commonly used types
pub use settings::RenderSettings;
pub use song_view::{
    render_part, render_song, ChordSlot, RenderedChunk, RenderedLine, RenderedPart, RenderedSong,
    SpanMarker,
};
