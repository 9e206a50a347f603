//! Song-book WASM API
//!
//! JavaScript-facing entry points. The parser itself is plain Rust; this
//! layer converts values across the boundary with serde-wasm-bindgen, logs
//! each call to the browser console and keeps one loaded song whose layers
//! the UI can switch on and off.
//!
//! # Module Structure
//!
//! - `helpers`: logging macros, serialization, error conversion, song store
//! - `song`: parse, export, load, toggle and render operations

pub mod helpers;
pub mod song;

// Re-export all public functions to keep one flat API surface
pub use song::{
    export_song_json, get_layer_stack, get_song_lines, load_song, parse_song_header, parse_song_js,
    render_loaded_song, set_layer_state,
};
