//! Song-book markup engine (WASM module)
//!
//! Parses song markup (verses, choruses and bridges made of lines of text
//! annotated with chord and repeat layers) into a [`Song`], tracks the
//! song's layers in a [`LayerStack`] and renders the result into rows a
//! front-end can paint.
//!
//! ```ignore
//! use songbook_wasm::{parse_song, render_song, RenderSettings};
//!
//! let song = parse_song(body, false)?;
//! let view = render_song(&song, &RenderSettings::default());
//! ```

pub mod models;
pub mod parse;
pub mod renderers;
pub mod api;

// Re-export commonly used types
pub use models::*;
pub use parse::{parse_part, parse_song, ParseError};
pub use renderers::{render_song, RenderSettings, RenderedSong};

use wasm_bindgen::prelude::*;

// This is like the `main` function, but for WASM modules.
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    #[cfg(feature = "console_log")]
    {
        if let Err(e) = console_log::init_with_level(log::Level::Debug) {
            crate::api::helpers::log_error(&format!("failed to initialize logger: {}", e));
        }
    }

    log::info!("Song-book WASM module initialized");
}
