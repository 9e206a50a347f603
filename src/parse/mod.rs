//! Parsing module for song markup
//!
//! The pipeline runs song → part → line. A [`LayerStack`] is threaded
//! through the whole song; a [`CurrentLayersHolder`] lives for one part.
//! Elements are cut out of their parent's text with the [`Extractor`]
//! rather than re-serialized.
//!
//! [`LayerStack`]: crate::models::LayerStack

pub mod tags;
pub mod errors;
pub mod extractor;
pub mod scanner;
pub mod current_layers;
pub mod layer_builder;
pub mod line_builder;
pub mod part_builder;
pub mod song_builder;

// Re-export commonly used types
pub use errors::{ExtractError, LayerError, ParseError, Result};
pub use extractor::{Extractor, TextPoint};
pub use current_layers::{CurrentLayersHolder, HolderOperation, OpenSpan};
pub use layer_builder::{build_layer, process_layer_tag, LayerEvent};
pub use line_builder::{build_line, patch_closed_span, BuiltLine, PatchOutcome};
pub use part_builder::parse_part;
pub use song_builder::parse_song;
