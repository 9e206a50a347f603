//! Rendering settings
//!
//! Accepted from JavaScript as a plain object; every field is optional.

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct RenderSettings {
    /// Emit one chunk per word so the front-end can wrap lines
    pub split_words: bool,
    pub show_chords: bool,
    /// Written before the repeat count at the end of a repeat span
    pub repeat_marker: String,
    /// Hide layers switched OFF in the song's layer stack
    pub respect_layer_state: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            split_words: true,
            show_chords: true,
            repeat_marker: "x".to_string(),
            respect_layer_state: true,
        }
    }
}
