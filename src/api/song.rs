//! Song operations for the WASM API
//!
//! Parsing, JSON export, the loaded-song store, layer toggling and
//! rendering.

use wasm_bindgen::prelude::*;

use crate::api::helpers::{deserialize, js_error, lock_song, serialize};
use crate::models::{LayerIdentity, LayerState, LayerTag, SongHeader};
use crate::parse::parse_song;
use crate::renderers::{render_song, RenderSettings};
use crate::{wasm_error, wasm_info, wasm_log};

// ============================================================================
// Parsing
// ============================================================================

/// Parse a song body and return the parsed song
///
/// # Parameters
/// - `body`: full song markup (`<song>...</song>`)
/// - `is_fixed`: whether the song is marked fixed by the user
#[wasm_bindgen(js_name = parseSong)]
pub fn parse_song_js(body: &str, is_fixed: bool) -> Result<JsValue, JsValue> {
    wasm_info!("parseSong called: {} bytes", body.len());

    let song = parse_song(body, is_fixed).map_err(|e| js_error("Song parse error", e))?;
    wasm_log!("  Parsed {} parts", song.parts().len());

    serialize(&song, "Song serialization error")
}

/// Read the `<song>` header attributes
#[wasm_bindgen(js_name = parseSongHeader)]
pub fn parse_song_header(body: &str) -> Result<JsValue, JsValue> {
    wasm_info!("parseSongHeader called");

    let header = SongHeader::parse(body).map_err(|e| js_error("Song header error", e))?;
    serialize(&header, "Header serialization error")
}

/// Parse a song and return it as pretty-printed JSON (debugging aid)
#[wasm_bindgen(js_name = exportSongJson)]
pub fn export_song_json(body: &str, is_fixed: bool) -> Result<String, JsValue> {
    wasm_info!("exportSongJson called");

    let song = parse_song(body, is_fixed).map_err(|e| js_error("Song parse error", e))?;
    serde_json::to_string_pretty(&song).map_err(|e| js_error("JSON serialization error", e))
}

// ============================================================================
// Loaded song
// ============================================================================

/// Parse a song and keep it as the module's current song
#[wasm_bindgen(js_name = loadSong)]
pub fn load_song(body: &str, is_fixed: bool) -> Result<(), JsValue> {
    wasm_info!("loadSong called: {} bytes", body.len());

    let song = parse_song(body, is_fixed).map_err(|e| js_error("Song parse error", e))?;
    let mut guard = lock_song()?;
    *guard = Some(song);

    wasm_info!("loadSong completed successfully");
    Ok(())
}

/// Switch one layer of the loaded song ON or OFF
///
/// # Returns
/// `true` if a layer with this identity exists
#[wasm_bindgen(js_name = setLayerState)]
pub fn set_layer_state(
    tag: &str,
    chunk_id: &str,
    layer_id: &str,
    enabled: bool,
) -> Result<bool, JsValue> {
    wasm_info!(
        "setLayerState called: <{}> id={} layer={} enabled={}",
        tag,
        chunk_id,
        layer_id,
        enabled
    );

    let tag = LayerTag::from_name(tag).ok_or_else(|| {
        wasm_error!("Unknown layer tag: {}", tag);
        JsValue::from_str(&format!("Unknown layer tag: {}", tag))
    })?;

    let mut guard = lock_song()?;
    let song = guard
        .as_mut()
        .ok_or_else(|| JsValue::from_str("No song loaded"))?;

    let mut stack = song.layer_stack().clone();
    let state = if enabled { LayerState::On } else { LayerState::Off };
    let found = stack.set_state(&LayerIdentity::new(tag, chunk_id, layer_id), state);
    *song = song.with_settings(song.is_fixed(), stack);

    wasm_log!("  Layer found: {}", found);
    Ok(found)
}

/// Layer stack of the loaded song, with positions and ON/OFF state
#[wasm_bindgen(js_name = getLayerStack)]
pub fn get_layer_stack() -> Result<JsValue, JsValue> {
    let guard = lock_song()?;
    let song = guard
        .as_ref()
        .ok_or_else(|| JsValue::from_str("No song loaded"))?;

    serialize(song.layer_stack(), "Layer stack serialization error")
}

/// Render the loaded song into paintable rows
///
/// # Parameters
/// - `settings_js`: optional `RenderSettings` object; omitted fields use defaults
#[wasm_bindgen(js_name = renderLoadedSong)]
pub fn render_loaded_song(settings_js: JsValue) -> Result<JsValue, JsValue> {
    wasm_info!("renderLoadedSong called");

    let settings: RenderSettings = if settings_js.is_undefined() || settings_js.is_null() {
        RenderSettings::default()
    } else {
        deserialize(settings_js, "Render settings deserialization error")?
    };

    let guard = lock_song()?;
    let song = guard
        .as_ref()
        .ok_or_else(|| JsValue::from_str("No song loaded"))?;

    let rendered = render_song(song, &settings);
    wasm_log!("  Rendered {} parts", rendered.parts.len());

    serialize(&rendered, "Rendered song serialization error")
}

/// Plain text of every line of the loaded song, parts in song order
///
/// # Returns
/// JavaScript array of strings, one per line
#[wasm_bindgen(js_name = getSongLines)]
pub fn get_song_lines() -> Result<js_sys::Array, JsValue> {
    let guard = lock_song()?;
    let song = guard
        .as_ref()
        .ok_or_else(|| JsValue::from_str("No song loaded"))?;

    let result = js_sys::Array::new();
    for line in song.parts().iter().flat_map(|part| part.lines()) {
        result.push(&JsValue::from_str(&line.text()));
    }

    wasm_log!("  getSongLines returned {} lines", result.length());
    Ok(result)
}
