//! WASM build test
//!
//! Checks that the exported API works across the JS boundary.

#![cfg(target_arch = "wasm32")]

use songbook_wasm::api::*;
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

const SONG: &str = r#"<song number="7" name="Morning" canon="" text="" textRus="" music="" additionalInfo=""><verse number="1"><string><plain>Wake </plain><chord id="1" main_chord="D" chord_is_minor="false" chord_sign="" chord_type=""/><plain>up</plain></string></verse></song>"#;

#[wasm_bindgen_test]
fn test_parse_song() {
    let result = parse_song_js(SONG, false);
    assert!(result.is_ok());
}

#[wasm_bindgen_test]
fn test_parse_error_is_reported() {
    let result = parse_song_js("<song><verse></verse></song>", false);
    assert!(result.is_err());
}

#[wasm_bindgen_test]
fn test_export_song_json() {
    let json = export_song_json(SONG, true).unwrap();
    assert!(json.contains("\"is_fixed\": true"));
    assert!(json.contains("\"text\": \"Wake \""));
}

#[wasm_bindgen_test]
fn test_loaded_song_layers() {
    load_song(SONG, false).unwrap();

    assert_eq!(set_layer_state("chord", "1", "0", false).unwrap(), true);
    assert_eq!(set_layer_state("chord", "9", "0", false).unwrap(), false);
    assert!(set_layer_state("strum", "1", "0", false).is_err());

    assert!(get_layer_stack().is_ok());
    assert!(render_loaded_song(JsValue::UNDEFINED).is_ok());

    let lines = get_song_lines().unwrap();
    assert_eq!(lines.length(), 1);
    assert_eq!(lines.get(0).as_string().as_deref(), Some("Wake up"));
}
