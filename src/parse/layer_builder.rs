//! Layer construction from markup tags
//!
//! Tag names map to concrete layer types through a fixed dispatch table.
//! Processing a tag also performs its side effects on the layer stack and
//! on the holder of open spans, and reports what happened as a
//! [`LayerEvent`] for the line builder to act on.

use once_cell::sync::Lazy;
use std::collections::HashMap;

use crate::models::chord::{Chord, ChordRoot, ChordSign, ChordType};
use crate::models::layer_stack::LayerStack;
use crate::models::layers::{
    AddingLayer, ChordLayer, ChunkLayer, LayerKind, RepeatLayer, WrappingLayer,
};
use crate::parse::current_layers::{CurrentLayersHolder, OpenSpan};
use crate::parse::errors::LayerError;
use crate::parse::scanner::Attributes;
use crate::parse::tags::{self, attr};

type Constructor = fn(&str, String, String, &Attributes) -> Result<ChunkLayer, LayerError>;

struct LayerSpec {
    kind: LayerKind,
    build: Constructor,
}

static LAYER_TABLE: Lazy<HashMap<&'static str, LayerSpec>> = Lazy::new(|| {
    let mut table = HashMap::new();
    table.insert(
        tags::CHORD,
        LayerSpec {
            kind: LayerKind::MarkData,
            build: build_chord,
        },
    );
    table.insert(
        tags::REPEAT,
        LayerSpec {
            kind: LayerKind::ContinuousData,
            build: build_repeat,
        },
    );
    table
});

/// Capability of a registered layer tag
pub fn layer_kind(tag: &str) -> Option<LayerKind> {
    LAYER_TABLE.get(tag).map(|spec| spec.kind)
}

/// What a processed layer tag did
#[derive(Debug, Clone, PartialEq)]
pub enum LayerEvent {
    /// Point layer for the chunk that follows
    Mark(AddingLayer),
    /// Span opened
    Opened(WrappingLayer),
    /// Span closed; `layer` is the fully attributed closing version
    Closed(OpenSpan),
}

/// Build a layer without touching any parse state
pub fn build_layer(
    tag: &str,
    chunk_id: impl Into<String>,
    layer_id: impl Into<String>,
    attributes: &Attributes,
) -> Result<ChunkLayer, LayerError> {
    let spec = LAYER_TABLE
        .get(tag)
        .ok_or_else(|| LayerError::UnknownTag(tag.to_string()))?;
    (spec.build)(tag, chunk_id.into(), layer_id.into(), attributes)
}

/// Build the layer for one tag and apply it to the stack and holder
pub fn process_layer_tag(
    tag: &str,
    attributes: &Attributes,
    holder: &mut CurrentLayersHolder,
    stack: &mut LayerStack,
) -> Result<LayerEvent, LayerError> {
    if !LAYER_TABLE.contains_key(tag) {
        return Err(LayerError::UnknownTag(tag.to_string()));
    }
    let chunk_id = required(tag, attributes, attr::ID)?.to_string();
    let layer_id = attributes
        .get(attr::LAYER_ID)
        .map(String::as_str)
        .unwrap_or(tags::DEFAULT_LAYER_ID)
        .to_string();

    match build_layer(tag, chunk_id, layer_id, attributes)? {
        ChunkLayer::Adding(layer) => {
            stack.add_adding_layer(layer.clone());
            Ok(LayerEvent::Mark(layer))
        }
        ChunkLayer::Wrapping(layer) => {
            if parse_bool(tag, attributes, attr::IS_OPENING)? {
                holder.add(layer.clone())?;
                stack.add_wrapping_layer(layer.clone());
                log::trace!("span opened: {:?}", layer);
                Ok(LayerEvent::Opened(layer))
            } else {
                let open = holder.remove(&layer)?;
                stack.update_wrapping_layer(layer.clone());
                log::trace!("span closed: {:?}", layer);
                Ok(LayerEvent::Closed(OpenSpan {
                    layer,
                    opened_in_line: open.opened_in_line,
                }))
            }
        }
    }
}

// ============================================================================
// Constructors
// ============================================================================

fn build_chord(
    tag: &str,
    chunk_id: String,
    layer_id: String,
    attributes: &Attributes,
) -> Result<ChunkLayer, LayerError> {
    let root = parse_with(tag, attributes, attr::MAIN_CHORD, ChordRoot::parse)?;
    let sign = parse_with(tag, attributes, attr::CHORD_SIGN, ChordSign::parse)?;
    let chord_type = parse_with(tag, attributes, attr::CHORD_TYPE, ChordType::parse)?;
    let is_minor = parse_bool(tag, attributes, attr::CHORD_IS_MINOR)?;

    Ok(ChunkLayer::Adding(AddingLayer::Chord(ChordLayer {
        chunk_id,
        layer_id,
        chord: Chord {
            root,
            sign,
            is_minor,
            chord_type,
        },
    })))
}

fn build_repeat(
    tag: &str,
    chunk_id: String,
    layer_id: String,
    attributes: &Attributes,
) -> Result<ChunkLayer, LayerError> {
    // rep_rate is only required on the closing tag
    let rep_rate = if parse_bool(tag, attributes, attr::IS_OPENING)? {
        None
    } else {
        Some(parse_with(tag, attributes, attr::REP_RATE, |text| {
            text.trim().parse::<u32>().ok()
        })?)
    };

    Ok(ChunkLayer::Wrapping(WrappingLayer::Repeat(RepeatLayer {
        chunk_id,
        layer_id,
        rep_rate,
    })))
}

// ============================================================================
// Attribute helpers
// ============================================================================

fn required<'a>(tag: &str, attributes: &'a Attributes, name: &str) -> Result<&'a str, LayerError> {
    attributes
        .get(name)
        .map(String::as_str)
        .ok_or_else(|| LayerError::MissingAttribute {
            tag: tag.to_string(),
            attribute: name.to_string(),
        })
}

fn parse_with<T>(
    tag: &str,
    attributes: &Attributes,
    name: &str,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<T, LayerError> {
    let value = required(tag, attributes, name)?;
    parse(value).ok_or_else(|| LayerError::InvalidAttribute {
        tag: tag.to_string(),
        attribute: name.to_string(),
        value: value.to_string(),
    })
}

fn parse_bool(tag: &str, attributes: &Attributes, name: &str) -> Result<bool, LayerError> {
    parse_with(tag, attributes, name, |text| {
        match text.trim().to_ascii_lowercase().as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::layers::{Layer, LayerTag};

    fn attrs(pairs: &[(&str, &str)]) -> Attributes {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn chord_attrs() -> Attributes {
        attrs(&[
            ("id", "1"),
            ("main_chord", "A"),
            ("chord_is_minor", "true"),
            ("chord_sign", "b"),
            ("chord_type", "7"),
        ])
    }

    #[test]
    fn test_dispatch_table() {
        assert_eq!(layer_kind("chord"), Some(LayerKind::MarkData));
        assert_eq!(layer_kind("repeat"), Some(LayerKind::ContinuousData));
        assert_eq!(layer_kind("plain"), None);
    }

    #[test]
    fn test_build_chord() {
        let layer = build_layer("chord", "1", "0", &chord_attrs()).expect("chord should build");
        let chord = layer.as_adding().and_then(AddingLayer::as_chord).expect("chord layer");
        assert_eq!(chord.chord.name(), "Abm7");
        assert_eq!(layer.tag(), LayerTag::Chord);
    }

    #[test]
    fn test_same_arguments_build_same_layers() {
        let a = build_layer("chord", "1", "0", &chord_attrs()).unwrap();
        let b = build_layer("chord", "1", "0", &chord_attrs()).unwrap();
        let c = build_layer("chord", "2", "0", &chord_attrs()).unwrap();
        assert!(a.is_same_with_layer(&b));
        assert!(a.is_similar_with_layer(&c));
        assert!(!a.is_same_with_layer(&c));
    }

    #[test]
    fn test_unknown_tag() {
        assert_eq!(
            build_layer("tab", "1", "0", &Attributes::new()),
            Err(LayerError::UnknownTag("tab".to_string()))
        );
    }

    #[test]
    fn test_missing_and_invalid_attributes() {
        let mut missing = chord_attrs();
        missing.remove("chord_sign");
        assert_eq!(
            build_layer("chord", "1", "0", &missing),
            Err(LayerError::MissingAttribute {
                tag: "chord".to_string(),
                attribute: "chord_sign".to_string()
            })
        );

        let closing = attrs(&[("id", "1"), ("is_opening", "false"), ("rep_rate", "twice")]);
        assert_eq!(
            build_layer("repeat", "1", "0", &closing),
            Err(LayerError::InvalidAttribute {
                tag: "repeat".to_string(),
                attribute: "rep_rate".to_string(),
                value: "twice".to_string()
            })
        );
    }

    #[test]
    fn test_process_chord_registers_in_stack() {
        let mut holder = CurrentLayersHolder::new();
        let mut stack = LayerStack::new();
        let event = process_layer_tag("chord", &chord_attrs(), &mut holder, &mut stack).unwrap();
        assert!(matches!(event, LayerEvent::Mark(_)));
        process_layer_tag("chord", &chord_attrs(), &mut holder, &mut stack).unwrap();
        assert_eq!(stack.adding().len(), 1);
        assert!(holder.is_empty());
    }

    #[test]
    fn test_process_repeat_open_and_close() {
        let mut holder = CurrentLayersHolder::new();
        let mut stack = LayerStack::new();
        let open = attrs(&[("id", "1"), ("is_opening", "true")]);
        let close = attrs(&[("id", "1"), ("is_opening", "false"), ("rep_rate", "2")]);

        let event = process_layer_tag("repeat", &open, &mut holder, &mut stack).unwrap();
        assert!(matches!(event, LayerEvent::Opened(_)));
        assert_eq!(stack.wrapping().len(), 1);

        assert!(matches!(
            process_layer_tag("repeat", &open, &mut holder, &mut stack),
            Err(LayerError::AlreadyOpen { .. })
        ));

        match process_layer_tag("repeat", &close, &mut holder, &mut stack).unwrap() {
            LayerEvent::Closed(span) => {
                assert_eq!(span.layer.as_repeat().and_then(|r| r.rep_rate), Some(2));
            }
            other => panic!("expected Closed, got {:?}", other),
        }
        let registered = stack.active_wrapping_layers()[0].as_repeat().and_then(|r| r.rep_rate);
        assert_eq!(registered, Some(2));

        assert!(matches!(
            process_layer_tag("repeat", &close, &mut holder, &mut stack),
            Err(LayerError::NotOpen { .. })
        ));
    }

    #[test]
    fn test_layer_id_defaults_to_zero() {
        let mut holder = CurrentLayersHolder::new();
        let mut stack = LayerStack::new();
        match process_layer_tag("chord", &chord_attrs(), &mut holder, &mut stack).unwrap() {
            LayerEvent::Mark(layer) => assert_eq!(layer.layer_id(), "0"),
            other => panic!("expected Mark, got {:?}", other),
        }
    }
}
