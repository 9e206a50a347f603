//! Inline annotation layers
//!
//! A layer is an annotation laid over song text. Two capabilities exist:
//!
//! - **Adding layers** (mark data) overlay exactly one chunk, e.g. a chord
//!   written above a syllable.
//! - **Wrapping layers** (continuous data) have an opening and a closing tag
//!   and cover every chunk in between, possibly across lines, e.g. a repeat
//!   bracket.
//!
//! Identity is the triple (tag, chunk id, layer id). The chunk id separates
//! simultaneous annotations of one tag type, the layer id separates stacked
//! instances of the same chunk id.

use serde::{Deserialize, Serialize};

use crate::models::chord::Chord;
use crate::parse::tags;

/// Capability of a layer tag
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LayerKind {
    /// Point annotation over one chunk
    MarkData,
    /// Span annotation with open/close tags
    ContinuousData,
}

/// Tag of a registered layer type
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LayerTag {
    Chord,
    Repeat,
}

impl LayerTag {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            tags::CHORD => Some(LayerTag::Chord),
            tags::REPEAT => Some(LayerTag::Repeat),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            LayerTag::Chord => tags::CHORD,
            LayerTag::Repeat => tags::REPEAT,
        }
    }

    pub fn kind(&self) -> LayerKind {
        match self {
            LayerTag::Chord => LayerKind::MarkData,
            LayerTag::Repeat => LayerKind::ContinuousData,
        }
    }
}

/// Identity triple of a layer instance
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
pub struct LayerIdentity {
    pub tag: LayerTag,
    pub chunk_id: String,
    pub layer_id: String,
}

impl LayerIdentity {
    pub fn new(tag: LayerTag, chunk_id: impl Into<String>, layer_id: impl Into<String>) -> Self {
        Self {
            tag,
            chunk_id: chunk_id.into(),
            layer_id: layer_id.into(),
        }
    }

    /// Same tag and layer id, chunk id ignored
    pub fn is_similar(&self, other: &LayerIdentity) -> bool {
        self.tag == other.tag && self.layer_id == other.layer_id
    }
}

/// Common identity accessors for every layer type
pub trait Layer {
    fn tag(&self) -> LayerTag;
    fn chunk_id(&self) -> &str;
    fn layer_id(&self) -> &str;

    fn identity(&self) -> LayerIdentity {
        LayerIdentity::new(self.tag(), self.chunk_id(), self.layer_id())
    }

    fn has_identity(&self, identity: &LayerIdentity) -> bool {
        self.tag() == identity.tag
            && self.chunk_id() == identity.chunk_id
            && self.layer_id() == identity.layer_id
    }

    fn is_same_with_layer<L: Layer + ?Sized>(&self, other: &L) -> bool {
        self.tag() == other.tag()
            && self.chunk_id() == other.chunk_id()
            && self.layer_id() == other.layer_id()
    }

    fn is_similar_with_layer<L: Layer + ?Sized>(&self, other: &L) -> bool {
        self.tag() == other.tag() && self.layer_id() == other.layer_id()
    }
}

// ============================================================================
// Concrete layers
// ============================================================================

/// Chord written above the chunk that follows its tag
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ChordLayer {
    pub chunk_id: String,
    pub layer_id: String,
    pub chord: Chord,
}

impl Layer for ChordLayer {
    fn tag(&self) -> LayerTag {
        LayerTag::Chord
    }
    fn chunk_id(&self) -> &str {
        &self.chunk_id
    }
    fn layer_id(&self) -> &str {
        &self.layer_id
    }
}

/// Repeat bracket; `rep_rate` is only known once the closing tag is read
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct RepeatLayer {
    pub chunk_id: String,
    pub layer_id: String,
    pub rep_rate: Option<u32>,
}

impl RepeatLayer {
    pub fn is_closed(&self) -> bool {
        self.rep_rate.is_some()
    }
}

impl Layer for RepeatLayer {
    fn tag(&self) -> LayerTag {
        LayerTag::Repeat
    }
    fn chunk_id(&self) -> &str {
        &self.chunk_id
    }
    fn layer_id(&self) -> &str {
        &self.layer_id
    }
}

// ============================================================================
// Capability variants
// ============================================================================

/// Mark-data layers
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum AddingLayer {
    Chord(ChordLayer),
}

impl AddingLayer {
    pub fn as_chord(&self) -> Option<&ChordLayer> {
        match self {
            AddingLayer::Chord(chord) => Some(chord),
        }
    }
}

impl Layer for AddingLayer {
    fn tag(&self) -> LayerTag {
        match self {
            AddingLayer::Chord(l) => l.tag(),
        }
    }
    fn chunk_id(&self) -> &str {
        match self {
            AddingLayer::Chord(l) => l.chunk_id(),
        }
    }
    fn layer_id(&self) -> &str {
        match self {
            AddingLayer::Chord(l) => l.layer_id(),
        }
    }
}

/// Text style a wrapping layer may adjust
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct TextStyle {
    pub underline: bool,
    pub italic: bool,
}

/// Where a chunk sits inside the span it is wrapped by
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct SpanPosition {
    pub is_first: bool,
    pub is_last: bool,
    /// The span continues onto an adjacent line
    pub is_multiline: bool,
}

/// Continuous-data layers
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum WrappingLayer {
    Repeat(RepeatLayer),
}

impl WrappingLayer {
    pub fn as_repeat(&self) -> Option<&RepeatLayer> {
        match self {
            WrappingLayer::Repeat(repeat) => Some(repeat),
        }
    }

    /// Adjust one chunk's text and style for its place in the span.
    ///
    /// Repeats toggle underline on a single-line span and italic on a
    /// multiline one (the bracket itself is drawn by the front-end), and
    /// append `{marker}{rep_rate}` after the last chunk's text.
    pub fn wrap(
        &self,
        text: &str,
        style: TextStyle,
        position: SpanPosition,
        marker: &str,
    ) -> (String, TextStyle) {
        match self {
            WrappingLayer::Repeat(repeat) => {
                let mut style = style;
                if position.is_multiline {
                    style.italic = !style.italic;
                } else {
                    style.underline = !style.underline;
                }

                let text = match repeat.rep_rate {
                    Some(rate) if position.is_last => {
                        let body = text.trim_end();
                        let trailing = &text[body.len()..];
                        format!("{} {}{}{}", body, marker, rate, trailing)
                    }
                    _ => text.to_string(),
                };
                (text, style)
            }
        }
    }
}

impl Layer for WrappingLayer {
    fn tag(&self) -> LayerTag {
        match self {
            WrappingLayer::Repeat(l) => l.tag(),
        }
    }
    fn chunk_id(&self) -> &str {
        match self {
            WrappingLayer::Repeat(l) => l.chunk_id(),
        }
    }
    fn layer_id(&self) -> &str {
        match self {
            WrappingLayer::Repeat(l) => l.layer_id(),
        }
    }
}

/// Any layer attached to a chunk
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "capability", content = "layer")]
pub enum ChunkLayer {
    Adding(AddingLayer),
    Wrapping(WrappingLayer),
}

impl ChunkLayer {
    pub fn kind(&self) -> LayerKind {
        match self {
            ChunkLayer::Adding(_) => LayerKind::MarkData,
            ChunkLayer::Wrapping(_) => LayerKind::ContinuousData,
        }
    }

    pub fn as_adding(&self) -> Option<&AddingLayer> {
        match self {
            ChunkLayer::Adding(layer) => Some(layer),
            ChunkLayer::Wrapping(_) => None,
        }
    }

    pub fn as_wrapping(&self) -> Option<&WrappingLayer> {
        match self {
            ChunkLayer::Wrapping(layer) => Some(layer),
            ChunkLayer::Adding(_) => None,
        }
    }
}

impl From<AddingLayer> for ChunkLayer {
    fn from(layer: AddingLayer) -> Self {
        ChunkLayer::Adding(layer)
    }
}

impl From<WrappingLayer> for ChunkLayer {
    fn from(layer: WrappingLayer) -> Self {
        ChunkLayer::Wrapping(layer)
    }
}

impl Layer for ChunkLayer {
    fn tag(&self) -> LayerTag {
        match self {
            ChunkLayer::Adding(l) => l.tag(),
            ChunkLayer::Wrapping(l) => l.tag(),
        }
    }
    fn chunk_id(&self) -> &str {
        match self {
            ChunkLayer::Adding(l) => l.chunk_id(),
            ChunkLayer::Wrapping(l) => l.chunk_id(),
        }
    }
    fn layer_id(&self) -> &str {
        match self {
            ChunkLayer::Adding(l) => l.layer_id(),
            ChunkLayer::Wrapping(l) => l.layer_id(),
        }
    }
}
