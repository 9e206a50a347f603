//! Song aggregate
//!
//! A song is its ordered parts plus the layer stack collected while parsing
//! it. Parts are shared behind an `Arc` so a song can be re-issued with a
//! different fixed flag or layer state without copying its text.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::models::chunk::SongPartLine;
use crate::models::layer_stack::LayerStack;
use crate::parse::tags;

/// Kind of a song part
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PartKind {
    Verse,
    Chorus,
    Bridge,
}

impl PartKind {
    pub fn from_tag(name: &str) -> Option<Self> {
        match name {
            tags::VERSE => Some(PartKind::Verse),
            tags::CHORUS => Some(PartKind::Chorus),
            tags::BRIDGE => Some(PartKind::Bridge),
            _ => None,
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            PartKind::Verse => tags::VERSE,
            PartKind::Chorus => tags::CHORUS,
            PartKind::Bridge => tags::BRIDGE,
        }
    }
}

/// Verse, chorus or bridge
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "kind")]
pub enum SongPart {
    Verse {
        number: u32,
        lines: Vec<SongPartLine>,
    },
    Chorus {
        after_verse_number: u32,
        lines: Vec<SongPartLine>,
    },
    Bridge {
        after_verse_number: u32,
        lines: Vec<SongPartLine>,
    },
}

impl SongPart {
    pub fn new(kind: PartKind, number: u32, lines: Vec<SongPartLine>) -> Self {
        match kind {
            PartKind::Verse => SongPart::Verse { number, lines },
            PartKind::Chorus => SongPart::Chorus {
                after_verse_number: number,
                lines,
            },
            PartKind::Bridge => SongPart::Bridge {
                after_verse_number: number,
                lines,
            },
        }
    }

    pub fn kind(&self) -> PartKind {
        match self {
            SongPart::Verse { .. } => PartKind::Verse,
            SongPart::Chorus { .. } => PartKind::Chorus,
            SongPart::Bridge { .. } => PartKind::Bridge,
        }
    }

    /// Verse number, or the verse a chorus/bridge follows
    pub fn number(&self) -> u32 {
        match self {
            SongPart::Verse { number, .. } => *number,
            SongPart::Chorus {
                after_verse_number, ..
            }
            | SongPart::Bridge {
                after_verse_number, ..
            } => *after_verse_number,
        }
    }

    pub fn lines(&self) -> &[SongPartLine] {
        match self {
            SongPart::Verse { lines, .. }
            | SongPart::Chorus { lines, .. }
            | SongPart::Bridge { lines, .. } => lines,
        }
    }
}

/// Parsed song
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Song {
    parts: Arc<Vec<SongPart>>,
    is_fixed: bool,
    layer_stack: LayerStack,
}

impl Song {
    pub fn new(parts: Vec<SongPart>, is_fixed: bool, layer_stack: LayerStack) -> Self {
        Self {
            parts: Arc::new(parts),
            is_fixed,
            layer_stack,
        }
    }

    pub fn parts(&self) -> &[SongPart] {
        &self.parts
    }

    pub fn is_fixed(&self) -> bool {
        self.is_fixed
    }

    pub fn layer_stack(&self) -> &LayerStack {
        &self.layer_stack
    }

    /// New song sharing this song's parts
    pub fn with_settings(&self, is_fixed: bool, layer_stack: LayerStack) -> Song {
        Song {
            parts: Arc::clone(&self.parts),
            is_fixed,
            layer_stack,
        }
    }

    pub fn shares_parts_with(&self, other: &Song) -> bool {
        Arc::ptr_eq(&self.parts, &other.parts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::layer_stack::LayerState;
    use crate::models::layers::{LayerIdentity, LayerTag, RepeatLayer, WrappingLayer};

    #[test]
    fn test_with_settings_shares_parts() {
        let mut stack = LayerStack::new();
        stack.add_wrapping_layer(WrappingLayer::Repeat(RepeatLayer {
            chunk_id: "1".to_string(),
            layer_id: "0".to_string(),
            rep_rate: None,
        }));
        let song = Song::new(
            vec![SongPart::new(PartKind::Chorus, 2, Vec::new())],
            false,
            stack,
        );

        let mut toggled = song.layer_stack().clone();
        toggled.set_state(&LayerIdentity::new(LayerTag::Repeat, "1", "0"), LayerState::Off);
        let fixed = song.with_settings(true, toggled);

        assert!(fixed.is_fixed());
        assert!(fixed.shares_parts_with(&song));
        assert_eq!(fixed.parts()[0].number(), 2);
        assert_eq!(fixed.parts()[0].kind(), PartKind::Chorus);
        assert!(fixed.layer_stack().active_wrapping_layers().is_empty());
        assert_eq!(song.layer_stack().active_wrapping_layers().len(), 1);
    }
}
