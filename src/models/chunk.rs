//! Line chunks and song lines
//!
//! A chunk is the smallest unit the parser emits: a run of text plus the set
//! of layers active over it. A line is an ordered list of chunks.

use serde::{Deserialize, Serialize};

use crate::models::layers::{ChunkLayer, Layer, LayerIdentity, LayerKind, WrappingLayer};
use crate::parse::errors::{ParseError, Result};

/// Immutable chunk of text with its active layers
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
pub struct LineChunk {
    pub text: String,
    pub layers: Vec<ChunkLayer>,
}

impl LineChunk {
    pub fn new(text: impl Into<String>, layers: Vec<ChunkLayer>) -> Self {
        Self {
            text: text.into(),
            layers,
        }
    }

    /// No text and no layers of any kind
    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && !self.has_mark_data() && self.layers.is_empty()
    }

    pub fn has_mark_data(&self) -> bool {
        self.layers
            .iter()
            .any(|layer| layer.kind() == LayerKind::MarkData)
    }

    pub fn carries(&self, identity: &LayerIdentity) -> bool {
        self.layers.iter().any(|layer| layer.has_identity(identity))
    }

    pub fn wrapping_layers(&self) -> impl Iterator<Item = &WrappingLayer> {
        self.layers.iter().filter_map(ChunkLayer::as_wrapping)
    }

    /// Replace the layer with `closed`'s identity by `closed`.
    /// Returns false when the chunk does not carry it.
    pub fn replace_wrapping_layer(&mut self, closed: &WrappingLayer) -> bool {
        let mut replaced = false;
        for layer in self.layers.iter_mut() {
            if layer.is_same_with_layer(closed) {
                *layer = ChunkLayer::Wrapping(closed.clone());
                replaced = true;
            }
        }
        replaced
    }

    /// Absorb `next` into this chunk: text appended, layers unioned by identity
    pub fn merge(&mut self, next: LineChunk) {
        self.text.push_str(&next.text);
        for layer in next.layers {
            if !self.layers.iter().any(|own| own.is_same_with_layer(&layer)) {
                self.layers.push(layer);
            }
        }
    }

    /// Split into one chunk per word, each keeping its trailing spaces and
    /// the full layer set. Text without interior spaces is returned as is;
    /// leading spaces stay with the first word.
    pub fn split_by_word(&self) -> Vec<LineChunk> {
        let mut words = Vec::new();
        let mut start = 0;
        let mut in_word = false;
        let mut chars = self.text.char_indices().peekable();
        while let Some((index, ch)) = chars.next() {
            if ch != ' ' {
                in_word = true;
                continue;
            }
            let next_is_space = chars.peek().map_or(true, |(_, next)| *next == ' ');
            if in_word && !next_is_space {
                let end = index + ch.len_utf8();
                words.push(&self.text[start..end]);
                start = end;
                in_word = false;
            }
        }
        if start < self.text.len() || words.is_empty() {
            words.push(&self.text[start..]);
        }

        words
            .into_iter()
            .map(|word| LineChunk::new(word, self.layers.clone()))
            .collect()
    }
}

/// Builds a chunk whose text and layers may each be assigned only once
#[derive(Debug, Default)]
pub struct ChunkBuilder {
    text: Option<String>,
    layers: Option<Vec<ChunkLayer>>,
}

impl ChunkBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_text(&mut self, text: impl Into<String>) -> Result<()> {
        let text = text.into();
        match &self.text {
            Some(existing) => Err(ParseError::ChunkTextReassigned {
                existing: existing.clone(),
                received: text,
            }),
            None => {
                self.text = Some(text);
                Ok(())
            }
        }
    }

    pub fn has_layers(&self) -> bool {
        self.layers.is_some()
    }

    /// Assign layers unless already assigned
    pub fn set_layers_if_unset(&mut self, layers: Vec<ChunkLayer>) {
        if self.layers.is_none() {
            self.layers = Some(layers);
        }
    }

    pub fn finish(self) -> LineChunk {
        LineChunk {
            text: self.text.unwrap_or_default(),
            layers: self.layers.unwrap_or_default(),
        }
    }
}

/// One rendered line of a song part
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
pub struct SongPartLine {
    pub chunks: Vec<LineChunk>,
}

impl SongPartLine {
    pub fn new(chunks: Vec<LineChunk>) -> Self {
        Self { chunks }
    }

    pub fn text(&self) -> String {
        self.chunks.iter().map(|chunk| chunk.text.as_str()).collect()
    }

    /// Chunks split per word for line wrapping
    pub fn split_by_word(&self) -> Vec<LineChunk> {
        self.chunks.iter().flat_map(LineChunk::split_by_word).collect()
    }

    /// The wrapping layer with this identity on the line's first chunk
    pub fn first_chunk_wrapping_layer(&self, identity: &LayerIdentity) -> Option<&WrappingLayer> {
        self.chunks
            .first()
            .and_then(|chunk| chunk.wrapping_layers().find(|l| l.has_identity(identity)))
    }

    /// The wrapping layer with this identity on the line's last chunk
    pub fn last_chunk_wrapping_layer(&self, identity: &LayerIdentity) -> Option<&WrappingLayer> {
        self.chunks
            .last()
            .and_then(|chunk| chunk.wrapping_layers().find(|l| l.has_identity(identity)))
    }

    /// Whether the span `identity` runs from this line's last chunk into
    /// `next`'s first chunk
    pub fn shares_span_with(&self, next: &SongPartLine, identity: &LayerIdentity) -> bool {
        self.last_chunk_wrapping_layer(identity).is_some()
            && next.first_chunk_wrapping_layer(identity).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::layers::RepeatLayer;

    fn repeat(rep_rate: Option<u32>) -> WrappingLayer {
        WrappingLayer::Repeat(RepeatLayer {
            chunk_id: "1".to_string(),
            layer_id: "0".to_string(),
            rep_rate,
        })
    }

    #[test]
    fn test_split_by_word() {
        let chunk = LineChunk::new("hello world ", vec![ChunkLayer::Wrapping(repeat(None))]);
        let words = chunk.split_by_word();
        assert_eq!(words.len(), 2);
        assert_eq!(words[0].text, "hello ");
        assert_eq!(words[1].text, "world ");
        assert_eq!(words[0].layers, chunk.layers);
        assert_eq!(words[1].layers, chunk.layers);
    }

    #[test]
    fn test_split_without_interior_space() {
        let chunk = LineChunk::new("hello ", vec![]);
        assert_eq!(chunk.split_by_word(), vec![chunk.clone()]);

        let empty = LineChunk::new("", vec![]);
        assert_eq!(empty.split_by_word(), vec![empty.clone()]);
    }

    #[test]
    fn test_split_keeps_leading_spaces_with_first_word() {
        let texts = |text: &str| -> Vec<String> {
            LineChunk::new(text, vec![])
                .split_by_word()
                .into_iter()
                .map(|c| c.text)
                .collect()
        };
        assert_eq!(texts(" a"), vec![" a"]);
        assert_eq!(texts("  a b"), vec!["  a ", "b"]);
        assert_eq!(texts(" "), vec![" "]);
    }

    #[test]
    fn test_split_keeps_runs_of_spaces_together() {
        let chunk = LineChunk::new("a  b", vec![]);
        let texts: Vec<String> = chunk.split_by_word().into_iter().map(|c| c.text).collect();
        assert_eq!(texts, vec!["a  ", "b"]);
    }

    #[test]
    fn test_text_assigned_once() {
        let mut builder = ChunkBuilder::new();
        builder.set_text("one").expect("first assignment");
        assert!(matches!(
            builder.set_text("two"),
            Err(ParseError::ChunkTextReassigned { .. })
        ));
        assert_eq!(builder.finish().text, "one");
    }

    #[test]
    fn test_merge_dedups_layers() {
        let mut first = LineChunk::new("", vec![ChunkLayer::Wrapping(repeat(None))]);
        first.merge(LineChunk::new("la", vec![ChunkLayer::Wrapping(repeat(None))]));
        assert_eq!(first.text, "la");
        assert_eq!(first.layers.len(), 1);
    }

    #[test]
    fn test_shares_span_with() {
        let identity = repeat(None).identity();
        let first = SongPartLine::new(vec![
            LineChunk::new("a ", vec![]),
            LineChunk::new("b", vec![ChunkLayer::Wrapping(repeat(Some(2)))]),
        ]);
        let second = SongPartLine::new(vec![
            LineChunk::new("c", vec![ChunkLayer::Wrapping(repeat(Some(2)))]),
            LineChunk::new(" d", vec![]),
        ]);
        assert!(first.shares_span_with(&second, &identity));
        assert!(!second.shares_span_with(&first, &identity));
    }

    #[test]
    fn test_replace_wrapping_layer() {
        let mut chunk = LineChunk::new("la", vec![ChunkLayer::Wrapping(repeat(None))]);
        assert!(chunk.replace_wrapping_layer(&repeat(Some(2))));
        assert_eq!(chunk.layers, vec![ChunkLayer::Wrapping(repeat(Some(2)))]);
    }
}
