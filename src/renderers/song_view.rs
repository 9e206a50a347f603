//! Song → renderable rows
//!
//! Walks parts, lines and chunks of a parsed song and produces what the
//! front-end paints: per chunk the (possibly word-split) text, its style
//! after every visible wrapping layer has been applied, one chord slot per
//! chord layer used anywhere in the line, and the span boundary flags needed
//! to draw repeat brackets.

use serde::{Deserialize, Serialize};

use crate::models::chunk::{LineChunk, SongPartLine};
use crate::models::layer_stack::LayerStack;
use crate::models::layers::{
    AddingLayer, ChunkLayer, Layer, LayerIdentity, SpanPosition, TextStyle, WrappingLayer,
};
use crate::models::song::{PartKind, Song, SongPart};
use crate::renderers::settings::RenderSettings;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct RenderedSong {
    pub is_fixed: bool,
    pub parts: Vec<RenderedPart>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct RenderedPart {
    pub kind: PartKind,
    pub number: u32,
    pub lines: Vec<RenderedLine>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct RenderedLine {
    pub chunks: Vec<RenderedChunk>,
}

impl RenderedLine {
    pub fn has_chord_row(&self) -> bool {
        self.chunks.iter().any(|chunk| !chunk.chords.is_empty())
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct RenderedChunk {
    pub text: String,
    pub style: TextStyle,
    /// One slot per chord layer id used in the line; `None` keeps the
    /// slot empty so rows stay aligned
    pub chords: Vec<ChordSlot>,
    pub spans: Vec<SpanMarker>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ChordSlot {
    pub layer_id: String,
    pub name: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SpanMarker {
    pub chunk_id: String,
    pub layer_id: String,
    pub rep_rate: Option<u32>,
    pub is_first: bool,
    pub is_last: bool,
    pub is_multiline: bool,
}

pub fn render_song(song: &Song, settings: &RenderSettings) -> RenderedSong {
    RenderedSong {
        is_fixed: song.is_fixed(),
        parts: song
            .parts()
            .iter()
            .map(|part| render_part(part, song.layer_stack(), settings))
            .collect(),
    }
}

pub fn render_part(part: &SongPart, stack: &LayerStack, settings: &RenderSettings) -> RenderedPart {
    let lines = part.lines();
    let rendered = lines
        .iter()
        .enumerate()
        .map(|(index, line)| {
            let previous = index.checked_sub(1).and_then(|i| lines.get(i));
            let next = lines.get(index + 1);
            render_line(line, previous, next, stack, settings)
        })
        .collect();

    RenderedPart {
        kind: part.kind(),
        number: part.number(),
        lines: rendered,
    }
}

fn render_line(
    line: &SongPartLine,
    previous: Option<&SongPartLine>,
    next: Option<&SongPartLine>,
    stack: &LayerStack,
    settings: &RenderSettings,
) -> RenderedLine {
    let visible = |identity: &LayerIdentity| !settings.respect_layer_state || stack.is_on(identity);

    // One representative per similarity class of visible chords
    let mut chord_rows: Vec<&AddingLayer> = Vec::new();
    if settings.show_chords {
        for layer in line.chunks.iter().flat_map(|c| c.layers.iter()) {
            if let ChunkLayer::Adding(adding) = layer {
                if visible(&adding.identity())
                    && !chord_rows.iter().any(|row| row.is_similar_with_layer(adding))
                {
                    chord_rows.push(adding);
                }
            }
        }
    }

    let mut chunks = Vec::new();
    for (index, chunk) in line.chunks.iter().enumerate() {
        let spans: Vec<(&WrappingLayer, SpanPosition)> = chunk
            .wrapping_layers()
            .filter(|layer| visible(&layer.identity()))
            .map(|layer| (layer, span_position(line, index, previous, next, &layer.identity())))
            .collect();

        let chords: Vec<ChordSlot> = chord_rows
            .iter()
            .map(|row| ChordSlot {
                layer_id: row.layer_id().to_string(),
                name: chord_on(chunk, row, &visible),
            })
            .collect();

        let words = if settings.split_words {
            chunk.split_by_word()
        } else {
            vec![chunk.clone()]
        };
        let word_count = words.len();

        for (word_index, word) in words.into_iter().enumerate() {
            let first_word = word_index == 0;
            let last_word = word_index + 1 == word_count;

            let mut text = word.text;
            let mut style = TextStyle::default();
            let mut markers = Vec::with_capacity(spans.len());
            for (layer, position) in &spans {
                let position = SpanPosition {
                    is_first: position.is_first && first_word,
                    is_last: position.is_last && last_word,
                    is_multiline: position.is_multiline,
                };
                let (wrapped, wrapped_style) =
                    layer.wrap(&text, style, position, &settings.repeat_marker);
                text = wrapped;
                style = wrapped_style;
                markers.push(SpanMarker {
                    chunk_id: layer.chunk_id().to_string(),
                    layer_id: layer.layer_id().to_string(),
                    rep_rate: layer.as_repeat().and_then(|r| r.rep_rate),
                    is_first: position.is_first,
                    is_last: position.is_last,
                    is_multiline: position.is_multiline,
                });
            }

            chunks.push(RenderedChunk {
                text,
                style,
                chords: if first_word {
                    chords.clone()
                } else {
                    chords
                        .iter()
                        .map(|slot| ChordSlot {
                            layer_id: slot.layer_id.clone(),
                            name: None,
                        })
                        .collect()
                },
                spans: markers,
            });
        }
    }

    RenderedLine { chunks }
}

fn chord_on(
    chunk: &LineChunk,
    row: &AddingLayer,
    visible: &impl Fn(&LayerIdentity) -> bool,
) -> Option<String> {
    chunk
        .layers
        .iter()
        .filter_map(ChunkLayer::as_adding)
        .filter(|layer| layer.is_similar_with_layer(row) && visible(&layer.identity()))
        .filter_map(AddingLayer::as_chord)
        .map(|chord| chord.chord.name())
        .next()
}

/// Boundary flags of span `identity` at chunk `index` of `line`
fn span_position(
    line: &SongPartLine,
    index: usize,
    previous: Option<&SongPartLine>,
    next: Option<&SongPartLine>,
    identity: &LayerIdentity,
) -> SpanPosition {
    let continues_from_previous = previous.map_or(false, |p| p.shares_span_with(line, identity));
    let continues_to_next = next.map_or(false, |n| line.shares_span_with(n, identity));

    let carried_before = match index.checked_sub(1) {
        Some(i) => line.chunks[i].carries(identity),
        None => continues_from_previous,
    };
    let carried_after = match line.chunks.get(index + 1) {
        Some(chunk) => chunk.carries(identity),
        None => continues_to_next,
    };

    SpanPosition {
        is_first: !carried_before,
        is_last: !carried_after,
        is_multiline: continues_from_previous || continues_to_next,
    }
}
