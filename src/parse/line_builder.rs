//! `<string>` → chunk sequence
//!
//! A single forward scan. `<plain>` text fills the pending chunk; every other
//! tag is a layer boundary that flushes the pending chunk and starts a new
//! one before the tag is processed.
//!
//! Flushing assigns the currently open spans to the chunk (unless a chord
//! already fixed its layers) and appends it to the line. A chunk that ends
//! up with no text and no layers is dropped, and a chunk that follows one
//! with empty text absorbs it, so back-to-back tags never leave zero-width
//! chunks behind.

use crate::models::chunk::{ChunkBuilder, LineChunk, SongPartLine};
use crate::models::layer_stack::LayerStack;
use crate::models::layers::WrappingLayer;
use crate::parse::current_layers::{CurrentLayersHolder, OpenSpan};
use crate::parse::errors::Result;
use crate::parse::layer_builder::{process_layer_tag, LayerEvent};
use crate::parse::scanner::{MarkupEvent, MarkupScanner};
use crate::parse::tags;

/// A parsed line plus the spans it closed whose opening lies in an earlier line
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltLine {
    pub line: SongPartLine,
    pub escalated: Vec<OpenSpan>,
}

/// How far a closing patch got inside one chunk list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchOutcome {
    /// Stopped at a chunk that does not carry the span: its opening is here
    FoundOpening,
    /// Every chunk carried the span (or there were none)
    ReachedStart,
}

pub fn build_line(
    fragment: &str,
    holder: &mut CurrentLayersHolder,
    stack: &mut LayerStack,
) -> Result<BuiltLine> {
    let mut scanner = MarkupScanner::new(fragment);
    let mut chunks: Vec<LineChunk> = Vec::new();
    let mut pending = ChunkBuilder::new();
    let mut plain: Option<String> = None;
    let mut escalated = Vec::new();

    while let Some(event) = scanner.next_event()? {
        match event {
            MarkupEvent::Start { name, .. } if name == tags::PLAIN => {
                plain = Some(String::new());
            }
            MarkupEvent::Empty { name, .. } if name == tags::PLAIN => {
                pending.set_text("")?;
            }
            MarkupEvent::End { name, .. } if name == tags::PLAIN => {
                if let Some(text) = plain.take() {
                    pending.set_text(text)?;
                }
            }
            MarkupEvent::Text(text) => match plain.as_mut() {
                Some(buffer) => buffer.push_str(&text),
                None if !text.trim().is_empty() => {
                    log::warn!("text outside <plain> ignored: {:?}", text);
                }
                None => {}
            },
            MarkupEvent::Start { name, .. } | MarkupEvent::Empty { name, .. }
                if name == tags::STRING => {}
            MarkupEvent::Start { name, attributes, .. }
            | MarkupEvent::Empty { name, attributes, .. } => {
                let finished = std::mem::take(&mut pending);
                push_chunk(&mut chunks, finish_chunk(finished, holder));

                match process_layer_tag(&name, &attributes, holder, stack)? {
                    LayerEvent::Mark(layer) => {
                        let mut layers = holder.snapshot();
                        layers.push(layer.into());
                        pending.set_layers_if_unset(layers);
                    }
                    LayerEvent::Opened(_) => {}
                    LayerEvent::Closed(span) => {
                        let outcome = patch_closed_span(&mut chunks, &span.layer);
                        if outcome == PatchOutcome::ReachedStart
                            && span.opened_in_line < holder.current_line()
                        {
                            log::trace!("span {:?} opened before this line", span.layer);
                            escalated.push(span);
                        }
                    }
                }
            }
            // </string> and end tags of layer elements carry nothing
            MarkupEvent::End { .. } => {}
        }
    }

    push_chunk(&mut chunks, finish_chunk(pending, holder));

    Ok(BuiltLine {
        line: SongPartLine::new(chunks),
        escalated,
    })
}

/// Replace the open version of `closed` by `closed`, walking back from the
/// most recent chunk and stopping at the first chunk that does not carry it
pub fn patch_closed_span(chunks: &mut [LineChunk], closed: &WrappingLayer) -> PatchOutcome {
    for chunk in chunks.iter_mut().rev() {
        if !chunk.replace_wrapping_layer(closed) {
            return PatchOutcome::FoundOpening;
        }
    }
    PatchOutcome::ReachedStart
}

fn finish_chunk(mut builder: ChunkBuilder, holder: &CurrentLayersHolder) -> LineChunk {
    if !builder.has_layers() {
        builder.set_layers_if_unset(holder.snapshot());
    }
    builder.finish()
}

fn push_chunk(chunks: &mut Vec<LineChunk>, chunk: LineChunk) {
    if chunk.is_empty() {
        return;
    }
    match chunks.last_mut() {
        Some(previous) if previous.text.is_empty() => previous.merge(chunk),
        _ => chunks.push(chunk),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::layers::{AddingLayer, ChunkLayer, Layer, LayerTag};
    use crate::parse::errors::{LayerError, ParseError};

    fn build(fragment: &str) -> Result<BuiltLine> {
        let mut holder = CurrentLayersHolder::new();
        let mut stack = LayerStack::new();
        build_line(fragment, &mut holder, &mut stack)
    }

    fn chord_name(chunk: &LineChunk) -> Option<String> {
        chunk
            .layers
            .iter()
            .filter_map(ChunkLayer::as_adding)
            .filter_map(AddingLayer::as_chord)
            .map(|c| c.chord.name())
            .next()
    }

    const CHORD_C: &str = r#"<chord id="1" main_chord="C" chord_is_minor="false" chord_sign="" chord_type=""/>"#;

    #[test]
    fn test_plain_text_only() {
        let built = build("<string><plain>Hello there</plain></string>").unwrap();
        assert_eq!(built.line.chunks, vec![LineChunk::new("Hello there", vec![])]);
        assert!(built.escalated.is_empty());
    }

    #[test]
    fn test_chord_affects_only_next_chunk() {
        let fragment = format!(
            "<string><plain>Line one </plain>{}<plain>two</plain></string>",
            CHORD_C
        );
        let built = build(&fragment).unwrap();
        assert_eq!(built.line.chunks.len(), 2);
        assert_eq!(built.line.chunks[0], LineChunk::new("Line one ", vec![]));
        assert_eq!(built.line.chunks[1].text, "two");
        assert_eq!(chord_name(&built.line.chunks[1]).as_deref(), Some("C"));
    }

    #[test]
    fn test_repeat_closed_in_same_line_is_patched() {
        let fragment = r#"<string><plain>a </plain><repeat id="1" is_opening="true"/><plain>b </plain><repeat id="1" is_opening="false" rep_rate="2"/><plain>c</plain></string>"#;
        let built = build(fragment).unwrap();
        let texts: Vec<&str> = built.line.chunks.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["a ", "b ", "c"]);

        let repeat = built.line.chunks[1].layers[0].as_wrapping().and_then(|w| w.as_repeat());
        assert_eq!(repeat.and_then(|r| r.rep_rate), Some(2));
        assert!(built.line.chunks[0].layers.is_empty());
        assert!(built.line.chunks[2].layers.is_empty());
        assert!(built.escalated.is_empty());
    }

    #[test]
    fn test_close_of_span_opened_earlier_escalates() {
        let mut holder = CurrentLayersHolder::new();
        let mut stack = LayerStack::new();
        let first = build_line(
            r#"<string><repeat id="1" is_opening="true"/><plain>one</plain></string>"#,
            &mut holder,
            &mut stack,
        )
        .unwrap();
        assert_eq!(first.line.chunks.len(), 1);
        assert_eq!(first.line.chunks[0].layers.len(), 1);

        holder.begin_line(1);
        let second = build_line(
            r#"<string><plain>two</plain><repeat id="1" is_opening="false" rep_rate="3"/></string>"#,
            &mut holder,
            &mut stack,
        )
        .unwrap();
        assert_eq!(second.escalated.len(), 1);
        assert_eq!(second.escalated[0].opened_in_line, 0);
        let repeat = second.line.chunks[0].layers[0].as_wrapping().and_then(|w| w.as_repeat());
        assert_eq!(repeat.and_then(|r| r.rep_rate), Some(3));
        assert!(holder.is_empty());
    }

    #[test]
    fn test_span_opened_at_line_start_is_not_escalated() {
        let mut holder = CurrentLayersHolder::new();
        let mut stack = LayerStack::new();
        holder.begin_line(2);
        let built = build_line(
            r#"<string><repeat id="1" is_opening="true"/><plain>la</plain><repeat id="1" is_opening="false" rep_rate="2"/></string>"#,
            &mut holder,
            &mut stack,
        )
        .unwrap();
        assert!(built.escalated.is_empty());
        let repeat = built.line.chunks[0].layers[0].as_wrapping().and_then(|w| w.as_repeat());
        assert_eq!(repeat.and_then(|r| r.rep_rate), Some(2));
    }

    #[test]
    fn test_adjacent_empty_boundaries_merge() {
        let fragment = format!(
            r#"<string><plain>x </plain><repeat id="1" is_opening="true"/>{}<plain>y</plain></string>"#,
            CHORD_C
        );
        let built = build(&fragment).unwrap();
        assert_eq!(built.line.chunks.len(), 2);
        assert_eq!(built.line.chunks[0], LineChunk::new("x ", vec![]));

        let merged = &built.line.chunks[1];
        assert_eq!(merged.text, "y");
        let tags: Vec<LayerTag> = merged.layers.iter().map(|l| l.tag()).collect();
        assert_eq!(tags, vec![LayerTag::Repeat, LayerTag::Chord]);
    }

    #[test]
    fn test_trailing_zero_text_boundaries_collapse() {
        let fragment = format!(
            r#"<string><plain>x</plain><repeat id="1" is_opening="true"/>{}</string>"#,
            CHORD_C
        );
        let mut holder = CurrentLayersHolder::new();
        let mut stack = LayerStack::new();
        let built = build_line(&fragment, &mut holder, &mut stack).unwrap();
        assert_eq!(built.line.chunks.len(), 2);
        assert_eq!(built.line.chunks[1].text, "");
        assert_eq!(built.line.chunks[1].layers.len(), 2);
    }

    #[test]
    fn test_unknown_tag_fails() {
        let err = build("<string><plain>a</plain><tab id=\"1\"/></string>").unwrap_err();
        assert_eq!(err, ParseError::Layer(LayerError::UnknownTag("tab".to_string())));
    }

    #[test]
    fn test_second_plain_in_one_chunk_fails() {
        let err = build("<string><plain>a</plain><plain>b</plain></string>").unwrap_err();
        assert!(matches!(err, ParseError::ChunkTextReassigned { .. }));
    }

    #[test]
    fn test_unbalanced_close_fails() {
        let err = build(r#"<string><plain>a</plain><repeat id="4" is_opening="false" rep_rate="2"/></string>"#)
            .unwrap_err();
        assert_eq!(
            err,
            ParseError::Layer(LayerError::NotOpen {
                tag: "repeat".to_string(),
                chunk_id: "4".to_string()
            })
        );
    }

    #[test]
    fn test_patch_stops_at_first_uncarrying_chunk() {
        let open = WrappingLayer::Repeat(crate::models::layers::RepeatLayer {
            chunk_id: "1".to_string(),
            layer_id: "0".to_string(),
            rep_rate: None,
        });
        let closed = WrappingLayer::Repeat(crate::models::layers::RepeatLayer {
            rep_rate: Some(2),
            ..open.as_repeat().cloned().unwrap()
        });
        let mut chunks = vec![
            LineChunk::new("a", vec![open.clone().into()]),
            LineChunk::new("b", vec![]),
            LineChunk::new("c", vec![open.clone().into()]),
        ];
        assert_eq!(patch_closed_span(&mut chunks, &closed), PatchOutcome::FoundOpening);
        assert_eq!(chunks[0].layers[0], ChunkLayer::Wrapping(open));
        assert_eq!(chunks[2].layers[0], ChunkLayer::Wrapping(closed.clone()));
        assert!(chunks[2].layers[0].is_same_with_layer(&closed));
    }
}
