//! Part markup → lines
//!
//! Each `<string>` of a verse, chorus or bridge is cut out with the
//! extractor and handed to the line builder. One holder of open spans is
//! carried across the whole part, so a repeat may start in one line and end
//! in a later one. When that happens the closing version of the span is
//! written back into every earlier line from the one where it opened.

use crate::models::chunk::SongPartLine;
use crate::models::layer_stack::LayerStack;
use crate::models::layers::Layer;
use crate::models::song::{PartKind, SongPart};
use crate::parse::current_layers::{CurrentLayersHolder, OpenSpan};
use crate::parse::errors::{ParseError, Result};
use crate::parse::extractor::Extractor;
use crate::parse::line_builder::{build_line, patch_closed_span, PatchOutcome};
use crate::parse::scanner::{Attributes, MarkupEvent, MarkupScanner};
use crate::parse::tags::{self, attr};

pub fn parse_part(kind: PartKind, fragment: &str, stack: &mut LayerStack) -> Result<SongPart> {
    let mut scanner = MarkupScanner::new(fragment);
    let mut extractor = Extractor::new();
    let mut holder = CurrentLayersHolder::new();
    let mut lines: Vec<SongPartLine> = Vec::new();
    let mut number: Option<u32> = None;

    while let Some(event) = scanner.next_event()? {
        match event {
            MarkupEvent::Start {
                name, attributes, ..
            }
            | MarkupEvent::Empty {
                name, attributes, ..
            } if name == kind.tag() && number.is_none() => {
                number = Some(parse_number(&name, &attributes)?);
            }
            MarkupEvent::Start { name, start, .. } if name == tags::STRING => {
                extractor.clean();
                extractor.set_start_point(start.line, start.column);
            }
            MarkupEvent::Empty { name, .. } if name == tags::STRING => {
                lines.push(SongPartLine::default());
            }
            MarkupEvent::End { name, end } if name == tags::STRING => {
                extractor.set_end_point(end.line, end.column);
                let line_markup = extractor.extract_part(fragment)?;

                holder.begin_line(lines.len());
                let built = build_line(&line_markup, &mut holder, stack)?;
                for span in &built.escalated {
                    patch_earlier_lines(&mut lines, span);
                }
                lines.push(built.line);
            }
            _ => {}
        }
    }

    if let Some(span) = holder.open_spans().first() {
        return Err(ParseError::UnclosedSpan {
            tag: span.layer.tag().name().to_string(),
            chunk_id: span.layer.chunk_id().to_string(),
        });
    }

    let number = number.ok_or_else(|| ParseError::MissingElement(kind.tag().to_string()))?;
    log::debug!("parsed {} {} with {} lines", kind.tag(), number, lines.len());
    Ok(SongPart::new(kind, number, lines))
}

/// Carry the closing patch back through built lines, last first, stopping
/// at the line holding the span's opening chunk. Never goes above the line
/// the span opened in.
fn patch_earlier_lines(lines: &mut [SongPartLine], span: &OpenSpan) {
    let from = span.opened_in_line.min(lines.len());
    for line in lines[from..].iter_mut().rev() {
        if patch_closed_span(&mut line.chunks, &span.layer) == PatchOutcome::FoundOpening {
            break;
        }
    }
}

pub(crate) fn parse_number(tag: &str, attributes: &Attributes) -> Result<u32> {
    let value = attributes
        .get(attr::NUMBER)
        .ok_or_else(|| ParseError::MissingAttribute {
            tag: tag.to_string(),
            attribute: attr::NUMBER.to_string(),
        })?;
    value.trim().parse::<u32>().map_err(|_| ParseError::InvalidAttribute {
        tag: tag.to_string(),
        attribute: attr::NUMBER.to_string(),
        value: value.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::layers::{ChunkLayer, WrappingLayer};

    fn rep_rates(line: &SongPartLine) -> Vec<Option<u32>> {
        line.chunks
            .iter()
            .flat_map(|chunk| chunk.layers.iter())
            .filter_map(ChunkLayer::as_wrapping)
            .filter_map(WrappingLayer::as_repeat)
            .map(|r| r.rep_rate)
            .collect()
    }

    #[test]
    fn test_lines_in_order() {
        let fragment = "<verse number=\"2\">\n  <string><plain>one</plain></string>\n  <string><plain>two</plain></string>\n</verse>";
        let mut stack = LayerStack::new();
        let part = parse_part(PartKind::Verse, fragment, &mut stack).unwrap();

        assert_eq!(part.kind(), PartKind::Verse);
        assert_eq!(part.number(), 2);
        let texts: Vec<String> = part.lines().iter().map(SongPartLine::text).collect();
        assert_eq!(texts, vec!["one", "two"]);
    }

    #[test]
    fn test_span_across_three_lines_patched_back() {
        let fragment = r#"<chorus number="1">
<string><plain>zero</plain></string>
<string><plain>a </plain><repeat id="1" is_opening="true"/><plain>one</plain></string>
<string><plain>two</plain></string>
<string><plain>three</plain><repeat id="1" is_opening="false" rep_rate="2"/><plain> after</plain></string>
</chorus>"#;
        let mut stack = LayerStack::new();
        let part = parse_part(PartKind::Chorus, fragment, &mut stack).unwrap();
        let lines = part.lines();

        assert_eq!(lines.len(), 4);
        assert!(rep_rates(&lines[0]).is_empty());
        assert_eq!(rep_rates(&lines[1]), vec![Some(2)]);
        assert_eq!(rep_rates(&lines[2]), vec![Some(2)]);
        assert_eq!(rep_rates(&lines[3]), vec![Some(2)]);
        assert!(lines[1].chunks[0].layers.is_empty());
        assert!(lines[3].chunks[1].layers.is_empty());
        assert_eq!(stack.wrapping().len(), 1);
    }

    #[test]
    fn test_reused_id_keeps_earlier_rep_rate() {
        let fragment = r#"<verse number="1">
<string><repeat id="1" is_opening="true"/><plain>a</plain><repeat id="1" is_opening="false" rep_rate="2"/><plain> b </plain><repeat id="1" is_opening="true"/><plain>c</plain></string>
<string><plain>d</plain><repeat id="1" is_opening="false" rep_rate="3"/></string>
</verse>"#;
        let mut stack = LayerStack::new();
        let part = parse_part(PartKind::Verse, fragment, &mut stack).unwrap();
        let lines = part.lines();

        let texts: Vec<&str> = lines[0].chunks.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["a", " b ", "c"]);
        assert_eq!(rep_rates(&SongPartLine::new(vec![lines[0].chunks[0].clone()])), vec![Some(2)]);
        assert!(lines[0].chunks[1].layers.is_empty());
        assert_eq!(rep_rates(&SongPartLine::new(vec![lines[0].chunks[2].clone()])), vec![Some(3)]);
        assert_eq!(rep_rates(&lines[1]), vec![Some(3)]);
    }

    #[test]
    fn test_start_tags_spanning_lines() {
        let fragment = "<verse\n  number=\"4\">\n<string\n><plain>wrapped</plain></string>\n</verse>";
        let mut stack = LayerStack::new();
        let part = parse_part(PartKind::Verse, fragment, &mut stack).unwrap();
        assert_eq!(part.number(), 4);
        assert_eq!(part.lines().len(), 1);
        assert_eq!(part.lines()[0].text(), "wrapped");
    }

    #[test]
    fn test_empty_string_element() {
        let mut stack = LayerStack::new();
        let part = parse_part(
            PartKind::Bridge,
            "<bridge number=\"3\"><string/></bridge>",
            &mut stack,
        )
        .unwrap();
        assert_eq!(part.lines().len(), 1);
        assert!(part.lines()[0].chunks.is_empty());
    }

    #[test]
    fn test_span_left_open_fails() {
        let mut stack = LayerStack::new();
        let err = parse_part(
            PartKind::Verse,
            r#"<verse number="1"><string><repeat id="5" is_opening="true"/><plain>x</plain></string></verse>"#,
            &mut stack,
        )
        .unwrap_err();
        assert_eq!(
            err,
            ParseError::UnclosedSpan {
                tag: "repeat".to_string(),
                chunk_id: "5".to_string()
            }
        );
    }

    #[test]
    fn test_missing_number() {
        let mut stack = LayerStack::new();
        let err = parse_part(PartKind::Verse, "<verse><string/></verse>", &mut stack).unwrap_err();
        assert_eq!(
            err,
            ParseError::MissingAttribute {
                tag: "verse".to_string(),
                attribute: "number".to_string()
            }
        );
    }
}
