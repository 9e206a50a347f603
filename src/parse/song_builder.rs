//! Song body → parts
//!
//! Scans the body for `verse`/`chorus`/`bridge` elements, cuts each one out
//! with the extractor and parses it with a single layer stack shared by the
//! whole song.

use crate::models::layer_stack::LayerStack;
use crate::models::song::{PartKind, Song, SongPart};
use crate::parse::errors::{ParseError, Result};
use crate::parse::extractor::Extractor;
use crate::parse::part_builder::{parse_number, parse_part};
use crate::parse::scanner::{MarkupEvent, MarkupScanner};

pub fn parse_song(raw_body: &str, is_fixed: bool) -> Result<Song> {
    let mut scanner = MarkupScanner::new(raw_body);
    let mut extractor = Extractor::new();
    let mut stack = LayerStack::new();
    let mut parts: Vec<SongPart> = Vec::new();
    let mut open_part: Option<PartKind> = None;

    while let Some(event) = scanner.next_event()? {
        match event {
            MarkupEvent::Start { name, start, .. } if open_part.is_none() => {
                if let Some(kind) = PartKind::from_tag(&name) {
                    extractor.clean();
                    extractor.set_start_point(start.line, start.column);
                    open_part = Some(kind);
                }
            }
            MarkupEvent::Empty {
                name, attributes, ..
            } if open_part.is_none() => {
                if let Some(kind) = PartKind::from_tag(&name) {
                    let number = parse_number(&name, &attributes)?;
                    log::warn!("<{}> {} has no lines", name, number);
                    parts.push(SongPart::new(kind, number, Vec::new()));
                }
            }
            MarkupEvent::End { name, end } => {
                if let Some(kind) = open_part.filter(|kind| kind.tag() == name) {
                    extractor.set_end_point(end.line, end.column);
                    let fragment = extractor.extract_part(raw_body)?;
                    parts.push(parse_part(kind, &fragment, &mut stack)?);
                    open_part = None;
                }
            }
            _ => {}
        }
    }

    if let Some(kind) = open_part {
        return Err(ParseError::MissingElement(format!("/{}", kind.tag())));
    }

    log::debug!(
        "parsed song: {} parts, {} chord layers, {} repeat layers",
        parts.len(),
        stack.adding().len(),
        stack.wrapping().len()
    );
    Ok(Song::new(parts, is_fixed, stack))
}
