//! Positioned markup events
//!
//! Thin wrapper around the quick-xml pull reader that reports element names,
//! unescaped attributes, the line/column of each start tag's `<` and of each
//! tag's closing `>`. Those coordinates are what the
//! [`Extractor`](crate::parse::extractor::Extractor) consumes.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;

use crate::parse::errors::{ParseError, Result};
use crate::parse::extractor::TextPoint;

/// Attribute name → unescaped value
pub type Attributes = HashMap<String, String>;

#[derive(Debug, Clone, PartialEq)]
pub enum MarkupEvent {
    Start {
        name: String,
        attributes: Attributes,
        /// Position of the start tag's `<`
        start: TextPoint,
        /// Position of the start tag's `>`
        end: TextPoint,
    },
    /// Self-closing element
    Empty {
        name: String,
        attributes: Attributes,
        start: TextPoint,
        end: TextPoint,
    },
    End {
        name: String,
        /// Position of the end tag's `>`
        end: TextPoint,
    },
    Text(String),
}

pub struct MarkupScanner<'a> {
    text: &'a str,
    reader: Reader<&'a [u8]>,
}

impl<'a> MarkupScanner<'a> {
    pub fn new(text: &'a str) -> Self {
        let mut reader = Reader::from_str(text);
        // Whitespace inside <plain> is significant
        reader.trim_text(false);
        reader.expand_empty_elements(false);
        Self { text, reader }
    }

    /// Next element or text event; `None` at end of input
    pub fn next_event(&mut self) -> Result<Option<MarkupEvent>> {
        loop {
            let event = self
                .reader
                .read_event()
                .map_err(|e| ParseError::xml(self.reader.buffer_position(), e))?;

            match event {
                Event::Start(ref e) => {
                    return Ok(Some(MarkupEvent::Start {
                        name: self.element_name(e)?,
                        attributes: self.attributes(e)?,
                        start: self.tag_start(),
                        end: self.tag_end(),
                    }));
                }
                Event::Empty(ref e) => {
                    return Ok(Some(MarkupEvent::Empty {
                        name: self.element_name(e)?,
                        attributes: self.attributes(e)?,
                        start: self.tag_start(),
                        end: self.tag_end(),
                    }));
                }
                Event::End(ref e) => {
                    let name = std::str::from_utf8(e.name().as_ref())
                        .map_err(|err| ParseError::xml(self.reader.buffer_position(), err))?
                        .to_string();
                    return Ok(Some(MarkupEvent::End {
                        name,
                        end: self.tag_end(),
                    }));
                }
                Event::Text(ref t) => {
                    let text = t
                        .unescape()
                        .map_err(|e| ParseError::xml(self.reader.buffer_position(), e))?;
                    return Ok(Some(MarkupEvent::Text(text.into_owned())));
                }
                Event::CData(t) => {
                    let bytes = t.into_inner();
                    return Ok(Some(MarkupEvent::Text(
                        String::from_utf8_lossy(&bytes).into_owned(),
                    )));
                }
                Event::Eof => return Ok(None),
                // Declarations, comments, processing instructions, doctype
                _ => continue,
            }
        }
    }

    fn tag_end(&self) -> TextPoint {
        TextPoint::locate(self.text, self.reader.buffer_position().saturating_sub(1))
    }

    /// `<` of the tag just read; a raw `<` cannot occur inside a tag
    fn tag_start(&self) -> TextPoint {
        let end = self.reader.buffer_position().min(self.text.len());
        let offset = self
            .text
            .get(..end)
            .and_then(|head| head.rfind('<'))
            .unwrap_or(0);
        TextPoint::locate(self.text, offset)
    }

    fn element_name(&self, e: &BytesStart) -> Result<String> {
        std::str::from_utf8(e.name().as_ref())
            .map(str::to_string)
            .map_err(|err| ParseError::xml(self.reader.buffer_position(), err))
    }

    fn attributes(&self, e: &BytesStart) -> Result<Attributes> {
        let mut attributes = Attributes::new();
        for attr in e.attributes() {
            let attr = attr.map_err(|err| ParseError::xml(self.reader.buffer_position(), err))?;
            let key = std::str::from_utf8(attr.key.as_ref())
                .map_err(|err| ParseError::xml(self.reader.buffer_position(), err))?
                .to_string();
            let value = attr
                .unescape_value()
                .map_err(|err| ParseError::xml(self.reader.buffer_position(), err))?
                .into_owned();
            attributes.insert(key, value);
        }
        Ok(attributes)
    }
}
