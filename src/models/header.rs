//! Song file header
//!
//! Metadata carried as attributes of the `<song>` root element. Read once
//! when a song file is imported, independently of the body parse.

use roxmltree::{Document, Node};
use serde::{Deserialize, Serialize};

use crate::parse::errors::{ParseError, Result};
use crate::parse::tags::{self, attr};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct SongHeader {
    pub number: u32,
    pub name: String,
    pub canon: String,
    /// Lyrics author
    pub text: String,
    /// Russian translation author
    pub text_rus: String,
    pub music: String,
    pub additional_info: String,
}

impl SongHeader {
    /// Read the header from a full song document
    pub fn parse(markup: &str) -> Result<SongHeader> {
        let doc = Document::parse(markup)
            .map_err(|e| ParseError::xml(0, format!("XML parse error: {}", e)))?;

        let root = doc.root_element();
        if root.tag_name().name() != tags::SONG {
            return Err(ParseError::MissingElement(tags::SONG.to_string()));
        }

        let number_text = required(root, attr::NUMBER)?;
        let number = number_text
            .trim()
            .parse::<u32>()
            .map_err(|_| ParseError::InvalidAttribute {
                tag: tags::SONG.to_string(),
                attribute: attr::NUMBER.to_string(),
                value: number_text.to_string(),
            })?;

        Ok(SongHeader {
            number,
            name: required(root, attr::NAME)?.to_string(),
            canon: required(root, attr::CANON)?.to_string(),
            text: required(root, attr::TEXT)?.to_string(),
            text_rus: required(root, attr::TEXT_RUS)?.to_string(),
            music: required(root, attr::MUSIC)?.to_string(),
            additional_info: required(root, attr::ADDITIONAL_INFO)?.to_string(),
        })
    }
}

fn required<'a>(node: Node<'a, '_>, name: &str) -> Result<&'a str> {
    node.attribute(name)
        .ok_or_else(|| ParseError::MissingAttribute {
            tag: tags::SONG.to_string(),
            attribute: name.to_string(),
        })
}
