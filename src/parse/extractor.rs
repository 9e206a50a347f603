//! Element extraction by parser coordinates
//!
//! The event scanners report where an element's start tag begins and where
//! its end tag ends. The extractor turns those two points back into the
//! exact markup of the element, opening `<` included, so it can be handed to
//! the next builder without re-serializing anything. The start column may
//! point anywhere inside the start tag's first line; the nearest `<` at or
//! before it is taken.
//!
//! Lines and columns are 1-based. Columns count characters, not bytes.

use crate::parse::errors::ExtractError;

/// 1-based line/column of one character
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct TextPoint {
    pub line: usize,
    pub column: usize,
}

impl TextPoint {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Locate the character starting at byte `offset` of `text`
    pub fn locate(text: &str, offset: usize) -> TextPoint {
        let offset = offset.min(text.len());
        let before = &text[..floor_char_boundary(text, offset)];
        let line_start = before.rfind('\n').map_or(0, |i| i + 1);
        TextPoint {
            line: before.matches('\n').count() + 1,
            column: before[line_start..].chars().count() + 1,
        }
    }
}

fn floor_char_boundary(text: &str, mut index: usize) -> usize {
    while !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}

#[derive(Debug, Default)]
pub struct Extractor {
    start: TextPoint,
    end: TextPoint,
}

impl Extractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_start_point(&mut self, line: usize, column: usize) {
        self.start = TextPoint::new(line, column);
    }

    pub fn set_end_point(&mut self, line: usize, column: usize) {
        self.end = TextPoint::new(line, column);
    }

    pub fn clean(&mut self) {
        self.start = TextPoint::default();
        self.end = TextPoint::default();
    }

    pub fn extract_part(&self, full_text: &str) -> Result<String, ExtractError> {
        let TextPoint {
            line: start_line,
            column: start_column,
        } = self.start;
        let TextPoint {
            line: end_line,
            column: end_column,
        } = self.end;

        for (coordinate, value) in [
            ("start line", start_line),
            ("start column", start_column),
            ("end line", end_line),
            ("end column", end_column),
        ] {
            if value == 0 {
                return Err(ExtractError::NonPositive { coordinate, value });
            }
        }
        if start_line > end_line {
            return Err(ExtractError::InvertedLines {
                start: start_line,
                end: end_line,
            });
        }

        let lines: Vec<&str> = full_text.lines().collect();
        if lines.len() < end_line {
            return Err(ExtractError::NotEnoughLines {
                available: lines.len(),
                end: end_line,
            });
        }

        let first: Vec<char> = lines[start_line - 1].chars().collect();
        let search_to = (start_column - 1).min(first.len().saturating_sub(1));
        let bracket = first
            .get(..=search_to)
            .and_then(|head| head.iter().rposition(|&ch| ch == '<'))
            .ok_or(ExtractError::OpeningBracketNotFound {
                line: start_line,
                column: start_column,
            })?;

        if start_line == end_line {
            let end = end_column.min(first.len());
            return Ok(first[bracket..end.max(bracket)].iter().collect());
        }

        let mut parts: Vec<String> = Vec::with_capacity(end_line - start_line + 1);
        parts.push(first[bracket..].iter().collect());
        for line in &lines[start_line..end_line - 1] {
            parts.push((*line).to_string());
        }
        parts.push(lines[end_line - 1].chars().take(end_column).collect());

        Ok(parts.join("\n"))
    }
}
