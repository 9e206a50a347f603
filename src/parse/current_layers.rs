//! Span layers open at the current parse position
//!
//! One holder lives for the parse of a whole part so a repeat opened in one
//! line can be closed in a later one. Each entry remembers the line (index
//! within the part) where it was opened; that index is what lets the part
//! builder patch exactly the affected lines once the span closes.

use crate::models::layers::{ChunkLayer, Layer, WrappingLayer};
use crate::parse::errors::LayerError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum HolderOperation {
    #[default]
    None,
    Add,
    Remove,
}

/// An open span and where it started
#[derive(Clone, Debug, PartialEq)]
pub struct OpenSpan {
    pub layer: WrappingLayer,
    pub opened_in_line: usize,
}

#[derive(Debug, Default)]
pub struct CurrentLayersHolder {
    open: Vec<OpenSpan>,
    last_operation: HolderOperation,
    current_line: usize,
}

impl CurrentLayersHolder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the start of line `index` within the part
    pub fn begin_line(&mut self, index: usize) {
        self.current_line = index;
    }

    pub fn current_line(&self) -> usize {
        self.current_line
    }

    pub fn last_operation(&self) -> HolderOperation {
        self.last_operation
    }

    pub fn contains<L: Layer + ?Sized>(&self, layer: &L) -> bool {
        self.open.iter().any(|span| span.layer.is_same_with_layer(layer))
    }

    pub fn add(&mut self, layer: WrappingLayer) -> Result<(), LayerError> {
        if self.contains(&layer) {
            return Err(LayerError::AlreadyOpen {
                tag: layer.tag().name().to_string(),
                chunk_id: layer.chunk_id().to_string(),
            });
        }
        self.open.push(OpenSpan {
            layer,
            opened_in_line: self.current_line,
        });
        self.last_operation = HolderOperation::Add;
        Ok(())
    }

    /// Remove the open span with `layer`'s identity
    pub fn remove<L: Layer + ?Sized>(&mut self, layer: &L) -> Result<OpenSpan, LayerError> {
        let index = self
            .open
            .iter()
            .position(|span| span.layer.is_same_with_layer(layer))
            .ok_or_else(|| LayerError::NotOpen {
                tag: layer.tag().name().to_string(),
                chunk_id: layer.chunk_id().to_string(),
            })?;
        self.last_operation = HolderOperation::Remove;
        Ok(self.open.remove(index))
    }

    /// Open layers in opening order, as chunk layers
    pub fn snapshot(&self) -> Vec<ChunkLayer> {
        self.open
            .iter()
            .map(|span| ChunkLayer::Wrapping(span.layer.clone()))
            .collect()
    }

    pub fn open_spans(&self) -> &[OpenSpan] {
        &self.open
    }

    pub fn is_empty(&self) -> bool {
        self.open.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::layers::RepeatLayer;

    fn repeat(id: &str) -> WrappingLayer {
        WrappingLayer::Repeat(RepeatLayer {
            chunk_id: id.to_string(),
            layer_id: "0".to_string(),
            rep_rate: None,
        })
    }

    #[test]
    fn test_add_and_remove() {
        let mut holder = CurrentLayersHolder::new();
        assert_eq!(holder.last_operation(), HolderOperation::None);

        holder.begin_line(3);
        holder.add(repeat("1")).expect("first open");
        assert_eq!(holder.last_operation(), HolderOperation::Add);
        assert_eq!(holder.snapshot().len(), 1);

        let span = holder.remove(&repeat("1")).expect("close");
        assert_eq!(span.opened_in_line, 3);
        assert_eq!(holder.last_operation(), HolderOperation::Remove);
        assert!(holder.is_empty());
    }

    #[test]
    fn test_double_open_fails() {
        let mut holder = CurrentLayersHolder::new();
        holder.add(repeat("1")).expect("first open");
        assert_eq!(
            holder.add(repeat("1")),
            Err(LayerError::AlreadyOpen {
                tag: "repeat".to_string(),
                chunk_id: "1".to_string()
            })
        );
        holder.add(repeat("2")).expect("other id is independent");
    }

    #[test]
    fn test_close_without_open_fails() {
        let mut holder = CurrentLayersHolder::new();
        assert!(matches!(
            holder.remove(&repeat("7")),
            Err(LayerError::NotOpen { .. })
        ));
    }
}
