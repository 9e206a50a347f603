//! Per-song layer registry
//!
//! The stack remembers every layer seen while parsing one song, in the order
//! it was first seen, together with an ON/OFF switch the front-end can flip.
//! Adding and wrapping layers live in separate registries with independent
//! position counters.

use serde::{Deserialize, Serialize};

use crate::models::layers::{AddingLayer, Layer, LayerIdentity, WrappingLayer};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LayerState {
    #[default]
    On,
    Off,
}

/// Result of registering a layer
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted { position: u32 },
    AlreadyExists,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct StackEntry<L> {
    pub layer: L,
    pub position: u32,
    pub state: LayerState,
}

/// Ordered registry for one layer capability
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct LayerRegistry<L> {
    entries: Vec<StackEntry<L>>,
}

impl<L> Default for LayerRegistry<L> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<L: Layer + Clone> LayerRegistry<L> {
    pub fn insert(&mut self, layer: L) -> InsertOutcome {
        if self.contains(&layer.identity()) {
            return InsertOutcome::AlreadyExists;
        }
        let position = self
            .entries
            .iter()
            .map(|entry| entry.position)
            .max()
            .map_or(0, |max| max + 1);
        self.entries.push(StackEntry {
            layer,
            position,
            state: LayerState::On,
        });
        InsertOutcome::Inserted { position }
    }

    /// Swap in a newer version of a registered layer, keeping its position
    /// and state. Returns false when no layer has its identity.
    pub fn update(&mut self, layer: L) -> bool {
        let identity = layer.identity();
        match self
            .entries
            .iter_mut()
            .find(|entry| entry.layer.has_identity(&identity))
        {
            Some(entry) => {
                entry.layer = layer;
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, identity: &LayerIdentity) -> bool {
        self.entries.iter().any(|entry| entry.layer.has_identity(identity))
    }

    pub fn get(&self, identity: &LayerIdentity) -> Option<&StackEntry<L>> {
        self.entries.iter().find(|entry| entry.layer.has_identity(identity))
    }

    /// Returns false when no layer has this identity
    pub fn set_state(&mut self, identity: &LayerIdentity, state: LayerState) -> bool {
        match self
            .entries
            .iter_mut()
            .find(|entry| entry.layer.has_identity(identity))
        {
            Some(entry) => {
                entry.state = state;
                true
            }
            None => false,
        }
    }

    pub fn is_on(&self, identity: &LayerIdentity) -> bool {
        self.get(identity)
            .map_or(false, |entry| entry.state == LayerState::On)
    }

    /// Every entry sorted by position
    pub fn sorted(&self) -> Vec<&StackEntry<L>> {
        let mut entries: Vec<&StackEntry<L>> = self.entries.iter().collect();
        entries.sort_by_key(|entry| entry.position);
        entries
    }

    /// ON layers sorted by position
    pub fn active(&self) -> Vec<&L> {
        self.sorted()
            .into_iter()
            .filter(|entry| entry.state == LayerState::On)
            .map(|entry| &entry.layer)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Both registries of one song
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct LayerStack {
    adding: LayerRegistry<AddingLayer>,
    wrapping: LayerRegistry<WrappingLayer>,
}

impl LayerStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_adding_layer(&mut self, layer: AddingLayer) -> InsertOutcome {
        let outcome = self.adding.insert(layer);
        log::trace!("adding layer registered: {:?}", outcome);
        outcome
    }

    pub fn add_wrapping_layer(&mut self, layer: WrappingLayer) -> InsertOutcome {
        let outcome = self.wrapping.insert(layer);
        log::trace!("wrapping layer registered: {:?}", outcome);
        outcome
    }

    /// Record the closed version of a span, keeping its position and state
    pub fn update_wrapping_layer(&mut self, layer: WrappingLayer) -> bool {
        self.wrapping.update(layer)
    }

    pub fn adding(&self) -> &LayerRegistry<AddingLayer> {
        &self.adding
    }

    pub fn wrapping(&self) -> &LayerRegistry<WrappingLayer> {
        &self.wrapping
    }

    pub fn active_adding_layers(&self) -> Vec<&AddingLayer> {
        self.adding.active()
    }

    pub fn active_wrapping_layers(&self) -> Vec<&WrappingLayer> {
        self.wrapping.active()
    }

    /// Switch a layer ON or OFF in whichever registry holds it
    pub fn set_state(&mut self, identity: &LayerIdentity, state: LayerState) -> bool {
        self.adding.set_state(identity, state) || self.wrapping.set_state(identity, state)
    }

    pub fn is_on(&self, identity: &LayerIdentity) -> bool {
        self.adding.is_on(identity) || self.wrapping.is_on(identity)
    }
}
