//! Chord names carried by chord layers
//!
//! A chord is stored the way the markup spells it: root letter, accidental,
//! minor flag and quality suffix. `H` is kept distinct from `B` because the
//! song sources use German naming.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Root letter of a chord
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChordRoot {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
}

impl ChordRoot {
    pub fn parse(text: &str) -> Option<Self> {
        match text {
            "A" => Some(ChordRoot::A),
            "B" => Some(ChordRoot::B),
            "C" => Some(ChordRoot::C),
            "D" => Some(ChordRoot::D),
            "E" => Some(ChordRoot::E),
            "F" => Some(ChordRoot::F),
            "G" => Some(ChordRoot::G),
            "H" => Some(ChordRoot::H),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ChordRoot::A => "A",
            ChordRoot::B => "B",
            ChordRoot::C => "C",
            ChordRoot::D => "D",
            ChordRoot::E => "E",
            ChordRoot::F => "F",
            ChordRoot::G => "G",
            ChordRoot::H => "H",
        }
    }
}

/// Accidental written after the root
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum ChordSign {
    #[default]
    Natural,
    Sharp,
    Flat,
}

impl ChordSign {
    pub fn parse(text: &str) -> Option<Self> {
        match text {
            "" => Some(ChordSign::Natural),
            "#" => Some(ChordSign::Sharp),
            "b" => Some(ChordSign::Flat),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ChordSign::Natural => "",
            ChordSign::Sharp => "#",
            ChordSign::Flat => "b",
        }
    }
}

/// Chord quality suffix
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum ChordType {
    #[default]
    Triad,
    Seventh,
}

impl ChordType {
    pub fn parse(text: &str) -> Option<Self> {
        match text {
            "" => Some(ChordType::Triad),
            "7" => Some(ChordType::Seventh),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ChordType::Triad => "",
            ChordType::Seventh => "7",
        }
    }
}

/// Parsed chord
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Chord {
    pub root: ChordRoot,
    pub sign: ChordSign,
    pub is_minor: bool,
    pub chord_type: ChordType,
}

impl Chord {
    pub fn new(root: ChordRoot) -> Self {
        Self {
            root,
            sign: ChordSign::Natural,
            is_minor: false,
            chord_type: ChordType::Triad,
        }
    }

    /// Display name, e.g. `C#m7`
    pub fn name(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}{}",
            self.root.as_str(),
            self.sign.as_str(),
            if self.is_minor { "m" } else { "" },
            self.chord_type.as_str()
        )
    }
}
