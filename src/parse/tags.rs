//! Markup vocabulary
//!
//! Tag and attribute names recognized by the song markup parser.

/// Root element of a song file
pub const SONG: &str = "song";
pub const VERSE: &str = "verse";
pub const CHORUS: &str = "chorus";
pub const BRIDGE: &str = "bridge";
/// One renderable line inside a part
pub const STRING: &str = "string";
/// Plain-text region inside a `string`
pub const PLAIN: &str = "plain";
pub const CHORD: &str = "chord";
pub const REPEAT: &str = "repeat";

pub mod attr {
    //! Attribute names

    pub const ID: &str = "id";
    pub const LAYER_ID: &str = "layer_id";
    pub const NUMBER: &str = "number";
    pub const IS_OPENING: &str = "is_opening";
    pub const NAME: &str = "name";

    pub const MAIN_CHORD: &str = "main_chord";
    pub const CHORD_IS_MINOR: &str = "chord_is_minor";
    pub const CHORD_SIGN: &str = "chord_sign";
    pub const CHORD_TYPE: &str = "chord_type";

    pub const REP_RATE: &str = "rep_rate";

    pub const CANON: &str = "canon";
    pub const TEXT: &str = "text";
    pub const TEXT_RUS: &str = "textRus";
    pub const MUSIC: &str = "music";
    pub const ADDITIONAL_INFO: &str = "additionalInfo";
}

/// Default `layer_id` when the attribute is omitted
pub const DEFAULT_LAYER_ID: &str = "0";
