/*!
 * In-memory model of a parsed ITT document.
 *
 * The parser fills this model in document order; once parsing and timing
 * resolution are done it is handed to the renderers read-only.
 */

use std::collections::BTreeMap;
use std::fmt;

use num_rational::BigRational;

use crate::timecode::{FrameRate, FrameRateMultiplier, SmpteTimecode};

/// Named set of text presentation attributes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Style {
    pub id: String,
    pub font_family: Option<String>,
    pub font_size: Option<String>,
    pub font_weight: Option<String>,
    pub font_style: Option<String>,
    pub color: Option<String>,
    pub text_decoration: Option<String>,
    pub background_color: Option<String>,
}

impl Style {
    pub fn is_bold(&self) -> bool {
        self.font_weight.as_deref() == Some("bold")
    }

    pub fn is_italic(&self) -> bool {
        self.font_style.as_deref() == Some("italic")
    }

    pub fn is_underlined(&self) -> bool {
        self.text_decoration.as_deref() == Some("underline")
    }

    /// True when the style sets a foreground or background color
    pub fn has_color(&self) -> bool {
        self.color.is_some() || self.background_color.is_some()
    }
}

/// Named on-screen placement
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Region {
    pub id: String,
    pub origin: Option<String>,
    pub extent: Option<String>,
    pub text_align: Option<String>,
    pub display_align: Option<String>,
}

/// Which end of a cue interval
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CueSide {
    Begin,
    End,
}

impl fmt::Display for CueSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CueSide::Begin => write!(f, "begin"),
            CueSide::End => write!(f, "end"),
        }
    }
}

/// A single timed caption.
///
/// `begin_timecode`/`end_timecode` hold what the source said; `begin`/`end`
/// are absolute milliseconds and are only written by timing resolution.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cue {
    pub id: String,
    pub begin_timecode: Option<SmpteTimecode>,
    pub end_timecode: Option<SmpteTimecode>,
    pub begin: Option<BigRational>,
    pub end: Option<BigRational>,
    /// Shift inherited from enclosing containers; `None` means no ancestor
    /// declared one, which is different from a zero shift.
    pub offset: Option<BigRational>,
    pub region_id: Option<String>,
    /// Paragraph and span style ids in encounter order, duplicates kept
    pub style_ids: Vec<String>,
    /// Markup-safe content: text is escaped, inline markup kept verbatim and
    /// line breaks stored as `\n`
    pub content: String,
}

impl Cue {
    pub fn timecode(&self, side: CueSide) -> Option<&SmpteTimecode> {
        match side {
            CueSide::Begin => self.begin_timecode.as_ref(),
            CueSide::End => self.end_timecode.as_ref(),
        }
    }
}

/// Root of a parsed ITT file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IttDocument {
    pub lang: String,
    pub time_base: String,
    /// Raw `ttp:frameRate` text
    pub frame_rate: String,
    /// Rate used for every conversion, multiplier already applied
    pub frame_rate_value: Option<FrameRate>,
    pub frame_rate_multiplier: Option<FrameRateMultiplier>,
    pub styles: BTreeMap<String, Style>,
    pub regions: BTreeMap<String, Region>,
    /// Cues in document order
    pub cues: Vec<Cue>,
}

impl IttDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn effective_frame_rate(&self) -> Option<&FrameRate> {
        self.frame_rate_value.as_ref()
    }

    pub fn style(&self, id: &str) -> Option<&Style> {
        self.styles.get(id)
    }

    /// Region a cue was placed in, if it names a defined one
    pub fn cue_region(&self, cue: &Cue) -> Option<&Region> {
        cue.region_id.as_deref().and_then(|id| self.regions.get(id))
    }
}
