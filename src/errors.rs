/*!
 * Error types for the ittconv library.
 *
 * Each layer owns an enum built with the thiserror crate. Wrapping variants
 * keep their cause as the error source, so callers reporting with `{:#}`
 * (anyhow) or walking `Error::source` see the whole chain.
 */

use num_rational::BigRational;
use thiserror::Error;

use crate::document::CueSide;

/// Errors raised by frame rate and SMPTE timecode arithmetic
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimecodeError {
    /// Frame rate text is empty or not a decimal number
    #[error("invalid frame rate '{value}'")]
    InvalidFrameRate {
        /// Offending text
        value: String,
    },

    /// Frame rate is zero, no frame can be converted
    #[error("invalid frame rate: frame rate must be non-zero")]
    ZeroFrameRate,

    /// Multiplier is not two positive integers
    #[error("invalid frame rate multiplier '{value}': {reason}")]
    InvalidMultiplier {
        /// Offending text
        value: String,
        /// What was wrong with it
        reason: String,
    },

    /// Timecode text does not have the HH:MM:SS:FF shape
    #[error("invalid SMPTE timecode '{value}': {reason}")]
    Format {
        /// Offending text
        value: String,
        /// What was wrong with it
        reason: String,
    },

    /// Minutes or seconds outside [0, 60), or a negative field
    #[error("timecode out of range: {value}")]
    Range {
        /// Offending text
        value: String,
    },

    /// A decomposed component does not fit its field type
    #[error("timecode component too large: {0}")]
    Overflow(String),
}

/// Errors that abort parsing of an ITT document
#[derive(Error, Debug)]
pub enum ParseError {
    /// Root frameRate attribute could not be turned into a usable rate
    #[error("invalid frame rate '{value}'")]
    InvalidFrameRate {
        /// Raw attribute value
        value: String,
        #[source]
        source: TimecodeError,
    },

    /// A container carried a begin shift before any frame rate was known
    #[error("invalid frame rate: <{element}> has a begin shift but no frameRate was resolved")]
    FrameRateUnresolved {
        /// Element carrying the shift
        element: String,
    },

    /// Structured attribute that could not be parsed
    #[error("invalid {attribute} attribute '{value}'")]
    InvalidFormat {
        /// Attribute name
        attribute: &'static str,
        /// Raw attribute value
        value: String,
        #[source]
        source: TimecodeError,
    },

    /// Root element never declared a frame rate
    #[error("frameRate attribute missing in <tt> tag")]
    MissingFrameRate,

    /// A container begin shift was not a valid timecode
    #[error("invalid begin '{value}' on <{element}>")]
    ContainerOffset {
        /// Element carrying the shift
        element: String,
        /// Raw attribute value
        value: String,
        #[source]
        source: TimecodeError,
    },

    /// A cue timecode could not be converted to milliseconds
    #[error("cannot convert {side} timecode of cue '{cue_id}'")]
    Conversion {
        /// Cue identifier
        cue_id: String,
        /// Which side of the cue failed
        side: CueSide,
        #[source]
        source: TimecodeError,
    },

    /// Begin is not strictly before end once offsets are applied
    #[error(
        "invalid cue timing: begin time ({begin}) is not less than end time ({end}) for cue ID {cue_id}"
    )]
    InvalidTimeRange {
        /// Cue identifier
        cue_id: String,
        /// Resolved begin in milliseconds
        begin: BigRational,
        /// Resolved end in milliseconds
        end: BigRational,
    },

    /// Markup ended while an element was still open
    #[error("markup ended inside <{element}>")]
    Truncated {
        /// Innermost element left open
        element: String,
    },

    /// The underlying XML reader rejected the input
    #[error("malformed markup")]
    Stream(#[from] quick_xml::Error),
}

/// Structural problems found in generated TTML
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Output is not well-formed XML
    #[error("invalid TTML XML")]
    MalformedXml(#[from] quick_xml::Error),

    /// Document has no element at all
    #[error("TTML document has no root element")]
    Empty,

    /// Root element is something other than <tt>
    #[error("root element is <{found}>, expected <tt>")]
    WrongRoot {
        /// Name of the root that was found
        found: String,
    },

    /// More than one top-level element
    #[error("TTML document has more than one root element")]
    MultipleRoots,

    /// Elements left open at end of input
    #[error("TTML document ends with {open} unclosed element(s)")]
    Unbalanced {
        /// Number of elements still open
        open: usize,
    },

    /// Required <body> element is absent
    #[error("TTML document is missing required <body> element")]
    MissingBody,

    /// Attribute value holds markup that was never escaped
    #[error("attribute {attribute} of <{element}> contains a raw '<'")]
    InvalidAttribute {
        /// Element carrying the attribute
        element: String,
        /// Attribute name
        attribute: String,
    },
}

/// Errors raised while rendering a parsed document
#[derive(Error, Debug)]
pub enum SerializeError {
    /// XML writer or cue-markup reader failure
    #[error("XML processing failed")]
    Xml(#[from] quick_xml::Error),

    /// Write to the in-memory buffer failed
    #[error("failed to write rendered output")]
    Io(#[from] std::io::Error),

    /// Rendered bytes were not UTF-8
    #[error("rendered output is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// Generated TTML failed the structural check
    #[error("generated TTML failed validation")]
    Validation(#[from] ValidationError),
}

/// Top-level error for a full source-to-output conversion
#[derive(Error, Debug)]
pub enum ConvertError {
    /// Parsing or timing resolution failed
    #[error("failed to parse ITT document")]
    Parse(#[from] ParseError),

    /// Rendering the requested format failed
    #[error("failed to render output")]
    Serialize(#[from] SerializeError),
}
