/*!
 * ITT parser.
 *
 * Parsing is split in two passes:
 *
 * - `events` turns the markup into a flat event stream
 * - `state` consumes the events and builds an [`IttDocument`] with raw timecodes
 * - `resolve` converts timecodes to absolute milliseconds once the stream ends
 *
 * Recoverable problems (a malformed cue timecode, a clamped negative time)
 * are reported through the [`Diagnostics`] handle in [`ParserOptions`] and
 * never abort the parse.
 */

pub mod events;
pub mod resolve;
pub mod state;

pub use events::{Attribute, EventSource, ParseEvent};
pub use resolve::resolve_timings;
pub use state::{ElementKind, IttParser};

use crate::diagnostics::Diagnostics;
use crate::document::IttDocument;
use crate::errors::ParseError;

/// Knobs for a single parse
#[derive(Debug, Clone, Default)]
pub struct ParserOptions {
    /// Sink for warnings and debug traces
    pub diagnostics: Diagnostics,
}

impl ParserOptions {
    pub fn with_diagnostics(diagnostics: Diagnostics) -> Self {
        Self { diagnostics }
    }
}

/// Parse ITT text with silent diagnostics
pub fn parse_itt(source: &str) -> Result<IttDocument, ParseError> {
    parse_itt_with(source, &ParserOptions::default())
}

/// Parse ITT text, reporting recovered problems through `options`
pub fn parse_itt_with(source: &str, options: &ParserOptions) -> Result<IttDocument, ParseError> {
    parse_events(EventSource::new(source), options)
}

/// Build a document from any event stream
pub fn parse_events<I>(events: I, options: &ParserOptions) -> Result<IttDocument, ParseError>
where
    I: IntoIterator<Item = Result<ParseEvent, ParseError>>,
{
    let diagnostics = &options.diagnostics;
    let mut parser = IttParser::new(diagnostics.clone());
    for event in events {
        parser.handle_event(event?)?;
    }

    let mut document = parser.finish();
    diagnostics.debug(format_args!(
        "Parsed {} styles, {} regions, {} cues",
        document.styles.len(),
        document.regions.len(),
        document.cues.len()
    ));

    resolve_timings(&mut document, diagnostics)?;
    Ok(document)
}
