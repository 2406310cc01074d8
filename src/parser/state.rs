/*!
 * ITT parsing state machine.
 *
 * Consumes [`ParseEvent`]s one at a time and builds an [`IttDocument`].
 * Nesting is tracked with explicit stacks, one entry per open container, so
 * depth is bounded only by memory:
 *
 * - region stack: the container's own `region`, `None` to inherit
 * - offset stack: accumulated container `begin` shift in milliseconds,
 *   `None` when no ancestor declared a shift
 * - style stack: style ids of open spans
 *
 * Inside a paragraph only spans and line breaks are interpreted; every other
 * element is copied into the cue content verbatim.
 */

use num_rational::BigRational;
use num_traits::Zero;
use quick_xml::escape::escape;

use super::events::{Attribute, ParseEvent, attribute};
use crate::diagnostics::Diagnostics;
use crate::document::{Cue, CueSide, IttDocument, Region, Style};
use crate::errors::{ParseError, TimecodeError};
use crate::timecode::{FrameRate, FrameRateMultiplier, SmpteTimecode};

/// Elements the state machine knows how to handle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    /// `tt`
    Root,
    /// `body`, `div`
    Container,
    /// `style`
    StyleDefinition,
    /// `region`
    RegionDefinition,
    /// `p`
    Paragraph,
    Span,
    /// `br`
    LineBreak,
    Other,
}

impl ElementKind {
    pub fn classify(name: &str) -> Self {
        match name {
            "tt" => ElementKind::Root,
            "body" | "div" => ElementKind::Container,
            "style" => ElementKind::StyleDefinition,
            "region" => ElementKind::RegionDefinition,
            "p" => ElementKind::Paragraph,
            "span" => ElementKind::Span,
            "br" => ElementKind::LineBreak,
            _ => ElementKind::Other,
        }
    }
}

/// Incremental ITT parser
pub struct IttParser {
    diagnostics: Diagnostics,
    document: IttDocument,
    root_seen: bool,
    frame_rate: Option<FrameRate>,
    region_stack: Vec<Option<String>>,
    offset_stack: Vec<Option<BigRational>>,
    style_stack: Vec<Vec<String>>,
    current_cue: Option<Cue>,
    content: String,
    in_paragraph: bool,
    in_span: bool,
    // verbatim-copied elements open inside the current paragraph
    open_markup: Vec<String>,
}

impl IttParser {
    pub fn new(diagnostics: Diagnostics) -> Self {
        Self {
            diagnostics,
            document: IttDocument::new(),
            root_seen: false,
            frame_rate: None,
            region_stack: Vec::new(),
            offset_stack: Vec::new(),
            style_stack: Vec::new(),
            current_cue: None,
            content: String::new(),
            in_paragraph: false,
            in_span: false,
            open_markup: Vec::new(),
        }
    }

    /// Frame rate resolved from the root element so far
    pub fn frame_rate(&self) -> Option<&FrameRate> {
        self.frame_rate.as_ref()
    }

    /// Nesting depth of open containers
    pub fn depth(&self) -> usize {
        self.region_stack.len()
    }

    /// Feed one event
    pub fn handle_event(&mut self, event: ParseEvent) -> Result<(), ParseError> {
        match event {
            ParseEvent::Start { name, attributes } => self.handle_start(&name, &attributes),
            ParseEvent::End { name } => {
                self.handle_end(&name);
                Ok(())
            }
            ParseEvent::Text(text) => {
                self.handle_text(&text);
                Ok(())
            }
        }
    }

    /// Hand over the document built so far. Cue timings are still raw.
    pub fn finish(self) -> IttDocument {
        self.document
    }

    fn handle_start(&mut self, name: &str, attributes: &[Attribute]) -> Result<(), ParseError> {
        let kind = ElementKind::classify(name);

        if self.in_paragraph {
            match kind {
                ElementKind::Span => self.open_span(attributes),
                ElementKind::LineBreak => self.line_break(),
                _ => self.open_verbatim(name, attributes),
            }
            return Ok(());
        }

        match kind {
            ElementKind::Root => self.open_root(attributes)?,
            ElementKind::Container => self.open_container(name, attributes)?,
            ElementKind::StyleDefinition => self.define_style(attributes),
            ElementKind::RegionDefinition => self.define_region(attributes),
            ElementKind::Paragraph => self.open_paragraph(attributes),
            ElementKind::Span => self.open_span(attributes),
            ElementKind::LineBreak => self.line_break(),
            ElementKind::Other => {}
        }
        Ok(())
    }

    fn handle_end(&mut self, name: &str) {
        if self.in_paragraph {
            if self.open_markup.last().is_some_and(|open| open == name) {
                self.open_markup.pop();
                if ElementKind::classify(name) == ElementKind::Span {
                    self.close_span();
                }
                self.content.push_str("</");
                self.content.push_str(name);
                self.content.push('>');
            } else if ElementKind::classify(name) == ElementKind::Paragraph {
                self.close_paragraph();
            }
            return;
        }

        match ElementKind::classify(name) {
            ElementKind::Container => {
                self.region_stack.pop();
                self.offset_stack.pop();
            }
            ElementKind::Span => self.close_span(),
            _ => {}
        }
    }

    fn handle_text(&mut self, text: &str) {
        if self.current_cue.is_some() && (self.in_paragraph || self.in_span) {
            self.content.push_str(&escape_text(text));
        }
    }

    fn open_root(&mut self, attributes: &[Attribute]) -> Result<(), ParseError> {
        if self.root_seen {
            self.diagnostics
                .debug(format_args!("Ignoring nested <tt> element"));
            return Ok(());
        }
        self.root_seen = true;

        let mut multiplier = None;
        for attr in attributes {
            match attr.name.as_str() {
                "lang" => self.document.lang = attr.value.clone(),
                "timeBase" => self.document.time_base = attr.value.clone(),
                "frameRate" => self.document.frame_rate = attr.value.clone(),
                "frameRateMultiplier" => multiplier = Some(attr.value.as_str()),
                _ => continue,
            }
            self.diagnostics
                .debug(format_args!("Parsed {}: {}", attr.name, attr.value));
        }

        if let Some(raw) = multiplier.filter(|raw| !raw.trim().is_empty()) {
            let parsed = FrameRateMultiplier::parse(raw).map_err(|source| ParseError::InvalidFormat {
                attribute: "frameRateMultiplier",
                value: raw.to_string(),
                source,
            })?;
            self.document.frame_rate_multiplier = Some(parsed);
        }

        // A missing frameRate is reported once, by timing resolution
        if self.document.frame_rate.is_empty() {
            return Ok(());
        }

        let invalid = |source| ParseError::InvalidFrameRate {
            value: self.document.frame_rate.clone(),
            source,
        };
        let base = FrameRate::parse(&self.document.frame_rate).map_err(invalid)?;
        if base.is_zero() {
            return Err(invalid(TimecodeError::ZeroFrameRate));
        }

        let effective = match &self.document.frame_rate_multiplier {
            Some(multiplier) => match base.with_multiplier(multiplier) {
                Some(rate) => rate,
                None => {
                    self.diagnostics.debug(format_args!(
                        "Skipping frameRateMultiplier {} because base frameRate {} is non-integer",
                        multiplier, self.document.frame_rate
                    ));
                    base
                }
            },
            None => base,
        };

        self.diagnostics
            .debug(format_args!("Computed effective frame rate {}", effective));
        self.frame_rate = Some(effective.clone());
        self.document.frame_rate_value = Some(effective);
        Ok(())
    }

    fn open_container(&mut self, name: &str, attributes: &[Attribute]) -> Result<(), ParseError> {
        let region = attribute(attributes, "region")
            .filter(|region| !region.is_empty())
            .map(str::to_string);
        let offset = self.scope_offset(name, attribute(attributes, "begin"))?;

        self.region_stack.push(region);
        self.offset_stack.push(offset);
        Ok(())
    }

    // Parent shift plus this container's own begin, if any
    fn scope_offset(&self, element: &str, begin: Option<&str>) -> Result<Option<BigRational>, ParseError> {
        let inherited = self.offset_stack.last().cloned().flatten();
        let Some(raw) = begin.filter(|raw| !raw.trim().is_empty()) else {
            return Ok(inherited);
        };

        let frame_rate = self
            .frame_rate
            .as_ref()
            .ok_or_else(|| ParseError::FrameRateUnresolved {
                element: element.to_string(),
            })?;
        let wrap = |source| ParseError::ContainerOffset {
            element: element.to_string(),
            value: raw.to_string(),
            source,
        };
        let shift = SmpteTimecode::parse(raw)
            .and_then(|timecode| timecode.to_milliseconds(frame_rate))
            .map_err(wrap)?;

        self.diagnostics
            .debug(format_args!("Container <{}> shifts descendants by {} ms", element, shift));
        Ok(Some(inherited.unwrap_or_else(BigRational::zero) + shift))
    }

    fn define_style(&mut self, attributes: &[Attribute]) {
        let mut style = Style::default();
        for attr in attributes {
            let value = Some(attr.value.clone());
            match attr.name.as_str() {
                "id" => style.id = attr.value.clone(),
                "fontFamily" => style.font_family = value,
                "fontSize" => style.font_size = value,
                "fontWeight" => style.font_weight = value,
                "fontStyle" => style.font_style = value,
                "color" => style.color = value,
                "textDecoration" => style.text_decoration = value,
                "backgroundColor" => style.background_color = value,
                _ => {}
            }
        }

        if style.id.is_empty() {
            self.diagnostics
                .debug(format_args!("Discarding style without id"));
            return;
        }
        self.diagnostics.debug(format_args!("Stored style {:?}", style));
        self.document.styles.insert(style.id.clone(), style);
    }

    fn define_region(&mut self, attributes: &[Attribute]) {
        let mut region = Region::default();
        for attr in attributes {
            let value = Some(attr.value.clone());
            match attr.name.as_str() {
                "id" => region.id = attr.value.clone(),
                "origin" => region.origin = value,
                "extent" => region.extent = value,
                "textAlign" => region.text_align = value,
                "displayAlign" => region.display_align = value,
                _ => {}
            }
        }

        if region.id.is_empty() {
            self.diagnostics
                .debug(format_args!("Discarding region without id"));
            return;
        }
        self.diagnostics.debug(format_args!("Stored region {:?}", region));
        self.document.regions.insert(region.id.clone(), region);
    }

    fn open_paragraph(&mut self, attributes: &[Attribute]) {
        let mut cue = Cue::default();
        let mut explicit_id = None;
        let mut explicit_region = None;

        for attr in attributes {
            match attr.name.as_str() {
                "begin" => {
                    // The begin text doubles as the cue id unless xml:id is set
                    cue.id = attr.value.clone();
                    cue.begin_timecode = self.cue_timecode(&attr.value, CueSide::Begin);
                }
                "end" => cue.end_timecode = self.cue_timecode(&attr.value, CueSide::End),
                "id" => explicit_id = Some(attr.value.clone()),
                "region" => explicit_region = Some(attr.value.clone()),
                "style" => cue
                    .style_ids
                    .extend(attr.value.split_whitespace().map(str::to_string)),
                _ => {}
            }
        }

        if let Some(id) = explicit_id {
            cue.id = id;
        }

        cue.region_id = match explicit_region {
            Some(region) => Some(region).filter(|region| !region.is_empty()),
            None => self.region_stack.iter().rev().flatten().next().cloned(),
        };
        cue.offset = self.offset_stack.last().cloned().flatten();

        self.diagnostics.debug(format_args!(
            "Starting cue {} in region {}",
            cue.id,
            cue.region_id.as_deref().unwrap_or("<none>")
        ));

        self.current_cue = Some(cue);
        self.content.clear();
        self.open_markup.clear();
        self.in_paragraph = true;
    }

    // Malformed values degrade to a warning and an unset side
    fn cue_timecode(&self, raw: &str, side: CueSide) -> Option<SmpteTimecode> {
        match SmpteTimecode::parse(raw) {
            Ok(timecode) => Some(timecode),
            Err(e) => {
                self.diagnostics
                    .warn(format_args!("Invalid {} timecode '{}': {}", side, raw, e));
                None
            }
        }
    }

    fn close_paragraph(&mut self) {
        if let Some(mut cue) = self.current_cue.take() {
            cue.content = std::mem::take(&mut self.content);
            self.diagnostics
                .debug(format_args!("Finalized cue {}: {:?}", cue.id, cue.content));
            self.document.cues.push(cue);
        }
        self.content.clear();
        self.open_markup.clear();
        self.in_paragraph = false;
        self.in_span = !self.style_stack.is_empty();
    }

    fn open_span(&mut self, attributes: &[Attribute]) {
        let style_ids: Vec<String> = attribute(attributes, "style")
            .map(|styles| styles.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default();

        if let Some(cue) = self.current_cue.as_mut() {
            cue.style_ids.extend(style_ids.iter().cloned());
        }
        self.style_stack.push(style_ids);
        self.in_span = true;

        if self.in_paragraph {
            self.open_verbatim("span", attributes);
        }
    }

    fn close_span(&mut self) {
        self.style_stack.pop();
        self.in_span = !self.style_stack.is_empty();
    }

    fn line_break(&mut self) {
        if self.current_cue.is_some() && (self.in_paragraph || self.in_span) {
            self.content.push('\n');
        }
    }

    fn open_verbatim(&mut self, name: &str, attributes: &[Attribute]) {
        self.content.push('<');
        self.content.push_str(name);
        for attr in attributes {
            self.content.push(' ');
            self.content.push_str(&attr.name);
            self.content.push_str("=\"");
            self.content.push_str(&escape_text(&attr.value));
            self.content.push('"');
        }
        self.content.push('>');
        self.open_markup.push(name.to_string());
    }
}

/// Escape character data so stored content can be embedded in XML as is.
///
/// Source whitespace is written as character references, which keeps it
/// apart from the raw `\n` that marks a `<br/>`.
pub fn escape_text(text: &str) -> String {
    escape(text)
        .replace('\n', "&#xA;")
        .replace('\r', "&#xD;")
        .replace('\t', "&#x9;")
}
