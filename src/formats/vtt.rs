/*!
 * WebVTT renderer.
 *
 * Cue content is walked as markup: spans become WebVTT class, bold, italic
 * and underline tags, line breaks become new cue lines, any other element is
 * dropped while its text is kept.
 */

use std::borrow::Cow;

use num_rational::BigRational;
use num_traits::Zero;
use once_cell::sync::Lazy;
use quick_xml::Reader;
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use regex::Regex;

use super::format_timestamp;
use crate::app_config::VttOptions;
use crate::document::{Cue, IttDocument, Region, Style};
use crate::errors::SerializeError;

// "x% y%" pairs used by region origin and extent
static PERCENT_PAIR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(\d+(?:\.\d+)?)%\s+(\d+(?:\.\d+)?)%\s*$").expect("percentage pair pattern is valid")
});

/// Render `document` as WebVTT
pub fn to_vtt(document: &IttDocument, options: &VttOptions) -> Result<String, SerializeError> {
    let mut output = String::from("WEBVTT\n\n");

    if options.style_block {
        output.push_str(&style_block(document));
    }

    let mut cues: Vec<&Cue> = document.cues.iter().collect();
    if options.sort_cues {
        let zero = BigRational::zero();
        cues.sort_by(|a, b| {
            a.begin
                .as_ref()
                .unwrap_or(&zero)
                .cmp(b.begin.as_ref().unwrap_or(&zero))
        });
    }

    for cue in cues {
        output.push_str(&format_timestamp(cue.begin.as_ref()));
        output.push_str(" --> ");
        output.push_str(&format_timestamp(cue.end.as_ref()));

        if options.cue_settings {
            if let Some(settings) = document.cue_region(cue).and_then(cue_settings) {
                output.push(' ');
                output.push_str(&settings);
            }
        }
        output.push('\n');

        let text = cue_text(document, cue)?;
        if !text.is_empty() {
            output.push_str(&text);
            output.push('\n');
        }
        output.push('\n');
    }

    Ok(output)
}

/// `STYLE` block with one `::cue(.id)` rule per colored style, or nothing
pub fn style_block(document: &IttDocument) -> String {
    let rules: Vec<String> = document
        .styles
        .values()
        .filter(|style| style.has_color())
        .map(|style| {
            let mut rule = format!("::cue(.{}) {{\n", style.id);
            if let Some(color) = &style.color {
                rule.push_str(&format!("  color: {};\n", color));
            }
            if let Some(background) = &style.background_color {
                rule.push_str(&format!("  background-color: {};\n", background));
            }
            rule.push('}');
            rule
        })
        .collect();

    if rules.is_empty() {
        return String::new();
    }
    format!("STYLE\n{}\n\n", rules.join("\n"))
}

/// Cue settings derived from a region, `None` when it yields none
pub fn cue_settings(region: &Region) -> Option<String> {
    let mut settings = Vec::new();

    if let Some(caps) = region.origin.as_deref().and_then(|origin| PERCENT_PAIR.captures(origin)) {
        settings.push(format!("line:{}%", &caps[2]));
    }
    if let Some(caps) = region.extent.as_deref().and_then(|extent| PERCENT_PAIR.captures(extent)) {
        settings.push(format!("size:{}%", &caps[1]));
    }
    if let Some(align) = region.text_align.as_deref().filter(|align| !align.is_empty()) {
        settings.push(format!("align:{}", align));
    }

    if settings.is_empty() {
        return None;
    }
    settings.push("position:50%".to_string());
    Some(settings.join(" "))
}

/// Emphasis a set of styles asks for
#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct Emphasis {
    classes: Vec<String>,
    bold: bool,
    italic: bool,
    underline: bool,
}

impl Emphasis {
    fn from_styles<'s>(styles: impl IntoIterator<Item = &'s Style>) -> Self {
        let mut emphasis = Self::default();
        for style in styles {
            emphasis.apply(style);
        }
        emphasis
    }

    fn apply(&mut self, style: &Style) {
        if style.has_color() && !style.id.is_empty() {
            self.classes.push(style.id.clone());
        }
        self.bold |= style.is_bold();
        self.italic |= style.is_italic();
        self.underline |= style.is_underlined();
    }

    /// Opening tags and the matching closers in closing order
    fn tags(&self) -> (String, Vec<&'static str>) {
        let mut open = String::new();
        let mut closers = Vec::new();
        if !self.classes.is_empty() {
            open.push_str(&format!("<c.{}>", self.classes.join(".")));
            closers.push("</c>");
        }
        for (enabled, tag, closer) in [
            (self.bold, "<b>", "</b>"),
            (self.italic, "<i>", "</i>"),
            (self.underline, "<u>", "</u>"),
        ] {
            if enabled {
                open.push_str(tag);
                closers.push(closer);
            }
        }
        closers.reverse();
        (open, closers)
    }
}

/// WebVTT cue text for `cue`, one payload line per line break
pub fn cue_text(document: &IttDocument, cue: &Cue) -> Result<String, SerializeError> {
    let markup = format!("<p>{}</p>", cue.content);
    let mut reader = Reader::from_str(&markup);
    let mut text = String::new();
    let mut span_closers: Vec<Vec<&'static str>> = Vec::new();
    let mut span_style_count = 0usize;

    loop {
        match reader.read_event()? {
            Event::Start(element) if element.local_name().as_ref() == b"span" => {
                let (emphasis, style_count) = span_emphasis(document, &element)?;
                span_style_count += style_count;
                let (open, closers) = emphasis.tags();
                text.push_str(&open);
                span_closers.push(closers);
            }
            Event::End(element) if element.local_name().as_ref() == b"span" => {
                if let Some(closers) = span_closers.pop() {
                    closers.iter().for_each(|closer| text.push_str(closer));
                }
            }
            Event::Empty(element) if element.local_name().as_ref() == b"br" => text.push('\n'),
            Event::Text(raw) => {
                let raw = String::from_utf8_lossy(raw.as_ref()).into_owned();
                // A raw newline is a stored line break; escaped whitespace is not
                for (index, segment) in raw.split('\n').enumerate() {
                    if index > 0 {
                        text.push('\n');
                    }
                    let segment = unescape(segment).map_err(quick_xml::Error::from)?;
                    text.push_str(&escape_vtt(&collapse_whitespace(&segment)));
                }
            }
            Event::CData(data) => {
                let data = String::from_utf8_lossy(&data.into_inner()).into_owned();
                text.push_str(&escape_vtt(&collapse_whitespace(&data)));
            }
            Event::Eof => break,
            _ => {}
        }
    }

    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    if lines.is_empty() {
        return Ok(String::new());
    }
    let body = lines.join("\n");

    // Paragraph styles come first in the cue's style list, span styles after
    let paragraph_ids = &cue.style_ids[..cue.style_ids.len().saturating_sub(span_style_count)];
    let emphasis = Emphasis::from_styles(paragraph_ids.iter().filter_map(|id| document.style(id)));
    let (open, closers) = emphasis.tags();
    Ok(format!("{}{}{}", open, body, closers.concat()))
}

fn span_emphasis(document: &IttDocument, element: &BytesStart<'_>) -> Result<(Emphasis, usize), SerializeError> {
    let mut emphasis = Emphasis::default();
    let mut inline = Style::default();
    let mut style_count = 0;

    for attr in element.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        let value = attr.unescape_value()?.into_owned();
        match attr.key.local_name().as_ref() {
            b"style" => {
                for id in value.split_whitespace() {
                    style_count += 1;
                    if let Some(style) = document.style(id) {
                        emphasis.apply(style);
                    }
                }
            }
            b"fontWeight" => inline.font_weight = Some(value),
            b"fontStyle" => inline.font_style = Some(value),
            b"textDecoration" => inline.text_decoration = Some(value),
            _ => {}
        }
    }

    emphasis.bold |= inline.is_bold();
    emphasis.italic |= inline.is_italic();
    emphasis.underline |= inline.is_underlined();
    Ok((emphasis, style_count))
}

fn collapse_whitespace(text: &str) -> String {
    let mut collapsed = String::with_capacity(text.len());
    let mut pending_space = false;
    for ch in text.chars() {
        if ch.is_whitespace() {
            pending_space = true;
            continue;
        }
        if pending_space {
            collapsed.push(' ');
            pending_space = false;
        }
        collapsed.push(ch);
    }
    if pending_space {
        collapsed.push(' ');
    }
    collapsed
}

fn escape_vtt(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<']) {
        return Cow::Borrowed(text);
    }
    Cow::Owned(text.replace('&', "&amp;").replace('<', "&lt;"))
}
