/*!
 * TTML renderer.
 *
 * Writes a single `<div>` holding one `<p>` per cue in document order. Cue
 * content is already markup-safe and goes out as inner markup untouched,
 * except that stored line breaks become `<br/>` again.
 */

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use super::format_timestamp;
use super::validator::validate_ttml;
use crate::app_config::TtmlOptions;
use crate::document::{Cue, IttDocument, Region, Style};
use crate::errors::SerializeError;

const TTML_NS: &str = "http://www.w3.org/ns/ttml";
const TTML_PARAMETER_NS: &str = "http://www.w3.org/ns/ttml#parameter";
const TTML_STYLING_NS: &str = "http://www.w3.org/ns/ttml#styling";

/// Render `document` as TTML
pub fn to_ttml(document: &IttDocument, options: &TtmlOptions) -> Result<String, SerializeError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', options.indent);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut root = BytesStart::new("tt");
    root.push_attribute(("xmlns", TTML_NS));
    root.push_attribute(("xmlns:ttp", TTML_PARAMETER_NS));
    root.push_attribute(("xmlns:tts", TTML_STYLING_NS));
    root.push_attribute(("ttp:timeBase", "media"));
    root.push_attribute(("xml:lang", document.lang.as_str()));
    writer.write_event(Event::Start(root))?;

    write_head(&mut writer, document)?;

    writer.write_event(Event::Start(BytesStart::new("body")))?;
    writer.write_event(Event::Start(BytesStart::new("div")))?;
    for cue in &document.cues {
        write_cue(&mut writer, cue)?;
    }
    writer.write_event(Event::End(BytesEnd::new("div")))?;
    writer.write_event(Event::End(BytesEnd::new("body")))?;
    writer.write_event(Event::End(BytesEnd::new("tt")))?;

    let mut output = String::from_utf8(writer.into_inner())?;
    output.push('\n');

    if options.validate {
        validate_ttml(&output)?;
    }
    Ok(output)
}

fn write_head(writer: &mut Writer<Vec<u8>>, document: &IttDocument) -> Result<(), SerializeError> {
    writer.write_event(Event::Start(BytesStart::new("head")))?;

    write_section(writer, "styling", document.styles.values().map(style_element))?;
    write_section(writer, "layout", document.regions.values().map(region_element))?;

    writer.write_event(Event::End(BytesEnd::new("head")))?;
    Ok(())
}

// Empty sections are written self-closed
fn write_section<'a>(
    writer: &mut Writer<Vec<u8>>,
    name: &str,
    children: impl Iterator<Item = BytesStart<'a>>,
) -> Result<(), SerializeError> {
    let mut children = children.peekable();
    if children.peek().is_none() {
        writer.write_event(Event::Empty(BytesStart::new(name)))?;
        return Ok(());
    }

    writer.write_event(Event::Start(BytesStart::new(name)))?;
    for child in children {
        writer.write_event(Event::Empty(child))?;
    }
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

fn style_element(style: &Style) -> BytesStart<'static> {
    let mut element = BytesStart::new("style");
    element.push_attribute(("xml:id", style.id.as_str()));
    let properties = [
        ("tts:color", &style.color),
        ("tts:backgroundColor", &style.background_color),
        ("tts:fontFamily", &style.font_family),
        ("tts:fontSize", &style.font_size),
        ("tts:fontStyle", &style.font_style),
        ("tts:fontWeight", &style.font_weight),
        ("tts:textDecoration", &style.text_decoration),
    ];
    push_present(&mut element, &properties);
    element
}

fn region_element(region: &Region) -> BytesStart<'static> {
    let mut element = BytesStart::new("region");
    element.push_attribute(("xml:id", region.id.as_str()));
    let properties = [
        ("tts:origin", &region.origin),
        ("tts:extent", &region.extent),
        ("tts:displayAlign", &region.display_align),
        ("tts:textAlign", &region.text_align),
    ];
    push_present(&mut element, &properties);
    element
}

fn push_present(element: &mut BytesStart<'_>, properties: &[(&str, &Option<String>)]) {
    for (name, value) in properties {
        if let Some(value) = value.as_deref().filter(|value| !value.is_empty()) {
            element.push_attribute((*name, value));
        }
    }
}

fn write_cue(writer: &mut Writer<Vec<u8>>, cue: &Cue) -> Result<(), SerializeError> {
    let begin = format_timestamp(cue.begin.as_ref());
    let end = format_timestamp(cue.end.as_ref());

    let mut paragraph = BytesStart::new("p");
    paragraph.push_attribute(("begin", begin.as_str()));
    paragraph.push_attribute(("end", end.as_str()));
    if !cue.style_ids.is_empty() {
        paragraph.push_attribute(("style", cue.style_ids.join(" ").as_str()));
    }
    if let Some(region) = cue.region_id.as_deref() {
        paragraph.push_attribute(("region", region));
    }

    if cue.content.is_empty() {
        writer.write_event(Event::Empty(paragraph))?;
        return Ok(());
    }

    let inner = cue.content.replace('\n', "<br/>");
    writer.write_event(Event::Start(paragraph))?;
    writer.write_event(Event::Text(BytesText::from_escaped(inner)))?;
    writer.write_event(Event::End(BytesEnd::new("p")))?;
    Ok(())
}
