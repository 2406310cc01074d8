/*!
 * Structural check for generated TTML.
 */

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::errors::ValidationError;

/// Check that `xml` is well-formed, has a single `tt` root and contains a
/// `body` element. Attribute values must unescape cleanly and hold no raw `<`.
pub fn validate_ttml(xml: &str) -> Result<(), ValidationError> {
    let mut reader = Reader::from_str(xml);
    let mut depth = 0usize;
    let mut root_seen = false;
    let mut body_seen = false;

    loop {
        let (name, closes) = match reader.read_event()? {
            Event::Start(element) => (check_element(&element)?, false),
            Event::Empty(element) => (check_element(&element)?, true),
            Event::End(_) => {
                depth = depth.saturating_sub(1);
                continue;
            }
            Event::Eof => break,
            _ => continue,
        };

        if depth == 0 {
            if root_seen {
                return Err(ValidationError::MultipleRoots);
            }
            if name != "tt" {
                return Err(ValidationError::WrongRoot { found: name });
            }
            root_seen = true;
        }
        if name == "body" {
            body_seen = true;
        }
        if !closes {
            depth += 1;
        }
    }

    if !root_seen {
        return Err(ValidationError::Empty);
    }
    if depth > 0 {
        return Err(ValidationError::Unbalanced { open: depth });
    }
    if !body_seen {
        return Err(ValidationError::MissingBody);
    }
    Ok(())
}

/// Return the local name of `element` after checking its attributes.
fn check_element(element: &BytesStart) -> Result<String, ValidationError> {
    let name = local_name(element.local_name().as_ref());
    for attr in element.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        if attr.value.contains(&b'<') {
            return Err(ValidationError::InvalidAttribute {
                element: name,
                attribute: local_name(attr.key.as_ref()),
            });
        }
        attr.unescape_value().map_err(quick_xml::Error::from)?;
    }
    Ok(name)
}

fn local_name(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw).into_owned()
}
