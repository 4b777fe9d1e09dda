//! Parsing of submission payloads and OpenRosa responses.

use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesRef, Event};
use quick_xml::Reader;

use super::error::UploadError;

/// Extracts the text of the first `<message>` element of an OpenRosa
/// response body. Returns `None` for bodies without one.
pub fn parse_openrosa_message(body: &str) -> Option<String> {
    let mut reader = Reader::from_str(body);

    let mut in_message = false;
    let mut message = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) if e.local_name().as_ref() == b"message" => {
                in_message = true;
            }
            Ok(Event::End(ref e)) if e.local_name().as_ref() == b"message" => break,
            Ok(Event::Text(e)) if in_message => {
                if let Ok(text) = e.decode() {
                    message.push_str(&text);
                }
            }
            Ok(Event::GeneralRef(e)) if in_message => {
                if let Ok(text) = resolve_reference(&e) {
                    message.push_str(&text);
                }
            }
            Ok(Event::Eof) | Err(_) => break,
            _ => {}
        }
    }

    let message = message.trim();
    if message.is_empty() {
        None
    } else {
        Some(message.to_string())
    }
}

/// Flattens an instance document into `(field, value)` pairs, one per leaf
/// element, in document order. The root element is not a field.
pub fn leaf_values(xml: &str) -> Result<Vec<(String, String)>, UploadError> {
    let mut reader = Reader::from_str(xml);

    // (name, collected text, has child elements)
    let mut stack: Vec<(String, String, bool)> = Vec::new();
    let mut fields = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                if let Some(parent) = stack.last_mut() {
                    parent.2 = true;
                }
                let name = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
                stack.push((name, String::new(), false));
            }
            Ok(Event::Empty(ref e)) => {
                if let Some(parent) = stack.last_mut() {
                    parent.2 = true;
                }
                if !stack.is_empty() {
                    let name = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
                    fields.push((name, String::new()));
                }
            }
            Ok(Event::Text(e)) => {
                if let Some(current) = stack.last_mut() {
                    let text = e
                        .decode()
                        .map_err(|err| UploadError::ParsePayload(err.to_string()))?;
                    current.1.push_str(&text);
                }
            }
            Ok(Event::GeneralRef(e)) => {
                if let Some(current) = stack.last_mut() {
                    let text = resolve_reference(&e).map_err(UploadError::ParsePayload)?;
                    current.1.push_str(&text);
                }
            }
            Ok(Event::End(_)) => {
                if let Some((name, text, has_children)) = stack.pop() {
                    if !has_children && !stack.is_empty() {
                        fields.push((name, text.trim().to_string()));
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(UploadError::ParsePayload(e.to_string())),
            _ => {}
        }
    }

    Ok(fields)
}

/// Expands `&name;` or `&#N;` into its text. Unknown named entities are
/// kept as written.
fn resolve_reference(reference: &BytesRef<'_>) -> Result<String, String> {
    let name = reference.decode().map_err(|e| e.to_string())?;

    if let Some(number) = name.strip_prefix('#') {
        let code = match number.strip_prefix('x').or_else(|| number.strip_prefix('X')) {
            Some(hex) => u32::from_str_radix(hex, 16),
            None => number.parse::<u32>(),
        }
        .map_err(|e| format!("invalid character reference '&{};': {}", name, e))?;
        return char::from_u32(code)
            .map(String::from)
            .ok_or_else(|| format!("invalid character reference '&{};'", name));
    }

    Ok(match resolve_predefined_entity(&name) {
        Some(text) => text.to_string(),
        None => format!("&{};", name),
    })
}
