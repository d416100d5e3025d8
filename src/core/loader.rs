//! Reads a CI run report into a [`RunRecord`].
//!
//! The report is a single root element carrying the OS identifier in its
//! `name` attribute. Every direct child of the root becomes one field: the
//! tag is the field name, the text before any nested element is the value,
//! and the element's attributes are kept alongside it.

use crate::domain::model::{Field, FieldValue, RunRecord};
use crate::utils::error::{EtlError, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use std::borrow::Cow;
use std::collections::BTreeMap;

pub const OS_ATTRIBUTE: &str = "name";

struct PendingField {
    name: String,
    attributes: BTreeMap<String, String>,
    text: Option<String>,
    nested: bool,
}

impl PendingField {
    fn push_text(&mut self, text: &str) {
        if self.nested || text.is_empty() {
            return;
        }
        self.text.get_or_insert_with(String::new).push_str(text);
    }

    fn finish(self) -> Field {
        Field {
            name: self.name,
            value: self.text.map(FieldValue::Text).unwrap_or(FieldValue::Empty),
            attributes: self.attributes,
        }
    }
}

pub fn parse_report_bytes(data: &[u8]) -> Result<RunRecord> {
    let xml = std::str::from_utf8(data).map_err(|e| EtlError::MalformedDocument {
        message: format!("report is not valid UTF-8: {}", e),
    })?;
    parse_report(xml)
}

/// XML end-of-line handling: `\r\n` and a lone `\r` both read as `\n`.
/// Character references such as `&#13;` still produce `\r`.
pub fn normalize_line_endings(xml: &str) -> Cow<'_, str> {
    if xml.contains('\r') {
        Cow::Owned(xml.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(xml)
    }
}

pub fn parse_report(xml: &str) -> Result<RunRecord> {
    let xml = normalize_line_endings(xml);
    let mut reader = Reader::from_str(&xml);
    let mut record: Option<RunRecord> = None;
    let mut current: Option<PendingField> = None;
    let mut depth = 0usize;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                match depth {
                    0 => record = Some(open_root(&reader, &e, record.is_some())?),
                    1 => current = Some(open_field(&reader, &e)?),
                    _ => mark_nested(&mut current),
                }
                depth += 1;
            }
            Event::Empty(e) => match depth {
                0 => record = Some(open_root(&reader, &e, record.is_some())?),
                1 => record = add_field(record, open_field(&reader, &e)?.finish()),
                _ => mark_nested(&mut current),
            },
            Event::Text(e) => {
                if depth == 0 && !e.iter().all(u8::is_ascii_whitespace) {
                    return Err(EtlError::MalformedDocument {
                        message: "text outside the root element".to_string(),
                    });
                }
                if depth == 2 {
                    if let Some(field) = current.as_mut() {
                        field.push_text(&e.unescape()?);
                    }
                }
            }
            Event::CData(e) => {
                if depth == 2 {
                    let raw = e.into_inner();
                    let text = reader.decoder().decode(&raw)?;
                    if let Some(field) = current.as_mut() {
                        field.push_text(&text);
                    }
                }
            }
            Event::End(_) => {
                if depth == 2 {
                    if let Some(field) = current.take() {
                        record = add_field(record, field.finish());
                    }
                }
                depth = depth.saturating_sub(1);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if depth != 0 {
        return Err(EtlError::MalformedDocument {
            message: "unexpected end of document, root element is not closed".to_string(),
        });
    }

    record.ok_or_else(|| EtlError::MalformedDocument {
        message: "document has no root element".to_string(),
    })
}

fn open_root(reader: &Reader<&[u8]>, e: &BytesStart<'_>, seen_root: bool) -> Result<RunRecord> {
    if seen_root {
        return Err(EtlError::MalformedDocument {
            message: "document has more than one root element".to_string(),
        });
    }

    let attributes = read_attributes(reader, e)?;
    let os = attributes
        .get(OS_ATTRIBUTE)
        .ok_or_else(|| EtlError::MissingRootAttribute {
            attribute: OS_ATTRIBUTE.to_string(),
        })?;

    tracing::debug!("Report root declares OS '{}'", os);
    Ok(RunRecord::new(os))
}

fn open_field(reader: &Reader<&[u8]>, e: &BytesStart<'_>) -> Result<PendingField> {
    let name = reader.decoder().decode(e.name().as_ref())?.into_owned();
    let attributes = read_attributes(reader, e)?;

    Ok(PendingField {
        name,
        attributes,
        text: None,
        nested: false,
    })
}

fn read_attributes(reader: &Reader<&[u8]>, e: &BytesStart<'_>) -> Result<BTreeMap<String, String>> {
    let mut attributes = BTreeMap::new();
    for attr in e.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        let key = reader.decoder().decode(attr.key.as_ref())?.into_owned();
        let value = attr.unescape_value()?.into_owned();
        attributes.insert(key, value);
    }
    Ok(attributes)
}

// only the text ahead of the first nested element belongs to the field
fn mark_nested(current: &mut Option<PendingField>) {
    if let Some(field) = current.as_mut() {
        field.nested = true;
    }
}

fn add_field(record: Option<RunRecord>, field: Field) -> Option<RunRecord> {
    tracing::debug!("Read field '{}'", field.name);
    record.map(|r| r.with_field(field))
}
