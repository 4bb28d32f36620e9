//! # JSON <-> SOAP Codec
//!
//! ## Encoding (JSON -> XML)
//!
//! The request body is an object whose keys become the children of `soap:Body`:
//!
//! - objects become elements with one child per key,
//! - arrays become repeated sibling elements,
//! - strings, numbers and booleans become escaped text,
//! - `null` becomes an empty element,
//! - keys starting with `@` become attributes and `$value` becomes text content.
//!
//! ## Decoding (XML -> JSON)
//!
//! Elements are keyed by their local name (prefixes are dropped). Attributes keep their
//! qualified name behind an `@`, so namespace declarations show up as `@xmlns:a`. Repeated
//! siblings turn into arrays, text-only elements into strings, and empty or `nil="true"`
//! elements into `null`. A leaf element whose only attributes are namespace declarations
//! collapses to its text. Text next to attributes or children is kept under `$value`.
use quick_xml::{
    Reader, Writer,
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};
use serde_json::{Map, Value};
use std::fmt::Display;

const SOAP_ENVELOPE_NS: &str = "http://schemas.xmlsoap.org/soap/envelope/";
const ENVELOPE: &str = "Envelope";
const BODY: &str = "Body";
const TEXT_KEY: &str = "$value";

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("XML error: {0}")]
    Xml(String),
    #[error("Malformed SOAP envelope: {0}")]
    MalformedEnvelope(String),
    #[error("Request body must be a JSON object, got '{0}'")]
    InvalidBody(Value),
}

fn xml_error(err: impl Display) -> CodecError {
    CodecError::Xml(err.to_string())
}

/// Serializes `body` into a SOAP 1.1 envelope.
///
/// Each root element of `body` is declared in `namespace`, when given.
pub fn encode_envelope(body: &Value, namespace: Option<&str>) -> Result<String, CodecError> {
    let Value::Object(roots) = body else {
        return Err(CodecError::InvalidBody(body.clone()));
    };

    let mut writer = Writer::new(Vec::new());

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))
        .map_err(xml_error)?;

    let mut envelope = BytesStart::new("soap:Envelope");
    envelope.push_attribute(("xmlns:soap", SOAP_ENVELOPE_NS));
    writer
        .write_event(Event::Start(envelope.borrow()))
        .map_err(xml_error)?;
    writer
        .write_event(Event::Start(BytesStart::new("soap:Body")))
        .map_err(xml_error)?;

    for (name, value) in roots {
        let namespace = namespace.map(|ns| ("xmlns", ns));
        write_element(&mut writer, name, value, namespace)?;
    }

    writer
        .write_event(Event::End(BytesEnd::new("soap:Body")))
        .map_err(xml_error)?;
    writer
        .write_event(Event::End(envelope.to_end()))
        .map_err(xml_error)?;

    String::from_utf8(writer.into_inner()).map_err(xml_error)
}

fn write_element(
    writer: &mut Writer<Vec<u8>>,
    name: &str,
    value: &Value,
    namespace: Option<(&str, &str)>,
) -> Result<(), CodecError> {
    let mut start = BytesStart::new(name);
    if let Some(attribute) = namespace {
        start.push_attribute(attribute);
    }

    match value {
        Value::Array(items) => {
            for item in items {
                write_element(writer, name, item, namespace)?;
            }
        }
        Value::Null => {
            writer.write_event(Event::Empty(start)).map_err(xml_error)?;
        }
        Value::Object(fields) => {
            for (key, field) in fields {
                if let Some(attribute) = key.strip_prefix('@') {
                    start.push_attribute((attribute, scalar_text(field).as_str()));
                }
            }

            writer
                .write_event(Event::Start(start.borrow()))
                .map_err(xml_error)?;

            for (key, field) in fields {
                if key == TEXT_KEY {
                    let text = scalar_text(field);
                    writer
                        .write_event(Event::Text(BytesText::new(&text)))
                        .map_err(xml_error)?;
                } else if !key.starts_with('@') {
                    write_element(writer, key, field, None)?;
                }
            }

            writer
                .write_event(Event::End(start.to_end()))
                .map_err(xml_error)?;
        }
        scalar => {
            let text = scalar_text(scalar);
            writer
                .write_event(Event::Start(start.borrow()))
                .map_err(xml_error)?;
            writer
                .write_event(Event::Text(BytesText::new(&text)))
                .map_err(xml_error)?;
            writer
                .write_event(Event::End(start.to_end()))
                .map_err(xml_error)?;
        }
    }

    Ok(())
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Parses a SOAP envelope and returns the content of its `Body` element.
pub fn decode_envelope(xml: &str) -> Result<Value, CodecError> {
    let mut document = decode_document(xml)?;

    let Some(Value::Object(mut envelope)) = document.remove(ENVELOPE) else {
        return Err(CodecError::MalformedEnvelope(
            "missing Envelope element".to_string(),
        ));
    };

    envelope
        .remove(BODY)
        .ok_or_else(|| CodecError::MalformedEnvelope("missing Body element".to_string()))
}

/// Parses an XML document into a map holding its root element.
pub fn decode_document(xml: &str) -> Result<Map<String, Value>, CodecError> {
    let mut reader = Reader::from_str(xml);
    let mut stack = vec![Element::default()];

    loop {
        match reader.read_event().map_err(xml_error)? {
            Event::Start(start) => stack.push(Element::open(&start)?),
            Event::Empty(start) => {
                let element = Element::open(&start)?;
                close(&mut stack, element)?;
            }
            Event::End(_) => {
                let element = match stack.pop() {
                    Some(element) if !stack.is_empty() => element,
                    _ => {
                        return Err(CodecError::MalformedEnvelope(
                            "unexpected closing tag".to_string(),
                        ));
                    }
                };
                close(&mut stack, element)?;
            }
            Event::Text(text) => {
                let text = text.unescape().map_err(xml_error)?;
                if let Some(element) = stack.last_mut() {
                    element.text.push_str(&text);
                }
            }
            Event::CData(data) => {
                let data = data.into_inner();
                if let Some(element) = stack.last_mut() {
                    element.text.push_str(&String::from_utf8_lossy(&data));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    match stack.pop() {
        Some(root) if stack.is_empty() => Ok(root.children),
        _ => Err(CodecError::MalformedEnvelope(
            "unclosed element at end of document".to_string(),
        )),
    }
}

fn close(stack: &mut [Element], element: Element) -> Result<(), CodecError> {
    let parent = stack
        .last_mut()
        .ok_or_else(|| CodecError::MalformedEnvelope("element outside document".to_string()))?;

    let name = element.name.clone();
    insert_child(&mut parent.children, name, element.into_value());
    Ok(())
}

fn insert_child(children: &mut Map<String, Value>, name: String, value: Value) {
    match children.get_mut(&name) {
        Some(Value::Array(siblings)) => siblings.push(value),
        Some(existing) => {
            let first = existing.take();
            *existing = Value::Array(vec![first, value]);
        }
        None => {
            children.insert(name, value);
        }
    }
}

#[derive(Debug, Default)]
struct Element {
    name: String,
    attributes: Map<String, Value>,
    children: Map<String, Value>,
    text: String,
    nil: bool,
}

impl Element {
    fn open(start: &BytesStart<'_>) -> Result<Self, CodecError> {
        let mut element = Element {
            name: String::from_utf8_lossy(start.local_name().as_ref()).into_owned(),
            ..Element::default()
        };

        for attribute in start.attributes() {
            let attribute = attribute.map_err(xml_error)?;
            let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
            let value = attribute.unescape_value().map_err(xml_error)?.into_owned();

            if attribute.key.local_name().as_ref() == b"nil" && value == "true" {
                element.nil = true;
            }

            element
                .attributes
                .insert(format!("@{key}"), Value::String(value));
        }

        Ok(element)
    }

    fn into_value(self) -> Value {
        if self.nil {
            return Value::Null;
        }

        let text = self.text.trim();
        let only_namespaces = self.attributes.keys().all(|key| is_namespace_declaration(key));

        if self.children.is_empty() && only_namespaces {
            return match text {
                "" => Value::Null,
                text => Value::String(text.to_string()),
            };
        }

        let mut node = self.attributes;
        node.extend(self.children);
        if !text.is_empty() {
            node.insert(TEXT_KEY.to_string(), Value::String(text.to_string()));
        }

        Value::Object(node)
    }
}

fn is_namespace_declaration(key: &str) -> bool {
    key == "@xmlns" || key.starts_with("@xmlns:")
}
