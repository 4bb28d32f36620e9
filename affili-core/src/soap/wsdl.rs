//! # WSDL Introspection
//!
//! Extracts what the dispatcher needs from a WSDL 1.1 document: the operations of the binding
//! used by the first port of the first service, the `soapAction` of each operation, the
//! target namespace and the port address.
//!
//! Only the top-level document is read. WCF services keep their bindings and services in the
//! main document, so imported documents (types, port types) are not followed.
use super::codec::CodecError;
use quick_xml::{
    Reader,
    events::{BytesStart, Event},
};
use std::fmt::Display;

/// The parts of a service description the dispatcher relies on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceDescription {
    pub target_namespace: Option<String>,
    /// The `soap:address` location of the selected port.
    pub address: Option<String>,
    pub operations: Vec<Operation>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    pub name: String,
    pub soap_action: Option<String>,
}

impl ServiceDescription {
    pub fn operation(&self, name: &str) -> Option<&Operation> {
        self.operations.iter().find(|op| op.name == name)
    }
}

#[derive(Debug, Default)]
struct Binding {
    name: String,
    operations: Vec<Operation>,
}

#[derive(Debug, Default)]
struct Port {
    binding: String,
    address: Option<String>,
}

/// Parses a WSDL 1.1 document.
pub fn parse(xml: &str) -> Result<ServiceDescription, CodecError> {
    let mut reader = Reader::from_str(xml);

    let mut path: Vec<String> = Vec::new();
    let mut target_namespace = None;
    let mut bindings: Vec<Binding> = Vec::new();
    let mut ports: Vec<Port> = Vec::new();
    let mut in_first_service = false;
    let mut seen_service = false;

    loop {
        let (start, is_empty) = match reader.read_event().map_err(xml_error)? {
            Event::Start(start) => (start, false),
            Event::Empty(start) => (start, true),
            Event::End(_) => {
                if path.pop().as_deref() == Some("service") && path.len() == 1 {
                    in_first_service = false;
                }
                continue;
            }
            Event::Eof => break,
            _ => continue,
        };

        let name = local_name(&start);

        match (path.len(), name.as_str()) {
            (0, "definitions") => target_namespace = attribute(&start, b"targetNamespace")?,
            (1, "binding") => bindings.push(Binding {
                name: attribute(&start, b"name")?.unwrap_or_default(),
                operations: Vec::new(),
            }),
            (2, "operation") if path[1] == "binding" => {
                if let (Some(binding), Some(op_name)) =
                    (bindings.last_mut(), attribute(&start, b"name")?)
                {
                    binding.operations.push(Operation {
                        name: op_name,
                        soap_action: None,
                    });
                }
            }
            (3, "operation") if path[1] == "binding" && path[2] == "operation" => {
                let soap_action = attribute(&start, b"soapAction")?;
                if let Some(op) = bindings
                    .last_mut()
                    .and_then(|binding| binding.operations.last_mut())
                {
                    op.soap_action = soap_action;
                }
            }
            (1, "service") => {
                in_first_service = !seen_service;
                seen_service = true;
            }
            (2, "port") if in_first_service => ports.push(Port {
                binding: attribute(&start, b"binding")?
                    .map(|qname| unprefixed(&qname).to_string())
                    .unwrap_or_default(),
                address: None,
            }),
            (3, "address") if in_first_service && path[2] == "port" => {
                let location = attribute(&start, b"location")?;
                if let Some(port) = ports.last_mut() {
                    port.address = location;
                }
            }
            _ => {}
        }

        if !is_empty {
            path.push(name);
        }
    }

    let port = ports.into_iter().next();
    let binding_name = port.as_ref().map(|port| port.binding.as_str());

    let operations = binding_name
        .and_then(|name| bindings.iter().position(|binding| binding.name == name))
        .or(if bindings.is_empty() { None } else { Some(0) })
        .map(|index| bindings.swap_remove(index).operations)
        .unwrap_or_default();

    Ok(ServiceDescription {
        target_namespace,
        address: port.and_then(|port| port.address),
        operations,
    })
}

fn xml_error(err: impl Display) -> CodecError {
    CodecError::Xml(err.to_string())
}

fn local_name(start: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(start.local_name().as_ref()).into_owned()
}

fn attribute(start: &BytesStart<'_>, name: &[u8]) -> Result<Option<String>, CodecError> {
    for attribute in start.attributes() {
        let attribute = attribute.map_err(xml_error)?;
        if attribute.key.local_name().as_ref() == name {
            let value = attribute.unescape_value().map_err(xml_error)?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

fn unprefixed(qname: &str) -> &str {
    qname.rsplit_once(':').map_or(qname, |(_, local)| local)
}
