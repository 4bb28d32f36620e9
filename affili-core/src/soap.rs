//! # SOAP Transport
//!
//! This module contains the building blocks that carry dispatcher envelopes over SOAP 1.1.
//!
//! The dispatcher only deals with `serde_json::Value` trees. The components here translate
//! those trees to XML on the way out and back to trees on the way in, and read the endpoint's
//! WSDL to learn which operations exist and which `SOAPAction` each one expects.
pub mod client;
pub mod codec;
pub mod wsdl;
