use super::{AttributeHook, Code};
use crate::attributes::{Attribute, StandardAttribute, VENDOR_SPECIFIC};
use crate::auth::{generate_request_authenticator, AuthenticatorFields, AuthenticatorRole};
use crate::dictionary::Dictionary;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PacketError {
    #[error("Malformed packet: {0}")]
    Malformed(String),
    #[error("Invalid packet code: {0}")]
    InvalidCode(u8),
    #[error("{0} authenticator mismatch")]
    AuthenticatorMismatch(&'static str),
    #[error("Multiple {0} attributes where at most one is allowed")]
    MultipleAttributes(String),
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("Attribute error: {0}")]
    AttributeError(String),
    #[error("Packet too large: {0} bytes")]
    PacketTooLarge(usize),
    #[error("No such attribute type: {0}")]
    NoSuchAttribute(String),
}

/// RADIUS Packet structure as defined in RFC 2865 Section 3
///
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |     Code      |  Identifier   |            Length             |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                                                               |
/// |                         Authenticator                         |
/// |                                                               |
/// |                                                               |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |  Attributes ...
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
///
/// Vendor sub-attributes are never stored at top level: [`Packet::add_attribute`]
/// wraps them in a Vendor-Specific container for their vendor.
#[derive(Clone)]
pub struct Packet {
    /// Packet type (1 byte)
    pub code: Code,
    /// Packet identifier for matching requests/responses (1 byte)
    pub identifier: u8,
    /// Set once, by encoding or by the wire parser
    pub(crate) authenticator: Option<[u8; 16]>,
    pub(crate) attributes: Vec<Attribute>,
    pub(crate) dictionary: Arc<dyn Dictionary>,
    pub(crate) role: AuthenticatorRole,
    pub(crate) hook: Option<Arc<dyn AttributeHook>>,
}

impl Packet {
    /// Minimum RADIUS packet size (20 bytes: 1 code + 1 id + 2 length + 16 authenticator)
    pub const MIN_PACKET_SIZE: usize = 20;
    /// Maximum RADIUS packet size (4096 bytes as per RFC 2865)
    pub const MAX_PACKET_SIZE: usize = 4096;

    /// New packet without attributes; the authenticator role follows from `code`
    pub fn new(code: Code, identifier: u8, dictionary: Arc<dyn Dictionary>) -> Self {
        Packet {
            code,
            identifier,
            authenticator: None,
            attributes: Vec::new(),
            dictionary,
            role: AuthenticatorRole::for_request(code),
            hook: None,
        }
    }

    /// New answer to `request`, carrying its identifier and dictionary
    pub fn response_to(request: &Packet, code: Code) -> Self {
        Packet {
            role: AuthenticatorRole::ResponseProof,
            ..Packet::new(code, request.identifier, Arc::clone(&request.dictionary))
        }
    }

    /// Install an attribute hook run when encoding this packet as a request
    pub fn with_hook(mut self, hook: Arc<dyn AttributeHook>) -> Self {
        self.hook = Some(hook);
        self
    }

    pub fn authenticator(&self) -> Option<[u8; 16]> {
        self.authenticator
    }

    /// Forget the authenticator so the next request encode draws a new seed
    pub fn reset_authenticator(&mut self) {
        self.authenticator = None;
    }

    pub fn role(&self) -> AuthenticatorRole {
        self.role
    }

    pub fn dictionary(&self) -> &Arc<dyn Dictionary> {
        &self.dictionary
    }

    /// Top-level attributes in wire order
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Add an attribute
    ///
    /// A vendor sub-attribute goes into the first Vendor-Specific container
    /// for its vendor with room left, or into a new container appended to the
    /// packet.
    pub fn add_attribute(&mut self, mut attribute: Attribute) -> Result<(), PacketError> {
        attribute.set_dictionary(Some(Arc::clone(&self.dictionary)));

        let Some(vendor_id) = attribute.vendor_id() else {
            self.attributes.push(attribute);
            return Ok(());
        };

        let needed = attribute.encoded_length();
        if let Some(container) = self.attributes.iter_mut().find(|a| {
            a.child_vendor_id() == Some(vendor_id) && a.encoded_length() + needed <= Attribute::MAX_LENGTH
        }) {
            return container.add_child(attribute);
        }

        let mut container = Attribute::vendor_specific(vendor_id);
        container.set_dictionary(Some(Arc::clone(&self.dictionary)));
        container.add_child(attribute)?;
        self.attributes.push(container);
        Ok(())
    }

    /// Add an attribute by dictionary name, setting its value from text
    pub fn add_attribute_str(&mut self, name: &str, value: &str) -> Result<(), PacketError> {
        if value.is_empty() {
            return Err(PacketError::Configuration(format!(
                "empty value for attribute '{}'",
                name
            )));
        }
        let (vendor_id, type_code) = self
            .dictionary
            .lookup_by_name(name)
            .map(|t| (t.vendor_id(), t.type_code()))
            .ok_or_else(|| PacketError::Configuration(format!("unknown attribute type '{}'", name)))?;

        let mut attribute = Attribute::create(Some(&self.dictionary), vendor_id, type_code);
        attribute.set_value_str(value)?;
        self.add_attribute(attribute)
    }

    /// Remove one attribute; an emptied Vendor-Specific container goes with it
    pub fn remove_attribute(&mut self, attribute: &Attribute) -> bool {
        let Some(vendor_id) = attribute.vendor_id() else {
            return match self.attributes.iter().position(|a| a == attribute) {
                Some(index) => {
                    self.attributes.remove(index);
                    true
                }
                None => false,
            };
        };

        for index in 0..self.attributes.len() {
            let container = &mut self.attributes[index];
            if container.child_vendor_id() != Some(vendor_id) {
                continue;
            }
            if container.remove_child(attribute) {
                if container.children().is_empty() {
                    self.attributes.remove(index);
                }
                return true;
            }
        }
        false
    }

    /// Remove every top-level attribute of a type
    pub fn remove_attributes(&mut self, attr_type: u8) {
        self.attributes.retain(|a| a.attr_type() != attr_type);
    }

    /// Remove every sub-attribute of a vendor and type, dropping emptied containers
    pub fn remove_vendor_attributes(&mut self, vendor_id: u32, attr_type: u8) {
        for container in self.attributes.iter_mut() {
            if container.child_vendor_id() != Some(vendor_id) {
                continue;
            }
            if let Some(children) = container.children_mut() {
                children.retain(|c| c.attr_type() != attr_type);
            }
        }
        self.attributes
            .retain(|a| !(a.child_vendor_id() == Some(vendor_id) && a.children().is_empty()));
    }

    /// Remove the last top-level attribute of a type
    pub fn remove_last_attribute(&mut self, attr_type: u8) -> Option<Attribute> {
        let index = self.attributes.iter().rposition(|a| a.attr_type() == attr_type)?;
        Some(self.attributes.remove(index))
    }

    /// Find all top-level attributes by type
    pub fn find_all_attributes(&self, attr_type: u8) -> Vec<&Attribute> {
        self.attributes
            .iter()
            .filter(|a| a.attr_type() == attr_type)
            .collect()
    }

    /// Find all sub-attributes of a vendor and type, across containers
    pub fn find_all_vendor_attributes(&self, vendor_id: u32, attr_type: u8) -> Vec<&Attribute> {
        self.vendor_attributes(vendor_id)
            .into_iter()
            .flat_map(Attribute::children)
            .filter(|c| c.attr_type() == attr_type)
            .collect()
    }

    /// Vendor-Specific containers of a vendor
    pub fn vendor_attributes(&self, vendor_id: u32) -> Vec<&Attribute> {
        self.attributes
            .iter()
            .filter(|a| a.child_vendor_id() == Some(vendor_id))
            .collect()
    }

    /// Find the single top-level attribute of a type
    pub fn find_attribute(&self, attr_type: u8) -> Result<Option<&Attribute>, PacketError> {
        at_most_one(self.find_all_attributes(attr_type), || {
            StandardAttribute::from_u8(attr_type)
                .map(|a| a.name().to_string())
                .unwrap_or_else(|| attr_type.to_string())
        })
    }

    /// Find the single sub-attribute of a vendor and type
    pub fn find_vendor_attribute(
        &self,
        vendor_id: u32,
        attr_type: u8,
    ) -> Result<Option<&Attribute>, PacketError> {
        at_most_one(self.find_all_vendor_attributes(vendor_id, attr_type), || {
            format!("vendor {} type {}", vendor_id, attr_type)
        })
    }

    /// Find the single attribute with a dictionary name
    pub fn attribute_by_name(&self, name: &str) -> Result<Option<&Attribute>, PacketError> {
        let (vendor_id, type_code) = self
            .dictionary
            .lookup_by_name(name)
            .map(|t| (t.vendor_id(), t.type_code()))
            .ok_or_else(|| PacketError::NoSuchAttribute(name.to_string()))?;

        match vendor_id {
            Some(vendor_id) => self.find_vendor_attribute(vendor_id, type_code),
            None => self.find_attribute(type_code),
        }
    }

    /// Text value of the single attribute with a dictionary name
    pub fn attribute_value(&self, name: &str) -> Result<Option<String>, PacketError> {
        Ok(self.attribute_by_name(name)?.map(Attribute::value_string))
    }

    /// Encode as a request
    ///
    /// The request authenticator is generated on first encode and reused
    /// afterwards, so repeated encodes of one packet produce the same
    /// datagram. Update-style requests (Accounting, CoA, Disconnect) replace
    /// it with the digest over the serialized packet.
    pub fn encode_request(&mut self, secret: &[u8]) -> Result<Vec<u8>, PacketError> {
        check_secret(secret)?;

        let seed = match self.authenticator {
            Some(existing) if self.role == AuthenticatorRole::RequestSeed => existing,
            _ => generate_request_authenticator(secret),
        };

        let attributes: Cow<'_, [Attribute]> = match &self.hook {
            Some(hook) => {
                let mut copy = self.attributes.clone();
                hook.encode_request_attributes(&mut copy, secret, &seed)?;
                Cow::Owned(copy)
            }
            None => Cow::Borrowed(&self.attributes),
        };

        let body = encode_attributes(&attributes)?;
        let length = frame_length(body.len())?;
        let fields = AuthenticatorFields {
            code: self.code.as_u8(),
            identifier: self.identifier,
            length,
            attributes: &body,
            secret,
        };
        let authenticator = self.role.authenticator(&fields, &seed);
        self.authenticator = Some(authenticator);

        Ok(write_frame(&fields, &authenticator))
    }

    /// Encode as the response to `request`
    pub fn encode_response(&mut self, secret: &[u8], request: &Packet) -> Result<Vec<u8>, PacketError> {
        check_secret(secret)?;
        let request_authenticator = request.authenticator.ok_or_else(|| {
            PacketError::Configuration("request authenticator not set".to_string())
        })?;

        let body = encode_attributes(&self.attributes)?;
        let length = frame_length(body.len())?;
        let fields = AuthenticatorFields {
            code: self.code.as_u8(),
            identifier: self.identifier,
            length,
            attributes: &body,
            secret,
        };
        let authenticator = AuthenticatorRole::ResponseProof.authenticator(&fields, &request_authenticator);
        self.authenticator = Some(authenticator);

        Ok(write_frame(&fields, &authenticator))
    }
}

/// Copy every Proxy-State attribute of `request` into `answer` (RFC 2865 Section 5.33)
pub fn copy_proxy_state(request: &Packet, answer: &mut Packet) -> Result<(), PacketError> {
    for proxy_state in request.find_all_attributes(StandardAttribute::ProxyState.as_u8()) {
        answer.add_attribute(proxy_state.clone())?;
    }
    Ok(())
}

fn at_most_one<'a>(
    mut matches: Vec<&'a Attribute>,
    describe: impl FnOnce() -> String,
) -> Result<Option<&'a Attribute>, PacketError> {
    if matches.len() > 1 {
        return Err(PacketError::MultipleAttributes(describe()));
    }
    Ok(matches.pop())
}

pub(crate) fn check_secret(secret: &[u8]) -> Result<(), PacketError> {
    if secret.is_empty() {
        return Err(PacketError::Configuration(
            "shared secret must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn encode_attributes(attributes: &[Attribute]) -> Result<Vec<u8>, PacketError> {
    let mut body = Vec::new();
    for attr in attributes {
        body.extend_from_slice(&attr.encode()?);
    }
    Ok(body)
}

fn frame_length(body_length: usize) -> Result<u16, PacketError> {
    let total_length = Packet::MIN_PACKET_SIZE + body_length;
    if total_length > Packet::MAX_PACKET_SIZE {
        return Err(PacketError::PacketTooLarge(total_length));
    }
    Ok(total_length as u16)
}

fn write_frame(fields: &AuthenticatorFields<'_>, authenticator: &[u8; 16]) -> Vec<u8> {
    let mut buffer = Vec::with_capacity(fields.length as usize);
    buffer.push(fields.code);
    buffer.push(fields.identifier);
    buffer.extend_from_slice(&fields.length.to_be_bytes());
    buffer.extend_from_slice(authenticator);
    buffer.extend_from_slice(fields.attributes);
    buffer
}

/// Check that the attribute lengths tile the body exactly
pub(crate) fn validate_attribute_region(body: &[u8]) -> Result<(), PacketError> {
    let mut pos = 0;
    while pos < body.len() {
        if pos + 1 >= body.len() {
            return Err(PacketError::Malformed(
                "attribute header truncated".to_string(),
            ));
        }
        let length = body[pos + 1] as usize;
        if length < Attribute::MIN_LENGTH {
            return Err(PacketError::Malformed(format!(
                "invalid attribute length {} at offset {}",
                length,
                Packet::MIN_PACKET_SIZE + pos
            )));
        }
        pos += length;
    }
    if pos != body.len() {
        return Err(PacketError::Malformed(format!(
            "attributes overrun packet body by {} bytes",
            pos - body.len()
        )));
    }
    Ok(())
}

impl fmt::Debug for Packet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Packet")
            .field("code", &self.code)
            .field("identifier", &self.identifier)
            .field("authenticator", &self.authenticator)
            .field("attributes", &self.attributes)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Packet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, ID {}", self.code, self.identifier)?;
        for attribute in &self.attributes {
            write!(f, "\n{}", attribute)?;
        }
        Ok(())
    }
}
