use crate::dictionary::{AttributeType, DataKind, Dictionary};
use crate::packet::PacketError;
use std::fmt;
use std::sync::Arc;

/// Type code of the Vendor-Specific container attribute (RFC 2865 Section 5.26)
pub const VENDOR_SPECIFIC: u8 = 26;

/// Concrete value variant of an attribute
///
/// The variant is chosen once, by [`Attribute::create`], from the data kind
/// the dictionary declares for the attribute's `(vendor, type)` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeValue {
    /// Raw bytes; used for unknown attributes and binary/address types
    Octets(Vec<u8>),
    /// 32-bit unsigned integer (exactly 4 bytes on the wire)
    Integer(u32),
    /// UTF-8 text, kept byte-for-byte as received
    String(Vec<u8>),
    /// Vendor-Specific container holding vendor sub-attributes
    VendorSpecific {
        vendor_id: u32,
        children: Vec<Attribute>,
    },
}

/// RADIUS Attribute structure as defined in RFC 2865 Section 5
///
/// ```text
///  0                   1                   2
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |     Type      |    Length     |  Value ...
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
///
/// A Vendor-Specific attribute carries a 4 byte vendor id followed by
/// sub-attributes in the same layout:
///
/// ```text
/// | Type=26 | Length | Vendor-Id (4) | Sub-Type | Sub-Length | Value ... |
/// ```
#[derive(Clone)]
pub struct Attribute {
    /// Vendor id for vendor sub-attributes, `None` for standard attributes
    vendor_id: Option<u32>,
    /// Attribute type (1 byte)
    attr_type: u8,
    value: AttributeValue,
    /// Used only to render names and integer enumerations
    dictionary: Option<Arc<dyn Dictionary>>,
}

impl Attribute {
    /// Minimum attribute length (type + length fields = 2 bytes)
    pub const MIN_LENGTH: usize = 2;
    /// Maximum attribute length (255 bytes including type and length)
    pub const MAX_LENGTH: usize = 255;
    /// Maximum value length (253 bytes)
    pub const MAX_VALUE_LENGTH: usize = 253;
    /// Type + length + vendor id of a Vendor-Specific attribute
    pub const VENDOR_HEADER_LENGTH: usize = 6;

    /// Build an empty attribute of the variant the dictionary declares for
    /// `(vendor_id, attr_type)`.
    ///
    /// Unknown attributes become raw octets. Standard type 26 is always a
    /// Vendor-Specific container.
    pub fn create(
        dictionary: Option<&Arc<dyn Dictionary>>,
        vendor_id: Option<u32>,
        attr_type: u8,
    ) -> Self {
        let value = if vendor_id.is_none() && attr_type == VENDOR_SPECIFIC {
            AttributeValue::VendorSpecific {
                vendor_id: 0,
                children: Vec::new(),
            }
        } else {
            let kind = dictionary
                .and_then(|d| d.lookup_by_code(vendor_id, attr_type))
                .map(AttributeType::kind);
            match kind {
                Some(DataKind::Integer) => AttributeValue::Integer(0),
                Some(DataKind::String) => AttributeValue::String(Vec::new()),
                _ => AttributeValue::Octets(Vec::new()),
            }
        };

        Attribute {
            vendor_id,
            attr_type,
            value,
            dictionary: dictionary.cloned(),
        }
    }

    /// Create a raw octets attribute
    pub fn new(attr_type: u8, value: Vec<u8>) -> Result<Self, PacketError> {
        check_value_length(value.len())?;
        Ok(Attribute {
            vendor_id: None,
            attr_type,
            value: AttributeValue::Octets(value),
            dictionary: None,
        })
    }

    /// Create a string attribute
    pub fn string(attr_type: u8, value: impl Into<String>) -> Result<Self, PacketError> {
        let bytes = value.into().into_bytes();
        check_value_length(bytes.len())?;
        Ok(Attribute {
            vendor_id: None,
            attr_type,
            value: AttributeValue::String(bytes),
            dictionary: None,
        })
    }

    /// Create an integer attribute (32-bit big-endian)
    pub fn integer(attr_type: u8, value: u32) -> Result<Self, PacketError> {
        Ok(Attribute {
            vendor_id: None,
            attr_type,
            value: AttributeValue::Integer(value),
            dictionary: None,
        })
    }

    /// Create an empty Vendor-Specific container for `vendor_id`
    pub fn vendor_specific(vendor_id: u32) -> Self {
        Attribute {
            vendor_id: None,
            attr_type: VENDOR_SPECIFIC,
            value: AttributeValue::VendorSpecific {
                vendor_id,
                children: Vec::new(),
            },
            dictionary: None,
        }
    }

    /// Scope this attribute to a vendor, turning it into a vendor sub-attribute
    pub fn for_vendor(mut self, vendor_id: u32) -> Result<Self, PacketError> {
        if self.is_vendor_specific() {
            return Err(PacketError::AttributeError(
                "Vendor-Specific attributes cannot be nested".to_string(),
            ));
        }
        self.vendor_id = Some(vendor_id);
        Ok(self)
    }

    pub fn vendor_id(&self) -> Option<u32> {
        self.vendor_id
    }

    pub fn attr_type(&self) -> u8 {
        self.attr_type
    }

    pub fn value(&self) -> &AttributeValue {
        &self.value
    }

    pub fn is_vendor_specific(&self) -> bool {
        matches!(self.value, AttributeValue::VendorSpecific { .. })
    }

    pub fn dictionary(&self) -> Option<&Arc<dyn Dictionary>> {
        self.dictionary.as_ref()
    }

    /// Rebind the dictionary back-reference, including on sub-attributes
    pub fn set_dictionary(&mut self, dictionary: Option<Arc<dyn Dictionary>>) {
        if let AttributeValue::VendorSpecific { children, .. } = &mut self.value {
            for child in children.iter_mut() {
                child.set_dictionary(dictionary.clone());
            }
        }
        self.dictionary = dictionary;
    }

    /// Dictionary metadata for this attribute, if known
    pub fn attribute_type_info(&self) -> Option<&AttributeType> {
        self.dictionary
            .as_deref()?
            .lookup_by_code(self.vendor_id, self.attr_type)
    }

    /// Human-readable attribute name
    pub fn name(&self) -> String {
        if self.is_vendor_specific() {
            return "Vendor-Specific".to_string();
        }
        match (self.attribute_type_info(), self.vendor_id) {
            (Some(t), _) => t.name().to_string(),
            (None, Some(_)) => format!("Unknown-Sub-Attribute-{}", self.attr_type),
            (None, None) => format!("Unknown-Attribute-{}", self.attr_type),
        }
    }

    /// Value bytes as they appear after the type and length fields
    pub fn payload(&self) -> Result<Vec<u8>, PacketError> {
        match &self.value {
            AttributeValue::Octets(data) | AttributeValue::String(data) => Ok(data.clone()),
            AttributeValue::Integer(value) => Ok(value.to_be_bytes().to_vec()),
            AttributeValue::VendorSpecific {
                vendor_id,
                children,
            } => {
                let mut buffer = vendor_id.to_be_bytes().to_vec();
                for child in children {
                    buffer.extend_from_slice(&child.encode()?);
                }
                Ok(buffer)
            }
        }
    }

    /// Replace the value bytes
    pub fn set_data(&mut self, data: Vec<u8>) -> Result<(), PacketError> {
        check_value_length(data.len())?;
        match &mut self.value {
            AttributeValue::Octets(current) | AttributeValue::String(current) => {
                *current = data;
                Ok(())
            }
            AttributeValue::Integer(current) => {
                let bytes: [u8; 4] = data.as_slice().try_into().map_err(|_| {
                    PacketError::AttributeError(format!(
                        "Expected 4 bytes for integer, got {}",
                        data.len()
                    ))
                })?;
                *current = u32::from_be_bytes(bytes);
                Ok(())
            }
            AttributeValue::VendorSpecific { .. } => Err(PacketError::AttributeError(
                "Vendor-Specific data is built from its sub-attributes".to_string(),
            )),
        }
    }

    /// Get the encoded length of this attribute
    pub fn encoded_length(&self) -> usize {
        Self::MIN_LENGTH
            + match &self.value {
                AttributeValue::Octets(data) | AttributeValue::String(data) => data.len(),
                AttributeValue::Integer(_) => 4,
                AttributeValue::VendorSpecific { children, .. } => {
                    4 + children.iter().map(Attribute::encoded_length).sum::<usize>()
                }
            }
    }

    /// Encode attribute to bytes
    pub fn encode(&self) -> Result<Vec<u8>, PacketError> {
        let length = self.encoded_length();
        if length > Self::MAX_LENGTH {
            return Err(PacketError::AttributeError(format!(
                "Encoded attribute too long: {} bytes",
                length
            )));
        }

        let mut buffer = Vec::with_capacity(length);
        buffer.push(self.attr_type);
        buffer.push(length as u8);
        buffer.extend_from_slice(&self.payload()?);

        Ok(buffer)
    }

    /// Read this attribute from `data[offset..offset + length]`
    ///
    /// Fixed-width variants require their exact width; a Vendor-Specific
    /// container parses its sub-attributes, which must fill the payload
    /// exactly.
    pub fn read_from(
        &mut self,
        data: &[u8],
        offset: usize,
        length: usize,
    ) -> Result<(), PacketError> {
        if length < Self::MIN_LENGTH {
            return Err(PacketError::Malformed(format!(
                "invalid attribute length: {}",
                length
            )));
        }
        let end = offset
            .checked_add(length)
            .filter(|end| *end <= data.len())
            .ok_or_else(|| {
                PacketError::Malformed(format!(
                    "insufficient data for attribute: expected {} bytes",
                    length
                ))
            })?;
        let raw = &data[offset..end];
        if raw[1] as usize != length {
            return Err(PacketError::Malformed(format!(
                "attribute length field {} does not match {}",
                raw[1], length
            )));
        }

        self.attr_type = raw[0];
        let payload = &raw[Self::MIN_LENGTH..];

        match &mut self.value {
            AttributeValue::Octets(current) | AttributeValue::String(current) => {
                *current = payload.to_vec();
            }
            AttributeValue::Integer(current) => {
                if length != 6 {
                    return Err(PacketError::Malformed(
                        "integer attribute: expected 4 bytes data".to_string(),
                    ));
                }
                *current = u32::from_be_bytes([payload[0], payload[1], payload[2], payload[3]]);
            }
            AttributeValue::VendorSpecific {
                vendor_id,
                children,
            } => {
                if length < Self::VENDOR_HEADER_LENGTH {
                    return Err(PacketError::Malformed(
                        "Vendor-Specific attribute too short".to_string(),
                    ));
                }
                let vid = u32::from_be_bytes([payload[0], payload[1], payload[2], payload[3]]);

                let mut parsed = Vec::new();
                let mut pos = 4;
                while pos < payload.len() {
                    if pos + 1 >= payload.len() {
                        return Err(PacketError::Malformed(
                            "Vendor-Specific sub-attribute length mismatch".to_string(),
                        ));
                    }
                    let sub_type = payload[pos];
                    let sub_length = payload[pos + 1] as usize;
                    let mut child = Attribute::create(self.dictionary.as_ref(), Some(vid), sub_type);
                    child.read_from(payload, pos, sub_length)?;
                    parsed.push(child);
                    pos += sub_length;
                }

                *vendor_id = vid;
                *children = parsed;
            }
        }

        Ok(())
    }

    /// Integer value, for integer attributes
    pub fn int_value(&self) -> Option<u32> {
        match self.value {
            AttributeValue::Integer(value) => Some(value),
            _ => None,
        }
    }

    /// Render the value as text
    ///
    /// Integers resolve to their enumeration name when the dictionary
    /// declares one and otherwise print as unsigned decimal; octets print as
    /// `0x`-prefixed hex.
    pub fn value_string(&self) -> String {
        match &self.value {
            AttributeValue::Integer(value) => self
                .attribute_type_info()
                .and_then(|t| t.enum_name(*value))
                .map(str::to_string)
                .unwrap_or_else(|| value.to_string()),
            AttributeValue::String(data) => String::from_utf8_lossy(data).into_owned(),
            AttributeValue::Octets(data) => format!("0x{}", to_hex(data)),
            AttributeValue::VendorSpecific { children, .. } => children
                .iter()
                .map(|child| child.to_string())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }

    /// Set the value from text
    ///
    /// Integers accept an enumeration name or a decimal number; the number is
    /// parsed as a signed 64-bit value and truncated to 32 bits so the full
    /// unsigned range is accepted. Octets accept `0x`-prefixed hex.
    pub fn set_value_str(&mut self, value: &str) -> Result<(), PacketError> {
        let enum_value = self
            .attribute_type_info()
            .and_then(|t| t.enum_value(value));

        match &mut self.value {
            AttributeValue::Integer(current) => {
                *current = match enum_value {
                    Some(v) => v,
                    None => value.trim().parse::<i64>().map_err(|_| {
                        PacketError::Configuration(format!("invalid integer value '{}'", value))
                    })? as u32,
                };
            }
            AttributeValue::String(current) => {
                check_value_length(value.len())?;
                *current = value.as_bytes().to_vec();
            }
            AttributeValue::Octets(current) => {
                let bytes = parse_hex(value).ok_or_else(|| {
                    PacketError::Configuration(format!(
                        "attribute {} expects 0x-prefixed hex, got '{}'",
                        self.attr_type, value
                    ))
                })?;
                check_value_length(bytes.len())?;
                *current = bytes;
            }
            AttributeValue::VendorSpecific { .. } => {
                return Err(PacketError::Configuration(
                    "cannot set a Vendor-Specific attribute from text".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Vendor id of the sub-attributes, for Vendor-Specific containers
    pub fn child_vendor_id(&self) -> Option<u32> {
        match self.value {
            AttributeValue::VendorSpecific { vendor_id, .. } => Some(vendor_id),
            _ => None,
        }
    }

    /// Sub-attributes of a Vendor-Specific container (empty otherwise)
    pub fn children(&self) -> &[Attribute] {
        match &self.value {
            AttributeValue::VendorSpecific { children, .. } => children,
            _ => &[],
        }
    }

    /// Append a sub-attribute to a Vendor-Specific container
    pub fn add_child(&mut self, mut child: Attribute) -> Result<(), PacketError> {
        let projected = self.encoded_length() + child.encoded_length();
        let dictionary = self.dictionary.clone();

        match &mut self.value {
            AttributeValue::VendorSpecific {
                vendor_id,
                children,
            } => {
                if child.vendor_id != Some(*vendor_id) {
                    return Err(PacketError::AttributeError(format!(
                        "sub-attribute vendor {:?} does not match container vendor {}",
                        child.vendor_id, vendor_id
                    )));
                }
                if projected > Self::MAX_LENGTH {
                    return Err(PacketError::AttributeError(format!(
                        "Vendor-Specific attribute would be {} bytes",
                        projected
                    )));
                }
                child.set_dictionary(dictionary);
                children.push(child);
                Ok(())
            }
            _ => Err(PacketError::AttributeError(format!(
                "attribute {} is not Vendor-Specific",
                self.attr_type
            ))),
        }
    }

    /// Remove the first sub-attribute equal to `child`; returns whether one was removed
    pub fn remove_child(&mut self, child: &Attribute) -> bool {
        if let AttributeValue::VendorSpecific { children, .. } = &mut self.value {
            if let Some(index) = children.iter().position(|c| c == child) {
                children.remove(index);
                return true;
            }
        }
        false
    }

    /// Mutable access to the sub-attributes of a Vendor-Specific container
    pub(crate) fn children_mut(&mut self) -> Option<&mut Vec<Attribute>> {
        match &mut self.value {
            AttributeValue::VendorSpecific { children, .. } => Some(children),
            _ => None,
        }
    }
}

fn check_value_length(length: usize) -> Result<(), PacketError> {
    if length > Attribute::MAX_VALUE_LENGTH {
        return Err(PacketError::AttributeError(format!(
            "Attribute value too long: {} bytes (max {})",
            length,
            Attribute::MAX_VALUE_LENGTH
        )));
    }
    Ok(())
}

fn to_hex(data: &[u8]) -> String {
    data.iter().map(|b| format!("{:02x}", b)).collect()
}

fn parse_hex(value: &str) -> Option<Vec<u8>> {
    let digits = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))?;
    if digits.len() % 2 != 0 {
        return None;
    }
    (0..digits.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(digits.get(i..i + 2)?, 16).ok())
        .collect()
}

impl PartialEq for Attribute {
    fn eq(&self, other: &Self) -> bool {
        self.vendor_id == other.vendor_id
            && self.attr_type == other.attr_type
            && self.value == other.value
    }
}

impl Eq for Attribute {}

impl fmt::Debug for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attribute")
            .field("vendor_id", &self.vendor_id)
            .field("attr_type", &self.attr_type)
            .field("value", &self.value)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            AttributeValue::VendorSpecific {
                vendor_id,
                children,
            } => {
                let vendor = self
                    .dictionary
                    .as_deref()
                    .and_then(|d| d.vendor_name(*vendor_id));
                match vendor {
                    Some(name) => write!(f, "Vendor-Specific: {} ({})", name, vendor_id)?,
                    None => write!(f, "Vendor-Specific: Vendor ID {}", vendor_id)?,
                }
                for child in children {
                    write!(f, "\n  {}", child)?;
                }
                Ok(())
            }
            _ => write!(f, "{}: {}", self.name(), self.value_string()),
        }
    }
}
