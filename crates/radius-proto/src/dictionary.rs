//! Attribute dictionary lookup
//!
//! Packets and attributes never own attribute metadata. They consult a
//! [`Dictionary`] to decide which concrete attribute variant to build for a
//! `(vendor, type)` pair, to resolve attribute names, and to render integer
//! enumerations. Dictionaries are shared read-only as `Arc<dyn Dictionary>`.
//!
//! [`MemoryDictionary::standard`] provides the RFC 2865/2866 catalog; loading
//! dictionary files is left to the embedder through [`WritableDictionary`].

use crate::attributes::StandardAttribute;
use crate::packet::PacketError;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Declared data kind of an attribute value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataKind {
    /// 32-bit unsigned integer, optionally with named enumerations
    Integer,
    /// UTF-8 text
    String,
    /// Opaque bytes (also used for address and date types)
    Octets,
    /// Vendor-Specific container (type 26)
    VendorSpecific,
}

/// Metadata for a single attribute type
#[derive(Debug, Clone)]
pub struct AttributeType {
    vendor_id: Option<u32>,
    type_code: u8,
    name: String,
    kind: DataKind,
    enum_names: HashMap<u32, String>,
    enum_values: HashMap<String, u32>,
}

impl AttributeType {
    pub fn new(type_code: u8, name: impl Into<String>, kind: DataKind) -> Self {
        AttributeType {
            vendor_id: None,
            type_code,
            name: name.into(),
            kind,
            enum_names: HashMap::new(),
            enum_values: HashMap::new(),
        }
    }

    /// Create a vendor-scoped attribute type (a sub-attribute of Vendor-Specific)
    pub fn vendor(vendor_id: u32, type_code: u8, name: impl Into<String>, kind: DataKind) -> Self {
        AttributeType {
            vendor_id: Some(vendor_id),
            ..Self::new(type_code, name, kind)
        }
    }

    pub fn vendor_id(&self) -> Option<u32> {
        self.vendor_id
    }

    pub fn type_code(&self) -> u8 {
        self.type_code
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> DataKind {
        self.kind
    }

    /// Name of an enumerated integer value, if one is declared
    pub fn enum_name(&self, value: u32) -> Option<&str> {
        self.enum_names.get(&value).map(String::as_str)
    }

    /// Integer value of an enumeration name, if one is declared
    pub fn enum_value(&self, name: &str) -> Option<u32> {
        self.enum_values.get(name).copied()
    }

    pub fn add_enum_value(&mut self, value: u32, name: impl Into<String>) {
        let name = name.into();
        self.enum_values.insert(name.clone(), value);
        self.enum_names.insert(value, name);
    }

    /// Builder form of [`AttributeType::add_enum_value`]
    pub fn with_enum_value(mut self, value: u32, name: impl Into<String>) -> Self {
        self.add_enum_value(value, name);
        self
    }
}

/// Read-only lookup capability consumed by the codec
pub trait Dictionary: Send + Sync + fmt::Debug {
    /// Look up an attribute type by vendor (`None` for standard attributes) and type code
    fn lookup_by_code(&self, vendor_id: Option<u32>, type_code: u8) -> Option<&AttributeType>;

    /// Look up an attribute type by its name, e.g. `"User-Name"`
    fn lookup_by_name(&self, name: &str) -> Option<&AttributeType>;

    /// Vendor name for diagnostics
    fn vendor_name(&self, _vendor_id: u32) -> Option<&str> {
        None
    }
}

/// Dictionary that can be populated, e.g. by a dictionary file parser
pub trait WritableDictionary: Dictionary {
    fn add_vendor(&mut self, vendor_id: u32, vendor_name: &str);

    fn add_attribute_type(&mut self, attribute_type: AttributeType) -> Result<(), PacketError>;
}

/// In-memory dictionary
#[derive(Debug, Clone, Default)]
pub struct MemoryDictionary {
    by_code: HashMap<(Option<u32>, u8), AttributeType>,
    by_name: HashMap<String, (Option<u32>, u8)>,
    vendors: HashMap<u32, String>,
}

impl MemoryDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dictionary pre-loaded with the RFC 2865/2866 attributes and common enumerations
    pub fn standard() -> Self {
        let mut dictionary = MemoryDictionary::new();
        for attr in StandardAttribute::ALL {
            let mut attribute_type = AttributeType::new(attr.as_u8(), attr.name(), attr.kind());
            for (value, name) in attr.enumerations() {
                attribute_type.add_enum_value(*value, *name);
            }
            dictionary.insert(attribute_type);
        }
        dictionary
    }

    /// Wrap into the shared form used by packets, clients and servers
    pub fn into_shared(self) -> Arc<dyn Dictionary> {
        Arc::new(self)
    }

    pub fn len(&self) -> usize {
        self.by_code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty()
    }

    /// Register a type, replacing any type already at its (vendor, code)
    fn insert(&mut self, attribute_type: AttributeType) {
        let key = (attribute_type.vendor_id(), attribute_type.type_code());
        let name = attribute_type.name().to_string();
        if let Some(replaced) = self.by_code.insert(key, attribute_type) {
            self.by_name.remove(replaced.name());
        }
        self.by_name.insert(name, key);
    }
}

impl Dictionary for MemoryDictionary {
    fn lookup_by_code(&self, vendor_id: Option<u32>, type_code: u8) -> Option<&AttributeType> {
        self.by_code.get(&(vendor_id, type_code))
    }

    fn lookup_by_name(&self, name: &str) -> Option<&AttributeType> {
        self.by_name
            .get(name)
            .and_then(|key| self.by_code.get(key))
    }

    fn vendor_name(&self, vendor_id: u32) -> Option<&str> {
        self.vendors.get(&vendor_id).map(String::as_str)
    }
}

impl WritableDictionary for MemoryDictionary {
    fn add_vendor(&mut self, vendor_id: u32, vendor_name: &str) {
        self.vendors.insert(vendor_id, vendor_name.to_string());
    }

    fn add_attribute_type(&mut self, attribute_type: AttributeType) -> Result<(), PacketError> {
        if self.by_name.contains_key(attribute_type.name()) {
            return Err(PacketError::Configuration(format!(
                "duplicate attribute name '{}'",
                attribute_type.name()
            )));
        }
        if let Some(vendor_id) = attribute_type.vendor_id() {
            if !self.vendors.contains_key(&vendor_id) {
                return Err(PacketError::Configuration(format!(
                    "unknown vendor {} for attribute '{}'",
                    vendor_id,
                    attribute_type.name()
                )));
            }
        }
        self.insert(attribute_type);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_dictionary_lookup() {
        let dict = MemoryDictionary::standard();

        let user_name = dict.lookup_by_name("User-Name").unwrap();
        assert_eq!(user_name.type_code(), 1);
        assert_eq!(user_name.kind(), DataKind::String);

        let service_type = dict.lookup_by_code(None, 6).unwrap();
        assert_eq!(service_type.name(), "Service-Type");
        assert_eq!(service_type.kind(), DataKind::Integer);
        assert_eq!(service_type.enum_name(1), Some("Login-User"));
        assert_eq!(service_type.enum_value("Framed-User"), Some(2));
    }

    #[test]
    fn test_unknown_lookups() {
        let dict = MemoryDictionary::standard();
        assert!(dict.lookup_by_name("No-Such-Attribute").is_none());
        assert!(dict.lookup_by_code(Some(9), 1).is_none());
    }

    #[test]
    fn test_vendor_attribute_registration() {
        let mut dict = MemoryDictionary::new();
        dict.add_vendor(14122, "WISPr");
        dict.add_attribute_type(AttributeType::vendor(
            14122,
            1,
            "WISPr-Location-ID",
            DataKind::String,
        ))
        .unwrap();

        let t = dict.lookup_by_name("WISPr-Location-ID").unwrap();
        assert_eq!(t.vendor_id(), Some(14122));
        assert_eq!(dict.lookup_by_code(Some(14122), 1).unwrap().name(), "WISPr-Location-ID");
        assert_eq!(dict.vendor_name(14122), Some("WISPr"));
    }

    #[test]
    fn test_vendor_attribute_requires_vendor() {
        let mut dict = MemoryDictionary::new();
        let result = dict.add_attribute_type(AttributeType::vendor(9, 1, "Cisco-AVPair", DataKind::String));
        assert!(result.is_err());
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut dict = MemoryDictionary::standard();
        let result = dict.add_attribute_type(AttributeType::new(200, "User-Name", DataKind::String));
        assert!(result.is_err());
    }

    #[test]
    fn test_renaming_a_code_forgets_the_old_name() {
        let mut dict = MemoryDictionary::new();
        dict.add_attribute_type(AttributeType::new(200, "Old-Name", DataKind::String))
            .unwrap();
        dict.add_attribute_type(AttributeType::new(200, "New-Name", DataKind::Integer))
            .unwrap();

        assert!(dict.lookup_by_name("Old-Name").is_none());
        assert_eq!(dict.lookup_by_name("New-Name").unwrap().kind(), DataKind::Integer);
        assert_eq!(dict.lookup_by_code(None, 200).unwrap().name(), "New-Name");
        assert_eq!(dict.len(), 1);
    }
}
