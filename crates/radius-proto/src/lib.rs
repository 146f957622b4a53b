//! RADIUS Protocol Implementation
//!
//! This crate provides the wire-level half of RADIUS as defined in RFC 2865
//! and RFC 2866, plus the Disconnect/CoA request authenticator of RFC 5176.
//!
//! # Features
//!
//! - Packet encoding and decoding with strict length validation
//! - Dictionary-driven attributes (integer, string, octets, Vendor-Specific)
//! - Request, Response and update-request Authenticator algorithms
//! - MD5-based User-Password hiding as an attribute hook
//! - Wrapping packet identifier allocation
//!
//! # Example
//!
//! ```rust
//! use radius_proto::{Code, Codec, MemoryDictionary, Packet};
//!
//! let codec = Codec::new(MemoryDictionary::standard().into_shared()).with_user_password_hook();
//!
//! // Create an Access-Request packet
//! let mut request = codec.new_packet(Code::AccessRequest, 1);
//! request.add_attribute_str("User-Name", "alice").unwrap();
//! request.add_attribute_str("User-Password", "password").unwrap();
//!
//! // Encode to bytes; the password is hidden on the wire
//! let bytes = request.encode_request(b"secret").unwrap();
//!
//! // A server decodes it with the same secret
//! let received = codec.decode_request(&bytes, b"secret", None).unwrap();
//! assert_eq!(received.attribute_value("User-Name").unwrap().as_deref(), Some("alice"));
//!
//! // and answers
//! let mut accept = Packet::response_to(&received, Code::AccessAccept);
//! let reply = accept.encode_response(b"secret", &received).unwrap();
//! assert!(codec.decode_response(&reply, b"secret", &request).is_ok());
//! ```

pub mod attributes;
pub mod auth;
pub mod dictionary;
pub mod packet;

pub use attributes::{Attribute, AttributeValue, StandardAttribute};
pub use auth::{
    calculate_response_authenticator, calculate_update_request_authenticator,
    decrypt_user_password, encrypt_user_password, generate_request_authenticator,
    AuthenticatorFields, AuthenticatorRole,
};
pub use dictionary::{AttributeType, DataKind, Dictionary, MemoryDictionary, WritableDictionary};
pub use packet::{
    copy_proxy_state, AttributeHook, Code, Codec, IdentifierAllocator, Packet, PacketError,
    UserPasswordHook,
};
