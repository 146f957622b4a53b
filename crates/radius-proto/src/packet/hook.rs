use super::PacketError;
use crate::attributes::{Attribute, StandardAttribute};
use crate::auth::{decrypt_user_password, encrypt_user_password};
use std::fmt;

/// Per-packet-type attribute transformation run by the request codec
///
/// `encode_request_attributes` runs on a copy of the attribute list right
/// before serialization, after the request authenticator is chosen.
/// `decode_request_attributes` runs on the parsed list of an inbound request.
pub trait AttributeHook: Send + Sync + fmt::Debug {
    fn encode_request_attributes(
        &self,
        attributes: &mut [Attribute],
        secret: &[u8],
        authenticator: &[u8; 16],
    ) -> Result<(), PacketError>;

    fn decode_request_attributes(
        &self,
        attributes: &mut [Attribute],
        secret: &[u8],
        authenticator: &[u8; 16],
    ) -> Result<(), PacketError>;
}

/// Hides User-Password on the wire (RFC 2865 Section 5.2)
///
/// The packet keeps the plaintext; only the encoded datagram carries the
/// hidden form.
#[derive(Debug, Clone, Copy, Default)]
pub struct UserPasswordHook;

fn user_passwords<'a>(
    attributes: &'a mut [Attribute],
) -> impl Iterator<Item = &'a mut Attribute> + 'a {
    attributes.iter_mut().filter(|a| {
        a.vendor_id().is_none() && a.attr_type() == StandardAttribute::UserPassword.as_u8()
    })
}

impl AttributeHook for UserPasswordHook {
    fn encode_request_attributes(
        &self,
        attributes: &mut [Attribute],
        secret: &[u8],
        authenticator: &[u8; 16],
    ) -> Result<(), PacketError> {
        for attribute in user_passwords(attributes) {
            let hidden = encrypt_user_password(&attribute.payload()?, secret, authenticator)?;
            attribute.set_data(hidden)?;
        }
        Ok(())
    }

    fn decode_request_attributes(
        &self,
        attributes: &mut [Attribute],
        secret: &[u8],
        authenticator: &[u8; 16],
    ) -> Result<(), PacketError> {
        for attribute in user_passwords(attributes) {
            let plain = decrypt_user_password(&attribute.payload()?, secret, authenticator)?;
            attribute.set_data(plain)?;
        }
        Ok(())
    }
}
