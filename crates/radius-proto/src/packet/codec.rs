use super::packet::{check_secret, validate_attribute_region};
use super::{AttributeHook, Code, Packet, PacketError, UserPasswordHook};
use crate::attributes::Attribute;
use crate::auth::{AuthenticatorFields, AuthenticatorRole};
use crate::dictionary::Dictionary;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::trace;

/// Packet factory and wire decoder
///
/// Owns the dictionary every packet is bound to and the attribute hooks
/// installed per packet code.
#[derive(Debug, Clone)]
pub struct Codec {
    dictionary: Arc<dyn Dictionary>,
    hooks: HashMap<Code, Arc<dyn AttributeHook>>,
}

impl Codec {
    pub fn new(dictionary: Arc<dyn Dictionary>) -> Self {
        Codec {
            dictionary,
            hooks: HashMap::new(),
        }
    }

    /// Hide User-Password in Access-Requests built or decoded by this codec
    pub fn with_user_password_hook(self) -> Self {
        self.with_hook(Code::AccessRequest, Arc::new(UserPasswordHook))
    }

    pub fn with_hook(mut self, code: Code, hook: Arc<dyn AttributeHook>) -> Self {
        self.hooks.insert(code, hook);
        self
    }

    pub fn dictionary(&self) -> &Arc<dyn Dictionary> {
        &self.dictionary
    }

    /// Build an empty packet of `code` with the role and hook registered for it
    pub fn new_packet(&self, code: Code, identifier: u8) -> Packet {
        let packet = Packet::new(code, identifier, Arc::clone(&self.dictionary));
        match self.hooks.get(&code) {
            Some(hook) => packet.with_hook(Arc::clone(hook)),
            None => packet,
        }
    }

    /// Decode an inbound request
    ///
    /// `force` builds the packet as if it carried that code. Decoding with
    /// [`Code::Reserved`] skips hooks and request authenticator checks, which
    /// lets a server read the header before it knows the client's secret.
    pub fn decode_request(
        &self,
        data: &[u8],
        secret: &[u8],
        force: Option<Code>,
    ) -> Result<Packet, PacketError> {
        self.decode(data, secret, None, force)
    }

    /// Decode the response to `request`, verifying its identifier and authenticator
    pub fn decode_response(
        &self,
        data: &[u8],
        secret: &[u8],
        request: &Packet,
    ) -> Result<Packet, PacketError> {
        self.decode(data, secret, Some(request), None)
    }

    fn decode(
        &self,
        data: &[u8],
        secret: &[u8],
        request: Option<&Packet>,
        force: Option<Code>,
    ) -> Result<Packet, PacketError> {
        check_secret(secret)?;
        let request_authenticator = match request {
            Some(request) => Some(request.authenticator().ok_or_else(|| {
                PacketError::Configuration("request authenticator not set".to_string())
            })?),
            None => None,
        };

        if data.len() < Packet::MIN_PACKET_SIZE {
            return Err(PacketError::Malformed(format!(
                "packet too short: {} bytes",
                data.len()
            )));
        }

        let code_byte = data[0];
        let identifier = data[1];
        let length = u16::from_be_bytes([data[2], data[3]]);
        let mut authenticator = [0u8; 16];
        authenticator.copy_from_slice(&data[4..Packet::MIN_PACKET_SIZE]);

        if let Some(request) = request {
            if identifier != request.identifier {
                return Err(PacketError::Malformed(format!(
                    "response identifier {} does not match request identifier {}",
                    identifier, request.identifier
                )));
            }
        }

        let total = length as usize;
        if !(Packet::MIN_PACKET_SIZE..=Packet::MAX_PACKET_SIZE).contains(&total) {
            return Err(PacketError::Malformed(format!("invalid packet length: {}", total)));
        }
        if data.len() < total {
            return Err(PacketError::Malformed(format!(
                "packet truncated: {} of {} bytes",
                data.len(),
                total
            )));
        }
        if code_byte == 0 {
            return Err(PacketError::InvalidCode(code_byte));
        }

        let body = &data[Packet::MIN_PACKET_SIZE..total];
        validate_attribute_region(body)?;

        let code = Code::from_u8(code_byte);
        let mut packet = self.new_packet(force.unwrap_or(code), identifier);
        if request.is_some() {
            packet.role = AuthenticatorRole::ResponseProof;
            packet.hook = None;
        }
        packet.code = code;
        packet.authenticator = Some(authenticator);
        packet.attributes = self.parse_attributes(body)?;

        let fields = AuthenticatorFields {
            code: code_byte,
            identifier,
            length,
            attributes: body,
            secret,
        };

        match request_authenticator {
            None => {
                if let Some(hook) = packet.hook.clone() {
                    hook.decode_request_attributes(&mut packet.attributes, secret, &authenticator)?;
                }
                if packet.role == AuthenticatorRole::UpdateRequest
                    && packet.role.authenticator(&fields, &authenticator) != authenticator
                {
                    return Err(PacketError::AuthenticatorMismatch("request"));
                }
            }
            Some(request_authenticator) => {
                let expected = AuthenticatorRole::ResponseProof.authenticator(&fields, &request_authenticator);
                if expected != authenticator {
                    return Err(PacketError::AuthenticatorMismatch("response"));
                }
            }
        }

        trace!(
            packet_type = %packet.code,
            request_id = identifier,
            attributes = packet.attributes.len(),
            "Decoded packet"
        );
        Ok(packet)
    }

    fn parse_attributes(&self, body: &[u8]) -> Result<Vec<Attribute>, PacketError> {
        let mut attributes = Vec::new();
        let mut pos = 0;
        while pos < body.len() {
            let attr_type = body[pos];
            let length = body[pos + 1] as usize;
            let mut attribute = Attribute::create(Some(&self.dictionary), None, attr_type);
            attribute.read_from(body, pos, length)?;
            attributes.push(attribute);
            pos += length;
        }
        Ok(attributes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::MemoryDictionary;

    fn codec() -> Codec {
        Codec::new(MemoryDictionary::standard().into_shared()).with_user_password_hook()
    }

    #[test]
    fn test_request_round_trip() {
        let codec = codec();
        let mut request = codec.new_packet(Code::AccessRequest, 17);
        request.add_attribute_str("User-Name", "alice").unwrap();
        request.add_attribute_str("NAS-Port", "7").unwrap();
        let bytes = request.encode_request(b"secret").unwrap();

        let decoded = codec.decode_request(&bytes, b"secret", None).unwrap();
        assert_eq!(decoded.code, Code::AccessRequest);
        assert_eq!(decoded.identifier, 17);
        assert_eq!(decoded.authenticator(), request.authenticator());
        assert_eq!(decoded.attributes(), request.attributes());
    }

    #[test]
    fn test_user_password_is_hidden_on_the_wire() {
        let codec = codec();
        let mut request = codec.new_packet(Code::AccessRequest, 1);
        request.add_attribute_str("User-Password", "letmein").unwrap();
        let bytes = request.encode_request(b"secret").unwrap();

        assert!(!bytes.windows(7).any(|w| w == b"letmein"));
        assert_eq!(request.attribute_value("User-Password").unwrap().as_deref(), Some("letmein"));

        let decoded = codec.decode_request(&bytes, b"secret", None).unwrap();
        assert_eq!(decoded.attribute_value("User-Password").unwrap().as_deref(), Some("letmein"));
    }

    #[test]
    fn test_forced_reserved_decode_skips_verification() {
        let codec = codec();
        let mut request = codec.new_packet(Code::AccountingRequest, 3);
        request.add_attribute_str("Acct-Status-Type", "Start").unwrap();
        let bytes = request.encode_request(b"secret").unwrap();

        assert!(matches!(
            codec.decode_request(&bytes, b"wrong", None),
            Err(PacketError::AuthenticatorMismatch(_))
        ));

        let header = codec.decode_request(&bytes, b"1234567890", Some(Code::Reserved)).unwrap();
        assert_eq!(header.code, Code::AccountingRequest);
        assert_eq!(header.identifier, 3);

        let full = codec.decode_request(&bytes, b"secret", None).unwrap();
        assert_eq!(full.role(), AuthenticatorRole::UpdateRequest);
    }

    #[test]
    fn test_response_round_trip() {
        let codec = codec();
        let mut request = codec.new_packet(Code::AccessRequest, 8);
        request.encode_request(b"secret").unwrap();

        let mut response = Packet::response_to(&request, Code::AccessAccept);
        response.add_attribute_str("Reply-Message", "welcome").unwrap();
        let bytes = response.encode_response(b"secret", &request).unwrap();

        let decoded = codec.decode_response(&bytes, b"secret", &request).unwrap();
        assert_eq!(decoded.code, Code::AccessAccept);
        assert_eq!(decoded.attribute_value("Reply-Message").unwrap().as_deref(), Some("welcome"));
    }

    #[test]
    fn test_response_with_wrong_secret_is_rejected() {
        let codec = codec();
        let mut request = codec.new_packet(Code::AccessRequest, 8);
        request.encode_request(b"secret").unwrap();
        let mut response = Packet::response_to(&request, Code::AccessReject);
        let bytes = response.encode_response(b"other", &request).unwrap();

        assert!(matches!(
            codec.decode_response(&bytes, b"secret", &request),
            Err(PacketError::AuthenticatorMismatch("response"))
        ));
    }

    #[test]
    fn test_response_identifier_mismatch() {
        let codec = codec();
        let mut request = codec.new_packet(Code::AccessRequest, 8);
        request.encode_request(b"secret").unwrap();
        let mut response = codec.new_packet(Code::AccessAccept, 9);
        let bytes = response.encode_response(b"secret", &request).unwrap();

        assert!(matches!(
            codec.decode_response(&bytes, b"secret", &request),
            Err(PacketError::Malformed(_))
        ));
    }

    #[test]
    fn test_header_validation() {
        let codec = codec();
        assert!(codec.decode_request(&[0u8; 19], b"s", None).is_err());

        let mut header = vec![1u8, 1, 0, 19];
        header.extend_from_slice(&[0u8; 16]);
        assert!(matches!(
            codec.decode_request(&header, b"s", None),
            Err(PacketError::Malformed(_))
        ));

        header[3] = 30;
        assert!(matches!(
            codec.decode_request(&header, b"s", None),
            Err(PacketError::Malformed(_))
        ));

        header[0] = 0;
        header[3] = 20;
        assert!(matches!(
            codec.decode_request(&header, b"s", None),
            Err(PacketError::InvalidCode(0))
        ));
    }

    #[test]
    fn test_empty_secret_rejected() {
        let codec = codec();
        let mut request = codec.new_packet(Code::AccessRequest, 1);
        let bytes = request.encode_request(b"s").unwrap();
        assert!(matches!(
            codec.decode_request(&bytes, b"", None),
            Err(PacketError::Configuration(_))
        ));
    }

    #[test]
    fn test_attribute_overrun_rejected() {
        let codec = codec();
        let mut data = vec![1u8, 1, 0, 24];
        data.extend_from_slice(&[0u8; 16]);
        data.extend_from_slice(&[1, 5, b'a', b'b']);
        assert!(matches!(
            codec.decode_request(&data, b"s", None),
            Err(PacketError::Malformed(_))
        ));
    }

    #[test]
    fn test_trailing_bytes_beyond_length_are_ignored() {
        let codec = codec();
        let mut request = codec.new_packet(Code::AccessRequest, 4);
        request.add_attribute_str("User-Name", "bob").unwrap();
        let mut bytes = request.encode_request(b"s").unwrap();
        bytes.extend_from_slice(&[0xff; 8]);

        let decoded = codec.decode_request(&bytes, b"s", None).unwrap();
        assert_eq!(decoded.attributes().len(), 1);
    }
}
