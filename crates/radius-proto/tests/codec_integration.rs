//! Integration tests for the packet codec
//!
//! These tests exercise the public API end to end: building packets by
//! dictionary name, encoding them with each authenticator algorithm and
//! decoding them back as a peer would.

use radius_proto::{
    calculate_update_request_authenticator, Attribute, AttributeType, AuthenticatorFields, Code,
    Codec, DataKind, IdentifierAllocator, MemoryDictionary, Packet, PacketError,
    WritableDictionary,
};

const SECRET: &[u8] = b"testing123";
const WISPR: u32 = 14122;

/// Standard dictionary plus a handful of WISPr attributes
fn test_codec() -> Codec {
    let mut dictionary = MemoryDictionary::standard();
    dictionary.add_vendor(WISPR, "WISPr");
    dictionary
        .add_attribute_type(AttributeType::vendor(WISPR, 1, "WISPr-Location-ID", DataKind::String))
        .expect("Failed to register WISPr-Location-ID");
    dictionary
        .add_attribute_type(AttributeType::vendor(WISPR, 2, "WISPr-Location-Name", DataKind::String))
        .expect("Failed to register WISPr-Location-Name");
    dictionary
        .add_attribute_type(AttributeType::vendor(
            WISPR,
            7,
            "WISPr-Bandwidth-Min-Up",
            DataKind::Integer,
        ))
        .expect("Failed to register WISPr-Bandwidth-Min-Up");

    Codec::new(dictionary.into_shared()).with_user_password_hook()
}

#[test]
fn test_access_request_round_trip() {
    let codec = test_codec();
    let ids = IdentifierAllocator::new();
    let mut request = codec.new_packet(Code::AccessRequest, ids.next_identifier());
    request.add_attribute_str("User-Name", "alice").unwrap();
    request.add_attribute_str("User-Password", "wonderland").unwrap();
    request.add_attribute_str("NAS-IP-Address", "0x0a000001").unwrap();
    request.add_attribute_str("Service-Type", "Login-User").unwrap();
    request.add_attribute_str("WISPr-Location-ID", "isocc=us,cc=1").unwrap();
    request.add_attribute_str("WISPr-Location-Name", "Lobby").unwrap();

    let bytes = request.encode_request(SECRET).unwrap();
    let decoded = codec.decode_request(&bytes, SECRET, None).unwrap();

    assert_eq!(decoded.code, Code::AccessRequest);
    assert_eq!(decoded.identifier, 1);
    assert_eq!(decoded.attributes(), request.attributes());
    assert_eq!(decoded.vendor_attributes(WISPR).len(), 1);
    assert_eq!(
        decoded.attribute_value("WISPr-Location-Name").unwrap().as_deref(),
        Some("Lobby")
    );
    assert_eq!(decoded.attribute_value("Service-Type").unwrap().as_deref(), Some("Login-User"));
    assert_eq!(decoded.attribute_value("User-Password").unwrap().as_deref(), Some("wonderland"));
}

#[test]
fn test_accounting_request_authenticator() {
    let codec = test_codec();
    let mut request = codec.new_packet(Code::AccountingRequest, 200);
    request.add_attribute_str("Acct-Status-Type", "Start").unwrap();
    request.add_attribute_str("Acct-Session-Id", "0001").unwrap();
    request.add_attribute_str("WISPr-Bandwidth-Min-Up", "1024").unwrap();

    let bytes = request.encode_request(SECRET).unwrap();

    let expected = calculate_update_request_authenticator(&AuthenticatorFields {
        code: bytes[0],
        identifier: bytes[1],
        length: u16::from_be_bytes([bytes[2], bytes[3]]),
        attributes: &bytes[20..],
        secret: SECRET,
    });
    assert_eq!(&bytes[4..20], &expected);

    let decoded = codec.decode_request(&bytes, SECRET, None).unwrap();
    assert_eq!(decoded.attribute_value("WISPr-Bandwidth-Min-Up").unwrap().as_deref(), Some("1024"));

    let mut tampered = bytes.clone();
    let last = tampered.len() - 1;
    tampered[last] ^= 0xff;
    assert!(matches!(
        codec.decode_request(&tampered, SECRET, None),
        Err(PacketError::AuthenticatorMismatch(_))
    ));
}

#[test]
fn test_coa_and_disconnect_use_update_authenticator() {
    let codec = test_codec();
    for code in [Code::CoaRequest, Code::DisconnectRequest] {
        let mut request = codec.new_packet(code, 5);
        request.add_attribute_str("User-Name", "alice").unwrap();
        let first = request.encode_request(SECRET).unwrap();
        let second = request.encode_request(SECRET).unwrap();
        assert_eq!(first, second);
        assert!(codec.decode_request(&first, SECRET, None).is_ok());
    }
}

#[test]
fn test_access_exchange() {
    let codec = test_codec();
    let mut request = codec.new_packet(Code::AccessRequest, 77);
    request.add_attribute_str("User-Name", "bob").unwrap();
    request.add_attribute_str("Proxy-State", "0x0102").unwrap();
    let request_bytes = request.encode_request(SECRET).unwrap();

    // Server side
    let received = codec.decode_request(&request_bytes, SECRET, None).unwrap();
    let mut answer = Packet::response_to(&received, Code::AccessChallenge);
    radius_proto::copy_proxy_state(&received, &mut answer).unwrap();
    answer.add_attribute_str("Reply-Message", "enter token").unwrap();
    answer.add_attribute_str("State", "0xfeed").unwrap();
    let answer_bytes = answer.encode_response(SECRET, &received).unwrap();

    // Client side
    let reply = codec.decode_response(&answer_bytes, SECRET, &request).unwrap();
    assert_eq!(reply.code, Code::AccessChallenge);
    assert_eq!(reply.identifier, 77);
    assert_eq!(reply.find_all_attributes(33).len(), 1);
    assert_eq!(reply.attribute_value("State").unwrap().as_deref(), Some("0xfeed"));
}

#[test]
fn test_service_type_wire_vector() {
    let codec = test_codec();
    let mut request = codec.new_packet(Code::AccessRequest, 1);
    request.add_attribute(Attribute::integer(6, 6).unwrap()).unwrap();
    let bytes = request.encode_request(SECRET).unwrap();
    assert_eq!(&bytes[20..], &[0x06, 0x06, 0x00, 0x00, 0x00, 0x06]);

    // The standard dictionary names 6 "Administrative-User"; without enumerations it is decimal
    let mut bare = MemoryDictionary::new();
    bare.add_attribute_type(AttributeType::new(6, "Service-Type", DataKind::Integer))
        .unwrap();
    let plain = Codec::new(bare.into_shared());
    let decoded = plain.decode_request(&bytes, SECRET, None).unwrap();
    assert_eq!(decoded.attributes()[0].value_string(), "6");
}

#[test]
fn test_vendor_container_removal() {
    let codec = test_codec();
    let mut packet = codec.new_packet(Code::AccessRequest, 1);
    packet.add_attribute_str("User-Name", "alice").unwrap();
    packet.add_attribute_str("WISPr-Location-ID", "here").unwrap();
    assert_eq!(packet.attributes().len(), 2);

    let child = packet.find_vendor_attribute(WISPR, 1).unwrap().unwrap().clone();
    assert!(packet.remove_attribute(&child));
    assert_eq!(packet.attributes().len(), 1);
    assert_eq!(packet.attributes()[0].attr_type(), 1);
}

#[test]
fn test_malformed_vendor_payload_is_rejected() {
    let codec = test_codec();
    let mut data = vec![1u8, 1, 0, 29];
    data.extend_from_slice(&[0u8; 16]);
    // Vendor-Specific claiming a 7 byte sub-attribute inside a 9 byte container
    data.extend_from_slice(&[26, 9, 0x00, 0x00, 0x37, 0x2a, 1, 7, b'x']);
    assert!(matches!(
        codec.decode_request(&data, SECRET, None),
        Err(PacketError::Malformed(_))
    ));
}

#[test]
fn test_identifier_wraps() {
    let ids = IdentifierAllocator::starting_after(254);
    let allocated: Vec<u8> = (0..3).map(|_| ids.next_identifier()).collect();
    assert_eq!(allocated, vec![255, 0, 1]);
}
