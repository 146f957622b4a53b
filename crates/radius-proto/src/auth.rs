use crate::packet::{Code, PacketError};
use rand::Rng;

/// Length of the authenticator field
pub const AUTHENTICATOR_LENGTH: usize = 16;

/// Longest User-Password accepted for hiding (RFC 2865 Section 5.2)
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// Which authenticator algorithm a packet uses when it is encoded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthenticatorRole {
    /// MD5 of the secret and 16 random bytes (Access-Request, Status-Server, ...)
    RequestSeed,
    /// MD5 over the response, keyed by the request authenticator (all responses)
    ResponseProof,
    /// MD5 over the request with a zeroed authenticator
    /// (Accounting-Request, Disconnect-Request, CoA-Request)
    UpdateRequest,
}

impl AuthenticatorRole {
    /// Role of a packet built as a request of type `code`
    pub fn for_request(code: Code) -> Self {
        match code {
            Code::AccountingRequest | Code::DisconnectRequest | Code::CoaRequest => {
                AuthenticatorRole::UpdateRequest
            }
            _ => AuthenticatorRole::RequestSeed,
        }
    }

    /// Select and run the algorithm for this role
    ///
    /// `reference` is the pre-generated seed for [`AuthenticatorRole::RequestSeed`]
    /// and the request authenticator for [`AuthenticatorRole::ResponseProof`];
    /// it is ignored for [`AuthenticatorRole::UpdateRequest`].
    pub fn authenticator(self, fields: &AuthenticatorFields<'_>, reference: &[u8; 16]) -> [u8; 16] {
        match self {
            AuthenticatorRole::RequestSeed => *reference,
            AuthenticatorRole::ResponseProof => calculate_response_authenticator(fields, reference),
            AuthenticatorRole::UpdateRequest => calculate_update_request_authenticator(fields),
        }
    }
}

/// Header fields and attribute bytes an authenticator is computed over
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatorFields<'a> {
    pub code: u8,
    pub identifier: u8,
    /// Total packet length, header included
    pub length: u16,
    pub attributes: &'a [u8],
    pub secret: &'a [u8],
}

/// Generate a Request Authenticator per RFC 2865 Section 3
///
/// Request Authenticator = MD5(Secret + 16 random bytes)
pub fn generate_request_authenticator(secret: &[u8]) -> [u8; 16] {
    let mut rng = rand::rng();
    let mut random = [0u8; 16];
    rng.fill(&mut random);

    let mut data = Vec::with_capacity(secret.len() + random.len());
    data.extend_from_slice(secret);
    data.extend_from_slice(&random);
    md5::compute(&data).0
}

/// Calculate Response Authenticator per RFC 2865 Section 3
///
/// Response Authenticator = MD5(Code + ID + Length + Request Authenticator + Attributes + Secret)
pub fn calculate_response_authenticator(
    fields: &AuthenticatorFields<'_>,
    request_authenticator: &[u8; 16],
) -> [u8; 16] {
    let mut data = Vec::with_capacity(20 + fields.attributes.len() + fields.secret.len());

    data.push(fields.code);
    data.push(fields.identifier);
    data.extend_from_slice(&fields.length.to_be_bytes());
    data.extend_from_slice(request_authenticator);
    data.extend_from_slice(fields.attributes);
    data.extend_from_slice(fields.secret);

    md5::compute(&data).0
}

/// Calculate the authenticator of an Accounting-Request (RFC 2866 Section 3)
/// or Disconnect/CoA-Request (RFC 5176 Section 2.3)
///
/// Same digest as the Response Authenticator with 16 zero octets in place of
/// the Request Authenticator.
pub fn calculate_update_request_authenticator(fields: &AuthenticatorFields<'_>) -> [u8; 16] {
    calculate_response_authenticator(fields, &[0u8; AUTHENTICATOR_LENGTH])
}

/// Hide a User-Password per RFC 2865 Section 5.2
///
/// The password is padded with zeros to a multiple of 16 bytes, then XORed
/// with MD5(secret + request_authenticator) for the first 16 bytes, and
/// MD5(secret + previous_block) for subsequent blocks.
pub fn encrypt_user_password(
    password: &[u8],
    secret: &[u8],
    authenticator: &[u8; 16],
) -> Result<Vec<u8>, PacketError> {
    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(PacketError::Configuration(format!(
            "User-Password longer than {} bytes",
            MAX_PASSWORD_LENGTH
        )));
    }

    let mut padded = password.to_vec();
    let blocks = padded.len().div_ceil(16).max(1);
    padded.resize(blocks * 16, 0);

    let mut result = Vec::with_capacity(padded.len());
    let mut previous_block = authenticator.to_vec();

    for chunk in padded.chunks(16) {
        let mut data = Vec::with_capacity(secret.len() + 16);
        data.extend_from_slice(secret);
        data.extend_from_slice(&previous_block);
        let hash = md5::compute(&data);

        let encrypted_block: Vec<u8> = chunk.iter().zip(hash.0.iter()).map(|(p, h)| p ^ h).collect();
        result.extend_from_slice(&encrypted_block);
        previous_block = encrypted_block;
    }

    Ok(result)
}

/// Recover a hidden User-Password per RFC 2865 Section 5.2
pub fn decrypt_user_password(
    encrypted: &[u8],
    secret: &[u8],
    authenticator: &[u8; 16],
) -> Result<Vec<u8>, PacketError> {
    if encrypted.len() % 16 != 0 || encrypted.is_empty() {
        return Err(PacketError::Malformed(format!(
            "invalid hidden User-Password length: {}",
            encrypted.len()
        )));
    }

    let mut result = Vec::with_capacity(encrypted.len());
    let mut previous_block: &[u8] = authenticator;

    for chunk in encrypted.chunks(16) {
        let mut data = Vec::with_capacity(secret.len() + 16);
        data.extend_from_slice(secret);
        data.extend_from_slice(previous_block);
        let hash = md5::compute(&data);

        result.extend(chunk.iter().zip(hash.0.iter()).map(|(c, h)| c ^ h));
        previous_block = chunk;
    }

    // Remove padding (null bytes at the end)
    while result.last() == Some(&0) {
        result.pop();
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields<'a>(attributes: &'a [u8], secret: &'a [u8]) -> AuthenticatorFields<'a> {
        AuthenticatorFields {
            code: 2,
            identifier: 42,
            length: (20 + attributes.len()) as u16,
            attributes,
            secret,
        }
    }

    #[test]
    fn test_generate_authenticator() {
        let auth1 = generate_request_authenticator(b"secret");
        let auth2 = generate_request_authenticator(b"secret");
        // Should be random
        assert_ne!(auth1, auth2);
    }

    #[test]
    fn test_response_authenticator_is_deterministic() {
        let attributes = [1u8, 7, b'a', b'l', b'i', b'c', b'e'];
        let request_auth = [1u8; 16];

        let first = calculate_response_authenticator(&fields(&attributes, b"sharedsecret"), &request_auth);
        let second = calculate_response_authenticator(&fields(&attributes, b"sharedsecret"), &request_auth);
        assert_eq!(first, second);
    }

    #[test]
    fn test_response_authenticator_depends_on_every_attribute_byte() {
        let attributes = [1u8, 7, b'a', b'l', b'i', b'c', b'e'];
        let request_auth = [1u8; 16];
        let baseline = calculate_response_authenticator(&fields(&attributes, b"s"), &request_auth);

        for i in 0..attributes.len() {
            let mut changed = attributes;
            changed[i] ^= 0x01;
            assert_ne!(
                calculate_response_authenticator(&fields(&changed, b"s"), &request_auth),
                baseline
            );
        }
    }

    #[test]
    fn test_response_authenticator_known_answer() {
        // Header-only Access-Accept, id 0, zero request authenticator, secret "s"
        let mut data = vec![2u8, 0, 0, 20];
        data.extend_from_slice(&[0u8; 16]);
        data.push(b's');
        let expected = md5::compute(&data).0;

        let fields = AuthenticatorFields {
            code: 2,
            identifier: 0,
            length: 20,
            attributes: &[],
            secret: b"s",
        };
        assert_eq!(calculate_response_authenticator(&fields, &[0u8; 16]), expected);
        assert_eq!(calculate_update_request_authenticator(&fields), expected);
    }

    #[test]
    fn test_role_selection() {
        assert_eq!(AuthenticatorRole::for_request(Code::AccessRequest), AuthenticatorRole::RequestSeed);
        assert_eq!(AuthenticatorRole::for_request(Code::StatusServer), AuthenticatorRole::RequestSeed);
        assert_eq!(AuthenticatorRole::for_request(Code::AccountingRequest), AuthenticatorRole::UpdateRequest);
        assert_eq!(AuthenticatorRole::for_request(Code::DisconnectRequest), AuthenticatorRole::UpdateRequest);
        assert_eq!(AuthenticatorRole::for_request(Code::CoaRequest), AuthenticatorRole::UpdateRequest);
    }

    #[test]
    fn test_role_dispatch() {
        let attributes = [1u8, 3, b'x'];
        let f = fields(&attributes, b"secret");
        let seed = [9u8; 16];

        assert_eq!(AuthenticatorRole::RequestSeed.authenticator(&f, &seed), seed);
        assert_eq!(
            AuthenticatorRole::ResponseProof.authenticator(&f, &seed),
            calculate_response_authenticator(&f, &seed)
        );
        assert_eq!(
            AuthenticatorRole::UpdateRequest.authenticator(&f, &seed),
            calculate_update_request_authenticator(&f)
        );
    }

    #[test]
    fn test_password_encryption_decryption() {
        let password = b"mysecretpassword-that-spans-two-blocks";
        let secret = b"sharedsecret";
        let authenticator = [1u8; 16];

        let encrypted = encrypt_user_password(password, secret, &authenticator).unwrap();
        assert_eq!(encrypted.len(), 48);
        assert_ne!(&encrypted[..password.len()], &password[..]);

        let decrypted = decrypt_user_password(&encrypted, secret, &authenticator).unwrap();
        assert_eq!(decrypted, password.to_vec());
    }

    #[test]
    fn test_password_encryption_empty() {
        let encrypted = encrypt_user_password(b"", b"sharedsecret", &[1u8; 16]).unwrap();
        assert_eq!(encrypted.len(), 16); // Should be padded to 16 bytes
    }

    #[test]
    fn test_password_too_long() {
        assert!(encrypt_user_password(&[b'a'; 129], b"s", &[0u8; 16]).is_err());
    }

    #[test]
    fn test_decrypt_rejects_partial_block() {
        assert!(decrypt_user_password(&[0u8; 15], b"s", &[0u8; 16]).is_err());
    }
}
