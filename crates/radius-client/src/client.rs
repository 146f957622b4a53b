use crate::endpoint::RadiusEndpoint;
use radius_proto::{Code, Codec, Dictionary, IdentifierAllocator, Packet, PacketError};
use std::io;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::net::UdpSocket;
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("Packet error: {0}")]
    Packet(#[from] PacketError),
    #[error("Transport error: {0}")]
    Transport(#[from] io::Error),
    #[error("No response after {attempts} attempts")]
    Timeout { attempts: u32 },
}

/// RADIUS client bound to one server address and shared secret
///
/// Every call to [`RadiusClient::communicate`] uses its own socket; the
/// client itself holds no per-request state and can be shared between tasks.
#[derive(Debug)]
pub struct RadiusClient {
    host: IpAddr,
    shared_secret: String,
    auth_port: u16,
    acct_port: u16,
    retry_count: u32,
    socket_timeout: Duration,
    codec: Codec,
    identifiers: IdentifierAllocator,
}

impl RadiusClient {
    pub const DEFAULT_AUTH_PORT: u16 = 1812;
    pub const DEFAULT_ACCT_PORT: u16 = 1813;
    pub const DEFAULT_RETRY_COUNT: u32 = 3;
    pub const DEFAULT_SOCKET_TIMEOUT: Duration = Duration::from_millis(3000);

    /// Create a client for the server at `host` (an IP address)
    pub fn new(
        host: &str,
        shared_secret: &str,
        dictionary: Arc<dyn Dictionary>,
    ) -> Result<Self, ClientError> {
        let host = host.trim().parse::<IpAddr>().map_err(|_| {
            ClientError::Configuration(format!("invalid host IP address '{}'", host))
        })?;
        check_secret(shared_secret)?;

        Ok(RadiusClient {
            host,
            shared_secret: shared_secret.to_string(),
            auth_port: Self::DEFAULT_AUTH_PORT,
            acct_port: Self::DEFAULT_ACCT_PORT,
            retry_count: Self::DEFAULT_RETRY_COUNT,
            socket_timeout: Self::DEFAULT_SOCKET_TIMEOUT,
            codec: Codec::new(dictionary).with_user_password_hook(),
            identifiers: IdentifierAllocator::new(),
        })
    }

    /// Create a client for an endpoint; only its address and secret are used,
    /// the ports keep their defaults
    pub fn from_endpoint(
        endpoint: &RadiusEndpoint,
        dictionary: Arc<dyn Dictionary>,
    ) -> Result<Self, ClientError> {
        Self::new(
            &endpoint.address().ip().to_string(),
            endpoint.shared_secret(),
            dictionary,
        )
    }

    pub fn host(&self) -> IpAddr {
        self.host
    }

    pub fn shared_secret(&self) -> &str {
        &self.shared_secret
    }

    pub fn set_shared_secret(&mut self, shared_secret: &str) -> Result<(), ClientError> {
        check_secret(shared_secret)?;
        self.shared_secret = shared_secret.to_string();
        Ok(())
    }

    pub fn auth_port(&self) -> u16 {
        self.auth_port
    }

    pub fn set_auth_port(&mut self, port: u16) -> Result<(), ClientError> {
        self.auth_port = check_port(port)?;
        Ok(())
    }

    pub fn acct_port(&self) -> u16 {
        self.acct_port
    }

    pub fn set_acct_port(&mut self, port: u16) -> Result<(), ClientError> {
        self.acct_port = check_port(port)?;
        Ok(())
    }

    pub fn retry_count(&self) -> u32 {
        self.retry_count
    }

    pub fn set_retry_count(&mut self, retry_count: u32) -> Result<(), ClientError> {
        if retry_count < 1 {
            return Err(ClientError::Configuration(
                "retry count must be positive".to_string(),
            ));
        }
        self.retry_count = retry_count;
        Ok(())
    }

    pub fn socket_timeout(&self) -> Duration {
        self.socket_timeout
    }

    pub fn set_socket_timeout(&mut self, socket_timeout: Duration) -> Result<(), ClientError> {
        if socket_timeout.is_zero() {
            return Err(ClientError::Configuration(
                "socket timeout must be positive".to_string(),
            ));
        }
        self.socket_timeout = socket_timeout;
        Ok(())
    }

    pub fn codec(&self) -> &Codec {
        &self.codec
    }

    /// Build an empty request with a fresh identifier
    pub fn new_request(&self, code: Code) -> Packet {
        self.codec.new_packet(code, self.identifiers.next_identifier())
    }

    /// PAP authentication; true when the server answers Access-Accept
    pub async fn authenticate_user(&self, user_name: &str, password: &str) -> Result<bool, ClientError> {
        let mut request = self.new_request(Code::AccessRequest);
        request.add_attribute_str("User-Name", user_name)?;
        request.add_attribute_str("User-Password", password)?;

        let response = self.authenticate(&mut request).await?;
        Ok(response.code == Code::AccessAccept)
    }

    /// Send an Access-Request to the authentication port
    pub async fn authenticate(&self, request: &mut Packet) -> Result<Packet, ClientError> {
        info!(packet_type = %request.code, request_id = request.identifier, "Sending request");
        let response = self.communicate(request, self.auth_port).await?;
        info!(packet_type = %response.code, request_id = response.identifier, "Received response");
        Ok(response)
    }

    /// Send an Accounting-Request to the accounting port
    pub async fn account(&self, request: &mut Packet) -> Result<Packet, ClientError> {
        info!(packet_type = %request.code, request_id = request.identifier, "Sending request");
        let response = self.communicate(request, self.acct_port).await?;
        info!(packet_type = %response.code, request_id = response.identifier, "Received response");
        Ok(response)
    }

    /// Send `request` to `port` and wait for the matching response
    ///
    /// The request is encoded once with a fresh authenticator; each of the
    /// `retry_count` attempts sends the same datagram and waits up to the
    /// socket timeout. A reply that fails validation is returned as an error
    /// without retrying.
    pub async fn communicate(&self, request: &mut Packet, port: u16) -> Result<Packet, ClientError> {
        let secret = self.shared_secret.as_bytes();
        request.reset_authenticator();
        let datagram = request.encode_request(secret)?;
        let server = SocketAddr::new(self.host, port);

        let local: SocketAddr = match self.host {
            IpAddr::V4(_) => (Ipv4Addr::UNSPECIFIED, 0).into(),
            IpAddr::V6(_) => (Ipv6Addr::UNSPECIFIED, 0).into(),
        };
        let socket = UdpSocket::bind(local).await?;
        let mut buffer = vec![0u8; Packet::MAX_PACKET_SIZE];

        for attempt in 1..=self.retry_count {
            debug!(
                server = %server,
                request_id = request.identifier,
                attempt,
                bytes = datagram.len(),
                "Sending datagram"
            );

            let failure = match socket.send_to(&datagram, server).await {
                Ok(_) => match timeout(self.socket_timeout, socket.recv_from(&mut buffer)).await {
                    Ok(Ok((len, from))) => {
                        debug!(server = %from, bytes = len, "Received datagram");
                        return Ok(self.codec.decode_response(&buffer[..len], secret, request)?);
                    }
                    Ok(Err(e)) => ClientError::Transport(e),
                    Err(_) => ClientError::Timeout { attempts: attempt },
                },
                Err(e) => ClientError::Transport(e),
            };

            if attempt == self.retry_count {
                error!(server = %server, request_id = request.identifier, attempts = attempt, error = %failure, "Communication failure, no more retries");
                return Err(failure);
            }
            warn!(server = %server, request_id = request.identifier, attempt, error = %failure, "Communication failure, retrying");
        }

        Err(ClientError::Timeout {
            attempts: self.retry_count,
        })
    }
}

fn check_secret(shared_secret: &str) -> Result<(), ClientError> {
    if shared_secret.is_empty() {
        return Err(ClientError::Configuration(
            "shared secret must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn check_port(port: u16) -> Result<u16, ClientError> {
    if port == 0 {
        return Err(ClientError::Configuration(format!("invalid port number {}", port)));
    }
    Ok(port)
}
