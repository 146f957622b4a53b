use std::net::SocketAddr;

/// A RADIUS peer: its address and the secret shared with it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RadiusEndpoint {
    address: SocketAddr,
    shared_secret: String,
}

impl RadiusEndpoint {
    pub fn new(address: SocketAddr, shared_secret: impl Into<String>) -> Self {
        RadiusEndpoint {
            address,
            shared_secret: shared_secret.into(),
        }
    }

    pub fn address(&self) -> SocketAddr {
        self.address
    }

    pub fn port(&self) -> u16 {
        self.address.port()
    }

    pub fn shared_secret(&self) -> &str {
        &self.shared_secret
    }
}
