use crate::server::ServerConfig;
use ipnetwork::IpNetwork;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::net::IpAddr;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub password: String,
    /// Reply attributes for Access-Accept, by dictionary name
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

/// Client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    /// Client IP address or network (supports CIDR notation)
    pub address: String,
    /// Shared secret for this client
    pub secret: String,
    /// Optional client name/description
    #[serde(default)]
    pub name: Option<String>,
    /// Enable/disable this client
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl Client {
    /// Parse the client address as an IP network
    pub fn parse_network(&self) -> Result<IpNetwork, ConfigError> {
        // Try to parse as CIDR notation first
        if let Ok(network) = self.address.parse::<IpNetwork>() {
            return Ok(network);
        }

        // A single IP address is a /32 (IPv4) or /128 (IPv6) network
        if let Ok(ip) = self.address.parse::<IpAddr>() {
            return Ok(IpNetwork::from(ip));
        }

        Err(ConfigError::Invalid(format!(
            "Invalid client address: {}",
            self.address
        )))
    }

    /// Check if a source IP address matches this client
    pub fn matches(&self, source_ip: IpAddr) -> Result<bool, ConfigError> {
        let network = self.parse_network()?;
        Ok(network.contains(source_ip))
    }
}

/// Server configuration file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server listen address
    #[serde(default = "default_listen_address")]
    pub listen_address: String,

    /// Authentication port
    #[serde(default = "default_auth_port")]
    pub auth_port: u16,

    /// Accounting port
    #[serde(default = "default_acct_port")]
    pub acct_port: u16,

    /// Receive timeout in milliseconds; bounds how long a stop request waits
    #[serde(default = "default_socket_timeout_ms")]
    pub socket_timeout_ms: u64,

    /// Window in milliseconds within which a retransmitted request is ignored
    #[serde(default = "default_duplicate_interval_ms")]
    pub duplicate_interval_ms: u64,

    /// Log level: "trace", "debug", "info", "warn", "error" (default: "info")
    #[serde(default)]
    pub log_level: Option<String>,

    /// Clients allowed to talk to the server; anyone else is ignored
    #[serde(default)]
    pub clients: Vec<Client>,

    /// List of users for authentication
    #[serde(default)]
    pub users: Vec<User>,
}

fn default_listen_address() -> String {
    "0.0.0.0".to_string()
}

fn default_auth_port() -> u16 {
    1812 // Standard RADIUS authentication port
}

fn default_acct_port() -> u16 {
    1813 // Standard RADIUS accounting port
}

fn default_socket_timeout_ms() -> u64 {
    3000
}

fn default_duplicate_interval_ms() -> u64 {
    30000
}

impl Default for Config {
    fn default() -> Self {
        Config {
            listen_address: default_listen_address(),
            auth_port: default_auth_port(),
            acct_port: default_acct_port(),
            socket_timeout_ms: default_socket_timeout_ms(),
            duplicate_interval_ms: default_duplicate_interval_ms(),
            log_level: None,
            clients: vec![],
            users: vec![],
        }
    }
}

impl Config {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    pub fn listen_ip(&self) -> Result<IpAddr, ConfigError> {
        self.listen_address
            .parse()
            .map_err(|_| ConfigError::Invalid(format!("Invalid listen address: {}", self.listen_address)))
    }

    /// Runtime settings for [`RadiusServer`](crate::RadiusServer)
    pub fn server_config(&self) -> Result<ServerConfig, ConfigError> {
        Ok(ServerConfig {
            listen_address: self.listen_ip()?,
            auth_port: self.auth_port,
            acct_port: self.acct_port,
            socket_timeout: Duration::from_millis(self.socket_timeout_ms),
            duplicate_interval: Duration::from_millis(self.duplicate_interval_ms),
            ..ServerConfig::default()
        })
    }

    /// Find a client by source IP address
    ///
    /// Returns the first enabled client that matches the source IP.
    pub fn find_client(&self, source_ip: IpAddr) -> Option<&Client> {
        self.clients
            .iter()
            .filter(|client| client.enabled)
            .find(|client| matches!(client.matches(source_ip), Ok(true)))
    }

    pub fn find_user(&self, username: &str) -> Option<&User> {
        self.users.iter().find(|user| user.username == username)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.listen_ip()?;

        if self.auth_port == 0 || self.acct_port == 0 {
            return Err(ConfigError::Invalid("Port cannot be 0".to_string()));
        }
        if self.auth_port == self.acct_port {
            return Err(ConfigError::Invalid(format!(
                "Authentication and accounting ports are both {}",
                self.auth_port
            )));
        }
        if self.socket_timeout_ms == 0 {
            return Err(ConfigError::Invalid("socket_timeout_ms must be positive".to_string()));
        }
        if self.duplicate_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "duplicate_interval_ms must be positive".to_string(),
            ));
        }

        for client in &self.clients {
            if client.secret.is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "Client {} has empty secret",
                    client.address
                )));
            }
            // Validate that address can be parsed
            client.parse_network()?;
        }

        for user in &self.users {
            if user.username.is_empty() {
                return Err(ConfigError::Invalid("User has empty username".to_string()));
            }
        }

        Ok(())
    }

    /// Create an example configuration file
    pub fn example() -> Self {
        let mut admin_attributes = BTreeMap::new();
        admin_attributes.insert("Service-Type".to_string(), "Administrative-User".to_string());
        admin_attributes.insert("Session-Timeout".to_string(), "3600".to_string());

        Config {
            listen_address: "0.0.0.0".to_string(),
            auth_port: 1812,
            acct_port: 1813,
            socket_timeout_ms: 3000,
            duplicate_interval_ms: 30000,
            log_level: Some("info".to_string()),
            clients: vec![
                Client {
                    address: "192.168.1.0/24".to_string(),
                    secret: "client_secret_1".to_string(),
                    name: Some("Internal Network".to_string()),
                    enabled: true,
                },
                Client {
                    address: "127.0.0.1".to_string(),
                    secret: "testing123".to_string(),
                    name: Some("Localhost".to_string()),
                    enabled: true,
                },
            ],
            users: vec![
                User {
                    username: "admin".to_string(),
                    password: "admin123".to_string(),
                    attributes: admin_attributes,
                },
                User {
                    username: "user1".to_string(),
                    password: "password1".to_string(),
                    attributes: BTreeMap::new(),
                },
            ],
        }
    }
}
