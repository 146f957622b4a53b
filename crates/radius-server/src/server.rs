use crate::cache::{duplicate_key, DuplicateCache};
use crate::handler::RequestHandler;
use radius_proto::{Code, Codec, Dictionary, Packet, PacketError};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::net::UdpSocket;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

/// Secret used to read a datagram's header before the client is known
const PLACEHOLDER_SECRET: &[u8] = b"1234567890";

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Packet error: {0}")]
    Packet(#[from] PacketError),
    #[error("Unsupported packet type {code} on port {port}")]
    UnsupportedPacket { code: Code, port: u16 },
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Where decoded requests are processed
#[derive(Debug, Clone, Default)]
pub enum Dispatch {
    /// On the receive loop itself; the next datagram waits for the handler
    #[default]
    Inline,
    /// On the blocking pool of the given runtime, so the receive loop keeps
    /// reading while a handler runs
    Runtime(Handle),
}

/// RADIUS server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address both sockets bind to
    pub listen_address: IpAddr,
    /// Authentication port; 0 lets the OS pick one
    pub auth_port: u16,
    /// Accounting port; 0 lets the OS pick one
    pub acct_port: u16,
    /// Longest a receive loop blocks before checking for shutdown
    pub socket_timeout: Duration,
    /// Window within which a retransmitted request is ignored
    pub duplicate_interval: Duration,
    pub dispatch: Dispatch,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            listen_address: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            auth_port: 1812,
            acct_port: 1813,
            socket_timeout: Duration::from_millis(3000),
            duplicate_interval: Duration::from_millis(30000),
            dispatch: Dispatch::Inline,
        }
    }
}

impl ServerConfig {
    pub fn new(listen_address: IpAddr) -> Self {
        ServerConfig {
            listen_address,
            ..ServerConfig::default()
        }
    }

    pub fn validate(&self) -> Result<(), ServerError> {
        if self.auth_port != 0 && self.auth_port == self.acct_port {
            return Err(ServerError::Configuration(format!(
                "authentication and accounting ports are both {}",
                self.auth_port
            )));
        }
        if self.socket_timeout.is_zero() {
            return Err(ServerError::Configuration(
                "socket timeout must be positive".to_string(),
            ));
        }
        if self.duplicate_interval.is_zero() {
            return Err(ServerError::Configuration(
                "duplicate interval must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// State shared by both receive loops and any dispatched tasks
struct Inner {
    config: ServerConfig,
    codec: Codec,
    handler: Arc<dyn RequestHandler>,
    duplicates: DuplicateCache,
    auth_port: u16,
    acct_port: u16,
}

/// RADIUS server listening on an authentication and an accounting port
///
/// ```rust,no_run
/// use radius_proto::MemoryDictionary;
/// use radius_server::{Config, ConfigHandler, RadiusServer, ServerConfig};
/// use std::sync::Arc;
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let handler = Arc::new(ConfigHandler::new(Arc::new(Config::example())));
/// let server = RadiusServer::bind(
///     ServerConfig::new("0.0.0.0".parse()?),
///     MemoryDictionary::standard().into_shared(),
///     handler,
/// )
/// .await?;
/// server.start(true, true)?;
/// tokio::signal::ctrl_c().await?;
/// server.stop();
/// server.join().await;
/// # Ok(())
/// # }
/// ```
pub struct RadiusServer {
    inner: Arc<Inner>,
    auth_addr: SocketAddr,
    acct_addr: SocketAddr,
    sockets: Mutex<Option<(UdpSocket, UdpSocket)>>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
    shutdown: watch::Sender<bool>,
}

impl RadiusServer {
    /// Bind both sockets; nothing is received until [`RadiusServer::start`]
    pub async fn bind(
        config: ServerConfig,
        dictionary: Arc<dyn Dictionary>,
        handler: Arc<dyn RequestHandler>,
    ) -> Result<Self, ServerError> {
        config.validate()?;

        let auth_socket = UdpSocket::bind(SocketAddr::new(config.listen_address, config.auth_port)).await?;
        let acct_socket = UdpSocket::bind(SocketAddr::new(config.listen_address, config.acct_port)).await?;
        let auth_addr = auth_socket.local_addr()?;
        let acct_addr = acct_socket.local_addr()?;
        info!(auth_addr = %auth_addr, acct_addr = %acct_addr, "RADIUS server bound");

        let (shutdown, _) = watch::channel(false);
        let inner = Inner {
            codec: Codec::new(dictionary).with_user_password_hook(),
            handler,
            duplicates: DuplicateCache::new(config.duplicate_interval),
            auth_port: auth_addr.port(),
            acct_port: acct_addr.port(),
            config,
        };

        Ok(RadiusServer {
            inner: Arc::new(inner),
            auth_addr,
            acct_addr,
            sockets: Mutex::new(Some((auth_socket, acct_socket))),
            tasks: Mutex::new(Vec::new()),
            shutdown,
        })
    }

    pub fn auth_addr(&self) -> SocketAddr {
        self.auth_addr
    }

    pub fn acct_addr(&self) -> SocketAddr {
        self.acct_addr
    }

    /// Spawn the receive loop for each selected port
    ///
    /// Must be called from within a tokio runtime. A socket that is not
    /// selected is closed.
    pub fn start(&self, listen_auth: bool, listen_acct: bool) -> Result<(), ServerError> {
        if !listen_auth && !listen_acct {
            return Err(ServerError::Configuration("no port selected".to_string()));
        }
        if *self.shutdown.borrow() {
            return Err(ServerError::Configuration("server is stopped".to_string()));
        }
        let (auth_socket, acct_socket) = lock(&self.sockets)
            .take()
            .ok_or_else(|| ServerError::Configuration("server already started".to_string()))?;

        let mut tasks = lock(&self.tasks);
        for (listen, socket) in [(listen_auth, auth_socket), (listen_acct, acct_socket)] {
            if !listen {
                continue;
            }
            let inner = Arc::clone(&self.inner);
            let shutdown = self.shutdown.subscribe();
            tasks.push(tokio::spawn(receive_loop(inner, Arc::new(socket), shutdown)));
        }
        info!(listen_auth, listen_acct, "RADIUS server started");
        Ok(())
    }

    /// Ask both receive loops to exit; later calls do nothing
    pub fn stop(&self) {
        if self.shutdown.send_replace(true) {
            return;
        }
        // Sockets of a server that never started are closed here
        lock(&self.sockets).take();
        info!("RADIUS server stopping");
    }

    /// Wait for the receive loops to exit
    pub async fn join(&self) {
        let tasks: Vec<_> = lock(&self.tasks).drain(..).collect();
        for task in tasks {
            if let Err(e) = task.await {
                error!(error = %e, "Receive loop failed");
            }
        }
    }
}

impl Drop for RadiusServer {
    fn drop(&mut self) {
        self.shutdown.send_replace(true);
    }
}

async fn receive_loop(inner: Arc<Inner>, socket: Arc<UdpSocket>, mut shutdown: watch::Receiver<bool>) {
    let local_port = match socket.local_addr() {
        Ok(addr) => addr.port(),
        Err(e) => {
            error!(error = %e, "Socket has no local address");
            return;
        }
    };
    debug!(port = local_port, "Receive loop started");
    let mut buffer = vec![0u8; Packet::MAX_PACKET_SIZE];

    loop {
        if *shutdown.borrow() {
            break;
        }

        let received = tokio::select! {
            _ = shutdown.changed() => break,
            received = timeout(inner.config.socket_timeout, socket.recv_from(&mut buffer)) => received,
        };

        let (len, client) = match received {
            Err(_) => continue,
            Ok(Err(e)) => {
                if *shutdown.borrow() {
                    break;
                }
                warn!(port = local_port, error = %e, "Receive failed");
                continue;
            }
            Ok(Ok(received)) => received,
        };
        debug!(client_addr = %client, port = local_port, bytes = len, "Received datagram");

        let data = buffer[..len].to_vec();
        let received_at = Instant::now();
        match &inner.config.dispatch {
            Dispatch::Inline => {
                let outcome = inner.handle_datagram(&data, client, local_port, received_at);
                reply(outcome, client, &socket, local_port).await;
            }
            Dispatch::Runtime(handle) => {
                // Handlers are blocking calls
                let job = Arc::clone(&inner);
                let socket = Arc::clone(&socket);
                let pool = handle.clone();
                handle.spawn(async move {
                    let outcome = pool
                        .spawn_blocking(move || job.handle_datagram(&data, client, local_port, received_at))
                        .await;
                    match outcome {
                        Ok(outcome) => reply(outcome, client, &socket, local_port).await,
                        Err(e) => error!(client_addr = %client, error = %e, "Request task failed"),
                    }
                });
            }
        }
    }

    debug!(port = local_port, "Receive loop stopped");
}

/// Send the answer for one datagram; errors stay with the datagram that caused them
async fn reply(
    outcome: Result<Option<Vec<u8>>, ServerError>,
    client: SocketAddr,
    socket: &UdpSocket,
    local_port: u16,
) {
    match outcome {
        Ok(Some(reply)) => match socket.send_to(&reply, client).await {
            Ok(_) => debug!(client_addr = %client, bytes = reply.len(), "Sent response"),
            Err(e) => warn!(client_addr = %client, error = %e, "Failed to send response"),
        },
        Ok(None) => {}
        Err(e) => warn!(client_addr = %client, port = local_port, error = %e, "Dropped request"),
    }
}

impl Inner {
    fn handle_datagram(
        &self,
        data: &[u8],
        client: SocketAddr,
        local_port: u16,
        now: Instant,
    ) -> Result<Option<Vec<u8>>, ServerError> {
        let header = self
            .codec
            .decode_request(data, PLACEHOLDER_SECRET, Some(Code::Reserved))?;

        let secret = match self.handler.shared_secret(client, Some(&header)) {
            Some(secret) => secret,
            None => {
                info!(client_addr = %client, request_id = header.identifier, "Ignoring request from unknown client");
                return Ok(None);
            }
        };

        let request = self.codec.decode_request(data, secret.as_bytes(), None)?;

        if self.duplicates.check_and_insert(duplicate_key(client.ip(), &request), now) {
            info!(client_addr = %client, request_id = request.identifier, "Ignoring duplicate request");
            return Ok(None);
        }

        debug!(
            client_addr = %client,
            request_id = request.identifier,
            packet_type = %request.code,
            "Dispatching request"
        );

        let answer = if local_port == self.auth_port && request.code == Code::AccessRequest {
            self.handler.on_access_request(&request, client)?
        } else if local_port == self.acct_port && request.code == Code::AccountingRequest {
            self.handler.on_accounting_request(&request, client)?
        } else {
            return Err(ServerError::UnsupportedPacket {
                code: request.code,
                port: local_port,
            });
        };

        match answer {
            Some(mut answer) => Ok(Some(answer.encode_response(secret.as_bytes(), &request)?)),
            None => {
                debug!(client_addr = %client, request_id = request.identifier, "Handler sent no answer");
                Ok(None)
            }
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
