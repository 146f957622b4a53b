//! Client retry and response validation against in-process UDP responders

use radius_client::{ClientError, RadiusClient};
use radius_proto::{Code, Codec, MemoryDictionary, Packet, PacketError};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::UdpSocket;

const SECRET: &str = "testing123";

fn test_codec() -> Codec {
    Codec::new(MemoryDictionary::standard().into_shared()).with_user_password_hook()
}

/// How the fake server answers
#[derive(Clone, Copy)]
enum Reply {
    Never,
    /// Answer Access-Accept starting with the n-th datagram
    AcceptFrom(usize),
    /// Answer with a response signed by the wrong secret
    WrongSecret,
    /// Accept only if the password matches
    CheckPassword(&'static str),
}

/// Spawn a UDP responder; returns its address and a counter of datagrams seen
async fn spawn_responder(reply: Reply) -> (SocketAddr, Arc<AtomicUsize>) {
    let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let addr = socket.local_addr().unwrap();
    let seen = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&seen);

    tokio::spawn(async move {
        let codec = test_codec();
        let mut buffer = vec![0u8; 4096];
        while let Ok((len, peer)) = socket.recv_from(&mut buffer).await {
            let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
            let request = codec.decode_request(&buffer[..len], SECRET.as_bytes(), None).unwrap();

            let (code, secret) = match reply {
                Reply::Never => continue,
                Reply::AcceptFrom(first) if n < first => continue,
                Reply::AcceptFrom(_) => (Code::AccessAccept, SECRET),
                Reply::WrongSecret => (Code::AccessAccept, "not-the-secret"),
                Reply::CheckPassword(expected) => {
                    let password = request.attribute_value("User-Password").unwrap();
                    if password.as_deref() == Some(expected) {
                        (Code::AccessAccept, SECRET)
                    } else {
                        (Code::AccessReject, SECRET)
                    }
                }
            };

            let mut answer = Packet::response_to(&request, code);
            let bytes = answer.encode_response(secret.as_bytes(), &request).unwrap();
            socket.send_to(&bytes, peer).await.unwrap();
        }
    });

    (addr, seen)
}

fn client_for(addr: SocketAddr) -> RadiusClient {
    let mut client =
        RadiusClient::new("127.0.0.1", SECRET, MemoryDictionary::standard().into_shared()).unwrap();
    client.set_auth_port(addr.port()).unwrap();
    client.set_acct_port(addr.port()).unwrap();
    client.set_socket_timeout(Duration::from_millis(150)).unwrap();
    client
}

#[tokio::test]
async fn test_silent_server_exhausts_retries() {
    let (addr, seen) = spawn_responder(Reply::Never).await;
    let client = client_for(addr);

    let mut request = client.new_request(Code::AccessRequest);
    request.add_attribute_str("User-Name", "alice").unwrap();
    let result = client.authenticate(&mut request).await;

    assert!(matches!(result, Err(ClientError::Timeout { attempts: 3 })));
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(seen.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_retry_count_is_honored() {
    let (addr, seen) = spawn_responder(Reply::Never).await;
    let mut client = client_for(addr);
    client.set_retry_count(5).unwrap();
    client.set_socket_timeout(Duration::from_millis(50)).unwrap();

    let mut request = client.new_request(Code::AccessRequest);
    let result = client.authenticate(&mut request).await;

    assert!(matches!(result, Err(ClientError::Timeout { attempts: 5 })));
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(seen.load(Ordering::SeqCst), 5);
}

#[tokio::test]
async fn test_reply_on_final_attempt_succeeds() {
    let (addr, seen) = spawn_responder(Reply::AcceptFrom(3)).await;
    let client = client_for(addr);

    let mut request = client.new_request(Code::AccessRequest);
    request.add_attribute_str("User-Name", "alice").unwrap();
    let response = client.authenticate(&mut request).await.unwrap();

    assert_eq!(response.code, Code::AccessAccept);
    assert_eq!(response.identifier, request.identifier);
    assert_eq!(seen.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_invalid_response_is_not_retried() {
    let (addr, seen) = spawn_responder(Reply::WrongSecret).await;
    let client = client_for(addr);

    let mut request = client.new_request(Code::AccessRequest);
    let result = client.authenticate(&mut request).await;

    assert!(matches!(
        result,
        Err(ClientError::Packet(PacketError::AuthenticatorMismatch(_)))
    ));
    assert_eq!(seen.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_authenticate_user() {
    let (addr, _) = spawn_responder(Reply::CheckPassword("wonderland")).await;
    let client = client_for(addr);

    assert!(client.authenticate_user("alice", "wonderland").await.unwrap());
    assert!(!client.authenticate_user("alice", "guess").await.unwrap());
}
