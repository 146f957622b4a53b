use crate::config::Config;
use crate::server::ServerError;
use radius_proto::{copy_proxy_state, Code, Packet, StandardAttribute};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Request handler trait
///
/// Implement this trait to plug client lookup and request processing into
/// [`RadiusServer`](crate::RadiusServer). Handlers run on the receive loop
/// or on the configured runtime, so they must be `Send + Sync`.
pub trait RequestHandler: Send + Sync {
    /// Shared secret for a client
    ///
    /// `packet` is the request decoded without verification, for handlers
    /// that key secrets on NAS attributes. Returning `None` drops the
    /// datagram without an answer.
    fn shared_secret(&self, client: SocketAddr, packet: Option<&Packet>) -> Option<String>;

    /// Plaintext password of a user, used by the default Access-Request handling
    fn user_password(&self, _user_name: &str) -> Option<String> {
        None
    }

    /// Answer an Access-Request; `None` sends nothing
    ///
    /// The default accepts when the User-Password matches
    /// [`RequestHandler::user_password`] and rejects otherwise.
    fn on_access_request(
        &self,
        request: &Packet,
        _client: SocketAddr,
    ) -> Result<Option<Packet>, ServerError> {
        access_response(self, request).map(Some)
    }

    /// Answer an Accounting-Request; `None` sends nothing
    ///
    /// The default acknowledges with an Accounting-Response.
    fn on_accounting_request(
        &self,
        request: &Packet,
        _client: SocketAddr,
    ) -> Result<Option<Packet>, ServerError> {
        let mut answer = Packet::response_to(request, Code::AccountingResponse);
        copy_proxy_state(request, &mut answer)?;
        Ok(Some(answer))
    }
}

/// Text of the single standard attribute of a type
fn text_attribute(request: &Packet, attribute: StandardAttribute) -> Result<Option<String>, ServerError> {
    Ok(request
        .find_attribute(attribute.as_u8())?
        .map(|a| a.payload().map(|p| String::from_utf8_lossy(&p).into_owned()))
        .transpose()?)
}

/// Access-Accept if the request's User-Password matches the handler's
/// password for User-Name, Access-Reject otherwise; Proxy-State is copied
pub fn access_response<H: RequestHandler + ?Sized>(
    handler: &H,
    request: &Packet,
) -> Result<Packet, ServerError> {
    let user_name = text_attribute(request, StandardAttribute::UserName)?;
    let password = text_attribute(request, StandardAttribute::UserPassword)?;

    let expected = user_name.as_deref().and_then(|name| handler.user_password(name));
    let accepted = match (&expected, &password) {
        (Some(expected), Some(password)) => expected == password,
        _ => false,
    };

    let code = if accepted {
        Code::AccessAccept
    } else {
        Code::AccessReject
    };
    let mut answer = Packet::response_to(request, code);
    copy_proxy_state(request, &mut answer)?;

    debug!(
        user = user_name.as_deref().unwrap_or(""),
        request_id = request.identifier,
        packet_type = %code,
        "Access-Request processed"
    );
    Ok(answer)
}

/// Handler backed by the JSON configuration's clients and users
pub struct ConfigHandler {
    config: Arc<Config>,
}

impl ConfigHandler {
    pub fn new(config: Arc<Config>) -> Self {
        ConfigHandler { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl RequestHandler for ConfigHandler {
    fn shared_secret(&self, client: SocketAddr, _packet: Option<&Packet>) -> Option<String> {
        self.config.find_client(client.ip()).map(|c| c.secret.clone())
    }

    fn user_password(&self, user_name: &str) -> Option<String> {
        self.config.find_user(user_name).map(|u| u.password.clone())
    }

    fn on_access_request(
        &self,
        request: &Packet,
        client: SocketAddr,
    ) -> Result<Option<Packet>, ServerError> {
        let mut answer = access_response(self, request)?;

        if answer.code == Code::AccessAccept {
            let user = text_attribute(request, StandardAttribute::UserName)?
                .and_then(|name| self.config.find_user(&name));
            if let Some(user) = user {
                for (name, value) in &user.attributes {
                    if let Err(e) = answer.add_attribute_str(name, value) {
                        warn!(user = %user.username, attribute = %name, error = %e, "Skipping reply attribute");
                    }
                }
            }
        }

        info!(client_addr = %client, request_id = request.identifier, packet_type = %answer.code, "Answering Access-Request");
        Ok(Some(answer))
    }
}
