//! Services exposed by the tender management canister.

mod auth;
mod tender;

pub use auth::{auth_service, AuthService, AuthServiceClient, LoginResult};
pub use tender::{tender_service, Tender, TenderService, TenderServiceClient, Timestamp};

use crate::agent::Agent;
use crate::client::Client;
use crate::config::EndpointConfig;
use crate::error::{Error, Reject};
use crate::interface::Interface;
use crate::operation::Request;
use crate::transport::{Bincode, Transport};
use tokio::net::TcpStream;

pub const CANISTER_NAME: &str = "tender_management";

/// Interface of the whole canister: the union of both services.
pub fn interface() -> Interface {
    Interface::new(CANISTER_NAME)
        .merge(auth_service::interface())
        .merge(tender_service::interface())
}

/// Both service clients over one shared transport.
pub struct TenderManagement<T> {
    pub auth: AuthServiceClient<T>,
    pub tenders: TenderServiceClient<T>,
}

impl<T> TenderManagement<T>
where
    T: Transport + Send + 'static,
{
    pub fn new(client: Client<T>) -> TenderManagement<T> {
        TenderManagement {
            auth: AuthServiceClient::new(client.clone()),
            tenders: TenderServiceClient::new(client),
        }
    }
}

impl TenderManagement<Bincode<TcpStream>> {
    /// Connects to the backend described by `config`.
    pub async fn connect(config: &EndpointConfig) -> Result<Self, Error> {
        let agent = Agent::new(config.clone());
        let interface = agent.interface(interface())?;
        let client = agent.connect(interface).await?;
        Ok(TenderManagement::new(client))
    }
}

/// Answers both services' requests on `transport` until the peer disconnects.
pub async fn serve<B, T>(backend: &B, transport: &mut T) -> Result<(), Error>
where
    B: AuthService + TenderService + Sync,
    T: Transport + Send,
{
    loop {
        let request: Request = match transport.receive().await {
            Ok(request) => request,
            Err(err) if err.is_disconnect() => return Ok(()),
            Err(err) => return Err(err),
        };
        tracing::trace!(method = request.method(), "dispatching request");

        let reply = match AuthService::dispatch(backend, &request).await {
            Some(reply) => reply,
            None => TenderService::dispatch(backend, &request)
                .await
                .unwrap_or_else(|| Err(Reject::unknown_method(request.method()))),
        };
        transport.send(&reply).await?;
    }
}
