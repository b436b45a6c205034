use crate::client::Client;
use crate::config::EndpointConfig;
use crate::error::Error;
use crate::interface::Interface;
use crate::transport::Bincode;
use tokio::net::TcpStream;

/// Opens transports to the configured backend.
#[derive(Clone, Debug, Default)]
pub struct Agent {
    config: EndpointConfig,
}

impl Agent {
    pub fn new(config: EndpointConfig) -> Agent {
        Agent { config }
    }

    pub fn config(&self) -> &EndpointConfig {
        &self.config
    }

    /// The configured interface artifact, or `default` when none is set.
    pub fn interface(&self, default: Interface) -> Result<Interface, Error> {
        match &self.config.interface {
            Some(path) => Interface::load(path),
            None => Ok(default),
        }
    }

    pub async fn connect(&self, interface: Interface) -> Result<Client<Bincode<TcpStream>>, Error> {
        let stream = TcpStream::connect(self.config.host.as_str())
            .await
            .map_err(Error::OutgoingConnectionError)?;
        stream
            .set_nodelay(true)
            .map_err(Error::OutgoingConnectionError)?;

        tracing::debug!(
            host = %self.config.host,
            service = interface.service(),
            "connected to backend"
        );
        Ok(Client::new(Bincode::new(stream), interface))
    }
}
