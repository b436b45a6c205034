use crate::error::Error;
use crate::interface::Interface;
use crate::operation::{self, Operation, Reply, Request};
use crate::transport::Transport;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

/// Handle to a remote service bound to one transport and one interface.
///
/// Clones share the transport; each request/reply exchange holds it for the
/// duration of the round trip.
pub struct Client<T> {
    transport: Arc<Mutex<T>>,
    interface: Arc<Interface>,
}

impl<T> Clone for Client<T> {
    fn clone(&self) -> Client<T> {
        Client {
            transport: self.transport.clone(),
            interface: self.interface.clone(),
        }
    }
}

impl<T> Client<T>
where
    T: Transport + Send + 'static,
{
    pub fn new(transport: T, interface: Interface) -> Client<T> {
        Client {
            transport: Arc::new(Mutex::new(transport)),
            interface: Arc::new(interface),
        }
    }

    pub fn interface(&self) -> &Interface {
        &self.interface
    }

    /// Issues `O` with `args` on a task of its own.
    ///
    /// Dropping the returned handle does not stop the call. Must be called
    /// from within a tokio runtime.
    pub fn call<O: Operation>(&self, args: O::Args) -> CallHandle<O::Output> {
        let transport = self.transport.clone();
        let interface = self.interface.clone();

        let join_handle = tokio::spawn(async move {
            interface.require(O::NAME)?;
            let request = Request::new(O::NAME, &args)?;

            tracing::debug!(
                service = interface.service(),
                operation = O::NAME,
                "calling remote operation"
            );
            let reply: Reply = transport.lock().await.send_receive(&request).await?;
            tracing::trace!(operation = O::NAME, rejected = reply.is_err(), "remote call finished");

            operation::decode_reply::<O>(reply)
        });

        CallHandle { join_handle }
    }
}

/// Result of a call that is still in flight.
pub struct CallHandle<R> {
    join_handle: JoinHandle<Result<R, Error>>,
}

impl<R> CallHandle<R> {
    pub fn is_finished(&self) -> bool {
        self.join_handle.is_finished()
    }
}

impl<R> Future for CallHandle<R> {
    type Output = Result<R, Error>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.join_handle)
            .poll(cx)
            .map(|joined| joined.unwrap_or_else(|err| Err(Error::CallAborted(err))))
    }
}
