use crate::error::{Error, Reject};
use crate::operation::{encode_reply, Operation, Reply, Request};
use crate::transport::Transport;

/// Receiving end of a transport, for backends that answer requests by hand
/// instead of through a `#[service]` trait.
pub struct Server<T> {
    transport: T,
}

impl<T> Server<T>
where
    T: Transport + Send,
{
    pub fn new(transport: T) -> Server<T> {
        Server { transport }
    }

    pub async fn next(&mut self) -> Result<(Request, RequestHandle<'_, T>), Error> {
        let request: Request = self.transport.receive().await?;
        tracing::trace!(method = request.method(), "received request");
        let handle = RequestHandle {
            transport: &mut self.transport,
        };
        Ok((request, handle))
    }

    pub fn into_inner(self) -> T {
        self.transport
    }
}

pub struct RequestHandle<'s, T> {
    transport: &'s mut T,
}

impl<'s, T> RequestHandle<'s, T>
where
    T: Transport + Send,
{
    pub async fn respond<O: Operation>(self, output: &O::Output) -> Result<(), Error> {
        self.reply(encode_reply(output)).await
    }

    pub async fn reject(self, reject: Reject) -> Result<(), Error> {
        self.reply(Err(reject)).await
    }

    async fn reply(self, reply: Reply) -> Result<(), Error> {
        self.transport.send(&reply).await
    }
}
