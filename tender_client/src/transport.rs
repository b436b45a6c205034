use crate::error::Error;
use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Largest message body accepted on receive.
pub const MAX_FRAME_LEN: u64 = 16 * 1024 * 1024;

#[async_trait]
pub trait Transport {
    async fn receive<T: DeserializeOwned + Send>(&mut self) -> Result<T, Error>;

    async fn send<T: Serialize + Sync>(&mut self, data: &T) -> Result<(), Error>;

    async fn send_receive<In, Out>(&mut self, input: &In) -> Result<Out, Error>
    where
        In: Serialize + Sync,
        Out: DeserializeOwned + Send,
    {
        self.send(input).await?;
        self.receive().await
    }
}

/// Receive buffer capacity kept between frames.
const RETAINED_BUF_LEN: usize = 64 * 1024;

/// Length-prefixed bincode frames over a byte stream.
///
/// Any I/O failure or refused frame leaves the stream at an unknown offset,
/// so the transport is marked broken and every later call fails with
/// `Error::TransportBroken`.
pub struct Bincode<S> {
    stream: S,
    data_buf: Vec<u8>,
    broken: bool,
}

impl<S> Bincode<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    pub fn new(stream: S) -> Bincode<S> {
        Bincode {
            stream,
            data_buf: Vec::new(),
            broken: false,
        }
    }

    pub fn is_broken(&self) -> bool {
        self.broken
    }

    pub fn into_inner(self) -> S {
        self.stream
    }

    fn ensure_usable(&self) -> Result<(), Error> {
        if self.broken {
            return Err(Error::TransportBroken);
        }
        Ok(())
    }

    fn poison<T>(&mut self, result: Result<T, Error>) -> Result<T, Error> {
        if result.is_err() {
            self.broken = true;
        }
        result
    }

    async fn read_frame(&mut self) -> Result<(), Error> {
        let size = self
            .stream
            .read_u64()
            .await
            .map_err(Error::CannotReadMsgRawData)?;
        if size > MAX_FRAME_LEN {
            return Err(Error::MsgTooLarge(size));
        }
        self.data_buf.resize(size as usize, 0);
        self.stream
            .read_exact(&mut self.data_buf)
            .await
            .map_err(Error::CannotReadMsgRawData)?;
        Ok(())
    }

    async fn write_frame(&mut self, body: &[u8]) -> Result<(), Error> {
        self.stream
            .write_u64(body.len() as u64)
            .await
            .map_err(Error::CannotWriteMsgRawData)?;
        self.stream
            .write_all(body)
            .await
            .map_err(Error::CannotWriteMsgRawData)?;
        self.stream
            .flush()
            .await
            .map_err(Error::CannotWriteMsgRawData)
    }
}

#[async_trait]
impl<S> Transport for Bincode<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    async fn receive<T: DeserializeOwned + Send>(&mut self) -> Result<T, Error> {
        self.ensure_usable()?;
        let read = self.read_frame().await;
        self.poison(read)?;

        // A fully read frame that fails to decode leaves the stream aligned.
        let data = bincode::deserialize(&self.data_buf).map_err(Error::MsgBodyDeserFailed);
        if self.data_buf.capacity() > RETAINED_BUF_LEN {
            self.data_buf = Vec::new();
        }
        data
    }

    async fn send<T: Serialize + Sync>(&mut self, data: &T) -> Result<(), Error> {
        self.ensure_usable()?;
        let body = bincode::serialize(data).map_err(Error::MsgBodySerFailed)?;
        let written = self.write_frame(&body).await;
        self.poison(written)
    }
}
