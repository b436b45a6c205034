use serde::{Deserialize, Serialize};
use std::fmt;
use std::io;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("outgoing connection error")]
    OutgoingConnectionError(#[source] io::Error),
    #[error("cannot read message raw data")]
    CannotReadMsgRawData(#[source] io::Error),
    #[error("cannot write message raw data")]
    CannotWriteMsgRawData(#[source] io::Error),
    #[error("message of {0} bytes exceeds the frame limit")]
    MsgTooLarge(u64),
    #[error("transport is out of sync after an earlier failure")]
    TransportBroken,
    #[error("message body serialization failed")]
    MsgBodySerFailed(#[source] bincode::Error),
    #[error("message body deserialization failed")]
    MsgBodyDeserFailed(#[source] bincode::Error),
    #[error("operation '{operation}' is not part of the '{service}' interface")]
    UnknownOperation { service: String, operation: String },
    #[error("remote operation rejected")]
    Rejected(#[source] Reject),
    #[error("remote call task aborted")]
    CallAborted(#[source] tokio::task::JoinError),
    #[error("cannot read {path}")]
    CannotReadFile {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("invalid endpoint configuration")]
    InvalidConfig(#[source] toml::de::Error),
    #[error("invalid interface description")]
    InvalidInterface(#[source] serde_json::Error),
}

/// Every failure of a remote call surfaces as this one type.
pub type RemoteCallError = Error;

impl Error {
    /// True when the peer closed the stream between two messages.
    pub fn is_disconnect(&self) -> bool {
        matches!(self, Error::CannotReadMsgRawData(e) if e.kind() == io::ErrorKind::UnexpectedEof)
    }
}

/// Failure reported by the remote side of a call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{code}: {message}")]
pub struct Reject {
    pub code: RejectCode,
    pub message: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectCode {
    UnknownMethod,
    InvalidArgs,
    OperationFailed,
}

impl fmt::Display for RejectCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            RejectCode::UnknownMethod => "unknown method",
            RejectCode::InvalidArgs => "invalid arguments",
            RejectCode::OperationFailed => "operation failed",
        };
        f.write_str(code)
    }
}

impl Reject {
    pub fn new(code: RejectCode, message: impl Into<String>) -> Reject {
        Reject {
            code,
            message: message.into(),
        }
    }

    pub fn unknown_method(method: &str) -> Reject {
        Reject::new(RejectCode::UnknownMethod, format!("no method named '{method}'"))
    }

    pub fn invalid_args(method: &str, err: &bincode::Error) -> Reject {
        Reject::new(
            RejectCode::InvalidArgs,
            format!("cannot decode arguments of '{method}': {err}"),
        )
    }

    pub fn operation_failed(message: impl Into<String>) -> Reject {
        Reject::new(RejectCode::OperationFailed, message)
    }
}
