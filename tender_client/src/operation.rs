use crate::error::{Error, Reject};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// A remote operation: its name on the wire plus argument and output types.
pub trait Operation {
    const NAME: &'static str;

    type Args: Serialize + DeserializeOwned + Send + Sync + 'static;
    type Output: Serialize + DeserializeOwned + Send + 'static;
}

/// Outcome of a remote call as it travels back over the transport.
pub type Reply = Result<Vec<u8>, Reject>;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    method: String,
    args: Vec<u8>,
}

impl Request {
    pub fn new<A: Serialize>(method: &str, args: &A) -> Result<Request, Error> {
        let args = bincode::serialize(args).map_err(Error::MsgBodySerFailed)?;
        Ok(Request {
            method: method.to_string(),
            args,
        })
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn args<A: DeserializeOwned>(&self) -> Result<A, Reject> {
        bincode::deserialize(&self.args).map_err(|err| {
            tracing::trace!(method = %self.method, %err, "rejecting undecodable arguments");
            Reject::invalid_args(&self.method, &err)
        })
    }
}

pub fn encode_reply<R: Serialize>(output: &R) -> Reply {
    bincode::serialize(output)
        .map_err(|err| Reject::operation_failed(format!("cannot encode reply: {err}")))
}

pub fn decode_reply<O: Operation>(reply: Reply) -> Result<O::Output, Error> {
    let body = reply.map_err(Error::Rejected)?;
    bincode::deserialize(&body).map_err(Error::MsgBodyDeserFailed)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::RejectCode;

    struct Greet;

    impl Operation for Greet {
        const NAME: &'static str = "greet";
        type Args = (String, u32);
        type Output = String;
    }

    #[test]
    fn request_carries_name_and_args() -> Result<(), Error> {
        let request = Request::new(Greet::NAME, &("ada".to_string(), 3u32))?;
        assert_eq!(request.method(), "greet");
        let args: <Greet as Operation>::Args = request.args().expect("args decode");
        assert_eq!(args, ("ada".to_string(), 3));
        Ok(())
    }

    #[test]
    fn truncated_args_are_rejected() -> Result<(), Error> {
        let request = Request::new(Greet::NAME, &("ada".to_string(),))?;
        let reject = request.args::<(String, u32)>().unwrap_err();
        assert_eq!(reject.code, RejectCode::InvalidArgs);
        Ok(())
    }

    #[test]
    fn rejected_reply_passes_through() {
        let reject = Reject::operation_failed("tender store is read-only");
        let err = decode_reply::<Greet>(Err(reject.clone())).unwrap_err();
        assert!(matches!(err, Error::Rejected(r) if r == reject));
    }

    #[test]
    fn encoded_reply_decodes() -> Result<(), Error> {
        let reply = encode_reply(&"hello".to_string());
        assert_eq!(decode_reply::<Greet>(reply)?, "hello");
        Ok(())
    }
}
