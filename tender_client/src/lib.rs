//! Async client for the tender management backend.
//!
//! A remote service is declared as a trait annotated with [`service`]; the
//! macro generates a typed client with one async method per operation. The
//! two services the backend exposes live in [`services`].

extern crate self as tender_client;

pub mod agent;
pub mod client;
pub mod config;
pub mod error;
pub mod interface;
pub mod operation;
pub mod server;
pub mod services;
pub mod transport;

pub use crate::agent::Agent;
pub use crate::client::{CallHandle, Client};
pub use crate::config::EndpointConfig;
pub use crate::error::{Error, Reject, RejectCode, RemoteCallError};
pub use crate::interface::{Interface, Signature};
pub use crate::operation::{Operation, Reply, Request};
pub use crate::transport::{Bincode, Transport};
pub use async_trait::async_trait;
pub use tender_client_attrs::service;
