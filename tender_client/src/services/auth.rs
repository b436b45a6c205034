use serde::{Deserialize, Serialize};

/// What the backend answers to a login attempt.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoginResult {
    /// Session token issued by the backend.
    Ok(String),
    Err(String),
}

#[crate::service]
pub trait AuthService {
    async fn login(&self, username: String, password: String) -> LoginResult;

    /// `role` is passed through as given; the backend decides what it accepts.
    async fn register(&self, username: String, password: String, role: String);
}
