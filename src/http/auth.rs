//! Thin wrappers over the backend's session endpoints.
//!
//! They exist so the [`SessionGuard`] always reflects what the backend said;
//! the protocol itself (cookies, token lifetime) is owned by the backend.

use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use super::client::{ApiClient, ApiRequest};
use super::error::ApiError;
use crate::model::SessionUser;

#[derive(Debug, Serialize)]
struct Credentials<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    user: SessionUser,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VerifyResponse {
    #[serde(default)]
    is_authenticated: bool,
    user: Option<SessionUser>,
}

/// Login, logout and session verification.
#[derive(Clone)]
pub struct AuthApi {
    client: ApiClient,
}

impl AuthApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    #[instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> Result<SessionUser, ApiError> {
        let request = ApiRequest::post("/login").with_json(&Credentials { username, password })?;
        let response = self.client.send_credentials(request).await?;
        let LoginResponse { user } = serde_json::from_slice(&response.body)?;
        self.client.session().sign_in(user.clone());
        Ok(user)
    }

    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<(), ApiError> {
        let result = self.client.send(ApiRequest::post("/logout")).await;
        // The local session ends even if the backend call failed.
        self.client.session().sign_out();
        result.map(|_| ())
    }

    /// Resolves the pending auth check. A 401 here means "not logged in" and is
    /// reported as `Ok(None)`.
    #[instrument(skip(self))]
    pub async fn verify(&self) -> Result<Option<SessionUser>, ApiError> {
        let session = self.client.session();
        session.begin_check();
        match self.client.send_json::<VerifyResponse>(ApiRequest::get("/verify_auth")).await {
            Ok(VerifyResponse { is_authenticated: true, user: Some(user) }) => {
                session.sign_in(user.clone());
                Ok(Some(user))
            }
            Ok(_) | Err(ApiError::Auth) => {
                info!("No active session");
                session.sign_out();
                Ok(None)
            }
            Err(e) => {
                warn!(error = %e, "Session verification failed");
                session.sign_out();
                Err(e)
            }
        }
    }
}
