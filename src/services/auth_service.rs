use async_trait::async_trait;
use http::StatusCode;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::errors::{AppError, AppResult};
use crate::models::user_model::{MeResponse, User};
use crate::services::api_client::ApiClient;

#[async_trait]
pub trait IdentityApi: Send + Sync {
    /// `Ok(None)` when the server does not recognise the session.
    async fn current_user(&self) -> AppResult<Option<User>>;
    async fn logout(&self) -> AppResult<()>;
}

pub struct AuthService {
    api: ApiClient,
}

impl AuthService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl IdentityApi for AuthService {
    async fn current_user(&self) -> AppResult<Option<User>> {
        let url = self.api.routes().current_user();
        let response = self.api.http().get(&url).send().await?;

        if matches!(
            response.status(),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN
        ) {
            return Ok(None);
        }

        let me: MeResponse = ApiClient::read_json(response, "Failed to load user").await?;
        Ok(Some(me.user))
    }

    async fn logout(&self) -> AppResult<()> {
        let url = self.api.routes().logout();
        let response = self.api.http().post(&url).send().await?;
        ApiClient::check(response, "Failed to log out").await?;
        Ok(())
    }
}

/// The one place screens read the signed-in user from.
#[derive(Clone)]
pub struct SessionContext {
    identity: Arc<dyn IdentityApi>,
    user: Arc<RwLock<Option<User>>>,
}

impl SessionContext {
    pub fn new(identity: Arc<dyn IdentityApi>) -> Self {
        Self {
            identity,
            user: Arc::new(RwLock::new(None)),
        }
    }

    /// Re-read the session from the server. On failure the previous user is kept.
    pub async fn refresh(&self) -> AppResult<Option<User>> {
        let user = self.identity.current_user().await.map_err(|e| {
            tracing::error!(error = %e, "Error fetching user");
            e
        })?;

        *self.user.write().await = user.clone();
        Ok(user)
    }

    /// Log out remotely and forget the local user, even if the request failed.
    pub async fn clear(&self) -> AppResult<()> {
        let result = self.identity.logout().await;
        *self.user.write().await = None;

        if let Err(e) = &result {
            tracing::warn!(error = %e, "Logout request failed; local session cleared anyway");
        }
        result
    }

    pub async fn current_user(&self) -> Option<User> {
        self.user.read().await.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.user.read().await.is_some()
    }

    pub async fn is_admin(&self) -> bool {
        self.user
            .read()
            .await
            .as_ref()
            .is_some_and(|u| u.is_admin())
    }

    pub async fn require_admin(&self) -> AppResult<User> {
        match self.current_user().await {
            None => Err(AppError::Unauthorized),
            Some(user) if user.is_admin() => Ok(user),
            Some(_) => Err(AppError::Forbidden("Admin access required".to_string())),
        }
    }
}
