use http::{header, HeaderMap, HeaderValue};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::routes::ApiRoutes;

/// Error body the course API sends with non-2xx responses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// Shared HTTP client for the course API. Cookies are kept and sent with every request.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    routes: ApiRoutes,
}

impl ApiClient {
    pub fn new(config: &Config) -> AppResult<Self> {
        let mut headers = HeaderMap::new();
        if let Some(cookie) = &config.session_cookie {
            let value = HeaderValue::from_str(cookie)
                .map_err(|e| AppError::BadRequest(format!("Invalid SESSION_COOKIE: {}", e)))?;
            headers.insert(header::COOKIE, value);
        }

        let client = Client::builder()
            .cookie_store(true)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            routes: ApiRoutes::new(&config.api_base_url),
        })
    }

    pub fn http(&self) -> &Client {
        &self.client
    }

    pub fn routes(&self) -> &ApiRoutes {
        &self.routes
    }

    /// Pass 2xx responses through; turn anything else into `AppError::Api`, preferring the
    /// server's `message` and falling back to `fallback`.
    pub async fn check(response: Response, fallback: &str) -> AppResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.message)
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| fallback.to_string());

        tracing::warn!(status = status.as_u16(), message = %message, "API request failed");

        Err(AppError::Api {
            status: status.as_u16(),
            message,
        })
    }

    pub async fn read_json<T: DeserializeOwned>(response: Response, fallback: &str) -> AppResult<T> {
        let response = Self::check(response, fallback).await?;
        let body = response.text().await?;
        serde_json::from_str::<T>(&body).map_err(|e| {
            tracing::error!("Failed to parse response: {}", e);
            AppError::Decode(e)
        })
    }

    /// Like `read_json`, but a 2xx body that does not decode as `T` is `Ok(None)`.
    /// Used for mutations, where the status code already tells whether the change was stored.
    pub async fn read_json_if_present<T: DeserializeOwned>(
        response: Response,
        fallback: &str,
    ) -> AppResult<Option<T>> {
        let response = Self::check(response, fallback).await?;
        let status = response.status();
        let body = response.text().await?;
        match serde_json::from_str::<T>(&body) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                tracing::warn!(status = status.as_u16(), error = %e, "Unexpected success body; continuing");
                Ok(None)
            }
        }
    }
}
