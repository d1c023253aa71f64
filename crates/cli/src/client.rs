//! Thin HTTP client for the StudyHelper JSON API.

use reqwest::{Method, RequestBuilder, Response};
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

use study_helper_server::middleware::IDENTITY_HEADER;

/// Errors returned by API calls.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request could not be sent or the response could not be read.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with an error status.
    #[error("{status}: {message}")]
    Api {
        status: u16,
        message: String,
        /// Offending fields for validation failures, `field: message` each.
        fields: Vec<String>,
    },
}

/// API client bound to one server and, optionally, one identity.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    identity: Option<String>,
}

impl ApiClient {
    /// Create a client for the server at `base_url`.
    #[must_use]
    pub fn new(base_url: &str, identity: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_owned(),
            identity,
        }
    }

    /// GET `path` and decode the JSON response.
    ///
    /// # Errors
    ///
    /// Returns `ClientError` on transport failure or an error status.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        decode(self.request(Method::GET, path).send().await?).await
    }

    /// POST `body` as JSON to `path` and decode the JSON response.
    ///
    /// # Errors
    ///
    /// Returns `ClientError` on transport failure or an error status.
    pub async fn post<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        decode(self.request(Method::POST, path).json(body).send().await?).await
    }

    /// PATCH `body` as JSON to `path` and decode the JSON response.
    ///
    /// # Errors
    ///
    /// Returns `ClientError` on transport failure or an error status.
    pub async fn patch<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        decode(self.request(Method::PATCH, path).json(body).send().await?).await
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self
            .http
            .request(method, format!("{}{path}", self.base_url));
        match &self.identity {
            Some(uid) => builder.header(IDENTITY_HEADER, uid),
            None => builder,
        }
    }
}

#[derive(serde::Deserialize)]
struct ErrorBody {
    message: String,
    #[serde(default)]
    errors: Vec<FieldError>,
}

#[derive(serde::Deserialize)]
struct FieldError {
    field: String,
    message: String,
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }

    let text = response.text().await?;
    let (message, fields) = match serde_json::from_str::<ErrorBody>(&text) {
        Ok(body) => (
            body.message,
            body.errors
                .into_iter()
                .map(|e| format!("{}: {}", e.field, e.message))
                .collect(),
        ),
        Err(_) => (text, Vec::new()),
    };
    Err(ClientError::Api {
        status: status.as_u16(),
        message,
        fields,
    })
}
