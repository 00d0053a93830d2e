use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_derive::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use super::error::FetchError;
use crate::config::ApiConfig;
use crate::model::{CorrelationId, Session};

/// Error body of the API. Either field may carry the message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ErrorEnvelope {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl ErrorEnvelope {
    pub fn message(&self) -> Option<&str> {
        self.error
            .as_deref()
            .filter(|m| !m.is_empty())
            .or_else(|| self.message.as_deref().filter(|m| !m.is_empty()))
    }

    /// A successful response that still carries an error: validation
    /// failures come back as `{"error": ...}` or `{"status": "error", ...}`.
    fn rejection(body: &Value) -> Option<String> {
        let object = body.as_object()?;
        let envelope: ErrorEnvelope = serde_json::from_value(body.clone()).ok()?;
        let flagged = matches!(object.get("error"), Some(Value::String(_)))
            || envelope.status.as_deref() == Some("error");
        if !flagged {
            return None;
        }
        Some(
            envelope
                .message()
                .unwrap_or("request rejected by server")
                .to_string(),
        )
    }
}

/// Authenticated JSON client shared by all services.
#[derive(Clone)]
pub struct FetchClient {
    http: reqwest::Client,
    base_url: Url,
    session: Session,
}

impl FetchClient {
    pub fn new(config: &ApiConfig, session: Session) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;
        Self::with_client(http, &config.base_url, session)
    }

    pub fn with_client(
        http: reqwest::Client,
        base_url: &str,
        session: Session,
    ) -> Result<Self, FetchError> {
        // `Url::join` drops the last segment unless the base ends with a slash
        let base_url = if base_url.ends_with('/') {
            Url::parse(base_url)?
        } else {
            Url::parse(&format!("{}/", base_url))?
        };
        Ok(Self {
            http,
            base_url,
            session,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub async fn get<T>(&self, path: &str, query: &[(&str, String)]) -> Result<T, FetchError>
    where
        T: DeserializeOwned,
    {
        let request = self.request(Method::GET, path)?.query(query);
        self.execute(Method::GET, path, request).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, FetchError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.request(Method::POST, path)?.json(body);
        self.execute(Method::POST, path, request).await
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T, FetchError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.request(Method::PUT, path)?.json(body);
        self.execute(Method::PUT, path, request).await
    }

    pub async fn patch<T>(&self, path: &str) -> Result<T, FetchError>
    where
        T: DeserializeOwned,
    {
        let request = self.request(Method::PATCH, path)?;
        self.execute(Method::PATCH, path, request).await
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, FetchError> {
        let url = self.base_url.join(path.trim_start_matches('/'))?;
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        CorrelationId::new().insert_into_header_map(&mut headers)?;

        let request = self.http.request(method, url).headers(headers);
        Ok(match self.session.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        })
    }

    async fn execute<T>(
        &self,
        method: Method,
        path: &str,
        request: RequestBuilder,
    ) -> Result<T, FetchError>
    where
        T: DeserializeOwned,
    {
        let request = request.build()?;
        let cid = CorrelationId::from_header_map(request.headers())
            .map(|cid| cid.to_string())
            .unwrap_or_default();
        debug!(method = %method, path, correlation_id = %cid, "sending request");

        let response = self.http.execute(request).await.map_err(|err| {
            warn!(method = %method, path, correlation_id = %cid, reason = %err, "request failed");
            FetchError::Transport(err)
        })?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let envelope: ErrorEnvelope = serde_json::from_slice(&bytes).unwrap_or_default();
            let message = envelope
                .message()
                .map(str::to_string)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("error").to_string());
            warn!(method = %method, path, correlation_id = %cid, status = status.as_u16(), %message, "request returned error status");
            return Err(FetchError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let body: Value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)?
        };
        if let Some(message) = ErrorEnvelope::rejection(&body) {
            warn!(method = %method, path, correlation_id = %cid, %message, "request rejected");
            return Err(FetchError::Rejected(message));
        }
        Ok(serde_json::from_value(body)?)
    }
}
