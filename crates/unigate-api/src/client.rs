// Async HTTP client for the UniGate REST API.
//
// Base path: /api/
// Auth: bearer token, attached by `RequestAuthenticator` middleware
//
// Endpoint callers live in `crate::endpoints` as inherent methods so this
// module stays focused on transport mechanics.

use std::sync::Arc;

use bytes::Bytes;
use reqwest::StatusCode;
use reqwest::header::CONTENT_TYPE;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::credentials::CredentialStore;
use crate::error::Error;
use crate::middleware::{Middleware, RequestAuthenticator, UnauthorizedHandler};
use crate::token_cache::TokenCache;
use crate::transport::TransportConfig;

const PREVIEW_LEN: usize = 200;

// ── Error response shape ────────────────────────────────────────────

/// Failure bodies come back either as `{ "message": ... }` or as an
/// ASP.NET problem-details document with `title` and `errors`.
#[derive(serde::Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    errors: Option<serde_json::Value>,
}

/// A downloaded binary payload and the content type the server declared.
#[derive(Debug, Clone)]
pub struct Download {
    pub content_type: String,
    pub bytes: Bytes,
}

// ── Client ──────────────────────────────────────────────────────────

/// Async client for the UniGate API.
///
/// Every call goes through the registered [`Middleware`] chain: request
/// hooks run in registration order before the request is sent, response
/// hooks run on the raw response before it is decoded.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    middleware: Vec<Arc<dyn Middleware>>,
}

impl ApiClient {
    // ── Constructors ────────────────────────────────────────────────

    /// Build an unauthenticated client from a base URL and transport config.
    pub fn new(base_url: &str, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::with_client(http, base_url)
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: &str) -> Result<Self, Error> {
        Ok(Self {
            http,
            base_url: Self::normalize_base_url(base_url)?,
            middleware: Vec::new(),
        })
    }

    /// Build the standard client: bearer auth from `cache`, and `store`
    /// cleared whenever the server answers 401.
    pub fn authenticated(
        base_url: &str,
        transport: &TransportConfig,
        cache: TokenCache,
        store: Arc<dyn CredentialStore>,
    ) -> Result<Self, Error> {
        Ok(Self::new(base_url, transport)?
            .with_middleware(RequestAuthenticator::new(cache))
            .with_middleware(UnauthorizedHandler::new(store)))
    }

    /// Append a middleware to the chain.
    pub fn with_middleware(mut self, middleware: impl Middleware + 'static) -> Self {
        self.middleware.push(Arc::new(middleware));
        self
    }

    /// The normalized API root, always ending in `/api/`.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Accepts `https://host`, `https://host/api` or `https://host/api/`
    /// and yields `https://host/api/`.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        let path = url.path().trim_end_matches('/').to_owned();

        if path.ends_with("/api") {
            url.set_path(&format!("{path}/"));
        } else {
            url.set_path(&format!("{path}/api/"));
        }
        Ok(url)
    }

    // ── URL builder ─────────────────────────────────────────────────

    /// Join a relative path (e.g. `"accessrule/my"`) onto the API root.
    fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    // ── Dispatch ────────────────────────────────────────────────────

    async fn send(&self, builder: reqwest::RequestBuilder) -> Result<reqwest::Response, Error> {
        let mut request = builder.build()?;
        for layer in &self.middleware {
            layer.on_request(&mut request);
        }

        let resp = self.http.execute(request).await?;
        for layer in &self.middleware {
            layer.on_response(&resp);
        }
        Ok(resp)
    }

    // ── HTTP verbs ──────────────────────────────────────────────────

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url}");

        let resp = self.send(self.http.get(url)).await?;
        Self::handle_response(resp).await
    }

    pub(crate) async fn get_with_params<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url} params={params:?}");

        let resp = self.send(self.http.get(url).query(params)).await?;
        Self::handle_response(resp).await
    }

    pub(crate) async fn get_bytes(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<Download, Error> {
        let url = self.url(path)?;
        debug!("GET {url} params={params:?} (binary)");

        let resp = self.send(self.http.get(url).query(params)).await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(Self::parse_error(status, resp).await);
        }

        let content_type = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("application/octet-stream")
            .to_owned();
        let bytes = resp.bytes().await?;
        Ok(Download {
            content_type,
            bytes,
        })
    }

    pub(crate) async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("POST {url}");

        let resp = self.send(self.http.post(url).json(body)).await?;
        Self::handle_response(resp).await
    }

    pub(crate) async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("POST {url} (multipart)");

        let resp = self.send(self.http.post(url).multipart(form)).await?;
        Self::handle_response(resp).await
    }

    pub(crate) async fn post_text<B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<String, Error> {
        let url = self.url(path)?;
        debug!("POST {url}");

        let resp = self.send(self.http.post(url).json(body)).await?;
        Self::handle_text(resp).await
    }

    pub(crate) async fn post_no_response<B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), Error> {
        let url = self.url(path)?;
        debug!("POST {url}");

        let resp = self.send(self.http.post(url).json(body)).await?;
        Self::handle_empty(resp).await
    }

    pub(crate) async fn put_text<B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<String, Error> {
        let url = self.url(path)?;
        debug!("PUT {url}");

        let resp = self.send(self.http.put(url).json(body)).await?;
        Self::handle_text(resp).await
    }

    pub(crate) async fn put_no_response<B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), Error> {
        let url = self.url(path)?;
        debug!("PUT {url}");

        let resp = self.send(self.http.put(url).json(body)).await?;
        Self::handle_empty(resp).await
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<(), Error> {
        let url = self.url(path)?;
        debug!("DELETE {url}");

        let resp = self.send(self.http.delete(url)).await?;
        Self::handle_empty(resp).await
    }

    // ── Response handling ───────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            serde_json::from_str(&body).map_err(|e| Error::Deserialization {
                message: format!("{e} (body preview: {:?})", preview(&body)),
                body,
            })
        } else {
            Err(Self::parse_error(status, resp).await)
        }
    }

    async fn handle_empty(resp: reqwest::Response) -> Result<(), Error> {
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(Self::parse_error(status, resp).await)
        }
    }

    /// Message-returning endpoints answer with either a bare text body or
    /// a JSON string literal; both come back as plain text.
    async fn handle_text(resp: reqwest::Response) -> Result<String, Error> {
        let status = resp.status();
        if !status.is_success() {
            return Err(Self::parse_error(status, resp).await);
        }

        let body = resp.text().await?;
        Ok(serde_json::from_str::<String>(&body).unwrap_or(body))
    }

    async fn parse_error(status: StatusCode, resp: reqwest::Response) -> Error {
        let raw = resp.text().await.unwrap_or_default();

        if status == StatusCode::UNAUTHORIZED {
            return Error::Unauthorized {
                message: if raw.trim().is_empty() {
                    "session rejected by server".into()
                } else {
                    preview(&raw).to_owned()
                },
            };
        }

        let message = match serde_json::from_str::<ErrorResponse>(&raw) {
            Ok(ErrorResponse {
                message: Some(message),
                ..
            }) => message,
            Ok(ErrorResponse {
                errors: Some(errors),
                ..
            }) => errors.to_string(),
            Ok(ErrorResponse {
                title: Some(title), ..
            }) => title,
            _ => match serde_json::from_str::<String>(&raw) {
                Ok(text) => text,
                Err(_) if raw.trim().is_empty() => status.to_string(),
                Err(_) => preview(&raw).to_owned(),
            },
        };

        Error::Api {
            status: status.as_u16(),
            message,
        }
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .field("middleware", &self.middleware.len())
            .finish_non_exhaustive()
    }
}

/// First [`PREVIEW_LEN`] characters of `body`, cut on a char boundary.
fn preview(body: &str) -> &str {
    match body.char_indices().nth(PREVIEW_LEN) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}
