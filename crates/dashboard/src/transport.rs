use async_trait::async_trait;
use http::Extensions;
use reqwest::{
    header::{HeaderValue, InvalidHeaderValue, AUTHORIZATION},
    Client, Request, Response, StatusCode,
};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware, Middleware, Next};
use serde_json::Value;
use slog::{debug, Logger};
use std::time::Duration;

/// Token issuance endpoint; the only request sent without credentials.
pub const TOKEN_ENDPOINT: &str = "/auth/token";

#[derive(thiserror::Error, Debug)]
pub enum TransportError {
    #[error("request to {path} failed: {source}")]
    Request {
        path: String,
        #[source]
        source: reqwest_middleware::Error,
    },
    #[error("{path} responded with {status}")]
    Status { path: String, status: StatusCode },
    #[error("failed to decode body from {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: reqwest::Error,
    },
}

/// JSON-over-HTTP GET used by the data gateway.
///
/// `path` is relative to the API root (e.g. `/dashboard/maior-consumidor`).
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get_json(&self, path: &str, query: &[(String, String)])
        -> Result<Value, TransportError>;
}

/// Attaches `Authorization: Bearer <token>` to everything but [`TOKEN_ENDPOINT`].
pub struct BearerAuth {
    header: Option<HeaderValue>,
}

impl BearerAuth {
    pub fn new(token: Option<&str>) -> Result<Self, InvalidHeaderValue> {
        let header = match token {
            Some(token) => {
                let mut value = HeaderValue::from_str(&format!("Bearer {}", token))?;
                value.set_sensitive(true);
                Some(value)
            }
            None => None,
        };
        Ok(Self { header })
    }
}

#[async_trait]
impl Middleware for BearerAuth {
    async fn handle(
        &self,
        mut req: Request,
        extensions: &mut Extensions,
        next: Next<'_>,
    ) -> reqwest_middleware::Result<Response> {
        if let Some(header) = &self.header {
            if !req.url().path().ends_with(TOKEN_ENDPOINT) {
                req.headers_mut().insert(AUTHORIZATION, header.clone());
            }
        }
        next.run(req, extensions).await
    }
}

pub struct HttpTransport {
    logger: Logger,
    base_url: String,
    client: ClientWithMiddleware,
}

impl HttpTransport {
    pub fn new(
        logger: Logger,
        base_url: &str,
        token: Option<&str>,
        user_agent: &str,
        timeout: Duration,
    ) -> Result<Self, anyhow::Error> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;
        let client = ClientBuilder::new(client)
            .with(BearerAuth::new(token)?)
            .build();

        Ok(Self {
            logger,
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get_json(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> Result<Value, TransportError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(self.logger, "requesting: {} {:?}", url, query);

        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|source| TransportError::Request {
                path: path.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                path: path.to_string(),
                status,
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|source| TransportError::Decode {
                path: path.to_string(),
                source,
            })
    }
}
