//! Chat-completions transport trait and reqwest-based HTTP implementation.

use std::time::{Duration, Instant};

use pcommon::BoxFuture;
use reqwest::Client;
use reqwest::header::{CONTENT_TYPE, USER_AGENT};

use crate::{ProviderError, RequestBody, ResponseBody, SecretString};

pub const DEFAULT_USER_AGENT: &str = concat!("parley/", env!("CARGO_PKG_VERSION"));
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(90);

const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Where a request goes and how it authenticates.
#[derive(Debug, Clone, Copy)]
pub struct Endpoint<'a> {
    pub url: &'a str,
    pub api_key: &'a SecretString,
}

impl<'a> Endpoint<'a> {
    pub fn new(url: &'a str, api_key: &'a SecretString) -> Self {
        Self { url, api_key }
    }
}

pub trait ChatTransport: Send + Sync + std::fmt::Debug {
    fn complete<'a>(
        &'a self,
        endpoint: Endpoint<'a>,
        request: RequestBody,
    ) -> BoxFuture<'a, Result<ResponseBody, ProviderError>>;
}

#[derive(Debug, Clone)]
pub struct HttpChatTransport {
    client: Client,
    user_agent: String,
}

impl HttpChatTransport {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    /// Builds a transport over a fresh client whose requests give up after
    /// `timeout`. `None` leaves requests unbounded.
    pub fn with_timeout(timeout: Option<Duration>) -> Result<Self, ProviderError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|err| ProviderError::transport(error_chain(&err)))?;

        Ok(Self::new(client))
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }
}

impl ChatTransport for HttpChatTransport {
    fn complete<'a>(
        &'a self,
        endpoint: Endpoint<'a>,
        request: RequestBody,
    ) -> BoxFuture<'a, Result<ResponseBody, ProviderError>> {
        Box::pin(async move {
            request.validate()?;
            let payload = request.to_json_bytes()?;
            let started = Instant::now();

            tracing::debug!(
                phase = "transport",
                event = "request_start",
                url = endpoint.url,
                model = %request.model,
                messages = request.messages.len(),
                bytes = payload.len()
            );

            let response = self
                .client
                .post(endpoint.url)
                .bearer_auth(endpoint.api_key.expose())
                .header(USER_AGENT, self.user_agent.as_str())
                .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
                .body(payload)
                .send()
                .await
                .map_err(map_send_error)?;

            let status = response.status();
            tracing::debug!(
                phase = "transport",
                event = "response_status",
                status = status.as_u16(),
                elapsed_ms = started.elapsed().as_millis() as u64
            );

            if !status.is_success() {
                let body = match response.text().await {
                    Ok(body) => body,
                    Err(err) => {
                        tracing::debug!(
                            phase = "transport",
                            event = "error_body_unreadable",
                            status = status.as_u16(),
                            error = %error_chain(&err)
                        );
                        String::new()
                    }
                };
                return Err(ProviderError::api(status.as_u16(), body));
            }

            let bytes = response.bytes().await.map_err(map_send_error)?;

            ResponseBody::from_slice(&bytes)
        })
    }
}

/// Accepts absolute `http`/`https` URLs only.
pub fn parse_endpoint_url(url: &str) -> Result<reqwest::Url, ProviderError> {
    let parsed = reqwest::Url::parse(url.trim())
        .map_err(|err| ProviderError::invalid_request(err.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(ProviderError::invalid_request(format!(
            "unsupported URL scheme `{other}`"
        ))),
    }
}

fn map_send_error(err: reqwest::Error) -> ProviderError {
    if err.is_timeout() {
        ProviderError::timeout(error_chain(&err))
    } else if err.is_builder() {
        ProviderError::invalid_request(error_chain(&err))
    } else {
        ProviderError::transport(error_chain(&err))
    }
}

/// reqwest keeps the useful part (refused, dns, tls) in the source chain.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }

    message
}

#[cfg(test)]
mod tests {
    use std::fmt::{Display, Formatter};

    use super::{DEFAULT_USER_AGENT, HttpChatTransport, error_chain, parse_endpoint_url};

    #[derive(Debug)]
    struct Layer(&'static str, Option<Box<Layer>>);

    impl Display for Layer {
        fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
            f.write_str(self.0)
        }
    }

    impl std::error::Error for Layer {
        fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
            self.1
                .as_deref()
                .map(|inner| inner as &(dyn std::error::Error + 'static))
        }
    }

    #[test]
    fn error_chain_joins_sources() {
        let err = Layer(
            "error sending request",
            Some(Box::new(Layer("connection refused", None))),
        );
        assert_eq!(error_chain(&err), "error sending request: connection refused");
    }

    #[test]
    fn parse_endpoint_url_accepts_http_schemes_only() {
        assert!(parse_endpoint_url("https://api.x.ai/v1/chat/completions").is_ok());
        assert!(parse_endpoint_url(" http://127.0.0.1:8080/v1 ").is_ok());
        assert!(parse_endpoint_url("ftp://example.com/file").is_err());
        assert!(parse_endpoint_url("api.x.ai/v1").is_err());
        assert!(parse_endpoint_url("").is_err());
    }

    #[test]
    fn default_user_agent_names_client_and_version() {
        assert!(DEFAULT_USER_AGENT.starts_with("parley/"));

        let transport = HttpChatTransport::new(reqwest::Client::new());
        assert_eq!(transport.user_agent(), DEFAULT_USER_AGENT);

        let custom = transport.with_user_agent("parley-test/9.9");
        assert_eq!(custom.user_agent(), "parley-test/9.9");
    }
}
