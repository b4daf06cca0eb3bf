//! Client layer: credentials, URL construction, the HTTP call and response unwrapping.

use std::error::Error as StdError;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use crate::cache::{ResponseCache, TtlCache};
use crate::domain::{
    ApiKey, ApiSecret, PushWap, ResponseFormat, SendBinary, SendResponse, SendText,
    ValidationError,
};
use crate::transport::{self, ApiCommand, Method};

mod account;
#[cfg(test)]
mod fake;

/// Timeout applied to every call unless overridden in the builder.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug, Clone)]
struct HttpRequest {
    method: Method,
    url: String,
    params: Vec<(String, String)>,
    accept: &'static str,
}

#[derive(Debug, Clone)]
struct HttpResponse {
    status: u16,
    body: String,
}

trait HttpTransport: Send + Sync {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>>;
}

#[derive(Debug, Clone)]
struct ReqwestTransport {
    client: reqwest::Client,
}

impl HttpTransport for ReqwestTransport {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
        Box::pin(async move {
            let builder = match request.method {
                Method::Get => self.client.get(&request.url).query(&request.params),
                Method::Post => self.client.post(&request.url).form(&request.params),
            };
            let response = builder
                .header(reqwest::header::ACCEPT, request.accept)
                .send()
                .await?;
            let status = response.status().as_u16();
            let body = response.text().await?;
            Ok(HttpResponse { status, body })
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Static key/secret pair authenticating every Nexmo call.
pub struct Credentials {
    key: ApiKey,
    secret: ApiSecret,
}

impl Credentials {
    /// Environment variable holding the API key.
    pub const KEY_ENV: &'static str = "NEXMO_API_KEY";
    /// Environment variable holding the API secret.
    pub const SECRET_ENV: &'static str = "NEXMO_API_SECRET";

    /// Validate both parts (key non-empty after trimming, secret non-empty).
    pub fn new(
        key: impl Into<String>,
        secret: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            key: ApiKey::new(key)?,
            secret: ApiSecret::new(secret)?,
        })
    }

    /// Read `NEXMO_API_KEY` and `NEXMO_API_SECRET` from the environment.
    pub fn from_env() -> Result<Self, ValidationError> {
        let key = std::env::var(Self::KEY_ENV)
            .map_err(|_| ValidationError::Empty { field: Self::KEY_ENV })?;
        let secret = std::env::var(Self::SECRET_ENV).map_err(|_| ValidationError::Empty {
            field: Self::SECRET_ENV,
        })?;
        Self::new(key, secret)
    }

    /// API key (`username`).
    pub fn key(&self) -> &ApiKey {
        &self.key
    }

    /// API secret (`password`).
    pub fn secret(&self) -> &ApiSecret {
        &self.secret
    }

    /// Credentials always win over caller parameters with the same name.
    fn merge_into(&self, params: &mut Vec<(String, String)>) {
        transport::merge_params(
            params,
            vec![
                (ApiKey::FIELD.to_owned(), self.key.as_str().to_owned()),
                (ApiSecret::FIELD.to_owned(), self.secret.as_str().to_owned()),
            ],
        );
    }
}

#[derive(Debug, thiserror::Error)]
/// Errors returned by [`NexmoClient`] construction and response decoding.
///
/// Calls to Nexmo themselves never fail with an error: transport failures and
/// unsuccessful HTTP statuses are reported as `None` / `false`.
pub enum NexmoError {
    /// HTTP client could not be built (TLS backend, invalid user-agent, ...).
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn StdError + Send + Sync>),

    /// Response body could not be parsed as the expected format.
    #[error("parse error: {0}")]
    Parse(#[source] Box<dyn StdError + Send + Sync>),

    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

/// Decode the JSON body returned by an SMS send call.
pub fn decode_send_response(json: &str) -> Result<SendResponse, NexmoError> {
    transport::decode_send_json_response(json).map_err(|err| NexmoError::Parse(Box::new(err)))
}

/// Builder for [`NexmoClient`].
pub struct NexmoClientBuilder {
    credentials: Credentials,
    base_url: String,
    format: ResponseFormat,
    timeout: Duration,
    user_agent: Option<String>,
    cache: Arc<dyn ResponseCache>,
}

impl NexmoClientBuilder {
    /// Start from the defaults: production endpoint, JSON, 60s timeout, [`TtlCache`].
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            base_url: transport::DEFAULT_BASE_URL.to_owned(),
            format: ResponseFormat::default(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: None,
            cache: Arc::new(TtlCache::default()),
        }
    }

    /// Override the REST base URL (`https://rest.nexmo.com/`).
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Response format requested from Nexmo (`sms/json` or `sms/xml`).
    pub fn format(mut self, format: ResponseFormat) -> Self {
        self.format = format;
        self
    }

    /// Total timeout of each HTTP call.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// `User-Agent` header sent with every call.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Replace the cache used for pricing, number search and message lookups.
    pub fn cache(mut self, cache: impl ResponseCache + 'static) -> Self {
        self.cache = Arc::new(cache);
        self
    }

    /// Build the client. Fails only when the HTTP client cannot be constructed.
    pub fn build(self) -> Result<NexmoClient, NexmoError> {
        let mut builder = reqwest::Client::builder().timeout(self.timeout);
        if let Some(user_agent) = self.user_agent {
            builder = builder.user_agent(user_agent);
        }

        let client = builder
            .build()
            .map_err(|err| NexmoError::Transport(Box::new(err)))?;

        Ok(NexmoClient {
            credentials: self.credentials,
            base_url: self.base_url,
            format: self.format,
            http: Arc::new(ReqwestTransport { client }),
            cache: self.cache,
        })
    }
}

#[derive(Clone)]
/// High-level Nexmo client.
///
/// Sends text, binary and WAP push messages through `sms/{format}` and exposes the
/// account and number-management calls. Every call returns the raw response body
/// (JSON or XML, per [`ResponseFormat`]) on a 2xx status and `None` otherwise.
pub struct NexmoClient {
    credentials: Credentials,
    base_url: String,
    format: ResponseFormat,
    http: Arc<dyn HttpTransport>,
    cache: Arc<dyn ResponseCache>,
}

impl NexmoClient {
    /// Create a client with the default endpoint, JSON responses and a 60s timeout.
    pub fn new(credentials: Credentials) -> Self {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            credentials,
            base_url: transport::DEFAULT_BASE_URL.to_owned(),
            format: ResponseFormat::default(),
            http: Arc::new(ReqwestTransport { client }),
            cache: Arc::new(TtlCache::default()),
        }
    }

    /// Start a [`NexmoClientBuilder`].
    pub fn builder(credentials: Credentials) -> NexmoClientBuilder {
        NexmoClientBuilder::new(credentials)
    }

    /// Credentials used for every call.
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Configured response format.
    pub fn format(&self) -> ResponseFormat {
        self.format
    }

    /// Send a text (or unicode) SMS.
    pub async fn send_text(&self, request: &SendText) -> Option<String> {
        let params = transport::encode_send_text_form(request);
        self.fetch(transport::SEND_SMS, &[], params).await
    }

    /// Send a binary SMS; body and UDH are hex encoded on the wire.
    pub async fn send_binary(&self, request: &SendBinary) -> Option<String> {
        let params = transport::encode_send_binary_form(request);
        self.fetch(transport::SEND_SMS, &[], params).await
    }

    /// Send a WAP push message.
    pub async fn push_wap(&self, request: &PushWap) -> Option<String> {
        let params = transport::encode_push_wap_form(request);
        self.fetch(transport::SEND_SMS, &[], params).await
    }

    async fn fetch(
        &self,
        command: ApiCommand,
        tokens: &[(&str, &str)],
        params: Vec<(String, String)>,
    ) -> Option<String> {
        let response = self.call(command, tokens, params).await?;
        successful_body(command, response)
    }

    async fn call(
        &self,
        command: ApiCommand,
        tokens: &[(&str, &str)],
        mut params: Vec<(String, String)>,
    ) -> Option<HttpResponse> {
        let mut replacements = vec![
            ("{k}", self.credentials.key.as_str()),
            ("{s}", self.credentials.secret.as_str()),
            ("{format}", self.format.as_str()),
        ];
        replacements.extend_from_slice(tokens);
        let path = transport::expand_template(command.path, &replacements);
        let url = transport::join_url(&self.base_url, &path);

        self.credentials.merge_into(&mut params);
        let request = HttpRequest {
            method: command.method,
            url,
            params,
            accept: self.format.accept_header(),
        };

        match self.http.execute(request).await {
            Ok(response) => Some(response),
            Err(err) => {
                // The URL embeds the secret; log the template only.
                tracing::warn!("nexmo request {} failed: {err}", command.path);
                None
            }
        }
    }
}

impl std::fmt::Debug for NexmoClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NexmoClient")
            .field("credentials", &self.credentials)
            .field("base_url", &self.base_url)
            .field("format", &self.format)
            .finish_non_exhaustive()
    }
}

fn successful_body(command: ApiCommand, response: HttpResponse) -> Option<String> {
    if (200..=299).contains(&response.status) {
        return Some(response.body);
    }
    tracing::warn!(
        "nexmo request {} returned HTTP {}",
        command.path,
        response.status
    );
    None
}
