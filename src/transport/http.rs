use super::{Response, Transport, TransportError};
use crate::request::PreparedRequest;
use crate::{Error, ErrorContext, Result};
use reqwest::blocking::Client;
use reqwest::redirect::Policy;
use reqwest::Proxy;
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use tracing::trace;

/// Settings for the default HTTP transport.
///
/// Every field is optional. An unset `timeout_ms` means the transport never
/// times out a request on its own.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Total per-request timeout, in milliseconds.
    pub timeout_ms: Option<u64>,
    pub connect_timeout_ms: Option<u64>,
    /// Proxy applied to all schemes.
    pub proxy_url: Option<String>,
    pub user_agent: Option<String>,
    /// Skip TLS certificate verification. Test setups only.
    pub accept_invalid_certs: bool,
    /// Redirects to follow before giving up; `0` disables redirects. Unset keeps
    /// reqwest's default of 10.
    pub max_redirects: Option<usize>,
}

impl TransportConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read settings from the environment.
    ///
    /// - `REQUESTS_BATCH_HTTP_TIMEOUT_MS`
    /// - `REQUESTS_BATCH_HTTP_CONNECT_TIMEOUT_MS`
    /// - `REQUESTS_BATCH_HTTP_MAX_REDIRECTS`
    /// - `REQUESTS_BATCH_HTTP_ACCEPT_INVALID_CERTS`
    /// - `REQUESTS_BATCH_PROXY_URL`
    /// - `REQUESTS_BATCH_USER_AGENT`
    ///
    /// A value that does not parse is a configuration error naming the variable.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        Ok(Self {
            timeout_ms: parse_var(&lookup, "REQUESTS_BATCH_HTTP_TIMEOUT_MS")?,
            connect_timeout_ms: parse_var(&lookup, "REQUESTS_BATCH_HTTP_CONNECT_TIMEOUT_MS")?,
            proxy_url: lookup("REQUESTS_BATCH_PROXY_URL"),
            user_agent: lookup("REQUESTS_BATCH_USER_AGENT"),
            accept_invalid_certs: parse_var(&lookup, "REQUESTS_BATCH_HTTP_ACCEPT_INVALID_CERTS")?
                .unwrap_or_default(),
            max_redirects: parse_var(&lookup, "REQUESTS_BATCH_HTTP_MAX_REDIRECTS")?,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = Some(duration_ms(timeout));
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout_ms = Some(duration_ms(timeout));
        self
    }

    pub fn with_proxy_url(mut self, url: impl Into<String>) -> Self {
        self.proxy_url = Some(url.into());
        self
    }

    pub fn with_user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    pub fn with_accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    pub fn with_max_redirects(mut self, max: usize) -> Self {
        self.max_redirects = Some(max);
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    pub fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout_ms.map(Duration::from_millis)
    }
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

fn parse_var<T>(lookup: impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };
    raw.trim().parse::<T>().map(Some).map_err(|e| {
        Error::configuration_with_context(
            format!("invalid value '{}' for {}", raw, key),
            ErrorContext::new()
                .with_field_path(key)
                .with_details(e.to_string())
                .with_source("config_loader"),
        )
    })
}

/// Default transport over `reqwest::blocking`.
///
/// A client is built around each send with idle pooling disabled, so no
/// connection outlives the request that opened it.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    config: TransportConfig,
    proxy: Option<Proxy>,
}

impl HttpTransport {
    pub fn new(config: TransportConfig) -> Result<Self> {
        let proxy = match config.proxy_url.as_deref() {
            Some(url) => Some(Proxy::all(url).map_err(|e| {
                Error::configuration_with_context(
                    format!("invalid proxy url '{}'", url),
                    ErrorContext::new()
                        .with_field_path("transport.proxy_url")
                        .with_details(e.to_string())
                        .with_source("http_transport"),
                )
            })?),
            None => None,
        };
        Ok(Self { config, proxy })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(TransportConfig::from_env()?)
    }

    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    fn client(&self) -> std::result::Result<Client, TransportError> {
        let mut builder = Client::builder()
            .pool_max_idle_per_host(0)
            .timeout(self.config.timeout())
            .danger_accept_invalid_certs(self.config.accept_invalid_certs);

        if let Some(timeout) = self.config.connect_timeout() {
            builder = builder.connect_timeout(timeout);
        }
        match self.config.max_redirects {
            Some(0) => builder = builder.redirect(Policy::none()),
            Some(max) => builder = builder.redirect(Policy::limited(max)),
            None => {}
        }
        if let Some(ua) = &self.config.user_agent {
            builder = builder.user_agent(ua.clone());
        }
        if let Some(proxy) = &self.proxy {
            builder = builder.proxy(proxy.clone());
        }

        Ok(builder.build()?)
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: &PreparedRequest) -> std::result::Result<Response, TransportError> {
        let client = self.client()?;

        let mut builder = client
            .request(request.method().clone(), request.url().clone())
            .headers(request.headers().clone());
        if let Some(timeout) = request.timeout() {
            builder = builder.timeout(timeout);
        }
        if let Some(body) = request.body() {
            builder = builder.body(body.to_vec());
        }

        let resp = builder.send()?;
        let status = resp.status();
        let url = resp.url().clone();
        let headers = resp.headers().clone();
        let body = resp.bytes()?;
        trace!(%status, %url, bytes = body.len(), "response received");

        Ok(Response::new(status, url, headers, body))
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
