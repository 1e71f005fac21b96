//! Configuration for the slip verification client.

use std::time::Duration;

use url::Url;

use crate::error::{Error, Result};

/// Configuration for the slip verification client.
///
/// Immutable after the client is constructed. All settings except the API
/// key have defaults matching the hosted SlipOK service.
///
/// # Examples
///
/// ```ignore
/// use std::time::Duration;
/// use slipok_client::SlipConfig;
///
/// // Defaults only
/// let config = SlipConfig::new("my-api-key");
///
/// // Advanced configuration
/// let config = SlipConfig::builder()
///     .api_key("my-api-key")
///     .timeout(Duration::from_secs(15))
///     .max_retries(3)
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct SlipConfig {
    /// Base URL of the verification service
    base_url: Url,

    /// API key identifying the caller (secret)
    api_key: String,

    /// Request timeout duration
    timeout: Duration,

    /// Maximum number of retry attempts for retryable errors
    max_retries: u32,

    /// Base delay for exponential backoff
    retry_backoff: Duration,

    /// Multipart field name for file uploads
    file_field: String,

    /// Multipart field name for URL submissions
    url_field: String,

    /// Verification path; the API key is appended to form the full endpoint
    verify_path: String,

    /// User agent string for HTTP requests
    user_agent: String,

    /// Optional outbound proxy
    proxy: Option<ProxyConfig>,
}

impl SlipConfig {
    /// Create a new configuration with the given API key and default settings.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: Self::default_base_url(),
            api_key: api_key.into(),
            timeout: Duration::from_secs(10),
            max_retries: 2,
            retry_backoff: Duration::from_millis(500),
            file_field: "file".to_owned(),
            url_field: "url".to_owned(),
            verify_path: "/api/line/apikey".to_owned(),
            user_agent: format!("slipok-client/{}", env!("CARGO_PKG_VERSION")),
            proxy: None,
        }
    }

    /// Create a new configuration builder.
    pub fn builder() -> SlipConfigBuilder {
        SlipConfigBuilder::default()
    }

    fn default_base_url() -> Url {
        "https://api.slipok.com".parse().expect("Valid default URL")
    }

    /// Get the base URL of the verification service.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Get the API key.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Get the request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Get the maximum number of retry attempts.
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Get the retry backoff base duration.
    pub fn retry_backoff(&self) -> Duration {
        self.retry_backoff
    }

    /// Get the multipart field name used for file uploads.
    pub fn file_field(&self) -> &str {
        &self.file_field
    }

    /// Get the multipart field name used for URL submissions.
    pub fn url_field(&self) -> &str {
        &self.url_field
    }

    /// Get the verification path.
    pub fn verify_path(&self) -> &str {
        &self.verify_path
    }

    /// Get the user agent string.
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Get the proxy configuration, if any.
    pub fn proxy(&self) -> Option<&ProxyConfig> {
        self.proxy.as_ref()
    }

    /// Set the base URL of the verification service.
    pub fn with_base_url(mut self, base_url: impl AsRef<str>) -> Result<Self> {
        self.base_url = Url::parse(base_url.as_ref()).map_err(|e| {
            Error::config(format!("invalid base URL '{}': {e}", base_url.as_ref()))
        })?;
        Ok(self)
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the maximum number of retries.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Set the retry backoff base duration.
    pub fn with_retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff = backoff;
        self
    }

    /// Set the multipart field name for file uploads.
    pub fn with_file_field(mut self, field: impl Into<String>) -> Self {
        self.file_field = field.into();
        self
    }

    /// Set the multipart field name for URL submissions.
    pub fn with_url_field(mut self, field: impl Into<String>) -> Self {
        self.url_field = field.into();
        self
    }

    /// Set the verification path.
    pub fn with_verify_path(mut self, path: impl Into<String>) -> Self {
        self.verify_path = path.into();
        self
    }

    /// Set a custom user agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set an outbound proxy.
    pub fn with_proxy(mut self, proxy: ProxyConfig) -> Self {
        self.proxy = Some(proxy);
        self
    }
}

/// Builder for [`SlipConfig`].
///
/// Provides a fluent interface for constructing client configuration.
#[derive(Debug, Default)]
pub struct SlipConfigBuilder {
    api_key: Option<String>,
    base_url: Option<String>,
    timeout: Option<Duration>,
    max_retries: Option<u32>,
    retry_backoff: Option<Duration>,
    file_field: Option<String>,
    url_field: Option<String>,
    verify_path: Option<String>,
    user_agent: Option<String>,
    proxy: Option<ProxyConfig>,
}

impl SlipConfigBuilder {
    /// Set the API key (required).
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the base URL of the verification service.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the maximum number of retry attempts.
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = Some(retries);
        self
    }

    /// Set the retry backoff base duration.
    pub fn retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff = Some(backoff);
        self
    }

    /// Set the multipart field name for file uploads.
    pub fn file_field(mut self, field: impl Into<String>) -> Self {
        self.file_field = Some(field.into());
        self
    }

    /// Set the multipart field name for URL submissions.
    pub fn url_field(mut self, field: impl Into<String>) -> Self {
        self.url_field = Some(field.into());
        self
    }

    /// Set the verification path.
    pub fn verify_path(mut self, path: impl Into<String>) -> Self {
        self.verify_path = Some(path.into());
        self
    }

    /// Set a custom user agent.
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Set an outbound proxy.
    pub fn proxy(mut self, proxy: ProxyConfig) -> Self {
        self.proxy = Some(proxy);
        self
    }

    /// Build the configuration.
    ///
    /// Returns an error if the API key is not set or the base URL is invalid.
    pub fn build(self) -> Result<SlipConfig> {
        let api_key = self
            .api_key
            .ok_or_else(|| Error::config("API key is required"))?;

        let mut config = SlipConfig::new(api_key);

        if let Some(base_url) = self.base_url {
            config = config.with_base_url(base_url)?;
        }

        if let Some(timeout) = self.timeout {
            config = config.with_timeout(timeout);
        }

        if let Some(max_retries) = self.max_retries {
            config = config.with_max_retries(max_retries);
        }

        if let Some(retry_backoff) = self.retry_backoff {
            config = config.with_retry_backoff(retry_backoff);
        }

        if let Some(file_field) = self.file_field {
            config = config.with_file_field(file_field);
        }

        if let Some(url_field) = self.url_field {
            config = config.with_url_field(url_field);
        }

        if let Some(verify_path) = self.verify_path {
            config = config.with_verify_path(verify_path);
        }

        if let Some(user_agent) = self.user_agent {
            config = config.with_user_agent(user_agent);
        }

        if let Some(proxy) = self.proxy {
            config = config.with_proxy(proxy);
        }

        Ok(config)
    }
}

/// Outbound proxy descriptor.
#[derive(Debug, Clone)]
pub struct ProxyConfig {
    /// Proxy host
    host: String,
    /// Proxy port
    port: u16,
    /// Proxy scheme
    scheme: ProxyScheme,
    /// Optional basic-auth credentials
    auth: Option<ProxyAuth>,
}

/// Proxy scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProxyScheme {
    /// Plain HTTP proxy
    #[default]
    Http,
    /// HTTPS proxy
    Https,
}

/// Basic-auth credentials for an outbound proxy.
#[derive(Debug, Clone)]
pub struct ProxyAuth {
    /// Proxy username
    pub username: String,
    /// Proxy password
    pub password: String,
}

impl ProxyConfig {
    /// Create a plain HTTP proxy descriptor.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            scheme: ProxyScheme::Http,
            auth: None,
        }
    }

    /// Set the proxy scheme.
    pub fn with_scheme(mut self, scheme: ProxyScheme) -> Self {
        self.scheme = scheme;
        self
    }

    /// Set basic-auth credentials.
    pub fn with_basic_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.auth = Some(ProxyAuth {
            username: username.into(),
            password: password.into(),
        });
        self
    }

    /// Get the proxy URL.
    pub fn url(&self) -> String {
        format!("{}://{}:{}", self.scheme.as_str(), self.host, self.port)
    }

    /// Get the basic-auth credentials, if any.
    pub fn auth(&self) -> Option<&ProxyAuth> {
        self.auth.as_ref()
    }
}

impl ProxyScheme {
    /// Get the scheme as a URL prefix.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Https => "https",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_config_defaults() {
        let config = SlipConfig::new("test-key");
        assert_eq!(config.base_url().as_str(), "https://api.slipok.com/");
        assert_eq!(config.api_key(), "test-key");
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert_eq!(config.max_retries(), 2);
        assert_eq!(config.retry_backoff(), Duration::from_millis(500));
        assert_eq!(config.file_field(), "file");
        assert_eq!(config.url_field(), "url");
        assert_eq!(config.verify_path(), "/api/line/apikey");
        assert!(config.proxy().is_none());
    }

    #[test]
    fn test_invalid_base_url() {
        let result = SlipConfig::new("test-key").with_base_url("not a valid url");
        assert!(result.is_err());
    }

    #[test]
    fn test_builder() {
        let config = SlipConfig::builder()
            .api_key("test-key")
            .base_url("https://verify.example.com")
            .timeout(Duration::from_secs(30))
            .max_retries(5)
            .file_field("image")
            .url_field("imageUrl")
            .verify_path("/v2/verify")
            .build()
            .unwrap();

        assert_eq!(config.base_url().scheme(), "https");
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.max_retries(), 5);
        assert_eq!(config.file_field(), "image");
        assert_eq!(config.url_field(), "imageUrl");
        assert_eq!(config.verify_path(), "/v2/verify");
    }

    #[test]
    fn test_builder_missing_api_key() {
        let result = SlipConfig::builder().timeout(Duration::from_secs(5)).build();
        assert!(result.is_err());
    }

    #[test]
    fn test_fluent_api() {
        let config = SlipConfig::new("test-key")
            .with_timeout(Duration::from_secs(20))
            .with_max_retries(0)
            .with_proxy(ProxyConfig::new("proxy.internal", 8080));

        assert_eq!(config.timeout(), Duration::from_secs(20));
        assert_eq!(config.max_retries(), 0);
        assert!(config.proxy().is_some());
    }

    #[test]
    fn test_proxy_url() {
        let proxy = ProxyConfig::new("proxy.internal", 3128);
        assert_eq!(proxy.url(), "http://proxy.internal:3128");

        let proxy = ProxyConfig::new("proxy.internal", 443)
            .with_scheme(ProxyScheme::Https)
            .with_basic_auth("user", "pass");
        assert_eq!(proxy.url(), "https://proxy.internal:443");
        assert_eq!(proxy.auth().unwrap().username, "user");
    }
}
