#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

// Tracing targets for observability
/// Logging target for client initialization and configuration.
pub const CLIENT_TARGET: &str = "slipok_client::client";

/// Logging target for verification requests and responses.
pub const VERIFY_TARGET: &str = "slipok_client::verify";

/// Logging target for retry and backoff decisions.
pub const RETRY_TARGET: &str = "slipok_client::retry";

mod client;
pub mod error;
pub mod form;
#[doc(hidden)]
pub mod prelude;
pub mod response;
pub mod retry;

pub use crate::client::{ProxyAuth, ProxyConfig, ProxyScheme, SlipClient, SlipConfig, SlipConfigBuilder};
pub use crate::error::{Error, Result};
pub use crate::form::SlipSource;
pub use crate::response::VerifyResponse;
pub use crate::retry::RetryPolicy;
