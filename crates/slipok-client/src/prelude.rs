//! Prelude for the slipok-client crate.
//!
//! This module re-exports the most commonly used types from the crate
//! to provide a convenient single import for users.

pub use crate::client::{ProxyConfig, SlipClient, SlipConfig};
pub use crate::error::{Error, Result};
pub use crate::form::SlipSource;
pub use crate::response::VerifyResponse;
