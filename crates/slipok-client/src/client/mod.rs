//! Slip verification client module.
//!
//! This module provides the client interface for submitting slip images to
//! the verification API, along with its configuration types.

mod slip_client;
mod slip_config;

pub use slip_client::SlipClient;
pub use slip_config::{ProxyAuth, ProxyConfig, ProxyScheme, SlipConfig, SlipConfigBuilder};
