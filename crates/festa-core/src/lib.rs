//! # Festa Core
//!
//! Shared foundations for the Festa workspace: the error type every crate
//! returns and the TOML configuration loaded at process start.

pub mod config;
pub mod error;

pub use config::{FestaConfig, RuleOverride, StoreConfig};
pub use error::{FestaError, Result};
