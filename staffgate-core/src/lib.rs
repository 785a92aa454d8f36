//! Staffgate Core - Shared types and ambient concerns
//!
//! Record types, the store error taxonomy, gateway configuration and logging
//! setup shared by every other staffgate crate.

pub mod config;
pub mod error;
pub mod logging;
pub mod types;

pub use config::*;
pub use error::*;
pub use logging::*;
pub use types::*;
