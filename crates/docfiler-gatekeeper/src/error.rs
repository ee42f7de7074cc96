//! Gatekeeper error types

use thiserror::Error;

/// Errors that can occur while setting up the gatekeeper
///
/// Record rejections are not errors of this kind; see `RejectionReason`.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum GatekeeperError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
