//! Shared error types for the services crate.

use thiserror::Error;

use compliance_core::SettingsError;

/// Errors emitted while building a `TrainingFlowController`.
///
/// Intents themselves never fail; these only cover construction.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FlowError {
    #[error("flow controller must be created inside a tokio runtime")]
    NoRuntime,
    #[error(transparent)]
    Settings(#[from] SettingsError),
}
