//! Error types for the CLI runtime.

use std::io;
use std::sync::Arc;

use camino::Utf8PathBuf;
use mirrorpack_resolve::TransformError;
use thiserror::Error;

use crate::telemetry::TelemetryError;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("failed to load configuration: {0}")]
    LoadConfiguration(Arc<ortho_config::OrthoError>),
    #[error("{0}")]
    CliUsage(clap::Error),
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
    #[error("failed to determine the working directory: {0}")]
    WorkingDirectory(io::Error),
    #[error("working directory {0} is not valid UTF-8")]
    NonUtf8WorkingDirectory(String),
    #[error("failed to read {path}: {source}")]
    ReadSource { path: Utf8PathBuf, source: io::Error },
    #[error("failed to write {path}: {source}")]
    WriteOutput { path: Utf8PathBuf, source: io::Error },
    #[error(transparent)]
    Transform(Box<TransformError>),
    #[error("failed to serialise resolution report: {0}")]
    SerialiseReport(serde_json::Error),
    #[error("failed to write command output: {0}")]
    EmitOutput(io::Error),
}

impl From<TransformError> for AppError {
    fn from(error: TransformError) -> Self {
        Self::Transform(Box::new(error))
    }
}
