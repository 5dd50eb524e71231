use std::path::PathBuf;

use thiserror::Error;

use crate::validation::ValidationError;

/// Infrastructure failures. Scheduling problems are conflicts, never errors.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Repository unavailable: could not read {path}: {source}")]
    RepositoryUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No repository configured")]
    RepositoryNotConfigured,

    #[error("Failed to parse snapshot JSON: {0}")]
    SnapshotMalformed(#[from] serde_json::Error),

    #[error("Snapshot failed validation: {}", format_validation(.0))]
    SnapshotInvalid(Vec<ValidationError>),
}

fn format_validation(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

pub type Result<T> = std::result::Result<T, Error>;
