use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PromptureError {
    #[error("ai-docs not initialized: {} is missing; run 'prompture init' first", missing.display())]
    NotInitialized { missing: PathBuf },

    #[error("summary file not found: {0}")]
    SummaryNotFound(String),

    #[error("active context not found at {}: run 'prompture init' first", .0.display())]
    ContextNotFound(PathBuf),

    #[error("unknown document type '{0}'")]
    UnknownDocType(String),

    #[error("document already exists: {}", .0.display())]
    DocumentExists(PathBuf),

    #[error("template not found: {0}")]
    TemplateMissing(String),

    #[error("invalid day count '{0}': must be a non-negative integer")]
    InvalidDays(String),

    #[error("failed to {action} {}", path.display())]
    Fs {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

impl PromptureError {
    pub fn fs(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PromptureError::Fs {
            action,
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, PromptureError>;
