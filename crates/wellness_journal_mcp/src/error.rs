//! Error types for the MCP and HTTP surfaces.

use thiserror::Error;
use wellness_engine::StoreError;

#[derive(Debug, Error)]
pub enum McpError {
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("Validation error: {0}")]
    Validation(String),
}

pub type McpResult<T> = Result<T, McpError>;

impl McpError {
    /// Metric label: the store error kind, or `validation`.
    pub fn kind(&self) -> &'static str {
        match self {
            McpError::Store(e) => e.kind(),
            McpError::Validation(_) => "validation",
        }
    }
}
