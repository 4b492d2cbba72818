//! Streaming error types.

use horizon_config::ConfigError;

/// Errors raised when constructing a [`ChunkStreamer`](crate::ChunkStreamer).
#[derive(Debug, thiserror::Error)]
pub enum StreamingError {
    /// The world or streaming configuration is unusable.
    #[error("chunk streaming disabled: {0}")]
    Config(#[from] ConfigError),
}
