use horizon_config::ConfigError;
use horizon_nav::NavigationError;
use horizon_physics::CollisionError;
use horizon_streaming::StreamingError;

/// Errors raised by [`WorldContext`](crate::WorldContext).
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Streaming(#[from] StreamingError),

    #[error(transparent)]
    Navigation(#[from] NavigationError),

    #[error(transparent)]
    Collision(#[from] CollisionError),

    #[error("world context has been disposed")]
    Disposed,
}
