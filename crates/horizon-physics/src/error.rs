use horizon_config::ConfigError;

/// Errors raised when constructing a [`CollisionGeometryCache`](crate::CollisionGeometryCache).
#[derive(Debug, thiserror::Error)]
pub enum CollisionError {
    /// The collision configuration is unusable.
    #[error("collision geometry disabled: {0}")]
    Config(#[from] ConfigError),
}
