//! Navigation errors and path query failures.

use horizon_config::ConfigError;

/// Errors raised when constructing a [`Pathfinder`](crate::Pathfinder).
#[derive(Debug, thiserror::Error)]
pub enum NavigationError {
    /// The navigation configuration is unusable.
    #[error("navigation disabled: {0}")]
    Config(#[from] ConfigError),
}

/// Why a path query produced no path.
///
/// Every variant means "no path"; callers that only care about success can
/// ignore the distinction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, thiserror::Error)]
pub enum PathFailure {
    /// The navigation grid has not been generated yet.
    #[error("navigation grid not generated")]
    GridNotGenerated,
    /// An endpoint lies outside the grid.
    #[error("endpoint outside the navigation grid")]
    OutOfBounds,
    /// The start cell is not navigable.
    #[error("start cell is not navigable")]
    StartNotNavigable,
    /// The goal cell is not navigable.
    #[error("goal cell is not navigable")]
    GoalNotNavigable,
    /// The search exhausted every reachable cell without finding the goal.
    #[error("goal is unreachable")]
    Unreachable,
    /// The open set grew past its configured bound before the goal was found.
    #[error("search bound exceeded")]
    SearchBoundExceeded,
}
