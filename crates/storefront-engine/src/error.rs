use std::result::Result as StdResult;

use thiserror::Error;

/// Convenient result type for the engine crate.
pub type Result<T> = StdResult<T, Error>;

/// Errors surfaced by the engine's loading helpers.
///
/// Rendering itself never fails; degraded input produces diagnostics instead.
#[derive(Debug, Error)]
pub enum Error {
    /// Failure loading or parsing a block tree, data object or settings file.
    #[error("{}", .0.pretty())]
    Schema(#[from] schema::Error),

    /// Generic error with context.
    #[error("Engine error: {0}")]
    Msg(String),
}
