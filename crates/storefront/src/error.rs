//! Error handling for the storefront CLI.

use std::{io, result};

use thiserror::Error;

/// Convenient result type for CLI operations.
pub type Result<T> = result::Result<T, Error>;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum Error {
    /// Wrapper for standard I/O errors.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// Block tree, data or settings failed to load.
    #[error("{}", .0.pretty())]
    Schema(#[from] schema::Error),
    /// Errors surfaced by the render engine.
    #[error("{0}")]
    Engine(#[from] storefront_engine::Error),
    /// Rendered output could not be serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// A `--fire` target matched no wired handler.
    #[error("No handler for `{0}` in the rendered tree")]
    UnknownTarget(String),
}
