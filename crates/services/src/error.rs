//! Shared error types for the services crate.

use std::path::PathBuf;

use thiserror::Error;

use learn_core::config::ConfigError;
use learn_core::interaction::InteractionError;
use learn_core::model::ElementKind;
use storage::sqlite::SqliteInitError;

/// Errors emitted by `LessonFlow`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum FlowError {
    #[error(transparent)]
    Interaction(#[from] InteractionError),
    #[error("read the lesson content before completing it")]
    NotRead,
    #[error("finish the interactive element before completing the lesson")]
    ElementIncomplete,
    #[error("current lesson has a {actual:?} element, not a {expected:?}")]
    WrongElementKind {
        expected: ElementKind,
        actual: ElementKind,
    },
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to read module file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
