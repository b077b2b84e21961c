use std::path::PathBuf;

use thiserror::Error;

use crate::layout::LayoutViolation;

pub type Result<T, E = CatalogError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{}: {source}", path.display())]
    Decode {
        path: PathBuf,
        source: hydra_api::Error,
    },

    #[error("{}: {violation}", path.display())]
    Layout {
        path: PathBuf,
        violation: LayoutViolation,
    },

    #[error(transparent)]
    Api(#[from] hydra_api::Error),

    #[error("request to {url} failed: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("invalid model name {0:?}, expected <org>/<model>")]
    InvalidModelName(String),

    #[error("{} already exists", .0.display())]
    AlreadyExists(PathBuf),
}

impl CatalogError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
