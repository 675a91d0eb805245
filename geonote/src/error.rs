//! Error kinds shared by every fallible operation in the crate.
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("{0}")]
    Validation(String),

    #[error("could not parse GeoJSON: {0}")]
    Parse(String),

    #[error("{kind} '{id}' not found")]
    NotFound { kind: &'static str, id: String },

    #[error("layer '{0}' is protected")]
    ProtectedLayer(String),

    #[error("no active layer to draw into")]
    NoActiveLayer,

    #[error("storage error: {0}")]
    Storage(String),
}

impl Error {
    /// Stable machine-readable code, used by the browser binding.
    pub fn code(&self) -> &'static str {
        match self {
            Error::Validation(_) => "validation",
            Error::Parse(_) => "parse",
            Error::NotFound { .. } => "not_found",
            Error::ProtectedLayer(_) => "protected_layer",
            Error::NoActiveLayer => "no_active_layer",
            Error::Storage(_) => "storage",
        }
    }

    /// Errors the user must see immediately in a blocking dialog.
    pub fn is_user_facing(&self) -> bool {
        matches!(self, Error::Validation(_) | Error::Parse(_))
    }

    pub(crate) fn layer_not_found(id: &str) -> Self {
        Error::NotFound { kind: "layer", id: id.to_string() }
    }

    pub(crate) fn feature_not_found(id: &str) -> Self {
        Error::NotFound { kind: "feature", id: id.to_string() }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Parse(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
