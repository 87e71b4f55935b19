use thiserror::Error;

/// Error taxonomy shared by the annotation engine and its collaborators.
///
/// None of these are fatal to the host page: callers turn them into
/// "leave the text unannotated" or an error state in the overlay.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// The input failed word normalization.
    #[error("not an English word: {0:?}")]
    Input(String),

    /// The lookup service has no definitions for the word.
    #[error("no definition found for {0:?}")]
    NotFound(String),

    /// Network or storage failure in a collaborator.
    #[error("transport error: {0}")]
    Transport(String),

    /// Lifecycle misuse, e.g. `observe()` before any successful `render()`.
    #[error("invalid state: {0}")]
    State(&'static str),
}

impl CoreError {
    pub fn transport(err: impl std::fmt::Display) -> Self {
        CoreError::Transport(err.to_string())
    }
}
