use thiserror::Error;

/// Failures surfaced while resolving a question list.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// A supplied or entered value failed the question's validator. The
    /// gateway re-prompts interactively, so reaching the caller means the
    /// value came from configuration or a replay and the run must stop.
    #[error("invalid value for '{name}': {reason}")]
    Validation { name: String, reason: String },

    /// Prompting is disallowed and the question has no default and no
    /// configured value.
    #[error("question '{0}' requires an answer but prompting is disabled")]
    NonInteractive(String),

    /// The question set itself is unusable, e.g. a choice question whose
    /// options are all disabled.
    #[error("{0}")]
    Configuration(String),

    /// The user (or replay script) abandoned the prompt.
    #[error("prompt aborted: {0}")]
    Aborted(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
