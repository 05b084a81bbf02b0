use prompt_spec::ResolveError;
use thiserror::Error;

/// Error taxonomy for generation and removal runs.
///
/// Resolution-layer and configuration errors abort before any file is
/// written. I/O errors after emission leave already-flushed edits in place;
/// idempotent manifest adds make a retried run safe. `NotFound` is the one
/// non-fatal case, reported without side effects.
#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("{0}")]
    Configuration(String),

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("template error: {0}")]
    Template(String),

    #[error("generation aborted: {0}")]
    Aborted(String),
}
