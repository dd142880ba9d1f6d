use thiserror::Error;

/// Failure taxonomy of the portal.
///
/// Non-roster `Fetch`/`Parse` errors are downgraded to empty tables by the
/// feed batch; everything else surfaces to the caller.
#[derive(Debug, Error)]
pub enum PortalError {
    #[error("failed to fetch sheet '{sheet}': {reason}")]
    Fetch { sheet: String, reason: String },

    #[error("malformed payload for sheet '{sheet}': {reason}")]
    Parse { sheet: String, reason: String },

    #[error("NIS '{nis}' not found in the student roster (known examples: {hints})")]
    NotFound { nis: String, hints: String },

    #[error("required field '{0}' is missing")]
    Validation(&'static str),

    #[error("write rejected by sink: {0}")]
    Write(String),
}
