use thiserror::Error;

/// Errors returned by storyboard operations.
#[derive(Error, Debug)]
pub enum Error {
    /// An upstream service returned a non-success HTTP status.
    #[error("upstream returned HTTP {status}: {body}")]
    Upstream { status: u16, body: String },

    /// Transport-level failure reaching a service, or an unreadable body.
    #[error("cannot reach {endpoint}: {message}")]
    Connection { endpoint: String, message: String },

    /// The run was cancelled via the caller's cancellation flag.
    #[error("storyboard run was cancelled")]
    Cancelled,

    #[error("{0}")]
    Other(String),
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Other(err.to_string())
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, Error>;
