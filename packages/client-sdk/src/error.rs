use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The request was superseded or explicitly cancelled before completing.
    #[error("request cancelled")]
    Cancelled,

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a structured error body.
    #[error("api error {status} ({code}): {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },
}
