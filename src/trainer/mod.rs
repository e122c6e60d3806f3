pub mod protocol;
pub mod session;
pub mod transport;

use thiserror::Error;

use crate::trainer::transport::TransportError;

#[derive(Debug, Error)]
pub enum TrainerError {
    /// The server answered with `{error}` or `{success: false}`.
    #[error("{0}")]
    Protocol(String),
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("malformed trainer response: {0}")]
    Decode(#[from] serde_json::Error),
}
