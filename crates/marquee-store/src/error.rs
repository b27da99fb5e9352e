use thiserror::Error;
use crate::traits::StoreOp;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("request to data store failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("data store returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("could not decode data store response: {0}")]
    Decode(String),

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("data store unavailable: {0}")]
    Unavailable(String),

    #[error("injected failure for {0}")]
    Injected(StoreOp),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Decode(e.to_string())
    }
}
