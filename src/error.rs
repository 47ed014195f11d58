use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

/// Everything that can go wrong while serving a ledger.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("invalid peer address: {0:?}")]
    InvalidAddress(String),

    #[error("missing values: {0}")]
    MissingField(&'static str),

    #[error("{0} already exists!")]
    DuplicateId(String),

    #[error("difficulty {0} out of range")]
    InvalidDifficulty(u32),

    #[error("no ledger for {0}")]
    NotFound(String),

    #[error("peer {peer} unreachable: {reason}")]
    PeerUnreachable { peer: String, reason: String },

    #[error("cannot read {path}: {source}")]
    FileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("proof search cancelled")]
    MiningCancelled,

    #[error("internal error: {0}")]
    Internal(String),
}

impl LedgerError {
    pub fn unreachable(peer: &str, reason: impl ToString) -> Self {
        LedgerError::PeerUnreachable {
            peer: peer.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl ResponseError for LedgerError {
    fn status_code(&self) -> StatusCode {
        match self {
            LedgerError::InvalidAddress(_)
            | LedgerError::MissingField(_)
            | LedgerError::DuplicateId(_)
            | LedgerError::InvalidDifficulty(_)
            | LedgerError::FileRead { .. } => StatusCode::BAD_REQUEST,
            LedgerError::NotFound(_) => StatusCode::NOT_FOUND,
            LedgerError::PeerUnreachable { .. } => StatusCode::BAD_GATEWAY,
            LedgerError::MiningCancelled => StatusCode::SERVICE_UNAVAILABLE,
            LedgerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).body(self.to_string())
    }
}
