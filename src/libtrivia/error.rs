use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("question {0} not found")]
    NotFound(i32),
    #[error("invalid question: {0}")]
    Validation(String),
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
}

/// Failures surfaced to whoever called into the service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TriviaError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unprocessable(String),
    #[error("{0}")]
    Internal(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NotFound,
    BadRequest,
    Unprocessable,
    InternalError,
}

/// Serialized shape of a failed request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub error: u16,
    pub kind: ErrorKind,
    pub message: String,
}

impl TriviaError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TriviaError::NotFound(_) => ErrorKind::NotFound,
            TriviaError::BadRequest(_) => ErrorKind::BadRequest,
            TriviaError::Unprocessable(_) => ErrorKind::Unprocessable,
            TriviaError::Internal(_) => ErrorKind::InternalError,
        }
    }

    /// HTTP status a routing layer should answer with.
    pub fn status(&self) -> u16 {
        match self.kind() {
            ErrorKind::NotFound => 404,
            ErrorKind::BadRequest => 400,
            ErrorKind::Unprocessable => 422,
            ErrorKind::InternalError => 500,
        }
    }

    pub fn body(&self) -> ErrorBody {
        ErrorBody {
            success: false,
            error: self.status(),
            kind: self.kind(),
            message: self.to_string(),
        }
    }

    /// Store failure during a write that the caller asked for.
    pub fn unprocessable(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => TriviaError::NotFound(format!("question {} not found", id)),
            StoreError::Validation(msg) => TriviaError::BadRequest(msg),
            StoreError::Database(err) => TriviaError::Unprocessable(err.to_string()),
        }
    }
}

impl From<StoreError> for TriviaError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => TriviaError::NotFound(format!("question {} not found", id)),
            StoreError::Validation(msg) => TriviaError::BadRequest(msg),
            StoreError::Database(err) => TriviaError::Internal(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_kind() {
        assert_eq!(TriviaError::NotFound(String::new()).status(), 404);
        assert_eq!(TriviaError::BadRequest(String::new()).status(), 400);
        assert_eq!(TriviaError::Unprocessable(String::new()).status(), 422);
        assert_eq!(TriviaError::Internal(String::new()).status(), 500);
    }

    #[test]
    fn body_serializes_kind_in_snake_case() {
        let body = TriviaError::Internal("boom".to_string()).body();
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], 500);
        assert_eq!(json["kind"], "internal_error");
        assert_eq!(json["message"], "boom");
    }

    #[test]
    fn database_fault_maps_by_context() {
        let read = TriviaError::from(StoreError::Database(rusqlite::Error::InvalidQuery));
        assert_eq!(read.kind(), ErrorKind::InternalError);

        let write = TriviaError::unprocessable(StoreError::Database(rusqlite::Error::InvalidQuery));
        assert_eq!(write.kind(), ErrorKind::Unprocessable);

        let gone = TriviaError::unprocessable(StoreError::NotFound(4));
        assert_eq!(gone.kind(), ErrorKind::NotFound);
    }
}
