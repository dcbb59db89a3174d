use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("database error: {0}")]
    Db(String),
    #[error("codec error: {0}")]
    Codec(String),
    #[error("model error: {0}")]
    Model(#[from] models::errors::ModelError),
}

/// Failure classes callers have to tell apart. Absence of a key is not an
/// error: `get` returns `None` and `delete` returns `DeleteOutcome::NotFound`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Empty key; a client error, never retried.
    InvalidInput,
    /// The durable medium rejected the operation.
    StorageFailure,
}

impl ServiceError {
    pub fn kind(&self) -> ErrorKind {
        use models::errors::ModelError;
        match self {
            ServiceError::Model(ModelError::Validation(_)) => ErrorKind::InvalidInput,
            ServiceError::Db(_) | ServiceError::Codec(_) | ServiceError::Model(ModelError::Db(_)) => ErrorKind::StorageFailure,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::errors::ModelError;

    #[test]
    fn kinds_cover_every_variant() {
        assert_eq!(ServiceError::Model(ModelError::Validation("x".into())).kind(), ErrorKind::InvalidInput);
        assert_eq!(ServiceError::Db("disk full".into()).kind(), ErrorKind::StorageFailure);
        assert_eq!(ServiceError::Codec("bad".into()).kind(), ErrorKind::StorageFailure);
        assert_eq!(ServiceError::Model(ModelError::Db("locked".into())).kind(), ErrorKind::StorageFailure);
    }
}
