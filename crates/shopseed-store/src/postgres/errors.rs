use shopseed_core::{EntityKind, StoreErrorKind, StoreWriteError};

/// Map a Postgres SQLSTATE to the structured failure kind.
pub fn kind_from_sqlstate(code: &str) -> StoreErrorKind {
    match code {
        "23505" => StoreErrorKind::UniqueViolation,
        "23503" => StoreErrorKind::ForeignKeyViolation,
        "23502" => StoreErrorKind::NotNullViolation,
        "23514" => StoreErrorKind::CheckViolation,
        // raise_exception, used by business-rule triggers
        "P0001" => StoreErrorKind::BusinessRule,
        "57P01" | "57P02" | "57P03" => StoreErrorKind::Connectivity,
        code if code.starts_with("08") => StoreErrorKind::Connectivity,
        _ => StoreErrorKind::Other,
    }
}

/// Convert a `sqlx` failure into a store write error for `entity`.
pub fn classify(entity: EntityKind, err: sqlx::Error) -> StoreWriteError {
    match &err {
        sqlx::Error::Database(db_err) => {
            let kind = db_err
                .code()
                .map(|code| kind_from_sqlstate(&code))
                .unwrap_or(StoreErrorKind::Other);
            let error = StoreWriteError::new(entity, kind, db_err.message());
            match db_err.constraint() {
                Some(constraint) => error.with_constraint(constraint),
                None => error,
            }
        }
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed => {
            StoreWriteError::new(entity, StoreErrorKind::Connectivity, err.to_string())
        }
        _ => StoreWriteError::new(entity, StoreErrorKind::Other, err.to_string()),
    }
}
