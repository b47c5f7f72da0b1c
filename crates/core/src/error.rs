// Central Error Types for transactional resources

use std::fmt;
use thiserror::Error;

/// Message used when `begin_transaction` is refused because the manager is closed
pub const ENTITY_MANAGER_CLOSED: &str = "Entity Manager is closed";

/// Boxed underlying cause carried by collaborator errors
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Lifecycle operation of a transactional resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Begin,
    Commit,
    Rollback,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Begin => write!(f, "begin"),
            Operation::Commit => write!(f, "commit"),
            Operation::Rollback => write!(f, "rollback"),
        }
    }
}

/// Failure raised by an entity manager.
///
/// This is the collaborator's native error. Adapters either wrap it into one of the
/// lifecycle errors below or hand it back untouched.
#[derive(Error, Debug)]
#[error("{message}")]
pub struct EntityManagerError {
    message: String,
    code: Option<i64>,
    #[source]
    source: Option<BoxError>,
}

impl EntityManagerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
            source: None,
        }
    }

    /// Attach a numeric error code (e.g. a driver SQLSTATE mapped to an integer)
    pub fn with_code(mut self, code: i64) -> Self {
        self.code = Some(code);
        self
    }

    /// Attach the underlying cause
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: Into<BoxError>,
    {
        self.source = Some(source.into());
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn code(&self) -> Option<i64> {
        self.code
    }
}

/// Common view over the three lifecycle failures
pub trait TransactionalFailure: std::error::Error {
    /// Operation that failed
    fn operation(&self) -> Operation;

    /// Human readable message
    fn message(&self) -> &str;

    /// Numeric code taken from the cause, if it had one
    fn code(&self) -> Option<i64>;

    /// Original entity manager failure, if any
    fn entity_manager_error(&self) -> Option<&EntityManagerError>;
}

macro_rules! lifecycle_error {
    ($(#[$meta:meta])* $name:ident => $operation:expr) => {
        $(#[$meta])*
        #[derive(Error, Debug)]
        #[error("{message}")]
        pub struct $name {
            message: String,
            code: Option<i64>,
            #[source]
            cause: Option<EntityManagerError>,
        }

        impl $name {
            /// Wrap an entity manager failure, keeping its code and the error itself as cause
            pub fn caused_by(message: impl Into<String>, cause: EntityManagerError) -> Self {
                Self {
                    message: message.into(),
                    code: cause.code(),
                    cause: Some(cause),
                }
            }

            /// Take the wrapped entity manager failure back out
            pub fn into_cause(self) -> Option<EntityManagerError> {
                self.cause
            }
        }

        impl TransactionalFailure for $name {
            fn operation(&self) -> Operation {
                $operation
            }

            fn message(&self) -> &str {
                &self.message
            }

            fn code(&self) -> Option<i64> {
                self.code
            }

            fn entity_manager_error(&self) -> Option<&EntityManagerError> {
                self.cause.as_ref()
            }
        }
    };
}

lifecycle_error!(
    /// Starting a transaction failed
    BeginError => Operation::Begin
);

lifecycle_error!(
    /// Flushing or committing a transaction failed
    CommitError => Operation::Commit
);

lifecycle_error!(
    /// Rolling back a transaction failed
    RollbackError => Operation::Rollback
);

impl BeginError {
    /// Precondition failure: the entity manager reported itself closed
    pub fn entity_manager_closed() -> Self {
        Self {
            message: ENTITY_MANAGER_CLOSED.to_string(),
            code: None,
            cause: None,
        }
    }

    /// True for the precondition failure, false when an entity manager error was wrapped
    pub fn is_entity_manager_closed(&self) -> bool {
        self.cause.is_none() && self.message == ENTITY_MANAGER_CLOSED
    }
}

/// Outcome of a failed `rollback`.
///
/// A failed rollback is wrapped; a failed close after a successful rollback is not.
#[derive(Error, Debug)]
pub enum RollbackFailure {
    #[error(transparent)]
    Rollback(#[from] RollbackError),

    #[error(transparent)]
    Close(EntityManagerError),
}

/// Unified error for callers that don't care which operation failed
#[derive(Error, Debug)]
pub enum TransactionError {
    #[error(transparent)]
    Begin(#[from] BeginError),

    #[error(transparent)]
    Commit(#[from] CommitError),

    #[error(transparent)]
    Rollback(#[from] RollbackError),

    /// Passed through from the entity manager without translation
    #[error(transparent)]
    EntityManager(#[from] EntityManagerError),
}

impl From<RollbackFailure> for TransactionError {
    fn from(err: RollbackFailure) -> Self {
        match err {
            RollbackFailure::Rollback(e) => TransactionError::Rollback(e),
            RollbackFailure::Close(e) => TransactionError::EntityManager(e),
        }
    }
}

impl TransactionError {
    /// Lifecycle view, `None` for pass-through entity manager errors
    pub fn as_failure(&self) -> Option<&dyn TransactionalFailure> {
        match self {
            TransactionError::Begin(e) => Some(e),
            TransactionError::Commit(e) => Some(e),
            TransactionError::Rollback(e) => Some(e),
            TransactionError::EntityManager(_) => None,
        }
    }

    pub fn operation(&self) -> Option<Operation> {
        self.as_failure().map(|f| f.operation())
    }
}

/// Result type alias using TransactionError
pub type Result<T> = std::result::Result<T, TransactionError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_caused_by_keeps_code_and_cause() {
        let cause = EntityManagerError::new("deadlock detected").with_code(1213);
        let err = CommitError::caused_by("Cannot commit ORM transaction", cause);

        assert_eq!(err.to_string(), "Cannot commit ORM transaction");
        assert_eq!(err.code(), Some(1213));
        assert_eq!(err.operation(), Operation::Commit);
        assert_eq!(err.entity_manager_error().unwrap().message(), "deadlock detected");

        // Cause chain is reachable through std::error::Error
        let source = err.source().unwrap();
        assert_eq!(source.to_string(), "deadlock detected");
    }

    #[test]
    fn test_cause_without_code() {
        let err = RollbackError::caused_by("Cannot rollback", EntityManagerError::new("gone"));
        assert_eq!(err.code(), None);
        assert!(err.entity_manager_error().is_some());
    }

    #[test]
    fn test_entity_manager_error_source_chain() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "socket closed");
        let cause = EntityManagerError::new("connection lost").with_source(io);
        let err = BeginError::caused_by("Cannot begin ORM transaction", cause);

        let level1 = err.source().unwrap();
        let level2 = level1.source().unwrap();
        assert_eq!(level2.to_string(), "socket closed");
    }

    #[test]
    fn test_begin_closed_variant() {
        let closed = BeginError::entity_manager_closed();
        assert_eq!(closed.to_string(), "Entity Manager is closed");
        assert!(closed.is_entity_manager_closed());
        assert!(closed.entity_manager_error().is_none());
        assert!(closed.code().is_none());

        let wrapped = BeginError::caused_by("Cannot begin", EntityManagerError::new("boom"));
        assert!(!wrapped.is_entity_manager_closed());
    }

    #[test]
    fn test_rollback_failure_flattens_into_transaction_error() {
        let wrapped: TransactionError =
            RollbackFailure::Rollback(RollbackError::caused_by("x", EntityManagerError::new("y")))
                .into();
        assert_eq!(wrapped.operation(), Some(Operation::Rollback));

        let passthrough: TransactionError =
            RollbackFailure::Close(EntityManagerError::new("close failed").with_code(7)).into();
        assert!(passthrough.as_failure().is_none());
        match passthrough {
            TransactionError::EntityManager(e) => assert_eq!(e.code(), Some(7)),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_into_cause() {
        let err = CommitError::caused_by("x", EntityManagerError::new("flush failed"));
        assert_eq!(err.into_cause().unwrap().message(), "flush failed");
    }

    #[test]
    fn test_operation_display() {
        assert_eq!(Operation::Begin.to_string(), "begin");
        assert_eq!(Operation::Commit.to_string(), "commit");
        assert_eq!(Operation::Rollback.to_string(), "rollback");
    }
}
