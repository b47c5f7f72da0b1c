// Transactional port - the begin/commit/rollback contract exposed by adapters

use crate::error::{BeginError, CommitError, RollbackFailure};
use std::sync::Arc;

/// Transactional resource trait.
///
/// Implementations hold no transaction state of their own; whatever they wrap tracks
/// whether a transaction is active. Each operation fails with its own error type so
/// callers can tell which step broke.
pub trait Transactional: Send + Sync {
    /// Begin a transaction
    fn begin_transaction(&self) -> Result<(), BeginError>;

    /// Commit the current transaction
    fn commit(&self) -> Result<(), CommitError>;

    /// Rollback the current transaction
    fn rollback(&self) -> Result<(), RollbackFailure>;
}

impl<T: Transactional + ?Sized> Transactional for &T {
    fn begin_transaction(&self) -> Result<(), BeginError> {
        (**self).begin_transaction()
    }

    fn commit(&self) -> Result<(), CommitError> {
        (**self).commit()
    }

    fn rollback(&self) -> Result<(), RollbackFailure> {
        (**self).rollback()
    }
}

impl<T: Transactional + ?Sized> Transactional for Box<T> {
    fn begin_transaction(&self) -> Result<(), BeginError> {
        (**self).begin_transaction()
    }

    fn commit(&self) -> Result<(), CommitError> {
        (**self).commit()
    }

    fn rollback(&self) -> Result<(), RollbackFailure> {
        (**self).rollback()
    }
}

impl<T: Transactional + ?Sized> Transactional for Arc<T> {
    fn begin_transaction(&self) -> Result<(), BeginError> {
        (**self).begin_transaction()
    }

    fn commit(&self) -> Result<(), CommitError> {
        (**self).commit()
    }

    fn rollback(&self) -> Result<(), RollbackFailure> {
        (**self).rollback()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EntityManagerError;

    struct AlwaysClosed;

    impl Transactional for AlwaysClosed {
        fn begin_transaction(&self) -> Result<(), BeginError> {
            Err(BeginError::entity_manager_closed())
        }

        fn commit(&self) -> Result<(), CommitError> {
            Ok(())
        }

        fn rollback(&self) -> Result<(), RollbackFailure> {
            Err(RollbackFailure::Close(EntityManagerError::new("close failed")))
        }
    }

    fn begin_via(resource: &dyn Transactional) -> Result<(), BeginError> {
        resource.begin_transaction()
    }

    #[test]
    fn test_wrappers_delegate() {
        let arc: Arc<dyn Transactional> = Arc::new(AlwaysClosed);
        let boxed: Box<dyn Transactional> = Box::new(AlwaysClosed);

        assert!(begin_via(&arc).unwrap_err().is_entity_manager_closed());
        assert!(begin_via(&boxed).unwrap_err().is_entity_manager_closed());
        assert!(begin_via(&&AlwaysClosed).unwrap_err().is_entity_manager_closed());
        assert!(arc.commit().is_ok());
        assert!(matches!(boxed.rollback(), Err(RollbackFailure::Close(_))));
    }
}
