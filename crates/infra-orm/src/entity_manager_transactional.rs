// Entity Manager Transactional Implementation

use crate::settings::TransactionalConfig;
use std::sync::Arc;
use tracing::{debug, warn};
use txman_core::error::{BeginError, CommitError, RollbackError, RollbackFailure};
use txman_core::port::{EntityManager, Transactional};

pub const BEGIN_FAILED: &str = "Cannot begin ORM transaction";
pub const COMMIT_FAILED: &str = "Cannot commit ORM transaction";
pub const ROLLBACK_FAILED: &str = "Cannot rollback ORM transaction";

/// Transactional resource backed by an ORM entity manager.
///
/// The entity manager is shared, not owned: it is built and torn down by whoever
/// injected it. The adapter keeps no transaction state and does no locking.
pub struct EntityManagerTransactional {
    entity_manager: Arc<dyn EntityManager>,
    close_on_rollback: bool,
}

impl EntityManagerTransactional {
    pub fn new(entity_manager: Arc<dyn EntityManager>) -> Self {
        Self::with_close_on_rollback(entity_manager, false)
    }

    pub fn with_close_on_rollback(
        entity_manager: Arc<dyn EntityManager>,
        close_on_rollback: bool,
    ) -> Self {
        Self {
            entity_manager,
            close_on_rollback,
        }
    }

    pub fn from_config(entity_manager: Arc<dyn EntityManager>, config: &TransactionalConfig) -> Self {
        Self::with_close_on_rollback(entity_manager, config.close_on_rollback)
    }

    pub fn closes_on_rollback(&self) -> bool {
        self.close_on_rollback
    }
}

impl Transactional for EntityManagerTransactional {
    fn begin_transaction(&self) -> Result<(), BeginError> {
        if !self.entity_manager.is_open() {
            warn!("Refusing to begin transaction: entity manager is closed");
            return Err(BeginError::entity_manager_closed());
        }

        self.entity_manager.begin_transaction().map_err(|e| {
            warn!(error = %e, code = ?e.code(), "Entity manager failed to begin transaction");
            BeginError::caused_by(BEGIN_FAILED, e)
        })?;

        debug!("ORM transaction started");
        Ok(())
    }

    fn commit(&self) -> Result<(), CommitError> {
        // Flush and commit share one failure path: callers can't tell them apart
        self.entity_manager
            .flush()
            .and_then(|()| self.entity_manager.commit())
            .map_err(|e| {
                warn!(error = %e, code = ?e.code(), "Entity manager failed to commit transaction");
                CommitError::caused_by(COMMIT_FAILED, e)
            })?;

        debug!("ORM transaction committed");
        Ok(())
    }

    fn rollback(&self) -> Result<(), RollbackFailure> {
        self.entity_manager.rollback().map_err(|e| {
            warn!(error = %e, code = ?e.code(), "Entity manager failed to roll back transaction");
            RollbackError::caused_by(ROLLBACK_FAILED, e)
        })?;
        debug!("ORM transaction rolled back");

        if self.close_on_rollback {
            // Close failures are handed back untranslated
            self.entity_manager.close().map_err(RollbackFailure::Close)?;
            debug!("Entity manager closed after rollback");
        }

        Ok(())
    }
}
