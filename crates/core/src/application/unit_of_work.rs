// Unit of Work Use Case - run a closure inside one transactional resource

use crate::error::TransactionError;
use crate::port::Transactional;
use thiserror::Error;
use tracing::{debug, warn};

/// Failure of a unit of work
#[derive(Error, Debug)]
pub enum UnitOfWorkError<E> {
    /// Begin or commit failed
    #[error(transparent)]
    Transaction(#[from] TransactionError),

    /// The work itself failed; the transaction was rolled back
    #[error("unit of work failed: {0}")]
    Work(#[source] E),
}

impl<E> UnitOfWorkError<E> {
    pub fn is_work(&self) -> bool {
        matches!(self, UnitOfWorkError::Work(_))
    }
}

/// Execute `work` between `begin_transaction` and `commit`
///
/// # Arguments
///
/// * `resource` - Transactional resource to drive
/// * `work` - Operations to run while the transaction is open
///
/// If `work` fails the resource is rolled back and the work error is returned. If
/// commit fails a rollback is attempted and the commit error is returned. Rollback
/// failures on these paths are logged, never returned: the first failure wins.
pub fn execute<T, E, F>(resource: &dyn Transactional, work: F) -> Result<T, UnitOfWorkError<E>>
where
    F: FnOnce() -> Result<T, E>,
{
    resource
        .begin_transaction()
        .map_err(TransactionError::from)?;
    debug!("Unit of work started");

    let value = match work() {
        Ok(value) => value,
        Err(e) => {
            rollback_quietly(resource, "work failed");
            return Err(UnitOfWorkError::Work(e));
        }
    };

    if let Err(e) = resource.commit() {
        rollback_quietly(resource, "commit failed");
        return Err(TransactionError::from(e).into());
    }

    debug!("Unit of work committed");
    Ok(value)
}

fn rollback_quietly(resource: &dyn Transactional, reason: &str) {
    match resource.rollback() {
        Ok(()) => debug!(reason = %reason, "Unit of work rolled back"),
        Err(e) => warn!(reason = %reason, error = %e, "Rollback after failure also failed"),
    }
}
