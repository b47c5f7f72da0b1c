// txman Infrastructure - ORM Adapter
// Implements: Transactional over an injected EntityManager

mod entity_manager_transactional;
mod settings;

pub use entity_manager_transactional::{
    EntityManagerTransactional, BEGIN_FAILED, COMMIT_FAILED, ROLLBACK_FAILED,
};
pub use settings::{TransactionalConfig, ENV_PREFIX};
