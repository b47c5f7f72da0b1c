// txman Core - Transactional ports & error taxonomy
// NO infrastructure dependencies (Hexagonal Architecture)

pub mod application;
pub mod error;
pub mod port;

pub use error::{
    BeginError, CommitError, EntityManagerError, Operation, Result, RollbackError,
    RollbackFailure, TransactionError, TransactionalFailure,
};
pub use port::{EntityManager, Transactional};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
