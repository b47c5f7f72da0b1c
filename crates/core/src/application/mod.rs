// Application Layer - Use Cases over transactional resources

pub mod unit_of_work;

// Re-exports
pub use unit_of_work::UnitOfWorkError;
