// Port Layer - Interfaces for external dependencies

pub mod entity_manager;
pub mod transactional;

// Re-exports
pub use entity_manager::EntityManager;
pub use transactional::Transactional;
