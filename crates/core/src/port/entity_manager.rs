// Entity Manager Port - the ORM collaborator wrapped by transactional adapters

use crate::error::EntityManagerError;

/// ORM entity manager capabilities needed to drive a transaction.
///
/// Implementations own all real transaction state (open/closed, nesting, dirty
/// tracking). Callers only forward lifecycle calls. Entity managers are usually not
/// safe for concurrent use; serializing access is the caller's job.
pub trait EntityManager: Send + Sync {
    /// Whether the manager can still be used
    fn is_open(&self) -> bool;

    /// Start a transaction on the underlying connection
    fn begin_transaction(&self) -> Result<(), EntityManagerError>;

    /// Synchronize pending in-memory changes to the data store
    fn flush(&self) -> Result<(), EntityManagerError>;

    /// Commit the current transaction
    fn commit(&self) -> Result<(), EntityManagerError>;

    /// Roll back the current transaction
    fn rollback(&self) -> Result<(), EntityManagerError>;

    /// Close the manager, detaching all managed entities
    fn close(&self) -> Result<(), EntityManagerError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Entity manager call, as recorded by [`RecordingEntityManager`]
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum Call {
        IsOpen,
        BeginTransaction,
        Flush,
        Commit,
        Rollback,
        Close,
    }

    #[derive(Debug, Clone)]
    struct ScriptedFailure {
        message: String,
        code: Option<i64>,
    }

    /// Mock EntityManager that records calls and fails on demand
    pub struct RecordingEntityManager {
        open: Mutex<bool>,
        calls: Mutex<Vec<Call>>,
        failures: Mutex<HashMap<Call, ScriptedFailure>>,
    }

    impl RecordingEntityManager {
        pub fn new() -> Self {
            Self {
                open: Mutex::new(true),
                calls: Mutex::new(Vec::new()),
                failures: Mutex::new(HashMap::new()),
            }
        }

        pub fn closed() -> Self {
            let em = Self::new();
            em.set_open(false);
            em
        }

        pub fn set_open(&self, open: bool) {
            *self.open.lock().unwrap() = open;
        }

        /// Make every subsequent `call` fail with the given message and code
        pub fn fail_on(&self, call: Call, message: &str, code: Option<i64>) {
            self.failures.lock().unwrap().insert(
                call,
                ScriptedFailure {
                    message: message.to_string(),
                    code,
                },
            );
        }

        pub fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        pub fn count(&self, call: Call) -> usize {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .filter(|c| **c == call)
                .count()
        }

        fn record(&self, call: Call) -> Result<(), EntityManagerError> {
            self.calls.lock().unwrap().push(call);
            match self.failures.lock().unwrap().get(&call) {
                Some(failure) => {
                    let err = EntityManagerError::new(failure.message.clone());
                    Err(match failure.code {
                        Some(code) => err.with_code(code),
                        None => err,
                    })
                }
                None => Ok(()),
            }
        }
    }

    impl Default for RecordingEntityManager {
        fn default() -> Self {
            Self::new()
        }
    }

    impl EntityManager for RecordingEntityManager {
        fn is_open(&self) -> bool {
            self.calls.lock().unwrap().push(Call::IsOpen);
            *self.open.lock().unwrap()
        }

        fn begin_transaction(&self) -> Result<(), EntityManagerError> {
            self.record(Call::BeginTransaction)
        }

        fn flush(&self) -> Result<(), EntityManagerError> {
            self.record(Call::Flush)
        }

        fn commit(&self) -> Result<(), EntityManagerError> {
            self.record(Call::Commit)
        }

        fn rollback(&self) -> Result<(), EntityManagerError> {
            self.record(Call::Rollback)
        }

        fn close(&self) -> Result<(), EntityManagerError> {
            self.record(Call::Close)?;
            self.set_open(false);
            Ok(())
        }
    }
}
