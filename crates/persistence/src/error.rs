// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use qms::CoreError;

/// Errors that can occur during persistence operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    /// A database error occurred.
    DatabaseError(String),
    /// Database connection failed.
    DatabaseConnectionFailed(String),
    /// The requested service was not found.
    ServiceNotFound(i64),
    /// The requested window was not found.
    WindowNotFound(i64),
    /// The requested ticket was not found.
    TicketNotFound(String),
    /// A uniqueness constraint was violated (duplicate name, prefix,
    /// or window number).
    Conflict(String),
    /// Two allocators raced for the same queue number. Retried
    /// internally; callers never see this under bounded contention.
    AllocationConflict {
        /// The service whose sequence collided.
        service_id: i64,
        /// The queue number both allocators tried to claim.
        queue_number: u32,
    },
    /// A stored row could not be mapped back to a domain value.
    ReconstructionError(String),
    /// Foreign key enforcement is not enabled.
    ForeignKeyEnforcementNotEnabled,
}

impl std::fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DatabaseError(msg) => write!(f, "Database error: {msg}"),
            Self::DatabaseConnectionFailed(msg) => {
                write!(f, "Database connection failed: {msg}")
            }
            Self::ServiceNotFound(id) => write!(f, "Service not found: {id}"),
            Self::WindowNotFound(id) => write!(f, "Window not found: {id}"),
            Self::TicketNotFound(id) => write!(f, "Ticket not found: {id}"),
            Self::Conflict(msg) => write!(f, "Conflict: {msg}"),
            Self::AllocationConflict {
                service_id,
                queue_number,
            } => {
                write!(
                    f,
                    "Queue number {queue_number} already issued for service {service_id}"
                )
            }
            Self::ReconstructionError(msg) => write!(f, "Row reconstruction error: {msg}"),
            Self::ForeignKeyEnforcementNotEnabled => {
                write!(f, "Foreign key enforcement is not enabled")
            }
        }
    }
}

impl std::error::Error for PersistenceError {}

impl From<rusqlite::Error> for PersistenceError {
    fn from(err: rusqlite::Error) -> Self {
        Self::DatabaseError(err.to_string())
    }
}

/// Errors returned by queue engine operations.
///
/// An engine operation fails either because a guard rejected it (core)
/// or because the store did (persistence). Guard failures are detected
/// before any write; store failures roll the transaction back. Either
/// way no partial state change is visible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// A queue rule rejected the operation.
    Core(CoreError),
    /// The store failed or a row was missing.
    Persistence(PersistenceError),
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Core(err) => write!(f, "{err}"),
            Self::Persistence(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for EngineError {}

impl From<CoreError> for EngineError {
    fn from(err: CoreError) -> Self {
        Self::Core(err)
    }
}

impl From<PersistenceError> for EngineError {
    fn from(err: PersistenceError) -> Self {
        Self::Persistence(err)
    }
}

impl From<rusqlite::Error> for EngineError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Persistence(PersistenceError::from(err))
    }
}
