// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use crate::auth::AuthError;
use qms::CoreError;
use qms_domain::DomainError;
use qms_persistence::{EngineError, PersistenceError};

/// API-level errors.
///
/// These are distinct from domain/core/persistence errors and
/// represent the API contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Authorization failed - the caller does not have permission.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// What the action requires.
        required: String,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// A transition was attempted from a state that does not permit it.
    InvalidState {
        /// A message naming the observed state and the required
        /// state(s).
        message: String,
    },
    /// The target window is inactive, under maintenance, manned by
    /// someone else, or belongs to another service.
    WindowUnavailable {
        /// A human-readable description.
        message: String,
    },
    /// Call-next found no eligible ticket.
    QueueEmpty,
    /// A uniqueness rule was violated.
    Conflict {
        /// A human-readable description.
        message: String,
    },
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized { action, required } => {
                write!(f, "Unauthorized: '{action}' requires {required}")
            }
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::InvalidState { message } => write!(f, "Invalid state: {message}"),
            Self::WindowUnavailable { message } => write!(f, "Window unavailable: {message}"),
            Self::QueueEmpty => write!(f, "No tickets waiting in queue"),
            Self::Conflict { message } => write!(f, "Conflict: {message}"),
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::Internal { message } => write!(f, "Internal error: {message}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AuthenticationFailed { reason } => Self::AuthenticationFailed { reason },
            AuthError::Unauthorized { action, required } => {
                Self::Unauthorized { action, required }
            }
        }
    }
}

/// Names the statuses an operation must observe to reach the target
/// status, for `InvalidState` messages.
fn required_states_for(target: &str) -> &'static str {
    match target {
        "serving" | "skipped" => "'waiting' or 'notified'",
        "served" => "'serving'",
        "notified" => "'waiting'",
        "waiting" => "'notified', 'skipped', or 'cancelled'",
        "cancelled" => "'waiting', 'notified', 'serving', or 'skipped'",
        _ => "a different status",
    }
}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not
/// leaked directly.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    match err {
        DomainError::InvalidStatusTransition { from, to, .. } => ApiError::InvalidState {
            message: format!(
                "ticket is '{from}', but this operation requires {}",
                required_states_for(&to)
            ),
        },
        DomainError::InvalidTicketStatus { status } => ApiError::InvalidInput {
            field: String::from("status"),
            message: format!("Unknown ticket status: {status}"),
        },
        DomainError::InvalidWindowStatus(status) => ApiError::InvalidInput {
            field: String::from("status"),
            message: format!("Unknown window status: {status}"),
        },
        DomainError::InvalidServiceName(msg) => ApiError::InvalidInput {
            field: String::from("name"),
            message: msg,
        },
        DomainError::InvalidPrefix(msg) => ApiError::InvalidInput {
            field: String::from("prefix"),
            message: msg,
        },
        DomainError::InvalidAverageServiceTime { minutes } => ApiError::InvalidInput {
            field: String::from("average_service_time"),
            message: format!("Invalid average service time: {minutes}. Must be at least 1 minute"),
        },
        DomainError::InvalidWindowNumber { number } => ApiError::InvalidInput {
            field: String::from("window_number"),
            message: format!("Invalid window number: {number}. Must be at least 1"),
        },
        DomainError::DateParseError { date_string, error } => ApiError::InvalidInput {
            field: String::from("date"),
            message: format!("Failed to parse date '{date_string}': {error}"),
        },
    }
}

/// Translates an engine error into an API error.
///
/// Guard failures map to their taxonomy entries; store failures map to
/// not-found/conflict where identifiable and to `Internal` otherwise.
/// `AllocationConflict` is retried inside the engine and reaching here
/// is an internal fault, never a user-facing error.
#[must_use]
pub fn translate_engine_error(err: EngineError) -> ApiError {
    match err {
        EngineError::Core(core) => match core {
            CoreError::DomainViolation(domain) => translate_domain_error(domain),
            CoreError::WindowUnavailable { window, reason } => ApiError::WindowUnavailable {
                message: format!("'{window}': {reason}"),
            },
            CoreError::QueueEmpty => ApiError::QueueEmpty,
            CoreError::ServiceClosed { service } => ApiError::InvalidState {
                message: format!("service '{service}' is paused and not accepting new tickets"),
            },
        },
        EngineError::Persistence(persistence) => match persistence {
            PersistenceError::ServiceNotFound(id) => ApiError::ResourceNotFound {
                resource_type: String::from("Service"),
                message: format!("Service {id} does not exist"),
            },
            PersistenceError::WindowNotFound(id) => ApiError::ResourceNotFound {
                resource_type: String::from("Window"),
                message: format!("Window {id} does not exist"),
            },
            PersistenceError::TicketNotFound(id) => ApiError::ResourceNotFound {
                resource_type: String::from("Ticket"),
                message: format!("Ticket {id} does not exist"),
            },
            PersistenceError::Conflict(msg) => ApiError::Conflict { message: msg },
            other => ApiError::Internal {
                message: other.to_string(),
            },
        },
    }
}
