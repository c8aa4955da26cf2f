// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::{ApiError, translate_engine_error};
use qms::CoreError;
use qms_domain::DomainError;
use qms_persistence::{EngineError, PersistenceError};

#[test]
fn test_invalid_transition_message_names_observed_and_required_states() {
    let err = EngineError::Core(CoreError::DomainViolation(
        DomainError::InvalidStatusTransition {
            from: String::from("waiting"),
            to: String::from("served"),
            reason: String::from("transition not permitted by ticket lifecycle rules"),
        },
    ));

    match translate_engine_error(err) {
        ApiError::InvalidState { message } => {
            assert!(message.contains("'waiting'"), "observed state: {message}");
            assert!(message.contains("'serving'"), "required state: {message}");
        }
        other => panic!("Expected InvalidState, got {other:?}"),
    }
}

#[test]
fn test_not_found_translations() {
    assert!(matches!(
        translate_engine_error(EngineError::Persistence(PersistenceError::TicketNotFound(
            String::from("abc")
        ))),
        ApiError::ResourceNotFound { resource_type, .. } if resource_type == "Ticket"
    ));
    assert!(matches!(
        translate_engine_error(EngineError::Persistence(PersistenceError::WindowNotFound(7))),
        ApiError::ResourceNotFound { resource_type, .. } if resource_type == "Window"
    ));
    assert!(matches!(
        translate_engine_error(EngineError::Persistence(PersistenceError::ServiceNotFound(
            7
        ))),
        ApiError::ResourceNotFound { resource_type, .. } if resource_type == "Service"
    ));
}

#[test]
fn test_queue_and_window_translations() {
    assert_eq!(
        translate_engine_error(EngineError::Core(CoreError::QueueEmpty)),
        ApiError::QueueEmpty
    );
    assert!(matches!(
        translate_engine_error(EngineError::Core(CoreError::WindowUnavailable {
            window: String::from("Window 1"),
            reason: String::from("window is maintenance"),
        })),
        ApiError::WindowUnavailable { .. }
    ));
}

#[test]
fn test_allocation_conflict_never_user_facing() {
    // The engine retries conflicts internally; if one leaks this far it
    // is an internal fault, not a client error.
    let translated = translate_engine_error(EngineError::Persistence(
        PersistenceError::AllocationConflict {
            service_id: 1,
            queue_number: 5,
        },
    ));
    assert!(matches!(translated, ApiError::Internal { .. }));
}
