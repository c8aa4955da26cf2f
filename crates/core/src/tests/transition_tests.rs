// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{NOW, test_staff, test_ticket, test_window};
use crate::error::CoreError;
use crate::transitions::{
    call_to_window, complete_ticket, notify_ticket, recall_ticket, remove_ticket, skip_ticket,
};
use qms_domain::{DomainError, TicketStatus, Window, WindowStatus};

#[test]
fn test_call_assigns_waiting_ticket() {
    let ticket = test_ticket(1, 1, TicketStatus::Waiting);
    let window = test_window();
    let staff = test_staff();

    let outcome = match call_to_window(ticket, &window, None, &staff, "CallNext", NOW) {
        Ok(outcome) => outcome,
        Err(e) => panic!("Call failed: {e}"),
    };

    assert_eq!(outcome.ticket.status, TicketStatus::Serving);
    assert_eq!(outcome.ticket.assigned_window, Some(10));
    assert_eq!(outcome.ticket.called_by, Some(3));
    assert_eq!(outcome.ticket.called_at.as_deref(), Some(NOW));
    assert!(outcome.completed_prior.is_none());
    assert_eq!(outcome.events.len(), 1);
    assert_eq!(outcome.events[0].action.name, "CallNext");
    assert_eq!(outcome.events[0].prior_status.as_deref(), Some("waiting"));
    assert_eq!(outcome.events[0].new_status.as_deref(), Some("serving"));
}

#[test]
fn test_call_accepts_notified_ticket() {
    let ticket = test_ticket(1, 1, TicketStatus::Notified);
    let window = test_window();

    let result = call_to_window(ticket, &window, None, &test_staff(), "StartServing", NOW);
    assert!(result.is_ok());
}

#[test]
fn test_call_completes_prior_occupant_first() {
    let ticket = test_ticket(2, 2, TicketStatus::Waiting);
    let occupant = test_ticket(1, 1, TicketStatus::Serving);
    let window = test_window();
    let staff = test_staff();

    let outcome = match call_to_window(ticket, &window, Some(occupant), &staff, "CallNext", NOW) {
        Ok(outcome) => outcome,
        Err(e) => panic!("Call failed: {e}"),
    };

    let prior = outcome.completed_prior.as_ref();
    assert_eq!(prior.map(|t| t.status), Some(TicketStatus::Served));
    assert_eq!(prior.and_then(|t| t.served_by), Some(3));
    assert_eq!(
        prior.and_then(|t| t.served_at.as_deref()),
        Some(NOW),
        "auto-completed ticket must carry served_at"
    );

    // Completion event first, then the assignment event
    assert_eq!(outcome.events.len(), 2);
    assert_eq!(outcome.events[0].action.name, "CompleteTicket");
    assert_eq!(outcome.events[1].action.name, "CallNext");
}

#[test]
fn test_call_rejects_served_ticket() {
    let ticket = test_ticket(1, 1, TicketStatus::Served);
    let window = test_window();

    let result = call_to_window(ticket, &window, None, &test_staff(), "CallSpecific", NOW);
    assert!(matches!(result, Err(CoreError::DomainViolation(_))));
}

#[test]
fn test_call_rejects_inactive_window() {
    let ticket = test_ticket(1, 1, TicketStatus::Waiting);
    let window = Window::with_id(10, 1, 1, None, WindowStatus::Maintenance, None);

    let result = call_to_window(ticket, &window, None, &test_staff(), "CallNext", NOW);
    assert!(matches!(result, Err(CoreError::WindowUnavailable { .. })));
}

#[test]
fn test_call_rejects_cross_service_window() {
    let ticket = test_ticket(1, 1, TicketStatus::Waiting);
    let window = Window::with_id(10, 2, 1, None, WindowStatus::Active, None);

    let result = call_to_window(ticket, &window, None, &test_staff(), "CallNext", NOW);
    assert!(matches!(result, Err(CoreError::WindowUnavailable { .. })));
}

#[test]
fn test_notify_only_from_waiting() {
    let staff = test_staff();

    let waiting = test_ticket(1, 1, TicketStatus::Waiting);
    let result = match notify_ticket(waiting, &staff, NOW) {
        Ok(result) => result,
        Err(e) => panic!("Notify failed: {e}"),
    };
    assert_eq!(result.ticket.status, TicketStatus::Notified);
    assert_eq!(result.ticket.called_by, Some(3));

    let serving = test_ticket(2, 2, TicketStatus::Serving);
    assert!(notify_ticket(serving, &staff, NOW).is_err());
}

#[test]
fn test_complete_only_from_serving() {
    let staff = test_staff();

    let serving = test_ticket(1, 1, TicketStatus::Serving);
    let result = match complete_ticket(serving, &staff, NOW) {
        Ok(result) => result,
        Err(e) => panic!("Complete failed: {e}"),
    };
    assert_eq!(result.ticket.status, TicketStatus::Served);
    assert_eq!(result.ticket.served_by, Some(3));
    assert_eq!(result.ticket.served_at.as_deref(), Some(NOW));

    for status in [
        TicketStatus::Waiting,
        TicketStatus::Notified,
        TicketStatus::Served,
        TicketStatus::Cancelled,
        TicketStatus::Skipped,
    ] {
        let ticket = test_ticket(2, 2, status);
        assert!(
            complete_ticket(ticket, &staff, NOW).is_err(),
            "complete must fail from {status}"
        );
    }
}

#[test]
fn test_remove_fails_on_served_ticket() {
    let staff = test_staff();
    let served = test_ticket(1, 1, TicketStatus::Served);

    let result = remove_ticket(served, "duplicate", &staff, NOW);
    assert!(matches!(
        result,
        Err(CoreError::DomainViolation(
            DomainError::InvalidStatusTransition { .. }
        ))
    ));
}

#[test]
fn test_remove_records_reason() {
    let staff = test_staff();
    let ticket = test_ticket(1, 1, TicketStatus::Waiting);

    let result = match remove_ticket(ticket, "customer left", &staff, NOW) {
        Ok(result) => result,
        Err(e) => panic!("Remove failed: {e}"),
    };
    assert_eq!(result.ticket.status, TicketStatus::Cancelled);
    assert_eq!(
        result.ticket.notes.as_deref(),
        Some("Removed from queue: customer left")
    );
    assert_eq!(result.event.action.details.as_deref(), Some("customer left"));
}

#[test]
fn test_remove_accepted_from_serving_and_skipped() {
    let staff = test_staff();

    for status in [TicketStatus::Serving, TicketStatus::Skipped] {
        let ticket = test_ticket(1, 1, status);
        assert!(remove_ticket(ticket, "closing", &staff, NOW).is_ok());
    }
}

#[test]
fn test_skip_only_from_queue() {
    let staff = test_staff();

    for status in [TicketStatus::Waiting, TicketStatus::Notified] {
        let ticket = test_ticket(1, 1, status);
        let result = match skip_ticket(ticket, "no show", &staff, NOW) {
            Ok(result) => result,
            Err(e) => panic!("Skip failed from {status}: {e}"),
        };
        assert_eq!(result.ticket.status, TicketStatus::Skipped);
        assert_eq!(result.ticket.skipped_at.as_deref(), Some(NOW));
    }

    let serving = test_ticket(2, 2, TicketStatus::Serving);
    assert!(skip_ticket(serving, "no show", &staff, NOW).is_err());
}

#[test]
fn test_recall_returns_ticket_to_waiting() {
    let staff = test_staff();

    for status in [
        TicketStatus::Notified,
        TicketStatus::Skipped,
        TicketStatus::Cancelled,
    ] {
        let mut ticket = test_ticket(1, 1, status);
        ticket.called_by = Some(3);
        ticket.called_at = Some(String::from("2026-08-06T08:30:00Z"));
        ticket.assigned_window = Some(10);

        let result = match recall_ticket(ticket, &staff, NOW) {
            Ok(result) => result,
            Err(e) => panic!("Recall failed from {status}: {e}"),
        };
        assert_eq!(result.ticket.status, TicketStatus::Waiting);
        assert_eq!(result.ticket.called_by, None);
        assert_eq!(result.ticket.called_at, None);
        assert_eq!(result.ticket.assigned_window, None);
        assert_eq!(
            result.event.prior_status.as_deref(),
            Some(status.as_str()),
            "event must record the prior state"
        );
    }
}

#[test]
fn test_recall_rejected_from_serving_and_served() {
    let staff = test_staff();

    for status in [TicketStatus::Serving, TicketStatus::Served, TicketStatus::Waiting] {
        let ticket = test_ticket(1, 1, status);
        assert!(
            recall_ticket(ticket, &staff, NOW).is_err(),
            "recall must fail from {status}"
        );
    }
}

#[test]
fn test_recall_prepends_prior_state_to_notes() {
    let staff = test_staff();
    let mut ticket = test_ticket(1, 1, TicketStatus::Skipped);
    ticket.notes = Some(String::from("Skipped: no show"));

    let result = match recall_ticket(ticket, &staff, NOW) {
        Ok(result) => result,
        Err(e) => panic!("Recall failed: {e}"),
    };
    assert_eq!(
        result.ticket.notes.as_deref(),
        Some("Recalled from skipped: Skipped: no show")
    );
}
