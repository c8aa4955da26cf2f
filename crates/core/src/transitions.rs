// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Ticket lifecycle operations.
//!
//! Each function consumes the current ticket (and collaborating
//! entities), validates the transition, and returns the updated ticket
//! together with the queue event recording the change. The engine
//! persists both inside one transaction; on error nothing was built,
//! so nothing can be written.

use crate::binding::validate_window_for_call;
use crate::error::CoreError;
use qms_audit::{Action, Actor, QueueEvent};
use qms_domain::{StaffIdentity, Ticket, TicketStatus, Window};

/// The result of a single-ticket transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionResult {
    /// The ticket after the transition.
    pub ticket: Ticket,
    /// The event recording the transition.
    pub event: QueueEvent,
}

/// The result of assigning a ticket to a window.
///
/// When the window was already serving a ticket, that ticket is
/// auto-completed in the same operation and returned alongside.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallOutcome {
    /// The ticket now being served at the window.
    pub ticket: Ticket,
    /// The previous occupant, auto-completed, if there was one.
    pub completed_prior: Option<Ticket>,
    /// Events for the auto-completion (if any) and the assignment,
    /// in that order.
    pub events: Vec<QueueEvent>,
}

/// Builds the audit actor for a staff identity.
#[must_use]
pub fn actor_for(staff: &StaffIdentity) -> Actor {
    let actor_type = match staff {
        StaffIdentity::Public => "public",
        StaffIdentity::Staff { .. } => "staff",
        StaffIdentity::Admin { .. } => "admin",
    };
    Actor::new(staff.audit_label(), actor_type.to_string())
}

/// Builds a ticket-scoped event for a completed transition.
fn event_for(
    ticket: &Ticket,
    action: &str,
    details: Option<String>,
    prior: TicketStatus,
    staff: &StaffIdentity,
    now: &str,
) -> QueueEvent {
    QueueEvent::for_ticket(
        ticket.service_id,
        ticket.ticket_id.unwrap_or_default(),
        actor_for(staff),
        Action::new(action.to_string(), details),
        prior.as_str().to_string(),
        ticket.status.as_str().to_string(),
        now.to_string(),
    )
}

/// Assigns a ticket to a window for service.
///
/// Backs `call_next`, `call_specific`, and `start_serving`: the ticket
/// must be `waiting` or `notified`, the window must be active and
/// belong to the ticket's service. If the window is already serving a
/// ticket (`prior_serving`), that ticket is completed first; the
/// combined outcome must be committed atomically by the caller.
///
/// # Arguments
///
/// * `ticket` - The ticket to assign
/// * `window` - The target window
/// * `prior_serving` - The window's current `serving` ticket, if any
/// * `staff` - The staff member performing the call
/// * `action` - The action name recorded in the event trail
/// * `now` - The current timestamp (RFC 3339)
///
/// # Errors
///
/// Returns an error if the window is unusable or the ticket's status
/// does not permit the transition. No entities are modified on error.
pub fn call_to_window(
    ticket: Ticket,
    window: &Window,
    prior_serving: Option<Ticket>,
    staff: &StaffIdentity,
    action: &str,
    now: &str,
) -> Result<CallOutcome, CoreError> {
    validate_window_for_call(window, ticket.service_id)?;

    let prior_status = ticket.status;
    prior_status.validate_transition(TicketStatus::Serving)?;

    let mut events: Vec<QueueEvent> = Vec::with_capacity(2);

    // One ticket per window: finish the current occupant before the
    // new assignment becomes visible.
    let completed_prior = match prior_serving {
        Some(occupant) => {
            let result = complete_ticket(occupant, staff, now)?;
            events.push(result.event);
            Some(result.ticket)
        }
        None => None,
    };

    let mut ticket = ticket;
    ticket.status = TicketStatus::Serving;
    ticket.called_by = staff.staff_id();
    ticket.called_at = Some(now.to_string());
    ticket.assigned_window = window.window_id;

    events.push(event_for(
        &ticket,
        action,
        Some(format!("window {}", window.window_number)),
        prior_status,
        staff,
        now,
    ));

    Ok(CallOutcome {
        ticket,
        completed_prior,
        events,
    })
}

/// Marks a waiting ticket as notified (pre-called).
///
/// # Errors
///
/// Returns an error unless the ticket is `waiting`.
pub fn notify_ticket(
    ticket: Ticket,
    staff: &StaffIdentity,
    now: &str,
) -> Result<TransitionResult, CoreError> {
    let prior_status = ticket.status;
    prior_status.validate_transition(TicketStatus::Notified)?;

    let mut ticket = ticket;
    ticket.status = TicketStatus::Notified;
    ticket.called_by = staff.staff_id();
    ticket.called_at = Some(now.to_string());

    let event = event_for(&ticket, "NotifyTicket", None, prior_status, staff, now);
    Ok(TransitionResult { ticket, event })
}

/// Completes a ticket currently being served.
///
/// # Errors
///
/// Returns an error unless the ticket is `serving`.
pub fn complete_ticket(
    ticket: Ticket,
    staff: &StaffIdentity,
    now: &str,
) -> Result<TransitionResult, CoreError> {
    let prior_status = ticket.status;
    prior_status.validate_transition(TicketStatus::Served)?;

    let mut ticket = ticket;
    ticket.status = TicketStatus::Served;
    ticket.served_by = staff.staff_id();
    ticket.served_at = Some(now.to_string());

    let event = event_for(&ticket, "CompleteTicket", None, prior_status, staff, now);
    Ok(TransitionResult { ticket, event })
}

/// Removes a ticket from the queue (cancels it), recording the reason.
///
/// Valid from any state except `served`.
///
/// # Errors
///
/// Returns an error if the ticket is already served or cancelled.
pub fn remove_ticket(
    ticket: Ticket,
    reason: &str,
    staff: &StaffIdentity,
    now: &str,
) -> Result<TransitionResult, CoreError> {
    let prior_status = ticket.status;
    prior_status.validate_transition(TicketStatus::Cancelled)?;

    let mut ticket = ticket;
    ticket.status = TicketStatus::Cancelled;
    ticket.notes = Some(format!("Removed from queue: {reason}"));

    let event = event_for(
        &ticket,
        "RemoveTicket",
        Some(reason.to_string()),
        prior_status,
        staff,
        now,
    );
    Ok(TransitionResult { ticket, event })
}

/// Skips a ticket whose holder did not show up when called.
///
/// Skipped tickets stay recallable for the rest of the day.
///
/// # Errors
///
/// Returns an error unless the ticket is `waiting` or `notified`.
pub fn skip_ticket(
    ticket: Ticket,
    reason: &str,
    staff: &StaffIdentity,
    now: &str,
) -> Result<TransitionResult, CoreError> {
    let prior_status = ticket.status;
    prior_status.validate_transition(TicketStatus::Skipped)?;

    let mut ticket = ticket;
    ticket.status = TicketStatus::Skipped;
    ticket.skipped_at = Some(now.to_string());
    ticket.notes = Some(format!("Skipped: {reason}"));

    let event = event_for(
        &ticket,
        "SkipTicket",
        Some(reason.to_string()),
        prior_status,
        staff,
        now,
    );
    Ok(TransitionResult { ticket, event })
}

/// Returns a notified, skipped, or cancelled ticket to the waiting
/// queue at its original position.
///
/// The call attribution is cleared; the prior state is prepended to the
/// ticket's notes so the day's record stays readable.
///
/// # Errors
///
/// Returns an error from any other state, notably `serving` and
/// `served`.
pub fn recall_ticket(
    ticket: Ticket,
    staff: &StaffIdentity,
    now: &str,
) -> Result<TransitionResult, CoreError> {
    let prior_status = ticket.status;
    prior_status.validate_transition(TicketStatus::Waiting)?;

    let mut ticket = ticket;
    ticket.status = TicketStatus::Waiting;
    ticket.called_by = None;
    ticket.called_at = None;
    ticket.assigned_window = None;
    ticket.notes = Some(match ticket.notes.take() {
        Some(notes) => format!("Recalled from {prior_status}: {notes}"),
        None => format!("Recalled from {prior_status}"),
    });

    let event = event_for(&ticket, "RecallTicket", None, prior_status, staff, now);
    Ok(TransitionResult { ticket, event })
}
