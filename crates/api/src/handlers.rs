// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handler functions for state-changing and read-only operations.
//!
//! Each handler: authorizes the caller, invokes the engine, and
//! translates errors into the API contract. The `today`/`now` pair is
//! captured once per request by the server (see [`crate::clock`]) and
//! threaded through so the day boundary is decided exactly once.

use qms_domain::{
    StaffIdentity, TicketStatus, WindowStatus, validate_average_service_time, validate_prefix,
    validate_service_name, validate_window_number,
};
use qms_persistence::QueueEngine;
use std::str::FromStr;
use time::Date;
use tracing::debug;
use uuid::Uuid;

use crate::auth::AuthorizationService;
use crate::error::{ApiError, translate_domain_error, translate_engine_error};
use crate::request_response::{
    BindWindowResponse, CallTicketRequest, CallTicketResponse, CreateServiceRequest,
    CreateWindowRequest, DashboardWindowInfo, EventInfo, IssueTicketRequest, IssueTicketResponse,
    QueueInfo, ReleaseWindowResponse, ServiceBoardResponse, ServiceInfo, ServingInfo,
    StaffDashboardResponse, TicketActionRequest, TicketInfo, TicketStatusResponse,
    UpdateServiceRequest, UpdateWindowStatusRequest, WindowInfo,
};

/// Issues a new ticket (public kiosk operation).
///
/// # Errors
///
/// Returns an error for an unknown service or a paused queue.
pub fn issue_ticket(
    engine: &mut QueueEngine,
    identity: &StaffIdentity,
    request: &IssueTicketRequest,
    today: Date,
    now: &str,
) -> Result<IssueTicketResponse, ApiError> {
    let issued = engine
        .issue_ticket(identity, request.service_id, today, now)
        .map_err(translate_engine_error)?;

    let display = issued.service.display_number(issued.ticket.queue_number);
    let ticket = TicketInfo::from_parts(
        &issued.ticket,
        &issued.service,
        issued.people_ahead,
        issued.estimated_wait_minutes,
    );

    Ok(IssueTicketResponse {
        message: format!(
            "Ticket {display} generated for today ({})",
            issued.ticket.ticket_date
        ),
        ticket,
        total_today: issued.total_today,
    })
}

/// Calls the next waiting ticket to a window (staff operation).
///
/// # Errors
///
/// Returns an error if the caller is not staff for the window's
/// service, the window cannot take calls, or the queue is empty.
pub fn call_next(
    engine: &mut QueueEngine,
    identity: &StaffIdentity,
    window_id: i64,
    today: Date,
    now: &str,
) -> Result<CallTicketResponse, ApiError> {
    let window = engine.get_window(window_id).map_err(translate_engine_error)?;
    AuthorizationService::authorize_queue_operation(identity, window.service_id, "call_next")?;

    let result = engine
        .call_next(identity, window_id, today, now)
        .map_err(translate_engine_error)?;

    call_response(engine, result)
}

/// Calls a specific ticket to a window (staff operation).
///
/// # Errors
///
/// Returns an error if the caller is not staff for the ticket's
/// service, the ticket is not callable, or the window is unavailable.
pub fn call_specific(
    engine: &mut QueueEngine,
    identity: &StaffIdentity,
    request: &CallTicketRequest,
    today: Date,
    now: &str,
) -> Result<CallTicketResponse, ApiError> {
    authorize_for_ticket(engine, identity, request.ticket_id, "call_specific")?;

    let result = engine
        .call_specific(identity, request.ticket_id, request.window_id, today, now)
        .map_err(translate_engine_error)?;

    call_response(engine, result)
}

/// Begins serving a pre-notified ticket (staff operation).
///
/// # Errors
///
/// Same failure modes as [`call_specific`].
pub fn start_serving(
    engine: &mut QueueEngine,
    identity: &StaffIdentity,
    request: &CallTicketRequest,
    today: Date,
    now: &str,
) -> Result<CallTicketResponse, ApiError> {
    authorize_for_ticket(engine, identity, request.ticket_id, "start_serving")?;

    let result = engine
        .start_serving(identity, request.ticket_id, request.window_id, today, now)
        .map_err(translate_engine_error)?;

    call_response(engine, result)
}

/// Marks a waiting ticket as notified (staff operation).
///
/// # Errors
///
/// Returns an error unless the ticket is `waiting`.
pub fn notify_ticket(
    engine: &mut QueueEngine,
    identity: &StaffIdentity,
    request: &TicketActionRequest,
    now: &str,
) -> Result<TicketStatusResponse, ApiError> {
    authorize_for_ticket(engine, identity, request.ticket_id, "notify_ticket")?;

    let ticket = engine
        .notify_ticket(identity, request.ticket_id, now)
        .map_err(translate_engine_error)?;

    ticket_response(engine, &ticket)
}

/// Completes the ticket currently being served (staff operation).
///
/// # Errors
///
/// Returns an error unless the ticket is `serving`.
pub fn complete_ticket(
    engine: &mut QueueEngine,
    identity: &StaffIdentity,
    request: &TicketActionRequest,
    now: &str,
) -> Result<TicketStatusResponse, ApiError> {
    authorize_for_ticket(engine, identity, request.ticket_id, "complete_ticket")?;

    let ticket = engine
        .complete_ticket(identity, request.ticket_id, now)
        .map_err(translate_engine_error)?;

    ticket_response(engine, &ticket)
}

/// Removes a ticket from the queue (staff operation).
///
/// # Errors
///
/// Returns an error if the ticket was already served.
pub fn remove_ticket(
    engine: &mut QueueEngine,
    identity: &StaffIdentity,
    request: &TicketActionRequest,
    now: &str,
) -> Result<TicketStatusResponse, ApiError> {
    authorize_for_ticket(engine, identity, request.ticket_id, "remove_ticket")?;

    let reason = request.reason.as_deref().unwrap_or("No reason provided");
    let ticket = engine
        .remove_ticket(identity, request.ticket_id, reason, now)
        .map_err(translate_engine_error)?;

    ticket_response(engine, &ticket)
}

/// Skips a ticket whose holder did not show up (staff operation).
///
/// # Errors
///
/// Returns an error unless the ticket is `waiting` or `notified`.
pub fn skip_ticket(
    engine: &mut QueueEngine,
    identity: &StaffIdentity,
    request: &TicketActionRequest,
    now: &str,
) -> Result<TicketStatusResponse, ApiError> {
    authorize_for_ticket(engine, identity, request.ticket_id, "skip_ticket")?;

    let reason = request.reason.as_deref().unwrap_or("No show");
    let ticket = engine
        .skip_ticket(identity, request.ticket_id, reason, now)
        .map_err(translate_engine_error)?;

    ticket_response(engine, &ticket)
}

/// Recalls a notified, skipped, or cancelled ticket back to the queue
/// (staff operation).
///
/// # Errors
///
/// Returns an error from any other ticket state.
pub fn recall_ticket(
    engine: &mut QueueEngine,
    identity: &StaffIdentity,
    request: &TicketActionRequest,
    now: &str,
) -> Result<TicketStatusResponse, ApiError> {
    authorize_for_ticket(engine, identity, request.ticket_id, "recall_ticket")?;

    let ticket = engine
        .recall_ticket(identity, request.ticket_id, now)
        .map_err(translate_engine_error)?;

    ticket_response(engine, &ticket)
}

/// Binds the calling staff member to a window.
///
/// # Errors
///
/// Returns an error if the window is unavailable or the caller has no
/// staff identity.
pub fn bind_window(
    engine: &mut QueueEngine,
    identity: &StaffIdentity,
    window_id: i64,
    now: &str,
) -> Result<BindWindowResponse, ApiError> {
    let window = engine.get_window(window_id).map_err(translate_engine_error)?;
    AuthorizationService::authorize_queue_operation(identity, window.service_id, "bind_window")?;

    let window = engine
        .bind_window(identity, window_id, now)
        .map_err(translate_engine_error)?;
    let service = engine
        .get_service(window.service_id)
        .map_err(translate_engine_error)?;

    Ok(BindWindowResponse {
        message: format!("You are now manning {}", window.display_name()),
        window: WindowInfo::from_window(&window),
        service: ServiceInfo::from_service(&service),
    })
}

/// Releases the calling staff member's window (logout or switch).
///
/// # Errors
///
/// Returns an error if the store fails.
pub fn release_window(
    engine: &mut QueueEngine,
    identity: &StaffIdentity,
    now: &str,
) -> Result<ReleaseWindowResponse, ApiError> {
    let released = engine
        .release_window(identity, now)
        .map_err(translate_engine_error)?;

    Ok(match released {
        Some(window) => ReleaseWindowResponse {
            message: format!("Released {}", window.display_name()),
            window: Some(WindowInfo::from_window(&window)),
        },
        None => ReleaseWindowResponse {
            message: String::from("No window was assigned"),
            window: None,
        },
    })
}

/// Creates a service (admin operation).
///
/// # Errors
///
/// Returns an error for invalid fields, a duplicate name/prefix, or a
/// non-admin caller.
pub fn create_service(
    engine: &mut QueueEngine,
    identity: &StaffIdentity,
    request: &CreateServiceRequest,
    now: &str,
) -> Result<ServiceInfo, ApiError> {
    AuthorizationService::authorize_admin(identity, "create_service")?;
    validate_service_request(
        &request.name,
        request.prefix.as_deref(),
        request.average_service_time,
    )?;

    let service = engine
        .create_service(
            identity,
            &request.name,
            request.prefix.as_deref(),
            request.description.clone(),
            request.average_service_time,
            now,
        )
        .map_err(translate_engine_error)?;

    Ok(ServiceInfo::from_service(&service))
}

/// Updates a service (admin operation).
///
/// # Errors
///
/// Returns an error for invalid fields, an unknown service, or a
/// non-admin caller.
pub fn update_service(
    engine: &mut QueueEngine,
    identity: &StaffIdentity,
    request: &UpdateServiceRequest,
    now: &str,
) -> Result<ServiceInfo, ApiError> {
    AuthorizationService::authorize_admin(identity, "update_service")?;
    validate_service_request(
        &request.name,
        request.prefix.as_deref(),
        request.average_service_time,
    )?;

    let service = engine
        .update_service(
            identity,
            request.service_id,
            &request.name,
            request.prefix.as_deref(),
            request.description.clone(),
            request.average_service_time,
            now,
        )
        .map_err(translate_engine_error)?;

    Ok(ServiceInfo::from_service(&service))
}

/// Pauses or resumes a service's queue (staff or admin of that
/// service).
///
/// # Errors
///
/// Returns an error if the caller is not authorized for the service.
pub fn toggle_queue(
    engine: &mut QueueEngine,
    identity: &StaffIdentity,
    service_id: i64,
    active: bool,
    now: &str,
) -> Result<ServiceInfo, ApiError> {
    AuthorizationService::authorize_queue_operation(identity, service_id, "toggle_queue")?;

    let service = engine
        .set_service_active(identity, service_id, active, now)
        .map_err(translate_engine_error)?;

    debug!(service_id, active, "Queue toggled");
    Ok(ServiceInfo::from_service(&service))
}

/// Creates a window (admin operation).
///
/// # Errors
///
/// Returns an error for an unknown service, a duplicate window number,
/// or a non-admin caller.
pub fn create_window(
    engine: &mut QueueEngine,
    identity: &StaffIdentity,
    request: &CreateWindowRequest,
    now: &str,
) -> Result<WindowInfo, ApiError> {
    AuthorizationService::authorize_admin(identity, "create_window")?;
    validate_window_number(request.window_number).map_err(translate_domain_error)?;

    let window = engine
        .create_window(
            identity,
            request.service_id,
            request.window_number,
            request.name.clone(),
            now,
        )
        .map_err(translate_engine_error)?;

    Ok(WindowInfo::from_window(&window))
}

/// Changes a window's operational status (admin operation).
///
/// # Errors
///
/// Returns an error for an unknown window, an unknown status string,
/// or a non-admin caller.
pub fn update_window_status(
    engine: &mut QueueEngine,
    identity: &StaffIdentity,
    request: &UpdateWindowStatusRequest,
    now: &str,
) -> Result<WindowInfo, ApiError> {
    AuthorizationService::authorize_admin(identity, "update_window_status")?;
    let status = WindowStatus::from_str(&request.status).map_err(translate_domain_error)?;

    let window = engine
        .update_window_status(identity, request.window_id, status, now)
        .map_err(translate_engine_error)?;

    Ok(WindowInfo::from_window(&window))
}

/// Lists services (public read).
///
/// # Errors
///
/// Returns an error if the store fails.
pub fn list_services(engine: &QueueEngine) -> Result<Vec<ServiceInfo>, ApiError> {
    let services = engine.list_services().map_err(translate_engine_error)?;
    Ok(services.iter().map(ServiceInfo::from_service).collect())
}

/// Lists a service's windows (public read).
///
/// # Errors
///
/// Returns an error if the store fails.
pub fn list_windows(engine: &QueueEngine, service_id: i64) -> Result<Vec<WindowInfo>, ApiError> {
    // Reject unknown services with a 404 rather than an empty list
    let _service = engine
        .get_service(service_id)
        .map_err(translate_engine_error)?;
    let windows = engine
        .list_windows(service_id)
        .map_err(translate_engine_error)?;
    Ok(windows.iter().map(WindowInfo::from_window).collect())
}

/// Looks up a ticket by public ID with live position data (public
/// read).
///
/// # Errors
///
/// Returns an error if the ticket does not exist.
pub fn ticket_status(
    engine: &QueueEngine,
    ticket_id: Uuid,
) -> Result<TicketStatusResponse, ApiError> {
    let ticket = engine.get_ticket(ticket_id).map_err(translate_engine_error)?;
    let snapshot = engine
        .queue_snapshot(ticket.service_id, ticket.ticket_date)
        .map_err(translate_engine_error)?;

    Ok(TicketStatusResponse {
        ticket: TicketInfo::from_snapshot(&ticket, &snapshot),
    })
}

/// Builds the public service board (display boards; public read).
///
/// # Errors
///
/// Returns an error if the service does not exist.
pub fn service_board(
    engine: &QueueEngine,
    service_id: i64,
    today: Date,
) -> Result<ServiceBoardResponse, ApiError> {
    let snapshot = engine
        .queue_snapshot(service_id, today)
        .map_err(translate_engine_error)?;
    let windows = engine
        .list_windows(service_id)
        .map_err(translate_engine_error)?;

    let currently_serving = snapshot
        .currently_serving(&windows)
        .into_iter()
        .map(|entry| ServingInfo {
            window: WindowInfo::from_window(entry.window),
            display_number: snapshot.service.display_number(entry.ticket.queue_number),
            queue_number: entry.ticket.queue_number,
        })
        .collect();

    Ok(ServiceBoardResponse {
        service: ServiceInfo::from_service(&snapshot.service),
        stats: snapshot.stats(),
        currently_serving,
    })
}

/// Builds the staff dashboard for the caller's service.
///
/// # Errors
///
/// Returns an error if the caller is not authorized for the service.
pub fn staff_dashboard(
    engine: &QueueEngine,
    identity: &StaffIdentity,
    service_id: i64,
    today: Date,
) -> Result<StaffDashboardResponse, ApiError> {
    AuthorizationService::authorize_queue_operation(identity, service_id, "staff_dashboard")?;

    let snapshot = engine
        .queue_snapshot(service_id, today)
        .map_err(translate_engine_error)?;
    let windows = engine
        .list_windows(service_id)
        .map_err(translate_engine_error)?;

    let waiting_preview: Vec<String> = snapshot
        .tickets
        .iter()
        .filter(|t| t.status == TicketStatus::Waiting)
        .take(10)
        .map(|t| snapshot.service.display_number(t.queue_number))
        .collect();

    let dashboard_windows: Vec<DashboardWindowInfo> = windows
        .iter()
        .map(|window| {
            let current_ticket = snapshot
                .tickets
                .iter()
                .find(|t| {
                    t.status == TicketStatus::Serving && t.assigned_window == window.window_id
                })
                .map(|t| TicketInfo::from_snapshot(t, &snapshot));
            DashboardWindowInfo {
                window: WindowInfo::from_window(window),
                current_ticket,
            }
        })
        .collect();

    Ok(StaffDashboardResponse {
        service: ServiceInfo::from_service(&snapshot.service),
        stats: snapshot.stats(),
        waiting_preview,
        windows: dashboard_windows,
    })
}

/// Retrieves a service's event trail (staff read).
///
/// # Errors
///
/// Returns an error if the service does not exist or the caller is
/// not authorized for it.
pub fn service_events(
    engine: &QueueEngine,
    identity: &StaffIdentity,
    service_id: i64,
) -> Result<Vec<EventInfo>, ApiError> {
    let _service = engine
        .get_service(service_id)
        .map_err(translate_engine_error)?;
    AuthorizationService::authorize_queue_operation(identity, service_id, "service_events")?;

    let events = engine
        .events_for_service(service_id)
        .map_err(translate_engine_error)?;
    Ok(events.iter().map(EventInfo::from_event).collect())
}

/// Retrieves a ticket's event trail (staff read).
///
/// # Errors
///
/// Returns an error if the ticket does not exist or the caller is not
/// authorized for its service.
pub fn ticket_events(
    engine: &QueueEngine,
    identity: &StaffIdentity,
    ticket_id: Uuid,
) -> Result<Vec<EventInfo>, ApiError> {
    authorize_for_ticket(engine, identity, ticket_id, "ticket_events")?;

    let events = engine
        .events_for_ticket(ticket_id)
        .map_err(translate_engine_error)?;
    Ok(events.iter().map(EventInfo::from_event).collect())
}

/// Shared ticket-scope authorization: the ticket must exist and the
/// caller must be authorized for its service.
fn authorize_for_ticket(
    engine: &QueueEngine,
    identity: &StaffIdentity,
    ticket_id: Uuid,
    action: &str,
) -> Result<(), ApiError> {
    let ticket = engine.get_ticket(ticket_id).map_err(translate_engine_error)?;
    AuthorizationService::authorize_queue_operation(identity, ticket.service_id, action)?;
    Ok(())
}

/// Validates admin-supplied service fields before touching the engine.
fn validate_service_request(
    name: &str,
    prefix: Option<&str>,
    average_service_time: u32,
) -> Result<(), ApiError> {
    validate_service_name(name).map_err(translate_domain_error)?;
    if let Some(prefix) = prefix {
        validate_prefix(prefix).map_err(translate_domain_error)?;
    }
    validate_average_service_time(average_service_time).map_err(translate_domain_error)?;
    Ok(())
}

/// Builds the response for a completed call operation.
fn call_response(
    engine: &QueueEngine,
    result: qms_persistence::CallResult,
) -> Result<CallTicketResponse, ApiError> {
    let service = engine
        .get_service(result.window.service_id)
        .map_err(translate_engine_error)?;

    let display = service.display_number(result.ticket.queue_number);
    let message = format!("Now serving {display} at {}", result.window.display_name());

    Ok(CallTicketResponse {
        message,
        ticket: TicketInfo::from_parts(&result.ticket, &service, 0, 0),
        window: WindowInfo::from_window(&result.window),
        completed: result
            .completed_prior
            .as_ref()
            .map(|t| TicketInfo::from_parts(t, &service, 0, 0)),
        queue: QueueInfo {
            waiting_count: result.waiting_count,
            next_waiting: result.next_waiting,
        },
    })
}

/// Builds a single-ticket response with live position data.
fn ticket_response(
    engine: &QueueEngine,
    ticket: &qms_domain::Ticket,
) -> Result<TicketStatusResponse, ApiError> {
    let snapshot = engine
        .queue_snapshot(ticket.service_id, ticket.ticket_date)
        .map_err(translate_engine_error)?;
    Ok(TicketStatusResponse {
        ticket: TicketInfo::from_snapshot(ticket, &snapshot),
    })
}
