// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Request and response types forming the API contract.
//!
//! These are transport-neutral: the server layer wraps them in its own
//! envelope (actor fields, HTTP codes) and serializes them as JSON.

use qms_audit::QueueEvent;
use qms_domain::{QueueSnapshot, QueueStats, Service, Ticket, Window};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request to issue a new ticket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueTicketRequest {
    /// The service to queue for.
    pub service_id: i64,
}

/// Request to call a ticket to a window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallTicketRequest {
    /// The ticket's public ID.
    pub ticket_id: Uuid,
    /// The window to call it to.
    pub window_id: i64,
}

/// Request for a single-ticket staff action (complete, remove, skip,
/// recall, notify).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketActionRequest {
    /// The ticket's public ID.
    pub ticket_id: Uuid,
    /// Optional reason (remove and skip record it in the notes).
    pub reason: Option<String>,
}

/// Request to create a service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateServiceRequest {
    /// The unique service name.
    pub name: String,
    /// Optional display-number prefix.
    pub prefix: Option<String>,
    /// Optional description.
    pub description: Option<String>,
    /// Average minutes to serve one ticket.
    pub average_service_time: u32,
}

/// Request to update a service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateServiceRequest {
    /// The service to update.
    pub service_id: i64,
    /// The new name.
    pub name: String,
    /// The new prefix.
    pub prefix: Option<String>,
    /// The new description.
    pub description: Option<String>,
    /// The new average service time.
    pub average_service_time: u32,
}

/// Request to create a window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateWindowRequest {
    /// The owning service.
    pub service_id: i64,
    /// Position within the service.
    pub window_number: u32,
    /// Optional display name.
    pub name: Option<String>,
}

/// Request to change a window's operational status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateWindowStatusRequest {
    /// The window to update.
    pub window_id: i64,
    /// The new status ("active", "inactive", "maintenance").
    pub status: String,
}

/// Service data for responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceInfo {
    /// Canonical service ID.
    pub id: i64,
    /// The service name.
    pub name: String,
    /// Display-number prefix if set.
    pub prefix: Option<String>,
    /// Description if set.
    pub description: Option<String>,
    /// Whether the queue accepts new tickets.
    pub is_active: bool,
    /// Average minutes to serve one ticket.
    pub average_service_time: u32,
}

impl ServiceInfo {
    pub(crate) fn from_service(service: &Service) -> Self {
        Self {
            id: service.service_id().unwrap_or_default(),
            name: service.name().to_string(),
            prefix: service.prefix().map(str::to_string),
            description: service.description().map(str::to_string),
            is_active: service.is_active(),
            average_service_time: service.average_service_time(),
        }
    }
}

/// Window data for responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowInfo {
    /// Canonical window ID.
    pub id: i64,
    /// The owning service.
    pub service_id: i64,
    /// Position within the service.
    pub window_number: u32,
    /// Human-facing name ("Window 2" when unnamed).
    pub name: String,
    /// Operational status.
    pub status: String,
    /// Staff member currently manning the window, if any.
    pub current_staff: Option<i64>,
}

impl WindowInfo {
    pub(crate) fn from_window(window: &Window) -> Self {
        Self {
            id: window.window_id.unwrap_or_default(),
            service_id: window.service_id,
            window_number: window.window_number,
            name: window.display_name(),
            status: window.status.as_str().to_string(),
            current_staff: window.current_staff,
        }
    }
}

/// Ticket data for responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketInfo {
    /// Public ticket ID.
    pub ticket_id: Uuid,
    /// The owning service.
    pub service_id: i64,
    /// The service name.
    pub service_name: String,
    /// Position in the daily sequence.
    pub queue_number: u32,
    /// Human-facing label (e.g., "C001").
    pub display_number: String,
    /// Current lifecycle status.
    pub status: String,
    /// The day the ticket belongs to (ISO 8601 date).
    pub ticket_date: String,
    /// The window the ticket was called to, if any.
    pub assigned_window: Option<i64>,
    /// Tickets still queued ahead.
    pub people_ahead: u64,
    /// Estimated wait in minutes.
    pub estimated_wait_minutes: u64,
    /// Issuance timestamp (RFC 3339).
    pub created_at: String,
    /// When the ticket was last called, if called.
    pub called_at: Option<String>,
    /// When the ticket was completed, if served.
    pub served_at: Option<String>,
    /// Free-text notes.
    pub notes: Option<String>,
}

impl TicketInfo {
    /// Builds ticket info with position data taken from the snapshot.
    pub(crate) fn from_snapshot(ticket: &Ticket, snapshot: &QueueSnapshot) -> Self {
        let people_ahead = u64::try_from(snapshot.people_ahead(ticket)).unwrap_or(u64::MAX);
        let estimated_wait_minutes = snapshot.estimated_wait_minutes(ticket);
        Self::from_parts(
            ticket,
            &snapshot.service,
            people_ahead,
            estimated_wait_minutes,
        )
    }

    /// Builds ticket info from explicit position data.
    pub(crate) fn from_parts(
        ticket: &Ticket,
        service: &Service,
        people_ahead: u64,
        estimated_wait_minutes: u64,
    ) -> Self {
        Self {
            ticket_id: ticket.public_id,
            service_id: ticket.service_id,
            service_name: service.name().to_string(),
            queue_number: ticket.queue_number,
            display_number: service.display_number(ticket.queue_number),
            status: ticket.status.as_str().to_string(),
            ticket_date: ticket.ticket_date.to_string(),
            assigned_window: ticket.assigned_window,
            people_ahead,
            estimated_wait_minutes,
            created_at: ticket.created_at.clone(),
            called_at: ticket.called_at.clone(),
            served_at: ticket.served_at.clone(),
            notes: ticket.notes.clone(),
        }
    }
}

/// Response to a successful ticket issuance.
///
/// Carries everything the printer/notification consumer needs; that
/// consumer is downstream of issuance and can never fail it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueTicketResponse {
    /// Human-facing confirmation.
    pub message: String,
    /// The issued ticket.
    pub ticket: TicketInfo,
    /// Total tickets issued for the service today.
    pub total_today: u64,
}

/// Queue context returned with call operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueInfo {
    /// Tickets still waiting after the call.
    pub waiting_count: u64,
    /// Display number of the next waiting ticket, if any.
    pub next_waiting: Option<String>,
}

/// Response to call-next / call-specific / start-serving.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallTicketResponse {
    /// Human-facing confirmation.
    pub message: String,
    /// The ticket now being served.
    pub ticket: TicketInfo,
    /// The window it was called to.
    pub window: WindowInfo,
    /// The window's previous occupant, auto-completed, if any.
    pub completed: Option<TicketInfo>,
    /// Queue context after the call.
    pub queue: QueueInfo,
}

/// Response to a window bind.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BindWindowResponse {
    /// Human-facing confirmation.
    pub message: String,
    /// The bound window.
    pub window: WindowInfo,
    /// The window's service.
    pub service: ServiceInfo,
}

/// Response to a window release.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseWindowResponse {
    /// Human-facing confirmation.
    pub message: String,
    /// The released window, if one was held.
    pub window: Option<WindowInfo>,
}

/// Public ticket lookup response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketStatusResponse {
    /// The ticket with live position data.
    pub ticket: TicketInfo,
}

/// One currently-served ticket on the public board.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServingInfo {
    /// The window serving it.
    pub window: WindowInfo,
    /// The ticket's display number.
    pub display_number: String,
    /// The ticket's queue number.
    pub queue_number: u32,
}

/// Public service board: stats plus currently-serving per window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceBoardResponse {
    /// The service.
    pub service: ServiceInfo,
    /// Counts by status for today.
    pub stats: QueueStats,
    /// Currently-served tickets ordered by window number.
    pub currently_serving: Vec<ServingInfo>,
}

/// A window with its current ticket, for the staff dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardWindowInfo {
    /// The window.
    pub window: WindowInfo,
    /// The ticket it is serving, if any.
    pub current_ticket: Option<TicketInfo>,
}

/// Staff dashboard for one service's day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffDashboardResponse {
    /// The service.
    pub service: ServiceInfo,
    /// Counts by status for today.
    pub stats: QueueStats,
    /// Display numbers of the next waiting tickets (up to ten).
    pub waiting_preview: Vec<String>,
    /// Per-window serving state.
    pub windows: Vec<DashboardWindowInfo>,
}

/// A queue event rendered for responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventInfo {
    /// The event ID.
    pub event_id: Option<i64>,
    /// The actor label (e.g., "staff:3").
    pub actor: String,
    /// The action name.
    pub action: String,
    /// Optional action details.
    pub details: Option<String>,
    /// Ticket status before the action, if ticket-scoped.
    pub prior_status: Option<String>,
    /// Ticket status after the action, if ticket-scoped.
    pub new_status: Option<String>,
    /// When the event occurred (RFC 3339).
    pub created_at: String,
}

impl EventInfo {
    pub(crate) fn from_event(event: &QueueEvent) -> Self {
        Self {
            event_id: event.event_id,
            actor: event.actor.id.clone(),
            action: event.action.name.clone(),
            details: event.action.details.clone(),
            prior_status: event.prior_status.clone(),
            new_status: event.new_status.clone(),
            created_at: event.created_at.clone(),
        }
    }
}
