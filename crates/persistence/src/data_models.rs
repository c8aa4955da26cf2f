// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Row structs bridging SQLite rows and domain values.
//!
//! Rows are read with plain column types first, then converted to
//! domain values in a second step so parse failures surface as
//! `ReconstructionError` instead of panics inside rusqlite closures.

use std::str::FromStr;

use qms_audit::{Action, Actor, QueueEvent};
use qms_domain::{Service, Ticket, TicketStatus, Window, WindowStatus};
use rusqlite::Row;
use time::Date;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use uuid::Uuid;

/// Storage format for ticket dates.
const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Formats a ticket date for storage.
#[must_use]
pub(crate) fn format_date(date: Date) -> String {
    date.format(&DATE_FORMAT)
        .unwrap_or_else(|_| date.to_string())
}

/// Parses a stored ticket date.
pub(crate) fn parse_date(s: &str) -> Result<Date, crate::error::PersistenceError> {
    Date::parse(s, &DATE_FORMAT).map_err(|e| {
        crate::error::PersistenceError::ReconstructionError(format!(
            "invalid ticket_date '{s}': {e}"
        ))
    })
}

/// Column list for ticket queries; must match `TicketRow::from_row`.
pub(crate) const TICKET_COLUMNS: &str = "ticket_id, public_id, service_id, queue_number, status, \
     ticket_date, assigned_window, called_by, served_by, \
     created_at, called_at, served_at, skipped_at, notes";

/// Raw ticket row as stored.
pub(crate) struct TicketRow {
    ticket_id: i64,
    public_id: String,
    service_id: i64,
    queue_number: u32,
    status: String,
    ticket_date: String,
    assigned_window: Option<i64>,
    called_by: Option<i64>,
    served_by: Option<i64>,
    created_at: String,
    called_at: Option<String>,
    served_at: Option<String>,
    skipped_at: Option<String>,
    notes: Option<String>,
}

impl TicketRow {
    /// Reads a row produced by a `TICKET_COLUMNS` select.
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            ticket_id: row.get(0)?,
            public_id: row.get(1)?,
            service_id: row.get(2)?,
            queue_number: row.get(3)?,
            status: row.get(4)?,
            ticket_date: row.get(5)?,
            assigned_window: row.get(6)?,
            called_by: row.get(7)?,
            served_by: row.get(8)?,
            created_at: row.get(9)?,
            called_at: row.get(10)?,
            served_at: row.get(11)?,
            skipped_at: row.get(12)?,
            notes: row.get(13)?,
        })
    }

    /// Converts the raw row into a domain ticket.
    pub(crate) fn into_ticket(self) -> Result<Ticket, crate::error::PersistenceError> {
        let status = TicketStatus::from_str(&self.status).map_err(|e| {
            crate::error::PersistenceError::ReconstructionError(e.to_string())
        })?;
        let public_id = Uuid::parse_str(&self.public_id).map_err(|e| {
            crate::error::PersistenceError::ReconstructionError(format!(
                "invalid public_id '{}': {e}",
                self.public_id
            ))
        })?;
        let ticket_date = parse_date(&self.ticket_date)?;

        Ok(Ticket {
            ticket_id: Some(self.ticket_id),
            public_id,
            service_id: self.service_id,
            queue_number: self.queue_number,
            status,
            ticket_date,
            assigned_window: self.assigned_window,
            called_by: self.called_by,
            served_by: self.served_by,
            created_at: self.created_at,
            called_at: self.called_at,
            served_at: self.served_at,
            skipped_at: self.skipped_at,
            notes: self.notes,
        })
    }
}

/// Column list for service queries; must match `ServiceRow::from_row`.
pub(crate) const SERVICE_COLUMNS: &str =
    "service_id, name, prefix, description, is_active, average_service_time";

/// Raw service row as stored.
pub(crate) struct ServiceRow {
    service_id: i64,
    name: String,
    prefix: Option<String>,
    description: Option<String>,
    is_active: bool,
    average_service_time: u32,
}

impl ServiceRow {
    /// Reads a row produced by a `SERVICE_COLUMNS` select.
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            service_id: row.get(0)?,
            name: row.get(1)?,
            prefix: row.get(2)?,
            description: row.get(3)?,
            is_active: row.get(4)?,
            average_service_time: row.get(5)?,
        })
    }

    /// Converts the raw row into a domain service.
    pub(crate) fn into_service(self) -> Service {
        Service::with_id(
            self.service_id,
            &self.name,
            self.prefix.as_deref(),
            self.description,
            self.is_active,
            self.average_service_time,
        )
    }
}

/// Column list for window queries; must match `WindowRow::from_row`.
pub(crate) const WINDOW_COLUMNS: &str =
    "window_id, service_id, window_number, name, status, current_staff";

/// Raw window row as stored.
pub(crate) struct WindowRow {
    window_id: i64,
    service_id: i64,
    window_number: u32,
    name: Option<String>,
    status: String,
    current_staff: Option<i64>,
}

impl WindowRow {
    /// Reads a row produced by a `WINDOW_COLUMNS` select.
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            window_id: row.get(0)?,
            service_id: row.get(1)?,
            window_number: row.get(2)?,
            name: row.get(3)?,
            status: row.get(4)?,
            current_staff: row.get(5)?,
        })
    }

    /// Converts the raw row into a domain window.
    pub(crate) fn into_window(self) -> Result<Window, crate::error::PersistenceError> {
        let status = WindowStatus::from_str(&self.status).map_err(|e| {
            crate::error::PersistenceError::ReconstructionError(e.to_string())
        })?;
        Ok(Window::with_id(
            self.window_id,
            self.service_id,
            self.window_number,
            self.name,
            status,
            self.current_staff,
        ))
    }
}

/// Column list for event queries; must match `EventRow::from_row`.
pub(crate) const EVENT_COLUMNS: &str = "event_id, service_id, ticket_id, actor_id, actor_type, \
     action_name, action_details, prior_status, new_status, created_at";

/// Raw queue event row as stored.
pub(crate) struct EventRow {
    event_id: i64,
    service_id: i64,
    ticket_id: Option<i64>,
    actor_id: String,
    actor_type: String,
    action_name: String,
    action_details: Option<String>,
    prior_status: Option<String>,
    new_status: Option<String>,
    created_at: String,
}

impl EventRow {
    /// Reads a row produced by an `EVENT_COLUMNS` select.
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            event_id: row.get(0)?,
            service_id: row.get(1)?,
            ticket_id: row.get(2)?,
            actor_id: row.get(3)?,
            actor_type: row.get(4)?,
            action_name: row.get(5)?,
            action_details: row.get(6)?,
            prior_status: row.get(7)?,
            new_status: row.get(8)?,
            created_at: row.get(9)?,
        })
    }

    /// Converts the raw row into a queue event.
    pub(crate) fn into_event(self) -> QueueEvent {
        QueueEvent {
            event_id: Some(self.event_id),
            service_id: self.service_id,
            ticket_id: self.ticket_id,
            actor: Actor::new(self.actor_id, self.actor_type),
            action: Action::new(self.action_name, self.action_details),
            prior_status: self.prior_status,
            new_status: self.new_status,
            created_at: self.created_at,
        }
    }
}
