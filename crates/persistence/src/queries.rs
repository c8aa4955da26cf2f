// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-side queries.
//!
//! All functions take a plain connection reference, so they work both
//! standalone and inside an engine transaction (`Transaction` derefs
//! to `Connection`).

use qms_audit::QueueEvent;
use qms_domain::{QueueSnapshot, Service, Ticket, Window};
use rusqlite::{Connection, OptionalExtension, params};
use time::Date;
use uuid::Uuid;

use crate::data_models::{
    EVENT_COLUMNS, EventRow, SERVICE_COLUMNS, ServiceRow, TICKET_COLUMNS, TicketRow,
    WINDOW_COLUMNS, WindowRow, format_date,
};
use crate::error::PersistenceError;

/// Retrieves a service by ID.
///
/// # Errors
///
/// Returns `ServiceNotFound` if no such service exists.
pub fn get_service(conn: &Connection, service_id: i64) -> Result<Service, PersistenceError> {
    let sql = format!("SELECT {SERVICE_COLUMNS} FROM services WHERE service_id = ?1");
    let row = conn
        .query_row(&sql, params![service_id], ServiceRow::from_row)
        .optional()?;

    row.map(ServiceRow::into_service)
        .ok_or(PersistenceError::ServiceNotFound(service_id))
}

/// Lists all services ordered by name.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_services(conn: &Connection) -> Result<Vec<Service>, PersistenceError> {
    let sql = format!("SELECT {SERVICE_COLUMNS} FROM services ORDER BY name");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], ServiceRow::from_row)?;

    let mut services: Vec<Service> = Vec::new();
    for row in rows {
        services.push(row?.into_service());
    }
    Ok(services)
}

/// Retrieves a window by ID.
///
/// # Errors
///
/// Returns `WindowNotFound` if no such window exists.
pub fn get_window(conn: &Connection, window_id: i64) -> Result<Window, PersistenceError> {
    let sql = format!("SELECT {WINDOW_COLUMNS} FROM windows WHERE window_id = ?1");
    let row = conn
        .query_row(&sql, params![window_id], WindowRow::from_row)
        .optional()?;

    row.ok_or(PersistenceError::WindowNotFound(window_id))?
        .into_window()
}

/// Lists a service's windows ordered by window number.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be mapped.
pub fn list_windows(conn: &Connection, service_id: i64) -> Result<Vec<Window>, PersistenceError> {
    let sql = format!(
        "SELECT {WINDOW_COLUMNS} FROM windows WHERE service_id = ?1 ORDER BY window_number"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![service_id], WindowRow::from_row)?;

    let mut windows: Vec<Window> = Vec::new();
    for row in rows {
        windows.push(row?.into_window()?);
    }
    Ok(windows)
}

/// Finds the window currently manned by the given staff member, if any.
///
/// # Errors
///
/// Returns an error if the query fails or the row cannot be mapped.
pub fn get_window_for_staff(
    conn: &Connection,
    staff_id: i64,
) -> Result<Option<Window>, PersistenceError> {
    let sql = format!("SELECT {WINDOW_COLUMNS} FROM windows WHERE current_staff = ?1");
    let row = conn
        .query_row(&sql, params![staff_id], WindowRow::from_row)
        .optional()?;

    row.map(WindowRow::into_window).transpose()
}

/// Retrieves a ticket by its public ID.
///
/// # Errors
///
/// Returns `TicketNotFound` if no such ticket exists.
pub fn get_ticket_by_public_id(
    conn: &Connection,
    public_id: Uuid,
) -> Result<Ticket, PersistenceError> {
    let sql = format!("SELECT {TICKET_COLUMNS} FROM tickets WHERE public_id = ?1");
    let row = conn
        .query_row(&sql, params![public_id.to_string()], TicketRow::from_row)
        .optional()?;

    row.ok_or_else(|| PersistenceError::TicketNotFound(public_id.to_string()))?
        .into_ticket()
}

/// Returns the ticket currently in `serving` at the given window, if
/// any.
///
/// The engine's one-ticket-per-window invariant guarantees at most one
/// row matches.
///
/// # Errors
///
/// Returns an error if the query fails or the row cannot be mapped.
pub fn get_serving_ticket_for_window(
    conn: &Connection,
    window_id: i64,
) -> Result<Option<Ticket>, PersistenceError> {
    let sql = format!(
        "SELECT {TICKET_COLUMNS} FROM tickets \
         WHERE assigned_window = ?1 AND status = 'serving' \
         ORDER BY queue_number LIMIT 1"
    );
    let row = conn
        .query_row(&sql, params![window_id], TicketRow::from_row)
        .optional()?;

    row.map(TicketRow::into_ticket).transpose()
}

/// Returns the waiting ticket call-next would pick for a service and
/// day: smallest queue number, `waiting` status only.
///
/// Notified tickets are already claimed and are not considered.
///
/// # Errors
///
/// Returns an error if the query fails or the row cannot be mapped.
pub fn next_waiting_ticket(
    conn: &Connection,
    service_id: i64,
    ticket_date: Date,
) -> Result<Option<Ticket>, PersistenceError> {
    let sql = format!(
        "SELECT {TICKET_COLUMNS} FROM tickets \
         WHERE service_id = ?1 AND ticket_date = ?2 AND status = 'waiting' \
         ORDER BY queue_number LIMIT 1"
    );
    let row = conn
        .query_row(
            &sql,
            params![service_id, format_date(ticket_date)],
            TicketRow::from_row,
        )
        .optional()?;

    row.map(TicketRow::into_ticket).transpose()
}

/// Counts tickets still in the queue ahead of the given queue number.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn count_ahead(
    conn: &Connection,
    service_id: i64,
    ticket_date: Date,
    queue_number: u32,
) -> Result<u64, PersistenceError> {
    let count: u64 = conn.query_row(
        "SELECT COUNT(*) FROM tickets \
         WHERE service_id = ?1 AND ticket_date = ?2 \
           AND status IN ('waiting', 'notified') AND queue_number < ?3",
        params![service_id, format_date(ticket_date), queue_number],
        |row| row.get(0),
    )?;
    Ok(count)
}

/// Counts `waiting` tickets for a service and day.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn count_waiting(
    conn: &Connection,
    service_id: i64,
    ticket_date: Date,
) -> Result<u64, PersistenceError> {
    let count: u64 = conn.query_row(
        "SELECT COUNT(*) FROM tickets \
         WHERE service_id = ?1 AND ticket_date = ?2 AND status = 'waiting'",
        params![service_id, format_date(ticket_date)],
        |row| row.get(0),
    )?;
    Ok(count)
}

/// Counts all tickets issued for a service and day.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn count_today(
    conn: &Connection,
    service_id: i64,
    ticket_date: Date,
) -> Result<u64, PersistenceError> {
    let count: u64 = conn.query_row(
        "SELECT COUNT(*) FROM tickets WHERE service_id = ?1 AND ticket_date = ?2",
        params![service_id, format_date(ticket_date)],
        |row| row.get(0),
    )?;
    Ok(count)
}

/// Loads the full queue snapshot for a service and day: the service
/// plus all of the day's tickets ordered by queue number.
///
/// # Errors
///
/// Returns `ServiceNotFound` if the service does not exist, or an
/// error if a row cannot be mapped.
pub fn queue_snapshot(
    conn: &Connection,
    service_id: i64,
    ticket_date: Date,
) -> Result<QueueSnapshot, PersistenceError> {
    let service = get_service(conn, service_id)?;

    let sql = format!(
        "SELECT {TICKET_COLUMNS} FROM tickets \
         WHERE service_id = ?1 AND ticket_date = ?2 \
         ORDER BY queue_number"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![service_id, format_date(ticket_date)], TicketRow::from_row)?;

    let mut tickets: Vec<Ticket> = Vec::new();
    for row in rows {
        tickets.push(row?.into_ticket()?);
    }

    Ok(QueueSnapshot {
        service,
        ticket_date,
        tickets,
    })
}

/// Retrieves the event trail for one ticket, oldest first.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn events_for_ticket(
    conn: &Connection,
    ticket_id: i64,
) -> Result<Vec<QueueEvent>, PersistenceError> {
    let sql = format!(
        "SELECT {EVENT_COLUMNS} FROM queue_events WHERE ticket_id = ?1 ORDER BY event_id"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![ticket_id], EventRow::from_row)?;

    let mut events: Vec<QueueEvent> = Vec::new();
    for row in rows {
        events.push(row?.into_event());
    }
    Ok(events)
}

/// Retrieves the event trail for a service, oldest first.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn events_for_service(
    conn: &Connection,
    service_id: i64,
) -> Result<Vec<QueueEvent>, PersistenceError> {
    let sql = format!(
        "SELECT {EVENT_COLUMNS} FROM queue_events WHERE service_id = ?1 ORDER BY event_id"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![service_id], EventRow::from_row)?;

    let mut events: Vec<QueueEvent> = Vec::new();
    for row in rows {
        events.push(row?.into_event());
    }
    Ok(events)
}
