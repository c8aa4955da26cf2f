// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Write-side statements.
//!
//! All functions take a plain connection reference and are invoked by
//! the engine inside its transactions; none of them commit.

use qms_audit::QueueEvent;
use qms_domain::{Service, Ticket, Window, WindowStatus};
use rusqlite::{Connection, params};

use crate::data_models::format_date;
use crate::error::PersistenceError;

/// Returns true if the error is a SQLite uniqueness/constraint
/// violation.
fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}

/// Inserts a new service row.
///
/// # Errors
///
/// Returns `Conflict` if the name or prefix is already in use.
pub fn insert_service(
    conn: &Connection,
    name: &str,
    prefix: Option<&str>,
    description: Option<&str>,
    average_service_time: u32,
) -> Result<i64, PersistenceError> {
    let result = conn.execute(
        "INSERT INTO services (name, prefix, description, is_active, average_service_time)
         VALUES (?1, ?2, ?3, 1, ?4)",
        params![name, prefix, description, average_service_time],
    );

    match result {
        Ok(_) => Ok(conn.last_insert_rowid()),
        Err(e) if is_constraint_violation(&e) => Err(PersistenceError::Conflict(format!(
            "service name '{name}' or prefix already in use"
        ))),
        Err(e) => Err(e.into()),
    }
}

/// Updates a service's admin-editable fields.
///
/// # Errors
///
/// Returns `ServiceNotFound` if no row was updated, or `Conflict` on a
/// duplicate name or prefix.
pub fn update_service(
    conn: &Connection,
    service_id: i64,
    service: &Service,
) -> Result<(), PersistenceError> {
    let result = conn.execute(
        "UPDATE services SET name = ?1, prefix = ?2, description = ?3,
             average_service_time = ?4, updated_at = CURRENT_TIMESTAMP
         WHERE service_id = ?5",
        params![
            service.name(),
            service.prefix(),
            service.description(),
            service.average_service_time(),
            service_id,
        ],
    );

    match result {
        Ok(0) => Err(PersistenceError::ServiceNotFound(service_id)),
        Ok(_) => Ok(()),
        Err(e) if is_constraint_violation(&e) => Err(PersistenceError::Conflict(format!(
            "service name '{}' or prefix already in use",
            service.name()
        ))),
        Err(e) => Err(e.into()),
    }
}

/// Sets a service's active flag (queue pause/resume).
///
/// # Errors
///
/// Returns `ServiceNotFound` if no row was updated.
pub fn set_service_active(
    conn: &Connection,
    service_id: i64,
    active: bool,
) -> Result<(), PersistenceError> {
    let updated = conn.execute(
        "UPDATE services SET is_active = ?1, updated_at = CURRENT_TIMESTAMP
         WHERE service_id = ?2",
        params![active, service_id],
    )?;

    if updated == 0 {
        return Err(PersistenceError::ServiceNotFound(service_id));
    }
    Ok(())
}

/// Inserts a new window row.
///
/// # Errors
///
/// Returns `Conflict` if the window number is already taken within the
/// service.
pub fn insert_window(conn: &Connection, window: &Window) -> Result<i64, PersistenceError> {
    let result = conn.execute(
        "INSERT INTO windows (service_id, window_number, name, status, current_staff)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            window.service_id,
            window.window_number,
            window.name,
            window.status.as_str(),
            window.current_staff,
        ],
    );

    match result {
        Ok(_) => Ok(conn.last_insert_rowid()),
        Err(e) if is_constraint_violation(&e) => Err(PersistenceError::Conflict(format!(
            "window number {} already exists for service {}",
            window.window_number, window.service_id
        ))),
        Err(e) => Err(e.into()),
    }
}

/// Updates a window's status.
///
/// # Errors
///
/// Returns `WindowNotFound` if no row was updated.
pub fn update_window_status(
    conn: &Connection,
    window_id: i64,
    status: WindowStatus,
) -> Result<(), PersistenceError> {
    let updated = conn.execute(
        "UPDATE windows SET status = ?1, updated_at = CURRENT_TIMESTAMP
         WHERE window_id = ?2",
        params![status.as_str(), window_id],
    )?;

    if updated == 0 {
        return Err(PersistenceError::WindowNotFound(window_id));
    }
    Ok(())
}

/// Sets or clears a window's bound staff member.
///
/// # Errors
///
/// Returns `WindowNotFound` if no row was updated.
pub fn set_window_staff(
    conn: &Connection,
    window_id: i64,
    staff_id: Option<i64>,
) -> Result<(), PersistenceError> {
    let updated = conn.execute(
        "UPDATE windows SET current_staff = ?1, updated_at = CURRENT_TIMESTAMP
         WHERE window_id = ?2",
        params![staff_id, window_id],
    )?;

    if updated == 0 {
        return Err(PersistenceError::WindowNotFound(window_id));
    }
    Ok(())
}

/// Releases every window currently bound to the given staff member.
///
/// Returns the number of windows released (0 or 1 under the
/// one-window-per-staff invariant).
///
/// # Errors
///
/// Returns an error if the statement fails.
pub fn clear_windows_for_staff(
    conn: &Connection,
    staff_id: i64,
) -> Result<usize, PersistenceError> {
    let released = conn.execute(
        "UPDATE windows SET current_staff = NULL, updated_at = CURRENT_TIMESTAMP
         WHERE current_staff = ?1",
        params![staff_id],
    )?;
    Ok(released)
}

/// Inserts a new ticket row.
///
/// # Errors
///
/// Returns `AllocationConflict` if the `(service, date, number)` slot
/// was claimed concurrently; the allocator retries this.
pub fn insert_ticket(conn: &Connection, ticket: &Ticket) -> Result<i64, PersistenceError> {
    let result = conn.execute(
        "INSERT INTO tickets (
            public_id, service_id, queue_number, status, ticket_date,
            assigned_window, called_by, served_by,
            created_at, called_at, served_at, skipped_at, notes
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
        params![
            ticket.public_id.to_string(),
            ticket.service_id,
            ticket.queue_number,
            ticket.status.as_str(),
            format_date(ticket.ticket_date),
            ticket.assigned_window,
            ticket.called_by,
            ticket.served_by,
            ticket.created_at,
            ticket.called_at,
            ticket.served_at,
            ticket.skipped_at,
            ticket.notes,
        ],
    );

    match result {
        Ok(_) => Ok(conn.last_insert_rowid()),
        Err(e) if is_constraint_violation(&e) && e.to_string().contains("queue_number") => {
            Err(PersistenceError::AllocationConflict {
                service_id: ticket.service_id,
                queue_number: ticket.queue_number,
            })
        }
        Err(e) => Err(e.into()),
    }
}

/// Writes a ticket's mutable fields back to its row.
///
/// # Errors
///
/// Returns `TicketNotFound` if the ticket has no row ID or no row was
/// updated.
pub fn update_ticket(conn: &Connection, ticket: &Ticket) -> Result<(), PersistenceError> {
    let Some(ticket_id) = ticket.ticket_id else {
        return Err(PersistenceError::TicketNotFound(
            ticket.public_id.to_string(),
        ));
    };

    let updated = conn.execute(
        "UPDATE tickets SET status = ?1, assigned_window = ?2, called_by = ?3,
             served_by = ?4, called_at = ?5, served_at = ?6, skipped_at = ?7, notes = ?8
         WHERE ticket_id = ?9",
        params![
            ticket.status.as_str(),
            ticket.assigned_window,
            ticket.called_by,
            ticket.served_by,
            ticket.called_at,
            ticket.served_at,
            ticket.skipped_at,
            ticket.notes,
            ticket_id,
        ],
    )?;

    if updated == 0 {
        return Err(PersistenceError::TicketNotFound(
            ticket.public_id.to_string(),
        ));
    }
    Ok(())
}

/// Appends a queue event to the trail.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn append_event(conn: &Connection, event: &QueueEvent) -> Result<i64, PersistenceError> {
    conn.execute(
        "INSERT INTO queue_events (
            service_id, ticket_id, actor_id, actor_type,
            action_name, action_details, prior_status, new_status, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            event.service_id,
            event.ticket_id,
            event.actor.id,
            event.actor.actor_type,
            event.action.name,
            event.action.details,
            event.prior_status,
            event.new_status,
            event.created_at,
        ],
    )?;

    Ok(conn.last_insert_rowid())
}
