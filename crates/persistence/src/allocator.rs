// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Per-(service, day) queue number allocation.
//!
//! Numbers restart at 1 each day per service. The allocation is a
//! read-max-increment-write executed inside the issuing transaction;
//! the UNIQUE(service_id, ticket_date, queue_number) index backs it,
//! and a collision is retried transparently without surfacing to the
//! caller.

use qms_domain::Ticket;
use rusqlite::{Connection, params};
use time::Date;
use tracing::debug;

use crate::data_models::format_date;
use crate::error::PersistenceError;
use crate::mutations::insert_ticket;

/// Retries before an allocation race is reported as a database error.
const MAX_ALLOCATION_ATTEMPTS: u32 = 3;

/// Returns the next queue number for a service and day: one past the
/// highest number issued, or 1 for a fresh key.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn next_queue_number(
    conn: &Connection,
    service_id: i64,
    ticket_date: Date,
) -> Result<u32, PersistenceError> {
    let max: Option<u32> = conn.query_row(
        "SELECT MAX(queue_number) FROM tickets WHERE service_id = ?1 AND ticket_date = ?2",
        params![service_id, format_date(ticket_date)],
        |row| row.get(0),
    )?;
    Ok(max.unwrap_or(0) + 1)
}

/// Allocates the next queue number and inserts the new `waiting`
/// ticket in one step.
///
/// A UNIQUE collision (another allocator claimed the number between
/// the read and the write) is retried with a fresh read. Must be
/// called inside the issuing transaction.
///
/// # Errors
///
/// Returns an error if the store fails, or if the retry limit is
/// exhausted (which indicates unbounded contention, not a user error).
pub fn allocate_ticket(
    conn: &Connection,
    service_id: i64,
    ticket_date: Date,
    created_at: &str,
) -> Result<Ticket, PersistenceError> {
    for attempt in 1..=MAX_ALLOCATION_ATTEMPTS {
        let queue_number = next_queue_number(conn, service_id, ticket_date)?;
        let ticket = Ticket::new(service_id, queue_number, ticket_date, created_at.to_string());

        match insert_ticket(conn, &ticket) {
            Ok(ticket_id) => {
                return Ok(Ticket {
                    ticket_id: Some(ticket_id),
                    ..ticket
                });
            }
            Err(PersistenceError::AllocationConflict { queue_number, .. }) => {
                debug!(
                    service_id,
                    queue_number, attempt, "Queue number collision, retrying allocation"
                );
            }
            Err(e) => return Err(e),
        }
    }

    Err(PersistenceError::DatabaseError(format!(
        "queue number allocation for service {service_id} exhausted \
         {MAX_ALLOCATION_ATTEMPTS} attempts"
    )))
}
