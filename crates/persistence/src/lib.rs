// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer and transactional queue engine.
//!
//! The [`QueueEngine`] owns the SQLite connection and exposes every
//! queue operation as a single atomic unit: each mutating method opens
//! one transaction, reads the current rows, runs the pure guards from
//! the `qms` core crate, writes the new state plus the queue event, and
//! commits. A guard failure rolls everything back before any write, so
//! callers never observe partial state.
//!
//! ## Ordering guarantees
//!
//! Within one `(service, ticket_date)` key, queue numbers are allocated
//! by a serialized read-max-increment-write backed by a UNIQUE index;
//! call-next is totally ordered by queue number. Across services there
//! is no ordering guarantee.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

use std::path::Path;

use qms::{BindDecision, CoreError, actor_for, call_to_window, validate_bind};
use qms_audit::{Action, QueueEvent};
use qms_domain::{QueueSnapshot, Service, StaffIdentity, Ticket, Window, WindowStatus};
use rusqlite::{Connection, TransactionBehavior};
use time::Date;
use tracing::{debug, info};
use uuid::Uuid;

mod allocator;
mod data_models;
mod error;
mod mutations;
mod queries;
mod schema;

#[cfg(test)]
mod tests;

pub use allocator::next_queue_number;
pub use error::{EngineError, PersistenceError};

/// A freshly issued ticket together with the queue context a printer
/// or kiosk consumer needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedTicket {
    /// The new ticket (always `waiting`).
    pub ticket: Ticket,
    /// The service it was issued for.
    pub service: Service,
    /// Tickets still queued ahead of it.
    pub people_ahead: u64,
    /// Estimated wait in minutes.
    pub estimated_wait_minutes: u64,
    /// Total tickets issued for the service today, this one included.
    pub total_today: u64,
}

/// The result of a call/start operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallResult {
    /// The ticket now being served.
    pub ticket: Ticket,
    /// The window it was called to.
    pub window: Window,
    /// The previous occupant of the window, auto-completed, if any.
    pub completed_prior: Option<Ticket>,
    /// Tickets still `waiting` for the service after this call.
    pub waiting_count: u64,
    /// Display number of the next waiting ticket, if any.
    pub next_waiting: Option<String>,
}

/// Persistence adapter and transactional queue engine.
///
/// All mutation goes through this type; there is no other write path
/// to ticket or window state.
pub struct QueueEngine {
    conn: Connection,
}

impl QueueEngine {
    /// Creates an engine backed by a private in-memory database.
    ///
    /// Used for tests and ad-hoc runs; every instance is isolated.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| PersistenceError::DatabaseConnectionFailed(e.to_string()))?;

        schema::initialize_schema(&conn)?;
        schema::verify_foreign_key_enforcement(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an engine backed by a file database, creating the file
    /// and schema as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let conn = Connection::open(path)
            .map_err(|e| PersistenceError::DatabaseConnectionFailed(e.to_string()))?;

        schema::enable_wal_mode(&conn)?;
        schema::initialize_schema(&conn)?;
        schema::verify_foreign_key_enforcement(&conn)?;

        Ok(Self { conn })
    }

    // ========================================================================
    // Service & window administration
    // ========================================================================

    /// Creates a service.
    ///
    /// # Errors
    ///
    /// Returns a conflict error if the name or prefix is taken.
    pub fn create_service(
        &mut self,
        staff: &StaffIdentity,
        name: &str,
        prefix: Option<&str>,
        description: Option<String>,
        average_service_time: u32,
        now: &str,
    ) -> Result<Service, EngineError> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        // Normalize the prefix the same way the domain type does
        let normalized = Service::new(name, prefix, average_service_time);
        let service_id = mutations::insert_service(
            &tx,
            normalized.name(),
            normalized.prefix(),
            description.as_deref(),
            average_service_time,
        )?;
        let service = Service::with_id(
            service_id,
            name,
            prefix,
            description,
            true,
            average_service_time,
        );

        mutations::append_event(
            &tx,
            &QueueEvent::for_service(
                service_id,
                actor_for(staff),
                Action::new(String::from("CreateService"), Some(name.to_string())),
                now.to_string(),
            ),
        )?;

        tx.commit()?;
        info!(service_id, name, "Created service");
        Ok(service)
    }

    /// Updates a service's identity fields.
    ///
    /// # Errors
    ///
    /// Returns `ServiceNotFound` or a conflict error.
    #[allow(clippy::too_many_arguments)]
    pub fn update_service(
        &mut self,
        staff: &StaffIdentity,
        service_id: i64,
        name: &str,
        prefix: Option<&str>,
        description: Option<String>,
        average_service_time: u32,
        now: &str,
    ) -> Result<Service, EngineError> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let current = queries::get_service(&tx, service_id)?;
        let service = Service::with_id(
            service_id,
            name,
            prefix,
            description,
            current.is_active(),
            average_service_time,
        );
        mutations::update_service(&tx, service_id, &service)?;

        mutations::append_event(
            &tx,
            &QueueEvent::for_service(
                service_id,
                actor_for(staff),
                Action::new(String::from("UpdateService"), Some(name.to_string())),
                now.to_string(),
            ),
        )?;

        tx.commit()?;
        info!(service_id, name, "Updated service");
        Ok(service)
    }

    /// Pauses or resumes a service's queue.
    ///
    /// Issuance is refused while paused; staff operations still drain
    /// the existing queue.
    ///
    /// # Errors
    ///
    /// Returns `ServiceNotFound` if the service does not exist.
    pub fn set_service_active(
        &mut self,
        staff: &StaffIdentity,
        service_id: i64,
        active: bool,
        now: &str,
    ) -> Result<Service, EngineError> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        mutations::set_service_active(&tx, service_id, active)?;
        let service = queries::get_service(&tx, service_id)?;

        mutations::append_event(
            &tx,
            &QueueEvent::for_service(
                service_id,
                actor_for(staff),
                Action::new(
                    String::from(if active { "ResumeQueue" } else { "PauseQueue" }),
                    None,
                ),
                now.to_string(),
            ),
        )?;

        tx.commit()?;
        info!(service_id, active, "Toggled service queue");
        Ok(service)
    }

    /// Creates a window for a service.
    ///
    /// # Errors
    ///
    /// Returns `ServiceNotFound`, or a conflict error if the window
    /// number is taken.
    pub fn create_window(
        &mut self,
        staff: &StaffIdentity,
        service_id: i64,
        window_number: u32,
        name: Option<String>,
        now: &str,
    ) -> Result<Window, EngineError> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        // Reject unknown services before touching the windows table
        let _service = queries::get_service(&tx, service_id)?;

        let window = Window::new(service_id, window_number, name);
        let window_id = mutations::insert_window(&tx, &window)?;

        mutations::append_event(
            &tx,
            &QueueEvent::for_service(
                service_id,
                actor_for(staff),
                Action::new(
                    String::from("CreateWindow"),
                    Some(format!("window {window_number}")),
                ),
                now.to_string(),
            ),
        )?;

        let created = queries::get_window(&tx, window_id)?;
        tx.commit()?;
        info!(window_id, service_id, window_number, "Created window");
        Ok(created)
    }

    /// Updates a window's operational status.
    ///
    /// # Errors
    ///
    /// Returns `WindowNotFound` if the window does not exist.
    pub fn update_window_status(
        &mut self,
        staff: &StaffIdentity,
        window_id: i64,
        status: WindowStatus,
        now: &str,
    ) -> Result<Window, EngineError> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        mutations::update_window_status(&tx, window_id, status)?;
        let window = queries::get_window(&tx, window_id)?;

        mutations::append_event(
            &tx,
            &QueueEvent::for_service(
                window.service_id,
                actor_for(staff),
                Action::new(
                    String::from("UpdateWindowStatus"),
                    Some(status.as_str().to_string()),
                ),
                now.to_string(),
            ),
        )?;

        tx.commit()?;
        info!(window_id, status = %status, "Updated window status");
        Ok(window)
    }

    // ========================================================================
    // Window binding
    // ========================================================================

    /// Binds a staff member to a window.
    ///
    /// Idempotent for a window the staff member already mans. Any other
    /// window previously manned by this staff member is released in the
    /// same transaction.
    ///
    /// # Errors
    ///
    /// Returns `WindowUnavailable` if the window is not active, belongs
    /// to another service, or is manned by someone else.
    pub fn bind_window(
        &mut self,
        staff: &StaffIdentity,
        window_id: i64,
        now: &str,
    ) -> Result<Window, EngineError> {
        let Some(staff_id) = staff.staff_id() else {
            return Err(CoreError::WindowUnavailable {
                window: format!("window {window_id}"),
                reason: "a staff identity is required to man a window".to_string(),
            }
            .into());
        };

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let window = queries::get_window(&tx, window_id)?;

        match validate_bind(&window, staff)? {
            BindDecision::AlreadyBound => {
                debug!(window_id, staff_id, "Window already bound to staff");
                drop(tx);
                return Ok(window);
            }
            BindDecision::Bind => {}
        }

        // A staff member mans exactly one window
        let released = mutations::clear_windows_for_staff(&tx, staff_id)?;
        if released > 0 {
            debug!(staff_id, released, "Released previously manned window");
        }
        mutations::set_window_staff(&tx, window_id, Some(staff_id))?;

        mutations::append_event(
            &tx,
            &QueueEvent::for_service(
                window.service_id,
                actor_for(staff),
                Action::new(
                    String::from("BindWindow"),
                    Some(format!("window {}", window.window_number)),
                ),
                now.to_string(),
            ),
        )?;

        let bound = queries::get_window(&tx, window_id)?;
        tx.commit()?;
        info!(window_id, staff_id, "Bound staff to window");
        Ok(bound)
    }

    /// Releases the window currently manned by the staff member.
    ///
    /// Returns the released window, or `None` if the staff member was
    /// not manning one.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub fn release_window(
        &mut self,
        staff: &StaffIdentity,
        now: &str,
    ) -> Result<Option<Window>, EngineError> {
        let Some(staff_id) = staff.staff_id() else {
            return Ok(None);
        };

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let Some(window) = queries::get_window_for_staff(&tx, staff_id)? else {
            drop(tx);
            return Ok(None);
        };

        mutations::clear_windows_for_staff(&tx, staff_id)?;
        mutations::append_event(
            &tx,
            &QueueEvent::for_service(
                window.service_id,
                actor_for(staff),
                Action::new(
                    String::from("ReleaseWindow"),
                    Some(format!("window {}", window.window_number)),
                ),
                now.to_string(),
            ),
        )?;

        tx.commit()?;
        info!(staff_id, window_id = ?window.window_id, "Released window");
        Ok(Some(window))
    }

    // ========================================================================
    // Ticket lifecycle
    // ========================================================================

    /// Issues a new ticket for a service.
    ///
    /// The queue number is allocated inside the transaction, so two
    /// concurrent calls can never receive the same number. The ticket
    /// date is fixed here and never recomputed.
    ///
    /// # Errors
    ///
    /// Returns `ServiceNotFound` for an unknown service and
    /// `ServiceClosed` while the queue is paused.
    pub fn issue_ticket(
        &mut self,
        staff: &StaffIdentity,
        service_id: i64,
        today: Date,
        now: &str,
    ) -> Result<IssuedTicket, EngineError> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let service = queries::get_service(&tx, service_id)?;
        if !service.is_active() {
            return Err(CoreError::ServiceClosed {
                service: service.name().to_string(),
            }
            .into());
        }

        let ticket = allocator::allocate_ticket(&tx, service_id, today, now)?;

        mutations::append_event(
            &tx,
            &QueueEvent {
                event_id: None,
                service_id,
                ticket_id: ticket.ticket_id,
                actor: actor_for(staff),
                action: Action::new(
                    String::from("IssueTicket"),
                    Some(service.display_number(ticket.queue_number)),
                ),
                prior_status: None,
                new_status: Some(ticket.status.as_str().to_string()),
                created_at: now.to_string(),
            },
        )?;

        let people_ahead = queries::count_ahead(&tx, service_id, today, ticket.queue_number)?;
        let total_today = queries::count_today(&tx, service_id, today)?;

        tx.commit()?;

        let estimated_wait_minutes =
            people_ahead.saturating_mul(u64::from(service.average_service_time()));

        info!(
            service_id,
            queue_number = ticket.queue_number,
            display_number = %service.display_number(ticket.queue_number),
            "Issued ticket"
        );

        Ok(IssuedTicket {
            ticket,
            service,
            people_ahead,
            estimated_wait_minutes,
            total_today,
        })
    }

    /// Calls the next waiting ticket to a window.
    ///
    /// Selects the smallest-numbered `waiting` ticket for the window's
    /// service today; `notified` tickets are treated as already claimed
    /// and skipped. A ticket already serving at the window is completed
    /// in the same transaction.
    ///
    /// # Errors
    ///
    /// Returns `QueueEmpty` when no ticket is waiting, or
    /// `WindowUnavailable` if the window cannot take calls.
    pub fn call_next(
        &mut self,
        staff: &StaffIdentity,
        window_id: i64,
        today: Date,
        now: &str,
    ) -> Result<CallResult, EngineError> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let window = queries::get_window(&tx, window_id)?;
        let service = queries::get_service(&tx, window.service_id)?;
        let Some(next) = queries::next_waiting_ticket(&tx, window.service_id, today)? else {
            return Err(CoreError::QueueEmpty.into());
        };
        let prior = queries::get_serving_ticket_for_window(&tx, window_id)?;

        let outcome = call_to_window(next, &window, prior, staff, "CallNext", now)?;

        if let Some(completed) = &outcome.completed_prior {
            mutations::update_ticket(&tx, completed)?;
        }
        mutations::update_ticket(&tx, &outcome.ticket)?;
        for event in &outcome.events {
            mutations::append_event(&tx, event)?;
        }

        let waiting_count = queries::count_waiting(&tx, window.service_id, today)?;
        let next_waiting = queries::next_waiting_ticket(&tx, window.service_id, today)?;

        tx.commit()?;

        info!(
            window_id,
            queue_number = outcome.ticket.queue_number,
            display_number = %service.display_number(outcome.ticket.queue_number),
            "Called next ticket"
        );

        Ok(CallResult {
            ticket: outcome.ticket,
            window,
            completed_prior: outcome.completed_prior,
            waiting_count,
            next_waiting: next_waiting.map(|t| service.display_number(t.queue_number)),
        })
    }

    /// Calls a specific ticket to a window.
    ///
    /// # Errors
    ///
    /// Returns `TicketNotFound`, `WindowUnavailable`, or an invalid
    /// state error if the ticket is not `waiting`/`notified`.
    pub fn call_specific(
        &mut self,
        staff: &StaffIdentity,
        public_id: Uuid,
        window_id: i64,
        today: Date,
        now: &str,
    ) -> Result<CallResult, EngineError> {
        self.call_ticket(staff, public_id, window_id, today, "CallSpecific", now)
    }

    /// Begins serving a pre-notified (or still waiting) ticket at a
    /// window.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Self::call_specific`].
    pub fn start_serving(
        &mut self,
        staff: &StaffIdentity,
        public_id: Uuid,
        window_id: i64,
        today: Date,
        now: &str,
    ) -> Result<CallResult, EngineError> {
        self.call_ticket(staff, public_id, window_id, today, "StartServing", now)
    }

    /// Shared implementation for call-specific and start-serving.
    fn call_ticket(
        &mut self,
        staff: &StaffIdentity,
        public_id: Uuid,
        window_id: i64,
        today: Date,
        action: &str,
        now: &str,
    ) -> Result<CallResult, EngineError> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let window = queries::get_window(&tx, window_id)?;
        let service = queries::get_service(&tx, window.service_id)?;
        let ticket = queries::get_ticket_by_public_id(&tx, public_id)?;
        let prior = queries::get_serving_ticket_for_window(&tx, window_id)?;

        let outcome = call_to_window(ticket, &window, prior, staff, action, now)?;

        if let Some(completed) = &outcome.completed_prior {
            mutations::update_ticket(&tx, completed)?;
        }
        mutations::update_ticket(&tx, &outcome.ticket)?;
        for event in &outcome.events {
            mutations::append_event(&tx, event)?;
        }

        let waiting_count = queries::count_waiting(&tx, window.service_id, today)?;
        let next_waiting = queries::next_waiting_ticket(&tx, window.service_id, today)?;

        tx.commit()?;

        info!(
            window_id,
            action,
            queue_number = outcome.ticket.queue_number,
            "Assigned ticket to window"
        );

        Ok(CallResult {
            ticket: outcome.ticket,
            window,
            completed_prior: outcome.completed_prior,
            waiting_count,
            next_waiting: next_waiting.map(|t| service.display_number(t.queue_number)),
        })
    }

    /// Marks a waiting ticket as notified (pre-called).
    ///
    /// # Errors
    ///
    /// Returns `TicketNotFound` or an invalid state error.
    pub fn notify_ticket(
        &mut self,
        staff: &StaffIdentity,
        public_id: Uuid,
        now: &str,
    ) -> Result<Ticket, EngineError> {
        self.apply_transition(public_id, |ticket| qms::notify_ticket(ticket, staff, now))
    }

    /// Completes the ticket currently being served.
    ///
    /// # Errors
    ///
    /// Returns `TicketNotFound` or an invalid state error unless the
    /// ticket is `serving`.
    pub fn complete_ticket(
        &mut self,
        staff: &StaffIdentity,
        public_id: Uuid,
        now: &str,
    ) -> Result<Ticket, EngineError> {
        self.apply_transition(public_id, |ticket| qms::complete_ticket(ticket, staff, now))
    }

    /// Removes a ticket from the queue, recording the reason.
    ///
    /// # Errors
    ///
    /// Returns `TicketNotFound`, or an invalid state error if the
    /// ticket was already served.
    pub fn remove_ticket(
        &mut self,
        staff: &StaffIdentity,
        public_id: Uuid,
        reason: &str,
        now: &str,
    ) -> Result<Ticket, EngineError> {
        self.apply_transition(public_id, |ticket| {
            qms::remove_ticket(ticket, reason, staff, now)
        })
    }

    /// Skips a ticket whose holder did not show up.
    ///
    /// # Errors
    ///
    /// Returns `TicketNotFound` or an invalid state error.
    pub fn skip_ticket(
        &mut self,
        staff: &StaffIdentity,
        public_id: Uuid,
        reason: &str,
        now: &str,
    ) -> Result<Ticket, EngineError> {
        self.apply_transition(public_id, |ticket| {
            qms::skip_ticket(ticket, reason, staff, now)
        })
    }

    /// Recalls a notified, skipped, or cancelled ticket back to the
    /// waiting queue.
    ///
    /// # Errors
    ///
    /// Returns `TicketNotFound` or an invalid state error from any
    /// other status.
    pub fn recall_ticket(
        &mut self,
        staff: &StaffIdentity,
        public_id: Uuid,
        now: &str,
    ) -> Result<Ticket, EngineError> {
        self.apply_transition(public_id, |ticket| qms::recall_ticket(ticket, staff, now))
    }

    /// Runs a single-ticket transition inside one transaction.
    fn apply_transition<F>(&mut self, public_id: Uuid, op: F) -> Result<Ticket, EngineError>
    where
        F: FnOnce(Ticket) -> Result<qms::TransitionResult, CoreError>,
    {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let ticket = queries::get_ticket_by_public_id(&tx, public_id)?;
        let result = op(ticket)?;

        mutations::update_ticket(&tx, &result.ticket)?;
        mutations::append_event(&tx, &result.event)?;

        tx.commit()?;

        debug!(
            public_id = %public_id,
            action = %result.event.action.name,
            status = %result.ticket.status,
            "Applied ticket transition"
        );
        Ok(result.ticket)
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// Retrieves a service by ID.
    ///
    /// # Errors
    ///
    /// Returns `ServiceNotFound` if no such service exists.
    pub fn get_service(&self, service_id: i64) -> Result<Service, EngineError> {
        Ok(queries::get_service(&self.conn, service_id)?)
    }

    /// Lists all services ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_services(&self) -> Result<Vec<Service>, EngineError> {
        Ok(queries::list_services(&self.conn)?)
    }

    /// Retrieves a window by ID.
    ///
    /// # Errors
    ///
    /// Returns `WindowNotFound` if no such window exists.
    pub fn get_window(&self, window_id: i64) -> Result<Window, EngineError> {
        Ok(queries::get_window(&self.conn, window_id)?)
    }

    /// Lists a service's windows ordered by window number.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_windows(&self, service_id: i64) -> Result<Vec<Window>, EngineError> {
        Ok(queries::list_windows(&self.conn, service_id)?)
    }

    /// Finds the window currently manned by the given staff member.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn window_for_staff(&self, staff_id: i64) -> Result<Option<Window>, EngineError> {
        Ok(queries::get_window_for_staff(&self.conn, staff_id)?)
    }

    /// Retrieves a ticket by its public ID.
    ///
    /// # Errors
    ///
    /// Returns `TicketNotFound` if no such ticket exists.
    pub fn get_ticket(&self, public_id: Uuid) -> Result<Ticket, EngineError> {
        Ok(queries::get_ticket_by_public_id(&self.conn, public_id)?)
    }

    /// Loads the queue snapshot for a service and day.
    ///
    /// # Errors
    ///
    /// Returns `ServiceNotFound` if the service does not exist.
    pub fn queue_snapshot(
        &self,
        service_id: i64,
        ticket_date: Date,
    ) -> Result<QueueSnapshot, EngineError> {
        Ok(queries::queue_snapshot(&self.conn, service_id, ticket_date)?)
    }

    /// Retrieves the event trail for a ticket, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `TicketNotFound` if no such ticket exists.
    pub fn events_for_ticket(&self, public_id: Uuid) -> Result<Vec<QueueEvent>, EngineError> {
        let ticket = queries::get_ticket_by_public_id(&self.conn, public_id)?;
        let Some(ticket_id) = ticket.ticket_id else {
            return Ok(Vec::new());
        };
        Ok(queries::events_for_ticket(&self.conn, ticket_id)?)
    }

    /// Retrieves the event trail for a service, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn events_for_service(&self, service_id: i64) -> Result<Vec<QueueEvent>, EngineError> {
        Ok(queries::events_for_service(&self.conn, service_id)?)
    }
}
