// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

use serde::{Deserialize, Serialize};

/// Represents the entity performing a queue action.
///
/// An actor is any identifiable entity that initiates a state change:
/// a staff member, an administrator, or the public ticket kiosk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// The rendered identity label (e.g., "staff:3", "admin:1", "public").
    pub id: String,
    /// The type of actor (e.g., "staff", "admin", "public").
    pub actor_type: String,
}

impl Actor {
    /// Creates a new Actor.
    ///
    /// # Arguments
    ///
    /// * `id` - The rendered identity label
    /// * `actor_type` - The type of actor
    #[must_use]
    pub const fn new(id: String, actor_type: String) -> Self {
        Self { id, actor_type }
    }
}

/// Represents the specific queue action performed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    /// The name of the action (e.g., "`IssueTicket`", "`CallNext`").
    pub name: String,
    /// Optional additional details about the action (reasons, window).
    pub details: Option<String>,
}

impl Action {
    /// Creates a new Action.
    ///
    /// # Arguments
    ///
    /// * `name` - The name of the action
    /// * `details` - Optional additional details
    #[must_use]
    pub const fn new(name: String, details: Option<String>) -> Self {
        Self { name, details }
    }
}

/// An immutable record of one engine mutation.
///
/// Every successful queue mutation produces exactly one event. Events
/// are immutable once created and capture:
/// - Who performed the action (actor)
/// - What action was performed (action)
/// - Which ticket it touched, if any (window bindings have none)
/// - The ticket status before and after the transition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueEvent {
    /// The event ID assigned by the database. `None` before persistence.
    pub event_id: Option<i64>,
    /// The service whose queue was touched.
    pub service_id: i64,
    /// The ticket the action applied to, if any.
    pub ticket_id: Option<i64>,
    /// The actor who initiated this change.
    pub actor: Actor,
    /// The action that was performed.
    pub action: Action,
    /// The ticket status before the transition, if a ticket was touched.
    pub prior_status: Option<String>,
    /// The ticket status after the transition, if a ticket was touched.
    pub new_status: Option<String>,
    /// When the event occurred (RFC 3339).
    pub created_at: String,
}

impl QueueEvent {
    /// Creates a new `QueueEvent` for a ticket transition.
    ///
    /// Once created, an event is immutable.
    #[must_use]
    pub const fn for_ticket(
        service_id: i64,
        ticket_id: i64,
        actor: Actor,
        action: Action,
        prior_status: String,
        new_status: String,
        created_at: String,
    ) -> Self {
        Self {
            event_id: None,
            service_id,
            ticket_id: Some(ticket_id),
            actor,
            action,
            prior_status: Some(prior_status),
            new_status: Some(new_status),
            created_at,
        }
    }

    /// Creates a new `QueueEvent` with no ticket scope (window bind,
    /// queue pause, ticket issuance before the row ID is known).
    #[must_use]
    pub const fn for_service(
        service_id: i64,
        actor: Actor,
        action: Action,
        created_at: String,
    ) -> Self {
        Self {
            event_id: None,
            service_id,
            ticket_id: None,
            actor,
            action,
            prior_status: None,
            new_status: None,
            created_at,
        }
    }
}

#[cfg(test)]
mod tests;
