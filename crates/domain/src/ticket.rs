// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Ticket entity and status transition logic.
//!
//! This module defines ticket states and valid transitions. Transitions
//! are staff-initiated only; the system never advances a ticket based on
//! time alone.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::Date;
use uuid::Uuid;

/// Lifecycle states of a queue ticket.
///
/// Happy path: `Waiting → Notified → Serving → Served`.
/// `Served` is terminal; `Skipped` and `Cancelled` can be recalled back
/// to `Waiting`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    /// In the queue, not yet called.
    Waiting,
    /// Pre-called ("within 5"); claimed but not yet at a window.
    Notified,
    /// Currently being served at a window.
    Serving,
    /// Service finished. Terminal.
    Served,
    /// Removed from the queue by staff.
    Cancelled,
    /// Holder did not show up when called; parked for possible recall.
    Skipped,
}

impl TicketStatus {
    /// Returns the string representation of the status.
    ///
    /// This is used for persistence and API serialization.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Waiting => "waiting",
            Self::Notified => "notified",
            Self::Serving => "serving",
            Self::Served => "served",
            Self::Cancelled => "cancelled",
            Self::Skipped => "skipped",
        }
    }

    /// Parses a status from its string representation.
    fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s {
            "waiting" => Ok(Self::Waiting),
            "notified" => Ok(Self::Notified),
            "serving" => Ok(Self::Serving),
            "served" => Ok(Self::Served),
            "cancelled" => Ok(Self::Cancelled),
            "skipped" => Ok(Self::Skipped),
            _ => Err(DomainError::InvalidTicketStatus {
                status: s.to_string(),
            }),
        }
    }

    /// Returns true if this status is terminal (no further transitions).
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Served)
    }

    /// Returns true if the ticket still occupies a place in the queue
    /// (counted for people-ahead computations).
    #[must_use]
    pub const fn is_queued(&self) -> bool {
        matches!(self, Self::Waiting | Self::Notified)
    }

    /// Validates if a transition from this status to another is permitted.
    ///
    /// # Errors
    ///
    /// Returns an error if the transition is not allowed.
    pub fn validate_transition(&self, new_status: Self) -> Result<(), DomainError> {
        if self.is_terminal() {
            return Err(DomainError::InvalidStatusTransition {
                from: self.as_str().to_string(),
                to: new_status.as_str().to_string(),
                reason: "cannot transition from a served ticket".to_string(),
            });
        }

        let valid = match self {
            Self::Waiting => matches!(
                new_status,
                Self::Notified | Self::Serving | Self::Cancelled | Self::Skipped
            ),
            Self::Notified => matches!(
                new_status,
                Self::Serving | Self::Waiting | Self::Cancelled | Self::Skipped
            ),
            Self::Serving => matches!(new_status, Self::Served | Self::Cancelled),
            // Recall back to the queue, or cancel outright
            Self::Skipped => matches!(new_status, Self::Waiting | Self::Cancelled),
            Self::Cancelled => matches!(new_status, Self::Waiting),
            Self::Served => false,
        };

        if valid {
            Ok(())
        } else {
            Err(DomainError::InvalidStatusTransition {
                from: self.as_str().to_string(),
                to: new_status.as_str().to_string(),
                reason: "transition not permitted by ticket lifecycle rules".to_string(),
            })
        }
    }
}

impl FromStr for TicketStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl std::fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A queue ticket.
///
/// `(service_id, ticket_date, queue_number)` is unique; `queue_number`
/// is assigned once at issuance and never renumbered. Tickets are never
/// physically deleted; terminal states are retained for the day's
/// record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    /// Canonical numeric identifier. `None` before persistence.
    pub ticket_id: Option<i64>,
    /// Opaque public identifier handed to the ticket holder.
    pub public_id: Uuid,
    /// The service this ticket was issued for.
    pub service_id: i64,
    /// Position within the service's daily sequence (starts at 1).
    pub queue_number: u32,
    /// Current lifecycle state.
    pub status: TicketStatus,
    /// The calendar day the number was allocated on. Fixed at creation.
    pub ticket_date: Date,
    /// The window this ticket was called to, if any.
    pub assigned_window: Option<i64>,
    /// Staff member who called the ticket, if called.
    pub called_by: Option<i64>,
    /// Staff member who completed the ticket, if served.
    pub served_by: Option<i64>,
    /// Issuance timestamp (RFC 3339).
    pub created_at: String,
    /// When the ticket was last called (RFC 3339).
    pub called_at: Option<String>,
    /// When the ticket was completed (RFC 3339).
    pub served_at: Option<String>,
    /// When the ticket was skipped (RFC 3339).
    pub skipped_at: Option<String>,
    /// Free-text notes (skip/removal reasons, recall history).
    pub notes: Option<String>,
}

impl Ticket {
    /// Creates a fresh `waiting` ticket for a service and day.
    ///
    /// The queue number must come from the sequence allocator; this
    /// constructor performs no allocation.
    #[must_use]
    pub fn new(service_id: i64, queue_number: u32, ticket_date: Date, created_at: String) -> Self {
        Self {
            ticket_id: None,
            public_id: Uuid::new_v4(),
            service_id,
            queue_number,
            status: TicketStatus::Waiting,
            ticket_date,
            assigned_window: None,
            called_by: None,
            served_by: None,
            created_at,
            called_at: None,
            served_at: None,
            skipped_at: None,
            notes: None,
        }
    }
}
