// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde::{Deserialize, Serialize};

/// A service the office offers (cashier, permit, registrar, ...).
///
/// A service owns zero or more windows and many tickets. The per-day
/// ticket sequence is scoped to the service, never to a window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    /// The canonical numeric identifier assigned by the database.
    /// `None` indicates the service has not been persisted yet.
    service_id: Option<i64>,
    /// The unique service name (e.g., "Cashier").
    name: String,
    /// Optional short code prepended to display numbers (e.g., "C").
    /// Normalized to uppercase; globally unique when set.
    prefix: Option<String>,
    /// Optional free-text description.
    description: Option<String>,
    /// Whether the queue currently accepts new tickets.
    is_active: bool,
    /// Average time to serve one ticket, in minutes. Drives wait estimates.
    average_service_time: u32,
}

// Two Services are equal if they have the same name, regardless of their IDs
impl PartialEq for Service {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Service {}

impl std::hash::Hash for Service {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl Service {
    /// Creates a new `Service` without a persisted ID.
    ///
    /// The prefix is normalized to uppercase to keep display numbers
    /// consistent regardless of how the admin entered it.
    ///
    /// # Arguments
    ///
    /// * `name` - The unique service name
    /// * `prefix` - Optional display-number prefix (will be uppercased)
    /// * `average_service_time` - Average minutes to serve one ticket
    #[must_use]
    pub fn new(name: &str, prefix: Option<&str>, average_service_time: u32) -> Self {
        Self {
            service_id: None,
            name: name.to_string(),
            prefix: prefix.map(str::to_uppercase),
            description: None,
            is_active: true,
            average_service_time,
        }
    }

    /// Creates a `Service` with an existing persisted ID.
    #[must_use]
    pub fn with_id(
        service_id: i64,
        name: &str,
        prefix: Option<&str>,
        description: Option<String>,
        is_active: bool,
        average_service_time: u32,
    ) -> Self {
        Self {
            service_id: Some(service_id),
            name: name.to_string(),
            prefix: prefix.map(str::to_uppercase),
            description,
            is_active,
            average_service_time,
        }
    }

    /// Returns the canonical numeric identifier if persisted.
    #[must_use]
    pub const fn service_id(&self) -> Option<i64> {
        self.service_id
    }

    /// Returns the service name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the display-number prefix if set.
    #[must_use]
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// Returns the description if set.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns whether the queue currently accepts new tickets.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.is_active
    }

    /// Returns the average service time in minutes.
    #[must_use]
    pub const fn average_service_time(&self) -> u32 {
        self.average_service_time
    }

    /// Formats the human-facing display number for a queue number of
    /// this service: prefix + zero-padded number (e.g., `C001`).
    ///
    /// Services without a prefix produce the bare padded number (`001`).
    #[must_use]
    pub fn display_number(&self, queue_number: u32) -> String {
        match &self.prefix {
            Some(prefix) => format!("{prefix}{queue_number:03}"),
            None => format!("{queue_number:03}"),
        }
    }
}
