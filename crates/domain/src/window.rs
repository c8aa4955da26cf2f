// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Physical service windows and their status lifecycle.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Operational status of a physical window.
///
/// Only `Active` windows may be bound to staff or have tickets called
/// to them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WindowStatus {
    /// Window is open for service.
    #[default]
    Active,
    /// Window is closed (off-shift).
    Inactive,
    /// Window is temporarily unusable (equipment, repairs).
    Maintenance,
}

impl WindowStatus {
    /// Converts this status to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Maintenance => "maintenance",
        }
    }

    /// Returns whether the window can take calls and staff bindings.
    #[must_use]
    pub const fn is_usable(&self) -> bool {
        matches!(self, Self::Active)
    }
}

impl FromStr for WindowStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            "maintenance" => Ok(Self::Maintenance),
            _ => Err(DomainError::InvalidWindowStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for WindowStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A physical service point belonging to exactly one service.
///
/// A window serves at most one ticket at a time and is manned by at
/// most one staff member at a time; both invariants are enforced by the
/// engine, not by this struct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Window {
    /// Canonical numeric identifier. `None` before persistence.
    pub window_id: Option<i64>,
    /// The service this window belongs to.
    pub service_id: i64,
    /// Position within the service (unique per service, starts at 1).
    pub window_number: u32,
    /// Optional display name; falls back to "Window N".
    pub name: Option<String>,
    /// Operational status.
    pub status: WindowStatus,
    /// The staff member currently manning this window, if any.
    pub current_staff: Option<i64>,
}

impl Window {
    /// Creates a new `Window` without a persisted ID.
    #[must_use]
    pub const fn new(service_id: i64, window_number: u32, name: Option<String>) -> Self {
        Self {
            window_id: None,
            service_id,
            window_number,
            name,
            status: WindowStatus::Active,
            current_staff: None,
        }
    }

    /// Creates a `Window` with an existing persisted ID.
    #[must_use]
    pub const fn with_id(
        window_id: i64,
        service_id: i64,
        window_number: u32,
        name: Option<String>,
        status: WindowStatus,
        current_staff: Option<i64>,
    ) -> Self {
        Self {
            window_id: Some(window_id),
            service_id,
            window_number,
            name,
            status,
            current_staff,
        }
    }

    /// Returns the human-facing window name.
    #[must_use]
    pub fn display_name(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("Window {}", self.window_number))
    }

    /// Returns whether this window belongs to the given service.
    #[must_use]
    pub const fn belongs_to(&self, service_id: i64) -> bool {
        self.service_id == service_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_string_round_trip() {
        for status in [
            WindowStatus::Active,
            WindowStatus::Inactive,
            WindowStatus::Maintenance,
        ] {
            let s = status.as_str();
            match WindowStatus::from_str(s) {
                Ok(parsed) => assert_eq!(status, parsed),
                Err(e) => panic!("Failed to parse window status string: {s}: {e}"),
            }
        }
    }

    #[test]
    fn test_invalid_status_string() {
        assert!(WindowStatus::from_str("open").is_err());
    }

    #[test]
    fn test_only_active_is_usable() {
        assert!(WindowStatus::Active.is_usable());
        assert!(!WindowStatus::Inactive.is_usable());
        assert!(!WindowStatus::Maintenance.is_usable());
    }

    #[test]
    fn test_display_name_falls_back_to_number() {
        let named = Window::new(1, 2, Some(String::from("Front Desk")));
        assert_eq!(named.display_name(), "Front Desk");

        let unnamed = Window::new(1, 3, None);
        assert_eq!(unnamed.display_name(), "Window 3");
    }
}
