// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Window-binding guards.
//!
//! A window serves at most one ticket at a time and is manned by at
//! most one staff member at a time; a staff member mans at most one
//! window. These functions validate those invariants against entities
//! read inside the engine's transaction.

use crate::error::CoreError;
use qms_domain::{StaffIdentity, Window};

/// What the engine should do with a validated bind request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindDecision {
    /// The staff member already mans this window; nothing to write.
    AlreadyBound,
    /// Bind the window (after releasing any other window the staff
    /// member currently mans).
    Bind,
}

/// Validates that a window can take a call for the given service.
///
/// Used by every ticket-calling operation: the window must be active
/// and must belong to the ticket's service.
///
/// # Errors
///
/// Returns `CoreError::WindowUnavailable` if either check fails.
pub fn validate_window_for_call(window: &Window, service_id: i64) -> Result<(), CoreError> {
    if !window.status.is_usable() {
        return Err(CoreError::WindowUnavailable {
            window: window.display_name(),
            reason: format!("window is {}", window.status),
        });
    }
    if !window.belongs_to(service_id) {
        return Err(CoreError::WindowUnavailable {
            window: window.display_name(),
            reason: "window belongs to a different service".to_string(),
        });
    }
    Ok(())
}

/// Validates a staff bind request against the window's current state.
///
/// Binding is idempotent for the staff member already manning the
/// window. A window manned by anyone else is unavailable; so is a
/// window of another service or a non-active window.
///
/// # Errors
///
/// Returns `CoreError::WindowUnavailable` if the window cannot be
/// bound by this staff member.
pub fn validate_bind(window: &Window, staff: &StaffIdentity) -> Result<BindDecision, CoreError> {
    if !window.status.is_usable() {
        return Err(CoreError::WindowUnavailable {
            window: window.display_name(),
            reason: format!("window is {}", window.status),
        });
    }

    if !staff.authorized_for(window.service_id) {
        return Err(CoreError::WindowUnavailable {
            window: window.display_name(),
            reason: "window belongs to a different service".to_string(),
        });
    }

    match (window.current_staff, staff.staff_id()) {
        (Some(current), Some(requester)) if current == requester => Ok(BindDecision::AlreadyBound),
        (Some(_), _) => Err(CoreError::WindowUnavailable {
            window: window.display_name(),
            reason: "window is already manned by another staff member".to_string(),
        }),
        (None, _) => Ok(BindDecision::Bind),
    }
}
