// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Authentication stub and authorization checks.
//!
//! Real credential verification (sessions, tokens) is the auth
//! collaborator's job; this module maps already-verified request
//! fields to a [`StaffIdentity`] and enforces what each identity may
//! do. Cross-service checks live here so the engine never sees a
//! request for a service the caller is not authorized for.

use qms_domain::StaffIdentity;
use thiserror::Error;

/// Authentication and authorization errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// The supplied actor fields do not form a valid identity.
    #[error("Authentication failed: {reason}")]
    AuthenticationFailed {
        /// Why the identity could not be resolved.
        reason: String,
    },
    /// The identity is valid but may not perform this action.
    #[error("Unauthorized: '{action}' requires {required}")]
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// What the action requires.
        required: String,
    },
}

/// Resolves request-supplied actor fields to a [`StaffIdentity`].
///
/// This is a stand-in for the external auth collaborator: the caller's
/// credentials are assumed already verified, and only the shape of the
/// identity is checked here.
///
/// # Arguments
///
/// * `role` - "public", "staff", or "admin"
/// * `staff_id` - Required for staff and admin
/// * `service_id` - The staff member's authorized service (staff only)
///
/// # Errors
///
/// Returns an error if the role is unknown or required fields are
/// missing.
pub fn authenticate_stub(
    role: &str,
    staff_id: Option<i64>,
    service_id: Option<i64>,
) -> Result<StaffIdentity, AuthError> {
    match role.to_lowercase().as_str() {
        "public" => Ok(StaffIdentity::Public),
        "staff" => match (staff_id, service_id) {
            (Some(staff_id), Some(service_id)) => Ok(StaffIdentity::Staff {
                staff_id,
                service_id,
            }),
            _ => Err(AuthError::AuthenticationFailed {
                reason: "staff identity requires staff_id and service_id".to_string(),
            }),
        },
        "admin" => staff_id.map_or_else(
            || {
                Err(AuthError::AuthenticationFailed {
                    reason: "admin identity requires staff_id".to_string(),
                })
            },
            |staff_id| Ok(StaffIdentity::Admin { staff_id }),
        ),
        other => Err(AuthError::AuthenticationFailed {
            reason: format!("unknown role '{other}'"),
        }),
    }
}

/// Authorization checks for queue operations.
pub struct AuthorizationService;

impl AuthorizationService {
    /// Checks that the identity holds the admin role.
    ///
    /// # Errors
    ///
    /// Returns an error if the identity is not an admin.
    pub fn authorize_admin(identity: &StaffIdentity, action: &str) -> Result<(), AuthError> {
        if identity.is_admin() {
            Ok(())
        } else {
            Err(AuthError::Unauthorized {
                action: action.to_string(),
                required: String::from("Admin role"),
            })
        }
    }

    /// Checks that the identity may operate the given service's queue.
    ///
    /// Staff are restricted to their own service; admins may operate
    /// any service; the public may operate none.
    ///
    /// # Errors
    ///
    /// Returns an error if the identity is not authorized for the
    /// service.
    pub fn authorize_queue_operation(
        identity: &StaffIdentity,
        service_id: i64,
        action: &str,
    ) -> Result<(), AuthError> {
        if identity.authorized_for(service_id) {
            Ok(())
        } else {
            Err(AuthError::Unauthorized {
                action: action.to_string(),
                required: String::from("staff assigned to this service"),
            })
        }
    }
}
