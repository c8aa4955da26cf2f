// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Caller identity supplied by the authentication boundary.

use serde::{Deserialize, Serialize};

/// The identity attached to an incoming request.
///
/// The authentication collaborator resolves credentials to one of these
/// variants before the engine is invoked; the engine itself never
/// probes for staff attributes at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StaffIdentity {
    /// Anonymous ticket holder or display board.
    Public,
    /// Staff member authorized for exactly one service.
    Staff {
        /// Stable staff identifier.
        staff_id: i64,
        /// The single service this staff member may operate.
        service_id: i64,
    },
    /// Administrator with structural authority over services and windows.
    Admin {
        /// Stable staff identifier.
        staff_id: i64,
    },
}

impl StaffIdentity {
    /// Returns the staff identifier, if this identity has one.
    #[must_use]
    pub const fn staff_id(&self) -> Option<i64> {
        match self {
            Self::Public => None,
            Self::Staff { staff_id, .. } | Self::Admin { staff_id } => Some(*staff_id),
        }
    }

    /// Returns whether this identity holds the admin role.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self, Self::Admin { .. })
    }

    /// Returns whether this identity may operate the given service's
    /// queue. Admins may operate any service.
    #[must_use]
    pub const fn authorized_for(&self, service_id: i64) -> bool {
        match self {
            Self::Public => false,
            Self::Staff {
                service_id: own, ..
            } => *own == service_id,
            Self::Admin { .. } => true,
        }
    }

    /// Renders the identity for audit records.
    #[must_use]
    pub fn audit_label(&self) -> String {
        match self {
            Self::Public => String::from("public"),
            Self::Staff { staff_id, .. } => format!("staff:{staff_id}"),
            Self::Admin { staff_id } => format!("admin:{staff_id}"),
        }
    }
}
