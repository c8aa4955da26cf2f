// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use qms_domain::DomainError;

/// Errors that can occur while applying a queue operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A domain rule was violated (typically an illegal status
    /// transition; the domain error carries the observed and required
    /// states).
    DomainViolation(DomainError),
    /// The target window cannot be used: inactive, under maintenance,
    /// manned by someone else, or belonging to a different service.
    WindowUnavailable {
        /// Human-facing window name.
        window: String,
        /// Why the window cannot be used.
        reason: String,
    },
    /// Call-next found no waiting ticket for the service today.
    QueueEmpty,
    /// The service is paused and not accepting new tickets.
    ServiceClosed {
        /// The service name.
        service: String,
    },
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DomainViolation(err) => write!(f, "Domain violation: {err}"),
            Self::WindowUnavailable { window, reason } => {
                write!(f, "Window '{window}' unavailable: {reason}")
            }
            Self::QueueEmpty => write!(f, "No tickets waiting in queue"),
            Self::ServiceClosed { service } => {
                write!(f, "Service '{service}' is not accepting new tickets")
            }
        }
    }
}

impl std::error::Error for CoreError {}

impl From<DomainError> for CoreError {
    fn from(err: DomainError) -> Self {
        Self::DomainViolation(err)
    }
}
