// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A ticket status transition is not permitted by the lifecycle rules.
    InvalidStatusTransition {
        /// The observed (current) status.
        from: String,
        /// The requested target status.
        to: String,
        /// Why the transition is not allowed.
        reason: String,
    },
    /// Ticket status string is not recognized.
    InvalidTicketStatus {
        /// The unrecognized status value.
        status: String,
    },
    /// Window status string is not recognized.
    InvalidWindowStatus(String),
    /// Service name is empty or invalid.
    InvalidServiceName(String),
    /// Service prefix is invalid.
    InvalidPrefix(String),
    /// Average service time must be at least one minute.
    InvalidAverageServiceTime {
        /// The invalid value.
        minutes: u32,
    },
    /// Window number must be positive.
    InvalidWindowNumber {
        /// The invalid value.
        number: u32,
    },
    /// Failed to parse a date from a string.
    DateParseError {
        /// The invalid date string.
        date_string: String,
        /// The parsing error message.
        error: String,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidStatusTransition { from, to, reason } => {
                write!(f, "Invalid ticket transition from '{from}' to '{to}': {reason}")
            }
            Self::InvalidTicketStatus { status } => {
                write!(f, "Unknown ticket status: {status}")
            }
            Self::InvalidWindowStatus(status) => write!(f, "Unknown window status: {status}"),
            Self::InvalidServiceName(msg) => write!(f, "Invalid service name: {msg}"),
            Self::InvalidPrefix(msg) => write!(f, "Invalid service prefix: {msg}"),
            Self::InvalidAverageServiceTime { minutes } => {
                write!(
                    f,
                    "Invalid average service time: {minutes}. Must be at least 1 minute"
                )
            }
            Self::InvalidWindowNumber { number } => {
                write!(f, "Invalid window number: {number}. Must be at least 1")
            }
            Self::DateParseError { date_string, error } => {
                write!(f, "Failed to parse date '{date_string}': {error}")
            }
        }
    }
}

impl std::error::Error for DomainError {}
