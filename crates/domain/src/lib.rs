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
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod error;
mod queue_view;
mod staff;
mod ticket;
mod types;
mod validation;
mod window;

#[cfg(test)]
mod tests;

pub use error::DomainError;
pub use queue_view::{QueueSnapshot, QueueStats, ServingEntry};
pub use staff::StaffIdentity;
pub use ticket::{Ticket, TicketStatus};
pub use types::Service;
pub use validation::{
    validate_average_service_time, validate_prefix, validate_service_name, validate_window_number,
};
pub use window::{Window, WindowStatus};
