// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary layer.
//!
//! Handlers here sit between the HTTP server and the queue engine:
//! they resolve the caller's identity, enforce authorization, invoke
//! the engine, and translate engine errors into the API error
//! contract. No transport concerns live here.

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

mod auth;
mod clock;
mod error;
mod handlers;
mod request_response;

#[cfg(test)]
mod tests;

pub use auth::{AuthError, AuthorizationService, authenticate_stub};
pub use clock::local_today_and_now;
pub use error::{ApiError, translate_domain_error, translate_engine_error};
pub use handlers::{
    bind_window, call_next, call_specific, complete_ticket, create_service, create_window,
    issue_ticket, list_services, list_windows, notify_ticket, recall_ticket, release_window,
    remove_ticket, service_board, service_events, skip_ticket, staff_dashboard, start_serving,
    ticket_events, ticket_status, toggle_queue, update_service, update_window_status,
};
pub use request_response::{
    BindWindowResponse, CallTicketRequest, CallTicketResponse, CreateServiceRequest,
    CreateWindowRequest, DashboardWindowInfo, EventInfo, IssueTicketRequest, IssueTicketResponse,
    QueueInfo, ReleaseWindowResponse, ServiceBoardResponse, ServiceInfo, ServingInfo,
    StaffDashboardResponse, TicketActionRequest, TicketInfo, TicketStatusResponse,
    UpdateServiceRequest, UpdateWindowStatusRequest, WindowInfo,
};
