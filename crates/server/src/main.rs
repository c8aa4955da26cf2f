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
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

use axum::{
    Json, Router,
    extract::{Path, Query, State as AxumState},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;
use uuid::Uuid;

use qms_api::{
    ApiError, BindWindowResponse, CallTicketRequest, CallTicketResponse, CreateServiceRequest,
    CreateWindowRequest, EventInfo, IssueTicketRequest, IssueTicketResponse,
    ReleaseWindowResponse, ServiceBoardResponse, ServiceInfo, StaffDashboardResponse,
    TicketActionRequest, TicketStatusResponse, UpdateServiceRequest, UpdateWindowStatusRequest,
    WindowInfo, authenticate_stub, local_today_and_now,
};
use qms_domain::StaffIdentity;
use qms_persistence::QueueEngine;

mod live;
use live::{LiveEvent, LiveEventBroadcaster, live_events_handler};

/// QMS Server - HTTP server for the queue management system
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,
}

/// Application state shared across handlers.
///
/// The engine is wrapped in a Mutex so each operation runs as a single
/// writer; the broadcaster fans queue changes out to display boards.
#[derive(Clone)]
struct AppState {
    /// The transactional queue engine.
    engine: Arc<Mutex<QueueEngine>>,
    /// Live event fan-out for display boards.
    broadcaster: Arc<LiveEventBroadcaster>,
}

/// Actor fields carried by every authenticated request body.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct ActorFields {
    /// The caller's role: "public", "staff", or "admin".
    actor_role: String,
    /// The caller's staff ID (staff and admin).
    actor_staff_id: Option<i64>,
    /// The staff member's authorized service (staff only).
    actor_service_id: Option<i64>,
}

/// API request for issuing a ticket (public kiosk).
#[derive(Debug, Clone, Deserialize, Serialize)]
struct IssueTicketApiRequest {
    /// The service to queue for.
    service_id: i64,
}

/// API request for call-next.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct CallNextApiRequest {
    #[serde(flatten)]
    actor: ActorFields,
    /// The window to call the next ticket to.
    window_id: i64,
}

/// API request for call-specific and start-serving.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct CallTicketApiRequest {
    #[serde(flatten)]
    actor: ActorFields,
    /// The ticket's public ID.
    ticket_id: Uuid,
    /// The window to call it to.
    window_id: i64,
}

/// API request for single-ticket staff actions.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct TicketActionApiRequest {
    #[serde(flatten)]
    actor: ActorFields,
    /// The ticket's public ID.
    ticket_id: Uuid,
    /// Optional reason (remove/skip).
    reason: Option<String>,
}

/// API request for selecting a window.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct SelectWindowApiRequest {
    #[serde(flatten)]
    actor: ActorFields,
    /// The window to man.
    window_id: i64,
}

/// API request for releasing the current window.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct ReleaseWindowApiRequest {
    #[serde(flatten)]
    actor: ActorFields,
}

/// API request for pausing/resuming a queue.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct ToggleQueueApiRequest {
    #[serde(flatten)]
    actor: ActorFields,
    /// The service whose queue to toggle.
    service_id: i64,
    /// Whether the queue should accept new tickets.
    active: bool,
}

/// API request for creating a service (admin).
#[derive(Debug, Clone, Deserialize, Serialize)]
struct CreateServiceApiRequest {
    #[serde(flatten)]
    actor: ActorFields,
    /// The unique service name.
    name: String,
    /// Optional display-number prefix.
    prefix: Option<String>,
    /// Optional description.
    description: Option<String>,
    /// Average minutes to serve one ticket.
    average_service_time: u32,
}

/// API request for updating a service (admin).
#[derive(Debug, Clone, Deserialize, Serialize)]
struct UpdateServiceApiRequest {
    #[serde(flatten)]
    actor: ActorFields,
    /// The service to update.
    service_id: i64,
    /// The new name.
    name: String,
    /// The new prefix.
    prefix: Option<String>,
    /// The new description.
    description: Option<String>,
    /// The new average service time.
    average_service_time: u32,
}

/// API request for creating a window (admin).
#[derive(Debug, Clone, Deserialize, Serialize)]
struct CreateWindowApiRequest {
    #[serde(flatten)]
    actor: ActorFields,
    /// The owning service.
    service_id: i64,
    /// Position within the service.
    window_number: u32,
    /// Optional display name.
    name: Option<String>,
}

/// API request for changing a window's status (admin).
#[derive(Debug, Clone, Deserialize, Serialize)]
struct UpdateWindowStatusApiRequest {
    #[serde(flatten)]
    actor: ActorFields,
    /// The window to update.
    window_id: i64,
    /// The new status ("active", "inactive", "maintenance").
    status: String,
}

/// Query parameters for the staff dashboard.
#[derive(Debug, Deserialize)]
struct DashboardQuery {
    /// The service to show.
    service_id: i64,
    /// The caller's role.
    actor_role: String,
    /// The caller's staff ID.
    actor_staff_id: Option<i64>,
    /// The staff member's authorized service.
    actor_service_id: Option<i64>,
}

/// Query parameters for the ticket event trail.
#[derive(Debug, Deserialize)]
struct EventsQuery {
    /// The caller's role.
    actor_role: String,
    /// The caller's staff ID.
    actor_staff_id: Option<i64>,
    /// The staff member's authorized service.
    actor_service_id: Option<i64>,
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match &err {
            ApiError::AuthenticationFailed { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Unauthorized { .. } => StatusCode::FORBIDDEN,
            ApiError::ResourceNotFound { .. } | ApiError::QueueEmpty => StatusCode::NOT_FOUND,
            ApiError::InvalidState { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::WindowUnavailable { .. } | ApiError::Conflict { .. } => StatusCode::CONFLICT,
            ApiError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

/// Resolves the request's actor fields to an identity.
fn resolve_identity(actor: &ActorFields) -> Result<StaffIdentity, HttpError> {
    authenticate_stub(
        &actor.actor_role,
        actor.actor_staff_id,
        actor.actor_service_id,
    )
    .map_err(|e| HttpError {
        status: StatusCode::UNAUTHORIZED,
        message: e.to_string(),
    })
}

/// Handler for GET `/services` endpoint.
async fn handle_list_services(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<Vec<ServiceInfo>>, HttpError> {
    let engine = app_state.engine.lock().await;
    let services: Vec<ServiceInfo> = qms_api::list_services(&engine)?;
    drop(engine);

    Ok(Json(services))
}

/// Handler for GET `/services/{service_id}/windows` endpoint.
async fn handle_list_windows(
    AxumState(app_state): AxumState<AppState>,
    Path(service_id): Path<i64>,
) -> Result<Json<Vec<WindowInfo>>, HttpError> {
    let engine = app_state.engine.lock().await;
    let windows: Vec<WindowInfo> = qms_api::list_windows(&engine, service_id)?;
    drop(engine);

    Ok(Json(windows))
}

/// Handler for GET `/services/{service_id}/board` endpoint.
///
/// Public display board: queue stats plus currently-serving per window.
async fn handle_service_board(
    AxumState(app_state): AxumState<AppState>,
    Path(service_id): Path<i64>,
) -> Result<Json<ServiceBoardResponse>, HttpError> {
    let (today, _now) = local_today_and_now();

    let engine = app_state.engine.lock().await;
    let board: ServiceBoardResponse = qms_api::service_board(&engine, service_id, today)?;
    drop(engine);

    Ok(Json(board))
}

/// Handler for POST `/tickets` endpoint.
///
/// Public kiosk operation; the response carries everything the ticket
/// printer needs.
async fn handle_issue_ticket(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<IssueTicketApiRequest>,
) -> Result<Json<IssueTicketResponse>, HttpError> {
    info!(service_id = req.service_id, "Handling issue_ticket request");

    let (today, now) = local_today_and_now();
    let request: IssueTicketRequest = IssueTicketRequest {
        service_id: req.service_id,
    };

    let mut engine = app_state.engine.lock().await;
    let response: IssueTicketResponse = qms_api::issue_ticket(
        &mut engine,
        &StaffIdentity::Public,
        &request,
        today,
        &now,
    )?;
    drop(engine);

    app_state.broadcaster.broadcast(&LiveEvent::TicketIssued {
        service_id: req.service_id,
        display_number: response.ticket.display_number.clone(),
        waiting_count: response.ticket.people_ahead + 1,
    });

    Ok(Json(response))
}

/// Handler for GET `/tickets/{ticket_id}` endpoint.
///
/// Public ticket lookup with live position data.
async fn handle_ticket_status(
    AxumState(app_state): AxumState<AppState>,
    Path(ticket_id): Path<Uuid>,
) -> Result<Json<TicketStatusResponse>, HttpError> {
    let engine = app_state.engine.lock().await;
    let response: TicketStatusResponse = qms_api::ticket_status(&engine, ticket_id)?;
    drop(engine);

    Ok(Json(response))
}

/// Handler for GET `/services/{service_id}/events` endpoint.
async fn handle_service_events(
    AxumState(app_state): AxumState<AppState>,
    Path(service_id): Path<i64>,
    Query(query): Query<EventsQuery>,
) -> Result<Json<Vec<EventInfo>>, HttpError> {
    let identity: StaffIdentity = resolve_identity(&ActorFields {
        actor_role: query.actor_role,
        actor_staff_id: query.actor_staff_id,
        actor_service_id: query.actor_service_id,
    })?;

    let engine = app_state.engine.lock().await;
    let events: Vec<EventInfo> = qms_api::service_events(&engine, &identity, service_id)?;
    drop(engine);

    Ok(Json(events))
}

/// Handler for GET `/tickets/{ticket_id}/events` endpoint.
async fn handle_ticket_events(
    AxumState(app_state): AxumState<AppState>,
    Path(ticket_id): Path<Uuid>,
    Query(query): Query<EventsQuery>,
) -> Result<Json<Vec<EventInfo>>, HttpError> {
    let identity: StaffIdentity = resolve_identity(&ActorFields {
        actor_role: query.actor_role,
        actor_staff_id: query.actor_staff_id,
        actor_service_id: query.actor_service_id,
    })?;

    let engine = app_state.engine.lock().await;
    let events: Vec<EventInfo> = qms_api::ticket_events(&engine, &identity, ticket_id)?;
    drop(engine);

    Ok(Json(events))
}

/// Handler for POST `/staff/call_next` endpoint.
async fn handle_call_next(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<CallNextApiRequest>,
) -> Result<Json<CallTicketResponse>, HttpError> {
    info!(window_id = req.window_id, "Handling call_next request");

    let identity: StaffIdentity = resolve_identity(&req.actor)?;
    let (today, now) = local_today_and_now();

    let mut engine = app_state.engine.lock().await;
    let response: CallTicketResponse =
        qms_api::call_next(&mut engine, &identity, req.window_id, today, &now)?;
    drop(engine);

    app_state.broadcaster.broadcast(&LiveEvent::TicketCalled {
        service_id: response.ticket.service_id,
        display_number: response.ticket.display_number.clone(),
        window: response.window.name.clone(),
    });

    Ok(Json(response))
}

/// Handler for POST `/staff/call_specific` endpoint.
async fn handle_call_specific(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<CallTicketApiRequest>,
) -> Result<Json<CallTicketResponse>, HttpError> {
    info!(
        ticket_id = %req.ticket_id,
        window_id = req.window_id,
        "Handling call_specific request"
    );

    let identity: StaffIdentity = resolve_identity(&req.actor)?;
    let (today, now) = local_today_and_now();
    let request: CallTicketRequest = CallTicketRequest {
        ticket_id: req.ticket_id,
        window_id: req.window_id,
    };

    let mut engine = app_state.engine.lock().await;
    let response: CallTicketResponse =
        qms_api::call_specific(&mut engine, &identity, &request, today, &now)?;
    drop(engine);

    app_state.broadcaster.broadcast(&LiveEvent::TicketCalled {
        service_id: response.ticket.service_id,
        display_number: response.ticket.display_number.clone(),
        window: response.window.name.clone(),
    });

    Ok(Json(response))
}

/// Handler for POST `/staff/start_serving` endpoint.
async fn handle_start_serving(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<CallTicketApiRequest>,
) -> Result<Json<CallTicketResponse>, HttpError> {
    info!(
        ticket_id = %req.ticket_id,
        window_id = req.window_id,
        "Handling start_serving request"
    );

    let identity: StaffIdentity = resolve_identity(&req.actor)?;
    let (today, now) = local_today_and_now();
    let request: CallTicketRequest = CallTicketRequest {
        ticket_id: req.ticket_id,
        window_id: req.window_id,
    };

    let mut engine = app_state.engine.lock().await;
    let response: CallTicketResponse =
        qms_api::start_serving(&mut engine, &identity, &request, today, &now)?;
    drop(engine);

    app_state.broadcaster.broadcast(&LiveEvent::TicketCalled {
        service_id: response.ticket.service_id,
        display_number: response.ticket.display_number.clone(),
        window: response.window.name.clone(),
    });

    Ok(Json(response))
}

/// Handler for POST `/staff/notify` endpoint.
async fn handle_notify(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<TicketActionApiRequest>,
) -> Result<Json<TicketStatusResponse>, HttpError> {
    let identity: StaffIdentity = resolve_identity(&req.actor)?;
    let (_today, now) = local_today_and_now();
    let request: TicketActionRequest = TicketActionRequest {
        ticket_id: req.ticket_id,
        reason: req.reason,
    };

    let mut engine = app_state.engine.lock().await;
    let response: TicketStatusResponse =
        qms_api::notify_ticket(&mut engine, &identity, &request, &now)?;
    drop(engine);

    Ok(Json(response))
}

/// Handler for POST `/staff/complete` endpoint.
async fn handle_complete(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<TicketActionApiRequest>,
) -> Result<Json<TicketStatusResponse>, HttpError> {
    info!(ticket_id = %req.ticket_id, "Handling complete request");

    let identity: StaffIdentity = resolve_identity(&req.actor)?;
    let (_today, now) = local_today_and_now();
    let request: TicketActionRequest = TicketActionRequest {
        ticket_id: req.ticket_id,
        reason: req.reason,
    };

    let mut engine = app_state.engine.lock().await;
    let response: TicketStatusResponse =
        qms_api::complete_ticket(&mut engine, &identity, &request, &now)?;
    drop(engine);

    app_state.broadcaster.broadcast(&LiveEvent::TicketCompleted {
        service_id: response.ticket.service_id,
        display_number: response.ticket.display_number.clone(),
    });

    Ok(Json(response))
}

/// Handler for POST `/staff/remove` endpoint.
async fn handle_remove(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<TicketActionApiRequest>,
) -> Result<Json<TicketStatusResponse>, HttpError> {
    info!(ticket_id = %req.ticket_id, "Handling remove request");

    let identity: StaffIdentity = resolve_identity(&req.actor)?;
    let (_today, now) = local_today_and_now();
    let request: TicketActionRequest = TicketActionRequest {
        ticket_id: req.ticket_id,
        reason: req.reason,
    };

    let mut engine = app_state.engine.lock().await;
    let response: TicketStatusResponse =
        qms_api::remove_ticket(&mut engine, &identity, &request, &now)?;
    drop(engine);

    app_state.broadcaster.broadcast(&LiveEvent::TicketParked {
        service_id: response.ticket.service_id,
        display_number: response.ticket.display_number.clone(),
        status: response.ticket.status.clone(),
    });

    Ok(Json(response))
}

/// Handler for POST `/staff/skip` endpoint.
async fn handle_skip(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<TicketActionApiRequest>,
) -> Result<Json<TicketStatusResponse>, HttpError> {
    info!(ticket_id = %req.ticket_id, "Handling skip request");

    let identity: StaffIdentity = resolve_identity(&req.actor)?;
    let (_today, now) = local_today_and_now();
    let request: TicketActionRequest = TicketActionRequest {
        ticket_id: req.ticket_id,
        reason: req.reason,
    };

    let mut engine = app_state.engine.lock().await;
    let response: TicketStatusResponse =
        qms_api::skip_ticket(&mut engine, &identity, &request, &now)?;
    drop(engine);

    app_state.broadcaster.broadcast(&LiveEvent::TicketParked {
        service_id: response.ticket.service_id,
        display_number: response.ticket.display_number.clone(),
        status: response.ticket.status.clone(),
    });

    Ok(Json(response))
}

/// Handler for POST `/staff/recall` endpoint.
async fn handle_recall(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<TicketActionApiRequest>,
) -> Result<Json<TicketStatusResponse>, HttpError> {
    info!(ticket_id = %req.ticket_id, "Handling recall request");

    let identity: StaffIdentity = resolve_identity(&req.actor)?;
    let (_today, now) = local_today_and_now();
    let request: TicketActionRequest = TicketActionRequest {
        ticket_id: req.ticket_id,
        reason: req.reason,
    };

    let mut engine = app_state.engine.lock().await;
    let response: TicketStatusResponse =
        qms_api::recall_ticket(&mut engine, &identity, &request, &now)?;
    drop(engine);

    app_state.broadcaster.broadcast(&LiveEvent::TicketRecalled {
        service_id: response.ticket.service_id,
        display_number: response.ticket.display_number.clone(),
    });

    Ok(Json(response))
}

/// Handler for POST `/staff/select_window` endpoint.
///
/// Staff selects which window they're manning, right after login.
async fn handle_select_window(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<SelectWindowApiRequest>,
) -> Result<Json<BindWindowResponse>, HttpError> {
    info!(window_id = req.window_id, "Handling select_window request");

    let identity: StaffIdentity = resolve_identity(&req.actor)?;
    let (_today, now) = local_today_and_now();

    let mut engine = app_state.engine.lock().await;
    let response: BindWindowResponse =
        qms_api::bind_window(&mut engine, &identity, req.window_id, &now)?;
    drop(engine);

    Ok(Json(response))
}

/// Handler for POST `/staff/release_window` endpoint.
async fn handle_release_window(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<ReleaseWindowApiRequest>,
) -> Result<Json<ReleaseWindowResponse>, HttpError> {
    let identity: StaffIdentity = resolve_identity(&req.actor)?;
    let (_today, now) = local_today_and_now();

    let mut engine = app_state.engine.lock().await;
    let response: ReleaseWindowResponse =
        qms_api::release_window(&mut engine, &identity, &now)?;
    drop(engine);

    Ok(Json(response))
}

/// Handler for GET `/staff/dashboard` endpoint.
async fn handle_dashboard(
    AxumState(app_state): AxumState<AppState>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<StaffDashboardResponse>, HttpError> {
    let identity: StaffIdentity = resolve_identity(&ActorFields {
        actor_role: query.actor_role,
        actor_staff_id: query.actor_staff_id,
        actor_service_id: query.actor_service_id,
    })?;
    let (today, _now) = local_today_and_now();

    let engine = app_state.engine.lock().await;
    let response: StaffDashboardResponse =
        qms_api::staff_dashboard(&engine, &identity, query.service_id, today)?;
    drop(engine);

    Ok(Json(response))
}

/// Handler for POST `/staff/toggle_queue` endpoint.
async fn handle_toggle_queue(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<ToggleQueueApiRequest>,
) -> Result<Json<ServiceInfo>, HttpError> {
    info!(
        service_id = req.service_id,
        active = req.active,
        "Handling toggle_queue request"
    );

    let identity: StaffIdentity = resolve_identity(&req.actor)?;
    let (_today, now) = local_today_and_now();

    let mut engine = app_state.engine.lock().await;
    let response: ServiceInfo =
        qms_api::toggle_queue(&mut engine, &identity, req.service_id, req.active, &now)?;
    drop(engine);

    app_state.broadcaster.broadcast(&LiveEvent::QueueToggled {
        service_id: response.id,
        is_active: response.is_active,
    });

    Ok(Json(response))
}

/// Handler for POST `/services` endpoint (admin).
async fn handle_create_service(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<CreateServiceApiRequest>,
) -> Result<Json<ServiceInfo>, HttpError> {
    info!(name = %req.name, "Handling create_service request");

    let identity: StaffIdentity = resolve_identity(&req.actor)?;
    let (_today, now) = local_today_and_now();
    let request: CreateServiceRequest = CreateServiceRequest {
        name: req.name,
        prefix: req.prefix,
        description: req.description,
        average_service_time: req.average_service_time,
    };

    let mut engine = app_state.engine.lock().await;
    let response: ServiceInfo =
        qms_api::create_service(&mut engine, &identity, &request, &now)?;
    drop(engine);

    Ok(Json(response))
}

/// Handler for POST `/services/update` endpoint (admin).
async fn handle_update_service(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<UpdateServiceApiRequest>,
) -> Result<Json<ServiceInfo>, HttpError> {
    info!(service_id = req.service_id, "Handling update_service request");

    let identity: StaffIdentity = resolve_identity(&req.actor)?;
    let (_today, now) = local_today_and_now();
    let request: UpdateServiceRequest = UpdateServiceRequest {
        service_id: req.service_id,
        name: req.name,
        prefix: req.prefix,
        description: req.description,
        average_service_time: req.average_service_time,
    };

    let mut engine = app_state.engine.lock().await;
    let response: ServiceInfo =
        qms_api::update_service(&mut engine, &identity, &request, &now)?;
    drop(engine);

    Ok(Json(response))
}

/// Handler for POST `/windows` endpoint (admin).
async fn handle_create_window(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<CreateWindowApiRequest>,
) -> Result<Json<WindowInfo>, HttpError> {
    info!(
        service_id = req.service_id,
        window_number = req.window_number,
        "Handling create_window request"
    );

    let identity: StaffIdentity = resolve_identity(&req.actor)?;
    let (_today, now) = local_today_and_now();
    let request: CreateWindowRequest = CreateWindowRequest {
        service_id: req.service_id,
        window_number: req.window_number,
        name: req.name,
    };

    let mut engine = app_state.engine.lock().await;
    let response: WindowInfo = qms_api::create_window(&mut engine, &identity, &request, &now)?;
    drop(engine);

    Ok(Json(response))
}

/// Handler for POST `/windows/status` endpoint (admin).
async fn handle_update_window_status(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<UpdateWindowStatusApiRequest>,
) -> Result<Json<WindowInfo>, HttpError> {
    info!(
        window_id = req.window_id,
        status = %req.status,
        "Handling update_window_status request"
    );

    let identity: StaffIdentity = resolve_identity(&req.actor)?;
    let (_today, now) = local_today_and_now();
    let request: UpdateWindowStatusRequest = UpdateWindowStatusRequest {
        window_id: req.window_id,
        status: req.status,
    };

    let mut engine = app_state.engine.lock().await;
    let response: WindowInfo =
        qms_api::update_window_status(&mut engine, &identity, &request, &now)?;
    drop(engine);

    Ok(Json(response))
}

/// Builds the application router.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/services", get(handle_list_services))
        .route("/services", post(handle_create_service))
        .route("/services/update", post(handle_update_service))
        .route("/services/{service_id}/windows", get(handle_list_windows))
        .route("/services/{service_id}/board", get(handle_service_board))
        .route("/services/{service_id}/events", get(handle_service_events))
        .route("/windows", post(handle_create_window))
        .route("/windows/status", post(handle_update_window_status))
        .route("/tickets", post(handle_issue_ticket))
        .route("/tickets/{ticket_id}", get(handle_ticket_status))
        .route("/tickets/{ticket_id}/events", get(handle_ticket_events))
        .route("/staff/call_next", post(handle_call_next))
        .route("/staff/call_specific", post(handle_call_specific))
        .route("/staff/start_serving", post(handle_start_serving))
        .route("/staff/notify", post(handle_notify))
        .route("/staff/complete", post(handle_complete))
        .route("/staff/remove", post(handle_remove))
        .route("/staff/skip", post(handle_skip))
        .route("/staff/recall", post(handle_recall))
        .route("/staff/select_window", post(handle_select_window))
        .route("/staff/release_window", post(handle_release_window))
        .route("/staff/dashboard", get(handle_dashboard))
        .route("/staff/toggle_queue", post(handle_toggle_queue))
        .route("/live", get(live_events_handler))
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing QMS Server");

    // Initialize the engine (in-memory or file-based based on CLI argument)
    let engine: QueueEngine = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        QueueEngine::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        QueueEngine::new_in_memory()?
    };

    let app_state: AppState = AppState {
        engine: Arc::new(Mutex::new(engine)),
        broadcaster: Arc::new(LiveEventBroadcaster::new()),
    };

    // Build router
    let app: Router = build_router(app_state);

    // Bind to address
    let addr: std::net::SocketAddr = format!("127.0.0.1:{}", args.port).parse()?;
    info!("Server listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode as HttpStatusCode};
    use tower::ServiceExt;

    fn create_test_app_state() -> AppState {
        let engine = QueueEngine::new_in_memory().expect("in-memory engine");
        AppState {
            engine: Arc::new(Mutex::new(engine)),
            broadcaster: Arc::new(LiveEventBroadcaster::new()),
        }
    }

    fn admin_actor() -> ActorFields {
        ActorFields {
            actor_role: String::from("admin"),
            actor_staff_id: Some(1),
            actor_service_id: None,
        }
    }

    fn staff_actor(service_id: i64) -> ActorFields {
        ActorFields {
            actor_role: String::from("staff"),
            actor_staff_id: Some(3),
            actor_service_id: Some(service_id),
        }
    }

    fn json_request(method: &str, uri: &str, body: &impl Serialize) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(body).unwrap()))
            .unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    async fn response_json<T: serde::de::DeserializeOwned>(response: Response) -> T {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    /// Creates a Cashier service and one window, returning their IDs.
    async fn setup_cashier(app: &Router) -> (i64, i64) {
        let service_req = CreateServiceApiRequest {
            actor: admin_actor(),
            name: String::from("Cashier"),
            prefix: Some(String::from("C")),
            description: None,
            average_service_time: 5,
        };
        let response = app
            .clone()
            .oneshot(json_request("POST", "/services", &service_req))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::OK);
        let service: ServiceInfo = response_json(response).await;

        let window_req = CreateWindowApiRequest {
            actor: admin_actor(),
            service_id: service.id,
            window_number: 1,
            name: Some(String::from("Window 1")),
        };
        let response = app
            .clone()
            .oneshot(json_request("POST", "/windows", &window_req))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::OK);
        let window: WindowInfo = response_json(response).await;

        (service.id, window.id)
    }

    async fn issue_one(app: &Router, service_id: i64) -> IssueTicketResponse {
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/tickets",
                &IssueTicketApiRequest { service_id },
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::OK);
        response_json(response).await
    }

    #[tokio::test]
    async fn test_full_queue_flow() {
        let app: Router = build_router(create_test_app_state());
        let (service_id, window_id) = setup_cashier(&app).await;

        // 1. Issue three tickets
        let t1 = issue_one(&app, service_id).await;
        let t2 = issue_one(&app, service_id).await;
        let t3 = issue_one(&app, service_id).await;
        assert_eq!(t1.ticket.display_number, "C001");
        assert_eq!(t2.ticket.display_number, "C002");
        assert_eq!(t3.ticket.display_number, "C003");
        assert_eq!(t3.ticket.people_ahead, 2);
        assert_eq!(t3.total_today, 3);

        // 2. Staff calls next
        let call_req = CallNextApiRequest {
            actor: staff_actor(service_id),
            window_id,
        };
        let response = app
            .clone()
            .oneshot(json_request("POST", "/staff/call_next", &call_req))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::OK);
        let call: CallTicketResponse = response_json(response).await;
        assert_eq!(call.ticket.display_number, "C001");
        assert_eq!(call.ticket.status, "serving");
        assert_eq!(call.queue.waiting_count, 2);

        // 3. Public board shows the serving ticket
        let response = app
            .clone()
            .oneshot(get_request(&format!("/services/{service_id}/board")))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::OK);
        let board: ServiceBoardResponse = response_json(response).await;
        assert_eq!(board.currently_serving.len(), 1);
        assert_eq!(board.currently_serving[0].display_number, "C001");

        // 4. Ticket 2 is now front of the queue
        let response = app
            .clone()
            .oneshot(get_request(&format!("/tickets/{}", t2.ticket.ticket_id)))
            .await
            .unwrap();
        let status: TicketStatusResponse = response_json(response).await;
        assert_eq!(status.ticket.people_ahead, 0);

        // 5. Complete, then the next call serves C002
        let complete_req = TicketActionApiRequest {
            actor: staff_actor(service_id),
            ticket_id: call.ticket.ticket_id,
            reason: None,
        };
        let response = app
            .clone()
            .oneshot(json_request("POST", "/staff/complete", &complete_req))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::OK);

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/staff/call_next",
                &CallNextApiRequest {
                    actor: staff_actor(service_id),
                    window_id,
                },
            ))
            .await
            .unwrap();
        let call2: CallTicketResponse = response_json(response).await;
        assert_eq!(call2.ticket.display_number, "C002");

        // 6. The dashboard reflects the day
        let response = app
            .clone()
            .oneshot(get_request(&format!(
                "/staff/dashboard?service_id={service_id}&actor_role=staff&actor_staff_id=3&actor_service_id={service_id}"
            )))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::OK);
        let dashboard: StaffDashboardResponse = response_json(response).await;
        assert_eq!(dashboard.stats.served, 1);
        assert_eq!(dashboard.stats.serving, 1);
        assert_eq!(dashboard.stats.waiting, 1);
    }

    #[tokio::test]
    async fn test_create_service_requires_admin() {
        let app: Router = build_router(create_test_app_state());

        let req = CreateServiceApiRequest {
            actor: staff_actor(1),
            name: String::from("Permit"),
            prefix: Some(String::from("P")),
            description: None,
            average_service_time: 10,
        };
        let response = app
            .oneshot(json_request("POST", "/services", &req))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_unknown_ticket_returns_not_found() {
        let app: Router = build_router(create_test_app_state());

        let response = app
            .oneshot(get_request(&format!("/tickets/{}", Uuid::new_v4())))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_call_next_empty_queue_returns_not_found() {
        let app: Router = build_router(create_test_app_state());
        let (service_id, window_id) = setup_cashier(&app).await;

        let response = app
            .oneshot(json_request(
                "POST",
                "/staff/call_next",
                &CallNextApiRequest {
                    actor: staff_actor(service_id),
                    window_id,
                },
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_cross_service_staff_is_forbidden() {
        let app: Router = build_router(create_test_app_state());
        let (service_id, window_id) = setup_cashier(&app).await;
        issue_one(&app, service_id).await;

        let response = app
            .oneshot(json_request(
                "POST",
                "/staff/call_next",
                &CallNextApiRequest {
                    actor: staff_actor(service_id + 1),
                    window_id,
                },
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_complete_waiting_ticket_is_unprocessable() {
        let app: Router = build_router(create_test_app_state());
        let (service_id, _window_id) = setup_cashier(&app).await;
        let issued = issue_one(&app, service_id).await;

        let response = app
            .oneshot(json_request(
                "POST",
                "/staff/complete",
                &TicketActionApiRequest {
                    actor: staff_actor(service_id),
                    ticket_id: issued.ticket.ticket_id,
                    reason: None,
                },
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_window_bind_conflict_returns_conflict() {
        let app: Router = build_router(create_test_app_state());
        let (service_id, window_id) = setup_cashier(&app).await;

        let first = SelectWindowApiRequest {
            actor: staff_actor(service_id),
            window_id,
        };
        let response = app
            .clone()
            .oneshot(json_request("POST", "/staff/select_window", &first))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::OK);

        let second = SelectWindowApiRequest {
            actor: ActorFields {
                actor_role: String::from("staff"),
                actor_staff_id: Some(4),
                actor_service_id: Some(service_id),
            },
            window_id,
        };
        let response = app
            .oneshot(json_request("POST", "/staff/select_window", &second))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_issue_for_unknown_service_returns_not_found() {
        let app: Router = build_router(create_test_app_state());

        let response = app
            .oneshot(json_request(
                "POST",
                "/tickets",
                &IssueTicketApiRequest { service_id: 42 },
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_paused_queue_refuses_issuance() {
        let app: Router = build_router(create_test_app_state());
        let (service_id, _window_id) = setup_cashier(&app).await;

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/staff/toggle_queue",
                &ToggleQueueApiRequest {
                    actor: staff_actor(service_id),
                    service_id,
                    active: false,
                },
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::OK);

        let response = app
            .oneshot(json_request(
                "POST",
                "/tickets",
                &IssueTicketApiRequest { service_id },
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_skip_recall_and_events_trail() {
        let app: Router = build_router(create_test_app_state());
        let (service_id, _window_id) = setup_cashier(&app).await;
        let issued = issue_one(&app, service_id).await;

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/staff/skip",
                &TicketActionApiRequest {
                    actor: staff_actor(service_id),
                    ticket_id: issued.ticket.ticket_id,
                    reason: Some(String::from("no show")),
                },
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::OK);
        let skipped: TicketStatusResponse = response_json(response).await;
        assert_eq!(skipped.ticket.status, "skipped");

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/staff/recall",
                &TicketActionApiRequest {
                    actor: staff_actor(service_id),
                    ticket_id: issued.ticket.ticket_id,
                    reason: None,
                },
            ))
            .await
            .unwrap();
        let recalled: TicketStatusResponse = response_json(response).await;
        assert_eq!(recalled.ticket.status, "waiting");

        let response = app
            .oneshot(get_request(&format!(
                "/tickets/{}/events?actor_role=staff&actor_staff_id=3&actor_service_id={service_id}",
                issued.ticket.ticket_id
            )))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::OK);
        let events: Vec<EventInfo> = response_json(response).await;
        let actions: Vec<&str> = events.iter().map(|e| e.action.as_str()).collect();
        assert_eq!(actions, vec!["IssueTicket", "SkipTicket", "RecallTicket"]);
    }

    #[tokio::test]
    async fn test_list_windows_unknown_service_returns_not_found() {
        let app: Router = build_router(create_test_app_state());

        let response = app
            .oneshot(get_request("/services/42/windows"))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::NOT_FOUND);
    }
}
