// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::{NOW, engine_with_setup, staff_for, today};
use crate::auth::{AuthError, authenticate_stub};
use crate::error::ApiError;
use crate::handlers::{
    call_next, create_service, issue_ticket, remove_ticket, staff_dashboard, toggle_queue,
};
use crate::request_response::{CreateServiceRequest, IssueTicketRequest, TicketActionRequest};
use qms_domain::StaffIdentity;

#[test]
fn test_authenticate_stub_roles() {
    assert_eq!(
        authenticate_stub("public", None, None),
        Ok(StaffIdentity::Public)
    );
    assert_eq!(
        authenticate_stub("staff", Some(3), Some(1)),
        Ok(StaffIdentity::Staff {
            staff_id: 3,
            service_id: 1
        })
    );
    assert_eq!(
        authenticate_stub("Admin", Some(1), None),
        Ok(StaffIdentity::Admin { staff_id: 1 })
    );
}

#[test]
fn test_authenticate_stub_rejects_incomplete_staff() {
    assert!(matches!(
        authenticate_stub("staff", Some(3), None),
        Err(AuthError::AuthenticationFailed { .. })
    ));
    assert!(matches!(
        authenticate_stub("staff", None, Some(1)),
        Err(AuthError::AuthenticationFailed { .. })
    ));
    assert!(matches!(
        authenticate_stub("supervisor", Some(3), Some(1)),
        Err(AuthError::AuthenticationFailed { .. })
    ));
}

#[test]
fn test_create_service_requires_admin() {
    let (mut engine, service_id, _window_id) = engine_with_setup();

    let request = CreateServiceRequest {
        name: String::from("Permit"),
        prefix: Some(String::from("P")),
        description: None,
        average_service_time: 10,
    };

    let result = create_service(&mut engine, &staff_for(service_id), &request, NOW);
    assert!(matches!(result, Err(ApiError::Unauthorized { .. })));

    let result = create_service(&mut engine, &StaffIdentity::Public, &request, NOW);
    assert!(matches!(result, Err(ApiError::Unauthorized { .. })));
}

#[test]
fn test_call_next_rejects_cross_service_staff() {
    let (mut engine, service_id, window_id) = engine_with_setup();

    issue_ticket(
        &mut engine,
        &StaffIdentity::Public,
        &IssueTicketRequest { service_id },
        today(),
        NOW,
    )
    .unwrap();

    let wrong_staff = StaffIdentity::Staff {
        staff_id: 9,
        service_id: service_id + 1,
    };
    let result = call_next(&mut engine, &wrong_staff, window_id, today(), NOW);
    assert!(matches!(result, Err(ApiError::Unauthorized { .. })));
}

#[test]
fn test_ticket_mutation_rejects_cross_service_staff() {
    let (mut engine, service_id, _window_id) = engine_with_setup();

    let issued = issue_ticket(
        &mut engine,
        &StaffIdentity::Public,
        &IssueTicketRequest { service_id },
        today(),
        NOW,
    )
    .unwrap();

    let wrong_staff = StaffIdentity::Staff {
        staff_id: 9,
        service_id: service_id + 1,
    };
    let result = remove_ticket(
        &mut engine,
        &wrong_staff,
        &TicketActionRequest {
            ticket_id: issued.ticket.ticket_id,
            reason: None,
        },
        NOW,
    );
    assert!(matches!(result, Err(ApiError::Unauthorized { .. })));
}

#[test]
fn test_public_cannot_operate_queue() {
    let (mut engine, _service_id, window_id) = engine_with_setup();

    let result = call_next(&mut engine, &StaffIdentity::Public, window_id, today(), NOW);
    assert!(matches!(result, Err(ApiError::Unauthorized { .. })));
}

#[test]
fn test_dashboard_restricted_to_service_staff() {
    let (engine, service_id, _window_id) = engine_with_setup();

    assert!(staff_dashboard(&engine, &staff_for(service_id), service_id, today()).is_ok());

    let wrong_staff = StaffIdentity::Staff {
        staff_id: 9,
        service_id: service_id + 1,
    };
    assert!(matches!(
        staff_dashboard(&engine, &wrong_staff, service_id, today()),
        Err(ApiError::Unauthorized { .. })
    ));
}

#[test]
fn test_admin_may_operate_any_service() {
    let (mut engine, service_id, _window_id) = engine_with_setup();

    let admin = StaffIdentity::Admin { staff_id: 1 };
    assert!(toggle_queue(&mut engine, &admin, service_id, false, NOW).is_ok());
    assert!(toggle_queue(&mut engine, &admin, service_id, true, NOW).is_ok());
}
