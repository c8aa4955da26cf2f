// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::*;

#[test]
fn test_actor_creation_requires_all_fields() {
    let actor: Actor = Actor::new(String::from("staff:3"), String::from("staff"));

    assert_eq!(actor.id, "staff:3");
    assert_eq!(actor.actor_type, "staff");
}

#[test]
fn test_action_creation_with_details() {
    let action: Action = Action::new(
        String::from("RemoveTicket"),
        Some(String::from("customer left")),
    );

    assert_eq!(action.name, "RemoveTicket");
    assert_eq!(action.details, Some(String::from("customer left")));
}

#[test]
fn test_ticket_event_carries_status_transition() {
    let event: QueueEvent = QueueEvent::for_ticket(
        1,
        42,
        Actor::new(String::from("staff:3"), String::from("staff")),
        Action::new(String::from("CallNext"), None),
        String::from("waiting"),
        String::from("serving"),
        String::from("2026-08-06T09:00:00Z"),
    );

    assert_eq!(event.service_id, 1);
    assert_eq!(event.ticket_id, Some(42));
    assert_eq!(event.prior_status.as_deref(), Some("waiting"));
    assert_eq!(event.new_status.as_deref(), Some("serving"));
    assert!(event.event_id.is_none());
}

#[test]
fn test_service_event_has_no_ticket_scope() {
    let event: QueueEvent = QueueEvent::for_service(
        2,
        Actor::new(String::from("staff:5"), String::from("staff")),
        Action::new(String::from("BindWindow"), Some(String::from("window 1"))),
        String::from("2026-08-06T08:00:00Z"),
    );

    assert_eq!(event.ticket_id, None);
    assert_eq!(event.prior_status, None);
    assert_eq!(event.new_status, None);
}

#[test]
fn test_event_serialization_round_trip() {
    let event: QueueEvent = QueueEvent::for_ticket(
        1,
        7,
        Actor::new(String::from("admin:1"), String::from("admin")),
        Action::new(String::from("RecallTicket"), None),
        String::from("skipped"),
        String::from("waiting"),
        String::from("2026-08-06T10:30:00Z"),
    );

    let json = match serde_json::to_string(&event) {
        Ok(json) => json,
        Err(e) => panic!("Failed to serialize event: {e}"),
    };
    let parsed: QueueEvent = match serde_json::from_str(&json) {
        Ok(parsed) => parsed,
        Err(e) => panic!("Failed to deserialize event: {e}"),
    };

    assert_eq!(event, parsed);
}
