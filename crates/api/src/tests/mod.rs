// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod authorization_tests;
mod error_tests;

use crate::handlers::{create_service, create_window};
use crate::request_response::{CreateServiceRequest, CreateWindowRequest};
use qms_domain::StaffIdentity;
use qms_persistence::QueueEngine;
use time::Date;
use time::macros::date;

pub const NOW: &str = "2026-08-06T09:00:00Z";

pub fn today() -> Date {
    date!(2026 - 08 - 06)
}

pub fn admin() -> StaffIdentity {
    StaffIdentity::Admin { staff_id: 1 }
}

pub fn staff_for(service_id: i64) -> StaffIdentity {
    StaffIdentity::Staff {
        staff_id: 3,
        service_id,
    }
}

/// Engine with one "Cashier" service (prefix "C") and one window.
pub fn engine_with_setup() -> (QueueEngine, i64, i64) {
    let mut engine = QueueEngine::new_in_memory().unwrap();

    let service = create_service(
        &mut engine,
        &admin(),
        &CreateServiceRequest {
            name: String::from("Cashier"),
            prefix: Some(String::from("C")),
            description: None,
            average_service_time: 5,
        },
        NOW,
    )
    .unwrap();

    let window = create_window(
        &mut engine,
        &admin(),
        &CreateWindowRequest {
            service_id: service.id,
            window_number: 1,
            name: Some(String::from("Window 1")),
        },
        NOW,
    )
    .unwrap();

    (engine, service.id, window.id)
}
