// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod binding_tests;

use crate::QueueEngine;
use qms_domain::StaffIdentity;
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

/// Creates an in-memory engine with one "Cashier" service (prefix "C",
/// 5-minute average) and returns both.
pub fn engine_with_service() -> (QueueEngine, i64) {
    let mut engine = QueueEngine::new_in_memory().unwrap();
    let service = engine
        .create_service(&admin(), "Cashier", Some("C"), None, 5, NOW)
        .unwrap();
    let service_id = service.service_id().unwrap();
    (engine, service_id)
}

/// Adds an active window to the service and returns its ID.
pub fn add_window(engine: &mut QueueEngine, service_id: i64, window_number: u32) -> i64 {
    let window = engine
        .create_window(&admin(), service_id, window_number, None, NOW)
        .unwrap();
    window.window_id.unwrap()
}
