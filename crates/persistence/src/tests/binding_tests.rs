// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::{NOW, add_window, admin, engine_with_service, staff_for};
use crate::EngineError;
use qms::CoreError;
use qms_domain::{StaffIdentity, WindowStatus};

#[test]
fn test_bind_and_release() {
    let (mut engine, service_id) = engine_with_service();
    let window_id = add_window(&mut engine, service_id, 1);
    let staff = staff_for(service_id);

    let bound = engine.bind_window(&staff, window_id, NOW).unwrap();
    assert_eq!(bound.current_staff, Some(3));

    let released = engine.release_window(&staff, NOW).unwrap();
    assert_eq!(released.and_then(|w| w.window_id), Some(window_id));

    let window = engine.get_window(window_id).unwrap();
    assert_eq!(window.current_staff, None);
}

#[test]
fn test_release_without_binding_is_noop() {
    let (mut engine, service_id) = engine_with_service();
    let staff = staff_for(service_id);

    assert_eq!(engine.release_window(&staff, NOW).unwrap(), None);
}

#[test]
fn test_bind_is_idempotent() {
    let (mut engine, service_id) = engine_with_service();
    let window_id = add_window(&mut engine, service_id, 1);
    let staff = staff_for(service_id);

    engine.bind_window(&staff, window_id, NOW).unwrap();
    let again = engine.bind_window(&staff, window_id, NOW).unwrap();
    assert_eq!(again.current_staff, Some(3));
}

#[test]
fn test_bind_rejects_window_manned_by_other_staff() {
    let (mut engine, service_id) = engine_with_service();
    let window_id = add_window(&mut engine, service_id, 1);

    let first = StaffIdentity::Staff {
        staff_id: 3,
        service_id,
    };
    let second = StaffIdentity::Staff {
        staff_id: 4,
        service_id,
    };

    engine.bind_window(&first, window_id, NOW).unwrap();
    let result = engine.bind_window(&second, window_id, NOW);
    assert!(matches!(
        result,
        Err(EngineError::Core(CoreError::WindowUnavailable { .. }))
    ));

    // The original binding is untouched
    let window = engine.get_window(window_id).unwrap();
    assert_eq!(window.current_staff, Some(3));
}

#[test]
fn test_switching_windows_releases_the_previous_one() {
    let (mut engine, service_id) = engine_with_service();
    let first = add_window(&mut engine, service_id, 1);
    let second = add_window(&mut engine, service_id, 2);
    let staff = staff_for(service_id);

    engine.bind_window(&staff, first, NOW).unwrap();
    engine.bind_window(&staff, second, NOW).unwrap();

    // A staff member mans exactly one window
    assert_eq!(engine.get_window(first).unwrap().current_staff, None);
    assert_eq!(engine.get_window(second).unwrap().current_staff, Some(3));
    assert_eq!(
        engine.window_for_staff(3).unwrap().and_then(|w| w.window_id),
        Some(second)
    );
}

#[test]
fn test_bind_rejects_inactive_window() {
    let (mut engine, service_id) = engine_with_service();
    let window_id = add_window(&mut engine, service_id, 1);
    engine
        .update_window_status(&admin(), window_id, WindowStatus::Inactive, NOW)
        .unwrap();

    let result = engine.bind_window(&staff_for(service_id), window_id, NOW);
    assert!(matches!(
        result,
        Err(EngineError::Core(CoreError::WindowUnavailable { .. }))
    ));
}

#[test]
fn test_bind_rejects_cross_service_staff() {
    let (mut engine, service_id) = engine_with_service();
    let window_id = add_window(&mut engine, service_id, 1);

    let other_service_staff = StaffIdentity::Staff {
        staff_id: 9,
        service_id: service_id + 1,
    };
    let result = engine.bind_window(&other_service_staff, window_id, NOW);
    assert!(matches!(
        result,
        Err(EngineError::Core(CoreError::WindowUnavailable { .. }))
    ));
}

#[test]
fn test_bind_requires_staff_identity() {
    let (mut engine, service_id) = engine_with_service();
    let window_id = add_window(&mut engine, service_id, 1);

    let result = engine.bind_window(&StaffIdentity::Public, window_id, NOW);
    assert!(matches!(
        result,
        Err(EngineError::Core(CoreError::WindowUnavailable { .. }))
    ));
}
