//! Integration test: motor inversion on a reversed-mount elbow.

use std::sync::Arc;

use axis_common::prelude::*;
use axis_control::control::PositionController;
use axis_control::sim::{SimHandle, SimParams, simulated_axis};

fn reversed_elbow(inverted: bool) -> (PositionController, SimHandle) {
    let config = Arc::new(
        ControllerConfig::builder("ELBOW")
            .soft_limits(0.0, 110.0)
            .position_tolerance(1.0)
            .homing(0.1, 10.0)
            .gains(0.5, 0.0, 0.0)
            .inverted(inverted)
            .build()
            .expect("valid elbow config"),
    );
    let (driver, switches, handle) = simulated_axis(SimParams {
        min_stop: 0.0,
        max_stop: 120.0,
        start_position: 40.0,
        max_speed: 90.0,
        motor_reversed: true,
        ..SimParams::default()
    });
    (PositionController::bound(config, driver, switches), handle)
}

fn home(ctl: &mut PositionController) {
    ctl.home();
    let mut ticks = 0;
    while !ctl.is_homed() {
        ctl.update();
        ticks += 1;
        assert!(ticks < 2_000, "homing never completed");
    }
}

#[test]
fn test_inverted_axis_homes_at_lower_stop_and_reaches_target() {
    let (mut ctl, handle) = reversed_elbow(true);
    assert!(handle.inverted());

    ctl.home();
    for _ in 0..10 {
        ctl.update();
    }
    assert!(handle.position() < 40.0);

    home(&mut ctl);
    assert_eq!(handle.position(), 0.0);
    assert!(ctl.is_at_lower_limit());
    assert_eq!(ctl.actual_position(), 0.0);

    ctl.request_position(45.0);
    for _ in 0..1_000 {
        ctl.update();
        if ctl.is_at_requested_position() {
            break;
        }
    }
    assert!(ctl.is_at_requested_position());
    assert!((handle.position() - 45.0).abs() <= 1.0);
    assert!((ctl.actual_position() - 45.0).abs() <= 1.0);
}

#[test]
fn test_missing_inversion_drives_the_wrong_way() {
    let (mut ctl, handle) = reversed_elbow(false);
    assert!(!handle.inverted());

    ctl.home();
    for _ in 0..10 {
        ctl.update();
    }
    assert!(handle.position() > 40.0);

    home(&mut ctl);
    assert_eq!(handle.position(), 120.0);
    assert!(!ctl.is_at_lower_limit());
}
