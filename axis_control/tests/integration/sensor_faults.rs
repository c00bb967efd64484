//! Integration test: degraded operation on sensor loss.

use std::sync::Arc;

use axis_common::prelude::*;
use axis_control::control::PositionController;
use axis_control::sim::{SimHandle, SimParams, simulated_axis};

fn controller() -> (PositionController, SimHandle) {
    let config = Arc::new(
        ControllerConfig::builder("ELBOW")
            .soft_limits(0.0, 110.0)
            .position_tolerance(1.0)
            .homing(0.1, 10.0)
            .build()
            .expect("valid elbow config"),
    );
    let (driver, switches, handle) = simulated_axis(SimParams {
        min_stop: 0.0,
        max_stop: 120.0,
        start_position: 10.0,
        max_speed: 90.0,
        ..SimParams::default()
    });
    (PositionController::bound(config, driver, switches), handle)
}

fn homed() -> (PositionController, SimHandle) {
    let (mut ctl, handle) = controller();
    ctl.home();
    while !ctl.is_homed() {
        ctl.update();
    }
    (ctl, handle)
}

#[test]
fn test_encoder_loss_zeroes_output_and_keeps_mode() {
    let (mut ctl, handle) = homed();
    ctl.request_position(60.0);
    ctl.update();
    assert!(handle.last_output() > 0.0);
    let before = ctl.actual_position();

    handle.inject_position_fault(true);
    for _ in 0..5 {
        ctl.update();
        assert_eq!(handle.last_output(), 0.0);
    }
    assert_eq!(ctl.mode(), ControlMode::Positioning);
    assert_eq!(ctl.actual_position(), before);
    assert!(ctl.has_sensor_fault());

    handle.inject_position_fault(false);
    ctl.update();
    assert!(!ctl.has_sensor_fault());
    assert!(handle.last_output() > 0.0);
}

#[test]
fn test_current_loss_while_homing_holds_until_switch() {
    let (mut ctl, handle) = controller();
    ctl.home();
    ctl.update();
    assert_eq!(handle.last_output(), -0.1);

    handle.inject_current_fault(true);
    for _ in 0..3 {
        ctl.update();
        assert_eq!(handle.last_output(), 0.0);
        assert_eq!(ctl.mode(), ControlMode::Homing);
    }

    // Switch alone still completes homing.
    handle.hold_switches(None, Some(true));
    ctl.update();
    assert!(ctl.is_homed());
}

#[test]
fn test_stop_cancels_homing_immediately() {
    let (mut ctl, handle) = controller();
    ctl.home();
    ctl.update();
    ctl.stop();
    ctl.update();
    assert_eq!(handle.last_output(), 0.0);
    assert!(!ctl.is_homed());
    assert_eq!(ctl.mode(), ControlMode::Stopped);
}
