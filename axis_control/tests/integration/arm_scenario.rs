//! Integration test: arm homing and positioning scenario.
//!
//! min 0, max 0.5, tolerance 0.01, homing speed 0.2, homing current 20 A.
//! Current is pinned at 5 A for ten homing ticks, then 25 A on the
//! eleventh.

use std::sync::Arc;

use axis_common::prelude::*;
use axis_control::control::PositionController;
use axis_control::sim::{SimHandle, SimParams, simulated_axis};
use axis_control::subsystem::{Axis, AxisOptions, Mechanism};
use axis_control::telemetry::MemorySink;

fn arm_config() -> Arc<ControllerConfig> {
    Arc::new(
        ControllerConfig::builder("ARM")
            .soft_limits(0.0, 0.5)
            .position_tolerance(0.01)
            .homing(0.2, 20.0)
            .gains(4.0, 0.0, 0.0)
            .build()
            .expect("valid arm config"),
    )
}

fn arm() -> (PositionController, SimHandle) {
    let (driver, switches, handle) = simulated_axis(SimParams {
        min_stop: -0.2,
        max_stop: 0.8,
        start_position: 0.3,
        ..SimParams::default()
    });
    (PositionController::bound(arm_config(), driver, switches), handle)
}

#[test]
fn test_scripted_current_spike_homes_on_eleventh_tick() {
    let (mut ctl, handle) = arm();
    ctl.home();

    handle.hold_current(5.0);
    for tick in 1..=10 {
        ctl.update();
        assert_eq!(handle.last_output(), -0.2, "tick {tick}");
        assert!(!ctl.is_homed(), "tick {tick}");
    }

    handle.hold_current(25.0);
    ctl.update();
    assert_eq!(handle.last_output(), 0.0);
    assert!(ctl.is_homed());
    assert_eq!(ctl.mode(), ControlMode::Stopped);
    assert_eq!(ctl.actual_position(), 0.0);

    handle.release_current();
    ctl.request_position(0.6);
    assert_eq!(ctl.requested_position(), Some(0.5));
}

#[test]
fn test_arm_reaches_clamped_target() {
    let (mut ctl, handle) = arm();
    ctl.home();
    handle.hold_current(5.0);
    for _ in 0..10 {
        ctl.update();
    }
    handle.hold_current(25.0);
    ctl.update();
    handle.release_current();
    assert!(ctl.is_homed());

    ctl.request_position(0.6);
    for _ in 0..1_000 {
        ctl.update();
        if ctl.is_at_requested_position() {
            break;
        }
    }
    assert!(ctl.is_at_requested_position());
    assert!((ctl.actual_position() - 0.5).abs() <= 0.01);
    assert!(ctl.actual_position() <= 0.5 + 0.01);
}

#[test]
fn test_request_before_homing_is_held_then_executed() {
    let (mut ctl, handle) = arm();
    ctl.request_position(0.25);

    let start = handle.position();
    for _ in 0..50 {
        ctl.update();
        assert_eq!(handle.last_output(), 0.0);
    }
    assert_eq!(handle.position(), start);

    ctl.home();
    let mut ticks = 0;
    while !ctl.is_homed() {
        ctl.update();
        ticks += 1;
        assert!(ticks < 1_000, "homing never completed");
    }

    for _ in 0..1_000 {
        ctl.update();
        if ctl.is_at_requested_position() {
            break;
        }
    }
    assert!(ctl.is_at_requested_position());
    assert!((ctl.actual_position() - 0.25).abs() <= 0.01);
}

#[test]
fn test_rehoming_from_forward_stop_finds_reverse_stop() {
    let (driver, switches, handle) = simulated_axis(SimParams {
        min_stop: 0.0,
        max_stop: 0.6,
        start_position: 0.55,
        max_speed: 1.0,
        ..SimParams::default()
    });
    let mut ctl = PositionController::bound(arm_config(), driver, switches);

    ctl.set_motor_speed(0.5);
    for _ in 0..20 {
        ctl.update();
    }
    assert_eq!(handle.position(), 0.6);

    ctl.home();
    ctl.update();
    assert!(!ctl.is_homed());
    assert_eq!(handle.last_output(), -0.2);

    let mut ticks = 1;
    while !ctl.is_homed() {
        ctl.update();
        ticks += 1;
        assert!(ticks < 1_000, "homing never completed");
    }
    assert!(handle.position() < 0.01);
    assert_eq!(ctl.actual_position(), 0.0);

    ctl.request_position(0.4);
    for _ in 0..1_000 {
        ctl.update();
        if ctl.is_at_requested_position() {
            break;
        }
    }
    assert!(ctl.is_at_requested_position());
    assert!((handle.position() - 0.4).abs() <= 0.01);
}

#[test]
fn test_forget_home_requires_rehoming() {
    let (mut ctl, handle) = arm();
    ctl.home();
    while !ctl.is_homed() {
        ctl.update();
    }
    ctl.forget_home();
    ctl.request_position(0.4);
    for _ in 0..100 {
        ctl.update();
        assert_eq!(handle.last_output(), 0.0);
    }
    assert!(!ctl.is_homed());
}

#[test]
fn test_axis_publishes_one_frame_per_tick() {
    let (ctl, _handle) = arm();
    let options = AxisOptions {
        mechanism: Mechanism::Arm {
            retract_threshold: 0.02,
        },
        nudge_step: 0.05,
        ..AxisOptions::default()
    };
    let mut axis = Axis::enabled(ctl, options);
    let mut sink = MemorySink::default();

    axis.home();
    for _ in 0..400 {
        axis.periodic(&mut sink);
    }
    assert_eq!(sink.frames().len(), 400);
    assert!(sink.frames()[0].mode == ControlMode::Homing);

    let last = sink.last().expect("frames published");
    assert!(last.homed);
    assert!(last.at_lower_limit);
    assert!(axis.as_arm().expect("arm view").is_arm_retracted());

    axis.as_arm_mut().expect("arm view").nudge_arm_forward();
    for _ in 0..200 {
        axis.periodic(&mut sink);
    }
    assert!(axis.is_at_requested_position());
    assert!(!axis.as_arm().expect("arm view").is_arm_retracted());
}
