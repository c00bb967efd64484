//! Integration test: full robot on the cycle runner.

use std::sync::atomic::AtomicBool;

use axis_common::config::ConfigLoader;
use axis_common::prelude::ControlMode;
use axis_control::config::RobotConfig;
use axis_control::cycle::CycleRunner;
use axis_control::telemetry::{JsonLinesSink, MemorySink};

const ROBOT_TOML: &str = r#"
cycle_period_ms = 1

[shared]
service_name = "cycle-test"

[[axes]]
name = "ARM"
kind = "arm"
soft_limits = [0.0, 0.5]
homing_speed = 0.5
homing_current_amps = 20.0
position_tolerance = 0.01
kp = 4.0
safe_threshold = 0.02
target = 0.3

[axes.sim]
max_stop = 0.6
start_position = 0.1
max_speed = 20.0

[[axes]]
name = "ELBOW"
kind = "elbow"
soft_limits = [0.0, 110.0]
homing_speed = 0.5
homing_current_amps = 10.0
position_tolerance = 1.0
inverted = true
target = 45.0

[axes.sim]
max_stop = 120.0
start_position = 20.0
max_speed = 500.0
motor_reversed = true

[[axes]]
name = "WRIST"
enabled = false
"#;

fn robot() -> RobotConfig {
    let config = RobotConfig::from_toml(ROBOT_TOML).expect("parse");
    config.validate().expect("valid");
    config
}

#[test]
fn test_runner_homes_and_positions_every_enabled_axis() {
    let config = robot();
    let robot = config.build_simulated().expect("build");
    let mut pending = robot.targets.clone();

    let mut runner = CycleRunner::new(
        robot.axes,
        Box::new(MemorySink::default()),
        config.control_period(),
    )
    .expect("runner");
    for axis in runner.axes_mut() {
        axis.home();
    }

    let running = AtomicBool::new(true);
    runner.run(Some(400), &running, |axes| {
        pending.retain(|(name, target)| {
            match axes.iter_mut().find(|a| a.name() == name.as_str()) {
                Some(axis) if axis.is_homed() => {
                    axis.request_position(*target);
                    false
                }
                _ => true,
            }
        });
    });

    assert!(pending.is_empty());
    assert_eq!(runner.stats().cycle_count, 400);

    let arm = runner.axis("ARM").expect("arm");
    assert!(arm.is_homed());
    assert!(arm.is_at_requested_position());
    assert!((arm.actual_position() - 0.3).abs() <= 0.01);

    let elbow = runner.axis("ELBOW").expect("elbow");
    assert!(elbow.is_at_requested_position());
    assert!(elbow.as_elbow().expect("elbow view").is_safe_to_extend_arm());

    let wrist = runner.axis("WRIST").expect("wrist");
    assert!(!wrist.is_enabled());
    assert_eq!(wrist.mode(), None);
}

#[test]
fn test_tick_updates_each_axis_once() {
    let config = robot();
    let robot = config.build_simulated().expect("build");
    let arm_handle = robot.handle("ARM").expect("arm handle").clone();
    let elbow_handle = robot.handle("ELBOW").expect("elbow handle").clone();
    let (arm_steps, elbow_steps) = (arm_handle.steps(), elbow_handle.steps());

    let mut runner =
        CycleRunner::new(robot.axes, Box::new(MemorySink::default()), config.control_period())
            .expect("runner");
    runner.tick();
    runner.tick();

    assert_eq!(arm_handle.steps(), arm_steps + 2);
    assert_eq!(elbow_handle.steps(), elbow_steps + 2);
}

#[test]
fn test_json_lines_telemetry_file() {
    let config = robot();
    let robot = config.build_simulated().expect("build");
    let file = tempfile::NamedTempFile::new().expect("temp file");
    let writer = file.reopen().expect("reopen");

    let mut runner = CycleRunner::new(
        robot.axes,
        Box::new(JsonLinesSink::new(writer)),
        config.control_period(),
    )
    .expect("runner");
    runner.axis_mut("ARM").expect("arm").home();
    runner.run_for(3);

    let text = std::fs::read_to_string(file.path()).expect("read telemetry");
    let frames: Vec<serde_json::Value> = text
        .lines()
        .map(|l| serde_json::from_str(l).expect("json line"))
        .collect();

    // Two enabled axes, three ticks; disabled axes publish nothing.
    assert_eq!(frames.len(), 6);
    assert_eq!(frames[0]["axis_name"], "ARM");
    assert_eq!(frames[0]["mode"], ControlMode::Homing.as_str());
    assert_eq!(frames[1]["axis_name"], "ELBOW");
    assert_eq!(frames[1]["mode"], ControlMode::Stopped.as_str());
}
