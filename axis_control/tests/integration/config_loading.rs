//! Integration test: robot configuration files.

use std::io::Write;
use std::path::Path;

use axis_common::config::{ConfigError, LogLevel};
use axis_control::config::{AxisKind, RobotConfig};
use axis_control::subsystem::LimitPolicy;
use tempfile::NamedTempFile;

fn write_temp(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(content.as_bytes()).expect("write");
    file
}

#[test]
fn test_shipped_robot_config_is_valid() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("config/robot.toml");
    let config = RobotConfig::load_validated(&path).expect("shipped config");

    assert_eq!(config.shared.service_name, "axis_control");
    assert_eq!(config.shared.log_level, LogLevel::Info);
    assert_eq!(config.axes.len(), 2);
    assert_eq!(config.axes[0].kind, AxisKind::Arm);
    assert_eq!(config.axes[1].kind, AxisKind::Elbow);
    assert_eq!(config.axes[1].limit_policy, LimitPolicy::Stop);
    assert_eq!(config.axes[1].settings.inverted, Some(true));
    assert!(config.axes[1].sim.motor_reversed);
    assert!(!config.axes[0].sim.motor_reversed);

    let robot = config.build_simulated().expect("build");
    assert_eq!(robot.axes.len(), 2);
    assert!(robot.handle("ELBOW").expect("elbow").inverted());
    assert!(robot.handle("ARM").expect("arm").brake_on_idle());
}

#[test]
fn test_missing_file() {
    let err = RobotConfig::load_validated(Path::new("/nonexistent/robot.toml")).unwrap_err();
    assert_eq!(err, ConfigError::FileNotFound);
}

#[test]
fn test_malformed_toml() {
    let file = write_temp("cycle_period_ms = [\n");
    let err = RobotConfig::load_validated(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::ParseError(_)));
}

#[test]
fn test_invalid_homing_speed_rejected_at_load() {
    let file = write_temp(
        r#"
[shared]
service_name = "robot"

[[axes]]
name = "ARM"
soft_limits = [0.0, 0.5]
homing_speed = 1.5
"#,
    );
    let err = RobotConfig::load_validated(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidHomingSpeed { .. }));
}

#[test]
fn test_negative_tolerance_rejected_at_load() {
    let file = write_temp(
        r#"
[shared]
service_name = "robot"

[[axes]]
name = "ELBOW"
soft_limits = [0.0, 110.0]
position_tolerance = -1.0
"#,
    );
    let err = RobotConfig::load_validated(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::NegativeTolerance { .. }));
}

#[test]
fn test_empty_service_name_rejected() {
    let file = write_temp("[shared]\nservice_name = \"\"\n");
    let err = RobotConfig::load_validated(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::ValidationError(_)));
}
