mod arm_scenario;
mod config_loading;
mod cycle_runner;
mod inversion;
mod sensor_faults;
