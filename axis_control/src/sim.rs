//! Simulated actuator hardware.
//!
//! [`simulated_axis`] builds a driver, a switch pair and a [`SimHandle`]
//! that all share one [`SimPlant`]. The handle is the test harness side:
//! it inspects commanded output and pins readings or injects faults.

mod driver;
mod plant;

pub use driver::{SimulatedActuator, SimulatedLimitSwitch, SwitchSide};
pub use plant::{SimParams, SimPlant};

use std::cell::RefCell;
use std::rc::Rc;

use axis_common::hal::driver::{ActuatorDriver, LimitSwitches};

/// Build one simulated axis.
pub fn simulated_axis(
    params: SimParams,
) -> (Box<dyn ActuatorDriver>, LimitSwitches, SimHandle) {
    let plant = Rc::new(RefCell::new(SimPlant::new(params)));
    let driver = Box::new(SimulatedActuator::new(plant.clone()));
    let switches = LimitSwitches::new(
        Box::new(SimulatedLimitSwitch::new(plant.clone(), SwitchSide::Forward)),
        Box::new(SimulatedLimitSwitch::new(plant.clone(), SwitchSide::Reverse)),
    );
    (driver, switches, SimHandle { plant })
}

/// Shared view of a simulated plant.
#[derive(Debug, Clone)]
pub struct SimHandle {
    plant: Rc<RefCell<SimPlant>>,
}

impl SimHandle {
    pub fn position(&self) -> f64 {
        self.plant.borrow().position()
    }

    pub fn set_position(&self, position: f64) {
        self.plant.borrow_mut().set_position(position);
    }

    /// Output applied on the most recent step.
    pub fn last_output(&self) -> f64 {
        self.plant.borrow().output()
    }

    /// Number of `set_output` calls so far.
    pub fn steps(&self) -> u64 {
        self.plant.borrow().steps()
    }

    pub fn inverted(&self) -> bool {
        self.plant.borrow().inverted()
    }

    pub fn brake_on_idle(&self) -> bool {
        self.plant.borrow().brake_on_idle()
    }

    /// Pin the current reading.
    pub fn hold_current(&self, amps: f64) {
        self.plant.borrow_mut().overrides.current = Some(amps);
    }

    pub fn release_current(&self) {
        self.plant.borrow_mut().overrides.current = None;
    }

    /// Pin switch states; `None` returns a side to physics.
    pub fn hold_switches(&self, forward: Option<bool>, reverse: Option<bool>) {
        let mut plant = self.plant.borrow_mut();
        plant.overrides.forward_switch = forward;
        plant.overrides.reverse_switch = reverse;
    }

    pub fn inject_position_fault(&self, fault: bool) {
        self.plant.borrow_mut().overrides.position_fault = fault;
    }

    pub fn inject_current_fault(&self, fault: bool) {
        self.plant.borrow_mut().overrides.current_fault = fault;
    }
}
