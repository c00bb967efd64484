//! `ActuatorDriver` / `LimitSwitch` implementations over a shared plant.

use std::cell::RefCell;
use std::rc::Rc;

use axis_common::hal::driver::{ActuatorDriver, DriverError, LimitSwitch};

use super::plant::SimPlant;

/// Simulated motor controller. Each `set_output` advances the plant by one
/// step.
#[derive(Debug)]
pub struct SimulatedActuator {
    plant: Rc<RefCell<SimPlant>>,
}

impl SimulatedActuator {
    pub(crate) fn new(plant: Rc<RefCell<SimPlant>>) -> Self {
        Self { plant }
    }
}

impl ActuatorDriver for SimulatedActuator {
    fn set_output(&mut self, fraction: f64) {
        self.plant.borrow_mut().step(fraction);
    }

    fn position(&self) -> Result<f64, DriverError> {
        let plant = self.plant.borrow();
        if plant.overrides.position_fault {
            return Err(DriverError::Unavailable("simulated encoder fault".into()));
        }
        Ok(plant.reported_position())
    }

    fn velocity(&self) -> Result<f64, DriverError> {
        let plant = self.plant.borrow();
        if plant.overrides.position_fault {
            return Err(DriverError::Unavailable("simulated encoder fault".into()));
        }
        Ok(plant.reported_velocity())
    }

    fn current_amps(&self) -> Result<f64, DriverError> {
        let plant = self.plant.borrow();
        if plant.overrides.current_fault {
            return Err(DriverError::CommunicationError(
                "simulated current sense fault".into(),
            ));
        }
        Ok(plant.current())
    }

    fn set_brake_on_idle(&mut self, brake: bool) {
        self.plant.borrow_mut().set_brake_on_idle(brake);
    }

    fn set_inverted(&mut self, inverted: bool) {
        self.plant.borrow_mut().set_inverted(inverted);
    }
}

/// Which end of travel a simulated switch sits at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchSide {
    Forward,
    Reverse,
}

/// Simulated hard-stop switch.
#[derive(Debug)]
pub struct SimulatedLimitSwitch {
    plant: Rc<RefCell<SimPlant>>,
    side: SwitchSide,
}

impl SimulatedLimitSwitch {
    pub(crate) fn new(plant: Rc<RefCell<SimPlant>>, side: SwitchSide) -> Self {
        Self { plant, side }
    }
}

impl LimitSwitch for SimulatedLimitSwitch {
    fn is_triggered(&self) -> bool {
        let plant = self.plant.borrow();
        match self.side {
            SwitchSide::Forward => plant.forward_switch(),
            SwitchSide::Reverse => plant.reverse_switch(),
        }
    }
}
