//! Keyboard bindings. Each key maps to one `ControlInput`; values are already
//! clamped to the driver's accepted range.

use simulation::{ControlInput, FrameDriver, Scenario, VelocityRatio};
use winit::keyboard::KeyCode;

/// β change per Up/Down press.
pub const BETA_STEP: f32 = 0.05;

pub fn key_to_input(key: KeyCode, driver: &FrameDriver) -> Option<ControlInput> {
    let beta = driver.velocity_ratio().get();
    match key {
        KeyCode::Space => Some(ControlInput::TogglePlay),
        KeyCode::ArrowUp => Some(ControlInput::SetVelocityRatio(step_beta(beta, BETA_STEP))),
        KeyCode::ArrowDown => Some(ControlInput::SetVelocityRatio(step_beta(beta, -BETA_STEP))),
        KeyCode::Digit1 | KeyCode::Digit2 | KeyCode::Digit3 | KeyCode::Digit4 => {
            scenario_key(key).map(ControlInput::SelectScenario)
        }
        KeyCode::KeyT => Some(ControlInput::SetTrailEnabled(
            !driver.state().trail.is_enabled(),
        )),
        KeyCode::KeyR => Some(ControlInput::Reset),
        _ => None,
    }
}

/// Digits pick scenarios in `Scenario::ALL` order.
fn scenario_key(key: KeyCode) -> Option<Scenario> {
    let index = match key {
        KeyCode::Digit1 => 0,
        KeyCode::Digit2 => 1,
        KeyCode::Digit3 => 2,
        KeyCode::Digit4 => 3,
        _ => return None,
    };
    Scenario::from_index(index).ok()
}

fn step_beta(beta: f32, delta: f32) -> f32 {
    // Round to the step grid so repeated presses don't drift.
    let stepped = ((beta + delta) / BETA_STEP).round() * BETA_STEP;
    VelocityRatio::saturating(stepped).get()
}

#[cfg(test)]
mod tests {
    use super::*;
    use simulation::config::BETA_MAX;

    #[test]
    fn test_digits_follow_scenario_order() {
        let driver = FrameDriver::default();
        let digits = [KeyCode::Digit1, KeyCode::Digit2, KeyCode::Digit3, KeyCode::Digit4];
        for (key, scenario) in digits.into_iter().zip(Scenario::ALL) {
            assert_eq!(
                key_to_input(key, &driver),
                Some(ControlInput::SelectScenario(scenario))
            );
        }
        assert_eq!(key_to_input(KeyCode::Digit5, &driver), None);
    }

    #[test]
    fn test_scenario_keys() {
        let driver = FrameDriver::default();
        assert_eq!(
            key_to_input(KeyCode::Digit3, &driver),
            Some(ControlInput::SelectScenario(Scenario::SolarSystem))
        );
        assert_eq!(key_to_input(KeyCode::KeyQ, &driver), None);
    }

    #[test]
    fn test_beta_steps_stay_in_range() {
        let mut driver = FrameDriver::default();
        assert_eq!(
            key_to_input(KeyCode::ArrowDown, &driver),
            Some(ControlInput::SetVelocityRatio(0.0))
        );
        for _ in 0..40 {
            let input = key_to_input(KeyCode::ArrowUp, &driver).unwrap();
            driver.apply(input).unwrap();
        }
        assert_eq!(driver.velocity_ratio().get(), BETA_MAX);
    }

    #[test]
    fn test_single_step_up() {
        let driver = FrameDriver::default();
        match key_to_input(KeyCode::ArrowUp, &driver) {
            Some(ControlInput::SetVelocityRatio(beta)) => assert!((beta - BETA_STEP).abs() < 1e-6),
            other => panic!("unexpected input {other:?}"),
        }
    }

    #[test]
    fn test_trail_key_toggles() {
        let mut driver = FrameDriver::default();
        let off = key_to_input(KeyCode::KeyT, &driver).unwrap();
        assert_eq!(off, ControlInput::SetTrailEnabled(false));
        driver.apply(off).unwrap();
        assert_eq!(
            key_to_input(KeyCode::KeyT, &driver),
            Some(ControlInput::SetTrailEnabled(true))
        );
    }
}
