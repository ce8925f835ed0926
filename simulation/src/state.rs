use crate::kinematics::PhotonState;
use crate::trail::TrailBuffer;

/// The two simulation clocks plus the straight-line odometer.
///
/// Accumulated in `f64`: an `f32` stops advancing by one tick after a few
/// days of running. Poses are built in `f32` from these.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Clocks {
    /// Advances at a fixed rate while running, whatever β is. Drives planets and galaxies.
    pub celestial_time: f64,
    /// Path length the platform has covered; advances at `β·c`.
    pub platform_time: f64,
    /// Accumulated displacement in the linear scenario.
    pub linear_offset: f64,
}

/// Mutable state of the simulation, written only by the frame driver.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationState {
    pub clocks: Clocks,
    pub photon: PhotonState,
    /// Mirror hits since the last reset.
    pub bounces: u64,
    pub trail: TrailBuffer,
}

impl SimulationState {
    pub fn new(trail_capacity: usize) -> Self {
        Self {
            clocks: Clocks::default(),
            photon: PhotonState::default(),
            bounces: 0,
            trail: TrailBuffer::new(trail_capacity),
        }
    }

    /// Zero the clocks, re-center the photon and empty the trail in one step.
    /// Whether the trail is enabled is a user setting and survives.
    pub fn reset(&mut self) {
        self.clocks = Clocks::default();
        self.photon = PhotonState::default();
        self.bounces = 0;
        self.trail.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinematics::Direction;
    use cgmath::Point3;

    #[test]
    fn test_initial_state() {
        let state = SimulationState::new(10);
        assert_eq!(state.clocks, Clocks::default());
        assert_eq!(state.photon.phase, 0.5);
        assert_eq!(state.photon.direction, Direction::Up);
        assert!(state.trail.is_empty());
    }

    #[test]
    fn test_reset_keeps_trail_setting() {
        let mut state = SimulationState::new(10);
        state.clocks.celestial_time = 3.0;
        state.trail.push(Point3::new(1.0, 2.0, 3.0));
        state.trail.set_enabled(false);
        state.reset();
        assert!(!state.trail.is_enabled());
        assert_eq!(state.clocks.celestial_time, 0.0);
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut state = SimulationState::new(10);
        state.clocks.platform_time = 7.0;
        state.photon.phase = 0.9;
        state.bounces = 4;
        state.trail.push(Point3::new(1.0, 0.0, 0.0));

        state.reset();
        let once = state.clone();
        state.reset();
        assert_eq!(state, once);
        assert_eq!(once, SimulationState::new(10));
    }
}
