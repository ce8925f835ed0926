//! Default constants and the runtime configuration of the light clock.
//!
//! World units are arbitrary scene units; "seconds" are simulation seconds,
//! i.e. multiples of [`TICK_DT`]. Nothing here depends on wall-clock time
//! except [`RESUME_DELAY`].

use std::time::Duration;

use crate::error::SimulationError;

// ============================================
// Light clock
// ============================================

/// Reference speed of light in world units per simulation second.
pub const LIGHT_SPEED: f32 = 3.0;

/// Distance between the two mirrors of the clock.
pub const CLOCK_ARM_LENGTH: f32 = 2.0;

/// Nominal simulation step applied once per tick, independent of frame time.
pub const TICK_DT: f32 = 1.0 / 60.0;

/// Upper bound of the velocity ratio. Keeps sqrt(1 - β²) well away from 0.
pub const BETA_MAX: f32 = 0.99;

/// Photon phase after a reset (halfway between the mirrors).
pub const INITIAL_PHOTON_PHASE: f32 = 0.5;

// ============================================
// Clocks
// ============================================

/// Celestial time advanced per simulation second while running.
pub const CELESTIAL_RATE: f32 = 1.0;

// ============================================
// Trail
// ============================================

/// Maximum number of photon positions kept for the path display.
pub const TRAIL_CAPACITY: usize = 600;

/// In the linear scenario, points further than this behind the platform are dropped.
pub const TRAIL_LINEAR_WINDOW: f32 = 40.0;

// ============================================
// Scenario geometry
// ============================================

/// Radius of the platform orbit around the earth in the earth-orbit scenario.
pub const EARTH_ORBIT_RADIUS: f32 = 9.0;

/// Visual radius of the earth.
pub const EARTH_RADIUS: f32 = 4.0;

/// Radius of the planet's orbit around the star.
pub const PLANET_ORBIT_RADIUS: f32 = 32.0;

/// Angular rate of the planet around the star (radians per celestial second).
pub const PLANET_ANGULAR_RATE: f32 = 0.15;

/// Radius of the platform orbit around the planet in the nested scenarios.
pub const PLATFORM_ORBIT_RADIUS: f32 = 7.0;

/// Visual radius of the star.
pub const STAR_RADIUS: f32 = 6.0;

/// Visual radius of the planet in the nested scenarios.
pub const PLANET_RADIUS: f32 = 2.5;

/// Radius of the star's orbit around the galactic core.
pub const GALAXY_ORBIT_RADIUS: f32 = 120.0;

/// Angular rate of the star around the galactic core (radians per celestial second).
pub const GALAXY_ANGULAR_RATE: f32 = 0.03;

/// Inclination of the stellar system relative to the galactic plane, in radians.
pub const GALAXY_TILT: f32 = 1.05;

/// Visual radius of the galactic core.
pub const GALACTIC_CORE_RADIUS: f32 = 14.0;

// ============================================
// Controls
// ============================================

/// Delay between a reset and the automatic resume.
pub const RESUME_DELAY: Duration = Duration::from_millis(500);

/// Geometry of the orbital scenarios.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitConfig {
    pub earth_orbit_radius: f32,
    pub earth_radius: f32,
    pub planet_orbit_radius: f32,
    pub planet_angular_rate: f32,
    pub platform_orbit_radius: f32,
    pub star_radius: f32,
    pub planet_radius: f32,
    pub galaxy_orbit_radius: f32,
    pub galaxy_angular_rate: f32,
    pub galaxy_tilt: f32,
    pub galactic_core_radius: f32,
}

impl Default for OrbitConfig {
    fn default() -> Self {
        Self {
            earth_orbit_radius: EARTH_ORBIT_RADIUS,
            earth_radius: EARTH_RADIUS,
            planet_orbit_radius: PLANET_ORBIT_RADIUS,
            planet_angular_rate: PLANET_ANGULAR_RATE,
            platform_orbit_radius: PLATFORM_ORBIT_RADIUS,
            star_radius: STAR_RADIUS,
            planet_radius: PLANET_RADIUS,
            galaxy_orbit_radius: GALAXY_ORBIT_RADIUS,
            galaxy_angular_rate: GALAXY_ANGULAR_RATE,
            galaxy_tilt: GALAXY_TILT,
            galactic_core_radius: GALACTIC_CORE_RADIUS,
        }
    }
}

/// Everything the frame driver needs to run.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    pub light_speed: f32,
    pub arm_length: f32,
    pub tick_dt: f32,
    pub celestial_rate: f32,
    pub trail_capacity: usize,
    pub trail_linear_window: f32,
    pub resume_delay: Duration,
    pub orbits: OrbitConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            light_speed: LIGHT_SPEED,
            arm_length: CLOCK_ARM_LENGTH,
            tick_dt: TICK_DT,
            celestial_rate: CELESTIAL_RATE,
            trail_capacity: TRAIL_CAPACITY,
            trail_linear_window: TRAIL_LINEAR_WINDOW,
            resume_delay: RESUME_DELAY,
            orbits: OrbitConfig::default(),
        }
    }
}

impl SimulationConfig {
    /// Reject values that would make a tick produce non-finite output.
    pub fn validate(&self) -> Result<(), SimulationError> {
        let positive = |v: f32| v.is_finite() && v > 0.0;
        if !positive(self.light_speed) {
            return Err(SimulationError::InvalidConfig("light_speed must be positive"));
        }
        if !positive(self.arm_length) {
            return Err(SimulationError::InvalidConfig("arm_length must be positive"));
        }
        if !positive(self.tick_dt) {
            return Err(SimulationError::InvalidConfig("tick_dt must be positive"));
        }
        if !(self.celestial_rate.is_finite() && self.celestial_rate >= 0.0) {
            return Err(SimulationError::InvalidConfig("celestial_rate must be non-negative"));
        }
        if self.trail_capacity == 0 {
            return Err(SimulationError::InvalidConfig("trail_capacity must be at least 1"));
        }
        if !positive(self.trail_linear_window) {
            return Err(SimulationError::InvalidConfig("trail_linear_window must be positive"));
        }
        let o = &self.orbits;
        if ![
            o.earth_orbit_radius,
            o.planet_orbit_radius,
            o.platform_orbit_radius,
            o.galaxy_orbit_radius,
        ]
        .into_iter()
        .all(positive)
        {
            return Err(SimulationError::InvalidConfig("orbit radii must be positive"));
        }
        Ok(())
    }
}
