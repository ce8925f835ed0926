//! Special-relativistic kinematics of the light clock.
//!
//! A photon bounces between two mirrors `L` apart while the platform carrying
//! them moves at `β·c`. The total photon speed stays `c`, so the component
//! left for the mirror-to-mirror axis is `sqrt(1 - β²)·c`: the moving clock
//! ticks slower. The same factor is the Lorentz contraction applied to the
//! platform along its direction of travel.
//!
//! Nothing in this module divides by the contraction factor except
//! [`Kinematics::gamma`], which is a display value.

use crate::config::BETA_MAX;
use crate::error::SimulationError;

/// Platform speed as a fraction of the reference light speed, always in `[0, BETA_MAX]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct VelocityRatio(f32);

impl VelocityRatio {
    pub const ZERO: Self = Self(0.0);
    pub const MAX: Self = Self(BETA_MAX);

    /// Strict constructor for the control boundary.
    pub fn new(value: f32) -> Result<Self, SimulationError> {
        if value.is_finite() && (0.0..=BETA_MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(SimulationError::VelocityRatioOutOfRange {
                value,
                max: BETA_MAX,
            })
        }
    }

    /// Clamp anything into the valid domain. NaN becomes 0.
    ///
    /// For front ends turning raw slider or key input into a β; the engine
    /// itself only ever holds a `VelocityRatio`.
    pub fn saturating(value: f32) -> Self {
        if value.is_nan() {
            Self::ZERO
        } else {
            Self(value.clamp(0.0, BETA_MAX))
        }
    }

    pub fn get(self) -> f32 {
        self.0
    }
}

/// `sqrt(1 - β²)`, the reciprocal of the Lorentz factor.
pub fn lorentz_contraction(beta: VelocityRatio) -> f32 {
    let b = beta.get();
    (1.0 - b * b).max(0.0).sqrt()
}

/// Per-tick quantities derived from β. Recomputed whenever β changes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kinematics {
    pub beta: VelocityRatio,
    /// Scale applied to the platform along its direction of travel.
    pub contraction: f32,
    /// Photon speed along the clock axis in the platform's rest frame.
    pub vertical_speed: f32,
    /// Platform speed along its path.
    pub horizontal_speed: f32,
    /// Phase change per tick, `vertical_speed / L · Δt`.
    pub phase_step: f32,
}

impl Kinematics {
    pub fn new(beta: VelocityRatio, light_speed: f32, arm_length: f32, tick_dt: f32) -> Self {
        let contraction = lorentz_contraction(beta);
        let vertical_speed = contraction * light_speed;
        Self {
            beta,
            contraction,
            vertical_speed,
            horizontal_speed: beta.get() * light_speed,
            phase_step: vertical_speed / arm_length * tick_dt,
        }
    }

    /// Lorentz factor γ = 1 / sqrt(1 - β²).
    pub fn gamma(&self) -> f32 {
        1.0 / self.contraction
    }

    /// Distance the platform covers in one tick.
    pub fn displacement(&self, tick_dt: f32) -> f32 {
        self.horizontal_speed * tick_dt
    }
}

/// Travel direction of the photon along the clock axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Towards the top mirror (+1).
    Up,
    /// Towards the bottom mirror (-1).
    Down,
}

impl Direction {
    pub fn sign(self) -> f32 {
        match self {
            Direction::Up => 1.0,
            Direction::Down => -1.0,
        }
    }
}

/// Position of the photon between the mirrors: 0 = bottom, 1 = top.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhotonState {
    pub phase: f32,
    pub direction: Direction,
}

impl Default for PhotonState {
    fn default() -> Self {
        Self {
            phase: crate::config::INITIAL_PHOTON_PHASE,
            direction: Direction::Up,
        }
    }
}

impl PhotonState {
    /// Move by one step. Reaching a mirror clamps the phase onto it and
    /// reverses direction in the same call; the returned flag reports the bounce.
    pub fn advance(self, step: f32) -> (Self, bool) {
        let next = self.phase + self.direction.sign() * step;
        if next >= 1.0 {
            (
                Self {
                    phase: 1.0,
                    direction: Direction::Down,
                },
                true,
            )
        } else if next <= 0.0 {
            (
                Self {
                    phase: 0.0,
                    direction: Direction::Up,
                },
                true,
            )
        } else {
            (
                Self {
                    phase: next,
                    direction: self.direction,
                },
                false,
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CLOCK_ARM_LENGTH, LIGHT_SPEED, TICK_DT};

    fn kinematics(beta: f32) -> Kinematics {
        Kinematics::new(
            VelocityRatio::new(beta).unwrap(),
            LIGHT_SPEED,
            CLOCK_ARM_LENGTH,
            TICK_DT,
        )
    }

    #[test]
    fn test_rest_frame_baseline() {
        let k = kinematics(0.0);
        assert_eq!(k.vertical_speed, LIGHT_SPEED);
        assert_eq!(k.contraction, 1.0);
        assert_eq!(k.horizontal_speed, 0.0);
        assert_eq!(k.gamma(), 1.0);
    }

    #[test]
    fn test_three_four_five() {
        let k = kinematics(0.6);
        assert!((k.vertical_speed - 0.8 * LIGHT_SPEED).abs() < 1e-6);
        assert!((k.horizontal_speed - 0.6 * LIGHT_SPEED).abs() < 1e-6);
        assert!((k.contraction - 0.8).abs() < 1e-6);
        assert!((k.gamma() - 1.25).abs() < 1e-6);
        let expected_step = 0.8 * LIGHT_SPEED / CLOCK_ARM_LENGTH * TICK_DT;
        assert!((k.phase_step - expected_step).abs() < 1e-6);
    }

    #[test]
    fn test_total_photon_speed_is_light_speed() {
        for i in 0..=99 {
            let k = kinematics(i as f32 / 100.0);
            let total = (k.vertical_speed.powi(2) + k.horizontal_speed.powi(2)).sqrt();
            assert!((total - LIGHT_SPEED).abs() < 1e-4, "beta {}", k.beta.get());
        }
    }

    #[test]
    fn test_near_max_stays_positive() {
        let k = kinematics(BETA_MAX);
        assert!(k.contraction > 0.0 && k.contraction < 0.15);
        assert!(k.vertical_speed > 0.0);
        assert!(k.gamma().is_finite());

        let mut last = f32::INFINITY;
        for i in 90..=99 {
            let c = kinematics(i as f32 / 100.0).contraction;
            assert!(c > 0.0 && c < last);
            last = c;
        }
    }

    #[test]
    fn test_strict_constructor_rejects_out_of_range() {
        assert!(VelocityRatio::new(-0.1).is_err());
        assert!(VelocityRatio::new(1.0).is_err());
        assert!(VelocityRatio::new(f32::NAN).is_err());
        assert!(VelocityRatio::new(f32::INFINITY).is_err());
        assert_eq!(VelocityRatio::new(0.99).unwrap().get(), 0.99);
    }

    #[test]
    fn test_saturating_clamps() {
        assert_eq!(VelocityRatio::saturating(2.0), VelocityRatio::MAX);
        assert_eq!(VelocityRatio::saturating(-3.0), VelocityRatio::ZERO);
        assert_eq!(VelocityRatio::saturating(f32::NAN), VelocityRatio::ZERO);
        assert_eq!(VelocityRatio::saturating(0.5).get(), 0.5);
    }

    #[test]
    fn test_clamped_input_never_produces_nan() {
        for raw in [1.0, 1.5, -0.2, f32::NAN, f32::INFINITY] {
            let k = Kinematics::new(
                VelocityRatio::saturating(raw),
                LIGHT_SPEED,
                CLOCK_ARM_LENGTH,
                TICK_DT,
            );
            assert!(k.contraction.is_finite() && k.contraction > 0.0);
            assert!(k.phase_step.is_finite());
        }
    }

    #[test]
    fn test_bounce_at_top_mirror() {
        let photon = PhotonState {
            phase: 0.99,
            direction: Direction::Up,
        };
        let (next, bounced) = photon.advance(0.05);
        assert!(bounced);
        assert_eq!(next.phase, 1.0);
        assert_eq!(next.direction, Direction::Down);

        let (after, bounced) = next.advance(0.05);
        assert!(!bounced);
        assert!((after.phase - 0.95).abs() < 1e-6);
    }

    #[test]
    fn test_bounce_at_bottom_mirror() {
        let photon = PhotonState {
            phase: 0.02,
            direction: Direction::Down,
        };
        let (next, bounced) = photon.advance(0.05);
        assert!(bounced);
        assert_eq!(next.phase, 0.0);
        assert_eq!(next.direction, Direction::Up);
    }

    #[test]
    fn test_phase_stays_in_unit_interval() {
        for beta in [0.0, 0.3, 0.6, 0.9, BETA_MAX] {
            let k = kinematics(beta);
            let mut photon = PhotonState::default();
            let mut flips = 0;
            for _ in 0..5_000 {
                let before = photon;
                let (next, bounced) = photon.advance(k.phase_step);
                assert!((0.0..=1.0).contains(&next.phase));
                assert!((next.phase - before.phase).abs() <= k.phase_step + 1e-6);
                if next.direction != before.direction {
                    assert!(bounced);
                    flips += 1;
                }
                photon = next;
            }
            assert!(flips > 0, "beta {} never bounced", beta);
        }
    }

    #[test]
    fn test_direction_sign() {
        assert_eq!(Direction::Up.sign(), 1.0);
        assert_eq!(Direction::Down.sign(), -1.0);
    }
}
