//! One motion law per scenario.
//!
//! All orbits lie in a plane whose normal is the local +Y axis and advance by
//! a positive rotation about that axis, i.e. counter-clockwise seen from
//! above. Nested orbits inherit their parent's plane, so every level turns the
//! same way.
//!
//! Background bodies move with `celestial_time`; the platform moves with
//! `platform_time`, which is path length, so its orbital angle is
//! `platform_time / radius` and its tangential speed is exactly `β·c`.

use std::f32::consts::FRAC_PI_2;
use std::f64::consts::TAU;

use cgmath::{EuclideanSpace, One, Point3, Quaternion, Rad, Rotation3, Vector3};

use crate::config::OrbitConfig;
use crate::pose::{BodyKind, BodyPlacement, PlatformPose, ScenePose};
use crate::scenario::Scenario;
use crate::state::Clocks;

/// Computes where everything is for one tick.
pub trait MotionPolicy {
    /// `contraction` is `sqrt(1 - β²)`; policies that don't show contraction ignore it.
    fn pose(&self, clocks: &Clocks, contraction: f32) -> ScenePose;
}

/// Reduces an accumulated angle to `[0, 2π)` before dropping to `f32`.
fn wrap_angle(angle: f64) -> f32 {
    angle.rem_euclid(TAU) as f32
}

/// Offset of a body at `angle` on a circle of `radius` in the orbital `plane`.
fn orbit_offset(plane: Quaternion<f32>, radius: f32, angle: f32) -> Vector3<f32> {
    plane * (Quaternion::from_angle_y(Rad(angle)) * Vector3::new(radius, 0.0, 0.0))
}

/// Orientation whose +X axis is the direction of travel at `angle` and whose
/// +Y axis is the plane normal.
fn tangent_orientation(plane: Quaternion<f32>, angle: f32) -> Quaternion<f32> {
    plane * Quaternion::from_angle_y(Rad(angle + FRAC_PI_2))
}

fn orbiting_platform(
    center: Point3<f32>,
    plane: Quaternion<f32>,
    radius: f32,
    path_length: f64,
) -> PlatformPose {
    let angle = wrap_angle(path_length / f64::from(radius));
    PlatformPose {
        position: center + orbit_offset(plane, radius, angle),
        orientation: tangent_orientation(plane, angle),
        scale: Vector3::new(1.0, 1.0, 1.0),
    }
}

/// Straight-line travel along +X, contracted along the direction of motion.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearMotion;

impl MotionPolicy for LinearMotion {
    fn pose(&self, clocks: &Clocks, contraction: f32) -> ScenePose {
        ScenePose {
            platform: PlatformPose {
                position: Point3::new(clocks.linear_offset as f32, 0.0, 0.0),
                orientation: Quaternion::one(),
                scale: Vector3::new(contraction, 1.0, 1.0),
            },
            bodies: Vec::new(),
        }
    }
}

/// The platform circles an earth fixed at the origin.
#[derive(Debug, Clone, Copy)]
pub struct EarthOrbit {
    pub orbit_radius: f32,
    pub earth_radius: f32,
}

impl MotionPolicy for EarthOrbit {
    fn pose(&self, clocks: &Clocks, _contraction: f32) -> ScenePose {
        let earth = Point3::origin();
        ScenePose {
            platform: orbiting_platform(
                earth,
                Quaternion::one(),
                self.orbit_radius,
                clocks.platform_time,
            ),
            bodies: vec![BodyPlacement {
                kind: BodyKind::Earth,
                position: earth,
                radius: self.earth_radius,
            }],
        }
    }
}

/// A planet orbits a star, and the platform orbits the planet.
#[derive(Debug, Clone, Copy)]
pub struct SolarSystem {
    pub planet_orbit_radius: f32,
    pub planet_angular_rate: f32,
    pub platform_orbit_radius: f32,
    pub star_radius: f32,
    pub planet_radius: f32,
}

impl SolarSystem {
    /// The whole system placed with its star at `star` and its orbits in `plane`.
    fn pose_around(&self, clocks: &Clocks, star: Point3<f32>, plane: Quaternion<f32>) -> ScenePose {
        let planet_angle = wrap_angle(f64::from(self.planet_angular_rate) * clocks.celestial_time);
        let planet = star + orbit_offset(plane, self.planet_orbit_radius, planet_angle);
        ScenePose {
            platform: orbiting_platform(
                planet,
                plane,
                self.platform_orbit_radius,
                clocks.platform_time,
            ),
            bodies: vec![
                BodyPlacement {
                    kind: BodyKind::Star,
                    position: star,
                    radius: self.star_radius,
                },
                BodyPlacement {
                    kind: BodyKind::Planet,
                    position: planet,
                    radius: self.planet_radius,
                },
            ],
        }
    }
}

impl MotionPolicy for SolarSystem {
    fn pose(&self, clocks: &Clocks, _contraction: f32) -> ScenePose {
        self.pose_around(clocks, Point3::origin(), Quaternion::one())
    }
}

/// The solar system orbits a galactic core in the galactic (XZ) plane, with
/// its own orbital plane tilted about X by `tilt`.
#[derive(Debug, Clone, Copy)]
pub struct Galaxy {
    pub system: SolarSystem,
    pub orbit_radius: f32,
    pub angular_rate: f32,
    pub tilt: f32,
    pub core_radius: f32,
}

impl Galaxy {
    pub fn system_plane(&self) -> Quaternion<f32> {
        Quaternion::from_angle_x(Rad(self.tilt))
    }
}

impl MotionPolicy for Galaxy {
    fn pose(&self, clocks: &Clocks, _contraction: f32) -> ScenePose {
        let core = Point3::origin();
        let star_angle = wrap_angle(f64::from(self.angular_rate) * clocks.celestial_time);
        let star = core + orbit_offset(Quaternion::one(), self.orbit_radius, star_angle);

        let mut scene = self.system.pose_around(clocks, star, self.system_plane());
        scene.bodies.insert(
            0,
            BodyPlacement {
                kind: BodyKind::GalacticCore,
                position: core,
                radius: self.core_radius,
            },
        );
        scene
    }
}

/// Scenario-tagged motion policy.
#[derive(Debug, Clone, Copy)]
pub enum Motion {
    Linear(LinearMotion),
    EarthOrbit(EarthOrbit),
    SolarSystem(SolarSystem),
    Galaxy(Galaxy),
}

impl Motion {
    pub fn for_scenario(scenario: Scenario, orbits: &OrbitConfig) -> Self {
        let system = SolarSystem {
            planet_orbit_radius: orbits.planet_orbit_radius,
            planet_angular_rate: orbits.planet_angular_rate,
            platform_orbit_radius: orbits.platform_orbit_radius,
            star_radius: orbits.star_radius,
            planet_radius: orbits.planet_radius,
        };
        match scenario {
            Scenario::Linear => Motion::Linear(LinearMotion),
            Scenario::EarthOrbit => Motion::EarthOrbit(EarthOrbit {
                orbit_radius: orbits.earth_orbit_radius,
                earth_radius: orbits.earth_radius,
            }),
            Scenario::SolarSystem => Motion::SolarSystem(system),
            Scenario::Galaxy => Motion::Galaxy(Galaxy {
                system,
                orbit_radius: orbits.galaxy_orbit_radius,
                angular_rate: orbits.galaxy_angular_rate,
                tilt: orbits.galaxy_tilt,
                core_radius: orbits.galactic_core_radius,
            }),
        }
    }

    pub fn scenario(&self) -> Scenario {
        match self {
            Motion::Linear(_) => Scenario::Linear,
            Motion::EarthOrbit(_) => Scenario::EarthOrbit,
            Motion::SolarSystem(_) => Scenario::SolarSystem,
            Motion::Galaxy(_) => Scenario::Galaxy,
        }
    }
}

impl MotionPolicy for Motion {
    fn pose(&self, clocks: &Clocks, contraction: f32) -> ScenePose {
        let contraction = if self.scenario().applies_contraction() {
            contraction
        } else {
            1.0
        };
        match self {
            Motion::Linear(m) => m.pose(clocks, contraction),
            Motion::EarthOrbit(m) => m.pose(clocks, contraction),
            Motion::SolarSystem(m) => m.pose(clocks, contraction),
            Motion::Galaxy(m) => m.pose(clocks, contraction),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{InnerSpace, MetricSpace};

    const EPS: f32 = 1e-3;

    fn clocks(celestial_time: f64, platform_time: f64, linear_offset: f64) -> Clocks {
        Clocks {
            celestial_time,
            platform_time,
            linear_offset,
        }
    }

    fn motion(scenario: Scenario) -> Motion {
        Motion::for_scenario(scenario, &OrbitConfig::default())
    }

    #[test]
    fn test_linear_follows_offset_and_contracts() {
        let scene = motion(Scenario::Linear).pose(&clocks(10.0, 10.0, 12.5), 0.8);
        assert_eq!(scene.platform.position, Point3::new(12.5, 0.0, 0.0));
        assert_eq!(scene.platform.scale, Vector3::new(0.8, 1.0, 1.0));
        assert_eq!(scene.platform.orientation, Quaternion::one());
        assert!(scene.bodies.is_empty());
    }

    #[test]
    fn test_orbits_never_contract() {
        for scenario in [Scenario::EarthOrbit, Scenario::SolarSystem, Scenario::Galaxy] {
            let scene = motion(scenario).pose(&clocks(1.0, 2.0, 0.0), 0.2);
            assert_eq!(scene.platform.scale, Vector3::new(1.0, 1.0, 1.0));
        }
    }

    #[test]
    fn test_earth_orbit_radius_and_tangent() {
        let config = OrbitConfig::default();
        let m = motion(Scenario::EarthOrbit);
        for step in 0..50 {
            let scene = m.pose(&clocks(0.0, step as f64 * 1.7, 0.0), 1.0);
            let radial = scene.platform.position.to_vec();
            assert!((radial.magnitude() - config.earth_orbit_radius).abs() < EPS);
            assert!(radial.normalize().dot(scene.platform.forward()).abs() < EPS);
            assert!((scene.platform.up() - Vector3::unit_y()).magnitude() < EPS);
        }
        assert_eq!(
            m.pose(&Clocks::default(), 1.0).body(BodyKind::Earth).map(|b| b.position),
            Some(Point3::origin())
        );
    }

    #[test]
    fn test_forward_matches_direction_of_travel() {
        let m = motion(Scenario::EarthOrbit);
        let a = m.pose(&clocks(0.0, 3.0, 0.0), 1.0).platform;
        let b = m.pose(&clocks(0.0, 3.01, 0.0), 1.0).platform;
        let travel = (b.position - a.position).normalize();
        assert!(travel.dot(a.forward()) > 0.999);
    }

    #[test]
    fn test_orbits_turn_counter_clockwise_from_above() {
        for scenario in [Scenario::EarthOrbit, Scenario::SolarSystem] {
            let m = motion(scenario);
            let center = |c: &Clocks| {
                let scene = m.pose(c, 1.0);
                scene
                    .body(BodyKind::Planet)
                    .or(scene.body(BodyKind::Earth))
                    .map(|b| b.position)
                    .unwrap()
            };
            let c0 = clocks(0.0, 1.0, 0.0);
            let c1 = clocks(0.0, 1.5, 0.0);
            let r0 = m.pose(&c0, 1.0).platform.position - center(&c0);
            let r1 = m.pose(&c1, 1.0).platform.position - center(&c1);
            assert!(r0.cross(r1).y > 0.0, "{:?}", scenario);
        }

        let m = motion(Scenario::SolarSystem);
        let p0 = m.pose(&clocks(1.0, 0.0, 0.0), 1.0).body(BodyKind::Planet).unwrap().position;
        let p1 = m.pose(&clocks(2.0, 0.0, 0.0), 1.0).body(BodyKind::Planet).unwrap().position;
        assert!(p0.to_vec().cross(p1.to_vec()).y > 0.0);
    }

    #[test]
    fn test_celestial_motion_continues_at_rest() {
        let m = motion(Scenario::SolarSystem);
        let before = m.pose(&clocks(0.0, 0.0, 0.0), 1.0);
        let after = m.pose(&clocks(5.0, 0.0, 0.0), 1.0);
        let planet_before = before.body(BodyKind::Planet).unwrap().position;
        let planet_after = after.body(BodyKind::Planet).unwrap().position;
        assert!(planet_before.distance(planet_after) > 1.0);

        let config = OrbitConfig::default();
        let offset = after.platform.position - planet_after;
        assert!((offset.magnitude() - config.platform_orbit_radius).abs() < EPS);
    }

    #[test]
    fn test_platform_stays_attached_to_planet() {
        let config = OrbitConfig::default();
        let m = motion(Scenario::SolarSystem);
        for step in 0..40 {
            let t = step as f64 * 0.37;
            let scene = m.pose(&clocks(t, t * 2.0, 0.0), 1.0);
            let star = scene.body(BodyKind::Star).unwrap().position;
            let planet = scene.body(BodyKind::Planet).unwrap().position;
            assert_eq!(star, Point3::origin());
            assert!((star.distance(planet) - config.planet_orbit_radius).abs() < EPS);
            assert!(
                (planet.distance(scene.platform.position) - config.platform_orbit_radius).abs()
                    < EPS
            );
        }
    }

    #[test]
    fn test_galaxy_orbits_are_coplanar_with_tilt() {
        let config = OrbitConfig::default();
        let m = motion(Scenario::Galaxy);
        let normal = Quaternion::from_angle_x(Rad(config.galaxy_tilt)) * Vector3::unit_y();

        for step in 0..60 {
            let t = step as f64 * 0.9;
            let scene = m.pose(&clocks(t, t * 1.3, 0.0), 1.0);
            let core = scene.body(BodyKind::GalacticCore).unwrap().position;
            let star = scene.body(BodyKind::Star).unwrap().position;
            let planet = scene.body(BodyKind::Planet).unwrap().position;
            let platform = scene.platform.position;

            // The star rides the galactic plane.
            assert!(star.y.abs() < EPS);
            assert!((core.distance(star) - config.galaxy_orbit_radius).abs() < 1e-2);

            // Planet and platform orbits share the tilted plane.
            assert!((planet - star).normalize().dot(normal).abs() < EPS);
            assert!((platform - planet).normalize().dot(normal).abs() < EPS);
            assert!((scene.platform.up() - normal).magnitude() < EPS);
        }
    }

    #[test]
    fn test_galaxy_reports_all_bodies() {
        let scene = motion(Scenario::Galaxy).pose(&Clocks::default(), 1.0);
        let kinds: Vec<BodyKind> = scene.bodies.iter().map(|b| b.kind).collect();
        assert_eq!(
            kinds,
            vec![BodyKind::GalacticCore, BodyKind::Star, BodyKind::Planet]
        );
    }

    #[test]
    fn test_week_long_clocks_still_advance() {
        let t = 600_000.0;
        let dt = f64::from(crate::config::TICK_DT);
        let m = motion(Scenario::SolarSystem);
        let now = m.pose(&clocks(t, t, 0.0), 1.0);
        let next = m.pose(&clocks(t + dt, t + 0.05, 0.0), 1.0);
        let planet_now = now.body(BodyKind::Planet).unwrap().position;
        let planet_next = next.body(BodyKind::Planet).unwrap().position;
        assert!(planet_now.distance(planet_next) > 0.01);
        assert!(now.platform.position.distance(next.platform.position) > 0.01);

        let config = OrbitConfig::default();
        assert!((planet_now.to_vec().magnitude() - config.planet_orbit_radius).abs() < EPS);
    }

    #[test]
    fn test_motion_withholds_contraction_from_orbits() {
        let linear = motion(Scenario::Linear).pose(&Clocks::default(), 0.6);
        assert_eq!(linear.platform.scale.x, 0.6);
        for scenario in [Scenario::EarthOrbit, Scenario::SolarSystem, Scenario::Galaxy] {
            let scene = motion(scenario).pose(&Clocks::default(), 0.6);
            assert_eq!(scene.platform.scale.x, 1.0, "{:?}", scenario);
        }
    }

    #[test]
    fn test_motion_reports_its_scenario() {
        for scenario in Scenario::ALL {
            assert_eq!(motion(scenario).scenario(), scenario);
        }
    }
}
