use std::fmt;
use std::str::FromStr;

use crate::error::SimulationError;

/// The motion scenarios the platform can be put through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Scenario {
    /// Straight-line travel along +X.
    #[default]
    Linear,
    /// Circular orbit around a fixed earth.
    EarthOrbit,
    /// Orbit around a planet that itself orbits a star.
    SolarSystem,
    /// The solar system orbiting a galactic core on an inclined plane.
    Galaxy,
}

impl Scenario {
    pub const ALL: [Scenario; 4] = [
        Scenario::Linear,
        Scenario::EarthOrbit,
        Scenario::SolarSystem,
        Scenario::Galaxy,
    ];

    /// Stable identifier, also accepted by [`FromStr`].
    pub fn name(self) -> &'static str {
        match self {
            Scenario::Linear => "linear",
            Scenario::EarthOrbit => "earth-orbit",
            Scenario::SolarSystem => "solar-system",
            Scenario::Galaxy => "galaxy",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Scenario::Linear => "Linear travel",
            Scenario::EarthOrbit => "Earth orbit",
            Scenario::SolarSystem => "Solar system",
            Scenario::Galaxy => "Galaxy",
        }
    }

    /// Position in [`Scenario::ALL`], as used by numbered selectors.
    pub fn from_index(index: usize) -> Result<Self, SimulationError> {
        Self::ALL
            .get(index)
            .copied()
            .ok_or_else(|| SimulationError::UnknownScenario(index.to_string()))
    }

    /// Only straight-line travel shows length contraction; the orbital
    /// scenarios keep the platform at rest length.
    pub fn applies_contraction(self) -> bool {
        matches!(self, Scenario::Linear)
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Scenario {
    type Err = SimulationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(&['_', ' '][..], "-");
        Self::ALL
            .into_iter()
            .find(|scenario| scenario.name() == normalized)
            .ok_or_else(|| SimulationError::UnknownScenario(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_names() {
        assert_eq!("linear".parse::<Scenario>().unwrap(), Scenario::Linear);
        assert_eq!("Earth_Orbit".parse::<Scenario>().unwrap(), Scenario::EarthOrbit);
        assert_eq!(" solar system ".parse::<Scenario>().unwrap(), Scenario::SolarSystem);
        assert_eq!("GALAXY".parse::<Scenario>().unwrap(), Scenario::Galaxy);
    }

    #[test]
    fn test_unknown_tag_is_an_error() {
        assert_eq!(
            "wormhole".parse::<Scenario>(),
            Err(SimulationError::UnknownScenario("wormhole".into()))
        );
        assert!(Scenario::from_index(4).is_err());
    }

    #[test]
    fn test_from_index_follows_all() {
        for (index, scenario) in Scenario::ALL.into_iter().enumerate() {
            assert_eq!(Scenario::from_index(index).unwrap(), scenario);
        }
    }

    #[test]
    fn test_only_linear_contracts() {
        assert!(Scenario::Linear.applies_contraction());
        assert!(!Scenario::EarthOrbit.applies_contraction());
        assert!(!Scenario::SolarSystem.applies_contraction());
        assert!(!Scenario::Galaxy.applies_contraction());
    }
}
