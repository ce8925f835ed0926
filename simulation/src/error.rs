/// Contract violations reported by the simulation core.
///
/// The core never fails on valid input; every variant means a caller handed it
/// something outside its documented domain.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SimulationError {
    #[error("velocity ratio {value} is outside [0, {max}]")]
    VelocityRatioOutOfRange { value: f32, max: f32 },

    #[error("unknown scenario `{0}`")]
    UnknownScenario(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
}
