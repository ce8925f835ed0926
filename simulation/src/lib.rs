//! The simulation crate holds the physics of the light clock: how fast the
//! photon ticks at a given β, where the platform is in each scenario, and the
//! frame driver that advances both and hands the result to the views.
//!
//! Nothing here touches a window or a GPU. A frame loop calls
//! [`FrameDriver::tick`] once per displayed frame and reads the returned
//! [`Frame`]; the co-moving view reads the photon through a
//! [`PhysicsReader`] obtained from [`FrameDriver::physics`].

pub mod config;
pub mod driver;
pub mod error;
pub mod kinematics;
pub mod motion;
pub mod pose;
pub mod scenario;
pub mod shared;
pub mod state;
pub mod timer;
pub mod trail;

pub use config::{OrbitConfig, SimulationConfig};
pub use driver::{ControlInput, DeferredAction, Frame, FrameDriver};
pub use error::SimulationError;
pub use kinematics::{lorentz_contraction, Direction, Kinematics, PhotonState, VelocityRatio};
pub use motion::{Motion, MotionPolicy};
pub use pose::{BodyKind, BodyPlacement, PlatformPose, ScenePose};
pub use scenario::Scenario;
pub use shared::{PhotonSnapshot, PhysicsReader, PhysicsWriter};
pub use state::{Clocks, SimulationState};
pub use timer::Timer;
pub use trail::TrailBuffer;
