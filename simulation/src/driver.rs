//! The per-frame tick.
//!
//! [`FrameDriver::tick`] is the only place simulation state changes during
//! normal running; [`FrameDriver::apply`] handles control input between
//! ticks. Both finish by publishing the photon snapshot, so anything a view
//! reads afterwards is already consistent with the state the driver holds.
//!
//! Physics advances by a fixed [`SimulationConfig::tick_dt`] per tick. The
//! wall-clock delta passed to `tick` only drives deferred actions.

use std::time::Duration;

use cgmath::Point3;

use crate::config::SimulationConfig;
use crate::error::SimulationError;
use crate::kinematics::{Kinematics, PhotonState, VelocityRatio};
use crate::motion::{Motion, MotionPolicy};
use crate::pose::ScenePose;
use crate::scenario::Scenario;
use crate::shared::{self, PhotonSnapshot, PhysicsReader, PhysicsWriter};
use crate::state::SimulationState;
use crate::timer::Timer;
use crate::trail::TrailBuffer;

/// Signals from the control surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlInput {
    TogglePlay,
    SetRunning(bool),
    /// Must already be clamped to `[0, BETA_MAX]`; anything else is rejected.
    SetVelocityRatio(f32),
    SelectScenario(Scenario),
    SetTrailEnabled(bool),
    /// Pause, zero everything including β, and resume after the configured delay.
    Reset,
}

/// Work the driver can schedule for later.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferredAction {
    Resume,
}

/// What the renderer gets after a tick.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    pub frame: u64,
    pub scenario: Scenario,
    pub running: bool,
    pub kinematics: Kinematics,
    pub scene: &'a ScenePose,
    pub photon: PhotonState,
    pub photon_world: Point3<f32>,
    pub trail: &'a TrailBuffer,
    pub bounces: u64,
    pub arm_length: f32,
}

pub struct FrameDriver {
    config: SimulationConfig,
    state: SimulationState,
    motion: Motion,
    kinematics: Kinematics,
    running: bool,
    frame: u64,
    timer: Timer<DeferredAction>,
    writer: PhysicsWriter,
    scene: ScenePose,
    photon_world: Point3<f32>,
}

impl Default for FrameDriver {
    fn default() -> Self {
        Self::build(SimulationConfig::default())
    }
}

impl FrameDriver {
    pub fn new(config: SimulationConfig) -> Result<Self, SimulationError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: SimulationConfig) -> Self {
        let state = SimulationState::new(config.trail_capacity);
        let (writer, _) = shared::channel(PhotonSnapshot::new(0, state.photon));
        let kinematics = Kinematics::new(
            VelocityRatio::ZERO,
            config.light_speed,
            config.arm_length,
            config.tick_dt,
        );
        let mut driver = Self {
            motion: Motion::for_scenario(Scenario::default(), &config.orbits),
            config,
            state,
            kinematics,
            running: true,
            frame: 0,
            timer: Timer::new(),
            writer,
            scene: ScenePose::default(),
            photon_world: Point3::new(0.0, 0.0, 0.0),
        };
        driver.refresh_scene();
        driver
    }

    /// A handle for views that need the photon state.
    pub fn physics(&self) -> PhysicsReader {
        self.writer.reader()
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn scenario(&self) -> Scenario {
        self.motion.scenario()
    }

    pub fn velocity_ratio(&self) -> VelocityRatio {
        self.kinematics.beta
    }

    pub fn kinematics(&self) -> Kinematics {
        self.kinematics
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_resume_pending(&self) -> bool {
        self.timer.is_pending()
    }

    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    pub fn apply(&mut self, input: ControlInput) -> Result<(), SimulationError> {
        match input {
            ControlInput::TogglePlay => self.set_running(!self.running),
            ControlInput::SetRunning(running) => self.set_running(running),
            ControlInput::SetVelocityRatio(value) => {
                self.set_velocity_ratio(VelocityRatio::new(value)?);
            }
            ControlInput::SelectScenario(scenario) => {
                if scenario != self.scenario() {
                    log::info!("scenario: {} -> {}", self.scenario(), scenario);
                    self.motion = Motion::for_scenario(scenario, &self.config.orbits);
                    self.reset_state();
                }
            }
            ControlInput::SetTrailEnabled(enabled) => {
                log::debug!("trail {}", if enabled { "on" } else { "off" });
                self.state.trail.set_enabled(enabled);
            }
            ControlInput::Reset => self.reset(),
        }
        Ok(())
    }

    /// Advances one tick and returns the result for rendering.
    pub fn tick(&mut self, wall_elapsed: Duration) -> Frame<'_> {
        self.frame += 1;

        if let Some(DeferredAction::Resume) = self.timer.advance(wall_elapsed) {
            log::info!("resuming after reset");
            self.running = true;
        }

        if self.running {
            self.step();
        }
        self.publish();
        self.frame()
    }

    /// The most recent tick's output, without advancing.
    pub fn frame(&self) -> Frame<'_> {
        Frame {
            frame: self.frame,
            scenario: self.scenario(),
            running: self.running,
            kinematics: self.kinematics,
            scene: &self.scene,
            photon: self.state.photon,
            photon_world: self.photon_world,
            trail: &self.state.trail,
            bounces: self.state.bounces,
            arm_length: self.config.arm_length,
        }
    }

    fn step(&mut self) {
        let dt = self.config.tick_dt;
        let displacement = self.kinematics.displacement(dt);
        let linear = self.scenario() == Scenario::Linear;

        let clocks = &mut self.state.clocks;
        clocks.celestial_time += f64::from(self.config.celestial_rate * dt);
        clocks.platform_time += f64::from(displacement);
        if linear {
            clocks.linear_offset += f64::from(displacement);
        }

        let (photon, bounced) = self.state.photon.advance(self.kinematics.phase_step);
        self.state.photon = photon;
        if bounced {
            self.state.bounces += 1;
        }

        self.refresh_scene();
        self.state.trail.push(self.photon_world);
        if linear {
            let head_x = self.state.clocks.linear_offset as f32;
            self.state
                .trail
                .evict_behind(head_x, self.config.trail_linear_window);
        }
    }

    fn set_running(&mut self, running: bool) {
        if self.timer.cancel().is_some() {
            log::debug!("pending resume cancelled by play/pause");
        }
        self.running = running;
    }

    fn set_velocity_ratio(&mut self, beta: VelocityRatio) {
        self.kinematics = Kinematics::new(
            beta,
            self.config.light_speed,
            self.config.arm_length,
            self.config.tick_dt,
        );
        // Contraction shows up in the pose even while paused.
        self.refresh_scene();
    }

    fn reset(&mut self) {
        log::info!("reset; resuming in {:?}", self.config.resume_delay);
        self.running = false;
        self.set_velocity_ratio(VelocityRatio::ZERO);
        self.reset_state();
        if self
            .timer
            .schedule(self.config.resume_delay, DeferredAction::Resume)
            .is_some()
        {
            log::debug!("reset while a resume was pending; restarting the delay");
        }
    }

    fn reset_state(&mut self) {
        self.state.reset();
        self.refresh_scene();
        self.publish();
    }

    fn refresh_scene(&mut self) {
        self.scene = self
            .motion
            .pose(&self.state.clocks, self.kinematics.contraction);
        self.photon_world = self
            .scene
            .platform
            .photon_position(self.state.photon.phase, self.config.arm_length);
    }

    fn publish(&mut self) {
        self.writer
            .publish(PhotonSnapshot::new(self.frame, self.state.photon));
    }
}
