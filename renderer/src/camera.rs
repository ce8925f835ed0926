use cgmath::*;
use winit::event::ElementState;

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: cgmath::Matrix4<f32> = cgmath::Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.5,
    0.0, 0.0, 0.0, 1.0,
);

pub struct Camera {
    pub eye: cgmath::Point3<f32>,
    pub target: cgmath::Point3<f32>,
    pub up: cgmath::Vector3<f32>,
    pub aspect: f32,
    pub fovy: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    pub fn new<
        V: Into<Point3<f32>>,
        Y: Into<Point3<f32>>,
        U: Into<Vector3<f32>>,
    >(
        eye: V,
        target: Y,
        up: U,
        aspect: f32,
        fovy: f32,
        znear: f32,
        zfar: f32,
    ) -> Self {
        Self {
            eye: eye.into(),
            target: target.into(),
            up: up.into(),
            aspect,
            fovy,
            znear,
            zfar,
        }
    }

    pub fn build_view_projection_matrix(&self) -> cgmath::Matrix4<f32> {
        let view = cgmath::Matrix4::look_at_rh(self.eye, self.target, self.up);
        let proj = cgmath::perspective(cgmath::Deg(self.fovy), self.aspect, self.znear, self.zfar);

        OPENGL_TO_WGPU_MATRIX * proj * view
    }

    pub fn update_aspect_ratio(&mut self, aspect: f32) {
        self.aspect = aspect;
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    pub eye: [f32; 4], // w unused, keeps 16-byte alignment
}

impl CameraUniform {
    pub fn new() -> Self {
        const _: () = assert!(std::mem::size_of::<CameraUniform>() == 80);
        Self {
            view_proj: cgmath::Matrix4::identity().into(),
            eye: [0.0; 4],
        }
    }

    pub fn update_view_proj(&mut self, camera: &Camera) {
        self.view_proj = camera.build_view_projection_matrix().into();
        self.eye = [camera.eye.x, camera.eye.y, camera.eye.z, 1.0];
    }
}

/// How a scenario wants the primary camera placed by default.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Framing {
    /// Distance from the target.
    pub distance: f32,
    /// Elevation above the target's horizontal plane, in degrees.
    pub pitch: f32,
    /// Heading around the target, in degrees. 90° looks along -Z.
    pub yaw: f32,
    /// Track the platform instead of the scene origin.
    pub follow_platform: bool,
}

/// Mouse-driven orbit around a target point: drag to turn, scroll to zoom.
pub struct OrbitController {
    pub yaw: f32,
    pub pitch: f32,
    pub distance: f32,
    sensitivity: f32,
    zoom_step: f32,
    min_distance: f32,
    max_distance: f32,
    mouse_pressed: bool,
    last_mouse_pos: Option<Vector2<f64>>,
}

impl OrbitController {
    pub fn new(framing: Framing) -> Self {
        let mut controller = Self {
            yaw: 0.0,
            pitch: 0.0,
            distance: 1.0,
            sensitivity: 0.25,
            zoom_step: 1.1,
            min_distance: 2.0,
            max_distance: 2000.0,
            mouse_pressed: false,
            last_mouse_pos: None,
        };
        controller.apply_framing(framing);
        controller
    }

    pub fn apply_framing(&mut self, framing: Framing) {
        self.yaw = framing.yaw;
        self.pitch = framing.pitch;
        self.distance = framing.distance.clamp(self.min_distance, self.max_distance);
    }

    pub fn process_mouse_button(&mut self, state: ElementState) {
        if state == ElementState::Pressed {
            self.mouse_pressed = true;
        } else {
            self.mouse_pressed = false;
            self.last_mouse_pos = None;
        }
    }

    pub fn process_cursor_move(&mut self, pos: winit::dpi::PhysicalPosition<f64>) {
        if !self.mouse_pressed {
            return;
        }
        let current_pos = vec2(pos.x, pos.y);
        if let Some(last_pos) = self.last_mouse_pos {
            let delta = current_pos - last_pos;
            self.yaw -= delta.x as f32 * self.sensitivity;
            self.pitch += delta.y as f32 * self.sensitivity;
        }
        self.last_mouse_pos = Some(current_pos);
    }

    pub fn process_scroll(&mut self, delta: winit::event::MouseScrollDelta) {
        let lines = match delta {
            winit::event::MouseScrollDelta::LineDelta(_x, y) => y,
            winit::event::MouseScrollDelta::PixelDelta(pos) => pos.y as f32 * 0.02,
        };
        self.distance = (self.distance * self.zoom_step.powf(-lines))
            .clamp(self.min_distance, self.max_distance);
    }

    /// Places `camera` on its orbit around `target`.
    pub fn update_camera(&mut self, camera: &mut Camera, target: Point3<f32>) {
        self.pitch = self.pitch.clamp(-89.0, 89.0);

        let yaw_rad = self.yaw.to_radians();
        let pitch_rad = self.pitch.to_radians();
        let offset = Vector3::new(
            yaw_rad.cos() * pitch_rad.cos(),
            pitch_rad.sin(),
            yaw_rad.sin() * pitch_rad.cos(),
        ) * self.distance;

        camera.eye = target + offset;
        camera.target = target;
        camera.up = Vector3::unit_y();
    }
}
