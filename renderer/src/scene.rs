//! Turns a simulation frame into GPU instance data for the two views.

use cgmath::{EuclideanSpace, Matrix4, Point3, Vector3};
use simulation::{BodyKind, BodyPlacement, Frame, PhysicsReader, PlatformPose, Scenario};

use crate::camera::Framing;

const MIRROR_THICKNESS: f32 = 0.08;
const POST_WIDTH: f32 = 0.06;
const PHOTON_RADIUS: f32 = 0.12;

const MIRROR_COLOR: [f32; 4] = [0.75, 0.78, 0.82, 0.0];
const POST_COLOR: [f32; 4] = [0.35, 0.37, 0.42, 0.0];
// Alpha doubles as the emissive amount in the shader.
const PHOTON_COLOR: [f32; 4] = [1.0, 0.95, 0.4, 1.0];
const TRAIL_HEAD_COLOR: [f32; 3] = [1.0, 0.85, 0.3];

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Instance {
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
}

impl Instance {
    fn new(model: Matrix4<f32>, color: [f32; 4]) -> Self {
        Self {
            model: model.into(),
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        const ROW: wgpu::BufferAddress = mem::size_of::<[f32; 4]>() as wgpu::BufferAddress;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<Instance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: ROW,
                    shader_location: 3,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: ROW * 2,
                    shader_location: 4,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: ROW * 3,
                    shader_location: 5,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: ROW * 4,
                    shader_location: 6,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LineVertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

impl LineVertex {
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<LineVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Instances for one view, split by the mesh they are drawn with.
#[derive(Debug, Default)]
pub struct ViewInstances {
    pub spheres: Vec<Instance>,
    pub boxes: Vec<Instance>,
}

/// Default primary-camera placement for a scenario.
pub fn framing_for(scenario: Scenario) -> Framing {
    match scenario {
        Scenario::Linear => Framing {
            distance: 12.0,
            pitch: 15.0,
            yaw: 90.0,
            follow_platform: true,
        },
        Scenario::EarthOrbit => Framing {
            distance: 32.0,
            pitch: 35.0,
            yaw: 90.0,
            follow_platform: false,
        },
        Scenario::SolarSystem => Framing {
            distance: 90.0,
            pitch: 40.0,
            yaw: 90.0,
            follow_platform: false,
        },
        Scenario::Galaxy => Framing {
            distance: 60.0,
            pitch: 30.0,
            yaw: 90.0,
            follow_platform: true,
        },
    }
}

/// What the primary camera orbits around.
pub fn camera_target(frame: &Frame<'_>, framing: &Framing) -> Point3<f32> {
    if framing.follow_platform {
        frame.scene.platform.position
    } else {
        Point3::origin()
    }
}

fn body_color(kind: BodyKind) -> [f32; 4] {
    match kind {
        BodyKind::Earth => [0.2, 0.45, 0.9, 0.0],
        BodyKind::Star => [1.0, 0.8, 0.35, 1.0],
        BodyKind::Planet => [0.8, 0.45, 0.3, 0.0],
        BodyKind::GalacticCore => [0.85, 0.75, 1.0, 0.8],
    }
}

fn body_instance(body: &BodyPlacement) -> Instance {
    Instance::new(
        Matrix4::from_translation(body.position.to_vec()) * Matrix4::from_scale(body.radius),
        body_color(body.kind),
    )
}

/// Two mirrors and a back post, in the platform's local frame.
fn clock_boxes(pose: &PlatformPose, arm_length: f32, out: &mut Vec<Instance>) {
    let platform = pose.to_matrix();
    let mirror = Matrix4::from_nonuniform_scale(1.0, MIRROR_THICKNESS, 1.0);

    out.push(Instance::new(
        platform * Matrix4::from_translation(Vector3::new(0.0, -MIRROR_THICKNESS * 0.5, 0.0)) * mirror,
        MIRROR_COLOR,
    ));
    out.push(Instance::new(
        platform
            * Matrix4::from_translation(Vector3::new(0.0, arm_length + MIRROR_THICKNESS * 0.5, 0.0))
            * mirror,
        MIRROR_COLOR,
    ));
    out.push(Instance::new(
        platform
            * Matrix4::from_translation(Vector3::new(0.0, arm_length * 0.5, -0.5 + POST_WIDTH * 0.5))
            * Matrix4::from_nonuniform_scale(POST_WIDTH, arm_length, POST_WIDTH),
        POST_COLOR,
    ));
}

fn photon_instance(position: Point3<f32>) -> Instance {
    Instance::new(
        Matrix4::from_translation(position.to_vec()) * Matrix4::from_scale(PHOTON_RADIUS),
        PHOTON_COLOR,
    )
}

/// The scenario world: bodies, the moving clock and its photon.
pub fn primary_instances(frame: &Frame<'_>) -> ViewInstances {
    let mut view = ViewInstances::default();
    view.spheres.extend(frame.scene.bodies.iter().map(body_instance));
    view.spheres.push(photon_instance(frame.photon_world));
    clock_boxes(&frame.scene.platform, frame.arm_length, &mut view.boxes);
    view
}

/// The co-moving view: the clock at rest at the origin, the photon bouncing
/// straight up and down.
pub fn relative_instances(physics: &PhysicsReader, arm_length: f32) -> ViewInstances {
    let pose = PlatformPose::default();
    let mut view = ViewInstances::default();
    view.spheres
        .push(photon_instance(pose.photon_position(physics.phase(), arm_length)));
    clock_boxes(&pose, arm_length, &mut view.boxes);
    view
}

/// Trail as a line strip, oldest point dimmest.
pub fn trail_vertices(frame: &Frame<'_>) -> Vec<LineVertex> {
    let count = frame.trail.len();
    frame
        .trail
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let fade = (i + 1) as f32 / count as f32;
            LineVertex {
                position: [p.x, p.y, p.z],
                color: [
                    TRAIL_HEAD_COLOR[0] * fade,
                    TRAIL_HEAD_COLOR[1] * fade,
                    TRAIL_HEAD_COLOR[2] * fade,
                    1.0,
                ],
            }
        })
        .collect()
}
