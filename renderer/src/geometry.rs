/// Module for generating 3D geometric primitives

use std::f32::consts::PI;

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl Vertex {
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<Vertex>() as wgpu::BufferAddress,
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
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}

/// CPU-side mesh, uploaded once at startup.
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u16>,
}

/// Generates a UV sphere centred on the origin.
pub fn generate_sphere(radius: f32, latitude_segments: u32, longitude_segments: u32) -> MeshData {
    let mut vertices = Vec::new();
    let mut indices = Vec::new();

    for lat in 0..=latitude_segments {
        let theta = lat as f32 * PI / latitude_segments as f32; // 0 to PI
        let sin_theta = theta.sin();
        let cos_theta = theta.cos();

        for lon in 0..=longitude_segments {
            let phi = lon as f32 * 2.0 * PI / longitude_segments as f32; // 0 to 2*PI
            let normal = [sin_theta * phi.cos(), cos_theta, sin_theta * phi.sin()];

            vertices.push(Vertex {
                position: [radius * normal[0], radius * normal[1], radius * normal[2]],
                normal,
            });
        }
    }

    for lat in 0..latitude_segments {
        for lon in 0..longitude_segments {
            let current_row = lat * (longitude_segments + 1);
            let next_row = (lat + 1) * (longitude_segments + 1);

            let current = (current_row + lon) as u16;
            let current_next = (current_row + lon + 1) as u16;
            let next = (next_row + lon) as u16;
            let next_next = (next_row + lon + 1) as u16;

            // Skip the degenerate halves of the quads touching the poles
            if lat == 0 {
                indices.extend_from_slice(&[current, next, next_next]);
            } else if lat == latitude_segments - 1 {
                indices.extend_from_slice(&[current, current_next, next]);
            } else {
                indices.extend_from_slice(&[
                    current, next, current_next,
                    current_next, next, next_next,
                ]);
            }
        }
    }

    MeshData { vertices, indices }
}

/// Generates a unit cube (edge length 1) centred on the origin, with flat
/// per-face normals.
pub fn generate_box() -> MeshData {
    // (normal, u axis, v axis) per face; u × v = normal keeps the winding CCW.
    let faces: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
        ([1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]),
        ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
        ([0.0, 1.0, 0.0], [0.0, 0.0, 1.0], [1.0, 0.0, 0.0]),
        ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
        ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ([0.0, 0.0, -1.0], [0.0, 1.0, 0.0], [1.0, 0.0, 0.0]),
    ];

    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);

    for (normal, u, v) in faces {
        let base = vertices.len() as u16;
        for (su, sv) in [(-0.5, -0.5), (0.5, -0.5), (0.5, 0.5), (-0.5, 0.5)] {
            let position = [
                0.5 * normal[0] + su * u[0] + sv * v[0],
                0.5 * normal[1] + su * u[1] + sv * v[1],
                0.5 * normal[2] + su * u[2] + sv * v[2],
            ];
            vertices.push(Vertex { position, normal });
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    MeshData { vertices, indices }
}
