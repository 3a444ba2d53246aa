use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

#[repr(C)]
#[derive(Clone, Copy, Debug, Zeroable, Pod)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex {
    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Self>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[
            wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x3,
            },
            wgpu::VertexAttribute {
                offset: 12,
                shader_location: 1,
                format: wgpu::VertexFormat::Float32x3,
            },
            wgpu::VertexAttribute {
                offset: 24,
                shader_location: 2,
                format: wgpu::VertexFormat::Float32x2,
            },
        ],
    };
}

pub struct CpuMesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

/// Unit ground plane on XZ at y = 0, spanning [-1, 1] on both axes, facing
/// +Y. `tiling` repeats the texture across the plane.
pub fn build_plane(tiling: f32) -> CpuMesh {
    let n = [0.0, 1.0, 0.0];
    let vertices = vec![
        Vertex {
            position: [-1.0, 0.0, -1.0],
            normal: n,
            uv: [0.0, 0.0],
        },
        Vertex {
            position: [1.0, 0.0, -1.0],
            normal: n,
            uv: [tiling, 0.0],
        },
        Vertex {
            position: [1.0, 0.0, 1.0],
            normal: n,
            uv: [tiling, tiling],
        },
        Vertex {
            position: [-1.0, 0.0, 1.0],
            normal: n,
            uv: [0.0, tiling],
        },
    ];
    let indices = vec![0, 3, 1, 1, 3, 2];
    CpuMesh { vertices, indices }
}

fn push_quad(mesh: &mut CpuMesh, corners: [[f32; 3]; 4], normal: [f32; 3]) {
    let base = mesh.vertices.len() as u32;
    let uvs = [[0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]];
    for (corner, uv) in corners.iter().zip(uvs) {
        mesh.vertices.push(Vertex {
            position: *corner,
            normal,
            uv,
        });
    }
    mesh.indices
        .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
}

/// Unit box centered on the origin, outward normals, CCW winding viewed from
/// outside. Doubles as the sky dome mesh (drawn with front-face culling so
/// the interior is visible from within).
pub fn build_box() -> CpuMesh {
    let mut mesh = CpuMesh {
        vertices: Vec::with_capacity(24),
        indices: Vec::with_capacity(36),
    };

    push_quad(
        &mut mesh,
        [
            [-1.0, -1.0, 1.0],
            [1.0, -1.0, 1.0],
            [1.0, 1.0, 1.0],
            [-1.0, 1.0, 1.0],
        ],
        [0.0, 0.0, 1.0],
    );
    push_quad(
        &mut mesh,
        [
            [1.0, -1.0, -1.0],
            [-1.0, -1.0, -1.0],
            [-1.0, 1.0, -1.0],
            [1.0, 1.0, -1.0],
        ],
        [0.0, 0.0, -1.0],
    );
    push_quad(
        &mut mesh,
        [
            [1.0, -1.0, 1.0],
            [1.0, -1.0, -1.0],
            [1.0, 1.0, -1.0],
            [1.0, 1.0, 1.0],
        ],
        [1.0, 0.0, 0.0],
    );
    push_quad(
        &mut mesh,
        [
            [-1.0, -1.0, -1.0],
            [-1.0, -1.0, 1.0],
            [-1.0, 1.0, 1.0],
            [-1.0, 1.0, -1.0],
        ],
        [-1.0, 0.0, 0.0],
    );
    push_quad(
        &mut mesh,
        [
            [-1.0, 1.0, 1.0],
            [1.0, 1.0, 1.0],
            [1.0, 1.0, -1.0],
            [-1.0, 1.0, -1.0],
        ],
        [0.0, 1.0, 0.0],
    );
    push_quad(
        &mut mesh,
        [
            [-1.0, -1.0, -1.0],
            [1.0, -1.0, -1.0],
            [1.0, -1.0, 1.0],
            [-1.0, -1.0, 1.0],
        ],
        [0.0, -1.0, 0.0],
    );

    mesh
}

/// UV sphere of radius 1 centered on the origin. Stands in for the showcase
/// object mesh; normals equal the positions.
pub fn build_uv_sphere(stacks: u32, sectors: u32) -> CpuMesh {
    use std::f32::consts::{PI, TAU};

    let mut vertices = Vec::with_capacity(((stacks + 1) * (sectors + 1)) as usize);
    for i in 0..=stacks {
        let phi = PI / 2.0 - PI * i as f32 / stacks as f32;
        let (y, r) = (phi.sin(), phi.cos());
        for j in 0..=sectors {
            let theta = TAU * j as f32 / sectors as f32;
            let position = [r * theta.cos(), y, r * theta.sin()];
            vertices.push(Vertex {
                position,
                normal: position,
                uv: [j as f32 / sectors as f32, i as f32 / stacks as f32],
            });
        }
    }

    let mut indices = Vec::with_capacity((stacks * sectors * 6) as usize);
    for i in 0..stacks {
        for j in 0..sectors {
            let k1 = i * (sectors + 1) + j;
            let k2 = k1 + sectors + 1;
            if i != 0 {
                indices.extend_from_slice(&[k1, k1 + 1, k2]);
            }
            if i != stacks - 1 {
                indices.extend_from_slice(&[k1 + 1, k2 + 1, k2]);
            }
        }
    }

    CpuMesh { vertices, indices }
}

pub struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

impl GpuMesh {
    pub fn upload(device: &wgpu::Device, mesh: &CpuMesh, label: &str) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label}-vertex-buffer")),
            contents: bytemuck::cast_slice(mesh.vertices.as_slice()),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label}-index-buffer")),
            contents: bytemuck::cast_slice(mesh.indices.as_slice()),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            vertex_buffer,
            index_buffer,
            index_count: mesh.indices.len() as u32,
        }
    }

    pub fn draw(&self, pass: &mut wgpu::RenderPass) {
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::{build_box, build_plane, build_uv_sphere};
    use approx::assert_relative_eq;
    use glam::Vec3;

    #[test]
    fn plane_faces_up() {
        let plane = build_plane(5.0);
        assert_eq!(plane.vertices.len(), 4);
        assert_eq!(plane.indices.len(), 6);
        for v in &plane.vertices {
            assert_eq!(v.normal, [0.0, 1.0, 0.0]);
            assert_eq!(v.position[1], 0.0);
        }
    }

    #[test]
    fn box_has_unit_axis_aligned_normals_and_valid_indices() {
        let cube = build_box();
        assert_eq!(cube.vertices.len(), 24);
        assert_eq!(cube.indices.len(), 36);
        for v in &cube.vertices {
            let n = Vec3::from_array(v.normal);
            assert_relative_eq!(n.length(), 1.0);
            assert_eq!(n.abs().max_element(), 1.0);
        }
        for &i in &cube.indices {
            assert!((i as usize) < cube.vertices.len());
        }
    }

    #[test]
    fn sphere_normals_match_positions_and_are_unit() {
        let sphere = build_uv_sphere(12, 24);
        for v in &sphere.vertices {
            let p = Vec3::from_array(v.position);
            let n = Vec3::from_array(v.normal);
            assert_relative_eq!(p.length(), 1.0, epsilon = 1e-5);
            assert_relative_eq!((p - n).length(), 0.0, epsilon = 1e-6);
        }
        for &i in &sphere.indices {
            assert!((i as usize) < sphere.vertices.len());
        }
    }
}
