use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use wgpu::util::DeviceExt;

use crate::scene_core::time_of_day::Lighting;

use super::texture::SceneTexture;

/// Semantic texture slots of a material, in the fixed order the lit shader
/// binds them (bindings 0..4). Reordering this enum breaks the shader
/// contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureSlot {
    Albedo,
    Specular,
    Roughness,
    AmbientOcclusion,
    Emissive,
}

impl TextureSlot {
    pub const ALL: [TextureSlot; 5] = [
        TextureSlot::Albedo,
        TextureSlot::Specular,
        TextureSlot::Roughness,
        TextureSlot::AmbientOcclusion,
        TextureSlot::Emissive,
    ];

    pub fn index(self) -> u32 {
        self as u32
    }

    /// Filename suffix used for file-backed material textures
    /// (`<Material>_<suffix>.png`).
    pub fn file_suffix(self) -> &'static str {
        match self {
            TextureSlot::Albedo => "col",
            TextureSlot::Specular => "spc",
            TextureSlot::Roughness => "rgh",
            TextureSlot::AmbientOcclusion => "ao",
            TextureSlot::Emissive => "em",
        }
    }
}

#[repr(C)]
#[derive(Clone, Copy, Zeroable, Pod)]
pub struct FrameUniform {
    pub view_proj: [[f32; 4]; 4],
    pub camera_position: [f32; 4],
    pub light_color: [f32; 4],
    pub light_direction: [f32; 4],
    pub ambient: [f32; 4],
}

impl FrameUniform {
    pub fn new(view_proj: Mat4, camera_position: Vec3, lighting: &Lighting) -> Self {
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            camera_position: camera_position.extend(0.0).to_array(),
            light_color: lighting.sun_color.extend(0.0).to_array(),
            light_direction: lighting.light_direction.extend(0.0).to_array(),
            ambient: lighting.ambient.extend(0.0).to_array(),
        }
    }
}

pub struct FrameBindGroup {
    pub layout: wgpu::BindGroupLayout,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
}

impl FrameBindGroup {
    pub fn new(device: &wgpu::Device) -> Self {
        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("frame-bind-group-layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let initial = FrameUniform {
            view_proj: Mat4::IDENTITY.to_cols_array_2d(),
            camera_position: [0.0; 4],
            light_color: [0.0; 4],
            light_direction: [0.0; 4],
            ambient: [0.0; 4],
        };
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("frame-uniform-buffer"),
            contents: bytemuck::cast_slice(&[initial]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("frame-bind-group"),
            layout: &layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });

        Self {
            layout,
            buffer,
            bind_group,
        }
    }

    pub fn update(&self, queue: &wgpu::Queue, uniform: &FrameUniform) {
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[*uniform]));
    }
}

/// Per-entry uniform set. Every field is fully specified for every entry on
/// every frame, so no draw inherits tint state from a prior one.
#[repr(C)]
#[derive(Clone, Copy, Zeroable, Pod)]
pub struct ObjectUniform {
    pub model: [[f32; 4]; 4],
    /// Inverse-transpose of the model matrix, for normals under non-uniform
    /// scale (the ground is scaled 50x on X/Z only).
    pub normal_matrix: [[f32; 4]; 4],
    pub albedo_tint: [f32; 4],
    pub specular_tint: [f32; 4],
    pub emissive_tint: [f32; 4],
    /// x = roughness scale; remaining lanes are padding.
    pub params: [f32; 4],
}

impl ObjectUniform {
    pub fn new(model: Mat4, emissive_tint: Vec3) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            normal_matrix: model.inverse().transpose().to_cols_array_2d(),
            albedo_tint: [1.0, 1.0, 1.0, 1.0],
            specular_tint: [1.0, 1.0, 1.0, 1.0],
            emissive_tint: emissive_tint.extend(1.0).to_array(),
            params: [1.0, 0.0, 0.0, 0.0],
        }
    }
}

pub struct ObjectBindGroup {
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
}

impl ObjectBindGroup {
    pub fn create_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("object-bind-group-layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        })
    }

    pub fn new(device: &wgpu::Device, layout: &wgpu::BindGroupLayout, label: &str) -> Self {
        let initial = ObjectUniform::new(Mat4::IDENTITY, Vec3::ONE);
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label}-object-buffer")),
            contents: bytemuck::cast_slice(&[initial]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("{label}-object-bind-group")),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });

        Self { buffer, bind_group }
    }

    pub fn update(&self, queue: &wgpu::Queue, uniform: &ObjectUniform) {
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[*uniform]));
    }
}

/// A material is exactly five textures bound in `TextureSlot` order plus the
/// shared sampler. It exclusively owns its texture resources.
pub struct Material {
    _textures: [SceneTexture; 5],
    pub bind_group: wgpu::BindGroup,
}

impl Material {
    pub fn create_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
        let texture_entry = |binding: u32| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Texture {
                sample_type: wgpu::TextureSampleType::Float { filterable: true },
                view_dimension: wgpu::TextureViewDimension::D2,
                multisampled: false,
            },
            count: None,
        };

        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("material-bind-group-layout"),
            entries: &[
                texture_entry(0),
                texture_entry(1),
                texture_entry(2),
                texture_entry(3),
                texture_entry(4),
                wgpu::BindGroupLayoutEntry {
                    binding: 5,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        })
    }

    pub fn new(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
        textures: [SceneTexture; 5],
        label: &str,
    ) -> Self {
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("{label}-material-bind-group")),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&textures[0].view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&textures[1].view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureView(&textures[2].view),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: wgpu::BindingResource::TextureView(&textures[3].view),
                },
                wgpu::BindGroupEntry {
                    binding: 4,
                    resource: wgpu::BindingResource::TextureView(&textures[4].view),
                },
                wgpu::BindGroupEntry {
                    binding: 5,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        });

        Self {
            _textures: textures,
            bind_group,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{FrameUniform, ObjectUniform, TextureSlot};
    use crate::scene_core::sun::SunAngles;
    use crate::scene_core::time_of_day::Lighting;
    use approx::assert_relative_eq;
    use glam::{Mat4, Vec3};

    #[test]
    fn texture_slots_bind_in_fixed_order() {
        let indices: Vec<u32> = TextureSlot::ALL.iter().map(|s| s.index()).collect();
        assert_eq!(indices, [0, 1, 2, 3, 4]);
        assert_eq!(TextureSlot::Albedo.file_suffix(), "col");
        assert_eq!(TextureSlot::Emissive.file_suffix(), "em");
    }

    #[test]
    fn frame_uniform_carries_the_negated_sun_direction() {
        let lighting = Lighting::from_sun(&SunAngles::new(0.0, 0.0));
        let uniform = FrameUniform::new(Mat4::IDENTITY, Vec3::ZERO, &lighting);
        assert_relative_eq!(uniform.light_direction[0], -1.0);
        assert_relative_eq!(uniform.light_direction[1], 0.0);
        assert_relative_eq!(uniform.light_direction[2], 0.0);
    }

    #[test]
    fn normal_matrix_undoes_non_uniform_scale() {
        let model = Mat4::from_scale(Vec3::new(50.0, 1.0, 50.0));
        let uniform = ObjectUniform::new(model, Vec3::ONE);
        assert_relative_eq!(uniform.normal_matrix[0][0], 1.0 / 50.0);
        assert_relative_eq!(uniform.normal_matrix[1][1], 1.0);
        assert_relative_eq!(uniform.normal_matrix[2][2], 1.0 / 50.0);
    }
}
