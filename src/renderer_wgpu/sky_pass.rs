use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use wgpu::util::DeviceExt;

use crate::scene_core::time_of_day::Lighting;

use super::geometry::{build_box, GpuMesh};
use super::pipeline::create_sky_pipeline;

pub const SUN_DISC_SIZE: f32 = 0.02;
pub const SUN_HALO_SIZE: f32 = 0.02;
pub const SUN_BRIGHTNESS: f32 = 1.0;
pub const SKY_SMOOTHNESS: f32 = 0.5;

/// Horizon color: the sky color pushed a quarter of the way toward white.
fn sky_bottom_color(sky_color: Vec3) -> Vec3 {
    Vec3::ONE - 0.25 * (Vec3::ONE - sky_color)
}

#[repr(C)]
#[derive(Clone, Copy, Zeroable, Pod)]
struct SkyUniform {
    /// Translates the dome to the camera so it stays centered on the viewer.
    model: [[f32; 4]; 4],
    /// Points toward the sun (not negated like the lit pass direction).
    sun_direction: [f32; 4],
    sun_color: [f32; 4],
    sky_top_color: [f32; 4],
    sky_bottom_color: [f32; 4],
    /// x = disc size, y = halo size, z = brightness, w = gradient smoothness.
    params: [f32; 4],
}

pub struct SkyPass {
    pipeline: wgpu::RenderPipeline,
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    dome: GpuMesh,
}

impl SkyPass {
    pub fn new(
        device: &wgpu::Device,
        config: &wgpu::SurfaceConfiguration,
        frame_layout: &wgpu::BindGroupLayout,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("sky-shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/sky.wgsl").into()),
        });

        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("sky-bind-group-layout"),
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

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("sky-pipeline-layout"),
            bind_group_layouts: &[frame_layout, &layout],
            push_constant_ranges: &[],
        });

        let pipeline = create_sky_pipeline(device, config, &pipeline_layout, &shader, "sky-pipeline");

        let initial = SkyUniform {
            model: Mat4::IDENTITY.to_cols_array_2d(),
            sun_direction: [0.0, 1.0, 0.0, 0.0],
            sun_color: [0.0; 4],
            sky_top_color: [0.0; 4],
            sky_bottom_color: [0.0; 4],
            params: [SUN_DISC_SIZE, SUN_HALO_SIZE, SUN_BRIGHTNESS, SKY_SMOOTHNESS],
        };
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("sky-uniform-buffer"),
            contents: bytemuck::cast_slice(&[initial]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("sky-bind-group"),
            layout: &layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });

        let dome = GpuMesh::upload(device, &build_box(), "sky-dome");

        Self {
            pipeline,
            buffer,
            bind_group,
            dome,
        }
    }

    pub fn update(&self, queue: &wgpu::Queue, camera_position: Vec3, lighting: &Lighting) {
        let uniform = SkyUniform {
            model: Mat4::from_translation(camera_position).to_cols_array_2d(),
            sun_direction: lighting.sun_direction.extend(0.0).to_array(),
            sun_color: lighting.sun_color.extend(0.0).to_array(),
            sky_top_color: lighting.sky_color.extend(0.0).to_array(),
            sky_bottom_color: sky_bottom_color(lighting.sky_color).extend(0.0).to_array(),
            params: [SUN_DISC_SIZE, SUN_HALO_SIZE, SUN_BRIGHTNESS, SKY_SMOOTHNESS],
        };
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[uniform]));
    }

    /// Drawn last; the frame bind group (group 0) is already set.
    pub fn render(&self, pass: &mut wgpu::RenderPass) {
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(1, &self.bind_group, &[]);
        self.dome.draw(pass);
    }
}

#[cfg(test)]
mod tests {
    use super::{sky_bottom_color, SKY_SMOOTHNESS, SUN_BRIGHTNESS, SUN_DISC_SIZE, SUN_HALO_SIZE};
    use approx::assert_relative_eq;
    use glam::Vec3;

    #[test]
    fn bottom_color_lightens_toward_white() {
        let sky = Vec3::new(0.04, 0.05, 0.19);
        let bottom = sky_bottom_color(sky);
        assert_relative_eq!(bottom.x, 1.0 - 0.25 * (1.0 - 0.04));
        assert_relative_eq!(bottom.y, 1.0 - 0.25 * (1.0 - 0.05));
        assert_relative_eq!(bottom.z, 1.0 - 0.25 * (1.0 - 0.19));
        // a pure-white sky is a fixed point
        assert_relative_eq!((sky_bottom_color(Vec3::ONE) - Vec3::ONE).length(), 0.0);
    }

    #[test]
    fn sun_disc_constants_match_the_scene() {
        assert_eq!(SUN_DISC_SIZE, 0.02);
        assert_eq!(SUN_HALO_SIZE, 0.02);
        assert_eq!(SUN_BRIGHTNESS, 1.0);
        assert_eq!(SKY_SMOOTHNESS, 0.5);
    }
}
