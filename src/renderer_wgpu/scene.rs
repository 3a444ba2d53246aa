use std::path::Path;

use anyhow::Result;
use glam::{Mat4, Vec3};

use crate::scene_core::time_of_day::Lighting;

use super::geometry::{build_plane, build_uv_sphere, GpuMesh};
use super::material::{
    FrameBindGroup, FrameUniform, Material, ObjectBindGroup, ObjectUniform, TextureSlot,
};
use super::pipeline::{create_lit_pipeline, DepthTexture};
use super::sky_pass::SkyPass;
use super::texture::{create_material_sampler, SceneTexture};

const GROUND_SCALE: f32 = 50.0;
const GROUND_TILING: f32 = 5.0;
const OBJECT_SPACING: f32 = 4.0;
const OBJECT_HEIGHT: f32 = 1.0;
const CHECKER_SIZE: u32 = 1024;
const CHECKER_CELL: u32 = 64;

/// Emissive modulation for the pulsing entry: sin(t) + 1, so it swings
/// between 0 (dark) and 2 (overdriven white).
pub fn emissive_pulse(elapsed_seconds: f32) -> f32 {
    elapsed_seconds.sin() + 1.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MeshRef {
    Ground,
    Object,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MaterialKind {
    Checkers = 0,
    Metal = 1,
    Wood = 2,
    Asphalt = 3,
}

struct EntryDesc {
    label: &'static str,
    mesh: MeshRef,
    material: MaterialKind,
    transform: Mat4,
    pulse_emissive: bool,
}

/// The fixed draw list: ground first, then the three showcase objects at
/// fixed spacing along X. Transforms derive from constants only.
fn entry_descs() -> [EntryDesc; 4] {
    [
        EntryDesc {
            label: "ground",
            mesh: MeshRef::Ground,
            material: MaterialKind::Checkers,
            transform: Mat4::from_scale(Vec3::new(GROUND_SCALE, 1.0, GROUND_SCALE)),
            pulse_emissive: false,
        },
        EntryDesc {
            label: "metal-object",
            mesh: MeshRef::Object,
            material: MaterialKind::Metal,
            transform: Mat4::from_translation(Vec3::new(-OBJECT_SPACING, OBJECT_HEIGHT, 0.0)),
            pulse_emissive: false,
        },
        EntryDesc {
            label: "wood-object",
            mesh: MeshRef::Object,
            material: MaterialKind::Wood,
            transform: Mat4::from_translation(Vec3::new(0.0, OBJECT_HEIGHT, 0.0)),
            pulse_emissive: false,
        },
        EntryDesc {
            label: "asphalt-object",
            mesh: MeshRef::Object,
            material: MaterialKind::Asphalt,
            transform: Mat4::from_translation(Vec3::new(OBJECT_SPACING, OBJECT_HEIGHT, 0.0)),
            pulse_emissive: true,
        },
    ]
}

struct SceneEntry {
    mesh: MeshRef,
    material: usize,
    transform: Mat4,
    pulse_emissive: bool,
    object: ObjectBindGroup,
}

pub struct SceneRenderer {
    frame_bg: FrameBindGroup,
    depth: DepthTexture,
    lit_pipeline: wgpu::RenderPipeline,
    materials: Vec<Material>,
    ground_mesh: GpuMesh,
    object_mesh: GpuMesh,
    entries: Vec<SceneEntry>,
    sky: SkyPass,
}

impl SceneRenderer {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        config: &wgpu::SurfaceConfiguration,
        texture_dir: &Path,
    ) -> Result<Self> {
        let frame_bg = FrameBindGroup::new(device);
        let object_layout = ObjectBindGroup::create_layout(device);
        let material_layout = Material::create_layout(device);
        let sampler = create_material_sampler(device);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("lit-shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/lit.wgsl").into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("lit-pipeline-layout"),
            bind_group_layouts: &[&frame_bg.layout, &object_layout, &material_layout],
            push_constant_ranges: &[],
        });

        let lit_pipeline =
            create_lit_pipeline(device, config, &pipeline_layout, &shader, "lit-pipeline");

        let ground_mesh = GpuMesh::upload(device, &build_plane(GROUND_TILING), "ground");
        let object_mesh = GpuMesh::upload(device, &build_uv_sphere(24, 48), "object");

        // Material order matches MaterialKind.
        let materials = vec![
            checkers_material(device, queue, &material_layout, &sampler),
            file_backed_material(
                device,
                queue,
                &material_layout,
                &sampler,
                texture_dir,
                "Metal",
                METAL_FALLBACK,
            )?,
            file_backed_material(
                device,
                queue,
                &material_layout,
                &sampler,
                texture_dir,
                "Wood",
                WOOD_FALLBACK,
            )?,
            file_backed_material(
                device,
                queue,
                &material_layout,
                &sampler,
                texture_dir,
                "Asphalt",
                ASPHALT_FALLBACK,
            )?,
        ];

        let entries = entry_descs()
            .into_iter()
            .map(|desc| SceneEntry {
                mesh: desc.mesh,
                material: desc.material as usize,
                transform: desc.transform,
                pulse_emissive: desc.pulse_emissive,
                object: ObjectBindGroup::new(device, &object_layout, desc.label),
            })
            .collect();

        let sky = SkyPass::new(device, config, &frame_bg.layout);

        Ok(Self {
            frame_bg,
            depth: DepthTexture::new(device, config, "scene-depth"),
            lit_pipeline,
            materials,
            ground_mesh,
            object_mesh,
            entries,
            sky,
        })
    }

    pub fn resize(&mut self, device: &wgpu::Device, config: &wgpu::SurfaceConfiguration) {
        self.depth = DepthTexture::new(device, config, "scene-depth");
    }

    /// Writes all per-frame uniforms: the shared frame block, one complete
    /// uniform set per entry, and the sky block.
    pub fn update_frame(
        &self,
        queue: &wgpu::Queue,
        view_proj: Mat4,
        camera_position: Vec3,
        lighting: &Lighting,
        elapsed_seconds: f32,
    ) {
        self.frame_bg
            .update(queue, &FrameUniform::new(view_proj, camera_position, lighting));

        for entry in &self.entries {
            let emissive_tint = if entry.pulse_emissive {
                Vec3::ONE * emissive_pulse(elapsed_seconds)
            } else {
                Vec3::ONE
            };
            entry
                .object
                .update(queue, &ObjectUniform::new(entry.transform, emissive_tint));
        }

        self.sky.update(queue, camera_position, lighting);
    }

    /// One frame's draw sequence: lit entries in fixed order, sky dome last.
    pub fn render(&self, pass: &mut wgpu::RenderPass) {
        pass.set_bind_group(0, &self.frame_bg.bind_group, &[]);
        pass.set_pipeline(&self.lit_pipeline);

        for entry in &self.entries {
            pass.set_bind_group(1, &entry.object.bind_group, &[]);
            pass.set_bind_group(2, &self.materials[entry.material].bind_group, &[]);
            let mesh = match entry.mesh {
                MeshRef::Ground => &self.ground_mesh,
                MeshRef::Object => &self.object_mesh,
            };
            mesh.draw(pass);
        }

        self.sky.render(pass);
    }

    pub fn depth_view(&self) -> &wgpu::TextureView {
        &self.depth.view
    }
}

/// Per-slot fallback colors used when no texture file is present.
type MaterialFallback = [[f32; 4]; 5];

const METAL_FALLBACK: MaterialFallback = [
    [0.56, 0.57, 0.58, 1.0],
    [0.9, 0.9, 0.9, 1.0],
    [0.35, 0.35, 0.35, 1.0],
    [1.0, 1.0, 1.0, 1.0],
    [0.0, 0.0, 0.0, 1.0],
];

const WOOD_FALLBACK: MaterialFallback = [
    [0.42, 0.27, 0.15, 1.0],
    [0.15, 0.15, 0.15, 1.0],
    [0.8, 0.8, 0.8, 1.0],
    [1.0, 1.0, 1.0, 1.0],
    [0.0, 0.0, 0.0, 1.0],
];

const ASPHALT_FALLBACK: MaterialFallback = [
    [0.13, 0.13, 0.14, 1.0],
    [0.08, 0.08, 0.08, 1.0],
    [0.9, 0.9, 0.9, 1.0],
    [1.0, 1.0, 1.0, 1.0],
    [0.9, 0.35, 0.1, 1.0],
];

/// Builds a material from `<dir>/<Name>_<suffix>.{png,jpg}` where present,
/// falling back to a single-color texture per missing slot. A file that
/// exists but fails to decode aborts initialization.
fn file_backed_material(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    layout: &wgpu::BindGroupLayout,
    sampler: &wgpu::Sampler,
    dir: &Path,
    name: &str,
    fallback: MaterialFallback,
) -> Result<Material> {
    let mut textures = Vec::with_capacity(5);
    for slot in TextureSlot::ALL {
        let stem = format!("{name}_{}", slot.file_suffix());
        let path = ["png", "jpg"]
            .iter()
            .map(|ext| dir.join(format!("{stem}.{ext}")))
            .find(|p| p.exists());

        let texture = match path {
            Some(path) => SceneTexture::from_file(device, queue, &path)?,
            None => {
                log::info!("no {stem} texture in {}, using flat color", dir.display());
                SceneTexture::single_color(device, queue, fallback[slot.index() as usize], &stem)
            }
        };
        textures.push(texture);
    }

    let textures: [SceneTexture; 5] = textures
        .try_into()
        .map_err(|_| anyhow::anyhow!("material {name} did not produce 5 textures"))?;
    Ok(Material::new(device, layout, sampler, textures, name))
}

/// The fully procedural ground material.
fn checkers_material(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    layout: &wgpu::BindGroupLayout,
    sampler: &wgpu::Sampler,
) -> Material {
    let white = [1.0, 1.0, 1.0, 1.0];
    let black = [0.0, 0.0, 0.0, 1.0];
    let textures = [
        SceneTexture::checkerboard(
            device,
            queue,
            CHECKER_SIZE,
            CHECKER_CELL,
            white,
            black,
            "checkers-albedo",
        ),
        SceneTexture::checkerboard(
            device,
            queue,
            CHECKER_SIZE,
            CHECKER_CELL,
            [0.2, 0.2, 0.2, 1.0],
            white,
            "checkers-specular",
        ),
        SceneTexture::checkerboard(
            device,
            queue,
            CHECKER_SIZE,
            CHECKER_CELL,
            [0.9, 0.9, 0.9, 1.0],
            [0.4, 0.4, 0.4, 1.0],
            "checkers-roughness",
        ),
        SceneTexture::single_color(device, queue, white, "checkers-ao"),
        SceneTexture::single_color(device, queue, black, "checkers-emissive"),
    ];
    Material::new(device, layout, sampler, textures, "checkers")
}

#[cfg(test)]
mod tests {
    use super::{emissive_pulse, entry_descs, MaterialKind, MeshRef};
    use approx::assert_relative_eq;
    use glam::Vec3;
    use std::f32::consts::{FRAC_PI_2, PI};

    #[test]
    fn emissive_pulse_hits_its_extremes() {
        assert_relative_eq!(emissive_pulse(FRAC_PI_2), 2.0, epsilon = 1e-6);
        assert_relative_eq!(emissive_pulse(3.0 * FRAC_PI_2), 0.0, epsilon = 1e-6);
        assert_relative_eq!(emissive_pulse(0.0), 1.0);
        assert_relative_eq!(emissive_pulse(PI), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn draw_list_order_and_transforms_are_fixed() {
        let descs = entry_descs();
        assert_eq!(descs[0].material, MaterialKind::Checkers);
        assert_eq!(descs[0].mesh, MeshRef::Ground);
        assert_eq!(descs[1].material, MaterialKind::Metal);
        assert_eq!(descs[2].material, MaterialKind::Wood);
        assert_eq!(descs[3].material, MaterialKind::Asphalt);

        // ground scaled 50x on X/Z only
        let ground = descs[0].transform;
        assert_relative_eq!(ground.x_axis.x, 50.0);
        assert_relative_eq!(ground.y_axis.y, 1.0);
        assert_relative_eq!(ground.z_axis.z, 50.0);

        // objects spaced along X at y = 1
        let positions: Vec<Vec3> = descs[1..]
            .iter()
            .map(|d| d.transform.w_axis.truncate())
            .collect();
        assert_eq!(
            positions,
            vec![
                Vec3::new(-4.0, 1.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
                Vec3::new(4.0, 1.0, 0.0),
            ]
        );
    }

    #[test]
    fn only_the_asphalt_entry_pulses() {
        let descs = entry_descs();
        let pulses: Vec<bool> = descs.iter().map(|d| d.pulse_emissive).collect();
        assert_eq!(pulses, vec![false, false, false, true]);
    }
}
