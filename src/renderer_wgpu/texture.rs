use std::path::Path;

use anyhow::{Context, Result};

/// One GPU texture plus its view. Materials own five of these for the
/// lifetime of the scene.
pub struct SceneTexture {
    _texture: wgpu::Texture,
    pub view: wgpu::TextureView,
}

impl SceneTexture {
    pub fn from_pixels(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        width: u32,
        height: u32,
        pixels: &[u8],
        label: &str,
    ) -> Self {
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            _texture: texture,
            view,
        }
    }

    /// Decodes a png/jpeg file into an RGBA texture. A corrupt file is a
    /// fatal initialization error; callers decide what a missing file means.
    pub fn from_file(device: &wgpu::Device, queue: &wgpu::Queue, path: &Path) -> Result<Self> {
        let img = image::open(path)
            .with_context(|| format!("failed to decode texture {}", path.display()))?
            .to_rgba8();
        let (width, height) = img.dimensions();
        let label = path.display().to_string();
        Ok(Self::from_pixels(
            device,
            queue,
            width,
            height,
            img.as_raw(),
            &label,
        ))
    }

    pub fn single_color(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        color: [f32; 4],
        label: &str,
    ) -> Self {
        Self::from_pixels(device, queue, 1, 1, &color_to_rgba8(color), label)
    }

    pub fn checkerboard(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        size: u32,
        cell: u32,
        a: [f32; 4],
        b: [f32; 4],
        label: &str,
    ) -> Self {
        let pixels = checkerboard_pixels(size, cell, a, b);
        Self::from_pixels(device, queue, size, size, &pixels, label)
    }
}

fn color_to_rgba8(color: [f32; 4]) -> [u8; 4] {
    color.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8)
}

fn checkerboard_pixels(size: u32, cell: u32, a: [f32; 4], b: [f32; 4]) -> Vec<u8> {
    let (a, b) = (color_to_rgba8(a), color_to_rgba8(b));
    let mut pixels = Vec::with_capacity((size * size * 4) as usize);
    for y in 0..size {
        for x in 0..size {
            let odd = ((x / cell) + (y / cell)) % 2 == 1;
            pixels.extend_from_slice(if odd { &b } else { &a });
        }
    }
    pixels
}

/// Shared sampler for all material textures: repeat addressing, bilinear.
pub fn create_material_sampler(device: &wgpu::Device) -> wgpu::Sampler {
    device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some("material-sampler"),
        address_mode_u: wgpu::AddressMode::Repeat,
        address_mode_v: wgpu::AddressMode::Repeat,
        address_mode_w: wgpu::AddressMode::Repeat,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        mipmap_filter: wgpu::FilterMode::Nearest,
        ..Default::default()
    })
}

#[cfg(test)]
mod tests {
    use super::{checkerboard_pixels, color_to_rgba8};

    #[test]
    fn color_conversion_rounds_and_clamps() {
        assert_eq!(color_to_rgba8([0.0, 1.0, 0.5, 2.0]), [0, 255, 128, 255]);
        assert_eq!(color_to_rgba8([-1.0, 0.2, 0.9, 1.0]), [0, 51, 230, 255]);
    }

    #[test]
    fn checkerboard_alternates_per_cell() {
        let pixels = checkerboard_pixels(4, 2, [1.0, 1.0, 1.0, 1.0], [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(pixels.len(), 4 * 4 * 4);

        let at = |x: usize, y: usize| pixels[(y * 4 + x) * 4];
        assert_eq!(at(0, 0), 255); // first cell uses color a
        assert_eq!(at(2, 0), 0); // next cell over flips
        assert_eq!(at(0, 2), 0); // next cell down flips
        assert_eq!(at(2, 2), 255); // diagonal matches
    }
}
