//! Decoded textures and their GPU counterparts.
//!
//! A [`Texture`] holds the decoded RGBA pixels of an image together with the
//! sampling state a renderer needs. It is deliberately not `Clone`: a texture
//! belongs to exactly one material and its pixel memory is released when that
//! material lets go of it. [`Texture::upload`] turns it into a [`GpuTexture`].

use std::{
    fmt,
    sync::atomic::{AtomicU64, Ordering},
};

use image::{DynamicImage, RgbaImage};

/// Unique identity of a decoded texture.
///
/// Two textures never share an id, even if they were decoded from the same source.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(u64);

impl TextureId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for TextureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// How the stored pixel values are to be interpreted by the shader.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorSpace {
    Linear,
    Srgb,
}

/// A decoded image bound (or about to be bound) to a material.
#[derive(Debug)]
pub struct Texture {
    id: TextureId,
    label: String,
    pixels: RgbaImage,
    pub color_space: ColorSpace,
    pub min_filter: wgpu::FilterMode,
    pub mag_filter: wgpu::FilterMode,
}

impl Texture {
    /// Wrap a decoded image. The pixels are converted to RGBA8.
    ///
    /// Fresh textures are linear with nearest minification; colour images must be
    /// passed through [`normalize`](Self::normalize) before they are displayed.
    pub fn from_image(img: &DynamicImage, label: &str) -> Self {
        Self {
            id: TextureId::next(),
            label: label.to_string(),
            pixels: img.to_rgba8(),
            color_space: ColorSpace::Linear,
            min_filter: wgpu::FilterMode::Nearest,
            mag_filter: wgpu::FilterMode::Linear,
        }
    }

    /// Colour images are stored in sRGB and minified linearly.
    pub fn normalize(&mut self) {
        self.color_space = ColorSpace::Srgb;
        self.min_filter = wgpu::FilterMode::Linear;
    }

    pub fn id(&self) -> TextureId {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn format(&self) -> wgpu::TextureFormat {
        match self.color_space {
            ColorSpace::Srgb => wgpu::TextureFormat::Rgba8UnormSrgb,
            ColorSpace::Linear => wgpu::TextureFormat::Rgba8Unorm,
        }
    }

    pub fn sampler_descriptor(&self) -> wgpu::SamplerDescriptor<'_> {
        wgpu::SamplerDescriptor {
            label: Some(&self.label),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: self.mag_filter,
            min_filter: self.min_filter,
            ..Default::default()
        }
    }

    /// Copy the pixels into GPU memory.
    ///
    /// Fails for zero-sized images, which no backend accepts as a texture.
    pub fn upload(&self, device: &wgpu::Device, queue: &wgpu::Queue) -> anyhow::Result<GpuTexture> {
        let (width, height) = self.pixels.dimensions();
        anyhow::ensure!(
            width > 0 && height > 0,
            "cannot upload texture {} ({}) with size {}x{}",
            self.id,
            self.label,
            width,
            height
        );

        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(&self.label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: self.format(),
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                aspect: wgpu::TextureAspect::All,
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
            },
            &self.pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&self.sampler_descriptor());
        log::debug!("uploaded texture {} ({}) {}x{}", self.id, self.label, width, height);

        Ok(GpuTexture {
            id: self.id,
            texture,
            view,
            sampler,
        })
    }
}

impl Drop for Texture {
    fn drop(&mut self) {
        log::trace!("releasing texture {} ({})", self.id, self.label);
    }
}

/// GPU-resident copy of a [`Texture`] with a view and sampler.
#[derive(Debug)]
pub struct GpuTexture {
    pub id: TextureId,
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
}
