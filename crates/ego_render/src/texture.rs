//! Image decoding and GPU texture creation.
//!
//! Decoding is lenient: a file that cannot be read or decoded produces an
//! empty `PixelBuffer`, and the texture built from it is a 1x1 texture with no
//! pixels uploaded (zero-initialized by the GPU). Startup never fails because
//! of a missing image.

use std::path::Path;

/// Decoded RGBA8 pixels, row-major, 4 bytes per pixel.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl PixelBuffer {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_rgba8(image: image::RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            width,
            height,
            pixels: image.into_raw(),
        }
    }

    /// Decodes any supported image file and converts it to RGBA8, whatever the
    /// source channel layout.
    pub fn decode(path: &Path) -> Result<Self, image::ImageError> {
        let image = image::open(path)?;
        Ok(Self::from_rgba8(image.to_rgba8()))
    }

    /// Like `decode`, but a failure is logged and yields an empty buffer.
    pub fn from_path_or_empty(path: &Path) -> Self {
        match Self::decode(path) {
            Ok(buffer) => {
                log::info!(
                    "Loaded texture '{}' ({}x{})",
                    path.display(),
                    buffer.width,
                    buffer.height
                );
                buffer
            }
            Err(err) => {
                log::warn!(
                    "Failed to load texture '{}': {}. Using an empty texture.",
                    path.display(),
                    err
                );
                Self::empty()
            }
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty() || self.width == 0 || self.height == 0
    }
}

/// Sampling parameters for a texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureOptions {
    pub filter: wgpu::FilterMode,
    pub wrap_u: wgpu::AddressMode,
    pub wrap_v: wgpu::AddressMode,
}

impl Default for TextureOptions {
    fn default() -> Self {
        Self {
            filter: wgpu::FilterMode::Linear,
            wrap_u: wgpu::AddressMode::Repeat,
            wrap_v: wgpu::AddressMode::Repeat,
        }
    }
}

impl TextureOptions {
    pub fn sampler_descriptor<'a>(&self, label: Option<&'a str>) -> wgpu::SamplerDescriptor<'a> {
        wgpu::SamplerDescriptor {
            label,
            address_mode_u: self.wrap_u,
            address_mode_v: self.wrap_v,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: self.filter,
            min_filter: self.filter,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        }
    }
}

/// GPU extent for `pixels` and whether they get uploaded. An empty buffer
/// (including one with a zero side) becomes a 1x1 texture with nothing written.
pub fn texture_extent(pixels: &PixelBuffer) -> ((u32, u32), bool) {
    if pixels.is_empty() {
        ((1, 1), false)
    } else {
        ((pixels.width(), pixels.height()), true)
    }
}

pub struct Texture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
}

impl Texture {
    pub fn from_pixels(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        pixels: &PixelBuffer,
        options: TextureOptions,
        label: &str,
    ) -> Self {
        let (size, uploaded) = texture_extent(pixels);
        let extent = wgpu::Extent3d {
            width: size.0,
            height: size.1,
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: extent,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        if uploaded {
            queue.write_texture(
                wgpu::TexelCopyTextureInfo {
                    texture: &texture,
                    mip_level: 0,
                    origin: wgpu::Origin3d::ZERO,
                    aspect: wgpu::TextureAspect::All,
                },
                pixels.pixels(),
                wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(4 * size.0),
                    rows_per_image: Some(size.1),
                },
                extent,
            );
        }

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&options.sampler_descriptor(Some(label)));

        Self {
            texture,
            view,
            sampler,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_file_path(name_hint: &str, ext: &str) -> std::path::PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "ego_texture_test_{}_{}_{}.{}",
            name_hint,
            std::process::id(),
            nanos,
            ext
        ))
    }

    #[test]
    fn missing_file_yields_empty_buffer() {
        let path = temp_file_path("missing", "png");
        let buffer = PixelBuffer::from_path_or_empty(&path);
        assert!(buffer.is_empty());
        assert_eq!(buffer.pixels().len(), 0);
    }

    #[test]
    fn garbage_file_yields_empty_buffer() {
        let path = temp_file_path("garbage", "png");
        std::fs::write(&path, b"definitely not a png").expect("write temp file");
        let buffer = PixelBuffer::from_path_or_empty(&path);
        let _ = std::fs::remove_file(&path);
        assert!(buffer.is_empty());
    }

    #[test]
    fn rgba_png_decodes_with_four_bytes_per_pixel() {
        let path = temp_file_path("rgba", "png");
        let image = image::RgbaImage::from_pixel(3, 2, image::Rgba([10, 20, 30, 128]));
        image.save(&path).expect("save temp png");

        let buffer = PixelBuffer::decode(&path).expect("decode temp png");
        let _ = std::fs::remove_file(&path);

        assert_eq!((buffer.width(), buffer.height()), (3, 2));
        assert_eq!(buffer.pixels().len(), 3 * 2 * 4);
        assert_eq!(&buffer.pixels()[..4], &[10, 20, 30, 128]);
    }

    #[test]
    fn grayscale_png_is_expanded_to_rgba() {
        let path = temp_file_path("gray", "png");
        let image = image::GrayImage::from_pixel(2, 2, image::Luma([200]));
        image.save(&path).expect("save temp png");

        let buffer = PixelBuffer::from_path_or_empty(&path);
        let _ = std::fs::remove_file(&path);

        assert!(!buffer.is_empty());
        assert_eq!(buffer.pixels().len(), 2 * 2 * 4);
        assert_eq!(&buffer.pixels()[..4], &[200, 200, 200, 255]);
    }

    #[test]
    fn unreadable_image_becomes_one_pixel_texture_without_upload() {
        let path = temp_file_path("extent_missing", "png");
        let buffer = PixelBuffer::from_path_or_empty(&path);
        assert_eq!(texture_extent(&buffer), ((1, 1), false));
    }

    #[test]
    fn zero_width_buffer_is_not_uploaded() {
        let buffer = PixelBuffer::from_rgba8(image::RgbaImage::new(0, 4));
        assert!(buffer.is_empty());
        assert_eq!(texture_extent(&buffer), ((1, 1), false));
    }

    #[test]
    fn decoded_pixels_keep_their_extent_and_upload() {
        let buffer = PixelBuffer::from_rgba8(image::RgbaImage::from_pixel(
            5,
            3,
            image::Rgba([1, 2, 3, 4]),
        ));
        assert_eq!(texture_extent(&buffer), ((5, 3), true));
    }

    #[test]
    fn default_options_are_linear_and_repeat() {
        let options = TextureOptions::default();
        let desc = options.sampler_descriptor(None);
        assert_eq!(desc.mag_filter, wgpu::FilterMode::Linear);
        assert_eq!(desc.min_filter, wgpu::FilterMode::Linear);
        assert_eq!(desc.address_mode_u, wgpu::AddressMode::Repeat);
        assert_eq!(desc.address_mode_v, wgpu::AddressMode::Repeat);
    }
}
