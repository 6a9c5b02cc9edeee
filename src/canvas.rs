//! Owned RGBA pixel buffer.
//!
//! The mesh rasterizer writes into a [`Canvas`] once per frame. Hosts read it
//! back (terminal half-blocks, PNG snapshots) and scale it up themselves.

use image::{imageops, RgbaImage};

use crate::color::RgbColor;

/// Owned RGBA pixel buffer.
///
/// Internal format is 4 bytes per pixel in **RGBA** order, straight alpha.
pub struct Canvas {
    data: Vec<u8>,
    width: usize,
    height: usize,
}

impl Canvas {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            data: vec![0u8; width * height * 4],
            width,
            height,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Fill every pixel with an opaque color.
    pub fn fill(&mut self, color: RgbColor) {
        for px in self.data.chunks_exact_mut(4) {
            px.copy_from_slice(&[color.r, color.g, color.b, 255]);
        }
    }

    /// Write an opaque pixel at (x, y). Out-of-range writes are ignored.
    #[inline]
    pub fn put_pixel(&mut self, x: usize, y: usize, r: u8, g: u8, b: u8) {
        if x >= self.width || y >= self.height {
            return;
        }
        let idx = (y * self.width + x) * 4;
        self.data[idx] = r;
        self.data[idx + 1] = g;
        self.data[idx + 2] = b;
        self.data[idx + 3] = 255;
    }

    /// Read the RGBA values at (x, y). Out-of-range reads return transparent black.
    #[inline]
    pub fn get_pixel(&self, x: usize, y: usize) -> (u8, u8, u8, u8) {
        if x >= self.width || y >= self.height {
            return (0, 0, 0, 0);
        }
        let idx = (y * self.width + x) * 4;
        (
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        )
    }

    /// Stable 64-bit digest of the pixel contents, for snapshot comparisons.
    pub fn checksum(&self) -> u64 {
        let mut state = 0x9E37_79B9_7F4A_7C15u64;
        for chunk in self.data.chunks(8) {
            let mut v = 0u64;
            for (i, &b) in chunk.iter().enumerate() {
                v |= (b as u64) << (i * 8);
            }
            state = mix64(state ^ v);
        }
        state
    }

    pub fn to_image(&self) -> RgbaImage {
        RgbaImage::from_fn(self.width as u32, self.height as u32, |x, y| {
            let (r, g, b, a) = self.get_pixel(x as usize, y as usize);
            image::Rgba([r, g, b, a])
        })
    }

    /// Bilinear upscale to `width` x `height`.
    pub fn upscale(&self, width: u32, height: u32) -> RgbaImage {
        imageops::resize(
            &self.to_image(),
            width.max(1),
            height.max(1),
            imageops::FilterType::Triangle,
        )
    }
}

fn mix64(mut z: u64) -> u64 {
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_canvas_is_transparent() {
        let canvas = Canvas::new(4, 4);
        assert_eq!(canvas.data().len(), 64);
        assert_eq!(canvas.get_pixel(3, 3), (0, 0, 0, 0));
    }

    #[test]
    fn put_and_get_pixel() {
        let mut canvas = Canvas::new(4, 2);
        canvas.put_pixel(3, 1, 10, 20, 30);
        assert_eq!(canvas.get_pixel(3, 1), (10, 20, 30, 255));
        canvas.put_pixel(4, 0, 1, 1, 1);
        canvas.put_pixel(0, 2, 1, 1, 1);
        assert_eq!(canvas.get_pixel(4, 0), (0, 0, 0, 0));
    }

    #[test]
    fn fill_is_opaque() {
        let mut canvas = Canvas::new(3, 3);
        canvas.fill(RgbColor::new(1, 2, 3));
        assert!(canvas.data().chunks(4).all(|px| px == [1, 2, 3, 255]));
    }

    #[test]
    fn checksum_tracks_contents() {
        let mut a = Canvas::new(8, 8);
        let b = Canvas::new(8, 8);
        assert_eq!(a.checksum(), b.checksum());
        a.put_pixel(0, 0, 1, 0, 0);
        assert_ne!(a.checksum(), b.checksum());
    }

    #[test]
    fn upscale_of_flat_canvas_stays_flat() {
        let mut canvas = Canvas::new(4, 4);
        canvas.fill(RgbColor::new(40, 80, 120));
        let img = canvas.upscale(16, 9);
        assert_eq!(img.dimensions(), (16, 9));
        assert!(img.pixels().all(|p| p.0 == [40, 80, 120, 255]));
    }
}
