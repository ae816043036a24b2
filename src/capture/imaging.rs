//! RGB565 frame buffers and the two per-pixel effects the preview uses:
//! onion-skin alpha blending and 1-bit Atkinson dithering.
//!
//! The dither works on an [`image::GrayImage`] luma plane; RGB565 is only
//! unpacked at the edges.

use image::{GrayImage, Luma};

/// An RGB565 image owned by the capture pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    width: u16,
    height: u16,
    pixels: Vec<u16>,
}

impl Frame {
    /// Black frame of the given size.
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize],
        }
    }

    /// Frame filled with a single colour.
    pub fn filled(width: u16, height: u16, rgb565: u16) -> Self {
        Self {
            width,
            height,
            pixels: vec![rgb565; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn pixels(&self) -> &[u16] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [u16] {
        &mut self.pixels
    }

    /// Expand to packed 8-bit RGB.
    pub fn to_rgb8(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.pixels.len() * 3);
        for &p in &self.pixels {
            let (r, g, b) = unpack8(p);
            out.extend_from_slice(&[r, g, b]);
        }
        out
    }

    /// Luma plane with BT.601 weights.
    pub fn to_luma8(&self) -> GrayImage {
        let width = u32::from(self.width);
        GrayImage::from_fn(width, u32::from(self.height), |x, y| {
            let (r, g, b) = unpack8(self.pixels[(y * width + x) as usize]);
            let luma = (u32::from(r) * 299 + u32::from(g) * 587 + u32::from(b) * 114) / 1000;
            Luma([luma as u8])
        })
    }

    /// Expand to packed 8-bit RGBA (opaque).
    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.pixels.len() * 4);
        for &p in &self.pixels {
            let (r, g, b) = unpack8(p);
            out.extend_from_slice(&[r, g, b, 0xff]);
        }
        out
    }
}

pub const fn pack565(r: u8, g: u8, b: u8) -> u16 {
    ((r as u16 >> 3) << 11) | ((g as u16 >> 2) << 5) | (b as u16 >> 3)
}

/// Split into the raw 5/6/5-bit channels.
const fn unpack565(p: u16) -> (u16, u16, u16) {
    ((p >> 11) & 0x1f, (p >> 5) & 0x3f, p & 0x1f)
}

/// Expand to 8-bit channels, replicating high bits into the low ones.
fn unpack8(p: u16) -> (u8, u8, u8) {
    let (r, g, b) = unpack565(p);
    (
        ((r << 3) | (r >> 2)) as u8,
        ((g << 2) | (g >> 4)) as u8,
        ((b << 3) | (b >> 2)) as u8,
    )
}

/// `dst = (a + b) / 2` per channel.  Frames must share a size; extra
/// pixels in the larger buffer are left untouched.
pub fn alpha_blend(dst: &mut Frame, a: &Frame, b: &Frame) {
    debug_assert_eq!((a.width, a.height), (b.width, b.height));
    for ((d, &pa), &pb) in dst.pixels.iter_mut().zip(&a.pixels).zip(&b.pixels) {
        let (ra, ga, ba) = unpack565(pa);
        let (rb, gb, bb) = unpack565(pb);
        *d = (((ra + rb) / 2) << 11) | (((ga + gb) / 2) << 5) | ((ba + bb) / 2);
    }
}

/// Atkinson-dither `src` to black and white into `dst`.
pub fn dither(dst: &mut Frame, src: &Frame) {
    let gray = src.to_luma8();
    let (w, h) = (gray.width() as usize, gray.height() as usize);
    if w == 0 || h == 0 {
        return;
    }

    // Error terms go negative and past 255, so diffuse in i16.
    let mut lum: Vec<i16> = gray.into_raw().into_iter().map(i16::from).collect();

    // Atkinson spreads 6/8 of the error over these neighbours.
    const SPREAD: [(isize, usize); 6] = [(1, 0), (2, 0), (-1, 1), (0, 1), (1, 1), (0, 2)];

    for y in 0..h {
        for x in 0..w {
            let i = y * w + x;
            let old = lum[i];
            let new = if old >= 128 { 255 } else { 0 };
            let err = (old - new) / 8;
            lum[i] = new;
            for (dx, dy) in SPREAD {
                let nx = x as isize + dx;
                let ny = y + dy;
                if nx >= 0 && (nx as usize) < w && ny < h {
                    let j = ny * w + nx as usize;
                    lum[j] = lum[j].saturating_add(err);
                }
            }
        }
    }

    for (d, &l) in dst.pixels.iter_mut().zip(&lum) {
        *d = if l >= 128 { 0xffff } else { 0x0000 };
    }
}
