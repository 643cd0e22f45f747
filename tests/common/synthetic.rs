use image::{Rgb, RgbImage};
use std::ops::Range;

pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
pub const PAPER: Rgb<u8> = Rgb([251, 249, 250]);
pub const INK: Rgb<u8> = Rgb([25, 25, 30]);
pub const BLUE: Rgb<u8> = Rgb([40, 90, 160]);
pub const RED: Rgb<u8> = Rgb([200, 60, 60]);

/// Photo-like texture that is never uniform along a row or column and never
/// close to white.
pub fn texture(x: u32, y: u32) -> Rgb<u8> {
    Rgb([
        (x * 7 % 200) as u8,
        (y * 3 % 200) as u8,
        ((x + y) % 180) as u8,
    ])
}

/// Deterministic pseudo-random pixel for property tests
pub fn noise(x: u32, y: u32, seed: u64) -> Rgb<u8> {
    let mut h = seed ^ ((x as u64) << 32 | y as u64);
    h = h.wrapping_mul(0x9E37_79B9_7F4A_7C15);
    h ^= h >> 29;
    h = h.wrapping_mul(0xBF58_476D_1CE4_E5B9);
    h ^= h >> 32;
    Rgb([h as u8, (h >> 8) as u8, (h >> 16) as u8])
}

/// Builds synthetic scanned pages out of filled rectangles
pub struct PageBuilder {
    image: RgbImage,
}

impl PageBuilder {
    pub fn new(width: u32, height: u32, background: Rgb<u8>) -> Self {
        Self {
            image: RgbImage::from_pixel(width, height, background),
        }
    }

    pub fn rows(self, rows: Range<u32>, color: Rgb<u8>) -> Self {
        let width = self.image.width();
        self.rect(0..width, rows, color)
    }

    pub fn rect(mut self, xs: Range<u32>, ys: Range<u32>, color: Rgb<u8>) -> Self {
        for y in ys {
            for x in xs.clone() {
                self.image.put_pixel(x, y, color);
            }
        }
        self
    }

    pub fn photo(mut self, xs: Range<u32>, ys: Range<u32>) -> Self {
        for y in ys {
            for x in xs.clone() {
                self.image.put_pixel(x, y, texture(x, y));
            }
        }
        self
    }

    /// Lines of ink `line` rows tall separated by `gap` rows, starting at `ys.start`
    pub fn text_lines(mut self, xs: Range<u32>, ys: Range<u32>, line: u32, gap: u32) -> Self {
        let mut top = ys.start;
        while top < ys.end {
            let bottom = (top + line).min(ys.end);
            self = self.rect(xs.clone(), top..bottom, INK);
            top = bottom + gap;
        }
        self
    }

    pub fn build(self) -> RgbImage {
        self.image
    }
}
