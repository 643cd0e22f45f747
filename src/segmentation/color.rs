use image::Rgb;

/// Channel-wise running mean of observed pixel colors
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ColorSample {
    sum: [f64; 3],
    count: u32,
}

impl ColorSample {
    pub fn from_pixel(pixel: &Rgb<u8>) -> Self {
        let mut sample = Self::default();
        sample.push(pixel);
        sample
    }

    /// Mean color of a run of pixels; `None` for an empty run
    pub fn mean_of<'a>(pixels: impl IntoIterator<Item = &'a Rgb<u8>>) -> Option<Self> {
        let mut sample = Self::default();
        for pixel in pixels {
            sample.push(pixel);
        }
        (sample.count > 0).then_some(sample)
    }

    pub fn push(&mut self, pixel: &Rgb<u8>) {
        for (sum, &channel) in self.sum.iter_mut().zip(pixel.0.iter()) {
            *sum += channel as f64;
        }
        self.count += 1;
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn mean(&self) -> [f64; 3] {
        if self.count == 0 {
            return [0.0; 3];
        }
        let n = self.count as f64;
        [self.sum[0] / n, self.sum[1] / n, self.sum[2] / n]
    }
}

/// True when every channel is within `tolerance * 255` of `reference`
pub fn matches(pixel: &Rgb<u8>, reference: [f64; 3], tolerance: f64) -> bool {
    let max_diff = tolerance * 255.0;
    pixel
        .0
        .iter()
        .zip(reference.iter())
        .all(|(&channel, &target)| (channel as f64 - target).abs() <= max_diff)
}

pub fn matches_any(pixel: &Rgb<u8>, references: &[Rgb<u8>], tolerance: f64) -> bool {
    references
        .iter()
        .any(|reference| matches(pixel, rgb_to_f64(reference), tolerance))
}

/// Fraction of `pixels` matching `reference`; 0.0 for an empty slice
pub fn match_fraction<'a>(
    pixels: impl IntoIterator<Item = &'a Rgb<u8>>,
    reference: [f64; 3],
    tolerance: f64,
) -> f64 {
    fraction(pixels, |pixel| matches(pixel, reference, tolerance))
}

/// Fraction of `pixels` matching at least one of `references`
pub fn background_fraction<'a>(
    pixels: impl IntoIterator<Item = &'a Rgb<u8>>,
    references: &[Rgb<u8>],
    tolerance: f64,
) -> f64 {
    fraction(pixels, |pixel| matches_any(pixel, references, tolerance))
}

fn fraction<'a>(
    pixels: impl IntoIterator<Item = &'a Rgb<u8>>,
    mut predicate: impl FnMut(&Rgb<u8>) -> bool,
) -> f64 {
    let (mut total, mut hits) = (0usize, 0usize);
    for pixel in pixels {
        total += 1;
        if predicate(pixel) {
            hits += 1;
        }
    }
    if total == 0 {
        0.0
    } else {
        hits as f64 / total as f64
    }
}

fn rgb_to_f64(color: &Rgb<u8>) -> [f64; 3] {
    [color[0] as f64, color[1] as f64, color[2] as f64]
}
