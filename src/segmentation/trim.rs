use super::color::background_fraction;
use super::column_pixels;
use super::config::SegmenterConfig;
use super::types::CropBounds;
use image::{imageops, RgbImage};

/// Column range left after stripping background padding from both sides
///
/// The stripped bounds are widened again by the height-scaled margin so a thin
/// border of the original page survives. If nothing would remain, the full
/// width is returned.
pub fn side_crop_bounds(image: &RgbImage, config: &SegmenterConfig) -> CropBounds {
    let (width, height) = image.dimensions();
    let background = config.background();
    let is_padding =
        |x: u32| background_fraction(column_pixels(image, x), &background, config.tolerance) >= config.coverage;

    let left = (0..width).find(|&x| !is_padding(x)).unwrap_or(width);
    let right = (0..width).rev().find(|&x| !is_padding(x)).map_or(0, |x| x + 1);

    let margin = config.fallback_run.at(height);
    let expanded = CropBounds {
        left: left.saturating_sub(margin),
        right: right.saturating_add(margin).min(width),
    };

    tracing::debug!(
        "Side padding ends at {}..{}, margin {} -> {}..{}",
        left,
        right,
        margin,
        expanded.left,
        expanded.right
    );

    if expanded.left < expanded.right {
        expanded
    } else {
        CropBounds::full(width)
    }
}

/// Crop background padding from the left and right edges
pub fn crop_side_whitespace(image: &RgbImage, config: &SegmenterConfig) -> (RgbImage, CropBounds) {
    let _span = tracing::debug_span!("crop_side_whitespace").entered();

    let bounds = side_crop_bounds(image, config);
    let cropped = imageops::crop_imm(image, bounds.left, 0, bounds.width(), image.height()).to_image();
    (cropped, bounds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
    const GREEN: Rgb<u8> = Rgb([20, 140, 60]);

    fn padded(width: u32, height: u32, content: std::ops::Range<u32>) -> RgbImage {
        RgbImage::from_fn(width, height, |x, _| if content.contains(&x) { GREEN } else { WHITE })
    }

    #[test]
    fn strips_padding_and_keeps_margin() {
        let image = padded(300, 1000, 40..260);
        let config = SegmenterConfig::default();
        let (cropped, bounds) = crop_side_whitespace(&image, &config);
        // margin at height 1000 is 6
        assert_eq!(bounds, CropBounds { left: 34, right: 266 });
        assert_eq!(cropped.dimensions(), (232, 1000));
        assert_eq!(*cropped.get_pixel(0, 0), WHITE);
        assert_eq!(*cropped.get_pixel(6, 0), GREEN);
    }

    #[test]
    fn no_padding_keeps_full_width() {
        let image = padded(120, 400, 0..120);
        let bounds = side_crop_bounds(&image, &SegmenterConfig::default());
        assert_eq!(bounds, CropBounds::full(120));
    }

    #[test]
    fn mostly_background_column_counts_as_padding() {
        // One ink pixel in a 100-row column is 1% noise
        let mut image = padded(50, 100, 10..40);
        image.put_pixel(3, 50, GREEN);
        let bounds = side_crop_bounds(&image, &SegmenterConfig::default());
        // margin at height 100 floors to 2
        assert_eq!(bounds, CropBounds { left: 8, right: 42 });
    }

    #[test]
    fn all_background_is_left_alone() {
        let image = RgbImage::from_pixel(60, 200, WHITE);
        let (cropped, bounds) = crop_side_whitespace(&image, &SegmenterConfig::default());
        assert_eq!(bounds, CropBounds::full(60));
        assert_eq!(cropped, image);
    }
}
