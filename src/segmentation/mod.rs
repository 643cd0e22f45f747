//! Layout segmentation for scanned photo-over-caption pages
//!
//! Every component is a free function over the image and a
//! [`SegmenterConfig`]; nothing is carried between calls.

pub mod color;
pub mod columns;
pub mod config;
mod fallback;
mod primary;
mod split;
mod trim;
pub mod types;

pub use color::ColorSample;
pub use columns::{scan_columns, ColumnRuns, EdgeColumns};
pub use config::{LogScale, SegmenterConfig, PAPER, WHITE};
pub use fallback::find_separator_fallback;
pub use primary::{find_separator, locate_candidate};
pub use split::split_sections;
pub use trim::{crop_side_whitespace, side_crop_bounds};
pub use types::{CropBounds, RunMeasurement, Sections, Segmentation, SeparatorResult};

use image::{Rgb, RgbImage};

/// Find the separator and split `image` into photo and caption
///
/// Images too small to scan come back unsplit. When the fallback locator
/// supplied the row, side padding is trimmed before splitting.
pub fn segment(image: &RgbImage, config: &SegmenterConfig) -> Segmentation {
    let (width, height) = image.dimensions();
    let _span = tracing::debug_span!("segment", width, height).entered();

    if width == 0 || height < 2 {
        tracing::debug!("Image {}x{} is too small to segment", width, height);
        return Segmentation {
            separator: SeparatorResult::NOT_FOUND,
            crop: None,
            sections: Sections::Unsplit(image.clone()),
        };
    }

    let separator = find_separator(image, config);
    let (sections, crop) = if separator.used_fallback {
        let (trimmed, bounds) = crop_side_whitespace(image, config);
        (split_sections(&trimmed, separator.row), Some(bounds))
    } else {
        (split_sections(image, separator.row), None)
    };

    tracing::debug!(
        "Separator {:?} (fallback: {}), split: {}",
        separator.row,
        separator.used_fallback,
        sections.is_split()
    );

    Segmentation {
        separator,
        crop,
        sections,
    }
}

pub(crate) fn row_pixels(image: &RgbImage, y: u32) -> impl Iterator<Item = &Rgb<u8>> + '_ {
    (0..image.width()).map(move |x| image.get_pixel(x, y))
}

pub(crate) fn column_pixels(image: &RgbImage, x: u32) -> impl Iterator<Item = &Rgb<u8>> + '_ {
    (0..image.height()).map(move |y| image.get_pixel(x, y))
}
