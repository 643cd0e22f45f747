use super::color::ColorSample;
use image::RgbImage;
use serde::Serialize;

/// Where the photo ends and the caption begins
///
/// `row` is `None` when no separator was found; callers then treat the whole
/// image as one unsplit section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SeparatorResult {
    pub row: Option<u32>,
    pub used_fallback: bool,
}

impl SeparatorResult {
    pub const NOT_FOUND: Self = Self {
        row: None,
        used_fallback: false,
    };

    pub fn primary(row: Option<u32>) -> Self {
        Self {
            row,
            used_fallback: false,
        }
    }

    pub fn fallback(row: u32) -> Self {
        Self {
            row: Some(row),
            used_fallback: true,
        }
    }
}

/// Color-stable run measured up from the bottom of one edge column
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunMeasurement {
    pub uniform_run_length: u32,
    pub representative_color: ColorSample,
}

impl RunMeasurement {
    /// Row at which the run's uniform band begins
    pub fn uniform_top(&self, height: u32) -> u32 {
        height.saturating_sub(self.uniform_run_length)
    }
}

/// Half-open column range kept by the side trimmer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CropBounds {
    pub left: u32,
    pub right: u32,
}

impl CropBounds {
    pub fn full(width: u32) -> Self {
        Self {
            left: 0,
            right: width,
        }
    }

    pub fn width(&self) -> u32 {
        self.right - self.left
    }
}

/// Output of the section splitter
#[derive(Debug, Clone, PartialEq)]
pub enum Sections {
    Split { photo: RgbImage, caption: RgbImage },
    Unsplit(RgbImage),
}

impl Sections {
    pub fn is_split(&self) -> bool {
        matches!(self, Sections::Split { .. })
    }

    /// Image the upload side keeps: the photo, or everything when unsplit
    pub fn photo(&self) -> &RgbImage {
        match self {
            Sections::Split { photo, .. } => photo,
            Sections::Unsplit(image) => image,
        }
    }

    /// Image the text side reads: the caption, or everything when unsplit
    pub fn text_region(&self) -> &RgbImage {
        match self {
            Sections::Split { caption, .. } => caption,
            Sections::Unsplit(image) => image,
        }
    }
}

/// Full result of one [`segment`](super::segment) call
#[derive(Debug, Clone, PartialEq)]
pub struct Segmentation {
    pub separator: SeparatorResult,
    /// Set when the fallback path trimmed the image sides before splitting
    pub crop: Option<CropBounds>,
    pub sections: Sections,
}
