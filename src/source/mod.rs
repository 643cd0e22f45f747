mod file;

pub use file::FileSource;

use anyhow::Result;
use image::RgbImage;
use thiserror::Error;

/// Decoded page ready for segmentation
#[derive(Debug, Clone)]
pub struct SourceImage {
    /// Oriented, 8-bit RGB pixels
    pub pixels: RgbImage,
    /// Lowercase extension of the original encoding (`jpg`, `png`, ...)
    pub format: String,
    /// Raw EXIF block, if the file carried one
    pub exif: Option<Vec<u8>>,
}

/// Trait for places scanned pages come from
pub trait ImageSource {
    /// Short name used for logging and output file stems
    ///
    /// Not necessarily unique; the batch driver disambiguates collisions.
    fn name(&self) -> String;

    /// Full description of where the page lives, for the report
    fn location(&self) -> String {
        self.name()
    }

    /// Load and decode one page
    fn load(&self) -> Result<SourceImage>;
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("could not read {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("could not decode {path}")]
    Decode {
        path: String,
        #[source]
        source: image::ImageError,
    },

    #[error("{path} decoded to an empty {width}x{height} image")]
    Empty { path: String, width: u32, height: u32 },
}
