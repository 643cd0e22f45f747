use super::{ImageSource, LoadError, SourceImage};
use anyhow::Result;
use image::{DynamicImage, ImageDecoder, ImageFormat, ImageReader};
use std::path::{Path, PathBuf};

/// Page stored as an image file on disk
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn decode_error(&self, source: image::ImageError) -> LoadError {
        LoadError::Decode {
            path: self.path.display().to_string(),
            source,
        }
    }
}

impl ImageSource for FileSource {
    fn name(&self) -> String {
        self.path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> Result<SourceImage> {
        let _span = tracing::debug_span!("load", path = %self.path.display()).entered();

        let reader = ImageReader::open(&self.path)
            .and_then(|reader| reader.with_guessed_format())
            .map_err(|source| LoadError::Io {
                path: self.path.display().to_string(),
                source,
            })?;
        let format = reader.format();

        let mut decoder = reader.into_decoder().map_err(|e| self.decode_error(e))?;
        // Orientation and EXIF are best effort; a broken tag should not lose the page
        let orientation = decoder.orientation().ok();
        let exif = decoder.exif_metadata().ok().flatten();

        let mut decoded = DynamicImage::from_decoder(decoder).map_err(|e| self.decode_error(e))?;
        if let Some(orientation) = orientation {
            decoded.apply_orientation(orientation);
        }

        let pixels = decoded.to_rgb8();
        let (width, height) = pixels.dimensions();
        if width == 0 || height == 0 {
            return Err(LoadError::Empty {
                path: self.path.display().to_string(),
                width,
                height,
            }
            .into());
        }

        tracing::debug!(
            "Decoded {}x{} {:?} ({} EXIF bytes)",
            width,
            height,
            format,
            exif.as_ref().map_or(0, Vec::len)
        );

        Ok(SourceImage {
            pixels,
            format: format_tag(format),
            exif,
        })
    }
}

/// File extension used when re-encoding the photo
pub fn format_tag(format: Option<ImageFormat>) -> String {
    match format {
        Some(ImageFormat::Jpeg) | None => "jpg".to_string(),
        Some(format) => format
            .extensions_str()
            .first()
            .map_or_else(|| "png".to_string(), |ext| ext.to_string()),
    }
}
