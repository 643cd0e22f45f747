use super::OutputSink;
use crate::pipeline::ProcessedImage;
use crate::segmentation::Sections;
use anyhow::{Context, Result};
use image::{ImageFormat, RgbImage};
use std::fs;
use std::path::{Path, PathBuf};

/// Writes sections as files under one directory
///
/// A split page becomes `<name>_photo.<format>` plus `<name>_caption.png`; an
/// unsplit one becomes `<name>_full.<format>`. EXIF and recognized text go to
/// `<name>.exif` and `<name>.txt` when present.
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output directory {}", dir.display()))?;

        tracing::info!("Writing sections to {}", dir.display());

        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn save(&self, image: &RgbImage, file_name: String) -> Result<()> {
        let path = self.dir.join(file_name);
        image
            .save(&path)
            .with_context(|| format!("Failed to save {}", path.display()))?;
        tracing::debug!("Wrote {}", path.display());
        Ok(())
    }
}

impl OutputSink for DirectorySink {
    fn write(&self, image: &ProcessedImage) -> Result<()> {
        let _span = tracing::debug_span!("write", name = %image.name).entered();

        let ext = writable_extension(&image.format);
        match &image.segmentation.sections {
            Sections::Split { photo, caption } => {
                self.save(photo, format!("{}_photo.{}", image.name, ext))?;
                self.save(caption, format!("{}_caption.png", image.name))?;
            }
            Sections::Unsplit(full) => {
                self.save(full, format!("{}_full.{}", image.name, ext))?;
            }
        }

        if let Some(exif) = &image.exif {
            let path = self.dir.join(format!("{}.exif", image.name));
            fs::write(&path, exif).with_context(|| format!("Failed to write {}", path.display()))?;
        }

        if let Some(text) = image.text.as_ref().filter(|text| !text.is_empty()) {
            let path = self.dir.join(format!("{}.txt", image.name));
            fs::write(&path, text).with_context(|| format!("Failed to write {}", path.display()))?;
        }

        Ok(())
    }
}

/// Keep the source format when the encoder can write it as RGB8, else PNG
fn writable_extension(format: &str) -> &str {
    match ImageFormat::from_extension(format) {
        Some(ImageFormat::Jpeg | ImageFormat::Png | ImageFormat::Bmp | ImageFormat::Tiff) => format,
        _ => "png",
    }
}
