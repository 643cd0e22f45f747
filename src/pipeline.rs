use crate::ocr::{clean_text, TextRecognizer, LANGUAGE_HINTS};
use crate::output::OutputSink;
use crate::segmentation::{segment, CropBounds, Segmentation, SegmenterConfig, SeparatorResult};
use crate::source::{ImageSource, SourceImage};
use anyhow::{Context, Result};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Outcome of processing one page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ProcessStatus {
    /// Split, and text was recognized in the caption
    Success,
    /// No split, text was recognized in the whole page
    SuccessFullImage,
    NoTextDetected,
    OcrFailed(String),
    /// Split, no recognizer configured
    Segmented,
    /// No split, no recognizer configured
    NoSeparator,
}

impl fmt::Display for ProcessStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessStatus::Success => write!(f, "Success"),
            ProcessStatus::SuccessFullImage => write!(f, "Success - full image"),
            ProcessStatus::NoTextDetected => write!(f, "No text detected"),
            ProcessStatus::OcrFailed(reason) => write!(f, "OCR failed: {}", reason),
            ProcessStatus::Segmented => write!(f, "Segmented"),
            ProcessStatus::NoSeparator => write!(f, "No separator found - using full image"),
        }
    }
}

/// A page after segmentation and (optionally) recognition
#[derive(Debug, Clone)]
pub struct ProcessedImage {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub format: String,
    pub exif: Option<Vec<u8>>,
    pub segmentation: Segmentation,
    pub text: Option<String>,
    pub status: ProcessStatus,
}

/// Segment one page and run the recognizer over its text region
pub fn process(
    name: &str,
    source: SourceImage,
    config: &SegmenterConfig,
    recognizer: Option<&dyn TextRecognizer>,
) -> ProcessedImage {
    let _span = tracing::debug_span!("process", name).entered();

    let (width, height) = source.pixels.dimensions();
    let segmentation = segment(&source.pixels, config);
    let split = segmentation.sections.is_split();

    let (text, status) = match recognizer {
        None if split => (None, ProcessStatus::Segmented),
        None => (None, ProcessStatus::NoSeparator),
        Some(recognizer) => {
            match recognizer.recognize(segmentation.sections.text_region(), &LANGUAGE_HINTS) {
                Ok(raw) => {
                    let text = clean_text(&raw);
                    let status = if text.is_empty() {
                        ProcessStatus::NoTextDetected
                    } else if split {
                        ProcessStatus::Success
                    } else {
                        ProcessStatus::SuccessFullImage
                    };
                    (Some(text), status)
                }
                Err(e) => {
                    tracing::warn!("{}: text recognition failed: {:#}", name, e);
                    (None, ProcessStatus::OcrFailed(format!("{:#}", e)))
                }
            }
        }
    };

    ProcessedImage {
        name: name.to_string(),
        width,
        height,
        format: source.format,
        exif: source.exif,
        segmentation,
        text,
        status,
    }
}

/// One line of the batch report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportEntry {
    /// Output name, unique within the batch
    pub name: String,
    /// Where the page was loaded from
    pub path: String,
    pub width: u32,
    pub height: u32,
    pub separator: SeparatorResult,
    pub crop: Option<CropBounds>,
    pub split: bool,
    pub status: String,
    pub error: Option<String>,
}

impl ReportEntry {
    fn processed(image: &ProcessedImage, path: String) -> Self {
        Self {
            name: image.name.clone(),
            path,
            width: image.width,
            height: image.height,
            separator: image.segmentation.separator,
            crop: image.segmentation.crop,
            split: image.segmentation.sections.is_split(),
            status: image.status.to_string(),
            error: None,
        }
    }

    fn failed(name: String, path: String, error: &anyhow::Error) -> Self {
        Self {
            name,
            path,
            width: 0,
            height: 0,
            separator: SeparatorResult::NOT_FOUND,
            crop: None,
            split: false,
            status: "Error".to_string(),
            error: Some(format!("{:#}", error)),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Load, process and write every source on the current rayon pool
///
/// Pages are independent, so a failure is recorded in the report and the
/// rest of the batch carries on. Entries come back in input order, and each
/// carries a name no other page in the batch shares.
pub fn run_batch<S, O>(
    sources: &[S],
    config: &SegmenterConfig,
    recognizer: Option<&dyn TextRecognizer>,
    sink: &O,
) -> Vec<ReportEntry>
where
    S: ImageSource + Sync,
    O: OutputSink + ?Sized,
{
    let stems: Vec<String> = sources.iter().map(|source| source.name()).collect();
    let names = unique_names(&stems);

    sources
        .par_iter()
        .zip(names)
        .map(|(source, name)| {
            let path = source.location();
            match run_one(source, &name, config, recognizer, sink) {
                Ok(image) => {
                    tracing::info!("{}: {}", name, image.status);
                    ReportEntry::processed(&image, path)
                }
                Err(e) => {
                    tracing::error!("{}: {:#}", name, e);
                    ReportEntry::failed(name, path, &e)
                }
            }
        })
        .collect()
}

/// Output names for a batch, with colliding stems suffixed by input position
///
/// A stem shared by several inputs becomes `<stem>_<index>` for each of them,
/// so `a/page.png` and `b/page.png` never write over each other. Unique stems
/// are kept as they are.
pub fn unique_names(stems: &[String]) -> Vec<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for stem in stems {
        *counts.entry(stem.as_str()).or_default() += 1;
    }
    let is_shared = |stem: &str| counts.get(stem).is_some_and(|&count| count > 1);

    let mut taken: HashSet<String> = stems
        .iter()
        .filter(|stem| !is_shared(stem.as_str()))
        .cloned()
        .collect();

    stems
        .iter()
        .enumerate()
        .map(|(index, stem)| {
            if !is_shared(stem.as_str()) {
                return stem.clone();
            }
            let mut name = format!("{}_{}", stem, index);
            let mut attempt = 1;
            while !taken.insert(name.clone()) {
                name = format!("{}_{}_{}", stem, index, attempt);
                attempt += 1;
            }
            name
        })
        .collect()
}

fn run_one<S, O>(
    source: &S,
    name: &str,
    config: &SegmenterConfig,
    recognizer: Option<&dyn TextRecognizer>,
    sink: &O,
) -> Result<ProcessedImage>
where
    S: ImageSource,
    O: OutputSink + ?Sized,
{
    let image = source
        .load()
        .with_context(|| format!("Failed to load {}", name))?;
    let processed = process(name, image, config, recognizer);
    sink.write(&processed)
        .with_context(|| format!("Failed to write sections for {}", name))?;
    Ok(processed)
}
