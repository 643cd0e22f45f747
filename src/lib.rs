//! Split scanned press-release pages into photo and caption
//!
//! The heart of the crate is [`segmentation`]: a resolution-adaptive heuristic
//! that finds the thin background band between a photograph and its caption.
//! Around it sit an image [`source`], a text recognition boundary ([`ocr`]),
//! an [`output`] sink and the batch [`pipeline`] that ties them together.
//!
//! ```no_run
//! use caption_split::segmentation::{segment, Sections, SegmenterConfig};
//!
//! let page = image::open("page.jpg")?.to_rgb8();
//! let result = segment(&page, &SegmenterConfig::default());
//! if let Sections::Split { photo, caption } = &result.sections {
//!     println!("photo {}px tall, caption {}px tall", photo.height(), caption.height());
//! }
//! # Ok::<(), image::ImageError>(())
//! ```

pub mod ocr;
pub mod output;
pub mod pipeline;
pub mod segmentation;
pub mod source;

pub use pipeline::{process, run_batch, ProcessStatus, ProcessedImage, ReportEntry};
pub use segmentation::{segment, Sections, Segmentation, SegmenterConfig, SeparatorResult};
