mod directory;

pub use directory::DirectorySink;

use crate::pipeline::ProcessedImage;
use anyhow::Result;

/// Trait for destinations of processed pages
///
/// Sinks are shared across batch workers, so writes take `&self`.
pub trait OutputSink: Sync {
    /// Persist the sections (and any side data) of one page
    fn write(&self, image: &ProcessedImage) -> Result<()>;
}
