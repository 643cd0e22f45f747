use super::color::{match_fraction, ColorSample};
use super::columns::{scan_columns, ColumnRuns, EdgeColumns};
use super::config::SegmenterConfig;
use super::fallback::find_separator_fallback;
use super::row_pixels;
use super::types::SeparatorResult;
use image::RgbImage;

/// Locate the photo/caption boundary
///
/// Runs the edge-column heuristic first. When it finds nothing usable, or its
/// candidate sits in the ambiguous band around 40% of the height, the coarser
/// full-row fallback gets a chance; a hit there supersedes the primary row.
pub fn find_separator(image: &RgbImage, config: &SegmenterConfig) -> SeparatorResult {
    let _span = tracing::debug_span!("find_separator").entered();

    let height = image.height();
    let runs = scan_columns(image, config);
    let Some(candidate) = locate_candidate(image, &runs, config) else {
        tracing::debug!("No color-stable edge columns");
        return SeparatorResult::NOT_FOUND;
    };

    let offset = config.separator_offset.at(height);
    let row = candidate.checked_sub(offset);
    tracing::debug!("Primary candidate {} - offset {} -> {:?}", candidate, offset, row);

    if row.is_none() || config.is_ambiguous(candidate, height) {
        let start_row = config.fallback_start_row(height);
        tracing::debug!("Primary candidate {} is unusable, scanning rows from {}", candidate, start_row);
        if let Some(fallback_row) = find_separator_fallback(image, start_row, config) {
            return SeparatorResult::fallback(fallback_row);
        }
    }

    SeparatorResult::primary(row)
}

/// Pre-offset separator candidate from the column runs
///
/// Prefers the shallowest row that is uniform across a left/right column pair;
/// otherwise the shallowest uniform top of any single column.
pub fn locate_candidate(image: &RgbImage, runs: &ColumnRuns, config: &SegmenterConfig) -> Option<u32> {
    let height = image.height();
    let start_row = config.scan_start_row(height);
    let columns = EdgeColumns::new(image.width(), config.edge_columns);

    let mut valid_lines = Vec::new();
    for left in &columns.left {
        for right in &columns.right {
            let (Some(left_run), Some(right_run)) = (runs.get(left), runs.get(right)) else {
                continue;
            };
            let skew = left_run.uniform_run_length.abs_diff(right_run.uniform_run_length);
            if skew > config.max_band_skew {
                continue;
            }

            let scan_row = left_run.uniform_top(height).max(right_run.uniform_top(height));
            if (start_row..height).contains(&scan_row)
                && is_uniform_segment(image, scan_row, *left, *right, config)
            {
                valid_lines.push(scan_row);
            }
        }
    }

    if let Some(&line) = valid_lines.iter().min() {
        tracing::debug!("{} valid lines, shallowest {}", valid_lines.len(), line);
        return Some(line);
    }

    runs.values().map(|run| run.uniform_top(height)).min()
}

/// Whether the pixels of row `y` from `left` to `right` (inclusive) agree with their mean
fn is_uniform_segment(image: &RgbImage, y: u32, left: u32, right: u32, config: &SegmenterConfig) -> bool {
    if left > right {
        return false;
    }
    let segment = || row_pixels(image, y).skip(left as usize).take((right - left + 1) as usize);
    let Some(mean) = ColorSample::mean_of(segment()) else {
        return false;
    };
    match_fraction(segment(), mean.mean(), config.tolerance) >= config.coverage
}
