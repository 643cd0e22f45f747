use super::color::background_fraction;
use super::config::SegmenterConfig;
use super::row_pixels;
use image::RgbImage;

/// Runs up to this length are pulled back by a fixed offset instead of their length
const SHORT_RUN: u32 = 3;
const SHORT_RUN_OFFSET: u32 = 2;
/// Rows added on top of the run length when stepping back above a longer run
const RUN_MARGIN: u32 = 5;

/// Scan full rows from `start_row` down for a run of background-colored rows
///
/// Returns the row one offset above the point where the run first reaches the
/// required length, or `None` if the image ends first.
pub fn find_separator_fallback(image: &RgbImage, start_row: u32, config: &SegmenterConfig) -> Option<u32> {
    let _span = tracing::debug_span!("find_separator_fallback").entered();

    let height = image.height();
    let required = config.fallback_run.at(height);
    let background = config.background();

    let mut consecutive = 0u32;
    for y in start_row..height {
        let coverage = background_fraction(row_pixels(image, y), &background, config.tolerance);
        if coverage < config.coverage {
            consecutive = 0;
            continue;
        }

        consecutive += 1;
        if consecutive >= required {
            let row = y.checked_sub(run_offset(consecutive));
            tracing::debug!(
                "Background run of {} rows ends at {} (required {}) -> {:?}",
                consecutive,
                y,
                required,
                row
            );
            return row;
        }
    }

    tracing::debug!("No background run of {} rows below {}", required, start_row);
    None
}

fn run_offset(run: u32) -> u32 {
    match run {
        1..=SHORT_RUN => SHORT_RUN_OFFSET,
        _ => run + RUN_MARGIN,
    }
}
