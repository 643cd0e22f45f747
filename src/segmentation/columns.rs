use super::color::{matches, ColorSample};
use super::config::SegmenterConfig;
use super::types::RunMeasurement;
use image::RgbImage;
use std::collections::BTreeMap;

/// Per-column run measurements keyed by column index
pub type ColumnRuns = BTreeMap<u32, RunMeasurement>;

/// Strips just inside the left and right edges
///
/// Column 0 and column `width - 1` are skipped. Indices outside the image are
/// dropped, so narrow images yield fewer (possibly overlapping) strips.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeColumns {
    pub left: Vec<u32>,
    pub right: Vec<u32>,
}

impl EdgeColumns {
    pub fn new(width: u32, count: u32) -> Self {
        // No strip past the far edge can exist
        let count = count.min(width);
        let left = (1..=count).filter(|&x| x < width).collect();
        let right = (1..=count)
            .rev()
            .filter_map(|offset| width.checked_sub(offset.checked_add(1)?))
            .collect();
        Self { left, right }
    }

    pub fn all(&self) -> impl Iterator<Item = u32> + '_ {
        self.left.iter().chain(self.right.iter()).copied()
    }
}

/// Measure how far each edge strip stays color-stable above the bottom margin
pub fn scan_columns(image: &RgbImage, config: &SegmenterConfig) -> ColumnRuns {
    let _span = tracing::debug_span!("scan_columns").entered();

    let start_row = config.scan_start_row(image.height());
    let columns = EdgeColumns::new(image.width(), config.edge_columns);

    let runs: ColumnRuns = columns
        .all()
        .filter_map(|x| scan_column(image, x, start_row, config).map(|run| (x, run)))
        .collect();

    tracing::debug!("Measured {} edge columns: {:?}", runs.len(), run_lengths(&runs));
    runs
}

/// Walk one column upward from `height - bottom_margin` to `start_row`
///
/// Returns `None` when the scan window is empty.
pub fn scan_column(
    image: &RgbImage,
    x: u32,
    start_row: u32,
    config: &SegmenterConfig,
) -> Option<RunMeasurement> {
    let height = image.height();
    let first_row = height.checked_sub(config.bottom_margin)?;
    if first_row < start_row || x >= image.width() {
        return None;
    }

    let mut sample: Option<ColorSample> = None;
    let mut last_accepted = first_row;

    for y in (start_row..=first_row).rev() {
        let pixel = image.get_pixel(x, y);
        match sample.as_mut() {
            None => sample = Some(ColorSample::from_pixel(pixel)),
            Some(run) if matches(pixel, run.mean(), config.tolerance) => run.push(pixel),
            Some(_) => break,
        }
        last_accepted = y;
    }

    sample.map(|representative_color| RunMeasurement {
        uniform_run_length: height - 1 - last_accepted,
        representative_color,
    })
}

fn run_lengths(runs: &ColumnRuns) -> Vec<(u32, u32)> {
    runs.iter()
        .map(|(&x, run)| (x, run.uniform_run_length))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    const BLUE: Rgb<u8> = Rgb([40, 90, 160]);
    const RED: Rgb<u8> = Rgb([200, 60, 60]);

    fn two_tone(width: u32, height: u32, split: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |_, y| if y < split { BLUE } else { RED })
    }

    #[test]
    fn edge_columns_skip_outermost() {
        let columns = EdgeColumns::new(800, 4);
        assert_eq!(columns.left, vec![1, 2, 3, 4]);
        assert_eq!(columns.right, vec![795, 796, 797, 798]);
    }

    #[test]
    fn edge_columns_drop_out_of_range() {
        let columns = EdgeColumns::new(3, 4);
        assert_eq!(columns.left, vec![1, 2]);
        assert_eq!(columns.right, vec![0, 1]);
        assert!(EdgeColumns::new(1, 4).left.is_empty());
    }

    #[test]
    fn huge_strip_count_is_bounded_by_width() {
        let columns = EdgeColumns::new(5, u32::MAX);
        assert_eq!(columns.left, vec![1, 2, 3, 4]);
        assert_eq!(columns.right, vec![0, 1, 2, 3]);
    }

    #[test]
    fn scan_survives_unbounded_strip_count() {
        let image = two_tone(20, 100, 70);
        let config = SegmenterConfig {
            edge_columns: u32::MAX,
            ..SegmenterConfig::default()
        };
        // Left and right strips together cover every column
        let runs = scan_columns(&image, &config);
        assert_eq!(runs.len(), 20);
    }

    #[test]
    fn run_stops_at_color_change() {
        let image = two_tone(20, 100, 70);
        let config = SegmenterConfig::default();
        let run = scan_column(&image, 1, 40, &config).unwrap();
        // Rows 94 down to 70 are red; row 69 breaks the run
        assert_eq!(run.uniform_run_length, 100 - 1 - 70);
        assert_eq!(run.uniform_top(100), 71);
        assert_eq!(run.representative_color.count(), 25);
        assert_eq!(run.representative_color.mean(), [200.0, 60.0, 60.0]);
    }

    #[test]
    fn uninterrupted_run_is_capped_at_window() {
        let image = two_tone(20, 100, 0);
        let config = SegmenterConfig::default();
        let run = scan_column(&image, 2, 40, &config).unwrap();
        assert_eq!(run.uniform_run_length, 100 - 1 - 40);
    }

    #[test]
    fn slow_drift_stays_within_running_mean() {
        // One step per row never leaves 5.1 of the accumulated mean
        let image = RgbImage::from_fn(10, 100, |_, y| {
            let v = 100 + (y % 4) as u8;
            Rgb([v, v, v])
        });
        let config = SegmenterConfig::default();
        let run = scan_column(&image, 1, 40, &config).unwrap();
        assert_eq!(run.uniform_run_length, 59);
    }

    #[test]
    fn empty_window_yields_nothing() {
        let image = two_tone(20, 8, 4);
        let config = SegmenterConfig::default();
        // start row 3, first row 2
        assert!(scan_column(&image, 1, 3, &config).is_none());
        assert!(scan_columns(&image, &config).is_empty());
    }

    #[test]
    fn scans_all_eight_strips() {
        let image = two_tone(800, 1000, 605);
        let runs = scan_columns(&image, &SegmenterConfig::default());
        assert_eq!(runs.len(), 8);
        assert!(runs.values().all(|run| run.uniform_run_length == 394));
    }
}
