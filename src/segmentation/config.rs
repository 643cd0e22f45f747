use anyhow::{ensure, Context, Result};
use image::Rgb;
use serde::{Deserialize, Serialize};

/// Image height at which every [`LogScale`] evaluates to its base value.
pub const ANCHOR_HEIGHT: f64 = 670.0;

/// Height ratio over which a [`LogScale`] grows by exactly `coefficient`.
pub const ANCHOR_RATIO: f64 = 3100.0 / 670.0;

/// Upper limit on strips scanned per side.
pub const MAX_EDGE_COLUMNS: u32 = 64;

pub const WHITE: [u8; 3] = [255, 255, 255];

/// Off-white paper tone (#FBF9FA) some scans use for the caption block.
pub const PAPER: [u8; 3] = [251, 249, 250];

/// Logarithmic, height-dependent integer parameter
///
/// Evaluates `round(base + coefficient / ln(anchor_ratio) * ln(height / anchor_height))`,
/// clamped from below by `floor`. Rounding is half-to-even.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LogScale {
    #[serde(default = "default_anchor_height")]
    pub anchor_height: f64,
    #[serde(default = "default_anchor_ratio")]
    pub anchor_ratio: f64,
    pub coefficient: f64,
    pub base: f64,
    pub floor: u32,
}

impl LogScale {
    pub fn new(coefficient: f64, base: f64, floor: u32) -> Self {
        Self {
            anchor_height: ANCHOR_HEIGHT,
            anchor_ratio: ANCHOR_RATIO,
            coefficient,
            base,
            floor,
        }
    }

    /// Unclamped, unrounded value at `height`
    pub fn raw(&self, height: u32) -> f64 {
        let slope = self.coefficient / self.anchor_ratio.ln();
        self.base + slope * (height as f64 / self.anchor_height).ln()
    }

    fn validate(&self) -> Result<()> {
        ensure!(
            self.anchor_height.is_finite() && self.anchor_height > 0.0,
            "anchor_height must be positive, got {}",
            self.anchor_height
        );
        ensure!(
            self.anchor_ratio.is_finite() && self.anchor_ratio > 1.0,
            "anchor_ratio must be greater than 1, got {}",
            self.anchor_ratio
        );
        ensure!(
            self.coefficient.is_finite() && self.base.is_finite(),
            "coefficient and base must be finite"
        );
        Ok(())
    }

    pub fn at(&self, height: u32) -> u32 {
        // ln(0) is -inf; max() pulls it back to the floor
        let value = self.raw(height).round_ties_even().max(self.floor as f64);
        value.min(u32::MAX as f64) as u32
    }
}

fn default_anchor_height() -> f64 {
    ANCHOR_HEIGHT
}

fn default_anchor_ratio() -> f64 {
    ANCHOR_RATIO
}

/// Tunables for the layout segmentation engine
///
/// Every field has a default matching the press-release scans the engine was
/// calibrated on, so a JSON config only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmenterConfig {
    /// Per-channel tolerance as a fraction of the full 0-255 range
    pub tolerance: f64,
    /// Fraction of a row/column that must match for it to count as uniform
    pub coverage: f64,
    /// Background tones used by the fallback locator and the side trimmer
    pub background_colors: Vec<[u8; 3]>,
    /// Strips scanned on each side, starting one column in from the edge
    pub edge_columns: u32,
    /// Column scans begin this many rows above the image bottom edge
    pub bottom_margin: u32,
    /// Column scans stop at this fraction of the height
    pub scan_start: f64,
    /// Largest run length difference allowed between a left/right pair
    pub max_band_skew: u32,
    /// Candidate rows inside this height fraction band trigger the fallback
    pub ambiguous_band: [f64; 2],
    /// Fallback row scan begins at this fraction of the height
    pub fallback_start: f64,
    /// Rows subtracted from the primary candidate
    pub separator_offset: LogScale,
    /// Consecutive background rows the fallback needs; also the side trim margin
    pub fallback_run: LogScale,
}

impl SegmenterConfig {
    pub fn background(&self) -> Vec<Rgb<u8>> {
        self.background_colors.iter().map(|&c| Rgb(c)).collect()
    }

    /// First row (inclusive) of the column scan window
    pub fn scan_start_row(&self, height: u32) -> u32 {
        fraction_of(height, self.scan_start)
    }

    pub fn fallback_start_row(&self, height: u32) -> u32 {
        fraction_of(height, self.fallback_start)
    }

    pub fn is_ambiguous(&self, candidate: u32, height: u32) -> bool {
        let low = fraction_of(height, self.ambiguous_band[0]);
        let high = fraction_of(height, self.ambiguous_band[1]);
        (low..=high).contains(&candidate)
    }

    /// Reject settings that are out of range, such as values loaded from a config file
    pub fn validate(&self) -> Result<()> {
        ensure!(
            (0.0..=1.0).contains(&self.tolerance),
            "tolerance must be within [0, 1], got {}",
            self.tolerance
        );
        ensure!(
            (0.0..=1.0).contains(&self.coverage),
            "coverage must be within [0, 1], got {}",
            self.coverage
        );
        ensure!(
            self.edge_columns <= MAX_EDGE_COLUMNS,
            "edge_columns must be at most {}, got {}",
            MAX_EDGE_COLUMNS,
            self.edge_columns
        );
        for (key, value) in [
            ("scan_start", self.scan_start),
            ("fallback_start", self.fallback_start),
            ("ambiguous_band[0]", self.ambiguous_band[0]),
            ("ambiguous_band[1]", self.ambiguous_band[1]),
        ] {
            ensure!(
                (0.0..=1.0).contains(&value),
                "{} must be within [0, 1], got {}",
                key,
                value
            );
        }
        ensure!(
            self.ambiguous_band[0] <= self.ambiguous_band[1],
            "ambiguous_band is reversed: {:?}",
            self.ambiguous_band
        );
        self.separator_offset
            .validate()
            .context("invalid separator_offset")?;
        self.fallback_run.validate().context("invalid fallback_run")?;
        Ok(())
    }
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            tolerance: 0.02,
            coverage: 0.98,
            background_colors: vec![WHITE, PAPER],
            edge_columns: 4,
            bottom_margin: 6,
            scan_start: 0.4,
            max_band_skew: 4,
            ambiguous_band: [0.38, 0.42],
            fallback_start: 0.75,
            separator_offset: LogScale::new(3.0, 2.0, 2),
            fallback_run: LogScale::new(4.0, 5.0, 2),
        }
    }
}

fn fraction_of(height: u32, fraction: f64) -> u32 {
    (height as f64 * fraction).floor() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scales_hit_base_at_anchor() {
        let config = SegmenterConfig::default();
        assert_eq!(config.separator_offset.at(670), 2);
        assert_eq!(config.fallback_run.raw(670), 5.0);
        assert_eq!(config.fallback_run.at(670), 5);
    }

    #[test]
    fn scales_grow_by_coefficient_at_ratio() {
        let config = SegmenterConfig::default();
        assert_eq!(config.separator_offset.at(3100), 5);
        assert_eq!(config.fallback_run.at(3100), 9);
    }

    #[test]
    fn known_heights() {
        let config = SegmenterConfig::default();
        assert_eq!(config.separator_offset.at(1000), 3);
        assert_eq!(config.fallback_run.at(1000), 6);
        assert_eq!(config.fallback_run.at(1654), 7);
        assert_eq!(config.fallback_run.at(300), 3);
    }

    #[test]
    fn floors_clamp_small_heights() {
        let config = SegmenterConfig::default();
        assert_eq!(config.separator_offset.at(10), 2);
        assert_eq!(config.fallback_run.at(1), 2);
        assert_eq!(config.fallback_run.at(0), 2);
    }

    #[test]
    fn ambiguous_band_is_inclusive() {
        let config = SegmenterConfig::default();
        // floor(0.38 * 1000) = 380, floor(0.42 * 1000) = 420
        assert!(config.is_ambiguous(380, 1000));
        assert!(config.is_ambiguous(420, 1000));
        assert!(!config.is_ambiguous(379, 1000));
        assert!(!config.is_ambiguous(421, 1000));
    }

    #[test]
    fn defaults_are_valid() {
        assert!(SegmenterConfig::default().validate().is_ok());
    }

    #[test]
    fn out_of_range_settings_are_rejected() {
        let defaults = SegmenterConfig::default;
        let invalid = [
            SegmenterConfig { edge_columns: u32::MAX, ..defaults() },
            SegmenterConfig { tolerance: f64::NAN, ..defaults() },
            SegmenterConfig { coverage: 1.5, ..defaults() },
            SegmenterConfig { scan_start: -0.1, ..defaults() },
            SegmenterConfig { fallback_start: 2.0, ..defaults() },
            SegmenterConfig { ambiguous_band: [0.42, 0.38], ..defaults() },
            SegmenterConfig {
                fallback_run: LogScale { anchor_ratio: 1.0, ..LogScale::new(4.0, 5.0, 2) },
                ..defaults()
            },
        ];
        for config in invalid {
            assert!(config.validate().is_err(), "accepted {:?}", config);
        }
    }

    #[test]
    fn validation_error_names_the_key() {
        let config: SegmenterConfig =
            serde_json::from_str(r#"{ "edge_columns": 4294967295 }"#).unwrap();
        let message = config.validate().unwrap_err().to_string();
        assert!(message.contains("edge_columns"), "{}", message);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let json = r#"{
            "tolerance": 0.05,
            "fallback_run": { "coefficient": 2.0, "base": 4.0, "floor": 3 }
        }"#;
        let config: SegmenterConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.tolerance, 0.05);
        assert_eq!(config.coverage, 0.98);
        assert_eq!(config.background_colors, vec![WHITE, PAPER]);
        assert_eq!(config.separator_offset, LogScale::new(3.0, 2.0, 2));
        assert_eq!(config.fallback_run, LogScale::new(2.0, 4.0, 3));
    }
}
