//! Boundary to the text recognition service
//!
//! Recognition itself happens outside this crate. What lives here is the
//! interface a backend implements and the cleanup applied to whatever it
//! returns.

use anyhow::Result;
use image::RgbImage;

/// Scripts press-release captions are written in, most likely first
pub const LANGUAGE_HINTS: [&str; 2] = ["bn", "en"];

/// Bengali full stop (dari)
const DARI: &str = "\u{0964}";

/// Agency credit appended to captions ("PID")
const CREDIT: &str = "\u{09AA}\u{09BF}\u{0986}\u{0987}\u{09A1}\u{09BF}";

/// Trait for OCR backends
pub trait TextRecognizer: Sync {
    /// Recognize the text in `image`, biased towards `hints` (BCP-47 codes)
    fn recognize(&self, image: &RgbImage, hints: &[&str]) -> Result<String>;
}

/// Normalize recognized caption text
///
/// Collapses whitespace, restores the dari the recognizer tends to read as a
/// pipe, and strips the trailing agency credit in its usual spellings.
pub fn clean_text(raw: &str) -> String {
    let mut text = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if text.is_empty() {
        return text;
    }

    text = text.replace('|', DARI);

    let dari_credits = [format!("{DARI} {CREDIT}"), format!("{DARI}{CREDIT}")];
    for credit in &dari_credits {
        text = text.replace(credit.as_str(), DARI);
    }

    let dash_credits = [
        format!(" - {CREDIT}"),
        format!(" -{CREDIT}"),
        format!("- {CREDIT}"),
        format!("-{CREDIT}"),
    ];
    for credit in &dash_credits {
        text = text.replace(credit.as_str(), "");
    }

    text
}
