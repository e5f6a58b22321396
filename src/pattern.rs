// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Screenshot filename recognition and timestamp extraction

use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

/// Which capture tool produced the file, judged from the filename
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenshotKind {
    /// `Screenshot ...` (macOS Mojave and later)
    Screenshot,
    /// `Screen Shot ...` (pre-Mojave)
    ScreenShot,
    /// `CleanShot ...` (CleanShot X)
    CleanShot,
}

impl ScreenshotKind {
    fn from_tag(tag: &str) -> Self {
        if tag.eq_ignore_ascii_case("cleanshot") {
            Self::CleanShot
        } else if tag.eq_ignore_ascii_case("screen shot") {
            Self::ScreenShot
        } else {
            Self::Screenshot
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Screenshot => "Screenshot",
            Self::ScreenShot => "Screen Shot",
            Self::CleanShot => "CleanShot",
        }
    }
}

/// A file recognized as a macOS screenshot
#[derive(Debug, Clone)]
pub struct ScreenshotCandidate {
    /// Capture tool that named the file
    pub kind: ScreenshotKind,
    /// Timestamp embedded in the filename, if one parsed
    pub timestamp: Option<NaiveDateTime>,
    /// File extension without the dot, as it appears on disk
    pub extension: String,
}

// "Screenshot 2024-01-01 at 10.00.00 AM.png", optionally with a version
// token after the tag ("CleanShot X 2024-...").
fn timestamp_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)^(Screenshot|Screen Shot|CleanShot)(?:\s+\w+)?\s+(\d{4})-(\d{2})-(\d{2})\s+at\s+(\d{1,2})\.(\d{2})\.(\d{2})\s+(AM|PM)\.",
        )
        .expect("invalid timestamp regex")
    })
}

fn prefix_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^(Screenshot|Screen Shot|CleanShot)\b").expect("invalid prefix regex")
    })
}

/// Check whether an extension belongs to a screenshot image format
pub fn is_image_extension(ext: &str) -> bool {
    matches!(ext.to_ascii_lowercase().as_str(), "png" | "jpg" | "jpeg")
}

/// Extract the calendar timestamp embedded in a screenshot filename.
///
/// Returns `None` when the name does not follow a known template or the
/// embedded date is impossible (month 13, second 61).
pub fn extract_timestamp(filename: &str) -> Option<NaiveDateTime> {
    let caps = timestamp_regex().captures(filename)?;

    let year: i32 = caps[2].parse().ok()?;
    let month: u32 = caps[3].parse().ok()?;
    let day: u32 = caps[4].parse().ok()?;
    let mut hour: u32 = caps[5].parse().ok()?;
    let minute: u32 = caps[6].parse().ok()?;
    let second: u32 = caps[7].parse().ok()?;

    // 12-hour clock: 12 AM is midnight, 12 PM is noon
    let pm = caps[8].eq_ignore_ascii_case("PM");
    if pm && hour != 12 {
        hour += 12;
    } else if !pm && hour == 12 {
        hour = 0;
    }

    NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, minute, second)
}

/// Classify a file as a macOS screenshot, if its name matches.
///
/// Strict matches carry the embedded timestamp. Names that merely start with
/// a known tool tag (e.g. a renamed or cropped `CleanShot foo.png`) are still
/// candidates, with no timestamp; callers fall back to the file modification
/// time for those.
pub fn match_screenshot(path: &Path) -> Option<ScreenshotCandidate> {
    let filename = path.file_name()?.to_str()?;
    let extension = path.extension()?.to_str()?;

    if !is_image_extension(extension) {
        return None;
    }

    let caps = prefix_regex().captures(filename)?;
    let kind = ScreenshotKind::from_tag(&caps[1]);

    Some(ScreenshotCandidate {
        kind,
        timestamp: extract_timestamp(filename),
        extension: extension.to_string(),
    })
}
