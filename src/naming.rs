// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Destination name generation

use chrono::NaiveDateTime;

use crate::ShutterError;

/// Strategy for computing a new base filename
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamingMode {
    /// `YYYY-MM-DD_HH-MM-SS`
    Datetime,
    /// `YYYYMMDD_HHMMSS`
    Timestamp,
    /// `YYYY-MM-DD`
    Date,
    /// Vision-model description, slugified
    Ai,
}

impl NamingMode {
    /// Parse a CLI pattern name. `content` is an alias for `ai`.
    pub fn parse(s: &str) -> crate::Result<Self> {
        match s {
            "datetime" => Ok(Self::Datetime),
            "timestamp" => Ok(Self::Timestamp),
            "date" => Ok(Self::Date),
            "ai" | "content" => Ok(Self::Ai),
            other => Err(ShutterError::Config(format!("Unknown pattern: {}", other))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Datetime => "datetime",
            Self::Timestamp => "timestamp",
            Self::Date => "date",
            Self::Ai => "ai",
        }
    }
}

/// Name-generation settings for one invocation
#[derive(Debug, Clone)]
pub struct NamingOptions {
    pub mode: NamingMode,
    pub prefix: Option<String>,
    pub suffix: Option<String>,
}

/// Format the timestamp-derived base name for a mode.
///
/// `Ai` formats like `Datetime` here: this is the fallback the driver uses
/// when no slug is available.
pub fn timestamped_base(mode: NamingMode, ts: &NaiveDateTime) -> String {
    match mode {
        NamingMode::Datetime | NamingMode::Ai => ts.format("%Y-%m-%d_%H-%M-%S").to_string(),
        NamingMode::Timestamp => ts.format("%Y%m%d_%H%M%S").to_string(),
        NamingMode::Date => ts.format("%Y-%m-%d").to_string(),
    }
}

/// Wrap a base name as `{prefix-}{base}{-suffix}` and append the extension.
pub fn compose(options: &NamingOptions, base: &str, extension: &str) -> String {
    let mut name = base.to_string();

    if let Some(prefix) = options.prefix.as_deref() {
        name = format!("{}-{}", prefix, name);
    }
    if let Some(suffix) = options.suffix.as_deref() {
        name = format!("{}-{}", name, suffix);
    }

    if extension.is_empty() {
        name
    } else {
        format!("{}.{}", name, extension)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample_ts() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
    }

    fn opts(mode: NamingMode) -> NamingOptions {
        NamingOptions { mode, prefix: None, suffix: None }
    }

    #[test]
    fn datetime_mode() {
        let name = compose(&opts(NamingMode::Datetime), &timestamped_base(NamingMode::Datetime, &sample_ts()), "png");
        assert_eq!(name, "2024-01-01_10-00-00.png");
    }

    #[test]
    fn timestamp_mode() {
        let name = compose(&opts(NamingMode::Timestamp), &timestamped_base(NamingMode::Timestamp, &sample_ts()), "png");
        assert_eq!(name, "20240101_100000.png");
    }

    #[test]
    fn date_mode_with_affixes() {
        let options = NamingOptions {
            mode: NamingMode::Date,
            prefix: Some("project".to_string()),
            suffix: Some("v1".to_string()),
        };
        let name = compose(&options, &timestamped_base(NamingMode::Date, &sample_ts()), "png");
        assert_eq!(name, "project-2024-01-01-v1.png");
    }

    #[test]
    fn ai_mode_falls_back_to_datetime_format() {
        assert_eq!(timestamped_base(NamingMode::Ai, &sample_ts()), "2024-01-01_10-00-00");
    }

    #[test]
    fn same_input_same_output() {
        let a = timestamped_base(NamingMode::Timestamp, &sample_ts());
        let b = timestamped_base(NamingMode::Timestamp, &sample_ts());
        assert_eq!(a, b);
    }

    #[test]
    fn parse_accepts_content_alias() {
        assert_eq!(NamingMode::parse("ai").unwrap(), NamingMode::Ai);
        assert_eq!(NamingMode::parse("content").unwrap(), NamingMode::Ai);
    }

    #[test]
    fn parse_rejects_unknown_pattern() {
        assert!(NamingMode::parse("random").is_err());
    }

    #[test]
    fn extension_is_preserved() {
        let name = compose(&opts(NamingMode::Date), "2024-01-01", "jpeg");
        assert_eq!(name, "2024-01-01.jpeg");
    }
}
