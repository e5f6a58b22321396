// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Shutter: AI-assisted macOS screenshot renamer
//!
//! Renames `Screenshot ... at ....png` style files to datetime, timestamp,
//! date, or vision-model-derived names.

pub mod config;
pub mod error;
pub mod naming;
pub mod pattern;
pub mod renamer;
pub mod vision;

pub use config::AppConfig;
pub use error::{Result, ShutterError};
