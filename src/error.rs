// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Error types for Shutter

use thiserror::Error;

/// Result type alias for Shutter operations
pub type Result<T> = std::result::Result<T, ShutterError>;

/// Shutter error types
#[derive(Error, Debug)]
pub enum ShutterError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("File system error: {0}")]
    FileSystem(#[from] std::io::Error),

    #[error("API error: {0}")]
    Api(#[from] reqwest::Error),

    #[error("Vision service not available: {0}")]
    VisionUnavailable(String),

    #[error("Destination already exists: {0}")]
    Collision(String),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
