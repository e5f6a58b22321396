// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Rename planning and execution

use chrono::{DateTime, Local, NaiveDateTime};
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::{debug, error, warn};

use crate::config::AppConfig;
use crate::naming::{self, NamingMode, NamingOptions};
use crate::pattern;
use crate::vision::{self, VisionClient};
use crate::{Result, ShutterError};

/// A planned rename, ready to print or execute
#[derive(Debug, Clone)]
pub struct RenamePlan {
    pub source: PathBuf,
    pub dest: PathBuf,
    /// True when a numeric suffix was appended to dodge an existing file
    pub collision_resolved: bool,
}

/// Driver for one invocation: resolves targets, plans and applies renames
pub struct Renamer {
    config: AppConfig,
    options: NamingOptions,
    dry_run: bool,
    force: bool,
    vision: Option<VisionClient>,
}

impl Renamer {
    /// Create a new driver.
    ///
    /// In AI mode the vision client is built from the environment; a missing
    /// API key downgrades the run to datetime naming with a warning.
    pub fn new(config: AppConfig, options: NamingOptions, dry_run: bool, force: bool) -> Self {
        let vision = if options.mode == NamingMode::Ai {
            match VisionClient::from_env(&config.api) {
                Ok(client) => Some(client),
                Err(e) => {
                    warn!("{}. AI naming will fall back to datetime.", e);
                    None
                }
            }
        } else {
            None
        };

        Self { config, options, dry_run, force, vision }
    }

    /// Replace the vision client (e.g. one pointed at a different endpoint)
    pub fn with_vision(mut self, client: VisionClient) -> Self {
        self.vision = Some(client);
        self
    }

    /// Rename a single file.
    ///
    /// Files that do not match a screenshot template are renamed anyway,
    /// with a warning, using the modification time as the timestamp source.
    pub async fn run_file(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            return Err(ShutterError::Config(format!("File not found: {}", path.display())));
        }
        if !path.is_file() {
            return Err(ShutterError::Config(format!("Not a file: {}", path.display())));
        }

        let (timestamp, extension) = match pattern::match_screenshot(path) {
            Some(candidate) => {
                debug!("Recognized {} pattern: {:?}", candidate.kind.as_str(), path);
                (candidate.timestamp, candidate.extension)
            }
            None => {
                warn!("{} does not look like a macOS screenshot, renaming anyway", short(path));
                let ext = path
                    .extension()
                    .and_then(|e| e.to_str())
                    .unwrap_or("")
                    .to_string();
                (None, ext)
            }
        };

        self.process(path, timestamp, &extension).await
    }

    /// Rename every screenshot in a folder.
    ///
    /// Files that do not match a screenshot template are skipped silently.
    /// Per-file failures are reported and do not abort the batch.
    pub async fn run_folder(&self, dir: &Path, recursive: bool) -> Result<()> {
        if !dir.exists() {
            return Err(ShutterError::Config(format!("Folder not found: {}", dir.display())));
        }
        if !dir.is_dir() {
            return Err(ShutterError::Config(format!("Not a directory: {}", dir.display())));
        }

        let files = find_screenshots(dir, recursive)?;
        if files.is_empty() {
            println!("No screenshots found in {}", dir.display());
            return Ok(());
        }

        println!("Found {} screenshot(s) to process", files.len());

        let mut renamed = 0usize;
        for path in &files {
            let candidate = match pattern::match_screenshot(path) {
                Some(c) => c,
                None => continue,
            };

            match self.process(path, candidate.timestamp, &candidate.extension).await {
                Ok(()) => renamed += 1,
                Err(e) => error!("Skipping {}: {}", short(path), e),
            }
        }

        if self.dry_run {
            println!(
                "\nThis was a dry run. {} of {} file(s) would be renamed.",
                renamed,
                files.len()
            );
        } else {
            println!("\nProcessed {} of {} file(s).", renamed, files.len());
        }

        Ok(())
    }

    async fn process(&self, path: &Path, timestamp: Option<NaiveDateTime>, extension: &str) -> Result<()> {
        let plan = self.plan(path, timestamp, extension).await?;

        if plan.dest == plan.source {
            println!("Already named: {}", short(&plan.source));
            return Ok(());
        }

        self.execute(&plan)
    }

    /// Compute the destination for one file, applying the collision policy.
    pub async fn plan(
        &self,
        path: &Path,
        timestamp: Option<NaiveDateTime>,
        extension: &str,
    ) -> Result<RenamePlan> {
        let ts = match timestamp {
            Some(t) => t,
            None => modified_timestamp(path)?,
        };

        let base = match (self.options.mode, &self.vision) {
            (NamingMode::Ai, Some(client)) => {
                match client.describe_image(path, &self.config.prompt).await {
                    Ok(text) => {
                        let slug = vision::slugify(&text, self.config.rules.max_slug_length);
                        if slug.is_empty() {
                            warn!("Unusable description for {}, falling back to datetime", short(path));
                            naming::timestamped_base(self.options.mode, &ts)
                        } else {
                            slug
                        }
                    }
                    Err(e) => {
                        warn!("Vision request failed for {}: {}. Falling back to datetime.", short(path), e);
                        naming::timestamped_base(self.options.mode, &ts)
                    }
                }
            }
            _ => naming::timestamped_base(self.options.mode, &ts),
        };

        let name = naming::compose(&self.options, &base, extension);

        let parent = path
            .parent()
            .ok_or_else(|| ShutterError::Config("Cannot determine parent directory".to_string()))?;
        let dest = parent.join(&name);

        if dest != path && dest.exists() {
            if !self.force {
                return Err(ShutterError::Collision(dest.display().to_string()));
            }
            let resolved = resolve_collision(&dest);
            debug!("Collision on {}, resolved to {}", short(&dest), short(&resolved));
            return Ok(RenamePlan {
                source: path.to_path_buf(),
                dest: resolved,
                collision_resolved: true,
            });
        }

        Ok(RenamePlan {
            source: path.to_path_buf(),
            dest,
            collision_resolved: false,
        })
    }

    /// Apply (or, in dry-run mode, print) a rename plan.
    pub fn execute(&self, plan: &RenamePlan) -> Result<()> {
        if self.dry_run {
            println!("Would rename: {} -> {}", short(&plan.source), short(&plan.dest));
            return Ok(());
        }

        std::fs::rename(&plan.source, &plan.dest)?;
        println!("Renamed: {} -> {}", short(&plan.source), short(&plan.dest));
        Ok(())
    }
}

/// Find screenshot files under a directory, in sorted pre-order.
pub fn find_screenshots(dir: &Path, recursive: bool) -> Result<Vec<PathBuf>> {
    let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .collect();
    entries.sort();

    let mut found = Vec::new();
    for path in entries {
        if path.is_dir() {
            if recursive {
                found.extend(find_screenshots(&path, true)?);
            }
        } else if pattern::match_screenshot(&path).is_some() {
            found.push(path);
        }
    }

    Ok(found)
}

/// Append the smallest unused numeric suffix to a taken destination.
pub fn resolve_collision(dest: &Path) -> PathBuf {
    let parent = dest.parent().map(Path::to_path_buf).unwrap_or_default();
    let stem = dest
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("renamed");
    let extension = dest.extension().and_then(|e| e.to_str());

    let mut counter = 1u32;
    loop {
        let name = match extension {
            Some(ext) => format!("{}-{}.{}", stem, counter, ext),
            None => format!("{}-{}", stem, counter),
        };
        let candidate = parent.join(name);
        if !candidate.exists() {
            return candidate;
        }
        counter += 1;
    }
}

fn modified_timestamp(path: &Path) -> Result<NaiveDateTime> {
    let modified = std::fs::metadata(path)?.modified()?;
    Ok(DateTime::<Local>::from(modified).naive_local())
}

fn short(path: &Path) -> Cow<'_, str> {
    path.file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_else(|| path.to_string_lossy())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const SHOT: &str = "Screenshot 2024-01-01 at 10.00.00 AM.png";

    fn renamer(mode: NamingMode, dry_run: bool, force: bool) -> Renamer {
        let options = NamingOptions { mode, prefix: None, suffix: None };
        Renamer::new(AppConfig::default(), options, dry_run, force)
    }

    fn touch(dir: &TempDir, name: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, b"png").unwrap();
        path
    }

    #[tokio::test]
    async fn renames_to_embedded_timestamp() {
        let dir = TempDir::new().unwrap();
        let src = touch(&dir, SHOT);

        renamer(NamingMode::Datetime, false, false).run_file(&src).await.unwrap();

        assert!(!src.exists());
        assert!(dir.path().join("2024-01-01_10-00-00.png").exists());
    }

    #[tokio::test]
    async fn dry_run_mutates_nothing() {
        let dir = TempDir::new().unwrap();
        let src = touch(&dir, SHOT);

        renamer(NamingMode::Datetime, true, false).run_file(&src).await.unwrap();

        assert!(src.exists());
        assert!(!dir.path().join("2024-01-01_10-00-00.png").exists());
    }

    #[tokio::test]
    async fn collision_without_force_fails() {
        let dir = TempDir::new().unwrap();
        let src = touch(&dir, SHOT);
        touch(&dir, "2024-01-01_10-00-00.png");

        let err = renamer(NamingMode::Datetime, false, false).run_file(&src).await.unwrap_err();
        assert!(matches!(err, ShutterError::Collision(_)));
        assert!(src.exists());
    }

    #[tokio::test]
    async fn force_picks_smallest_unused_suffix() {
        let dir = TempDir::new().unwrap();
        let src = touch(&dir, SHOT);
        touch(&dir, "2024-01-01_10-00-00.png");
        touch(&dir, "2024-01-01_10-00-00-1.png");

        renamer(NamingMode::Datetime, false, true).run_file(&src).await.unwrap();

        assert!(!src.exists());
        assert!(dir.path().join("2024-01-01_10-00-00-2.png").exists());
    }

    #[tokio::test]
    async fn plan_marks_collision_resolution() {
        let dir = TempDir::new().unwrap();
        let src = touch(&dir, SHOT);
        touch(&dir, "2024-01-01_10-00-00.png");

        let r = renamer(NamingMode::Datetime, false, true);
        let candidate = pattern::match_screenshot(&src).unwrap();
        let plan = r.plan(&src, candidate.timestamp, &candidate.extension).await.unwrap();

        assert!(plan.collision_resolved);
        assert!(!plan.dest.exists());
    }

    #[tokio::test]
    async fn unrecognized_file_uses_mtime() {
        let dir = TempDir::new().unwrap();
        let src = touch(&dir, "holiday.png");

        renamer(NamingMode::Datetime, false, false).run_file(&src).await.unwrap();

        // Renamed to some datetime name derived from the mtime
        assert!(!src.exists());
        let remaining: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(remaining.len(), 1);
        assert!(remaining[0].ends_with(".png"));
        assert_ne!(remaining[0], "holiday.png");
    }

    #[tokio::test]
    async fn missing_file_is_config_error() {
        let err = renamer(NamingMode::Datetime, false, false)
            .run_file(Path::new("/nonexistent/shot.png"))
            .await
            .unwrap_err();
        assert!(matches!(err, ShutterError::Config(_)));
    }

    #[tokio::test]
    async fn folder_renames_screenshots_and_skips_the_rest() {
        let dir = TempDir::new().unwrap();
        touch(&dir, SHOT);
        touch(&dir, "unrelated.png");

        renamer(NamingMode::Datetime, false, false)
            .run_folder(dir.path(), false)
            .await
            .unwrap();

        assert!(dir.path().join("2024-01-01_10-00-00.png").exists());
        assert!(dir.path().join("unrelated.png").exists());
        assert!(!dir.path().join(SHOT).exists());
    }

    #[tokio::test]
    async fn folder_recursion_reaches_subdirectories() {
        let dir = TempDir::new().unwrap();
        let sub = dir.path().join("nested");
        fs::create_dir(&sub).unwrap();
        fs::write(sub.join(SHOT), b"png").unwrap();

        renamer(NamingMode::Datetime, false, false)
            .run_folder(dir.path(), true)
            .await
            .unwrap();

        assert!(sub.join("2024-01-01_10-00-00.png").exists());
    }

    #[tokio::test]
    async fn folder_without_recursion_ignores_subdirectories() {
        let dir = TempDir::new().unwrap();
        let sub = dir.path().join("nested");
        fs::create_dir(&sub).unwrap();
        fs::write(sub.join(SHOT), b"png").unwrap();

        renamer(NamingMode::Datetime, false, false)
            .run_folder(dir.path(), false)
            .await
            .unwrap();

        assert!(sub.join(SHOT).exists());
    }

    #[test]
    fn find_screenshots_is_sorted() {
        let dir = TempDir::new().unwrap();
        touch(&dir, "Screenshot 2024-01-02 at 1.00.00 PM.png");
        touch(&dir, "Screenshot 2024-01-01 at 1.00.00 PM.png");
        touch(&dir, "notes.txt");

        let found = find_screenshots(dir.path(), false).unwrap();
        assert_eq!(found.len(), 2);
        assert!(found[0] < found[1]);
    }

    #[tokio::test]
    async fn ai_mode_names_from_vision_slug() {
        let server = httpmock::MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(httpmock::Method::POST).path("/chat/completions");
                then.status(200).json_body(serde_json::json!({
                    "choices": [{"message": {"role": "assistant", "content": "Login Page"}}]
                }));
            })
            .await;

        let dir = TempDir::new().unwrap();
        let src = touch(&dir, SHOT);

        let mut config = AppConfig::default();
        config.api.url = server.url("");
        let client = VisionClient::new(&config.api, "test-key".to_string());

        let options = NamingOptions { mode: NamingMode::Ai, prefix: None, suffix: None };
        let r = Renamer::new(config, options, false, false).with_vision(client);
        r.run_file(&src).await.unwrap();

        assert!(dir.path().join("login-page.png").exists());
    }

    #[tokio::test]
    async fn ai_mode_falls_back_when_the_service_errors() {
        let server = httpmock::MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(httpmock::Method::POST).path("/chat/completions");
                then.status(500);
            })
            .await;

        let dir = TempDir::new().unwrap();
        let src = touch(&dir, SHOT);

        let mut config = AppConfig::default();
        config.api.url = server.url("");
        let client = VisionClient::new(&config.api, "test-key".to_string());

        let options = NamingOptions { mode: NamingMode::Ai, prefix: None, suffix: None };
        let r = Renamer::new(config, options, false, false).with_vision(client);
        r.run_file(&src).await.unwrap();

        assert!(dir.path().join("2024-01-01_10-00-00.png").exists());
    }

    #[test]
    fn resolve_collision_terminates_on_free_name() {
        let dir = TempDir::new().unwrap();
        let taken = touch(&dir, "2024-01-01.png");
        touch(&dir, "2024-01-01-1.png");
        touch(&dir, "2024-01-01-2.png");

        let free = resolve_collision(&taken);
        assert_eq!(free, dir.path().join("2024-01-01-3.png"));
        assert!(!free.exists());
    }
}
