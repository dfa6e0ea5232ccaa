//! Scene selection and per-platform build dispatch, independent of any UI.

use std::fs;
use std::path::{Path, PathBuf};

use bevy::log::{error, info};
use bevy::prelude::Resource;
use chrono::{DateTime, Local};

use super::pipeline::{BuildError, BuildPipeline, BuildTarget};

#[derive(Debug, Clone)]
pub struct BuildConfig {
    pub scenes_dir: PathBuf,
    pub scene_extension: String, // without the leading dot
    pub output_root: PathBuf,
    pub product_name: String,
    pub version_prefix: String,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            scenes_dir: PathBuf::from("assets/scenes"),
            scene_extension: "scn.ron".to_owned(),
            output_root: PathBuf::from("builds"),
            product_name: "BatShowcase".to_owned(),
            version_prefix: "1.0.".to_owned(),
        }
    }
}

/// Where a platform build request is in the settings-review flow.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ReviewState {
    Idle,
    /// asking whether to review player settings first
    Asking,
    /// settings are open, waiting for "Begin Build"
    Reviewing,
}

#[derive(Resource, Debug, Clone)]
pub struct BuildAutomation {
    pub config: BuildConfig,
    scenes: Vec<PathBuf>,
    selected: Vec<PathBuf>,
    pending: Option<BuildTarget>,
    review: ReviewState,
    product_version: Option<String>,
}

pub fn version_stamp(prefix: &str, now: DateTime<Local>) -> String {
    format!("{prefix}{}", now.format("%Y%m%d%H%M%S"))
}

/// Scene files in `dir` ending in `.<extension>`, sorted.
pub fn list_scenes(dir: &Path, extension: &str) -> Result<Vec<PathBuf>, BuildError> {
    let suffix = format!(".{extension}");
    let mut scenes = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let matches = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.ends_with(&suffix) && n.len() > suffix.len());
        if matches && path.is_file() {
            scenes.push(path);
        }
    }
    scenes.sort();
    Ok(scenes)
}

/// File name with the scene extension stripped, e.g. `intro.scn.ron` -> `intro`.
pub fn scene_name(scene: &Path, extension: &str) -> String {
    let suffix = format!(".{extension}");
    match scene.file_name().and_then(|n| n.to_str()) {
        Some(name) => name.strip_suffix(&suffix).unwrap_or(name).to_owned(),
        None => scene
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default(),
    }
}

impl BuildAutomation {
    pub fn new(config: BuildConfig) -> Self {
        Self {
            config,
            scenes: Vec::new(),
            selected: Vec::new(),
            pending: None,
            review: ReviewState::Idle,
            product_version: None,
        }
    }

    /// New panel state with the scene folder already listed.
    pub fn open(config: BuildConfig) -> Self {
        let mut automation = Self::new(config);
        if let Err(err) = automation.refresh_scenes() {
            error!(
                "Could not list scenes in {}: {err}",
                automation.config.scenes_dir.display()
            );
        }
        automation
    }

    pub fn refresh_scenes(&mut self) -> Result<usize, BuildError> {
        self.scenes.clear();
        self.scenes = list_scenes(&self.config.scenes_dir, &self.config.scene_extension)?;
        Ok(self.scenes.len())
    }

    pub fn scenes(&self) -> &[PathBuf] {
        &self.scenes
    }

    pub fn selected(&self) -> &[PathBuf] {
        &self.selected
    }

    pub fn pending(&self) -> Option<BuildTarget> {
        self.pending
    }

    pub fn review_state(&self) -> ReviewState {
        self.review
    }

    pub fn product_version(&self) -> Option<&str> {
        self.product_version.as_deref()
    }

    pub fn is_selected(&self, scene: &Path) -> bool {
        self.selected.iter().any(|s| s == scene)
    }

    // keeps selection order, no duplicates
    pub fn set_selected(&mut self, scene: &Path, selected: bool) {
        if selected {
            if !self.is_selected(scene) {
                self.selected.push(scene.to_path_buf());
            }
        } else {
            self.selected.retain(|s| s != scene);
        }
    }

    pub fn toggle(&mut self, scene: &Path) {
        let selected = self.is_selected(scene);
        self.set_selected(scene, !selected);
    }

    fn require_selection(&self) -> Result<(), BuildError> {
        if self.selected.is_empty() {
            error!("No scenes selected.");
            return Err(BuildError::NoScenesSelected);
        }
        Ok(())
    }

    /// "Build Windows" / "Build Android": remembers the target and asks about settings.
    pub fn request_build(&mut self, target: BuildTarget) -> Result<(), BuildError> {
        self.require_selection()?;
        self.pending = Some(target);
        self.review = ReviewState::Asking;
        Ok(())
    }

    /// Answer to the settings prompt. Declining builds right away.
    pub fn answer_review(
        &mut self,
        review_settings: bool,
        pipeline: &mut dyn BuildPipeline,
    ) -> Result<Vec<PathBuf>, BuildError> {
        if self.review != ReviewState::Asking {
            return Ok(Vec::new());
        }

        if review_settings {
            self.review = ReviewState::Reviewing;
            info!("Player settings opened. Click \"Begin Build\" when done.");
            return Ok(Vec::new());
        }

        self.review = ReviewState::Idle;
        match self.pending.take() {
            Some(target) => self.build_target(target, pipeline),
            None => Ok(Vec::new()),
        }
    }

    pub fn begin_build(&mut self, pipeline: &mut dyn BuildPipeline) -> Result<Vec<PathBuf>, BuildError> {
        self.review = ReviewState::Idle;
        match self.pending.take() {
            Some(target) => self.build_target(target, pipeline),
            None => Ok(Vec::new()),
        }
    }

    /// Windows then Android for every selected scene, skipping the settings prompt.
    pub fn build_all(&mut self, pipeline: &mut dyn BuildPipeline) -> Result<Vec<PathBuf>, BuildError> {
        self.require_selection()?;

        info!("Building for all platforms with default settings...");
        let mut artifacts = self.build_target(BuildTarget::Windows, pipeline)?;
        artifacts.extend(self.build_target(BuildTarget::Android, pipeline)?);
        info!("All builds complete.");
        Ok(artifacts)
    }

    pub fn artifact_path(&self, scene: &Path, target: BuildTarget, version: &str) -> PathBuf {
        let name = scene_name(scene, &self.config.scene_extension);
        self.config.output_root.join(target.platform_dir()).join(format!(
            "{name}_{}_{version}.{}",
            self.config.product_name,
            target.artifact_extension()
        ))
    }

    /// One artifact per selected scene. Exporter failures are logged and the
    /// remaining scenes still build.
    pub fn build_target(
        &mut self,
        target: BuildTarget,
        pipeline: &mut dyn BuildPipeline,
    ) -> Result<Vec<PathBuf>, BuildError> {
        self.require_selection()?;

        let version = version_stamp(&self.config.version_prefix, Local::now());
        pipeline.set_product_version(&version);
        self.product_version = Some(version.clone());

        let mut artifacts = Vec::with_capacity(self.selected.len());
        for scene in &self.selected {
            let name = scene_name(scene, &self.config.scene_extension);
            let path = self.artifact_path(scene, target, &version);

            if let Some(dir) = path.parent() {
                if !dir.exists() {
                    fs::create_dir_all(dir)?;
                }
            }

            match pipeline.build_player(std::slice::from_ref(scene), &path, target) {
                Ok(()) => {
                    info!("{target} build for {name} saved to: {}", path.display());
                    artifacts.push(path);
                }
                Err(err) => error!("{target} build for {name} failed: {err}"),
            }
        }
        Ok(artifacts)
    }
}
