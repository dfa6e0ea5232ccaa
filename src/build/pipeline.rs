//! Build pipeline seam and the external exporter used by default.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;

/// Errors from the build tooling.
#[derive(Error, Debug)]
pub enum BuildError {
    #[error("No scenes selected.")]
    NoScenesSelected,
    #[error("Filesystem error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to spawn exporter {program}: {source}")]
    PipelineSpawn {
        program: PathBuf,
        source: std::io::Error,
    },
    #[error("Exporter failed for {scene} (exit code {code:?})")]
    PipelineFailed { scene: PathBuf, code: Option<i32> },
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum BuildTarget {
    Windows,
    Android,
}

impl BuildTarget {
    /// Subfolder under the output root.
    pub fn platform_dir(self) -> &'static str {
        match self {
            BuildTarget::Windows => "Windows",
            BuildTarget::Android => "Android",
        }
    }

    pub fn artifact_extension(self) -> &'static str {
        match self {
            BuildTarget::Windows => "exe",
            BuildTarget::Android => "apk",
        }
    }

    pub fn triple(self) -> &'static str {
        match self {
            BuildTarget::Windows => "x86_64-pc-windows-msvc",
            BuildTarget::Android => "aarch64-linux-android",
        }
    }
}

impl fmt::Display for BuildTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.platform_dir())
    }
}

/// Whatever actually produces a player build for a set of scenes.
pub trait BuildPipeline {
    fn set_product_version(&mut self, version: &str);

    fn build_player(
        &mut self,
        scenes: &[PathBuf],
        output: &Path,
        target: BuildTarget,
    ) -> Result<(), BuildError>;
}

/// Runs an external exporter once per artifact:
/// `program --scene S --target T --output O --version V`.
#[derive(Debug, Clone)]
pub struct CommandPipeline {
    pub program: PathBuf,
    pub extra_args: Vec<String>,
    version: String,
}

impl CommandPipeline {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            extra_args: Vec::new(),
            version: String::new(),
        }
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn command(&self, scenes: &[PathBuf], output: &Path, target: BuildTarget) -> Command {
        let mut cmd = Command::new(&self.program);
        for scene in scenes {
            cmd.arg("--scene").arg(scene);
        }
        cmd.arg("--target")
            .arg(target.triple())
            .arg("--output")
            .arg(output)
            .arg("--version")
            .arg(&self.version)
            .args(&self.extra_args);
        cmd
    }
}

impl BuildPipeline for CommandPipeline {
    fn set_product_version(&mut self, version: &str) {
        self.version = version.to_owned();
    }

    fn build_player(
        &mut self,
        scenes: &[PathBuf],
        output: &Path,
        target: BuildTarget,
    ) -> Result<(), BuildError> {
        let status = self
            .command(scenes, output, target)
            .status()
            .map_err(|source| BuildError::PipelineSpawn {
                program: self.program.clone(),
                source,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(BuildError::PipelineFailed {
                scene: scenes.first().cloned().unwrap_or_default(),
                code: status.code(),
            })
        }
    }
}
