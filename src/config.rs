use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::InvocationError;

pub const DEFAULT_EXTENSION: &str = "mp3";

/// What a batch does with each matching file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Rename,
    WriteTags,
}

#[derive(Debug, Clone)]
pub struct PlanConfig {
    pub root: PathBuf,
    pub recursive: bool,
    pub mode: Mode,
    /// Without the leading dot, compared ASCII case-insensitively.
    pub extension: String,
}

pub struct ConfigBuilder {
    directory: Option<PathBuf>,
    recursive: bool,
    mode: Mode,
    extension: String,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            directory: None,
            recursive: false,
            mode: Mode::Rename,
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }

    pub fn directory<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.directory = Some(dir.as_ref().to_path_buf());
        self
    }

    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn extension(mut self, extension: &str) -> Self {
        // accept ".mp3" as well as "mp3"
        self.extension = extension.trim().trim_start_matches('.').to_string();
        self
    }

    pub fn build(self) -> Result<PlanConfig, InvocationError> {
        let root = self.directory.ok_or(InvocationError::MissingDirectory)?;

        if self.extension.is_empty() {
            return Err(InvocationError::EmptyExtension);
        }

        Ok(PlanConfig {
            root,
            recursive: self.recursive,
            mode: self.mode,
            extension: self.extension,
        })
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
