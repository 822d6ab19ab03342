use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::batch::{Action, Batch, Collision, NO_MATCH_REASON, OperationStatus, PlannedOperation};
use crate::config::{Mode, PlanConfig};
use crate::error::InvocationError;
use crate::name_parser::parse_name;
use crate::normalizer::normalize;
use crate::synthesizer::synthesize_name;
use crate::tag_parser::parse_tag;

const SEPARATOR_REASON: &str = "target name contains a path separator";

/// Turns a directory listing into a [`Batch`] without touching the filesystem.
#[derive(Debug)]
pub struct BatchPlanner {
    config: PlanConfig,
}

impl BatchPlanner {
    pub fn new(config: PlanConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PlanConfig {
        &self.config
    }

    pub fn plan(&self) -> Result<Batch, InvocationError> {
        let root = &self.config.root;
        validate_root(root)?;

        info!(
            root = %root.display(),
            recursive = self.config.recursive,
            mode = ?self.config.mode,
            "Planning batch"
        );

        let mut operations = Vec::new();
        for path in self.scan_directory() {
            operations.push(self.plan_file(path));
        }

        let collisions = flag_collisions(&mut operations);

        let batch = Batch {
            root: root.clone(),
            mode: self.config.mode,
            operations,
            collisions,
        };

        info!(
            planned = batch.planned_count(),
            skipped = batch.skipped_count(),
            collisions = batch.collisions.len(),
            "Planning complete"
        );

        Ok(batch)
    }

    /// Plans a single file; `path` need not exist.
    pub fn plan_file(&self, path: PathBuf) -> PlannedOperation {
        let Some(raw_name) = path.file_name().map(|n| n.to_string_lossy().into_owned()) else {
            return self.skip(path);
        };
        let file_name = normalize(&raw_name);
        let extension = &self.config.extension;

        let action = match self.config.mode {
            Mode::Rename => match parse_name(&file_name, extension) {
                Some(parsed) => {
                    let new_name = synthesize_name(&parsed, extension);
                    // NFKC turns full-width solidus into '/', which would nest the target
                    if new_name.contains(['/', '\\']) {
                        return self.skip_with(path, SEPARATOR_REASON);
                    }
                    let target = path.parent().unwrap_or(Path::new("")).join(new_name);
                    Some(Action::Rename { target })
                }
                None => None,
            },
            Mode::WriteTags => parse_tag(&file_name, extension).map(|tags| Action::WriteTags { tags }),
        };

        match action {
            Some(action) => {
                debug!(source = %path.display(), ?action, "Matched convention");
                PlannedOperation::planned(path, action)
            }
            None => self.skip(path),
        }
    }

    fn skip(&self, path: PathBuf) -> PlannedOperation {
        self.skip_with(path, NO_MATCH_REASON)
    }

    fn skip_with(&self, path: PathBuf, reason: &str) -> PlannedOperation {
        warn!("Skipped: '{}' - {}", path.display(), reason);
        PlannedOperation::skipped(path, reason)
    }

    /// Matching regular files in walk order, sorted by name within each directory.
    fn scan_directory(&self) -> Vec<PathBuf> {
        let max_depth = if self.config.recursive { usize::MAX } else { 1 };

        let walker = WalkDir::new(&self.config.root)
            .follow_links(false)
            .min_depth(1)
            .max_depth(max_depth)
            .sort_by_file_name();

        let mut files = Vec::new();
        for entry in walker {
            match entry {
                Ok(entry) => {
                    if entry.file_type().is_file() && self.has_extension(entry.path()) {
                        files.push(entry.into_path());
                    }
                }
                Err(e) => {
                    warn!("Error accessing entry: {}", e);
                }
            }
        }

        debug!("{} candidate files discovered", files.len());
        files
    }

    fn has_extension(&self, path: &Path) -> bool {
        path.extension()
            .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case(&self.config.extension))
    }
}

fn validate_root(root: &Path) -> Result<(), InvocationError> {
    if !root.exists() {
        return Err(InvocationError::DirectoryNotFound(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(InvocationError::NotADirectory(root.to_path_buf()));
    }
    fs::read_dir(root).map_err(|source| InvocationError::Unreadable {
        path: root.to_path_buf(),
        source,
    })?;
    Ok(())
}

/// Groups rename operations by target and skips every member of a group
/// with more than one source. Returns one [`Collision`] per such group.
fn flag_collisions(operations: &mut [PlannedOperation]) -> Vec<Collision> {
    let mut by_target: HashMap<PathBuf, Vec<usize>> = HashMap::new();
    let mut order = Vec::new();

    for (index, op) in operations.iter().enumerate() {
        if op.status != OperationStatus::Planned {
            continue;
        }
        if let Some(target) = op.target() {
            let slot = by_target.entry(target.to_path_buf()).or_default();
            if slot.is_empty() {
                order.push(target.to_path_buf());
            }
            slot.push(index);
        }
    }

    let mut collisions = Vec::new();
    for target in order {
        let indices = &by_target[&target];
        if indices.len() < 2 {
            continue;
        }

        let primary = operations[indices[0]].source.clone();
        let colliders: Vec<PathBuf> = indices[1..]
            .iter()
            .map(|&i| operations[i].source.clone())
            .collect();

        warn!(
            target = %target.display(),
            primary = %primary.display(),
            colliders = colliders.len(),
            "Target name collision"
        );

        for &i in indices {
            let others: Vec<String> = indices
                .iter()
                .filter(|&&j| j != i)
                .map(|&j| format!("'{}'", operations[j].source.display()))
                .collect();
            operations[i].status = OperationStatus::Skipped(format!(
                "target '{}' collides with {}",
                target.display(),
                others.join(", ")
            ));
        }

        collisions.push(Collision {
            target,
            primary,
            colliders,
        });
    }

    collisions
}
