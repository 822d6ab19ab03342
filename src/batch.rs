use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::Mode;
use crate::tag_parser::ParsedTag;

pub const NO_MATCH_REASON: &str = "does not match expected pattern";

/// The single mutation a planned operation will perform.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Action {
    Rename { target: PathBuf },
    WriteTags { tags: ParsedTag },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "reason", rename_all = "snake_case")]
pub enum OperationStatus {
    Planned,
    Skipped(String),
    Succeeded,
    Failed(String),
}

impl OperationStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, OperationStatus::Succeeded | OperationStatus::Failed(_))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PlannedOperation {
    pub source: PathBuf,
    /// `None` for operations skipped during planning.
    pub action: Option<Action>,
    pub status: OperationStatus,
}

impl PlannedOperation {
    pub fn planned(source: PathBuf, action: Action) -> Self {
        Self {
            source,
            action: Some(action),
            status: OperationStatus::Planned,
        }
    }

    pub fn unmatched(source: PathBuf) -> Self {
        Self::skipped(source, NO_MATCH_REASON)
    }

    /// Skipped with no action attached; never executed.
    pub fn skipped(source: PathBuf, reason: &str) -> Self {
        Self {
            source,
            action: None,
            status: OperationStatus::Skipped(reason.to_string()),
        }
    }

    pub fn target(&self) -> Option<&Path> {
        match &self.action {
            Some(Action::Rename { target }) => Some(target),
            _ => None,
        }
    }

    /// One-line description of the intended mutation.
    pub fn describe(&self) -> String {
        match &self.action {
            Some(Action::Rename { target }) => {
                format!("rename {} -> {}", self.source.display(), target.display())
            }
            Some(Action::WriteTags { tags }) => format!(
                "tag {} with title={:?} artist={:?} album={:?} track={}",
                self.source.display(),
                tags.track_title(),
                tags.performer(),
                tags.album(),
                tags.track_number()
            ),
            None => format!("leave {}", self.source.display()),
        }
    }
}

/// Several sources that would be renamed onto the same target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Collision {
    pub target: PathBuf,
    /// First source seen during the walk.
    pub primary: PathBuf,
    pub colliders: Vec<PathBuf>,
}

/// Everything one planning pass produced, in walk order.
#[derive(Debug, Clone, Serialize)]
pub struct Batch {
    pub root: PathBuf,
    pub mode: Mode,
    pub operations: Vec<PlannedOperation>,
    pub collisions: Vec<Collision>,
}

impl Batch {
    pub fn planned_count(&self) -> usize {
        self.count(|status| matches!(status, OperationStatus::Planned))
    }

    pub fn skipped_count(&self) -> usize {
        self.count(|status| matches!(status, OperationStatus::Skipped(_)))
    }

    pub fn has_collisions(&self) -> bool {
        !self.collisions.is_empty()
    }

    /// `Skipped: '<path>' - <reason>` for every skipped operation.
    pub fn skip_diagnostics(&self) -> Vec<String> {
        self.operations
            .iter()
            .filter_map(|op| match &op.status {
                OperationStatus::Skipped(reason) => {
                    Some(format!("Skipped: '{}' - {}", op.source.display(), reason))
                }
                _ => None,
            })
            .collect()
    }

    fn count(&self, pred: impl Fn(&OperationStatus) -> bool) -> usize {
        self.operations.iter().filter(|op| pred(&op.status)).count()
    }
}
