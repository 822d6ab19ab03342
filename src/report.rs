use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::batch::{Batch, Collision, PlannedOperation};
use crate::config::Mode;
use crate::executor::Summary;

/// Machine-readable record of one run, written with `--report`.
#[derive(Debug, Serialize)]
pub struct RunReport<'a> {
    pub mode: Mode,
    pub dry_run: bool,
    pub root: &'a Path,
    pub operations: &'a [PlannedOperation],
    pub collisions: &'a [Collision],
    pub summary: &'a Summary,
}

impl<'a> RunReport<'a> {
    pub fn new(batch: &'a Batch, dry_run: bool, summary: &'a Summary) -> Self {
        Self {
            mode: batch.mode,
            dry_run,
            root: &batch.root,
            operations: &batch.operations,
            collisions: &batch.collisions,
            summary,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize report")
    }

    pub fn write_to(&self, path: &Path) -> Result<()> {
        let json = self.to_json()?;
        fs::write(path, json).with_context(|| format!("Failed to write report to {}", path.display()))
    }
}
