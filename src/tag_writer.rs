use std::path::Path;

use lofty::config::WriteOptions;
use lofty::file::{AudioFile, TaggedFileExt};
use lofty::probe::Probe;
use lofty::tag::{Accessor, Tag};
use tracing::debug;

use crate::error::MutationError;
use crate::tag_parser::ParsedTag;

/// Writes title/artist/album/track number into a file's tag container.
pub trait TagWriter: Send + Sync {
    fn write_tags(&self, path: &Path, tags: &ParsedTag) -> Result<(), MutationError>;
}

/// [`TagWriter`] backed by lofty; creates the file's primary tag when absent.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoftyTagWriter;

impl LoftyTagWriter {
    pub fn new() -> Self {
        Self
    }
}

impl TagWriter for LoftyTagWriter {
    fn write_tags(&self, path: &Path, tags: &ParsedTag) -> Result<(), MutationError> {
        if !path.exists() {
            return Err(MutationError::SourceNotFound(path.to_path_buf()));
        }

        let tag_error = |e: lofty::error::LoftyError| MutationError::Tag {
            path: path.to_path_buf(),
            message: e.to_string(),
        };

        let mut tagged_file = Probe::open(path)
            .map_err(tag_error)?
            .read()
            .map_err(tag_error)?;

        if tagged_file.primary_tag().is_none() {
            let tag_type = tagged_file.primary_tag_type();
            debug!(file = %path.display(), ?tag_type, "Creating empty tag");
            tagged_file.insert_tag(Tag::new(tag_type));
        }

        let tag = tagged_file.primary_tag_mut().ok_or_else(|| MutationError::Tag {
            path: path.to_path_buf(),
            message: "file type does not support tags".to_string(),
        })?;

        tag.set_title(tags.track_title().to_string());
        tag.set_artist(tags.performer().to_string());
        tag.set_album(tags.album().to_string());
        tag.set_track(tags.track_number());

        tagged_file
            .save_to_path(path, WriteOptions::default())
            .map_err(tag_error)?;

        debug!(file = %path.display(), "Tags written");
        Ok(())
    }
}
