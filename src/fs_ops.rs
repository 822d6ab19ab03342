use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::error::MutationError;

/// Renames `source` to `target`, refusing to replace an existing target.
///
/// Links the new name first and then unlinks the old one, so an existing
/// target makes the call fail instead of being replaced. Filesystems
/// without hard links fall back to a checked `fs::rename`.
pub fn rename_no_clobber(source: &Path, target: &Path) -> Result<(), MutationError> {
    if fs::symlink_metadata(source).is_err() {
        return Err(MutationError::SourceNotFound(source.to_path_buf()));
    }

    match fs::hard_link(source, target) {
        Ok(()) => {
            if let Err(e) = fs::remove_file(source) {
                // keep the file under exactly one name
                let _ = fs::remove_file(target);
                return Err(MutationError::from_io(source, e));
            }
            Ok(())
        }
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            Err(MutationError::AlreadyExists(target.to_path_buf()))
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Err(missing_path(source, target)),
        Err(_) => checked_rename(source, target),
    }
}

fn checked_rename(source: &Path, target: &Path) -> Result<(), MutationError> {
    if fs::symlink_metadata(target).is_ok() {
        return Err(MutationError::AlreadyExists(target.to_path_buf()));
    }

    fs::rename(source, target).map_err(|e| match e.kind() {
        ErrorKind::NotFound => missing_path(source, target),
        _ => MutationError::from_io(source, e),
    })
}

/// Tells a vanished source apart from a missing target directory.
fn missing_path(source: &Path, target: &Path) -> MutationError {
    if fs::symlink_metadata(source).is_err() {
        return MutationError::SourceNotFound(source.to_path_buf());
    }
    let dir = target.parent().unwrap_or(target);
    MutationError::TargetDirectoryNotFound(dir.to_path_buf())
}
