//! File relocation: ensure the destination directory, then rename

use std::fs;
use std::path::{Path, PathBuf};

use tracing::trace;

use crate::classify::TargetLocation;
use crate::error::MoveError;

/// Move `source` into its classified target directory, keeping its name.
///
/// Directory creation is recursive and idempotent. The relocation itself is a
/// single rename, atomic within one volume: an interrupted run leaves the
/// file either at `source` or at the returned path, never both and never
/// half-copied. Returns the destination path on success.
pub fn relocate(source: &Path, target: &TargetLocation) -> Result<PathBuf, MoveError> {
	fs::create_dir_all(&target.dir).map_err(|e| MoveError::CreateDir {
		path: target.dir.clone(),
		source: e,
	})?;

	let dest = target.full_path();
	fs::rename(source, &dest).map_err(|e| MoveError::Rename {
		from: source.to_path_buf(),
		to: dest.clone(),
		source: e,
	})?;

	trace!("moved {} -> {}", source.display(), dest.display());
	Ok(dest)
}
