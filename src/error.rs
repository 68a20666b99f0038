//! Error types for the organizing pipeline

use std::path::PathBuf;
use thiserror::Error;

/// Failure modes of a full organizing run.
///
/// The walk distinguishes structural failures, which abort the run, from
/// per-file failures, which are recorded and skipped. A destination directory
/// that cannot be created is structural: every later file in the same bucket
/// would hit the same wall. A single failed rename is not; see
/// [`MoveError::Rename`].
#[derive(Debug, Error)]
pub enum OrganizeError {
	/// The walk itself failed mid-traversal (e.g. the root vanished).
	#[error("walk failed: {0}")]
	Walk(#[from] walkdir::Error),

	/// A destination directory could not be created.
	#[error("failed to create {path}: {source}")]
	CreateDir {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	/// Other filesystem I/O errors.
	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),
}

/// Per-file failures reported by the mover.
#[derive(Debug, Error)]
pub enum MoveError {
	/// The target directory could not be created. Escalated by the organizer
	/// to [`OrganizeError::CreateDir`].
	#[error("failed to create {path}: {source}")]
	CreateDir {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	/// The rename failed (cross-device, permissions, name collision).
	/// Recoverable: recorded and the walk continues.
	#[error("failed to move {from} to {to}: {source}")]
	Rename {
		from: PathBuf,
		to: PathBuf,
		#[source]
		source: std::io::Error,
	},
}

/// Convenience alias for organizing results.
pub type OrganizeResult<T> = Result<T, OrganizeError>;

#[cfg(test)]
mod tests {
	use super::*;
	use std::path::PathBuf;

	#[test_log::test]
	fn test_organize_error_display() {
		let error = OrganizeError::CreateDir {
			path: PathBuf::from("/photos/2024"),
			source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
		};
		assert_eq!(error.to_string(), "failed to create /photos/2024: denied");
	}

	#[test_log::test]
	fn test_move_error_display() {
		let error = MoveError::Rename {
			from: PathBuf::from("/photos/a.jpg"),
			to: PathBuf::from("/photos/2024/a.jpg"),
			source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
		};
		assert_eq!(
			error.to_string(),
			"failed to move /photos/a.jpg to /photos/2024/a.jpg: denied"
		);
	}

	#[test_log::test]
	fn test_error_conversion() {
		let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
		let organize_error: OrganizeError = io_error.into();
		assert!(matches!(organize_error, OrganizeError::Io(_)));
	}
}
