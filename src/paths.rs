//! Platform paths for log files

use dirs::cache_dir;
use std::path::PathBuf;

/// Per-user cache directory for filecab. The TUI writes its log file here,
/// since the terminal itself belongs to the display.
pub fn default_log_dir() -> Option<PathBuf> {
	cache_dir().map(|mut p| {
		p.push("filecab");
		p
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_default_log_dir() {
		// On some systems (like CI environments) cache_dir() returns None,
		// which is acceptable. No filesystem access here.
		if let Some(path) = default_log_dir() {
			assert_eq!(path.file_name().unwrap(), "filecab");
			assert!(path.is_absolute());
		}
	}
}
