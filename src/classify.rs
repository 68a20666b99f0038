//! Timestamp classification: map a modification time to a target directory

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

/// How many timestamp-derived path segments form the destination directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Granularity {
	/// One segment: the zero-padded day of month (`root/07`).
	Day,
	/// One segment: the four-digit year (`root/2024`).
	Year,
	/// Two segments: year, then numbered month name (`root/2024/03 - March`).
	YearMonth,
	/// Three segments: year, month, day (`root/2024/03 - March/07`). The
	/// default when no granularity flag is given: absent flags fall through
	/// to the finest split.
	#[default]
	YearMonthDay,
}

impl Granularity {
	/// Select a granularity from the two CLI flags. The month flag wins over
	/// the year flag; neither flag falls through to the finest split.
	pub fn from_flags(by_year: bool, by_month: bool) -> Self {
		if by_month {
			Granularity::YearMonth
		} else if by_year {
			Granularity::Year
		} else {
			Granularity::YearMonthDay
		}
	}
}

impl std::fmt::Display for Granularity {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let label = match self {
			Granularity::Day => "by day",
			Granularity::Year => "by year",
			Granularity::YearMonth => "by month",
			Granularity::YearMonthDay => "by date",
		};
		f.write_str(label)
	}
}

/// Destination computed for one file. The file keeps its original name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetLocation {
	pub dir: PathBuf,
	pub file_name: OsString,
}

impl TargetLocation {
	pub fn full_path(&self) -> PathBuf {
		self.dir.join(&self.file_name)
	}
}

/// Derive the target directory for a file modified at `modified`.
///
/// Pure and total: any valid timestamp produces a valid path. The day segment
/// is always two digits, the month segment is `MM - MonthName`, the year is
/// four digits. Creation time would be the more natural pivot, but it is not
/// portable; modification time is the documented stand-in.
pub fn classify(modified: DateTime<Local>, granularity: Granularity, root: &Path) -> PathBuf {
	let year = modified.format("%Y").to_string();
	let month = modified.format("%m - %B").to_string();
	let day = modified.format("%d").to_string();

	match granularity {
		Granularity::Day => root.join(day),
		Granularity::Year => root.join(year),
		Granularity::YearMonth => root.join(year).join(month),
		Granularity::YearMonthDay => root.join(year).join(month).join(day),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::TimeZone;

	fn sample_time() -> DateTime<Local> {
		Local.with_ymd_and_hms(2024, 3, 7, 12, 30, 0).unwrap()
	}

	#[test]
	fn day_granularity_uses_zero_padded_day() {
		let dir = classify(sample_time(), Granularity::Day, Path::new("/photos"));
		assert_eq!(dir, PathBuf::from("/photos/07"));
	}

	#[test]
	fn year_granularity_uses_four_digit_year() {
		let dir = classify(sample_time(), Granularity::Year, Path::new("/photos"));
		assert_eq!(dir, PathBuf::from("/photos/2024"));
	}

	#[test]
	fn year_month_granularity_numbers_and_names_the_month() {
		let dir = classify(sample_time(), Granularity::YearMonth, Path::new("/photos"));
		assert_eq!(dir, PathBuf::from("/photos/2024/03 - March"));
	}

	#[test]
	fn default_granularity_nests_day_under_year_and_month() {
		let dir = classify(sample_time(), Granularity::YearMonthDay, Path::new("/photos"));
		assert_eq!(dir, PathBuf::from("/photos/2024/03 - March/07"));
	}

	#[test]
	fn flags_select_granularity() {
		assert_eq!(Granularity::from_flags(false, false), Granularity::YearMonthDay);
		assert_eq!(Granularity::from_flags(true, false), Granularity::Year);
		assert_eq!(Granularity::from_flags(false, true), Granularity::YearMonth);
	}

	#[test]
	fn month_flag_wins_over_year_flag() {
		assert_eq!(Granularity::from_flags(true, true), Granularity::YearMonth);
	}

	#[test]
	fn target_location_joins_name() {
		let target = TargetLocation {
			dir: PathBuf::from("/photos/2024"),
			file_name: OsString::from("a.jpg"),
		};
		assert_eq!(target.full_path(), PathBuf::from("/photos/2024/a.jpg"));
	}
}
