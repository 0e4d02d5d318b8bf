use crate::planner::{RenameEntry, RenamePlan};
use chrono::{Local, TimeZone};
use filetime::FileTime;
use serde::{Deserialize, Serialize};
use std::fs;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ApplyResult {
    pub renamed: usize,
    pub failures: Vec<RenameFailure>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenameFailure {
    pub original_name: String,
    pub error: String,
}

/// One preview line: original name padded to 60 columns, then the absolute
/// target path.
pub fn format_entry_line(entry: &RenameEntry) -> String {
    format!(
        "    {:<60} --> {}",
        entry.original_name,
        entry.target_path.display()
    )
}

/// A trimmed reply of "Y" or "y" proceeds; anything else aborts.
pub fn is_affirmative(reply: &str) -> bool {
    reply.trim().to_uppercase() == "Y"
}

/// Applies every entry independently. A failed rename is recorded and the
/// remaining entries are still attempted; completed renames stay in place.
pub fn apply_plan(plan: &RenamePlan) -> ApplyResult {
    let mut result = ApplyResult::default();
    for entry in &plan.entries {
        match fs::rename(&entry.original_path, &entry.target_path) {
            Ok(()) => {
                set_modified_time(entry);
                result.renamed += 1;
            }
            Err(err) => result.failures.push(RenameFailure {
                original_name: entry.original_name.clone(),
                error: err.to_string(),
            }),
        }
    }
    result
}

// The rename already happened; a failed touch is not reported.
fn set_modified_time(entry: &RenameEntry) {
    if let Some(local) = Local.from_local_datetime(&entry.target_mtime).earliest() {
        let ft = FileTime::from_unix_time(local.timestamp(), 0);
        filetime::set_file_mtime(&entry.target_path, ft).ok();
    }
}

#[cfg(test)]
mod tests {
    use super::{apply_plan, format_entry_line, is_affirmative};
    use crate::planner::{RenameEntry, RenamePlan, RenameStats};
    use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::tempdir;

    fn dt(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .expect("valid date")
            .and_hms_opt(h, mi, s)
            .expect("valid time")
    }

    fn entry(original: &Path, target: &Path, mtime: NaiveDateTime) -> RenameEntry {
        RenameEntry {
            original_path: original.to_path_buf(),
            original_name: original
                .file_name()
                .expect("file name")
                .to_string_lossy()
                .to_string(),
            target_path: target.to_path_buf(),
            target_name: target
                .file_name()
                .expect("file name")
                .to_string_lossy()
                .to_string(),
            target_mtime: mtime,
            resolution_height: None,
            frame_rate: None,
        }
    }

    fn plan_with(directory: PathBuf, entries: Vec<RenameEntry>) -> RenamePlan {
        RenamePlan {
            directory,
            prefix: String::new(),
            entries,
            stats: RenameStats::default(),
        }
    }

    #[test]
    fn is_affirmative_accepts_only_y() {
        assert!(is_affirmative("Y"));
        assert!(is_affirmative("y"));
        assert!(is_affirmative(" y \n"));
        assert!(!is_affirmative("yes"));
        assert!(!is_affirmative("N"));
        assert!(!is_affirmative(""));
        assert!(!is_affirmative("  "));
    }

    #[test]
    fn format_entry_line_pads_to_sixty_columns() {
        let temp = tempdir().expect("tempdir");
        let e = entry(
            &temp.path().join("clip.mp4"),
            &temp.path().join("2021-07-04 13.05.09.mp4"),
            dt(2021, 7, 4, 13, 5, 9),
        );
        let line = format_entry_line(&e);
        assert!(line.starts_with("    clip.mp4"));
        let arrow = line.find(" --> ").expect("arrow");
        assert_eq!(arrow, 4 + 60);
        assert!(line.ends_with("2021-07-04 13.05.09.mp4"));
    }

    #[test]
    fn apply_renames_and_sets_modification_time() {
        let temp = tempdir().expect("tempdir");
        let original = temp.path().join("clip.mp4");
        let target = temp.path().join("2021-07-04 13.05.09.mp4");
        fs::write(&original, b"x").expect("write");

        let mtime = dt(2021, 7, 4, 13, 5, 9);
        let plan = plan_with(
            temp.path().to_path_buf(),
            vec![entry(&original, &target, mtime)],
        );

        let result = apply_plan(&plan);
        assert_eq!(result.renamed, 1);
        assert!(result.failures.is_empty());
        assert!(!original.exists());
        assert!(target.exists());

        let modified = fs::metadata(&target)
            .and_then(|m| m.modified())
            .expect("modified time");
        let modified: DateTime<Local> = DateTime::from(modified);
        assert_eq!(modified.naive_local(), mtime);
    }

    #[test]
    fn one_failed_rename_does_not_stop_the_rest() {
        let temp = tempdir().expect("tempdir");
        let missing = temp.path().join("gone.mp4");
        let original = temp.path().join("clip.mp4");
        let target = temp.path().join("2021-07-04 13.05.09.mp4");
        fs::write(&original, b"x").expect("write");

        let plan = plan_with(
            temp.path().to_path_buf(),
            vec![
                entry(
                    &missing,
                    &temp.path().join("1999-01-01 00.00.00.mp4"),
                    dt(1999, 1, 1, 0, 0, 0),
                ),
                entry(&original, &target, dt(2021, 7, 4, 13, 5, 9)),
            ],
        );

        let result = apply_plan(&plan);
        assert_eq!(result.renamed, 1);
        assert_eq!(result.failures.len(), 1);
        assert_eq!(result.failures[0].original_name, "gone.mp4");
        assert!(target.exists());
    }
}
