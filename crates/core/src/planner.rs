use crate::clamp::clamp_date_time;
use crate::namer::build_file_name;
use crate::probe::read_video_metadata;
use anyhow::{Context, Result};
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

const MEDIA_EXTENSIONS: &[&str] = &["avi", "mp4", "mov"];

#[derive(Debug, Clone)]
pub struct PlanOptions {
    pub directory: PathBuf,
    pub prefix: String,
    pub min_date: NaiveDateTime,
    pub max_date: NaiveDateTime,
}

impl Default for PlanOptions {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            prefix: String::new(),
            min_date: default_min_date(),
            max_date: Local::now().naive_local(),
        }
    }
}

fn default_min_date() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2000, 1, 1)
        .unwrap_or_default()
        .and_time(NaiveTime::MIN)
}

/// Parses a strict `YYYY-MM-DD` argument to midnight of that day.
pub fn parse_date_arg(raw: &str) -> Option<NaiveDateTime> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenameEntry {
    pub original_path: PathBuf,
    pub original_name: String,
    pub target_path: PathBuf,
    pub target_name: String,
    pub target_mtime: NaiveDateTime,
    pub resolution_height: Option<String>,
    pub frame_rate: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RenameStats {
    pub scanned_files: usize,
    pub media_files: usize,
    pub unchanged: usize,
    pub conflicts: usize,
    pub planned: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenamePlan {
    pub directory: PathBuf,
    pub prefix: String,
    pub entries: Vec<RenameEntry>,
    pub stats: RenameStats,
}

/// Scans the directory once and proposes a rename for every media file whose
/// computed name differs from the current one and is not already taken,
/// either on disk or by an earlier entry of the same plan. Entries keep
/// directory enumeration order.
pub fn generate_plan(options: &PlanOptions) -> Result<RenamePlan> {
    let directory = fs::canonicalize(&options.directory).with_context(|| {
        format!(
            "could not resolve directory: {}",
            options.directory.display()
        )
    })?;

    let mut stats = RenameStats::default();
    let files = collect_media_files(&directory, &mut stats)?;

    let mut entries = Vec::new();
    let mut claimed = HashSet::<String>::new();

    for path in files {
        let name = match path.file_name() {
            Some(name) => name.to_string_lossy().to_string(),
            None => continue,
        };

        let metadata = read_video_metadata(&path);
        let modified = file_modified_to_local(&path)?;
        let clamped = clamp_date_time(modified.naive_local(), options.min_date, options.max_date);

        let target_name = build_file_name(
            &options.prefix,
            clamped,
            metadata.resolution_height.as_deref().unwrap_or(""),
            metadata.frame_rate.as_deref().unwrap_or(""),
            file_extension(&name),
        );

        if target_name == name {
            stats.unchanged += 1;
            continue;
        }

        let target_path = directory.join(&target_name);
        if target_path.exists() || claimed.contains(&target_name) {
            stats.conflicts += 1;
            continue;
        }

        claimed.insert(target_name.clone());
        stats.planned += 1;
        entries.push(RenameEntry {
            original_path: path,
            original_name: name,
            target_path,
            target_name,
            target_mtime: clamped,
            resolution_height: metadata.resolution_height,
            frame_rate: metadata.frame_rate,
        });
    }

    Ok(RenamePlan {
        directory,
        prefix: options.prefix.clone(),
        entries,
        stats,
    })
}

fn collect_media_files(root: &Path, stats: &mut RenameStats) -> Result<Vec<PathBuf>> {
    let mut out = Vec::new();
    for entry in fs::read_dir(root)
        .with_context(|| format!("could not read directory: {}", root.display()))?
    {
        let entry = entry
            .with_context(|| format!("could not read a directory entry in {}", root.display()))?;
        let path = entry.path();
        if path.is_dir() {
            continue;
        }
        stats.scanned_files += 1;
        if is_media(&path) && is_writable(&path) {
            stats.media_files += 1;
            out.push(path);
        }
    }
    Ok(out)
}

fn is_media(path: &Path) -> bool {
    path.extension()
        .map(|ext| {
            let ext = ext.to_string_lossy();
            MEDIA_EXTENSIONS
                .iter()
                .any(|media| ext.eq_ignore_ascii_case(media))
        })
        .unwrap_or(false)
}

fn is_writable(path: &Path) -> bool {
    fs::metadata(path)
        .map(|m| !m.permissions().readonly())
        .unwrap_or(false)
}

/// Last dot-segment of the name, leading dot included, case untouched.
fn file_extension(name: &str) -> &str {
    name.rfind('.').map(|i| &name[i..]).unwrap_or("")
}

fn file_modified_to_local(path: &Path) -> Result<DateTime<Local>> {
    let time = fs::metadata(path)
        .and_then(|m| m.modified())
        .with_context(|| format!("could not read modification time: {}", path.display()))?;
    Ok(DateTime::from(time))
}
