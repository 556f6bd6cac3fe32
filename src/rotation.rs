//! Log file rotation
//!
//! Rotation is split in two: [`plan_rotation`] turns a directory listing into
//! an ordered list of renames and removals without touching the disk, and
//! [`apply_plan`] executes that list. The directory is re-scanned on every
//! rotation, so files deleted or added by hand are picked up next time.

use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::Path;

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Duration, FixedOffset, Local, NaiveDate, NaiveDateTime, TimeZone};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Default number of historical files kept
pub const DEFAULT_RETENTION: usize = 2;

/// Default timestamp layout for timestamped log files
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Default log file extension
pub const DEFAULT_EXTENSION: &str = ".log";

/// Upper bound on timestamp bumps when the fresh name is already taken
const MAX_NAME_BUMPS: i64 = 1000;

/// How log files are named and retired
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RotationPolicy {
    /// `<app>-current`, `<app>-previous`, `<app>-previous-1`, ...
    #[default]
    Sequential,
    /// `<app>-<timestamp>`
    Timestamped {
        #[serde(default = "default_timestamp_format")]
        format: String,
    },
}

fn default_timestamp_format() -> String {
    DEFAULT_TIMESTAMP_FORMAT.to_string()
}

impl RotationPolicy {
    /// Timestamped policy with the default `YYYY-MM-DD_HH-MM-SS` layout
    pub fn timestamped() -> Self {
        RotationPolicy::Timestamped {
            format: default_timestamp_format(),
        }
    }
}

/// Everything the planner needs besides the directory listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationSettings {
    pub policy: RotationPolicy,
    /// Number of historical files kept besides the active one
    pub retention: usize,
    /// File extension including the dot, may be empty
    pub extension: String,
}

impl Default for RotationSettings {
    fn default() -> Self {
        Self {
            policy: RotationPolicy::default(),
            retention: DEFAULT_RETENTION,
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }
}

/// One step of a rotation, with names relative to the log directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOp {
    Rename { from: String, to: String },
    Remove(String),
}

/// Result of planning a rotation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationPlan {
    /// Steps to run, in order, before opening the new file
    pub ops: Vec<FileOp>,
    /// Name of the file to open as the active log
    pub current: String,
    /// Name of the most recent historical file once the plan has run
    pub previous: Option<String>,
}

/// Plan a rotation for `app_name` given the names found in the log directory
pub fn plan_rotation(
    settings: &RotationSettings,
    listing: &[String],
    app_name: &str,
    now: DateTime<Local>,
) -> RotationPlan {
    match &settings.policy {
        RotationPolicy::Sequential => plan_sequential(
            settings.retention,
            listing,
            app_name,
            &settings.extension,
        ),
        RotationPolicy::Timestamped { format } => plan_timestamped(
            settings.retention,
            listing,
            app_name,
            &settings.extension,
            format,
            now,
        ),
    }
}

/// Name of the active file under the sequential policy
pub fn sequential_current_name(app_name: &str, extension: &str) -> String {
    format!("{}-current{}", app_name, extension)
}

/// Name of historical generation `generation` (1 = most recent)
pub fn sequential_generation_name(app_name: &str, extension: &str, generation: usize) -> String {
    if generation <= 1 {
        format!("{}-previous{}", app_name, extension)
    } else {
        format!("{}-previous-{}{}", app_name, generation - 1, extension)
    }
}

/// Parse a sequential historical file name into its generation
///
/// `<app>-previous` is generation 1, `<app>-previous-N` is generation N + 1.
/// Indices with leading zeros or that do not fit are not ours.
fn parse_generation(name: &str, app_name: &str, extension: &str) -> Option<usize> {
    let stem = name.strip_suffix(extension)?;
    let rest = stem.strip_prefix(app_name)?.strip_prefix("-previous")?;
    if rest.is_empty() {
        return Some(1);
    }
    let digits = rest.strip_prefix('-')?;
    let first = digits.chars().next()?;
    if !('1'..='9').contains(&first) || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    digits.parse::<usize>().ok()?.checked_add(1)
}

fn plan_sequential(
    retention: usize,
    listing: &[String],
    app_name: &str,
    extension: &str,
) -> RotationPlan {
    let current = sequential_current_name(app_name, extension);
    let shift = listing.iter().any(|n| *n == current);

    let mut generations: Vec<usize> = listing
        .iter()
        .filter_map(|n| parse_generation(n, app_name, extension))
        .collect();
    generations.sort_unstable_by(|a, b| b.cmp(a));
    generations.dedup();

    // Oldest first so that every rename target has already been vacated
    let mut ops = Vec::new();
    for generation in &generations {
        let target = if shift { generation + 1 } else { *generation };
        let name = sequential_generation_name(app_name, extension, *generation);
        if target > retention {
            ops.push(FileOp::Remove(name));
        } else if shift {
            ops.push(FileOp::Rename {
                from: name,
                to: sequential_generation_name(app_name, extension, target),
            });
        }
    }

    let previous_name = sequential_generation_name(app_name, extension, 1);
    if shift {
        if retention >= 1 {
            ops.push(FileOp::Rename {
                from: current.clone(),
                to: previous_name.clone(),
            });
        } else {
            ops.push(FileOp::Remove(current.clone()));
        }
    }

    let previous = if retention >= 1 && (shift || generations.contains(&1)) {
        Some(previous_name)
    } else {
        None
    };

    RotationPlan {
        ops,
        current,
        previous,
    }
}

/// Parse the timestamp out of `<app>-<timestamp><ext>`
fn parse_timestamp(
    name: &str,
    app_name: &str,
    extension: &str,
    format: &str,
) -> Option<NaiveDateTime> {
    let stem = name.strip_suffix(extension)?;
    let stamp = stem.strip_prefix(app_name)?.strip_prefix('-')?;
    parse_stamp(stamp, format)
}

fn parse_stamp(stamp: &str, format: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(stamp, format)
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(stamp, format)
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Check that a strftime layout can name and order timestamped files
///
/// The layout must only use known specifiers, and a rendered instant must
/// parse back to the same second. Date-only layouts would reuse one name for
/// a whole day, time-only layouts could never be sorted for retention.
pub fn is_valid_timestamp_format(format: &str) -> bool {
    if format.is_empty() || StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return false;
    }

    let Some(sample) = NaiveDate::from_ymd_opt(2001, 2, 3).and_then(|d| d.and_hms_opt(4, 5, 6))
    else {
        return false;
    };
    let Some(utc) = FixedOffset::east_opt(0) else {
        return false;
    };
    let instant = utc.from_utc_datetime(&sample);

    // Some layouts only fail at render time, where `to_string` would panic
    let mut stamp = String::new();
    if write!(stamp, "{}", instant.format(format)).is_err() {
        return false;
    }

    parse_stamp(&stamp, format) == Some(sample)
}

/// Build the name for a new timestamped file
pub fn timestamped_name(
    app_name: &str,
    extension: &str,
    format: &str,
    at: DateTime<Local>,
) -> String {
    format!("{}-{}{}", app_name, at.format(format), extension)
}

fn plan_timestamped(
    retention: usize,
    listing: &[String],
    app_name: &str,
    extension: &str,
    format: &str,
    now: DateTime<Local>,
) -> RotationPlan {
    let format = if is_valid_timestamp_format(format) {
        format
    } else {
        DEFAULT_TIMESTAMP_FORMAT
    };

    let mut existing: Vec<(NaiveDateTime, &String)> = listing
        .iter()
        .filter_map(|n| parse_timestamp(n, app_name, extension, format).map(|t| (t, n)))
        .collect();
    existing.sort();

    // Two rotations within one timestamp tick must not share a file
    let mut current = timestamped_name(app_name, extension, format, now);
    let mut bumps = 0;
    while bumps < MAX_NAME_BUMPS && listing.iter().any(|n| *n == current) {
        bumps += 1;
        current = timestamped_name(app_name, extension, format, now + Duration::seconds(bumps));
    }
    existing.retain(|(_, n)| **n != current);

    let excess = existing.len().saturating_sub(retention);
    let ops = existing[..excess]
        .iter()
        .map(|(_, n)| FileOp::Remove((*n).clone()))
        .collect();

    let previous = existing[excess..].last().map(|(_, n)| (*n).clone());

    RotationPlan {
        ops,
        current,
        previous,
    }
}

/// List file names in the log directory
pub fn scan_directory(dir: &Path) -> io::Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            names.push(name.to_string());
        }
    }
    Ok(names)
}

/// Outcome of running a plan
#[derive(Debug, Default)]
pub struct ApplyOutcome {
    /// Steps that ran
    pub applied: usize,
    /// Steps that were skipped because their source had vanished
    pub skipped: Vec<Error>,
    /// Steps that failed for other reasons
    pub failed: Vec<Error>,
}

/// Execute a rotation plan inside `dir`
///
/// Missing sources are expected when rotations race or files were removed by
/// hand, and are skipped. Other failures are collected; the caller still
/// opens the new file.
pub fn apply_plan(dir: &Path, plan: &RotationPlan) -> ApplyOutcome {
    let mut outcome = ApplyOutcome::default();

    for op in &plan.ops {
        let (source, result) = match op {
            FileOp::Rename { from, to } => {
                let source = dir.join(from);
                let result = fs::rename(&source, dir.join(to));
                (source, result)
            }
            FileOp::Remove(name) => {
                let source = dir.join(name);
                let result = fs::remove_file(&source);
                (source, result)
            }
        };

        match result {
            Ok(()) => outcome.applied += 1,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                outcome.skipped.push(Error::RenameSourceMissing(source));
            }
            Err(e) => outcome
                .failed
                .push(Error::Rotation(format!("{}: {}", source.display(), e))),
        }
    }

    outcome
}
