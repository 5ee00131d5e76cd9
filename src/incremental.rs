//! Incremental change analysis
//!
//! Turns a git diff between two revisions into an update decision: the
//! changed line volume maps to skip / current / affected / full, and the
//! parent directories of changed files feed downstream re-indexing.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::process::Command;

use serde::Serialize;

use crate::config::Config;
use crate::error::{AtlasError, Result};

/// Update decision derived from change volume
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateLevel {
    /// Changes too small, skip the update
    Skip,
    /// Update changed directories only
    Current,
    /// Update all affected directories
    Affected,
    /// Suggest a full project update
    Full,
}

impl UpdateLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Skip => "skip",
            Self::Current => "current",
            Self::Affected => "affected",
            Self::Full => "full",
        }
    }
}

/// One changed file with its line counts
#[derive(Debug, Clone, Serialize)]
pub struct FileChange {
    pub path: PathBuf,
    pub additions: usize,
    pub deletions: usize,
}

impl FileChange {
    pub fn total_lines(&self) -> usize {
        self.additions + self.deletions
    }

    pub fn directory(&self) -> PathBuf {
        self.path.parent().unwrap_or(Path::new("")).to_path_buf()
    }
}

/// Analysis of a revision range
#[derive(Debug, Clone, Serialize)]
pub struct ChangeAnalysis {
    pub files: Vec<FileChange>,
    pub total_additions: usize,
    pub total_deletions: usize,
    pub affected_dirs: BTreeSet<PathBuf>,
    pub level: UpdateLevel,
    pub message: String,
}

impl ChangeAnalysis {
    pub fn total_lines(&self) -> usize {
        self.total_additions + self.total_deletions
    }
}

/// Run a git command and return stdout
pub fn git_command(args: &[&str], cwd: Option<&Path>) -> Result<String> {
    let mut cmd = Command::new("git");
    cmd.args(args);
    if let Some(dir) = cwd {
        cmd.current_dir(dir);
    }

    let output = cmd.output().map_err(|e| AtlasError::GitError {
        message: format!("failed to execute git: {}", e),
    })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(AtlasError::GitError {
            message: format!("git {} failed: {}", args.join(" "), stderr.trim()),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Changed files with line counts between two revisions
pub fn get_changed_files(since: &str, until: &str, cwd: Option<&Path>) -> Result<Vec<FileChange>> {
    let output = git_command(&["diff", "--numstat", since, until], cwd)?;
    Ok(parse_numstat(&output))
}

/// Parse `git diff --numstat` output; binary files (`-` counts) count as
/// zero-line changes
pub fn parse_numstat(output: &str) -> Vec<FileChange> {
    let mut changes = Vec::new();
    for line in output.lines() {
        let parts: Vec<&str> = line.split('\t').collect();
        if parts.len() != 3 {
            continue;
        }
        let additions = parts[0].parse().unwrap_or(0);
        let deletions = parts[1].parse().unwrap_or(0);
        changes.push(FileChange {
            path: PathBuf::from(parts[2]),
            additions,
            deletions,
        });
    }
    changes
}

/// Keep only files with configured language extensions
pub fn filter_code_files(changes: Vec<FileChange>, config: &Config) -> Vec<FileChange> {
    let extensions = config.extension_set();
    changes
        .into_iter()
        .filter(|change| {
            change
                .path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| extensions.contains(&e.to_lowercase()))
                .unwrap_or(false)
        })
        .collect()
}

/// Classify a set of code changes against the incremental thresholds
pub fn classify_changes(changes: Vec<FileChange>, config: &Config) -> ChangeAnalysis {
    let thresholds = &config.incremental;

    if changes.is_empty() {
        return ChangeAnalysis {
            files: Vec::new(),
            total_additions: 0,
            total_deletions: 0,
            affected_dirs: BTreeSet::new(),
            level: UpdateLevel::Skip,
            message: "No code files changed".to_string(),
        };
    }

    let total_additions = changes.iter().map(|c| c.additions).sum();
    let total_deletions = changes.iter().map(|c| c.deletions).sum();
    let total_lines = total_additions + total_deletions;
    let affected_dirs: BTreeSet<PathBuf> = changes.iter().map(FileChange::directory).collect();

    let (level, message) = if total_lines < thresholds.skip_lines {
        (
            UpdateLevel::Skip,
            format!(
                "Changes ({} lines) below skip threshold ({})",
                total_lines, thresholds.skip_lines
            ),
        )
    } else if total_lines < thresholds.current_only {
        (
            UpdateLevel::Current,
            format!("Small changes ({} lines), update current dirs only", total_lines),
        )
    } else if total_lines < thresholds.suggest_full {
        (
            UpdateLevel::Affected,
            format!("Medium changes ({} lines), update affected dirs", total_lines),
        )
    } else {
        (
            UpdateLevel::Full,
            format!("Large changes ({} lines), consider full update", total_lines),
        )
    };

    ChangeAnalysis {
        files: changes,
        total_additions,
        total_deletions,
        affected_dirs,
        level,
        message,
    }
}

/// Analyze the diff between two revisions and decide the update strategy
pub fn analyze_changes(
    config: &Config,
    since: &str,
    until: &str,
    cwd: Option<&Path>,
) -> Result<ChangeAnalysis> {
    let all_changes = get_changed_files(since, until, cwd)?;
    let code_changes = filter_code_files(all_changes, config);
    Ok(classify_changes(code_changes, config))
}
