//! Directory scanner
//!
//! Applies three filters while walking: include-path prefixes, exclusion
//! globs (`**` matches zero or more path segments), and the configured
//! language extensions. Exclusion is evaluated on `/`-normalized paths
//! relative to the scan root. Unreadable entries are warnings, never fatal.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use glob::Pattern;
use tracing::warn;
use walkdir::WalkDir;

use crate::config::Config;

/// Result of scanning a directory
#[derive(Debug, Clone)]
pub struct ScanResult {
    pub path: PathBuf,
    pub files: Vec<PathBuf>,
    pub subdirs: Vec<PathBuf>,
}

impl ScanResult {
    /// Files belonging to one configured language key
    pub fn files_for_language(&self, key: &str) -> Vec<&PathBuf> {
        let extensions = crate::lang::Lang::extensions_for_key(key);
        self.files
            .iter()
            .filter(|f| {
                f.extension()
                    .and_then(|e| e.to_str())
                    .map(|e| extensions.contains(&e.to_lowercase().as_str()))
                    .unwrap_or(false)
            })
            .collect()
    }
}

/// Check a path against the exclusion globs.
///
/// Matches the relative form first, the absolute form second, and for `**`
/// patterns also the bare core component (`**/__pycache__/**` excludes any
/// path containing a `__pycache__` component).
pub fn should_exclude(path: &Path, exclude: &[String], base: &Path) -> bool {
    let rel = path.strip_prefix(base).unwrap_or(path);
    let rel_str = rel.to_string_lossy().replace('\\', "/");
    let abs_str = path.to_string_lossy().replace('\\', "/");

    for pattern_str in exclude {
        let Ok(pattern) = Pattern::new(pattern_str) else {
            warn!(pattern = %pattern_str, "invalid exclude pattern, ignoring");
            continue;
        };
        if pattern.matches(&rel_str) || pattern.matches(&abs_str) {
            return true;
        }

        if pattern_str.contains("**") {
            let core = pattern_str.trim_matches(|c| c == '*' || c == '/');
            if !core.is_empty()
                && !core.contains('/')
                && rel_str.split('/').any(|component| {
                    Pattern::new(core)
                        .map(|p| p.matches(component))
                        .unwrap_or(component == core)
                })
            {
                return true;
            }
            if let Some(suffix) = pattern_str.strip_prefix("**/") {
                if Pattern::new(suffix).map(|p| p.matches(&rel_str)).unwrap_or(false) {
                    return true;
                }
                if let Some(dir_pattern) = suffix.strip_suffix("/**") {
                    if Pattern::new(dir_pattern)
                        .map(|p| p.matches(&rel_str))
                        .unwrap_or(false)
                    {
                        return true;
                    }
                }
            }
        }
    }
    false
}

fn file_matches(path: &Path, extensions: &HashSet<String>) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| extensions.contains(&e.to_lowercase()))
        .unwrap_or(false)
}

/// Scan one directory. With `recursive`, files from the whole subtree are
/// returned and every visited subdirectory is listed in `subdirs`.
pub fn scan_directory(path: &Path, config: &Config, base: Option<&Path>, recursive: bool) -> ScanResult {
    let base = base.unwrap_or(path);
    let extensions = config.extension_set();

    let mut files = Vec::new();
    let mut subdirs = Vec::new();

    if !path.is_dir() {
        return ScanResult {
            path: path.to_path_buf(),
            files,
            subdirs,
        };
    }

    let entries = match std::fs::read_dir(path) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(path = %path.display(), "permission_denied: {}", e);
            return ScanResult {
                path: path.to_path_buf(),
                files,
                subdirs,
            };
        }
    };

    let mut items: Vec<PathBuf> = entries
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry.path()),
            Err(e) => {
                warn!(path = %path.display(), "unreadable entry: {}", e);
                None
            }
        })
        .collect();
    items.sort();

    for item in items {
        if should_exclude(&item, &config.exclude, base) {
            continue;
        }
        if item.is_file() {
            if file_matches(&item, &extensions) {
                files.push(item);
            }
        } else if item.is_dir() {
            if recursive {
                let sub = scan_directory(&item, config, Some(base), true);
                files.extend(sub.files);
                subdirs.extend(sub.subdirs);
            }
            subdirs.push(item);
        }
    }

    ScanResult {
        path: path.to_path_buf(),
        files,
        subdirs,
    }
}

/// True when the directory directly contains at least one indexable file
pub fn has_indexable_files(dir: &Path, extensions: &HashSet<String>) -> bool {
    match std::fs::read_dir(dir) {
        Ok(entries) => entries.flatten().any(|entry| {
            let path = entry.path();
            path.is_file() && file_matches(&path, extensions)
        }),
        Err(e) => {
            warn!(path = %dir.display(), "permission_denied: {}", e);
            false
        }
    }
}

/// Every directory (under the include roots) that directly contains at least
/// one file in a supported language
pub fn find_all_directories(root: &Path, config: &Config) -> Vec<PathBuf> {
    let extensions = config.extension_set();

    let starts: Vec<PathBuf> = if config.include.is_empty() {
        vec![root.to_path_buf()]
    } else {
        config
            .include
            .iter()
            .map(|prefix| root.join(prefix.trim_end_matches('/')))
            .filter(|p| p.is_dir())
            .collect()
    };

    let mut dirs = Vec::new();
    for start in starts {
        let walker = WalkDir::new(&start).follow_links(false).into_iter();
        let filtered = walker.filter_entry(|entry| {
            if !entry.file_type().is_dir() {
                return true;
            }
            if entry.depth() > 0 {
                let name = entry.file_name().to_string_lossy();
                if name.starts_with('.') {
                    return false;
                }
            }
            !should_exclude(entry.path(), &config.exclude, root)
        });

        for entry in filtered {
            match entry {
                Ok(entry) if entry.file_type().is_dir() => {
                    if has_indexable_files(entry.path(), &extensions) {
                        dirs.push(entry.path().to_path_buf());
                    }
                }
                Ok(_) => {}
                Err(e) => warn!("scan error: {}", e),
            }
        }
    }

    dirs.sort();
    dirs.dedup();
    dirs
}

/// Pass-through directory: no source files and exactly one subdirectory.
/// These are collapsed out of the processing order.
pub fn is_pass_through(dir: &Path, config: &Config) -> bool {
    let extensions = config.extension_set();
    if has_indexable_files(dir, &extensions) {
        return false;
    }

    let Ok(entries) = std::fs::read_dir(dir) else {
        return false;
    };
    let subdir_count = entries
        .flatten()
        .filter(|entry| {
            let path = entry.path();
            path.is_dir()
                && !entry.file_name().to_string_lossy().starts_with('.')
                && !should_exclude(&path, &config.exclude, dir)
        })
        .count();
    subdir_count == 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_should_exclude_patterns() {
        let base = Path::new("/repo");
        let exclude = vec![
            "**/__pycache__/**".to_string(),
            "**/node_modules/**".to_string(),
        ];

        assert!(should_exclude(
            Path::new("/repo/src/__pycache__/m.pyc"),
            &exclude,
            base
        ));
        assert!(should_exclude(Path::new("/repo/__pycache__"), &exclude, base));
        assert!(should_exclude(
            Path::new("/repo/web/node_modules/pkg/index.js"),
            &exclude,
            base
        ));
        assert!(!should_exclude(Path::new("/repo/src/main.py"), &exclude, base));
    }

    #[test]
    fn test_scan_filters_by_language() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(root, "app/a.py", "x = 1\n");
        write(root, "app/b.php", "<?php\n");
        write(root, "app/readme.md", "# doc\n");

        let mut config = Config::default();
        config.languages = vec!["python".to_string()];

        let result = scan_directory(&root.join("app"), &config, Some(root), true);
        assert_eq!(result.files.len(), 1);
        assert!(result.files[0].ends_with("a.py"));
    }

    #[test]
    fn test_scan_respects_exclusion() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(root, "src/ok.py", "x = 1\n");
        write(root, "src/__pycache__/bad.py", "x = 1\n");

        let config = Config::default();
        let result = scan_directory(root, &config, None, true);
        assert_eq!(result.files.len(), 1);
        assert!(result.files[0].ends_with("ok.py"));
    }

    #[test]
    fn test_find_all_directories() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(root, "src/core/a.py", "x = 1\n");
        write(root, "src/util/b.py", "x = 1\n");
        write(root, "docs/guide.md", "# doc\n");

        let config = Config::default();
        let dirs = find_all_directories(root, &config);
        let names: Vec<String> = dirs
            .iter()
            .map(|d| d.strip_prefix(root).unwrap().display().to_string())
            .collect();
        assert!(names.contains(&"src/core".to_string()));
        assert!(names.contains(&"src/util".to_string()));
        assert!(!names.iter().any(|n| n.contains("docs")));
    }

    #[test]
    fn test_find_all_directories_with_include() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(root, "src/a.py", "x = 1\n");
        write(root, "scripts/b.py", "x = 1\n");

        let mut config = Config::default();
        config.include = vec!["src/".to_string()];

        let dirs = find_all_directories(root, &config);
        assert_eq!(dirs.len(), 1);
        assert!(dirs[0].ends_with("src"));
    }

    #[test]
    fn test_is_pass_through() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        // com/ holds only one subdirectory, no code
        write(root, "com/example/App.java", "class App {}\n");
        write(root, "src/a.py", "x = 1\n");
        write(root, "src/sub/b.py", "x = 1\n");

        let config = Config::default();
        assert!(is_pass_through(&root.join("com"), &config));
        // has files, not pass-through even with one subdir
        assert!(!is_pass_through(&root.join("src"), &config));
    }

    #[test]
    fn test_files_for_language() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(root, "a.py", "x = 1\n");
        write(root, "b.java", "class B {}\n");

        let config = Config::default();
        let result = scan_directory(root, &config, None, false);
        assert_eq!(result.files_for_language("python").len(), 1);
        assert_eq!(result.files_for_language("java").len(), 1);
        assert_eq!(result.files_for_language("php").len(), 0);
    }
}
