//! Directory tree for hierarchical indexing
//!
//! Two-pass indexing: the tree is built first, then READMEs are generated in
//! bottom-up processing order so parents can aggregate statistics from their
//! children's already-written files.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::scanner::{find_all_directories, has_indexable_files, is_pass_through};

/// Documentation level assigned to a directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// Root: module list with one-line descriptions
    Overview,
    /// Inner: grouped files with key symbols
    Navigation,
    /// Leaf: full symbol information
    Detailed,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Overview => "overview",
            Self::Navigation => "navigation",
            Self::Detailed => "detailed",
        }
    }
}

/// A node in the directory tree
#[derive(Debug, Clone)]
pub struct DirectoryNode {
    pub path: PathBuf,
    pub has_files: bool,
    pub children: Vec<PathBuf>,
    pub parent: Option<PathBuf>,
    /// Depth from root (root = 0)
    pub depth: usize,
}

impl DirectoryNode {
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}

/// Aggregate tree statistics
#[derive(Debug, Clone, Serialize)]
pub struct TreeStats {
    pub total_directories: usize,
    pub with_files: usize,
    pub with_children: usize,
    pub leaf_directories: usize,
    pub max_depth: usize,
}

/// Pre-scanned directory tree for determining index levels
pub struct DirectoryTree {
    root: PathBuf,
    nodes: HashMap<PathBuf, DirectoryNode>,
}

impl DirectoryTree {
    pub fn build(root: &Path, config: &Config) -> Self {
        let root = root.to_path_buf();
        let extensions = config.extension_set();
        let mut nodes: HashMap<PathBuf, DirectoryNode> = HashMap::new();

        for dir in find_all_directories(&root, config) {
            let depth = depth_from_root(&dir, &root);
            nodes.insert(
                dir.clone(),
                DirectoryNode {
                    path: dir,
                    has_files: true,
                    children: Vec::new(),
                    parent: None,
                    depth,
                },
            );
        }

        // Intermediate directories without files still belong in the tree
        // when a descendant is indexed
        let indexed: Vec<PathBuf> = nodes.keys().cloned().collect();
        for dir in indexed {
            let mut current = dir.parent().map(Path::to_path_buf);
            while let Some(parent) = current {
                if !parent.starts_with(&root) || nodes.contains_key(&parent) {
                    break;
                }
                let depth = depth_from_root(&parent, &root);
                nodes.insert(
                    parent.clone(),
                    DirectoryNode {
                        path: parent.clone(),
                        has_files: has_indexable_files(&parent, &extensions),
                        children: Vec::new(),
                        parent: None,
                        depth,
                    },
                );
                if parent == root {
                    break;
                }
                current = parent.parent().map(Path::to_path_buf);
            }
        }

        // Parent/child relationships
        let paths: Vec<PathBuf> = nodes.keys().cloned().collect();
        for path in &paths {
            if let Some(parent) = path.parent().map(Path::to_path_buf) {
                if parent != *path && nodes.contains_key(&parent) {
                    nodes.get_mut(path).unwrap().parent = Some(parent.clone());
                    nodes.get_mut(&parent).unwrap().children.push(path.clone());
                }
            }
        }
        for node in nodes.values_mut() {
            node.children.sort();
        }

        Self { root, nodes }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn node(&self, dir: &Path) -> Option<&DirectoryNode> {
        self.nodes.get(dir)
    }

    /// Level rules: root/depth 0 is overview; any indexed children means
    /// navigation; leaves are detailed
    pub fn level(&self, dir: &Path, config: &Config) -> Level {
        let Some(node) = self.nodes.get(dir) else {
            return config.indexing.leaf_level;
        };
        if node.depth == 0 || dir == self.root {
            return config.indexing.root_level;
        }
        if node.has_children() {
            return config.indexing.module_level;
        }
        config.indexing.leaf_level
    }

    /// Indexed child directories, sorted
    pub fn children(&self, dir: &Path) -> Vec<PathBuf> {
        self.nodes
            .get(dir)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    /// Bottom-up processing order: depth descending, then path ascending.
    /// Pass-through directories are collapsed out.
    pub fn processing_order(&self, config: &Config) -> Vec<PathBuf> {
        let mut dirs: Vec<&DirectoryNode> = self
            .nodes
            .values()
            .filter(|node| !is_pass_through(&node.path, config))
            .collect();
        dirs.sort_by(|a, b| b.depth.cmp(&a.depth).then_with(|| a.path.cmp(&b.path)));
        dirs.into_iter().map(|node| node.path.clone()).collect()
    }

    pub fn stats(&self) -> TreeStats {
        let total = self.nodes.len();
        let with_files = self.nodes.values().filter(|n| n.has_files).count();
        let with_children = self.nodes.values().filter(|n| n.has_children()).count();
        let max_depth = self.nodes.values().map(|n| n.depth).max().unwrap_or(0);
        TreeStats {
            total_directories: total,
            with_files,
            with_children,
            leaf_directories: total - with_children,
            max_depth,
        }
    }
}

fn depth_from_root(dir: &Path, root: &Path) -> usize {
    dir.strip_prefix(root)
        .map(|rel| rel.components().count())
        .unwrap_or(0)
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

    fn fixture() -> (TempDir, Config) {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(root, "main.py", "x = 1\n");
        write(root, "core/engine.py", "x = 1\n");
        write(root, "core/parsers/python.py", "x = 1\n");
        write(root, "util/strings.py", "x = 1\n");
        (dir, Config::default())
    }

    #[test]
    fn test_levels() {
        let (dir, config) = fixture();
        let tree = DirectoryTree::build(dir.path(), &config);

        assert_eq!(tree.level(dir.path(), &config), Level::Overview);
        assert_eq!(tree.level(&dir.path().join("core"), &config), Level::Navigation);
        assert_eq!(
            tree.level(&dir.path().join("core/parsers"), &config),
            Level::Detailed
        );
        assert_eq!(tree.level(&dir.path().join("util"), &config), Level::Detailed);
    }

    #[test]
    fn test_processing_order_bottom_up() {
        let (dir, config) = fixture();
        let tree = DirectoryTree::build(dir.path(), &config);
        let order = tree.processing_order(&config);

        let pos = |rel: &str| {
            let target = if rel.is_empty() {
                dir.path().to_path_buf()
            } else {
                dir.path().join(rel)
            };
            order
                .iter()
                .position(|p| *p == target)
                .unwrap_or_else(|| panic!("{} missing from order", rel))
        };

        assert!(pos("core/parsers") < pos("core"));
        assert!(pos("core") < pos(""));
        assert!(pos("util") < pos(""));
    }

    #[test]
    fn test_pass_through_collapsed() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        // deep Maven-like chain: com/ and com/example/ are pass-through
        write(root, "src/com/example/App.java", "class App {}\n");
        write(root, "src/main.java", "class Main {}\n");

        let config = Config::default();
        let tree = DirectoryTree::build(root, &config);
        let order = tree.processing_order(&config);

        assert!(order.iter().any(|p| p.ends_with("com/example")));
        assert!(!order.iter().any(|p| p.ends_with("src/com") && !p.ends_with("com/example")));
    }

    #[test]
    fn test_children_sorted() {
        let (dir, config) = fixture();
        let tree = DirectoryTree::build(dir.path(), &config);
        let children = tree.children(dir.path());
        let mut sorted = children.clone();
        sorted.sort();
        assert_eq!(children, sorted);
        assert!(children.contains(&dir.path().join("core")));
        assert!(children.contains(&dir.path().join("util")));
    }

    #[test]
    fn test_stats() {
        let (dir, config) = fixture();
        let tree = DirectoryTree::build(dir.path(), &config);
        let stats = tree.stats();
        assert!(stats.total_directories >= 4);
        assert!(stats.with_files >= 4);
        assert_eq!(stats.max_depth, 2);
    }
}
