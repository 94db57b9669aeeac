//! Deterministic traversal of design trees
//!
//! Entries are visited in path order so every stage sees the same sequence
//! regardless of how the filesystem enumerates directories.

use crate::design::error::{DesignError, DesignResult};
use crate::design::name::{DesignFileName, LocaleFlavors, NameError, DESIGN_FILE_EXTENSION};
use std::fs;
use std::path::{Path, PathBuf};

/// Files found under a design tree
#[derive(Debug, Default)]
pub struct DesignTree {
    /// Files with a `.png` extension in any case, sorted by path
    pub design_files: Vec<PathBuf>,
    /// Everything else, sorted by path
    pub other_files: Vec<PathBuf>,
}

/// Directory holding the designs of one pixel size: `<root>/<px>`
pub fn size_dir(design_dir: &Path, px: u32) -> PathBuf {
    design_dir.join(px.to_string())
}

/// Collect every file below `dir`
pub fn walk_design_tree(dir: &Path) -> DesignResult<DesignTree> {
    let mut tree = DesignTree::default();
    visit(dir, &mut tree)?;
    Ok(tree)
}

fn visit(dir: &Path, tree: &mut DesignTree) -> DesignResult<()> {
    let mut entries = fs::read_dir(dir)
        .map_err(|e| DesignError::io(dir, e))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| DesignError::io(dir, e))?;
    entries.sort();

    for path in entries {
        let file_type = fs::symlink_metadata(&path)
            .map_err(|e| DesignError::io(&path, e))?
            .file_type();
        if file_type.is_dir() {
            visit(&path, tree)?;
        } else if is_design_file(&path) {
            tree.design_files.push(path);
        } else {
            tree.other_files.push(path);
        }
    }
    Ok(())
}

fn is_design_file(path: &Path) -> bool {
    // Raw bytes, so names that are not UTF-8 still reach the name codec
    path.file_name().is_some_and(|name| {
        let name = name.as_encoded_bytes();
        let extension = DESIGN_FILE_EXTENSION.as_bytes();
        name.len() >= extension.len()
            && name[name.len() - extension.len()..].eq_ignore_ascii_case(extension)
    })
}

/// File name of a design file as UTF-8
pub fn file_name_of(path: &Path) -> DesignResult<&str> {
    let name = path.file_name().unwrap_or_default();
    name.to_str().ok_or_else(|| DesignError::FileName {
        path: path.to_path_buf(),
        source: NameError::Encoding(name.to_string_lossy().into_owned()),
    })
}

/// Parse the name of a walked design file, attaching its path to any defect
pub fn parse_design_file(path: &Path, flavors: &LocaleFlavors) -> DesignResult<DesignFileName> {
    DesignFileName::parse(file_name_of(path)?, flavors).map_err(|source| DesignError::FileName {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_walk_is_sorted_and_recursive() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("b/nested")).unwrap();
        fs::create_dir_all(root.join("a")).unwrap();
        fs::write(root.join("b/nested/0042.png"), b"").unwrap();
        fs::write(root.join("a/0041.png"), b"").unwrap();
        fs::write(root.join("notdef.png"), b"").unwrap();
        fs::write(root.join("a/README.txt"), b"").unwrap();
        fs::write(root.join("a/0043.PNG"), b"").unwrap();

        let tree = walk_design_tree(root).unwrap();
        assert_eq!(
            tree.design_files,
            vec![
                root.join("a/0041.png"),
                root.join("a/0043.PNG"),
                root.join("b/nested/0042.png"),
                root.join("notdef.png"),
            ]
        );
        assert_eq!(tree.other_files, vec![root.join("a/README.txt")]);
    }

    #[test]
    fn test_walk_missing_dir_is_io_error() {
        let dir = TempDir::new().unwrap();
        let result = walk_design_tree(&dir.path().join("12"));
        assert!(matches!(result, Err(DesignError::Io { .. })));
    }

    #[test]
    fn test_size_dir() {
        assert_eq!(size_dir(Path::new("assets/design"), 12), PathBuf::from("assets/design/12"));
    }
}
