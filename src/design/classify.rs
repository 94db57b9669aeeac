//! Classification of raw design files into the canonical layout
//!
//! ```text
//! <root>/<px>/notdef.png
//! <root>/<px>/0000-007F Basic Latin/0041.png
//! <root>/<px>/4E00-9FFF CJK Unified Ideographs/4E-/4E00 ja.png
//! ```
//!
//! The new tree is built next to the old one and swapped in once complete,
//! so a failure never leaves a half-classified tree behind.

use crate::design::error::{DesignError, DesignResult};
use crate::design::name::{DesignFileName, GlyphId};
use crate::design::walk::{parse_design_file, size_dir, walk_design_tree};
use crate::design::DesignContext;
use crate::unicode::blocks::{BlockTable, UncoveredCodePoint, CJK_UNIFIED_IDEOGRAPHS};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassifyOutcome {
    /// The root has no designs for this size
    Skipped,
    Classified { files: usize },
}

/// Canonical location of a design file, relative to `<root>/<px>`
pub fn canonical_relative_path(
    name: &DesignFileName,
    blocks: &BlockTable,
) -> Result<PathBuf, UncoveredCodePoint> {
    let mut path = PathBuf::new();
    if let GlyphId::CodePoint(c) = name.id {
        let (_, block) = blocks.resolve(c as u32)?;
        path.push(block.dir_name());
        if block.name == CJK_UNIFIED_IDEOGRAPHS {
            // Bucket by everything but the last two hex digits
            let token = name.id.token();
            path.push(format!("{}-", &token[..token.len() - 2]));
        }
    }
    path.push(name.file_name());
    Ok(path)
}

/// Rebuild `<design_dir>/<px>` into the canonical layout
pub fn classify_design_files(
    design_dir: &Path,
    px: u32,
    ctx: &DesignContext,
) -> DesignResult<ClassifyOutcome> {
    let target = size_dir(design_dir, px);
    if !target.is_dir() {
        debug!("No {}px designs in {}", px, design_dir.display());
        return Ok(ClassifyOutcome::Skipped);
    }

    let tree = walk_design_tree(&target)?;
    let plan = plan_moves(&tree.design_files, ctx)?;
    for other in &tree.other_files {
        warn!("Dropping non-design file: {}", other.display());
    }

    // Stage the new tree inside the design dir so the final rename stays on
    // one filesystem
    let staging = TempDir::with_prefix_in(format!(".{px}.classify-"), design_dir)
        .map_err(|e| DesignError::io(design_dir, e))?;
    let staged_root = staging.path().join(px.to_string());
    fs::create_dir(&staged_root).map_err(|e| DesignError::io(&staged_root, e))?;

    for (relative, source) in &plan {
        let destination = staged_root.join(relative);
        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent).map_err(|e| DesignError::io(parent, e))?;
        }
        fs::copy(source, &destination).map_err(|e| DesignError::io(source, e))?;
    }

    swap_in(design_dir, px, &staged_root, &target)?;
    // The new tree is in place; a leftover staging dir is only clutter
    let staging_path = staging.path().to_path_buf();
    if let Err(e) = staging.close() {
        warn!("Failed to remove {}: {}", staging_path.display(), e);
    }

    for relative in plan.keys() {
        info!("classify design file: {}", target.join(relative).display());
    }
    Ok(ClassifyOutcome::Classified { files: plan.len() })
}

/// Map every design file to its destination before touching the disk
fn plan_moves(
    design_files: &[PathBuf],
    ctx: &DesignContext,
) -> DesignResult<BTreeMap<PathBuf, PathBuf>> {
    let mut plan: BTreeMap<PathBuf, PathBuf> = BTreeMap::new();
    for path in design_files {
        let name = parse_design_file(path, &ctx.flavors)?;
        let relative = canonical_relative_path(&name, &ctx.blocks).map_err(|source| {
            DesignError::UnknownBlock {
                path: path.clone(),
                source,
            }
        })?;
        if let Some(first) = plan.get(&relative) {
            return Err(DesignError::DuplicateDesign {
                id: name.file_name(),
                flavor: None,
                first: first.clone(),
                second: path.clone(),
            });
        }
        plan.insert(relative, path.clone());
    }
    Ok(plan)
}

/// Replace `target` with `staged`, discarding the previous tree
fn swap_in(design_dir: &Path, px: u32, staged: &Path, target: &Path) -> DesignResult<()> {
    let trash = TempDir::with_prefix_in(format!(".{px}.previous-"), design_dir)
        .map_err(|e| DesignError::io(design_dir, e))?;
    let previous = trash.path().join(px.to_string());

    fs::rename(target, &previous).map_err(|e| DesignError::io(target, e))?;
    if let Err(e) = fs::rename(staged, target) {
        // Put the old tree back so the target never goes missing
        if let Err(restore) = fs::rename(&previous, target) {
            warn!(
                "Failed to restore {} from {}: {}",
                target.display(),
                previous.display(),
                restore
            );
        }
        return Err(DesignError::io(target, e));
    }

    let trash_path = trash.path().to_path_buf();
    if let Err(e) = trash.close() {
        warn!("Failed to remove previous tree {}: {}", trash_path.display(), e);
    }
    Ok(())
}
