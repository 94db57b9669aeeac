//! Collection of the alphabet and the per-flavor design file map
//!
//! Common designs (no flavor in the name) make up the alphabet. Every
//! configured flavor then gets the common map with its own overrides on top.

use crate::design::error::{DesignError, DesignResult};
use crate::design::name::GlyphId;
use crate::design::walk::{parse_design_file, size_dir, walk_design_tree};
use crate::design::DesignContext;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Design file for every glyph id
pub type DesignFilePaths = BTreeMap<GlyphId, PathBuf>;

/// What the glyph compilation stage needs for one pixel size
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectedDesigns {
    /// Code points with a common design, ascending
    pub alphabet: Vec<char>,
    /// Merged design files keyed by locale flavor
    pub design_file_paths_map: BTreeMap<String, DesignFilePaths>,
}

impl CollectedDesigns {
    pub fn design_file_paths(&self, flavor: &str) -> Option<&DesignFilePaths> {
        self.design_file_paths_map.get(flavor)
    }

    /// The alphabet as a string, in code point order
    pub fn alphabet_string(&self) -> String {
        self.alphabet.iter().collect()
    }
}

fn insert_unique(
    paths: &mut DesignFilePaths,
    id: GlyphId,
    flavor: Option<&str>,
    path: &Path,
) -> DesignResult<()> {
    match paths.entry(id) {
        Entry::Vacant(entry) => {
            entry.insert(path.to_path_buf());
            Ok(())
        }
        Entry::Occupied(entry) => Err(DesignError::DuplicateDesign {
            id: id.to_string(),
            flavor: flavor.map(str::to_string),
            first: entry.get().clone(),
            second: path.to_path_buf(),
        }),
    }
}

/// Collect the designs of one pixel size across every design dir
///
/// Design dirs are walked in the order given. Two files claiming the same
/// glyph for the same flavor (or both common) are rejected. A notdef file
/// always fills the common slot, flavors or not.
pub fn collect_available_design(
    design_dirs: &[PathBuf],
    px: u32,
    ctx: &DesignContext,
) -> DesignResult<CollectedDesigns> {
    let mut common = DesignFilePaths::new();
    let mut flavored: BTreeMap<&str, DesignFilePaths> = ctx
        .flavors
        .iter()
        .map(|flavor| (flavor, DesignFilePaths::new()))
        .collect();

    for design_dir in design_dirs {
        let dir = size_dir(design_dir, px);
        if !dir.is_dir() {
            debug!("No {}px designs in {}", px, design_dir.display());
            continue;
        }

        let tree = walk_design_tree(&dir)?;
        for path in &tree.design_files {
            let name = parse_design_file(path, &ctx.flavors)?;

            // notdef has a single slot shared by every flavor
            if name.is_common() || name.id == GlyphId::Notdef {
                insert_unique(&mut common, name.id, None, path)?;
                continue;
            }
            for flavor in &name.flavors {
                // parse() only yields configured flavors
                if let Some(paths) = flavored.get_mut(flavor.as_str()) {
                    insert_unique(paths, name.id, Some(flavor), path)?;
                }
            }
        }
    }

    // BTreeMap keys are already ascending; Notdef sorts first and is skipped
    let alphabet: Vec<char> = common.keys().filter_map(GlyphId::code_point).collect();

    let design_file_paths_map = flavored
        .into_iter()
        .map(|(flavor, overrides)| {
            let mut merged = common.clone();
            merged.extend(overrides);
            (flavor.to_string(), merged)
        })
        .collect();

    Ok(CollectedDesigns {
        alphabet,
        design_file_paths_map,
    })
}
