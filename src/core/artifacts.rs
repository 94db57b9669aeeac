//! Output files written by collect

use crate::design::{CollectedDesigns, DesignFilePaths};
use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

pub fn alphabet_file_name(px: u32) -> String {
    format!("alphabet-{px}px.txt")
}

pub fn design_map_file_name(px: u32) -> String {
    format!("design-files-{px}px.json")
}

/// JSON form of one size's collected designs
#[derive(Serialize)]
struct DesignReport<'a> {
    px: u32,
    alphabet: Vec<String>,
    design_file_paths_map: &'a BTreeMap<String, DesignFilePaths>,
}

impl<'a> DesignReport<'a> {
    fn new(px: u32, collected: &'a CollectedDesigns) -> Self {
        Self {
            px,
            alphabet: collected
                .alphabet
                .iter()
                .map(|&c| format!("U+{:04X}", c as u32))
                .collect(),
            design_file_paths_map: &collected.design_file_paths_map,
        }
    }
}

/// Files written for one pixel size
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifacts {
    pub alphabet: PathBuf,
    pub design_map: PathBuf,
}

/// Write the alphabet and design map of one size into `outputs_dir`
pub fn write_artifacts(
    outputs_dir: &Path,
    px: u32,
    collected: &CollectedDesigns,
) -> Result<Artifacts> {
    fs::create_dir_all(outputs_dir)
        .with_context(|| format!("Failed to create outputs dir {}", outputs_dir.display()))?;

    let alphabet = outputs_dir.join(alphabet_file_name(px));
    write_replacing(&alphabet, collected.alphabet_string().as_bytes())?;

    let report = serde_json::to_vec_pretty(&DesignReport::new(px, collected))
        .context("Failed to serialize design file map")?;
    let design_map = outputs_dir.join(design_map_file_name(px));
    write_replacing(&design_map, &report)?;

    debug!("Wrote {} and {}", alphabet.display(), design_map.display());
    Ok(Artifacts {
        alphabet,
        design_map,
    })
}

/// Write through a temp file in the same directory so readers never see a torn file
fn write_replacing(path: &Path, contents: &[u8]) -> Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut file = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temp file in {}", dir.display()))?;
    file.write_all(contents)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    file.persist(path)
        .with_context(|| format!("Failed to replace {}", path.display()))?;
    Ok(())
}
