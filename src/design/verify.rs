//! Verification and normalization of classified design files
//!
//! Every design of a size must be `px` tall. Its width follows the
//! character's east-asian-width class: half width for H and Na, full width
//! for F and W, either for A and N. CJK Unified Ideographs additionally keep
//! the top row and the last column empty.

use crate::design::bitmap::DesignBitmap;
use crate::design::error::{DesignError, DesignResult, GeometryViolation};
use crate::design::name::GlyphId;
use crate::design::walk::{parse_design_file, size_dir, walk_design_tree};
use crate::design::DesignContext;
use crate::unicode::east_asian_width::EastAsianWidth;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Code points whose designs carry the top/right padding convention
pub const PADDED_CODE_POINTS: RangeInclusive<u32> = 0x4E00..=0x9FFF;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyOutcome {
    Skipped,
    Verified { files: usize },
}

/// Check the width of a design against its east-asian-width class
pub fn check_width(class: EastAsianWidth, width: u32, px: u32) -> Result<(), GeometryViolation> {
    let half = width * 2 == px;
    let full = width == px;
    let ok = match class {
        EastAsianWidth::Halfwidth | EastAsianWidth::Narrow => half,
        EastAsianWidth::Fullwidth | EastAsianWidth::Wide => full,
        EastAsianWidth::Ambiguous | EastAsianWidth::Neutral => half || full,
    };
    if ok {
        return Ok(());
    }

    let half_width = (px % 2 == 0).then_some(px / 2);
    let expected = match class {
        EastAsianWidth::Halfwidth | EastAsianWidth::Narrow => half_width.into_iter().collect(),
        EastAsianWidth::Fullwidth | EastAsianWidth::Wide => vec![px],
        EastAsianWidth::Ambiguous | EastAsianWidth::Neutral => {
            half_width.into_iter().chain([px]).collect()
        }
    };
    Err(GeometryViolation::Width {
        class: class.alias(),
        expected,
        actual: width,
    })
}

/// Check that the top row and the last column carry no ink
pub fn check_padding(bitmap: &DesignBitmap) -> Result<(), GeometryViolation> {
    if bitmap.height > 0 {
        if let Some(column) = bitmap.row(0).iter().position(|&alpha| alpha != 0) {
            return Err(GeometryViolation::TopRowPadding {
                column: column as u32,
            });
        }
    }
    if bitmap.width > 0 {
        for (row, alpha) in bitmap.rows().enumerate() {
            if alpha[alpha.len() - 1] != 0 {
                return Err(GeometryViolation::RightColumnPadding { row: row as u32 });
            }
        }
    }
    Ok(())
}

/// Apply every rule to one decoded design
pub fn check_design(
    id: GlyphId,
    bitmap: &DesignBitmap,
    px: u32,
    ctx: &DesignContext,
) -> Result<(), GeometryViolation> {
    let class = match id {
        GlyphId::Notdef => EastAsianWidth::Neutral,
        GlyphId::CodePoint(c) => ctx.east_asian_widths.east_asian_width(c),
    };
    check_width(class, bitmap.width, px)?;

    if bitmap.height != px {
        return Err(GeometryViolation::Height {
            expected: px,
            actual: bitmap.height,
        });
    }

    if let GlyphId::CodePoint(c) = id {
        if PADDED_CODE_POINTS.contains(&(c as u32)) {
            check_padding(bitmap)?;
        }
    }
    Ok(())
}

/// Verify every design in `<design_dir>/<px>`, then rewrite them in canonical PNG form
///
/// Nothing is rewritten unless every file passes.
pub fn verify_design_files(
    design_dir: &Path,
    px: u32,
    ctx: &DesignContext,
) -> DesignResult<VerifyOutcome> {
    let dir = size_dir(design_dir, px);
    if !dir.is_dir() {
        debug!("No {}px designs in {}", px, design_dir.display());
        return Ok(VerifyOutcome::Skipped);
    }

    let tree = walk_design_tree(&dir)?;
    let mut verified: Vec<(PathBuf, DesignBitmap)> = Vec::with_capacity(tree.design_files.len());
    for path in tree.design_files {
        let name = parse_design_file(&path, &ctx.flavors)?;
        let bitmap = ctx.codec.decode(&path)?;
        check_design(name.id, &bitmap, px, ctx).map_err(|violation| DesignError::Geometry {
            path: path.clone(),
            violation,
        })?;
        verified.push((path, bitmap));
    }

    for (path, bitmap) in &verified {
        ctx.codec.encode(bitmap, path)?;
        info!("format design file: {}", path.display());
    }
    Ok(VerifyOutcome::Verified {
        files: verified.len(),
    })
}
