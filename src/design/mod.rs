//! Design file pipeline
//!
//! Raw design files go through three stages for every pixel size:
//! - classify: rebuild the tree into the canonical block-bucketed layout
//! - verify: check geometry and padding, then re-encode every bitmap
//! - collect: build the alphabet and the per-flavor file map

pub mod bitmap;
pub mod classify;
pub mod collect;
pub mod error;
pub mod name;
pub mod verify;
pub mod walk;


use crate::unicode::blocks::BlockTable;
use crate::unicode::east_asian_width::EastAsianWidthLookup;
use bitmap::{BitmapCodec, PngCodec};
use name::LocaleFlavors;

// Explicit re-exports for public API
pub use bitmap::DesignBitmap;
pub use classify::{classify_design_files, ClassifyOutcome};
pub use collect::{collect_available_design, CollectedDesigns, DesignFilePaths};
pub use error::{DefectKind, DesignError, DesignResult, GeometryViolation};
pub use name::{DesignFileName, GlyphId, NameError};
pub use verify::{verify_design_files, VerifyOutcome};

/// Immutable inputs shared by every stage
pub struct DesignContext {
    pub blocks: BlockTable,
    pub flavors: LocaleFlavors,
    pub east_asian_widths: Box<dyn EastAsianWidthLookup>,
    pub codec: Box<dyn BitmapCodec>,
}

impl DesignContext {
    /// Context using the PNG codec
    pub fn new(
        blocks: BlockTable,
        flavors: LocaleFlavors,
        east_asian_widths: impl EastAsianWidthLookup + 'static,
    ) -> Self {
        Self {
            blocks,
            flavors,
            east_asian_widths: Box::new(east_asian_widths),
            codec: Box::new(PngCodec),
        }
    }

    pub fn with_codec(mut self, codec: impl BitmapCodec + 'static) -> Self {
        self.codec = Box::new(codec);
        self
    }
}

impl std::fmt::Debug for DesignContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DesignContext")
            .field("blocks", &self.blocks.len())
            .field("flavors", &self.flavors)
            .finish_non_exhaustive()
    }
}
