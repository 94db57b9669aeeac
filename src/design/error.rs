//! Defects raised by the design pipeline
//!
//! Every defect is fatal: the stage that detects it stops immediately and
//! hands the error back with the offending path attached.

use crate::design::name::NameError;
use crate::unicode::blocks::UncoveredCodePoint;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Broad class of a defect, for callers that only care about the category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DefectKind {
    /// The configuration or a Unicode data table is wrong
    Config,
    /// A design file name does not follow the grammar
    NameGrammar,
    /// A design file violates a geometry, padding or uniqueness rule
    DataIntegrity,
    /// The filesystem or the bitmap codec failed
    Io,
}

/// Which verification rule a bitmap broke
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeometryViolation {
    /// Width does not match what the east-asian-width class allows
    Width {
        class: &'static str,
        expected: Vec<u32>,
        actual: u32,
    },
    /// Height must always equal the pixel size
    Height { expected: u32, actual: u32 },
    /// CJK ideographs keep their top row empty
    TopRowPadding { column: u32 },
    /// CJK ideographs keep their last column empty
    RightColumnPadding { row: u32 },
}

impl fmt::Display for GeometryViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeometryViolation::Width {
                class,
                expected,
                actual,
            } => {
                if expected.is_empty() {
                    return write!(
                        f,
                        "width {actual} not allowed for east-asian-width '{class}' (no width fits this pixel size)"
                    );
                }
                let expected: Vec<String> = expected.iter().map(|w| w.to_string()).collect();
                write!(
                    f,
                    "width {actual} not allowed for east-asian-width '{class}' (expected {})",
                    expected.join(" or ")
                )
            }
            GeometryViolation::Height { expected, actual } => {
                write!(f, "height {actual} does not match pixel size {expected}")
            }
            GeometryViolation::TopRowPadding { column } => {
                write!(f, "top row must be empty, found ink at column {column}")
            }
            GeometryViolation::RightColumnPadding { row } => {
                write!(f, "last column must be empty, found ink at row {row}")
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum DesignError {
    #[error("no Unicode block covers this design file: {path}")]
    UnknownBlock {
        path: PathBuf,
        #[source]
        source: UncoveredCodePoint,
    },

    #[error("malformed Unicode block table at line {line}: {reason}")]
    BlockTable { line: usize, reason: String },

    #[error("malformed east asian width table at line {line}: {reason}")]
    EastAsianWidthTable { line: usize, reason: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("bad design file name: {path}")]
    FileName {
        path: PathBuf,
        #[source]
        source: NameError,
    },

    #[error("design file failed verification: {path}: {violation}")]
    Geometry {
        path: PathBuf,
        violation: GeometryViolation,
    },

    #[error("duplicate design for '{id}'{}: {} and {}", flavor_suffix(.flavor), .first.display(), .second.display())]
    DuplicateDesign {
        id: String,
        flavor: Option<String>,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("I/O error on {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("bitmap codec error on {path}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

fn flavor_suffix(flavor: &Option<String>) -> String {
    match flavor {
        Some(flavor) => format!(" (flavor {flavor})"),
        None => String::new(),
    }
}

impl DesignError {
    pub fn kind(&self) -> DefectKind {
        match self {
            DesignError::UnknownBlock { .. }
            | DesignError::BlockTable { .. }
            | DesignError::EastAsianWidthTable { .. }
            | DesignError::InvalidConfig(_) => DefectKind::Config,
            DesignError::FileName { .. } => DefectKind::NameGrammar,
            DesignError::Geometry { .. } | DesignError::DuplicateDesign { .. } => {
                DefectKind::DataIntegrity
            }
            DesignError::Io { .. } | DesignError::Image { .. } => DefectKind::Io,
        }
    }

    /// Wrap an `io::Error` with the path it happened on
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DesignError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type DesignResult<T> = Result<T, DesignError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        let err = DesignError::Geometry {
            path: PathBuf::from("/d/12/0041.png"),
            violation: GeometryViolation::Height {
                expected: 12,
                actual: 11,
            },
        };
        assert_eq!(err.kind(), DefectKind::DataIntegrity);
        assert!(err.to_string().contains("/d/12/0041.png"));
        assert!(err.to_string().contains("height 11"));

        let err = DesignError::InvalidConfig("empty".to_string());
        assert_eq!(err.kind(), DefectKind::Config);
    }

    #[test]
    fn test_duplicate_message_names_both_files() {
        let err = DesignError::DuplicateDesign {
            id: "0031".to_string(),
            flavor: Some("ja".to_string()),
            first: PathBuf::from("a/0031 ja.png"),
            second: PathBuf::from("b/0031 ja.png"),
        };
        let message = err.to_string();
        assert!(message.contains("(flavor ja)"));
        assert!(message.contains("a/0031 ja.png"));
        assert!(message.contains("b/0031 ja.png"));
    }

    #[test]
    fn test_width_violation_lists_alternatives() {
        let violation = GeometryViolation::Width {
            class: "A",
            expected: vec![6, 12],
            actual: 7,
        };
        assert_eq!(
            violation.to_string(),
            "width 7 not allowed for east-asian-width 'A' (expected 6 or 12)"
        );
    }
}
