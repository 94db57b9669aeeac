//! Unicode character data consumed by the design pipeline
//!
//! Both tables are parsed from the plain-text Unicode Character Database
//! files so a build can pin whichever Unicode version it targets.

pub mod blocks;
pub mod east_asian_width;

pub use blocks::{BlockTable, UncoveredCodePoint, UnicodeBlock};
pub use east_asian_width::{EastAsianWidth, EastAsianWidthLookup, EastAsianWidthTable};
