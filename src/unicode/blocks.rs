//! Unicode block table and code point lookup
//!
//! The table comes from the UCD `Blocks.txt` file. It has to be ordered,
//! non-overlapping and cover every code point the design library uses.

use crate::design::error::{DesignError, DesignResult};
use std::fmt;
use thiserror::Error;

/// Name of the block whose directories get an extra bucket level
pub const CJK_UNIFIED_IDEOGRAPHS: &str = "CJK Unified Ideographs";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnicodeBlock {
    pub begin: u32,
    /// Inclusive
    pub end: u32,
    pub name: String,
}

impl UnicodeBlock {
    pub fn new(begin: u32, end: u32, name: impl Into<String>) -> Self {
        Self {
            begin,
            end,
            name: name.into(),
        }
    }

    pub fn contains(&self, code_point: u32) -> bool {
        self.begin <= code_point && code_point <= self.end
    }

    /// Directory name used by the classified layout, e.g. `0000-007F Basic Latin`
    pub fn dir_name(&self) -> String {
        format!("{:04X}-{:04X} {}", self.begin, self.end, self.name)
    }
}

impl fmt::Display for UnicodeBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.dir_name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("code point U+{code_point:04X} is not covered by the Unicode block table")]
pub struct UncoveredCodePoint {
    pub code_point: u32,
}

/// Ordered table of non-overlapping blocks
#[derive(Debug, Clone, Default)]
pub struct BlockTable {
    blocks: Vec<UnicodeBlock>,
}

impl BlockTable {
    /// Build a table, rejecting unordered or overlapping blocks
    pub fn new(blocks: Vec<UnicodeBlock>) -> DesignResult<Self> {
        Self::from_numbered(blocks.into_iter().enumerate().map(|(i, b)| (i + 1, b)).collect())
    }

    /// Validate blocks tagged with the line they were read from
    fn from_numbered(entries: Vec<(usize, UnicodeBlock)>) -> DesignResult<Self> {
        for (index, (line, block)) in entries.iter().enumerate() {
            if block.begin > block.end {
                return Err(DesignError::BlockTable {
                    line: *line,
                    reason: format!("block '{}' ends before it begins", block.name),
                });
            }
            if let Some((_, previous)) = index.checked_sub(1).map(|i| &entries[i]) {
                if previous.end >= block.begin {
                    return Err(DesignError::BlockTable {
                        line: *line,
                        reason: format!(
                            "block '{}' overlaps or precedes '{}'",
                            block.name, previous.name
                        ),
                    });
                }
            }
        }
        Ok(Self {
            blocks: entries.into_iter().map(|(_, block)| block).collect(),
        })
    }

    /// Parse the UCD `Blocks.txt` format
    ///
    /// ```text
    /// # comment
    /// 0000..007F; Basic Latin
    /// ```
    pub fn parse(text: &str) -> DesignResult<Self> {
        let mut blocks = Vec::new();
        for (index, raw_line) in text.lines().enumerate() {
            let line_number = index + 1;
            let line = raw_line.split('#').next().unwrap_or("").trim();
            if line.is_empty() {
                continue;
            }

            let malformed = |reason: &str| DesignError::BlockTable {
                line: line_number,
                reason: format!("{reason}: '{raw_line}'"),
            };

            let (range, name) = line
                .split_once(';')
                .ok_or_else(|| malformed("missing ';'"))?;
            let (begin, end) = range
                .trim()
                .split_once("..")
                .ok_or_else(|| malformed("missing '..' in range"))?;
            let begin = u32::from_str_radix(begin.trim(), 16)
                .map_err(|_| malformed("bad range start"))?;
            let end =
                u32::from_str_radix(end.trim(), 16).map_err(|_| malformed("bad range end"))?;
            let name = name.trim();
            if name.is_empty() {
                return Err(malformed("missing block name"));
            }
            blocks.push((line_number, UnicodeBlock::new(begin, end, name)));
        }
        Self::from_numbered(blocks)
    }

    /// Find the block containing `code_point`, with its index in the table
    pub fn resolve(&self, code_point: u32) -> Result<(usize, &UnicodeBlock), UncoveredCodePoint> {
        // First block whose end is not below the code point
        let index = self.blocks.partition_point(|block| block.end < code_point);
        match self.blocks.get(index) {
            Some(block) if block.contains(code_point) => Ok((index, block)),
            _ => Err(UncoveredCodePoint { code_point }),
        }
    }

    pub fn blocks(&self) -> &[UnicodeBlock] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLOCKS: &str = "\
# Blocks-15.1.0.txt
0000..007F; Basic Latin
0080..00FF; Latin-1 Supplement

4E00..9FFF; CJK Unified Ideographs
FF00..FFEF; Halfwidth and Fullwidth Forms  # trailing comment
";

    #[test]
    fn test_parse_blocks_file() {
        let table = BlockTable::parse(BLOCKS).unwrap();
        assert_eq!(table.len(), 4);
        assert_eq!(table.blocks()[3].name, "Halfwidth and Fullwidth Forms");
        assert_eq!(table.blocks()[2].begin, 0x4E00);
        assert_eq!(table.blocks()[2].end, 0x9FFF);
    }

    #[test]
    fn test_resolve_finds_containing_block() {
        let table = BlockTable::parse(BLOCKS).unwrap();

        let (index, block) = table.resolve(0x41).unwrap();
        assert_eq!(index, 0);
        assert_eq!(block.name, "Basic Latin");

        // Both ends are inclusive
        assert_eq!(table.resolve(0x7F).unwrap().0, 0);
        assert_eq!(table.resolve(0x80).unwrap().0, 1);
        assert_eq!(table.resolve(0x9FFF).unwrap().1.name, CJK_UNIFIED_IDEOGRAPHS);
        assert_eq!(table.resolve(0xFF01).unwrap().0, 3);
    }

    #[test]
    fn test_resolve_reports_gaps() {
        let table = BlockTable::parse(BLOCKS).unwrap();
        assert_eq!(
            table.resolve(0x3000),
            Err(UncoveredCodePoint { code_point: 0x3000 })
        );
        assert!(table.resolve(0x10FFFF).is_err());
    }

    #[test]
    fn test_dir_name_format() {
        let block = UnicodeBlock::new(0xFF00, 0xFFEF, "Halfwidth and Fullwidth Forms");
        assert_eq!(block.dir_name(), "FF00-FFEF Halfwidth and Fullwidth Forms");

        let block = UnicodeBlock::new(0x20000, 0x2A6DF, "CJK Unified Ideographs Extension B");
        assert_eq!(block.dir_name(), "20000-2A6DF CJK Unified Ideographs Extension B");
    }

    #[test]
    fn test_rejects_overlapping_blocks() {
        let result = BlockTable::parse("# header\n0000..007F; A\n0070..00FF; B\n");
        match result {
            Err(DesignError::BlockTable { line, .. }) => assert_eq!(line, 3),
            other => panic!("expected block table error, got {other:?}"),
        }
    }

    #[test]
    fn test_rejects_malformed_lines() {
        assert!(BlockTable::parse("0000-007F; Basic Latin").is_err());
        assert!(BlockTable::parse("0000..007F Basic Latin").is_err());
        assert!(BlockTable::parse("0000..00ZZ; Basic Latin").is_err());
        assert!(BlockTable::parse("0000..007F; ").is_err());
    }
}
