//! East Asian Width (UAX #11) lookup
//!
//! Data is read from the UCD `EastAsianWidth.txt` file. Characters that the
//! file does not list fall back to the `@missing` defaults it declares, and
//! to Neutral when no default covers them.

use crate::design::error::{DesignError, DesignResult};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EastAsianWidth {
    /// F
    Fullwidth,
    /// H
    Halfwidth,
    /// W
    Wide,
    /// Na
    Narrow,
    /// A
    Ambiguous,
    /// N
    Neutral,
}

impl EastAsianWidth {
    /// Parse the short property value alias used by the UCD
    pub fn parse(alias: &str) -> Option<Self> {
        match alias {
            "F" => Some(EastAsianWidth::Fullwidth),
            "H" => Some(EastAsianWidth::Halfwidth),
            "W" => Some(EastAsianWidth::Wide),
            "Na" => Some(EastAsianWidth::Narrow),
            "A" => Some(EastAsianWidth::Ambiguous),
            "N" => Some(EastAsianWidth::Neutral),
            _ => None,
        }
    }

    pub fn alias(&self) -> &'static str {
        match self {
            EastAsianWidth::Fullwidth => "F",
            EastAsianWidth::Halfwidth => "H",
            EastAsianWidth::Wide => "W",
            EastAsianWidth::Narrow => "Na",
            EastAsianWidth::Ambiguous => "A",
            EastAsianWidth::Neutral => "N",
        }
    }
}

impl fmt::Display for EastAsianWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.alias())
    }
}

/// Character to width class lookup used by verification
pub trait EastAsianWidthLookup {
    fn east_asian_width(&self, c: char) -> EastAsianWidth;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct WidthRange {
    begin: u32,
    end: u32,
    width: EastAsianWidth,
}

/// Sorted, non-overlapping width ranges
#[derive(Debug, Clone, Default)]
pub struct EastAsianWidthTable {
    explicit: Vec<WidthRange>,
    missing: Vec<WidthRange>,
}

impl EastAsianWidthTable {
    /// Parse `EastAsianWidth.txt`
    ///
    /// Data lines look like `4E00..9FFF;W` or `0020 ; Na # SPACE`. Default
    /// values come from `# @missing: 3400..4DBF; W` comment lines.
    pub fn parse(text: &str) -> DesignResult<Self> {
        let mut explicit = Vec::new();
        let mut missing = Vec::new();

        for (index, raw_line) in text.lines().enumerate() {
            let line_number = index + 1;
            let trimmed = raw_line.trim();

            if let Some(default) = trimmed.strip_prefix("# @missing:") {
                missing.push(parse_entry(default, line_number, raw_line)?);
                continue;
            }

            let data = trimmed.split('#').next().unwrap_or("").trim();
            if data.is_empty() {
                continue;
            }
            explicit.push(parse_entry(data, line_number, raw_line)?);
        }

        explicit.sort_by_key(|range| range.begin);
        compact(&mut explicit);
        // Later @missing lines refine the whole-range default declared first,
        // so keep their order and search them from the back.
        Ok(Self { explicit, missing })
    }

    /// Look up a code point; unlisted code points fall back to the defaults
    pub fn lookup(&self, code_point: u32) -> EastAsianWidth {
        let index = self.explicit.partition_point(|range| range.end < code_point);
        if let Some(range) = self.explicit.get(index) {
            if range.begin <= code_point {
                return range.width;
            }
        }
        self.missing
            .iter()
            .rev()
            .find(|range| range.begin <= code_point && code_point <= range.end)
            .map(|range| range.width)
            .unwrap_or(EastAsianWidth::Neutral)
    }

    pub fn is_empty(&self) -> bool {
        self.explicit.is_empty() && self.missing.is_empty()
    }
}

impl EastAsianWidthLookup for EastAsianWidthTable {
    fn east_asian_width(&self, c: char) -> EastAsianWidth {
        self.lookup(c as u32)
    }
}

fn parse_entry(data: &str, line: usize, raw_line: &str) -> DesignResult<WidthRange> {
    let malformed = |reason: &str| DesignError::EastAsianWidthTable {
        line,
        reason: format!("{reason}: '{raw_line}'"),
    };

    let mut fields = data.split(';').map(|field| field.trim());
    let range = fields.next().ok_or_else(|| malformed("missing range"))?;
    let alias = fields.next().ok_or_else(|| malformed("missing width"))?;
    // The property value may be followed by a comment without a '#' separator
    let alias = alias.split_whitespace().next().unwrap_or("");

    let (begin, end) = match range.split_once("..") {
        Some((begin, end)) => (begin.trim(), end.trim()),
        None => (range, range),
    };
    let begin = u32::from_str_radix(begin, 16).map_err(|_| malformed("bad code point"))?;
    let end = u32::from_str_radix(end, 16).map_err(|_| malformed("bad code point"))?;
    if begin > end {
        return Err(malformed("range ends before it begins"));
    }
    let width = EastAsianWidth::parse(alias).ok_or_else(|| malformed("unknown width class"))?;

    Ok(WidthRange { begin, end, width })
}

/// Merge adjacent ranges with the same width
fn compact(ranges: &mut Vec<WidthRange>) {
    let mut merged: Vec<WidthRange> = Vec::with_capacity(ranges.len());
    for range in ranges.drain(..) {
        match merged.last_mut() {
            Some(last) if last.width == range.width && last.end.checked_add(1) == Some(range.begin) => {
                last.end = range.end;
            }
            _ => merged.push(range),
        }
    }
    *ranges = merged;
}
