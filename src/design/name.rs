//! Design file name codec
//!
//! A design file is named `TOKEN[ FLAVOR(,FLAVOR)*].png`, where `TOKEN` is
//! `notdef` or the hexadecimal code point of the glyph, and the optional
//! flavor list restricts the design to some locale flavors. For example
//! `0030 zh_cn,ja.png` is the digit zero as drawn for Simplified Chinese and
//! Japanese, and `0030.png` is the design shared by every flavor.

use serde::{Serialize, Serializer};
use std::fmt;
use thiserror::Error;

pub const DESIGN_FILE_EXTENSION: &str = ".png";

const NOTDEF_TOKEN: &str = "notdef";

/// Identity of a glyph design
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GlyphId {
    /// The missing-glyph placeholder, sorts before every code point
    Notdef,
    CodePoint(char),
}

impl GlyphId {
    pub fn code_point(&self) -> Option<char> {
        match self {
            GlyphId::Notdef => None,
            GlyphId::CodePoint(c) => Some(*c),
        }
    }

    /// Token as written in file names: `notdef` or at least four uppercase hex digits
    pub fn token(&self) -> String {
        match self {
            GlyphId::Notdef => NOTDEF_TOKEN.to_string(),
            GlyphId::CodePoint(c) => format!("{:04X}", *c as u32),
        }
    }
}

impl fmt::Display for GlyphId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.token())
    }
}

impl Serialize for GlyphId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.token())
    }
}

/// Accepted locale flavor tags, in canonical order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocaleFlavors {
    tags: Vec<String>,
}

impl LocaleFlavors {
    pub fn new<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tags: tags.into_iter().map(Into::into).collect(),
        }
    }

    pub fn position(&self, tag: &str) -> Option<usize> {
        self.tags.iter().position(|t| t == tag)
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.position(tag).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameError {
    #[error("'{0}' is not valid UTF-8")]
    Encoding(String),
    #[error("'{0}' does not end with .png")]
    Extension(String),
    #[error("'{0}' must be 'TOKEN' or 'TOKEN FLAVOR[,FLAVOR...]'")]
    Shape(String),
    #[error("'{token}' in '{name}' is neither 'notdef' nor a Unicode scalar value in hex")]
    Token { name: String, token: String },
    #[error("unknown locale flavor '{flavor}' in '{name}'")]
    UnknownFlavor { name: String, flavor: String },
}

/// Parsed design file name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesignFileName {
    pub id: GlyphId,
    /// Declared flavors, deduplicated, in configured order. Empty means common.
    pub flavors: Vec<String>,
}

impl DesignFileName {
    pub fn common(id: GlyphId) -> Self {
        Self {
            id,
            flavors: Vec::new(),
        }
    }

    /// Parse a file name, accepting only the configured flavors
    pub fn parse(name: &str, known_flavors: &LocaleFlavors) -> Result<Self, NameError> {
        let stem = name
            .strip_suffix(DESIGN_FILE_EXTENSION)
            .ok_or_else(|| NameError::Extension(name.to_string()))?;

        let params: Vec<&str> = stem.split(' ').collect();
        if params.len() > 2 || params.iter().any(|p| p.is_empty()) {
            return Err(NameError::Shape(name.to_string()));
        }

        let id = parse_token(params[0]).ok_or_else(|| NameError::Token {
            name: name.to_string(),
            token: params[0].to_string(),
        })?;

        let mut positioned: Vec<(usize, String)> = Vec::new();
        if let Some(flavor_list) = params.get(1) {
            for flavor in flavor_list.split(',') {
                let flavor = flavor.to_lowercase();
                let position = known_flavors
                    .position(&flavor)
                    .ok_or_else(|| NameError::UnknownFlavor {
                        name: name.to_string(),
                        flavor: flavor.clone(),
                    })?;
                if !positioned.iter().any(|(p, _)| *p == position) {
                    positioned.push((position, flavor));
                }
            }
        }
        positioned.sort_by_key(|(position, _)| *position);

        Ok(Self {
            id,
            flavors: positioned.into_iter().map(|(_, flavor)| flavor).collect(),
        })
    }

    pub fn is_common(&self) -> bool {
        self.flavors.is_empty()
    }

    /// Canonical file name
    pub fn file_name(&self) -> String {
        if self.flavors.is_empty() {
            format!("{}{DESIGN_FILE_EXTENSION}", self.id.token())
        } else {
            format!(
                "{} {}{DESIGN_FILE_EXTENSION}",
                self.id.token(),
                self.flavors.join(",")
            )
        }
    }
}

impl fmt::Display for DesignFileName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.file_name())
    }
}

fn parse_token(token: &str) -> Option<GlyphId> {
    if token.eq_ignore_ascii_case(NOTDEF_TOKEN) {
        return Some(GlyphId::Notdef);
    }
    if token.is_empty() || !token.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let value = u32::from_str_radix(token, 16).ok()?;
    char::from_u32(value).map(GlyphId::CodePoint)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flavors() -> LocaleFlavors {
        LocaleFlavors::new(["latin", "zh_cn", "zh_hk", "zh_tw", "zh_tr", "ko", "ja"])
    }

    #[test]
    fn test_parse_common_name() {
        let name = DesignFileName::parse("0030.png", &flavors()).unwrap();
        assert_eq!(name.id, GlyphId::CodePoint('0'));
        assert!(name.is_common());
    }

    #[test]
    fn test_parse_flavored_name() {
        let name = DesignFileName::parse("0030 zh_cn,ja.png", &flavors()).unwrap();
        assert_eq!(name.id, GlyphId::CodePoint('0'));
        assert_eq!(name.flavors, vec!["zh_cn", "ja"]);
    }

    #[test]
    fn test_flavors_are_canonicalized() {
        let name = DesignFileName::parse("4e00 JA,zh_cn,ja.png", &flavors()).unwrap();
        assert_eq!(name.flavors, vec!["zh_cn", "ja"]);
        assert_eq!(name.file_name(), "4E00 zh_cn,ja.png");
    }

    #[test]
    fn test_notdef_is_case_insensitive() {
        let name = DesignFileName::parse("NotDef.png", &flavors()).unwrap();
        assert_eq!(name.id, GlyphId::Notdef);
        assert_eq!(name.file_name(), "notdef.png");
    }

    #[test]
    fn test_short_hex_is_padded() {
        let name = DesignFileName::parse("41.png", &flavors()).unwrap();
        assert_eq!(name.file_name(), "0041.png");

        let name = DesignFileName::parse("20000.png", &flavors()).unwrap();
        assert_eq!(name.file_name(), "20000.png");
    }

    #[test]
    fn test_unknown_flavor_is_an_error() {
        let result = DesignFileName::parse("0030 fr.png", &flavors());
        assert_eq!(
            result,
            Err(NameError::UnknownFlavor {
                name: "0030 fr.png".to_string(),
                flavor: "fr".to_string(),
            })
        );
    }

    #[test]
    fn test_rejects_malformed_names() {
        let flavors = flavors();
        assert!(matches!(
            DesignFileName::parse("0030.PNG", &flavors),
            Err(NameError::Extension(_))
        ));
        assert!(matches!(
            DesignFileName::parse("0030 ja ko.png", &flavors),
            Err(NameError::Shape(_))
        ));
        assert!(matches!(
            DesignFileName::parse("0030 .png", &flavors),
            Err(NameError::Shape(_))
        ));
        assert!(matches!(
            DesignFileName::parse("0030 ja,.png", &flavors),
            Err(NameError::UnknownFlavor { .. })
        ));
        assert!(matches!(
            DesignFileName::parse("U+0030.png", &flavors),
            Err(NameError::Token { .. })
        ));
        // Surrogates and values past U+10FFFF are not characters
        assert!(matches!(
            DesignFileName::parse("D800.png", &flavors),
            Err(NameError::Token { .. })
        ));
        assert!(matches!(
            DesignFileName::parse("110000.png", &flavors),
            Err(NameError::Token { .. })
        ));
    }

    #[test]
    fn test_format_round_trips() {
        let flavors = flavors();
        let names = [
            DesignFileName::common(GlyphId::Notdef),
            DesignFileName::common(GlyphId::CodePoint('A')),
            DesignFileName {
                id: GlyphId::CodePoint('中'),
                flavors: vec!["zh_hk".to_string(), "ko".to_string()],
            },
            DesignFileName {
                id: GlyphId::CodePoint('\u{2A6D6}'),
                flavors: vec!["ja".to_string()],
            },
        ];
        for name in names {
            let formatted = name.file_name();
            let parsed = DesignFileName::parse(&formatted, &flavors).unwrap();
            assert_eq!(parsed, name);
            assert_eq!(parsed.file_name(), formatted);
        }
    }

    #[test]
    fn test_glyph_id_ordering() {
        let mut ids = vec![
            GlyphId::CodePoint('b'),
            GlyphId::Notdef,
            GlyphId::CodePoint('A'),
        ];
        ids.sort();
        assert_eq!(
            ids,
            vec![
                GlyphId::Notdef,
                GlyphId::CodePoint('A'),
                GlyphId::CodePoint('b')
            ]
        );
    }
}
