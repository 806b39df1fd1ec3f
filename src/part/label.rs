//! Layer label parsing.
//!
//! A part layer is labeled `category_suffix`:
//!
//! | suffix      | meaning                                          |
//! |-------------|--------------------------------------------------|
//! | `box`       | bounding-box helper, never exported              |
//! | `0`, `0000` | template layer, never exported                   |
//! | `NNNN`      | explicit number, overwrites `category_NNNN.svg`  |
//! | anything    | gets the next free number of its category        |
//!
//! Anything else (guides, the frame, unknown categories) is skipped.

use std::fmt;

use super::Category;
use crate::svg::EXTENSION;

/// Separator between category and suffix.
pub const SEPARATOR: char = '_';

/// Suffix of bounding-box helper layers.
pub const BOX_SUFFIX: &str = "box";

/// Why a layer label does not name an exportable part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Skip {
    /// Not exactly two non-empty `_`-separated parts.
    Malformed,
    /// First part is not a known category.
    UnknownCategory(String),
    /// Bounding-box helper layer.
    Box,
    /// Numeric suffix equal to zero.
    Template,
}

impl fmt::Display for Skip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed => f.write_str("not a category_suffix label"),
            Self::UnknownCategory(name) => write!(f, "unknown category `{name}`"),
            Self::Box => f.write_str("bounding box layer"),
            Self::Template => f.write_str("template layer"),
        }
    }
}

/// A validated part label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartLabel {
    pub category: Category,
    pub suffix: String,
}

impl PartLabel {
    /// Parse a layer label. Never fails loudly: rejected labels come back
    /// as the [`Skip`] reason.
    pub fn parse(label: &str) -> Result<Self, Skip> {
        let mut parts = label.split(SEPARATOR);
        let (Some(category), Some(suffix), None) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(Skip::Malformed);
        };
        if category.is_empty() || suffix.is_empty() {
            return Err(Skip::Malformed);
        }

        let category = Category::from_name(category)
            .ok_or_else(|| Skip::UnknownCategory(category.to_string()))?;

        if suffix == BOX_SUFFIX {
            return Err(Skip::Box);
        }
        if is_digits(suffix) && suffix.trim_start_matches('0').is_empty() {
            return Err(Skip::Template);
        }

        Ok(Self {
            category,
            suffix: suffix.to_string(),
        })
    }

    /// The number an exactly-four-digit suffix pins the part to.
    pub fn explicit_number(&self) -> Option<u32> {
        if self.suffix.len() == 4 && is_digits(&self.suffix) {
            self.suffix.parse().ok()
        } else {
            None
        }
    }

    /// File name keyed by the literal label, e.g. `nose_a.svg`.
    pub fn labeled_file_name(&self) -> String {
        format!("{self}.{EXTENSION}")
    }
}

impl fmt::Display for PartLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{SEPARATOR}{}", self.category, self.suffix)
    }
}

/// File name keyed by an allocated number, e.g. `hair_0004.svg`.
pub fn numbered_file_name(category: Category, number: u32) -> String {
    format!("{category}{SEPARATOR}{number:04}.{EXTENSION}")
}

#[inline]
fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(label: &str) -> Result<PartLabel, Skip> {
        PartLabel::parse(label)
    }

    #[test]
    fn test_parse_valid_labels() {
        let label = parse("eyes_0007").unwrap();
        assert_eq!(label.category, Category::Eyes);
        assert_eq!(label.suffix, "0007");

        let label = parse("nose_a").unwrap();
        assert_eq!(label.category, Category::Nose);
        assert_eq!(label.suffix, "a");
    }

    #[test]
    fn test_parse_malformed_labels_are_skipped() {
        for label in ["", "hair", "hair_", "_0001", "hair_01_02", "Layer 1", "__"] {
            assert_eq!(parse(label), Err(Skip::Malformed), "label {label:?}");
        }
    }

    #[test]
    fn test_parse_unknown_category() {
        assert_eq!(
            parse("beard_0001"),
            Err(Skip::UnknownCategory("beard".into()))
        );
        assert_eq!(parse("Hair_0001"), Err(Skip::UnknownCategory("Hair".into())));
    }

    #[test]
    fn test_parse_box_and_template_are_skipped() {
        assert_eq!(parse("hair_box"), Err(Skip::Box));
        assert_eq!(parse("hair_0000"), Err(Skip::Template));
        assert_eq!(parse("hair_0"), Err(Skip::Template));
        assert_eq!(parse("mouth_00"), Err(Skip::Template));
    }

    #[test]
    fn test_explicit_number_needs_four_digits() {
        assert_eq!(parse("eyes_0007").unwrap().explicit_number(), Some(7));
        assert_eq!(parse("eyes_1234").unwrap().explicit_number(), Some(1234));
        assert_eq!(parse("eyes_7").unwrap().explicit_number(), None);
        assert_eq!(parse("eyes_00007").unwrap().explicit_number(), None);
        assert_eq!(parse("eyes_abcd").unwrap().explicit_number(), None);
    }

    #[test]
    fn test_file_names() {
        assert_eq!(parse("nose_a").unwrap().labeled_file_name(), "nose_a.svg");
        assert_eq!(numbered_file_name(Category::Hair, 4), "hair_0004.svg");
        assert_eq!(numbered_file_name(Category::Hat, 12345), "hat_12345.svg");
    }

    #[test]
    fn test_display_is_original_label() {
        assert_eq!(parse("backhair_b").unwrap().to_string(), "backhair_b");
    }
}
