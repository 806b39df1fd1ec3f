//! Operator-supplied answers the driver cannot derive itself.
//!
//! The driver only sees these traits; the binary binds them to console
//! prompts, tests bind them to closures.

use anyhow::Result;

use crate::part::PartLabel;

/// Keywords stored in a part's metadata block.
pub trait KeywordSource {
    fn keywords(&mut self, label: &PartLabel) -> Result<Vec<String>>;
}

/// Number of a deferred part (a back hair takes its hair's number).
pub trait IdentifierSource {
    fn identifier(&mut self, label: &PartLabel) -> Result<u32>;
}

impl<F> KeywordSource for F
where
    F: FnMut(&PartLabel) -> Result<Vec<String>>,
{
    fn keywords(&mut self, label: &PartLabel) -> Result<Vec<String>> {
        self(label)
    }
}

impl<F> IdentifierSource for F
where
    F: FnMut(&PartLabel) -> Result<u32>,
{
    fn identifier(&mut self, label: &PartLabel) -> Result<u32> {
        self(label)
    }
}

/// The same keywords for every part.
#[derive(Debug, Clone, Default)]
pub struct FixedKeywords(pub Vec<String>);

impl KeywordSource for FixedKeywords {
    fn keywords(&mut self, _label: &PartLabel) -> Result<Vec<String>> {
        Ok(self.0.clone())
    }
}

/// Split a comma-separated keyword list, trimming entries and dropping
/// empty ones.
pub fn parse_keywords(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keywords() {
        assert_eq!(parse_keywords("curly, long ,red"), vec!["curly", "long", "red"]);
        assert_eq!(parse_keywords("single"), vec!["single"]);
    }

    #[test]
    fn test_parse_keywords_drops_empty_entries() {
        assert!(parse_keywords("").is_empty());
        assert!(parse_keywords(" , ,").is_empty());
        assert_eq!(parse_keywords("a,,b,"), vec!["a", "b"]);
    }

    #[test]
    fn test_fixed_keywords_ignore_label() {
        let mut source = FixedKeywords(vec!["smile".into()]);
        let label = PartLabel::parse("mouth_a").unwrap();
        assert_eq!(source.keywords(&label).unwrap(), vec!["smile"]);
    }

    #[test]
    fn test_closures_are_sources() {
        let mut keywords = |label: &PartLabel| -> Result<Vec<String>> { Ok(vec![label.suffix.clone()]) };
        let mut identifiers = |_: &PartLabel| -> Result<u32> { Ok(12) };
        let label = PartLabel::parse("backhair_x").unwrap();

        assert_eq!(KeywordSource::keywords(&mut keywords, &label).unwrap(), vec!["x"]);
        assert_eq!(IdentifierSource::identifier(&mut identifiers, &label).unwrap(), 12);
    }
}
