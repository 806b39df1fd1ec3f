//! Avatar part categories.

use std::fmt;

/// One of the fixed avatar part families.
///
/// Declaration order is the drawing order of the source document and the
/// order folders are created and indexed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Backhair,
    Hair,
    Neck,
    Bust,
    Ears,
    Head,
    Eyes,
    Eyebrows,
    Nose,
    Mouth,
    Freckles,
    Glasses,
    Hat,
}

impl Category {
    pub const ALL: [Self; 13] = [
        Self::Backhair,
        Self::Hair,
        Self::Neck,
        Self::Bust,
        Self::Ears,
        Self::Head,
        Self::Eyes,
        Self::Eyebrows,
        Self::Nose,
        Self::Mouth,
        Self::Freckles,
        Self::Glasses,
        Self::Hat,
    ];

    /// Category name as used in labels, folders and file names.
    pub fn name(self) -> &'static str {
        match self {
            Self::Backhair => "backhair",
            Self::Hair => "hair",
            Self::Neck => "neck",
            Self::Bust => "bust",
            Self::Ears => "ears",
            Self::Head => "head",
            Self::Eyes => "eyes",
            Self::Eyebrows => "eyebrows",
            Self::Nose => "nose",
            Self::Mouth => "mouth",
            Self::Freckles => "freckles",
            Self::Glasses => "glasses",
            Self::Hat => "hat",
        }
    }

    /// Exact, case-sensitive lookup by name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }

    /// Whether layers of this category wait for an operator-supplied number.
    ///
    /// A back hair shares its number with the hair it belongs to, which is
    /// only known once every hair layer has been numbered.
    pub fn is_deferred(self) -> bool {
        self == Self::Backhair
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
