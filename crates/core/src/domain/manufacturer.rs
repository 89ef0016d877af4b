use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// Hardware maker. Catalog rows spell these inconsistently ("Rehadapt",
/// "REHADAPT", "daessy "), so parsing is trimmed and case-insensitive.
/// `Other` keeps its first spelling for display but compares case-folded.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Manufacturer {
    Rehadapt,
    Daessy,
    Other(String),
}

impl Manufacturer {
    pub fn parse(value: &str) -> Self {
        let trimmed = value.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "rehadapt" => Self::Rehadapt,
            "daessy" => Self::Daessy,
            _ => Self::Other(trimmed.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Rehadapt => "rehadapt",
            Self::Daessy => "daessy",
            Self::Other(name) => name,
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            Self::Rehadapt => "Rehadapt",
            Self::Daessy => "Daessy",
            Self::Other(name) => name,
        }
    }

    /// One-line selling point shown next to the manufacturer's solution.
    pub fn tagline(&self) -> Option<&'static str> {
        match self {
            Self::Rehadapt => {
                Some("Flexible positioning with quick-release system for easy adjustment")
            }
            Self::Daessy => Some(
                "Maximum stability with locked positioning for precise access methods such as eye gaze",
            ),
            Self::Other(_) => None,
        }
    }

    fn variant_rank(&self) -> u8 {
        match self {
            Self::Rehadapt => 0,
            Self::Daessy => 1,
            Self::Other(_) => 2,
        }
    }

    fn folded(&self) -> impl Iterator<Item = u8> + '_ {
        self.as_str().bytes().map(|byte| byte.to_ascii_lowercase())
    }

    /// Section order: Rehadapt leads by default, Daessy leads for eye gaze users,
    /// everything else follows alphabetically.
    pub(crate) fn presentation_rank(&self, uses_eyegaze: bool) -> u8 {
        match (self, uses_eyegaze) {
            (Self::Rehadapt, false) | (Self::Daessy, true) => 0,
            (Self::Daessy, false) | (Self::Rehadapt, true) => 1,
            (Self::Other(_), _) => 2,
        }
    }
}

impl fmt::Display for Manufacturer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl PartialEq for Manufacturer {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Manufacturer {}

impl PartialOrd for Manufacturer {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Manufacturer {
    fn cmp(&self, other: &Self) -> Ordering {
        self.variant_rank()
            .cmp(&other.variant_rank())
            .then_with(|| self.folded().cmp(other.folded()))
    }
}

impl Hash for Manufacturer {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u8(self.variant_rank());
        for byte in self.folded() {
            state.write_u8(byte);
        }
        state.write_u8(0xff);
    }
}

impl From<String> for Manufacturer {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<Manufacturer> for String {
    fn from(value: Manufacturer) -> Self {
        value.as_str().to_string()
    }
}
