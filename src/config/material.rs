//! Basismaterialen voor het schakellichaam.

use serde::{Deserialize, Serialize};

/// De vijf leverbare afwerkingen. Het materiaal geldt voor alle
/// body-submeshes van een schakel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Material {
    Silver,
    Grey,
    Black,
    White,
    Gold,
}

impl Material {
    pub const ALL: [Self; 5] = [Self::Silver, Self::Grey, Self::Black, Self::White, Self::Gold];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Silver => "silver",
            Self::Grey => "grey",
            Self::Black => "black",
            Self::White => "white",
            Self::Gold => "gold",
        }
    }

    /// Zoekt een materiaal op naam, hoofdletterongevoelig.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        let normalized = name.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|material| material.as_str() == normalized)
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::Silver
    }
}
