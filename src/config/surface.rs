//! Oppervlakdecoratie: de vier vaste vlakken van een schakel en hun
//! getagde configuratie-union.

use serde::{Deserialize, Deserializer, Serialize};

/// Standaardkleur voor nieuw gesynthetiseerde stenen en emaille.
pub const DEFAULT_COLOR: &str = "#ffffff";

/// Identifier voor een decoreerbaar vlak. Gesloten set: de assets kennen
/// exact deze vier vlakken per schakel.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum SurfaceId {
    Top1,
    Top2,
    Side1,
    Side2,
}

impl SurfaceId {
    /// Alle vlakken, in canonieke volgorde.
    pub const ALL: [Self; 4] = [Self::Top1, Self::Top2, Self::Side1, Self::Side2];

    /// Bovenvlakken dragen een derde steenpositie, zijvlakken niet.
    #[must_use]
    pub const fn is_top(self) -> bool {
        matches!(self, Self::Top1 | Self::Top2)
    }

    /// Het spiegelvlak: top1 ↔ top2, side1 ↔ side2.
    #[must_use]
    pub const fn mirror(self) -> Self {
        match self {
            Self::Top1 => Self::Top2,
            Self::Top2 => Self::Top1,
            Self::Side1 => Self::Side2,
            Self::Side2 => Self::Side1,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Top1 => "top1",
            Self::Top2 => "top2",
            Self::Side1 => "side1",
            Self::Side2 => "side2",
        }
    }
}

/// Beschikbare gravurepatronen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngravingDesign {
    Pattern1,
    Pattern2,
}

/// Soort decoratie, los van de bijbehorende payload. Wordt gebruikt om
/// standaardconfiguraties te synthetiseren bij een typewissel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SurfaceKind {
    Empty,
    Gemstones,
    Moissanites,
    Enamel,
    Engraving,
}

/// Steenkleuren per positie. `stone3` bestaat alleen op bovenvlakken.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GemstoneColors {
    #[serde(default = "default_color")]
    pub stone1: String,
    #[serde(default = "default_color")]
    pub stone2: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stone3: Option<String>,
}

fn default_color() -> String {
    DEFAULT_COLOR.to_owned()
}

impl GemstoneColors {
    /// Witte stenen, met een derde steen alleen op bovenvlakken.
    #[must_use]
    pub fn default_for(surface: SurfaceId) -> Self {
        Self {
            stone1: default_color(),
            stone2: default_color(),
            stone3: surface.is_top().then(default_color),
        }
    }

    /// Dwingt de `stone3`-invariant af voor het gegeven vlak.
    #[must_use]
    pub fn normalized_for(mut self, surface: SurfaceId) -> Self {
        if surface.is_top() {
            self.stone3.get_or_insert_with(default_color);
        } else {
            self.stone3 = None;
        }
        self
    }

    /// Kleur voor een steenpositie (1 t/m 3).
    #[must_use]
    pub fn slot(&self, slot: u8) -> Option<&str> {
        match slot {
            1 => Some(&self.stone1),
            2 => Some(&self.stone2),
            3 => self.stone3.as_deref(),
            _ => None,
        }
    }
}

/// Configuratie van één vlak. Getagde union: de aanwezige payload hoort
/// exact bij het `type`-veld. Serialisatie gebruikt camelCase-sleutels zodat
/// het bestandsformaat stabiel blijft over hosts heen.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SurfaceConfig {
    Empty,
    #[serde(rename_all = "camelCase")]
    Gemstones { gemstone_colors: GemstoneColors },
    #[serde(rename_all = "camelCase")]
    Moissanites { gemstone_colors: GemstoneColors },
    #[serde(rename_all = "camelCase")]
    Enamel { enamel_color: String },
    #[serde(rename_all = "camelCase")]
    Engraving { engraving_design: EngravingDesign },
}

impl SurfaceConfig {
    /// Standaardconfiguratie voor een soort decoratie op een vlak: witte
    /// stenen, witte emaille, pattern1.
    #[must_use]
    pub fn default_for(kind: SurfaceKind, surface: SurfaceId) -> Self {
        match kind {
            SurfaceKind::Empty => Self::Empty,
            SurfaceKind::Gemstones => Self::Gemstones {
                gemstone_colors: GemstoneColors::default_for(surface),
            },
            SurfaceKind::Moissanites => Self::Moissanites {
                gemstone_colors: GemstoneColors::default_for(surface),
            },
            SurfaceKind::Enamel => Self::Enamel {
                enamel_color: default_color(),
            },
            SurfaceKind::Engraving => Self::Engraving {
                engraving_design: EngravingDesign::Pattern1,
            },
        }
    }

    #[must_use]
    pub const fn kind(&self) -> SurfaceKind {
        match self {
            Self::Empty => SurfaceKind::Empty,
            Self::Gemstones { .. } => SurfaceKind::Gemstones,
            Self::Moissanites { .. } => SurfaceKind::Moissanites,
            Self::Enamel { .. } => SurfaceKind::Enamel,
            Self::Engraving { .. } => SurfaceKind::Engraving,
        }
    }

    /// Steenkleuren, indien dit vlak stenen draagt.
    #[must_use]
    pub const fn gemstone_colors(&self) -> Option<&GemstoneColors> {
        match self {
            Self::Gemstones { gemstone_colors } | Self::Moissanites { gemstone_colors } => {
                Some(gemstone_colors)
            }
            _ => None,
        }
    }

    /// Dwingt de vlak-afhankelijke invarianten af (derde steen alleen op
    /// bovenvlakken).
    #[must_use]
    pub fn normalized_for(self, surface: SurfaceId) -> Self {
        match self {
            Self::Gemstones { gemstone_colors } => Self::Gemstones {
                gemstone_colors: gemstone_colors.normalized_for(surface),
            },
            Self::Moissanites { gemstone_colors } => Self::Moissanites {
                gemstone_colors: gemstone_colors.normalized_for(surface),
            },
            other => other,
        }
    }
}

/// Ruwe vorm zoals die uit een extern bestand kan komen: het `type`-veld is
/// leidend, achtergebleven payloadvelden van een eerder type worden genegeerd
/// en ontbrekende payload wordt met standaardwaarden aangevuld.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSurfaceConfig {
    #[serde(rename = "type")]
    kind: SurfaceKind,
    #[serde(default)]
    gemstone_colors: Option<GemstoneColors>,
    #[serde(default)]
    enamel_color: Option<String>,
    #[serde(default)]
    engraving_design: Option<EngravingDesign>,
}

impl<'de> Deserialize<'de> for SurfaceConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawSurfaceConfig::deserialize(deserializer)?;
        Ok(match raw.kind {
            SurfaceKind::Empty => Self::Empty,
            SurfaceKind::Gemstones => Self::Gemstones {
                gemstone_colors: raw.gemstone_colors.unwrap_or_else(|| GemstoneColors {
                    stone1: default_color(),
                    stone2: default_color(),
                    stone3: None,
                }),
            },
            SurfaceKind::Moissanites => Self::Moissanites {
                gemstone_colors: raw.gemstone_colors.unwrap_or_else(|| GemstoneColors {
                    stone1: default_color(),
                    stone2: default_color(),
                    stone3: None,
                }),
            },
            SurfaceKind::Enamel => Self::Enamel {
                enamel_color: raw.enamel_color.unwrap_or_else(default_color),
            },
            SurfaceKind::Engraving => Self::Engraving {
                engraving_design: raw.engraving_design.unwrap_or(EngravingDesign::Pattern1),
            },
        })
    }
}
