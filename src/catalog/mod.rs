//! Statische schakelcatalogus: per schakeltype de assetreferentie en de
//! verbindingsmetadata voor de layout.

use std::collections::BTreeMap;

/// Verbindingsprofiel van één schakeltype.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkProfile {
    /// Referentie naar het 3D-model zoals de loader die verwacht.
    pub asset_ref: String,
    /// Kleine X-correctie die het fysieke in elkaar grijpen van dit type
    /// modelleert. Geldt alleen wanneer de schakel niet vooraan ligt.
    pub connection_offset: f64,
    /// Elke tweede instantie (oneven kettingindex) krijgt een vaste kanteling
    /// om de Z-as, zodat de schakels visueel in elkaar haken.
    pub alternate_rotation: bool,
    /// Uniforme schaal waarop het asset is geauthored.
    pub scale: f64,
}

impl LinkProfile {
    /// Neutraal profiel voor onbekende types: geen correctie, geen
    /// kanteling, schaal 1. Nieuwe assets mogen verschijnen zonder dat de
    /// catalogus bijgewerkt is.
    #[must_use]
    pub fn neutral(asset_ref: impl Into<String>) -> Self {
        Self {
            asset_ref: asset_ref.into(),
            connection_offset: 0.0,
            alternate_rotation: false,
            scale: 1.0,
        }
    }
}

/// Alleen-lezen register van schakeltypes. Opzoeken faalt nooit: onbekende
/// namen leveren een neutraal profiel op.
#[derive(Debug, Clone)]
pub struct LinkCatalog {
    profiles: BTreeMap<&'static str, LinkProfile>,
}

impl LinkCatalog {
    /// Zoekt het profiel voor een schakeltype op, hoofdletterongevoelig.
    #[must_use]
    pub fn resolve(&self, link_type: &str) -> LinkProfile {
        let key = link_type.trim().to_ascii_lowercase();
        self.profiles
            .get(key.as_str())
            .cloned()
            .unwrap_or_else(|| LinkProfile::neutral(link_type.trim()))
    }

    /// Zoekt het schakeltype dat bij een assetreferentie hoort. Onbekende
    /// referenties worden als type-naam doorgegeven, zodat geladen bestanden
    /// met nieuwe assets blijven werken.
    #[must_use]
    pub fn link_type_for_asset(&self, asset_ref: &str) -> String {
        self.profiles
            .iter()
            .find(|(_, profile)| profile.asset_ref == asset_ref)
            .map_or_else(|| asset_ref.to_owned(), |(name, _)| (*name).to_owned())
    }

    /// De geregistreerde typenamen, in canonieke volgorde.
    pub fn known_types(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.profiles.keys().copied()
    }
}

impl Default for LinkCatalog {
    fn default() -> Self {
        let mut profiles = BTreeMap::new();

        let mut register = |name: &'static str,
                            asset_ref: &str,
                            connection_offset: f64,
                            alternate_rotation: bool,
                            scale: f64| {
            profiles.insert(
                name,
                LinkProfile {
                    asset_ref: asset_ref.to_owned(),
                    connection_offset,
                    alternate_rotation,
                    scale,
                },
            );
        };

        // Offsets zijn per asset ingemeten: negatief schuift de schakel
        // strakker tegen zijn voorganger aan.
        register("part1", "models/part1.glb", -0.35, true, 1.0);
        register("part2", "models/part2.glb", -0.2, true, 1.0);
        register("part3", "models/part3.glb", 0.15, false, 1.0);
        register("part4", "models/part4.glb", -0.5, true, 0.92);
        register("part5", "models/part5.glb", 0.0, false, 1.08);

        Self { profiles }
    }
}
