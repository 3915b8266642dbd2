//! De canonieke kettingconfiguratie en haar pure mutatiehelpers.
//!
//! Alle mutaties leveren een nieuwe waarde op en bewaken de invarianten:
//! `links.len() == chain_length`, en elke schakel draagt exact de vier vaste
//! vlaksleutels. Indexen buiten bereik zijn bewust stille no-ops: de UI kan
//! een paneel open hebben voor een schakel die net verwijderd is, en dat mag
//! de laatste geldige staat nooit corrumperen.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::material::Material;
use super::surface::{SurfaceConfig, SurfaceId};

/// Configuratie van één schakel: materiaal plus de vier vlakken.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkConfig {
    pub material: Material,
    pub surfaces: BTreeMap<SurfaceId, SurfaceConfig>,
}

impl LinkConfig {
    /// Zilver, alle vlakken leeg.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            material: Material::Silver,
            surfaces: SurfaceId::ALL
                .into_iter()
                .map(|surface| (surface, SurfaceConfig::Empty))
                .collect(),
        }
    }

    /// Vult ontbrekende vlaksleutels aan en dwingt per vlak de
    /// payload-invarianten af. Gebruikt bij het inladen van externe data.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        for surface in SurfaceId::ALL {
            let config = self
                .surfaces
                .remove(&surface)
                .unwrap_or(SurfaceConfig::Empty)
                .normalized_for(surface);
            self.surfaces.insert(surface, config);
        }
        self
    }

    #[must_use]
    pub fn surface(&self, surface: SurfaceId) -> &SurfaceConfig {
        // `normalized`/`empty` garanderen alle vier de sleutels.
        self.surfaces.get(&surface).unwrap_or(&SurfaceConfig::Empty)
    }
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self::empty()
    }
}

/// De volledige, serialiseerbare kettingbeschrijving.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainConfiguration {
    pub chain_length: usize,
    pub links: Vec<LinkConfig>,
}

impl ChainConfiguration {
    /// Standaardketting: `length` schakels, zilver, alle vlakken leeg.
    /// Lengtes onder 1 worden op 1 geklemd.
    #[must_use]
    pub fn create_default(length: usize) -> Self {
        let length = length.max(1);
        Self {
            chain_length: length,
            links: vec![LinkConfig::empty(); length],
        }
    }

    /// Nieuwe configuratie met alleen het materiaal van schakel `index`
    /// gewijzigd. Buiten bereik: ongewijzigde kopie.
    #[must_use]
    pub fn set_material(&self, index: usize, material: Material) -> Self {
        let mut next = self.clone();
        if let Some(link) = next.links.get_mut(index) {
            link.material = material;
        }
        next
    }

    /// Nieuwe configuratie met één (schakel, vlak)-paar vervangen. De
    /// meegegeven vlakconfiguratie wordt voor het doelvlak genormaliseerd,
    /// zodat de derde steen alleen op bovenvlakken terechtkomt.
    #[must_use]
    pub fn set_surface(&self, index: usize, surface: SurfaceId, config: SurfaceConfig) -> Self {
        let mut next = self.clone();
        if let Some(link) = next.links.get_mut(index) {
            link.surfaces.insert(surface, config.normalized_for(surface));
        }
        next
    }

    /// Past de kettinglengte aan. Groeien voegt standaardschakels achteraan
    /// toe; krimpen knipt uitsluitend van de staart, zodat eerdere
    /// personalisatie vooraan behouden blijft. Lengte 0 wordt op 1 geklemd.
    #[must_use]
    pub fn set_chain_length(&self, new_length: usize) -> Self {
        let new_length = new_length.max(1);
        let mut next = self.clone();
        next.links.resize_with(new_length, LinkConfig::empty);
        next.chain_length = new_length;
        next
    }

    /// Elke schakel wordt een diepe kopie van de bronschakel. Buiten bereik:
    /// ongewijzigde kopie.
    #[must_use]
    pub fn copy_link_to_all(&self, source: usize) -> Self {
        let Some(template) = self.links.get(source).cloned() else {
            return self.clone();
        };

        let mut next = self.clone();
        for link in &mut next.links {
            *link = template.clone();
        }
        next
    }

    /// Valideert de structurele invarianten en normaliseert alle schakels.
    /// Geeft `None` terug wanneer de vorm onherstelbaar afwijkt
    /// (lengteveld en lijst spreken elkaar tegen, of lege ketting).
    #[must_use]
    pub fn normalized(self) -> Option<Self> {
        if self.chain_length < 1 || self.chain_length != self.links.len() {
            return None;
        }

        Some(Self {
            chain_length: self.chain_length,
            links: self.links.into_iter().map(LinkConfig::normalized).collect(),
        })
    }
}

impl Default for ChainConfiguration {
    fn default() -> Self {
        Self::create_default(1)
    }
}

#[cfg(test)]
mod tests {
    use super::{ChainConfiguration, LinkConfig, Material};
    use crate::config::surface::{SurfaceConfig, SurfaceId, SurfaceKind};

    #[test]
    fn default_chain_holds_invariants() {
        let config = ChainConfiguration::create_default(3);
        assert_eq!(config.chain_length, 3);
        assert_eq!(config.links.len(), 3);
        for link in &config.links {
            assert_eq!(link.material, Material::Silver);
            assert_eq!(link.surfaces.len(), 4);
        }
    }

    #[test]
    fn create_default_clamps_zero_to_one() {
        let config = ChainConfiguration::create_default(0);
        assert_eq!(config.chain_length, 1);
        assert_eq!(config.links.len(), 1);
    }

    #[test]
    fn set_material_changes_only_target_link() {
        let config = ChainConfiguration::create_default(3).set_material(1, Material::Gold);

        assert_eq!(config.links[0].material, Material::Silver);
        assert_eq!(config.links[1].material, Material::Gold);
        assert_eq!(config.links[2].material, Material::Silver);
    }

    #[test]
    fn out_of_range_mutations_are_noops() {
        let config = ChainConfiguration::create_default(2);

        let same = config.set_material(7, Material::Black);
        assert_eq!(same, config);

        let same = config.set_surface(
            2,
            SurfaceId::Top1,
            SurfaceConfig::default_for(SurfaceKind::Enamel, SurfaceId::Top1),
        );
        assert_eq!(same, config);

        let same = config.copy_link_to_all(9);
        assert_eq!(same, config);
    }

    #[test]
    fn shrinking_truncates_tail_only() {
        let config = ChainConfiguration::create_default(2)
            .set_material(0, Material::Gold)
            .set_material(1, Material::Black);

        let grown = config.set_chain_length(5);
        assert_eq!(grown.links.len(), 5);
        assert_eq!(grown.links[4].material, Material::Silver);

        let back = grown.set_chain_length(2);
        assert_eq!(back, config);
    }

    #[test]
    fn chain_length_zero_clamps_to_one() {
        let config = ChainConfiguration::create_default(3).set_chain_length(0);
        assert_eq!(config.chain_length, 1);
        assert_eq!(config.links.len(), 1);
    }

    #[test]
    fn copy_link_to_all_shares_no_state() {
        let config = ChainConfiguration::create_default(3)
            .set_material(0, Material::Gold)
            .copy_link_to_all(0);

        for link in &config.links {
            assert_eq!(link.material, Material::Gold);
        }

        // Daarna schakel 0 wijzigen mag de rest niet raken.
        let mutated = config.set_material(0, Material::White);
        assert_eq!(mutated.links[0].material, Material::White);
        assert_eq!(mutated.links[1].material, Material::Gold);
        assert_eq!(mutated.links[2].material, Material::Gold);
    }

    #[test]
    fn side_surface_never_gains_third_stone() {
        let config = ChainConfiguration::create_default(1).set_surface(
            0,
            SurfaceId::Side1,
            SurfaceConfig::default_for(SurfaceKind::Gemstones, SurfaceId::Top1),
        );

        let colors = config.links[0]
            .surface(SurfaceId::Side1)
            .gemstone_colors()
            .expect("steenkleuren aanwezig");
        assert!(colors.stone3.is_none());
    }

    #[test]
    fn normalized_rejects_length_mismatch() {
        let broken = ChainConfiguration {
            chain_length: 3,
            links: vec![LinkConfig::empty()],
        };
        assert!(broken.normalized().is_none());
    }

    #[test]
    fn json_round_trip_preserves_configuration() {
        let config = ChainConfiguration::create_default(2)
            .set_material(1, Material::Gold)
            .set_surface(
                0,
                SurfaceId::Top1,
                SurfaceConfig::default_for(SurfaceKind::Moissanites, SurfaceId::Top1),
            );

        let json = serde_json::to_string(&config).expect("serialiseer configuratie");
        let back: ChainConfiguration = serde_json::from_str(&json).expect("parse configuratie");
        assert_eq!(config, back);
    }
}
