//! Synchronisatielaag: bezit de afgeleide kettingassembly en beslist per
//! wijziging of de layout engine, de materializer of beide opnieuw moeten
//! draaien.
//!
//! Wijzigingsintentie komt binnen als een getypte [`ChainCommand`] met de
//! sessie als enige consument; er is bewust geen ambient event-bus. Snel
//! opeenvolgende wijzigingen zetten alleen dirty-vlaggen en vallen samen in
//! één [`ChainSession::refresh`]-pas, zodat er nooit een half gelayoute of
//! half gedecoreerde scene zichtbaar wordt.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::catalog::LinkCatalog;
use crate::config::surface::{SurfaceConfig, SurfaceId};
use crate::config::{ChainConfiguration, Material, SavedConfiguration};
use crate::layout::{self, LayoutSlot};
use crate::materialize::{self, LinkSceneState};
use crate::scene::{BoundingBox, SceneNode, Transform, Vec3};

/// Eén geassembleerde schakel: geometrie plus wereldtransformatie, met de
/// kettingindex als terugverwijzing.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkInstance {
    pub index: usize,
    pub link_type: String,
    pub geometry: SceneNode,
    pub transform: Transform,
}

/// De afgeleide assembly. Nooit gepersisteerd; wordt herbouwd zodra de
/// schakellijst of de spacing wijzigt, maar niet bij pure decoratie-edits.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChainAssembly {
    pub links: Vec<LinkInstance>,
}

/// Levenscyclus van een kettingsessie.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Nog geen schakellijst.
    Empty,
    /// Geometrieën zijn onderweg; layout wacht tot alles binnen is.
    Loading,
    /// Transformaties berekend, decoratie nog niet toegepast.
    Assembled,
    /// Volledig gematerialiseerd.
    Decorated,
}

/// Doel van een materiaalwijziging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkTarget {
    All,
    Index(usize),
}

/// Doel van een vlakwijziging. Spiegelen is symmetrisch: beide vlakken van
/// het paar krijgen dezelfde configuratie.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceTarget {
    Single(SurfaceId),
    MirroredSides,
    MirroredTops,
}

impl SurfaceTarget {
    fn surfaces(self) -> &'static [SurfaceId] {
        match self {
            Self::Single(SurfaceId::Top1) => &[SurfaceId::Top1],
            Self::Single(SurfaceId::Top2) => &[SurfaceId::Top2],
            Self::Single(SurfaceId::Side1) => &[SurfaceId::Side1],
            Self::Single(SurfaceId::Side2) => &[SurfaceId::Side2],
            Self::MirroredSides => &[SurfaceId::Side1, SurfaceId::Side2],
            Self::MirroredTops => &[SurfaceId::Top1, SurfaceId::Top2],
        }
    }
}

/// Getypte wijzigingsintentie vanuit de UI.
#[derive(Debug, Clone, PartialEq)]
pub enum ChainCommand {
    AddLink {
        link_type: String,
    },
    RemoveLink {
        index: usize,
    },
    SetSpacing {
        spacing: f64,
    },
    SetMaterial {
        target: LinkTarget,
        material: Material,
    },
    SetSurface {
        link: usize,
        target: SurfaceTarget,
        config: SurfaceConfig,
    },
    CopyLinkToAll {
        source: usize,
    },
}

/// Fouttype voor sessiebewerkingen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// De ketting zou onder de minimale lengte van één schakel zakken.
    ChainTooShort,
    /// Een schakellijst zonder schakels is niet toegestaan.
    EmptyLinkList,
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ChainTooShort => {
                write!(f, "een ketting heeft minimaal één schakel; verwijderen geweigerd")
            }
            Self::EmptyLinkList => write!(f, "schakellijst mag niet leeg zijn"),
        }
    }
}

impl std::error::Error for SessionError {}

/// Openstaand laadverzoek voor de host: welk model, voor welke index, binnen
/// welke generatie.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeometryRequest {
    pub generation: u64,
    pub index: usize,
    pub link_type: String,
    pub asset_ref: String,
}

/// Laadstatus van één schakelslot binnen de huidige generatie.
#[derive(Debug, Clone, PartialEq)]
enum SlotState {
    Waiting,
    Loaded(SceneNode),
    Failed(String),
}

/// De sessie: configuratie, schakellijst, spacing en de afgeleide scene.
#[derive(Debug, Clone)]
pub struct ChainSession {
    catalog: LinkCatalog,
    config: ChainConfiguration,
    link_types: Vec<String>,
    spacing: f64,
    generation: u64,
    state: SessionState,
    slots: BTreeMap<usize, SlotState>,
    assembly: ChainAssembly,
    scene: Vec<LinkSceneState>,
    layout_dirty: bool,
    decoration_dirty: bool,
}

impl ChainSession {
    #[must_use]
    pub fn new() -> Self {
        Self {
            catalog: LinkCatalog::default(),
            config: ChainConfiguration::create_default(1),
            link_types: Vec::new(),
            spacing: layout::DEFAULT_SPACING,
            generation: 0,
            state: SessionState::Empty,
            slots: BTreeMap::new(),
            assembly: ChainAssembly::default(),
            scene: Vec::new(),
            layout_dirty: false,
            decoration_dirty: false,
        }
    }

    #[must_use]
    pub fn config(&self) -> &ChainConfiguration {
        &self.config
    }

    #[must_use]
    pub fn link_types(&self) -> &[String] {
        &self.link_types
    }

    #[must_use]
    pub fn spacing(&self) -> f64 {
        self.spacing
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn catalog(&self) -> &LinkCatalog {
        &self.catalog
    }

    /// De laatst gematerialiseerde scene. Kan achterlopen op de configuratie
    /// zolang [`ChainSession::is_stable`] `false` teruggeeft.
    #[must_use]
    pub fn scene(&self) -> &[LinkSceneState] {
        &self.scene
    }

    /// Alleen `true` wanneer de scene de huidige configuratie volledig
    /// weerspiegelt. Captures (foto/video) mogen uitsluitend in deze staat
    /// genomen worden.
    #[must_use]
    pub fn is_stable(&self) -> bool {
        self.state == SessionState::Decorated && !self.layout_dirty && !self.decoration_dirty
    }

    /// Verwerkt één wijzigingsintentie. Configuratiewijzigingen buiten
    /// bereik zijn stille no-ops (het configuratiemodel bewaakt dat zelf);
    /// structurele wijzigingen kunnen weigeren.
    pub fn apply(&mut self, command: ChainCommand) -> Result<(), SessionError> {
        match command {
            ChainCommand::AddLink { link_type } => {
                let mut next = self.link_types.clone();
                next.push(link_type);
                self.set_link_list(next)
            }
            ChainCommand::RemoveLink { index } => {
                if self.link_types.len() <= 1 {
                    return Err(SessionError::ChainTooShort);
                }
                if index >= self.link_types.len() {
                    // Benigne race met de UI; zie het foutbeleid van het
                    // configuratiemodel.
                    return Ok(());
                }
                let mut next = self.link_types.clone();
                next.remove(index);
                self.set_link_list(next)
            }
            ChainCommand::SetSpacing { spacing } => {
                let spacing = layout::sanitize_spacing(spacing);
                if (spacing - self.spacing).abs() > f64::EPSILON {
                    self.spacing = spacing;
                    self.layout_dirty = true;
                }
                Ok(())
            }
            ChainCommand::SetMaterial { target, material } => {
                let next = match target {
                    LinkTarget::All => {
                        let mut config = self.config.clone();
                        for index in 0..config.links.len() {
                            config = config.set_material(index, material);
                        }
                        config
                    }
                    LinkTarget::Index(index) => self.config.set_material(index, material),
                };
                self.replace_config(next);
                Ok(())
            }
            ChainCommand::SetSurface {
                link,
                target,
                config,
            } => {
                let mut next = self.config.clone();
                for &surface in target.surfaces() {
                    next = next.set_surface(link, surface, config.clone());
                }
                self.replace_config(next);
                Ok(())
            }
            ChainCommand::CopyLinkToAll { source } => {
                let next = self.config.copy_link_to_all(source);
                self.replace_config(next);
                Ok(())
            }
        }
    }

    /// Vervangt de schakellijst. Start een nieuwe generatie: alle slots gaan
    /// terug naar `Waiting`, eerdere mislukkingen krijgen zo vanzelf een
    /// nieuwe poging, en te laat arriverende geometrie van de oude generatie
    /// wordt genegeerd.
    pub fn set_link_list(&mut self, link_types: Vec<String>) -> Result<(), SessionError> {
        if link_types.is_empty() {
            return Err(SessionError::EmptyLinkList);
        }

        self.config = self.config.set_chain_length(link_types.len());
        self.link_types = link_types;
        self.generation += 1;
        self.slots = (0..self.link_types.len())
            .map(|index| (index, SlotState::Waiting))
            .collect();
        self.state = SessionState::Loading;
        self.layout_dirty = false;
        self.decoration_dirty = false;

        log::debug!(
            "nieuwe schakellijst: {} schakels, generatie {}",
            self.link_types.len(),
            self.generation
        );
        Ok(())
    }

    /// Laadt een opgeslagen configuratie: schakellijst uit de modellijst,
    /// daarna de kettingconfiguratie er overheen. De aanroeper heeft het
    /// bestand al gevalideerd; hier kan alleen een lege lijst nog weigeren.
    pub fn load_saved(&mut self, saved: SavedConfiguration) -> Result<(), SessionError> {
        let link_types: Vec<String> = saved
            .model_urls
            .iter()
            .map(|url| self.catalog.link_type_for_asset(url))
            .collect();

        self.set_link_list(link_types)?;
        self.config = saved.chain_config;
        Ok(())
    }

    /// Serialiseerbare momentopname voor bestandsexport.
    #[must_use]
    pub fn to_saved(&self) -> SavedConfiguration {
        SavedConfiguration {
            chain_config: self.config.clone(),
            model_urls: self
                .link_types
                .iter()
                .map(|link_type| self.catalog.resolve(link_type).asset_ref)
                .collect(),
        }
    }

    /// Openstaande laadverzoeken voor de huidige generatie.
    #[must_use]
    pub fn pending_requests(&self) -> Vec<GeometryRequest> {
        self.slots
            .iter()
            .filter(|(_, slot)| matches!(slot, SlotState::Waiting))
            .map(|(&index, _)| {
                let link_type = self.link_types[index].clone();
                let asset_ref = self.catalog.resolve(&link_type).asset_ref;
                GeometryRequest {
                    generation: self.generation,
                    index,
                    link_type,
                    asset_ref,
                }
            })
            .collect()
    }

    /// Meldt binnengekomen geometrie. Geeft `false` terug wanneer de
    /// levering verouderd is (andere generatie of onbekende index) en dus
    /// genegeerd werd.
    pub fn geometry_loaded(&mut self, generation: u64, index: usize, geometry: SceneNode) -> bool {
        if generation != self.generation {
            log::debug!(
                "geometrie voor generatie {generation} genegeerd; huidige generatie is {}",
                self.generation
            );
            return false;
        }
        let Some(slot) = self.slots.get_mut(&index) else {
            return false;
        };

        *slot = SlotState::Loaded(geometry);
        true
    }

    /// Meldt een mislukte lading. Fataal voor die ene schakel: het slot
    /// behoudt zijn kettingindex maar levert geen geometrie aan de layout.
    pub fn geometry_failed(&mut self, generation: u64, index: usize, reason: String) -> bool {
        if generation != self.generation {
            return false;
        }
        let Some(slot) = self.slots.get_mut(&index) else {
            return false;
        };

        log::warn!("laden van schakel {index} mislukt: {reason}");
        *slot = SlotState::Failed(reason);
        true
    }

    /// Alle geometrie voor de huidige generatie is binnen of definitief
    /// mislukt.
    #[must_use]
    pub fn ready(&self) -> bool {
        !self
            .slots
            .values()
            .any(|slot| matches!(slot, SlotState::Waiting))
    }

    /// Per schakel de laadfout, voor rapportage richting de UI.
    #[must_use]
    pub fn load_failures(&self) -> Vec<(usize, String)> {
        self.slots
            .iter()
            .filter_map(|(&index, slot)| match slot {
                SlotState::Failed(reason) => Some((index, reason.clone())),
                _ => None,
            })
            .collect()
    }

    fn replace_config(&mut self, next: ChainConfiguration) {
        if next != self.config {
            self.config = next;
            self.decoration_dirty = true;
        }
    }

    /// Voert het uitgestelde werk uit: layout zodra alle geometrie binnen
    /// is, decoratie wanneer de configuratie wijzigde. Geeft terug of er
    /// iets herberekend is.
    pub fn refresh(&mut self) -> bool {
        let mut worked = false;

        if self.state == SessionState::Loading {
            if !self.ready() {
                // Nooit een gedeeltelijke layout tonen.
                return false;
            }
            self.rebuild_assembly();
            self.state = SessionState::Assembled;
            self.decoration_dirty = true;
            worked = true;
        }

        if self.layout_dirty && self.state != SessionState::Empty {
            self.rebuild_transforms();
            self.layout_dirty = false;
            self.decoration_dirty = true;
            worked = true;
        }

        if (self.decoration_dirty || self.state == SessionState::Assembled)
            && self.state != SessionState::Empty
        {
            self.scene = materialize::apply_configuration(&self.assembly, &self.config);
            self.decoration_dirty = false;
            self.state = SessionState::Decorated;
            worked = true;
        }

        worked
    }

    /// Herbouwt de assembly vanaf de geladen slots en laat de layout engine
    /// de transformaties bepalen. Mislukte slots doen niet mee maar houden
    /// hun index; de positieberekening is index-gedreven.
    fn rebuild_assembly(&mut self) {
        let mut links = Vec::new();
        for (&index, slot) in &self.slots {
            if let SlotState::Loaded(geometry) = slot {
                links.push(LinkInstance {
                    index,
                    link_type: self.link_types[index].clone(),
                    geometry: geometry.clone(),
                    transform: Transform::IDENTITY,
                });
            }
        }

        self.assembly = ChainAssembly { links };
        self.rebuild_transforms();
    }

    fn rebuild_transforms(&mut self) {
        let slots: Vec<LayoutSlot> = self
            .assembly
            .links
            .iter()
            .map(|instance| LayoutSlot {
                index: instance.index,
                link_type: instance.link_type.clone(),
                bounds: instance
                    .geometry
                    .combined_bounds()
                    .unwrap_or(BoundingBox::new(Vec3::ZERO, Vec3::ZERO)),
            })
            .collect();

        let transforms = layout::compute(&self.catalog, &slots, self.spacing);
        for instance in &mut self.assembly.links {
            if let Some(transform) = transforms.get(&instance.index) {
                instance.transform = *transform;
            }
        }
    }
}

impl Default for ChainSession {
    fn default() -> Self {
        Self::new()
    }
}
