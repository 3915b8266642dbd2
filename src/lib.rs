#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod assembly;
pub mod catalog;
pub mod classify;
pub mod config;
pub mod layout;
pub mod materialize;
pub mod scene;

use std::collections::BTreeMap;
use std::fmt;

use assembly::{ChainCommand, ChainSession, LinkTarget, SessionState, SurfaceTarget};
use config::{Material, SavedConfiguration, SurfaceConfig, SurfaceId};
use materialize::LinkSceneState;
use scene::SceneNode;
use serde::Serialize;
use wasm_bindgen::JsError;
use wasm_bindgen::prelude::*;

cfg_if::cfg_if! {
    if #[cfg(all(feature = "console_error_panic_hook", target_arch = "wasm32"))] {
        #[wasm_bindgen(start)]
        pub fn initialize() {
            console_error_panic_hook::set_once();
            init_logger();
        }
    } else {
        #[wasm_bindgen(start)]
        pub fn initialize() {
            // no-op fallback when panic hook is disabled
            init_logger();
        }
    }
}

#[cfg(feature = "debug_logs")]
fn init_logger() {
    use log::LevelFilter;
    use wasm_bindgen_console_logger::DEFAULT_LOGGER;
    log::set_logger(&DEFAULT_LOGGER).expect("error initializing logger");
    log::set_max_level(LevelFilter::Debug);
}

#[cfg(not(feature = "debug_logs"))]
fn init_logger() {
    // no-op fallback when debug logs are disabled
}

#[macro_export]
macro_rules! debug_log {
    ($($t:tt)*) => {{
        #[cfg(feature = "debug_logs")]
        {
            #[cfg(target_arch = "wasm32")]
            {
                ::web_sys::console::log_1(&::wasm_bindgen::JsValue::from_str(&format!($($t)*)));
            }
            #[cfg(not(target_arch = "wasm32"))]
            {
                println!("{}", format!($($t)*));
            }
        }
    }};
}

/// Scenewijzigingen sinds de vorige `get_scene`-aanroep, per schakelindex.
#[derive(Debug, Default, Serialize)]
struct SceneDiff<'a> {
    added: Vec<&'a LinkSceneState>,
    updated: Vec<&'a LinkSceneState>,
    removed: Vec<usize>,
}

/// Samenvatting van de sessiestaat voor UI-panelen en debugging.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ChainInfo {
    chain_length: usize,
    link_types: Vec<String>,
    spacing: f64,
    generation: u64,
    state: String,
    stable: bool,
}

/// Laadfout van één schakel, voor rapportage richting de UI.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LoadFailure {
    index: usize,
    reason: String,
}

/// Public entry point for consumers.
#[wasm_bindgen]
pub struct Engine {
    initialized: bool,
    session: ChainSession,
    scene_map: BTreeMap<usize, LinkSceneState>,
    result_dirty: bool,
}

#[wasm_bindgen]
impl Engine {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Engine {
        Engine {
            initialized: true,
            session: ChainSession::new(),
            scene_map: BTreeMap::new(),
            result_dirty: false,
        }
    }

    /// Geeft terug of de engine de minimale initialisatie heeft doorlopen.
    #[wasm_bindgen]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Laad een opgeslagen configuratiebestand (JSON). Een ongeldig bestand
    /// wordt in zijn geheel geweigerd; de zittende staat blijft staan.
    #[wasm_bindgen]
    pub fn load_configuration(&mut self, json: &str) -> Result<(), JsValue> {
        let saved = SavedConfiguration::from_json(json).map_err(to_js_error)?;
        self.session.load_saved(saved).map_err(to_js_error)?;
        self.result_dirty = true;
        Ok(())
    }

    /// Serialiseer de huidige configuratie naar het JSON-bestandsformaat.
    #[wasm_bindgen]
    pub fn save_configuration(&self) -> Result<String, JsValue> {
        self.session.to_saved().to_json().map_err(to_js_error)
    }

    /// Voeg een schakel van het gegeven type achteraan toe.
    #[wasm_bindgen]
    pub fn add_link(&mut self, link_type: &str) -> Result<(), JsValue> {
        self.session
            .apply(ChainCommand::AddLink {
                link_type: link_type.to_owned(),
            })
            .map_err(to_js_error)?;
        self.result_dirty = true;
        Ok(())
    }

    /// Verwijder de schakel op `index`. Weigert wanneer de ketting daarmee
    /// onder één schakel zou komen.
    #[wasm_bindgen]
    pub fn remove_link(&mut self, index: usize) -> Result<(), JsValue> {
        self.session
            .apply(ChainCommand::RemoveLink { index })
            .map_err(to_js_error)?;
        self.result_dirty = true;
        Ok(())
    }

    /// Stel de spacingfactor in. Ongeldige waarden vallen terug op de
    /// standaard.
    #[wasm_bindgen]
    pub fn set_spacing(&mut self, spacing: f64) {
        // Kan niet falen; de sessie saneert de waarde zelf.
        let _ = self.session.apply(ChainCommand::SetSpacing { spacing });
        self.result_dirty = true;
    }

    /// Zet het materiaal van één schakel.
    #[wasm_bindgen]
    pub fn set_link_material(&mut self, index: usize, material: &str) -> Result<(), JsValue> {
        let material = parse_material(material)?;
        let _ = self.session.apply(ChainCommand::SetMaterial {
            target: LinkTarget::Index(index),
            material,
        });
        self.result_dirty = true;
        Ok(())
    }

    /// Zet het materiaal van alle schakels tegelijk.
    #[wasm_bindgen]
    pub fn set_all_materials(&mut self, material: &str) -> Result<(), JsValue> {
        let material = parse_material(material)?;
        let _ = self.session.apply(ChainCommand::SetMaterial {
            target: LinkTarget::All,
            material,
        });
        self.result_dirty = true;
        Ok(())
    }

    /// Vervang de configuratie van één vlak. `config` volgt het
    /// bestandsformaat van een vlakconfiguratie (`{ "type": ... }`).
    #[wasm_bindgen]
    pub fn set_surface(
        &mut self,
        index: usize,
        surface: &str,
        config: JsValue,
    ) -> Result<(), JsValue> {
        let surface = parse_surface_id(surface)?;
        let config = parse_surface_config(config)?;
        let _ = self.session.apply(ChainCommand::SetSurface {
            link: index,
            target: SurfaceTarget::Single(surface),
            config,
        });
        self.result_dirty = true;
        Ok(())
    }

    /// Vervang de configuratie van een gespiegeld vlakpaar: `"sides"` raakt
    /// side1 en side2, `"tops"` raakt top1 en top2, altijd symmetrisch.
    #[wasm_bindgen]
    pub fn set_surface_mirrored(
        &mut self,
        index: usize,
        pair: &str,
        config: JsValue,
    ) -> Result<(), JsValue> {
        let target = match pair.trim().to_ascii_lowercase().as_str() {
            "sides" => SurfaceTarget::MirroredSides,
            "tops" => SurfaceTarget::MirroredTops,
            _ => return Err(js_error("onbekend vlakpaar: gebruik `sides` of `tops`")),
        };
        let config = parse_surface_config(config)?;
        let _ = self.session.apply(ChainCommand::SetSurface {
            link: index,
            target,
            config,
        });
        self.result_dirty = true;
        Ok(())
    }

    /// Kopieer materiaal en vlakken van één schakel naar alle schakels.
    #[wasm_bindgen]
    pub fn copy_link_to_all(&mut self, source: usize) {
        let _ = self.session.apply(ChainCommand::CopyLinkToAll { source });
        self.result_dirty = true;
    }

    /// Openstaande laadverzoeken voor de host: welke modellen er voor de
    /// huidige generatie nog ontbreken.
    #[wasm_bindgen]
    pub fn pending_geometry(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.session.pending_requests())
            .map_err(|err| JsError::new(&err.to_string()).into())
    }

    /// Meld binnengekomen geometrie voor (generatie, index). De boom volgt
    /// het `SceneNode`-formaat. Geeft terug of de levering gebruikt is;
    /// leveringen van een verouderde generatie worden genegeerd.
    #[wasm_bindgen]
    pub fn geometry_loaded(
        &mut self,
        generation: u32,
        index: usize,
        tree: JsValue,
    ) -> Result<bool, JsValue> {
        let tree: SceneNode = serde_wasm_bindgen::from_value(tree)
            .map_err(|err| js_error(&format!("ongeldige geometrieboom: {err}")))?;

        let used = self
            .session
            .geometry_loaded(u64::from(generation), index, tree);
        if used {
            self.result_dirty = true;
        }
        Ok(used)
    }

    /// Meld een mislukte lading voor (generatie, index). Fataal voor die ene
    /// schakel; de rest van de ketting schuift niet op.
    #[wasm_bindgen]
    pub fn geometry_failed(&mut self, generation: u32, index: usize, reason: &str) -> bool {
        let used = self
            .session
            .geometry_failed(u64::from(generation), index, reason.to_owned());
        if used {
            self.result_dirty = true;
        }
        used
    }

    /// Voer het uitgestelde werk uit: layout zodra alle geometrie binnen is,
    /// decoratie wanneer de configuratie wijzigde. Samengevallen edits
    /// worden in één pas verwerkt.
    #[wasm_bindgen]
    pub fn refresh(&mut self) {
        self.session.refresh();
        self.result_dirty = false;
    }

    /// Haal de scenewijzigingen op sinds de vorige aanroep, als diff per
    /// schakelindex.
    #[wasm_bindgen]
    pub fn get_scene(&mut self) -> Result<JsValue, JsValue> {
        if self.result_dirty {
            return Err(js_error(
                "scene is nog niet ververst; roep eerst refresh() aan",
            ));
        }

        let next_map: BTreeMap<usize, LinkSceneState> = self
            .session
            .scene()
            .iter()
            .map(|state| (state.index, state.clone()))
            .collect();

        let mut diff = SceneDiff::default();
        for (index, state) in &next_map {
            match self.scene_map.get(index) {
                Some(existing) if existing == state => {}
                Some(_) => diff.updated.push(state),
                None => diff.added.push(state),
            }
        }
        for index in self.scene_map.keys() {
            if !next_map.contains_key(index) {
                diff.removed.push(*index);
            }
        }

        let value = serde_wasm_bindgen::to_value(&diff)
            .map_err(|err| JsValue::from(JsError::new(&err.to_string())))?;
        self.scene_map = next_map;
        Ok(value)
    }

    /// Alleen `true` wanneer de scene de configuratie volledig weerspiegelt.
    /// De capture-pijplijn (foto, video) mag uitsluitend dan een frame
    /// nemen.
    #[wasm_bindgen]
    pub fn is_stable(&self) -> bool {
        !self.result_dirty && self.session.is_stable()
    }

    /// Laadfouten van de huidige generatie, per schakelindex.
    #[wasm_bindgen]
    pub fn load_errors(&self) -> Result<JsValue, JsValue> {
        let failures: Vec<LoadFailure> = self
            .session
            .load_failures()
            .into_iter()
            .map(|(index, reason)| LoadFailure { index, reason })
            .collect();
        serde_wasm_bindgen::to_value(&failures).map_err(|err| JsError::new(&err.to_string()).into())
    }

    /// Samenvatting van de sessie voor UI-panelen.
    #[wasm_bindgen]
    pub fn get_chain_info(&self) -> Result<JsValue, JsValue> {
        let info = ChainInfo {
            chain_length: self.session.config().chain_length,
            link_types: self.session.link_types().to_vec(),
            spacing: self.session.spacing(),
            generation: self.session.generation(),
            state: state_name(self.session.state()).to_owned(),
            stable: self.is_stable(),
        };
        serde_wasm_bindgen::to_value(&info).map_err(|err| JsError::new(&err.to_string()).into())
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// Directe toegang tot de sessie, voor native hosts en tests.
    #[must_use]
    pub fn session(&self) -> &ChainSession {
        &self.session
    }

    /// Muteerbare toegang tot de sessie, voor native hosts en tests. Zet de
    /// dirty-vlag: na directe mutatie is een `refresh` vereist.
    pub fn session_mut(&mut self) -> &mut ChainSession {
        self.result_dirty = true;
        &mut self.session
    }
}

fn state_name(state: SessionState) -> &'static str {
    match state {
        SessionState::Empty => "empty",
        SessionState::Loading => "loading",
        SessionState::Assembled => "assembled",
        SessionState::Decorated => "decorated",
    }
}

fn parse_material(name: &str) -> Result<Material, JsValue> {
    Material::parse(name).ok_or_else(|| js_error(&format!("onbekend materiaal `{name}`")))
}

fn parse_surface_id(name: &str) -> Result<SurfaceId, JsValue> {
    let normalized = name.trim().to_ascii_lowercase();
    SurfaceId::ALL
        .into_iter()
        .find(|surface| surface.as_str() == normalized)
        .ok_or_else(|| js_error(&format!("onbekend vlak `{name}`")))
}

fn parse_surface_config(value: JsValue) -> Result<SurfaceConfig, JsValue> {
    serde_wasm_bindgen::from_value(value)
        .map_err(|err| js_error(&format!("ongeldige vlakconfiguratie: {err}")))
}

fn to_js_error<E: fmt::Display>(error: E) -> JsValue {
    js_error(&error.to_string())
}

fn js_error(message: &str) -> JsValue {
    #[cfg(target_arch = "wasm32")]
    {
        JsError::new(message).into()
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = message;
        JsValue::NULL
    }
}
