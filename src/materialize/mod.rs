//! Scene-materializer: projecteert de kettingconfiguratie op de
//! geclassificeerde submeshes van de geassembleerde ketting.
//!
//! De uitkomst is puur afgeleid van `(assembly, configuratie)`. Twee keer
//! toepassen zonder tussentijdse wijziging levert exact dezelfde zichtbare
//! staat op; er is geen geschiedenis nodig om correct te blijven.

use crate::assembly::ChainAssembly;
use crate::classify;
use crate::config::surface::SurfaceConfig;
use crate::config::{ChainConfiguration, LinkConfig, Material};
use crate::scene::{MaterialPreset, MeshAppearance, SceneNode, Transform};

use serde::Serialize;

/// Zichtbare staat van één geassembleerde schakel: transformatie plus de
/// afgeleide weergave van elke submesh.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkSceneState {
    pub index: usize,
    pub link_type: String,
    pub transform: Transform,
    pub meshes: Vec<MeshAppearance>,
}

/// De vijf vaste materiaalpresets voor body-meshes.
#[must_use]
pub fn preset_for(material: Material) -> MaterialPreset {
    match material {
        Material::Silver => MaterialPreset {
            diffuse: [0.753, 0.753, 0.769],
            specular: [0.95, 0.95, 0.95],
            transparency: 0.0,
            shine: 0.85,
        },
        Material::Grey => MaterialPreset {
            diffuse: [0.35, 0.35, 0.37],
            specular: [0.6, 0.6, 0.6],
            transparency: 0.0,
            shine: 0.55,
        },
        Material::Black => MaterialPreset {
            diffuse: [0.05, 0.05, 0.05],
            specular: [0.4, 0.4, 0.4],
            transparency: 0.0,
            shine: 0.7,
        },
        Material::White => MaterialPreset {
            diffuse: [0.96, 0.96, 0.94],
            specular: [0.5, 0.5, 0.5],
            transparency: 0.0,
            shine: 0.4,
        },
        Material::Gold => MaterialPreset {
            diffuse: [0.831, 0.686, 0.216],
            specular: [1.0, 0.9, 0.6],
            transparency: 0.0,
            shine: 0.9,
        },
    }
}

/// Leest een `#rrggbb`-kleur. Ongeldige invoer levert `None` op; de
/// aanroeper valt dan terug op wit in plaats van te falen.
#[must_use]
pub fn parse_hex_color(input: &str) -> Option<[f64; 3]> {
    let hex = input.trim().strip_prefix('#').unwrap_or(input.trim());
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&hex[range], 16).map(|v| f64::from(v) / 255.0)
    };

    Some([
        channel(0..2).ok()?,
        channel(2..4).ok()?,
        channel(4..6).ok()?,
    ])
}

fn tint_or_white(color: &str) -> [f64; 3] {
    parse_hex_color(color).unwrap_or([1.0, 1.0, 1.0])
}

/// Past de configuratie toe op de hele assembly. Idempotent: de uitkomst
/// hangt alleen af van de huidige invoer.
#[must_use]
pub fn apply_configuration(
    assembly: &ChainAssembly,
    config: &ChainConfiguration,
) -> Vec<LinkSceneState> {
    assembly
        .links
        .iter()
        .map(|instance| {
            let link_config = config.links.get(instance.index);
            LinkSceneState {
                index: instance.index,
                link_type: instance.link_type.clone(),
                transform: instance.transform,
                meshes: materialize_link(&instance.geometry, link_config),
            }
        })
        .collect()
}

/// Eén traversal over de submeshboom van een schakel. Zonder bijbehorende
/// schakelconfiguratie (benigne race met een net ingekorte ketting) valt de
/// schakel terug op de standaardweergave.
fn materialize_link(geometry: &SceneNode, link_config: Option<&LinkConfig>) -> Vec<MeshAppearance> {
    let fallback = LinkConfig::empty();
    let link_config = link_config.unwrap_or(&fallback);

    geometry
        .walk()
        .filter(|node| node.bounds.is_some())
        .map(|node| materialize_mesh(&node.name, link_config))
        .collect()
}

fn materialize_mesh(name: &str, link: &LinkConfig) -> MeshAppearance {
    let mut appearance = MeshAppearance {
        mesh: name.to_owned(),
        visible: false,
        material: None,
        tint: None,
        engraving: None,
    };

    // De referentiemesh rendert nooit, wat de configuratie ook zegt.
    if classify::is_reference_plane(name) {
        return appearance;
    }

    if classify::is_diamond_mesh(name) {
        if let Some((surface, slot)) = classify::surface_of(name).zip(classify::stone_slot(name)) {
            if let Some(colors) = link.surface(surface).gemstone_colors() {
                if let Some(color) = colors.slot(slot) {
                    appearance.visible = true;
                    appearance.tint = Some(tint_or_white(color));
                }
            }
        }
        return appearance;
    }

    if classify::is_enamel_mesh(name) {
        if let Some(surface) = classify::surface_of(name) {
            if let SurfaceConfig::Enamel { enamel_color } = link.surface(surface) {
                appearance.visible = true;
                appearance.tint = Some(tint_or_white(enamel_color));
            }
        }
        return appearance;
    }

    // Body: altijd zichtbaar in het schakelmateriaal; draagt het
    // gravurepatroon wanneer het bijbehorende vlak op gravure staat.
    appearance.visible = true;
    appearance.material = Some(preset_for(link.material));
    if let Some(surface) = classify::surface_of(name) {
        if let SurfaceConfig::Engraving { engraving_design } = link.surface(surface) {
            appearance.engraving = Some(*engraving_design);
        }
    }
    appearance
}
