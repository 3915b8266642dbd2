//! Mesh-classificatie op naam.
//!
//! De assets benoemen hun submeshes volgens een vaste conventie; op basis van
//! die namen beslist de materializer welke mesh een body-, diamant- of
//! emaillerol speelt. De patronen liggen hier achter één smalle interface,
//! zodat een andere matchingstrategie de materializer niet raakt wanneer de
//! asset-naamgeving ooit verschuift.

use wildmatch::WildMatch;

use crate::config::surface::SurfaceId;

/// Naampatronen voor diamant-locatienodes in de assets.
const DIAMOND_PATTERNS: [&str; 3] = [
    "*diamond-octagon*",
    "*diamond-location*",
    "*diamondloc*",
];

/// Naampatronen voor emaillevlakken.
const ENAMEL_PATTERNS: [&str; 2] = ["*enamel*", "*email-surface*"];

/// De referentiemesh uit het bronasset ("Plane", eventueel met een
/// exportsuffix zoals "Plane.001"). Rendert nooit.
const PLANE_PATTERNS: [&str; 2] = ["plane", "plane.*"];

fn matches_any(patterns: &[&str], name: &str) -> bool {
    let lowered = name.to_lowercase();
    patterns
        .iter()
        .any(|pattern| WildMatch::new(pattern).matches(&lowered))
}

/// Is dit een diamant-submesh (steenpositie)?
#[must_use]
pub fn is_diamond_mesh(name: &str) -> bool {
    matches_any(&DIAMOND_PATTERNS, name)
}

/// Is dit een emaille-submesh?
#[must_use]
pub fn is_enamel_mesh(name: &str) -> bool {
    matches_any(&ENAMEL_PATTERNS, name)
}

/// Is dit de altijd-onzichtbare referentiemesh?
#[must_use]
pub fn is_reference_plane(name: &str) -> bool {
    matches_any(&PLANE_PATTERNS, name)
}

/// Is dit structureel schakelmateriaal? Per definitie disjunct met de
/// diamant-, emaille- en referentieclassificaties, zodat materiaaltoewijzing
/// een mesh nooit dubbel of helemaal niet raakt.
#[must_use]
pub fn is_body_mesh(name: &str) -> bool {
    !is_diamond_mesh(name) && !is_enamel_mesh(name) && !is_reference_plane(name)
}

/// Bepaalt bij welk vlak een decoratiemesh hoort, op basis van het
/// vlaktoken in de naam.
#[must_use]
pub fn surface_of(name: &str) -> Option<SurfaceId> {
    let lowered = name.to_lowercase();
    SurfaceId::ALL
        .into_iter()
        .find(|surface| lowered.contains(surface.as_str()))
}

/// Leest de steenpositie (1 t/m 3) uit een diamantmeshnaam: het laatste
/// cijfer na een scheidingsteken, bv. `Diamond-Octagon_Top1_3`.
#[must_use]
pub fn stone_slot(name: &str) -> Option<u8> {
    let trimmed = name.trim_end_matches(|c: char| !c.is_ascii_digit() && !is_separator(c));
    let tail = trimmed.rsplit(is_separator).next()?;
    match tail {
        "1" => Some(1),
        "2" => Some(2),
        "3" => Some(3),
        _ => None,
    }
}

fn is_separator(c: char) -> bool {
    c == '_' || c == '-' || c == '.'
}

#[cfg(test)]
mod tests {
    use super::{
        is_body_mesh, is_diamond_mesh, is_enamel_mesh, is_reference_plane, stone_slot, surface_of,
    };
    use crate::config::surface::SurfaceId;

    #[test]
    fn diamond_names_classify_as_diamond() {
        assert!(is_diamond_mesh("Diamond-Octagon_Top1_1"));
        assert!(is_diamond_mesh("diamond-location-side2-2"));
        assert!(!is_diamond_mesh("Link_Body"));
    }

    #[test]
    fn enamel_names_classify_as_enamel() {
        assert!(is_enamel_mesh("Enamel_Side1"));
        assert!(!is_enamel_mesh("Schakel_Body"));
    }

    #[test]
    fn plane_is_recognized_with_export_suffix() {
        assert!(is_reference_plane("Plane"));
        assert!(is_reference_plane("plane.001"));
        assert!(!is_reference_plane("Planetarium"));
    }

    #[test]
    fn classifications_are_mutually_exclusive() {
        let names = [
            "Diamond-Octagon_Top1_1",
            "Enamel_Side2",
            "Plane",
            "Link_Body",
            "Schakel_Frame_01",
        ];

        for name in names {
            let body = is_body_mesh(name);
            let diamond = is_diamond_mesh(name);
            let enamel = is_enamel_mesh(name);
            let plane = is_reference_plane(name);

            assert!(
                !(body && (diamond || enamel || plane)),
                "naam `{name}` kreeg een dubbele classificatie"
            );
        }
    }

    #[test]
    fn surface_tokens_are_recovered() {
        assert_eq!(surface_of("Diamond-Octagon_Top1_2"), Some(SurfaceId::Top1));
        assert_eq!(surface_of("enamel_side2"), Some(SurfaceId::Side2));
        assert_eq!(surface_of("Link_Body"), None);
    }

    #[test]
    fn stone_slots_are_recovered() {
        assert_eq!(stone_slot("Diamond-Octagon_Top1_1"), Some(1));
        assert_eq!(stone_slot("Diamond-Octagon_Top2_3"), Some(3));
        assert_eq!(stone_slot("diamond-location-side1-2"), Some(2));
        assert_eq!(stone_slot("Diamond-Octagon_Top1"), None);
        assert_eq!(stone_slot("Diamond-Octagon_Top1_9"), None);
    }
}
