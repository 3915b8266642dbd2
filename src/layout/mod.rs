//! Layout engine: berekent per schakel de wereldtransformatie voor een
//! rechte, op de grond uitgelijnde en horizontaal gecentreerde ketting.
//!
//! De berekening is volledig deterministisch: dezelfde slots en dezelfde
//! spacing leveren byte-identieke transformaties op, onafhankelijk van
//! decoratiestaat of frame-timing. Posities worden uit de kettingindex
//! afgeleid en nooit cumulatief opgebouwd, zodat een ontbrekende schakel de
//! rest van de ketting niet laat opschuiven.

use std::collections::BTreeMap;
use std::f64::consts::PI;

use crate::catalog::LinkCatalog;
use crate::scene::{BoundingBox, Transform, Vec3};

/// Empirisch gekozen overlapfactor: schakels grijpen in elkaar in plaats van
/// rand-aan-rand te liggen.
pub const DEFAULT_SPACING: f64 = 0.55;

/// Referentiebreedte wanneer er geen bruikbare eerste bounding box is.
pub const FALLBACK_REFERENCE_WIDTH: f64 = 10.0;

/// Vaste kanteling om de Z-as voor afwisselend georiënteerde schakels.
pub const ALTERNATE_TILT: f64 = 0.02 * PI;

/// Eén te plaatsen schakel: kettingindex, type en de lokale bounding box van
/// de geladen geometrie.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutSlot {
    pub index: usize,
    pub link_type: String,
    pub bounds: BoundingBox,
}

/// Maakt van een ruwe spacingwaarde iets bruikbaars: niet-eindige of
/// niet-positieve invoer valt terug op de standaard.
#[must_use]
pub fn sanitize_spacing(spacing: f64) -> f64 {
    if spacing.is_finite() && spacing > 0.0 {
        spacing
    } else {
        DEFAULT_SPACING
    }
}

/// Berekent per slot de wereldtransformatie.
///
/// Stappen: X-positie uit kettingindex maal stapgrootte plus de
/// verbindingscorrectie van het type (behalve vooraan), afwisselende
/// kanteling voor oneven indices, daarna een grondpas (laagste punt naar
/// Y=0, zonder een ketting die al boven de grond hangt op te tillen) en een
/// centreerpas over X en Z.
#[must_use]
pub fn compute(
    catalog: &LinkCatalog,
    slots: &[LayoutSlot],
    spacing: f64,
) -> BTreeMap<usize, Transform> {
    let mut transforms = BTreeMap::new();
    if slots.is_empty() {
        return transforms;
    }

    let spacing = sanitize_spacing(spacing);
    let reference_width = slots
        .first()
        .map(|slot| slot.bounds)
        .filter(|bounds| !bounds.is_degenerate())
        .map_or(FALLBACK_REFERENCE_WIDTH, BoundingBox::width_x);
    let step = reference_width * spacing;

    for slot in slots {
        let profile = catalog.resolve(&slot.link_type);

        let offset = if slot.index > 0 {
            profile.connection_offset
        } else {
            0.0
        };
        let x = slot.index as f64 * step + offset;

        let rotation_z = if profile.alternate_rotation && slot.index % 2 == 1 {
            ALTERNATE_TILT
        } else {
            0.0
        };

        transforms.insert(
            slot.index,
            Transform {
                position: Vec3::new(x, 0.0, 0.0),
                rotation_z,
                scale: profile.scale,
            },
        );
    }

    ground_pass(slots, &mut transforms);
    center_pass(slots, &mut transforms);

    transforms
}

/// Schuift de hele ketting verticaal zodat het laagste punt Y=0 raakt. Een
/// ketting die al volledig boven de grond hangt blijft waar hij is.
fn ground_pass(slots: &[LayoutSlot], transforms: &mut BTreeMap<usize, Transform>) {
    let lowest = slots
        .iter()
        .filter_map(|slot| {
            transforms
                .get(&slot.index)
                .map(|transform| transform.apply_to_bounds(slot.bounds).min.y)
        })
        .fold(f64::INFINITY, f64::min);

    if !lowest.is_finite() {
        return;
    }

    let shift = lowest.min(0.0);
    for transform in transforms.values_mut() {
        transform.position.y -= shift;
    }
}

/// Centreert de ketting rond de oorsprong in X en Z. Y blijft onaangeroerd,
/// de grondpas is al gelopen.
fn center_pass(slots: &[LayoutSlot], transforms: &mut BTreeMap<usize, Transform>) {
    let total = slots
        .iter()
        .filter_map(|slot| {
            transforms
                .get(&slot.index)
                .map(|transform| transform.apply_to_bounds(slot.bounds))
        })
        .reduce(BoundingBox::union);

    let Some(total) = total else {
        return;
    };

    let center = total.center();
    for transform in transforms.values_mut() {
        transform.position.x -= center.x;
        transform.position.z -= center.z;
    }
}
