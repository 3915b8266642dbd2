//! Scene-datastructuren: lokale vectormath, bounding boxes en de geladen
//! geometrieboom van een schakel.

pub mod core;
pub mod node;

pub use core::{BoundingBox, Vec3};
pub use node::{MaterialPreset, MeshAppearance, SceneNode, Transform};
