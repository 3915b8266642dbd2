//! Het configuratiemodel: pure, serialiseerbare beschrijving van de ketting.

pub mod chain;
pub mod io;
pub mod material;
pub mod surface;

pub use chain::{ChainConfiguration, LinkConfig};
pub use io::{ConfigError, ConfigResult, SavedConfiguration};
pub use material::Material;
pub use surface::{EngravingDesign, GemstoneColors, SurfaceConfig, SurfaceId, SurfaceKind};
