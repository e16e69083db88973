pub mod engine;
pub mod islands;
pub mod manager;
pub mod neat;
pub mod population;
pub mod selection;
pub mod variation;

pub use engine::EngineConfig;
pub use islands::IslandConfig;
pub use manager::{ConfigManager, MendelConfig};
pub use neat::NeatConfig;
pub use population::{OptimizationDirection, PopulationConfig};
pub use selection::{SelectionConfig, SelectionMethod, WheelWeighting};
pub use variation::{RepeatMode, VariationConfig};

use crate::error::Result;

/// Trait for configuration sections
pub trait ConfigSection: serde::Serialize + for<'de> serde::Deserialize<'de> + Default + Clone {
    fn section_name() -> &'static str;
    fn validate(&self) -> Result<()>;
}
