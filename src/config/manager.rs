use super::{
    engine::EngineConfig, islands::IslandConfig, neat::NeatConfig, population::PopulationConfig,
    selection::SelectionConfig, variation::VariationConfig, ConfigSection,
};
use crate::error::{MendelError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, RwLock};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MendelConfig {
    pub engine: EngineConfig,
    pub population: PopulationConfig,
    pub selection: SelectionConfig,
    pub variation: VariationConfig,
    pub islands: IslandConfig,
    pub neat: NeatConfig,
}

impl MendelConfig {
    pub fn validate(&self) -> Result<()> {
        self.engine.validate()?;
        self.population.validate()?;
        self.selection.validate()?;
        self.variation.validate()?;
        self.islands.validate()?;
        self.neat.validate()?;
        Ok(())
    }
}

pub struct ConfigManager {
    config: Arc<RwLock<MendelConfig>>,
}

impl ConfigManager {
    pub fn new() -> Self {
        Self {
            config: Arc::new(RwLock::new(MendelConfig::default())),
        }
    }

    pub fn load_from_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| MendelError::Configuration(format!("Failed to read config: {e}")))?;

        let config: MendelConfig = toml::from_str(&contents)
            .map_err(|e| MendelError::Configuration(format!("Failed to parse config: {e}")))?;

        config.validate()?;

        *self.config.write().expect("config lock poisoned") = config;
        Ok(())
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let config = self.config.read().expect("config lock poisoned");
        let toml_str = toml::to_string_pretty(&*config)
            .map_err(|e| MendelError::Configuration(format!("Failed to serialize: {e}")))?;

        std::fs::write(path, toml_str)
            .map_err(|e| MendelError::Configuration(format!("Failed to write config: {e}")))?;

        Ok(())
    }

    pub fn get(&self) -> MendelConfig {
        self.config.read().expect("config lock poisoned").clone()
    }

    pub fn update<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce(&mut MendelConfig),
    {
        let mut config = self.config.write().expect("config lock poisoned");
        f(&mut config);
        config.validate()?;
        Ok(())
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(MendelConfig::default().validate().is_ok());
    }

    #[test]
    fn update_rejects_invalid_values() {
        let manager = ConfigManager::new();
        let result = manager.update(|cfg| cfg.variation.mutation_rate = 1.5);
        assert!(result.is_err());
    }

    #[test]
    fn toml_round_trip() {
        let config = MendelConfig::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let back: MendelConfig = toml::from_str(&text).unwrap();
        assert_eq!(back.population.size, config.population.size);
        assert_eq!(back.selection.tournament_size, config.selection.tournament_size);
    }
}
