use super::ConfigSection;
use crate::error::{MendelError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IslandConfig {
    pub islands: usize,
    /// Generations between migrations around the ring.
    pub exchange_interval: u32,
    /// Individuals each island sends to its neighbor per exchange.
    pub exchange_count: usize,
}

impl Default for IslandConfig {
    fn default() -> Self {
        Self {
            islands: 4,
            exchange_interval: 10,
            exchange_count: 2,
        }
    }
}

impl ConfigSection for IslandConfig {
    fn section_name() -> &'static str {
        "islands"
    }

    fn validate(&self) -> Result<()> {
        if self.islands == 0 {
            return Err(MendelError::Configuration(
                "islands must be at least 1".to_string(),
            ));
        }
        if self.exchange_interval == 0 {
            return Err(MendelError::Configuration(
                "exchange_interval must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
