use thiserror::Error;

#[derive(Error, Debug)]
pub enum MendelError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Engine error: {0}")]
    Engine(String),

    #[error("Selection error: {0}")]
    Selection(String),

    #[error("Record error: {0}")]
    Record(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),
}

pub type Result<T> = std::result::Result<T, MendelError>;
