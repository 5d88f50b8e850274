use thiserror::Error;

/// Rejected initialization contract. The simulation refuses to start.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("population size must be positive")]
    NonPositivePopulation,

    #[error("{name} must be within [0, 1], got {value}")]
    ProbabilityOutOfRange { name: &'static str, value: f64 },

    #[error("invalid {name} distribution: {reason}")]
    InvalidDistribution { name: String, reason: String },

    #[error("run length must be at least one day")]
    InvalidRunLength,
}

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SimError>;
