pub mod config;
pub mod error;
pub mod types;

pub use config::{CapPolicy, EconomyConfig, ReviewDurations};
pub use error::{ConfigError, Result, SimError};
