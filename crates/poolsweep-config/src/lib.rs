mod raw;
mod loader;
pub mod error;

pub use loader::{load_config, parse_config, SweepConfig};
pub use error::ConfigError;
