use std::path::Path;

use poolsweep_domain::{Region, SweeperName};
use tracing::debug;

use crate::error::ConfigError;
use crate::raw::RawConfig;

/// Validated sweep configuration. Every field may still be overridden from
/// the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepConfig {
    /// Regions to sweep, in order. Duplicates are dropped.
    pub regions: Vec<Region>,
    /// `None` leaves the choice to the sweeper.
    pub page_size: Option<u32>,
    pub endpoint: Option<String>,
    /// Empty means every registered sweeper.
    pub sweepers: Vec<SweeperName>,
}

/// Read and validate the YAML file at `path`.
pub fn load_config(path: &Path) -> Result<SweepConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    debug!("Loading sweep config from {}", path.display());
    parse_config(&content, &path.display().to_string())
}

/// Parse YAML `content`; `origin` names the source in errors.
pub fn parse_config(content: &str, origin: &str) -> Result<SweepConfig, ConfigError> {
    // An empty file is a valid, empty config.
    let raw: RawConfig = if content.trim().is_empty() {
        RawConfig::default()
    } else {
        serde_yaml::from_str(content).map_err(|e| ConfigError::YamlParse {
            path: origin.to_string(),
            source: e,
        })?
    };
    convert(raw, origin)
}

fn convert(raw: RawConfig, origin: &str) -> Result<SweepConfig, ConfigError> {
    let conversion = |message: String| ConfigError::Conversion { path: origin.to_string(), message };

    let mut regions: Vec<Region> = Vec::with_capacity(raw.regions.len());
    for r in raw.regions {
        let region = Region::new(r).map_err(|e| conversion(e.to_string()))?;
        if !regions.contains(&region) {
            regions.push(region);
        }
    }

    if raw.page_size == Some(0) {
        return Err(conversion("page_size must be at least 1".into()));
    }

    let endpoint = match raw.endpoint.map(|e| e.trim().to_string()) {
        None => None,
        Some(e) if e.is_empty() => None,
        Some(e) if e.starts_with("http://") || e.starts_with("https://") => Some(e),
        Some(e) => return Err(conversion(format!("endpoint '{}' must be an http(s) URL", e))),
    };

    let sweepers = raw
        .sweepers
        .into_iter()
        .map(|s| SweeperName::new(s).map_err(|e| conversion(e.to_string())))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(SweepConfig { regions, page_size: raw.page_size, endpoint, sweepers })
}
