use serde::{Deserialize, Serialize};

/// Raw YAML representation of a sweep config file (sweep.yml)
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfig {
    #[serde(default)]
    pub regions: Vec<String>,
    pub page_size: Option<u32>,
    /// Overrides the per-region service URL, e.g. a local emulator.
    pub endpoint: Option<String>,
    #[serde(default)]
    pub sweepers: Vec<String>,
}
