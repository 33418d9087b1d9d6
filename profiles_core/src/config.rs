use gear_core::ParamValue;
use serde::Deserialize;
use std::collections::BTreeMap;

/// TOML configuration for a profile file
#[derive(Debug, Deserialize)]
pub struct ProfileFileConfig {
    pub profile: ProfileConfig,
    /// Parameters keyed by their camelCase names
    #[serde(default)]
    pub params: BTreeMap<String, ParamValue>,
    /// Present only on run sets
    #[serde(default)]
    pub sweep: Option<SweepConfig>,
}

/// Configuration for the profile itself
#[derive(Debug, Deserialize)]
pub struct ProfileConfig {
    pub id: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Profiles applied first, in order
    #[serde(default)]
    pub extends: Vec<String>,
}

/// One parameter stepped through a list of offsets
#[derive(Debug, Deserialize)]
pub struct SweepConfig {
    pub param: String,
    pub add: Vec<ParamValue>,
}
