use crate::config::ProfileFileConfig;
use crate::registry::ProfileRegistry;
use crate::ResolveError;
use gear_core::{Character, ParamValue, PARAM_NAMES};

/// Deepest `extends` chain followed before assuming a cycle
const MAX_DEPTH: u32 = 16;

/// A named partial parameter set
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub id: String,
    pub description: Option<String>,
    extends: Vec<String>,
    params: Vec<(String, ParamValue)>,
    sweep: Option<Sweep>,
}

#[derive(Debug, Clone, PartialEq)]
struct Sweep {
    param: String,
    offsets: Vec<ParamValue>,
}

/// One fully resolved character from a run set
#[derive(Debug, Clone, PartialEq)]
pub struct Run {
    pub label: String,
    pub character: Character,
}

impl Profile {
    /// Parse a profile from config, rejecting unknown parameter names
    pub fn from_config(config: ProfileFileConfig) -> Result<Self, String> {
        let id = config.profile.id;
        if id.is_empty() {
            return Err("profile id must not be empty".to_string());
        }

        for name in config.params.keys() {
            if !PARAM_NAMES.contains(&name.as_str()) {
                return Err(format!("unknown param '{}'", name));
            }
        }

        let sweep = match config.sweep {
            Some(sweep) => {
                if !PARAM_NAMES.contains(&sweep.param.as_str()) {
                    return Err(format!("unknown sweep param '{}'", sweep.param));
                }
                if sweep.add.is_empty() {
                    return Err("sweep needs at least one offset".to_string());
                }
                Some(Sweep {
                    param: sweep.param,
                    offsets: sweep.add,
                })
            }
            None => None,
        };

        Ok(Profile {
            id,
            description: config.profile.description,
            extends: config.profile.extends,
            params: config.params.into_iter().collect(),
            sweep,
        })
    }

    pub fn extends(&self) -> &[String] {
        &self.extends
    }

    pub fn params(&self) -> &[(String, ParamValue)] {
        &self.params
    }

    pub fn is_run_set(&self) -> bool {
        self.sweep.is_some()
    }

    /// Apply parents in order, then this profile's own params
    pub fn apply(
        &self,
        character: &mut Character,
        registry: &ProfileRegistry,
        depth: u32,
    ) -> Result<(), ResolveError> {
        if depth > MAX_DEPTH {
            return Err(ResolveError::CycleDetected(self.id.clone()));
        }

        for parent_id in &self.extends {
            let parent = registry
                .get(parent_id)
                .ok_or_else(|| ResolveError::UnknownProfile(parent_id.clone()))?;
            parent.apply(character, registry, depth + 1)?;
        }

        for (name, value) in &self.params {
            character
                .set_param(name, *value)
                .map_err(|source| ResolveError::Param {
                    profile: self.id.clone(),
                    source,
                })?;
        }
        Ok(())
    }

    /// One run per sweep offset
    ///
    /// Each run is `base`, then this profile's chain, then the `overrides`
    /// tokens, then the offset.
    pub fn expand(
        &self,
        base: &Character,
        registry: &ProfileRegistry,
        overrides: &[String],
    ) -> Result<Vec<Run>, ResolveError> {
        let sweep = self
            .sweep
            .as_ref()
            .ok_or_else(|| ResolveError::NotARunSet(self.id.clone()))?;

        let mut resolved = base.clone();
        self.apply(&mut resolved, registry, 0)?;
        for token in overrides {
            resolved.apply_token(token)?;
        }

        sweep
            .offsets
            .iter()
            .map(|offset| {
                let mut character = resolved.clone();
                character
                    .add_to_param(&sweep.param, *offset)
                    .map_err(|source| ResolveError::Param {
                        profile: self.id.clone(),
                        source,
                    })?;
                Ok(Run {
                    label: format!("{} {}+{}", self.id, sweep.param, offset),
                    character,
                })
            })
            .collect()
    }
}
