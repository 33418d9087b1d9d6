use crate::config::ProfileFileConfig;
use crate::profile::{Profile, Run};
use crate::{ConfigError, ResolveError};
use gear_core::Character;
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

/// Registry of all profiles, loaded from TOML files
#[derive(Debug, Default)]
pub struct ProfileRegistry {
    profiles: HashMap<String, Profile>,
}

impl ProfileRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Load all profiles from a directory (recursively)
    pub fn load(dir: &Path) -> Result<Self, ConfigError> {
        let mut registry = Self::new();
        registry.load_dir(dir)?;
        debug!(dir = %dir.display(), count = registry.profiles.len(), "loaded profiles");
        Ok(registry)
    }

    fn load_dir(&mut self, dir: &Path) -> Result<(), ConfigError> {
        if !dir.exists() {
            return Ok(());
        }

        let entries = std::fs::read_dir(dir).map_err(|e| ConfigError::Io {
            error: e,
            path: Some(dir.to_path_buf()),
        })?;

        for entry in entries {
            let entry = entry.map_err(|e| ConfigError::Io {
                error: e,
                path: Some(dir.to_path_buf()),
            })?;
            let path = entry.path();

            if path.is_dir() {
                self.load_dir(&path)?;
            } else if path.extension().is_some_and(|ext| ext == "toml") {
                self.load_file(&path)?;
            }
        }

        Ok(())
    }

    fn load_file(&mut self, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            error: e,
            path: Some(path.to_path_buf()),
        })?;

        let config: ProfileFileConfig =
            toml::from_str(&content).map_err(|e| ConfigError::Parse {
                error: e,
                path: path.to_path_buf(),
            })?;

        let profile =
            Profile::from_config(config).map_err(|message| ConfigError::Validation {
                message,
                path: path.to_path_buf(),
            })?;

        if self.profiles.contains_key(&profile.id) {
            return Err(ConfigError::Validation {
                message: format!("duplicate profile id '{}'", profile.id),
                path: path.to_path_buf(),
            });
        }

        debug!(id = %profile.id, path = %path.display(), "loaded profile");
        self.profiles.insert(profile.id.clone(), profile);
        Ok(())
    }

    /// Add a profile directly
    pub fn insert(&mut self, profile: Profile) {
        self.profiles.insert(profile.id.clone(), profile);
    }

    /// Get a profile by ID
    pub fn get(&self, id: &str) -> Option<&Profile> {
        self.profiles.get(id)
    }

    /// Check if a profile exists
    pub fn contains(&self, id: &str) -> bool {
        self.profiles.contains_key(id)
    }

    /// All profile IDs, sorted
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.profiles.keys().map(|s| s.as_str()).collect();
        ids.sort_unstable();
        ids
    }

    /// Apply profiles in order on top of `base`; later profiles win
    pub fn compose(&self, ids: &[String], base: Character) -> Result<Character, ResolveError> {
        let mut character = base;
        for id in ids {
            let profile = self
                .get(id)
                .ok_or_else(|| ResolveError::UnknownProfile(id.clone()))?;
            profile.apply(&mut character, self, 0)?;
        }
        Ok(character)
    }

    /// Expand a run set into one character per sweep offset
    ///
    /// `overrides` are `name=value` tokens applied after the run set's own
    /// profiles and before the sweep offset.
    pub fn expand_run_set(
        &self,
        id: &str,
        base: &Character,
        overrides: &[String],
    ) -> Result<Vec<Run>, ResolveError> {
        let profile = self
            .get(id)
            .ok_or_else(|| ResolveError::UnknownProfile(id.to_string()))?;
        profile.expand(base, self, overrides)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn create_test_profile(dir: &Path, name: &str, content: &str) {
        let path = dir.join(format!("{}.toml", name));
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
    }

    fn standard_set(dir: &Path) {
        create_test_profile(
            dir,
            "th",
            r#"
[profile]
id = "th"
description = "Two-handed weapon"

[params]
dualWield = 0
mainSwingTime = 3.3
mainWeaponDamageMin = 142
mainWeaponDamageMax = 214
"#,
        );
        create_test_profile(
            dir,
            "gear",
            r#"
[profile]
id = "gear"

[params]
strength = 223
agility = 172
bonusAttackPower = 140
hitBonus = 4
critBonus = 1
"#,
        );
        create_test_profile(
            dir,
            "th_arms",
            r#"
[profile]
id = "th_arms"

[params]
tacticalMasteryLevel = 5
mortalStrikeLevel = 1
"#,
        );
        create_test_profile(
            dir,
            "2h-arms",
            r#"
[profile]
id = "2h-arms"
extends = ["th", "gear", "th_arms"]

[sweep]
param = "hitBonus"
add = [0, 1, 2, 3, 4]
"#,
        );
    }

    #[test]
    fn test_load_profiles() {
        let dir = TempDir::new().unwrap();
        standard_set(dir.path());
        let registry = ProfileRegistry::load(dir.path()).unwrap();
        assert_eq!(registry.ids(), vec!["2h-arms", "gear", "th", "th_arms"]);
        assert!(registry.get("2h-arms").unwrap().is_run_set());
        assert_eq!(
            registry.get("th").unwrap().description.as_deref(),
            Some("Two-handed weapon")
        );
    }

    #[test]
    fn test_load_nested_directories() {
        let dir = TempDir::new().unwrap();
        let talents = dir.path().join("talents");
        std::fs::create_dir(&talents).unwrap();
        standard_set(&talents);
        let registry = ProfileRegistry::load(dir.path()).unwrap();
        assert!(registry.contains("th_arms"));
    }

    #[test]
    fn test_missing_dir_is_empty() {
        let dir = TempDir::new().unwrap();
        let registry = ProfileRegistry::load(&dir.path().join("nope")).unwrap();
        assert!(registry.ids().is_empty());
    }

    #[test]
    fn test_compose_later_wins() {
        let dir = TempDir::new().unwrap();
        standard_set(dir.path());
        create_test_profile(
            dir.path(),
            "hit_capped",
            r#"
[profile]
id = "hit_capped"

[params]
hitBonus = 9
"#,
        );
        let registry = ProfileRegistry::load(dir.path()).unwrap();
        let ids = vec!["th".to_string(), "gear".to_string(), "hit_capped".to_string()];
        let character = registry.compose(&ids, Character::default()).unwrap();
        assert_eq!(character.stats.hit_bonus, 9);
        assert_eq!(character.stats.strength, 223);
        assert_eq!(character.main_hand.damage_max, 214);
    }

    #[test]
    fn test_expand_run_set() {
        let dir = TempDir::new().unwrap();
        standard_set(dir.path());
        let registry = ProfileRegistry::load(dir.path()).unwrap();

        let runs = registry
            .expand_run_set("2h-arms", &Character::default(), &[])
            .unwrap();
        assert_eq!(runs.len(), 5);
        let hits: Vec<u32> = runs.iter().map(|r| r.character.stats.hit_bonus).collect();
        assert_eq!(hits, vec![4, 5, 6, 7, 8]);
        assert_eq!(runs[2].label, "2h-arms hitBonus+2");
        assert!(runs.iter().all(|r| r.character.talents.mortal_strike == 1));
    }

    #[test]
    fn test_overrides_beat_run_set_params() {
        let dir = TempDir::new().unwrap();
        standard_set(dir.path());
        let registry = ProfileRegistry::load(dir.path()).unwrap();

        let overrides = vec!["strength=300".to_string(), "hitBonus=1".to_string()];
        let runs = registry
            .expand_run_set("2h-arms", &Character::default(), &overrides)
            .unwrap();
        assert!(runs.iter().all(|r| r.character.stats.strength == 300));
        // The sweep still steps from the overridden value
        let hits: Vec<u32> = runs.iter().map(|r| r.character.stats.hit_bonus).collect();
        assert_eq!(hits, vec![1, 2, 3, 4, 5]);
        assert!(runs.iter().all(|r| r.character.stats.agility == 172));
    }

    #[test]
    fn test_bad_override_rejected() {
        let dir = TempDir::new().unwrap();
        standard_set(dir.path());
        let registry = ProfileRegistry::load(dir.path()).unwrap();
        let result =
            registry.expand_run_set("2h-arms", &Character::default(), &["stamina=5".to_string()]);
        assert!(matches!(result, Err(ResolveError::Override(_))));
    }

    #[test]
    fn test_unknown_profile_error() {
        let registry = ProfileRegistry::new();
        let result = registry.compose(&["ghost".to_string()], Character::default());
        assert!(matches!(result, Err(ResolveError::UnknownProfile(_))));
    }

    #[test]
    fn test_unknown_parent_error() {
        let dir = TempDir::new().unwrap();
        create_test_profile(
            dir.path(),
            "orphan",
            r#"
[profile]
id = "orphan"
extends = ["missing"]
"#,
        );
        let registry = ProfileRegistry::load(dir.path()).unwrap();
        let result = registry.compose(&["orphan".to_string()], Character::default());
        assert!(matches!(result, Err(ResolveError::UnknownProfile(id)) if id == "missing"));
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let dir = TempDir::new().unwrap();
        create_test_profile(dir.path(), "a", "[profile]\nid = \"same\"\n");
        create_test_profile(dir.path(), "b", "[profile]\nid = \"same\"\n");
        let result = ProfileRegistry::load(dir.path());
        assert!(matches!(result, Err(ConfigError::Validation { .. })));
    }

    #[test]
    fn test_parse_error_names_file() {
        let dir = TempDir::new().unwrap();
        create_test_profile(dir.path(), "broken", "[profile\nid = ");
        let result = ProfileRegistry::load(dir.path());
        assert!(matches!(result, Err(ConfigError::Parse { path, .. }) if path.ends_with("broken.toml")));
    }

    #[test]
    fn test_cycle_detection() {
        let dir = TempDir::new().unwrap();
        // Profile A extends B, which extends A
        create_test_profile(
            dir.path(),
            "profile_a",
            r#"
[profile]
id = "profile_a"
extends = ["profile_b"]
"#,
        );
        create_test_profile(
            dir.path(),
            "profile_b",
            r#"
[profile]
id = "profile_b"
extends = ["profile_a"]
"#,
        );

        let registry = ProfileRegistry::load(dir.path()).unwrap();
        let result = registry.compose(&["profile_a".to_string()], Character::default());
        assert!(matches!(result, Err(ResolveError::CycleDetected(_))));
    }

    #[test]
    fn test_shipped_profiles_resolve() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("../profiles");
        let registry = ProfileRegistry::load(&dir).unwrap();
        assert!(registry.contains("2h-arms"));
        assert!(registry.contains("dw-fury"));

        for id in registry.ids() {
            if !registry.get(id).unwrap().is_run_set() {
                continue;
            }
            let runs = registry
                .expand_run_set(id, &Character::default(), &[])
                .unwrap();
            assert_eq!(runs.len(), 5, "{}", id);
            for run in runs {
                run.character.validate().unwrap();
            }
        }
    }
}
