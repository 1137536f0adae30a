// WHY: the mode collection is the only state that outlives an operation
// It is loaded once, mutated through explicit operations, and written back only on save()

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, warn};

use crate::error::Error;
use crate::rules::{Rule, RuleSet};

/// Name of the mode that always exists and cannot be renamed or deleted
pub const DEFAULT_MODE: &str = "default";

/// File name used under the platform config directory
pub const SETTINGS_FILE_NAME: &str = "settings.json";

/// All rule sets plus the current-mode pointer
///
/// Deserialization goes through [`StoredSettings`] so a decoded value is always repaired.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "StoredSettings")]
pub struct Settings {
    current_mode: String,
    modes: BTreeMap<String, RuleSet>,
}

/// Settings exactly as found on disk, before names and the default mode are restored
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredSettings {
    #[serde(default)]
    current_mode: String,
    #[serde(default)]
    modes: BTreeMap<String, RuleSet>,
}

impl From<StoredSettings> for Settings {
    fn from(stored: StoredSettings) -> Self {
        let mut settings = Settings {
            current_mode: stored.current_mode,
            modes: stored.modes,
        };
        settings.repair();
        settings
    }
}

impl Default for Settings {
    fn default() -> Self {
        let mut modes = BTreeMap::new();
        modes.insert(DEFAULT_MODE.to_string(), RuleSet::new(DEFAULT_MODE));
        Self {
            current_mode: DEFAULT_MODE.to_string(),
            modes,
        }
    }
}

impl Settings {
    /// Parse persisted JSON, restoring names and the default mode
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Re-establish invariants after decoding
    fn repair(&mut self) {
        for (name, set) in self.modes.iter_mut() {
            set.name = name.clone();
        }
        self.modes
            .entry(DEFAULT_MODE.to_string())
            .or_insert_with(|| RuleSet::new(DEFAULT_MODE));
        if !self.modes.contains_key(&self.current_mode) {
            warn!(current = %self.current_mode, "Current mode missing, falling back to default");
            self.current_mode = DEFAULT_MODE.to_string();
        }
    }

    pub fn current_mode(&self) -> &str {
        &self.current_mode
    }

    pub fn current(&self) -> &RuleSet {
        // repair() and every mutation keep current_mode pointing at an existing entry
        &self.modes[&self.current_mode]
    }

    pub fn current_mut(&mut self) -> &mut RuleSet {
        let name = self.current_mode.clone();
        self.modes
            .entry(name.clone())
            .or_insert_with(|| RuleSet::new(name))
    }

    pub fn mode(&self, name: &str) -> Result<&RuleSet, Error> {
        self.modes
            .get(name)
            .ok_or_else(|| Error::UnknownMode(name.to_string()))
    }

    pub fn mode_mut(&mut self, name: &str) -> Result<&mut RuleSet, Error> {
        self.modes
            .get_mut(name)
            .ok_or_else(|| Error::UnknownMode(name.to_string()))
    }

    /// Mode names in sorted order
    pub fn mode_names(&self) -> impl Iterator<Item = &str> {
        self.modes.keys().map(String::as_str)
    }

    pub fn modes(&self) -> impl Iterator<Item = &RuleSet> {
        self.modes.values()
    }

    pub fn contains_mode(&self, name: &str) -> bool {
        self.modes.contains_key(name)
    }

    pub fn switch_mode(&mut self, name: &str) -> Result<(), Error> {
        if !self.modes.contains_key(name) {
            return Err(Error::UnknownMode(name.to_string()));
        }
        self.current_mode = name.to_string();
        Ok(())
    }

    fn check_new_name(&self, name: &str) -> Result<String, Error> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::InvalidModeName(name.to_string()));
        }
        if self.modes.contains_key(name) {
            return Err(Error::DuplicateModeName(name.to_string()));
        }
        Ok(name.to_string())
    }

    /// Create an empty mode and make it current
    pub fn add_mode(&mut self, name: &str) -> Result<&mut RuleSet, Error> {
        let name = self.check_new_name(name)?;
        self.current_mode = name.clone();
        Ok(self.modes.entry(name.clone()).or_insert_with(|| RuleSet::new(name)))
    }

    /// Copy the current mode (rules and flags) under a new name and make it current
    pub fn copy_mode(&mut self, name: &str) -> Result<&mut RuleSet, Error> {
        let name = self.check_new_name(name)?;
        let mut copy = self.current().clone();
        copy.name = name.clone();
        self.current_mode = name.clone();
        Ok(self.modes.entry(name).or_insert(copy))
    }

    /// Rename `old` to `new`; renaming a mode to its own name is a no-op
    pub fn rename_mode(&mut self, old: &str, new: &str) -> Result<(), Error> {
        if old == DEFAULT_MODE {
            return Err(Error::ProtectedMode(old.to_string()));
        }
        if !self.modes.contains_key(old) {
            return Err(Error::UnknownMode(old.to_string()));
        }
        if new.trim() == old {
            return Ok(());
        }
        let new = self.check_new_name(new)?;
        if let Some(mut set) = self.modes.remove(old) {
            set.name = new.clone();
            self.modes.insert(new.clone(), set);
        }
        if self.current_mode == old {
            self.current_mode = new;
        }
        Ok(())
    }

    /// Delete `name`; if it was current, `default` becomes current
    pub fn delete_mode(&mut self, name: &str) -> Result<RuleSet, Error> {
        if name == DEFAULT_MODE {
            return Err(Error::ProtectedMode(name.to_string()));
        }
        let removed = self
            .modes
            .remove(name)
            .ok_or_else(|| Error::UnknownMode(name.to_string()))?;
        if self.current_mode == name {
            self.current_mode = DEFAULT_MODE.to_string();
        }
        Ok(removed)
    }

    /// Flip match-case on the current mode, returning the new value
    pub fn toggle_match_case(&mut self) -> bool {
        let set = self.current_mut();
        set.match_case = !set.match_case;
        set.match_case
    }

    /// Flip whole-word on the current mode, returning the new value
    pub fn toggle_whole_word(&mut self) -> bool {
        let set = self.current_mut();
        set.whole_word = !set.whole_word;
        set.whole_word
    }

    /// Replace the pairs of the current mode, dropping empty finds
    pub fn set_pairs<I>(&mut self, pairs: I)
    where
        I: IntoIterator<Item = Rule>,
    {
        self.current_mut().set_pairs(pairs);
    }

    /// Remove and return the rule at `index` (zero-based) of `mode`
    pub fn remove_pair(&mut self, mode: &str, index: usize) -> Result<Rule, Error> {
        let set = self.mode_mut(mode)?;
        if index >= set.pairs.len() {
            return Err(Error::RuleIndexOutOfRange {
                mode: mode.to_string(),
                index,
                len: set.pairs.len(),
            });
        }
        Ok(set.pairs.remove(index))
    }

    /// Append a rule to `mode`, creating the mode when it does not exist yet
    pub fn push_pair(&mut self, mode: &str, rule: Rule) -> bool {
        let created = !self.modes.contains_key(mode);
        self.modes
            .entry(mode.to_string())
            .or_insert_with(|| RuleSet::new(mode))
            .pairs
            .push(rule);
        created
    }
}

/// JSON file holding [`Settings`]
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<config dir>/swapmark/settings.json`, or the working directory when there is none
    pub fn default_path() -> PathBuf {
        match dirs::config_dir() {
            Some(dir) => dir.join("swapmark").join(SETTINGS_FILE_NAME),
            None => PathBuf::from(format!("swapmark_{SETTINGS_FILE_NAME}")),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Load settings; a missing or corrupt file yields the default single-mode settings
    pub async fn load(&self) -> Settings {
        match fs::read_to_string(&self.path).await {
            Ok(content) => match Settings::from_json(&content) {
                Ok(settings) => {
                    debug!(path = %self.path.display(), modes = settings.modes.len(), "Loaded settings");
                    settings
                }
                Err(e) => {
                    warn!(path = %self.path.display(), error = %e, "Settings file is corrupt, using defaults");
                    Settings::default()
                }
            },
            Err(e) => {
                debug!(path = %self.path.display(), error = %e, "No settings file, using defaults");
                Settings::default()
            }
        }
    }

    /// Persist settings verbatim as pretty JSON
    pub async fn save(&self, settings: &Settings) -> Result<()> {
        let content = settings.to_json().context("Failed to serialize settings")?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .await
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
        }

        fs::write(&self.path, content)
            .await
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))?;
        info!(path = %self.path.display(), "Saved settings");
        Ok(())
    }
}
