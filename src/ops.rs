// WHY: the invocation surface callers use; owns the settings value so nothing else holds global state
// Operations read settings at start and never write them; only save() persists

use anyhow::Result;
use tracing::info;

use crate::engine::ReplaceEngine;
use crate::error::Error;
use crate::interchange::{self, ImportReport};
use crate::render::{render_with, RenderConfig};
use crate::settings::{Settings, SettingsStore};
use crate::splitter::{SplitConfig, SplitResult, Splitter};

/// Result of a replace operation
#[derive(Debug, Clone)]
pub struct ReplaceOutput {
    pub plain_text: String,
    pub markup: String,
    pub match_count: usize,
    /// Rules left out because they could not be used
    pub skipped_rules: Vec<Error>,
}

/// Run the rules of `mode` over `input`
pub fn replace(settings: &Settings, mode: &str, input: &str) -> Result<ReplaceOutput, Error> {
    replace_with(settings, mode, input, &RenderConfig::default())
}

pub fn replace_with(
    settings: &Settings,
    mode: &str,
    input: &str,
    render_config: &RenderConfig,
) -> Result<ReplaceOutput, Error> {
    if input.is_empty() {
        return Err(Error::EmptyInput);
    }
    let rule_set = settings.mode(mode)?;
    let report = ReplaceEngine::compile(rule_set).run(input)?;
    let rendered = render_with(&report.text, render_config);

    info!(mode, matches = report.match_count, skipped = report.skipped.len(), "Replace finished");

    Ok(ReplaceOutput {
        plain_text: rendered.plain_text,
        markup: rendered.display_markup,
        match_count: report.match_count,
        skipped_rules: report.skipped,
    })
}

/// Split `input` into `part_count` parts
pub fn split(input: &str, part_count: usize) -> Result<SplitResult, Error> {
    split_with(input, SplitConfig::with_parts(part_count))
}

pub fn split_with(input: &str, config: SplitConfig) -> Result<SplitResult, Error> {
    let result = Splitter::new(config)?.split(input)?;
    info!(parts = result.parts.len(), chapter = ?result.chapter_header, "Split finished");
    Ok(result)
}

/// Settings bound to their store, with explicit save
pub struct Session {
    store: SettingsStore,
    settings: Settings,
    dirty: bool,
}

impl Session {
    /// Load settings from `store` (defaults when absent or corrupt)
    pub async fn open(store: SettingsStore) -> Self {
        let settings = store.load().await;
        Self {
            store,
            settings,
            dirty: false,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Mutable access marks the session as needing a save
    pub fn settings_mut(&mut self) -> &mut Settings {
        self.dirty = true;
        &mut self.settings
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn store(&self) -> &SettingsStore {
        &self.store
    }

    /// Replace using `mode`, or the current mode when `None`
    pub fn replace(&self, mode: Option<&str>, input: &str) -> Result<ReplaceOutput, Error> {
        let mode = mode.unwrap_or(self.settings.current_mode());
        replace(&self.settings, mode, input)
    }

    pub fn export_csv(&self) -> String {
        interchange::export_csv(&self.settings)
    }

    /// Import rules; the session is marked dirty only when something was imported
    pub fn import_csv(&mut self, csv: &str) -> Result<ImportReport, Error> {
        let report = interchange::import_csv(csv, &mut self.settings)?;
        if report.imported > 0 {
            self.dirty = true;
        }
        Ok(report)
    }

    pub async fn save(&mut self) -> Result<()> {
        self.store.save(&self.settings).await?;
        self.dirty = false;
        Ok(())
    }

    /// Save only when something changed since load or the last save
    pub async fn save_if_dirty(&mut self) -> Result<bool> {
        if !self.dirty {
            return Ok(false);
        }
        self.save().await?;
        Ok(true)
    }
}
