// Integration test utilities and common code
// WHY: Centralized utilities avoid duplication across integration tests

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use swapmark::settings::{Settings, SettingsStore, SETTINGS_FILE_NAME};
use swapmark::RuleSet;
use tempfile::TempDir;

/// Test fixture helper owning a temporary directory for settings and input files
pub struct TestFixture {
    pub temp_dir: TempDir,
    pub root_path: PathBuf,
}

impl TestFixture {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root_path = temp_dir.path().to_path_buf();

        Self {
            temp_dir,
            root_path,
        }
    }

    /// Path of the settings file inside the fixture
    pub fn settings_path(&self) -> PathBuf {
        self.root_path.join(SETTINGS_FILE_NAME)
    }

    pub fn store(&self) -> SettingsStore {
        SettingsStore::new(self.settings_path())
    }

    /// Write raw settings JSON, bypassing the store
    pub fn write_settings_json(&self, json: &str) -> PathBuf {
        let path = self.settings_path();
        fs::write(&path, json).expect("Failed to write settings file");
        path
    }

    pub fn read_settings_json(&self) -> Result<String, std::io::Error> {
        fs::read_to_string(self.settings_path())
    }

    /// Create a text file with given content
    pub fn create_text_file<P: AsRef<Path>>(&self, relative_path: P, content: &str) -> PathBuf {
        let file_path = self.root_path.join(relative_path);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        fs::write(&file_path, content).expect("Failed to write test file");
        file_path
    }
}

/// Settings holding one mode built from `rules` and made current
pub fn settings_with(rules: RuleSet) -> Settings {
    let mut settings = Settings::default();
    let name = rules.name.clone();
    if name != swapmark::DEFAULT_MODE {
        settings.add_mode(&name).expect("Failed to add mode");
    }
    let target = settings.current_mut();
    target.match_case = rules.match_case;
    target.whole_word = rules.whole_word;
    target.set_pairs(rules.pairs);
    settings
}

/// Compare two strings line by line, providing detailed diff on mismatch
pub fn assert_golden_text(actual: &str, expected: &str, context: &str) {
    let actual_lines: Vec<&str> = actual.lines().collect();
    let expected_lines: Vec<&str> = expected.lines().collect();

    if actual_lines.len() != expected_lines.len() {
        panic!(
            "{}: Line count mismatch. Expected {} lines, got {} lines\nActual:\n{}",
            context,
            expected_lines.len(),
            actual_lines.len(),
            actual
        );
    }

    for (i, (actual_line, expected_line)) in actual_lines.iter().zip(expected_lines.iter()).enumerate() {
        if actual_line != expected_line {
            panic!(
                "{}: Line {} mismatch\nExpected: {}\nActual:   {}",
                context,
                i + 1,
                expected_line,
                actual_line
            );
        }
    }
}
