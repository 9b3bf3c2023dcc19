use crate::hotkey::{parse_hotkey, Hotkey, DEFAULT_HOTKEY};
use crate::prompts::Prompt;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Value written to a fresh settings file until the user enters a real key.
pub const PLACEHOLDER_API_KEY: &str = "YOUR_OPENROUTER_API_KEY_HERE";

/// Environment variable overriding the settings file location.
pub const SETTINGS_PATH_ENV: &str = "QUICK_REWRITER_SETTINGS";

const SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Settings {
    #[serde(default = "default_api_key")]
    pub api_key: String,
    /// Saved prompts in the order the user created them.
    #[serde(default)]
    pub prompts: Vec<Prompt>,
    /// Global chord that opens the popup, e.g. `Ctrl+Shift+Q`.
    #[serde(default = "default_hotkey")]
    pub hotkey: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    /// Time given to the focused application to update the clipboard after
    /// the synthetic copy.
    #[serde(default = "default_copy_delay")]
    pub copy_delay_ms: u64,
    /// Time given to the popup to hide and focus to return before pasting.
    #[serde(default = "default_paste_delay")]
    pub paste_delay_ms: u64,
    /// When enabled the application initialises the logger at debug level.
    #[serde(default)]
    pub debug_logging: bool,
    /// Optional file receiving a copy of the log output.
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

fn default_api_key() -> String {
    PLACEHOLDER_API_KEY.into()
}

fn default_hotkey() -> String {
    DEFAULT_HOTKEY.into()
}

fn default_model() -> String {
    "google/gemini-2.5-flash-preview-09-2025".into()
}

fn default_api_url() -> String {
    "https://openrouter.ai/api/v1/chat/completions".into()
}

fn default_request_timeout() -> u64 {
    60
}

fn default_copy_delay() -> u64 {
    120
}

fn default_paste_delay() -> u64 {
    250
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: default_api_key(),
            prompts: Vec::new(),
            hotkey: default_hotkey(),
            model: default_model(),
            api_url: default_api_url(),
            request_timeout_secs: default_request_timeout(),
            copy_delay_ms: default_copy_delay(),
            paste_delay_ms: default_paste_delay(),
            debug_logging: false,
            log_file: None,
        }
    }
}

/// Location of the settings file: next to the executable unless
/// [`SETTINGS_PATH_ENV`] points elsewhere.
pub fn default_path() -> PathBuf {
    if let Some(path) = std::env::var_os(SETTINGS_PATH_ENV) {
        return PathBuf::from(path);
    }
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
        .join(SETTINGS_FILE)
}

impl Settings {
    /// Load settings from `path`.
    ///
    /// A missing or unparsable file is replaced with defaults, which are
    /// written back so the user has something to edit.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("no settings at {}; creating defaults", path.display());
                return Self::regenerate(path);
            }
            Err(e) => {
                tracing::warn!("failed to read {}: {e}; regenerating defaults", path.display());
                return Self::regenerate(path);
            }
        };
        match serde_json::from_str(&content) {
            Ok(settings) => Ok(settings),
            Err(e) => {
                tracing::warn!("corrupt settings in {}: {e}; regenerating defaults", path.display());
                Self::regenerate(path)
            }
        }
    }

    fn regenerate(path: &Path) -> anyhow::Result<Self> {
        let settings = Self::default();
        if let Err(e) = settings.save(path) {
            tracing::warn!("could not write default settings to {}: {e:#}", path.display());
        }
        Ok(settings)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).with_context(|| format!("write {}", path.display()))?;
        Ok(())
    }

    /// Whether a usable API key has been configured.
    pub fn has_api_key(&self) -> bool {
        let key = self.api_key.trim();
        !key.is_empty() && key != PLACEHOLDER_API_KEY
    }

    pub fn hotkey(&self) -> Hotkey {
        match parse_hotkey(&self.hotkey) {
            Some(k) => k,
            None => {
                tracing::warn!(
                    "provided hotkey string '{}' is invalid; using default {}",
                    self.hotkey,
                    DEFAULT_HOTKEY
                );
                Hotkey::default()
            }
        }
    }

    pub fn add_prompt(&mut self, prompt: Prompt) {
        self.prompts.push(prompt.normalized());
    }

    /// Replace the prompt at `index`. Returns `false` when out of range.
    pub fn update_prompt(&mut self, index: usize, prompt: Prompt) -> bool {
        match self.prompts.get_mut(index) {
            Some(slot) => {
                *slot = prompt.normalized();
                true
            }
            None => false,
        }
    }

    /// Remove the prompt at `index`. Returns `false` when out of range.
    pub fn remove_prompt(&mut self, index: usize) -> bool {
        if index < self.prompts.len() {
            self.prompts.remove(index);
            true
        } else {
            false
        }
    }
}
