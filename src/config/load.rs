use crate::config::types::{Config, DEFAULT_SETTINGS_FILE, UserSettings};
use anyhow::{Context, Result, bail};
use log::debug;
use std::fs;
use std::path::{Component, Path};

impl Config {
    /// 載入設定
    ///
    /// 指定路徑時該檔案必須存在；未指定時讀取目前目錄下的 `goproxy.json`，
    /// 不存在則使用預設值。
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let settings = match path {
            Some(path) => Self::load_settings(path)?,
            None => {
                let path = Path::new(DEFAULT_SETTINGS_FILE);
                if path.exists() {
                    Self::load_settings(path)?
                } else {
                    debug!("No {DEFAULT_SETTINGS_FILE} found, using default settings");
                    UserSettings::default()
                }
            }
        };

        settings.validate()?;
        Ok(Self { settings })
    }

    fn load_settings(path: &Path) -> Result<UserSettings> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;

        if content.trim().is_empty() {
            return Ok(UserSettings::default());
        }

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse settings from {}", path.display()))
    }
}

impl UserSettings {
    pub fn validate(&self) -> Result<()> {
        if self.partial_hash_threshold < 2 {
            bail!(
                "partial_hash_threshold 必須至少為 2，目前為 {}",
                self.partial_hash_threshold
            );
        }
        if self.proxy_extension.is_empty() || self.proxy_extension.contains(['/', '\\', '.']) {
            bail!("proxy_extension 不合法: {:?}", self.proxy_extension);
        }
        if self.cache_subdir.as_os_str().is_empty()
            || !self
                .cache_subdir
                .components()
                .all(|c| matches!(c, Component::Normal(_)))
        {
            bail!(
                "cache_subdir 必須是相對路徑: {}",
                self.cache_subdir.display()
            );
        }
        Ok(())
    }
}
