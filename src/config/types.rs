use crate::tools::DEFAULT_PARTIAL_HASH_THRESHOLD;
use serde::Deserialize;
use std::path::PathBuf;

/// 預設設定檔名稱（位於目前工作目錄）
pub const DEFAULT_SETTINGS_FILE: &str = "goproxy.json";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    /// 128-bit MD5，與既有快取檔名相容
    #[default]
    Md5,
    Blake3,
}

/// 用來計算指紋的檔案
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FingerprintSource {
    /// 低解析度預覽檔本身
    #[default]
    Proxy,
    /// 對應的高解析度主要影片
    Main,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct UserSettings {
    /// 相對於主要影片所在資料夾的快取目錄
    pub cache_subdir: PathBuf,
    /// 移動後的副檔名
    pub proxy_extension: String,
    pub hash_algorithm: HashAlgorithm,
    pub partial_hash_threshold: u64,
    pub fingerprint_source: FingerprintSource,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            cache_subdir: PathBuf::from("cachefiles").join("proxy"),
            proxy_extension: "mov".to_string(),
            hash_algorithm: HashAlgorithm::default(),
            partial_hash_threshold: DEFAULT_PARTIAL_HASH_THRESHOLD,
            fingerprint_source: FingerprintSource::default(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub settings: UserSettings,
}
