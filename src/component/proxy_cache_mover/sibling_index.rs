//! 同資料夾檔案索引
//!
//! 以資料夾為單位建立 (副檔名, 標頭, 編號, 章節) 到檔案路徑的對照表，
//! 第一次查詢時建立，之後在同一次執行中重複使用

use crate::tools::{CameraFileKey, match_camera_path, resolve_existing_path};
use anyhow::{Context, Result};
use log::{debug, warn};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

type DirectoryIndex = HashMap<CameraFileKey, PathBuf>;

/// 每個資料夾的相機檔案索引快取
///
/// 快取以解析後的資料夾路徑為鍵，執行期間不會失效。
#[derive(Debug, Default)]
pub struct SiblingIndex {
    directories: HashMap<PathBuf, DirectoryIndex>,
}

impl SiblingIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// 在 `directory` 中查詢 `key` 對應的檔案
    pub fn lookup(&mut self, directory: &Path, key: &CameraFileKey) -> Result<Option<PathBuf>> {
        let directory = resolve_existing_path(directory)?;

        if !self.directories.contains_key(&directory) {
            let index = Self::build_index(&directory)?;
            self.directories.insert(directory.clone(), index);
        }

        Ok(self
            .directories
            .get(&directory)
            .and_then(|index| index.get(key))
            .cloned())
    }

    /// 已建立索引的資料夾數量
    #[must_use]
    pub fn cached_directories(&self) -> usize {
        self.directories.len()
    }

    fn build_index(directory: &Path) -> Result<DirectoryIndex> {
        debug!("Indexing camera files in {}", directory.display());

        let entries = fs::read_dir(directory)
            .with_context(|| format!("無法讀取目錄: {}", directory.display()))?;

        let mut index = DirectoryIndex::new();

        for entry in entries {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    warn!("讀取目錄項目失敗 {}: {e}", directory.display());
                    continue;
                }
            };

            let path = entry.path();
            let Some(camera_file) = match_camera_path(&path) else {
                continue;
            };

            // 同鍵值時後者覆蓋前者
            if let Some(previous) = index.insert(camera_file.key(), path) {
                debug!("Duplicate camera file key, replacing {}", previous.display());
            }
        }

        debug!(
            "Indexed {} camera files in {}",
            index.len(),
            directory.display()
        );

        Ok(index)
    }
}
