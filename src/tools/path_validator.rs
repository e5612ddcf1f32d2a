use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// 解析為絕對路徑（展開符號連結），路徑不存在時回傳錯誤
pub fn resolve_existing_path(path: &Path) -> Result<PathBuf> {
    fs::canonicalize(path).with_context(|| format!("路徑不存在或無法存取: {}", path.display()))
}

pub fn ensure_directory_exists(path: &Path) -> Result<()> {
    if !path.is_dir() {
        fs::create_dir_all(path).with_context(|| format!("無法建立目錄: {}", path.display()))?;
    }
    Ok(())
}
