//! 預覽檔搬移流程
//!
//! 對每個輸入路徑：展開資料夾、辨識檔名、為主要影片找出 LRV 預覽檔、
//! 計算指紋並移動到快取目錄

use super::confirm::ConfirmMove;
use super::sibling_index::SiblingIndex;
use crate::config::{FingerprintSource, UserSettings};
use crate::tools::{
    calculate_fingerprint, ensure_directory_exists, match_camera_path, resolve_existing_path,
};
use anyhow::{Context, Result};
use log::{debug, error, info, warn};
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// 單次移動計畫
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelocationPlan {
    pub source: PathBuf,
    pub destination: PathBuf,
}

impl RelocationPlan {
    /// 建立目標資料夾並移動檔案，目標已存在時覆蓋
    pub fn execute(&self) -> Result<()> {
        if let Some(parent) = self.destination.parent() {
            ensure_directory_exists(parent)?;
        }

        match fs::rename(&self.source, &self.destination) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
                debug!(
                    "rename across devices, copying {} instead",
                    self.source.display()
                );
                self.copy_and_delete()
            }
            Err(e) => Err(e).with_context(|| {
                format!(
                    "移動檔案失敗: {} -> {}",
                    self.source.display(),
                    self.destination.display()
                )
            }),
        }
    }

    fn copy_and_delete(&self) -> Result<()> {
        fs::copy(&self.source, &self.destination).with_context(|| {
            format!(
                "複製檔案失敗: {} -> {}",
                self.source.display(),
                self.destination.display()
            )
        })?;

        fs::remove_file(&self.source)
            .with_context(|| format!("刪除原檔案失敗: {}", self.source.display()))?;

        Ok(())
    }
}

/// 單一檔案的處理結果
#[derive(Debug)]
pub enum Outcome {
    /// 檔名不符合任何相機命名規則
    Unrecognized,
    /// 可辨識但不是主要影片（例如 LRV 本身）
    NotMainFile,
    /// 主要影片沒有對應的 LRV
    NoCounterpart,
    Declined(RelocationPlan),
    Moved(RelocationPlan),
    Failed(anyhow::Error),
}

impl Outcome {
    #[must_use]
    pub const fn is_skip(&self) -> bool {
        matches!(self, Self::Unrecognized | Self::NotMainFile)
    }
}

#[derive(Debug)]
pub struct FileReport {
    pub path: PathBuf,
    pub outcome: Outcome,
}

/// 整次執行的結果
#[derive(Debug, Default)]
pub struct RelocationSummary {
    pub reports: Vec<FileReport>,
    /// 是否因中斷訊號提前結束
    pub interrupted: bool,
}

impl RelocationSummary {
    fn record(&mut self, path: PathBuf, outcome: Outcome) {
        self.reports.push(FileReport { path, outcome });
    }

    fn count(&self, predicate: impl Fn(&Outcome) -> bool) -> usize {
        self.reports.iter().filter(|r| predicate(&r.outcome)).count()
    }

    #[must_use]
    pub fn moved(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Moved(_)))
    }

    #[must_use]
    pub fn declined(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Declined(_)))
    }

    #[must_use]
    pub fn no_counterpart(&self) -> usize {
        self.count(|o| matches!(o, Outcome::NoCounterpart))
    }

    #[must_use]
    pub fn skipped(&self) -> usize {
        self.count(Outcome::is_skip)
    }

    #[must_use]
    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Failed(_)))
    }

    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.failed() > 0
    }

    pub fn failures(&self) -> impl Iterator<Item = (&Path, &anyhow::Error)> {
        self.reports.iter().filter_map(|r| match &r.outcome {
            Outcome::Failed(e) => Some((r.path.as_path(), e)),
            _ => None,
        })
    }
}

/// 依序處理輸入路徑，將 LRV 移動到內容定址的快取目錄
pub struct ProxyRelocator<C: ConfirmMove> {
    settings: UserSettings,
    index: SiblingIndex,
    confirm: C,
    shutdown_signal: Arc<AtomicBool>,
    /// 本次執行已移走的 LRV（解析後路徑）
    moved_sources: HashSet<PathBuf>,
}

impl<C: ConfirmMove> ProxyRelocator<C> {
    pub fn new(settings: UserSettings, confirm: C, shutdown_signal: Arc<AtomicBool>) -> Self {
        Self {
            settings,
            index: SiblingIndex::new(),
            confirm,
            shutdown_signal,
            moved_sources: HashSet::new(),
        }
    }

    pub fn process_all(&mut self, paths: &[PathBuf]) -> RelocationSummary {
        let mut summary = RelocationSummary::default();

        for path in paths {
            if self.is_interrupted() {
                summary.interrupted = true;
                break;
            }
            self.process_path(path, &mut summary);
        }

        if self.is_interrupted() {
            summary.interrupted = true;
            warn!("收到中斷訊號，停止處理");
        }

        summary
    }

    /// 處理單一輸入路徑；資料夾只展開一層
    pub fn process_path(&mut self, path: &Path, summary: &mut RelocationSummary) {
        let resolved = match resolve_existing_path(path) {
            Ok(p) => p,
            Err(_) if self.was_moved(path) => {
                let outcome = self.process_file(path);
                summary.record(path.to_path_buf(), outcome);
                return;
            }
            Err(e) => {
                let outcome = Outcome::Failed(e);
                Self::log_outcome(path, &outcome);
                summary.record(path.to_path_buf(), outcome);
                return;
            }
        };

        if !resolved.is_dir() {
            let outcome = self.process_file(&resolved);
            summary.record(resolved, outcome);
            return;
        }

        let children = match Self::list_directory(&resolved) {
            Ok(children) => children,
            Err(e) => {
                let outcome = Outcome::Failed(e);
                Self::log_outcome(&resolved, &outcome);
                summary.record(resolved, outcome);
                return;
            }
        };

        for child in children {
            if self.is_interrupted() {
                break;
            }
            let outcome = self.process_file(&child);
            summary.record(child, outcome);
        }
    }

    /// 處理單一檔案並記錄結果
    pub fn process_file(&mut self, path: &Path) -> Outcome {
        let outcome = self.try_process_file(path).unwrap_or_else(Outcome::Failed);
        Self::log_outcome(path, &outcome);
        outcome
    }

    fn try_process_file(&mut self, path: &Path) -> Result<Outcome> {
        let Some(camera_file) = match_camera_path(path) else {
            return Ok(Outcome::Unrecognized);
        };

        if !camera_file.is_main() {
            return Ok(Outcome::NotMainFile);
        }

        if !path.is_file() {
            return Ok(Outcome::Unrecognized);
        }

        let directory = path
            .parent()
            .with_context(|| format!("無法取得上層目錄: {}", path.display()))?;

        let Some(lowres) = self.index.lookup(directory, &camera_file.lowres_key())? else {
            return Ok(Outcome::NoCounterpart);
        };

        info!(
            "Found LRV for {}: {}. Calculating hash ...",
            path.display(),
            lowres.display()
        );

        let fingerprint_target = match self.settings.fingerprint_source {
            FingerprintSource::Proxy => lowres.as_path(),
            FingerprintSource::Main => path,
        };
        let fingerprint = calculate_fingerprint(
            fingerprint_target,
            self.settings.hash_algorithm,
            self.settings.partial_hash_threshold,
        )?;
        debug!("Fingerprint of {}: {fingerprint}", fingerprint_target.display());

        let plan = RelocationPlan {
            destination: self.destination_for(directory, &fingerprint),
            source: lowres,
        };

        if !self.confirm.confirm(&plan.source, &plan.destination)? {
            return Ok(Outcome::Declined(plan));
        }

        plan.execute()?;
        self.moved_sources.insert(plan.source.clone());
        Ok(Outcome::Moved(plan))
    }

    /// `<directory>/cachefiles/proxy/<fingerprint>.mov`
    fn destination_for(&self, directory: &Path, fingerprint: &str) -> PathBuf {
        directory
            .join(&self.settings.cache_subdir)
            .join(format!("{fingerprint}.{}", self.settings.proxy_extension))
    }

    fn list_directory(directory: &Path) -> Result<Vec<PathBuf>> {
        let entries = fs::read_dir(directory)
            .with_context(|| format!("無法讀取目錄: {}", directory.display()))?;

        entries
            .map(|entry| {
                entry
                    .map(|e| e.path())
                    .with_context(|| format!("讀取目錄項目失敗: {}", directory.display()))
            })
            .collect()
    }

    /// 路徑是否指向本次執行中已移走的檔案
    fn was_moved(&self, path: &Path) -> bool {
        let Some(file_name) = path.file_name() else {
            return false;
        };
        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };

        fs::canonicalize(parent)
            .is_ok_and(|dir| self.moved_sources.contains(&dir.join(file_name)))
    }

    fn is_interrupted(&self) -> bool {
        self.shutdown_signal.load(Ordering::SeqCst)
    }

    fn log_outcome(path: &Path, outcome: &Outcome) {
        match outcome {
            Outcome::Unrecognized => {
                info!("Skipping not a camera video file {}", path.display());
            }
            Outcome::NotMainFile => {
                info!("Skipping not a main video file {}", path.display());
            }
            Outcome::NoCounterpart => info!("{} has no LRV file", path.display()),
            Outcome::Declined(plan) => {
                info!("Left {} in place", plan.source.display());
            }
            Outcome::Moved(plan) => info!(
                "Moved {} to {}",
                plan.source.display(),
                plan.destination.display()
            ),
            Outcome::Failed(e) => error!("處理失敗 {}: {e:#}", path.display()),
        }
    }
}
