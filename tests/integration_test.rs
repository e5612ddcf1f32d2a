//! 端對端整合測試
//!
//! 在暫存資料夾建立相機檔案，驗證 LRV 搬移的完整流程

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use anyhow::Result;
use goproxy::component::proxy_cache_mover::{
    AutoApprove, ConfirmMove, MoverOptions, Outcome, ProxyCacheMover, ProxyRelocator,
    RelocationSummary,
};
use goproxy::config::{Config, HashAlgorithm, UserSettings};
use goproxy::tools::calculate_fingerprint;
use tempfile::TempDir;

/// 依序回答的確認器，並記錄被詢問的路徑
struct ScriptedPrompt {
    answers: Vec<bool>,
    asked: Vec<(PathBuf, PathBuf)>,
}

impl ScriptedPrompt {
    fn new(answers: &[bool]) -> Self {
        Self {
            answers: answers.iter().rev().copied().collect(),
            asked: Vec::new(),
        }
    }
}

impl ConfirmMove for ScriptedPrompt {
    fn confirm(&mut self, source: &Path, destination: &Path) -> Result<bool> {
        self.asked
            .push((source.to_path_buf(), destination.to_path_buf()));
        Ok(self.answers.pop().unwrap_or(false))
    }
}

fn run_auto(paths: &[PathBuf]) -> RelocationSummary {
    let mut relocator = ProxyRelocator::new(
        UserSettings::default(),
        AutoApprove,
        Arc::new(AtomicBool::new(false)),
    );
    relocator.process_all(paths)
}

/// 資料夾內所有檔案的相對路徑
fn snapshot(root: &Path) -> BTreeSet<PathBuf> {
    let mut files = BTreeSet::new();
    let mut pending = vec![root.to_path_buf()];
    while let Some(dir) = pending.pop() {
        for entry in fs::read_dir(&dir).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                pending.push(path);
            } else {
                files.insert(path.strip_prefix(root).unwrap().to_path_buf());
            }
        }
    }
    files
}

fn count_outcomes(summary: &RelocationSummary, predicate: impl Fn(&Outcome) -> bool) -> usize {
    summary
        .reports
        .iter()
        .filter(|report| predicate(&report.outcome))
        .count()
}

fn md5_of(path: &Path) -> String {
    calculate_fingerprint(path, HashAlgorithm::Md5, 2_000_000).unwrap()
}

#[test]
fn test_moves_lrv_into_proxy_cache() {
    let temp_dir = TempDir::new().unwrap();
    let base_path = temp_dir.path();
    fs::write(base_path.join("GH010001.mp4"), "main recording").unwrap();
    fs::write(base_path.join("GL010001.lrv"), "proxy recording").unwrap();
    let hash = md5_of(&base_path.join("GL010001.lrv"));

    let summary = run_auto(&[base_path.to_path_buf()]);

    assert_eq!(summary.moved(), 1);
    assert_eq!(summary.skipped(), 0);
    assert!(!summary.has_failures());

    let cached = base_path.join("cachefiles/proxy").join(format!("{hash}.mov"));
    assert_eq!(fs::read_to_string(cached).unwrap(), "proxy recording");
    assert!(!base_path.join("GL010001.lrv").exists());
    assert_eq!(
        fs::read_to_string(base_path.join("GH010001.mp4")).unwrap(),
        "main recording"
    );
}

#[test]
fn test_main_without_lrv_reports_no_counterpart() {
    let temp_dir = TempDir::new().unwrap();
    let base_path = temp_dir.path();
    fs::write(base_path.join("GH010001.mp4"), "main recording").unwrap();
    let before = snapshot(base_path);

    let summary = run_auto(&[base_path.to_path_buf()]);

    assert_eq!(summary.no_counterpart(), 1);
    assert_eq!(summary.moved(), 0);
    assert!(matches!(summary.reports[0].outcome, Outcome::NoCounterpart));
    assert_eq!(snapshot(base_path), before);
}

#[test]
fn test_lrv_without_main_is_skipped() {
    let temp_dir = TempDir::new().unwrap();
    let base_path = temp_dir.path();
    fs::write(base_path.join("GL010001.lrv"), "proxy recording").unwrap();
    let before = snapshot(base_path);

    let summary = run_auto(&[base_path.to_path_buf()]);

    assert_eq!(summary.reports.len(), 1);
    assert!(matches!(summary.reports[0].outcome, Outcome::NotMainFile));
    assert_eq!(snapshot(base_path), before);
}

#[test]
fn test_unrecognized_filename_is_skipped() {
    let temp_dir = TempDir::new().unwrap();
    let base_path = temp_dir.path();
    let random = base_path.join("randomvideo.mp4");
    fs::write(&random, "not a camera file").unwrap();
    fs::write(base_path.join("GL010001.lrv"), "proxy recording").unwrap();
    let before = snapshot(base_path);

    let summary = run_auto(&[random]);

    assert_eq!(summary.reports.len(), 1);
    assert!(matches!(summary.reports[0].outcome, Outcome::Unrecognized));
    assert_eq!(snapshot(base_path), before);
}

#[test]
fn test_declined_prompt_leaves_files_in_place() {
    let temp_dir = TempDir::new().unwrap();
    let base_path = temp_dir.path();
    fs::write(base_path.join("GH010001.MP4"), "main recording").unwrap();
    fs::write(base_path.join("GL010001.LRV"), "proxy recording").unwrap();
    let before = snapshot(base_path);

    let mut prompt = ScriptedPrompt::new(&[false]);
    let mut relocator = ProxyRelocator::new(
        UserSettings::default(),
        &mut prompt,
        Arc::new(AtomicBool::new(false)),
    );
    let summary = relocator.process_all(&[base_path.join("GH010001.MP4")]);
    drop(relocator);

    assert_eq!(summary.declined(), 1);
    assert_eq!(snapshot(base_path), before);

    assert_eq!(prompt.asked.len(), 1);
    let (source, destination) = &prompt.asked[0];
    assert_eq!(source.file_name().unwrap(), "GL010001.LRV");
    assert!(destination.ends_with(format!(
        "cachefiles/proxy/{}.mov",
        md5_of(&base_path.join("GL010001.LRV"))
    )));
}

#[test]
fn test_each_file_confirmed_separately() {
    let temp_dir = TempDir::new().unwrap();
    let base_path = temp_dir.path();
    fs::write(base_path.join("GH010001.MP4"), "chapter one").unwrap();
    fs::write(base_path.join("GL010001.LRV"), "proxy one").unwrap();
    fs::write(base_path.join("GH020001.MP4"), "chapter two").unwrap();
    fs::write(base_path.join("GL020001.LRV"), "proxy two").unwrap();

    let mut prompt = ScriptedPrompt::new(&[true, false]);
    let mut relocator = ProxyRelocator::new(
        UserSettings::default(),
        &mut prompt,
        Arc::new(AtomicBool::new(false)),
    );
    let summary = relocator.process_all(&[
        base_path.join("GH010001.MP4"),
        base_path.join("GH020001.MP4"),
    ]);

    assert_eq!(summary.moved(), 1);
    assert_eq!(summary.declined(), 1);
    assert!(!base_path.join("GL010001.LRV").exists());
    assert!(base_path.join("GL020001.LRV").exists());
}

#[test]
fn test_all_grammars_in_one_directory() {
    let temp_dir = TempDir::new().unwrap();
    let base_path = temp_dir.path();
    fs::write(base_path.join("GX010002.MP4"), "main a").unwrap();
    fs::write(base_path.join("GL_0002_01.LRV"), "proxy a").unwrap();
    fs::write(base_path.join("0003-01_GH.mp4"), "main b").unwrap();
    fs::write(base_path.join("0003-01_GL.lrv"), "proxy b").unwrap();
    fs::write(base_path.join("notes.txt"), "unrelated").unwrap();

    let summary = run_auto(&[base_path.to_path_buf()]);

    assert_eq!(summary.reports.len(), 5);
    assert_eq!(summary.moved(), 2);
    // 不論列舉順序，兩個 LRV 都是 NotMainFile，notes.txt 為 Unrecognized
    assert_eq!(summary.skipped(), 3);
    assert_eq!(count_outcomes(&summary, |o| matches!(o, Outcome::NotMainFile)), 2);
    assert_eq!(count_outcomes(&summary, |o| matches!(o, Outcome::Unrecognized)), 1);

    let cached = snapshot(&base_path.join("cachefiles/proxy"));
    assert_eq!(cached.len(), 2);
}

#[test]
fn test_multiple_directories_are_independent() {
    let temp_dir = TempDir::new().unwrap();
    let first = temp_dir.path().join("100GOPRO");
    let second = temp_dir.path().join("101GOPRO");
    fs::create_dir_all(&first).unwrap();
    fs::create_dir_all(&second).unwrap();

    fs::write(first.join("GH010001.MP4"), "main").unwrap();
    fs::write(first.join("GL010001.LRV"), "first proxy").unwrap();
    // 相同編號但位於另一個資料夾，沒有 LRV
    fs::write(second.join("GH010001.MP4"), "main").unwrap();

    let summary = run_auto(&[first.clone(), second.clone()]);

    assert_eq!(summary.moved(), 1);
    assert_eq!(summary.no_counterpart(), 1);
    assert!(first.join("cachefiles/proxy").is_dir());
    assert!(!second.join("cachefiles").exists());
}

#[test]
fn test_missing_path_is_reported_and_others_continue() {
    let temp_dir = TempDir::new().unwrap();
    let base_path = temp_dir.path();
    fs::write(base_path.join("GH010001.MP4"), "main").unwrap();
    fs::write(base_path.join("GL010001.LRV"), "proxy").unwrap();

    let config = Config::default();
    let mover = ProxyCacheMover::new(
        config,
        MoverOptions::default(),
        Arc::new(AtomicBool::new(false)),
    );
    let summary = mover.run_with(
        &[base_path.join("does-not-exist"), base_path.to_path_buf()],
        AutoApprove,
    );

    assert_eq!(summary.failed(), 1);
    assert_eq!(summary.moved(), 1);
    let failures: Vec<_> = summary.failures().collect();
    assert!(failures[0].0.ends_with("does-not-exist"));
}

#[test]
fn test_explicit_lrv_path_after_its_move_is_skipped() {
    // 例如 `goproxy 100GOPRO/*` 展開後 LRV 排在主要影片之後
    let temp_dir = TempDir::new().unwrap();
    let base_path = temp_dir.path();
    let main = base_path.join("GH010001.MP4");
    let lrv = base_path.join("GL010001.LRV");
    fs::write(&main, "main").unwrap();
    fs::write(&lrv, "proxy").unwrap();

    let summary = run_auto(&[main, lrv.clone()]);

    assert_eq!(summary.moved(), 1);
    assert_eq!(summary.failed(), 0);
    assert!(!summary.has_failures());
    assert!(!lrv.exists());

    let last = summary.reports.last().unwrap();
    assert_eq!(last.path, lrv);
    assert!(matches!(last.outcome, Outcome::NotMainFile));
}

#[test]
fn test_never_existing_lrv_path_still_fails() {
    let temp_dir = TempDir::new().unwrap();
    let summary = run_auto(&[temp_dir.path().join("GL090009.LRV")]);

    assert_eq!(summary.failed(), 1);
}
