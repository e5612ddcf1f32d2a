//! LRV 預覽檔快取搬移元件
//!
//! 依命令列參數建立確認方式，執行搬移並輸出摘要

use super::confirm::{AutoApprove, ConfirmMove, TerminalPrompt};
use super::relocator::{ProxyRelocator, RelocationSummary};
use crate::config::Config;
use console::style;
use log::info;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

/// 執行選項
#[derive(Debug, Clone, Copy, Default)]
pub struct MoverOptions {
    /// 顯示每個檔案的處理訊息與摘要
    pub verbose: bool,
    /// 不詢問，直接移動
    pub assume_yes: bool,
}

pub struct ProxyCacheMover {
    config: Config,
    options: MoverOptions,
    shutdown_signal: Arc<AtomicBool>,
}

impl ProxyCacheMover {
    pub const fn new(
        config: Config,
        options: MoverOptions,
        shutdown_signal: Arc<AtomicBool>,
    ) -> Self {
        Self {
            config,
            options,
            shutdown_signal,
        }
    }

    pub fn run(&self, paths: &[PathBuf]) -> RelocationSummary {
        let confirm: Box<dyn ConfirmMove> = if self.options.assume_yes {
            Box::new(AutoApprove)
        } else {
            Box::new(TerminalPrompt::default())
        };

        self.run_with(paths, confirm)
    }

    /// 使用指定的確認方式執行
    pub fn run_with<C: ConfirmMove>(&self, paths: &[PathBuf], confirm: C) -> RelocationSummary {
        info!("Processing {} path(s)", paths.len());

        let mut relocator = ProxyRelocator::new(
            self.config.settings.clone(),
            confirm,
            Arc::clone(&self.shutdown_signal),
        );
        let summary = relocator.process_all(paths);

        if self.options.verbose {
            self.print_summary(&summary);
        } else if summary.has_failures() {
            eprintln!(
                "{} {} 個路徑處理失敗",
                style("錯誤:").red().bold(),
                summary.failed()
            );
        }

        summary
    }

    fn print_summary(&self, summary: &RelocationSummary) {
        println!();
        println!("{}", style("=== 處理結果 ===").cyan().bold());
        println!("  總檔案數: {}", summary.reports.len());
        println!("  已移動: {} 個", style(summary.moved()).green());
        println!("  沒有 LRV: {} 個", summary.no_counterpart());
        println!("  已跳過: {} 個", style(summary.skipped()).dim());

        if summary.declined() > 0 {
            println!("  使用者拒絕: {} 個", style(summary.declined()).yellow());
        }

        if summary.has_failures() {
            println!("  失敗: {} 個", style(summary.failed()).red());
        }

        if summary.interrupted {
            println!("{}", style("已中斷，剩餘檔案未處理").yellow());
        }
    }
}
