use anyhow::Result;
use clap::Parser;
use console::style;
use goproxy::component::ProxyCacheMover;
use goproxy::component::proxy_cache_mover::MoverOptions;
use goproxy::config::Config;
use goproxy::init;
use goproxy::signal::setup_shutdown_signal;
use log::warn;
use std::path::PathBuf;
use std::process::ExitCode;

/// Move GoPro LRV proxy files into a content-addressed `cachefiles/proxy` directory
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Print a line for every processed or skipped file
    #[arg(short, long)]
    verbose: bool,

    /// Move without asking for confirmation
    #[arg(short, long)]
    yes: bool,

    /// Settings file (defaults to ./goproxy.json when present)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Video files or directories containing them
    paths: Vec<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init::init(cli.verbose);

    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            warn!("Program error: {e:#}");
            eprintln!("{} {e:#}", style("錯誤:").red().bold());
            ExitCode::FAILURE
        }
    }
}

/// 回傳是否所有路徑都處理成功
fn run(cli: &Cli) -> Result<bool> {
    let config = Config::load(cli.config.as_deref())?;
    let shutdown_signal = setup_shutdown_signal()?;

    let options = MoverOptions {
        verbose: cli.verbose,
        assume_yes: cli.yes,
    };
    let mover = ProxyCacheMover::new(config, options, shutdown_signal);
    let summary = mover.run(&cli.paths);

    Ok(!summary.has_failures())
}
