use env_logger::Env;

/// 初始化 logger
///
/// 預設只顯示警告與錯誤，`verbose` 時顯示每個檔案的處理訊息；
/// `RUST_LOG` 優先於兩者。
pub fn init(verbose: bool) {
    let default_filter = if verbose { "info" } else { "warn" };

    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .format_target(false)
        .init();
}
