use env_logger::{Builder, Env};

/// 初始化日誌；預設只輸出警告以上，可用 RUST_LOG 覆寫
pub fn init() {
    let _ = Builder::from_env(Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .format_target(false)
        .try_init();
}
