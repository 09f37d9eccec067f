use anyhow::{Context, Result};
use log::warn;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// 安裝 Ctrl-C 處理器；第一次中斷停止發出新的讀取，第二次直接結束
pub fn setup_shutdown_signal() -> Result<Arc<AtomicBool>> {
    let shutdown_signal = Arc::new(AtomicBool::new(false));
    let signal_clone = Arc::clone(&shutdown_signal);

    ctrlc::set_handler(move || {
        if signal_clone.swap(true, Ordering::SeqCst) {
            std::process::exit(130);
        }
        warn!("Interrupted, printing completed reports");
    })
    .context("Failed to install Ctrl-C handler")?;

    Ok(shutdown_signal)
}
