//! 報告產生器
//!
//! 為每個序列讀取代表檔案的影像資訊，並與序列的影格範圍合併成報告

use super::media_info::{FormatIntrospector, Layer, MediaInfo, Speed};
use crate::component::sequence::Sequence;
use crate::error::InfoError;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};
use rayon::prelude::*;
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// 超過此數量的序列才顯示進度條
const PROGRESS_THRESHOLD: usize = 32;

/// 一個序列的最終報告
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    /// 顯示名稱（序列以 `#` 表示位數）
    pub display_name: String,
    /// 代表檔案路徑
    pub path: String,
    /// 影格清單，bare 檔案為 `None`
    pub frames: Option<String>,
    pub layers: Vec<Layer>,
    pub start: Option<i64>,
    pub end: Option<i64>,
    pub speed: Option<Speed>,
    pub tags: Vec<(String, String)>,
    pub failed: bool,
    /// 讀取失敗的原因
    pub error: Option<String>,
}

impl Report {
    /// 讀取失敗時的替代報告
    #[must_use]
    pub fn failed(sequence: &Sequence, cause: impl Into<String>) -> Self {
        Self {
            display_name: sequence.display_name(),
            path: sequence.representative_path.clone(),
            frames: frame_list(sequence),
            layers: Vec::new(),
            start: sequence.start(),
            end: sequence.end(),
            speed: None,
            tags: Vec::new(),
            failed: true,
            error: Some(cause.into()),
        }
    }

    /// 影格數（含頭尾），溢位時為 `None`
    #[must_use]
    pub fn duration(&self) -> Option<i64> {
        let (start, end) = (self.start?, self.end?);
        end.checked_sub(start)?.checked_add(1)
    }
}

fn frame_list(sequence: &Sequence) -> Option<String> {
    (!sequence.is_bare).then(|| sequence.frame_list())
}

pub struct ReportBuilder<'a> {
    introspector: &'a dyn FormatIntrospector,
    shutdown_signal: Arc<AtomicBool>,
    show_progress: bool,
}

impl<'a> ReportBuilder<'a> {
    #[must_use]
    pub fn new(
        introspector: &'a dyn FormatIntrospector,
        shutdown_signal: Arc<AtomicBool>,
    ) -> Self {
        Self {
            introspector,
            shutdown_signal,
            show_progress: false,
        }
    }

    /// 大量序列時於 stderr 顯示進度條
    #[must_use]
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// 合併序列與影像資訊
    ///
    /// 磁碟上的影格優先於檔案內嵌的影格範圍；bare 檔案直接使用內嵌範圍。
    #[must_use]
    pub fn build(sequence: &Sequence, info: MediaInfo) -> Report {
        let (start, end) = if sequence.is_bare {
            match info.frame_range {
                Some((a, b)) => (Some(a.min(b)), Some(a.max(b))),
                None => (None, None),
            }
        } else {
            (sequence.start(), sequence.end())
        };

        Report {
            display_name: sequence.display_name(),
            path: sequence.representative_path.clone(),
            frames: frame_list(sequence),
            layers: info.layers,
            start,
            end,
            speed: info.speed,
            tags: info.tags,
            failed: false,
            error: None,
        }
    }

    /// 讀取單一序列並產生報告，失敗時回傳替代報告
    pub fn build_one(&self, sequence: &Sequence) -> Report {
        let path = sequence.path();
        debug!("Introspecting {}", path.display());

        let result = self.introspector.introspect(path).and_then(|info| {
            if info.layers.is_empty() {
                anyhow::bail!("no image layers");
            }
            Ok(info)
        });

        match result {
            Ok(info) => Self::build(sequence, info),
            Err(e) => {
                warn!("{}", InfoError::unreadable(path, &e));
                Report::failed(sequence, format!("{e:#}"))
            }
        }
    }

    /// 平行讀取所有序列，輸出順序與輸入相同
    ///
    /// 收到中斷訊號後不再發出新的讀取，只回傳已完成的報告。
    pub fn build_all(&self, sequences: &[Sequence]) -> Vec<Report> {
        let progress_bar = self.progress_bar(sequences.len());

        let slots: Vec<Option<Report>> = sequences
            .par_iter()
            .map(|sequence| {
                if self.shutdown_signal.load(Ordering::SeqCst) {
                    return None;
                }
                let report = self.build_one(sequence);
                progress_bar.inc(1);
                Some(report)
            })
            .collect();

        progress_bar.finish_and_clear();

        let reports: Vec<Report> = slots.into_iter().flatten().collect();
        if reports.len() < sequences.len() {
            info!(
                "Interrupted, {} of {} sequences completed",
                reports.len(),
                sequences.len()
            );
        }
        reports
    }

    fn progress_bar(&self, len: usize) -> ProgressBar {
        if !self.show_progress || len < PROGRESS_THRESHOLD {
            return ProgressBar::hidden();
        }

        let progress_bar = ProgressBar::new(len as u64);
        if let Ok(style) = ProgressStyle::default_bar().template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}",
        ) {
            progress_bar.set_style(style.progress_chars("#>-"));
        }
        progress_bar
    }
}
