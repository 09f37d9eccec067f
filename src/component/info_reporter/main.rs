use crate::component::formatter::{ColumnFormatter, FormatOptions};
use crate::component::report::{FormatIntrospector, Report, ReportBuilder};
use crate::component::sequence::SequenceAggregator;
use crate::config::InfoSettings;
use crate::error::{InfoError, Result as InfoResult};
use crate::tools::{InputBatch, expand_inputs};
use anyhow::{Context, Result};
use console::Term;
use log::{info, warn};
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// 一個批次的結構化結果（JSON 輸出使用）
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub directory: Option<String>,
    pub reports: Vec<Report>,
}

/// 執行結果統計
#[derive(Debug, Default)]
pub struct RunSummary {
    pub batches: usize,
    pub reports: usize,
    /// 讀取失敗的序列數
    pub failed: usize,
    /// 整批被拒絕的原因（例如重複輸入）
    pub rejected: Vec<String>,
    pub interrupted: bool,
}

impl RunSummary {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failed == 0 && self.rejected.is_empty() && !self.interrupted
    }
}

/// 影像資訊回報器
pub struct MediaInfoReporter<'a> {
    settings: InfoSettings,
    introspector: &'a dyn FormatIntrospector,
    shutdown_signal: Arc<AtomicBool>,
}

impl<'a> MediaInfoReporter<'a> {
    pub fn new(
        settings: InfoSettings,
        introspector: &'a dyn FormatIntrospector,
        shutdown_signal: Arc<AtomicBool>,
    ) -> Self {
        Self {
            settings,
            introspector,
            shutdown_signal,
        }
    }

    fn aggregator(&self) -> SequenceAggregator {
        SequenceAggregator::new(self.settings.frame_token, self.settings.sequence)
    }

    fn builder(&self) -> ReportBuilder<'a> {
        ReportBuilder::new(self.introspector, Arc::clone(&self.shutdown_signal))
            .with_progress(Term::stderr().is_term())
    }

    /// 處理一批檔名：聚合、讀取並合併為報告
    ///
    /// 重複的輸入會在任何讀取之前回傳錯誤。
    pub fn report_names<S: AsRef<str>>(&self, names: &[S]) -> InfoResult<Vec<Report>> {
        let sequences = self.aggregator().aggregate(names)?;
        Ok(self.builder().build_all(&sequences))
    }

    /// 處理一批檔名並排版為輸出行
    pub fn format_names<S: AsRef<str>>(
        &self,
        names: &[S],
        options: FormatOptions,
    ) -> InfoResult<(Vec<Report>, Vec<String>)> {
        let reports = self.report_names(names)?;
        let lines = ColumnFormatter::new(options).format(&reports);
        Ok((reports, lines))
    }

    /// 展開輸入並輸出所有批次的報告
    pub fn run<W: Write>(&self, inputs: &[PathBuf], json: bool, out: &mut W) -> Result<RunSummary> {
        let options = self.settings.format_options()?;
        let batches = expand_inputs(inputs, self.settings.recurse)?;
        let show_headers = batches.iter().any(|b| b.directory.is_some());
        info!("Processing {} input batches", batches.len());

        let mut summary = RunSummary::default();
        let mut structured = Vec::new();

        for batch in &batches {
            if self.shutdown_signal.load(Ordering::SeqCst) {
                summary.interrupted = true;
                break;
            }
            summary.batches += 1;

            let names = match batch_names(batch) {
                Ok(names) => names,
                Err(e) => {
                    warn!("Batch rejected: {e}");
                    summary.rejected.push(e.to_string());
                    continue;
                }
            };

            let (reports, lines) = match self.format_names(&names, options) {
                Ok(result) => result,
                Err(e) => {
                    warn!("Batch rejected: {e}");
                    summary.rejected.push(e.to_string());
                    continue;
                }
            };

            summary.reports += reports.len();
            summary.failed += reports.iter().filter(|r| r.failed).count();

            let directory = batch
                .directory
                .as_ref()
                .map(|d| d.display().to_string());
            if json {
                structured.push(BatchReport { directory, reports });
                continue;
            }

            if show_headers {
                let header = directory.unwrap_or_else(|| ".".to_string());
                writeln!(out, "{header}:").context("Failed to write output")?;
            }
            for line in lines {
                writeln!(out, "{line}").context("Failed to write output")?;
            }
        }

        if self.shutdown_signal.load(Ordering::SeqCst) {
            summary.interrupted = true;
        }

        if json {
            serde_json::to_writer_pretty(&mut *out, &structured)
                .context("Failed to write JSON output")?;
            writeln!(out).context("Failed to write output")?;
        }

        info!(
            "Reported {} sequences, {} failed, {} batches rejected",
            summary.reports,
            summary.failed,
            summary.rejected.len()
        );
        Ok(summary)
    }
}

fn batch_names(batch: &InputBatch) -> InfoResult<Vec<String>> {
    batch
        .files
        .iter()
        .map(|path| {
            path.to_str()
                .map(str::to_string)
                .ok_or_else(|| InfoError::MalformedName(path.to_string_lossy().into_owned()))
        })
        .collect()
}
