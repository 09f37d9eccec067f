//! 欄位排版
//!
//! 將報告排成對齊的欄位（精簡模式）或 `key = value` 區塊（詳細模式）

use crate::component::report::{Layer, Report, Speed};
use crate::config::DEFAULT_COLUMNS;
use crate::error::{InfoError, Result};
use console::measure_text_width;
use std::path::Path;

/// 排版選項
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatOptions {
    /// 總欄寬，0 表示不對齊
    pub columns: usize,
    pub verbose: bool,
    pub show_file_path: bool,
    /// 只輸出檔名
    pub exclude_info: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            columns: DEFAULT_COLUMNS,
            verbose: false,
            show_file_path: false,
            exclude_info: false,
        }
    }
}

impl FormatOptions {
    pub fn new(
        columns: i64,
        verbose: bool,
        show_file_path: bool,
        exclude_info: bool,
    ) -> Result<Self> {
        let columns = usize::try_from(columns).map_err(|_| {
            InfoError::InvalidConfiguration(format!("column width must not be negative: {columns}"))
        })?;
        Ok(Self {
            columns,
            verbose,
            show_file_path,
            exclude_info,
        })
    }
}

pub struct ColumnFormatter {
    options: FormatOptions,
}

impl ColumnFormatter {
    #[must_use]
    pub const fn new(options: FormatOptions) -> Self {
        Self { options }
    }

    #[must_use]
    pub const fn options(&self) -> &FormatOptions {
        &self.options
    }

    pub fn format(&self, reports: &[Report]) -> Vec<String> {
        let mut lines = Vec::new();
        for (index, report) in reports.iter().enumerate() {
            if self.options.verbose && !self.options.exclude_info && index > 0 {
                lines.push(String::new());
            }
            lines.extend(self.format_report(report));
        }
        lines
    }

    pub fn format_report(&self, report: &Report) -> Vec<String> {
        let name = self.name(report);

        if let Some(error) = report.error.as_deref().filter(|_| report.failed) {
            return vec![format!("{name}: {error}")];
        }
        if self.options.exclude_info {
            return vec![name];
        }
        if self.options.verbose {
            return self.verbose_block(report, name);
        }
        self.compact_lines(report, &name)
    }

    fn name(&self, report: &Report) -> String {
        if self.options.show_file_path {
            return report.display_name.clone();
        }
        Path::new(&report.display_name)
            .file_name()
            .map_or_else(
                || report.display_name.clone(),
                |name| name.to_string_lossy().into_owned(),
            )
    }

    fn compact_lines(&self, report: &Report, name: &str) -> Vec<String> {
        let time = time_group(report);

        if let [layer] = report.layers.as_slice() {
            let info = [Some(layer_group(layer)), time]
                .into_iter()
                .flatten()
                .collect::<Vec<_>>()
                .join(" ");
            return vec![self.align(name, &info)];
        }

        let mut lines = vec![self.align(name, time.as_deref().unwrap_or_default())];
        for (index, layer) in report.layers.iter().enumerate() {
            let label = format!("    {index}: {}", layer.name);
            lines.push(self.align(&label, &layer_group(layer)));
        }
        lines
    }

    /// 左側名稱，右側資訊靠右對齊；放不下時以單一空白分隔，不截斷名稱
    fn align(&self, left: &str, right: &str) -> String {
        if right.is_empty() {
            return left.to_string();
        }

        let left_width = measure_text_width(left);
        let right_width = measure_text_width(right);
        let columns = self.options.columns;
        if columns == 0 || left_width + 1 + right_width > columns {
            return format!("{left} {right}");
        }

        let gap = columns - left_width - right_width;
        format!("{left}{}{right}", " ".repeat(gap))
    }

    fn verbose_block(&self, report: &Report, name: String) -> Vec<String> {
        let mut lines = vec![name];

        for (index, layer) in report.layers.iter().enumerate() {
            lines.push(format!("{index}:"));
            lines.push(format!("  Layer = {}", layer.name));
            lines.push(format!("  Width = {}", layer.width));
            lines.push(format!("  Height = {}", layer.height));
            lines.push(format!("  Aspect = {:.2}", layer.aspect()));
            lines.push(format!("  Pixel = {} {}", layer.pixel_format, layer.sample_type));
        }

        if let (Some(start), Some(end)) = (report.start, report.end) {
            lines.push(format!("Start = {start}"));
            lines.push(format!("End = {end}"));
        }
        if let Some(duration) = report.duration() {
            let duration = match report.speed {
                Some(speed) => timecode(duration, speed),
                None => duration.to_string(),
            };
            lines.push(format!("Duration = {duration}"));
        }
        if let Some(speed) = report.speed {
            lines.push(format!("Speed = {speed}"));
        }
        if let Some(frames) = &report.frames {
            lines.push(format!("Frames = {frames}"));
        }
        for (key, value) in &report.tags {
            lines.push(format!("Tag {key} = {value}"));
        }

        lines
    }
}

fn layer_group(layer: &Layer) -> String {
    format!(
        "{}x{}:{:.2} {} {}",
        layer.width,
        layer.height,
        layer.aspect(),
        layer.pixel_format,
        layer.sample_type
    )
}

/// `HH:MM:SS:FF@speed`，缺少影格範圍或速度時省略
fn time_group(report: &Report) -> Option<String> {
    let duration = report.duration()?;
    let speed = report.speed?;
    Some(format!("{}@{speed}", timecode(duration, speed)))
}

/// 將影格數轉為 `HH:MM:SS:FF` 時間碼
#[must_use]
pub fn timecode(frames: i64, speed: Speed) -> String {
    let fps = speed.timecode_fps();
    let frames = frames.max(0);
    let ff = frames % fps;
    let total_seconds = frames / fps;
    let ss = total_seconds % 60;
    let mm = total_seconds / 60 % 60;
    let hh = total_seconds / 3600;
    format!("{hh:02}:{mm:02}:{ss:02}:{ff:02}")
}
