//! 功能元件模組
//!
//! 檔名序列聚合、影像資訊合併與輸出排版，以及串接三者的回報流程

pub mod formatter;
pub mod info_reporter;
pub mod report;
pub mod sequence;

pub use formatter::{ColumnFormatter, FormatOptions};
pub use info_reporter::{MediaInfoReporter, RunSummary};
pub use report::{FormatIntrospector, MediaInfo, Report, ReportBuilder};
pub use sequence::{PathSequenceMatcher, Sequence, SequenceAggregator};
