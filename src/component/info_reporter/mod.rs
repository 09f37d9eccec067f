//! 影像資訊回報元件
//!
//! 串接輸入展開、序列聚合、讀取與排版的整體流程

mod main;

pub use main::{BatchReport, MediaInfoReporter, RunSummary};
