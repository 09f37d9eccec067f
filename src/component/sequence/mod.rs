//! 檔案序列元件
//!
//! 分解檔名並將編號檔案合併為序列

mod aggregator;
mod matcher;

pub use aggregator::{Sequence, SequenceAggregator};
pub use matcher::{FileNameToken, PathSequenceMatcher};
