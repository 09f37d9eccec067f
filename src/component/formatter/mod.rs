//! 輸出排版元件

mod column_formatter;

pub use column_formatter::{ColumnFormatter, FormatOptions, timecode};
