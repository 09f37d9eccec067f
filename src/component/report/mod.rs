//! 影像資訊報告元件

mod builder;
mod media_info;

pub use builder::{Report, ReportBuilder};
pub use media_info::{FormatIntrospector, Layer, MediaInfo, PixelFormat, SampleType, Speed};
