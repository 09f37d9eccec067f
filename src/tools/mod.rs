mod ffprobe_info;
mod file_scanner;

pub use ffprobe_info::FfprobeIntrospector;
pub use file_scanner::{InputBatch, expand_inputs};
