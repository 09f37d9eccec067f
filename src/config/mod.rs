pub mod load;
pub mod types;

pub use types::{DEFAULT_COLUMNS, FrameTokenPolicy, InfoSettings, SETTINGS_FILE, SequenceMode};
