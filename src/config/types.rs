use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// 設定檔預設檔名（位於目前工作目錄）
pub const SETTINGS_FILE: &str = "settings.json";

/// 終端機寬度無法取得時使用的欄寬
pub const DEFAULT_COLUMNS: usize = 80;

/// 檔案序列化模式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SequenceMode {
    /// 不合併，每個檔案單獨列出
    Off,
    /// 同名檔案合併為一個序列，允許影格間斷
    #[default]
    Sparse,
    /// 只合併連續的影格，間斷處另起新序列
    Range,
}

/// 檔名中有多段數字時，選取哪一段作為影格編號
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FrameTokenPolicy {
    First,
    #[default]
    Last,
}

/// 使用者設定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InfoSettings {
    /// 輸出欄寬，`None` 表示使用終端機寬度，0 表示不對齊
    pub columns: Option<i64>,
    pub verbose: bool,
    /// 顯示完整路徑而非只有檔名
    pub file_path: bool,
    /// 只顯示檔名，不顯示影像資訊
    pub x_info: bool,
    pub sequence: SequenceMode,
    pub frame_token: FrameTokenPolicy,
    pub recurse: bool,
    pub language: String,
}

impl Default for InfoSettings {
    fn default() -> Self {
        Self {
            columns: None,
            verbose: false,
            file_path: false,
            x_info: false,
            sequence: SequenceMode::default(),
            frame_token: FrameTokenPolicy::default(),
            recurse: false,
            language: "en-US".to_string(),
        }
    }
}
