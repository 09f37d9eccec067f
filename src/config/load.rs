use crate::component::formatter::FormatOptions;
use crate::config::types::{DEFAULT_COLUMNS, InfoSettings, SETTINGS_FILE};
use crate::error::Result as InfoResult;
use anyhow::{Context, Result};
use console::Term;
use log::debug;
use std::fs;
use std::path::Path;

impl InfoSettings {
    /// 從目前目錄的 settings.json 載入，檔案不存在時使用預設值
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new(SETTINGS_FILE))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No settings file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse settings from {}", path.display()))
    }

    /// 轉換為輸出格式選項；未設定欄寬時使用終端機寬度
    pub fn format_options(&self) -> InfoResult<FormatOptions> {
        let columns = match self.columns {
            Some(columns) => columns,
            None => terminal_columns() as i64,
        };
        FormatOptions::new(columns, self.verbose, self.file_path, self.x_info)
    }
}

fn terminal_columns() -> usize {
    let term = Term::stdout();
    if term.is_term() {
        let (_, columns) = term.size();
        usize::from(columns)
    } else {
        DEFAULT_COLUMNS
    }
}
