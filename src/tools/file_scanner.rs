use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// 一次聚合處理的檔案批次；目錄展開的檔案以所在目錄分批
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputBatch {
    /// 來源目錄，直接指定的檔案為 `None`
    pub directory: Option<PathBuf>,
    pub files: Vec<PathBuf>,
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0 && entry.file_name().to_string_lossy().starts_with('.')
}

/// 展開輸入路徑
///
/// 目錄會依檔名排序列出其中的檔案（略過隱藏檔），`recurse` 時包含子目錄。
/// 不存在的路徑仍保留，交由讀取階段回報錯誤。
pub fn expand_inputs(inputs: &[PathBuf], recurse: bool) -> Result<Vec<InputBatch>> {
    let mut batches: Vec<InputBatch> = Vec::new();

    for input in inputs {
        if input.is_dir() {
            batches.extend(scan_directory(input, recurse)?);
            continue;
        }

        match batches.last_mut() {
            Some(batch) if batch.directory.is_none() => batch.files.push(input.clone()),
            _ => batches.push(InputBatch {
                directory: None,
                files: vec![input.clone()],
            }),
        }
    }

    Ok(batches)
}

fn scan_directory(directory: &Path, recurse: bool) -> Result<Vec<InputBatch>> {
    let max_depth = if recurse { usize::MAX } else { 1 };
    let mut batches: Vec<InputBatch> = Vec::new();
    let mut index: HashMap<PathBuf, usize> = HashMap::new();

    let walker = WalkDir::new(directory)
        .follow_links(false)
        .max_depth(max_depth)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !is_hidden(entry));

    for entry in walker {
        let entry =
            entry.with_context(|| format!("Failed to read directory: {}", directory.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }

        let parent = entry
            .path()
            .parent()
            .map_or_else(|| directory.to_path_buf(), Path::to_path_buf);
        let batch_index = *index.entry(parent.clone()).or_insert_with(|| {
            batches.push(InputBatch {
                directory: Some(parent),
                files: Vec::new(),
            });
            batches.len() - 1
        });
        batches[batch_index].files.push(entry.into_path());
    }

    Ok(batches)
}
