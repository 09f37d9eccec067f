//! 序列聚合器
//!
//! 將一批檔名依前綴、後綴與位數分組，合併成序列

use super::matcher::{FileNameToken, PathSequenceMatcher};
use crate::config::{FrameTokenPolicy, SequenceMode};
use crate::error::{InfoError, Result};
use log::{debug, info};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// 合併後的檔案序列；沒有影格編號的檔案為 bare 序列
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sequence {
    /// 影格最小的檔案，用於讀取影像資訊
    pub representative_path: String,
    pub prefix: String,
    pub suffix: String,
    pub padding: usize,
    /// 遞增且不重複的影格編號，bare 序列為空
    pub frames: Vec<i64>,
    pub is_bare: bool,
}

impl Sequence {
    fn bare(name: &str) -> Self {
        Self {
            representative_path: name.to_string(),
            prefix: name.to_string(),
            suffix: String::new(),
            padding: 0,
            frames: Vec::new(),
            is_bare: true,
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        Path::new(&self.representative_path)
    }

    #[must_use]
    pub fn start(&self) -> Option<i64> {
        self.frames.first().copied()
    }

    #[must_use]
    pub fn end(&self) -> Option<i64> {
        self.frames.last().copied()
    }

    /// 顯示名稱，以 `#` 代表影格位數，例如 `render####.exr`
    #[must_use]
    pub fn display_name(&self) -> String {
        if self.is_bare {
            return self.representative_path.clone();
        }
        format!("{}{}{}", self.prefix, "#".repeat(self.padding), self.suffix)
    }

    /// 影格清單的緊湊表示，例如 `0001-0003,0005`
    #[must_use]
    pub fn frame_list(&self) -> String {
        let pad = self.padding;
        let mut parts = Vec::new();
        let mut frames = self.frames.iter().copied().peekable();

        while let Some(first) = frames.next() {
            let mut last = first;
            while frames.peek() == Some(&(last + 1)) {
                last += 1;
                frames.next();
            }
            if first == last {
                parts.push(format!("{first:0pad$}"));
            } else {
                parts.push(format!("{first:0pad$}-{last:0pad$}"));
            }
        }

        parts.join(",")
    }
}

/// 輸出順序中的一個位置：bare 檔案或一個分組
enum Slot<'a> {
    Bare(&'a str),
    Group(usize),
}

struct Group<'a> {
    token: FileNameToken,
    members: Vec<(i64, &'a str)>,
}

pub struct SequenceAggregator {
    matcher: PathSequenceMatcher,
    mode: SequenceMode,
}

impl Default for SequenceAggregator {
    fn default() -> Self {
        Self::new(FrameTokenPolicy::default(), SequenceMode::default())
    }
}

impl SequenceAggregator {
    #[must_use]
    pub const fn new(policy: FrameTokenPolicy, mode: SequenceMode) -> Self {
        Self {
            matcher: PathSequenceMatcher::new(policy),
            mode,
        }
    }

    /// 將檔名分組為序列
    ///
    /// 輸出順序依每個分組第一個成員在輸入中出現的順序；
    /// 重複的檔名會回傳 `DuplicateInput`。
    pub fn aggregate<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<Sequence>> {
        let mut seen = HashSet::with_capacity(names.len());
        for name in names {
            let name = name.as_ref();
            if !seen.insert(name) {
                return Err(InfoError::DuplicateInput(name.to_string()));
            }
        }

        let sequences = if self.mode == SequenceMode::Off {
            names.iter().map(|name| Sequence::bare(name.as_ref())).collect()
        } else {
            self.group(names)
        };

        info!(
            "Aggregated {} files into {} sequences",
            names.len(),
            sequences.len()
        );
        Ok(sequences)
    }

    fn group<'a, S: AsRef<str>>(&self, names: &'a [S]) -> Vec<Sequence> {
        let mut slots = Vec::new();
        let mut groups: Vec<Group<'a>> = Vec::new();
        let mut index: HashMap<(String, String, usize), usize> = HashMap::new();

        for name in names {
            let name = name.as_ref();
            let token = self.matcher.decompose(name);
            let Some(frame) = token.frame() else {
                slots.push(Slot::Bare(name));
                continue;
            };

            let key = (token.prefix.clone(), token.suffix.clone(), token.padding);
            match index.get(&key) {
                Some(&group_index) => groups[group_index].members.push((frame, name)),
                None => {
                    index.insert(key, groups.len());
                    slots.push(Slot::Group(groups.len()));
                    groups.push(Group {
                        token,
                        members: vec![(frame, name)],
                    });
                }
            }
        }

        let mut sequences = Vec::with_capacity(slots.len());
        for slot in slots {
            match slot {
                Slot::Bare(name) => sequences.push(Sequence::bare(name)),
                Slot::Group(group_index) => {
                    sequences.extend(self.split_group(&mut groups[group_index]));
                }
            }
        }
        sequences
    }

    /// 排序分組成員；Range 模式下於影格間斷處切分
    fn split_group(&self, group: &mut Group<'_>) -> Vec<Sequence> {
        group.members.sort_by_key(|(frame, _)| *frame);
        group.members.dedup_by_key(|(frame, _)| *frame);

        let mut runs: Vec<Vec<(i64, &str)>> = Vec::new();
        for &(frame, name) in &group.members {
            let extends_run = runs
                .last()
                .and_then(|run| run.last())
                .is_some_and(|(last, _)| self.mode == SequenceMode::Sparse || frame == last + 1);

            match runs.last_mut() {
                Some(run) if extends_run => run.push((frame, name)),
                _ => runs.push(vec![(frame, name)]),
            }
        }

        runs.into_iter()
            .map(|run| {
                let sequence = Sequence {
                    representative_path: run[0].1.to_string(),
                    prefix: group.token.prefix.clone(),
                    suffix: group.token.suffix.clone(),
                    padding: group.token.padding,
                    frames: run.iter().map(|(frame, _)| *frame).collect(),
                    is_bare: false,
                };
                debug!(
                    "Sequence {} [{}]",
                    sequence.display_name(),
                    sequence.frame_list()
                );
                sequence
            })
            .collect()
    }
}
