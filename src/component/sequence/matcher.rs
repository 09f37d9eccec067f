//! 檔名分解器
//!
//! 將檔名拆成「前綴 + 影格編號 + 後綴」，並判斷兩個檔名是否屬於同一序列

use crate::config::FrameTokenPolicy;
use crate::error::{InfoError, Result};
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

/// 影格編號最多位數，超過時視為一般檔名（無法以 i64 表示）
const MAX_FRAME_DIGITS: usize = 18;

static REGEX_DIGIT_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+").expect("Invalid regex"));

/// 分解後的檔名
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileNameToken {
    /// 影格編號之前的部分（含目錄）
    pub prefix: String,
    /// 影格編號原始字串，沒有時為空字串
    pub frame_text: String,
    /// 影格編號位數，沒有時為 0
    pub padding: usize,
    /// 影格編號之後的部分（含副檔名）
    pub suffix: String,
}

impl FileNameToken {
    fn bare(name: &str) -> Self {
        Self {
            prefix: name.to_string(),
            frame_text: String::new(),
            padding: 0,
            suffix: String::new(),
        }
    }

    #[must_use]
    pub const fn is_bare(&self) -> bool {
        self.padding == 0
    }

    #[must_use]
    pub fn frame(&self) -> Option<i64> {
        self.frame_text.parse().ok()
    }

    /// 還原完整檔名
    #[must_use]
    pub fn name(&self) -> String {
        format!("{}{}{}", self.prefix, self.frame_text, self.suffix)
    }
}

/// 空字串或全為數字的最後一段視為影格編號而非副檔名
fn is_frame_extension(extension: &str) -> bool {
    extension.bytes().all(|b| b.is_ascii_digit())
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PathSequenceMatcher {
    policy: FrameTokenPolicy,
}

impl PathSequenceMatcher {
    #[must_use]
    pub const fn new(policy: FrameTokenPolicy) -> Self {
        Self { policy }
    }

    /// 分解檔名
    ///
    /// 只在最後一個路徑元件的主檔名（副檔名之前）中尋找數字，
    /// 因此 `shot01/clip.mp4` 不會把目錄或副檔名中的數字當作影格編號。
    /// 全為數字的最後一段不算副檔名：`render.0001` 的影格編號為 1。
    #[must_use]
    pub fn decompose(&self, name: &str) -> FileNameToken {
        let file_start = name
            .rfind(std::path::is_separator)
            .map_or(0, |index| index + 1);
        let file_name = &name[file_start..];
        let stem_end = match file_name.rfind('.') {
            Some(dot) if dot > 0 && !is_frame_extension(&file_name[dot + 1..]) => {
                file_start + dot
            }
            _ => name.len(),
        };

        let mut runs = REGEX_DIGIT_RUN.find_iter(&name[file_start..stem_end]);
        let run = match self.policy {
            FrameTokenPolicy::First => runs.next(),
            FrameTokenPolicy::Last => runs.last(),
        };

        let Some(run) = run else {
            return FileNameToken::bare(name);
        };
        if run.len() > MAX_FRAME_DIGITS {
            return FileNameToken::bare(name);
        }

        let start = file_start + run.start();
        let end = file_start + run.end();
        FileNameToken {
            prefix: name[..start].to_string(),
            frame_text: name[start..end].to_string(),
            padding: end - start,
            suffix: name[end..].to_string(),
        }
    }

    /// 分解路徑，非 UTF-8 的路徑會回傳 `MalformedName`
    pub fn decompose_path(&self, path: &Path) -> Result<FileNameToken> {
        path.to_str()
            .map(|name| self.decompose(name))
            .ok_or_else(|| InfoError::MalformedName(path.to_string_lossy().into_owned()))
    }

    /// 前綴、後綴與位數都相同時屬於同一序列
    #[must_use]
    pub fn matches_same_sequence(a: &FileNameToken, b: &FileNameToken) -> bool {
        a.prefix == b.prefix && a.suffix == b.suffix && a.padding == b.padding
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher() -> PathSequenceMatcher {
        PathSequenceMatcher::default()
    }

    #[test]
    fn test_decompose_padded_frame() {
        let token = matcher().decompose("render0001.exr");
        assert_eq!(token.prefix, "render");
        assert_eq!(token.frame_text, "0001");
        assert_eq!(token.padding, 4);
        assert_eq!(token.suffix, ".exr");
        assert_eq!(token.frame(), Some(1));
    }

    #[test]
    fn test_decompose_bare_name() {
        let token = matcher().decompose("dlad.dpx");
        assert!(token.is_bare());
        assert_eq!(token.frame(), None);
        assert_eq!(token.name(), "dlad.dpx");
    }

    #[test]
    fn test_decompose_uses_last_digit_run() {
        let token = matcher().decompose("shot01_v02.sgi");
        assert_eq!(token.prefix, "shot01_v");
        assert_eq!(token.frame(), Some(2));
        assert_eq!(token.padding, 2);
        assert_eq!(token.suffix, ".sgi");
    }

    #[test]
    fn test_decompose_first_policy() {
        let token = PathSequenceMatcher::new(FrameTokenPolicy::First).decompose("shot01_v02.sgi");
        assert_eq!(token.prefix, "shot");
        assert_eq!(token.frame_text, "01");
        assert_eq!(token.suffix, "_v02.sgi");
    }

    #[test]
    fn test_digits_in_extension_ignored() {
        let token = matcher().decompose("clip.mp4");
        assert!(token.is_bare());

        let token = matcher().decompose("render.0010.mp4");
        assert_eq!(token.prefix, "render.");
        assert_eq!(token.frame(), Some(10));
        assert_eq!(token.suffix, ".mp4");
    }

    #[test]
    fn test_numeric_final_segment_is_frame() {
        let token = matcher().decompose("render.0001");
        assert_eq!(token.prefix, "render.");
        assert_eq!(token.frame(), Some(1));
        assert_eq!(token.padding, 4);
        assert_eq!(token.suffix, "");

        let token = matcher().decompose("plates/bg.v2.0100");
        assert_eq!(token.prefix, "plates/bg.v2.");
        assert_eq!(token.frame(), Some(100));

        let a = matcher().decompose("render.0001");
        let b = matcher().decompose("render.0002");
        assert!(PathSequenceMatcher::matches_same_sequence(&a, &b));
    }

    #[test]
    fn test_trailing_dot_keeps_stem_digits() {
        let token = matcher().decompose("take12.");
        assert_eq!(token.prefix, "take");
        assert_eq!(token.frame(), Some(12));
        assert_eq!(token.suffix, ".");
    }

    #[test]
    fn test_digits_in_directory_ignored() {
        let token = matcher().decompose("shot01/plate.tif");
        assert!(token.is_bare());

        let token = matcher().decompose("shot01/plate.0100.tif");
        assert_eq!(token.prefix, "shot01/plate.");
        assert_eq!(token.frame(), Some(100));
    }

    #[test]
    fn test_hidden_file_with_digits() {
        let token = matcher().decompose(".cache42");
        assert_eq!(token.prefix, ".cache");
        assert_eq!(token.frame(), Some(42));
        assert_eq!(token.suffix, "");
    }

    #[test]
    fn test_overlong_digit_run_is_bare() {
        let token = matcher().decompose("hash1234567890123456789012.bin");
        assert!(token.is_bare());
    }

    #[test]
    fn test_round_trip() {
        let names = [
            "render0001.exr",
            "dlad.dpx",
            "shot01_v02.sgi",
            "a/b12/c.0003.tif",
            "noext",
            "123",
            "frame.12.34.jpg",
            "中文影片0007.mov",
            "",
        ];
        for name in names {
            let token = matcher().decompose(name);
            assert_eq!(token.name(), name, "round trip failed for {name:?}");
            assert_eq!(token.padding, token.frame_text.len());
        }
    }

    #[test]
    fn test_decompose_path() {
        let token = matcher().decompose_path(Path::new("plates/bg.0042.dpx")).unwrap();
        assert_eq!(token.frame(), Some(42));
    }

    #[cfg(unix)]
    #[test]
    fn test_decompose_non_utf8_path() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let path = Path::new(OsStr::from_bytes(b"bad\xff0001.exr"));
        assert!(matches!(
            matcher().decompose_path(path),
            Err(InfoError::MalformedName(_))
        ));
    }

    #[test]
    fn test_matches_same_sequence() {
        let a = matcher().decompose("render0001.exr");
        let b = matcher().decompose("render0999.exr");
        let c = matcher().decompose("render001.exr");
        let d = matcher().decompose("render0001.tif");
        assert!(PathSequenceMatcher::matches_same_sequence(&a, &b));
        assert!(!PathSequenceMatcher::matches_same_sequence(&a, &c));
        assert!(!PathSequenceMatcher::matches_same_sequence(&a, &d));
    }

    #[test]
    fn test_bare_never_matches_numbered() {
        let bare = matcher().decompose("render.tif");
        let numbered = matcher().decompose("render0001.tif");
        assert!(!PathSequenceMatcher::matches_same_sequence(&bare, &numbered));
    }
}
