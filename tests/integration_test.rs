//! 整合測試 - 以替代的讀取器驗證聚合、合併與排版流程

use std::path::Path;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::AtomicBool;

use media_info::InfoError;
use media_info::component::report::{Layer, PixelFormat, SampleType, Speed};
use media_info::component::sequence::FileNameToken;
use media_info::component::{
    ColumnFormatter, FormatOptions, MediaInfo, MediaInfoReporter, PathSequenceMatcher,
    ReportBuilder, SequenceAggregator,
};
use media_info::config::InfoSettings;

/// 依檔名回傳固定結果的讀取器，並記錄被讀取的路徑
struct StubIntrospector {
    calls: Mutex<Vec<String>>,
}

impl StubIntrospector {
    fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl media_info::component::FormatIntrospector for StubIntrospector {
    fn introspect(&self, path: &Path) -> anyhow::Result<MediaInfo> {
        let name = path.to_string_lossy().into_owned();
        self.calls.lock().unwrap().push(name.clone());

        if name.ends_with(".dpx") {
            return Ok(MediaInfo {
                layers: vec![Layer::new("", 2048, 1556, PixelFormat::RGB, SampleType::U10)],
                frame_range: None,
                speed: Some(Speed::from_fps(24)),
                tags: Vec::new(),
            });
        }
        if name.ends_with(".exr") {
            let layer = |name: &str, format, sample| Layer::new(name, 720, 480, format, sample);
            return Ok(MediaInfo {
                layers: vec![
                    layer("A,B,G,R", PixelFormat::RGBA, SampleType::F16),
                    layer("Ambient", PixelFormat::RGB, SampleType::F16),
                    layer("Diffuse", PixelFormat::RGB, SampleType::F16),
                    layer("Specular", PixelFormat::RGB, SampleType::F16),
                    layer("Z", PixelFormat::L, SampleType::F32),
                ],
                frame_range: Some((5, 50)),
                speed: Some(Speed::from_fps(24)),
                tags: vec![("Software".to_string(), "Renderer".to_string())],
            });
        }
        anyhow::bail!("Unsupported format")
    }
}

fn run(names: &[String], introspector: &StubIntrospector, options: FormatOptions) -> Vec<String> {
    let sequences = SequenceAggregator::default().aggregate(names).unwrap();
    let reports =
        ReportBuilder::new(introspector, Arc::new(AtomicBool::new(false))).build_all(&sequences);
    ColumnFormatter::new(options).format(&reports)
}

fn unaligned() -> FormatOptions {
    FormatOptions::new(0, false, false, false).unwrap()
}

/// 測試 1: 單張 DPX 影像
#[test]
fn test_single_still_image() {
    let introspector = StubIntrospector::new();
    let lines = run(&["dlad.dpx".to_string()], &introspector, unaligned());

    assert_eq!(lines, vec!["dlad.dpx 2048x1556:1.32 RGB U10"]);
    assert_eq!(introspector.calls(), vec!["dlad.dpx"]);
}

/// 測試 2: 1000 張多圖層 EXR 序列
#[test]
fn test_multi_layer_sequence() {
    let names: Vec<String> = (1..=1000).map(|i| format!("render{i:04}.exr")).collect();
    let introspector = StubIntrospector::new();

    let sequences = SequenceAggregator::default().aggregate(&names).unwrap();
    assert_eq!(sequences.len(), 1);
    assert_eq!(sequences[0].frames, (1..=1000).collect::<Vec<i64>>());

    let reports = ReportBuilder::new(&introspector, Arc::new(AtomicBool::new(false)))
        .build_all(&sequences);
    assert_eq!(reports[0].start, Some(1));
    assert_eq!(reports[0].end, Some(1000));
    assert_eq!(reports[0].speed, Some(Speed::from_fps(24)));

    let lines = ColumnFormatter::new(unaligned()).format(&reports);
    assert_eq!(lines.len(), 6);
    assert_eq!(lines[0], "render####.exr 00:00:41:16@24");
    assert!(lines[1..].iter().all(|line| line.starts_with("    ")));
    assert_eq!(introspector.calls(), vec!["render0001.exr"]);
}

/// 測試 3: 重複輸入在讀取前就失敗
#[test]
fn test_duplicate_input_before_introspection() {
    let names = ["a.dpx", "b.dpx", "a.dpx"];
    let introspector = StubIntrospector::new();
    let reporter = MediaInfoReporter::new(
        InfoSettings::default(),
        &introspector,
        Arc::new(AtomicBool::new(false)),
    );

    let result = reporter.report_names(&names);

    assert!(matches!(result, Err(InfoError::DuplicateInput(name)) if name == "a.dpx"));
    assert!(introspector.calls().is_empty());
}

/// 測試 4: 讀取失敗不影響其他序列
#[test]
fn test_unreadable_file_inline_error() {
    let names = vec![
        "dlad.dpx".to_string(),
        "notes.txt".to_string(),
        "plate.0001.dpx".to_string(),
    ];
    let introspector = StubIntrospector::new();
    let lines = run(&names, &introspector, unaligned());

    assert_eq!(lines.len(), 3);
    assert_eq!(lines[1], "notes.txt: Unsupported format");
    assert_eq!(lines[2], "plate.####.dpx 2048x1556:1.32 RGB U10 00:00:00:01@24");
}

/// 測試 5: 欄寬 0 時不論檔名長短都以單一空白分隔
#[test]
fn test_zero_columns_single_separator() {
    let names = vec![
        "a.dpx".to_string(),
        "a_much_longer_name_for_the_same_kind_of_file.dpx".to_string(),
    ];
    let lines = run(&names, &StubIntrospector::new(), unaligned());

    assert_eq!(lines[0], "a.dpx 2048x1556:1.32 RGB U10");
    assert_eq!(
        lines[1],
        "a_much_longer_name_for_the_same_kind_of_file.dpx 2048x1556:1.32 RGB U10"
    );
}

/// 測試 6: 對齊後每行長度一致
#[test]
fn test_aligned_columns() {
    let names = vec!["a.dpx".to_string(), "bb.dpx".to_string()];
    let options = FormatOptions::new(50, false, false, false).unwrap();
    let lines = run(&names, &StubIntrospector::new(), options);

    assert!(lines.iter().all(|line| line.len() == 50));
}

/// 測試 7: 分解後可還原原始檔名
#[test]
fn test_decompose_round_trip() {
    let matcher = PathSequenceMatcher::default();
    for name in ["render0001.exr", "dlad.dpx", "shot01_v02.sgi", "dir/1/2.3.tif", "9"] {
        let FileNameToken {
            prefix,
            frame_text,
            suffix,
            ..
        } = matcher.decompose(name);
        assert_eq!(format!("{prefix}{frame_text}{suffix}"), name);
    }
}

/// 測試 8: 分組正確性
#[test]
fn test_grouping_by_prefix_suffix_padding() {
    let names: Vec<String> = [
        "a.001.tif", "a.002.tif", "a.0003.tif", "b.001.tif", "a.001.exr", "a.tif",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    let sequences = SequenceAggregator::default().aggregate(&names).unwrap();

    let display: Vec<String> = sequences.iter().map(|s| s.display_name()).collect();
    assert_eq!(
        display,
        vec!["a.###.tif", "a.####.tif", "b.###.tif", "a.###.exr", "a.tif"]
    );
    assert_eq!(sequences[0].frames, vec![1, 2]);
}

/// 測試 9: 詳細模式輸出
#[test]
fn test_verbose_output() {
    let names: Vec<String> = (1..=3).map(|i| format!("beauty.{i:04}.exr")).collect();
    let options = FormatOptions::new(0, true, false, false).unwrap();
    let lines = run(&names, &StubIntrospector::new(), options);

    assert_eq!(lines[0], "beauty.####.exr");
    assert!(lines.contains(&"4:".to_string()));
    assert!(lines.contains(&"Start = 1".to_string()));
    assert!(lines.contains(&"End = 3".to_string()));
    assert!(lines.contains(&"Frames = 0001-0003".to_string()));
    assert_eq!(lines.last().unwrap(), "Tag Software = Renderer");
}
