use crate::component::report::{
    FormatIntrospector, Layer, MediaInfo, PixelFormat, SampleType, Speed,
};
use anyhow::{Context, Result, bail};
use regex::Regex;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::LazyLock;

static REGEX_TRAILING_BITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9]+)$").expect("Invalid regex"));

#[derive(Deserialize)]
struct FfprobeOutput {
    format: Option<FormatInfo>,
    streams: Option<Vec<StreamInfo>>,
}

#[derive(Deserialize)]
struct FormatInfo {
    duration: Option<String>,
    tags: Option<BTreeMap<String, String>>,
}

#[derive(Deserialize)]
struct StreamInfo {
    codec_type: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    pix_fmt: Option<String>,
    r_frame_rate: Option<String>,
    nb_frames: Option<String>,
    duration: Option<String>,
    tags: Option<BTreeMap<String, String>>,
}

/// 以 ffprobe 讀取影像與影片資訊
#[derive(Debug, Clone)]
pub struct FfprobeIntrospector {
    program: PathBuf,
}

impl Default for FfprobeIntrospector {
    fn default() -> Self {
        Self {
            program: PathBuf::from("ffprobe"),
        }
    }
}

impl FfprobeIntrospector {
    #[must_use]
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// 檢查 ffprobe 是否可執行
    #[must_use]
    pub fn is_available(&self) -> bool {
        Command::new(&self.program)
            .arg("-version")
            .output()
            .is_ok_and(|output| output.status.success())
    }

    fn probe(&self, path: &Path) -> Result<FfprobeOutput> {
        if !path.exists() {
            bail!("No such file");
        }

        let output = Command::new(&self.program)
            .args([
                "-v",
                "error",
                "-print_format",
                "json",
                "-show_format",
                "-show_streams",
            ])
            .arg(path)
            .output()
            .with_context(|| format!("Failed to run {}", self.program.display()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!("Cannot open image: {}", stderr.trim());
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        serde_json::from_str(&stdout).context("Failed to parse ffprobe output")
    }
}

impl FormatIntrospector for FfprobeIntrospector {
    fn introspect(&self, path: &Path) -> Result<MediaInfo> {
        let probe = self.probe(path)?;
        media_info_from_probe(probe)
    }
}

fn media_info_from_probe(probe: FfprobeOutput) -> Result<MediaInfo> {
    let video_streams: Vec<StreamInfo> = probe
        .streams
        .unwrap_or_default()
        .into_iter()
        .filter(|s| s.codec_type.as_deref() == Some("video"))
        .collect();

    let Some(primary) = video_streams.first() else {
        bail!("No image stream");
    };

    let speed = primary.r_frame_rate.as_deref().and_then(Speed::parse);

    // 優先使用 nb_frames，其次以長度乘上速度估算
    let duration = probe
        .format
        .as_ref()
        .and_then(|f| f.duration.as_deref())
        .or(primary.duration.as_deref())
        .and_then(|d| d.parse::<f64>().ok());
    let frame_count = primary
        .nb_frames
        .as_deref()
        .and_then(|n| n.parse::<i64>().ok())
        .or_else(|| Some((duration? * speed?.as_f64()).round() as i64));
    let frame_range = frame_count.filter(|&n| n > 1).map(|n| (0, n - 1));

    let mut tags: Vec<(String, String)> = probe
        .format
        .and_then(|f| f.tags)
        .unwrap_or_default()
        .into_iter()
        .collect();
    if let Some(stream_tags) = &primary.tags {
        tags.extend(stream_tags.iter().map(|(k, v)| (k.clone(), v.clone())));
    }

    let layers = video_streams
        .iter()
        .map(layer_from_stream)
        .collect::<Result<Vec<_>>>()?;

    Ok(MediaInfo {
        layers,
        frame_range,
        speed,
        tags,
    })
}

fn layer_from_stream(stream: &StreamInfo) -> Result<Layer> {
    let width = stream.width.context("Missing image width")?;
    let height = stream.height.context("Missing image height")?;
    let pix_fmt = stream.pix_fmt.as_deref().unwrap_or("rgb24");
    let (pixel_format, sample_type) = parse_pixel_format(pix_fmt)
        .with_context(|| format!("Unsupported pixel format: {pix_fmt}"))?;
    let name = stream
        .tags
        .as_ref()
        .and_then(|tags| tags.get("title"))
        .cloned()
        .unwrap_or_default();

    Ok(Layer::new(name, width, height, pixel_format, sample_type))
}

/// 將 ffprobe 的 pix_fmt 轉為像素格式與取樣型別
///
/// 例如 "rgb48le" 為 RGB U16，"gbrapf32le" 為 RGBA F32，"yuv422p10le" 為 RGB U10
fn parse_pixel_format(pix_fmt: &str) -> Option<(PixelFormat, SampleType)> {
    let name = pix_fmt
        .strip_suffix("le")
        .or_else(|| pix_fmt.strip_suffix("be"))
        .unwrap_or(pix_fmt);

    let format = if name.starts_with("gray") || name.starts_with("mono") {
        PixelFormat::L
    } else if name.starts_with("ya") {
        PixelFormat::LA
    } else if ["rgba", "bgra", "argb", "abgr", "gbrap", "yuva", "pal8"]
        .iter()
        .any(|p| name.starts_with(p))
    {
        PixelFormat::RGBA
    } else if [
        "rgb", "bgr", "0rgb", "0bgr", "gbrp", "yuv", "nv", "p0", "x2rgb", "x2bgr", "uyvy", "yuyv",
    ]
    .iter()
    .any(|p| name.starts_with(p))
    {
        PixelFormat::RGB
    } else {
        return None;
    };

    if name.contains("f32") {
        return Some((format, SampleType::F32));
    }
    if name.contains("f16") {
        return Some((format, SampleType::F16));
    }
    if ["nv", "uyvy", "yuyv", "pal8", "mono", "0rgb", "0bgr"]
        .iter()
        .any(|p| name.starts_with(p))
    {
        return Some((format, SampleType::U8));
    }

    let bits: u32 = REGEX_TRAILING_BITS
        .captures(name)
        .and_then(|c| c[1].parse().ok())
        .unwrap_or(0);

    // 緊密排列的 RGB 格式以總位元數命名（rgb48 = 3 x 16）
    let packed = ["rgb", "bgr", "argb", "abgr"]
        .iter()
        .any(|p| name.starts_with(p));
    let channel_bits = match (packed, bits) {
        (_, 0) => 8,
        (true, total) => match format {
            PixelFormat::RGBA => total / 4,
            _ => total / 3,
        },
        (false, bits) => bits,
    };

    let sample_type = match channel_bits {
        8 => SampleType::U8,
        10 => SampleType::U10,
        12 => SampleType::U12,
        16 => SampleType::U16,
        32 => SampleType::U32,
        _ => return None,
    };
    Some((format, sample_type))
}
