//! 影像資訊資料結構與讀取介面

use serde::Serialize;
use std::fmt;
use std::path::Path;

/// 像素格式
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PixelFormat {
    L,
    LA,
    RGB,
    RGBA,
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::L => "L",
            Self::LA => "LA",
            Self::RGB => "RGB",
            Self::RGBA => "RGBA",
        };
        f.write_str(label)
    }
}

/// 取樣型別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SampleType {
    U8,
    U10,
    U12,
    U16,
    U32,
    F16,
    F32,
}

impl fmt::Display for SampleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::U8 => "U8",
            Self::U10 => "U10",
            Self::U12 => "U12",
            Self::U16 => "U16",
            Self::U32 => "U32",
            Self::F16 => "F16",
            Self::F32 => "F32",
        };
        f.write_str(label)
    }
}

/// 播放速度，以分數保存（例如 30000/1001）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Speed {
    num: u32,
    den: u32,
}

impl Speed {
    #[must_use]
    pub fn new(num: u32, den: u32) -> Option<Self> {
        if num == 0 || den == 0 {
            return None;
        }
        let divisor = gcd(num, den);
        Some(Self {
            num: num / divisor,
            den: den / divisor,
        })
    }

    #[must_use]
    pub const fn from_fps(fps: u32) -> Self {
        Self { num: fps, den: 1 }
    }

    /// 解析速度字串（例如 "30/1"、"30000/1001" 或 "29.97"）
    #[must_use]
    pub fn parse(rate: &str) -> Option<Self> {
        if let Some((num_str, den_str)) = rate.split_once('/') {
            let num: u32 = num_str.trim().parse().ok()?;
            let den: u32 = den_str.trim().parse().ok()?;
            return Self::new(num, den);
        }

        let value: f64 = rate.trim().parse().ok()?;
        if !value.is_finite() || value <= 0.0 || value > f64::from(u32::MAX) / 1000.0 {
            return None;
        }
        Self::new((value * 1000.0).round() as u32, 1000)
    }

    #[must_use]
    pub const fn num(&self) -> u32 {
        self.num
    }

    #[must_use]
    pub const fn den(&self) -> u32 {
        self.den
    }

    #[must_use]
    pub fn as_f64(&self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// 時間碼使用的整數影格率（29.97 以 30 計算）
    #[must_use]
    pub fn timecode_fps(&self) -> i64 {
        (self.as_f64().round() as i64).max(1)
    }
}

impl fmt::Display for Speed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.den == 1 {
            return write!(f, "{}", self.num);
        }
        let text = format!("{:.2}", self.as_f64());
        f.write_str(text.trim_end_matches('0').trim_end_matches('.'))
    }
}

const fn gcd(mut a: u32, mut b: u32) -> u32 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

/// 影像圖層
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Layer {
    /// 圖層名稱，預設圖層為空字串
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub pixel_format: PixelFormat,
    pub sample_type: SampleType,
}

impl Layer {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        width: u32,
        height: u32,
        pixel_format: PixelFormat,
        sample_type: SampleType,
    ) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            pixel_format,
            sample_type,
        }
    }

    #[must_use]
    pub fn aspect(&self) -> f64 {
        if self.height == 0 {
            return 0.0;
        }
        f64::from(self.width) / f64::from(self.height)
    }
}

/// 單一檔案的讀取結果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MediaInfo {
    pub layers: Vec<Layer>,
    /// 影片或內嵌時間資訊的影格範圍
    pub frame_range: Option<(i64, i64)>,
    pub speed: Option<Speed>,
    pub tags: Vec<(String, String)>,
}

/// 影像格式讀取介面，每種格式家族各自實作
pub trait FormatIntrospector: Sync {
    fn introspect(&self, path: &Path) -> anyhow::Result<MediaInfo>;
}

impl<F> FormatIntrospector for F
where
    F: Fn(&Path) -> anyhow::Result<MediaInfo> + Sync,
{
    fn introspect(&self, path: &Path) -> anyhow::Result<MediaInfo> {
        self(path)
    }
}
