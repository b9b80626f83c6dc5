//! # 配置模块
//!
//! ## 设计思路
//!
//! 将所有“可调策略”集中到 `CropConfig`，保证运行时行为可观测、可调整、可测试。
//! 画布模式（scale_and_pad / pad_only）是封闭枚举，字符串只在边界处解析一次，
//! 后续分支由编译器做穷尽检查。
//!
//! ## 实现思路
//!
//! - `Default` 提供与命令行默认值一致的配置（512 方形画布、scale_and_pad）。
//! - `CanvasMode` 负责模式字符串解析与反向输出。
//! - `validate` 在批处理开始前拒绝无意义的参数。
//! - 体积/像素上限默认关闭：源图只要能解码就处理，从不为处理而缩小。

use std::str::FromStr;

use image::imageops::FilterType;

use super::CropError;

/// 选区显示时允许的最大边长（像素）。
pub const DISPLAY_MAX_DIMENSION: u32 = 1200;

/// 画布放置模式。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CanvasMode {
    /// 等比缩放到刚好放进画布，再居中补透明边。
    #[default]
    ScaleAndPad,
    /// 不缩放，直接居中补透明边；放不下则跳过。
    PadOnly,
}

impl CanvasMode {
    /// 将模式输出为稳定字符串，与命令行取值一致。
    ///
    /// # 示例
    /// ```rust
    /// use flag_cropper::cropper::CanvasMode;
    ///
    /// assert_eq!(CanvasMode::PadOnly.as_str(), "pad_only");
    /// ```
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ScaleAndPad => "scale_and_pad",
            Self::PadOnly => "pad_only",
        }
    }
}

impl FromStr for CanvasMode {
    type Err = CropError;

    /// 从外部字符串解析模式。
    ///
    /// # 示例
    /// ```rust
    /// use flag_cropper::cropper::CanvasMode;
    ///
    /// let mode: CanvasMode = "scale_and_pad".parse()?;
    /// assert_eq!(mode, CanvasMode::ScaleAndPad);
    /// # Ok::<(), flag_cropper::cropper::CropError>(())
    /// ```
    fn from_str(mode: &str) -> Result<Self, Self::Err> {
        match mode.trim() {
            "scale_and_pad" => Ok(Self::ScaleAndPad),
            "pad_only" => Ok(Self::PadOnly),
            other => Err(CropError::UnknownMode(other.to_string())),
        }
    }
}

impl std::fmt::Display for CanvasMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 裁剪处理配置。
///
/// 字段覆盖了加载、显示、归一化三个阶段。
#[derive(Debug, Clone)]
pub struct CropConfig {
    /// 输出画布宽度（像素）。
    pub target_width: u32,
    /// 输出画布高度（像素）。
    pub target_height: u32,
    /// 画布放置模式。
    pub mode: CanvasMode,
    /// 选区显示图的最大边长；原图本身从不为处理而缩小。
    pub display_max_dimension: u32,
    /// scale_and_pad 与显示图使用的重采样滤镜。
    pub resize_filter: FilterType,
    /// 读取原始文件时允许的最大体积（字节），`None` 表示不限制。
    pub max_file_size: Option<u64>,
    /// 解码后的像素上限（`width * height`），`None` 表示不限制。
    pub max_decoded_pixels: Option<u64>,
    /// 解码阶段允许的预计内存上限（按 RGBA 估算，字节），`None` 表示不限制。
    pub max_decoded_bytes: Option<u64>,
}

impl Default for CropConfig {
    fn default() -> Self {
        Self {
            target_width: 512,
            target_height: 512,
            mode: CanvasMode::ScaleAndPad,
            display_max_dimension: DISPLAY_MAX_DIMENSION,
            resize_filter: FilterType::Triangle,
            max_file_size: None,
            max_decoded_pixels: None,
            max_decoded_bytes: None,
        }
    }
}

impl CropConfig {
    /// 方形画布配置，其余参数取默认值。
    ///
    /// # 示例
    /// ```rust
    /// use flag_cropper::cropper::{CanvasMode, CropConfig};
    ///
    /// let config = CropConfig::square(256, CanvasMode::PadOnly);
    /// assert_eq!((config.target_width, config.target_height), (256, 256));
    /// ```
    pub fn square(size: u32, mode: CanvasMode) -> Self {
        Self {
            target_width: size,
            target_height: size,
            mode,
            ..Self::default()
        }
    }

    /// 校验配置是否可用于处理。
    pub fn validate(&self) -> Result<(), CropError> {
        if self.target_width == 0 || self.target_height == 0 {
            return Err(CropError::InvalidConfig(format!(
                "目标画布尺寸必须为正数：{}x{}",
                self.target_width, self.target_height
            )));
        }
        if self.display_max_dimension == 0 {
            return Err(CropError::InvalidConfig(
                "display_max_dimension 不能为 0".to_string(),
            ));
        }
        if self.max_decoded_pixels == Some(0) || self.max_decoded_bytes == Some(0) {
            return Err(CropError::InvalidConfig("解码上限不能为 0".to_string()));
        }

        Ok(())
    }
}
