//! # 配置模块
//!
//! ## 设计思路
//!
//! 将所有“可调策略”集中到 `FaviconConfig`，保证单次生成行为可观测、可复现、可测试。
//! 默认配置即复现参考行为：拉伸到正方形 + Lanczos3 + 最高压缩。
//!
//! ## 实现思路
//!
//! - `Default` 提供标准 favicon 尺寸列表与资源上限。
//! - `FitMode` / `PngCompression` 负责字符串解析与反向输出（供命令行与设置文件使用）。
//! - `validate_sizes` 在任何读取与写入之前拒绝空列表、0 尺寸与超出像素上限的尺寸。

use std::path::PathBuf;

use image::imageops::FilterType;

use super::FaviconError;

/// 未指定尺寸时的默认列表。
pub const DEFAULT_SIZES: [u32; 6] = [16, 32, 48, 64, 128, 256];

/// ICO 容器单帧边长上限（经典格式用单字节存储宽高，0 表示 256）。
pub const ICO_MAX_EDGE: u32 = 256;

/// 生成配置。
#[derive(Debug, Clone)]
pub struct FaviconConfig {
    /// 逐尺寸输出的边长列表，保持给定顺序，不去重、不排序。
    pub sizes: Vec<u32>,
    /// 输出目录；为空时使用输入文件所在目录。
    pub output_dir: Option<PathBuf>,
    /// 重采样滤镜。
    pub resize_filter: FilterType,
    /// 非方形源图的适配方式。
    pub fit_mode: FitMode,
    /// PNG 压缩档位。
    pub png_compression: PngCompression,
    /// 读取源文件时允许的最大体积（字节）。
    pub max_file_size: u64,
    /// 解码后的像素上限（`width * height`）。
    pub max_decoded_pixels: u64,
    /// 是否并行渲染各尺寸（输出顺序与结果不变）。
    pub parallel_resize: bool,
}

impl Default for FaviconConfig {
    fn default() -> Self {
        Self {
            sizes: DEFAULT_SIZES.to_vec(),
            output_dir: None,
            resize_filter: FilterType::Lanczos3,
            fit_mode: FitMode::Stretch,
            png_compression: PngCompression::Best,
            max_file_size: 50 * 1024 * 1024,
            max_decoded_pixels: 40_000_000,
            parallel_resize: false,
        }
    }
}

impl FaviconConfig {
    /// 校验尺寸列表。
    ///
    /// 空列表或包含 0 的列表无法产出任何有效帧，直接以 `NoEligibleFrames` 拒绝；
    /// `size²` 超过 `max_decoded_pixels` 的尺寸以 `ResourceLimit` 拒绝。
    pub(crate) fn validate_sizes(&self) -> Result<(), FaviconError> {
        if self.sizes.is_empty() {
            return Err(FaviconError::NoEligibleFrames("尺寸列表为空".to_string()));
        }

        if let Some(index) = self.sizes.iter().position(|&size| size == 0) {
            return Err(FaviconError::NoEligibleFrames(format!(
                "第 {} 个尺寸为 0，尺寸必须为正整数",
                index + 1
            )));
        }

        if let Some(&size) = self
            .sizes
            .iter()
            .find(|&&size| u64::from(size) * u64::from(size) > self.max_decoded_pixels)
        {
            return Err(FaviconError::ResourceLimit(format!(
                "输出尺寸过大：{0}x{0}（像素限制：{1}）",
                size, self.max_decoded_pixels
            )));
        }

        Ok(())
    }
}

/// 非方形源图适配到方形画布的方式。
///
/// - `Stretch`：两个轴独立拉伸（参考行为，非方形源图会变形）
/// - `CenterCrop`：居中裁剪为正方形后缩放
/// - `Letterbox`：等比缩放并以透明像素补边
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FitMode {
    #[default]
    Stretch,
    CenterCrop,
    Letterbox,
}

impl FitMode {
    pub fn from_str(mode: &str) -> Result<Self, FaviconError> {
        match mode.trim().to_lowercase().as_str() {
            "stretch" => Ok(Self::Stretch),
            "crop" | "center-crop" => Ok(Self::CenterCrop),
            "letterbox" | "pad" => Ok(Self::Letterbox),
            other => Err(FaviconError::InvalidConfig(format!(
                "未知适配方式：{}（可选：stretch / crop / letterbox）",
                other
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Stretch => "stretch",
            Self::CenterCrop => "crop",
            Self::Letterbox => "letterbox",
        }
    }
}

/// PNG 压缩档位。`Best` 对应参考行为中的“优化输出”。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PngCompression {
    Fast,
    Default,
    #[default]
    Best,
}

impl PngCompression {
    pub fn from_str(level: &str) -> Result<Self, FaviconError> {
        match level.trim().to_lowercase().as_str() {
            "fast" => Ok(Self::Fast),
            "default" => Ok(Self::Default),
            "best" => Ok(Self::Best),
            other => Err(FaviconError::InvalidConfig(format!(
                "未知压缩档位：{}（可选：fast / default / best）",
                other
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fast => "fast",
            Self::Default => "default",
            Self::Best => "best",
        }
    }

    pub(crate) fn to_png_compression(self) -> image::codecs::png::CompressionType {
        match self {
            Self::Fast => image::codecs::png::CompressionType::Fast,
            Self::Default => image::codecs::png::CompressionType::Default,
            Self::Best => image::codecs::png::CompressionType::Best,
        }
    }
}

/// 从字符串解析重采样滤镜。
pub fn parse_filter(name: &str) -> Result<FilterType, FaviconError> {
    match name.trim().to_lowercase().as_str() {
        "nearest" => Ok(FilterType::Nearest),
        "triangle" | "bilinear" => Ok(FilterType::Triangle),
        "catmullrom" | "catmull-rom" => Ok(FilterType::CatmullRom),
        "gaussian" => Ok(FilterType::Gaussian),
        "lanczos" | "lanczos3" => Ok(FilterType::Lanczos3),
        other => Err(FaviconError::InvalidConfig(format!(
            "未知重采样滤镜：{}（可选：nearest / triangle / catmullrom / gaussian / lanczos3）",
            other
        ))),
    }
}
