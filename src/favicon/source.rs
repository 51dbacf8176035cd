//! # 数据源与中间模型
//!
//! ## 设计思路
//!
//! 将“磁盘输入”和“流水线中间结果”解耦：
//! - `RawImageData` 表示已加载但未解码的字节
//! - `SourceRaster` 表示归一化为 RGBA 的源图（只读共享）
//! - `RenderedFrame` 表示某一边长下的方形渲染结果（用完即弃）

use image::RgbaImage;

/// 加载阶段输出：原始字节与来源标识。
pub(crate) struct RawImageData {
    /// 原始图片字节。
    pub(crate) bytes: Vec<u8>,
    /// 文件签名识别出的 MIME（用于日志与诊断）。
    pub(crate) mime_hint: &'static str,
}

/// 归一化后的源图。
///
/// 不变量：始终为 4 通道 RGBA，缺失的 alpha 通道以完全不透明补齐。
#[derive(Debug, Clone)]
pub struct SourceRaster {
    pub(crate) pixels: RgbaImage,
}

impl SourceRaster {
    pub fn new(pixels: RgbaImage) -> Self {
        Self { pixels }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }
}

/// 单个尺寸的渲染结果：`edge × edge` 的 RGBA 位图。
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedFrame {
    pub(crate) edge: u32,
    pub(crate) pixels: RgbaImage,
}

impl RenderedFrame {
    pub fn edge(&self) -> u32 {
        self.edge
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    /// RGBA 字节数组（`edge * edge * 4`）。
    pub fn as_raw(&self) -> &[u8] {
        self.pixels.as_raw()
    }
}
