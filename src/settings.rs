//! 设置文件模块
//!
//! # 设计思路
//!
//! 允许用一个 JSON 文件固定一套生成参数（团队共享、CI 复用），
//! 所有字段均可省略，省略时保持 `FaviconConfig::default()` 的取值。
//!
//! # 实现思路
//!
//! - `serde` 反序列化到全 `Option` 的 `FaviconSettings`，拒绝未知字段以便尽早发现拼写错误。
//! - 字符串枚举（适配方式 / 滤镜 / 压缩档位）复用 `favicon::config` 中的解析函数。
//! - 命令行参数在设置文件之后应用，优先级更高。

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::favicon::{FaviconConfig, FitMode, PngCompression, parse_filter};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FaviconSettings {
    pub sizes: Option<Vec<u32>>,
    pub output_dir: Option<PathBuf>,
    pub fit_mode: Option<String>,
    pub resize_filter: Option<String>,
    pub png_compression: Option<String>,
    pub max_file_size: Option<u64>,
    pub max_decoded_pixels: Option<u64>,
    pub parallel_resize: Option<bool>,
}

impl FaviconSettings {
    pub fn from_json(content: &str) -> Result<Self, AppError> {
        serde_json::from_str(content)
            .map_err(|e| AppError::Settings(format!("解析设置文件失败: {}", e)))
    }

    /// 将已设置的字段覆盖到配置上。
    pub fn apply(&self, config: &mut FaviconConfig) -> Result<(), AppError> {
        if let Some(sizes) = &self.sizes {
            config.sizes = sizes.clone();
        }
        if let Some(dir) = &self.output_dir {
            config.output_dir = Some(dir.clone());
        }
        if let Some(mode) = &self.fit_mode {
            config.fit_mode = FitMode::from_str(mode)?;
        }
        if let Some(filter) = &self.resize_filter {
            config.resize_filter = parse_filter(filter)?;
        }
        if let Some(level) = &self.png_compression {
            config.png_compression = PngCompression::from_str(level)?;
        }
        if let Some(limit) = self.max_file_size {
            config.max_file_size = limit;
        }
        if let Some(limit) = self.max_decoded_pixels {
            config.max_decoded_pixels = limit;
        }
        if let Some(parallel) = self.parallel_resize {
            config.parallel_resize = parallel;
        }
        Ok(())
    }
}

/// 读取设置文件。
pub fn load_settings(path: &Path) -> Result<FaviconSettings, AppError> {
    let content = fs::read_to_string(path).map_err(|e| {
        AppError::Settings(format!("读取设置文件 '{}' 失败: {}", path.display(), e))
    })?;
    let settings = FaviconSettings::from_json(&content)?;
    log::info!("⚙️ 已加载设置文件: {}", path.display());
    Ok(settings)
}
