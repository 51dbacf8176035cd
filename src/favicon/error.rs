//! # 错误模型模块
//!
//! ## 设计思路
//!
//! 使用单一错误枚举承载生成链路中的所有错误来源，避免字符串拼接式错误处理。
//! 通过 `thiserror` 保持人类可读错误，同时让调用侧可按分支匹配。
//! 任一阶段失败都原样向上传递，不做本地恢复或重试。

/// 图标生成统一错误类型。
#[derive(Debug, thiserror::Error)]
pub enum FaviconError {
    #[error("文件不存在：{0}")]
    NotFound(String),

    #[error("解码错误：{0}")]
    Decode(String),

    #[error("编码错误：{0}")]
    Encode(String),

    #[error("写入错误：{0}")]
    Write(String),

    #[error("没有可打包的尺寸：{0}")]
    NoEligibleFrames(String),

    #[error("资源限制：{0}")]
    ResourceLimit(String),

    #[error("缺少编解码能力：{0}")]
    CapabilityUnavailable(String),

    #[error("配置错误：{0}")]
    InvalidConfig(String),
}

impl FaviconError {
    /// 将 `image` 的编码错误映射到统一错误。
    ///
    /// `Unsupported` 说明当前构建缺少对应编码器，而不是数据本身有问题。
    pub(crate) fn from_encoding(err: image::ImageError, what: &str) -> Self {
        match err {
            image::ImageError::Unsupported(e) => {
                Self::CapabilityUnavailable(format!("{}：{}", what, e))
            }
            image::ImageError::IoError(e) => Self::Write(format!("{}：{}", what, e)),
            other => Self::Encode(format!("{}：{}", what, other)),
        }
    }
}

impl From<FaviconError> for String {
    fn from(error: FaviconError) -> Self {
        error.to_string()
    }
}
