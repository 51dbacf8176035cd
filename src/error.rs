//! 统一错误类型模块
//!
//! # 设计思路
//!
//! 库内部各阶段使用 `FaviconError`，命令行层再统一收敛为 `AppError`，
//! 设置文件与结果输出等外围错误不污染核心错误分类。
//!
//! # 实现思路
//!
//! - 使用 `thiserror` 派生可读错误消息。
//! - 为 `FaviconError` 提供 `From` 转换，无需手动 map。
//! - 实现 `Serialize` 将错误序列化为字符串，便于 `--json` 模式输出。

use serde::Serialize;

use crate::favicon::FaviconError;

/// 应用级统一错误类型
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// 图标生成流水线错误（加载 / 编码 / 写入 / 打包）
    #[error("{0}")]
    Favicon(#[from] FaviconError),

    /// 设置文件不可用或内容无效
    #[error("设置文件错误: {0}")]
    Settings(String),

    /// 结果清单输出失败
    #[error("输出失败: {0}")]
    Output(String),
}

impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
