//! # 图标生成模块（favicon）
//!
//! ## 设计思路
//!
//! 该模块将“读取源图 → 归一化 → 逐尺寸重采样 → 写 PNG → 打包 ICO → 派生图标”
//! 按职责拆分为多个子模块，避免单文件膨胀与耦合。
//!
//! - `handler`：编排整条处理流水线（`FaviconGenerator`）
//! - `loader`：负责本地文件加载与签名校验
//! - `pipeline`：负责解码、RGBA 归一化、像素限制与重采样
//! - `png_writer`：负责 PNG 编码与落盘
//! - `ico`：负责多帧 ICO 容器的目录计算与序列化
//! - `derived`：负责与尺寸列表无关的固定尺寸图标
//! - `manifest`：生成结果清单
//! - `config/error/source`：配置、错误、中间数据模型
//!
//! ## 新同事快速上手
//!
//! ```text
//! generate(input, output_dir?, sizes?)
//!    ↓
//! handler.rs（状态机 + 阶段耗时日志）
//!    ├─ loader.rs + pipeline.rs（SourceRaster，只读共享）
//!    ├─ 每个尺寸：pipeline.rs::resize → png_writer.rs
//!    ├─ ico.rs（≤ 256 的帧，按生成顺序）
//!    └─ derived.rs（32×32 / 180×180）
//!    ↓
//! AssetManifest 或 FaviconError
//! ```

mod config;
mod derived;
mod error;
mod handler;
mod ico;
mod loader;
mod manifest;
mod pipeline;
mod png_writer;
mod source;

pub use config::{
    DEFAULT_SIZES, FaviconConfig, FitMode, ICO_MAX_EDGE, PngCompression, parse_filter,
};
pub use derived::DerivedAsset;
pub use error::FaviconError;
pub use handler::{FaviconGenerator, ICO_FILE_NAME, PipelineStage, generate};
pub use ico::{ICO_DIR_ENTRY_LEN, ICO_HEADER_LEN, IconDirEntry, IconDirectory};
pub use manifest::{AssetManifest, GeneratedAsset};
pub use png_writer::sized_png_name;
pub use source::{RenderedFrame, SourceRaster};
