//! # favicon-forge — 库入口
//!
//! ## 架构总览
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  main.rs (clap)  ── settings (JSON) ── AppError          │
//! └───────┬──────────────────────────────────────────────────┘
//!         ↓ FaviconConfig
//! ┌───────┼──────────────────────────────────────────────────┐
//! │       ↓            favicon                               │
//! │                                                          │
//! │  loader ──→ pipeline (RGBA 归一化 / 重采样)              │
//! │                 │                                        │
//! │                 ├─→ png_writer   favicon-{W}x{H}.png     │
//! │                 ├─→ ico          favicon.ico             │
//! │                 └─→ derived      favicon.png             │
//! │                                  apple-touch-icon.png    │
//! │  handler (编排) ──→ AssetManifest                        │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## 模块职责
//!
//! | 模块 | 职责 |
//! |------|------|
//! | [`error`] | 应用级错误类型 `AppError` |
//! | [`favicon`] | 源图加载、重采样、PNG/ICO 输出、派生图标与结果清单 |
//! | [`settings`] | JSON 设置文件到 `FaviconConfig` 的覆盖 |

pub mod error;
pub mod favicon;
pub mod settings;
