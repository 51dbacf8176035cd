//! # PNG 输出模块
//!
//! ## 设计思路
//!
//! 编码与落盘分离：`encode_png` 只产出内存字节，既用于独立 PNG 文件，
//! 也作为 ICO 容器内每一帧的内嵌数据，保证两处字节完全一致。
//!
//! ## 实现思路
//!
//! - 固定 RGBA8 + 自适应行过滤，压缩档位来自配置，不写入任何时间戳块。
//! - 写文件直接覆盖同名文件；输出目录由编排器预先创建。

use std::path::Path;

use image::ImageEncoder;
use image::codecs::png::{FilterType as PngFilterType, PngEncoder};

use super::source::RenderedFrame;
use super::{FaviconError, FaviconGenerator};

impl FaviconGenerator {
    /// 将帧编码为独立、完整的 PNG 字节流。
    pub(crate) fn encode_png(&self, frame: &RenderedFrame) -> Result<Vec<u8>, FaviconError> {
        let mut buffer = Vec::new();
        let encoder = PngEncoder::new_with_quality(
            &mut buffer,
            self.config.png_compression.to_png_compression(),
            PngFilterType::Adaptive,
        );

        encoder
            .write_image(
                frame.as_raw(),
                frame.edge,
                frame.edge,
                image::ExtendedColorType::Rgba8,
            )
            .map_err(|e| {
                FaviconError::from_encoding(e, &format!("{0}x{0} PNG 编码失败", frame.edge))
            })?;

        Ok(buffer)
    }

    /// 编码并写入 PNG 文件，已存在的文件会被直接覆盖。
    pub fn emit_png(&self, frame: &RenderedFrame, path: &Path) -> Result<(), FaviconError> {
        let bytes = self.encode_png(frame)?;
        write_file(path, &bytes)?;

        log::info!(
            "✓ 已生成: {} ({}x{}, {} 字节)",
            path.display(),
            frame.edge,
            frame.edge,
            bytes.len()
        );
        Ok(())
    }
}

/// 写入整块字节，I/O 失败统一映射为 `Write`。
pub(crate) fn write_file(path: &Path, bytes: &[u8]) -> Result<(), FaviconError> {
    std::fs::write(path, bytes)
        .map_err(|e| FaviconError::Write(format!("写入 {} 失败：{}", path.display(), e)))
}

/// 逐尺寸 PNG 的固定命名：`favicon-{W}x{H}.png`。
pub fn sized_png_name(edge: u32) -> String {
    format!("favicon-{0}x{0}.png", edge)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::favicon::FaviconConfig;
    use image::{Rgba, RgbaImage};

    fn frame(edge: u32, color: [u8; 4]) -> RenderedFrame {
        RenderedFrame {
            edge,
            pixels: RgbaImage::from_pixel(edge, edge, Rgba(color)),
        }
    }

    #[test]
    fn sized_png_name_follows_convention() {
        assert_eq!(sized_png_name(16), "favicon-16x16.png");
        assert_eq!(sized_png_name(256), "favicon-256x256.png");
    }

    #[test]
    fn encoded_png_preserves_alpha_and_dimensions() {
        let generator = FaviconGenerator::new(FaviconConfig::default());
        let bytes = generator
            .encode_png(&frame(24, [9, 8, 7, 128]))
            .expect("encode should succeed");

        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
        let decoded = image::load_from_memory(&bytes)
            .expect("decode should succeed")
            .into_rgba8();
        assert_eq!(decoded.dimensions(), (24, 24));
        assert!(decoded.pixels().all(|p| *p == Rgba([9, 8, 7, 128])));
    }

    #[test]
    fn encoding_is_byte_identical_across_runs() {
        let generator = FaviconGenerator::new(FaviconConfig::default());
        let f = frame(32, [255, 0, 0, 255]);

        let first = generator.encode_png(&f).expect("encode");
        let second = generator.encode_png(&f).expect("encode");

        assert_eq!(first, second);
    }

    #[test]
    fn emit_overwrites_existing_file() {
        let generator = FaviconGenerator::new(FaviconConfig::default());
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(sized_png_name(8));
        std::fs::write(&path, b"stale").expect("write stale file");

        generator
            .emit_png(&frame(8, [0, 0, 0, 255]), &path)
            .expect("emit should succeed");

        let written = std::fs::read(&path).expect("read back");
        assert_ne!(written, b"stale");
        assert_eq!(
            image::load_from_memory(&written).expect("decode").into_rgba8().dimensions(),
            (8, 8)
        );
    }

    #[test]
    fn emit_into_missing_directory_is_write_error() {
        let generator = FaviconGenerator::new(FaviconConfig::default());
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("missing").join("favicon-8x8.png");

        assert!(matches!(
            generator.emit_png(&frame(8, [0, 0, 0, 255]), &path),
            Err(FaviconError::Write(_))
        ));
    }
}
