//! # 加载与校验模块
//!
//! ## 设计思路
//!
//! 只负责本地源文件的原始字节加载，并在“尽可能早”的阶段执行输入校验。
//! 目标是尽快失败：文件不存在时不触碰输出目录，非图片内容不进入解码阶段。
//!
//! ## 实现思路
//!
//! - 存在性检查 → `NotFound`
//! - metadata 体积限制 → `ResourceLimit`
//! - 读取后按文件签名（magic bytes）识别类型 → 非图片为 `Decode`

use std::path::Path;

use super::source::RawImageData;
use super::{FaviconError, FaviconGenerator};

impl FaviconGenerator {
    /// 从本地路径加载图片原始字节。
    pub(super) fn load_from_file(&self, path: &Path) -> Result<RawImageData, FaviconError> {
        log::info!("📁 开始读取源图片 - 路径: {}", path.display());

        if !path.exists() {
            return Err(FaviconError::NotFound(path.display().to_string()));
        }

        let metadata = std::fs::metadata(path)
            .map_err(|e| FaviconError::Decode(format!("无法读取文件信息：{}", e)))?;

        if !metadata.is_file() {
            return Err(FaviconError::Decode(format!(
                "路径不是普通文件：{}",
                path.display()
            )));
        }

        if metadata.len() > self.config.max_file_size {
            return Err(FaviconError::ResourceLimit(format!(
                "文件过大：{:.2} MB（限制：{:.2} MB）",
                metadata.len() as f64 / 1024.0 / 1024.0,
                self.config.max_file_size as f64 / 1024.0 / 1024.0
            )));
        }

        let bytes = std::fs::read(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => FaviconError::NotFound(path.display().to_string()),
            _ => FaviconError::Decode(format!("无法读取图片文件：{}", e)),
        })?;
        let mime_hint = Self::validate_image_signature(&bytes)?;

        Ok(RawImageData { bytes, mime_hint })
    }

    /// 通过文件签名校验输入是否为图片。
    ///
    /// `infer` 不认识的签名（如 TGA 这类无魔数格式）交给 `image` 再猜一次。
    fn validate_image_signature(bytes: &[u8]) -> Result<&'static str, FaviconError> {
        if bytes.is_empty() {
            return Err(FaviconError::Decode("图片内容为空".to_string()));
        }

        match infer::get(bytes) {
            Some(kind) if kind.matcher_type() == infer::MatcherType::Image => {
                Ok(kind.mime_type())
            }
            Some(kind) => Err(FaviconError::Decode(format!(
                "文件签名不是图片类型：{}",
                kind.mime_type()
            ))),
            None => image::guess_format(bytes)
                .map(|format| format.to_mime_type())
                .map_err(|e| FaviconError::Decode(format!("无法识别图片类型：{}", e))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::favicon::FaviconConfig;
    use image::{ImageBuffer, ImageFormat, Rgba};

    fn write_png(dir: &Path, name: &str, width: u32, height: u32) -> std::path::PathBuf {
        let img = ImageBuffer::from_pixel(width, height, Rgba([10u8, 20, 30, 255]));
        let path = dir.join(name);
        img.save_with_format(&path, ImageFormat::Png)
            .expect("failed to write test png");
        path
    }

    #[test]
    fn missing_file_is_not_found() {
        let generator = FaviconGenerator::new(FaviconConfig::default());
        let dir = tempfile::tempdir().expect("tempdir");

        let result = generator.load_from_file(&dir.path().join("nope.png"));

        assert!(matches!(result, Err(FaviconError::NotFound(_))));
    }

    #[test]
    fn non_image_payload_is_decode_error() {
        let generator = FaviconGenerator::new(FaviconConfig::default());
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("notes.png");
        std::fs::write(&path, b"just some text, not pixels").expect("write file");

        let result = generator.load_from_file(&path);

        assert!(matches!(result, Err(FaviconError::Decode(_))));
    }

    #[test]
    fn oversized_file_is_rejected_before_read() {
        let config = FaviconConfig {
            max_file_size: 16,
            ..FaviconConfig::default()
        };
        let generator = FaviconGenerator::new(config);
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_png(dir.path(), "big.png", 64, 64);

        let result = generator.load_from_file(&path);

        assert!(matches!(result, Err(FaviconError::ResourceLimit(_))));
    }

    #[test]
    fn png_signature_is_recognized() {
        let generator = FaviconGenerator::new(FaviconConfig::default());
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_png(dir.path(), "ok.png", 8, 8);

        let raw = generator.load_from_file(&path).expect("load should succeed");

        assert_eq!(raw.mime_hint, "image/png");
        assert!(!raw.bytes.is_empty());
    }

    #[test]
    fn empty_file_is_decode_error() {
        let generator = FaviconGenerator::new(FaviconConfig::default());
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("empty.png");
        std::fs::write(&path, b"").expect("write file");

        assert!(matches!(
            generator.load_from_file(&path),
            Err(FaviconError::Decode(_))
        ));
    }
}
