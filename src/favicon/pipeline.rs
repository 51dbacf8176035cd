//! # 解码与重采样流水线模块
//!
//! ## 设计思路
//!
//! 将“字节 → 图像 → RGBA → 方形帧”的过程集中管理，并在解码前做像素上限控制。
//! 源图只在这里被归一化一次，之后所有尺寸都从同一份只读 `SourceRaster` 派生。
//!
//! ## 实现思路
//!
//! 1. 读取 header 尺寸，按像素上限快速拒绝
//! 2. 完整解码，任意色彩模式统一转换为 RGBA（缺失 alpha 补为 255）
//! 3. 按 `FitMode` 计算源/目标区域，使用 `fast_image_resize` 卷积重采样
//! 4. `fast_image_resize` 失败时回退 `image::imageops`，输出尺寸保持不变

use fast_image_resize as fr;
use image::imageops::FilterType;
use image::{GenericImageView, ImageBuffer, Rgba, RgbaImage};
use std::io::Cursor;

use super::source::{RawImageData, RenderedFrame, SourceRaster};
use super::{FaviconError, FaviconGenerator, FitMode};

impl FaviconGenerator {
    /// 将原始字节解码并归一化为 RGBA 源图。
    pub(super) fn decode_source(&self, raw: RawImageData) -> Result<SourceRaster, FaviconError> {
        let (header_width, header_height) = Self::inspect_dimensions_from_memory(&raw.bytes)?;
        self.validate_pixel_limits(header_width, header_height)?;

        let decoded = image::load_from_memory(&raw.bytes)
            .map_err(|e| FaviconError::Decode(format!("图片解码失败：{}", e)))?;

        let (width, height) = decoded.dimensions();
        self.validate_pixel_limits(width, height)?;

        if width == 0 || height == 0 {
            return Err(FaviconError::Decode(format!(
                "图片尺寸无效：{}x{}",
                width, height
            )));
        }

        let color = decoded.color();
        let pixels = decoded.into_rgba8();

        log::info!(
            "✅ 源图解码成功 - 类型: {} 尺寸: {}x{} 色彩: {:?} -> Rgba8",
            raw.mime_hint,
            width,
            height,
            color
        );

        Ok(SourceRaster::new(pixels))
    }

    /// 仅通过内存中的图片头信息读取宽高。
    fn inspect_dimensions_from_memory(bytes: &[u8]) -> Result<(u32, u32), FaviconError> {
        let reader = image::ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| FaviconError::Decode(format!("无法识别图片格式：{}", e)))?;

        reader
            .into_dimensions()
            .map_err(|e| FaviconError::Decode(format!("无法读取图片尺寸：{}", e)))
    }

    /// 校验像素数量是否超过配置上限。
    fn validate_pixel_limits(&self, width: u32, height: u32) -> Result<(), FaviconError> {
        let pixels = (width as u64)
            .checked_mul(height as u64)
            .ok_or_else(|| FaviconError::ResourceLimit("图片像素数溢出".to_string()))?;

        if pixels > self.config.max_decoded_pixels {
            return Err(FaviconError::ResourceLimit(format!(
                "图片像素过大：{} 像素（限制：{} 像素）",
                pixels, self.config.max_decoded_pixels
            )));
        }

        Ok(())
    }

    /// 将源图重采样为 `edge × edge` 的方形帧。
    ///
    /// 纯函数：相同源图与边长总是得到逐字节相同的结果。
    pub fn resize(&self, raster: &SourceRaster, edge: u32) -> RenderedFrame {
        let pixels = match self.config.fit_mode {
            FitMode::Stretch => self.resize_region(raster.pixels(), edge, edge, None),
            FitMode::CenterCrop => self.resize_region(raster.pixels(), edge, edge, Some((0.5, 0.5))),
            FitMode::Letterbox => self.letterbox(raster.pixels(), edge),
        };

        debug_assert_eq!(pixels.dimensions(), (edge, edge));
        RenderedFrame { edge, pixels }
    }

    /// 等比缩放进 `edge × edge`，其余区域保持全透明。
    fn letterbox(&self, src: &RgbaImage, edge: u32) -> RgbaImage {
        let (src_width, src_height) = src.dimensions();
        let scale = (edge as f64 / src_width as f64).min(edge as f64 / src_height as f64);
        let inner_width = ((src_width as f64 * scale).round() as u32).clamp(1, edge);
        let inner_height = ((src_height as f64 * scale).round() as u32).clamp(1, edge);

        let inner = self.resize_region(src, inner_width, inner_height, None);

        let mut canvas = RgbaImage::from_pixel(edge, edge, Rgba([0, 0, 0, 0]));
        let x = ((edge - inner_width) / 2) as i64;
        let y = ((edge - inner_height) / 2) as i64;
        image::imageops::overlay(&mut canvas, &inner, x, y);
        canvas
    }

    /// 缩放到目标尺寸；`centering` 不为空时先按目标宽高比居中裁剪源图。
    fn resize_region(
        &self,
        src: &RgbaImage,
        target_width: u32,
        target_height: u32,
        centering: Option<(f64, f64)>,
    ) -> RgbaImage {
        let filter = self.config.resize_filter;

        match Self::resize_with_fast_image_resize(src, target_width, target_height, filter, centering)
        {
            Ok(resized) => resized,
            Err(err) => {
                log::warn!(
                    "⚠️ fast_image_resize 重采样失败，回退 image::imageops::resize：{}",
                    err
                );
                match centering {
                    None => image::imageops::resize(src, target_width, target_height, filter),
                    Some(_) => {
                        let (x, y, side_w, side_h) =
                            Self::centered_crop_rect(src.dimensions(), target_width, target_height);
                        let cropped = image::imageops::crop_imm(src, x, y, side_w, side_h).to_image();
                        image::imageops::resize(&cropped, target_width, target_height, filter)
                    }
                }
            }
        }
    }

    fn resize_with_fast_image_resize(
        src: &RgbaImage,
        target_width: u32,
        target_height: u32,
        filter: FilterType,
        centering: Option<(f64, f64)>,
    ) -> Result<RgbaImage, FaviconError> {
        let (src_width, src_height) = src.dimensions();

        let src_image =
            fr::images::ImageRef::new(src_width, src_height, src.as_raw(), fr::PixelType::U8x4)
                .map_err(|e| FaviconError::Encode(format!("构建源图像缓冲失败：{}", e)))?;

        let mut dst_image = fr::images::Image::new(target_width, target_height, fr::PixelType::U8x4);

        let mut resizer = fr::Resizer::new();
        let mut options = fr::ResizeOptions::new()
            .resize_alg(Self::to_fast_alg(filter));
        if let Some(centering) = centering {
            options = options.fit_into_destination(Some(centering));
        }

        resizer
            .resize(&src_image, &mut dst_image, Some(&options))
            .map_err(|e| FaviconError::Encode(format!("fast_image_resize 执行失败：{}", e)))?;

        ImageBuffer::<Rgba<u8>, Vec<u8>>::from_raw(target_width, target_height, dst_image.into_vec())
            .ok_or_else(|| FaviconError::Encode("fast_image_resize 输出缓冲长度异常".to_string()))
    }

    /// 按目标宽高比计算居中裁剪区域 `(x, y, width, height)`。
    fn centered_crop_rect(
        (src_width, src_height): (u32, u32),
        target_width: u32,
        target_height: u32,
    ) -> (u32, u32, u32, u32) {
        let target_ratio = target_width as f64 / target_height as f64;
        let src_ratio = src_width as f64 / src_height as f64;

        if src_ratio > target_ratio {
            let crop_width = ((src_height as f64 * target_ratio).round() as u32).clamp(1, src_width);
            ((src_width - crop_width) / 2, 0, crop_width, src_height)
        } else {
            let crop_height = ((src_width as f64 / target_ratio).round() as u32).clamp(1, src_height);
            (0, (src_height - crop_height) / 2, src_width, crop_height)
        }
    }

    /// 与 `image::imageops` 回退路径保持同一种滤波语义。
    fn to_fast_alg(filter: FilterType) -> fr::ResizeAlg {
        match filter {
            FilterType::Nearest => fr::ResizeAlg::Nearest,
            FilterType::Triangle => fr::ResizeAlg::Convolution(fr::FilterType::Bilinear),
            FilterType::CatmullRom => fr::ResizeAlg::Convolution(fr::FilterType::CatmullRom),
            FilterType::Gaussian => fr::ResizeAlg::Convolution(fr::FilterType::Gaussian),
            FilterType::Lanczos3 => fr::ResizeAlg::Convolution(fr::FilterType::Lanczos3),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::favicon::FaviconConfig;
    use image::{DynamicImage, GrayImage, ImageFormat, Luma, RgbImage};
    use proptest::prelude::*;

    fn encode(img: DynamicImage, format: ImageFormat) -> Vec<u8> {
        let mut cursor = Cursor::new(Vec::new());
        img.write_to(&mut cursor, format)
            .expect("failed to encode test image");
        cursor.into_inner()
    }

    fn raw(bytes: Vec<u8>) -> RawImageData {
        RawImageData {
            bytes,
            mime_hint: "test",
        }
    }

    fn assert_near(actual: &Rgba<u8>, expected: [u8; 4]) {
        for (a, e) in actual.0.iter().zip(expected) {
            assert!(a.abs_diff(e) <= 2, "pixel {:?} != {:?}", actual.0, expected);
        }
    }

    fn gradient(width: u32, height: u32) -> SourceRaster {
        SourceRaster::new(ImageBuffer::from_fn(width, height, |x, y| {
            Rgba([(x % 255) as u8, (y % 255) as u8, ((x + y) % 255) as u8, 255])
        }))
    }

    #[test]
    fn rgb_without_alpha_is_normalized_to_opaque_rgba() {
        let generator = FaviconGenerator::new(FaviconConfig::default());
        let rgb = RgbImage::from_pixel(4, 3, image::Rgb([200, 100, 50]));
        let bytes = encode(DynamicImage::ImageRgb8(rgb), ImageFormat::Png);

        let source = generator.decode_source(raw(bytes)).expect("decode should succeed");

        assert_eq!((source.width(), source.height()), (4, 3));
        assert!(source.pixels().pixels().all(|p| *p == Rgba([200, 100, 50, 255])));
    }

    #[test]
    fn grayscale_is_normalized_to_rgba() {
        let generator = FaviconGenerator::new(FaviconConfig::default());
        let gray = GrayImage::from_pixel(5, 5, Luma([77]));
        let bytes = encode(DynamicImage::ImageLuma8(gray), ImageFormat::Png);

        let source = generator.decode_source(raw(bytes)).expect("decode should succeed");

        assert!(source.pixels().pixels().all(|p| *p == Rgba([77, 77, 77, 255])));
    }

    #[test]
    fn palette_source_with_transparent_entry_is_normalized_to_rgba() {
        let generator = FaviconGenerator::new(FaviconConfig::default());
        // GIF 为调色板格式：两种不透明颜色 + 一个透明索引
        let indexed = ImageBuffer::from_fn(6, 4, |x, _| match x % 3 {
            0 => Rgba([255, 0, 0, 255]),
            1 => Rgba([0, 0, 255, 255]),
            _ => Rgba([0, 0, 0, 0]),
        });
        let bytes = encode(DynamicImage::ImageRgba8(indexed), ImageFormat::Gif);

        let source = generator.decode_source(raw(bytes)).expect("decode should succeed");

        assert_eq!((source.width(), source.height()), (6, 4));
        for (x, _, p) in source.pixels().enumerate_pixels() {
            match x % 3 {
                0 => assert_near(p, [255, 0, 0, 255]),
                1 => assert_near(p, [0, 0, 255, 255]),
                _ => assert_eq!(p[3], 0, "pixel {:?}", p.0),
            }
        }
    }

    #[test]
    fn nearest_filter_picks_source_pixels_on_both_paths() {
        let config = FaviconConfig {
            resize_filter: FilterType::Nearest,
            ..FaviconConfig::default()
        };
        let generator = FaviconGenerator::new(config);
        // 单像素棋盘格缩小一半：盒式或卷积滤波都会得到灰色
        let source = SourceRaster::new(ImageBuffer::from_fn(8, 8, |x, y| {
            if (x + y) % 2 == 0 {
                Rgba([255, 255, 255, 255])
            } else {
                Rgba([0, 0, 0, 255])
            }
        }));

        let fast = generator.resize(&source, 4);
        let fallback = image::imageops::resize(source.pixels(), 4, 4, FilterType::Nearest);

        for p in fast.pixels().pixels().chain(fallback.pixels()) {
            assert!(p.0 == [255, 255, 255, 255] || p.0 == [0, 0, 0, 255], "pixel {:?}", p.0);
        }
    }

    #[test]
    fn corrupt_png_is_decode_error() {
        let generator = FaviconGenerator::new(FaviconConfig::default());
        let mut bytes = encode(
            DynamicImage::ImageRgba8(RgbaImage::from_pixel(32, 32, Rgba([1, 2, 3, 4]))),
            ImageFormat::Png,
        );
        bytes.truncate(40);

        assert!(matches!(
            generator.decode_source(raw(bytes)),
            Err(FaviconError::Decode(_))
        ));
    }

    #[test]
    fn pixel_limit_rejects_before_full_decode() {
        let config = FaviconConfig {
            max_decoded_pixels: 100,
            ..FaviconConfig::default()
        };
        let generator = FaviconGenerator::new(config);
        let bytes = encode(
            DynamicImage::ImageRgba8(RgbaImage::from_pixel(20, 20, Rgba([0, 0, 0, 255]))),
            ImageFormat::Png,
        );

        assert!(matches!(
            generator.decode_source(raw(bytes)),
            Err(FaviconError::ResourceLimit(_))
        ));
    }

    #[test]
    fn stretch_distorts_non_square_source() {
        let generator = FaviconGenerator::new(FaviconConfig::default());
        // 左半红、右半蓝的 200x100：拉伸后左右各占一半
        let source = SourceRaster::new(ImageBuffer::from_fn(200, 100, |x, _| {
            if x < 100 {
                Rgba([255, 0, 0, 255])
            } else {
                Rgba([0, 0, 255, 255])
            }
        }));

        let frame = generator.resize(&source, 64);

        assert_eq!(frame.pixels().dimensions(), (64, 64));
        assert_near(frame.pixels().get_pixel(2, 32), [255, 0, 0, 255]);
        assert_near(frame.pixels().get_pixel(61, 32), [0, 0, 255, 255]);
    }

    #[test]
    fn center_crop_keeps_only_the_middle() {
        let config = FaviconConfig {
            fit_mode: FitMode::CenterCrop,
            ..FaviconConfig::default()
        };
        let generator = FaviconGenerator::new(config);
        // 左右各 100 像素绿色边，中间 100 像素红色
        let source = SourceRaster::new(ImageBuffer::from_fn(300, 100, |x, _| {
            if (100..200).contains(&x) {
                Rgba([255, 0, 0, 255])
            } else {
                Rgba([0, 255, 0, 255])
            }
        }));

        let frame = generator.resize(&source, 32);

        assert_eq!(frame.pixels().dimensions(), (32, 32));
        assert_near(frame.pixels().get_pixel(16, 16), [255, 0, 0, 255]);
    }

    #[test]
    fn letterbox_pads_with_transparency() {
        let config = FaviconConfig {
            fit_mode: FitMode::Letterbox,
            ..FaviconConfig::default()
        };
        let generator = FaviconGenerator::new(config);
        let source = SourceRaster::new(RgbaImage::from_pixel(200, 100, Rgba([255, 0, 0, 255])));

        let frame = generator.resize(&source, 64);

        assert_eq!(frame.pixels().dimensions(), (64, 64));
        assert_eq!(frame.pixels().get_pixel(32, 0)[3], 0);
        assert_eq!(frame.pixels().get_pixel(32, 63)[3], 0);
        assert_near(frame.pixels().get_pixel(32, 32), [255, 0, 0, 255]);
    }

    #[test]
    fn resize_is_deterministic() {
        let generator = FaviconGenerator::new(FaviconConfig::default());
        let source = gradient(97, 61);

        let first = generator.resize(&source, 48);
        let second = generator.resize(&source, 48);

        assert_eq!(first.as_raw(), second.as_raw());
    }

    #[test]
    fn centered_crop_rect_handles_both_orientations() {
        assert_eq!(FaviconGenerator::centered_crop_rect((300, 100), 1, 1), (100, 0, 100, 100));
        assert_eq!(FaviconGenerator::centered_crop_rect((50, 150), 1, 1), (0, 50, 50, 50));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        #[test]
        fn resized_frame_is_exactly_edge_by_edge(
            width in 1u32..80,
            height in 1u32..80,
            edge in 1u32..300,
        ) {
            let generator = FaviconGenerator::new(FaviconConfig::default());
            let frame = generator.resize(&gradient(width, height), edge);

            prop_assert_eq!(frame.edge(), edge);
            prop_assert_eq!(frame.pixels().dimensions(), (edge, edge));
            prop_assert_eq!(frame.as_raw().len(), (edge * edge * 4) as usize);
        }
    }
}
