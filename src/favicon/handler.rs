//! # 核心编排模块
//!
//! ## 设计思路
//!
//! `FaviconGenerator` 只负责流程编排与配置持有，不关心命令行或设置文件。
//! 处理链路固定为线性状态机，无分支、无重试：
//!
//! ```text
//! Loaded → Resizing(size_i) → Emitted(size_i) … → Packed → DerivedEmitted → Done
//! ```
//!
//! 任一阶段失败立即中止，已写出的文件保留在磁盘上（不回滚），
//! 失败时不返回部分清单。
//!
//! ## 实现思路
//!
//! - 源图只解码一次，之后以只读引用在各尺寸间共享。
//! - ICO 所需的帧在逐尺寸输出时顺带收集，顺序与尺寸列表一致。
//! - 开启 `parallel_resize` 时用 `rayon` 并行重采样，`collect` 保序，写盘仍按顺序进行。
//! - 记录 `load/resize/emit/pack/derive/total` 阶段耗时，便于性能诊断。

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use rayon::prelude::*;

use super::config::ICO_MAX_EDGE;
use super::manifest::AssetManifest;
use super::png_writer::sized_png_name;
use super::source::{RenderedFrame, SourceRaster};
use super::{FaviconConfig, FaviconError};

/// 打包容器的固定文件名。
pub const ICO_FILE_NAME: &str = "favicon.ico";

/// 流水线阶段，仅用于日志与失败定位。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Start,
    Loaded,
    Resizing(u32),
    Emitted(u32),
    Packed,
    DerivedEmitted,
    Done,
}

/// 逐尺寸阶段的累计耗时。
#[derive(Debug, Default, Clone, Copy)]
struct SizeTimings {
    resize: Duration,
    emit: Duration,
}

/// 图标生成器。
pub struct FaviconGenerator {
    pub(super) config: FaviconConfig,
}

impl FaviconGenerator {
    /// # 示例
    /// ```rust,no_run
    /// use favicon_forge::favicon::{FaviconConfig, FaviconGenerator};
    ///
    /// let generator = FaviconGenerator::new(FaviconConfig::default());
    /// let manifest = generator.generate("logo.png".as_ref())?;
    /// assert!(manifest.get("ico").is_some());
    /// # Ok::<(), favicon_forge::favicon::FaviconError>(())
    /// ```
    pub fn new(config: FaviconConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FaviconConfig {
        &self.config
    }

    /// 读取并归一化源图。
    pub fn load(&self, input: &Path) -> Result<SourceRaster, FaviconError> {
        let raw = self.load_from_file(input)?;
        self.decode_source(raw)
    }

    /// 生成主入口：返回“标签 → 路径”清单。
    pub fn generate(&self, input: &Path) -> Result<AssetManifest, FaviconError> {
        let mut stage = PipelineStage::Start;
        let result = self.run(input, &mut stage);

        if let Err(err) = &result {
            log::error!("❌ 图标生成在 {:?} 阶段中止：{}", stage, err);
        }
        result
    }

    fn run(&self, input: &Path, stage: &mut PipelineStage) -> Result<AssetManifest, FaviconError> {
        self.config.validate_sizes()?;
        let total_start = Instant::now();

        let load_start = Instant::now();
        let raster = self.load(input)?;
        self.advance(stage, PipelineStage::Loaded);
        let load_elapsed = load_start.elapsed();

        let output_dir = self.prepare_output_dir(input)?;
        let mut manifest = AssetManifest::default();

        let mut timings = SizeTimings::default();
        let ico_frames = if self.config.parallel_resize {
            self.emit_sizes_parallel(&raster, &output_dir, &mut manifest, stage, &mut timings)?
        } else {
            self.emit_sizes(&raster, &output_dir, &mut manifest, stage, &mut timings)?
        };

        let pack_start = Instant::now();
        let ico_path = output_dir.join(ICO_FILE_NAME);
        self.pack_ico(&ico_frames, &ico_path)?;
        drop(ico_frames);
        manifest.insert("ico", ico_path);
        self.advance(stage, PipelineStage::Packed);
        let pack_elapsed = pack_start.elapsed();

        let derive_start = Instant::now();
        self.emit_derived(&raster, &output_dir, &mut manifest)?;
        self.advance(stage, PipelineStage::DerivedEmitted);
        let derive_elapsed = derive_start.elapsed();

        self.advance(stage, PipelineStage::Done);
        log::info!(
            "✅ 图标生成完成 - {} 个文件 load={}ms resize={}ms emit={}ms pack={}ms derive={}ms total={}ms",
            manifest.len(),
            load_elapsed.as_millis(),
            timings.resize.as_millis(),
            timings.emit.as_millis(),
            pack_elapsed.as_millis(),
            derive_elapsed.as_millis(),
            total_start.elapsed().as_millis()
        );

        Ok(manifest)
    }

    fn advance(&self, stage: &mut PipelineStage, next: PipelineStage) {
        log::debug!("pipeline: {:?} -> {:?}", stage, next);
        *stage = next;
    }

    /// 确定输出目录：显式指定时自动创建（含父目录），否则使用输入文件所在目录。
    fn prepare_output_dir(&self, input: &Path) -> Result<PathBuf, FaviconError> {
        match &self.config.output_dir {
            Some(dir) => {
                std::fs::create_dir_all(dir).map_err(|e| {
                    FaviconError::Write(format!("创建输出目录 '{}' 失败：{}", dir.display(), e))
                })?;
                Ok(dir.clone())
            }
            None => Ok(match input.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
                _ => PathBuf::from("."),
            }),
        }
    }

    /// 逐尺寸：重采样 → 写 PNG → 收集 ICO 帧。
    fn emit_sizes(
        &self,
        raster: &SourceRaster,
        output_dir: &Path,
        manifest: &mut AssetManifest,
        stage: &mut PipelineStage,
        timings: &mut SizeTimings,
    ) -> Result<Vec<RenderedFrame>, FaviconError> {
        let mut ico_frames = Vec::new();

        for &size in &self.config.sizes {
            self.advance(stage, PipelineStage::Resizing(size));
            let resize_start = Instant::now();
            let frame = self.resize(raster, size);
            timings.resize += resize_start.elapsed();

            let emit_start = Instant::now();
            self.emit_sized_png(&frame, output_dir, manifest)?;
            timings.emit += emit_start.elapsed();
            self.advance(stage, PipelineStage::Emitted(size));

            if frame.edge <= ICO_MAX_EDGE {
                ico_frames.push(frame);
            }
        }

        Ok(ico_frames)
    }

    /// 并行重采样全部尺寸，再按原顺序写盘。输出与顺序版本逐字节一致。
    fn emit_sizes_parallel(
        &self,
        raster: &SourceRaster,
        output_dir: &Path,
        manifest: &mut AssetManifest,
        stage: &mut PipelineStage,
        timings: &mut SizeTimings,
    ) -> Result<Vec<RenderedFrame>, FaviconError> {
        let resize_start = Instant::now();
        let frames = self
            .config
            .sizes
            .par_iter()
            .map(|&size| self.resize(raster, size))
            .collect::<Vec<_>>();
        timings.resize += resize_start.elapsed();

        let mut ico_frames = Vec::new();
        for frame in frames {
            self.advance(stage, PipelineStage::Resizing(frame.edge));
            let emit_start = Instant::now();
            self.emit_sized_png(&frame, output_dir, manifest)?;
            timings.emit += emit_start.elapsed();
            self.advance(stage, PipelineStage::Emitted(frame.edge));

            if frame.edge <= ICO_MAX_EDGE {
                ico_frames.push(frame);
            }
        }

        Ok(ico_frames)
    }

    fn emit_sized_png(
        &self,
        frame: &RenderedFrame,
        output_dir: &Path,
        manifest: &mut AssetManifest,
    ) -> Result<(), FaviconError> {
        let path = output_dir.join(sized_png_name(frame.edge));
        self.emit_png(frame, &path)?;
        manifest.insert(format!("png_{}", frame.edge), path);
        Ok(())
    }
}

/// 便捷入口：`generate(input, output_dir?, sizes?)`，其余参数取默认值。
pub fn generate(
    input: impl AsRef<Path>,
    output_dir: Option<PathBuf>,
    sizes: Option<Vec<u32>>,
) -> Result<AssetManifest, FaviconError> {
    let mut config = FaviconConfig {
        output_dir,
        ..FaviconConfig::default()
    };
    if let Some(sizes) = sizes {
        config.sizes = sizes;
    }

    FaviconGenerator::new(config).generate(input.as_ref())
}
