//! # 派生图标模块
//!
//! 与配置的尺寸列表无关、每次都会生成的两个固定尺寸图标：
//! 标准 `favicon.png`（32×32）与 `apple-touch-icon.png`（180×180）。

use std::path::Path;

use super::manifest::AssetManifest;
use super::source::SourceRaster;
use super::{FaviconError, FaviconGenerator};

/// 固定尺寸的派生图标。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DerivedAsset {
    Standard,
    AppleTouch,
}

impl DerivedAsset {
    pub const ALL: [DerivedAsset; 2] = [DerivedAsset::Standard, DerivedAsset::AppleTouch];

    pub fn label(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::AppleTouch => "apple",
        }
    }

    pub fn file_name(self) -> &'static str {
        match self {
            Self::Standard => "favicon.png",
            Self::AppleTouch => "apple-touch-icon.png",
        }
    }

    pub fn edge(self) -> u32 {
        match self {
            Self::Standard => 32,
            Self::AppleTouch => 180,
        }
    }
}

impl FaviconGenerator {
    /// 依次生成全部派生图标并登记到清单。
    pub(super) fn emit_derived(
        &self,
        raster: &SourceRaster,
        output_dir: &Path,
        manifest: &mut AssetManifest,
    ) -> Result<(), FaviconError> {
        for asset in DerivedAsset::ALL {
            let path = output_dir.join(asset.file_name());
            let frame = self.resize(raster, asset.edge());
            self.emit_png(&frame, &path)?;
            manifest.insert(asset.label(), path);
        }
        Ok(())
    }
}
