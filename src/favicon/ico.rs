//! # ICO 容器打包模块
//!
//! ## 设计思路
//!
//! 将多个独立尺寸的帧打包为单个多分辨率 `.ico` 文件。文件布局固定为：
//!
//! ```text
//! ┌──────────────┬──────────────────────────────┬──────────────────────────┐
//! │ ICONDIR (6B) │ ICONDIRENTRY × N (16B each)  │ PNG block × N            │
//! │ 0 | 1 | N    │ w h colors 0 planes bpp len  │ 与目录项同序、首尾相接   │
//! │              │ offset                       │                          │
//! └──────────────┴──────────────────────────────┴──────────────────────────┘
//! ```
//!
//! 所有整数为小端序。宽高各占 1 字节，存储值 0 表示 256。
//!
//! ## 实现思路
//!
//! 1. 过滤出边长 ≤ 256 的帧，保持生成顺序（不按尺寸重排）
//! 2. 每帧先独立编码为完整 PNG，拿到确切长度
//! 3. 由 `头部 + 全部目录项 + 之前所有块长度` 累加出每块偏移
//! 4. 依次序列化头部、目录、数据块，一次性写盘
//!
//! 相同的帧序列总是得到逐字节相同的容器。

use std::path::Path;

use super::config::ICO_MAX_EDGE;
use super::png_writer::write_file;
use super::source::RenderedFrame;
use super::{FaviconError, FaviconGenerator};

/// `ICONDIR` 头部长度。
pub const ICO_HEADER_LEN: usize = 6;
/// 单个 `ICONDIRENTRY` 长度。
pub const ICO_DIR_ENTRY_LEN: usize = 16;

const RESOURCE_TYPE_ICON: u16 = 1;
const PLANES: u16 = 1;
const BITS_PER_PIXEL: u16 = 32;

/// 容器中的一条目录项。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IconDirEntry {
    /// 帧宽度（已将存储值 0 还原为 256）。
    pub width: u32,
    /// 帧高度（已将存储值 0 还原为 256）。
    pub height: u32,
    /// 调色板颜色数，真彩色帧固定为 0。
    pub color_count: u8,
    pub planes: u16,
    pub bit_count: u16,
    /// 内嵌数据块长度（字节）。
    pub data_length: u32,
    /// 内嵌数据块在文件中的偏移（字节）。
    pub data_offset: u32,
}

impl IconDirEntry {
    fn for_block(edge: u32, data_length: u32, data_offset: u32) -> Self {
        Self {
            width: edge,
            height: edge,
            color_count: 0,
            planes: PLANES,
            bit_count: BITS_PER_PIXEL,
            data_length,
            data_offset,
        }
    }

    /// 宽高的单字节存储值：256 存为 0。
    pub fn stored_dimension(value: u32) -> u8 {
        if value >= ICO_MAX_EDGE {
            0
        } else {
            value as u8
        }
    }

    /// 将单字节存储值还原为像素边长。
    pub fn resolve_dimension(stored: u8) -> u32 {
        if stored == 0 {
            ICO_MAX_EDGE
        } else {
            stored as u32
        }
    }

    fn write_to(&self, out: &mut Vec<u8>) {
        out.push(Self::stored_dimension(self.width));
        out.push(Self::stored_dimension(self.height));
        out.push(self.color_count);
        out.push(0);
        out.extend_from_slice(&self.planes.to_le_bytes());
        out.extend_from_slice(&self.bit_count.to_le_bytes());
        out.extend_from_slice(&self.data_length.to_le_bytes());
        out.extend_from_slice(&self.data_offset.to_le_bytes());
    }

    fn read_from(raw: &[u8]) -> Self {
        Self {
            width: Self::resolve_dimension(raw[0]),
            height: Self::resolve_dimension(raw[1]),
            color_count: raw[2],
            planes: u16::from_le_bytes([raw[4], raw[5]]),
            bit_count: u16::from_le_bytes([raw[6], raw[7]]),
            data_length: u32::from_le_bytes([raw[8], raw[9], raw[10], raw[11]]),
            data_offset: u32::from_le_bytes([raw[12], raw[13], raw[14], raw[15]]),
        }
    }
}

/// 容器目录：帧数即 `entries.len()`。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconDirectory {
    pub entries: Vec<IconDirEntry>,
}

impl IconDirectory {
    pub fn frame_count(&self) -> usize {
        self.entries.len()
    }

    /// 从容器字节读回目录，并校验每个数据块都落在文件范围内。
    pub fn parse(bytes: &[u8]) -> Result<Self, FaviconError> {
        if bytes.len() < ICO_HEADER_LEN {
            return Err(FaviconError::Decode(format!(
                "ICO 头部不完整：仅 {} 字节",
                bytes.len()
            )));
        }

        let reserved = u16::from_le_bytes([bytes[0], bytes[1]]);
        let resource_type = u16::from_le_bytes([bytes[2], bytes[3]]);
        let count = u16::from_le_bytes([bytes[4], bytes[5]]) as usize;

        if reserved != 0 || resource_type != RESOURCE_TYPE_ICON {
            return Err(FaviconError::Decode(format!(
                "不是 ICO 容器：reserved={} type={}",
                reserved, resource_type
            )));
        }

        let directory_end = ICO_HEADER_LEN + count * ICO_DIR_ENTRY_LEN;
        if bytes.len() < directory_end {
            return Err(FaviconError::Decode(format!(
                "ICO 目录不完整：声明 {} 帧，需要 {} 字节，实际 {} 字节",
                count,
                directory_end,
                bytes.len()
            )));
        }

        let entries = bytes[ICO_HEADER_LEN..directory_end]
            .chunks_exact(ICO_DIR_ENTRY_LEN)
            .map(IconDirEntry::read_from)
            .collect::<Vec<_>>();

        for (index, entry) in entries.iter().enumerate() {
            let end = entry.data_offset as u64 + entry.data_length as u64;
            if (entry.data_offset as usize) < directory_end || end > bytes.len() as u64 {
                return Err(FaviconError::Decode(format!(
                    "第 {} 帧数据越界：offset={} length={} file={}",
                    index,
                    entry.data_offset,
                    entry.data_length,
                    bytes.len()
                )));
            }
        }

        Ok(Self { entries })
    }

    /// 取出某一帧的内嵌数据块。
    pub fn frame_data<'a>(&self, bytes: &'a [u8], index: usize) -> Option<&'a [u8]> {
        let entry = self.entries.get(index)?;
        let start = entry.data_offset as usize;
        bytes.get(start..start + entry.data_length as usize)
    }
}

/// 由已编码的块组装容器。`blocks` 的顺序即目录顺序。
fn assemble(blocks: &[(u32, Vec<u8>)]) -> Result<(Vec<u8>, IconDirectory), FaviconError> {
    let count = u16::try_from(blocks.len())
        .map_err(|_| FaviconError::Encode(format!("帧数过多：{}", blocks.len())))?;

    let mut offset = ICO_HEADER_LEN + blocks.len() * ICO_DIR_ENTRY_LEN;
    let mut entries = Vec::with_capacity(blocks.len());
    for (edge, block) in blocks {
        let data_length = u32::try_from(block.len())
            .map_err(|_| FaviconError::Encode(format!("{0}x{0} 数据块过大", edge)))?;
        let data_offset = u32::try_from(offset)
            .map_err(|_| FaviconError::Encode("ICO 文件超过 4GB 偏移上限".to_string()))?;

        entries.push(IconDirEntry::for_block(*edge, data_length, data_offset));
        offset += block.len();
    }

    let mut out = Vec::with_capacity(offset);
    out.extend_from_slice(&0u16.to_le_bytes());
    out.extend_from_slice(&RESOURCE_TYPE_ICON.to_le_bytes());
    out.extend_from_slice(&count.to_le_bytes());
    for entry in &entries {
        entry.write_to(&mut out);
    }
    for (_, block) in blocks {
        out.extend_from_slice(block);
    }

    debug_assert_eq!(out.len(), offset);
    Ok((out, IconDirectory { entries }))
}

impl FaviconGenerator {
    /// 将帧序列编码为 ICO 容器字节。
    pub fn encode_ico(
        &self,
        frames: &[RenderedFrame],
    ) -> Result<(Vec<u8>, IconDirectory), FaviconError> {
        let eligible = frames
            .iter()
            .filter(|frame| frame.edge <= ICO_MAX_EDGE)
            .collect::<Vec<_>>();

        if eligible.is_empty() {
            return Err(FaviconError::NoEligibleFrames(format!(
                "{} 个帧中没有边长 ≤ {} 的帧",
                frames.len(),
                ICO_MAX_EDGE
            )));
        }

        let blocks = eligible
            .into_iter()
            .map(|frame| Ok((frame.edge, self.encode_png(frame)?)))
            .collect::<Result<Vec<_>, FaviconError>>()?;

        assemble(&blocks)
    }

    /// 打包并写入 `.ico` 文件，返回写入的目录以便记录日志与测试。
    pub fn pack_ico(
        &self,
        frames: &[RenderedFrame],
        path: &Path,
    ) -> Result<IconDirectory, FaviconError> {
        let (bytes, directory) = self.encode_ico(frames)?;
        write_file(path, &bytes)?;

        log::info!(
            "✓ 已生成: {}（包含尺寸: {}，{} 字节）",
            path.display(),
            directory
                .entries
                .iter()
                .map(|entry| format!("{}x{}", entry.width, entry.height))
                .collect::<Vec<_>>()
                .join(", "),
            bytes.len()
        );

        Ok(directory)
    }
}
