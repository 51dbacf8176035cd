//! # 生成清单模块
//!
//! ## 设计思路
//!
//! 一次生成的结果以“标签 → 输出路径”的有序清单返回。
//! 同名标签再次登记时原位替换路径（重复尺寸写同一文件，后写覆盖先写），
//! 其余条目保持首次登记的顺序。

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::ser::Serializer;

/// 单个产物：标签（如 `png_32`、`ico`、`standard`、`apple`）与文件路径。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedAsset {
    pub label: String,
    pub path: PathBuf,
}

/// 有序产物清单。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetManifest {
    entries: Vec<GeneratedAsset>,
}

impl AssetManifest {
    pub(crate) fn insert(&mut self, label: impl Into<String>, path: PathBuf) {
        let label = label.into();
        match self.entries.iter_mut().find(|asset| asset.label == label) {
            Some(existing) => existing.path = path,
            None => self.entries.push(GeneratedAsset { label, path }),
        }
    }

    pub fn get(&self, label: &str) -> Option<&Path> {
        self.entries
            .iter()
            .find(|asset| asset.label == label)
            .map(|asset| asset.path.as_path())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &GeneratedAsset> {
        self.entries.iter()
    }

    pub fn labels(&self) -> Vec<&str> {
        self.entries.iter().map(|asset| asset.label.as_str()).collect()
    }

    /// 供网页 `<head>` 使用的 `<link>` 片段：ico、32×32 PNG 与 apple-touch 图标，
    /// 缺失的产物不输出对应行。其余尺寸的 PNG 不进入片段。
    pub fn html_snippet(&self) -> String {
        let mut lines = Vec::new();

        if let Some(path) = self.get("ico") {
            lines.push(format!(
                r#"<link rel="icon" type="image/x-icon" href="/{}">"#,
                file_name(path)
            ));
        }

        if let Some(path) = self.get("png_32") {
            lines.push(format!(
                r#"<link rel="icon" type="image/png" sizes="32x32" href="/{}">"#,
                file_name(path)
            ));
        }

        if let Some(path) = self.get("apple") {
            lines.push(format!(
                r#"<link rel="apple-touch-icon" sizes="180x180" href="/{}">"#,
                file_name(path)
            ));
        }

        lines.join("\n")
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// 序列化为按登记顺序排列的 JSON 对象。
impl Serialize for AssetManifest {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_map(
            self.entries
                .iter()
                .map(|asset| (asset.label.as_str(), asset.path.as_path())),
        )
    }
}
