//! # favicon-forge — 命令行入口
//!
//! 本文件仅负责日志初始化、参数解析与结果输出。
//! 业务逻辑位于 `favicon` 模块，详见 `lib.rs` 架构文档。

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use favicon_forge::error::AppError;
use favicon_forge::favicon::{FaviconConfig, FaviconGenerator, FitMode, parse_filter};
use favicon_forge::settings;

const EXAMPLES: &str = "\
使用示例:
  favicon-forge logo.png
  favicon-forge logo.png -o ./favicons
  favicon-forge logo.png -s 16 32 64 128
  favicon-forge logo.png -o ./output -s 16 32 48 --fit crop";

/// 将一张图片转换为多尺寸 favicon 资源
#[derive(Debug, Parser)]
#[command(name = "favicon-forge", version, after_help = EXAMPLES)]
struct Cli {
    /// 输入图片路径（PNG、JPG 等）
    input: PathBuf,

    /// 输出目录（默认：输入图片所在目录）
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// 要生成的尺寸（像素，默认：16 32 48 64 128 256）
    #[arg(short, long, num_args = 1.., value_delimiter = ',')]
    sizes: Option<Vec<u32>>,

    /// 非方形图片的适配方式：stretch / crop / letterbox
    #[arg(long)]
    fit: Option<String>,

    /// 重采样滤镜：nearest / triangle / catmullrom / gaussian / lanczos3
    #[arg(long)]
    filter: Option<String>,

    /// JSON 设置文件，命令行参数优先于其中的取值
    #[arg(long)]
    config: Option<PathBuf>,

    /// 并行重采样各尺寸
    #[arg(long)]
    parallel: bool,

    /// 以 JSON 输出生成清单
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn to_config(&self) -> Result<FaviconConfig, AppError> {
        let mut config = FaviconConfig::default();

        if let Some(path) = &self.config {
            settings::load_settings(path)?.apply(&mut config)?;
        }
        if let Some(dir) = &self.output {
            config.output_dir = Some(dir.clone());
        }
        if let Some(sizes) = &self.sizes {
            config.sizes = sizes.clone();
        }
        if let Some(mode) = &self.fit {
            config.fit_mode = FitMode::from_str(mode)?;
        }
        if let Some(filter) = &self.filter {
            config.resize_filter = parse_filter(filter)?;
        }
        if self.parallel {
            config.parallel_resize = true;
        }

        Ok(config)
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("\n❌ 错误: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), AppError> {
    let config = cli.to_config()?;
    log::info!("🎨 处理图片: {}", cli.input.display());

    let manifest = FaviconGenerator::new(config).generate(&cli.input)?;

    if cli.json {
        let json = serde_json::to_string_pretty(&manifest)
            .map_err(|e| AppError::Output(format!("序列化清单失败: {}", e)))?;
        println!("{json}");
        return Ok(());
    }

    println!("✅ 完成！共生成 {} 个文件：", manifest.len());
    for asset in manifest.iter() {
        println!("  {:<10} {}", asset.label, asset.path.display());
    }
    println!("\n💡 HTML 用法:");
    for line in manifest.html_snippet().lines() {
        println!("  {line}");
    }

    Ok(())
}
