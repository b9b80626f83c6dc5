//! # 手动裁剪工具 — 应用入口
//!
//! 本文件仅负责日志初始化、命令行解析与选择器装配。
//! 业务逻辑分布在 `cropper` 子模块中，详见 `lib.rs` 架构文档。

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use flag_cropper::cropper::{
    BatchSummary, CanvasMode, CropConfig, CropError, CropHandler, PromptSelector,
    RecordingSelector, RegionSelector, RegionsFileSelector,
};
use flag_cropper::error::AppError;

#[derive(Parser)]
#[command(name = "flag-cropper")]
#[command(version, about = "Manually crop images onto fixed-size transparent PNG canvases", long_about = None)]
struct Cli {
    /// Input folder of images (.jpg, .jpeg, .png)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output folder for cropped PNGs (created if absent)
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Target square size
    #[arg(long, value_name = "PX", default_value_t = 512, value_parser = clap::value_parser!(u32).range(1..))]
    size: u32,

    /// Padding mode: scale and center, or just center
    #[arg(long, value_name = "MODE", default_value = "scale_and_pad", value_parser = parse_mode)]
    mode: CanvasMode,

    /// Replay selections from a JSON file instead of prompting
    #[arg(long, value_name = "FILE")]
    regions: Option<PathBuf>,

    /// Save the selections made during this run to a JSON file
    #[arg(long, value_name = "FILE")]
    record: Option<PathBuf>,
}

fn parse_mode(value: &str) -> Result<CanvasMode, CropError> {
    value.parse()
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(summary) => {
            log::debug!("批处理统计: {:?}", summary);
            ExitCode::SUCCESS
        }
        Err(err) => {
            log::error!("批处理中止: {err}");
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<BatchSummary, AppError> {
    let handler = CropHandler::new(CropConfig::square(cli.size, cli.mode))?;
    log::info!(
        "⚙️ 画布 {}x{} mode={} - 输入: {} 输出: {}",
        cli.size,
        cli.size,
        cli.mode,
        cli.input.display(),
        cli.output.display()
    );

    let selector: Box<dyn RegionSelector> = match &cli.regions {
        Some(path) => Box::new(RegionsFileSelector::from_path(path)?),
        None => Box::new(PromptSelector::new(
            io::stdin().lock(),
            io::stdout(),
            std::env::temp_dir(),
        )),
    };

    let mut stdout = io::stdout();
    match &cli.record {
        Some(record_path) => {
            let mut recorder = RecordingSelector::new(selector);
            let summary = handler.run_batch(&cli.input, &cli.output, &mut recorder, &mut stdout)?;
            recorder.save(record_path)?;
            Ok(summary)
        }
        None => {
            let mut selector = selector;
            Ok(handler.run_batch(&cli.input, &cli.output, &mut selector, &mut stdout)?)
        }
    }
}
