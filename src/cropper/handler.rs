//! # 核心编排模块
//!
//! ## 设计思路
//!
//! `CropHandler` 只负责流程编排与配置持有，不直接与终端或窗口绑定。
//! 单张图片的处理链路固定为：
//! 1. 加载并校验源图
//! 2. 生成显示图并请求框选
//! 3. 零矩形直接短路为“跳过”，不会进入归一化
//! 4. 选区换算回原图坐标、截断越界部分、取出区域
//! 5. 归一化到目标画布并写出 PNG
//!
//! ## 实现思路
//!
//! - 批处理逐个文件串行执行，每个文件只尝试一次，任何错误都只影响当前文件。
//! - 每个结果向输出流打印一行（Cropping / Skipped / Saved / Failed）。
//! - 记录 `load/select/normalize/write/total` 阶段耗时，便于性能诊断。

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

use super::pipeline::{extract_region, normalize_with_filter, prepare_display};
use super::selector::{RegionSelector, SelectionRequest};
use super::writer::save_canvas;
use super::{CropConfig, CropError, discover_inputs};

/// 批处理统计。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// 尝试处理的文件数。
    pub processed: usize,
    pub saved: usize,
    /// 用户未框选而跳过的文件数。
    pub skipped: usize,
    pub failed: usize,
}

/// 裁剪处理器。
pub struct CropHandler {
    config: CropConfig,
}

impl CropHandler {
    /// 根据配置创建处理器，配置无效时直接拒绝。
    ///
    /// # 示例
    /// ```rust
    /// use flag_cropper::cropper::{CanvasMode, CropConfig, CropHandler};
    ///
    /// let handler = CropHandler::new(CropConfig::square(512, CanvasMode::PadOnly))?;
    /// assert_eq!(handler.config().target_width, 512);
    /// # Ok::<(), flag_cropper::cropper::CropError>(())
    /// ```
    pub fn new(config: CropConfig) -> Result<Self, CropError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &CropConfig {
        &self.config
    }

    /// 处理单张图片，成功时返回写出的 PNG 路径。
    pub fn process_file(
        &self,
        path: &Path,
        output_dir: &Path,
        selector: &mut dyn RegionSelector,
    ) -> Result<PathBuf, CropError> {
        let config = &self.config;
        let total_start = Instant::now();

        let load_start = Instant::now();
        let source = self.load_source(path, config)?;
        let load_elapsed = load_start.elapsed();

        let select_start = Instant::now();
        let display =
            prepare_display(&source, config.display_max_dimension, config.resize_filter)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let selected = selector.select(&SelectionRequest {
            name: &name,
            display: &display.image,
        })?;
        let select_elapsed = select_start.elapsed();

        if selected.is_empty() {
            log::debug!("⏭️ 未框选区域 - 文件: {}", name);
            return Err(CropError::NoSelection);
        }

        let normalize_start = Instant::now();
        let source_rect = display.scale.to_source(selected);
        log::debug!(
            "📐 选区换算：显示 {} -> 原图 {}（scale={:.4}）",
            selected,
            source_rect,
            display.scale.value()
        );
        let region = extract_region(&source, source_rect)?;
        let canvas = normalize_with_filter(
            &region,
            config.mode,
            config.target_width,
            config.target_height,
            config.resize_filter,
        )?;
        let normalize_elapsed = normalize_start.elapsed();

        let write_start = Instant::now();
        let written = save_canvas(&canvas, output_dir, path)?;
        let write_elapsed = write_start.elapsed();

        log::info!(
            "✅ 图片处理完成 - mode={} load={}ms select={}ms normalize={}ms write={}ms total={}ms",
            config.mode,
            load_elapsed.as_millis(),
            select_elapsed.as_millis(),
            normalize_elapsed.as_millis(),
            write_elapsed.as_millis(),
            total_start.elapsed().as_millis()
        );

        Ok(written)
    }

    /// 处理输入目录中的全部图片。
    ///
    /// 只有输入目录本身不可读时返回错误；单个文件的失败会被打印并计数，然后继续。
    pub fn run_batch<W: Write>(
        &self,
        input_dir: &Path,
        output_dir: &Path,
        selector: &mut dyn RegionSelector,
        out: &mut W,
    ) -> Result<BatchSummary, CropError> {
        let inputs = discover_inputs(input_dir)?;
        let mut summary = BatchSummary::default();

        for path in inputs {
            summary.processed += 1;
            report(out, format_args!("Cropping: {}", path.display()));

            match self.process_file(&path, output_dir, selector) {
                Ok(written) => {
                    summary.saved += 1;
                    report(out, format_args!("Saved: {}", written.display()));
                }
                Err(err) if err.is_skip() => {
                    summary.skipped += 1;
                    report(out, format_args!("Skipped"));
                }
                Err(err) => {
                    summary.failed += 1;
                    log::warn!(
                        "⚠️ 处理失败 - 文件: {} code={} stage={}：{}",
                        path.display(),
                        err.code(),
                        err.stage(),
                        err
                    );
                    report(out, format_args!("Failed: {}: {}", path.display(), err));
                }
            }
        }

        log::info!(
            "📊 批处理结束 - processed={} saved={} skipped={} failed={}",
            summary.processed,
            summary.saved,
            summary.skipped,
            summary.failed
        );

        Ok(summary)
    }
}

fn report<W: Write>(out: &mut W, line: std::fmt::Arguments<'_>) {
    if let Err(err) = writeln!(out, "{}", line) {
        log::warn!("输出处理结果失败: {err}");
    }
}
