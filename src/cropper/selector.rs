//! # 选区交互模块
//!
//! ## 设计思路
//!
//! 人工框选是整条链路里唯一会阻塞等待的一步，这里把它抽象为 `RegionSelector` 能力接口：
//! 输入显示图，返回显示坐标中的矩形，或 `Rect::ZERO` 表示“没有选择”。
//! 批处理驱动只依赖该接口，测试可直接注入脚本化的选择器，无需任何显示设备。
//!
//! ## 实现思路
//!
//! - `ScriptedSelector`：按顺序返回预置矩形，用于测试与自动化。
//! - `RegionsFileSelector`：从 JSON 文件回放选区（`{"文件名": [x, y, w, h]}`）。
//! - `PromptSelector`：终端交互，显示图写到临时预览文件，由 `PreviewGuard` RAII 保证清理。
//! - `RecordingSelector`：装饰任意选择器，记录选区并可保存为回放文件。

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::fs;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use image::{DynamicImage, GenericImageView, ImageFormat};

use super::CropError;
use super::geometry::Rect;

/// 一次框选请求。
pub struct SelectionRequest<'a> {
    /// 源文件名（不含目录），用于提示与回放匹配。
    pub name: &'a str,
    /// 已按最大显示边长缩放的显示图。
    pub display: &'a DynamicImage,
}

/// 区域选择能力。
pub trait RegionSelector {
    /// 返回显示坐标中的矩形；`Rect::ZERO`（或任一边为 0）表示跳过。
    fn select(&mut self, request: &SelectionRequest<'_>) -> Result<Rect, CropError>;
}

impl<S: RegionSelector + ?Sized> RegionSelector for Box<S> {
    fn select(&mut self, request: &SelectionRequest<'_>) -> Result<Rect, CropError> {
        (**self).select(request)
    }
}

/// 按预置顺序返回矩形的选择器，队列耗尽后一律返回 `Rect::ZERO`。
#[derive(Debug, Default)]
pub struct ScriptedSelector {
    queue: VecDeque<Rect>,
    requested: Vec<String>,
}

impl ScriptedSelector {
    pub fn new(rects: impl IntoIterator<Item = Rect>) -> Self {
        Self {
            queue: rects.into_iter().collect(),
            requested: Vec::new(),
        }
    }

    /// 已收到请求的文件名，按请求顺序排列。
    pub fn requested(&self) -> &[String] {
        &self.requested
    }
}

impl RegionSelector for ScriptedSelector {
    fn select(&mut self, request: &SelectionRequest<'_>) -> Result<Rect, CropError> {
        self.requested.push(request.name.to_string());
        Ok(self.queue.pop_front().unwrap_or(Rect::ZERO))
    }
}

/// 从 JSON 文件回放选区的选择器。
#[derive(Debug, Clone, Default)]
pub struct RegionsFileSelector {
    regions: HashMap<String, Rect>,
}

impl RegionsFileSelector {
    pub fn from_path(path: &Path) -> Result<Self, CropError> {
        let content = fs::read_to_string(path).map_err(|e| {
            CropError::Selection(format!("读取选区文件 {} 失败：{}", path.display(), e))
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, CropError> {
        let regions = serde_json::from_str::<HashMap<String, Rect>>(content)
            .map_err(|e| CropError::Selection(format!("解析选区文件失败：{}", e)))?;
        log::info!("📄 已加载 {} 条回放选区", regions.len());
        Ok(Self { regions })
    }
}

impl RegionSelector for RegionsFileSelector {
    fn select(&mut self, request: &SelectionRequest<'_>) -> Result<Rect, CropError> {
        match self.regions.get(request.name) {
            Some(rect) => Ok(*rect),
            None => {
                log::debug!("⏭️ 回放文件中没有 {} 的选区", request.name);
                Ok(Rect::ZERO)
            }
        }
    }
}

/// 显示图预览文件的 RAII 守卫。
///
/// 构造时写出预览 PNG，`Drop` 时删除，无论本次框选成功、跳过还是出错。
pub struct PreviewGuard {
    path: PathBuf,
}

impl PreviewGuard {
    pub fn create(dir: &Path, display: &DynamicImage) -> Result<Self, CropError> {
        let path = dir.join(format!(".flag-cropper-preview-{}.png", std::process::id()));
        display
            .save_with_format(&path, ImageFormat::Png)
            .map_err(|e| CropError::Selection(format!("写出预览图失败：{}", e)))?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for PreviewGuard {
    fn drop(&mut self) {
        if let Err(err) = fs::remove_file(&self.path) {
            log::warn!("清理预览图 {} 失败: {err}", self.path.display());
        }
    }
}

/// 终端交互选择器。
///
/// 把显示图写到预览文件供用户查看，再从输入读取 `x,y,w,h`（逗号或空白分隔）。
/// 空行、`s`、`skip` 或输入结束（EOF）均视为跳过。
pub struct PromptSelector<R, W> {
    reader: R,
    writer: W,
    preview_dir: PathBuf,
}

impl<R: BufRead, W: Write> PromptSelector<R, W> {
    pub fn new(reader: R, writer: W, preview_dir: impl Into<PathBuf>) -> Self {
        Self {
            reader,
            writer,
            preview_dir: preview_dir.into(),
        }
    }

    fn prompt(&mut self, message: &str) -> Result<Option<String>, CropError> {
        write!(self.writer, "{}", message).map_err(Self::io_error)?;
        self.writer.flush().map_err(Self::io_error)?;

        let mut line = String::new();
        let read = self.reader.read_line(&mut line).map_err(Self::io_error)?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn io_error(err: std::io::Error) -> CropError {
        CropError::Selection(format!("终端读写失败：{}", err))
    }
}

impl<R: BufRead, W: Write> RegionSelector for PromptSelector<R, W> {
    fn select(&mut self, request: &SelectionRequest<'_>) -> Result<Rect, CropError> {
        let guard = PreviewGuard::create(&self.preview_dir, request.display)?;
        let (width, height) = request.display.dimensions();

        writeln!(
            self.writer,
            "Select region for {} - preview: {} ({}x{})",
            request.name,
            guard.path().display(),
            width,
            height
        )
        .map_err(Self::io_error)?;

        loop {
            let Some(line) = self.prompt("x,y,w,h (empty or 's' to skip): ")? else {
                return Ok(Rect::ZERO);
            };

            if line.is_empty() || line.eq_ignore_ascii_case("s") || line.eq_ignore_ascii_case("skip")
            {
                return Ok(Rect::ZERO);
            }

            match parse_rect(&line) {
                Some(rect) => return Ok(rect),
                None => {
                    writeln!(self.writer, "Could not parse '{}', expected four integers", line)
                        .map_err(Self::io_error)?;
                }
            }
        }
    }
}

/// 解析 `x,y,w,h`，逗号与空白都可作为分隔符。
pub fn parse_rect(input: &str) -> Option<Rect> {
    let values = input
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .map(str::parse::<u32>)
        .collect::<Result<Vec<_>, _>>()
        .ok()?;

    match values.as_slice() {
        [x, y, width, height] => Some(Rect::new(*x, *y, *width, *height)),
        _ => None,
    }
}

/// 记录选区的装饰器，保存结果可直接被 `RegionsFileSelector` 回放。
pub struct RecordingSelector<S> {
    inner: S,
    recorded: BTreeMap<String, Rect>,
}

impl<S: RegionSelector> RecordingSelector<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            recorded: BTreeMap::new(),
        }
    }

    pub fn recorded(&self) -> &BTreeMap<String, Rect> {
        &self.recorded
    }

    pub fn save(&self, path: &Path) -> Result<(), CropError> {
        let content = serde_json::to_string_pretty(&self.recorded)
            .map_err(|e| CropError::Selection(format!("序列化选区失败：{}", e)))?;
        fs::write(path, content).map_err(|e| {
            CropError::FileSystem(format!("写入选区文件 {} 失败：{}", path.display(), e))
        })?;
        log::info!("📝 已保存 {} 条选区 - 路径: {}", self.recorded.len(), path.display());
        Ok(())
    }
}

impl<S: RegionSelector> RegionSelector for RecordingSelector<S> {
    fn select(&mut self, request: &SelectionRequest<'_>) -> Result<Rect, CropError> {
        let rect = self.inner.select(request)?;
        if !rect.is_empty() {
            self.recorded.insert(request.name.to_string(), rect);
        }
        Ok(rect)
    }
}
