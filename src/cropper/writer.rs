//! # 输出写入模块
//!
//! 每个成功处理的输入写出一个 `<原文件名去扩展名>.png`，输出目录不存在时自动创建。

use std::fs;
use std::path::{Path, PathBuf};

use image::ImageFormat;

use super::{Canvas, CropError};

/// 计算输入文件对应的输出路径。
pub fn output_path(output_dir: &Path, input: &Path) -> Result<PathBuf, CropError> {
    let stem = input
        .file_stem()
        .ok_or_else(|| CropError::FileSystem(format!("无法解析文件名：{}", input.display())))?;

    let mut file_name = stem.to_os_string();
    file_name.push(".png");
    Ok(output_dir.join(file_name))
}

/// 将画布编码为 PNG 写入输出目录，返回写出的路径。
pub fn save_canvas(canvas: &Canvas, output_dir: &Path, input: &Path) -> Result<PathBuf, CropError> {
    fs::create_dir_all(output_dir).map_err(|e| {
        CropError::FileSystem(format!("创建输出目录 {} 失败：{}", output_dir.display(), e))
    })?;

    let path = output_path(output_dir, input)?;
    canvas
        .image
        .save_with_format(&path, ImageFormat::Png)
        .map_err(|e| CropError::Encode(format!("保存图片 {} 失败：{}", path.display(), e)))?;

    log::debug!(
        "💾 已写出 {}x{} RGBA 画布 - 路径: {}",
        canvas.image.width(),
        canvas.image.height(),
        path.display()
    );

    Ok(path)
}
