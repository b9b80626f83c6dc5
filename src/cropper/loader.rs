//! # 加载与校验模块
//!
//! ## 设计思路
//!
//! 统一处理输入目录扫描与源图读取，并在“尽可能早”的阶段执行输入校验。
//! 目标是尽快失败，减少不必要内存与 CPU 消耗；任何失败都只跳过当前文件。
//!
//! ## 实现思路
//!
//! - 目录：只取一层普通文件，扩展名（不区分大小写）为 jpg / jpeg / png，按文件名排序。
//! - 文件：存在性 + 文件签名（magic bytes）+ 完整解码；体积与头部尺寸上限仅在配置时检查。
//! - 解码结果统一降为 3 通道颜色，原图 alpha 不参与后续处理。

use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::{DynamicImage, GenericImageView, ImageReader};

use super::{CropConfig, CropError, CropHandler};

const SUPPORTED_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// 扫描输入目录，返回按文件名排序的待处理图片路径。
pub fn discover_inputs(dir: &Path) -> Result<Vec<PathBuf>, CropError> {
    let entries = fs::read_dir(dir).map_err(|e| {
        CropError::FileSystem(format!("无法读取输入目录 {}：{}", dir.display(), e))
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry =
            entry.map_err(|e| CropError::FileSystem(format!("无法读取目录项：{}", e)))?;
        let path = entry.path();
        if path.is_file() && has_supported_extension(&path) {
            files.push(path);
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    log::debug!("📂 发现 {} 个待处理图片 - 目录: {}", files.len(), dir.display());

    Ok(files)
}

fn has_supported_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            SUPPORTED_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

impl CropHandler {
    /// 从本地路径读取并解码源图。
    pub(super) fn load_source(
        &self,
        path: &Path,
        config: &CropConfig,
    ) -> Result<DynamicImage, CropError> {
        log::info!("📁 开始读取本地图片 - 路径: {}", path.display());

        if !path.exists() {
            return Err(CropError::Load(format!("文件不存在：{}", path.display())));
        }

        let metadata = fs::metadata(path)
            .map_err(|e| CropError::Load(format!("无法读取文件信息：{}", e)))?;

        if let Some(max_file_size) = config.max_file_size {
            if metadata.len() > max_file_size {
                return Err(CropError::ResourceLimit(format!(
                    "文件过大：{:.2} MB（限制：{:.2} MB）",
                    metadata.len() as f64 / 1024.0 / 1024.0,
                    max_file_size as f64 / 1024.0 / 1024.0
                )));
            }
        }

        let bytes =
            fs::read(path).map_err(|e| CropError::Load(format!("无法读取图片文件：{}", e)))?;
        Self::validate_image_signature(&bytes)?;

        let (header_width, header_height) = Self::inspect_dimensions_from_memory(&bytes)?;
        Self::validate_pixel_limits(config, header_width, header_height)?;

        let decoded = Self::decode_without_limits(&bytes)?;

        let (width, height) = decoded.dimensions();
        if width == 0 || height == 0 {
            return Err(CropError::Load(format!("图片尺寸为空：{}x{}", width, height)));
        }
        Self::validate_pixel_limits(config, width, height)?;

        Ok(DynamicImage::ImageRgb8(decoded.to_rgb8()))
    }

    /// 通过文件签名（magic bytes）校验输入是否为图片。
    fn validate_image_signature(bytes: &[u8]) -> Result<(), CropError> {
        if bytes.is_empty() {
            return Err(CropError::Load("图片内容为空".to_string()));
        }

        let kind = infer::get(bytes)
            .ok_or_else(|| CropError::Load("无法识别图片类型".to_string()))?;

        if kind.matcher_type() != infer::MatcherType::Image {
            return Err(CropError::Load(format!(
                "文件签名不是图片类型：{}",
                kind.mime_type()
            )));
        }

        Ok(())
    }

    /// 仅通过图片头信息读取宽高，用于在完整解码前做尺寸限制检查。
    fn inspect_dimensions_from_memory(bytes: &[u8]) -> Result<(u32, u32), CropError> {
        ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| CropError::Load(format!("无法识别图片格式：{}", e)))?
            .into_dimensions()
            .map_err(|e| CropError::Load(format!("无法读取图片尺寸：{}", e)))
    }

    /// 完整解码。尺寸上限只由 `CropConfig` 决定，解码器自带的内存上限关闭。
    fn decode_without_limits(bytes: &[u8]) -> Result<DynamicImage, CropError> {
        let mut reader = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| CropError::Load(format!("无法识别图片格式：{}", e)))?;
        reader.no_limits();

        reader
            .decode()
            .map_err(|e| CropError::Load(format!("图片解码失败：{}", e)))
    }

    /// 校验像素数量与预计解码内存是否超过配置上限（未配置的上限不检查）。
    fn validate_pixel_limits(config: &CropConfig, width: u32, height: u32) -> Result<(), CropError> {
        let pixels = (width as u64)
            .checked_mul(height as u64)
            .ok_or_else(|| CropError::ResourceLimit("图片像素数溢出".to_string()))?;

        if let Some(max_pixels) = config.max_decoded_pixels {
            if pixels > max_pixels {
                return Err(CropError::ResourceLimit(format!(
                    "图片像素过大：{} 像素（限制：{} 像素）",
                    pixels, max_pixels
                )));
            }
        }

        if let Some(max_bytes) = config.max_decoded_bytes {
            let estimated = pixels
                .checked_mul(4)
                .ok_or_else(|| CropError::ResourceLimit("图片解码内存估算溢出".to_string()))?;

            if estimated > max_bytes {
                return Err(CropError::ResourceLimit(format!(
                    "图片解码预计内存过大：{:.2} MB（限制：{:.2} MB）",
                    estimated as f64 / 1024.0 / 1024.0,
                    max_bytes as f64 / 1024.0 / 1024.0
                )));
            }
        }

        Ok(())
    }
}
