//! # 画布归一化流水线
//!
//! ## 设计思路
//!
//! 这是整个工具唯一的“核心”：把用户选出的区域放进固定尺寸的透明画布。
//! 整个过程是内存中的纯变换，不做任何 I/O，所有读写由调用方负责。
//!
//! ## 实现思路
//!
//! 1. 区域统一转为 3 通道颜色（与颜色解码器一致，原 alpha 不参与）
//! 2. scale_and_pad：`ratio = min(tw / w, th / h)`，新尺寸向下取整后重采样
//! 3. pad_only：不重采样，超出画布直接报 `Oversize`（先检查，再分配画布）
//! 4. 分配全零（全透明）RGBA 画布，按向下取整的居中偏移写入，内容 alpha 置 255
//!
//! 重采样优先走 `fast_image_resize`，失败时回退 `image::imageops::resize`。

use fast_image_resize as fr;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, Rgb, RgbImage, Rgba, RgbaImage};

use super::geometry::{DisplayScale, Placement, Rect};
use super::{CanvasMode, CropError};

/// 归一化结果：目标尺寸的 RGBA 画布以及内容的放置信息。
#[derive(Debug, Clone)]
pub struct Canvas {
    /// 画布像素，尺寸恒为目标宽高，4 通道。
    pub image: RgbaImage,
    /// 内容左上角在画布中的偏移。
    pub offset: Placement,
    /// 内容实际占用的宽高。
    pub placed: (u32, u32),
}

/// 选区交互用的显示图及其缩放比例。
#[derive(Debug, Clone)]
pub struct DisplayImage {
    pub image: DynamicImage,
    pub scale: DisplayScale,
}

/// 使用默认（双线性）重采样执行归一化。
///
/// # 示例
/// ```rust
/// use flag_cropper::cropper::{normalize, CanvasMode};
/// use image::{DynamicImage, RgbImage};
///
/// let region = DynamicImage::ImageRgb8(RgbImage::new(800, 400));
/// let canvas = normalize(&region, CanvasMode::ScaleAndPad, 512, 512)?;
/// assert_eq!(canvas.placed, (512, 256));
/// assert_eq!((canvas.offset.x, canvas.offset.y), (0, 128));
/// # Ok::<(), flag_cropper::cropper::CropError>(())
/// ```
pub fn normalize(
    region: &DynamicImage,
    mode: CanvasMode,
    target_width: u32,
    target_height: u32,
) -> Result<Canvas, CropError> {
    normalize_with_filter(region, mode, target_width, target_height, FilterType::Triangle)
}

/// 按指定重采样滤镜执行归一化。
pub fn normalize_with_filter(
    region: &DynamicImage,
    mode: CanvasMode,
    target_width: u32,
    target_height: u32,
    filter: FilterType,
) -> Result<Canvas, CropError> {
    if target_width == 0 || target_height == 0 {
        return Err(CropError::InvalidConfig(format!(
            "目标画布尺寸必须为正数：{}x{}",
            target_width, target_height
        )));
    }

    let (width, height) = region.dimensions();
    if width == 0 || height == 0 {
        return Err(CropError::InvalidRegion(format!("区域为空：{}x{}", width, height)));
    }

    let content = match mode {
        CanvasMode::ScaleAndPad => {
            let (new_width, new_height) = scaled_size(width, height, target_width, target_height);
            let rgb = region.to_rgb8();
            if (new_width, new_height) == (width, height) {
                rgb
            } else {
                log::debug!(
                    "🧩 等比缩放：{}x{} -> {}x{}（filter={:?}）",
                    width,
                    height,
                    new_width,
                    new_height,
                    filter
                );
                resize_rgb(&rgb, new_width, new_height, filter)?
            }
        }
        CanvasMode::PadOnly => {
            if height > target_height || width > target_width {
                return Err(CropError::Oversize {
                    width,
                    height,
                    target_width,
                    target_height,
                });
            }
            region.to_rgb8()
        }
    };

    let (placed_width, placed_height) = content.dimensions();
    let offset = Placement::centered(target_width, target_height, placed_width, placed_height);

    let mut canvas = RgbaImage::new(target_width, target_height);
    for (x, y, Rgb([r, g, b])) in content.enumerate_pixels() {
        canvas.put_pixel(offset.x + x, offset.y + y, Rgba([*r, *g, *b, 255]));
    }

    Ok(Canvas {
        image: canvas,
        offset,
        placed: (placed_width, placed_height),
    })
}

/// scale_and_pad 的目标内容尺寸。
///
/// `ratio = min(tw / w, th / h)`，两边分别 `floor(w * ratio)` / `floor(h * ratio)`。
/// 极细长区域向下取整为 0 时抬到 1 像素。
pub fn scaled_size(width: u32, height: u32, target_width: u32, target_height: u32) -> (u32, u32) {
    let ratio = (target_width as f64 / width as f64).min(target_height as f64 / height as f64);

    let new_width = ((width as f64 * ratio).floor() as u32).clamp(1, target_width);
    let new_height = ((height as f64 * ratio).floor() as u32).clamp(1, target_height);

    (new_width, new_height)
}

/// 从原图中取出已换算、已裁边的矩形区域。
pub fn extract_region(source: &DynamicImage, rect: Rect) -> Result<DynamicImage, CropError> {
    let (width, height) = source.dimensions();
    let clamped = rect.clamp_to(width, height).ok_or_else(|| {
        CropError::InvalidRegion(format!("选区 {} 不在图像 {}x{} 范围内", rect, width, height))
    })?;

    if clamped != rect {
        log::debug!("✂️ 选区越界，已截断：{} -> {}", rect, clamped);
    }

    Ok(source.crop_imm(clamped.x, clamped.y, clamped.width, clamped.height))
}

/// 生成用于框选的显示图，最长边不超过 `max_dimension`。
pub fn prepare_display(
    source: &DynamicImage,
    max_dimension: u32,
    filter: FilterType,
) -> Result<DisplayImage, CropError> {
    let (width, height) = source.dimensions();
    let scale = DisplayScale::fit(width, height, max_dimension);
    let (display_width, display_height) = scale.display_size();

    if (display_width, display_height) == (width, height) {
        return Ok(DisplayImage {
            image: source.clone(),
            scale,
        });
    }

    log::debug!(
        "🖼️ 显示图缩放：{}x{} -> {}x{}（scale={:.4}）",
        width,
        height,
        display_width,
        display_height,
        scale.value()
    );

    let resized = resize_rgb(&source.to_rgb8(), display_width, display_height, filter)?;
    Ok(DisplayImage {
        image: DynamicImage::ImageRgb8(resized),
        scale,
    })
}

fn resize_rgb(
    image: &RgbImage,
    target_width: u32,
    target_height: u32,
    filter: FilterType,
) -> Result<RgbImage, CropError> {
    match resize_with_fast_image_resize(image, target_width, target_height, filter) {
        Ok(resized) => Ok(resized),
        Err(err) => {
            log::warn!("⚠️ fast_image_resize 重采样失败，回退 image::imageops::resize：{}", err);
            Ok(image::imageops::resize(image, target_width, target_height, filter))
        }
    }
}

fn resize_with_fast_image_resize(
    image: &RgbImage,
    target_width: u32,
    target_height: u32,
    filter: FilterType,
) -> Result<RgbImage, CropError> {
    let (src_width, src_height) = image.dimensions();

    let src_image = fr::images::Image::from_vec_u8(
        src_width,
        src_height,
        image.as_raw().clone(),
        fr::PixelType::U8x3,
    )
    .map_err(|e| CropError::ResourceLimit(format!("构建源图像缓冲失败：{}", e)))?;

    let mut dst_image = fr::images::Image::new(target_width, target_height, fr::PixelType::U8x3);

    let mut resizer = fr::Resizer::new();
    let options =
        fr::ResizeOptions::new().resize_alg(fr::ResizeAlg::Convolution(to_fast_filter(filter)));

    resizer
        .resize(&src_image, &mut dst_image, Some(&options))
        .map_err(|e| CropError::ResourceLimit(format!("fast_image_resize 执行失败：{}", e)))?;

    RgbImage::from_raw(target_width, target_height, dst_image.into_vec())
        .ok_or_else(|| CropError::ResourceLimit("fast_image_resize 输出缓冲长度异常".to_string()))
}

fn to_fast_filter(filter: FilterType) -> fr::FilterType {
    match filter {
        FilterType::Nearest => fr::FilterType::Box,
        FilterType::Triangle => fr::FilterType::Bilinear,
        FilterType::CatmullRom => fr::FilterType::CatmullRom,
        FilterType::Gaussian => fr::FilterType::Mitchell,
        FilterType::Lanczos3 => fr::FilterType::Lanczos3,
    }
}
