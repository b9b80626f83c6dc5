//! # 几何模型
//!
//! ## 设计思路
//!
//! 把“显示坐标 → 原图坐标 → 画布坐标”三次换算集中在这里，全部是纯整数/浮点运算，
//! 方便逐像素测试。所有取整一律向下（floor），与批处理结果的确定性直接相关。

use serde::{Deserialize, Serialize};

/// 整数像素矩形，原点在左上角。
///
/// 宽或高为 0 表示“没有选区”。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "[u32; 4]", into = "[u32; 4]")]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    /// 选区交互返回的“未选择”哨兵。
    pub const ZERO: Rect = Rect::new(0, 0, 0, 0);

    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// 与 `bounds_width x bounds_height` 的图像求交集。
    ///
    /// 越界部分被截掉；完全落在图像外时返回 `None`。
    pub fn clamp_to(&self, bounds_width: u32, bounds_height: u32) -> Option<Rect> {
        if self.x >= bounds_width || self.y >= bounds_height {
            return None;
        }

        let right = self.x.saturating_add(self.width).min(bounds_width);
        let bottom = self.y.saturating_add(self.height).min(bounds_height);
        let clamped = Rect::new(self.x, self.y, right - self.x, bottom - self.y);

        (!clamped.is_empty()).then_some(clamped)
    }
}

impl From<[u32; 4]> for Rect {
    fn from([x, y, width, height]: [u32; 4]) -> Self {
        Rect::new(x, y, width, height)
    }
}

impl From<Rect> for [u32; 4] {
    fn from(rect: Rect) -> Self {
        [rect.x, rect.y, rect.width, rect.height]
    }
}

impl std::fmt::Display for Rect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {}x{})", self.x, self.y, self.width, self.height)
    }
}

/// 显示缩放比例：显示坐标 = 原图坐标 × scale，且 `0 < scale <= 1`。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayScale {
    scale: f64,
    source_width: u32,
    source_height: u32,
}

impl DisplayScale {
    /// 按最大显示边长计算缩放比例，原图只会被缩小，不会被放大。
    ///
    /// 调用方保证宽高与 `max_dimension` 均为正数。
    pub fn fit(source_width: u32, source_height: u32, max_dimension: u32) -> Self {
        let max = max_dimension as f64;
        let scale = (max / source_width as f64)
            .min(max / source_height as f64)
            .min(1.0);

        Self {
            scale,
            source_width,
            source_height,
        }
    }

    pub fn value(&self) -> f64 {
        self.scale
    }

    /// 显示图尺寸（向下取整，至少 1 像素）。
    pub fn display_size(&self) -> (u32, u32) {
        (
            ((self.source_width as f64 * self.scale).floor() as u32).max(1),
            ((self.source_height as f64 * self.scale).floor() as u32).max(1),
        )
    }

    /// 把显示坐标中的矩形换算回原图坐标，每个分量 `floor(v / scale)`。
    pub fn to_source(&self, rect: Rect) -> Rect {
        let map = |v: u32| (v as f64 / self.scale).floor() as u32;
        Rect::new(map(rect.x), map(rect.y), map(rect.width), map(rect.height))
    }
}

/// 内容在画布中的左上角偏移。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub x: u32,
    pub y: u32,
}

impl Placement {
    /// 居中放置：`((target - size) // 2)`，调用方保证内容不超出画布。
    pub fn centered(target_width: u32, target_height: u32, width: u32, height: u32) -> Self {
        Self {
            x: (target_width - width) / 2,
            y: (target_height - height) / 2,
        }
    }
}
