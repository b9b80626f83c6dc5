//! # 裁剪处理模块（cropper）
//!
//! ## 设计思路
//!
//! 该模块将“目录扫描 → 加载校验 → 显示与框选 → 画布归一化 → 写出 PNG”
//! 按职责拆分为多个子模块，避免单文件膨胀与耦合。
//!
//! - `handler`：编排单张图片与整批处理
//! - `loader`：负责目录扫描、文件读取与安全校验
//! - `selector`：框选能力接口与各类实现（脚本 / 回放 / 终端 / 记录）
//! - `pipeline`：负责显示图缩放、区域提取与画布归一化
//! - `writer`：负责输出路径与 PNG 写入
//! - `config/error/geometry`：配置、错误、几何模型
//!
//! ## 新同事快速上手
//!
//! 可以按下面顺序理解调用链：
//!
//! ```text
//! main.rs（命令行解析）
//!    ↓
//! handler.rs::run_batch（逐文件、只尝试一次）
//!    ├─ loader.rs（扫描 + 读取 + 校验）
//!    ├─ pipeline.rs::prepare_display（显示图）
//!    ├─ selector.rs（框选，零矩形 = 跳过）
//!    ├─ pipeline.rs::normalize（scale_and_pad / pad_only）
//!    └─ writer.rs（写出 <文件名>.png）
//!    ↓
//! 每个文件一行输出，错误不会中断整批
//! ```

mod config;
mod error;
mod geometry;
mod handler;
mod loader;
mod pipeline;
mod selector;
mod writer;

pub use config::{CanvasMode, CropConfig, DISPLAY_MAX_DIMENSION};
pub use error::CropError;
pub use geometry::{DisplayScale, Placement, Rect};
pub use handler::{BatchSummary, CropHandler};
pub use loader::discover_inputs;
pub use pipeline::{
    Canvas, DisplayImage, extract_region, normalize, normalize_with_filter, prepare_display,
    scaled_size,
};
pub use selector::{
    PreviewGuard, PromptSelector, RecordingSelector, RegionSelector, RegionsFileSelector,
    ScriptedSelector, SelectionRequest, parse_rect,
};
pub use writer::{output_path, save_canvas};
