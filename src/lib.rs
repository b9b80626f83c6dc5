//! # 手动裁剪工具 — 库入口
//!
//! ## 架构总览
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                 命令行 (clap, main.rs)                    │
//! │   input  output  --size  --mode  --regions  --record      │
//! └───────┬──────────────────────────────────────────────────┘
//!         ↓ CropConfig + RegionSelector
//! ┌───────┼──────────────────────────────────────────────────┐
//! │       ↓            库 (Rust)                              │
//! │                                                          │
//! │  ┌─ error ────── AppError (进程级错误)                    │
//! │  │                                                       │
//! │  └─ cropper ──── 逐文件处理，错误只跳过当前文件           │
//! │      ├─ loader     目录扫描 / 读取 / 签名校验              │
//! │      ├─ selector   框选接口 + PreviewGuard (RAII)         │
//! │      ├─ pipeline   显示图 / 区域提取 / 画布归一化          │
//! │      └─ writer     <文件名>.png                           │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## 模块职责
//!
//! | 模块 | 职责 |
//! |------|------|
//! | [`error`] | 统一错误类型 `AppError`，`main` 的返回类型 |
//! | [`cropper`] | 框选、归一化到固定尺寸透明画布、批处理驱动 |

pub mod cropper;
pub mod error;
