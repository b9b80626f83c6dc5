//! 统一错误类型模块
//!
//! # 设计思路
//!
//! 定义进程级的 `AppError` 枚举，承载批处理启动前后可能中止整个程序的错误，
//! 与只影响单张图片的 `CropError` 区分开。
//!
//! # 实现思路
//!
//! - 使用 `thiserror` 派生可读错误消息。
//! - 为 `CropError` 提供 `From` 转换，`main` 中直接使用 `?`；
//!   选区文件读写失败已由 `CropError::Selection` / `FileSystem` 携带路径上下文。

use crate::cropper::CropError;

/// 应用级统一错误类型
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// 裁剪链路错误（配置无效、输入目录不可读、选区文件无效等）
    #[error("{0}")]
    Crop(#[from] CropError),
}
