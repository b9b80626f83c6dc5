//! # 错误模型模块
//!
//! ## 设计思路
//!
//! 使用单一错误枚举承载裁剪链路中的所有错误来源，避免字符串拼接式错误处理。
//! 通过 `thiserror` 保持人类可读错误，同时让批处理驱动可按分支匹配：
//! 每个错误只影响当前这一张图片，不会中断整批处理。

/// 裁剪链路统一错误类型。
#[derive(Debug, thiserror::Error)]
pub enum CropError {
    /// 源文件无法读取或无法解码为图片。
    #[error("加载失败：{0}")]
    Load(String),

    /// 用户没有框选任何区域（零矩形哨兵）。
    #[error("未选择区域")]
    NoSelection,

    /// pad_only 模式下选区大于目标画布。
    #[error(
        "选区 {width}x{height} 超出目标画布 {target_width}x{target_height}，已跳过"
    )]
    Oversize {
        width: u32,
        height: u32,
        target_width: u32,
        target_height: u32,
    },

    /// 未知的画布模式字符串。
    #[error("未知模式：{0}（可选：scale_and_pad / pad_only）")]
    UnknownMode(String),

    /// 选区换算回原图后与图像没有交集。
    #[error("选区无效：{0}")]
    InvalidRegion(String),

    #[error("配置无效：{0}")]
    InvalidConfig(String),

    /// 选区交互失败（终端读写、回放文件解析等）。
    #[error("选区交互失败：{0}")]
    Selection(String),

    #[error("资源限制：{0}")]
    ResourceLimit(String),

    #[error("文件错误：{0}")]
    FileSystem(String),

    #[error("编码错误：{0}")]
    Encode(String),
}

impl CropError {
    /// 稳定的错误码，便于日志检索与脚本判断。
    pub fn code(&self) -> &'static str {
        match self {
            Self::Load(_) => "E_LOAD",
            Self::NoSelection => "E_NO_SELECTION",
            Self::Oversize { .. } => "E_OVERSIZE",
            Self::UnknownMode(_) => "E_UNKNOWN_MODE",
            Self::InvalidRegion(_) => "E_INVALID_REGION",
            Self::InvalidConfig(_) => "E_INVALID_CONFIG",
            Self::Selection(_) => "E_SELECTION",
            Self::ResourceLimit(_) => "E_RESOURCE_LIMIT",
            Self::FileSystem(_) => "E_FILE_SYSTEM",
            Self::Encode(_) => "E_ENCODE",
        }
    }

    /// 错误发生的流水线阶段。
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Load(_) | Self::ResourceLimit(_) => "load",
            Self::NoSelection | Self::Selection(_) => "select",
            Self::Oversize { .. } | Self::InvalidRegion(_) => "normalize",
            Self::FileSystem(_) | Self::Encode(_) => "write",
            Self::UnknownMode(_) | Self::InvalidConfig(_) => "config",
        }
    }

    /// 是否属于“用户主动跳过”，而非真正的失败。
    pub fn is_skip(&self) -> bool {
        matches!(self, Self::NoSelection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oversize_message_names_both_sizes() {
        let err = CropError::Oversize {
            width: 600,
            height: 300,
            target_width: 512,
            target_height: 512,
        };
        let message = err.to_string();
        assert!(message.contains("600x300"));
        assert!(message.contains("512x512"));
        assert_eq!(err.code(), "E_OVERSIZE");
        assert_eq!(err.stage(), "normalize");
    }

    #[test]
    fn only_no_selection_counts_as_skip() {
        assert!(CropError::NoSelection.is_skip());
        assert!(!CropError::Load("broken".into()).is_skip());
        assert!(!CropError::UnknownMode("zoom".into()).is_skip());
    }
}
