//! 统一错误类型模块
//!
//! # 设计思路
//!
//! 定义全局统一的 `AppError` 枚举，调度层、平台应用器与命令行入口共用。
//! 输入类错误在任何副作用发生前返回；图标绑定失败属于致命错误，会终止批处理。
//!
//! # 实现思路
//!
//! - 使用 `thiserror` 派生可读错误消息。
//! - 为 `ImageError` 与 `std::io::Error` 提供 `From` 转换，无需手动 map。

use std::path::PathBuf;

use crate::compositor::ImageError;

/// 可接受的输入扩展名（小写，含点号）。
pub const ACCEPTED_EXTENSIONS: [&str; 4] = [".jpg", ".jpeg", ".png", ".txt"];

/// 应用级统一错误类型
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// 输入文件不存在或不是普通文件
    #[error("输入文件必须存在：{}", .0.display())]
    InputMissing(PathBuf),

    /// 输入扩展名不在白名单内
    #[error("仅支持以下文件格式：{}", ACCEPTED_EXTENSIONS.join(", "))]
    UnsupportedFormat(PathBuf),

    /// 目标文件夹或存放文件夹无效
    #[error("{} 不是有效的文件夹", .0.display())]
    InvalidFolder(PathBuf),

    /// 图片合成流水线错误（读取 / 解码 / 编码）
    #[error("{0}")]
    Image(#[from] ImageError),

    /// 文件系统 I/O 错误
    #[error("文件系统错误: {0}")]
    Io(#[from] std::io::Error),

    /// 文件属性读写失败
    #[error("文件属性操作失败: {0}")]
    Attributes(String),

    /// 系统图标绑定失败
    #[error("无法设置文件夹图标: {0}")]
    ShellBinding(String),

    /// 设置文件无效
    #[error("设置文件无效: {0}")]
    Settings(String),
}

impl AppError {
    /// 是否应终止整个批处理。
    ///
    /// 系统图标绑定失败意味着后续条目同样无法完成，直接中止。
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::ShellBinding(_))
    }
}
