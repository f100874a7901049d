//! # 平台图标应用器（platform）
//!
//! ## 设计思路
//!
//! 两个平台各自完整实现 `IconApplier`，进程启动时按宿主平台选择一次，
//! 共享逻辑（调度、合成）中不再出现平台分支。
//!
//! | 实现 | 平台 | 绑定方式 |
//! |------|------|----------|
//! | [`DesktopIniApplier`] | Windows | `desktop.ini` + 文件属性 |
//! | [`ShellIconApplier`] | macOS | `NSWorkspace setIcon` |
//!
//! ## 平台差异
//!
//! 列表模式下是否采用显式指定的文件夹由 [`ListFolderPolicy`] 表达，
//! 两种行为都予以保留。

mod attributes;
mod desktop_ini;
mod shell;

use std::path::{Path, PathBuf};

use crate::compositor::Compositor;
use crate::dispatch::ImageTarget;
use crate::error::AppError;

pub use attributes::{AttributeFlags, FolderAttributes};
#[cfg(target_os = "windows")]
pub use attributes::Win32Attributes;
pub use desktop_ini::{DesktopIniApplier, DESKTOP_INI, ICON_RESOURCE_KEY, SHELL_CLASS_INFO};
#[cfg(target_os = "macos")]
pub use shell::WorkspaceBinder;
pub use shell::{ShellIconApplier, ShellIconBinder};

/// 列表模式下每个条目的目标文件夹来源。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListFolderPolicy {
    /// 指定了文件夹时使用指定文件夹，否则使用图片所在目录
    ExplicitOverride,
    /// 始终使用图片所在目录
    ImageParent,
}

/// 图标存放参数（仅 `desktop.ini` 实现使用）。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlacementRequest {
    pub dir: Option<PathBuf>,
    pub relative: bool,
}

/// 单次绑定结果。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedIcon {
    pub folder: PathBuf,
    /// 保留在磁盘上的图标文件
    pub artifact: Option<PathBuf>,
    /// 写入 `desktop.ini` 的值
    pub icon_resource: Option<String>,
}

/// 平台图标应用器。
pub trait IconApplier {
    fn name(&self) -> &'static str;

    fn list_folder_policy(&self) -> ListFolderPolicy;

    /// 合成图片并绑定为目标文件夹图标。
    fn create_icon(
        &self,
        target: &ImageTarget,
        placement: &PlacementRequest,
    ) -> Result<AppliedIcon, AppError>;

    /// 移除文件夹的自定义图标。
    fn reset_icon(&self, folder: &Path) -> Result<(), AppError>;
}

/// 宿主平台。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostPlatform {
    Windows,
    MacOs,
    Unsupported(&'static str),
}

impl HostPlatform {
    pub fn detect() -> Self {
        Self::from_os(std::env::consts::OS)
    }

    pub fn from_os(os: &'static str) -> Self {
        match os {
            "windows" => Self::Windows,
            "macos" => Self::MacOs,
            other => Self::Unsupported(other),
        }
    }

    /// 该平台是否支持存放目录与相对路径参数。
    pub fn supports_placement(self) -> bool {
        matches!(self, Self::Windows)
    }
}

/// 为当前宿主平台创建图标应用器；不支持的平台返回 `None`。
#[cfg(target_os = "windows")]
pub fn host_applier(compositor: Compositor) -> Option<Box<dyn IconApplier>> {
    Some(Box::new(DesktopIniApplier::new(compositor, Win32Attributes)))
}

/// 为当前宿主平台创建图标应用器；不支持的平台返回 `None`。
#[cfg(target_os = "macos")]
pub fn host_applier(compositor: Compositor) -> Option<Box<dyn IconApplier>> {
    Some(Box::new(ShellIconApplier::new(compositor, WorkspaceBinder)))
}

/// 为当前宿主平台创建图标应用器；不支持的平台返回 `None`。
#[cfg(not(any(target_os = "windows", target_os = "macos")))]
pub fn host_applier(_compositor: Compositor) -> Option<Box<dyn IconApplier>> {
    None
}
