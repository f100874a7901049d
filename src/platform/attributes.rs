//! 文件属性模块
//!
//! # 设计思路
//!
//! 资源管理器只有在 `desktop.ini` 带有系统/隐藏属性、文件夹带有只读属性时才会显示自定义图标。
//! 属性读写通过 `FolderAttributes` 抽象，Windows 上使用 Win32 API，测试中可替换为内存实现。

use std::ops::BitOr;
use std::path::Path;

use crate::error::AppError;

/// 文件属性位集合（取值与 Win32 `FILE_ATTRIBUTE_*` 一致）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct AttributeFlags(u32);

impl AttributeFlags {
    pub const READ_ONLY: Self = Self(0x01);
    pub const HIDDEN: Self = Self(0x02);
    pub const SYSTEM: Self = Self(0x04);
    pub const ARCHIVE: Self = Self(0x20);

    /// `desktop.ini` 需要的属性：存档 + 系统 + 隐藏
    pub const DESKTOP_INI: Self = Self(0x20 | 0x04 | 0x02);

    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn with(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub const fn without(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }
}

impl BitOr for AttributeFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.with(rhs)
    }
}

/// 文件/文件夹属性读写能力。
pub trait FolderAttributes {
    /// 为路径追加属性，已有属性保持不变。
    fn set(&self, path: &Path, flags: AttributeFlags) -> Result<(), AppError>;

    /// 清除路径上的指定属性，未设置时为空操作。
    fn clear(&self, path: &Path, flags: AttributeFlags) -> Result<(), AppError>;
}

/// 基于 `GetFileAttributesW` / `SetFileAttributesW` 的实现。
#[cfg(target_os = "windows")]
#[derive(Debug, Default, Clone, Copy)]
pub struct Win32Attributes;

#[cfg(target_os = "windows")]
fn to_wide(path: &Path) -> Vec<u16> {
    use std::os::windows::ffi::OsStrExt;

    path.as_os_str()
        .encode_wide()
        .chain(std::iter::once(0))
        .collect()
}

#[cfg(target_os = "windows")]
impl Win32Attributes {
    fn update(&self, path: &Path, apply: impl FnOnce(u32) -> u32) -> Result<(), AppError> {
        use windows::core::PCWSTR;
        use windows::Win32::Storage::FileSystem::{
            GetFileAttributesW, SetFileAttributesW, FILE_ATTRIBUTE_DIRECTORY,
            FILE_ATTRIBUTE_NORMAL, FILE_FLAGS_AND_ATTRIBUTES, INVALID_FILE_ATTRIBUTES,
        };

        let wide = to_wide(path);
        let current = unsafe { GetFileAttributesW(PCWSTR(wide.as_ptr())) };
        if current == INVALID_FILE_ATTRIBUTES {
            return Err(AppError::Attributes(format!(
                "读取属性失败: {} ({})",
                path.display(),
                std::io::Error::last_os_error()
            )));
        }

        let mut updated = apply(current) & !(FILE_ATTRIBUTE_DIRECTORY.0 | FILE_ATTRIBUTE_NORMAL.0);
        if updated == 0 {
            updated = FILE_ATTRIBUTE_NORMAL.0;
        }

        unsafe { SetFileAttributesW(PCWSTR(wide.as_ptr()), FILE_FLAGS_AND_ATTRIBUTES(updated)) }
            .map_err(|e| AppError::Attributes(format!("设置属性失败: {} ({})", path.display(), e)))
    }
}

#[cfg(target_os = "windows")]
impl FolderAttributes for Win32Attributes {
    fn set(&self, path: &Path, flags: AttributeFlags) -> Result<(), AppError> {
        self.update(path, |current| current | flags.bits())
    }

    fn clear(&self, path: &Path, flags: AttributeFlags) -> Result<(), AppError> {
        self.update(path, |current| current & !flags.bits())
    }
}
