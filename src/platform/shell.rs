//! 系统图标绑定应用器（macOS）
//!
//! # 设计思路
//!
//! macOS 由 `NSWorkspace setIcon:forFile:options:` 直接把图片绑定到文件夹，
//! 系统会自行缓存图标，因此只需要一个临时 PNG，绑定成功后立即删除。
//!
//! - 不缩放、不生成 ICO
//! - 存放目录与相对路径参数被忽略，产物不会离开目标文件夹
//! - 绑定失败属于致命错误，临时文件保留不清理

use std::fs;
use std::path::Path;

use super::{AppliedIcon, IconApplier, ListFolderPolicy, PlacementRequest};
use crate::compositor::Compositor;
use crate::dispatch::ImageTarget;
use crate::error::AppError;
use crate::storage::{append_timestamp, timestamp_suffix, TEMP_ARTIFACT_NAME};

/// 桌面环境的文件夹图标绑定能力。
pub trait ShellIconBinder {
    /// 以图片作为文件夹图标。
    fn set_folder_icon(&self, image: &Path, folder: &Path) -> Result<(), AppError>;

    /// 移除文件夹的自定义图标。
    fn clear_folder_icon(&self, folder: &Path) -> Result<(), AppError>;
}

pub struct ShellIconApplier<B: ShellIconBinder> {
    compositor: Compositor,
    binder: B,
}

impl<B: ShellIconBinder> ShellIconApplier<B> {
    pub fn new(compositor: Compositor, binder: B) -> Self {
        Self { compositor, binder }
    }

    pub fn binder(&self) -> &B {
        &self.binder
    }

    fn create_mac_icon(&self, image: &Path, folder: &Path) -> Result<AppliedIcon, AppError> {
        let bitmap = self.compositor.compose_file(image)?;

        let temp_path = append_timestamp(&folder.join(TEMP_ARTIFACT_NAME), &timestamp_suffix());
        self.compositor.save_png(bitmap.canvas(), &temp_path)?;

        self.binder.set_folder_icon(&temp_path, folder)?;

        fs::remove_file(&temp_path)?;
        log::debug!("图标已创建: {}", folder.display());

        Ok(AppliedIcon {
            folder: folder.to_path_buf(),
            artifact: None,
            icon_resource: None,
        })
    }
}

impl<B: ShellIconBinder> IconApplier for ShellIconApplier<B> {
    fn name(&self) -> &'static str {
        "NSWorkspace"
    }

    fn list_folder_policy(&self) -> ListFolderPolicy {
        ListFolderPolicy::ImageParent
    }

    fn create_icon(
        &self,
        target: &ImageTarget,
        placement: &PlacementRequest,
    ) -> Result<AppliedIcon, AppError> {
        if placement.dir.is_some() || placement.relative {
            log::debug!("当前平台忽略存放目录与相对路径参数");
        }
        self.create_mac_icon(&target.image_path, &target.folder)
    }

    fn reset_icon(&self, folder: &Path) -> Result<(), AppError> {
        self.binder.clear_folder_icon(folder)?;
        log::debug!("已移除自定义图标: {}", folder.display());
        Ok(())
    }
}

/// 基于 `NSWorkspace` 的实现。
#[cfg(target_os = "macos")]
#[derive(Debug, Default, Clone, Copy)]
pub struct WorkspaceBinder;

#[cfg(target_os = "macos")]
impl WorkspaceBinder {
    /// `image` 为 `None` 时移除自定义图标。
    fn set_icon(&self, image: Option<&Path>, folder: &Path) -> Result<(), AppError> {
        use cocoa::base::{id, nil, BOOL, NO};
        use cocoa::foundation::{NSAutoreleasePool, NSString, NSUInteger};
        use objc::{class, msg_send, sel, sel_impl};

        let folder_str = folder
            .to_str()
            .ok_or_else(|| AppError::ShellBinding(format!("路径不是有效 UTF-8: {}", folder.display())))?;
        let image_str = match image {
            Some(path) => Some(path.to_str().ok_or_else(|| {
                AppError::ShellBinding(format!("路径不是有效 UTF-8: {}", path.display()))
            })?),
            None => None,
        };

        unsafe {
            let pool = NSAutoreleasePool::new(nil);

            let ns_image: id = match image_str {
                Some(path) => {
                    let ns_path = NSString::alloc(nil).init_str(path).autorelease();
                    let allocated: id = msg_send![class!(NSImage), alloc];
                    let loaded: id = msg_send![allocated, initWithContentsOfFile: ns_path];
                    if loaded == nil {
                        pool.drain();
                        return Err(AppError::ShellBinding(format!("无法加载图片: {}", path)));
                    }
                    loaded.autorelease()
                }
                None => nil,
            };

            let ns_folder = NSString::alloc(nil).init_str(folder_str).autorelease();
            let workspace: id = msg_send![class!(NSWorkspace), sharedWorkspace];
            let options: NSUInteger = 0;
            let ok: BOOL = msg_send![workspace, setIcon: ns_image forFile: ns_folder options: options];

            pool.drain();

            if ok == NO {
                return Err(AppError::ShellBinding(format!(
                    "NSWorkspace setIcon 返回失败: {}",
                    folder.display()
                )));
            }
        }

        Ok(())
    }
}

#[cfg(target_os = "macos")]
impl ShellIconBinder for WorkspaceBinder {
    fn set_folder_icon(&self, image: &Path, folder: &Path) -> Result<(), AppError> {
        self.set_icon(Some(image), folder)
    }

    fn clear_folder_icon(&self, folder: &Path) -> Result<(), AppError> {
        self.set_icon(None, folder)
    }
}
