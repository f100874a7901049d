//! `desktop.ini` 图标应用器（Windows）
//!
//! # 设计思路
//!
//! 资源管理器通过文件夹内的 `desktop.ini` 查找自定义图标：
//!
//! ```text
//! [.ShellClassInfo]
//! IconResource=photo.ico,0
//! ```
//!
//! 序号 0 表示图标文件中的第一帧（本工具只生成单帧 ICO）。
//!
//! # 实现思路
//!
//! 1. 合成正方形画布，写入存放目录下带时间戳的临时 PNG
//! 2. 重新读取临时 PNG，缩放到 256×256 并保存为 `<源文件名>.ico`（外置存放时追加时间戳）
//! 3. 写入 `desktop.ini`：写前清除旧文件属性，读写失败只记录日志不向上抛出
//! 4. 设置属性：`desktop.ini` 存档+系统+隐藏，文件夹只读（尽力而为）
//! 5. 删除临时 PNG，保留 ICO

use std::fs;
use std::path::{Path, PathBuf};

use ini::{EscapePolicy, Ini, ParseOption, WriteOption};

use super::attributes::{AttributeFlags, FolderAttributes};
use super::{AppliedIcon, IconApplier, ListFolderPolicy, PlacementRequest};
use crate::compositor::Compositor;
use crate::dispatch::ImageTarget;
use crate::error::AppError;
use crate::storage::{
    append_timestamp, resolve_placement, timestamp_suffix, ResolvedPlacement, TEMP_ARTIFACT_NAME,
};

/// 文件夹配置文件名
pub const DESKTOP_INI: &str = "desktop.ini";
/// 图标配置所在分节
pub const SHELL_CLASS_INFO: &str = ".ShellClassInfo";
/// 图标资源键
pub const ICON_RESOURCE_KEY: &str = "IconResource";

fn desktop_ini_path(folder: &Path) -> PathBuf {
    folder.join(DESKTOP_INI)
}

pub struct DesktopIniApplier<A: FolderAttributes> {
    compositor: Compositor,
    attributes: A,
}

impl<A: FolderAttributes> DesktopIniApplier<A> {
    pub fn new(compositor: Compositor, attributes: A) -> Self {
        Self {
            compositor,
            attributes,
        }
    }

    pub fn attributes(&self) -> &A {
        &self.attributes
    }

    fn create_windows_icon(
        &self,
        image: &Path,
        folder: &Path,
        placement: &ResolvedPlacement,
    ) -> Result<AppliedIcon, AppError> {
        let bitmap = self.compositor.compose_file(image)?;

        let stamp = timestamp_suffix();
        let temp_path = append_timestamp(&placement.dir.join(TEMP_ARTIFACT_NAME), &stamp);
        self.compositor.save_png(bitmap.canvas(), &temp_path)?;

        let stem = image
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "folder".to_string());
        let mut icon_name = format!("{}.ico", stem);
        if placement.is_external() {
            icon_name = append_timestamp(Path::new(&icon_name), &stamp)
                .to_string_lossy()
                .to_string();
        }
        let icon_path = placement.dir.join(&icon_name);

        let saved = self
            .compositor
            .load_image(&temp_path)
            .and_then(|sized| self.compositor.save_icon(&sized, &icon_path));
        if let Err(err) = saved {
            remove_temp_artifact(&temp_path);
            return Err(err.into());
        }

        let icon_resource = format!("{},0", placement.icon_reference(&icon_name).to_string_lossy());
        self.write_desktop_ini(folder, &icon_resource);
        self.set_attributes(folder);

        remove_temp_artifact(&temp_path);
        log::debug!("图标已创建: {}", folder.display());

        Ok(AppliedIcon {
            folder: folder.to_path_buf(),
            artifact: Some(icon_path),
            icon_resource: Some(icon_resource),
        })
    }

    /// 写入 `IconResource`；任何错误只记录日志，不影响后续属性设置。
    pub fn write_desktop_ini(&self, folder: &Path, icon_resource: &str) {
        if let Err(err) = self.try_write_desktop_ini(folder, icon_resource) {
            log::error!("写入 {} 失败: {}", desktop_ini_path(folder).display(), err);
        }
    }

    fn try_write_desktop_ini(&self, folder: &Path, icon_resource: &str) -> Result<(), AppError> {
        let ini_path = desktop_ini_path(folder);
        let exists = ini_path.is_file();

        let mut config = if exists {
            let parse_option = ParseOption {
                enabled_escape: false,
                ..ParseOption::default()
            };
            Ini::load_from_file_opt(&ini_path, parse_option)
                .map_err(|e| AppError::Io(std::io::Error::other(e.to_string())))?
        } else {
            Ini::new()
        };

        upsert_icon_resource(&mut config, icon_resource);

        if exists {
            self.attributes.clear(&ini_path, AttributeFlags::DESKTOP_INI)?;
        }

        let write_option = WriteOption {
            escape_policy: EscapePolicy::Nothing,
            ..WriteOption::default()
        };
        config.write_to_file_opt(&ini_path, write_option)?;
        log::debug!("已生成: {}", ini_path.display());

        Ok(())
    }

    /// 设置显示自定义图标所需的属性（尽力而为）。
    pub fn set_attributes(&self, folder: &Path) {
        let ini_path = desktop_ini_path(folder);

        match self.attributes.set(&ini_path, AttributeFlags::DESKTOP_INI) {
            Ok(()) => log::debug!("设置属性：存档、系统、隐藏 -> {}", ini_path.display()),
            Err(err) => log::warn!("{}", err),
        }

        match self.attributes.set(folder, AttributeFlags::READ_ONLY) {
            Ok(()) => log::debug!("设置属性：只读 -> {}", folder.display()),
            Err(err) => log::warn!("{}", err),
        }
    }

    /// 清除图标相关属性，使 `desktop.ini` 可编辑、可删除。重复调用无副作用。
    pub fn clear_attributes(&self, folder: &Path) -> Result<(), AppError> {
        let ini_path = desktop_ini_path(folder);

        if ini_path.is_file() {
            self.attributes.clear(&ini_path, AttributeFlags::DESKTOP_INI)?;
            log::debug!("清除属性：存档、系统、隐藏 -> {}", ini_path.display());
        } else {
            log::debug!("不存在: {}", ini_path.display());
        }

        self.attributes.clear(folder, AttributeFlags::READ_ONLY)?;
        log::debug!("清除属性：只读 -> {}", folder.display());
        Ok(())
    }

    /// 删除 `desktop.ini`，不存在时为空操作。
    pub fn remove_desktop_ini(&self, folder: &Path) -> Result<(), AppError> {
        let ini_path = desktop_ini_path(folder);

        if ini_path.is_file() {
            fs::remove_file(&ini_path)?;
            log::debug!("已删除: {}", ini_path.display());
        } else {
            log::debug!("不存在: {}", ini_path.display());
        }
        Ok(())
    }
}

/// 资源管理器按不区分大小写的方式读取分节与键：沿用已有分节名，并移除键的所有大小写变体后再写入。
fn upsert_icon_resource(config: &mut Ini, icon_resource: &str) {
    let section_name = config
        .sections()
        .flatten()
        .find(|name| name.eq_ignore_ascii_case(SHELL_CLASS_INFO))
        .unwrap_or(SHELL_CLASS_INFO)
        .to_string();

    if let Some(section) = config.section_mut(Some(section_name.as_str())) {
        let stale: Vec<String> = section
            .iter()
            .filter(|(key, _)| key.eq_ignore_ascii_case(ICON_RESOURCE_KEY))
            .map(|(key, _)| key.to_string())
            .collect();

        for key in stale {
            if let Some(previous) = section.remove(&key) {
                log::debug!("重置原有值: {}={}", key, previous);
            }
        }
    }

    config
        .with_section(Some(section_name))
        .set(ICON_RESOURCE_KEY, icon_resource);
}

fn remove_temp_artifact(path: &Path) {
    if let Err(err) = fs::remove_file(path) {
        log::warn!("删除临时文件失败: {} ({})", path.display(), err);
    }
}

impl<A: FolderAttributes> IconApplier for DesktopIniApplier<A> {
    fn name(&self) -> &'static str {
        "desktop.ini"
    }

    fn list_folder_policy(&self) -> ListFolderPolicy {
        ListFolderPolicy::ExplicitOverride
    }

    fn create_icon(
        &self,
        target: &ImageTarget,
        placement: &PlacementRequest,
    ) -> Result<AppliedIcon, AppError> {
        let resolved = resolve_placement(&target.folder, placement.dir.as_deref(), placement.relative);
        self.create_windows_icon(&target.image_path, &target.folder, &resolved)
    }

    fn reset_icon(&self, folder: &Path) -> Result<(), AppError> {
        self.clear_attributes(folder)?;
        self.remove_desktop_ini(folder)
    }
}
