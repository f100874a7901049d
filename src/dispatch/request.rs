//! 请求模型与输入校验
//!
//! # 设计思路
//!
//! 所有输入错误在产生任何副作用之前返回，校验通过后的请求已完成规范化：
//! - 存放目录转为绝对路径
//! - 文件夹与存放目录不在同一盘符时，相对路径请求被静默降级为绝对路径

use std::path::{Path, PathBuf};

use crate::error::{AppError, ACCEPTED_EXTENSIONS};
use crate::storage::{absolutize, same_drive};

/// 列表文件扩展名
pub const LIST_FILE_EXTENSION: &str = ".txt";

/// 图标设置请求。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IconRequest {
    /// 图片或列表文件
    pub input_path: PathBuf,
    /// 目标文件夹，缺省为图片所在目录
    pub folder: Option<PathBuf>,
    /// 图标存放目录，缺省为目标文件夹
    pub placement: Option<PathBuf>,
    /// 以相对目标文件夹的路径引用图标
    pub relative: bool,
    pub debug: bool,
}

impl IconRequest {
    pub fn new(input_path: impl Into<PathBuf>) -> Self {
        Self {
            input_path: input_path.into(),
            ..Self::default()
        }
    }

    pub fn with_folder(mut self, folder: impl Into<PathBuf>) -> Self {
        self.folder = non_empty(folder.into());
        self
    }

    pub fn with_placement(mut self, placement: impl Into<PathBuf>, relative: bool) -> Self {
        self.placement = non_empty(placement.into());
        self.relative = relative;
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// 输入扩展名（小写，含点号）。
    pub fn extension(&self) -> Option<String> {
        self.input_path
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
    }

    pub fn is_list_file(&self) -> bool {
        self.extension().as_deref() == Some(LIST_FILE_EXTENSION)
    }

    /// 校验并规范化请求。
    pub fn validate(mut self) -> Result<Self, AppError> {
        if !self.input_path.is_file() {
            return Err(AppError::InputMissing(self.input_path));
        }

        match self.extension() {
            Some(ext) if ACCEPTED_EXTENSIONS.contains(&ext.as_str()) => {}
            _ => return Err(AppError::UnsupportedFormat(self.input_path)),
        }

        self.folder = self.folder.and_then(non_empty);
        self.placement = self.placement.and_then(non_empty);

        if let Some(folder) = &self.folder {
            if !folder.is_dir() {
                return Err(AppError::InvalidFolder(folder.clone()));
            }
        }

        if let Some(placement) = &self.placement {
            if !placement.is_dir() {
                return Err(AppError::InvalidFolder(placement.clone()));
            }
        }

        let folder_abs = self.folder.as_deref().map(absolutize);
        let placement_abs = self.placement.as_deref().map(absolutize);

        self.relative = effective_relative(folder_abs.as_deref(), placement_abs.as_deref(), self.relative);
        self.placement = placement_abs;

        Ok(self)
    }
}

fn non_empty(path: PathBuf) -> Option<PathBuf> {
    if path.as_os_str().is_empty() {
        None
    } else {
        Some(path)
    }
}

/// 跨盘符无法表达相对路径：文件夹与存放目录盘符不同时强制关闭相对路径。
pub fn effective_relative(folder: Option<&Path>, placement: Option<&Path>, relative: bool) -> bool {
    match (folder, placement) {
        (Some(folder), Some(placement)) if relative && !same_drive(folder, placement) => {
            log::debug!(
                "文件夹与存放目录不在同一盘符，忽略相对路径: {} / {}",
                folder.display(),
                placement.display()
            );
            false
        }
        _ => relative,
    }
}

#[cfg(test)]
mod tests {
    use std::time::{SystemTime, UNIX_EPOCH};

    use super::*;

    fn unique_temp_dir() -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock error")
            .as_nanos();
        let dir = std::env::temp_dir().join(format!("folder-icon-request-test-{nanos}"));
        std::fs::create_dir_all(&dir).expect("create temp dir");
        dir
    }

    #[test]
    fn missing_input_is_rejected() {
        let dir = unique_temp_dir();
        let result = IconRequest::new(dir.join("nope.png")).validate();

        assert!(matches!(result, Err(AppError::InputMissing(_))));
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn directory_input_is_rejected() {
        let dir = unique_temp_dir();
        let result = IconRequest::new(&dir).validate();

        assert!(matches!(result, Err(AppError::InputMissing(_))));
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let dir = unique_temp_dir();
        let gif = dir.join("anim.gif");
        std::fs::write(&gif, b"GIF89a").expect("write gif");

        let result = IconRequest::new(&gif).validate();

        assert!(matches!(result, Err(AppError::UnsupportedFormat(_))));
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn extension_check_ignores_case() {
        let dir = unique_temp_dir();
        let photo = dir.join("PHOTO.JPEG");
        std::fs::write(&photo, b"x").expect("write photo");

        assert!(IconRequest::new(&photo).validate().is_ok());
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn invalid_folder_and_placement_are_rejected() {
        let dir = unique_temp_dir();
        let photo = dir.join("a.png");
        std::fs::write(&photo, b"x").expect("write photo");

        let bad_folder = IconRequest::new(&photo).with_folder(dir.join("missing")).validate();
        assert!(matches!(bad_folder, Err(AppError::InvalidFolder(p)) if p.ends_with("missing")));

        let bad_placement = IconRequest::new(&photo)
            .with_placement(photo.clone(), true)
            .validate();
        assert!(matches!(bad_placement, Err(AppError::InvalidFolder(p)) if p == photo));
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn empty_folder_and_placement_mean_absent() {
        let dir = unique_temp_dir();
        let photo = dir.join("a.png");
        std::fs::write(&photo, b"x").expect("write photo");

        let validated = IconRequest::new(&photo)
            .with_folder("")
            .with_placement("", true)
            .validate()
            .expect("valid");

        assert!(validated.folder.is_none());
        assert!(validated.placement.is_none());
        assert!(validated.relative);
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn placement_is_made_absolute() {
        let dir = unique_temp_dir();
        let photo = dir.join("a.png");
        std::fs::write(&photo, b"x").expect("write photo");

        let validated = IconRequest::new(&photo)
            .with_placement(&dir, false)
            .validate()
            .expect("valid");

        assert!(validated.placement.expect("placement").is_absolute());
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn cross_drive_relative_is_downgraded_in_either_order() {
        let c = Path::new("C:\\photos");
        let d = Path::new("D:\\icons");

        assert!(!effective_relative(Some(c), Some(d), true));
        assert!(!effective_relative(Some(d), Some(c), true));
        assert!(effective_relative(Some(c), Some(Path::new("c:\\icons")), true));
        assert!(effective_relative(Some(c), None, true));
        assert!(!effective_relative(Some(c), Some(c), false));
    }

    #[test]
    fn txt_input_is_list_file() {
        assert!(IconRequest::new("batch.TXT").is_list_file());
        assert!(!IconRequest::new("photo.png").is_list_file());
    }
}
