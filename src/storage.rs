//! 图标产物存放路径管理模块
//!
//! # 设计思路
//!
//! 统一管理图标产物的文件名与存放目录：
//! - 临时产物与外置图标带时间戳后缀，降低同一文件夹并发运行时的命名冲突（同一秒内仍可能冲突）。
//! - 存放目录可以是目标文件夹本身，也可以是外部目录（绝对路径或相对目标文件夹的路径）。
//!
//! # 实现思路
//!
//! - 盘符比较按字符串解析（`C:`、`\\server\share`），不依赖宿主平台，比较时忽略大小写。
//! - 相对路径只在同一盘符下生成，跨盘符时回退为绝对路径。

use std::path::{Path, PathBuf};

use chrono::Local;

/// 时间戳后缀格式，例如 `20240131-235959`。
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d-%H%M%S";

/// 临时产物文件名（不含时间戳）。
pub const TEMP_ARTIFACT_NAME: &str = "_temp_.png";

/// 当前本地时间的时间戳后缀。
pub fn timestamp_suffix() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// 在文件名主干后追加 `_<suffix>`，保留扩展名。
///
/// # 示例
/// ```rust
/// use std::path::Path;
/// use folder_icon::storage::append_timestamp;
///
/// let named = append_timestamp(Path::new("icons/photo.ico"), "20240101-120000");
/// assert_eq!(named, Path::new("icons/photo_20240101-120000.ico"));
/// ```
pub fn append_timestamp(path: &Path, suffix: &str) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let file_name = match path.extension() {
        Some(ext) => format!("{}_{}.{}", stem, suffix, ext.to_string_lossy()),
        None => format!("{}_{}", stem, suffix),
    };
    path.with_file_name(file_name)
}

/// 解析路径的盘符部分（小写）。
///
/// 与宿主平台无关：`C:\a` → `c:`，`\\Server\Share\a` → `\\server\share`，其他 → 空串。
pub fn drive_prefix(path: &Path) -> String {
    let normalized = path.to_string_lossy().replace('/', "\\");
    let chars: Vec<char> = normalized.chars().collect();

    if chars.len() >= 2 && chars[1] == ':' && chars[0].is_ascii_alphabetic() {
        return normalized[..2].to_lowercase();
    }

    if normalized.starts_with("\\\\") && !normalized.starts_with("\\\\\\") {
        let Some(server_end) = normalized[2..].find('\\').map(|i| i + 2) else {
            return String::new();
        };
        let share_start = server_end + 1;
        let share_end = normalized[share_start..]
            .find('\\')
            .map(|i| i + share_start)
            .unwrap_or(normalized.len());
        if share_end == share_start {
            return String::new();
        }
        return normalized[..share_end].to_lowercase();
    }

    String::new()
}

/// 两个路径是否位于同一盘符。
pub fn same_drive(a: &Path, b: &Path) -> bool {
    drive_prefix(a) == drive_prefix(b)
}

/// 转为绝对路径，失败时原样返回。
pub fn absolutize(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

/// 解析后的图标存放位置。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPlacement {
    /// 实际写入产物的目录
    pub dir: PathBuf,
    /// 写入绑定配置时使用的目录前缀；`None` 表示存放在目标文件夹内
    pub reference: Option<PathBuf>,
}

impl ResolvedPlacement {
    /// 产物是否存放在目标文件夹之外（需要时间戳区分）。
    pub fn is_external(&self) -> bool {
        self.reference.is_some()
    }

    /// 绑定配置中引用图标时使用的路径。
    pub fn icon_reference(&self, icon_name: &str) -> PathBuf {
        match &self.reference {
            Some(prefix) => prefix.join(icon_name),
            None => PathBuf::from(icon_name),
        }
    }
}

/// 计算图标存放目录。
///
/// - 未指定存放目录：目标文件夹本身。
/// - 指定且要求相对、同盘符：相对目标文件夹的路径。
/// - 其余情况：存放目录的绝对路径。
pub fn resolve_placement(folder: &Path, placement: Option<&Path>, relative: bool) -> ResolvedPlacement {
    let Some(placement) = placement else {
        return ResolvedPlacement {
            dir: folder.to_path_buf(),
            reference: None,
        };
    };

    let placement_abs = absolutize(placement);

    if relative {
        let folder_abs = absolutize(folder);
        if same_drive(&folder_abs, &placement_abs) {
            if let Some(rel) = pathdiff::diff_paths(&placement_abs, &folder_abs) {
                log::debug!(
                    "存放目录按相对路径引用: {} (相对 {})",
                    rel.display(),
                    folder_abs.display()
                );
                return ResolvedPlacement {
                    dir: folder.join(&rel),
                    reference: Some(rel),
                };
            }
        } else {
            log::debug!(
                "存放目录与目标文件夹不在同一盘符，改用绝对路径: {}",
                placement_abs.display()
            );
        }
    }

    ResolvedPlacement {
        dir: placement_abs.clone(),
        reference: Some(placement_abs),
    }
}
