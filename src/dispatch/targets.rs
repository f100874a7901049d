//! 图片目标序列
//!
//! 单张图片与列表文件统一表示为惰性迭代器，每一项是一行的校验结果：
//! - 行尾空白被去除，空行直接忽略
//! - 不存在的路径产出 `SkippedLine`，由调用方决定如何记录
//! - 重新调用构造函数即可从头开始

use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind, Lines};
use std::path::{Path, PathBuf};

use super::IconRequest;
use crate::error::AppError;
use crate::platform::ListFolderPolicy;

/// 一次图标绑定的目标。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageTarget {
    pub image_path: PathBuf,
    /// 被设置图标的文件夹
    pub folder: PathBuf,
}

/// 列表中被跳过的行。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
    /// 从 1 开始的行号
    pub line_number: usize,
    pub content: String,
    pub reason: String,
}

/// 图片所在目录；无父目录时为当前目录。
pub fn owning_folder(image: &Path) -> PathBuf {
    match image.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

enum TargetSource {
    Single(Option<ImageTarget>),
    List {
        lines: Lines<Box<dyn BufRead>>,
        line_number: usize,
        folder_override: Option<PathBuf>,
        finished: bool,
    },
}

/// 惰性的图片目标序列。
pub struct ImageTargets {
    source: TargetSource,
}

impl ImageTargets {
    /// 单张图片；未指定文件夹时使用图片所在目录。
    pub fn single(image: &Path, folder: Option<&Path>) -> Self {
        let folder = folder
            .map(Path::to_path_buf)
            .unwrap_or_else(|| owning_folder(image));

        Self {
            source: TargetSource::Single(Some(ImageTarget {
                image_path: image.to_path_buf(),
                folder,
            })),
        }
    }

    /// 从任意按行读取的来源构造列表序列。
    pub fn from_reader(reader: Box<dyn BufRead>, folder_override: Option<PathBuf>) -> Self {
        Self {
            source: TargetSource::List {
                lines: reader.lines(),
                line_number: 0,
                folder_override,
                finished: false,
            },
        }
    }

    pub fn from_list_file(path: &Path, folder_override: Option<PathBuf>) -> Result<Self, AppError> {
        let file = File::open(path)?;
        Ok(Self::from_reader(Box::new(BufReader::new(file)), folder_override))
    }

    /// 按请求构造序列，列表模式下的文件夹来源由平台策略决定。
    pub fn for_request(request: &IconRequest, policy: ListFolderPolicy) -> Result<Self, AppError> {
        if !request.is_list_file() {
            return Ok(Self::single(&request.input_path, request.folder.as_deref()));
        }

        let folder_override = match policy {
            ListFolderPolicy::ExplicitOverride => request.folder.clone(),
            ListFolderPolicy::ImageParent => {
                if let Some(folder) = &request.folder {
                    log::debug!("列表模式忽略指定文件夹: {}", folder.display());
                }
                None
            }
        };

        Self::from_list_file(&request.input_path, folder_override)
    }
}

impl Iterator for ImageTargets {
    type Item = Result<ImageTarget, SkippedLine>;

    fn next(&mut self) -> Option<Self::Item> {
        let (lines, line_number, folder_override, finished) = match &mut self.source {
            TargetSource::Single(target) => return target.take().map(Ok),
            TargetSource::List {
                lines,
                line_number,
                folder_override,
                finished,
            } => (lines, line_number, folder_override, finished),
        };

        while !*finished {
            let line = match lines.next() {
                Some(line) => line,
                None => {
                    *finished = true;
                    break;
                }
            };
            *line_number += 1;

            let line = match line {
                Ok(line) => line,
                Err(err) => {
                    if err.kind() != ErrorKind::InvalidData {
                        *finished = true;
                    }
                    return Some(Err(SkippedLine {
                        line_number: *line_number,
                        content: String::new(),
                        reason: format!("读取失败: {}", err),
                    }));
                }
            };

            let entry = line.trim_start_matches('\u{feff}').trim_end();
            if entry.is_empty() {
                continue;
            }

            let image_path = PathBuf::from(entry);
            if !image_path.exists() {
                return Some(Err(SkippedLine {
                    line_number: *line_number,
                    content: entry.to_string(),
                    reason: "文件不存在".to_string(),
                }));
            }

            let folder = folder_override
                .clone()
                .unwrap_or_else(|| owning_folder(&image_path));
            return Some(Ok(ImageTarget { image_path, folder }));
        }

        None
    }
}
