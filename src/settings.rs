//! 运行设置模块
//!
//! # 设计思路
//!
//! 调试开关与合成参数统一放入 `AppSettings`，由入口显式传递，不使用全局状态。
//! 设置文件为可选的 JSON，缺失时使用默认值；解析失败返回 `AppError::Settings`，由入口告警并回退默认值。

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::compositor::{parse_resize_filter, CompositorConfig};
use crate::error::AppError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// 输出调试日志
    pub debug: bool,
    /// 缩放滤镜名称（nearest / triangle / catmullrom / gaussian / lanczos3）
    pub resize_filter: String,
    /// 解码像素上限
    pub max_decoded_pixels: u64,
}

impl Default for AppSettings {
    fn default() -> Self {
        let compositor = CompositorConfig::default();
        Self {
            debug: false,
            resize_filter: "lanczos3".to_string(),
            max_decoded_pixels: compositor.max_decoded_pixels,
        }
    }
}

impl AppSettings {
    /// 转换为合成器配置。
    pub fn compositor_config(&self) -> Result<CompositorConfig, AppError> {
        let resize_filter = parse_resize_filter(&self.resize_filter)
            .map_err(|e| AppError::Settings(e.to_string()))?;

        if self.max_decoded_pixels == 0 {
            return Err(AppError::Settings("max_decoded_pixels 不能为 0".to_string()));
        }

        Ok(CompositorConfig {
            max_decoded_pixels: self.max_decoded_pixels,
            resize_filter,
        })
    }
}

/// 读取设置文件；文件不存在时返回默认值。
pub fn read_settings(path: &Path) -> Result<AppSettings, AppError> {
    if !path.exists() {
        log::debug!("设置文件不存在，使用默认设置: {}", path.display());
        return Ok(AppSettings::default());
    }

    let content = fs::read_to_string(path)
        .map_err(|e| AppError::Settings(format!("{}: {}", path.display(), e)))?;
    serde_json::from_str(&content).map_err(|e| AppError::Settings(format!("{}: {}", path.display(), e)))
}
