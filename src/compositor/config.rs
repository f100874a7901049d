//! # 配置模块
//!
//! ## 设计思路
//!
//! 将合成链路中“可调策略”集中到 `CompositorConfig`，图标尺寸固定为 256，
//! 只开放缩放滤镜与像素上限两个参数。
//!
//! ## 实现思路
//!
//! - `Default` 提供生产可用配置（Lanczos3 + 1 亿像素上限）。
//! - `parse_resize_filter` 负责滤镜字符串解析，供设置文件使用。

use image::imageops::FilterType;

use super::ImageError;

/// 最终图标边长（像素）。
pub const ICON_SIZE: u32 = 256;

/// 图片合成配置。
#[derive(Debug, Clone)]
pub struct CompositorConfig {
    /// 解码后的像素上限（`width * height`）。
    pub max_decoded_pixels: u64,
    /// 缩放到图标尺寸时使用的滤镜。
    pub resize_filter: FilterType,
}

impl Default for CompositorConfig {
    fn default() -> Self {
        Self {
            max_decoded_pixels: 100_000_000,
            resize_filter: FilterType::Lanczos3,
        }
    }
}

/// 从外部字符串解析缩放滤镜。
///
/// # 示例
/// ```rust
/// use folder_icon::compositor::parse_resize_filter;
/// use image::imageops::FilterType;
///
/// assert_eq!(parse_resize_filter("Lanczos3")?, FilterType::Lanczos3);
/// # Ok::<(), folder_icon::compositor::ImageError>(())
/// ```
pub fn parse_resize_filter(name: &str) -> Result<FilterType, ImageError> {
    match name.trim().to_lowercase().as_str() {
        "nearest" => Ok(FilterType::Nearest),
        "triangle" => Ok(FilterType::Triangle),
        "catmullrom" => Ok(FilterType::CatmullRom),
        "gaussian" => Ok(FilterType::Gaussian),
        "lanczos3" => Ok(FilterType::Lanczos3),
        other => Err(ImageError::InvalidFormat(format!(
            "未知缩放滤镜：{}（可选：nearest / triangle / catmullrom / gaussian / lanczos3）",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_resize_filter_accepts_known_names_case_insensitively() {
        assert_eq!(parse_resize_filter(" CatmullRom ").unwrap(), FilterType::CatmullRom);
        assert_eq!(parse_resize_filter("nearest").unwrap(), FilterType::Nearest);
    }

    #[test]
    fn parse_resize_filter_rejects_unknown_name() {
        assert!(matches!(
            parse_resize_filter("bicubic"),
            Err(ImageError::InvalidFormat(_))
        ));
    }
}
