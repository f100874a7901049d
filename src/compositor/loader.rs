//! # 加载与校验模块
//!
//! ## 设计思路
//!
//! 本地图片一律先整体读入字节再从内存解码，路径中包含非 ASCII 字符时也能正常工作。
//! 解码前先读取文件头尺寸并按像素上限快速拒绝，减少恶意输入的内存开销。

use std::io::Cursor;
use std::path::Path;

use image::{DynamicImage, ImageReader};

use super::source::RawImageData;
use super::{Compositor, CompositorConfig, ImageError};

impl Compositor {
    /// 从本地路径加载图片原始字节。
    pub(super) fn load_from_file(&self, path: &Path) -> Result<RawImageData, ImageError> {
        log::debug!("📁 开始读取本地图片 - 路径: {}", path.display());

        if !path.is_file() {
            return Err(ImageError::FileSystem(format!(
                "文件不存在：{}",
                path.display()
            )));
        }

        let bytes = std::fs::read(path)
            .map_err(|e| ImageError::FileSystem(format!("无法读取图片文件：{}", e)))?;

        Ok(RawImageData {
            bytes,
            source_hint: path.display().to_string(),
        })
    }

    /// 将原始字节解码为图像。
    pub(super) fn decode(
        &self,
        raw: &RawImageData,
        config: &CompositorConfig,
    ) -> Result<DynamicImage, ImageError> {
        let (header_width, header_height) = Self::inspect_dimensions_from_memory(&raw.bytes)?;
        Self::validate_pixel_limits(config, header_width, header_height)?;

        let decoded = image::load_from_memory(&raw.bytes)
            .map_err(|e| ImageError::Decode(format!("图片解码失败（{}）：{}", raw.source_hint, e)))?;

        if decoded.width() == 0 || decoded.height() == 0 {
            return Err(ImageError::Decode(format!(
                "图片尺寸为空：{}",
                raw.source_hint
            )));
        }

        log::debug!(
            "✅ 图片解码成功 - 来源: {} 尺寸: {}x{} 颜色: {:?}",
            raw.source_hint,
            decoded.width(),
            decoded.height(),
            decoded.color()
        );

        Ok(decoded)
    }

    /// 仅通过内存中的图片头信息读取宽高。
    fn inspect_dimensions_from_memory(bytes: &[u8]) -> Result<(u32, u32), ImageError> {
        let reader = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| ImageError::InvalidFormat(format!("无法识别图片格式：{}", e)))?;

        if reader.format().is_none() {
            return Err(ImageError::InvalidFormat("无法识别图片格式".to_string()));
        }

        reader
            .into_dimensions()
            .map_err(|e| ImageError::InvalidFormat(format!("无法读取图片尺寸：{}", e)))
    }

    /// 校验像素数量是否超过配置上限。
    fn validate_pixel_limits(
        config: &CompositorConfig,
        width: u32,
        height: u32,
    ) -> Result<(), ImageError> {
        let pixels = (width as u64)
            .checked_mul(height as u64)
            .ok_or_else(|| ImageError::ResourceLimit("图片像素数溢出".to_string()))?;

        if pixels > config.max_decoded_pixels {
            return Err(ImageError::ResourceLimit(format!(
                "图片像素过大：{} 像素（限制：{} 像素）",
                pixels, config.max_decoded_pixels
            )));
        }

        Ok(())
    }
}
