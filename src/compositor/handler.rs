//! # 核心编排模块
//!
//! ## 设计思路
//!
//! `Compositor` 只负责流程编排与配置持有，不关心平台差异。
//! 处理链路固定为：
//! 1. 读取原始字节
//! 2. 解码并校验像素上限
//! 3. 合成正方形画布
//! 4. 按需编码为 PNG / ICO 写盘

use std::path::Path;
use std::time::Instant;

use image::{DynamicImage, ImageFormat, RgbaImage};

use super::config::ICON_SIZE;
use super::pipeline::{compose_square, resize_to_icon};
use super::{CompositeBitmap, CompositorConfig, ImageError};

/// 图片合成器。
#[derive(Debug, Clone, Default)]
pub struct Compositor {
    config: CompositorConfig,
}

impl Compositor {
    pub fn new(config: CompositorConfig) -> Self {
        Self { config }
    }

    /// 读取并解码本地图片。
    pub fn load_image(&self, path: &Path) -> Result<DynamicImage, ImageError> {
        let raw = self.load_from_file(path)?;
        self.decode(&raw, &self.config)
    }

    /// 处理主入口：读取图片并合成为正方形画布。
    pub fn compose_file(&self, path: &Path) -> Result<CompositeBitmap, ImageError> {
        let start = Instant::now();
        let image = self.load_image(path)?;
        let bitmap = compose_square(&image);

        log::debug!(
            "🧩 合成完成 - 源尺寸: {}x{} 画布: {}x{} 偏移: {:?} 耗时: {}ms",
            bitmap.source_size.0,
            bitmap.source_size.1,
            bitmap.side(),
            bitmap.side(),
            bitmap.offset,
            start.elapsed().as_millis()
        );

        Ok(bitmap)
    }

    /// 将画布保存为 PNG。
    pub fn save_png(&self, canvas: &RgbaImage, path: &Path) -> Result<(), ImageError> {
        canvas
            .save_with_format(path, ImageFormat::Png)
            .map_err(|e| ImageError::Encode(format!("保存 PNG 失败（{}）：{}", path.display(), e)))
    }

    /// 将图像缩放到固定图标尺寸并保存为单帧 ICO。
    pub fn save_icon(&self, image: &DynamicImage, path: &Path) -> Result<(), ImageError> {
        let resized = resize_to_icon(&image.to_rgba8(), ICON_SIZE, self.config.resize_filter);

        resized
            .save_with_format(path, ImageFormat::Ico)
            .map_err(|e| ImageError::Encode(format!("保存 ICO 失败（{}）：{}", path.display(), e)))?;

        log::debug!("🖼️ 已生成图标：{}", path.display());
        Ok(())
    }
}
