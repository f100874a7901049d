//! # 中间模型
//!
//! - `RawImageData` 表示已加载但未解码的字节
//! - `CompositeBitmap` 表示合成完成的正方形 RGBA 画布

use image::RgbaImage;

/// 加载阶段输出：原始字节与来源标识。
pub(crate) struct RawImageData {
    /// 原始图片字节。
    pub(crate) bytes: Vec<u8>,
    /// 来源提示（用于日志与诊断）。
    pub(crate) source_hint: String,
}

/// 合成阶段输出：正方形 RGBA 画布。
///
/// 边长为源图宽高中的较大值，源图粘贴在居中偏移处，其余像素为全透明黑色。
#[derive(Debug, Clone)]
pub struct CompositeBitmap {
    pub(crate) canvas: RgbaImage,
    pub(crate) offset: (u32, u32),
    pub(crate) source_size: (u32, u32),
}

impl CompositeBitmap {
    /// 画布边长。
    pub fn side(&self) -> u32 {
        self.canvas.width()
    }

    /// 源图粘贴位置 `(ax, ay)`。
    pub fn offset(&self) -> (u32, u32) {
        self.offset
    }

    pub fn canvas(&self) -> &RgbaImage {
        &self.canvas
    }

    pub fn into_canvas(self) -> RgbaImage {
        self.canvas
    }
}
