//! # 合成与缩放流水线模块
//!
//! ## 设计思路
//!
//! 合成算法纯函数化：输入为任意尺寸图像，输出为正方形 RGBA 画布，便于测试。
//!
//! ## 实现思路
//!
//! 1. 转为 RGBA（缺少 alpha 通道时补全为 255，已有 alpha 原样保留）
//! 2. 取较长边 `s` 分配全零 `s×s` 画布（黑色、全透明）
//! 3. 计算居中偏移 `ax = (s - w) / 2`、`ay = (s - h) / 2`（向下取整）
//! 4. 以覆盖（而非混合）方式粘贴源图，不做缩放
//!
//! 奇数差值时多出的一像素留在右下方，即偏移偏向左上角。

use fast_image_resize as fr;
use image::imageops::FilterType;
use image::{DynamicImage, ImageBuffer, Rgba, RgbaImage};

use super::source::CompositeBitmap;
use super::ImageError;

/// 将图像居中粘贴到正方形透明画布上。
///
/// # 示例
/// ```rust
/// use folder_icon::compositor::compose_square;
/// use image::{DynamicImage, RgbImage};
///
/// let photo = DynamicImage::ImageRgb8(RgbImage::new(300, 200));
/// let bitmap = compose_square(&photo);
/// assert_eq!(bitmap.side(), 300);
/// assert_eq!(bitmap.offset(), (0, 50));
/// ```
pub fn compose_square(image: &DynamicImage) -> CompositeBitmap {
    let source = image.to_rgba8();
    let (width, height) = source.dimensions();
    let side = width.max(height);

    let ax = (side - width) / 2;
    let ay = (side - height) / 2;

    let mut canvas = RgbaImage::new(side, side);
    image::imageops::replace(&mut canvas, &source, i64::from(ax), i64::from(ay));

    CompositeBitmap {
        canvas,
        offset: (ax, ay),
        source_size: (width, height),
    }
}

/// 将正方形画布缩放到固定图标尺寸。
///
/// 优先使用 `fast_image_resize`，失败时回退 `image::resize_exact`。
pub(crate) fn resize_to_icon(
    canvas: &RgbaImage,
    size: u32,
    filter: FilterType,
) -> RgbaImage {
    if canvas.width() == size && canvas.height() == size {
        return canvas.clone();
    }

    match resize_with_fast_image_resize(canvas, size, size, filter) {
        Ok(resized) => resized,
        Err(err) => {
            log::warn!(
                "⚠️ fast_image_resize 缩放失败，回退 image::resize_exact：{}",
                err
            );
            DynamicImage::ImageRgba8(canvas.clone())
                .resize_exact(size, size, filter)
                .to_rgba8()
        }
    }
}

fn resize_with_fast_image_resize(
    canvas: &RgbaImage,
    target_width: u32,
    target_height: u32,
    filter: FilterType,
) -> Result<RgbaImage, ImageError> {
    let (src_width, src_height) = canvas.dimensions();

    let src_image = fr::images::Image::from_vec_u8(
        src_width,
        src_height,
        canvas.as_raw().clone(),
        fr::PixelType::U8x4,
    )
    .map_err(|e| ImageError::Decode(format!("构建源图像缓冲失败：{}", e)))?;

    let mut dst_image = fr::images::Image::new(target_width, target_height, fr::PixelType::U8x4);

    let mut resizer = fr::Resizer::new();
    let options = fr::ResizeOptions::new()
        .resize_alg(fr::ResizeAlg::Convolution(to_fast_filter(filter)));

    resizer
        .resize(&src_image, &mut dst_image, Some(&options))
        .map_err(|e| ImageError::Decode(format!("fast_image_resize 执行失败：{}", e)))?;

    ImageBuffer::<Rgba<u8>, Vec<u8>>::from_raw(target_width, target_height, dst_image.into_vec())
        .ok_or_else(|| ImageError::Decode("fast_image_resize 输出缓冲长度异常".to_string()))
}

fn to_fast_filter(filter: FilterType) -> fr::FilterType {
    match filter {
        FilterType::Nearest => fr::FilterType::Box,
        FilterType::Triangle => fr::FilterType::Bilinear,
        FilterType::CatmullRom => fr::FilterType::CatmullRom,
        FilterType::Gaussian => fr::FilterType::Mitchell,
        FilterType::Lanczos3 => fr::FilterType::Lanczos3,
    }
}
