//! # 图片合成模块（compositor）
//!
//! ## 设计思路
//!
//! 该模块将“读取 → 解码校验 → 正方形合成 → 缩放编码”按职责拆分为多个子模块，
//! 两个平台的图标应用器共享同一套合成算法。
//!
//! - `handler`：编排整条处理流水线（`Compositor`）
//! - `loader`：负责文件读取、格式识别与像素上限校验
//! - `pipeline`：负责居中合成与图标缩放
//! - `config/error/source`：配置、错误、中间数据模型
//!
//! ## 调用链
//!
//! ```text
//! IconApplier
//!    ↓
//! handler.rs（Compositor::compose_file）
//!    ├─ loader.rs（读取字节 + 尺寸校验 + 解码）
//!    └─ pipeline.rs（补 alpha + 居中粘贴）
//!    ↓
//! CompositeBitmap → save_png / save_icon
//! ```

mod config;
mod error;
mod handler;
mod loader;
mod pipeline;
mod source;

pub use config::{parse_resize_filter, CompositorConfig, ICON_SIZE};
pub use error::ImageError;
pub use handler::Compositor;
pub use pipeline::compose_square;
pub use source::CompositeBitmap;
